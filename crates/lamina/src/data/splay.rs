//! Order-statistics sequences backed by splay trees.
//!
//! A [`SplayForest`] owns one node per element key (`0..capacity`) and any number of sequences.
//! Sequences are ordered by position only; every node caches its subtree size so that `len` is
//! O(1) and positional operations are amortized O(log n). Joined-away sequences are retired and
//! every later access to them is reported as an invariant violation.

use crate::error::InvariantViolation;

/// Handle of one sequence in a [`SplayForest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeqId(pub u32);

impl SeqId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

type Result<T> = std::result::Result<T, InvariantViolation>;

#[derive(Debug, Clone, Copy, Default)]
struct Node {
    parent: Option<usize>,
    left: Option<usize>,
    right: Option<usize>,
    size: usize,
    /// Whether the element currently belongs to a sequence.
    attached: bool,
}

#[derive(Debug, Clone, Copy)]
struct Seq {
    root: Option<usize>,
    retired: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SplayForest {
    nodes: Vec<Node>,
    seqs: Vec<Seq>,
    /// Owning sequence of a tree, valid for root nodes only.
    owner: Vec<Option<SeqId>>,
}

impl SplayForest {
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: vec![Node::default(); capacity],
            seqs: Vec::new(),
            owner: vec![None; capacity],
        }
    }

    /// Starts a new empty sequence.
    pub fn create(&mut self) -> SeqId {
        let id = SeqId(self.seqs.len() as u32);
        self.seqs.push(Seq {
            root: None,
            retired: false,
        });
        id
    }

    fn seq(&self, seq: SeqId) -> Result<&Seq> {
        match self.seqs.get(seq.index()) {
            Some(s) if !s.retired => Ok(s),
            _ => Err(InvariantViolation::RetiredSequence { seq: seq.0 }),
        }
    }

    fn set_root(&mut self, seq: SeqId, root: Option<usize>) {
        self.seqs[seq.index()].root = root;
        if let Some(r) = root {
            self.nodes[r].parent = None;
            self.owner[r] = Some(seq);
        }
    }

    fn size(&self, x: Option<usize>) -> usize {
        x.map_or(0, |x| self.nodes[x].size)
    }

    fn update(&mut self, x: usize) {
        let n = self.nodes[x];
        self.nodes[x].size = 1 + self.size(n.left) + self.size(n.right);
    }

    pub fn len(&self, seq: SeqId) -> Result<usize> {
        Ok(self.size(self.seq(seq)?.root))
    }

    pub fn is_empty(&self, seq: SeqId) -> Result<bool> {
        Ok(self.seq(seq)?.root.is_none())
    }

    pub fn is_attached(&self, key: usize) -> bool {
        self.nodes.get(key).is_some_and(|n| n.attached)
    }

    fn rotate(&mut self, x: usize) {
        let Some(p) = self.nodes[x].parent else {
            return;
        };
        let g = self.nodes[p].parent;
        if self.nodes[p].left == Some(x) {
            let b = self.nodes[x].right;
            self.nodes[p].left = b;
            if let Some(b) = b {
                self.nodes[b].parent = Some(p);
            }
            self.nodes[x].right = Some(p);
        } else {
            let b = self.nodes[x].left;
            self.nodes[p].right = b;
            if let Some(b) = b {
                self.nodes[b].parent = Some(p);
            }
            self.nodes[x].left = Some(p);
        }
        self.nodes[p].parent = Some(x);
        self.nodes[x].parent = g;
        if let Some(g) = g {
            if self.nodes[g].left == Some(p) {
                self.nodes[g].left = Some(x);
            } else {
                self.nodes[g].right = Some(x);
            }
        }
        self.update(p);
        self.update(x);
    }

    /// Moves `x` to the root of the tree of `seq`.
    fn splay(&mut self, seq: SeqId, x: usize) {
        while let Some(p) = self.nodes[x].parent {
            match self.nodes[p].parent {
                None => self.rotate(x),
                Some(g) => {
                    let zig_zig = (self.nodes[g].left == Some(p)) == (self.nodes[p].left == Some(x));
                    if zig_zig {
                        self.rotate(p);
                    } else {
                        self.rotate(x);
                    }
                    self.rotate(x);
                }
            }
        }
        self.set_root(seq, Some(x));
    }

    fn tree_root(&self, mut x: usize) -> usize {
        while let Some(p) = self.nodes[x].parent {
            x = p;
        }
        x
    }

    /// Node at in-order position `k` of the tree rooted at `root`.
    fn select(&self, root: usize, mut k: usize) -> Option<usize> {
        let mut x = Some(root);
        while let Some(n) = x {
            let left = self.size(self.nodes[n].left);
            if k < left {
                x = self.nodes[n].left;
            } else if k == left {
                return Some(n);
            } else {
                k -= left + 1;
                x = self.nodes[n].right;
            }
        }
        None
    }

    fn check_detached(&self, key: usize) -> Result<()> {
        match self.nodes.get(key) {
            Some(n) if !n.attached => Ok(()),
            _ => Err(InvariantViolation::AttachedElement { key }),
        }
    }

    /// Appends the detached element `key` to the end of `seq`.
    pub fn append(&mut self, seq: SeqId, key: usize) -> Result<()> {
        let root = self.seq(seq)?.root;
        self.check_detached(key)?;
        self.nodes[key] = Node {
            parent: None,
            left: root,
            right: None,
            size: 1 + self.size(root),
            attached: true,
        };
        if let Some(r) = root {
            self.nodes[r].parent = Some(key);
            self.owner[r] = None;
        }
        self.set_root(seq, Some(key));
        Ok(())
    }

    /// Concatenates `right` onto `left` and retires `right`.
    pub fn join(&mut self, left: SeqId, right: SeqId) -> Result<SeqId> {
        if left == right {
            return Err(InvariantViolation::CorruptTree {
                seq: left.0,
                detail: "sequence joined with itself",
            });
        }
        let left_root = self.seq(left)?.root;
        let right_root = self.seq(right)?.root;
        self.seqs[right.index()] = Seq {
            root: None,
            retired: true,
        };

        match (left_root, right_root) {
            (_, None) => {}
            (None, Some(r)) => self.set_root(left, Some(r)),
            (Some(l), Some(r)) => {
                let mut max = l;
                while let Some(next) = self.nodes[max].right {
                    max = next;
                }
                self.splay(left, max);
                self.nodes[max].right = Some(r);
                self.nodes[r].parent = Some(max);
                self.owner[r] = None;
                self.update(max);
            }
        }
        Ok(left)
    }

    /// Cuts `seq` before position `k`: `seq` keeps `[0, k)` and the returned new sequence holds
    /// the rest.
    pub fn split_at(&mut self, seq: SeqId, k: usize) -> Result<SeqId> {
        let root = self.seq(seq)?.root;
        let len = self.size(root);
        let right = self.create();
        if k >= len {
            return Ok(right);
        }
        let Some(root) = root else {
            return Ok(right);
        };
        let Some(x) = self.select(root, k) else {
            return Err(InvariantViolation::CorruptTree {
                seq: seq.0,
                detail: "position not reachable",
            });
        };
        self.splay(seq, x);
        let left = self.nodes[x].left.take();
        self.update(x);
        self.set_root(seq, left);
        self.set_root(right, Some(x));
        Ok(right)
    }

    /// Finds the sequence holding `key` and its position there.
    pub fn locate(&mut self, key: usize) -> Result<(SeqId, usize)> {
        if !self.is_attached(key) {
            return Err(InvariantViolation::CorruptTree {
                seq: u32::MAX,
                detail: "element is not part of any sequence",
            });
        }
        let root = self.tree_root(key);
        let Some(seq) = self.owner[root] else {
            return Err(InvariantViolation::CorruptTree {
                seq: u32::MAX,
                detail: "tree without owner",
            });
        };
        if self.seq(seq)?.root != Some(root) {
            return Err(InvariantViolation::CorruptTree {
                seq: seq.0,
                detail: "root owner out of date",
            });
        }
        self.splay(seq, key);
        Ok((seq, self.size(self.nodes[key].left)))
    }

    /// Removes `key` from its sequence. The sequence keeps everything before `key`; everything
    /// after it moves to the returned new sequence.
    pub fn split_around(&mut self, key: usize) -> Result<(SeqId, SeqId)> {
        let (seq, _) = self.locate(key)?;
        let left = self.nodes[key].left.take();
        let right_part = self.nodes[key].right.take();
        self.nodes[key] = Node::default();
        self.owner[key] = None;

        let right = self.create();
        self.seqs[seq.index()].root = None;
        self.set_root(seq, left);
        self.set_root(right, right_part);
        Ok((seq, right))
    }

    /// Elements of `seq` in order.
    pub fn to_vec(&self, seq: SeqId) -> Result<Vec<usize>> {
        let root = self.seq(seq)?.root;
        let mut out = Vec::with_capacity(self.size(root));
        let mut stack: Vec<usize> = Vec::new();
        let mut x = root;
        while x.is_some() || !stack.is_empty() {
            while let Some(n) = x {
                stack.push(n);
                x = self.nodes[n].left;
            }
            let Some(n) = stack.pop() else {
                break;
            };
            out.push(n);
            x = self.nodes[n].right;
        }
        Ok(out)
    }

    /// Checks parent links, cached sizes and root ownership of `seq`.
    pub fn validate(&self, seq: SeqId) -> Result<()> {
        let corrupt = |detail| InvariantViolation::CorruptTree { seq: seq.0, detail };
        let Some(root) = self.seq(seq)?.root else {
            return Ok(());
        };
        if self.nodes[root].parent.is_some() {
            return Err(corrupt("root has a parent"));
        }
        if self.owner[root] != Some(seq) {
            return Err(corrupt("root owner out of date"));
        }

        let mut stack = vec![root];
        let mut seen = 0usize;
        while let Some(x) = stack.pop() {
            seen += 1;
            if seen > self.nodes.len() {
                return Err(corrupt("cycle in tree"));
            }
            let n = self.nodes[x];
            if !n.attached {
                return Err(corrupt("detached node reachable"));
            }
            if n.size != 1 + self.size(n.left) + self.size(n.right) {
                return Err(corrupt("cached size out of date"));
            }
            for child in [n.left, n.right].into_iter().flatten() {
                if self.nodes[child].parent != Some(x) {
                    return Err(corrupt("child does not point back to its parent"));
                }
                stack.push(child);
            }
        }
        if seen != self.nodes[root].size {
            return Err(corrupt("root size disagrees with reachable nodes"));
        }
        Ok(())
    }
}
