//! Segment containers: position-ordered runs of segments that occupy consecutive slots of a rank.

use crate::data::splay::{SeqId, SplayForest};
use crate::error::{Error, InvariantViolation, Result};
use crate::model::SegmentId;

/// All containers of one directional sweep. Each segment is in at most one container at a time.
#[derive(Debug, Clone)]
pub struct Containers {
    forest: SplayForest,
    /// First occupied slot of each container in the current rank.
    pos: Vec<usize>,
}

impl Containers {
    pub fn new(segment_count: usize) -> Self {
        Self {
            forest: SplayForest::new(segment_count),
            pos: Vec::new(),
        }
    }

    fn track(&mut self, seq: SeqId) -> SeqId {
        if self.pos.len() <= seq.index() {
            self.pos.resize(seq.index() + 1, 0);
        }
        seq
    }

    pub fn create(&mut self) -> SeqId {
        let seq = self.forest.create();
        self.track(seq)
    }

    pub fn pos(&self, seq: SeqId) -> usize {
        self.pos.get(seq.index()).copied().unwrap_or(0)
    }

    pub fn set_pos(&mut self, seq: SeqId, pos: usize) {
        self.track(seq);
        self.pos[seq.index()] = pos;
    }

    pub fn len(&self, seq: SeqId) -> Result<usize> {
        Ok(self.forest.len(seq)?)
    }

    pub fn is_empty(&self, seq: SeqId) -> Result<bool> {
        Ok(self.forest.is_empty(seq)?)
    }

    pub fn append(&mut self, seq: SeqId, segment: SegmentId) -> Result<()> {
        Ok(self.forest.append(seq, segment.index())?)
    }

    /// Concatenates `right` onto `left`; `right` is retired.
    pub fn join(&mut self, left: SeqId, right: SeqId) -> Result<SeqId> {
        Ok(self.forest.join(left, right)?)
    }

    /// Keeps the first `k` segments in `seq` and returns a container with the rest, positioned
    /// right after them.
    pub fn split_at(&mut self, seq: SeqId, k: usize) -> Result<SeqId> {
        let right = self.forest.split_at(seq, k)?;
        let pos = self.pos(seq) + k;
        self.set_pos(right, pos);
        Ok(right)
    }

    /// Takes `segment` out of its container. Returns the container (now holding the segments
    /// before it), the offset the segment had, and a new container with the segments after it.
    pub fn split_around(&mut self, segment: SegmentId) -> Result<(SeqId, usize, SeqId)> {
        let (_, offset) = self.locate(segment)?;
        let (left, right) = self.forest.split_around(segment.index())?;
        let pos = self.pos(left) + offset + 1;
        self.set_pos(right, pos);
        Ok((left, offset, right))
    }

    /// Container holding `segment` and the segment's offset inside it.
    pub fn locate(&mut self, segment: SegmentId) -> Result<(SeqId, usize)> {
        if !self.forest.is_attached(segment.index()) {
            return Err(Error::invariant(
                InvariantViolation::SegmentWithoutContainer { segment: segment.0 },
            ));
        }
        Ok(self.forest.locate(segment.index())?)
    }

    pub fn segments(&self, seq: SeqId) -> Result<Vec<SegmentId>> {
        Ok(self
            .forest
            .to_vec(seq)?
            .into_iter()
            .map(|k| SegmentId(k as u32))
            .collect())
    }

    pub fn validate(&self, seq: SeqId) -> Result<()> {
        Ok(self.forest.validate(seq)?)
    }
}
