use lamina::InvariantViolation;
use lamina::data::splay::{SeqId, SplayForest};

fn filled(keys: &[usize], capacity: usize) -> (SplayForest, SeqId) {
    let mut f = SplayForest::new(capacity);
    let s = f.create();
    for &k in keys {
        f.append(s, k).unwrap();
    }
    (f, s)
}

#[test]
fn splay_append_keeps_insertion_order() {
    let (f, s) = filled(&[4, 1, 3, 0, 2], 5);
    assert_eq!(f.to_vec(s).unwrap(), vec![4, 1, 3, 0, 2]);
    assert_eq!(f.len(s).unwrap(), 5);
    f.validate(s).unwrap();
}

#[test]
fn splay_split_then_join_reconstructs_the_sequence() {
    let keys: Vec<usize> = (0..20).rev().collect();
    for k in 0..=keys.len() {
        let (mut f, s) = filled(&keys, 20);
        let right = f.split_at(s, k).unwrap();
        assert_eq!(f.len(s).unwrap(), k);
        assert_eq!(f.len(right).unwrap(), keys.len() - k);
        f.validate(s).unwrap();
        f.validate(right).unwrap();

        let joined = f.join(s, right).unwrap();
        assert_eq!(joined, s);
        assert_eq!(f.to_vec(s).unwrap(), keys);
        f.validate(s).unwrap();
    }
}

#[test]
fn splay_len_matches_reachable_elements_after_mixed_edits() {
    let (mut f, a) = filled(&[0, 1, 2, 3, 4, 5], 12);
    let b = f.create();
    for k in 6..12 {
        f.append(b, k).unwrap();
    }
    let c = f.split_at(a, 2).unwrap();
    let d = f.split_at(b, 4).unwrap();
    f.join(c, d).unwrap();
    f.join(a, b).unwrap();

    for seq in [a, c] {
        assert_eq!(f.len(seq).unwrap(), f.to_vec(seq).unwrap().len());
        f.validate(seq).unwrap();
    }
    assert_eq!(f.to_vec(a).unwrap(), vec![0, 1, 6, 7, 8, 9]);
    assert_eq!(f.to_vec(c).unwrap(), vec![2, 3, 4, 5, 10, 11]);
}

#[test]
fn splay_locate_reports_in_order_positions() {
    let keys = [7, 2, 9, 0, 5];
    let (mut f, s) = filled(&keys, 10);
    for (pos, &k) in keys.iter().enumerate() {
        assert_eq!(f.locate(k).unwrap(), (s, pos));
    }
    let right = f.split_at(s, 3).unwrap();
    assert_eq!(f.locate(0).unwrap(), (right, 0));
    assert_eq!(f.locate(5).unwrap(), (right, 1));
    assert_eq!(f.locate(9).unwrap(), (s, 2));
}

#[test]
fn splay_split_around_removes_the_element() {
    let (mut f, s) = filled(&[0, 1, 2, 3, 4], 5);
    let (left, right) = f.split_around(2).unwrap();
    assert_eq!(left, s);
    assert_eq!(f.to_vec(left).unwrap(), vec![0, 1]);
    assert_eq!(f.to_vec(right).unwrap(), vec![3, 4]);
    assert!(!f.is_attached(2));

    // a detached element may be appended again
    f.append(right, 2).unwrap();
    assert_eq!(f.to_vec(right).unwrap(), vec![3, 4, 2]);
}

#[test]
fn splay_split_around_the_ends_leaves_an_empty_side() {
    let (mut f, _) = filled(&[0, 1, 2], 3);
    let (left, right) = f.split_around(0).unwrap();
    assert!(f.is_empty(left).unwrap());
    assert_eq!(f.to_vec(right).unwrap(), vec![1, 2]);

    let (left, right) = f.split_around(2).unwrap();
    assert_eq!(f.to_vec(left).unwrap(), vec![1]);
    assert!(f.is_empty(right).unwrap());
}

#[test]
fn splay_join_handles_empty_sides() {
    let (mut f, s) = filled(&[0, 1], 2);
    let empty = f.create();
    f.join(s, empty).unwrap();
    assert_eq!(f.to_vec(s).unwrap(), vec![0, 1]);

    let front = f.create();
    f.join(front, s).unwrap();
    assert_eq!(f.to_vec(front).unwrap(), vec![0, 1]);
    assert_eq!(f.locate(1).unwrap(), (front, 1));
}

#[test]
fn splay_rejects_retired_sequences() {
    let (mut f, s) = filled(&[0], 2);
    let other = f.create();
    f.join(s, other).unwrap();
    assert_eq!(
        f.len(other),
        Err(InvariantViolation::RetiredSequence { seq: other.0 })
    );
    assert!(f.append(other, 1).is_err());
    assert!(f.split_at(other, 0).is_err());
}

#[test]
fn splay_rejects_double_membership() {
    let (mut f, s) = filled(&[0, 1], 2);
    assert_eq!(
        f.append(s, 1),
        Err(InvariantViolation::AttachedElement { key: 1 })
    );
    assert!(f.join(s, s).is_err());
    assert!(f.locate(5).is_err());
}
