/// Internal consistency failures. Each one means the engine itself is wrong, so the pipeline stops
/// instead of producing a silently corrupted drawing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("vertex {vertex} sits at position {position} of rank {rank} but records index {index}")]
    IndexMismatch {
        vertex: u32,
        rank: usize,
        position: usize,
        index: usize,
    },
    #[error("vertex {vertex} is stored in rank {row} but records rank {rank}")]
    RankMismatch { vertex: u32, row: usize, rank: usize },
    #[error("edge {tail} -> {head} does not point to a higher rank ({tail_rank} -> {head_rank})")]
    RankOrder {
        tail: u32,
        head: u32,
        tail_rank: usize,
        head_rank: usize,
    },
    #[error("layer edge {edge} spans {span} ranks")]
    LongSpan { edge: u32, span: usize },
    #[error("segment {segment} is not held by any container")]
    SegmentWithoutContainer { segment: u32 },
    #[error("rank {rank} breaks container/vertex alternation at entry {at}")]
    Alternation { rank: usize, at: usize },
    #[error("rank {rank} holds {found} vertices after reordering, expected {expected}")]
    LostVertices {
        rank: usize,
        expected: usize,
        found: usize,
    },
    #[error("segment {segment} endpoints differ in x: top {top}, bottom {bottom}")]
    SegmentMisaligned { segment: u32, top: f64, bottom: f64 },
    #[error("sequence {seq} was retired")]
    RetiredSequence { seq: u32 },
    #[error("order-statistics tree of sequence {seq} is corrupted: {detail}")]
    CorruptTree { seq: u32, detail: &'static str },
    #[error("element {key} is already part of a sequence")]
    AttachedElement { key: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout configuration `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("layout invariant violated: {0}")]
    Invariant(InvariantViolation),
    #[error("layout cancelled")]
    Cancelled,
    #[error("malformed layout configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("failed to start the layout worker: {0}")]
    Spawn(std::io::Error),
    #[error("layout worker ended without delivering a result")]
    TaskAborted,
}

impl Error {
    /// Wraps and reports an invariant violation.
    pub(crate) fn invariant(violation: InvariantViolation) -> Self {
        tracing::error!(%violation, "layout invariant violated");
        Self::Invariant(violation)
    }
}

impl From<InvariantViolation> for Error {
    fn from(violation: InvariantViolation) -> Self {
        Self::invariant(violation)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
