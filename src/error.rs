use thiserror::Error;

/// Errors raised while building environments and schedules
///
/// Runtime misuse of an environment (stepping after termination, an action outside the
/// action space) is a programming error and panics instead.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("map has no rows")]
    EmptyMap,

    #[error("row {row} has width {got}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("unknown cell '{cell}' at ({x}, {y})")]
    UnknownCell { cell: char, x: usize, y: usize },

    #[error("map has no {0} cell")]
    MissingCell(&'static str),

    #[error("map has more than one {0} cell")]
    DuplicateCell(&'static str),

    #[error("sentinel {sentinel} has an empty patrol route")]
    EmptyRoute { sentinel: usize },

    #[error("sentinel {sentinel} patrols outside the map at ({x}, {y})")]
    RouteOutOfBounds { sentinel: usize, x: i32, y: i32 },

    #[error("joint patrol cycle of the given routes does not fit in a u32")]
    PatrolCycleOverflow,

    #[error("invalid decay schedule: {0}")]
    InvalidDecay(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
