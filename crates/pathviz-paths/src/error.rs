use pathviz_core::Point;

/// Errors raised by path reconstruction and algorithm parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An algorithm name that is not `bfs`, `dfs` or `astar`.
    #[error("unknown algorithm {0:?}")]
    UnknownAlgorithm(String),
    /// The predecessor chain ended before reaching the start cell.
    ///
    /// Only possible if search bookkeeping is broken.
    #[error("predecessor chain from {terminal} stops at {reached} instead of the start")]
    BrokenChain { terminal: Point, reached: Point },
}

pub type Result<T> = std::result::Result<T, Error>;
