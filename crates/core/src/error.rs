//! Typed engine errors, in the teacher's `thiserror`-derived style (see
//! `config::schema`/`commands` error handling) rather than `anyhow` at the
//! library boundary — callers embedding this crate need to match on
//! failure kinds, not just print a message.

use crate::id::{DesktopId, MonitorId, NodeId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("desktop {0} not found")]
    DesktopNotFound(DesktopId),

    #[error("monitor {0} not found")]
    MonitorNotFound(MonitorId),

    #[error("desktop {0} still has windows")]
    DesktopNotEmpty(DesktopId),

    #[error("monitor {0} has no desktops left to remove")]
    LastDesktopOnMonitor(MonitorId),

    #[error("node {0} has no focused descendant")]
    NoFocusableNode(NodeId),

    #[error("split ratio {0} is out of the (0.0, 1.0) range")]
    InvalidSplitRatio(f64),

    #[error("node {0} is not a leaf")]
    NotALeaf(NodeId),

    #[error("node {child} is not a descendant of {ancestor}")]
    NotADescendant { ancestor: NodeId, child: NodeId },

    #[error("persistence error: {0}")]
    Persistence(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
