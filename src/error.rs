use crate::beachline::NodeId;

/// Misuse of the engine or of the beach line.
///
/// Degenerate input (collinear or duplicated sites) never produces one of these: the geometry
/// helpers return `None` for it and the sweep carries on.
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// `step` was called before `reset`.
    #[error("the sweep has not been reset yet")]
    Uninitialized,
    /// A search was made on a beach line without arcs.
    #[error("the beach line is empty")]
    EmptyBeachline,
    /// A root arc was installed on a beach line that already has one.
    #[error("the beach line already has a root")]
    NotEmpty,
    /// The node is a breakpoint, but an arc was expected.
    #[error("node {0:?} is not an arc")]
    NotAnArc(NodeId),
    /// The node is an arc, but a breakpoint was expected.
    #[error("node {0:?} is not a breakpoint")]
    NotABreakpoint(NodeId),
    /// The node was split or removed earlier.
    #[error("node {0:?} is no longer part of the beach line")]
    Vacant(NodeId),
    /// The arc is the root, so there is no breakpoint to collapse.
    #[error("arc {0:?} has no parent breakpoint")]
    NoParent(NodeId),
}
