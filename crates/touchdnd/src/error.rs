//! Engine errors

/// Operation construction failure.
///
/// Propagates to the caller only after the single-active-operation guard
/// has been released through a forced `Cancelled` ended-callback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("failed to build drag image: {0}")]
    DragImage(String),

    #[error("drag source element vanished during setup")]
    SourceGone,
}
