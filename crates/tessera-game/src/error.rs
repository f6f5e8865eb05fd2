//! Scene error types.

use tessera_config::ConfigError;

use crate::scene::BodyId;

/// Errors surfaced by [`VoxelScene`](crate::VoxelScene) and the demo binary.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// No live body has this id.
    #[error("unknown body {0}")]
    UnknownBody(BodyId),

    /// The body exists but its position or velocity is not finite.
    #[error("body {0} has a non-finite state")]
    InvalidBody(BodyId),

    /// Loading or saving configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
