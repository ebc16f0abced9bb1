//! Unified error type surfaced by the runtime API.
//!
//! Wraps content loading, rule and save-state failures so hosts can bubble
//! them up with consistent context. Rejected actions are not errors here:
//! they travel on the event stream.
use std::path::PathBuf;

use combat_core::CombatError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to load combat content: {0:#}")]
    Content(anyhow::Error),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error("failed to encode save-state")]
    SaveState(#[source] bincode::Error),

    #[error("failed to decode save-state")]
    RestoreState(#[source] bincode::Error),

    #[error("save-state I/O failed for {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
