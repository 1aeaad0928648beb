//! Network Layer
//!
//! Score sync over HTTP: the wire protocol, the sync service, and the
//! best-effort client. This layer is **non-deterministic** - puzzle logic
//! never depends on it.

pub mod client;
pub mod protocol;
pub mod server;

pub use client::{SyncClient, SyncError};
pub use protocol::{ErrorBody, HealthResponse, ProtocolError, ScoreRow, SyncRequest, SyncResponse, ValidSync};
pub use server::{create_router, ApiError, AppState, ScoreBoard, ServerConfig, SyncServer, SyncServerError, UpsertOutcome};
