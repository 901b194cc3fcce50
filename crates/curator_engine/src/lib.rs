//! Curator engine: backend client and effect execution.
mod api;
mod engine;
mod envelope;
mod members;
mod playlists;
mod types;

pub use api::{ApiSettings, CurationApi, ReqwestCurationApi};
pub use engine::EngineHandle;
pub use envelope::{decode_envelope, SuccessPolicy, SUCCESS_CODE};
pub use members::MemberUpdate;
pub use playlists::{LinkData, NewPlaylist, PlaylistUpdate};
pub use types::{EngineError, EngineEvent};
