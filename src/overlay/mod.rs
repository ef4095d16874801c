//! Now-playing resolution and the client-facing payload

pub mod payload;
pub mod resolver;

pub use payload::{build_now_playing_payload, NowPlayingPayload};
pub use resolver::{resolve_playback, ResolvedPlayback};
