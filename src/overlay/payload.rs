//! Client-facing now-playing wire format
//!
//! The overlay page depends on this exact shape: camelCase keys, optional
//! keys omitted entirely when absent, and `serverTime` as fractional epoch
//! seconds so the client can extrapolate playback position between polls.

use chrono::Utc;
use serde::Serialize;

use crate::subsonic::TrackEntry;

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Normalized payload served by `/api/now-playing`.
///
/// When nothing is playing only `isPlaying` and `serverTime` are emitted
/// (plus `error` after a backend failure).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlayingPayload {
    pub is_playing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<i64>,
    pub server_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NowPlayingPayload {
    pub fn not_playing() -> Self {
        Self::not_playing_at(epoch_seconds())
    }

    fn not_playing_at(server_time: f64) -> Self {
        Self {
            is_playing: false,
            is_paused: None,
            title: None,
            artist: None,
            album: None,
            cover_url: None,
            duration_seconds: None,
            elapsed_seconds: None,
            server_time,
            error: None,
        }
    }

    /// Payload reported when the backend cannot be reached.
    ///
    /// The overlay degrades to its "nothing playing" state with an error
    /// note instead of ever seeing a hard HTTP failure.
    pub fn unreachable(note: impl Into<String>) -> Self {
        Self {
            error: Some(note.into()),
            ..Self::not_playing()
        }
    }
}

/// Convert a resolved entry into the wire payload.
///
/// `elapsed_override` is the play queue's authoritative position; without it
/// elapsed time is derived from the entry's minutes-since-start field. Either
/// way the result is clamped to the track duration when one is known.
pub fn build_now_playing_payload(
    entry: Option<&TrackEntry>,
    is_paused: bool,
    elapsed_override: Option<i64>,
) -> NowPlayingPayload {
    let server_time = epoch_seconds();

    let Some(entry) = entry else {
        return NowPlayingPayload::not_playing_at(server_time);
    };

    let duration = entry.duration.unwrap_or(0);
    let raw_elapsed = match elapsed_override {
        Some(position) => position.max(0),
        None => {
            let minutes = entry.minutes_ago.unwrap_or(0.0);
            ((minutes * 60.0).round() as i64).max(0)
        }
    };
    let elapsed = if duration > 0 {
        raw_elapsed.min(i64::from(duration))
    } else {
        raw_elapsed
    };

    let cover_id = entry
        .cover_art
        .as_deref()
        .filter(|id| !id.is_empty())
        .or(entry.id.as_deref().filter(|id| !id.is_empty()))
        .unwrap_or("");
    let cover_url = if cover_id.is_empty() {
        String::new()
    } else {
        // Served through this process's own proxy endpoint so backend
        // credentials never reach the browser.
        format!("/api/cover/{}", urlencoding::encode(cover_id))
    };

    NowPlayingPayload {
        is_playing: true,
        is_paused: Some(is_paused),
        title: Some(text_or(entry.title.as_deref(), UNKNOWN_TITLE)),
        artist: Some(text_or(entry.artist.as_deref(), UNKNOWN_ARTIST)),
        album: Some(entry.album.clone().unwrap_or_default()),
        cover_url: Some(cover_url),
        duration_seconds: Some(duration),
        elapsed_seconds: Some(elapsed),
        server_time,
        error: None,
    }
}

fn text_or(value: Option<&str>, fallback: &str) -> String {
    value
        .filter(|text| !text.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn epoch_seconds() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> TrackEntry {
        TrackEntry {
            id: Some("song-1".to_string()),
            title: Some("Peg".to_string()),
            artist: Some("Steely Dan".to_string()),
            album: Some("Aja".to_string()),
            duration: Some(237),
            cover_art: Some("al-9".to_string()),
            minutes_ago: Some(1.0),
        }
    }

    #[test]
    fn test_elapsed_is_clamped_to_duration() {
        let payload = build_now_playing_payload(Some(&entry()), false, Some(9000));
        assert_eq!(payload.elapsed_seconds, Some(237));

        let payload = build_now_playing_payload(Some(&entry()), false, None);
        assert_eq!(payload.elapsed_seconds, Some(60));
    }

    #[test]
    fn test_unknown_duration_skips_upper_clamp() {
        let mut track = entry();
        track.duration = None;

        let payload = build_now_playing_payload(Some(&track), false, Some(9000));
        assert_eq!(payload.duration_seconds, Some(0));
        assert_eq!(payload.elapsed_seconds, Some(9000));
    }

    #[test]
    fn test_negative_override_clamps_to_zero() {
        let payload = build_now_playing_payload(Some(&entry()), false, Some(-5));
        assert_eq!(payload.elapsed_seconds, Some(0));
    }

    #[test]
    fn test_minutes_are_rounded_to_seconds() {
        let mut track = entry();
        track.duration = Some(600);
        track.minutes_ago = Some(2.51);

        let payload = build_now_playing_payload(Some(&track), false, None);
        assert_eq!(payload.elapsed_seconds, Some(151));
    }

    #[test]
    fn test_missing_text_fields_use_placeholders() {
        let track = TrackEntry {
            id: Some("song-1".to_string()),
            ..Default::default()
        };

        let payload = build_now_playing_payload(Some(&track), false, None);
        assert_eq!(payload.title.as_deref(), Some("Unknown Title"));
        assert_eq!(payload.artist.as_deref(), Some("Unknown Artist"));
        assert_eq!(payload.album.as_deref(), Some(""));
    }

    #[test]
    fn test_cover_url_falls_back_to_entry_id() {
        let mut track = entry();
        track.cover_art = None;
        let payload = build_now_playing_payload(Some(&track), false, None);
        assert_eq!(payload.cover_url.as_deref(), Some("/api/cover/song-1"));

        track.id = None;
        let payload = build_now_playing_payload(Some(&track), false, None);
        assert_eq!(payload.cover_url.as_deref(), Some(""));
    }

    #[test]
    fn test_cover_id_is_percent_encoded() {
        let mut track = entry();
        track.cover_art = Some("al 9/x".to_string());
        let payload = build_now_playing_payload(Some(&track), false, None);
        assert_eq!(payload.cover_url.as_deref(), Some("/api/cover/al%209%2Fx"));
    }

    #[test]
    fn test_not_playing_payload_has_exactly_two_keys() {
        let payload = build_now_playing_payload(None, false, None);
        let value = serde_json::to_value(&payload).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(object["isPlaying"], serde_json::json!(false));
        assert!(object["serverTime"].is_f64());
    }

    #[test]
    fn test_playing_payload_uses_contract_keys() {
        let payload = build_now_playing_payload(Some(&entry()), true, None);
        let value = serde_json::to_value(&payload).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "isPlaying",
            "isPaused",
            "title",
            "artist",
            "album",
            "coverUrl",
            "durationSeconds",
            "elapsedSeconds",
            "serverTime",
        ] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert!(!object.contains_key("error"));
        assert_eq!(object["isPaused"], serde_json::json!(true));
    }

    #[test]
    fn test_identical_inputs_differ_only_in_server_time() {
        let track = entry();
        let mut first = build_now_playing_payload(Some(&track), false, Some(30));
        let mut second = build_now_playing_payload(Some(&track), false, Some(30));

        first.server_time = 0.0;
        second.server_time = 0.0;
        assert_eq!(first, second);
    }

    #[test]
    fn test_unreachable_payload_carries_error_note() {
        let payload = NowPlayingPayload::unreachable("Unable to reach Navidrome (NetworkError)");
        let value = serde_json::to_value(&payload).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert_eq!(object["isPlaying"], serde_json::json!(false));
        assert!(object["error"].as_str().unwrap().contains("NetworkError"));
    }
}
