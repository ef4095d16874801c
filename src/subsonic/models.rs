//! Subsonic API response models
//!
//! The backend's JSON is loosely typed: `entry` fields arrive as a single
//! object, an array, `null`, or not at all, and several scalar values can be
//! either numbers or strings depending on the server. All of that is
//! normalized here so the rest of the crate sees one canonical shape.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Wrapper for all Subsonic API responses
#[derive(Debug, Clone, Deserialize)]
pub struct SubsonicResponse<T> {
    #[serde(rename = "subsonic-response")]
    pub subsonic_response: SubsonicResponseInner<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubsonicResponseInner<T> {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<SubsonicError>,
}

impl<T> SubsonicResponseInner<T> {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubsonicError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// One track record as reported by the backend.
///
/// Every field may be missing; callers apply the documented defaults instead
/// of failing on partial records.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    #[serde(deserialize_with = "lenient_u32")]
    pub duration: Option<u32>,
    #[serde(rename = "coverArt", deserialize_with = "lenient_string")]
    pub cover_art: Option<String>,
    #[serde(rename = "minutesAgo", deserialize_with = "lenient_f64")]
    pub minutes_ago: Option<f64>,
}

// getNowPlaying response (nested under "nowPlaying")
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NowPlayingData {
    #[serde(rename = "nowPlaying", deserialize_with = "null_default")]
    pub now_playing: EntryList,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EntryList {
    #[serde(deserialize_with = "entry_list")]
    pub entry: Vec<TrackEntry>,
}

// getPlayQueue response (nested under "playQueue")
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlayQueueData {
    #[serde(rename = "playQueue", deserialize_with = "null_default")]
    pub play_queue: PlayQueue,
}

/// The backend's persisted queue state: a declared current-track id, an
/// optional position within it, and the queued entries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlayQueue {
    #[serde(deserialize_with = "lenient_string")]
    pub current: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub position: Option<i64>,
    #[serde(deserialize_with = "entry_list")]
    pub entry: Vec<TrackEntry>,
}

impl PlayQueue {
    /// The entry matching the declared current id if present among the
    /// returned entries, else the first entry, else none.
    pub fn current_entry(&self) -> Option<&TrackEntry> {
        if let Some(current) = self.current.as_deref().filter(|id| !id.is_empty()) {
            if let Some(found) = self
                .entry
                .iter()
                .find(|entry| entry.id.as_deref() == Some(current))
            {
                return Some(found);
            }
        }
        self.entry.first()
    }
}

/// The queue view consumed by the resolver: resolved current entry plus the
/// reported position in seconds (if the backend knows it).
#[derive(Debug, Clone, Default)]
pub struct PlayQueueCurrent {
    pub entry: Option<TrackEntry>,
    pub position_seconds: Option<i64>,
}

/// Accept a string or a number, normalizing to a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Accept a number or a numeric string, defaulting anything else to `None`.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(|v| v as u32),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Treat an explicit `null` like a missing field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Normalize the list-or-single-object `entry` quirk to a list, discarding
/// anything that is not a well-formed record.
fn entry_list<'de, D>(deserializer: D) -> Result<Vec<TrackEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(entries_from_value(Value::deserialize(deserializer)?))
}

fn entries_from_value(value: Value) -> Vec<TrackEntry> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter(|item| item.is_object())
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        value @ Value::Object(_) => serde_json::from_value(value).into_iter().collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now_playing(body: Value) -> Vec<TrackEntry> {
        let parsed: SubsonicResponse<NowPlayingData> = serde_json::from_value(body).unwrap();
        parsed
            .subsonic_response
            .data
            .map(|d| d.now_playing.entry)
            .unwrap_or_default()
    }

    #[test]
    fn test_single_object_entry_normalizes_to_one_element() {
        let entries = now_playing(json!({
            "subsonic-response": {
                "status": "ok",
                "version": "1.16.1",
                "nowPlaying": {
                    "entry": {"id": "42", "title": "Aja", "duration": 478}
                }
            }
        }));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id.as_deref(), Some("42"));
        assert_eq!(entries[0].duration, Some(478));
    }

    #[test]
    fn test_entry_list_passes_through() {
        let entries = now_playing(json!({
            "subsonic-response": {
                "status": "ok",
                "nowPlaying": {
                    "entry": [{"id": "1"}, {"id": "2"}]
                }
            }
        }));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_null_and_absent_entries_normalize_to_empty() {
        let entries = now_playing(json!({
            "subsonic-response": {
                "status": "ok",
                "nowPlaying": {"entry": null}
            }
        }));
        assert!(entries.is_empty());

        let entries = now_playing(json!({
            "subsonic-response": {"status": "ok", "nowPlaying": {}}
        }));
        assert!(entries.is_empty());

        let entries = now_playing(json!({
            "subsonic-response": {"status": "ok"}
        }));
        assert!(entries.is_empty());
    }

    #[test]
    fn test_malformed_list_items_are_discarded() {
        let entries = now_playing(json!({
            "subsonic-response": {
                "status": "ok",
                "nowPlaying": {
                    "entry": [{"id": "1"}, 7, "junk", null, {"id": "2"}]
                }
            }
        }));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].id.as_deref(), Some("2"));
    }

    #[test]
    fn test_numeric_id_and_duration_are_accepted() {
        let entries = now_playing(json!({
            "subsonic-response": {
                "status": "ok",
                "nowPlaying": {
                    "entry": {"id": 42, "duration": "188", "minutesAgo": "2"}
                }
            }
        }));
        assert_eq!(entries[0].id.as_deref(), Some("42"));
        assert_eq!(entries[0].duration, Some(188));
        assert_eq!(entries[0].minutes_ago, Some(2.0));
    }

    fn play_queue(body: Value) -> PlayQueue {
        let parsed: SubsonicResponse<PlayQueueData> = serde_json::from_value(body).unwrap();
        parsed
            .subsonic_response
            .data
            .map(|d| d.play_queue)
            .unwrap_or_default()
    }

    #[test]
    fn test_play_queue_current_prefers_declared_id() {
        let queue = play_queue(json!({
            "subsonic-response": {
                "status": "ok",
                "playQueue": {
                    "current": 2,
                    "position": 42,
                    "entry": [{"id": "1", "title": "First"}, {"id": "2", "title": "Second"}]
                }
            }
        }));
        assert_eq!(
            queue.current_entry().unwrap().title.as_deref(),
            Some("Second")
        );
        assert_eq!(queue.position, Some(42));
    }

    #[test]
    fn test_play_queue_falls_back_to_first_entry() {
        let queue = play_queue(json!({
            "subsonic-response": {
                "status": "ok",
                "playQueue": {
                    "current": "missing",
                    "entry": [{"id": "1"}, {"id": "2"}]
                }
            }
        }));
        assert_eq!(queue.current_entry().unwrap().id.as_deref(), Some("1"));
    }

    #[test]
    fn test_play_queue_position_tolerates_garbage() {
        let queue = play_queue(json!({
            "subsonic-response": {
                "status": "ok",
                "playQueue": {"position": "soon", "entry": [{"id": "1"}]}
            }
        }));
        assert_eq!(queue.position, None);

        let queue = play_queue(json!({
            "subsonic-response": {
                "status": "ok",
                "playQueue": {"position": "125", "entry": [{"id": "1"}]}
            }
        }));
        assert_eq!(queue.position, Some(125));
    }

    #[test]
    fn test_play_queue_null_normalizes_to_default() {
        let queue = play_queue(json!({
            "subsonic-response": {"status": "ok", "playQueue": null}
        }));
        assert!(queue.current_entry().is_none());
        assert_eq!(queue.position, None);
    }
}
