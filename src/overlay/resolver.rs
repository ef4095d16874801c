//! Reconciles the backend's two views of playback state
//!
//! getNowPlaying only reports actively streaming tracks, so reading it alone
//! shows "nothing playing" during a pause. The play queue still points at the
//! current track while paused, so both views are merged into one answer that
//! keeps the overlay visually stable.

use crate::subsonic::{ApiError, PlayQueueCurrent, SubsonicClient, TrackEntry};

/// What the client should be told is currently playing.
#[derive(Debug, Clone, Default)]
pub struct ResolvedPlayback {
    pub entry: Option<TrackEntry>,
    pub is_paused: bool,
    /// Authoritative elapsed seconds from the play queue, when known.
    pub position_seconds: Option<i64>,
}

/// Fetch both backend views and merge them.
///
/// The two calls are independent; neither ordering nor shared state matters.
pub async fn resolve_playback(client: &SubsonicClient) -> Result<ResolvedPlayback, ApiError> {
    let (now_playing, queue) = tokio::join!(
        client.now_playing_entries(),
        client.play_queue_current()
    );
    Ok(reconcile(now_playing?, queue?))
}

/// Merge the now-playing list with the play-queue current entry.
///
/// Pause inference is a heuristic, not backend-confirmed: an actively playing
/// track is reported by both sources, while a paused one typically drops out
/// of now-playing but remains the queue's current pointer. Some servers may
/// behave differently; this is best-effort.
fn reconcile(now_playing: Vec<TrackEntry>, queue: PlayQueueCurrent) -> ResolvedPlayback {
    if let Some(first) = now_playing.first() {
        let is_paused = match queue.entry.as_ref().and_then(|entry| entry.id.as_deref()) {
            Some(queue_id) => !now_playing
                .iter()
                .any(|entry| entry.id.as_deref() == Some(queue_id)),
            None => false,
        };

        return ResolvedPlayback {
            entry: Some(first.clone()),
            is_paused,
            position_seconds: queue.position_seconds,
        };
    }

    if let Some(entry) = queue.entry {
        return ResolvedPlayback {
            entry: Some(entry),
            is_paused: true,
            position_seconds: queue.position_seconds,
        };
    }

    ResolvedPlayback::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> TrackEntry {
        TrackEntry {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_paused_when_only_queue_knows_the_track() {
        let resolved = reconcile(
            Vec::new(),
            PlayQueueCurrent {
                entry: Some(entry("42")),
                position_seconds: Some(95),
            },
        );

        assert_eq!(resolved.entry.unwrap().id.as_deref(), Some("42"));
        assert!(resolved.is_paused);
        assert_eq!(resolved.position_seconds, Some(95));
    }

    #[test]
    fn test_not_paused_when_queue_id_matches_now_playing() {
        let resolved = reconcile(
            vec![entry("42")],
            PlayQueueCurrent {
                entry: Some(entry("42")),
                position_seconds: Some(10),
            },
        );

        assert!(!resolved.is_paused);
        assert_eq!(resolved.entry.unwrap().id.as_deref(), Some("42"));
    }

    #[test]
    fn test_paused_when_queue_points_at_a_different_track() {
        let resolved = reconcile(
            vec![entry("42"), entry("43")],
            PlayQueueCurrent {
                entry: Some(entry("99")),
                position_seconds: None,
            },
        );

        assert!(resolved.is_paused);
        // Displayed entry is still the first now-playing one.
        assert_eq!(resolved.entry.unwrap().id.as_deref(), Some("42"));
    }

    #[test]
    fn test_not_paused_without_queue_state() {
        let resolved = reconcile(vec![entry("42")], PlayQueueCurrent::default());
        assert!(!resolved.is_paused);
        assert!(resolved.position_seconds.is_none());
    }

    #[test]
    fn test_nothing_playing_when_both_sources_are_empty() {
        let resolved = reconcile(Vec::new(), PlayQueueCurrent::default());
        assert!(resolved.entry.is_none());
        assert!(!resolved.is_paused);
    }

    #[test]
    fn test_queue_position_used_while_playing() {
        let resolved = reconcile(
            vec![entry("42")],
            PlayQueueCurrent {
                entry: Some(entry("42")),
                position_seconds: Some(120),
            },
        );
        assert_eq!(resolved.position_seconds, Some(120));
    }

    #[test]
    fn test_queue_entry_without_id_does_not_infer_pause() {
        let resolved = reconcile(
            vec![entry("42")],
            PlayQueueCurrent {
                entry: Some(TrackEntry::default()),
                position_seconds: None,
            },
        );
        assert!(!resolved.is_paused);
    }
}
