use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

const DEFAULT_CLIP_TTL: Duration = Duration::from_secs(180);

struct ActiveClip {
    idea_id: String,
    generation: u64,
    stop: Option<oneshot::Sender<()>>,
    // None while the clip is still being synthesized
    expires_at: Option<Instant>,
}

type Sessions = Arc<Mutex<HashMap<String, ActiveClip>>>;

/// Lock the session map, dropping finished clips whose lifetime ran out
fn lock_sessions(sessions: &Sessions) -> MutexGuard<'_, HashMap<String, ActiveClip>> {
    let mut guard = sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let now = Instant::now();
    guard.retain(|_, clip| clip.expires_at.map_or(true, |deadline| deadline > now));
    guard
}

/// Tracks the one narration clip each session is allowed to play
///
/// Acquiring a clip for a session stops and releases whatever clip that
/// session held before, in one step under the lock. A kept clip stays
/// registered for `clip_ttl` and is then forgotten.
#[derive(Clone)]
pub struct PlaybackContext {
    sessions: Sessions,
    generations: Arc<AtomicU64>,
    clip_ttl: Duration,
}

impl Default for PlaybackContext {
    fn default() -> Self {
        Self::with_clip_ttl(DEFAULT_CLIP_TTL)
    }
}

impl PlaybackContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip_ttl(clip_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            generations: Arc::default(),
            clip_ttl,
        }
    }

    /// Take the playback slot of `session_id` for `idea_id`
    pub fn acquire(&self, session_id: &str, idea_id: &str) -> PlaybackHandle {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        let (stop_tx, stop_rx) = oneshot::channel();

        let previous = lock_sessions(&self.sessions).insert(
            session_id.to_string(),
            ActiveClip {
                idea_id: idea_id.to_string(),
                generation,
                stop: Some(stop_tx),
                expires_at: None,
            },
        );

        if let Some(mut previous) = previous {
            tracing::debug!(
                "Session {} switched narration from {} to {}",
                session_id,
                previous.idea_id,
                idea_id
            );
            if let Some(stop) = previous.stop.take() {
                let _ = stop.send(());
            }
        }

        PlaybackHandle {
            sessions: Arc::clone(&self.sessions),
            session_id: session_id.to_string(),
            generation,
            clip_ttl: self.clip_ttl,
            stopped: stop_rx,
            detached: false,
        }
    }

    /// Stop the active clip of a session, returning the idea it was narrating
    pub fn stop(&self, session_id: &str) -> Option<String> {
        let mut removed = lock_sessions(&self.sessions).remove(session_id)?;
        if let Some(stop) = removed.stop.take() {
            let _ = stop.send(());
        }
        Some(removed.idea_id)
    }

    /// Idea currently narrated for a session
    pub fn current(&self, session_id: &str) -> Option<String> {
        lock_sessions(&self.sessions)
            .get(session_id)
            .map(|clip| clip.idea_id.clone())
    }

    pub fn active_sessions(&self) -> usize {
        lock_sessions(&self.sessions).len()
    }
}

/// Single-owner claim on a session's playback slot
///
/// Dropping the handle releases the slot unless it was already taken over
/// or the handle was kept with [`PlaybackHandle::keep`].
pub struct PlaybackHandle {
    sessions: Sessions,
    session_id: String,
    generation: u64,
    clip_ttl: Duration,
    stopped: oneshot::Receiver<()>,
    detached: bool,
}

impl PlaybackHandle {
    /// Whether this handle still owns the slot
    pub fn is_current(&self) -> bool {
        lock_sessions(&self.sessions)
            .get(&self.session_id)
            .map(|clip| clip.generation == self.generation)
            .unwrap_or(false)
    }

    /// Resolves once another clip takes the slot or the session is stopped
    pub async fn stopped(&mut self) {
        let _ = (&mut self.stopped).await;
    }

    /// Leave the clip registered as playing after the handle goes away
    ///
    /// Returns false, and keeps nothing, when another clip already took
    /// the slot.
    pub fn keep(mut self) -> bool {
        let kept = match lock_sessions(&self.sessions).get_mut(&self.session_id) {
            Some(clip) if clip.generation == self.generation => {
                clip.expires_at = Some(Instant::now() + self.clip_ttl);
                true
            }
            _ => false,
        };
        self.detached = kept;
        kept
    }
}

impl Drop for PlaybackHandle {
    fn drop(&mut self) {
        if self.detached {
            return;
        }
        let mut sessions = lock_sessions(&self.sessions);
        let owns_slot = sessions
            .get(&self.session_id)
            .map(|clip| clip.generation == self.generation)
            .unwrap_or(false);
        if owns_slot {
            sessions.remove(&self.session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_acquire_stops_previous_clip() {
        let playback = PlaybackContext::new();

        let mut first = playback.acquire("session-1", "idea-a");
        let second = playback.acquire("session-1", "idea-b");

        tokio::time::timeout(Duration::from_secs(1), first.stopped())
            .await
            .expect("first clip should be stopped");

        assert!(!first.is_current());
        assert!(second.is_current());
        assert_eq!(playback.current("session-1").as_deref(), Some("idea-b"));
    }

    #[tokio::test]
    async fn test_superseded_drop_keeps_new_owner() {
        let playback = PlaybackContext::new();

        let first = playback.acquire("session-1", "idea-a");
        let _second = playback.acquire("session-1", "idea-b");
        drop(first);

        assert_eq!(playback.current("session-1").as_deref(), Some("idea-b"));
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let playback = PlaybackContext::new();

        let a = playback.acquire("session-1", "idea-a");
        let b = playback.acquire("session-2", "idea-b");

        assert!(a.is_current());
        assert!(b.is_current());
        assert_eq!(playback.active_sessions(), 2);
    }

    #[tokio::test]
    async fn test_keep_and_stop() {
        let playback = PlaybackContext::new();

        assert!(playback.acquire("session-1", "idea-a").keep());
        assert_eq!(playback.current("session-1").as_deref(), Some("idea-a"));

        assert_eq!(playback.stop("session-1").as_deref(), Some("idea-a"));
        assert!(playback.current("session-1").is_none());
        assert!(playback.stop("session-1").is_none());
    }

    #[tokio::test]
    async fn test_drop_releases_slot() {
        let playback = PlaybackContext::new();

        {
            let _handle = playback.acquire("session-1", "idea-a");
            assert_eq!(playback.active_sessions(), 1);
        }

        assert_eq!(playback.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_superseded_handle_is_not_kept() {
        let playback = PlaybackContext::new();

        let first = playback.acquire("session-1", "idea-a");
        let _second = playback.acquire("session-1", "idea-b");

        assert!(!first.keep());
        assert_eq!(playback.current("session-1").as_deref(), Some("idea-b"));
    }

    #[tokio::test]
    async fn test_kept_clips_expire() {
        let playback = PlaybackContext::with_clip_ttl(Duration::from_millis(30));

        for i in 0..100 {
            assert!(playback.acquire(&format!("session-{}", i), "idea-a").keep());
        }
        assert_eq!(playback.active_sessions(), 100);

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(playback.active_sessions(), 0);
        assert!(playback.current("session-0").is_none());
        assert!(playback.stop("session-0").is_none());
    }

    #[tokio::test]
    async fn test_clip_in_flight_does_not_expire() {
        let playback = PlaybackContext::with_clip_ttl(Duration::from_millis(10));

        let handle = playback.acquire("session-1", "idea-a");
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(handle.is_current());
        assert_eq!(playback.active_sessions(), 1);
    }
}
