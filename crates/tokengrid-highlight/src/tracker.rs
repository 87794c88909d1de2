//! Highlight state machine per (instrument, field).
//!
//! Each key is either Idle (no entry) or Highlighted (direction plus
//! deadline). A differing update re-enters Highlighted with a fresh
//! direction and deadline, replacing the old entry outright — there
//! is exactly one deadline per key, so a superseding update can
//! never race a stale expiry.

use dashmap::DashMap;
use rust_decimal::Decimal;
use std::time::Duration;
use tokengrid_core::InstrumentId;
use tokengrid_store::StoreSnapshot;
// tokio's Instant so deadlines follow the test clock under
// `start_paused` runtimes.
use tokio::time::Instant;

/// Reference highlight duration: 500 ms.
pub const DEFAULT_HIGHLIGHT_DURATION_MS: u64 = 500;

/// Field whose generation-to-generation delta is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedField {
    Price,
    Change24h,
}

/// Classification of a value transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increase,
    Decrease,
}

/// Highlight tracker configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightConfig {
    /// How long a highlight stays visible after the triggering update.
    pub duration: Duration,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(DEFAULT_HIGHLIGHT_DURATION_MS),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct HighlightEntry {
    direction: Direction,
    deadline: Instant,
}

/// Tracks bounded-duration highlights per (instrument, field).
///
/// Pure reader over store snapshots; never mutates instrument state.
pub struct HighlightTracker {
    entries: DashMap<(InstrumentId, TrackedField), HighlightEntry>,
    duration: Duration,
}

impl HighlightTracker {
    pub fn new(config: HighlightConfig) -> Self {
        Self {
            entries: DashMap::new(),
            duration: config.duration,
        }
    }

    /// Highlight duration in effect.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Observe one field value against its previous-generation
    /// counterpart.
    ///
    /// No previous value (first observation) or an equal value
    /// produces no highlight and leaves any in-flight highlight
    /// untouched. A differing value enters Highlighted with a fresh
    /// deadline, superseding the prior entry.
    pub fn observe(
        &self,
        id: &InstrumentId,
        field: TrackedField,
        current: Decimal,
        previous: Option<Decimal>,
        now: Instant,
    ) -> Option<Direction> {
        let previous = previous?;
        if current == previous {
            return None;
        }

        let direction = if current > previous {
            Direction::Increase
        } else {
            Direction::Decrease
        };
        self.entries.insert(
            (id.clone(), field),
            HighlightEntry {
                direction,
                deadline: now + self.duration,
            },
        );
        Some(direction)
    }

    /// Observe both tracked fields for every instrument in a snapshot.
    pub fn observe_snapshot(&self, snapshot: &StoreSnapshot, now: Instant) {
        for instrument in snapshot.current() {
            let previous = snapshot.previous_by_id(&instrument.id);
            self.observe(
                &instrument.id,
                TrackedField::Price,
                instrument.price.inner(),
                previous.map(|p| p.price.inner()),
                now,
            );
            self.observe(
                &instrument.id,
                TrackedField::Change24h,
                instrument.change_24h,
                previous.map(|p| p.change_24h),
                now,
            );
        }
    }

    /// Current classification for a key, or `None` once the deadline
    /// has been reached. Expiry needs no further updates to take
    /// effect.
    pub fn direction(&self, id: &InstrumentId, field: TrackedField, now: Instant) -> Option<Direction> {
        self.entries
            .get(&(id.clone(), field))
            .filter(|entry| now < entry.deadline)
            .map(|entry| entry.direction)
    }

    /// Drop entries whose deadline has passed. Returns how many were
    /// removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now < entry.deadline);
        before - self.entries.len()
    }

    /// Number of live (possibly expired, not yet swept) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HighlightTracker {
    fn default() -> Self {
        Self::new(HighlightConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tracker() -> HighlightTracker {
        HighlightTracker::new(HighlightConfig {
            duration: Duration::from_millis(500),
        })
    }

    fn id() -> InstrumentId {
        InstrumentId::from("1")
    }

    #[test]
    fn test_first_observation_produces_no_highlight() {
        let tracker = tracker();
        let now = Instant::now();

        let direction = tracker.observe(&id(), TrackedField::Price, dec!(10), None, now);
        assert_eq!(direction, None);
        assert_eq!(tracker.direction(&id(), TrackedField::Price, now), None);
    }

    #[test]
    fn test_equal_value_suppresses_highlight() {
        let tracker = tracker();
        let now = Instant::now();

        let direction =
            tracker.observe(&id(), TrackedField::Price, dec!(10), Some(dec!(10)), now);
        assert_eq!(direction, None);
        assert_eq!(tracker.direction(&id(), TrackedField::Price, now), None);
    }

    #[test]
    fn test_classification_increase_and_decrease() {
        let tracker = tracker();
        let now = Instant::now();

        let up = tracker.observe(&id(), TrackedField::Price, dec!(12), Some(dec!(10)), now);
        assert_eq!(up, Some(Direction::Increase));

        let down =
            tracker.observe(&id(), TrackedField::Change24h, dec!(-0.1), Some(dec!(0.2)), now);
        assert_eq!(down, Some(Direction::Decrease));

        assert_eq!(
            tracker.direction(&id(), TrackedField::Price, now),
            Some(Direction::Increase)
        );
        assert_eq!(
            tracker.direction(&id(), TrackedField::Change24h, now),
            Some(Direction::Decrease)
        );
    }

    #[test]
    fn test_highlight_expires_without_further_updates() {
        let tracker = tracker();
        let now = Instant::now();

        tracker.observe(&id(), TrackedField::Price, dec!(12), Some(dec!(10)), now);

        let just_before = now + Duration::from_millis(499);
        assert_eq!(
            tracker.direction(&id(), TrackedField::Price, just_before),
            Some(Direction::Increase)
        );

        let at_deadline = now + Duration::from_millis(500);
        assert_eq!(tracker.direction(&id(), TrackedField::Price, at_deadline), None);

        let after = now + Duration::from_millis(501);
        assert_eq!(tracker.direction(&id(), TrackedField::Price, after), None);
    }

    #[test]
    fn test_superseding_update_restarts_with_fresh_classification() {
        let tracker = tracker();
        let t0 = Instant::now();

        tracker.observe(&id(), TrackedField::Price, dec!(12), Some(dec!(10)), t0);

        // 300ms later a decrease arrives; it overrides, not queues.
        let t1 = t0 + Duration::from_millis(300);
        tracker.observe(&id(), TrackedField::Price, dec!(9), Some(dec!(12)), t1);

        // Past the original deadline the fresh highlight still holds.
        let t2 = t0 + Duration::from_millis(600);
        assert_eq!(
            tracker.direction(&id(), TrackedField::Price, t2),
            Some(Direction::Decrease)
        );

        // And it expires on its own schedule.
        let t3 = t1 + Duration::from_millis(500);
        assert_eq!(tracker.direction(&id(), TrackedField::Price, t3), None);
    }

    #[test]
    fn test_equal_update_does_not_cancel_running_highlight() {
        let tracker = tracker();
        let t0 = Instant::now();

        tracker.observe(&id(), TrackedField::Price, dec!(12), Some(dec!(10)), t0);

        // Idempotent re-application: same value on both generations.
        let t1 = t0 + Duration::from_millis(100);
        tracker.observe(&id(), TrackedField::Price, dec!(12), Some(dec!(12)), t1);

        assert_eq!(
            tracker.direction(&id(), TrackedField::Price, t1),
            Some(Direction::Increase)
        );
    }

    #[test]
    fn test_fields_are_tracked_independently() {
        let tracker = tracker();
        let now = Instant::now();

        tracker.observe(&id(), TrackedField::Price, dec!(12), Some(dec!(10)), now);
        assert_eq!(tracker.direction(&id(), TrackedField::Change24h, now), None);
    }

    #[test]
    fn test_sweep_drops_only_expired_entries() {
        let tracker = tracker();
        let t0 = Instant::now();

        tracker.observe(&id(), TrackedField::Price, dec!(12), Some(dec!(10)), t0);
        let t1 = t0 + Duration::from_millis(400);
        tracker.observe(&id(), TrackedField::Change24h, dec!(0.2), Some(dec!(0.1)), t1);
        assert_eq!(tracker.len(), 2);

        let removed = tracker.sweep(t0 + Duration::from_millis(600));
        assert_eq!(removed, 1);
        assert_eq!(tracker.len(), 1);
        assert_eq!(
            tracker.direction(&id(), TrackedField::Change24h, t0 + Duration::from_millis(600)),
            Some(Direction::Increase)
        );
    }
}
