//! Generation-based instrument store.
//!
//! The store keeps two full generations: `current` and `previous`
//! (the generation immediately before the last applied batch). A
//! batch swaps `previous` exactly once, so delta consumers always
//! compare whole tick N against whole tick N-1, never a mix of
//! partially-updated instruments.
//!
//! Instruments are value-immutable: every merge produces a new
//! `Arc<Instrument>` for the affected id. Readers holding a
//! snapshot never observe it change.

use crate::error::{StoreError, StoreResult};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokengrid_core::{Instrument, InstrumentId, Price, HISTORY_LEN};
use tokio::sync::watch;
use tracing::debug;

/// One full generation, in stable seed order.
type Generation = Arc<Vec<Arc<Instrument>>>;

/// Partial update for a single instrument. Fields left as `None`
/// are carried over unchanged by the merge.
#[derive(Debug, Clone)]
pub struct InstrumentUpdate {
    pub id: InstrumentId,
    pub price: Option<Price>,
    pub change_24h: Option<Decimal>,
}

impl InstrumentUpdate {
    pub fn new(id: impl Into<InstrumentId>, price: Price, change_24h: Decimal) -> Self {
        Self {
            id: id.into(),
            price: Some(price),
            change_24h: Some(change_24h),
        }
    }
}

/// Outcome of one applied batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedBatch {
    /// Updates merged into the new generation.
    pub applied: usize,
    /// Updates dropped because their id is unknown.
    pub skipped: usize,
    /// Store version after the batch (unchanged if nothing applied).
    pub version: u64,
}

/// Immutable view of both generations at one point in logical time.
///
/// Both generations are taken under a single lock, so the pair is
/// always mutually consistent: `previous` is exactly the generation
/// `current` replaced.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    current: Generation,
    previous: Generation,
    index: Arc<HashMap<InstrumentId, usize>>,
    version: u64,
}

impl StoreSnapshot {
    /// Current generation, in stable seed order.
    pub fn current(&self) -> &[Arc<Instrument>] {
        &self.current
    }

    /// Previous generation, in stable seed order.
    pub fn previous(&self) -> &[Arc<Instrument>] {
        &self.previous
    }

    /// Store version this snapshot was taken at.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn current_by_id(&self, id: &InstrumentId) -> Option<&Arc<Instrument>> {
        self.index.get(id).map(|&idx| &self.current[idx])
    }

    pub fn previous_by_id(&self, id: &InstrumentId) -> Option<&Arc<Instrument>> {
        self.index.get(id).map(|&idx| &self.previous[idx])
    }
}

struct Generations {
    current: Generation,
    previous: Generation,
    version: u64,
}

/// Authoritative mapping of instrument id to current snapshot.
///
/// The instrument set is fixed at construction; updates referencing
/// unknown ids are skipped silently.
pub struct InstrumentStore {
    index: Arc<HashMap<InstrumentId, usize>>,
    generations: RwLock<Generations>,
    version_tx: watch::Sender<u64>,
}

impl InstrumentStore {
    /// Build a store from the session's instrument set.
    ///
    /// `previous` starts out equal to `current`, so first-tick deltas
    /// compare against the seed values.
    pub fn new(seed: Vec<Instrument>) -> StoreResult<Self> {
        if seed.is_empty() {
            return Err(StoreError::EmptySeed);
        }

        let mut index = HashMap::with_capacity(seed.len());
        let mut instruments = Vec::with_capacity(seed.len());
        for instrument in seed {
            if index.insert(instrument.id.clone(), instruments.len()).is_some() {
                return Err(StoreError::DuplicateInstrument(instrument.id));
            }
            instruments.push(Arc::new(instrument));
        }

        let current: Generation = Arc::new(instruments);
        let (version_tx, _) = watch::channel(0);

        Ok(Self {
            index: Arc::new(index),
            generations: RwLock::new(Generations {
                previous: current.clone(),
                current,
                version: 0,
            }),
            version_tx,
        })
    }

    /// Number of tracked instruments.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Apply one batch of updates atomically.
    ///
    /// All updates in the batch are merged against the same pre-batch
    /// generation; `previous` is swapped to that generation exactly
    /// once. Readers observe either the whole batch or none of it.
    ///
    /// Unknown ids are skipped with a debug log. A batch that applies
    /// nothing leaves both generations untouched. A post-merge
    /// invariant violation aborts the whole batch and surfaces as a
    /// fatal `StoreError`.
    pub fn apply_batch(&self, updates: &[InstrumentUpdate]) -> StoreResult<AppliedBatch> {
        let mut generations = self.generations.write();

        let mut next: Vec<Arc<Instrument>> = generations.current.as_ref().clone();
        let mut applied = 0;
        let mut skipped = 0;

        for update in updates {
            let Some(&idx) = self.index.get(&update.id) else {
                debug!(id = %update.id, "Dropping update for unknown instrument");
                skipped += 1;
                continue;
            };

            let merged = next[idx].with_update(update.price, update.change_24h);
            Self::check_invariants(&merged)?;
            next[idx] = Arc::new(merged);
            applied += 1;
        }

        if applied == 0 {
            return Ok(AppliedBatch {
                applied,
                skipped,
                version: generations.version,
            });
        }

        generations.previous = std::mem::replace(&mut generations.current, Arc::new(next));
        generations.version += 1;
        let version = generations.version;
        drop(generations);

        // Receivers may be gone; that only means nobody is listening.
        let _ = self.version_tx.send(version);

        Ok(AppliedBatch {
            applied,
            skipped,
            version,
        })
    }

    /// Take an immutable snapshot of both generations.
    pub fn snapshot(&self) -> StoreSnapshot {
        let generations = self.generations.read();
        StoreSnapshot {
            current: generations.current.clone(),
            previous: generations.previous.clone(),
            index: self.index.clone(),
            version: generations.version,
        }
    }

    /// Current version, bumped once per applied batch.
    pub fn version(&self) -> u64 {
        self.generations.read().version
    }

    /// Subscribe to version bumps for reactive recomputation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version_tx.subscribe()
    }

    fn check_invariants(instrument: &Instrument) -> StoreResult<()> {
        if !instrument.price.is_positive() {
            return Err(StoreError::InvariantViolation(format!(
                "non-positive price {} for instrument {}",
                instrument.price, instrument.id
            )));
        }
        if instrument.history.len() != HISTORY_LEN {
            return Err(StoreError::InvariantViolation(format!(
                "history length {} for instrument {}",
                instrument.history.len(),
                instrument.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tokengrid_core::{Amount, PriceHistory, Stage};

    fn instrument(id: &str, price: Decimal, stage: Stage) -> Instrument {
        Instrument {
            id: InstrumentId::from(id),
            name: format!("Token{id}"),
            symbol: format!("T{id}"),
            icon: "🔷".to_string(),
            price: Price::new(price),
            change_24h: Decimal::ZERO,
            market_cap: Amount::new(dec!(1000000)),
            volume_24h: Amount::new(dec!(50000)),
            liquidity: Amount::new(dec!(20000)),
            holders: 100,
            transactions_24h: 10,
            stage,
            history: PriceHistory::filled(Price::new(price)),
        }
    }

    fn seed() -> Vec<Instrument> {
        vec![
            instrument("1", dec!(10), Stage::NewPairs),
            instrument("2", dec!(20), Stage::Migrated),
        ]
    }

    #[test]
    fn test_new_rejects_duplicates_and_empty() {
        let dup = vec![
            instrument("1", dec!(1), Stage::NewPairs),
            instrument("1", dec!(2), Stage::Migrated),
        ];
        assert!(matches!(
            InstrumentStore::new(dup),
            Err(StoreError::DuplicateInstrument(_))
        ));
        assert!(matches!(
            InstrumentStore::new(Vec::new()),
            Err(StoreError::EmptySeed)
        ));
    }

    #[test]
    fn test_previous_starts_equal_to_current() {
        let store = InstrumentStore::new(seed()).unwrap();
        let snap = store.snapshot();
        assert_eq!(snap.current().len(), 2);
        assert_eq!(snap.previous().len(), 2);
        assert_eq!(
            snap.current_by_id(&"1".into()).unwrap().price,
            snap.previous_by_id(&"1".into()).unwrap().price
        );
    }

    #[test]
    fn test_batch_applies_all_updates_against_same_previous() {
        let store = InstrumentStore::new(seed()).unwrap();

        let batch = vec![
            InstrumentUpdate::new("1", Price::new(dec!(12)), dec!(0.2)),
            InstrumentUpdate::new("2", Price::new(dec!(18)), dec!(-0.1)),
        ];
        let outcome = store.apply_batch(&batch).unwrap();
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.version, 1);

        let snap = store.snapshot();
        // Both updates visible, or this read would have seen neither.
        assert_eq!(
            snap.current_by_id(&"1".into()).unwrap().price,
            Price::new(dec!(12))
        );
        assert_eq!(
            snap.current_by_id(&"2".into()).unwrap().price,
            Price::new(dec!(18))
        );
        // Previous holds the whole pre-batch generation.
        assert_eq!(
            snap.previous_by_id(&"1".into()).unwrap().price,
            Price::new(dec!(10))
        );
        assert_eq!(
            snap.previous_by_id(&"2".into()).unwrap().price,
            Price::new(dec!(20))
        );
    }

    #[test]
    fn test_previous_swaps_once_per_batch_not_per_update() {
        let store = InstrumentStore::new(seed()).unwrap();

        store
            .apply_batch(&[InstrumentUpdate::new("1", Price::new(dec!(11)), dec!(0))])
            .unwrap();
        store
            .apply_batch(&[InstrumentUpdate::new("1", Price::new(dec!(12)), dec!(0))])
            .unwrap();

        let snap = store.snapshot();
        assert_eq!(
            snap.previous_by_id(&"1".into()).unwrap().price,
            Price::new(dec!(11))
        );
        // Instrument 2 was not in either batch, yet its previous entry
        // advanced with the generation swap.
        assert_eq!(
            snap.previous_by_id(&"2".into()).unwrap().price,
            Price::new(dec!(20))
        );
    }

    #[test]
    fn test_unknown_id_is_skipped_silently() {
        let store = InstrumentStore::new(seed()).unwrap();

        let batch = vec![
            InstrumentUpdate::new("1", Price::new(dec!(15)), dec!(0)),
            InstrumentUpdate::new("missing", Price::new(dec!(99)), dec!(0)),
        ];
        let outcome = store.apply_batch(&batch).unwrap();
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.skipped, 1);

        let snap = store.snapshot();
        assert_eq!(snap.len(), 2);
        assert!(snap.current_by_id(&"missing".into()).is_none());
    }

    #[test]
    fn test_all_unknown_batch_does_not_advance_generations() {
        let store = InstrumentStore::new(seed()).unwrap();
        store
            .apply_batch(&[InstrumentUpdate::new("1", Price::new(dec!(11)), dec!(0))])
            .unwrap();

        let before = store.snapshot();
        let outcome = store
            .apply_batch(&[InstrumentUpdate::new("ghost", Price::new(dec!(5)), dec!(0))])
            .unwrap();
        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.version, before.version());

        let after = store.snapshot();
        assert_eq!(after.version(), before.version());
        assert_eq!(
            after.previous_by_id(&"1".into()).unwrap().price,
            before.previous_by_id(&"1".into()).unwrap().price
        );
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let store = InstrumentStore::new(seed()).unwrap();
        let outcome = store.apply_batch(&[]).unwrap();
        assert_eq!(outcome.applied, 0);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_price_floor_invariant() {
        let store = InstrumentStore::new(seed()).unwrap();
        store
            .apply_batch(&[InstrumentUpdate::new("1", Price::new(dec!(-50)), dec!(0))])
            .unwrap();

        let snap = store.snapshot();
        let inst = snap.current_by_id(&"1".into()).unwrap();
        assert_eq!(inst.price, Price::FLOOR);
        assert!(inst.price.is_positive());
    }

    #[test]
    fn test_history_window_slides() {
        let store = InstrumentStore::new(seed()).unwrap();
        for i in 0..10 {
            store
                .apply_batch(&[InstrumentUpdate::new(
                    "1",
                    Price::new(Decimal::from(100 + i)),
                    dec!(0),
                )])
                .unwrap();
        }

        let snap = store.snapshot();
        let inst = snap.current_by_id(&"1".into()).unwrap();
        assert_eq!(inst.history.len(), HISTORY_LEN);
        assert_eq!(inst.history.latest(), Price::new(dec!(109)));
        assert_eq!(inst.history.oldest(), Price::new(dec!(103)));
    }

    #[test]
    fn test_snapshot_is_immutable_after_return() {
        let store = InstrumentStore::new(seed()).unwrap();
        let snap = store.snapshot();
        let price_before = snap.current_by_id(&"1".into()).unwrap().price;

        store
            .apply_batch(&[InstrumentUpdate::new("1", Price::new(dec!(77)), dec!(0))])
            .unwrap();

        assert_eq!(snap.current_by_id(&"1".into()).unwrap().price, price_before);
        assert_eq!(snap.version(), 0);
    }

    #[test]
    fn test_partial_update_carries_fields_over() {
        let store = InstrumentStore::new(seed()).unwrap();
        store
            .apply_batch(&[InstrumentUpdate {
                id: "1".into(),
                price: None,
                change_24h: Some(dec!(0.42)),
            }])
            .unwrap();

        let snap = store.snapshot();
        let inst = snap.current_by_id(&"1".into()).unwrap();
        assert_eq!(inst.price, Price::new(dec!(10)));
        assert_eq!(inst.change_24h, dec!(0.42));
        // No price in the update, so the window did not slide.
        assert_eq!(inst.history.latest(), Price::new(dec!(10)));
    }

    #[tokio::test]
    async fn test_subscribe_sees_version_bumps() {
        let store = InstrumentStore::new(seed()).unwrap();
        let mut rx = store.subscribe();
        assert_eq!(*rx.borrow(), 0);

        store
            .apply_batch(&[InstrumentUpdate::new("1", Price::new(dec!(11)), dec!(0))])
            .unwrap();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 1);
    }
}
