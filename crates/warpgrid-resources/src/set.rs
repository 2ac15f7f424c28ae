//! A resource family: the ordered slots of one named resource on a host.
//!
//! Selection is a single scan shared by the score-only and committing
//! paths, so a commit that follows a score on unchanged state picks the
//! same slot the score was computed for.

use tracing::{debug, warn};

use crate::error::{ResourceSetError, ResourceSetResult};
use crate::request::TaskRequest;
use crate::result::AllocationResult;
use crate::slot::Slot;

#[derive(Debug, Clone)]
pub struct ResourceSet {
    name: String,
    slots: Vec<Slot>,
}

impl ResourceSet {
    /// Create `slot_count` free slots, each holding up to
    /// `sub_resources` units once bound.
    ///
    /// `slot_count` must be at least 1; host config validation enforces
    /// this before any set is built.
    pub fn new(name: impl Into<String>, slot_count: usize, sub_resources: u32) -> Self {
        debug_assert!(slot_count >= 1, "resource set needs at least one slot");
        let name = name.into();
        let slots = (0..slot_count)
            .map(|i| Slot::new(i, &name, sub_resources))
            .collect();
        Self { name, slots }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Fitness of the best slot for `request`, `0.0` if none fits.
    ///
    /// Never mutates; safe to call repeatedly while comparing hosts.
    pub fn fitness<R: TaskRequest + ?Sized>(&self, request: &R) -> f64 {
        self.score(request).fitness
    }

    /// Best-fit selection without committing.
    pub fn score<R: TaskRequest + ?Sized>(&self, request: &R) -> AllocationResult {
        match self.best_slot(request) {
            Some((i, fitness)) => {
                let slot = &self.slots[i];
                AllocationResult::chosen(i, slot.attribute_name(), slot.bound_name().cloned(), fitness)
            }
            None => AllocationResult::none(),
        }
    }

    /// Commit `request` to the best-fitting slot.
    ///
    /// Fails with [`ResourceSetError::NoAvailableSlot`] when no slot scores
    /// above zero. Callers are expected to have checked
    /// [`fitness`](Self::fitness) first.
    pub fn consume<R: TaskRequest + ?Sized>(&mut self, request: &R) -> ResourceSetResult<AllocationResult> {
        self.select_best(request, true)
    }

    /// Shared scan for [`score`](Self::score) and [`consume`](Self::consume).
    pub fn select_best<R: TaskRequest + ?Sized>(
        &mut self,
        request: &R,
        commit: bool,
    ) -> ResourceSetResult<AllocationResult> {
        if !commit {
            return Ok(self.score(request));
        }

        let Some((i, fitness)) = self.best_slot(request) else {
            warn!(
                resource_set = %self.name,
                consumer = request.id(),
                "commit requested with no available slot"
            );
            return Err(ResourceSetError::NoAvailableSlot {
                attribute: self.name.clone(),
                consumer: request.id().to_string(),
            });
        };

        let slot = &mut self.slots[i];
        slot.consume(request)?;

        debug!(
            resource_set = %self.name,
            slot = i,
            fitness,
            consumer = request.id(),
            "assigned slot"
        );

        Ok(AllocationResult::chosen(
            i,
            slot.attribute_name(),
            slot.bound_name().cloned(),
            fitness,
        ))
    }

    /// Release `request`'s consumer from whichever slot holds it.
    ///
    /// Returns `false` when no slot held it, which makes repeated releases
    /// a no-op.
    pub fn release<R: TaskRequest + ?Sized>(&mut self, request: &R) -> bool {
        let released = self.slots.iter_mut().any(|slot| slot.release(request));
        if released {
            debug!(resource_set = %self.name, consumer = request.id(), "released");
        }
        released
    }

    /// Reported per-slot sub-resource capacity: the configured capacity
    /// minus one.
    ///
    /// The one-unit difference mirrors the `+1` headroom used by fitness
    /// scoring. Callers rely on this exact value, so a capacity of 4 reports
    /// 3 and a capacity of 0 reports -1.
    pub fn num_sub_resources(&self) -> i64 {
        self.slots
            .first()
            .map_or(0, |slot| i64::from(slot.limit()))
            - 1
    }

    /// Used sub-resources per slot in index order, `-1.0` for unbound slots.
    pub fn used_counts(&self) -> Vec<f64> {
        self.slots.iter().map(Slot::used_count).collect()
    }

    // Strictly-greater comparison: the lowest index wins ties.
    fn best_slot<R: TaskRequest + ?Sized>(&self, request: &R) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, slot) in self.slots.iter().enumerate() {
            let f = slot.fitness(request);
            if f == 0.0 {
                continue;
            }
            if best.is_none_or(|(_, best_fitness)| best_fitness < f) {
                best = Some((i, f));
            }
        }
        best
    }
}
