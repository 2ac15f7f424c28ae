//! A single preferential resource slot.
//!
//! A slot is free until its first consumer binds it to the requested name.
//! While bound it only accepts consumers asking for that same name, up to
//! `limit` sub-resources in total. Releasing the last consumer frees it.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ResourceSetError, ResourceSetResult};
use crate::request::{ResourceName, TaskRequest};

/// Used count reported for a slot that is not bound.
pub const UNBOUND_USED_COUNT: f64 = -1.0;

#[derive(Debug, Clone)]
pub struct Slot {
    index: usize,
    attribute_name: String,
    bound_name: Option<ResourceName>,
    limit: u32,
    /// `limit + 1.0`. The extra unit keeps "bound to the requested name,
    /// nothing used" strictly above "unbound".
    max_fitness: f64,
    usage_by: HashMap<String, f64>,
    used_sub_resources: f64,
}

impl Slot {
    pub(crate) fn new(index: usize, attribute_name: &str, limit: u32) -> Self {
        Self {
            index,
            attribute_name: attribute_name.to_string(),
            bound_name: None,
            limit,
            max_fitness: f64::from(limit) + 1.0,
            usage_by: HashMap::new(),
            used_sub_resources: 0.0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    /// The name this slot is dedicated to, or `None` while free.
    pub fn bound_name(&self) -> Option<&ResourceName> {
        self.bound_name.as_ref()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Sub-resources held per consumer id.
    pub fn usage_by(&self) -> &HashMap<String, f64> {
        &self.usage_by
    }

    pub fn used_sub_resources(&self) -> f64 {
        self.used_sub_resources
    }

    /// Used sub-resources, or [`UNBOUND_USED_COUNT`] while unbound.
    pub fn used_count(&self) -> f64 {
        if self.bound_name.is_none() {
            return UNBOUND_USED_COUNT;
        }
        self.used_sub_resources
    }

    pub fn is_bound(&self) -> bool {
        self.bound_name.is_some()
    }

    /// Score this slot for `request` without changing it.
    ///
    /// Returns `0.0` when the slot can't take the request, including any
    /// negative or non-finite quantity. A free slot
    /// scores `0.5 / max_fitness`, which is below any slot already bound
    /// to the requested name, so consumers consolidate onto existing
    /// bindings before claiming fresh slots. Among bound slots, fuller
    /// ones score higher.
    pub fn fitness<R: TaskRequest + ?Sized>(&self, request: &R) -> f64 {
        let (requested, need) = request.resolve(&self.attribute_name);
        if !is_valid_quantity(need) {
            return 0.0;
        }
        let Some(bound) = &self.bound_name else {
            return 0.5 / self.max_fitness;
        };
        if *bound != requested {
            return 0.0;
        }
        if self.used_sub_resources + need > f64::from(self.limit) {
            return 0.0;
        }
        (self.used_sub_resources + need + 1.0 / self.max_fitness).min(1.0)
    }

    /// Bind (if free) and take `request`'s sub-resources from this slot.
    ///
    /// Must only follow a non-zero [`fitness`](Self::fitness) for the same
    /// request. Calling it twice for one consumer without a release in
    /// between double-counts.
    pub fn consume<R: TaskRequest + ?Sized>(&mut self, request: &R) -> ResourceSetResult<()> {
        let (requested, need) = request.resolve(&self.attribute_name);
        if !is_valid_quantity(need) {
            return Err(ResourceSetError::InvalidQuantity {
                attribute: self.attribute_name.clone(),
                consumer: request.id().to_string(),
                requested: need,
            });
        }
        if let Some(bound) = self.bound_name.as_ref().filter(|bound| **bound != requested) {
            return Err(ResourceSetError::IncompatibleBinding {
                attribute: self.attribute_name.clone(),
                slot: self.index,
                bound: bound.clone(),
                requested,
            });
        }
        let newly_bound = self.bound_name.is_none();
        if newly_bound {
            self.bound_name = Some(requested.clone());
            self.usage_by.clear();
        }

        if self.used_sub_resources + need > f64::from(self.limit) {
            if newly_bound {
                self.bound_name = None;
            }
            return Err(ResourceSetError::CapacityExceeded {
                attribute: self.attribute_name.clone(),
                slot: self.index,
                used: self.used_sub_resources,
                requested: need,
                limit: self.limit,
            });
        }

        // A repeat consume for the same id replaces the map entry but the
        // running total still grows by `need`.
        self.usage_by.insert(request.id().to_string(), need);
        self.used_sub_resources += need;

        debug!(
            attribute = %self.attribute_name,
            slot = self.index,
            name = %requested,
            consumer = request.id(),
            used = self.used_sub_resources,
            limit = self.limit,
            "consumed slot"
        );
        Ok(())
    }

    /// Give back whatever `request`'s consumer holds in this slot.
    ///
    /// Returns `false` if the slot is bound to another name or the consumer
    /// holds nothing here.
    pub fn release<R: TaskRequest + ?Sized>(&mut self, request: &R) -> bool {
        let (requested, _) = request.resolve(&self.attribute_name);
        if self.bound_name.as_ref().is_some_and(|bound| *bound != requested) {
            return false;
        }
        let Some(held) = self.usage_by.remove(request.id()) else {
            return false;
        };
        self.used_sub_resources -= held;

        if self.usage_by.is_empty() {
            debug!(
                attribute = %self.attribute_name,
                slot = self.index,
                "last consumer released, slot unbound"
            );
            self.bound_name = None;
            self.used_sub_resources = 0.0;
        }
        true
    }
}

fn is_valid_quantity(need: f64) -> bool {
    need.is_finite() && need >= 0.0
}
