//! Per-host registry of resource sets, keyed by family name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use warpgrid_resources::{AllocationResult, ResourceSet, TaskRequest};

use crate::config::HostResourceConfig;
use crate::error::{HostResError, HostResResult};

/// Used counts of one family, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilySnapshot {
    pub name: String,
    pub num_sub_resources: i64,
    /// Per-slot used count; `-1.0` for unbound slots.
    pub used_counts: Vec<f64>,
}

/// All resource families configured on one host.
///
/// Owned by the scheduling pass for that host. Scoring takes `&self`;
/// consume and release take `&mut self`.
#[derive(Debug, Clone, Default)]
pub struct HostResourceSets {
    sets: BTreeMap<String, ResourceSet>,
}

impl HostResourceSets {
    pub fn from_config(config: &HostResourceConfig) -> HostResResult<Self> {
        config.validate()?;
        let sets = config
            .resource_sets
            .iter()
            .map(|c| (c.name.clone(), ResourceSet::new(&c.name, c.slots, c.sub_resources)))
            .collect::<BTreeMap<_, _>>();
        info!(families = sets.len(), "host resource sets initialized");
        Ok(Self { sets })
    }

    pub fn get(&self, family: &str) -> Option<&ResourceSet> {
        self.sets.get(family)
    }

    pub fn get_mut(&mut self, family: &str) -> Option<&mut ResourceSet> {
        self.sets.get_mut(family)
    }

    /// Family names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Score-only selection in `family`.
    pub fn score<R: TaskRequest + ?Sized>(&self, family: &str, request: &R) -> HostResResult<AllocationResult> {
        Ok(self.family(family)?.score(request))
    }

    pub fn fitness<R: TaskRequest + ?Sized>(&self, family: &str, request: &R) -> HostResResult<f64> {
        Ok(self.family(family)?.fitness(request))
    }

    pub fn consume<R: TaskRequest + ?Sized>(&mut self, family: &str, request: &R) -> HostResResult<AllocationResult> {
        let set = self
            .sets
            .get_mut(family)
            .ok_or_else(|| HostResError::UnknownFamily(family.to_string()))?;
        Ok(set.consume(request)?)
    }

    pub fn release<R: TaskRequest + ?Sized>(&mut self, family: &str, request: &R) -> HostResResult<bool> {
        let set = self
            .sets
            .get_mut(family)
            .ok_or_else(|| HostResError::UnknownFamily(family.to_string()))?;
        Ok(set.release(request))
    }

    /// Release the task from every family. Returns the families it held.
    pub fn release_all<R: TaskRequest + ?Sized>(&mut self, request: &R) -> Vec<String> {
        let released: Vec<String> = self
            .sets
            .iter_mut()
            .filter_map(|(name, set)| set.release(request).then(|| name.clone()))
            .collect();
        debug!(consumer = request.id(), families = ?released, "released task from host");
        released
    }

    pub fn snapshot(&self) -> Vec<FamilySnapshot> {
        self.sets
            .values()
            .map(|set| FamilySnapshot {
                name: set.name().to_string(),
                num_sub_resources: set.num_sub_resources(),
                used_counts: set.used_counts(),
            })
            .collect()
    }

    fn family(&self, family: &str) -> HostResResult<&ResourceSet> {
        self.sets
            .get(family)
            .ok_or_else(|| HostResError::UnknownFamily(family.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResourceSetConfig;
    use warpgrid_resources::TaskSpec;

    fn make_host() -> HostResourceSets {
        let config = HostResourceConfig {
            resource_sets: vec![
                ResourceSetConfig {
                    name: "eni".to_string(),
                    slots: 2,
                    sub_resources: 4,
                },
                ResourceSetConfig {
                    name: "gpu".to_string(),
                    slots: 1,
                    sub_resources: 2,
                },
            ],
        };
        HostResourceSets::from_config(&config).unwrap()
    }

    #[test]
    fn builds_one_set_per_family() {
        let host = make_host();

        assert_eq!(host.len(), 2);
        assert_eq!(host.names().collect::<Vec<_>>(), vec!["eni", "gpu"]);
        assert_eq!(host.get("eni").unwrap().len(), 2);
        assert_eq!(host.get("gpu").unwrap().num_sub_resources(), 1);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = HostResourceConfig {
            resource_sets: vec![ResourceSetConfig {
                name: String::new(),
                slots: 1,
                sub_resources: 1,
            }],
        };
        assert!(matches!(
            HostResourceSets::from_config(&config),
            Err(HostResError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unknown_family_is_an_error() {
        let mut host = make_host();
        let task = TaskSpec::new("t1");

        assert!(matches!(host.fitness("fpga", &task), Err(HostResError::UnknownFamily(_))));
        assert!(matches!(host.consume("fpga", &task), Err(HostResError::UnknownFamily(_))));
    }

    #[test]
    fn routes_requests_per_family() {
        let mut host = make_host();
        let task = TaskSpec::new("t1")
            .with_resource("eni", "sg-1", 1.0)
            .with_resource("gpu", "a100", 2.0);

        let eni = host.consume("eni", &task).unwrap();
        let gpu = host.consume("gpu", &task).unwrap();
        assert_eq!(eni.attr_name.as_deref(), Some("eni"));
        assert_eq!(gpu.slot_index(), Some(0));

        // gpu slot is full now.
        let other = TaskSpec::new("t2").with_resource("gpu", "a100", 1.0);
        assert_eq!(host.fitness("gpu", &other).unwrap(), 0.0);
        assert!(matches!(host.consume("gpu", &other), Err(HostResError::Allocation(_))));
    }

    #[test]
    fn release_all_frees_every_family() {
        let mut host = make_host();
        let task = TaskSpec::new("t1")
            .with_resource("eni", "sg-1", 1.0)
            .with_resource("gpu", "a100", 1.0);
        host.consume("eni", &task).unwrap();
        host.consume("gpu", &task).unwrap();

        assert_eq!(host.release_all(&task), vec!["eni".to_string(), "gpu".to_string()]);
        assert!(host.release_all(&task).is_empty());
        assert!(host
            .snapshot()
            .iter()
            .all(|f| f.used_counts.iter().all(|&c| c == -1.0)));
    }

    #[test]
    fn snapshot_reports_used_counts() {
        let mut host = make_host();
        host.consume("eni", &TaskSpec::new("t1").with_resource("eni", "sg-1", 3.0))
            .unwrap();

        let snap = host.snapshot();
        assert_eq!(snap[0].name, "eni");
        assert_eq!(snap[0].num_sub_resources, 3);
        assert_eq!(snap[0].used_counts, vec![3.0, -1.0]);
    }
}
