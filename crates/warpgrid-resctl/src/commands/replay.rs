use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use warpgrid_hostres::{HostResError, HostResourceConfig, HostResourceSets};
use warpgrid_resources::{AllocationResult, TaskSpec};

/// One step of a placement trace.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TraceEvent {
    Score { family: String, task: TaskSpec },
    Consume { family: String, task: TaskSpec },
    Release { family: String, task: TaskSpec },
}

/// What happened for one trace event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EventOutcome {
    Score { task: String, result: AllocationResult },
    Consume { task: String, result: AllocationResult },
    Release { task: String, released: bool },
}

impl std::fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Score { task, result } | Self::Consume { task, result } => {
                let verb = if matches!(self, Self::Score { .. }) { "score" } else { "consume" };
                let Some(slot) = result.slot_index() else {
                    return write!(f, "{verb:<8} {task:<12} no fit");
                };
                // Scoring a free slot reports no name yet.
                let name = result
                    .res_name
                    .as_ref()
                    .map_or_else(|| "-".to_string(), ToString::to_string);
                write!(
                    f,
                    "{verb:<8} {task:<12} slot={slot} name={name} fitness={:.4}",
                    result.fitness
                )
            }
            Self::Release { task, released } => {
                write!(f, "release  {task:<12} released={released}")
            }
        }
    }
}

pub fn replay(config_path: &Path, trace_path: &Path, json: bool) -> anyhow::Result<()> {
    let config = HostResourceConfig::from_file(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let content = std::fs::read_to_string(trace_path)
        .with_context(|| format!("reading {}", trace_path.display()))?;
    let events: Vec<TraceEvent> = serde_json::from_str(&content)?;

    let mut host = HostResourceSets::from_config(&config)?;
    info!(events = events.len(), "replaying trace");

    let (outcomes, failure) = run_trace(&mut host, &events);
    for outcome in &outcomes {
        if json {
            println!("{}", serde_json::to_string(outcome)?);
        } else {
            println!("{outcome}");
        }
    }

    if json {
        println!("{}", serde_json::to_string(&host.snapshot())?);
    } else {
        for family in host.snapshot() {
            println!("{:<16} used={:?}", family.name, family.used_counts);
        }
    }

    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Apply events in order, stopping at the first error.
pub fn run_trace(
    host: &mut HostResourceSets,
    events: &[TraceEvent],
) -> (Vec<EventOutcome>, Option<HostResError>) {
    let mut outcomes = Vec::with_capacity(events.len());
    for event in events {
        let outcome = match event {
            TraceEvent::Score { family, task } => host
                .score(family, task)
                .map(|result| EventOutcome::Score { task: task.id.clone(), result }),
            TraceEvent::Consume { family, task } => host
                .consume(family, task)
                .map(|result| EventOutcome::Consume { task: task.id.clone(), result }),
            TraceEvent::Release { family, task } => host
                .release(family, task)
                .map(|released| EventOutcome::Release { task: task.id.clone(), released }),
        };
        match outcome {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                error!(error = %err, "trace replay stopped");
                return (outcomes, Some(err));
            }
        }
    }
    (outcomes, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn make_host() -> HostResourceSets {
        let config = HostResourceConfig::from_toml_str(
            r#"
[[resource_set]]
name = "eni"
slots = 2
sub_resources = 3
"#,
        )
        .unwrap();
        HostResourceSets::from_config(&config).unwrap()
    }

    fn parse(json: &str) -> Vec<TraceEvent> {
        serde_json::from_str(json).unwrap()
    }

    const TRACE: &str = r#"[
        {"op": "score", "family": "eni", "task": {"id": "T1", "named_resources": {"eni": {"name": "X", "sub_resources": 2}}}},
        {"op": "consume", "family": "eni", "task": {"id": "T1", "named_resources": {"eni": {"name": "X", "sub_resources": 2}}}},
        {"op": "consume", "family": "eni", "task": {"id": "T2", "named_resources": {"eni": {"name": "Y", "sub_resources": 1}}}},
        {"op": "release", "family": "eni", "task": {"id": "T1", "named_resources": {"eni": {"name": "X", "sub_resources": 2}}}}
    ]"#;

    #[test]
    fn replays_trace_in_order() {
        let mut host = make_host();
        let (outcomes, failure) = run_trace(&mut host, &parse(TRACE));

        assert!(failure.is_none());
        assert_eq!(outcomes.len(), 4);
        match &outcomes[2] {
            EventOutcome::Consume { task, result } => {
                assert_eq!(task, "T2");
                assert_eq!(result.slot_index(), Some(1));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(
            outcomes[3],
            EventOutcome::Release { task: "T1".to_string(), released: true }
        );
        assert_eq!(host.get("eni").unwrap().used_counts(), vec![-1.0, 1.0]);
    }

    #[test]
    fn stops_at_failed_consume() {
        let mut host = make_host();
        let events = parse(
            r#"[
            {"op": "consume", "family": "eni", "task": {"id": "a", "named_resources": {"eni": {"name": "X", "sub_resources": 3}}}},
            {"op": "consume", "family": "eni", "task": {"id": "b", "named_resources": {"eni": {"name": "Y", "sub_resources": 3}}}},
            {"op": "consume", "family": "eni", "task": {"id": "c", "named_resources": {"eni": {"name": "Z", "sub_resources": 1}}}},
            {"op": "release", "family": "eni", "task": {"id": "a"}}
        ]"#,
        );

        let (outcomes, failure) = run_trace(&mut host, &events);
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(failure, Some(HostResError::Allocation(_))));
    }

    #[test]
    fn unknown_family_fails() {
        let mut host = make_host();
        let events = parse(r#"[{"op": "score", "family": "gpu", "task": {"id": "a"}}]"#);

        let (outcomes, failure) = run_trace(&mut host, &events);
        assert!(outcomes.is_empty());
        assert!(matches!(failure, Some(HostResError::UnknownFamily(f)) if f == "gpu"));
    }

    #[test]
    fn outcome_display() {
        let mut host = make_host();
        let (outcomes, _) = run_trace(&mut host, &parse(TRACE));

        assert_eq!(outcomes[0].to_string(), "score    T1           slot=0 name=- fitness=0.1250");
        assert_eq!(outcomes[3].to_string(), "release  T1           released=true");
    }

    #[test]
    fn replay_reads_files() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        config
            .write_all(b"[[resource_set]]\nname = \"eni\"\nslots = 2\nsub_resources = 3\n")
            .unwrap();
        let mut trace = tempfile::NamedTempFile::new().unwrap();
        trace.write_all(TRACE.as_bytes()).unwrap();

        replay(config.path(), trace.path(), true).unwrap();
    }
}
