//! Task-side view of a named resource request.
//!
//! The scheduler owns the task objects; this crate only needs a consumer
//! id and, per resource family, the requested name and sub-resource count.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The name a task asks a slot to be bound to.
///
/// `Unspecified` is what a task gets when it makes no request for a family.
/// It is an ordinary value for binding purposes: a slot bound to
/// `Unspecified` only accepts other tasks that also left the name out.
///
/// On the wire a name is a plain string and `Unspecified` is written as
/// [`UNSPECIFIED_NAME`], matching existing scheduling-decision records.
/// A task literally named [`UNSPECIFIED_NAME`] is therefore read back as
/// `Unspecified`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceName {
    Unspecified,
    Named(String),
}

/// Wire form of [`ResourceName::Unspecified`].
pub const UNSPECIFIED_NAME: &str = "CustomResAbsent";

impl From<String> for ResourceName {
    fn from(name: String) -> Self {
        if name == UNSPECIFIED_NAME {
            Self::Unspecified
        } else {
            Self::Named(name)
        }
    }
}

impl From<ResourceName> for String {
    fn from(name: ResourceName) -> Self {
        match name {
            ResourceName::Unspecified => UNSPECIFIED_NAME.to_string(),
            ResourceName::Named(name) => name,
        }
    }
}

impl ResourceName {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Unspecified => None,
            Self::Named(name) => Some(name.as_str()),
        }
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => f.write_str("<unspecified>"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// A task's request against one resource family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedResourceRequest {
    /// Name the chosen slot must be (or become) bound to.
    pub name: ResourceName,
    /// Sub-resource units consumed within the bound slot. Expected `>= 0`.
    #[serde(default)]
    pub sub_resources: f64,
}

impl NamedResourceRequest {
    pub fn new(name: impl Into<String>, sub_resources: f64) -> Self {
        Self {
            name: ResourceName::named(name),
            sub_resources,
        }
    }
}

/// What the resource core needs to know about a task.
pub trait TaskRequest {
    /// Consumer identifier, stable and unique for the task's lifetime.
    fn id(&self) -> &str;

    /// The task's request for the given resource family, if any.
    fn named_resource(&self, attribute: &str) -> Option<&NamedResourceRequest>;

    /// Requested name and quantity for `attribute`, with the
    /// `(Unspecified, 0.0)` default applied.
    fn resolve(&self, attribute: &str) -> (ResourceName, f64) {
        match self.named_resource(attribute) {
            Some(req) => (req.name.clone(), req.sub_resources),
            None => (ResourceName::Unspecified, 0.0),
        }
    }
}

/// Plain task request, keyed by resource family name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub id: String,
    #[serde(default)]
    pub named_resources: HashMap<String, NamedResourceRequest>,
}

impl TaskSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            named_resources: HashMap::new(),
        }
    }

    /// Builder-style helper to add a request for one family.
    pub fn with_resource(
        mut self,
        attribute: impl Into<String>,
        name: impl Into<String>,
        sub_resources: f64,
    ) -> Self {
        self.named_resources.insert(
            attribute.into(),
            NamedResourceRequest::new(name, sub_resources),
        );
        self
    }
}

impl TaskRequest for TaskSpec {
    fn id(&self) -> &str {
        &self.id
    }

    fn named_resource(&self, attribute: &str) -> Option<&NamedResourceRequest> {
        self.named_resources.get(attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_request_resolves_to_unspecified() {
        let task = TaskSpec::new("t1").with_resource("gpu", "a100", 1.0);

        assert_eq!(task.resolve("eni"), (ResourceName::Unspecified, 0.0));
        assert_eq!(task.resolve("gpu"), (ResourceName::named("a100"), 1.0));
    }

    #[test]
    fn unspecified_only_equals_itself() {
        assert_eq!(ResourceName::Unspecified, ResourceName::Unspecified);
        assert_ne!(ResourceName::Unspecified, ResourceName::named(""));
        assert_ne!(ResourceName::named("a"), ResourceName::named("b"));
    }

    #[test]
    fn task_spec_parses_without_resources() {
        let task: TaskSpec = serde_json::from_str(r#"{"id": "t9"}"#).unwrap();
        assert_eq!(task.id(), "t9");
        assert!(task.named_resources.is_empty());
    }

    #[test]
    fn named_request_defaults_quantity_to_zero() {
        let json = r#"{"id": "t1", "named_resources": {"eni": {"name": "sg-1"}}}"#;
        let task: TaskSpec = serde_json::from_str(json).unwrap();

        assert_eq!(task.resolve("eni"), (ResourceName::named("sg-1"), 0.0));
    }

    #[test]
    fn names_are_plain_strings_on_the_wire() {
        assert_eq!(serde_json::to_value(ResourceName::named("sg-1")).unwrap(), "sg-1");
        assert_eq!(serde_json::to_value(ResourceName::Unspecified).unwrap(), "CustomResAbsent");

        let absent: ResourceName = serde_json::from_str(r#""CustomResAbsent""#).unwrap();
        assert_eq!(absent, ResourceName::Unspecified);
        let named: ResourceName = serde_json::from_str(r#""sg-1""#).unwrap();
        assert_eq!(named, ResourceName::named("sg-1"));
    }
}
