//! Typed schemas for the artifact documents the engine consumes.
//!
//! Artifacts are authored externally and read-only to the engine. Each type
//! here is validated once at the load boundary (see `loader`); downstream
//! code never touches untyped nested mappings.
//!
//! Map-backed documents use `BTreeMap` so iteration order, and therefore
//! catalog output, is deterministic regardless of authoring order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of the workflow manifest's catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestEntry {
    /// Symbolic intent this workflow answers.
    pub intent: String,
    /// `brick:export` reference; authoring may leave it unset.
    #[serde(default)]
    pub flow_ref: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One ordered routing rule: a match predicate and a target flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Strategy {
    #[serde(rename = "match")]
    pub matcher: MatchRule,
    pub route: RouteTarget,
}

/// The match predicate of a routing strategy, discriminated by `by`.
///
/// Legacy rule files spell two discriminants differently
/// (`thread.tags`, `subject.pattern`); both are accepted as aliases and
/// re-serialized under the canonical names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum MatchRule {
    Intent {
        value: String,
    },
    #[serde(alias = "thread.tags")]
    Tags {
        any_of: Vec<String>,
    },
    #[serde(alias = "subject.pattern")]
    Subject {
        regex: String,
    },
    ActionKey {
        value: String,
    },
}

/// The routing target of a strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteTarget {
    /// A `brick:export` flow reference.
    pub flow: String,
}

/// One brick registry entry: where the brick's document lives and which
/// exports it declares.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryEntry {
    /// Document path, relative to the flows directory.
    pub file: String,
    /// Ordered export names; uniqueness is assumed, not enforced.
    #[serde(default)]
    pub exports: Vec<String>,
}

/// Brick id → registry entry.
pub type BrickRegistry = BTreeMap<String, RegistryEntry>;

/// Capability id → ordered responsible roles.
pub type CapabilityMatrix = BTreeMap<String, Vec<String>>;

/// A brick document: one file exposing one or more workflow exports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrickDocument {
    /// Document id; the registry brick id is used when unset.
    #[serde(default)]
    pub id: Option<String>,
    /// Export name → workflow definition.
    #[serde(default)]
    pub flows: BTreeMap<String, FlowExport>,
    /// Shared defaults applied across the document's exports.
    #[serde(default)]
    pub common: BTreeMap<String, serde_yaml::Value>,
}

/// One named workflow export inside a brick document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowExport {
    #[serde(default)]
    pub sequence: Vec<Step>,
}

/// One step of a workflow sequence.
///
/// Steps are either structured action records or scalar markers
/// (notification-only entries). Only action records participate in
/// capability derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Action(ActionStep),
    Marker(serde_yaml::Value),
}

impl Step {
    /// Whether this step is a structured action record.
    pub fn as_action(&self) -> Option<&ActionStep> {
        match self {
            Step::Action(action) => Some(action),
            Step::Marker(_) => None,
        }
    }
}

/// A structured workflow step carrying capability requirements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionStep {
    /// Capabilities every responsible operator must hold.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires_caps: Vec<String>,
    /// Capabilities of which at least one must be held.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires_caps_any: Vec<String>,
    /// Remaining step fields, preserved verbatim for presentation.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// One glossary term.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Term {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub related_workflows: Vec<String>,
}

/// The wakeup intent matrix: intent ids plus per-intent aliases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WakeupMatrix {
    #[serde(default)]
    pub intents: Vec<String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,
}

/// Conventional artifact references for one expert role.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExpertRefs {
    pub expert: String,
    pub wakeup: String,
}

/// The agent onboarding index, derived from the agents directory tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentIndex {
    /// Expert role → conventional artifact references.
    pub experts: BTreeMap<String, ExpertRefs>,
    /// Client id → agent id → onboarding reference.
    pub clients: BTreeMap<String, BTreeMap<String, String>>,
}

/// A documentation reference extracted from markdown front-matter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocRef {
    #[serde(default)]
    pub nomenclature: Option<String>,
    #[serde(default)]
    pub workflow: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    /// Path relative to the workspace root, POSIX separators. Attached by
    /// the scanner, never read from the document itself.
    #[serde(default, skip_deserializing)]
    pub path: String,
}
