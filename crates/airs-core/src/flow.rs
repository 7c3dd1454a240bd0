//! Flow references and workflow export loading.
//!
//! A flow reference has the exact shape `<brick_id>:<export_name>` and is
//! meaningful only after it round-trips through registry lookup and export
//! membership; both checks run here before any caller uses the reference.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::domain::error::{ResolveError, Result};
use crate::domain::{BrickRegistry, Step};
use crate::loader::Workspace;

/// A well-formed `brick:export` reference.
///
/// Well-formed is not resolvable: `parse` only validates the shape. Use
/// [`load_flow`] to enforce registry and export membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRef {
    pub brick: String,
    pub export: String,
}

impl FlowRef {
    /// Parse a reference, requiring exactly one `:` separator.
    ///
    /// `a:b:c` is malformed; it is not "brick `a`, export `b:c`".
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.matches(':').count() != 1 {
            return Err(ResolveError::InvalidReference(format!(
                "expected 'brick:export', got '{raw}'"
            )));
        }
        let (brick, export) = raw.split_once(':').unwrap_or_default();
        Ok(FlowRef {
            brick: brick.to_string(),
            export: export.to_string(),
        })
    }
}

impl fmt::Display for FlowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.brick, self.export)
    }
}

/// A workflow export loaded from its brick document.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedFlow {
    /// Brick document id; the registry brick id when the document has none.
    pub id: String,
    pub export: String,
    /// Resolved document path.
    pub file: String,
    /// Step sequence; possibly empty.
    pub steps: Vec<Step>,
    /// Shared defaults from the document.
    pub common: BTreeMap<String, serde_yaml::Value>,
}

/// Resolve and load a flow reference, reading the registry from `workspace`.
pub fn load_flow(workspace: &Workspace, flow_ref: &FlowRef) -> Result<LoadedFlow> {
    let registry = workspace.brick_registry()?;
    load_flow_from(workspace, &registry, flow_ref)
}

/// Resolve and load a flow reference against an already-loaded registry.
pub fn load_flow_from(
    workspace: &Workspace,
    registry: &BrickRegistry,
    flow_ref: &FlowRef,
) -> Result<LoadedFlow> {
    let entry = registry
        .get(&flow_ref.brick)
        .ok_or_else(|| ResolveError::UnknownBrick(flow_ref.brick.clone()))?;

    let (path, doc) = workspace.brick_document(entry)?;

    let steps = doc
        .flows
        .get(&flow_ref.export)
        .ok_or_else(|| ResolveError::UnknownExport {
            brick: flow_ref.brick.clone(),
            export: flow_ref.export.clone(),
        })?
        .sequence
        .clone();

    Ok(LoadedFlow {
        id: doc.id.unwrap_or_else(|| flow_ref.brick.clone()),
        export: flow_ref.export.clone(),
        file: path.display().to_string(),
        steps,
        common: doc.common,
    })
}
