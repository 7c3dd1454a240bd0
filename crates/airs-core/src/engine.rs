//! The resolution engine facade.
//!
//! One `Engine` binds a workspace root and exposes the operations both
//! front-ends serialize: `ping`, `catalog`, `lookup`, `resolve` for the
//! routing surface, plus `route`, `load_flow` and `workflow_catalog` for the
//! workflow surface. Every operation re-reads artifacts from storage: there
//! is no cross-call cache and no mutable state, so one engine value (or
//! many) can serve any number of sequential or concurrent calls.

use std::path::PathBuf;

use regex::Regex;
use serde::Serialize;

use crate::agents::{bind_agents, AgentBinding};
use crate::capability::required_roles;
use crate::catalog::{build_catalog, CatalogQuery, CatalogReport};
use crate::domain::error::Result;
use crate::domain::ManifestEntry;
use crate::flow::{load_flow_from, FlowRef, LoadedFlow};
use crate::loader::Workspace;
use crate::router::{route, RouteOutcome, RouteQuery};
use crate::terms::{resolve_term, term_catalog};

/// Liveness response carrying the effective workspace root.
#[derive(Debug, Clone, Serialize)]
pub struct PingReport {
    pub ok: bool,
    pub root: String,
}

/// Term lookup response.
#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    pub term: String,
    pub intent: Option<String>,
}

/// Inputs for a full resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Explicit intent; when set, `term` is ignored.
    pub intent: Option<String>,
    /// Free-text term, resolved to an intent when no intent is given.
    pub term: Option<String>,
    /// Client to bind candidate agents for.
    pub client: Option<String>,
}

/// A full resolution: intent → flow → roles → candidate agents.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveReport {
    pub intent: Option<String>,
    pub flow_ref: Option<String>,
    pub recommended_roles: Vec<String>,
    pub candidate_agents: Vec<AgentBinding>,
}

/// The engine, bound to one workspace root.
pub struct Engine {
    workspace: Workspace,
}

impl Engine {
    /// Bind an engine to the artifact tree at `root`.
    ///
    /// Configuration resolution happens here, once per invocation.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Engine {
            workspace: Workspace::open(root),
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn ping(&self) -> PingReport {
        PingReport {
            ok: true,
            root: self.workspace.root().display().to_string(),
        }
    }

    /// Aggregate the catalog; tolerant of any missing artifact.
    pub fn catalog(&self, query: &CatalogQuery) -> CatalogReport {
        build_catalog(&self.workspace, query)
    }

    /// Resolve a free-text term to an intent id.
    pub fn lookup(&self, term: &str) -> LookupReport {
        let catalog = term_catalog(self.workspace.glossary(), &self.workspace.wakeup_intents());
        LookupReport {
            term: term.to_string(),
            intent: resolve_term(&catalog, term),
        }
    }

    /// Full resolution for the routing surface.
    ///
    /// Router rules and the brick registry are required even when no intent
    /// can be derived; their absence is fatal for the call. A routed
    /// reference is validated (shape, registry membership, export
    /// membership) before any role derivation; a reference that fails
    /// validation fails the call rather than silently dropping roles.
    pub fn resolve(&self, request: &ResolveRequest) -> Result<ResolveReport> {
        let rules = self.workspace.router_rules()?;
        let registry = self.workspace.brick_registry()?;

        let intent = request.intent.clone().or_else(|| {
            let term = request.term.as_deref()?;
            let catalog = term_catalog(self.workspace.glossary(), &self.workspace.wakeup_intents());
            resolve_term(&catalog, term)
        });

        let manifest = self.workspace.manifest();
        let outcome = route(
            &rules,
            &manifest,
            &RouteQuery {
                intent: intent.clone(),
                ..RouteQuery::default()
            },
        );
        tracing::debug!(?intent, flow_ref = ?outcome.flow_ref, source = ?outcome.trace.source, "routed");

        let (flow_ref, recommended_roles) = match outcome.flow_ref {
            Some(raw) => {
                let parsed = FlowRef::parse(&raw)?;
                let loaded = load_flow_from(&self.workspace, &registry, &parsed)?;
                let matrix = self.workspace.capability_matrix();
                (Some(raw), required_roles(&loaded.steps, &matrix))
            }
            None => (None, Vec::new()),
        };

        let candidate_agents = if recommended_roles.is_empty() {
            Vec::new()
        } else {
            bind_agents(
                &self.workspace.agent_index(),
                request.client.as_deref(),
                &recommended_roles,
            )
        };

        Ok(ResolveReport {
            intent,
            flow_ref,
            recommended_roles,
            candidate_agents,
        })
    }

    /// Route arbitrary request attributes for the workflow surface.
    pub fn route(&self, query: &RouteQuery) -> Result<RouteOutcome> {
        let rules = self.workspace.router_rules()?;
        let manifest = self.workspace.manifest();
        Ok(route(&rules, &manifest, query))
    }

    /// Validate and load a flow reference for the workflow surface.
    pub fn load_flow(&self, raw: &str) -> Result<LoadedFlow> {
        let flow_ref = FlowRef::parse(raw)?;
        let registry = self.workspace.brick_registry()?;
        load_flow_from(&self.workspace, &registry, &flow_ref)
    }

    /// The workflow manifest, family-filtered then pattern-grepped over
    /// intent, title and description.
    ///
    /// Unlike the catalog aggregator's literal grep, this one is a real
    /// regular expression; both tools inherited their own behavior.
    pub fn workflow_catalog(
        &self,
        family: Option<&str>,
        grep: Option<&Regex>,
    ) -> Result<Vec<ManifestEntry>> {
        let mut entries = self.workspace.require_manifest()?;
        if let Some(family) = family {
            entries.retain(|e| e.family.as_deref() == Some(family));
        }
        if let Some(re) = grep {
            entries.retain(|e| {
                re.is_match(&e.intent)
                    || e.title.as_deref().map(|t| re.is_match(t)).unwrap_or(false)
                    || e.description
                        .as_deref()
                        .map(|d| re.is_match(d))
                        .unwrap_or(false)
            });
        }
        Ok(entries)
    }
}
