//! AIRS Core Library
//!
//! The Intent Resolution & Routing Engine: maps free-text terms to symbolic
//! intents, routes intents to workflow references through ordered
//! strategies, validates references against the brick registry, derives the
//! responsible roles from a workflow's first actionable step, and binds
//! candidate agents for a requesting client. The surrounding artifacts are
//! independently authored YAML documents, read-only to this crate.

pub mod agents;
pub mod capability;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod flow;
pub mod loader;
pub mod router;
pub mod telemetry;
pub mod terms;

pub use agents::{bind_agents, slugify, AgentBinding};
pub use capability::required_roles;
pub use catalog::{build_catalog, AgentKind, CatalogItem, CatalogQuery, CatalogReport};
pub use config::WorkspaceConfig;
pub use domain::{
    ActionStep, AgentIndex, BrickDocument, BrickRegistry, CapabilityMatrix, DocRef, ManifestEntry,
    MatchRule, RegistryEntry, ResolveError, Result, Step, Strategy, Term, WakeupMatrix,
};
pub use engine::{Engine, LookupReport, PingReport, ResolveReport, ResolveRequest};
pub use flow::{load_flow, FlowRef, LoadedFlow};
pub use loader::Workspace;
pub use router::{route, RouteOutcome, RouteQuery, RouteSource, RouteTrace};
pub use telemetry::init_tracing;
pub use terms::{resolve_term, term_catalog};

/// AIRS version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
