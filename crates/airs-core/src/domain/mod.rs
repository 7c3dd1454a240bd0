//! Domain models for AIRS.
//!
//! Canonical definitions for the core entities:
//! - Artifact schemas: manifest, router rules, brick registry and documents,
//!   glossary, wakeup matrix, capability matrix, agent index, doc references
//! - `ResolveError`: the engine's error taxonomy

pub mod artifacts;
pub mod error;

// Re-export main types and errors
pub use artifacts::{
    ActionStep, AgentIndex, BrickDocument, BrickRegistry, CapabilityMatrix, DocRef, ExpertRefs,
    FlowExport, ManifestEntry, MatchRule, RegistryEntry, RouteTarget, Step, Strategy, Term,
    WakeupMatrix,
};
pub use error::{ResolveError, Result};
