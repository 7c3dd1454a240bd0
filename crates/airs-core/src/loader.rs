//! Artifact loading with the engine's asymmetric tolerance policy.
//!
//! Optional documents that are absent or unparseable load as empty; the few
//! documents required by the running call path fail with `missing_artifact`
//! when absent (a parse failure still yields an empty document; the swallow
//! policy applies to malformed content everywhere). List- and map-shaped
//! documents are decoded entry-by-entry so a single malformed entry is
//! skipped with a warning instead of discarding its siblings.
//!
//! Nothing here caches: every accessor re-reads storage, which keeps
//! consecutive calls against an unchanged tree identical and makes the
//! loader trivially safe under concurrent use.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use walkdir::WalkDir;

use crate::config::WorkspaceConfig;
use crate::domain::error::{ResolveError, Result};
use crate::domain::{
    AgentIndex, BrickDocument, BrickRegistry, CapabilityMatrix, DocRef, ExpertRefs, ManifestEntry,
    RegistryEntry, Strategy, Term, WakeupMatrix,
};

/// Router strategies, under the flows directory.
pub const ROUTING_FILE: &str = "routing.yaml";
/// Brick registry, under the flows directory.
pub const REGISTRY_FILE: &str = "registry.yaml";
/// Workflow manifest, under the flows directory.
pub const MANIFEST_FILE: &str = "manifest.yaml";
/// Capability matrix, under the flows directory.
pub const CAPABILITIES_FILE: &str = "capabilities.yaml";

const ONBOARDING_FILE: &str = "onboarding.yaml";

/// A read-only view over one artifact tree.
pub struct Workspace {
    cfg: WorkspaceConfig,
}

enum RawDoc {
    Missing,
    Parsed(serde_yaml::Value),
}

impl Workspace {
    /// Open the artifact tree rooted at `root`, resolving configuration once.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Workspace {
            cfg: WorkspaceConfig::discover(root),
        }
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.cfg
    }

    pub fn root(&self) -> &Path {
        &self.cfg.root
    }

    /// Workflow manifest entries; tolerant (absent → empty).
    pub fn manifest(&self) -> Vec<ManifestEntry> {
        match read_doc(&self.cfg.flows_dir.join(MANIFEST_FILE)) {
            RawDoc::Missing => Vec::new(),
            RawDoc::Parsed(value) => seq_entries(&value, "workflows_catalog", "manifest entry"),
        }
    }

    /// Workflow manifest entries; `missing_artifact` when the file is absent.
    pub fn require_manifest(&self) -> Result<Vec<ManifestEntry>> {
        let path = self.cfg.flows_dir.join(MANIFEST_FILE);
        match read_doc(&path) {
            RawDoc::Missing => Err(missing_artifact("workflow manifest", &path)),
            RawDoc::Parsed(value) => {
                Ok(seq_entries(&value, "workflows_catalog", "manifest entry"))
            }
        }
    }

    /// Router strategies in authored order; required for any resolve.
    pub fn router_rules(&self) -> Result<Vec<Strategy>> {
        let path = self.cfg.flows_dir.join(ROUTING_FILE);
        match read_doc(&path) {
            RawDoc::Missing => Err(missing_artifact("router rules", &path)),
            RawDoc::Parsed(value) => Ok(seq_entries(&value, "strategies", "routing strategy")),
        }
    }

    /// Brick registry; required for any resolve and for flow loading.
    pub fn brick_registry(&self) -> Result<BrickRegistry> {
        let path = self.cfg.flows_dir.join(REGISTRY_FILE);
        match read_doc(&path) {
            RawDoc::Missing => Err(missing_artifact("brick registry", &path)),
            RawDoc::Parsed(value) => Ok(map_entries(&value, "registry", "registry entry")),
        }
    }

    /// Capability matrix; tolerant.
    pub fn capability_matrix(&self) -> CapabilityMatrix {
        match read_doc(&self.cfg.flows_dir.join(CAPABILITIES_FILE)) {
            RawDoc::Missing => CapabilityMatrix::new(),
            RawDoc::Parsed(value) => map_entries(&value, "capabilities", "capability entry"),
        }
    }

    /// Glossary terms in authored order; tolerant.
    pub fn glossary(&self) -> Vec<Term> {
        match read_doc(&self.cfg.glossary_file) {
            RawDoc::Missing => Vec::new(),
            RawDoc::Parsed(value) => seq_entries(&value, "terms", "glossary term"),
        }
    }

    /// Wakeup intent matrix; tolerant.
    pub fn wakeup_intents(&self) -> WakeupMatrix {
        let value = match read_doc(&self.cfg.wakeup_file) {
            RawDoc::Missing => return WakeupMatrix::default(),
            RawDoc::Parsed(value) => value,
        };
        match serde_yaml::from_value(value) {
            Ok(matrix) => matrix,
            Err(err) => {
                tracing::warn!(%err, "skipping malformed wakeup intent matrix");
                WakeupMatrix::default()
            }
        }
    }

    /// Read a registered brick's document.
    ///
    /// The file being unreadable is `missing_file`; malformed content still
    /// yields an empty document per the swallow policy.
    pub fn brick_document(&self, entry: &RegistryEntry) -> Result<(PathBuf, BrickDocument)> {
        let path = self.cfg.flows_dir.join(&entry.file);
        let text = std::fs::read_to_string(&path)
            .map_err(|_| ResolveError::MissingFile(path.display().to_string()))?;
        let doc = match serde_yaml::from_str(&text) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "unparseable brick document");
                BrickDocument::default()
            }
        };
        Ok((path, doc))
    }

    /// Derive the agent index from the agents directory tree; tolerant.
    ///
    /// Expert references are conventional; their files are not checked for
    /// existence here (the consistency linters do that externally).
    pub fn agent_index(&self) -> AgentIndex {
        let mut index = AgentIndex::default();

        for role_dir in subdirectories(&self.cfg.agents_dir.join("experts")) {
            let role = dir_name(&role_dir);
            index.experts.insert(
                role.clone(),
                ExpertRefs {
                    expert: format!("experts/{role}/expert.yaml"),
                    wakeup: format!("experts/{role}/wakeup.yaml"),
                },
            );
        }

        for client_dir in subdirectories(&self.cfg.agents_dir.join("clients")) {
            let mut agents = BTreeMap::new();
            for entry in WalkDir::new(&client_dir)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() && entry.file_name().to_str() == Some(ONBOARDING_FILE)
                {
                    let agent_id = entry
                        .path()
                        .parent()
                        .map(dir_name)
                        .unwrap_or_default();
                    if let Ok(rel) = entry.path().strip_prefix(&self.cfg.agents_dir) {
                        agents.insert(agent_id, posix_path(rel));
                    }
                }
            }
            index.clients.insert(dir_name(&client_dir), agents);
        }

        index
    }

    /// Scan the tree for markdown files whose front-matter carries the
    /// configured documentation key; tolerant.
    pub fn docs(&self) -> Vec<DocRef> {
        let key = self.cfg.doc_frontmatter_key.as_str();
        let mut docs = Vec::new();

        for entry in WalkDir::new(&self.cfg.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let is_md = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == "md")
                .unwrap_or(false);
            if !entry.file_type().is_file() || !is_md {
                continue;
            }
            let Ok(text) = std::fs::read_to_string(entry.path()) else {
                continue;
            };
            let Some(front) = front_matter(&text) else {
                continue;
            };
            let Some(value) = front.get(key) else {
                continue;
            };
            if !value.is_mapping() {
                continue;
            }
            match serde_yaml::from_value::<DocRef>(value.clone()) {
                Ok(mut doc) => {
                    if let Ok(rel) = entry.path().strip_prefix(&self.cfg.root) {
                        doc.path = posix_path(rel);
                    }
                    docs.push(doc);
                }
                Err(err) => {
                    tracing::warn!(path = %entry.path().display(), %err, "skipping malformed doc reference");
                }
            }
        }

        docs
    }
}

/// Parse the leading `---` front-matter block of a markdown file.
fn front_matter(text: &str) -> Option<serde_yaml::Value> {
    if !text.starts_with("---") {
        return None;
    }
    let mut parts = text.splitn(3, "---");
    parts.next()?; // before the opening delimiter
    let block = parts.next()?;
    parts.next()?; // the body must exist for the block to be delimited
    match serde_yaml::from_str(block) {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

fn read_doc(path: &Path) -> RawDoc {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => return RawDoc::Missing,
    };
    match serde_yaml::from_str(&text) {
        Ok(value) => RawDoc::Parsed(value),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "unparseable artifact, treating as empty");
            RawDoc::Parsed(serde_yaml::Value::Null)
        }
    }
}

/// Decode the sequence under `key`, skipping entries that fail validation.
fn seq_entries<T: DeserializeOwned>(value: &serde_yaml::Value, key: &str, what: &str) -> Vec<T> {
    let Some(items) = value.get(key).and_then(|v| v.as_sequence()) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match serde_yaml::from_value(item.clone()) {
            Ok(entry) => out.push(entry),
            Err(err) => tracing::warn!(%err, "skipping malformed {what}"),
        }
    }
    out
}

/// Decode the mapping under `key`, skipping entries that fail validation.
fn map_entries<T: DeserializeOwned>(
    value: &serde_yaml::Value,
    key: &str,
    what: &str,
) -> BTreeMap<String, T> {
    let Some(items) = value.get(key).and_then(|v| v.as_mapping()) else {
        return BTreeMap::new();
    };
    let mut out = BTreeMap::new();
    for (k, v) in items {
        let Some(id) = k.as_str() else {
            tracing::warn!("skipping {what} with non-string key");
            continue;
        };
        match serde_yaml::from_value(v.clone()) {
            Ok(entry) => {
                out.insert(id.to_string(), entry);
            }
            Err(err) => tracing::warn!(id, %err, "skipping malformed {what}"),
        }
    }
    out
}

fn missing_artifact(what: &str, path: &Path) -> ResolveError {
    ResolveError::MissingArtifact(format!("{what} not found at {}", path.display()))
}

fn subdirectories(path: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
        .collect();
    dirs.sort();
    dirs
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn posix_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
