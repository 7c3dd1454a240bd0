//! Workspace configuration resolution.
//!
//! The artifact tree root is always supplied explicitly (CLI flag, env var,
//! or server construction); the engine never consults ambient process state
//! to find it. An optional `airs.config.yaml` at the root may relocate the
//! artifact directories and set scan options; a missing or unparseable
//! config silently yields the defaults, like every other optional artifact.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Optional per-root configuration file name.
pub const CONFIG_FILE: &str = "airs.config.yaml";

const DEFAULT_FLOWS_DIR: &str = "flows";
const DEFAULT_AGENTS_DIR: &str = "agents";
const DEFAULT_GLOSSARY_FILE: &str = "glossary.yaml";
const DEFAULT_WAKEUP_FILE: &str = "wakeup-intents.yaml";
const DEFAULT_DOC_KEY: &str = "airsref";

/// Effective paths and options for one workspace root.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    pub root: PathBuf,
    pub flows_dir: PathBuf,
    pub agents_dir: PathBuf,
    pub glossary_file: PathBuf,
    pub wakeup_file: PathBuf,
    /// Front-matter key marking a markdown file as a documentation reference.
    pub doc_frontmatter_key: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    paths: RawPaths,
    #[serde(default)]
    options: RawOptions,
}

#[derive(Debug, Default, Deserialize)]
struct RawPaths {
    flows: Option<String>,
    agents: Option<String>,
    glossary: Option<String>,
    wakeup_intents: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawOptions {
    doc_frontmatter_key: Option<String>,
}

impl WorkspaceConfig {
    /// Resolve the effective configuration for `root`.
    ///
    /// Happens once per invocation; the result is treated as read-only for
    /// the lifetime of the call (or of the server process).
    pub fn discover(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let raw = read_config(&root.join(CONFIG_FILE));

        let resolve = |override_path: Option<String>, default: &str| -> PathBuf {
            let p = PathBuf::from(override_path.as_deref().unwrap_or(default));
            if p.is_absolute() {
                p
            } else {
                root.join(p)
            }
        };

        WorkspaceConfig {
            flows_dir: resolve(raw.paths.flows, DEFAULT_FLOWS_DIR),
            agents_dir: resolve(raw.paths.agents, DEFAULT_AGENTS_DIR),
            glossary_file: resolve(raw.paths.glossary, DEFAULT_GLOSSARY_FILE),
            wakeup_file: resolve(raw.paths.wakeup_intents, DEFAULT_WAKEUP_FILE),
            doc_frontmatter_key: raw
                .options
                .doc_frontmatter_key
                .unwrap_or_else(|| DEFAULT_DOC_KEY.to_string()),
            root,
        }
    }
}

fn read_config(path: &Path) -> RawConfig {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => return RawConfig::default(),
    };
    match serde_yaml::from_str(&text) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "unparseable config, using defaults");
            RawConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = WorkspaceConfig::discover(dir.path());

        assert_eq!(cfg.flows_dir, dir.path().join("flows"));
        assert_eq!(cfg.agents_dir, dir.path().join("agents"));
        assert_eq!(cfg.glossary_file, dir.path().join("glossary.yaml"));
        assert_eq!(cfg.wakeup_file, dir.path().join("wakeup-intents.yaml"));
        assert_eq!(cfg.doc_frontmatter_key, "airsref");
    }

    #[test]
    fn test_config_file_overrides_paths_and_options() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "paths:\n  flows: catalog/flows\n  glossary: catalog/terms.yaml\noptions:\n  doc_frontmatter_key: docref\n",
        )
        .unwrap();

        let cfg = WorkspaceConfig::discover(dir.path());
        assert_eq!(cfg.flows_dir, dir.path().join("catalog/flows"));
        assert_eq!(cfg.glossary_file, dir.path().join("catalog/terms.yaml"));
        // Unset paths keep their defaults
        assert_eq!(cfg.agents_dir, dir.path().join("agents"));
        assert_eq!(cfg.doc_frontmatter_key, "docref");
    }

    #[test]
    fn test_unparseable_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), ": not yaml [").unwrap();

        let cfg = WorkspaceConfig::discover(dir.path());
        assert_eq!(cfg.flows_dir, dir.path().join("flows"));
        assert_eq!(cfg.doc_frontmatter_key, "airsref");
    }
}
