//! Catalog aggregation: one filterable item list across every facet.
//!
//! Construction order is terms, manifest workflows, docs, expert agents,
//! client agents, capabilities; map-backed sources iterate in sorted key
//! order, so consecutive calls against an unchanged tree produce identical
//! sequences.

use serde::Serialize;

use crate::domain::DocRef;
use crate::flow::FlowRef;
use crate::loader::Workspace;
use crate::terms::term_catalog;

/// Filters for a catalog request, applied facet → client → grep.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    /// Keep only items of this facet.
    pub facet: Option<String>,
    /// Case-insensitive literal filter over the fixed field set.
    pub grep: Option<String>,
    /// With `facet = agent`: keep this client's bindings plus expert items.
    pub client: Option<String>,
}

/// Which namespace an agent item belongs to.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Expert,
    Client,
}

/// One catalog item, discriminated by its `facet` tag.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "facet", rename_all = "snake_case")]
pub enum CatalogItem {
    Term {
        id: String,
        label: Option<String>,
        aliases: Vec<String>,
        tags: Vec<String>,
        owner: Option<String>,
    },
    Flow {
        intent: String,
        flow_ref: Option<String>,
        family: Option<String>,
        title: Option<String>,
    },
    Doc {
        #[serde(flatten)]
        doc: DocRef,
    },
    Agent {
        kind: AgentKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        role: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        expert: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        wakeup: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        client: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        agent_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        onboarding: Option<String>,
    },
    Capability {
        id: String,
        roles: Vec<String>,
    },
}

impl CatalogItem {
    /// The facet discriminant, as serialized.
    pub fn facet(&self) -> &'static str {
        match self {
            CatalogItem::Term { .. } => "term",
            CatalogItem::Flow { .. } => "flow",
            CatalogItem::Doc { .. } => "doc",
            CatalogItem::Agent { .. } => "agent",
            CatalogItem::Capability { .. } => "capability",
        }
    }

    /// Literal case-insensitive match over the fixed grep field set:
    /// id, label, aliases, tags, intent, title, client, agent_id, role.
    ///
    /// Fields outside the set (doc fields, capability roles, flow family)
    /// deliberately do not participate.
    fn matches_grep(&self, needle: &str) -> bool {
        let contains = |v: &str| v.to_lowercase().contains(needle);
        let any_contains = |vs: &[String]| vs.iter().any(|v| contains(v));

        match self {
            CatalogItem::Term {
                id,
                label,
                aliases,
                tags,
                ..
            } => {
                contains(id)
                    || label.as_deref().map(contains).unwrap_or(false)
                    || any_contains(aliases)
                    || any_contains(tags)
            }
            CatalogItem::Flow { intent, title, .. } => {
                contains(intent) || title.as_deref().map(contains).unwrap_or(false)
            }
            CatalogItem::Doc { .. } => false,
            CatalogItem::Agent {
                role,
                client,
                agent_id,
                ..
            } => [role, client, agent_id]
                .into_iter()
                .any(|f| f.as_deref().map(contains).unwrap_or(false)),
            CatalogItem::Capability { id, .. } => contains(id),
        }
    }
}

/// A catalog response: the filtered items plus summary counts.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    pub items: Vec<CatalogItem>,
    pub counts: CatalogCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogCounts {
    pub total: usize,
}

/// Aggregate every facet from `workspace` and apply `query`'s filters.
pub fn build_catalog(workspace: &Workspace, query: &CatalogQuery) -> CatalogReport {
    let mut items = Vec::new();

    for term in term_catalog(workspace.glossary(), &workspace.wakeup_intents()) {
        items.push(CatalogItem::Term {
            id: term.id,
            label: term.label,
            aliases: term.aliases,
            tags: term.tags,
            owner: term.owner,
        });
    }

    for entry in workspace.manifest() {
        if let Some(raw) = entry.flow_ref.as_deref() {
            if FlowRef::parse(raw).is_err() {
                tracing::warn!(intent = %entry.intent, flow_ref = raw, "skipping manifest entry with malformed reference");
                continue;
            }
        }
        items.push(CatalogItem::Flow {
            intent: entry.intent,
            flow_ref: entry.flow_ref,
            family: entry.family,
            title: entry.title,
        });
    }

    for doc in workspace.docs() {
        items.push(CatalogItem::Doc { doc });
    }

    let agent_index = workspace.agent_index();
    for (role, refs) in agent_index.experts {
        items.push(CatalogItem::Agent {
            kind: AgentKind::Expert,
            role: Some(role),
            expert: Some(refs.expert),
            wakeup: Some(refs.wakeup),
            client: None,
            agent_id: None,
            onboarding: None,
        });
    }
    for (client, agents) in agent_index.clients {
        for (agent_id, onboarding) in agents {
            items.push(CatalogItem::Agent {
                kind: AgentKind::Client,
                role: None,
                expert: None,
                wakeup: None,
                client: Some(client.clone()),
                agent_id: Some(agent_id),
                onboarding: Some(onboarding),
            });
        }
    }

    for (id, roles) in workspace.capability_matrix() {
        items.push(CatalogItem::Capability { id, roles });
    }

    if let Some(facet) = query.facet.as_deref() {
        items.retain(|item| item.facet() == facet);
    }

    if let (Some(wanted), Some("agent")) = (query.client.as_deref(), query.facet.as_deref()) {
        items.retain(|item| match item {
            CatalogItem::Agent {
                kind: AgentKind::Client,
                client,
                ..
            } => client.as_deref() == Some(wanted),
            _ => true,
        });
    }

    if let Some(grep) = query.grep.as_deref() {
        let needle = grep.to_lowercase();
        items.retain(|item| item.matches_grep(&needle));
    }

    CatalogReport {
        counts: CatalogCounts {
            total: items.len(),
        },
        items,
    }
}
