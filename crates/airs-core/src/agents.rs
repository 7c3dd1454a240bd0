//! Role → candidate agent binding for a requesting client.
//!
//! Binding is exact slug equality only, no fuzzy matching at this stage.
//! An unknown client or an absent agent tree yields an empty result, never
//! an error.

use serde::Serialize;

use crate::domain::AgentIndex;

/// A resolved pairing of a client, a role, and an onboarding reference.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentBinding {
    pub client: String,
    pub role: String,
    pub onboarding: String,
}

/// Slug a role name: lowercase, every run of non-alphanumeric characters
/// collapses to a single hyphen, leading/trailing hyphens trimmed.
pub fn slugify(role: &str) -> String {
    let mut slug = String::with_capacity(role.len());
    for c in role.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Bind each role to the client's agent whose id equals the role's slug.
///
/// Bindings come out in role order.
pub fn bind_agents(index: &AgentIndex, client: Option<&str>, roles: &[String]) -> Vec<AgentBinding> {
    let Some(client) = client else {
        return Vec::new();
    };
    let Some(agents) = index.clients.get(client) else {
        return Vec::new();
    };

    let mut bindings = Vec::new();
    for role in roles {
        if let Some(onboarding) = agents.get(&slugify(role)) {
            bindings.push(AgentBinding {
                client: client.to_string(),
                role: role.clone(),
                onboarding: onboarding.clone(),
            });
        }
    }
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn index_with(client: &str, agents: &[(&str, &str)]) -> AgentIndex {
        let mut index = AgentIndex::default();
        index.clients.insert(
            client.to_string(),
            agents
                .iter()
                .map(|(id, onboarding)| (id.to_string(), onboarding.to_string()))
                .collect::<BTreeMap<_, _>>(),
        );
        index
    }

    #[test]
    fn test_slugify_collapses_and_trims() {
        assert_eq!(slugify("Data Engineer"), "data-engineer");
        assert_eq!(slugify("SRE / On-Call!!"), "sre-on-call");
        assert_eq!(slugify("  ops  "), "ops");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_binding_requires_exact_slug_equality() {
        let index = index_with(
            "acme",
            &[("data-engineer", "clients/acme/data-engineer/onboarding.yaml")],
        );
        let roles = vec!["Data Engineer".to_string()];

        let bindings = bind_agents(&index, Some("acme"), &roles);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].client, "acme");
        assert_eq!(bindings[0].role, "Data Engineer");
        assert_eq!(
            bindings[0].onboarding,
            "clients/acme/data-engineer/onboarding.yaml"
        );

        // An underscore variant is not a slug match.
        let near_miss = index_with("acme", &[("data_engineer", "x")]);
        assert!(bind_agents(&near_miss, Some("acme"), &roles).is_empty());
    }

    #[test]
    fn test_unknown_or_absent_client_yields_empty() {
        let index = index_with("acme", &[("ops", "x")]);
        let roles = vec!["ops".to_string()];

        assert!(bind_agents(&index, Some("globex"), &roles).is_empty());
        assert!(bind_agents(&index, None, &roles).is_empty());
        assert!(bind_agents(&AgentIndex::default(), Some("acme"), &roles).is_empty());
    }

    #[test]
    fn test_bindings_preserve_role_order() {
        let index = index_with("acme", &[("data-engineer", "a"), ("sre", "b")]);
        let roles = vec!["SRE".to_string(), "Data Engineer".to_string()];

        let bindings = bind_agents(&index, Some("acme"), &roles);
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].role, "SRE");
        assert_eq!(bindings[1].role, "Data Engineer");
    }
}
