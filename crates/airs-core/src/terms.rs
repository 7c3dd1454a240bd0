//! Free-text term → canonical intent resolution.
//!
//! Matching is bounded lexical scoring, nothing more: an exact id match
//! dominates unconditionally, then a scored pass accumulates weights per
//! matching field. The weights are inherited behavior and load-bearing for
//! external consumers; do not retune them.

use crate::domain::{Term, WakeupMatrix};

/// `label` or `id` equals the term case-insensitively.
pub const SCORE_FIELD_EXACT: u32 = 4;
/// `label` or `id` contains the term case-insensitively.
pub const SCORE_FIELD_CONTAINS: u32 = 2;
/// An alias or tag equals the term case-insensitively.
pub const SCORE_ALIAS_EXACT: u32 = 3;
/// An alias or tag contains the term case-insensitively.
pub const SCORE_ALIAS_CONTAINS: u32 = 1;

/// Build the term catalog: the authored glossary when it has entries,
/// otherwise one minimal derived term per wakeup intent (id + aliases only).
pub fn term_catalog(glossary: Vec<Term>, wakeup: &WakeupMatrix) -> Vec<Term> {
    if !glossary.is_empty() {
        return glossary;
    }
    wakeup
        .intents
        .iter()
        .map(|intent| Term {
            id: intent.clone(),
            aliases: wakeup.aliases.get(intent).cloned().unwrap_or_default(),
            ..Term::default()
        })
        .collect()
}

/// Resolve a free-text term to an intent id, or none.
///
/// Ties at the maximum score keep the earliest catalog entry; catalogs are
/// ordered sequences, so the outcome is deterministic. An empty term
/// resolves to none, since the containment heuristic would otherwise match
/// every entry.
pub fn resolve_term(catalog: &[Term], term: &str) -> Option<String> {
    if term.is_empty() {
        return None;
    }

    // Exact id membership dominates all scoring.
    if catalog.iter().any(|t| t.id == term) {
        return Some(term.to_string());
    }

    let needle = term.to_lowercase();
    let mut best: Option<&str> = None;
    let mut best_score = 0u32;

    for entry in catalog {
        let mut score = 0u32;
        for field in [entry.label.as_deref().unwrap_or(""), entry.id.as_str()] {
            let value = field.to_lowercase();
            if value == needle {
                score += SCORE_FIELD_EXACT;
            } else if value.contains(&needle) {
                score += SCORE_FIELD_CONTAINS;
            }
        }
        for value in entry.aliases.iter().chain(entry.tags.iter()) {
            let value = value.to_lowercase();
            if value == needle {
                score += SCORE_ALIAS_EXACT;
            } else if value.contains(&needle) {
                score += SCORE_ALIAS_CONTAINS;
            }
        }
        if score > best_score {
            best_score = score;
            best = Some(&entry.id);
        }
    }

    best.map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(id: &str) -> Term {
        Term {
            id: id.to_string(),
            ..Term::default()
        }
    }

    #[test]
    fn test_exact_id_wins_over_higher_lexical_score() {
        // "deploy" is also the label, an alias, and a tag of the second
        // entry, which would score far above the first entry's bare id.
        let catalog = vec![
            term("deploy"),
            Term {
                id: "release.ship".to_string(),
                label: Some("Deploy".to_string()),
                aliases: vec!["deploy".to_string(), "deploy-now".to_string()],
                tags: vec!["deploy".to_string()],
                ..Term::default()
            },
        ];

        assert_eq!(resolve_term(&catalog, "deploy"), Some("deploy".to_string()));
    }

    #[test]
    fn test_scored_pass_prefers_alias_equality_over_containment() {
        let catalog = vec![
            Term {
                id: "session.start".to_string(),
                aliases: vec!["wake-session".to_string()],
                ..Term::default()
            },
            Term {
                id: "session.stop".to_string(),
                aliases: vec!["wake".to_string()],
                ..Term::default()
            },
        ];

        // "wake": containment in the first entry's alias (+1) loses to
        // equality with the second entry's alias (+3).
        assert_eq!(
            resolve_term(&catalog, "wake"),
            Some("session.stop".to_string())
        );
    }

    #[test]
    fn test_field_containment_is_case_insensitive() {
        let catalog = vec![Term {
            id: "incident.triage".to_string(),
            label: Some("Incident Triage".to_string()),
            ..Term::default()
        }];

        assert_eq!(
            resolve_term(&catalog, "TRIAGE"),
            Some("incident.triage".to_string())
        );
    }

    #[test]
    fn test_tie_keeps_earliest_catalog_entry() {
        let catalog = vec![
            Term {
                id: "alpha.flow".to_string(),
                aliases: vec!["shared-alias".to_string()],
                ..Term::default()
            },
            Term {
                id: "beta.flow".to_string(),
                aliases: vec!["shared-alias".to_string()],
                ..Term::default()
            },
        ];

        assert_eq!(
            resolve_term(&catalog, "shared-alias"),
            Some("alpha.flow".to_string())
        );
    }

    #[test]
    fn test_zero_score_and_empty_term_resolve_to_none() {
        let catalog = vec![term("session.start")];

        assert_eq!(resolve_term(&catalog, "unrelated"), None);
        assert_eq!(resolve_term(&catalog, ""), None);
    }

    #[test]
    fn test_catalog_derives_from_wakeup_when_glossary_empty() {
        let wakeup = WakeupMatrix {
            intents: vec!["session.start".to_string()],
            aliases: [(
                "session.start".to_string(),
                vec!["boot".to_string(), "wake".to_string()],
            )]
            .into_iter()
            .collect(),
        };

        let catalog = term_catalog(Vec::new(), &wakeup);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].id, "session.start");
        assert_eq!(catalog[0].aliases.len(), 2);
        assert!(catalog[0].label.is_none());

        assert_eq!(
            resolve_term(&catalog, "boot"),
            Some("session.start".to_string())
        );
    }

    #[test]
    fn test_authored_glossary_takes_precedence_over_wakeup() {
        let wakeup = WakeupMatrix {
            intents: vec!["wakeup.only".to_string()],
            ..WakeupMatrix::default()
        };
        let catalog = term_catalog(vec![term("authored.term")], &wakeup);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].id, "authored.term");
    }
}
