//! Capability → role derivation from a workflow's first actionable step.
//!
//! Only the first structured step of a sequence participates; later steps
//! are ignored. The step's all-required and any-of capability lists are
//! unioned without distinguishing their logical meaning, a known,
//! deliberately preserved simplification: correcting it would change the
//! routing recommendations external consumers already agree on.

use std::collections::BTreeSet;

use crate::domain::{CapabilityMatrix, Step};

/// Derive the responsible roles for a step sequence.
///
/// Returns the union of the matrix roles for every capability named by the
/// first structured step, sorted by name for determinism. Empty when the
/// sequence has no structured step or no capability maps to a role.
pub fn required_roles(steps: &[Step], matrix: &CapabilityMatrix) -> Vec<String> {
    let Some(first) = steps.iter().find_map(Step::as_action) else {
        return Vec::new();
    };

    let capabilities: BTreeSet<&str> = first
        .requires_caps
        .iter()
        .chain(first.requires_caps_any.iter())
        .map(String::as_str)
        .collect();

    let mut roles = BTreeSet::new();
    for capability in capabilities {
        if let Some(mapped) = matrix.get(capability) {
            roles.extend(mapped.iter().cloned());
        }
    }

    roles.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActionStep;

    fn action(all: &[&str], any: &[&str]) -> Step {
        Step::Action(ActionStep {
            requires_caps: all.iter().map(|s| s.to_string()).collect(),
            requires_caps_any: any.iter().map(|s| s.to_string()).collect(),
            extra: Default::default(),
        })
    }

    fn marker() -> Step {
        Step::Marker(serde_yaml::Value::String("notify_only".to_string()))
    }

    fn matrix(pairs: &[(&str, &[&str])]) -> CapabilityMatrix {
        pairs
            .iter()
            .map(|(cap, roles)| {
                (
                    cap.to_string(),
                    roles.iter().map(|r| r.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_all_of_and_any_of_are_unioned_and_sorted() {
        let steps = vec![action(&["c1"], &["c2"])];
        let matrix = matrix(&[("c1", &["roleA"]), ("c2", &["roleB"])]);

        assert_eq!(required_roles(&steps, &matrix), vec!["roleA", "roleB"]);
    }

    #[test]
    fn test_scalar_markers_are_skipped() {
        let steps = vec![marker(), action(&["c1"], &[])];
        let matrix = matrix(&[("c1", &["roleA"])]);

        assert_eq!(required_roles(&steps, &matrix), vec!["roleA"]);
    }

    #[test]
    fn test_only_the_first_structured_step_counts() {
        let steps = vec![action(&["c1"], &[]), action(&["c2"], &[])];
        let matrix = matrix(&[("c1", &["roleA"]), ("c2", &["roleB"])]);

        assert_eq!(required_roles(&steps, &matrix), vec!["roleA"]);
    }

    #[test]
    fn test_unknown_capability_contributes_no_roles() {
        let steps = vec![action(&["c1", "unmapped"], &[])];
        let matrix = matrix(&[("c1", &["roleA"])]);

        assert_eq!(required_roles(&steps, &matrix), vec!["roleA"]);
    }

    #[test]
    fn test_duplicate_roles_across_capabilities_collapse() {
        let steps = vec![action(&["c1"], &["c2"])];
        let matrix = matrix(&[("c1", &["shared", "roleA"]), ("c2", &["shared"])]);

        assert_eq!(required_roles(&steps, &matrix), vec!["roleA", "shared"]);
    }

    #[test]
    fn test_no_structured_step_yields_empty() {
        let matrix = matrix(&[("c1", &["roleA"])]);

        assert!(required_roles(&[], &matrix).is_empty());
        assert!(required_roles(&[marker(), marker()], &matrix).is_empty());
    }
}
