//! Strategy-ordered routing from request attributes to a flow reference.
//!
//! Strategies form a priority list, not a set: the first matching strategy
//! wins unconditionally and authored order is the sole tie-break. An input
//! the caller did not supply never matches a rule requiring it. When no
//! strategy matches and an intent was supplied, the workflow manifest's
//! catalog serves as a direct-lookup fallback. An unresolved route is a
//! normal `None` outcome.

use regex::Regex;
use serde::Serialize;

use crate::domain::{ManifestEntry, MatchRule, Strategy};

/// The routable attributes of one request.
#[derive(Debug, Clone, Default)]
pub struct RouteQuery {
    pub intent: Option<String>,
    pub tags: Vec<String>,
    pub subject: Option<String>,
    pub action_key: Option<String>,
}

/// Where a route outcome came from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    Strategy,
    ManifestFallback,
}

/// The strategies evaluated on the way to an outcome.
#[derive(Debug, Clone, Serialize)]
pub struct RouteTrace {
    /// The winning strategy, if any strategy matched.
    pub matched: Option<Strategy>,
    /// Strategies evaluated (and rejected) before the winner.
    pub candidates: Vec<Strategy>,
    /// Which mechanism produced the outcome; none when unresolved.
    pub source: Option<RouteSource>,
}

/// A routing decision plus its evaluation trace.
#[derive(Debug, Clone, Serialize)]
pub struct RouteOutcome {
    pub flow_ref: Option<String>,
    pub trace: RouteTrace,
}

/// Evaluate `strategies` in authored order against `query`.
pub fn route(
    strategies: &[Strategy],
    manifest: &[ManifestEntry],
    query: &RouteQuery,
) -> RouteOutcome {
    let mut candidates = Vec::new();

    for strategy in strategies {
        if matches(&strategy.matcher, query) {
            tracing::debug!(flow = %strategy.route.flow, "strategy matched");
            return RouteOutcome {
                flow_ref: Some(strategy.route.flow.clone()),
                trace: RouteTrace {
                    matched: Some(strategy.clone()),
                    candidates,
                    source: Some(RouteSource::Strategy),
                },
            };
        }
        candidates.push(strategy.clone());
    }

    if let Some(intent) = query.intent.as_deref() {
        if let Some(entry) = manifest.iter().find(|e| e.intent == intent) {
            tracing::debug!(intent, "no strategy matched, using manifest fallback");
            return RouteOutcome {
                flow_ref: entry.flow_ref.clone(),
                trace: RouteTrace {
                    matched: None,
                    candidates,
                    source: Some(RouteSource::ManifestFallback),
                },
            };
        }
    }

    RouteOutcome {
        flow_ref: None,
        trace: RouteTrace {
            matched: None,
            candidates,
            source: None,
        },
    }
}

fn matches(rule: &MatchRule, query: &RouteQuery) -> bool {
    match rule {
        MatchRule::Intent { value } => query.intent.as_deref() == Some(value.as_str()),
        MatchRule::Tags { any_of } => {
            !query.tags.is_empty() && any_of.iter().any(|t| query.tags.contains(t))
        }
        MatchRule::Subject { regex } => {
            let Some(subject) = query.subject.as_deref() else {
                return false;
            };
            match Regex::new(regex) {
                Ok(re) => re.is_match(subject),
                Err(err) => {
                    // Authoring defect in the rule file, not a caller error.
                    tracing::warn!(regex, %err, "invalid subject pattern never matches");
                    false
                }
            }
        }
        MatchRule::ActionKey { value } => query.action_key.as_deref() == Some(value.as_str()),
    }
}
