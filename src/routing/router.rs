//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled route rules
//! - Resolve a request path to an upstream name
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Ordered scan, first match wins; declaration order is priority order
//! - No-match falls through to the designated default upstream, so every
//!   request resolves to exactly one target

use crate::config::RouteConfig;
use crate::routing::matcher::{ContainsMatcher, Matcher};

/// A compiled (predicate, target) pair.
#[derive(Debug)]
pub struct RouteRule {
    /// Rule identifier for logging.
    pub name: String,
    /// Path predicate.
    matcher: Box<dyn Matcher>,
    /// Target upstream name.
    pub target: String,
}

/// Ordered route table evaluated for every proxied request.
#[derive(Debug)]
pub struct Router {
    rules: Vec<RouteRule>,
    default_target: String,
}

impl Router {
    /// Compile route rules from configuration.
    pub fn from_config(routes: &[RouteConfig], default_upstream: &str) -> Self {
        let rules = routes
            .iter()
            .map(|route| RouteRule {
                name: route.name.clone(),
                matcher: Box::new(ContainsMatcher::new(route.path_contains.clone())) as Box<dyn Matcher>,
                target: route.upstream.clone(),
            })
            .collect();

        Self {
            rules,
            default_target: default_upstream.to_string(),
        }
    }

    /// Resolve a path to an upstream name.
    ///
    /// Pure: no I/O, no mutation, deterministic for a given rule set.
    pub fn route(&self, path: &str) -> &str {
        for rule in &self.rules {
            if rule.matcher.matches(path) {
                return &rule.target;
            }
        }
        &self.default_target
    }

    /// Name of the rule that matched, for logging. `None` means default.
    pub fn matching_rule(&self, path: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(path))
            .map(|rule| rule.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;

    fn reference_router() -> Router {
        let config = ProxyConfig::default();
        Router::from_config(&config.routes, &config.default_upstream)
    }

    #[test]
    fn artifactory_substring_routes_internally() {
        let router = reference_router();
        assert_eq!(router.route("/artifactory/api/repo"), "internal-artifactory");
        assert_eq!(router.route("/deep/artifactory/thing"), "internal-artifactory");
        assert_eq!(router.route("/x/artifactory/"), "internal-artifactory");
    }

    #[test]
    fn blackduck_integration_routes_publicly() {
        let router = reference_router();
        assert_eq!(router.route("/blackduck/integration/v1/info"), "public-artifactory");
        assert_eq!(router.route("/api/blackduck/integration"), "public-artifactory");
    }

    #[test]
    fn first_match_wins_when_both_substrings_present() {
        let router = reference_router();
        // Rule order, not specificity, decides.
        assert_eq!(
            router.route("/artifactory/blackduck/integration"),
            "internal-artifactory"
        );
        assert_eq!(
            router.route("/blackduck/integration/artifactory/x"),
            "internal-artifactory"
        );
    }

    #[test]
    fn everything_else_falls_through_to_default() {
        let router = reference_router();
        assert_eq!(router.route("/anything/else"), "product");
        assert_eq!(router.route("/"), "product");
        assert_eq!(router.route("/artifactory"), "product"); // no trailing slash
    }

    #[test]
    fn matching_rule_reports_default_as_none() {
        let router = reference_router();
        assert_eq!(router.matching_rule("/artifactory/x"), Some("internal-artifactory"));
        assert_eq!(router.matching_rule("/other"), None);
    }

    #[test]
    fn routing_is_deterministic() {
        let router = reference_router();
        for _ in 0..3 {
            assert_eq!(router.route("/artifactory/api"), "internal-artifactory");
        }
    }
}
