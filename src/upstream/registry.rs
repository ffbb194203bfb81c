//! Static upstream registry.
//!
//! # Responsibilities
//! - Turn upstream configuration into immutable `Upstream` entries
//! - Resolve upstream names for the router and forwarder
//! - Hold the designated default upstream
//!
//! # Design Decisions
//! - Built once at startup, never mutated (thread-safe without locks)
//! - Exactly one origin per upstream; there is no balancing across instances

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{PoolConfig, UpstreamConfig};
use crate::upstream::origin::{Origin, OriginError};

/// A configured backend origin plus its transport parameters.
#[derive(Debug)]
pub struct Upstream {
    /// Logical name referenced by route rules.
    pub name: String,
    /// Network endpoint of this upstream.
    pub origin: Origin,
    /// Connection pooling parameters.
    pub pool: PoolConfig,
    /// Per-upstream trust decision: skip certificate verification.
    pub skip_tls_verify: bool,
}

/// Errors raised while building the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("upstream {name}: {source}")]
    InvalidOrigin {
        name: String,
        #[source]
        source: OriginError,
    },

    #[error("duplicate upstream name: {0}")]
    DuplicateName(String),

    #[error("default upstream is not configured: {0}")]
    UnknownDefault(String),
}

/// Immutable name → upstream mapping with a designated default.
#[derive(Debug)]
pub struct UpstreamRegistry {
    upstreams: HashMap<String, Arc<Upstream>>,
    default_name: String,
}

impl UpstreamRegistry {
    /// Build the registry from configuration. Fatal on any inconsistency;
    /// the process must not serve traffic with a partial registry.
    pub fn from_config(
        configs: &[UpstreamConfig],
        default_upstream: &str,
    ) -> Result<Self, RegistryError> {
        let mut upstreams = HashMap::with_capacity(configs.len());
        for config in configs {
            let origin =
                Origin::parse(&config.origin).map_err(|source| RegistryError::InvalidOrigin {
                    name: config.name.clone(),
                    source,
                })?;
            let upstream = Arc::new(Upstream {
                name: config.name.clone(),
                origin,
                pool: config.pool.clone(),
                skip_tls_verify: config.skip_tls_verify,
            });
            if upstreams.insert(config.name.clone(), upstream).is_some() {
                return Err(RegistryError::DuplicateName(config.name.clone()));
            }
        }

        if !upstreams.contains_key(default_upstream) {
            return Err(RegistryError::UnknownDefault(default_upstream.to_string()));
        }

        Ok(Self {
            upstreams,
            default_name: default_upstream.to_string(),
        })
    }

    /// Look up an upstream by name.
    pub fn get(&self, name: &str) -> Option<Arc<Upstream>> {
        self.upstreams.get(name).cloned()
    }

    /// The upstream used when no route rule matches.
    pub fn default_upstream(&self) -> Arc<Upstream> {
        // Existence is checked in from_config.
        self.upstreams[&self.default_name].clone()
    }

    /// Iterate over all registered upstreams.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Upstream>> {
        self.upstreams.values()
    }

    /// Number of registered upstreams.
    pub fn len(&self) -> usize {
        self.upstreams.len()
    }
}
