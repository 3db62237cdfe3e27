//! Backend address pools.

use armnet_core::children::{referenced_name, Child};
use armnet_core::types::reference_ids;

use crate::models::{BackendInner, BackendProperties};

/// A backend address pool of a load balancer.
///
/// Pools are filled from the NIC side: a NIC IP configuration joins a pool by
/// referencing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Backend {
    inner: BackendInner,
}

impl Child for Backend {
    type Properties = BackendProperties;

    fn from_inner(inner: BackendInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &BackendInner {
        &self.inner
    }
}

impl Backend {
    pub(crate) fn named(name: impl Into<String>) -> Self {
        Self {
            inner: BackendInner::named(name),
        }
    }

    /// Pool name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// IDs of the NIC IP configurations in the pool.
    #[must_use]
    pub fn backend_ip_configuration_ids(&self) -> Vec<String> {
        reference_ids(
            self.inner
                .properties
                .as_ref()
                .and_then(|p| p.backend_ip_configurations.as_ref()),
        )
    }

    /// Names of the balancing rules targeting the pool, as reported by the provider.
    #[must_use]
    pub fn load_balancing_rule_names(&self) -> Vec<&str> {
        self.inner
            .properties
            .as_ref()
            .and_then(|p| p.load_balancing_rules.as_ref())
            .map(|refs| refs.iter().filter_map(|r| referenced_name(Some(r))).collect())
            .unwrap_or_default()
    }
}
