//! Backend address pools.

use armnet_core::children::{insert_child, Child};

use crate::gateway::ApplicationGateway;
use crate::models::{BackendAddress, BackendInner, BackendProperties};

/// A backend address pool of an application gateway.
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
        Self::from_inner(BackendInner::named(name))
    }

    fn addresses(&self) -> impl Iterator<Item = &BackendAddress> {
        self.inner
            .properties
            .as_ref()
            .and_then(|p| p.backend_addresses.as_ref())
            .into_iter()
            .flatten()
    }

    fn addresses_mut(&mut self) -> &mut Vec<BackendAddress> {
        self.inner
            .properties_mut()
            .backend_addresses
            .get_or_insert_with(Vec::new)
    }

    /// Pool name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// IP addresses in the pool.
    #[must_use]
    pub fn ip_addresses(&self) -> Vec<&str> {
        self.addresses().filter_map(|a| a.ip_address.as_deref()).collect()
    }

    /// Host names in the pool.
    #[must_use]
    pub fn fqdns(&self) -> Vec<&str> {
        self.addresses().filter_map(|a| a.fqdn.as_deref()).collect()
    }

    /// Whether the pool contains the IP address.
    #[must_use]
    pub fn contains_ip_address(&self, ip: &str) -> bool {
        self.ip_addresses().contains(&ip)
    }

    pub(crate) fn add_ip_address(&mut self, ip: &str) {
        if !self.contains_ip_address(ip) {
            self.addresses_mut().push(BackendAddress {
                ip_address: Some(ip.to_string()),
                fqdn: None,
            });
        }
    }

    fn add_fqdn(&mut self, fqdn: &str) {
        if !self.fqdns().contains(&fqdn) {
            self.addresses_mut().push(BackendAddress {
                ip_address: None,
                fqdn: Some(fqdn.to_string()),
            });
        }
    }
}

/// Definition or update of a backend pool.
#[derive(Debug, Clone)]
pub struct BackendDefinition {
    parent: ApplicationGateway,
    backend: Backend,
}

impl BackendDefinition {
    pub(crate) fn new(parent: ApplicationGateway, backend: Backend) -> Self {
        Self { parent, backend }
    }

    /// Add an IP address. Duplicates are ignored.
    #[must_use]
    pub fn with_ip_address(mut self, ip: &str) -> Self {
        self.backend.add_ip_address(ip);
        self
    }

    /// Add a host name. Duplicates are ignored.
    #[must_use]
    pub fn with_fqdn(mut self, fqdn: &str) -> Self {
        self.backend.add_fqdn(fqdn);
        self
    }

    /// Remove an IP address.
    #[must_use]
    pub fn without_ip_address(mut self, ip: &str) -> Self {
        self.backend
            .addresses_mut()
            .retain(|a| a.ip_address.as_deref() != Some(ip));
        self
    }

    /// Remove a host name.
    #[must_use]
    pub fn without_fqdn(mut self, fqdn: &str) -> Self {
        self.backend
            .addresses_mut()
            .retain(|a| a.fqdn.as_deref() != Some(fqdn));
        self
    }

    /// Add the pool to its gateway.
    #[must_use]
    pub fn attach(self) -> ApplicationGateway {
        let Self { mut parent, backend } = self;
        insert_child(parent.backends_mut(), backend);
        parent
    }
}
