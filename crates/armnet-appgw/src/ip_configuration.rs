//! Gateway IP configurations.

use armnet_core::children::Child;
use armnet_core::types::SubResource;

use crate::models::{IpConfigurationInner, IpConfigurationProperties};

/// The subnet an application gateway's instances run in.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayIpConfiguration {
    inner: IpConfigurationInner,
}

impl Child for GatewayIpConfiguration {
    type Properties = IpConfigurationProperties;

    fn from_inner(inner: IpConfigurationInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &IpConfigurationInner {
        &self.inner
    }
}

impl GatewayIpConfiguration {
    pub(crate) fn named(name: impl Into<String>) -> Self {
        Self {
            inner: IpConfigurationInner::named(name),
        }
    }

    /// Configuration name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Subnet ID.
    #[must_use]
    pub fn subnet_id(&self) -> Option<&str> {
        self.inner
            .properties
            .as_ref()
            .and_then(|p| p.subnet.as_ref())
            .and_then(SubResource::id)
    }

    pub(crate) fn set_subnet(&mut self, subnet_id: impl Into<String>) {
        self.inner.properties_mut().subnet = Some(SubResource::new(subnet_id));
    }
}
