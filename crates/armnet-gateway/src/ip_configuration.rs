//! IP configurations of virtual network gateways.

use armnet_core::children::Child;
use armnet_core::resource_id::ResourceId;
use armnet_core::types::{IpAllocationMethod, SubResource};

use crate::models::{GatewayIpConfigurationInner, GatewayIpConfigurationProperties};

/// Subnet and public IP address of a virtual network gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayIpConfiguration {
    inner: GatewayIpConfigurationInner,
}

impl Child for GatewayIpConfiguration {
    type Properties = GatewayIpConfigurationProperties;

    fn from_inner(inner: GatewayIpConfigurationInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &GatewayIpConfigurationInner {
        &self.inner
    }
}

impl GatewayIpConfiguration {
    pub(crate) fn named(name: impl Into<String>) -> Self {
        let mut inner = GatewayIpConfigurationInner::named(name);
        inner.properties_mut().private_ip_allocation_method = Some(IpAllocationMethod::Dynamic);
        Self { inner }
    }

    fn props(&self) -> Option<&GatewayIpConfigurationProperties> {
        self.inner.properties.as_ref()
    }

    pub(crate) fn props_mut(&mut self) -> &mut GatewayIpConfigurationProperties {
        self.inner.properties_mut()
    }

    /// Configuration name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Subnet ID.
    #[must_use]
    pub fn subnet_id(&self) -> Option<&str> {
        self.props()
            .and_then(|p| p.subnet.as_ref())
            .and_then(SubResource::id)
    }

    /// Name of the network the gateway is in.
    #[must_use]
    pub fn network_name(&self) -> Option<String> {
        let id = ResourceId::parse(self.subnet_id()?).ok()?;
        id.name_of("virtualNetworks").map(str::to_string)
    }

    /// Public IP address ID.
    #[must_use]
    pub fn public_ip_address_id(&self) -> Option<&str> {
        self.props()
            .and_then(|p| p.public_ip_address.as_ref())
            .and_then(SubResource::id)
    }
}
