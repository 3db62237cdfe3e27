//! NIC IP configurations and their definition stages.

use armnet_core::children::{insert_child, Child};
use armnet_core::resource_id::ResourceId;
use armnet_core::types::{reference_ids, IpAllocationMethod, IpVersion, SubResource};

use crate::models::{NicIpConfigurationInner, NicIpConfigurationProperties};
use crate::nic::NetworkInterface;

/// An IP configuration of a network interface.
#[derive(Debug, Clone, PartialEq)]
pub struct NicIpConfiguration {
    inner: NicIpConfigurationInner,
}

impl Child for NicIpConfiguration {
    type Properties = NicIpConfigurationProperties;

    fn from_inner(inner: NicIpConfigurationInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &NicIpConfigurationInner {
        &self.inner
    }
}

impl NicIpConfiguration {
    fn props(&self) -> Option<&NicIpConfigurationProperties> {
        self.inner.properties.as_ref()
    }

    pub(crate) fn props_mut(&mut self) -> &mut NicIpConfigurationProperties {
        self.inner.properties_mut()
    }

    /// Configuration name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Whether this is the primary configuration.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.props().and_then(|p| p.primary).unwrap_or(false)
    }

    /// Private address.
    #[must_use]
    pub fn private_ip_address(&self) -> Option<&str> {
        self.props().and_then(|p| p.private_ip_address.as_deref())
    }

    /// Static or dynamic private address.
    #[must_use]
    pub fn private_ip_allocation_method(&self) -> Option<IpAllocationMethod> {
        self.props().and_then(|p| p.private_ip_allocation_method)
    }

    /// Private address family.
    #[must_use]
    pub fn private_ip_address_version(&self) -> Option<IpVersion> {
        self.props().and_then(|p| p.private_ip_address_version)
    }

    /// Subnet ID.
    #[must_use]
    pub fn subnet_id(&self) -> Option<&str> {
        self.props()
            .and_then(|p| p.subnet.as_ref())
            .and_then(SubResource::id)
    }

    /// Name of the network the subnet belongs to.
    #[must_use]
    pub fn network_name(&self) -> Option<String> {
        let id = ResourceId::parse(self.subnet_id()?).ok()?;
        id.name_of("virtualNetworks").map(str::to_string)
    }

    /// Name of the subnet.
    #[must_use]
    pub fn subnet_name(&self) -> Option<String> {
        let id = ResourceId::parse(self.subnet_id()?).ok()?;
        id.name_of("subnets").map(str::to_string)
    }

    /// Public IP address ID.
    #[must_use]
    pub fn public_ip_address_id(&self) -> Option<&str> {
        self.props()
            .and_then(|p| p.public_ip_address.as_ref())
            .and_then(SubResource::id)
    }

    /// Load balancer backend pool IDs.
    #[must_use]
    pub fn load_balancer_backend_ids(&self) -> Vec<String> {
        reference_ids(self.props().and_then(|p| p.load_balancer_backend_address_pools.as_ref()))
    }

    /// Load balancer inbound NAT rule IDs.
    #[must_use]
    pub fn load_balancer_inbound_nat_rule_ids(&self) -> Vec<String> {
        reference_ids(self.props().and_then(|p| p.load_balancer_inbound_nat_rules.as_ref()))
    }

    /// Application gateway backend pool IDs.
    #[must_use]
    pub fn application_gateway_backend_ids(&self) -> Vec<String> {
        reference_ids(
            self.props()
                .and_then(|p| p.application_gateway_backend_address_pools.as_ref()),
        )
    }
}

pub(crate) fn set_private_ip(props: &mut NicIpConfigurationProperties, static_ip: Option<String>) {
    match static_ip {
        Some(ip) => {
            props.private_ip_allocation_method = Some(IpAllocationMethod::Static);
            props.private_ip_address = Some(ip);
        }
        None => {
            props.private_ip_allocation_method = Some(IpAllocationMethod::Dynamic);
            props.private_ip_address = None;
        }
    }
}

/// Definition or update of a secondary IP configuration.
#[derive(Debug, Clone)]
pub struct NicIpConfigurationDefinition {
    parent: NetworkInterface,
    config: NicIpConfiguration,
}

impl NicIpConfigurationDefinition {
    pub(crate) fn new(parent: NetworkInterface, config: NicIpConfiguration) -> Self {
        Self { parent, config }
    }

    /// Place the configuration in a subnet. Defaults to the primary subnet.
    #[must_use]
    pub fn with_existing_subnet(mut self, subnet_id: impl Into<String>) -> Self {
        self.config.props_mut().subnet = Some(SubResource::new(subnet_id));
        self
    }

    /// Let the platform assign the private address.
    #[must_use]
    pub fn with_private_ip_dynamic(mut self) -> Self {
        set_private_ip(self.config.props_mut(), None);
        self
    }

    /// Use a fixed private address.
    #[must_use]
    pub fn with_private_ip_static(mut self, ip: impl Into<String>) -> Self {
        set_private_ip(self.config.props_mut(), Some(ip.into()));
        self
    }

    /// Set the private address family.
    #[must_use]
    pub fn with_private_ip_version(mut self, version: IpVersion) -> Self {
        self.config.props_mut().private_ip_address_version = Some(version);
        self
    }

    /// Associate an existing public IP address.
    #[must_use]
    pub fn with_existing_public_ip(mut self, public_ip_id: impl Into<String>) -> Self {
        self.config.props_mut().public_ip_address = Some(SubResource::new(public_ip_id));
        self
    }

    /// Remove the public IP address.
    #[must_use]
    pub fn without_public_ip(mut self) -> Self {
        self.config.props_mut().public_ip_address = None;
        self
    }

    /// Add the configuration to its network interface.
    #[must_use]
    pub fn attach(self) -> NetworkInterface {
        let Self { mut parent, config } = self;
        insert_child(parent.ip_configurations_mut(), config);
        parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, MockTransport};
    use armnet_core::TopLevelResource;

    const SUBNET: &str =
        "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet1/subnets/back";

    #[test]
    fn secondary_configuration_attaches() {
        let nic = NetworkInterface::define(context(MockTransport::new()), "nic1".into())
            .define_secondary_ip_configuration("second")
            .with_existing_subnet(SUBNET)
            .with_private_ip_static("10.0.2.9")
            .attach();

        let config = &nic.ip_configurations()["second"];
        assert!(!config.is_primary());
        assert_eq!(config.private_ip_address(), Some("10.0.2.9"));
        assert_eq!(config.private_ip_allocation_method(), Some(IpAllocationMethod::Static));
        assert_eq!(config.network_name().as_deref(), Some("vnet1"));
        assert_eq!(config.subnet_name().as_deref(), Some("back"));
    }

    #[test]
    fn dynamic_clears_static_address() {
        let mut props = NicIpConfigurationProperties::default();
        set_private_ip(&mut props, Some("10.0.0.5".into()));
        set_private_ip(&mut props, None);
        assert_eq!(props.private_ip_address, None);
        assert_eq!(props.private_ip_allocation_method, Some(IpAllocationMethod::Dynamic));
    }
}
