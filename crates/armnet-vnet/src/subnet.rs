//! Subnets and their definition stages.

use armnet_core::children::{insert_child, Child};
use armnet_core::resource_id::ResourceId;
use armnet_core::types::{reference_ids, SubResource};

use crate::cidr::cidr_contains;
use crate::models::{ServiceEndpoint, SubnetInner, SubnetProperties};
use crate::network::Network;

/// A subnet of a virtual network.
#[derive(Debug, Clone, PartialEq)]
pub struct Subnet {
    inner: SubnetInner,
}

impl Child for Subnet {
    type Properties = SubnetProperties;

    fn from_inner(inner: SubnetInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &SubnetInner {
        &self.inner
    }
}

impl Subnet {
    fn props(&self) -> Option<&SubnetProperties> {
        self.inner.properties.as_ref()
    }

    /// Subnet name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Resource ID, once created.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.inner.id.as_deref()
    }

    /// Name of the owning network, derived from the ID.
    #[must_use]
    pub fn parent_network_name(&self) -> Option<String> {
        let id = ResourceId::parse(self.id()?).ok()?;
        id.name_of("virtualNetworks").map(str::to_string)
    }

    /// Address prefix.
    #[must_use]
    pub fn address_prefix(&self) -> Option<&str> {
        self.props().and_then(|p| p.address_prefix.as_deref())
    }

    /// ID of the network security group applied to the subnet.
    #[must_use]
    pub fn network_security_group_id(&self) -> Option<&str> {
        self.props()
            .and_then(|p| p.network_security_group.as_ref())
            .and_then(SubResource::id)
    }

    /// ID of the route table applied to the subnet.
    #[must_use]
    pub fn route_table_id(&self) -> Option<&str> {
        self.props()
            .and_then(|p| p.route_table.as_ref())
            .and_then(SubResource::id)
    }

    /// Services with an endpoint on the subnet.
    #[must_use]
    pub fn services_with_access(&self) -> Vec<&str> {
        self.props()
            .and_then(|p| p.service_endpoints.as_ref())
            .map(|endpoints| endpoints.iter().filter_map(|e| e.service.as_deref()).collect())
            .unwrap_or_default()
    }

    /// IDs of the NIC IP configurations in the subnet.
    #[must_use]
    pub fn network_interface_ip_configuration_ids(&self) -> Vec<String> {
        reference_ids(self.props().and_then(|p| p.ip_configurations.as_ref()))
    }

    /// Whether `ip` falls inside the subnet's prefix.
    #[must_use]
    pub fn contains_ip(&self, ip: &str) -> bool {
        self.address_prefix().is_some_and(|prefix| cidr_contains(prefix, ip))
    }

    pub(crate) fn inner_mut(&mut self) -> &mut SubnetInner {
        &mut self.inner
    }
}

/// Definition or update of a subnet, attached back to its network.
#[derive(Debug, Clone)]
pub struct SubnetDefinition {
    parent: Network,
    subnet: Subnet,
}

impl SubnetDefinition {
    pub(crate) fn new(parent: Network, subnet: Subnet) -> Self {
        Self { parent, subnet }
    }

    fn props(&mut self) -> &mut SubnetProperties {
        self.subnet.inner_mut().properties_mut()
    }

    /// Set the address prefix.
    #[must_use]
    pub fn with_address_prefix(mut self, cidr: impl Into<String>) -> Self {
        self.props().address_prefix = Some(cidr.into());
        self
    }

    /// Apply an existing network security group.
    #[must_use]
    pub fn with_existing_network_security_group(mut self, nsg_id: impl Into<String>) -> Self {
        self.props().network_security_group = Some(SubResource::new(nsg_id));
        self
    }

    /// Remove the network security group.
    #[must_use]
    pub fn without_network_security_group(mut self) -> Self {
        self.props().network_security_group = None;
        self
    }

    /// Apply an existing route table.
    #[must_use]
    pub fn with_existing_route_table(mut self, route_table_id: impl Into<String>) -> Self {
        self.props().route_table = Some(SubResource::new(route_table_id));
        self
    }

    /// Remove the route table.
    #[must_use]
    pub fn without_route_table(mut self) -> Self {
        self.props().route_table = None;
        self
    }

    /// Enable a service endpoint, e.g. `Microsoft.Storage`.
    #[must_use]
    pub fn with_access_from_service(mut self, service: impl Into<String>) -> Self {
        let service = service.into();
        let endpoints = self.props().service_endpoints.get_or_insert_with(Vec::new);
        let exists = endpoints
            .iter()
            .any(|e| e.service.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(&service)));
        if !exists {
            endpoints.push(ServiceEndpoint {
                service: Some(service),
                locations: None,
            });
        }
        self
    }

    /// Disable a service endpoint.
    #[must_use]
    pub fn without_access_from_service(mut self, service: &str) -> Self {
        if let Some(endpoints) = self.props().service_endpoints.as_mut() {
            endpoints.retain(|e| !e.service.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(service)));
        }
        self
    }

    /// Add the subnet to its network, replacing a subnet of the same name.
    #[must_use]
    pub fn attach(self) -> Network {
        let Self { mut parent, subnet } = self;
        insert_child(parent.subnets_mut(), subnet);
        parent
    }
}
