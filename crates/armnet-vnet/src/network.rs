//! Fluent wrapper around a virtual network.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use armnet_core::children::{children_to_inner, index_children, insert_child, Child, ChildMap};
use armnet_core::{ArmContext, Error, ResourceScope, TopLevelResource};
use tracing::debug;

use crate::cidr::cidr_contains;
use crate::models::{
    AddressSpace, IpAddressAvailability, PeeringInner, SubnetInner, VirtualNetworkInner,
    VirtualNetworkProperties,
};
use crate::peering::NetworkPeering;
use crate::subnet::{Subnet, SubnetDefinition};
use crate::Result;

/// Resource type segment of virtual networks.
pub const RESOURCE_TYPE: &str = "virtualNetworks";

const DEFAULT_ADDRESS_SPACE: &str = "10.0.0.0/16";
const DEFAULT_SUBNET: &str = "subnet1";

/// A virtual network with its subnets and peerings.
#[derive(Debug, Clone)]
pub struct Network {
    scope: ResourceScope,
    inner: VirtualNetworkInner,
    subnets: ChildMap<Subnet>,
    peerings: BTreeMap<String, NetworkPeering>,
}

impl TopLevelResource for Network {
    const RESOURCE_TYPE: &'static str = RESOURCE_TYPE;
    type Inner = VirtualNetworkInner;

    fn define(context: ArmContext, name: String) -> Self {
        let mut inner = VirtualNetworkInner::default();
        inner.name = Some(name.clone());
        inner.properties = Some(VirtualNetworkProperties::default());
        Self {
            scope: ResourceScope::new(context, RESOURCE_TYPE, name),
            inner,
            subnets: ChildMap::new(),
            peerings: BTreeMap::new(),
        }
    }

    fn from_inner(context: ArmContext, inner: VirtualNetworkInner) -> Self {
        let scope = ResourceScope::from_inner(context, RESOURCE_TYPE, &inner);
        let mut network = Self {
            scope,
            inner,
            subnets: ChildMap::new(),
            peerings: BTreeMap::new(),
        };
        network.init_children();
        network
    }
}

impl Network {
    fn init_children(&mut self) {
        let props = self.inner.properties.as_ref();
        self.subnets = index_children(props.and_then(|p| p.subnets.clone()));
        let peerings: Vec<PeeringInner> = props
            .and_then(|p| p.virtual_network_peerings.clone())
            .unwrap_or_default();
        self.peerings = peerings
            .into_iter()
            .filter_map(|inner| {
                let name = inner.name.clone().filter(|n| !n.is_empty())?;
                Some((name, NetworkPeering::from_inner(self.scope.context().clone(), inner)))
            })
            .collect();
    }

    /// The wire model. Attached subnets are written back on the next PUT.
    #[must_use]
    pub fn inner(&self) -> &VirtualNetworkInner {
        &self.inner
    }

    /// Consume the wrapper, returning the wire model with the current subnets.
    #[must_use]
    pub fn into_inner(mut self) -> VirtualNetworkInner {
        self.inner.properties_mut().subnets = Some(children_to_inner(&self.subnets));
        self.inner
    }

    fn props(&self) -> Option<&VirtualNetworkProperties> {
        self.inner.properties.as_ref()
    }

    /// Resource ID, once created.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.inner.id.as_deref()
    }

    /// Resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.scope.name()
    }

    /// Resource group name.
    #[must_use]
    pub fn resource_group_name(&self) -> Option<&str> {
        self.scope.resource_group()
    }

    /// Region.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.inner.location.as_deref()
    }

    /// Address prefixes of the network.
    #[must_use]
    pub fn address_spaces(&self) -> Vec<&str> {
        self.props()
            .and_then(|p| p.address_space.as_ref())
            .and_then(|s| s.address_prefixes.as_ref())
            .map(|prefixes| prefixes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// DNS servers handed out to VMs.
    #[must_use]
    pub fn dns_server_ips(&self) -> Vec<&str> {
        self.props()
            .and_then(|p| p.dhcp_options.as_ref())
            .and_then(|d| d.dns_servers.as_ref())
            .map(|servers| servers.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether DDoS protection is enabled.
    #[must_use]
    pub fn ddos_protection_enabled(&self) -> bool {
        self.props()
            .and_then(|p| p.enable_ddos_protection)
            .unwrap_or(false)
    }

    /// Subnets keyed by name.
    #[must_use]
    pub fn subnets(&self) -> &ChildMap<Subnet> {
        &self.subnets
    }

    pub(crate) fn subnets_mut(&mut self) -> &mut ChildMap<Subnet> {
        &mut self.subnets
    }

    /// Peerings keyed by name, as of the last refresh.
    #[must_use]
    pub fn peerings(&self) -> &BTreeMap<String, NetworkPeering> {
        &self.peerings
    }

    /// Whether `ip` falls inside one of the network's address spaces.
    #[must_use]
    pub fn is_private_ip_address_in_network(&self, ip: &str) -> bool {
        self.address_spaces()
            .into_iter()
            .any(|space| cidr_contains(space, ip))
    }

    /// The subnet whose prefix contains `ip`.
    #[must_use]
    pub fn subnet_for_ip(&self, ip: &str) -> Option<&Subnet> {
        self.subnets.values().find(|subnet| subnet.contains_ip(ip))
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.inner.location = Some(region.into());
        self
    }

    /// Place the network in an existing resource group.
    #[must_use]
    pub fn with_existing_resource_group(mut self, resource_group: impl Into<String>) -> Self {
        self.scope.set_resource_group(resource_group);
        self
    }

    /// Add or replace a tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner
            .tags
            .get_or_insert_with(Default::default)
            .insert(key.into(), value.into());
        self
    }

    fn prefixes_mut(&mut self) -> &mut Vec<String> {
        self.inner
            .properties_mut()
            .address_space
            .get_or_insert_with(AddressSpace::default)
            .address_prefixes
            .get_or_insert_with(Vec::new)
    }

    /// Add an address space.
    #[must_use]
    pub fn with_address_space(mut self, cidr: impl Into<String>) -> Self {
        let cidr = cidr.into();
        let prefixes = self.prefixes_mut();
        if !prefixes.contains(&cidr) {
            prefixes.push(cidr);
        }
        self
    }

    /// Remove an address space. Subnets inside it are left alone.
    #[must_use]
    pub fn without_address_space(mut self, cidr: &str) -> Self {
        self.prefixes_mut().retain(|prefix| prefix != cidr);
        self
    }

    /// Add a DNS server.
    #[must_use]
    pub fn with_dns_server(mut self, ip: impl Into<String>) -> Self {
        self.inner
            .properties_mut()
            .dhcp_options
            .get_or_insert_with(Default::default)
            .dns_servers
            .get_or_insert_with(Vec::new)
            .push(ip.into());
        self
    }

    /// Add a subnet with the given prefix.
    #[must_use]
    pub fn with_subnet(self, name: impl Into<String>, cidr: impl Into<String>) -> Self {
        self.define_subnet(name).with_address_prefix(cidr).attach()
    }

    /// Remove a subnet.
    #[must_use]
    pub fn without_subnet(mut self, name: &str) -> Self {
        self.subnets.remove(name);
        self
    }

    /// Start defining a subnet.
    #[must_use]
    pub fn define_subnet(self, name: impl Into<String>) -> SubnetDefinition {
        let subnet = Subnet::from_inner(SubnetInner::named(name));
        SubnetDefinition::new(self, subnet)
    }

    /// Start updating an existing subnet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the network has no such subnet.
    pub fn update_subnet(self, name: &str) -> Result<SubnetDefinition> {
        let subnet = self.subnets.get(name).cloned().ok_or_else(|| {
            Error::NotFound(format!("subnet `{name}` in network `{}`", self.name()))
        })?;
        Ok(SubnetDefinition::new(self, subnet))
    }

    /// Start defining a peering from this network.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when the network's resource group is unknown.
    pub fn define_peering(&self, name: impl Into<String>) -> Result<NetworkPeering> {
        let id = self.scope.id()?;
        Ok(NetworkPeering::define(self.scope.context().clone(), &id, name))
    }

    fn before_put(&mut self) {
        if self.inner.id.is_none() {
            let prefixes = self.prefixes_mut();
            if prefixes.is_empty() {
                prefixes.push(DEFAULT_ADDRESS_SPACE.to_string());
            }
            let first = self.address_spaces().first().map(|s| (*s).to_string());
            if let (true, Some(first)) = (self.subnets.is_empty(), first) {
                let mut subnet = SubnetInner::named(DEFAULT_SUBNET);
                subnet.properties_mut().address_prefix = Some(first);
                insert_child(&mut self.subnets, Subnet::from_inner(subnet));
            }
        }
        self.inner.properties_mut().subnets = Some(children_to_inner(&self.subnets));
    }

    /// Create the network, returning the provider's view of it.
    ///
    /// # Errors
    ///
    /// Fails without a region or resource group, or when the transport fails.
    pub async fn create(mut self) -> Result<Self> {
        self.before_put();
        debug!(name = self.name(), subnets = self.subnets.len(), "putting virtual network");
        let inner = self.scope.put(&self.inner).await?;
        Ok(Self::from_inner(self.scope.context().clone(), inner))
    }

    /// Apply pending changes to an existing network.
    ///
    /// # Errors
    ///
    /// Same as [`Network::create`].
    pub async fn apply(self) -> Result<Self> {
        self.create().await
    }

    /// Reload the network, rebuilding subnets and peerings.
    ///
    /// # Errors
    ///
    /// Fails without a resource group or when the transport fails.
    pub async fn refresh(&mut self) -> Result<()> {
        self.inner = self.scope.get().await?;
        self.init_children();
        Ok(())
    }

    /// Ask the provider whether an address in the network is free.
    ///
    /// # Errors
    ///
    /// Fails on an unparsable address or a transport error.
    pub async fn check_ip_address_availability(&self, ip: &str) -> Result<IpAddressAvailability> {
        let ip: Ipv4Addr = ip
            .parse()
            .map_err(|_| Error::InvalidArgument(format!("`{ip}` is not an IPv4 address")))?;
        let path = format!("{}/CheckIPAddressAvailability", self.scope.id()?);
        self.scope
            .context()
            .get_with(&path, &[("ipAddress", ip.to_string())])
            .await
    }

    /// Whether an address is inside the network and not yet in use.
    ///
    /// # Errors
    ///
    /// Same as [`Network::check_ip_address_availability`].
    pub async fn is_private_ip_address_available(&self, ip: &str) -> Result<bool> {
        if !self.is_private_ip_address_in_network(ip) {
            return Ok(false);
        }
        Ok(self.check_ip_address_availability(ip).await?.available)
    }
}
