//! Fluent wrapper around a virtual network gateway.

use armnet_core::children::{children_to_inner, index_children, insert_child, resolve_default, ChildMap, Resolution};
use armnet_core::{ArmContext, Error, ResourceScope, SubResource, TopLevelResource};
use serde_json::Value;
use tracing::{debug, info};

use crate::ip_configuration::GatewayIpConfiguration;
use crate::models::{
    AddressPool, BgpSettings, GatewayType, VirtualNetworkGatewayInner, VirtualNetworkGatewayProperties,
    VirtualNetworkGatewaySku, VpnType,
};
use crate::Result;

/// Resource type segment of virtual network gateways.
pub const RESOURCE_TYPE: &str = "virtualNetworkGateways";

/// Name of the subnet gateways must be placed in.
pub const GATEWAY_SUBNET: &str = "GatewaySubnet";

const IP_CONFIG_PREFIX: &str = "ipcfg";
const IP_CONFIG_NAME_LEN: usize = 12;

/// A VPN or ExpressRoute gateway of a virtual network.
#[derive(Debug, Clone)]
pub struct VirtualNetworkGateway {
    scope: ResourceScope,
    inner: VirtualNetworkGatewayInner,
    ip_configurations: ChildMap<GatewayIpConfiguration>,
}

impl TopLevelResource for VirtualNetworkGateway {
    const RESOURCE_TYPE: &'static str = RESOURCE_TYPE;
    type Inner = VirtualNetworkGatewayInner;

    fn define(context: ArmContext, name: String) -> Self {
        let mut inner = VirtualNetworkGatewayInner::default();
        inner.name = Some(name.clone());
        inner.properties = Some(VirtualNetworkGatewayProperties::default());
        Self {
            scope: ResourceScope::new(context, RESOURCE_TYPE, name),
            inner,
            ip_configurations: ChildMap::new(),
        }
    }

    fn from_inner(context: ArmContext, inner: VirtualNetworkGatewayInner) -> Self {
        let scope = ResourceScope::from_inner(context, RESOURCE_TYPE, &inner);
        let ip_configurations =
            index_children(inner.properties.as_ref().and_then(|p| p.ip_configurations.clone()));
        Self {
            scope,
            inner,
            ip_configurations,
        }
    }
}

impl VirtualNetworkGateway {
    fn props(&self) -> Option<&VirtualNetworkGatewayProperties> {
        self.inner.properties.as_ref()
    }

    fn props_mut(&mut self) -> &mut VirtualNetworkGatewayProperties {
        self.inner.properties_mut()
    }

    /// The wire model.
    #[must_use]
    pub fn inner(&self) -> &VirtualNetworkGatewayInner {
        &self.inner
    }

    /// Consume the wrapper, returning the wire model with the current configurations.
    #[must_use]
    pub fn into_inner(mut self) -> VirtualNetworkGatewayInner {
        self.inner.properties_mut().ip_configurations = Some(children_to_inner(&self.ip_configurations));
        self.inner
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

    /// VPN or ExpressRoute.
    #[must_use]
    pub fn gateway_type(&self) -> Option<GatewayType> {
        self.props().and_then(|p| p.gateway_type)
    }

    /// Route- or policy-based VPN.
    #[must_use]
    pub fn vpn_type(&self) -> Option<VpnType> {
        self.props().and_then(|p| p.vpn_type)
    }

    /// Gateway SKU.
    #[must_use]
    pub fn sku(&self) -> Option<&VirtualNetworkGatewaySku> {
        self.props().and_then(|p| p.sku.as_ref())
    }

    /// BGP settings, when BGP is on.
    #[must_use]
    pub fn bgp_settings(&self) -> Option<&BgpSettings> {
        self.props()
            .filter(|p| p.enable_bgp == Some(true))
            .and_then(|p| p.bgp_settings.as_ref())
    }

    /// Whether both instances are active.
    #[must_use]
    pub fn is_active_active(&self) -> bool {
        self.props().and_then(|p| p.active_active).unwrap_or(false)
    }

    /// Address prefixes handed to point-to-site clients.
    #[must_use]
    pub fn point_to_site_address_pools(&self) -> Vec<&str> {
        self.props()
            .and_then(|p| p.vpn_client_configuration.as_ref())
            .and_then(|c| c.vpn_client_address_pool.as_ref())
            .map(|pool| pool.address_prefixes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// IP configurations keyed by name.
    #[must_use]
    pub fn ip_configurations(&self) -> &ChildMap<GatewayIpConfiguration> {
        &self.ip_configurations
    }

    /// The gateway's IP configuration, adding one when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousDefault`] when there are several.
    pub fn ensure_default_ip_config(&mut self) -> Result<&mut GatewayIpConfiguration> {
        let resolution = resolve_default(
            self.ip_configurations.keys().map(String::as_str),
            "IP configuration",
            IP_CONFIG_PREFIX,
            IP_CONFIG_NAME_LEN,
        )?;
        let name = resolution.name().to_string();
        if let Resolution::Create(_) = resolution {
            insert_child(&mut self.ip_configurations, GatewayIpConfiguration::named(name.clone()));
        }
        self.ip_configurations
            .get_mut(&name)
            .ok_or_else(|| Error::InternalError(format!("IP configuration `{name}` vanished")))
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.inner.location = Some(region.into());
        self
    }

    /// Place the gateway in an existing resource group.
    #[must_use]
    pub fn with_existing_resource_group(mut self, resource_group: impl Into<String>) -> Self {
        self.scope.set_resource_group(resource_group);
        self
    }

    /// Place the gateway in the `GatewaySubnet` of an existing network.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousDefault`] when the gateway has several IP configurations.
    pub fn with_existing_network(mut self, network_id: &str) -> Result<Self> {
        let subnet = format!("{}/subnets/{GATEWAY_SUBNET}", network_id.trim_end_matches('/'));
        self.ensure_default_ip_config()?.props_mut().subnet = Some(SubResource::new(subnet));
        Ok(self)
    }

    /// Use an existing public IP address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousDefault`] when the gateway has several IP configurations.
    pub fn with_existing_public_ip(mut self, public_ip_id: impl Into<String>) -> Result<Self> {
        self.ensure_default_ip_config()?.props_mut().public_ip_address = Some(SubResource::new(public_ip_id));
        Ok(self)
    }

    /// Make this an ExpressRoute gateway.
    #[must_use]
    pub fn with_express_route(mut self) -> Self {
        let props = self.props_mut();
        props.gateway_type = Some(GatewayType::ExpressRoute);
        props.vpn_type = None;
        self
    }

    /// Make this a route-based VPN gateway.
    #[must_use]
    pub fn with_route_based_vpn(mut self) -> Self {
        let props = self.props_mut();
        props.gateway_type = Some(GatewayType::Vpn);
        props.vpn_type = Some(VpnType::RouteBased);
        self
    }

    /// Make this a policy-based VPN gateway.
    #[must_use]
    pub fn with_policy_based_vpn(mut self) -> Self {
        let props = self.props_mut();
        props.gateway_type = Some(GatewayType::Vpn);
        props.vpn_type = Some(VpnType::PolicyBased);
        self
    }

    /// Gateway SKU, e.g. `VpnGw1` or `ErGw1AZ`.
    #[must_use]
    pub fn with_sku(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.props_mut().sku = Some(VirtualNetworkGatewaySku {
            name: Some(name.clone()),
            tier: Some(name),
            capacity: None,
        });
        self
    }

    /// Turn on BGP with an ASN and peering address.
    #[must_use]
    pub fn with_bgp(mut self, asn: u32, peering_address: impl Into<String>) -> Self {
        let props = self.props_mut();
        props.enable_bgp = Some(true);
        let settings = props.bgp_settings.get_or_insert_with(BgpSettings::default);
        settings.asn = Some(asn);
        settings.bgp_peering_address = Some(peering_address.into());
        self
    }

    /// Turn off BGP.
    #[must_use]
    pub fn without_bgp(mut self) -> Self {
        let props = self.props_mut();
        props.enable_bgp = Some(false);
        props.bgp_settings = None;
        self
    }

    /// Hand out addresses from a prefix to point-to-site clients.
    #[must_use]
    pub fn with_point_to_site_address_pool(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let pool = self
            .props_mut()
            .vpn_client_configuration
            .get_or_insert_with(Default::default)
            .vpn_client_address_pool
            .get_or_insert_with(AddressPool::default);
        if !pool.address_prefixes.contains(&prefix) {
            pool.address_prefixes.push(prefix);
        }
        self
    }

    fn before_put(&mut self) -> Result<()> {
        let config = self.ensure_default_ip_config()?;
        if config.subnet_id().is_none() {
            return Err(Error::InvalidArgument(format!(
                "virtual network gateway `{}` has no network",
                self.name()
            )));
        }
        let props = self.props_mut();
        props.gateway_type.get_or_insert(GatewayType::Vpn);
        if props.gateway_type == Some(GatewayType::Vpn) {
            props.vpn_type.get_or_insert(VpnType::RouteBased);
        }
        props.enable_bgp.get_or_insert(false);
        self.inner.properties_mut().ip_configurations = Some(children_to_inner(&self.ip_configurations));
        Ok(())
    }

    /// Create the gateway, returning the provider's view of it.
    ///
    /// # Errors
    ///
    /// Fails without a network, region or resource group, when the default
    /// IP configuration is ambiguous, or when the transport fails.
    pub async fn create(mut self) -> Result<Self> {
        self.before_put()?;
        debug!(name = self.name(), gateway_type = ?self.gateway_type(), "putting virtual network gateway");
        let inner = self.scope.put(&self.inner).await?;
        Ok(Self::from_inner(self.scope.context().clone(), inner))
    }

    /// Apply pending changes to an existing gateway.
    ///
    /// # Errors
    ///
    /// Same as [`VirtualNetworkGateway::create`].
    pub async fn apply(self) -> Result<Self> {
        self.create().await
    }

    /// Reload the gateway.
    ///
    /// # Errors
    ///
    /// Fails without a resource group or when the transport fails.
    pub async fn refresh(&mut self) -> Result<()> {
        self.inner = self.scope.get().await?;
        self.ip_configurations =
            index_children(self.inner.properties.as_ref().and_then(|p| p.ip_configurations.clone()));
        Ok(())
    }

    /// Reset the primary instance of the gateway and reload its state.
    ///
    /// # Errors
    ///
    /// Fails without a resource group or when the transport fails.
    pub async fn reset(&mut self) -> Result<()> {
        let path = format!("{}/reset", self.scope.id()?);
        info!(gateway = self.name(), "resetting virtual network gateway");
        let _: Value = self.scope.context().post(&path, None).await?;
        self.refresh().await
    }
}
