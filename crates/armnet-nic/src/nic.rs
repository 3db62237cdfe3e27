//! Fluent wrapper around a network interface.
//!
//! Settings of the primary IP configuration are exposed directly on the
//! interface. The primary configuration is the one flagged primary, else the
//! only configuration; a new interface gets one with a generated name.

use armnet_core::children::{children_to_inner, index_children, resolve_default, ChildMap, Resolution, Child};
use armnet_core::types::{IpAllocationMethod, SubResource};
use armnet_core::{ArmContext, Error, ResourceScope, TopLevelResource};
use tracing::debug;

use crate::ip_configuration::{set_private_ip, NicIpConfiguration, NicIpConfigurationDefinition};
use crate::models::{
    NetworkInterfaceInner, NetworkInterfaceProperties, NicDnsSettings, NicIpConfigurationInner,
    NicIpConfigurationProperties,
};
use crate::Result;

/// Resource type segment of network interfaces.
pub const RESOURCE_TYPE: &str = "networkInterfaces";

const IP_CONFIG_PREFIX: &str = "ipconfig";
const IP_CONFIG_NAME_LEN: usize = 14;

/// A network interface and its IP configurations.
#[derive(Debug, Clone)]
pub struct NetworkInterface {
    scope: ResourceScope,
    inner: NetworkInterfaceInner,
    ip_configurations: ChildMap<NicIpConfiguration>,
    deferred: Option<Error>,
}

impl TopLevelResource for NetworkInterface {
    const RESOURCE_TYPE: &'static str = RESOURCE_TYPE;
    type Inner = NetworkInterfaceInner;

    fn define(context: ArmContext, name: String) -> Self {
        let mut inner = NetworkInterfaceInner::default();
        inner.name = Some(name.clone());
        inner.properties = Some(NetworkInterfaceProperties::default());
        Self {
            scope: ResourceScope::new(context, RESOURCE_TYPE, name),
            inner,
            ip_configurations: ChildMap::new(),
            deferred: None,
        }
    }

    fn from_inner(context: ArmContext, inner: NetworkInterfaceInner) -> Self {
        let scope = ResourceScope::from_inner(context, RESOURCE_TYPE, &inner);
        let ip_configurations =
            index_children(inner.properties.as_ref().and_then(|p| p.ip_configurations.clone()));
        Self {
            scope,
            inner,
            ip_configurations,
            deferred: None,
        }
    }
}

impl NetworkInterface {
    /// The wire model.
    #[must_use]
    pub fn inner(&self) -> &NetworkInterfaceInner {
        &self.inner
    }

    /// Consume the wrapper, returning the wire model with the current configurations.
    #[must_use]
    pub fn into_inner(mut self) -> NetworkInterfaceInner {
        self.inner.properties_mut().ip_configurations =
            Some(children_to_inner(&self.ip_configurations));
        self.inner
    }

    fn props(&self) -> Option<&NetworkInterfaceProperties> {
        self.inner.properties.as_ref()
    }

    fn dns(&self) -> Option<&NicDnsSettings> {
        self.props().and_then(|p| p.dns_settings.as_ref())
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

    /// IP configurations keyed by name.
    #[must_use]
    pub fn ip_configurations(&self) -> &ChildMap<NicIpConfiguration> {
        &self.ip_configurations
    }

    pub(crate) fn ip_configurations_mut(&mut self) -> &mut ChildMap<NicIpConfiguration> {
        &mut self.ip_configurations
    }

    /// The primary IP configuration: the one flagged primary, else the only one.
    #[must_use]
    pub fn primary_ip_configuration(&self) -> Option<&NicIpConfiguration> {
        let mut flagged = self.ip_configurations.values().filter(|c| c.is_primary());
        match (flagged.next(), flagged.next()) {
            (Some(primary), None) => Some(primary),
            (Some(_), Some(_)) => None,
            (None, _) if self.ip_configurations.len() == 1 => self.ip_configurations.values().next(),
            (None, _) => None,
        }
    }

    /// Private address of the primary configuration.
    #[must_use]
    pub fn primary_private_ip(&self) -> Option<&str> {
        self.primary_ip_configuration()
            .and_then(NicIpConfiguration::private_ip_address)
    }

    /// Allocation method of the primary private address.
    #[must_use]
    pub fn primary_private_ip_allocation_method(&self) -> Option<IpAllocationMethod> {
        self.primary_ip_configuration()
            .and_then(NicIpConfiguration::private_ip_allocation_method)
    }

    /// MAC address, once attached to a VM.
    #[must_use]
    pub fn mac_address(&self) -> Option<&str> {
        self.props().and_then(|p| p.mac_address.as_deref())
    }

    /// ID of the VM the interface is attached to.
    #[must_use]
    pub fn virtual_machine_id(&self) -> Option<&str> {
        self.props()
            .and_then(|p| p.virtual_machine.as_ref())
            .and_then(SubResource::id)
    }

    /// Whether IP forwarding is on.
    #[must_use]
    pub fn is_ip_forwarding_enabled(&self) -> bool {
        self.props().and_then(|p| p.enable_ip_forwarding).unwrap_or(false)
    }

    /// Whether accelerated networking is on.
    #[must_use]
    pub fn is_accelerated_networking_enabled(&self) -> bool {
        self.props()
            .and_then(|p| p.enable_accelerated_networking)
            .unwrap_or(false)
    }

    /// ID of the applied network security group.
    #[must_use]
    pub fn network_security_group_id(&self) -> Option<&str> {
        self.props()
            .and_then(|p| p.network_security_group.as_ref())
            .and_then(SubResource::id)
    }

    /// DNS servers configured on the interface.
    #[must_use]
    pub fn dns_servers(&self) -> Vec<&str> {
        self.dns()
            .and_then(|d| d.dns_servers.as_ref())
            .map(|servers| servers.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// DNS servers in effect, including inherited ones.
    #[must_use]
    pub fn applied_dns_servers(&self) -> Vec<&str> {
        self.dns()
            .and_then(|d| d.applied_dns_servers.as_ref())
            .map(|servers| servers.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Internal host name label.
    #[must_use]
    pub fn internal_dns_name_label(&self) -> Option<&str> {
        self.dns().and_then(|d| d.internal_dns_name_label.as_deref())
    }

    /// Internal fully qualified name.
    #[must_use]
    pub fn internal_fqdn(&self) -> Option<&str> {
        self.dns().and_then(|d| d.internal_fqdn.as_deref())
    }

    fn primary_resolution(&self) -> Result<Resolution> {
        let flagged: Vec<&str> = self
            .ip_configurations
            .values()
            .filter(|c| c.is_primary())
            .map(NicIpConfiguration::name)
            .collect();
        let candidates = if flagged.is_empty() {
            self.ip_configurations.keys().map(String::as_str).collect()
        } else {
            flagged
        };
        resolve_default(candidates, "primary IP configuration", IP_CONFIG_PREFIX, IP_CONFIG_NAME_LEN)
    }

    fn ensure_primary(&mut self) -> Result<&mut NicIpConfiguration> {
        let resolution = self.primary_resolution()?;
        let name = resolution.name().to_string();
        if let Resolution::Create(_) = resolution {
            debug!(nic = self.name(), config = %name, "creating primary IP configuration");
            let mut config = NicIpConfiguration::from_inner(NicIpConfigurationInner::named(name.clone()));
            set_private_ip(config.props_mut(), None);
            self.ip_configurations.insert(name.clone(), config);
        }
        let config = self
            .ip_configurations
            .get_mut(&name)
            .ok_or_else(|| Error::InternalError(format!("IP configuration `{name}` vanished")))?;
        config.props_mut().primary = Some(true);
        Ok(config)
    }

    fn with_primary(mut self, update: impl FnOnce(&mut NicIpConfigurationProperties)) -> Self {
        let result = self.ensure_primary().map(|config| update(config.props_mut()));
        if let Err(err) = result {
            self.deferred.get_or_insert(err);
        }
        self
    }

    /// Place the primary configuration in an existing subnet.
    #[must_use]
    pub fn with_existing_primary_subnet(self, subnet_id: impl Into<String>) -> Self {
        let subnet = SubResource::new(subnet_id);
        self.with_primary(|props| props.subnet = Some(subnet))
    }

    /// Let the platform assign the primary private address.
    #[must_use]
    pub fn with_primary_private_ip_dynamic(self) -> Self {
        self.with_primary(|props| set_private_ip(props, None))
    }

    /// Use a fixed primary private address.
    #[must_use]
    pub fn with_primary_private_ip_static(self, ip: impl Into<String>) -> Self {
        let ip = ip.into();
        self.with_primary(|props| set_private_ip(props, Some(ip)))
    }

    /// Associate an existing public IP address with the primary configuration.
    #[must_use]
    pub fn with_existing_primary_public_ip(self, public_ip_id: impl Into<String>) -> Self {
        let public_ip = SubResource::new(public_ip_id);
        self.with_primary(|props| props.public_ip_address = Some(public_ip))
    }

    /// Remove the public IP address of the primary configuration.
    #[must_use]
    pub fn without_primary_public_ip(self) -> Self {
        self.with_primary(|props| props.public_ip_address = None)
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.inner.location = Some(region.into());
        self
    }

    /// Place the interface in an existing resource group.
    #[must_use]
    pub fn with_existing_resource_group(mut self, resource_group: impl Into<String>) -> Self {
        self.scope.set_resource_group(resource_group);
        self
    }

    /// Forward traffic not addressed to the interface.
    #[must_use]
    pub fn with_ip_forwarding(mut self) -> Self {
        self.inner.properties_mut().enable_ip_forwarding = Some(true);
        self
    }

    /// Drop traffic not addressed to the interface.
    #[must_use]
    pub fn without_ip_forwarding(mut self) -> Self {
        self.inner.properties_mut().enable_ip_forwarding = Some(false);
        self
    }

    /// Turn on accelerated networking.
    #[must_use]
    pub fn with_accelerated_networking(mut self) -> Self {
        self.inner.properties_mut().enable_accelerated_networking = Some(true);
        self
    }

    /// Turn off accelerated networking.
    #[must_use]
    pub fn without_accelerated_networking(mut self) -> Self {
        self.inner.properties_mut().enable_accelerated_networking = Some(false);
        self
    }

    /// Apply an existing network security group.
    #[must_use]
    pub fn with_existing_network_security_group(mut self, nsg_id: impl Into<String>) -> Self {
        self.inner.properties_mut().network_security_group = Some(SubResource::new(nsg_id));
        self
    }

    /// Remove the network security group.
    #[must_use]
    pub fn without_network_security_group(mut self) -> Self {
        self.inner.properties_mut().network_security_group = None;
        self
    }

    fn dns_mut(&mut self) -> &mut NicDnsSettings {
        self.inner
            .properties_mut()
            .dns_settings
            .get_or_insert_with(NicDnsSettings::default)
    }

    /// Add a DNS server.
    #[must_use]
    pub fn with_dns_server(mut self, ip: impl Into<String>) -> Self {
        self.dns_mut()
            .dns_servers
            .get_or_insert_with(Vec::new)
            .push(ip.into());
        self
    }

    /// Remove a DNS server.
    #[must_use]
    pub fn without_dns_server(mut self, ip: &str) -> Self {
        if let Some(servers) = self.dns_mut().dns_servers.as_mut() {
            servers.retain(|server| server != ip);
        }
        self
    }

    /// Set the internal host name label.
    #[must_use]
    pub fn with_internal_dns_name_label(mut self, label: impl Into<String>) -> Self {
        self.dns_mut().internal_dns_name_label = Some(label.into());
        self
    }

    /// Start defining a secondary IP configuration.
    #[must_use]
    pub fn define_secondary_ip_configuration(self, name: impl Into<String>) -> NicIpConfigurationDefinition {
        let mut config = NicIpConfiguration::from_inner(NicIpConfigurationInner::named(name));
        set_private_ip(config.props_mut(), None);
        config.props_mut().primary = Some(false);
        NicIpConfigurationDefinition::new(self, config)
    }

    /// Start updating an existing IP configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the interface has no such configuration.
    pub fn update_ip_configuration(self, name: &str) -> Result<NicIpConfigurationDefinition> {
        let config = self.ip_configurations.get(name).cloned().ok_or_else(|| {
            Error::NotFound(format!("IP configuration `{name}` in `{}`", self.name()))
        })?;
        Ok(NicIpConfigurationDefinition::new(self, config))
    }

    /// Remove a secondary IP configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for the primary configuration.
    pub fn without_ip_configuration(mut self, name: &str) -> Result<Self> {
        let is_primary = self
            .primary_ip_configuration()
            .is_some_and(|primary| primary.name() == name);
        if is_primary {
            return Err(Error::InvalidArgument(format!(
                "primary IP configuration `{name}` cannot be removed"
            )));
        }
        self.ip_configurations.remove(name);
        Ok(self)
    }

    fn before_put(&mut self) -> Result<()> {
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }
        let primary_subnet = self.ensure_primary()?.subnet_id().map(str::to_string);
        let Some(primary_subnet) = primary_subnet else {
            return Err(Error::InvalidArgument(format!(
                "network interface `{}` has no primary subnet",
                self.name()
            )));
        };
        for config in self.ip_configurations.values_mut() {
            let props = config.props_mut();
            if props.subnet.is_none() {
                props.subnet = Some(SubResource::new(primary_subnet.clone()));
            }
        }
        self.inner.properties_mut().ip_configurations =
            Some(children_to_inner(&self.ip_configurations));
        Ok(())
    }

    /// Create the interface, returning the provider's view of it.
    ///
    /// # Errors
    ///
    /// Fails when a primary setting could not be applied, without a primary
    /// subnet, region or resource group, or when the transport fails.
    pub async fn create(mut self) -> Result<Self> {
        self.before_put()?;
        debug!(name = self.name(), configs = self.ip_configurations.len(), "putting network interface");
        let inner = self.scope.put(&self.inner).await?;
        Ok(Self::from_inner(self.scope.context().clone(), inner))
    }

    /// Apply pending changes to an existing interface.
    ///
    /// # Errors
    ///
    /// Same as [`NetworkInterface::create`].
    pub async fn apply(self) -> Result<Self> {
        self.create().await
    }

    /// Reload the interface, rebuilding its configurations.
    ///
    /// # Errors
    ///
    /// Fails without a resource group or when the transport fails.
    pub async fn refresh(&mut self) -> Result<()> {
        self.inner = self.scope.get().await?;
        self.ip_configurations =
            index_children(self.inner.properties.as_ref().and_then(|p| p.ip_configurations.clone()));
        self.deferred = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, MockTransport};
    use serde_json::json;

    const SUBNET: &str =
        "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet1/subnets/front";

    fn new_nic(transport: MockTransport) -> NetworkInterface {
        NetworkInterface::define(context(transport), "nic1".into())
            .with_region("westus")
            .with_existing_resource_group("rg")
    }

    fn loaded(configs: serde_json::Value) -> NetworkInterface {
        let inner: NetworkInterfaceInner = serde_json::from_value(json!({
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/networkInterfaces/nic1",
            "name": "nic1",
            "location": "westus",
            "properties": {"ipConfigurations": configs}
        }))
        .unwrap();
        NetworkInterface::from_inner(context(MockTransport::new()), inner)
    }

    #[test]
    fn primary_settings_create_one_configuration() {
        let nic = new_nic(MockTransport::new())
            .with_existing_primary_subnet(SUBNET)
            .with_primary_private_ip_static("10.0.0.10");
        assert_eq!(nic.ip_configurations().len(), 1);
        let primary = nic.primary_ip_configuration().unwrap();
        assert!(primary.is_primary());
        assert!(primary.name().starts_with(IP_CONFIG_PREFIX));
        assert_eq!(nic.primary_private_ip(), Some("10.0.0.10"));
    }

    #[test]
    fn single_unflagged_configuration_is_primary() {
        let nic = loaded(json!([{"name": "only", "properties": {"subnet": {"id": SUBNET}}}]));
        assert_eq!(nic.primary_ip_configuration().map(NicIpConfiguration::name), Some("only"));
        assert!(matches!(
            nic.without_ip_configuration("only"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn ambiguous_primary_is_reported_at_create() {
        let mut nic = loaded(json!([{"name": "a"}, {"name": "b"}])).with_primary_private_ip_dynamic();
        assert!(nic.primary_ip_configuration().is_none());
        assert!(matches!(nic.before_put(), Err(Error::AmbiguousDefault(_))));
    }

    #[test]
    fn secondary_can_be_removed() {
        let nic = loaded(json!([
            {"name": "a", "properties": {"primary": true, "subnet": {"id": SUBNET}}},
            {"name": "b", "properties": {"primary": false}}
        ]));
        let nic = nic.without_ip_configuration("b").unwrap();
        assert_eq!(nic.ip_configurations().len(), 1);
        assert!(nic.without_ip_configuration("a").is_err());
    }

    #[tokio::test]
    async fn create_without_subnet_is_rejected() {
        let err = new_nic(MockTransport::new()).create().await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(message) if message.contains("primary subnet")));
    }

    #[tokio::test]
    async fn create_inherits_primary_subnet_for_secondaries() {
        let mut transport = MockTransport::new();
        transport
            .expect_put()
            .withf(|path, _, body| {
                let configs = body["properties"]["ipConfigurations"].as_array().unwrap();
                path.ends_with("/networkInterfaces/nic1")
                    && configs.len() == 2
                    && configs.iter().all(|c| c["properties"]["subnet"]["id"] == SUBNET)
                    && configs.iter().filter(|c| c["properties"]["primary"] == true).count() == 1
                    && body["properties"]["enableIPForwarding"] == true
            })
            .times(1)
            .returning(|_, _, body| Ok(body));

        let nic = new_nic(transport)
            .with_existing_primary_subnet(SUBNET)
            .with_ip_forwarding()
            .with_dns_server("10.0.0.2")
            .define_secondary_ip_configuration("second")
            .with_private_ip_static("10.0.0.20")
            .attach()
            .create()
            .await
            .unwrap();
        assert!(nic.is_ip_forwarding_enabled());
        assert_eq!(nic.dns_servers(), vec!["10.0.0.2"]);
    }
}
