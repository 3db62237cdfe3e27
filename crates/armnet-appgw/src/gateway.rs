//! Fluent wrapper around an application gateway.
//!
//! Children refer to each other by name until the gateway is put; the names
//! are then turned into child IDs under the gateway's ID. Several helpers
//! resolve a default child: one candidate is used as is, none means a new
//! child with a generated name, several are ambiguous.

use armnet_core::children::{
    children_to_inner, index_children, insert_child, link_sibling, resolve_default, Child, ChildMap,
    Resolution,
};
use armnet_core::naming::random_resource_name;
use armnet_core::types::IpAllocationMethod;
use armnet_core::{ArmContext, Error, ResourceScope, SubResource, TopLevelResource};
use serde_json::Value;
use tracing::{debug, info};

use crate::backend::{Backend, BackendDefinition};
use crate::frontend::{Frontend, FrontendDefinition, FrontendPort};
use crate::http_configuration::{BackendHttpConfiguration, BackendHttpConfigurationDefinition};
use crate::ip_configuration::GatewayIpConfiguration;
use crate::listener::{Listener, ListenerDefinition};
use crate::models::{
    ApplicationGatewayInner, ApplicationGatewayProperties, ApplicationGatewaySku, FrontendInner,
    OperationalState,
};
use crate::probe::{Probe, ProbeDefinition};
use crate::rule::{RequestRoutingRule, RequestRoutingRuleDefinition};
use crate::Result;

/// Resource type segment of application gateways.
pub const RESOURCE_TYPE: &str = "applicationGateways";

const FRONTENDS: &str = "frontendIPConfigurations";
const FRONTEND_PORTS: &str = "frontendPorts";
const BACKENDS: &str = "backendAddressPools";
const BACKEND_HTTP_CONFIGURATIONS: &str = "backendHttpSettingsCollection";
const PROBES: &str = "probes";
const LISTENERS: &str = "httpListeners";

const DEFAULT_SKU_NAME: &str = "Standard_Small";
const DEFAULT_SKU_TIER: &str = "Standard";
const MIN_INSTANCES: u32 = 1;
const MAX_INSTANCES: u32 = 32;
const NAME_LEN: usize = 13;

/// An application gateway and its children.
#[derive(Debug, Clone)]
pub struct ApplicationGateway {
    scope: ResourceScope,
    inner: ApplicationGatewayInner,
    ip_configurations: ChildMap<GatewayIpConfiguration>,
    frontends: ChildMap<Frontend>,
    frontend_ports: ChildMap<FrontendPort>,
    backends: ChildMap<Backend>,
    backend_http_configurations: ChildMap<BackendHttpConfiguration>,
    probes: ChildMap<Probe>,
    listeners: ChildMap<Listener>,
    rules: ChildMap<RequestRoutingRule>,
}

impl TopLevelResource for ApplicationGateway {
    const RESOURCE_TYPE: &'static str = RESOURCE_TYPE;
    type Inner = ApplicationGatewayInner;

    fn define(context: ArmContext, name: String) -> Self {
        let mut inner = ApplicationGatewayInner::default();
        inner.name = Some(name.clone());
        inner.properties = Some(ApplicationGatewayProperties::default());
        Self::wrap(ResourceScope::new(context, RESOURCE_TYPE, name), inner)
    }

    fn from_inner(context: ArmContext, inner: ApplicationGatewayInner) -> Self {
        let scope = ResourceScope::from_inner(context, RESOURCE_TYPE, &inner);
        Self::wrap(scope, inner)
    }
}

impl ApplicationGateway {
    fn wrap(scope: ResourceScope, inner: ApplicationGatewayInner) -> Self {
        let mut gateway = Self {
            scope,
            inner,
            ip_configurations: ChildMap::new(),
            frontends: ChildMap::new(),
            frontend_ports: ChildMap::new(),
            backends: ChildMap::new(),
            backend_http_configurations: ChildMap::new(),
            probes: ChildMap::new(),
            listeners: ChildMap::new(),
            rules: ChildMap::new(),
        };
        gateway.init_children();
        gateway
    }

    fn init_children(&mut self) {
        let props = self.inner.properties.as_ref();
        self.ip_configurations = index_children(props.and_then(|p| p.gateway_ip_configurations.clone()));
        self.frontends = index_children(props.and_then(|p| p.frontend_ip_configurations.clone()));
        self.frontend_ports = index_children(props.and_then(|p| p.frontend_ports.clone()));
        self.backends = index_children(props.and_then(|p| p.backend_address_pools.clone()));
        self.backend_http_configurations =
            index_children(props.and_then(|p| p.backend_http_settings_collection.clone()));
        self.probes = index_children(props.and_then(|p| p.probes.clone()));
        self.listeners = index_children(props.and_then(|p| p.http_listeners.clone()));
        self.rules = index_children(props.and_then(|p| p.request_routing_rules.clone()));
    }

    fn flatten_children(&mut self) {
        let props = self.inner.properties_mut();
        props.gateway_ip_configurations = Some(children_to_inner(&self.ip_configurations));
        props.frontend_ip_configurations = Some(children_to_inner(&self.frontends));
        props.frontend_ports = Some(children_to_inner(&self.frontend_ports));
        props.backend_address_pools = Some(children_to_inner(&self.backends));
        props.backend_http_settings_collection = Some(children_to_inner(&self.backend_http_configurations));
        props.probes = Some(children_to_inner(&self.probes));
        props.http_listeners = Some(children_to_inner(&self.listeners));
        props.request_routing_rules = Some(children_to_inner(&self.rules));
    }

    /// The wire model.
    #[must_use]
    pub fn inner(&self) -> &ApplicationGatewayInner {
        &self.inner
    }

    /// Consume the wrapper, returning the wire model with the current children.
    #[must_use]
    pub fn into_inner(mut self) -> ApplicationGatewayInner {
        self.flatten_children();
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

    /// Size, tier and instance count.
    #[must_use]
    pub fn sku(&self) -> Option<&ApplicationGatewaySku> {
        self.inner.properties.as_ref().and_then(|p| p.sku.as_ref())
    }

    /// Number of instances.
    #[must_use]
    pub fn instance_count(&self) -> Option<u32> {
        self.sku().and_then(|sku| sku.capacity)
    }

    /// Whether the gateway is running, as last reported.
    #[must_use]
    pub fn operational_state(&self) -> Option<OperationalState> {
        self.inner.properties.as_ref().and_then(|p| p.operational_state)
    }

    /// Whether the gateway has a public frontend.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.frontends.values().any(Frontend::is_public)
    }

    /// Whether the gateway has a private frontend.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.frontends.values().any(Frontend::is_private)
    }

    /// Subnet of the gateway's IP configuration, when there is exactly one.
    #[must_use]
    pub fn subnet_id(&self) -> Option<&str> {
        match self.ip_configurations.len() {
            1 => self.ip_configurations.values().next().and_then(GatewayIpConfiguration::subnet_id),
            _ => None,
        }
    }

    /// IP configurations keyed by name.
    #[must_use]
    pub fn ip_configurations(&self) -> &ChildMap<GatewayIpConfiguration> {
        &self.ip_configurations
    }

    /// Frontends keyed by name.
    #[must_use]
    pub fn frontends(&self) -> &ChildMap<Frontend> {
        &self.frontends
    }

    pub(crate) fn frontends_mut(&mut self) -> &mut ChildMap<Frontend> {
        &mut self.frontends
    }

    /// Frontend ports keyed by name.
    #[must_use]
    pub fn frontend_ports(&self) -> &ChildMap<FrontendPort> {
        &self.frontend_ports
    }

    /// Backend pools keyed by name.
    #[must_use]
    pub fn backends(&self) -> &ChildMap<Backend> {
        &self.backends
    }

    pub(crate) fn backends_mut(&mut self) -> &mut ChildMap<Backend> {
        &mut self.backends
    }

    pub(crate) fn backend_mut(&mut self, name: &str) -> &mut Backend {
        self.backends
            .entry(name.to_string())
            .or_insert_with(|| Backend::named(name))
    }

    /// Backend HTTP configurations keyed by name.
    #[must_use]
    pub fn backend_http_configurations(&self) -> &ChildMap<BackendHttpConfiguration> {
        &self.backend_http_configurations
    }

    pub(crate) fn backend_http_configurations_mut(&mut self) -> &mut ChildMap<BackendHttpConfiguration> {
        &mut self.backend_http_configurations
    }

    /// Probes keyed by name.
    #[must_use]
    pub fn probes(&self) -> &ChildMap<Probe> {
        &self.probes
    }

    pub(crate) fn probes_mut(&mut self) -> &mut ChildMap<Probe> {
        &mut self.probes
    }

    /// Listeners keyed by name.
    #[must_use]
    pub fn listeners(&self) -> &ChildMap<Listener> {
        &self.listeners
    }

    pub(crate) fn listeners_mut(&mut self) -> &mut ChildMap<Listener> {
        &mut self.listeners
    }

    /// Request routing rules keyed by name.
    #[must_use]
    pub fn request_routing_rules(&self) -> &ChildMap<RequestRoutingRule> {
        &self.rules
    }

    pub(crate) fn request_routing_rules_mut(&mut self) -> &mut ChildMap<RequestRoutingRule> {
        &mut self.rules
    }

    /// First listener, by name, accepting traffic on a port number.
    #[must_use]
    pub fn listener_by_port_number(&self, port: u16) -> Option<&Listener> {
        self.listeners.values().find(|listener| {
            listener
                .frontend_port_name()
                .and_then(|name| self.frontend_ports.get(name))
                .and_then(FrontendPort::port)
                == Some(port)
        })
    }

    /// The gateway's IP configuration, adding one when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousDefault`] when there are several.
    pub fn ensure_default_ip_config(&mut self) -> Result<String> {
        let resolution = resolve_default(
            self.ip_configurations.keys().map(String::as_str),
            "IP configuration",
            "default",
            NAME_LEN,
        )?;
        if let Resolution::Create(name) = &resolution {
            insert_child(&mut self.ip_configurations, GatewayIpConfiguration::named(name.clone()));
        }
        Ok(resolution.name().to_string())
    }

    /// The gateway's private frontend, adding one when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousDefault`] when there are several.
    pub fn ensure_default_private_frontend(&mut self) -> Result<String> {
        let privates = self
            .frontends
            .values()
            .filter(|f| f.is_private())
            .map(Frontend::name);
        let resolution = resolve_default(privates, "private frontend", "frontend", NAME_LEN)?;
        if let Resolution::Create(name) = &resolution {
            debug!(gateway = self.name(), frontend = %name, "adding private frontend");
            insert_child(&mut self.frontends, Frontend::private(name.clone()));
        }
        Ok(resolution.name().to_string())
    }

    /// Add a backend pool with a generated name and return the name.
    pub fn ensure_unique_backend(&mut self) -> String {
        let name = random_resource_name("backend", NAME_LEN - 1);
        insert_child(&mut self.backends, Backend::named(name.clone()));
        name
    }

    /// Add a backend HTTP configuration with a generated name and return the name.
    pub fn ensure_unique_backend_http_config(&mut self) -> String {
        let name = random_resource_name("bckcfg", NAME_LEN - 1);
        insert_child(
            &mut self.backend_http_configurations,
            BackendHttpConfiguration::named(name.clone()),
        );
        name
    }

    /// Name of the frontend port with this number, adding one when missing.
    pub fn ensure_frontend_port(&mut self, port: u16) -> String {
        if let Some(existing) = self.frontend_ports.values().find(|p| p.port() == Some(port)) {
            return existing.name().to_string();
        }
        let name = random_resource_name("port", NAME_LEN - 4);
        insert_child(&mut self.frontend_ports, FrontendPort::new(name.clone(), port));
        name
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

    /// Add or replace a tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner
            .tags
            .get_or_insert_with(Default::default)
            .insert(key.into(), value.into());
        self
    }

    /// Run the gateway in an existing subnet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousDefault`] when the gateway has several IP configurations.
    pub fn with_existing_subnet(mut self, subnet_id: &str) -> Result<Self> {
        let name = self.ensure_default_ip_config()?;
        if let Some(config) = self.ip_configurations.get_mut(&name) {
            config.set_subnet(subnet_id);
        }
        Ok(self)
    }

    /// Size and tier, e.g. `Standard_Medium` and `Standard`.
    #[must_use]
    pub fn with_sku(mut self, name: impl Into<String>, tier: impl Into<String>) -> Self {
        let sku = self.inner.properties_mut().sku.get_or_insert_with(Default::default);
        sku.name = Some(name.into());
        sku.tier = Some(tier.into());
        self
    }

    /// Number of instances.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] outside 1..=32.
    pub fn with_instance_count(mut self, count: u32) -> Result<Self> {
        if !(MIN_INSTANCES..=MAX_INSTANCES).contains(&count) {
            return Err(Error::InvalidArgument(format!(
                "instance count {count} is outside {MIN_INSTANCES}..={MAX_INSTANCES}"
            )));
        }
        self.inner
            .properties_mut()
            .sku
            .get_or_insert_with(Default::default)
            .capacity = Some(count);
        Ok(self)
    }

    /// Give the private frontend a fixed address, adding the frontend if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousDefault`] when there are several private frontends.
    pub fn with_private_ip_static(mut self, ip: impl Into<String>) -> Result<Self> {
        let name = self.ensure_default_private_frontend()?;
        if let Some(frontend) = self.frontends.get_mut(&name) {
            let props = frontend.props_mut();
            props.private_ip_allocation_method = Some(IpAllocationMethod::Static);
            props.private_ip_address = Some(ip.into());
        }
        Ok(self)
    }

    /// Start defining a public frontend.
    #[must_use]
    pub fn define_public_frontend(self, name: impl Into<String>) -> FrontendDefinition {
        FrontendDefinition::new(self, Frontend::from_inner(FrontendInner::named(name)))
    }

    /// Start defining a private frontend.
    #[must_use]
    pub fn define_private_frontend(self, name: impl Into<String>) -> FrontendDefinition {
        FrontendDefinition::new(self, Frontend::private(name))
    }

    /// Remove a frontend.
    #[must_use]
    pub fn without_frontend(mut self, name: &str) -> Self {
        self.frontends.remove(name);
        self
    }

    /// Add a named frontend port.
    #[must_use]
    pub fn with_frontend_port(mut self, port: u16, name: impl Into<String>) -> Self {
        insert_child(&mut self.frontend_ports, FrontendPort::new(name, port));
        self
    }

    /// Remove a frontend port.
    #[must_use]
    pub fn without_frontend_port(mut self, name: &str) -> Self {
        self.frontend_ports.remove(name);
        self
    }

    /// Start defining a backend pool.
    #[must_use]
    pub fn define_backend(self, name: impl Into<String>) -> BackendDefinition {
        BackendDefinition::new(self, Backend::named(name))
    }

    /// Start updating a backend pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the gateway has no such pool.
    pub fn update_backend(self, name: &str) -> Result<BackendDefinition> {
        let backend = self.child(&self.backends, "backend", name)?;
        Ok(BackendDefinition::new(self, backend))
    }

    /// Remove a backend pool.
    #[must_use]
    pub fn without_backend(mut self, name: &str) -> Self {
        self.backends.remove(name);
        self
    }

    /// Start defining a backend HTTP configuration with HTTP on port 80.
    #[must_use]
    pub fn define_backend_http_configuration(self, name: impl Into<String>) -> BackendHttpConfigurationDefinition {
        BackendHttpConfigurationDefinition::new(self, BackendHttpConfiguration::named(name))
    }

    /// Start updating a backend HTTP configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the gateway has no such configuration.
    pub fn update_backend_http_configuration(self, name: &str) -> Result<BackendHttpConfigurationDefinition> {
        let config = self.child(&self.backend_http_configurations, "backend HTTP configuration", name)?;
        Ok(BackendHttpConfigurationDefinition::new(self, config))
    }

    /// Remove a backend HTTP configuration.
    #[must_use]
    pub fn without_backend_http_configuration(mut self, name: &str) -> Self {
        self.backend_http_configurations.remove(name);
        self
    }

    /// Start defining a probe.
    #[must_use]
    pub fn define_probe(self, name: impl Into<String>) -> ProbeDefinition {
        ProbeDefinition::new(self, Probe::named(name))
    }

    /// Remove a probe.
    #[must_use]
    pub fn without_probe(mut self, name: &str) -> Self {
        self.probes.remove(name);
        self
    }

    /// Start defining an HTTP listener.
    #[must_use]
    pub fn define_listener(self, name: impl Into<String>) -> ListenerDefinition {
        ListenerDefinition::new(self, Listener::named(name))
    }

    /// Remove a listener.
    #[must_use]
    pub fn without_listener(mut self, name: &str) -> Self {
        self.listeners.remove(name);
        self
    }

    /// Start defining a request routing rule.
    #[must_use]
    pub fn define_request_routing_rule(self, name: impl Into<String>) -> RequestRoutingRuleDefinition {
        RequestRoutingRuleDefinition::new(self, name.into())
    }

    /// Remove a request routing rule.
    #[must_use]
    pub fn without_request_routing_rule(mut self, name: &str) -> Self {
        self.rules.remove(name);
        self
    }

    fn child<C: Clone>(&self, map: &ChildMap<C>, kind: &str, name: &str) -> Result<C> {
        map.get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{kind} `{name}` in `{}`", self.name())))
    }

    fn before_put(&mut self) -> Result<()> {
        let ip_config = self.ensure_default_ip_config()?;
        let subnet = self
            .ip_configurations
            .get(&ip_config)
            .and_then(GatewayIpConfiguration::subnet_id)
            .map(str::to_string)
            .ok_or_else(|| {
                Error::InvalidArgument(format!("application gateway `{}` has no subnet", self.name()))
            })?;

        if self.listeners.values().any(|l| l.frontend_name().is_none()) {
            let name = match resolve_default(
                self.frontends.keys().map(String::as_str),
                "frontend",
                "frontend",
                NAME_LEN,
            )? {
                Resolution::Existing(name) => name,
                Resolution::Create(_) => self.ensure_default_private_frontend()?,
            };
            for listener in self.listeners.values_mut() {
                listener
                    .props_mut()
                    .frontend_ip_configuration
                    .get_or_insert_with(|| SubResource::new(name.clone()));
            }
        }

        for frontend in self.frontends.values_mut().filter(|f| f.is_private()) {
            frontend
                .props_mut()
                .subnet
                .get_or_insert_with(|| SubResource::new(subnet.clone()));
        }

        let sku = self.inner.properties_mut().sku.get_or_insert_with(Default::default);
        sku.name.get_or_insert_with(|| DEFAULT_SKU_NAME.to_string());
        sku.tier.get_or_insert_with(|| DEFAULT_SKU_TIER.to_string());
        sku.capacity.get_or_insert(MIN_INSTANCES);

        for config in self.backend_http_configurations.values_mut() {
            link_sibling(config.props_mut().probe.as_mut(), &self.scope, PROBES, &self.probes)?;
        }
        for listener in self.listeners.values_mut() {
            let props = listener.props_mut();
            link_sibling(props.frontend_ip_configuration.as_mut(), &self.scope, FRONTENDS, &self.frontends)?;
            link_sibling(props.frontend_port.as_mut(), &self.scope, FRONTEND_PORTS, &self.frontend_ports)?;
        }
        for rule in self.rules.values_mut() {
            let props = rule.props_mut();
            link_sibling(props.http_listener.as_mut(), &self.scope, LISTENERS, &self.listeners)?;
            link_sibling(props.backend_address_pool.as_mut(), &self.scope, BACKENDS, &self.backends)?;
            link_sibling(
                props.backend_http_settings.as_mut(),
                &self.scope,
                BACKEND_HTTP_CONFIGURATIONS,
                &self.backend_http_configurations,
            )?;
        }
        debug!(gateway = self.name(), ip_config = %ip_config, "child references linked");
        self.flatten_children();
        Ok(())
    }

    /// Create the gateway, returning the provider's view of it.
    ///
    /// # Errors
    ///
    /// Fails without a subnet, when a child references a sibling that does
    /// not exist, when a default child is ambiguous, without region or
    /// resource group, or when the transport fails.
    pub async fn create(mut self) -> Result<Self> {
        self.before_put()?;
        debug!(
            name = self.name(),
            listeners = self.listeners.len(),
            rules = self.rules.len(),
            "putting application gateway"
        );
        let inner = self.scope.put(&self.inner).await?;
        Ok(Self::from_inner(self.scope.context().clone(), inner))
    }

    /// Apply pending changes to an existing gateway.
    ///
    /// # Errors
    ///
    /// Same as [`ApplicationGateway::create`].
    pub async fn apply(self) -> Result<Self> {
        self.create().await
    }

    /// Reload the gateway, rebuilding its children.
    ///
    /// # Errors
    ///
    /// Fails without a resource group or when the transport fails.
    pub async fn refresh(&mut self) -> Result<()> {
        self.inner = self.scope.get().await?;
        self.init_children();
        Ok(())
    }

    async fn action(&mut self, action: &str) -> Result<()> {
        let path = format!("{}/{action}", self.scope.id()?);
        info!(gateway = self.name(), action, "application gateway action");
        let _: Value = self.scope.context().post(&path, None).await?;
        self.refresh().await
    }

    /// Start the gateway and reload its state.
    ///
    /// # Errors
    ///
    /// Fails without a resource group or when the transport fails.
    pub async fn start(&mut self) -> Result<()> {
        self.action("start").await
    }

    /// Stop the gateway and reload its state.
    ///
    /// # Errors
    ///
    /// Fails without a resource group or when the transport fails.
    pub async fn stop(&mut self) -> Result<()> {
        self.action("stop").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, MockTransport, SUB};
    use serde_json::json;

    const SUBNET: &str =
        "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet1/subnets/agw";

    fn gateway_id() -> String {
        format!("/subscriptions/{SUB}/resourceGroups/rg/providers/Microsoft.Network/applicationGateways/agw")
    }

    fn new_gateway(transport: MockTransport) -> ApplicationGateway {
        ApplicationGateway::define(context(transport), "agw".into())
            .with_region("westus")
            .with_existing_resource_group("rg")
    }

    #[test]
    fn instance_count_is_bounded() {
        let gateway = new_gateway(MockTransport::new());
        assert!(gateway.clone().with_instance_count(0).is_err());
        assert!(gateway.clone().with_instance_count(33).is_err());
        assert_eq!(gateway.with_instance_count(32).unwrap().instance_count(), Some(32));
    }

    fn loaded(properties: serde_json::Value) -> ApplicationGateway {
        let inner = serde_json::from_value(json!({
            "id": gateway_id(),
            "name": "agw",
            "location": "westus",
            "properties": properties
        }))
        .unwrap();
        ApplicationGateway::from_inner(context(MockTransport::new()), inner)
    }

    #[test]
    fn default_ip_config_single_and_ambiguous() {
        let mut single = loaded(json!({
            "gatewayIPConfigurations": [{"name": "ipcfg", "properties": {"subnet": {"id": SUBNET}}}]
        }));
        assert_eq!(single.ensure_default_ip_config().unwrap(), "ipcfg");
        assert_eq!(single.ip_configurations().len(), 1);

        let mut several = loaded(json!({
            "gatewayIPConfigurations": [
                {"name": "a", "properties": {"subnet": {"id": SUBNET}}},
                {"name": "b", "properties": {"subnet": {"id": SUBNET}}}
            ]
        }));
        let err = several.ensure_default_ip_config().unwrap_err();
        assert!(matches!(err, Error::AmbiguousDefault(message) if message.contains("a, b")));
        assert_eq!(several.ip_configurations().len(), 2);
    }

    #[test]
    fn default_private_frontend_ignores_public_and_rejects_several() {
        let mut mixed = loaded(json!({
            "frontendIPConfigurations": [
                {"name": "pub", "properties": {"publicIPAddress": {"id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/publicIPAddresses/pip"}}},
                {"name": "priv", "properties": {"subnet": {"id": SUBNET}}}
            ]
        }));
        assert_eq!(mixed.ensure_default_private_frontend().unwrap(), "priv");

        let mut several = loaded(json!({
            "frontendIPConfigurations": [
                {"name": "priv1", "properties": {"subnet": {"id": SUBNET}}},
                {"name": "priv2", "properties": {"subnet": {"id": SUBNET}, "privateIPAddress": "10.0.0.9"}}
            ]
        }));
        let err = several.ensure_default_private_frontend().unwrap_err();
        assert!(matches!(err, Error::AmbiguousDefault(_)));
        assert_eq!(several.frontends().len(), 2);
    }

    #[test]
    fn private_ip_static_adds_private_frontend() {
        let gateway = new_gateway(MockTransport::new()).with_private_ip_static("10.0.0.10").unwrap();
        assert!(gateway.is_private());
        assert!(!gateway.is_public());
        let frontend = gateway.frontends().values().next().unwrap();
        assert_eq!(frontend.private_ip_address(), Some("10.0.0.10"));
    }

    #[test]
    fn ensure_frontend_port_reuses_number() {
        let mut gateway = new_gateway(MockTransport::new()).with_frontend_port(443, "https");
        assert_eq!(gateway.ensure_frontend_port(443), "https");
        let added = gateway.ensure_frontend_port(80);
        assert_ne!(added, "https");
        assert_eq!(gateway.frontend_ports().len(), 2);
    }

    #[tokio::test]
    async fn create_requires_subnet() {
        let err = new_gateway(MockTransport::new()).create().await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(message) if message.contains("subnet")));
    }

    #[tokio::test]
    async fn create_links_references() {
        let mut transport = MockTransport::new();
        transport
            .expect_put()
            .withf(|path, _, body| {
                let id = gateway_id();
                let props = &body["properties"];
                let rule = &props["requestRoutingRules"][0]["properties"];
                let listener = &props["httpListeners"][0];
                let frontend = &props["frontendIPConfigurations"][0];
                path == id
                    && props["sku"] == json!({"name": "Standard_Small", "tier": "Standard", "capacity": 1})
                    && props["gatewayIPConfigurations"][0]["properties"]["subnet"]["id"] == SUBNET
                    && frontend["properties"]["subnet"]["id"] == SUBNET
                    && listener["properties"]["frontendIPConfiguration"]["id"]
                        == format!("{id}/frontendIPConfigurations/{}", frontend["name"].as_str().unwrap())
                    && rule["httpListener"]["id"]
                        == format!("{id}/httpListeners/{}", listener["name"].as_str().unwrap())
                    && rule["backendAddressPool"]["id"] == format!("{id}/backendAddressPools/pool")
                    && props["backendHttpSettingsCollection"][0]["properties"]["probe"]["id"]
                        == format!("{id}/probes/health")
            })
            .times(1)
            .returning(|_, _, body| Ok(body));

        let gateway = new_gateway(transport)
            .with_existing_subnet(SUBNET)
            .unwrap()
            .define_backend("pool")
            .with_ip_address("10.0.1.4")
            .attach()
            .define_probe("health")
            .with_host("contoso.com")
            .with_path("/")
            .attach()
            .unwrap()
            .define_backend_http_configuration("http")
            .with_probe("health")
            .attach()
            .define_request_routing_rule("rule1")
            .from_frontend_port(80)
            .to_backend("pool")
            .to_backend_http_configuration("http")
            .attach()
            .unwrap()
            .create()
            .await
            .unwrap();

        assert!(gateway.is_private());
        assert_eq!(gateway.subnet_id(), Some(SUBNET));
        assert_eq!(gateway.request_routing_rules()["rule1"].backend_name(), Some("pool"));
    }

    #[tokio::test]
    async fn dangling_backend_is_rejected() {
        let err = new_gateway(MockTransport::new())
            .with_existing_subnet(SUBNET)
            .unwrap()
            .define_request_routing_rule("rule1")
            .from_frontend_port(80)
            .to_backend("nowhere")
            .attach()
            .unwrap()
            .create()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidReference(message) if message.contains("nowhere")));
    }

    #[tokio::test]
    async fn stop_posts_and_refreshes() {
        let mut transport = MockTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_post()
            .withf(|path, _, body| path.ends_with("/applicationGateways/agw/stop") && body.is_none())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(Value::Null));
        transport
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|path, _| Ok(json!({"id": path, "name": "agw", "properties": {"operationalState": "Stopped"}})));

        let mut gateway = new_gateway(transport);
        gateway.stop().await.unwrap();
        assert_eq!(gateway.operational_state(), Some(OperationalState::Stopped));
    }
}
