//! Fluent wrapper around a load balancer.

use armnet_core::children::{
    children_to_inner, index_children, insert_child, link_sibling, resolve_default, Child, ChildMap,
    Resolution,
};
use armnet_core::{ArmContext, Error, ResourceScope, SubResource, TopLevelResource};
use tracing::debug;

use crate::backend::Backend;
use crate::frontend::{Frontend, FrontendDefinition};
use crate::models::{
    FrontendInner, InboundNatRuleInner, LoadBalancerInner, LoadBalancerProperties,
    LoadBalancingRuleInner, ProbeProtocol,
};
use crate::nat_rule::{InboundNatRule, InboundNatRuleDefinition};
use crate::probe::{Probe, ProbeDefinition};
use crate::rule::{LoadBalancingRule, LoadBalancingRuleDefinition, FRONTEND_NAME_LEN, FRONTEND_PREFIX};
use crate::Result;

/// Resource type segment of load balancers.
pub const RESOURCE_TYPE: &str = "loadBalancers";

const FRONTENDS: &str = "frontendIPConfigurations";
const BACKENDS: &str = "backendAddressPools";
const PROBES: &str = "probes";
const BACKEND_PREFIX: &str = "backend";
const BACKEND_NAME_LEN: usize = 12;

/// A load balancer and its children.
#[derive(Debug, Clone)]
pub struct LoadBalancer {
    scope: ResourceScope,
    inner: LoadBalancerInner,
    frontends: ChildMap<Frontend>,
    backends: ChildMap<Backend>,
    probes: ChildMap<Probe>,
    rules: ChildMap<LoadBalancingRule>,
    nat_rules: ChildMap<InboundNatRule>,
}

impl TopLevelResource for LoadBalancer {
    const RESOURCE_TYPE: &'static str = RESOURCE_TYPE;
    type Inner = LoadBalancerInner;

    fn define(context: ArmContext, name: String) -> Self {
        let mut inner = LoadBalancerInner::default();
        inner.name = Some(name.clone());
        inner.properties = Some(LoadBalancerProperties::default());
        Self::wrap(ResourceScope::new(context, RESOURCE_TYPE, name), inner)
    }

    fn from_inner(context: ArmContext, inner: LoadBalancerInner) -> Self {
        let scope = ResourceScope::from_inner(context, RESOURCE_TYPE, &inner);
        Self::wrap(scope, inner)
    }
}

impl LoadBalancer {
    fn wrap(scope: ResourceScope, inner: LoadBalancerInner) -> Self {
        let mut lb = Self {
            scope,
            inner,
            frontends: ChildMap::new(),
            backends: ChildMap::new(),
            probes: ChildMap::new(),
            rules: ChildMap::new(),
            nat_rules: ChildMap::new(),
        };
        lb.init_children();
        lb
    }

    fn init_children(&mut self) {
        let props = self.inner.properties.as_ref();
        self.frontends = index_children(props.and_then(|p| p.frontend_ip_configurations.clone()));
        self.backends = index_children(props.and_then(|p| p.backend_address_pools.clone()));
        self.probes = index_children(props.and_then(|p| p.probes.clone()));
        self.rules = index_children(props.and_then(|p| p.load_balancing_rules.clone()));
        self.nat_rules = index_children(props.and_then(|p| p.inbound_nat_rules.clone()));
    }

    fn flatten_children(&mut self) {
        let props = self.inner.properties_mut();
        props.frontend_ip_configurations = Some(children_to_inner(&self.frontends));
        props.backend_address_pools = Some(children_to_inner(&self.backends));
        props.probes = Some(children_to_inner(&self.probes));
        props.load_balancing_rules = Some(children_to_inner(&self.rules));
        props.inbound_nat_rules = Some(children_to_inner(&self.nat_rules));
    }

    /// The wire model.
    #[must_use]
    pub fn inner(&self) -> &LoadBalancerInner {
        &self.inner
    }

    /// Consume the wrapper, returning the wire model with the current children.
    #[must_use]
    pub fn into_inner(mut self) -> LoadBalancerInner {
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

    /// Region.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.inner.location.as_deref()
    }

    /// Frontends keyed by name.
    #[must_use]
    pub fn frontends(&self) -> &ChildMap<Frontend> {
        &self.frontends
    }

    pub(crate) fn frontends_mut(&mut self) -> &mut ChildMap<Frontend> {
        &mut self.frontends
    }

    /// Backend pools keyed by name.
    #[must_use]
    pub fn backends(&self) -> &ChildMap<Backend> {
        &self.backends
    }

    /// Probes keyed by name.
    #[must_use]
    pub fn probes(&self) -> &ChildMap<Probe> {
        &self.probes
    }

    pub(crate) fn probes_mut(&mut self) -> &mut ChildMap<Probe> {
        &mut self.probes
    }

    /// Load-balancing rules keyed by name.
    #[must_use]
    pub fn load_balancing_rules(&self) -> &ChildMap<LoadBalancingRule> {
        &self.rules
    }

    pub(crate) fn load_balancing_rules_mut(&mut self) -> &mut ChildMap<LoadBalancingRule> {
        &mut self.rules
    }

    /// Inbound NAT rules keyed by name.
    #[must_use]
    pub fn inbound_nat_rules(&self) -> &ChildMap<InboundNatRule> {
        &self.nat_rules
    }

    pub(crate) fn inbound_nat_rules_mut(&mut self) -> &mut ChildMap<InboundNatRule> {
        &mut self.nat_rules
    }

    /// IDs of the public IP addresses on the frontends.
    #[must_use]
    pub fn public_ip_address_ids(&self) -> Vec<&str> {
        self.frontends
            .values()
            .filter_map(Frontend::public_ip_address_id)
            .collect()
    }

    /// Whether any frontend is reachable from the internet.
    #[must_use]
    pub fn is_internet_facing(&self) -> bool {
        self.frontends.values().any(Frontend::is_public)
    }

    /// Balancing rules using the named probe.
    #[must_use]
    pub fn rules_for_probe(&self, probe_name: &str) -> Vec<&LoadBalancingRule> {
        self.rules
            .values()
            .filter(|rule| rule.probe_name().is_some_and(|name| name.eq_ignore_ascii_case(probe_name)))
            .collect()
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.inner.location = Some(region.into());
        self
    }

    /// Place the balancer in an existing resource group.
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

    /// Start defining a frontend.
    #[must_use]
    pub fn define_frontend(self, name: impl Into<String>) -> FrontendDefinition {
        let frontend = Frontend::from_inner(FrontendInner::named(name));
        FrontendDefinition::new(self, frontend)
    }

    /// Start updating a frontend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the balancer has no such frontend.
    pub fn update_frontend(self, name: &str) -> Result<FrontendDefinition> {
        let frontend = self.child(&self.frontends, "frontend", name)?;
        Ok(FrontendDefinition::new(self, frontend))
    }

    /// Remove a frontend.
    #[must_use]
    pub fn without_frontend(mut self, name: &str) -> Self {
        self.frontends.remove(name);
        self
    }

    /// Add an empty backend pool.
    #[must_use]
    pub fn with_backend(mut self, name: impl Into<String>) -> Self {
        insert_child(&mut self.backends, Backend::named(name));
        self
    }

    /// Remove a backend pool.
    #[must_use]
    pub fn without_backend(mut self, name: &str) -> Self {
        self.backends.remove(name);
        self
    }

    /// Start defining a TCP probe.
    #[must_use]
    pub fn define_tcp_probe(self, name: impl Into<String>) -> ProbeDefinition {
        ProbeDefinition::fresh(self, name.into(), ProbeProtocol::Tcp)
    }

    /// Start defining an HTTP probe, requesting `/` unless told otherwise.
    #[must_use]
    pub fn define_http_probe(self, name: impl Into<String>) -> ProbeDefinition {
        ProbeDefinition::fresh(self, name.into(), ProbeProtocol::Http)
    }

    /// Start updating a probe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the balancer has no such probe.
    pub fn update_probe(self, name: &str) -> Result<ProbeDefinition> {
        let probe = self.child(&self.probes, "probe", name)?;
        Ok(ProbeDefinition::new(self, probe))
    }

    /// Remove a probe.
    #[must_use]
    pub fn without_probe(mut self, name: &str) -> Self {
        self.probes.remove(name);
        self
    }

    /// Start defining a load-balancing rule.
    #[must_use]
    pub fn define_load_balancing_rule(self, name: impl Into<String>) -> LoadBalancingRuleDefinition {
        let rule = LoadBalancingRule::from_inner(LoadBalancingRuleInner::named(name));
        LoadBalancingRuleDefinition::new(self, rule)
    }

    /// Start updating a load-balancing rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the balancer has no such rule.
    pub fn update_load_balancing_rule(self, name: &str) -> Result<LoadBalancingRuleDefinition> {
        let rule = self.child(&self.rules, "load-balancing rule", name)?;
        Ok(LoadBalancingRuleDefinition::new(self, rule))
    }

    /// Remove a load-balancing rule.
    #[must_use]
    pub fn without_load_balancing_rule(mut self, name: &str) -> Self {
        self.rules.remove(name);
        self
    }

    /// Start defining an inbound NAT rule.
    #[must_use]
    pub fn define_inbound_nat_rule(self, name: impl Into<String>) -> InboundNatRuleDefinition {
        let rule = InboundNatRule::from_inner(InboundNatRuleInner::named(name));
        InboundNatRuleDefinition::new(self, rule)
    }

    /// Remove an inbound NAT rule.
    #[must_use]
    pub fn without_inbound_nat_rule(mut self, name: &str) -> Self {
        self.nat_rules.remove(name);
        self
    }

    fn child<C: Clone>(&self, map: &ChildMap<C>, kind: &str, name: &str) -> Result<C> {
        map.get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{kind} `{name}` in `{}`", self.name())))
    }

    fn assign_default_frontend(&mut self) -> Result<()> {
        let missing = self.rules.values().any(|r| r.frontend_name().is_none())
            || self.nat_rules.values().any(|r| r.frontend_name().is_none());
        if !missing {
            return Ok(());
        }
        let resolution = resolve_default(
            self.frontends.keys().map(String::as_str),
            "frontend",
            FRONTEND_PREFIX,
            FRONTEND_NAME_LEN,
        )?;
        let Resolution::Existing(name) = resolution else {
            return Err(Error::InvalidReference(format!(
                "rules of load balancer `{}` need a frontend but none is defined",
                self.name()
            )));
        };
        for rule in self.rules.values_mut() {
            rule.props_mut()
                .frontend_ip_configuration
                .get_or_insert_with(|| SubResource::new(name.clone()));
        }
        for rule in self.nat_rules.values_mut() {
            rule.props_mut()
                .frontend_ip_configuration
                .get_or_insert_with(|| SubResource::new(name.clone()));
        }
        Ok(())
    }

    fn assign_default_backend(&mut self) -> Result<()> {
        if self.rules.values().all(|r| r.backend_name().is_some()) {
            return Ok(());
        }
        let resolution = resolve_default(
            self.backends.keys().map(String::as_str),
            "backend",
            BACKEND_PREFIX,
            BACKEND_NAME_LEN,
        )?;
        if let Resolution::Create(name) = &resolution {
            debug!(lb = self.name(), backend = %name, "creating default backend pool");
            insert_child(&mut self.backends, Backend::named(name.clone()));
        }
        let name = resolution.name();
        for rule in self.rules.values_mut() {
            rule.props_mut()
                .backend_address_pool
                .get_or_insert_with(|| SubResource::new(name));
        }
        Ok(())
    }

    fn before_put(&mut self) -> Result<()> {
        self.assign_default_frontend()?;
        self.assign_default_backend()?;
        for rule in self.rules.values_mut() {
            let props = rule.props_mut();
            link_sibling(props.frontend_ip_configuration.as_mut(), &self.scope, FRONTENDS, &self.frontends)?;
            link_sibling(props.backend_address_pool.as_mut(), &self.scope, BACKENDS, &self.backends)?;
            link_sibling(props.probe.as_mut(), &self.scope, PROBES, &self.probes)?;
        }
        for rule in self.nat_rules.values_mut() {
            let props = rule.props_mut();
            link_sibling(props.frontend_ip_configuration.as_mut(), &self.scope, FRONTENDS, &self.frontends)?;
        }
        self.flatten_children();
        Ok(())
    }

    /// Create the balancer, returning the provider's view of it.
    ///
    /// # Errors
    ///
    /// Fails when a rule references a child that does not exist, when a
    /// default frontend or backend is ambiguous, without region or resource
    /// group, or when the transport fails.
    pub async fn create(mut self) -> Result<Self> {
        self.before_put()?;
        debug!(
            name = self.name(),
            frontends = self.frontends.len(),
            rules = self.rules.len(),
            "putting load balancer"
        );
        let inner = self.scope.put(&self.inner).await?;
        Ok(Self::from_inner(self.scope.context().clone(), inner))
    }

    /// Apply pending changes to an existing balancer.
    ///
    /// # Errors
    ///
    /// Same as [`LoadBalancer::create`].
    pub async fn apply(self) -> Result<Self> {
        self.create().await
    }

    /// Reload the balancer, rebuilding its children.
    ///
    /// # Errors
    ///
    /// Fails without a resource group or when the transport fails.
    pub async fn refresh(&mut self) -> Result<()> {
        self.inner = self.scope.get().await?;
        self.init_children();
        Ok(())
    }
}
