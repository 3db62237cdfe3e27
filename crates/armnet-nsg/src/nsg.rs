//! Fluent wrapper around a network security group.

use armnet_core::children::{children_to_inner, index_children, Child, ChildMap};
use armnet_core::types::reference_ids;
use armnet_core::{ArmContext, Error, ResourceScope, TopLevelResource};
use tracing::debug;

use crate::models::{NetworkSecurityGroupInner, NetworkSecurityGroupProperties, SecurityRuleInner};
use crate::rule::{SecurityRule, SecurityRuleDefinition};
use crate::Result;

/// Resource type segment of network security groups.
pub const RESOURCE_TYPE: &str = "networkSecurityGroups";

/// A network security group with its custom and default rules.
#[derive(Debug, Clone)]
pub struct NetworkSecurityGroup {
    scope: ResourceScope,
    inner: NetworkSecurityGroupInner,
    rules: ChildMap<SecurityRule>,
    default_rules: ChildMap<SecurityRule>,
}

impl TopLevelResource for NetworkSecurityGroup {
    const RESOURCE_TYPE: &'static str = RESOURCE_TYPE;
    type Inner = NetworkSecurityGroupInner;

    fn define(context: ArmContext, name: String) -> Self {
        let mut inner = NetworkSecurityGroupInner::default();
        inner.name = Some(name.clone());
        inner.properties = Some(NetworkSecurityGroupProperties::default());
        Self {
            scope: ResourceScope::new(context, RESOURCE_TYPE, name),
            inner,
            rules: ChildMap::new(),
            default_rules: ChildMap::new(),
        }
    }

    fn from_inner(context: ArmContext, inner: NetworkSecurityGroupInner) -> Self {
        let scope = ResourceScope::from_inner(context, RESOURCE_TYPE, &inner);
        let mut nsg = Self {
            scope,
            inner,
            rules: ChildMap::new(),
            default_rules: ChildMap::new(),
        };
        nsg.init_children();
        nsg
    }
}

impl NetworkSecurityGroup {
    fn init_children(&mut self) {
        let props = self.inner.properties.as_ref();
        self.rules = index_children(props.and_then(|p| p.security_rules.clone()));
        self.default_rules = index_children(props.and_then(|p| p.default_security_rules.clone()));
    }

    /// The wire model.
    #[must_use]
    pub fn inner(&self) -> &NetworkSecurityGroupInner {
        &self.inner
    }

    /// Consume the wrapper, returning the wire model with the current rules.
    #[must_use]
    pub fn into_inner(mut self) -> NetworkSecurityGroupInner {
        self.inner.properties_mut().security_rules = Some(children_to_inner(&self.rules));
        self.inner
    }

    fn props(&self) -> Option<&NetworkSecurityGroupProperties> {
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

    /// Custom rules keyed by name.
    #[must_use]
    pub fn security_rules(&self) -> &ChildMap<SecurityRule> {
        &self.rules
    }

    pub(crate) fn rules_mut(&mut self) -> &mut ChildMap<SecurityRule> {
        &mut self.rules
    }

    /// Built-in rules keyed by name.
    #[must_use]
    pub fn default_security_rules(&self) -> &ChildMap<SecurityRule> {
        &self.default_rules
    }

    /// IDs of the NICs the group is applied to.
    #[must_use]
    pub fn network_interface_ids(&self) -> Vec<String> {
        reference_ids(self.props().and_then(|p| p.network_interfaces.as_ref()))
    }

    /// IDs of the subnets the group is applied to.
    #[must_use]
    pub fn associated_subnet_ids(&self) -> Vec<String> {
        reference_ids(self.props().and_then(|p| p.subnets.as_ref()))
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.inner.location = Some(region.into());
        self
    }

    /// Place the group in an existing resource group.
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

    /// Start defining a rule.
    #[must_use]
    pub fn define_rule(self, name: impl Into<String>) -> SecurityRuleDefinition {
        SecurityRuleDefinition::new(self, SecurityRuleInner::named(name))
    }

    /// Start updating an existing rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the group has no such custom rule.
    pub fn update_rule(self, name: &str) -> Result<SecurityRuleDefinition> {
        let inner = self
            .rules
            .get(name)
            .map(|rule| rule.inner().clone())
            .ok_or_else(|| Error::NotFound(format!("security rule `{name}` in `{}`", self.name())))?;
        Ok(SecurityRuleDefinition::new(self, inner))
    }

    /// Remove a custom rule.
    #[must_use]
    pub fn without_rule(mut self, name: &str) -> Self {
        self.rules.remove(name);
        self
    }

    /// Create the group, returning the provider's view of it.
    ///
    /// # Errors
    ///
    /// Fails without a region or resource group, or when the transport fails.
    pub async fn create(mut self) -> Result<Self> {
        self.inner.properties_mut().security_rules = Some(children_to_inner(&self.rules));
        debug!(name = self.name(), rules = self.rules.len(), "putting network security group");
        let inner = self.scope.put(&self.inner).await?;
        Ok(Self::from_inner(self.scope.context().clone(), inner))
    }

    /// Apply pending changes to an existing group.
    ///
    /// # Errors
    ///
    /// Same as [`NetworkSecurityGroup::create`].
    pub async fn apply(self) -> Result<Self> {
        self.create().await
    }

    /// Reload the group, rebuilding both rule maps.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, MockTransport};
    use serde_json::json;

    fn loaded() -> NetworkSecurityGroup {
        let inner: NetworkSecurityGroupInner = serde_json::from_value(json!({
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/networkSecurityGroups/nsg1",
            "name": "nsg1",
            "location": "westus",
            "properties": {
                "securityRules": [{"name": "ssh", "properties": {"access": "Allow", "direction": "Inbound", "priority": 100}}],
                "defaultSecurityRules": [{"name": "DenyAllInBound", "properties": {"access": "Deny", "priority": 65500}}],
                "subnets": [{"id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/v/subnets/a"}],
                "networkInterfaces": [{"id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/networkInterfaces/nic1"}]
            }
        }))
        .unwrap();
        NetworkSecurityGroup::from_inner(context(MockTransport::new()), inner)
    }

    #[test]
    fn rule_maps_are_separate() {
        let nsg = loaded();
        assert!(nsg.security_rules().contains_key("ssh"));
        assert!(nsg.default_security_rules().contains_key("DenyAllInBound"));
        assert_eq!(nsg.associated_subnet_ids().len(), 1);
        assert_eq!(nsg.network_interface_ids().len(), 1);
    }

    #[test]
    fn update_and_remove_rules() {
        let nsg = loaded()
            .update_rule("ssh")
            .unwrap()
            .with_priority(150)
            .attach()
            .unwrap();
        assert_eq!(nsg.security_rules()["ssh"].priority(), Some(150));
        assert!(nsg.without_rule("ssh").security_rules().is_empty());
        assert!(matches!(loaded().update_rule("nope"), Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn create_sends_only_custom_rules() {
        let mut transport = MockTransport::new();
        transport
            .expect_put()
            .withf(|path, _, body| {
                path.ends_with("/networkSecurityGroups/nsg1")
                    && body["properties"]["securityRules"][0]["name"] == "http"
                    && body["properties"].get("defaultSecurityRules").is_none()
            })
            .times(1)
            .returning(|_, _, body| Ok(body));

        let nsg = NetworkSecurityGroup::define(context(transport), "nsg1".into())
            .with_region("westus")
            .with_existing_resource_group("rg")
            .define_rule("http")
            .allow_inbound()
            .to_port(80)
            .with_priority(200)
            .attach()
            .unwrap()
            .create()
            .await
            .unwrap();
        assert_eq!(nsg.security_rules().len(), 1);
    }
}
