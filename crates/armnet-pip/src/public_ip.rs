//! Fluent wrapper around a public IP address.

use armnet_core::resource_id::ResourceId;
use armnet_core::types::{IpAllocationMethod, IpVersion};
use armnet_core::{ArmContext, Error, ResourceScope, TopLevelResource};
use tracing::debug;

use crate::models::{PublicIpAddressInner, PublicIpAddressProperties, PublicIpDnsSettings, PublicIpSku};
use crate::Result;

/// Resource type segment of public IP addresses.
pub const RESOURCE_TYPE: &str = "publicIPAddresses";

const MIN_IDLE_TIMEOUT: u32 = 4;
const MAX_IDLE_TIMEOUT: u32 = 30;

/// A public IP address, either being defined or loaded from the provider.
#[derive(Debug, Clone)]
pub struct PublicIpAddress {
    scope: ResourceScope,
    inner: PublicIpAddressInner,
}

impl TopLevelResource for PublicIpAddress {
    const RESOURCE_TYPE: &'static str = RESOURCE_TYPE;
    type Inner = PublicIpAddressInner;

    fn define(context: ArmContext, name: String) -> Self {
        let mut inner = PublicIpAddressInner::default();
        inner.name = Some(name.clone());
        inner.properties = Some(PublicIpAddressProperties::default());
        Self {
            scope: ResourceScope::new(context, RESOURCE_TYPE, name),
            inner,
        }
    }

    fn from_inner(context: ArmContext, inner: PublicIpAddressInner) -> Self {
        Self {
            scope: ResourceScope::from_inner(context, RESOURCE_TYPE, &inner),
            inner,
        }
    }
}

impl PublicIpAddress {
    /// The wire model.
    #[must_use]
    pub fn inner(&self) -> &PublicIpAddressInner {
        &self.inner
    }

    /// Consume the wrapper, returning the wire model.
    #[must_use]
    pub fn into_inner(self) -> PublicIpAddressInner {
        self.inner
    }

    fn props(&self) -> Option<&PublicIpAddressProperties> {
        self.inner.properties.as_ref()
    }

    fn dns(&self) -> Option<&PublicIpDnsSettings> {
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

    /// Region.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.inner.location.as_deref()
    }

    /// The assigned address, once allocated.
    #[must_use]
    pub fn ip_address(&self) -> Option<&str> {
        self.props().and_then(|p| p.ip_address.as_deref())
    }

    /// Static or dynamic assignment.
    #[must_use]
    pub fn allocation_method(&self) -> Option<IpAllocationMethod> {
        self.props().and_then(|p| p.allocation_method)
    }

    /// Address family.
    #[must_use]
    pub fn version(&self) -> Option<IpVersion> {
        self.props().and_then(|p| p.address_version)
    }

    /// Fully qualified domain name.
    #[must_use]
    pub fn fqdn(&self) -> Option<&str> {
        self.dns().and_then(|d| d.fqdn.as_deref())
    }

    /// Leaf domain label.
    #[must_use]
    pub fn leaf_domain_label(&self) -> Option<&str> {
        self.dns().and_then(|d| d.domain_name_label.as_deref())
    }

    /// Reverse FQDN.
    #[must_use]
    pub fn reverse_fqdn(&self) -> Option<&str> {
        self.dns().and_then(|d| d.reverse_fqdn.as_deref())
    }

    /// TCP idle timeout in minutes.
    #[must_use]
    pub fn idle_timeout_minutes(&self) -> Option<u32> {
        self.props().and_then(|p| p.idle_timeout_in_minutes)
    }

    /// SKU, if recognized.
    #[must_use]
    pub fn sku(&self) -> Option<PublicIpSku> {
        self.inner.sku.as_ref().and_then(PublicIpSku::from_sku)
    }

    /// ID of the IP configuration the address is assigned to.
    #[must_use]
    pub fn assigned_resource_id(&self) -> Option<&str> {
        self.props()
            .and_then(|p| p.ip_configuration.as_ref())
            .and_then(|c| c.id())
    }

    fn assigned_to(&self, resource_type: &str) -> bool {
        self.assigned_resource_id()
            .and_then(|id| ResourceId::parse(id).ok())
            .is_some_and(|id| id.name_of(resource_type).is_some())
    }

    /// Whether a network interface uses the address.
    #[must_use]
    pub fn has_assigned_network_interface(&self) -> bool {
        self.assigned_to("networkInterfaces")
    }

    /// Whether a load balancer frontend uses the address.
    #[must_use]
    pub fn has_assigned_load_balancer(&self) -> bool {
        self.assigned_to("loadBalancers")
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.inner.location = Some(region.into());
        self
    }

    /// Place the address in an existing resource group.
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

    /// Allocate the address statically.
    #[must_use]
    pub fn with_static_ip(mut self) -> Self {
        self.inner.properties_mut().allocation_method = Some(IpAllocationMethod::Static);
        self
    }

    /// Allocate the address dynamically.
    #[must_use]
    pub fn with_dynamic_ip(mut self) -> Self {
        self.inner.properties_mut().allocation_method = Some(IpAllocationMethod::Dynamic);
        self
    }

    fn dns_mut(&mut self) -> &mut PublicIpDnsSettings {
        self.inner
            .properties_mut()
            .dns_settings
            .get_or_insert_with(PublicIpDnsSettings::default)
    }

    /// Set the leaf domain label. Labels are lower case.
    #[must_use]
    pub fn with_leaf_domain_label(mut self, label: impl AsRef<str>) -> Self {
        self.dns_mut().domain_name_label = Some(label.as_ref().to_lowercase());
        self
    }

    /// Remove the leaf domain label and FQDN.
    #[must_use]
    pub fn without_leaf_domain_label(mut self) -> Self {
        let props = self.inner.properties_mut();
        if let Some(dns) = props.dns_settings.as_mut() {
            dns.domain_name_label = None;
            dns.fqdn = None;
            if dns.reverse_fqdn.is_none() {
                props.dns_settings = None;
            }
        }
        self
    }

    /// Set the reverse FQDN.
    #[must_use]
    pub fn with_reverse_fqdn(mut self, reverse_fqdn: impl AsRef<str>) -> Self {
        self.dns_mut().reverse_fqdn = Some(reverse_fqdn.as_ref().to_lowercase());
        self
    }

    /// Remove the reverse FQDN.
    #[must_use]
    pub fn without_reverse_fqdn(mut self) -> Self {
        if let Some(dns) = self.inner.properties_mut().dns_settings.as_mut() {
            dns.reverse_fqdn = None;
        }
        self
    }

    /// Set the TCP idle timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] outside 4 to 30 minutes.
    pub fn with_idle_timeout_minutes(mut self, minutes: u32) -> Result<Self> {
        if !(MIN_IDLE_TIMEOUT..=MAX_IDLE_TIMEOUT).contains(&minutes) {
            return Err(Error::InvalidArgument(format!(
                "idle timeout must be between {MIN_IDLE_TIMEOUT} and {MAX_IDLE_TIMEOUT} minutes, got {minutes}"
            )));
        }
        self.inner.properties_mut().idle_timeout_in_minutes = Some(minutes);
        Ok(self)
    }

    /// Set the SKU. The Standard SKU switches to static allocation.
    #[must_use]
    pub fn with_sku(mut self, sku: PublicIpSku) -> Self {
        self.inner.sku = Some(sku.to_sku());
        if sku == PublicIpSku::Standard {
            self = self.with_static_ip();
        }
        self
    }

    /// Set the address family.
    #[must_use]
    pub fn with_ip_version(mut self, version: IpVersion) -> Self {
        self.inner.properties_mut().address_version = Some(version);
        self
    }

    /// Pin the address to an availability zone.
    #[must_use]
    pub fn with_availability_zone(mut self, zone: impl Into<String>) -> Self {
        self.inner
            .zones
            .get_or_insert_with(Vec::new)
            .push(zone.into());
        self
    }

    fn before_put(&mut self) -> Result<()> {
        let standard = self.sku() == Some(PublicIpSku::Standard);
        let props = self.inner.properties_mut();
        match props.allocation_method {
            Some(IpAllocationMethod::Dynamic) if standard => {
                return Err(Error::InvalidArgument(
                    "Standard SKU public IP addresses must be statically allocated".into(),
                ))
            }
            None if standard => props.allocation_method = Some(IpAllocationMethod::Static),
            None => props.allocation_method = Some(IpAllocationMethod::Dynamic),
            Some(_) => {}
        }
        Ok(())
    }

    /// Create the address, returning the provider's view of it.
    ///
    /// # Errors
    ///
    /// Fails on invalid settings, a missing region or resource group, or a transport error.
    pub async fn create(mut self) -> Result<Self> {
        self.before_put()?;
        debug!(name = self.name(), "putting public IP address");
        let inner = self.scope.put(&self.inner).await?;
        Ok(Self::from_inner(self.scope.context().clone(), inner))
    }

    /// Apply pending changes to an existing address.
    ///
    /// # Errors
    ///
    /// Same as [`PublicIpAddress::create`].
    pub async fn apply(self) -> Result<Self> {
        self.create().await
    }

    /// Reload the address from the provider.
    ///
    /// # Errors
    ///
    /// Fails without a resource group or when the transport fails.
    pub async fn refresh(&mut self) -> Result<()> {
        self.inner = self.scope.get().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, MockTransport};
    use serde_json::json;

    fn defined() -> PublicIpAddress {
        PublicIpAddress::define(context(MockTransport::new()), "pip1".into())
            .with_region("westus")
            .with_existing_resource_group("rg")
    }

    #[test]
    fn idle_timeout_is_bounded() {
        assert!(matches!(
            defined().with_idle_timeout_minutes(3),
            Err(Error::InvalidArgument(_))
        ));
        assert!(defined().with_idle_timeout_minutes(31).is_err());
        let pip = defined().with_idle_timeout_minutes(30).unwrap();
        assert_eq!(pip.idle_timeout_minutes(), Some(30));
    }

    #[test]
    fn standard_sku_forces_static() {
        let pip = defined().with_dynamic_ip().with_sku(PublicIpSku::Standard);
        assert_eq!(pip.allocation_method(), Some(IpAllocationMethod::Static));
    }

    #[test]
    fn dynamic_after_standard_is_rejected() {
        let mut pip = defined().with_sku(PublicIpSku::Standard).with_dynamic_ip();
        assert!(matches!(pip.before_put(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn leaf_label_is_lowercased_and_removable() {
        let pip = defined().with_leaf_domain_label("MyApp");
        assert_eq!(pip.leaf_domain_label(), Some("myapp"));
        let pip = pip.without_leaf_domain_label();
        assert!(pip.inner().properties.as_ref().unwrap().dns_settings.is_none());
    }

    #[test]
    fn assignment_is_derived_from_ip_configuration() {
        let inner: PublicIpAddressInner = serde_json::from_value(json!({
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/publicIPAddresses/pip1",
            "name": "pip1",
            "properties": {
                "ipConfiguration": {"id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/loadBalancers/lb1/frontendIPConfigurations/fe1"}
            }
        }))
        .unwrap();
        let pip = PublicIpAddress::from_inner(context(MockTransport::new()), inner);
        assert!(pip.has_assigned_load_balancer());
        assert!(!pip.has_assigned_network_interface());
        assert_eq!(pip.resource_group_name(), Some("rg"));
    }

    #[tokio::test]
    async fn create_defaults_to_dynamic_and_puts_at_resource_id() {
        let mut transport = MockTransport::new();
        transport
            .expect_put()
            .withf(|path, _, body| {
                path.ends_with("/resourceGroups/rg/providers/Microsoft.Network/publicIPAddresses/pip1")
                    && body["properties"]["publicIPAllocationMethod"] == "Dynamic"
            })
            .times(1)
            .returning(|path, _, mut body| {
                body["id"] = json!(path);
                body["properties"]["ipAddress"] = json!("20.0.0.1");
                Ok(body)
            });

        let pip = PublicIpAddress::define(context(transport), "pip1".into())
            .with_region("westus")
            .with_existing_resource_group("rg")
            .create()
            .await
            .unwrap();
        assert_eq!(pip.ip_address(), Some("20.0.0.1"));
        assert!(pip.id().is_some());
    }

    #[tokio::test]
    async fn create_without_resource_group_fails() {
        let err = PublicIpAddress::define(context(MockTransport::new()), "pip1".into())
            .with_region("westus")
            .create()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
