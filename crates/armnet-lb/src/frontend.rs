//! Frontend IP configurations.

use armnet_core::children::{insert_child, referenced_name, Child};
use armnet_core::types::{IpAllocationMethod, SubResource};

use crate::load_balancer::LoadBalancer;
use crate::models::{FrontendInner, FrontendProperties};

/// A frontend of a load balancer: a public IP address or a private one in a subnet.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontend {
    inner: FrontendInner,
}

impl Child for Frontend {
    type Properties = FrontendProperties;

    fn from_inner(inner: FrontendInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &FrontendInner {
        &self.inner
    }
}

impl Frontend {
    fn props(&self) -> Option<&FrontendProperties> {
        self.inner.properties.as_ref()
    }

    /// Frontend name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Whether the frontend is reachable from the internet.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.public_ip_address_id().is_some()
    }

    /// Public IP address ID of an internet-facing frontend.
    #[must_use]
    pub fn public_ip_address_id(&self) -> Option<&str> {
        self.props()
            .and_then(|p| p.public_ip_address.as_ref())
            .and_then(SubResource::id)
    }

    /// Subnet ID of an internal frontend.
    #[must_use]
    pub fn subnet_id(&self) -> Option<&str> {
        self.props()
            .and_then(|p| p.subnet.as_ref())
            .and_then(SubResource::id)
    }

    /// Private address of an internal frontend.
    #[must_use]
    pub fn private_ip_address(&self) -> Option<&str> {
        self.props().and_then(|p| p.private_ip_address.as_deref())
    }

    /// Static or dynamic private address.
    #[must_use]
    pub fn private_ip_allocation_method(&self) -> Option<IpAllocationMethod> {
        self.props().and_then(|p| p.private_ip_allocation_method)
    }

    /// Names of the balancing rules using the frontend, as reported by the provider.
    #[must_use]
    pub fn load_balancing_rule_names(&self) -> Vec<&str> {
        self.props()
            .and_then(|p| p.load_balancing_rules.as_ref())
            .map(|refs| refs.iter().filter_map(|r| referenced_name(Some(r))).collect())
            .unwrap_or_default()
    }

    /// Names of the NAT rules using the frontend, as reported by the provider.
    #[must_use]
    pub fn inbound_nat_rule_names(&self) -> Vec<&str> {
        self.props()
            .and_then(|p| p.inbound_nat_rules.as_ref())
            .map(|refs| refs.iter().filter_map(|r| referenced_name(Some(r))).collect())
            .unwrap_or_default()
    }

    pub(crate) fn public(name: impl Into<String>, public_ip_id: impl Into<String>) -> Self {
        let mut inner = FrontendInner::named(name);
        inner.properties_mut().public_ip_address = Some(SubResource::new(public_ip_id));
        Self { inner }
    }

    fn props_mut(&mut self) -> &mut FrontendProperties {
        self.inner.properties_mut()
    }
}

/// Definition or update of a frontend.
#[derive(Debug, Clone)]
pub struct FrontendDefinition {
    parent: LoadBalancer,
    frontend: Frontend,
}

impl FrontendDefinition {
    pub(crate) fn new(parent: LoadBalancer, frontend: Frontend) -> Self {
        Self { parent, frontend }
    }

    /// Make the frontend internet-facing through an existing public IP address.
    ///
    /// Clears any private subnet settings.
    #[must_use]
    pub fn with_existing_public_ip(mut self, public_ip_id: impl Into<String>) -> Self {
        let props = self.frontend.props_mut();
        props.public_ip_address = Some(SubResource::new(public_ip_id));
        props.subnet = None;
        props.private_ip_address = None;
        props.private_ip_allocation_method = None;
        self
    }

    /// Make the frontend internal, in an existing subnet.
    ///
    /// Clears any public IP address. The private address is dynamic unless
    /// [`FrontendDefinition::with_private_ip_static`] is called.
    #[must_use]
    pub fn with_existing_subnet(mut self, subnet_id: impl Into<String>) -> Self {
        let props = self.frontend.props_mut();
        props.subnet = Some(SubResource::new(subnet_id));
        props.public_ip_address = None;
        props.private_ip_allocation_method
            .get_or_insert(IpAllocationMethod::Dynamic);
        self
    }

    /// Let the platform assign the private address.
    #[must_use]
    pub fn with_private_ip_dynamic(mut self) -> Self {
        let props = self.frontend.props_mut();
        props.private_ip_allocation_method = Some(IpAllocationMethod::Dynamic);
        props.private_ip_address = None;
        self
    }

    /// Use a fixed private address.
    #[must_use]
    pub fn with_private_ip_static(mut self, ip: impl Into<String>) -> Self {
        let props = self.frontend.props_mut();
        props.private_ip_allocation_method = Some(IpAllocationMethod::Static);
        props.private_ip_address = Some(ip.into());
        self
    }

    /// Add the frontend to its load balancer.
    #[must_use]
    pub fn attach(self) -> LoadBalancer {
        let Self { mut parent, frontend } = self;
        insert_child(parent.frontends_mut(), frontend);
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
    const PIP: &str = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/publicIPAddresses/pip1";

    fn balancer() -> LoadBalancer {
        LoadBalancer::define(context(MockTransport::new()), "lb1".into())
    }

    #[test]
    fn private_frontend_defaults_to_dynamic() {
        let lb = balancer().define_frontend("internal").with_existing_subnet(SUBNET).attach();
        let frontend = &lb.frontends()["internal"];
        assert!(!frontend.is_public());
        assert_eq!(frontend.subnet_id(), Some(SUBNET));
        assert_eq!(frontend.private_ip_allocation_method(), Some(IpAllocationMethod::Dynamic));
    }

    #[test]
    fn switching_to_public_clears_subnet() {
        let lb = balancer()
            .define_frontend("fe")
            .with_existing_subnet(SUBNET)
            .with_private_ip_static("10.0.0.7")
            .with_existing_public_ip(PIP)
            .attach();
        let frontend = &lb.frontends()["fe"];
        assert!(frontend.is_public());
        assert_eq!(frontend.subnet_id(), None);
        assert_eq!(frontend.private_ip_address(), None);
    }
}
