//! Frontend IP configurations and frontend ports.

use armnet_core::children::{insert_child, Child};
use armnet_core::types::{IpAllocationMethod, SubResource};

use crate::gateway::ApplicationGateway;
use crate::models::{FrontendInner, FrontendPortInner, FrontendPortProperties, FrontendProperties};

/// A frontend of an application gateway.
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

    pub(crate) fn props_mut(&mut self) -> &mut FrontendProperties {
        self.inner.properties_mut()
    }

    pub(crate) fn private(name: impl Into<String>) -> Self {
        let mut frontend = Self::from_inner(FrontendInner::named(name));
        frontend.props_mut().private_ip_allocation_method = Some(IpAllocationMethod::Dynamic);
        frontend
    }

    /// Frontend name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Whether the frontend has a public IP address.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.public_ip_address_id().is_some()
    }

    /// Whether the frontend is internal.
    #[must_use]
    pub fn is_private(&self) -> bool {
        !self.is_public()
    }

    /// Public IP address ID.
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
}

/// Definition of a frontend.
#[derive(Debug, Clone)]
pub struct FrontendDefinition {
    parent: ApplicationGateway,
    frontend: Frontend,
}

impl FrontendDefinition {
    pub(crate) fn new(parent: ApplicationGateway, frontend: Frontend) -> Self {
        Self { parent, frontend }
    }

    /// Expose the frontend through an existing public IP address.
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
    /// Without a subnet, internal frontends use the gateway's own subnet.
    #[must_use]
    pub fn with_existing_subnet(mut self, subnet_id: impl Into<String>) -> Self {
        let props = self.frontend.props_mut();
        props.subnet = Some(SubResource::new(subnet_id));
        props.public_ip_address = None;
        props.private_ip_allocation_method.get_or_insert(IpAllocationMethod::Dynamic);
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

    /// Let the platform assign the private address.
    #[must_use]
    pub fn with_private_ip_dynamic(mut self) -> Self {
        let props = self.frontend.props_mut();
        props.private_ip_allocation_method = Some(IpAllocationMethod::Dynamic);
        props.private_ip_address = None;
        self
    }

    /// Add the frontend to its gateway.
    #[must_use]
    pub fn attach(self) -> ApplicationGateway {
        let Self { mut parent, frontend } = self;
        insert_child(parent.frontends_mut(), frontend);
        parent
    }
}

/// A frontend port of an application gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontendPort {
    inner: FrontendPortInner,
}

impl Child for FrontendPort {
    type Properties = FrontendPortProperties;

    fn from_inner(inner: FrontendPortInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &FrontendPortInner {
        &self.inner
    }
}

impl FrontendPort {
    pub(crate) fn new(name: impl Into<String>, port: u16) -> Self {
        let mut inner = FrontendPortInner::named(name);
        inner.properties_mut().port = Some(port);
        Self { inner }
    }

    /// Port name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Port number.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.inner.properties.as_ref().and_then(|p| p.port)
    }
}
