//! HTTP listeners.

use armnet_core::children::{insert_child, referenced_name, Child};
use armnet_core::types::SubResource;
use armnet_core::Error;

use crate::gateway::ApplicationGateway;
use crate::models::{ApplicationGatewayProtocol, ListenerInner, ListenerProperties};
use crate::Result;

/// An HTTP listener: a frontend, a port and a protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct Listener {
    inner: ListenerInner,
}

impl Child for Listener {
    type Properties = ListenerProperties;

    fn from_inner(inner: ListenerInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &ListenerInner {
        &self.inner
    }
}

impl Listener {
    pub(crate) fn named(name: impl Into<String>) -> Self {
        let mut inner = ListenerInner::named(name);
        inner.properties_mut().protocol = Some(ApplicationGatewayProtocol::Http);
        Self { inner }
    }

    fn props(&self) -> Option<&ListenerProperties> {
        self.inner.properties.as_ref()
    }

    pub(crate) fn props_mut(&mut self) -> &mut ListenerProperties {
        self.inner.properties_mut()
    }

    /// Listener name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Name of the frontend.
    #[must_use]
    pub fn frontend_name(&self) -> Option<&str> {
        referenced_name(self.props().and_then(|p| p.frontend_ip_configuration.as_ref()))
    }

    /// Name of the frontend port.
    #[must_use]
    pub fn frontend_port_name(&self) -> Option<&str> {
        referenced_name(self.props().and_then(|p| p.frontend_port.as_ref()))
    }

    /// Protocol accepted.
    #[must_use]
    pub fn protocol(&self) -> Option<ApplicationGatewayProtocol> {
        self.props().and_then(|p| p.protocol)
    }

    /// Host name matched.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.props().and_then(|p| p.host_name.as_deref())
    }
}

/// Definition or update of a listener.
#[derive(Debug, Clone)]
pub struct ListenerDefinition {
    parent: ApplicationGateway,
    listener: Listener,
}

impl ListenerDefinition {
    pub(crate) fn new(parent: ApplicationGateway, listener: Listener) -> Self {
        Self { parent, listener }
    }

    /// Accept traffic on a frontend of this gateway.
    ///
    /// Without a frontend the gateway's default frontend is used.
    #[must_use]
    pub fn with_frontend(mut self, name: impl Into<String>) -> Self {
        self.listener.props_mut().frontend_ip_configuration = Some(SubResource::new(name));
        self
    }

    /// Accept traffic on a port number, adding a frontend port if needed.
    #[must_use]
    pub fn with_frontend_port(mut self, port: u16) -> Self {
        let name = self.parent.ensure_frontend_port(port);
        self.listener.props_mut().frontend_port = Some(SubResource::new(name));
        self
    }

    /// Accept traffic on an existing frontend port, by name.
    #[must_use]
    pub fn with_existing_frontend_port(mut self, name: impl Into<String>) -> Self {
        self.listener.props_mut().frontend_port = Some(SubResource::new(name));
        self
    }

    /// Accept HTTP.
    #[must_use]
    pub fn with_http(mut self) -> Self {
        self.listener.props_mut().protocol = Some(ApplicationGatewayProtocol::Http);
        self
    }

    /// Accept HTTPS.
    #[must_use]
    pub fn with_https(mut self) -> Self {
        self.listener.props_mut().protocol = Some(ApplicationGatewayProtocol::Https);
        self
    }

    /// Only match requests for a host name.
    #[must_use]
    pub fn with_host_name(mut self, host_name: impl Into<String>) -> Self {
        self.listener.props_mut().host_name = Some(host_name.into());
        self
    }

    /// Add the listener to its gateway.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] without a frontend port.
    pub fn attach(self) -> Result<ApplicationGateway> {
        let Self { mut parent, listener } = self;
        if listener.frontend_port_name().is_none() {
            return Err(Error::InvalidArgument(format!(
                "listener `{}` has no frontend port",
                listener.name()
            )));
        }
        insert_child(parent.listeners_mut(), listener);
        Ok(parent)
    }
}
