//! Request routing rules.
//!
//! A rule joins a listener to a backend pool and backend HTTP configuration.
//! The definition can build the listener, the pool and the configuration on
//! the fly from a frontend port, backend addresses and a backend port.

use armnet_core::children::{insert_child, referenced_name, resolve_default, Child, Resolution};
use armnet_core::naming::random_resource_name;
use armnet_core::types::SubResource;
use armnet_core::Error;

use crate::gateway::ApplicationGateway;
use crate::listener::Listener;
use crate::models::{RequestRoutingRuleInner, RequestRoutingRuleProperties};
use crate::Result;

const BASIC_RULE: &str = "Basic";
const LISTENER_PREFIX: &str = "listener";
const LISTENER_NAME_LEN: usize = 13;
const FRONTEND_PREFIX: &str = "frontend";
const FRONTEND_NAME_LEN: usize = 14;

/// A request routing rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRoutingRule {
    inner: RequestRoutingRuleInner,
}

impl Child for RequestRoutingRule {
    type Properties = RequestRoutingRuleProperties;

    fn from_inner(inner: RequestRoutingRuleInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &RequestRoutingRuleInner {
        &self.inner
    }
}

impl RequestRoutingRule {
    fn props(&self) -> Option<&RequestRoutingRuleProperties> {
        self.inner.properties.as_ref()
    }

    pub(crate) fn props_mut(&mut self) -> &mut RequestRoutingRuleProperties {
        self.inner.properties_mut()
    }

    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Rule type, `Basic` for rules built here.
    #[must_use]
    pub fn rule_type(&self) -> Option<&str> {
        self.props().and_then(|p| p.rule_type.as_deref())
    }

    /// Name of the listener.
    #[must_use]
    pub fn listener_name(&self) -> Option<&str> {
        referenced_name(self.props().and_then(|p| p.http_listener.as_ref()))
    }

    /// Name of the backend pool.
    #[must_use]
    pub fn backend_name(&self) -> Option<&str> {
        referenced_name(self.props().and_then(|p| p.backend_address_pool.as_ref()))
    }

    /// Name of the backend HTTP configuration.
    #[must_use]
    pub fn backend_http_configuration_name(&self) -> Option<&str> {
        referenced_name(self.props().and_then(|p| p.backend_http_settings.as_ref()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrontendChoice {
    Public,
    Private,
}

/// Definition of a request routing rule.
#[derive(Debug, Clone)]
pub struct RequestRoutingRuleDefinition {
    parent: ApplicationGateway,
    rule: RequestRoutingRule,
    frontend: Option<FrontendChoice>,
    frontend_port: Option<u16>,
}

impl RequestRoutingRuleDefinition {
    pub(crate) fn new(parent: ApplicationGateway, name: String) -> Self {
        let mut rule = RequestRoutingRule::from_inner(RequestRoutingRuleInner::named(name));
        rule.props_mut().rule_type = Some(BASIC_RULE.to_string());
        Self {
            parent,
            rule,
            frontend: None,
            frontend_port: None,
        }
    }

    /// Route traffic received by an existing listener.
    #[must_use]
    pub fn from_listener(mut self, name: impl Into<String>) -> Self {
        self.rule.props_mut().http_listener = Some(SubResource::new(name));
        self
    }

    /// Receive traffic on the gateway's public frontend.
    #[must_use]
    pub fn from_public_frontend(mut self) -> Self {
        self.frontend = Some(FrontendChoice::Public);
        self
    }

    /// Receive traffic on the gateway's private frontend, adding one if needed.
    #[must_use]
    pub fn from_private_frontend(mut self) -> Self {
        self.frontend = Some(FrontendChoice::Private);
        self
    }

    /// Receive traffic on a port; a listener is added for it unless
    /// [`RequestRoutingRuleDefinition::from_listener`] names one.
    #[must_use]
    pub fn from_frontend_port(mut self, port: u16) -> Self {
        self.frontend_port = Some(port);
        self
    }

    /// Send traffic to an existing backend pool.
    #[must_use]
    pub fn to_backend(mut self, name: impl Into<String>) -> Self {
        self.rule.props_mut().backend_address_pool = Some(SubResource::new(name));
        self
    }

    /// Send traffic to an IP address.
    ///
    /// The address is added to the rule's pool; a rule without a pool gets a
    /// new one of its own.
    #[must_use]
    pub fn to_backend_ip_address(mut self, ip: &str) -> Self {
        let name = match self.rule.backend_name().map(str::to_string) {
            Some(name) => name,
            None => {
                let name = self.parent.ensure_unique_backend();
                self.rule.props_mut().backend_address_pool = Some(SubResource::new(name.clone()));
                name
            }
        };
        self.parent.backend_mut(&name).add_ip_address(ip);
        self
    }

    /// Talk to the backends on a port.
    ///
    /// Updates the rule's backend HTTP configuration, or gives the rule a new
    /// one of its own.
    #[must_use]
    pub fn to_backend_http_port(mut self, port: u16) -> Self {
        let name = match self.rule.backend_http_configuration_name().map(str::to_string) {
            Some(name) => name,
            None => {
                let name = self.parent.ensure_unique_backend_http_config();
                self.rule.props_mut().backend_http_settings = Some(SubResource::new(name.clone()));
                name
            }
        };
        if let Some(config) = self.parent.backend_http_configurations_mut().get_mut(&name) {
            config.props_mut().port = Some(port);
        }
        self
    }

    /// Use an existing backend HTTP configuration.
    #[must_use]
    pub fn to_backend_http_configuration(mut self, name: impl Into<String>) -> Self {
        self.rule.props_mut().backend_http_settings = Some(SubResource::new(name));
        self
    }

    fn chosen_frontend(&mut self) -> Result<Option<String>> {
        match self.frontend {
            None => Ok(None),
            Some(FrontendChoice::Private) => self.parent.ensure_default_private_frontend().map(Some),
            Some(FrontendChoice::Public) => {
                let publics = self
                    .parent
                    .frontends()
                    .values()
                    .filter(|f| f.is_public())
                    .map(|f| f.name());
                match resolve_default(publics, "public frontend", FRONTEND_PREFIX, FRONTEND_NAME_LEN)? {
                    Resolution::Existing(name) => Ok(Some(name)),
                    Resolution::Create(_) => Err(Error::InvalidArgument(format!(
                        "application gateway `{}` has no public frontend",
                        self.parent.name()
                    ))),
                }
            }
        }
    }

    fn listener_for_port(&mut self, port: u16) -> Result<String> {
        let frontend = self.chosen_frontend()?;
        let port_name = self.parent.ensure_frontend_port(port);
        let existing = self.parent.listeners().values().find(|listener| {
            listener.frontend_port_name() == Some(port_name.as_str())
                && listener.host_name().is_none()
                && (frontend.is_none() || listener.frontend_name() == frontend.as_deref())
        });
        if let Some(listener) = existing {
            return Ok(listener.name().to_string());
        }
        let name = random_resource_name(LISTENER_PREFIX, LISTENER_NAME_LEN);
        let mut listener = Listener::named(name.clone());
        let props = listener.props_mut();
        props.frontend_port = Some(SubResource::new(port_name));
        props.frontend_ip_configuration = frontend.map(SubResource::new);
        insert_child(self.parent.listeners_mut(), listener);
        Ok(name)
    }

    /// Add the rule to its gateway.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when the rule has neither a listener
    /// nor a frontend port, or asks for a public frontend the gateway lacks;
    /// [`Error::AmbiguousDefault`] when several frontends could serve it.
    pub fn attach(mut self) -> Result<ApplicationGateway> {
        if self.rule.listener_name().is_none() {
            let Some(port) = self.frontend_port else {
                return Err(Error::InvalidArgument(format!(
                    "request routing rule `{}` needs a listener or a frontend port",
                    self.rule.name()
                )));
            };
            let listener = self.listener_for_port(port)?;
            self.rule.props_mut().http_listener = Some(SubResource::new(listener));
        }
        if self.rule.backend_http_configuration_name().is_none() {
            let name = self.parent.ensure_unique_backend_http_config();
            self.rule.props_mut().backend_http_settings = Some(SubResource::new(name));
        }
        let Self { mut parent, rule, .. } = self;
        insert_child(parent.request_routing_rules_mut(), rule);
        Ok(parent)
    }
}
