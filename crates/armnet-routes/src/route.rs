//! Routes and their definition stages.

use armnet_core::children::{insert_child, Child};
use armnet_core::Error;

use crate::models::{NextHopType, RouteInner, RouteProperties};
use crate::route_table::RouteTable;
use crate::Result;

/// A route of a route table.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    inner: RouteInner,
}

impl Child for Route {
    type Properties = RouteProperties;

    fn from_inner(inner: RouteInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &RouteInner {
        &self.inner
    }
}

impl Route {
    fn props(&self) -> Option<&RouteProperties> {
        self.inner.properties.as_ref()
    }

    /// Route name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Destination CIDR.
    #[must_use]
    pub fn destination_address_prefix(&self) -> Option<&str> {
        self.props().and_then(|p| p.address_prefix.as_deref())
    }

    /// Kind of next hop.
    #[must_use]
    pub fn next_hop_type(&self) -> Option<NextHopType> {
        self.props().and_then(|p| p.next_hop_type)
    }

    /// Next hop address.
    #[must_use]
    pub fn next_hop_ip_address(&self) -> Option<&str> {
        self.props().and_then(|p| p.next_hop_ip_address.as_deref())
    }
}

/// Definition or update of a route.
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    parent: RouteTable,
    inner: RouteInner,
}

impl RouteDefinition {
    pub(crate) fn new(parent: RouteTable, inner: RouteInner) -> Self {
        Self { parent, inner }
    }

    /// Set the destination CIDR.
    #[must_use]
    pub fn with_destination_address_prefix(mut self, cidr: impl Into<String>) -> Self {
        self.inner.properties_mut().address_prefix = Some(cidr.into());
        self
    }

    /// Send traffic to a hop that needs no address.
    #[must_use]
    pub fn with_next_hop(mut self, hop: NextHopType) -> Self {
        let props = self.inner.properties_mut();
        props.next_hop_type = Some(hop);
        props.next_hop_ip_address = None;
        self
    }

    /// Send traffic to a virtual appliance.
    #[must_use]
    pub fn with_next_hop_to_virtual_appliance(mut self, ip: impl Into<String>) -> Self {
        let props = self.inner.properties_mut();
        props.next_hop_type = Some(NextHopType::VirtualAppliance);
        props.next_hop_ip_address = Some(ip.into());
        self
    }

    /// Validate the route and add it to its table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] without a destination or next hop,
    /// or for a virtual appliance hop without an address.
    pub fn attach(mut self) -> Result<RouteTable> {
        let name = self.inner.name.clone().unwrap_or_default();
        let props = self.inner.properties_mut();
        if props.address_prefix.is_none() {
            return Err(Error::InvalidArgument(format!("route `{name}` has no destination")));
        }
        match (props.next_hop_type, props.next_hop_ip_address.as_deref()) {
            (None, _) => {
                return Err(Error::InvalidArgument(format!("route `{name}` has no next hop")));
            }
            (Some(NextHopType::VirtualAppliance), None | Some("")) => {
                return Err(Error::InvalidArgument(format!(
                    "route `{name}` to a virtual appliance needs its IP address"
                )));
            }
            _ => {}
        }
        let Self { mut parent, inner } = self;
        insert_child(parent.routes_mut(), Route::from_inner(inner));
        Ok(parent)
    }
}
