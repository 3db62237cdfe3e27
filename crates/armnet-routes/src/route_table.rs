//! Fluent wrapper around a route table.

use armnet_core::children::{children_to_inner, index_children, Child, ChildMap};
use armnet_core::naming::random_resource_name;
use armnet_core::types::reference_ids;
use armnet_core::{ArmContext, Error, ResourceScope, TopLevelResource};
use tracing::debug;

use crate::models::{NextHopType, RouteInner, RouteTableInner, RouteTableProperties};
use crate::route::{Route, RouteDefinition};
use crate::Result;

/// Resource type segment of route tables.
pub const RESOURCE_TYPE: &str = "routeTables";

const ROUTE_NAME_PREFIX: &str = "route_";
const ROUTE_NAME_LEN: usize = 20;

/// A route table and its routes.
#[derive(Debug, Clone)]
pub struct RouteTable {
    scope: ResourceScope,
    inner: RouteTableInner,
    routes: ChildMap<Route>,
}

impl TopLevelResource for RouteTable {
    const RESOURCE_TYPE: &'static str = RESOURCE_TYPE;
    type Inner = RouteTableInner;

    fn define(context: ArmContext, name: String) -> Self {
        let mut inner = RouteTableInner::default();
        inner.name = Some(name.clone());
        inner.properties = Some(RouteTableProperties::default());
        Self {
            scope: ResourceScope::new(context, RESOURCE_TYPE, name),
            inner,
            routes: ChildMap::new(),
        }
    }

    fn from_inner(context: ArmContext, inner: RouteTableInner) -> Self {
        let scope = ResourceScope::from_inner(context, RESOURCE_TYPE, &inner);
        let routes = index_children(inner.properties.as_ref().and_then(|p| p.routes.clone()));
        Self {
            scope,
            inner,
            routes,
        }
    }
}

impl RouteTable {
    /// The wire model.
    #[must_use]
    pub fn inner(&self) -> &RouteTableInner {
        &self.inner
    }

    /// Consume the wrapper, returning the wire model with the current routes.
    #[must_use]
    pub fn into_inner(mut self) -> RouteTableInner {
        self.inner.properties_mut().routes = Some(children_to_inner(&self.routes));
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

    /// Routes keyed by name.
    #[must_use]
    pub fn routes(&self) -> &ChildMap<Route> {
        &self.routes
    }

    pub(crate) fn routes_mut(&mut self) -> &mut ChildMap<Route> {
        &mut self.routes
    }

    /// Whether BGP route propagation is disabled.
    #[must_use]
    pub fn is_bgp_route_propagation_disabled(&self) -> bool {
        self.inner
            .properties
            .as_ref()
            .and_then(|p| p.disable_bgp_route_propagation)
            .unwrap_or(false)
    }

    /// IDs of the subnets the table is applied to.
    #[must_use]
    pub fn associated_subnet_ids(&self) -> Vec<String> {
        reference_ids(self.inner.properties.as_ref().and_then(|p| p.subnets.as_ref()))
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.inner.location = Some(region.into());
        self
    }

    /// Place the table in an existing resource group.
    #[must_use]
    pub fn with_existing_resource_group(mut self, resource_group: impl Into<String>) -> Self {
        self.scope.set_resource_group(resource_group);
        self
    }

    /// Start defining a route.
    #[must_use]
    pub fn define_route(self, name: impl Into<String>) -> RouteDefinition {
        RouteDefinition::new(self, RouteInner::named(name))
    }

    /// Start updating an existing route.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the table has no such route.
    pub fn update_route(self, name: &str) -> Result<RouteDefinition> {
        let inner = self
            .routes
            .get(name)
            .map(|route| route.inner().clone())
            .ok_or_else(|| Error::NotFound(format!("route `{name}` in `{}`", self.name())))?;
        Ok(RouteDefinition::new(self, inner))
    }

    /// Add a route with a generated name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a virtual appliance hop, which needs an address.
    pub fn with_route(self, destination: impl Into<String>, hop: NextHopType) -> Result<Self> {
        let name = random_resource_name(ROUTE_NAME_PREFIX, ROUTE_NAME_LEN);
        self.define_route(name)
            .with_destination_address_prefix(destination)
            .with_next_hop(hop)
            .attach()
    }

    /// Remove a route.
    #[must_use]
    pub fn without_route(mut self, name: &str) -> Self {
        self.routes.remove(name);
        self
    }

    /// Withhold routes learned over BGP from the subnets.
    #[must_use]
    pub fn with_disabled_bgp_route_propagation(mut self) -> Self {
        self.inner.properties_mut().disable_bgp_route_propagation = Some(true);
        self
    }

    /// Propagate routes learned over BGP to the subnets.
    #[must_use]
    pub fn with_enabled_bgp_route_propagation(mut self) -> Self {
        self.inner.properties_mut().disable_bgp_route_propagation = Some(false);
        self
    }

    /// Create the table, returning the provider's view of it.
    ///
    /// # Errors
    ///
    /// Fails without a region or resource group, or when the transport fails.
    pub async fn create(mut self) -> Result<Self> {
        self.inner.properties_mut().routes = Some(children_to_inner(&self.routes));
        debug!(name = self.name(), routes = self.routes.len(), "putting route table");
        let inner = self.scope.put(&self.inner).await?;
        Ok(Self::from_inner(self.scope.context().clone(), inner))
    }

    /// Apply pending changes to an existing table.
    ///
    /// # Errors
    ///
    /// Same as [`RouteTable::create`].
    pub async fn apply(self) -> Result<Self> {
        self.create().await
    }

    /// Reload the table, rebuilding its routes.
    ///
    /// # Errors
    ///
    /// Fails without a resource group or when the transport fails.
    pub async fn refresh(&mut self) -> Result<()> {
        self.inner = self.scope.get().await?;
        self.routes = index_children(self.inner.properties.as_ref().and_then(|p| p.routes.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, MockTransport};
    use serde_json::json;

    #[test]
    fn with_route_generates_a_name() {
        let table = RouteTable::define(context(MockTransport::new()), "rt".into())
            .with_route("10.1.0.0/16", NextHopType::VnetLocal)
            .unwrap()
            .with_route("0.0.0.0/0", NextHopType::Internet)
            .unwrap();
        assert_eq!(table.routes().len(), 2);
        assert!(table
            .routes()
            .keys()
            .all(|name| name.starts_with(ROUTE_NAME_PREFIX) && name.len() == ROUTE_NAME_LEN));
    }

    #[test]
    fn with_route_rejects_appliance_without_address() {
        let result = RouteTable::define(context(MockTransport::new()), "rt".into())
            .with_route("0.0.0.0/0", NextHopType::VirtualAppliance);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn create_sends_routes_and_bgp_flag() {
        let mut transport = MockTransport::new();
        transport
            .expect_put()
            .withf(|path, _, body| {
                path.ends_with("/routeTables/rt")
                    && body["properties"]["disableBgpRoutePropagation"] == true
                    && body["properties"]["routes"][0]["properties"]["nextHopIpAddress"] == "10.0.0.4"
            })
            .times(1)
            .returning(|path, _, mut body| {
                body["id"] = json!(path);
                body["properties"]["subnets"] = json!([{"id": "subnet-a"}]);
                Ok(body)
            });

        let table = RouteTable::define(context(transport), "rt".into())
            .with_region("westus")
            .with_existing_resource_group("rg")
            .with_disabled_bgp_route_propagation()
            .define_route("to-fw")
            .with_destination_address_prefix("0.0.0.0/0")
            .with_next_hop_to_virtual_appliance("10.0.0.4")
            .attach()
            .unwrap()
            .create()
            .await
            .unwrap();
        assert!(table.is_bgp_route_propagation_disabled());
        assert_eq!(table.associated_subnet_ids(), vec!["subnet-a".to_string()]);
        assert_eq!(table.routes()["to-fw"].destination_address_prefix(), Some("0.0.0.0/0"));
    }
}
