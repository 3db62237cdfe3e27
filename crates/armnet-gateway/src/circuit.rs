//! Fluent wrapper around an ExpressRoute circuit.

use armnet_core::children::{children_to_inner, index_children, ChildMap};
use armnet_core::types::Sku;
use armnet_core::{ArmContext, Error, ResourceScope, TopLevelResource};
use tracing::debug;

use crate::models::{
    CircuitSkuFamily, CircuitSkuTier, ExpressRouteCircuitInner, ExpressRouteCircuitProperties, PeeringType,
    ServiceProviderProperties, ServiceProviderProvisioningState,
};
use crate::peering::{CircuitPeering, CircuitPeeringDefinition};
use crate::Result;

/// Resource type segment of ExpressRoute circuits.
pub const RESOURCE_TYPE: &str = "expressRouteCircuits";

/// A dedicated connection through a connectivity provider.
#[derive(Debug, Clone)]
pub struct ExpressRouteCircuit {
    scope: ResourceScope,
    inner: ExpressRouteCircuitInner,
    peerings: ChildMap<CircuitPeering>,
}

impl TopLevelResource for ExpressRouteCircuit {
    const RESOURCE_TYPE: &'static str = RESOURCE_TYPE;
    type Inner = ExpressRouteCircuitInner;

    fn define(context: ArmContext, name: String) -> Self {
        let mut inner = ExpressRouteCircuitInner::default();
        inner.name = Some(name.clone());
        inner.properties = Some(ExpressRouteCircuitProperties::default());
        Self {
            scope: ResourceScope::new(context, RESOURCE_TYPE, name),
            inner,
            peerings: ChildMap::new(),
        }
    }

    fn from_inner(context: ArmContext, inner: ExpressRouteCircuitInner) -> Self {
        let scope = ResourceScope::from_inner(context, RESOURCE_TYPE, &inner);
        let peerings = index_children(inner.properties.as_ref().and_then(|p| p.peerings.clone()));
        Self { scope, inner, peerings }
    }
}

impl ExpressRouteCircuit {
    fn props(&self) -> Option<&ExpressRouteCircuitProperties> {
        self.inner.properties.as_ref()
    }

    fn props_mut(&mut self) -> &mut ExpressRouteCircuitProperties {
        self.inner.properties_mut()
    }

    fn provider(&self) -> Option<&ServiceProviderProperties> {
        self.props().and_then(|p| p.service_provider_properties.as_ref())
    }

    fn provider_mut(&mut self) -> &mut ServiceProviderProperties {
        self.props_mut()
            .service_provider_properties
            .get_or_insert_with(ServiceProviderProperties::default)
    }

    pub(crate) fn peerings_mut(&mut self) -> &mut ChildMap<CircuitPeering> {
        &mut self.peerings
    }

    /// The wire model.
    #[must_use]
    pub fn inner(&self) -> &ExpressRouteCircuitInner {
        &self.inner
    }

    /// Consume the wrapper, returning the wire model with the current peerings.
    #[must_use]
    pub fn into_inner(mut self) -> ExpressRouteCircuitInner {
        self.inner.properties_mut().peerings = Some(children_to_inner(&self.peerings));
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

    /// Connectivity provider.
    #[must_use]
    pub fn service_provider(&self) -> Option<&str> {
        self.provider().and_then(|p| p.service_provider_name.as_deref())
    }

    /// Peering location, e.g. `Silicon Valley`.
    #[must_use]
    pub fn peering_location(&self) -> Option<&str> {
        self.provider().and_then(|p| p.peering_location.as_deref())
    }

    /// Bandwidth in Mbps.
    #[must_use]
    pub fn bandwidth_mbps(&self) -> Option<u32> {
        self.provider().and_then(|p| p.bandwidth_in_mbps)
    }

    /// Circuit SKU.
    #[must_use]
    pub fn sku(&self) -> Option<&Sku> {
        self.inner.sku.as_ref()
    }

    /// Key handed to the provider to provision the circuit.
    #[must_use]
    pub fn service_key(&self) -> Option<&str> {
        self.props().and_then(|p| p.service_key.as_deref())
    }

    /// Notes from the provider.
    #[must_use]
    pub fn service_provider_notes(&self) -> Option<&str> {
        self.props().and_then(|p| p.service_provider_notes.as_deref())
    }

    /// Provisioning state of the circuit itself.
    #[must_use]
    pub fn circuit_provisioning_state(&self) -> Option<&str> {
        self.props().and_then(|p| p.circuit_provisioning_state.as_deref())
    }

    /// Provisioning state on the provider's side.
    #[must_use]
    pub fn service_provider_provisioning_state(&self) -> Option<ServiceProviderProvisioningState> {
        self.props().and_then(|p| p.service_provider_provisioning_state)
    }

    /// Whether classic deployments may use the circuit.
    #[must_use]
    pub fn is_classic_operations_allowed(&self) -> bool {
        self.props().and_then(|p| p.allow_classic_operations).unwrap_or(false)
    }

    /// Peerings keyed by peering type.
    #[must_use]
    pub fn peerings(&self) -> &ChildMap<CircuitPeering> {
        &self.peerings
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.inner.location = Some(region.into());
        self
    }

    /// Place the circuit in an existing resource group.
    #[must_use]
    pub fn with_existing_resource_group(mut self, resource_group: impl Into<String>) -> Self {
        self.scope.set_resource_group(resource_group);
        self
    }

    /// Connectivity provider.
    #[must_use]
    pub fn with_service_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider_mut().service_provider_name = Some(provider.into());
        self
    }

    /// Peering location.
    #[must_use]
    pub fn with_peering_location(mut self, location: impl Into<String>) -> Self {
        self.provider_mut().peering_location = Some(location.into());
        self
    }

    /// Bandwidth in Mbps.
    #[must_use]
    pub fn with_bandwidth_in_mbps(mut self, mbps: u32) -> Self {
        self.provider_mut().bandwidth_in_mbps = Some(mbps);
        self
    }

    /// SKU named `{tier}_{family}`.
    #[must_use]
    pub fn with_sku(mut self, tier: CircuitSkuTier, family: CircuitSkuFamily) -> Self {
        let mut sku = Sku::new(format!("{}_{}", tier.as_str(), family.as_str()), tier.as_str());
        sku.family = Some(family.as_str().to_string());
        self.inner.sku = Some(sku);
        self
    }

    /// Let classic deployments use the circuit.
    #[must_use]
    pub fn with_classic_operations(mut self) -> Self {
        self.props_mut().allow_classic_operations = Some(true);
        self
    }

    /// Keep classic deployments off the circuit.
    #[must_use]
    pub fn without_classic_operations(mut self) -> Self {
        self.props_mut().allow_classic_operations = Some(false);
        self
    }

    /// Add a peering, or update the existing one of the same type.
    #[must_use]
    pub fn define_peering(mut self, peering_type: PeeringType) -> CircuitPeeringDefinition {
        let existing = self.peerings.remove(peering_type.as_str());
        CircuitPeeringDefinition::new(self, existing, peering_type)
    }

    /// Remove a peering.
    #[must_use]
    pub fn without_peering(mut self, peering_type: PeeringType) -> Self {
        self.peerings.remove(peering_type.as_str());
        self
    }

    fn before_put(&mut self) -> Result<()> {
        let complete = self
            .provider()
            .is_some_and(|p| p.service_provider_name.is_some() && p.peering_location.is_some() && p.bandwidth_in_mbps.is_some());
        if !complete {
            return Err(Error::InvalidArgument(format!(
                "ExpressRoute circuit `{}` needs a service provider, peering location and bandwidth",
                self.name()
            )));
        }
        if self.inner.sku.is_none() {
            self.inner.sku = Some(Sku {
                name: Some("Standard_MeteredData".into()),
                tier: Some(CircuitSkuTier::Standard.as_str().into()),
                family: Some(CircuitSkuFamily::MeteredData.as_str().into()),
                capacity: None,
            });
        }
        self.inner.properties_mut().peerings = Some(children_to_inner(&self.peerings));
        Ok(())
    }

    /// Create the circuit, returning the provider's view of it.
    ///
    /// # Errors
    ///
    /// Fails without provider settings, region or resource group, or when the transport fails.
    pub async fn create(mut self) -> Result<Self> {
        self.before_put()?;
        debug!(name = self.name(), peerings = self.peerings.len(), "putting ExpressRoute circuit");
        let inner = self.scope.put(&self.inner).await?;
        Ok(Self::from_inner(self.scope.context().clone(), inner))
    }

    /// Apply pending changes to an existing circuit.
    ///
    /// # Errors
    ///
    /// Same as [`ExpressRouteCircuit::create`].
    pub async fn apply(self) -> Result<Self> {
        self.create().await
    }

    /// Reload the circuit.
    ///
    /// # Errors
    ///
    /// Fails without a resource group or when the transport fails.
    pub async fn refresh(&mut self) -> Result<()> {
        self.inner = self.scope.get().await?;
        self.peerings = index_children(self.inner.properties.as_ref().and_then(|p| p.peerings.clone()));
        Ok(())
    }
}
