//! ExpressRoute circuit peerings.

use armnet_core::children::{insert_child, Child};
use armnet_core::Error;

use crate::circuit::ExpressRouteCircuit;
use crate::models::{CircuitPeeringInner, CircuitPeeringProperties, PeeringType};
use crate::Result;

/// A BGP peering of an ExpressRoute circuit, named after its type.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitPeering {
    inner: CircuitPeeringInner,
}

impl Child for CircuitPeering {
    type Properties = CircuitPeeringProperties;

    fn from_inner(inner: CircuitPeeringInner) -> Self {
        Self { inner }
    }

    fn inner(&self) -> &CircuitPeeringInner {
        &self.inner
    }
}

impl CircuitPeering {
    fn of_type(peering_type: PeeringType) -> Self {
        let mut inner = CircuitPeeringInner::named(peering_type.as_str());
        inner.properties_mut().peering_type = Some(peering_type);
        Self { inner }
    }

    fn props(&self) -> Option<&CircuitPeeringProperties> {
        self.inner.properties.as_ref()
    }

    fn props_mut(&mut self) -> &mut CircuitPeeringProperties {
        self.inner.properties_mut()
    }

    /// Peering name.
    #[must_use]
    pub fn name(&self) -> &str {
        Child::name(self)
    }

    /// Peering type.
    #[must_use]
    pub fn peering_type(&self) -> Option<PeeringType> {
        self.props().and_then(|p| p.peering_type)
    }

    /// Cloud-side ASN.
    #[must_use]
    pub fn azure_asn(&self) -> Option<u32> {
        self.props().and_then(|p| p.azure_asn)
    }

    /// Customer-side ASN.
    #[must_use]
    pub fn peer_asn(&self) -> Option<u64> {
        self.props().and_then(|p| p.peer_asn)
    }

    /// Prefix of the primary link.
    #[must_use]
    pub fn primary_peer_address_prefix(&self) -> Option<&str> {
        self.props().and_then(|p| p.primary_peer_address_prefix.as_deref())
    }

    /// Prefix of the secondary link.
    #[must_use]
    pub fn secondary_peer_address_prefix(&self) -> Option<&str> {
        self.props().and_then(|p| p.secondary_peer_address_prefix.as_deref())
    }

    /// VLAN ID.
    #[must_use]
    pub fn vlan_id(&self) -> Option<u16> {
        self.props().and_then(|p| p.vlan_id)
    }

    /// Enabled or disabled.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.props().and_then(|p| p.state.as_deref())
    }
}

/// A peering being added to or updated in a circuit.
#[derive(Debug)]
pub struct CircuitPeeringDefinition {
    parent: ExpressRouteCircuit,
    peering: CircuitPeering,
}

impl CircuitPeeringDefinition {
    pub(crate) fn new(parent: ExpressRouteCircuit, existing: Option<CircuitPeering>, peering_type: PeeringType) -> Self {
        Self {
            parent,
            peering: existing.unwrap_or_else(|| CircuitPeering::of_type(peering_type)),
        }
    }

    /// /30 prefix of the primary link.
    #[must_use]
    pub fn with_primary_peer_address_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.peering.props_mut().primary_peer_address_prefix = Some(prefix.into());
        self
    }

    /// /30 prefix of the secondary link.
    #[must_use]
    pub fn with_secondary_peer_address_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.peering.props_mut().secondary_peer_address_prefix = Some(prefix.into());
        self
    }

    /// VLAN ID.
    #[must_use]
    pub fn with_vlan_id(mut self, vlan_id: u16) -> Self {
        self.peering.props_mut().vlan_id = Some(vlan_id);
        self
    }

    /// Customer-side ASN.
    #[must_use]
    pub fn with_peer_asn(mut self, asn: u64) -> Self {
        self.peering.props_mut().peer_asn = Some(asn);
        self
    }

    /// Add the peering to the circuit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when either link prefix or the VLAN is missing.
    pub fn attach(self) -> Result<ExpressRouteCircuit> {
        let Self { mut parent, peering } = self;
        let missing = [
            ("primary peer address prefix", peering.primary_peer_address_prefix().is_none()),
            ("secondary peer address prefix", peering.secondary_peer_address_prefix().is_none()),
            ("VLAN ID", peering.vlan_id().is_none()),
        ]
        .into_iter()
        .find_map(|(what, absent)| absent.then_some(what));
        if let Some(what) = missing {
            return Err(Error::InvalidArgument(format!("peering `{}` needs a {what}", peering.name())));
        }
        insert_child(parent.peerings_mut(), peering);
        Ok(parent)
    }
}
