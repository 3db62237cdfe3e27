//! Network peerings and the reconciliation of their remote side.
//!
//! A peering is two resources: one under each network. Creating or updating
//! a peering here PUTs the local side, then (when the remote network lives in
//! the same subscription) creates or updates the mirror peering under the
//! remote network so that both sides agree on access, forwarding and gateway
//! use. The local side is read back last so that its state reflects the
//! connected pair.

use armnet_core::resource_id::ResourceId;
use armnet_core::types::SubResource;
use armnet_core::{ArmContext, Error};
use tracing::{debug, info, warn};

use crate::models::{PeeringInner, PeeringProperties, PeeringState, VirtualNetworkInner};
use crate::Result;

/// Child resource type segment of peerings.
pub const PEERING_TYPE: &str = "virtualNetworkPeerings";

/// How a peering uses gateways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayUse {
    /// The remote network may use this network's gateway.
    ByRemoteNetwork,
    /// This network uses the remote network's gateway.
    OnRemoteNetwork,
    /// No gateway is shared.
    None,
}

/// Settings to enforce on the remote side at the next create or apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RemoteSettings {
    access: Option<bool>,
    forwarding: Option<bool>,
    allow_gateway_transit: Option<bool>,
    use_remote_gateways: Option<bool>,
}

impl RemoteSettings {
    fn apply_to(&self, props: &mut PeeringProperties) {
        if let Some(access) = self.access {
            props.allow_virtual_network_access = Some(access);
        }
        if let Some(forwarding) = self.forwarding {
            props.allow_forwarded_traffic = Some(forwarding);
        }
        if let Some(transit) = self.allow_gateway_transit {
            props.allow_gateway_transit = Some(transit);
        }
        if let Some(use_remote) = self.use_remote_gateways {
            props.use_remote_gateways = Some(use_remote);
        }
    }
}

/// One side of a peering between two virtual networks.
#[derive(Debug, Clone)]
pub struct NetworkPeering {
    context: ArmContext,
    inner: PeeringInner,
    remote: RemoteSettings,
}

impl NetworkPeering {
    pub(crate) fn define(context: ArmContext, network_id: &ResourceId, name: impl Into<String>) -> Self {
        let name = name.into();
        let mut inner = PeeringInner::named(name.clone());
        inner.id = Some(network_id.child(PEERING_TYPE, name).to_string());
        let props = inner.properties_mut();
        props.allow_virtual_network_access = Some(true);
        props.allow_forwarded_traffic = Some(false);
        props.allow_gateway_transit = Some(false);
        props.use_remote_gateways = Some(false);
        Self {
            context,
            inner,
            remote: RemoteSettings {
                access: Some(true),
                ..RemoteSettings::default()
            },
        }
    }

    /// Wrap a wire model returned by the provider.
    #[must_use]
    pub fn from_inner(context: ArmContext, inner: PeeringInner) -> Self {
        Self {
            context,
            inner,
            remote: RemoteSettings::default(),
        }
    }

    /// The wire model.
    #[must_use]
    pub fn inner(&self) -> &PeeringInner {
        &self.inner
    }

    /// Consume the wrapper, returning the wire model.
    #[must_use]
    pub fn into_inner(self) -> PeeringInner {
        self.inner
    }

    fn props(&self) -> Option<&PeeringProperties> {
        self.inner.properties.as_ref()
    }

    /// Resource ID.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.inner.id.as_deref()
    }

    /// Peering name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name.as_deref().unwrap_or_default()
    }

    fn parsed_id(&self) -> Result<ResourceId> {
        let id = self
            .id()
            .ok_or_else(|| Error::InvalidResourceId(format!("peering `{}` has no ID", self.name())))?;
        ResourceId::parse(id)
    }

    /// ID of the network this side belongs to.
    #[must_use]
    pub fn network_id(&self) -> Option<String> {
        let id = self.parsed_id().ok()?;
        id.parent().map(|parent| parent.to_string())
    }

    /// ID of the peered network.
    #[must_use]
    pub fn remote_network_id(&self) -> Option<&str> {
        self.props()
            .and_then(|p| p.remote_virtual_network.as_ref())
            .and_then(SubResource::id)
    }

    /// Address prefixes of the peered network.
    #[must_use]
    pub fn remote_address_spaces(&self) -> Vec<&str> {
        self.props()
            .and_then(|p| p.remote_address_space.as_ref())
            .and_then(|space| space.address_prefixes.as_ref())
            .map(|prefixes| prefixes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Connection state.
    #[must_use]
    pub fn state(&self) -> Option<PeeringState> {
        self.props().and_then(|p| p.peering_state)
    }

    /// Whether the remote network's VMs may reach this network.
    #[must_use]
    pub fn is_access_between_networks_allowed(&self) -> bool {
        self.props()
            .and_then(|p| p.allow_virtual_network_access)
            .unwrap_or(false)
    }

    /// Whether traffic forwarded by the remote network is accepted.
    #[must_use]
    pub fn is_traffic_forwarding_from_remote_network_allowed(&self) -> bool {
        self.props()
            .and_then(|p| p.allow_forwarded_traffic)
            .unwrap_or(false)
    }

    /// Gateway sharing mode.
    #[must_use]
    pub fn gateway_use(&self) -> GatewayUse {
        let props = self.props();
        if props.and_then(|p| p.use_remote_gateways).unwrap_or(false) {
            GatewayUse::OnRemoteNetwork
        } else if props.and_then(|p| p.allow_gateway_transit).unwrap_or(false) {
            GatewayUse::ByRemoteNetwork
        } else {
            GatewayUse::None
        }
    }

    /// Whether both networks are in the same subscription.
    #[must_use]
    pub fn is_same_subscription(&self) -> bool {
        let (Ok(local), Some(remote)) = (self.parsed_id(), self.remote_network_id()) else {
            return false;
        };
        ResourceId::parse(remote).is_ok_and(|remote| remote.is_same_subscription(&local))
    }

    fn props_mut(&mut self) -> &mut PeeringProperties {
        self.inner.properties_mut()
    }

    /// Peer with the given network.
    #[must_use]
    pub fn with_remote_network(mut self, network_id: impl Into<String>) -> Self {
        self.props_mut().remote_virtual_network = Some(SubResource::new(network_id));
        self
    }

    /// Allow VMs on both sides to reach each other.
    #[must_use]
    pub fn with_access_between_networks(mut self) -> Self {
        self.props_mut().allow_virtual_network_access = Some(true);
        self.remote.access = Some(true);
        self
    }

    /// Block access in both directions.
    #[must_use]
    pub fn without_access_from_either_network(mut self) -> Self {
        self.props_mut().allow_virtual_network_access = Some(false);
        self.remote.access = Some(false);
        self
    }

    /// Accept forwarded traffic on both sides.
    #[must_use]
    pub fn with_traffic_forwarding_from_either_network(mut self) -> Self {
        self.props_mut().allow_forwarded_traffic = Some(true);
        self.remote.forwarding = Some(true);
        self
    }

    /// Accept traffic forwarded by the remote network on this side only.
    #[must_use]
    pub fn with_traffic_forwarding_from_remote_network(mut self) -> Self {
        self.props_mut().allow_forwarded_traffic = Some(true);
        self
    }

    /// Reject forwarded traffic on both sides.
    #[must_use]
    pub fn without_traffic_forwarding_from_either_network(mut self) -> Self {
        self.props_mut().allow_forwarded_traffic = Some(false);
        self.remote.forwarding = Some(false);
        self
    }

    /// Let the remote network use this network's gateway, without starting it.
    #[must_use]
    pub fn with_gateway_use_by_remote_network_allowed(mut self) -> Self {
        let props = self.props_mut();
        props.allow_gateway_transit = Some(true);
        props.use_remote_gateways = Some(false);
        self.remote.allow_gateway_transit = Some(false);
        self.remote.use_remote_gateways = Some(false);
        self
    }

    /// Let the remote network use this network's gateway, and start using it there.
    #[must_use]
    pub fn with_gateway_use_by_remote_network_started(mut self) -> Self {
        self = self.with_gateway_use_by_remote_network_allowed();
        self.remote.allow_gateway_transit = Some(false);
        self.remote.use_remote_gateways = Some(true);
        self
    }

    /// Use the remote network's gateway, allowing it on the remote side.
    #[must_use]
    pub fn with_gateway_use_on_remote_network_started(mut self) -> Self {
        let props = self.props_mut();
        props.use_remote_gateways = Some(true);
        props.allow_gateway_transit = Some(false);
        self.remote.allow_gateway_transit = Some(true);
        self.remote.use_remote_gateways = Some(false);
        self
    }

    /// Stop sharing gateways in either direction.
    #[must_use]
    pub fn without_gateway_use(mut self) -> Self {
        let props = self.props_mut();
        props.use_remote_gateways = Some(false);
        props.allow_gateway_transit = Some(false);
        self.remote.use_remote_gateways = Some(false);
        self.remote.allow_gateway_transit = Some(false);
        self
    }

    fn endpoints(&self) -> Result<(ResourceId, ResourceId, ResourceId)> {
        let local = self.parsed_id()?;
        let network = local.parent().ok_or_else(|| {
            Error::InvalidResourceId(format!("peering ID `{local}` has no parent network"))
        })?;
        let remote = self.remote_network_id().ok_or_else(|| {
            Error::InvalidArgument(format!("remote network not set for peering `{}`", self.name()))
        })?;
        let remote = ResourceId::parse(remote)?;
        Ok((local, network, remote))
    }

    /// Create the peering and reconcile its remote side.
    ///
    /// # Errors
    ///
    /// Fails when the remote network is missing or equals the local one, or
    /// when any of the chained requests fails.
    pub async fn create(mut self) -> Result<Self> {
        let (local_id, network_id, remote_id) = self.endpoints()?;
        if remote_id.eq_ignore_case(&network_id) {
            return Err(Error::InvalidArgument(format!(
                "network `{}` cannot be peered with itself",
                network_id.name()
            )));
        }

        let path = local_id.to_string();
        info!(peering = %path, remote = %remote_id, "putting network peering");
        self.inner = self.context.put(&path, &self.inner).await?;

        if remote_id.is_same_subscription(&network_id) {
            self.reconcile_remote(&network_id, &remote_id).await?;
            self.inner = self.context.get(&path).await?;
        } else {
            warn!(
                peering = %path,
                remote = %remote_id,
                "remote network is in another subscription; its peering must be managed separately"
            );
        }
        self.remote = RemoteSettings::default();
        Ok(self)
    }

    /// Apply pending changes to both sides of the peering.
    ///
    /// # Errors
    ///
    /// Same as [`NetworkPeering::create`].
    pub async fn apply(self) -> Result<Self> {
        self.create().await
    }

    async fn reconcile_remote(&self, network_id: &ResourceId, remote_id: &ResourceId) -> Result<()> {
        let remote: VirtualNetworkInner = self.context.get(&remote_id.to_string()).await?;
        let (mut mirror, created) = match find_mirror(remote, network_id) {
            Some(mirror) => (mirror, false),
            None => (new_mirror(self.name(), network_id), true),
        };

        let before = mirror.properties.clone();
        self.remote.apply_to(mirror.properties_mut());
        if !created && mirror.properties == before {
            debug!(remote = %remote_id, "remote peering already consistent");
            return Ok(());
        }

        let mirror_name = mirror.name.clone().unwrap_or_else(|| self.name().to_string());
        let mirror_id = remote_id.child(PEERING_TYPE, mirror_name).to_string();
        debug!(peering = %mirror_id, created, "putting remote peering");
        let _: PeeringInner = self.context.put(&mirror_id, &mirror).await?;
        Ok(())
    }

    /// Delete the peering and, within one subscription, its remote side.
    ///
    /// # Errors
    ///
    /// Fails when a request fails. A remote network that no longer exists is not an error.
    pub async fn delete(self) -> Result<()> {
        let (local_id, network_id, remote_id) = self.endpoints()?;
        info!(peering = %local_id, "deleting network peering");
        self.context.delete(&local_id.to_string()).await?;

        if !remote_id.is_same_subscription(&network_id) {
            warn!(remote = %remote_id, "remote peering in another subscription left in place");
            return Ok(());
        }
        let Some(remote) = self
            .context
            .get_optional::<VirtualNetworkInner>(&remote_id.to_string())
            .await?
        else {
            debug!(remote = %remote_id, "remote network no longer exists");
            return Ok(());
        };
        if let Some(mirror) = find_mirror(remote, &network_id) {
            let name = mirror.name.unwrap_or_default();
            let mirror_id = remote_id.child(PEERING_TYPE, name).to_string();
            debug!(peering = %mirror_id, "deleting remote peering");
            self.context.delete(&mirror_id).await?;
        }
        Ok(())
    }

    /// Reload this side of the peering.
    ///
    /// # Errors
    ///
    /// Fails when the peering has no ID or the transport fails.
    pub async fn refresh(&mut self) -> Result<()> {
        let id = self.parsed_id()?;
        self.inner = self.context.get(&id.to_string()).await?;
        Ok(())
    }
}

/// The peering of `remote` that points back at `network_id`.
fn find_mirror(remote: VirtualNetworkInner, network_id: &ResourceId) -> Option<PeeringInner> {
    remote
        .properties?
        .virtual_network_peerings?
        .into_iter()
        .find(|peering| {
            peering
                .properties
                .as_ref()
                .and_then(|p| p.remote_virtual_network.as_ref())
                .and_then(SubResource::id)
                .and_then(|id| ResourceId::parse(id).ok())
                .is_some_and(|id| id.eq_ignore_case(network_id))
        })
}

fn new_mirror(name: &str, network_id: &ResourceId) -> PeeringInner {
    let mut mirror = PeeringInner::named(name);
    let props = mirror.properties_mut();
    props.remote_virtual_network = Some(SubResource::new(network_id.to_string()));
    props.allow_virtual_network_access = Some(true);
    props.allow_forwarded_traffic = Some(false);
    props.allow_gateway_transit = Some(false);
    props.use_remote_gateways = Some(false);
    mirror
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, MockTransport, SUB};
    use mockall::Sequence;
    use serde_json::json;

    const OTHER_SUB: &str = "00000000-0000-0000-0000-000000000002";

    fn vnet_id(sub: &str, name: &str) -> String {
        format!("/subscriptions/{sub}/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/{name}")
    }

    fn local_network() -> ResourceId {
        ResourceId::parse(&vnet_id(SUB, "vnet1")).unwrap()
    }

    fn defined(transport: MockTransport, remote: &str) -> NetworkPeering {
        NetworkPeering::define(context(transport), &local_network(), "p1").with_remote_network(remote)
    }

    #[test]
    fn definition_defaults() {
        let peering = defined(MockTransport::new(), &vnet_id(SUB, "vnet2"));
        assert!(peering.is_access_between_networks_allowed());
        assert!(!peering.is_traffic_forwarding_from_remote_network_allowed());
        assert_eq!(peering.gateway_use(), GatewayUse::None);
        assert!(peering.is_same_subscription());
        assert_eq!(peering.network_id(), Some(vnet_id(SUB, "vnet1")));
    }

    #[test]
    fn gateway_use_follows_withers() {
        let peering = defined(MockTransport::new(), &vnet_id(SUB, "vnet2"));
        let peering = peering.with_gateway_use_on_remote_network_started();
        assert_eq!(peering.gateway_use(), GatewayUse::OnRemoteNetwork);
        let peering = peering.with_gateway_use_by_remote_network_allowed();
        assert_eq!(peering.gateway_use(), GatewayUse::ByRemoteNetwork);
        assert_eq!(peering.without_gateway_use().gateway_use(), GatewayUse::None);
    }

    #[test]
    fn offering_transit_clears_remote_transit() {
        let peering = defined(MockTransport::new(), &vnet_id(SUB, "vnet2"))
            .with_gateway_use_on_remote_network_started()
            .with_gateway_use_by_remote_network_allowed();
        assert_eq!(peering.remote.allow_gateway_transit, Some(false));
        assert_eq!(peering.remote.use_remote_gateways, Some(false));

        let started = peering.with_gateway_use_by_remote_network_started();
        assert_eq!(started.remote.use_remote_gateways, Some(true));
        assert_eq!(started.remote.allow_gateway_transit, Some(false));
    }

    #[tokio::test]
    async fn remote_lookup_failure_stops_the_chain() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_put()
            .withf(|path, _, _| path.contains("/vnet1/"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, body| Ok(body));
        transport
            .expect_get()
            .withf(|path, _| path == vnet_id(SUB, "vnet2"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(Error::NotFound("virtualNetworks/vnet2".into())));

        let err = defined(transport, &vnet_id(SUB, "vnet2")).create().await.unwrap_err();
        assert_eq!(err, Error::NotFound("virtualNetworks/vnet2".into()));
    }

    #[tokio::test]
    async fn mirror_put_failure_skips_local_refresh() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_put()
            .withf(|path, _, _| path.contains("/vnet1/"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, body| Ok(body));
        transport
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(json!({"id": vnet_id(SUB, "vnet2"), "name": "vnet2", "properties": {}})));
        transport
            .expect_put()
            .withf(|path, _, _| path.contains("/vnet2/"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Err(Error::Conflict("AnotherOperationInProgress".into())));

        let err = defined(transport, &vnet_id(SUB, "vnet2")).create().await.unwrap_err();
        assert_eq!(err, Error::Conflict("AnotherOperationInProgress".into()));
    }

    #[tokio::test]
    async fn create_puts_local_then_creates_mirror() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_put()
            .withf(|path, _, body| {
                path.ends_with("/virtualNetworks/vnet1/virtualNetworkPeerings/p1")
                    && body["properties"]["useRemoteGateways"] == true
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, mut body| {
                body["properties"]["peeringState"] = json!("Initiated");
                Ok(body)
            });
        transport
            .expect_get()
            .withf(|path, _| path == vnet_id(SUB, "vnet2"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(json!({"id": vnet_id(SUB, "vnet2"), "name": "vnet2", "properties": {}})));
        transport
            .expect_put()
            .withf(|path, _, body| {
                let props = &body["properties"];
                path.ends_with("/virtualNetworks/vnet2/virtualNetworkPeerings/p1")
                    && props["remoteVirtualNetwork"]["id"] == vnet_id(SUB, "vnet1")
                    && props["allowGatewayTransit"] == true
                    && props["useRemoteGateways"] == false
                    && props["allowVirtualNetworkAccess"] == true
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, body| Ok(body));
        transport
            .expect_get()
            .withf(|path, _| path.ends_with("/virtualNetworks/vnet1/virtualNetworkPeerings/p1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|path, _| {
                Ok(json!({
                    "id": path,
                    "name": "p1",
                    "properties": {
                        "remoteVirtualNetwork": {"id": vnet_id(SUB, "vnet2")},
                        "useRemoteGateways": true,
                        "peeringState": "Connected"
                    }
                }))
            });

        let peering = defined(transport, &vnet_id(SUB, "vnet2"))
            .with_gateway_use_on_remote_network_started()
            .create()
            .await
            .unwrap();
        assert_eq!(peering.state(), Some(PeeringState::Connected));
        assert_eq!(peering.gateway_use(), GatewayUse::OnRemoteNetwork);
    }

    #[tokio::test]
    async fn consistent_mirror_is_left_alone() {
        let mut transport = MockTransport::new();
        transport
            .expect_put()
            .withf(|path, _, _| path.contains("/vnet1/"))
            .times(1)
            .returning(|_, _, body| Ok(body));
        transport
            .expect_get()
            .withf(|path, _| path == vnet_id(SUB, "vnet2"))
            .times(1)
            .returning(|_, _| {
                Ok(json!({
                    "id": vnet_id(SUB, "vnet2"),
                    "properties": {"virtualNetworkPeerings": [{
                        "name": "back",
                        "properties": {
                            "remoteVirtualNetwork": {"id": vnet_id(SUB, "VNET1").to_uppercase()},
                            "allowVirtualNetworkAccess": true,
                            "allowForwardedTraffic": false
                        }
                    }]}
                }))
            });
        transport
            .expect_get()
            .withf(|path, _| path.ends_with("/virtualNetworkPeerings/p1"))
            .times(1)
            .returning(|path, _| Ok(json!({"id": path, "name": "p1"})));

        defined(transport, &vnet_id(SUB, "vnet2")).create().await.unwrap();
    }

    #[tokio::test]
    async fn existing_mirror_is_updated_under_its_own_name() {
        let mut transport = MockTransport::new();
        transport
            .expect_put()
            .withf(|path, _, _| path.contains("/vnet1/"))
            .returning(|_, _, body| Ok(body));
        transport
            .expect_get()
            .withf(|path, _| path == vnet_id(SUB, "vnet2"))
            .returning(|_, _| {
                Ok(json!({
                    "properties": {"virtualNetworkPeerings": [{
                        "name": "back",
                        "properties": {
                            "remoteVirtualNetwork": {"id": vnet_id(SUB, "vnet1")},
                            "allowVirtualNetworkAccess": true
                        }
                    }]}
                }))
            });
        transport
            .expect_put()
            .withf(|path, _, body| {
                path.ends_with("/vnet2/virtualNetworkPeerings/back")
                    && body["properties"]["allowVirtualNetworkAccess"] == false
            })
            .times(1)
            .returning(|_, _, body| Ok(body));
        transport
            .expect_get()
            .withf(|path, _| path.ends_with("/virtualNetworkPeerings/p1"))
            .returning(|path, _| Ok(json!({"id": path, "name": "p1"})));

        defined(transport, &vnet_id(SUB, "vnet2"))
            .without_access_from_either_network()
            .create()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cross_subscription_skips_remote_side() {
        let mut transport = MockTransport::new();
        transport.expect_put().times(1).returning(|_, _, body| Ok(body));
        transport.expect_get().never();

        let peering = defined(transport, &vnet_id(OTHER_SUB, "vnet2"));
        assert!(!peering.is_same_subscription());
        peering.create().await.unwrap();
    }

    #[tokio::test]
    async fn self_peering_is_rejected() {
        let err = defined(MockTransport::new(), &vnet_id(SUB, "VNET1"))
            .create()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn missing_remote_network_is_rejected() {
        let err = NetworkPeering::define(context(MockTransport::new()), &local_network(), "p1")
            .create()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn delete_removes_both_sides() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_delete()
            .withf(|path, _| path.ends_with("/vnet1/virtualNetworkPeerings/p1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        transport
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(json!({"properties": {"virtualNetworkPeerings": [
                    {"name": "other", "properties": {"remoteVirtualNetwork": {"id": vnet_id(SUB, "vnet9")}}},
                    {"name": "back", "properties": {"remoteVirtualNetwork": {"id": vnet_id(SUB, "vnet1")}}}
                ]}}))
            });
        transport
            .expect_delete()
            .withf(|path, _| path.ends_with("/vnet2/virtualNetworkPeerings/back"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        defined(transport, &vnet_id(SUB, "vnet2")).delete().await.unwrap();
    }

    #[tokio::test]
    async fn delete_tolerates_missing_remote_network() {
        let mut transport = MockTransport::new();
        transport.expect_delete().times(1).returning(|_, _| Ok(()));
        transport
            .expect_get()
            .returning(|path, _| Err(Error::NotFound(path.to_string())));

        defined(transport, &vnet_id(SUB, "vnet2")).delete().await.unwrap();
    }
}
