//! Wire envelopes shared by all networking resources.
//!
//! Top-level resources arrive as [`TrackedResource`] (with location, tags and
//! SKU) and nested children as [`ChildResource`]; both keep the provider's
//! `properties` bag in a typed, resource-specific struct.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Envelope of a top-level (tracked) resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", bound(deserialize = "P: Deserialize<'de>"))]
pub struct TrackedResource<P> {
    /// Resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Fully qualified resource type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Region the resource is deployed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Resource tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    /// Entity tag for optimistic concurrency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    /// SKU, for resources that carry one at the top level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    /// Availability zones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<String>>,
    /// Creation and modification metadata.
    #[serde(default, skip_serializing)]
    pub system_data: Option<SystemData>,
    /// Resource-specific properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<P>,
}

impl<P: Default> TrackedResource<P> {
    /// Creates an envelope for a resource that does not exist yet.
    #[must_use]
    pub fn named(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            resource_type: None,
            location: Some(location.into()),
            tags: None,
            etag: None,
            sku: None,
            zones: None,
            system_data: None,
            properties: Some(P::default()),
        }
    }

    /// Mutable access to the properties, creating them when absent.
    pub fn properties_mut(&mut self) -> &mut P {
        self.properties.get_or_insert_with(P::default)
    }
}

/// Envelope of a child resource nested inside a parent's properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", bound(deserialize = "P: Deserialize<'de>"))]
pub struct ChildResource<P> {
    /// Resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Child name, unique within the parent collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Fully qualified resource type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Entity tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    /// Child-specific properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<P>,
}

impl<P: Default> ChildResource<P> {
    /// Creates a named child with empty properties.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            resource_type: None,
            etag: None,
            properties: Some(P::default()),
        }
    }

    /// Mutable access to the properties, creating them when absent.
    pub fn properties_mut(&mut self) -> &mut P {
        self.properties.get_or_insert_with(P::default)
    }
}

/// Reference to another resource by ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubResource {
    /// Referenced resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SubResource {
    /// Reference the given ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }

    /// Referenced ID, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Returns the IDs of a list of references, skipping empty ones.
#[must_use]
pub fn reference_ids(references: Option<&Vec<SubResource>>) -> Vec<String> {
    references
        .map(|refs| refs.iter().filter_map(|r| r.id.clone()).collect())
        .unwrap_or_default()
}

/// Resource SKU.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Sku {
    /// SKU name, e.g. `Standard`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// SKU tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    /// SKU family (ExpressRoute circuits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Instance capacity (gateways).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

impl Sku {
    /// SKU with the given name and tier.
    #[must_use]
    pub fn new(name: impl Into<String>, tier: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            tier: Some(tier.into()),
            family: None,
            capacity: None,
        }
    }
}

/// Creation and last-modification metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SystemData {
    /// Identity that created the resource.
    #[serde(default)]
    pub created_by: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Identity that last modified the resource.
    #[serde(default)]
    pub last_modified_by: Option<String>,
    /// Last modification timestamp.
    #[serde(default)]
    pub last_modified_at: Option<DateTime<Utc>>,
}

/// Paged list envelope (`{"value": [...], "nextLink": "..."}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    /// Absolute URL of the next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}

/// How an IP address is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpAllocationMethod {
    /// Address fixed at creation.
    Static,
    /// Address assigned by the platform and possibly released.
    Dynamic,
}

/// IP address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpVersion {
    /// IPv4
    #[serde(rename = "IPv4")]
    V4,
    /// IPv6
    #[serde(rename = "IPv6")]
    V6,
}

/// Transport protocol matched by balancing and NAT rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportProtocol {
    /// TCP
    Tcp,
    /// UDP
    Udp,
    /// Any protocol
    All,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Props {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provisioning_state: Option<String>,
    }

    #[test]
    fn tracked_resource_parses_envelope() {
        let value = json!({
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/publicIPAddresses/pip",
            "name": "pip",
            "type": "Microsoft.Network/publicIPAddresses",
            "location": "westus",
            "tags": {"env": "test"},
            "sku": {"name": "Standard", "tier": "Regional"},
            "systemData": {"createdAt": "2024-01-02T03:04:05Z"},
            "properties": {"provisioningState": "Succeeded"}
        });
        let resource: TrackedResource<Props> = serde_json::from_value(value).unwrap();
        assert_eq!(resource.name.as_deref(), Some("pip"));
        assert_eq!(resource.sku.unwrap().name.as_deref(), Some("Standard"));
        assert!(resource.system_data.unwrap().created_at.is_some());
        assert_eq!(
            resource.properties.unwrap().provisioning_state.as_deref(),
            Some("Succeeded")
        );
    }

    #[test]
    fn tracked_resource_skips_empty_fields_and_system_data() {
        let mut resource: TrackedResource<Props> = TrackedResource::named("pip", "eastus");
        resource.system_data = Some(SystemData::default());
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(
            value,
            json!({"name": "pip", "location": "eastus", "properties": {}})
        );
    }

    #[test]
    fn child_resource_properties_mut_creates_bag() {
        let mut child: ChildResource<Props> = ChildResource::default();
        child.properties_mut().provisioning_state = Some("Updating".into());
        assert!(child.properties.is_some());
    }

    #[test]
    fn reference_ids_skips_empty() {
        let refs = vec![SubResource::new("a"), SubResource::default()];
        assert_eq!(reference_ids(Some(&refs)), vec!["a".to_string()]);
        assert!(reference_ids(None).is_empty());
    }

    #[test]
    fn enums_use_provider_spelling() {
        assert_eq!(serde_json::to_value(IpVersion::V6).unwrap(), json!("IPv6"));
        assert_eq!(
            serde_json::from_value::<IpAllocationMethod>(json!("Dynamic")).unwrap(),
            IpAllocationMethod::Dynamic
        );
        assert_eq!(serde_json::to_value(TransportProtocol::All).unwrap(), json!("All"));
    }

    #[test]
    fn page_defaults_value() {
        let page: Page<Props> = serde_json::from_value(json!({"nextLink": "x"})).unwrap();
        assert!(page.value.is_empty());
        assert_eq!(page.next_link.as_deref(), Some("x"));
    }

    #[derive(Debug, Deserialize)]
    struct Port {
        number: u16,
    }

    fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn envelopes_decode_generic_properties_without_default() {
        let resource: TrackedResource<Port> = decode(json!({"name": "a", "properties": {"number": 80}}));
        assert_eq!(resource.properties.unwrap().number, 80);

        let child: ChildResource<Port> = decode(json!({"name": "b"}));
        assert!(child.properties.is_none());

        let page: Page<ChildResource<Port>> = decode(json!({"value": [{"properties": {"number": 443}}]}));
        assert_eq!(page.value[0].properties.as_ref().unwrap().number, 443);
    }
}
