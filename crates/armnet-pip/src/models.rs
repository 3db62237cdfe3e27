//! Wire models for public IP addresses.

use armnet_core::types::{IpAllocationMethod, IpVersion, Sku, SubResource, TrackedResource};
use serde::{Deserialize, Serialize};

/// Public IP address as exchanged with the provider.
pub type PublicIpAddressInner = TrackedResource<PublicIpAddressProperties>;

/// Properties of a public IP address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpAddressProperties {
    /// Static or dynamic assignment.
    #[serde(
        rename = "publicIPAllocationMethod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub allocation_method: Option<IpAllocationMethod>,
    /// Address family.
    #[serde(
        rename = "publicIPAddressVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub address_version: Option<IpVersion>,
    /// Assigned address, once allocated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// TCP idle timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_timeout_in_minutes: Option<u32>,
    /// DNS label and reverse lookup settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_settings: Option<PublicIpDnsSettings>,
    /// IP configuration of the NIC, load balancer or gateway using the address.
    #[serde(default, skip_serializing)]
    pub ip_configuration: Option<SubResource>,
    /// Provisioning state reported by the provider.
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
    /// Provider-assigned GUID.
    #[serde(default, skip_serializing)]
    pub resource_guid: Option<String>,
}

/// DNS settings of a public IP address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpDnsSettings {
    /// Leaf label, combined with the regional zone into the FQDN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name_label: Option<String>,
    /// Fully qualified name, computed by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    /// Name returned by reverse lookups of the address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_fqdn: Option<String>,
}

/// SKU of a public IP address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicIpSku {
    /// Basic, allows dynamic allocation.
    Basic,
    /// Standard, always statically allocated.
    Standard,
}

impl PublicIpSku {
    /// Provider spelling of the SKU name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Standard => "Standard",
        }
    }

    /// Parse a provider SKU, case-insensitively.
    #[must_use]
    pub fn from_sku(sku: &Sku) -> Option<Self> {
        match sku.name.as_deref()? {
            name if name.eq_ignore_ascii_case("Basic") => Some(Self::Basic),
            name if name.eq_ignore_ascii_case("Standard") => Some(Self::Standard),
            _ => None,
        }
    }

    /// Wire representation.
    #[must_use]
    pub fn to_sku(self) -> Sku {
        Sku::new(self.as_str(), "Regional")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_provider_field_names() {
        let inner: PublicIpAddressInner = serde_json::from_value(json!({
            "name": "pip1",
            "location": "westus",
            "sku": {"name": "standard"},
            "properties": {
                "publicIPAllocationMethod": "Static",
                "publicIPAddressVersion": "IPv4",
                "ipAddress": "20.1.2.3",
                "idleTimeoutInMinutes": 4,
                "dnsSettings": {"domainNameLabel": "web", "fqdn": "web.westus.cloudapp.azure.com"},
                "ipConfiguration": {"id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/networkInterfaces/nic1/ipConfigurations/primary"},
                "provisioningState": "Succeeded"
            }
        }))
        .unwrap();

        let props = inner.properties.as_ref().unwrap();
        assert_eq!(props.allocation_method, Some(IpAllocationMethod::Static));
        assert_eq!(props.ip_address.as_deref(), Some("20.1.2.3"));
        assert_eq!(
            PublicIpSku::from_sku(inner.sku.as_ref().unwrap()),
            Some(PublicIpSku::Standard)
        );
    }

    #[test]
    fn read_only_fields_are_not_sent() {
        let props = PublicIpAddressProperties {
            allocation_method: Some(IpAllocationMethod::Dynamic),
            ip_configuration: Some(SubResource::new("x")),
            provisioning_state: Some("Succeeded".into()),
            ..PublicIpAddressProperties::default()
        };
        assert_eq!(
            serde_json::to_value(&props).unwrap(),
            json!({"publicIPAllocationMethod": "Dynamic"})
        );
    }
}
