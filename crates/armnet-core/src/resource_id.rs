//! Hierarchical resource identifiers.
//!
//! Resource IDs have the form
//! `/subscriptions/{sub}/resourceGroups/{rg}/providers/{namespace}/{type}/{name}`
//! optionally followed by any number of `/{child-type}/{child-name}` pairs.
//! Comparisons against provider-returned IDs are case-insensitive.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Provider namespace of every networking resource.
pub const NETWORK_NAMESPACE: &str = "Microsoft.Network";

/// Parsed resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    subscription_id: String,
    resource_group: String,
    provider_namespace: String,
    segments: Vec<(String, String)>,
}

impl ResourceId {
    /// Build the ID of a top-level resource.
    #[must_use]
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        provider_namespace: impl Into<String>,
        resource_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            provider_namespace: provider_namespace.into(),
            segments: vec![(resource_type.into(), name.into())],
        }
    }

    /// Build the ID of a top-level `Microsoft.Network` resource.
    #[must_use]
    pub fn network(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        resource_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::new(
            subscription_id,
            resource_group,
            NETWORK_NAMESPACE,
            resource_type,
            name,
        )
    }

    /// Parse a resource ID string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResourceId`] when the string does not follow the
    /// subscription / resource group / provider layout.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |why: &str| Error::InvalidResourceId(format!("`{input}`: {why}"));

        let trimmed = input.trim().trim_end_matches('/');
        let rest = trimmed
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with `/`"))?;
        let parts: Vec<&str> = rest.split('/').collect();

        if parts.len() < 8 {
            return Err(invalid("too few segments"));
        }
        if !parts[0].eq_ignore_ascii_case("subscriptions") {
            return Err(invalid("expected `subscriptions`"));
        }
        if !parts[2].eq_ignore_ascii_case("resourceGroups") {
            return Err(invalid("expected `resourceGroups`"));
        }
        if !parts[4].eq_ignore_ascii_case("providers") {
            return Err(invalid("expected `providers`"));
        }
        if parts.iter().any(|part| part.is_empty()) {
            return Err(invalid("empty segment"));
        }

        let pairs = &parts[6..];
        if pairs.len() % 2 != 0 {
            return Err(invalid("resource type without a name"));
        }

        Ok(Self {
            subscription_id: parts[1].to_string(),
            resource_group: parts[3].to_string(),
            provider_namespace: parts[5].to_string(),
            segments: pairs
                .chunks(2)
                .map(|pair| (pair[0].to_string(), pair[1].to_string()))
                .collect(),
        })
    }

    /// Returns the ID of a child resource under this one.
    #[must_use]
    pub fn child(&self, child_type: impl Into<String>, name: impl Into<String>) -> Self {
        let mut id = self.clone();
        id.segments.push((child_type.into(), name.into()));
        id
    }

    /// Returns the parent resource ID, or `None` for a top-level resource.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        let mut id = self.clone();
        id.segments.pop();
        Some(id)
    }

    /// Returns the ID of the top-level resource this ID belongs to.
    #[must_use]
    pub fn top_level(&self) -> Self {
        let mut id = self.clone();
        id.segments.truncate(1);
        id
    }

    /// Subscription ID.
    #[must_use]
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Resource group name.
    #[must_use]
    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    /// Provider namespace, e.g. `Microsoft.Network`.
    #[must_use]
    pub fn provider_namespace(&self) -> &str {
        &self.provider_namespace
    }

    /// Resource name (the last segment).
    #[must_use]
    pub fn name(&self) -> &str {
        self.segments
            .last()
            .map_or("", |(_, name)| name.as_str())
    }

    /// Resource type path without the namespace, e.g. `virtualNetworks/subnets`.
    #[must_use]
    pub fn resource_type(&self) -> String {
        self.segments
            .iter()
            .map(|(kind, _)| kind.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Fully qualified type, e.g. `Microsoft.Network/virtualNetworks/subnets`.
    #[must_use]
    pub fn full_type(&self) -> String {
        format!("{}/{}", self.provider_namespace, self.resource_type())
    }

    /// Name of the segment of the given type, if present (case-insensitive).
    #[must_use]
    pub fn name_of(&self, resource_type: &str) -> Option<&str> {
        self.segments
            .iter()
            .find(|(kind, _)| kind.eq_ignore_ascii_case(resource_type))
            .map(|(_, name)| name.as_str())
    }

    /// Whether another ID lives in the same subscription.
    #[must_use]
    pub fn is_same_subscription(&self, other: &Self) -> bool {
        self.subscription_id
            .eq_ignore_ascii_case(&other.subscription_id)
    }

    /// Case-insensitive comparison, matching the provider's ID semantics.
    #[must_use]
    pub fn eq_ignore_case(&self, other: &Self) -> bool {
        self.to_string().eq_ignore_ascii_case(&other.to_string())
    }
}

/// Case-insensitive comparison of two raw ID strings.
#[must_use]
pub fn ids_equal(a: &str, b: &str) -> bool {
    a.trim_end_matches('/')
        .eq_ignore_ascii_case(b.trim_end_matches('/'))
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/{}",
            self.subscription_id, self.resource_group, self.provider_namespace
        )?;
        for (kind, name) in &self.segments {
            write!(f, "/{kind}/{name}")?;
        }
        Ok(())
    }
}

impl FromStr for ResourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
