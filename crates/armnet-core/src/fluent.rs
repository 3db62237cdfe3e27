//! Shared state of top-level fluent wrappers.
//!
//! Every top-level wrapper owns a [`ResourceScope`]: the context it talks
//! through plus the resource group, type and name that make up its ID. The ID
//! is known before the resource exists, which lets parents compute the IDs of
//! children they are about to create.
//!
//! [`ResourceCollection`] provides the lookup, listing and deletion
//! operations every resource type shares.

use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::info;

use crate::error::{Error, Result};
use crate::resource_id::ResourceId;
use crate::transport::ArmContext;
use crate::types::TrackedResource;

/// A fluent wrapper around a top-level resource.
pub trait TopLevelResource: Sized {
    /// Resource type segment, e.g. `virtualNetworks`.
    const RESOURCE_TYPE: &'static str;

    /// Wire model.
    type Inner: DeserializeOwned;

    /// Start defining a new resource.
    fn define(context: ArmContext, name: String) -> Self;

    /// Wrap a wire model returned by the provider.
    fn from_inner(context: ArmContext, inner: Self::Inner) -> Self;
}

/// Collection operations on one resource type in one subscription.
pub struct ResourceCollection<R> {
    context: ArmContext,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceCollection<R> {
    fn clone(&self) -> Self {
        Self::new(self.context.clone())
    }
}

impl<R> std::fmt::Debug for ResourceCollection<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCollection")
            .field("context", &self.context)
            .finish()
    }
}

impl<R> ResourceCollection<R> {
    /// Bind to a request context.
    #[must_use]
    pub fn new(context: ArmContext) -> Self {
        Self {
            context,
            _resource: PhantomData,
        }
    }

    /// The context requests go through.
    #[must_use]
    pub fn context(&self) -> &ArmContext {
        &self.context
    }
}

impl<R: TopLevelResource> ResourceCollection<R> {
    /// Start defining a new resource.
    #[must_use]
    pub fn define(&self, name: impl Into<String>) -> R {
        R::define(self.context.clone(), name.into())
    }

    /// Fetch a resource by resource group and name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for a missing resource, or any transport error.
    pub async fn get_by_resource_group(&self, resource_group: &str, name: &str) -> Result<R> {
        let id = self.context.resource_id(resource_group, R::RESOURCE_TYPE, name);
        self.get_by_id(&id.to_string()).await
    }

    /// Fetch a resource by ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for a missing resource, or any transport error.
    pub async fn get_by_id(&self, id: &str) -> Result<R> {
        let inner: R::Inner = self.context.get(id).await?;
        Ok(R::from_inner(self.context.clone(), inner))
    }

    /// List the resources of a resource group.
    ///
    /// # Errors
    ///
    /// Propagates transport and decode errors.
    pub async fn list_by_resource_group(&self, resource_group: &str) -> Result<Vec<R>> {
        let path = self
            .context
            .resource_group_path(resource_group, R::RESOURCE_TYPE);
        self.list_path(&path).await
    }

    /// List every resource of this type in the subscription.
    ///
    /// # Errors
    ///
    /// Propagates transport and decode errors.
    pub async fn list(&self) -> Result<Vec<R>> {
        let path = self.context.subscription_path(R::RESOURCE_TYPE);
        self.list_path(&path).await
    }

    async fn list_path(&self, path: &str) -> Result<Vec<R>> {
        let items: Vec<R::Inner> = self.context.list(path).await?;
        Ok(items
            .into_iter()
            .map(|inner| R::from_inner(self.context.clone(), inner))
            .collect())
    }

    /// Delete a resource by resource group and name.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub async fn delete_by_resource_group(&self, resource_group: &str, name: &str) -> Result<()> {
        let id = self.context.resource_id(resource_group, R::RESOURCE_TYPE, name);
        self.delete_by_id(&id.to_string()).await
    }

    /// Delete a resource by ID.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        info!(id, resource_type = R::RESOURCE_TYPE, "deleting resource");
        self.context.delete(id).await
    }
}

/// Location and identity of a top-level resource.
#[derive(Debug, Clone)]
pub struct ResourceScope {
    context: ArmContext,
    resource_type: &'static str,
    resource_group: Option<String>,
    name: String,
}

impl ResourceScope {
    /// Scope for a resource that is about to be defined.
    #[must_use]
    pub fn new(context: ArmContext, resource_type: &'static str, name: impl Into<String>) -> Self {
        Self {
            context,
            resource_type,
            resource_group: None,
            name: name.into(),
        }
    }

    /// Scope for a resource returned by the provider, derived from its ID.
    #[must_use]
    pub fn from_inner<P>(
        context: ArmContext,
        resource_type: &'static str,
        inner: &TrackedResource<P>,
    ) -> Self {
        let parsed = inner.id.as_deref().and_then(|id| ResourceId::parse(id).ok());
        let name = inner
            .name
            .clone()
            .or_else(|| parsed.as_ref().map(|id| id.name().to_string()))
            .unwrap_or_default();
        Self {
            context,
            resource_type,
            resource_group: parsed.map(|id| id.resource_group().to_string()),
            name,
        }
    }

    /// Set the resource group the resource lives in.
    pub fn set_resource_group(&mut self, resource_group: impl Into<String>) {
        self.resource_group = Some(resource_group.into());
    }

    /// Resource group, once known.
    #[must_use]
    pub fn resource_group(&self) -> Option<&str> {
        self.resource_group.as_deref()
    }

    /// Resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resource type, e.g. `virtualNetworks`.
    #[must_use]
    pub const fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    /// The context requests go through.
    #[must_use]
    pub fn context(&self) -> &ArmContext {
        &self.context
    }

    /// The resource's ID, which is known before it is created.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when no resource group was set.
    pub fn id(&self) -> Result<ResourceId> {
        let resource_group = self.resource_group.as_deref().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "resource group not set for {} `{}`",
                self.resource_type, self.name
            ))
        })?;
        Ok(self
            .context
            .resource_id(resource_group, self.resource_type, &self.name))
    }

    /// ID of a child of this resource.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when no resource group was set.
    pub fn child_id(&self, child_type: &str, child_name: &str) -> Result<String> {
        Ok(self.id()?.child(child_type, child_name).to_string())
    }

    /// PUT the wire model at this scope's ID and return the provider's view.
    ///
    /// # Errors
    ///
    /// Fails without a resource group or location, or when the transport fails.
    pub async fn put<P>(&self, inner: &TrackedResource<P>) -> Result<TrackedResource<P>>
    where
        P: serde::Serialize + serde::de::DeserializeOwned + Sync,
    {
        if inner.location.as_deref().map_or(true, str::is_empty) {
            return Err(Error::InvalidArgument(format!(
                "region not set for {} `{}`",
                self.resource_type, self.name
            )));
        }
        let id = self.id()?;
        self.context.put(&id.to_string(), inner).await
    }

    /// GET the current wire model at this scope's ID.
    ///
    /// # Errors
    ///
    /// Fails without a resource group, or when the transport fails.
    pub async fn get<P>(&self) -> Result<TrackedResource<P>>
    where
        P: serde::de::DeserializeOwned,
    {
        let id = self.id()?;
        self.context.get(&id.to_string()).await
    }

    /// DELETE the resource.
    ///
    /// # Errors
    ///
    /// Fails without a resource group, or when the transport fails.
    pub async fn delete(&self) -> Result<()> {
        let id = self.id()?;
        self.context.delete(&id.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockResourceTransport;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
    struct Props {}

    fn context(transport: MockResourceTransport) -> ArmContext {
        ArmContext::new(Arc::new(transport), "sub")
    }

    #[test]
    fn id_requires_resource_group() {
        let mut scope = ResourceScope::new(context(MockResourceTransport::new()), "virtualNetworks", "vnet1");
        assert!(matches!(scope.id(), Err(Error::InvalidArgument(_))));

        scope.set_resource_group("rg");
        assert_eq!(
            scope.child_id("subnets", "default").unwrap(),
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet1/subnets/default"
        );
    }

    #[test]
    fn from_inner_reads_group_from_id() {
        let inner: TrackedResource<Props> = serde_json::from_value(json!({
            "id": "/subscriptions/sub/resourceGroups/net-rg/providers/Microsoft.Network/routeTables/rt"
        }))
        .unwrap();
        let scope = ResourceScope::from_inner(context(MockResourceTransport::new()), "routeTables", &inner);
        assert_eq!(scope.resource_group(), Some("net-rg"));
        assert_eq!(scope.name(), "rt");
    }

    #[tokio::test]
    async fn put_requires_location() {
        let mut scope = ResourceScope::new(context(MockResourceTransport::new()), "routeTables", "rt");
        scope.set_resource_group("rg");
        let inner: TrackedResource<Props> = TrackedResource::default();
        let err = scope.put(&inner).await.unwrap_err();
        assert_eq!(err, Error::InvalidArgument("region not set for routeTables `rt`".into()));
    }

    #[derive(Debug)]
    struct Table {
        name: String,
        scope: ResourceScope,
    }

    impl TopLevelResource for Table {
        const RESOURCE_TYPE: &'static str = "routeTables";
        type Inner = TrackedResource<Props>;

        fn define(context: ArmContext, name: String) -> Self {
            Self {
                scope: ResourceScope::new(context, Self::RESOURCE_TYPE, name.clone()),
                name,
            }
        }

        fn from_inner(context: ArmContext, inner: Self::Inner) -> Self {
            let scope = ResourceScope::from_inner(context, Self::RESOURCE_TYPE, &inner);
            Self {
                name: scope.name().to_string(),
                scope,
            }
        }
    }

    #[tokio::test]
    async fn collection_lists_resource_group() {
        let mut transport = MockResourceTransport::new();
        transport
            .expect_list()
            .withf(|path, _| path == "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Network/routeTables")
            .returning(|_, _| {
                Ok(vec![json!({
                    "id": "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Network/routeTables/a",
                    "name": "a"
                })])
            });

        let tables: ResourceCollection<Table> = ResourceCollection::new(context(transport));
        let listed = tables.list_by_resource_group("rg").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "a");
        assert_eq!(listed[0].scope.resource_group(), Some("rg"));
    }

    #[tokio::test]
    async fn collection_get_and_delete_use_resource_id() {
        let mut transport = MockResourceTransport::new();
        transport
            .expect_get()
            .withf(|path, _| path.ends_with("/resourceGroups/rg/providers/Microsoft.Network/routeTables/rt"))
            .returning(|path, _| Ok(json!({"id": path, "name": "rt"})));
        transport
            .expect_delete()
            .withf(|path, _| path.ends_with("/routeTables/rt"))
            .times(1)
            .returning(|_, _| Ok(()));

        let tables: ResourceCollection<Table> = ResourceCollection::new(context(transport));
        assert_eq!(tables.define("new").name, "new");
        let table = tables.get_by_resource_group("rg", "rt").await.unwrap();
        assert_eq!(table.name, "rt");
        tables.delete_by_resource_group("rg", "rt").await.unwrap();
    }

    #[tokio::test]
    async fn put_forwards_to_transport() {
        let mut transport = MockResourceTransport::new();
        transport
            .expect_put()
            .withf(|path, _, body| path.ends_with("/routeTables/rt") && body["location"] == "westus")
            .times(1)
            .returning(|_, _, body| Ok(body));

        let mut scope = ResourceScope::new(context(transport), "routeTables", "rt");
        scope.set_resource_group("rg");
        let inner: TrackedResource<Props> = TrackedResource::named("rt", "westus");
        let created = scope.put(&inner).await.unwrap();
        assert_eq!(created.location.as_deref(), Some("westus"));
    }
}
