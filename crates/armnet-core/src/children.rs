//! Child collections and default-child resolution.
//!
//! Parents keep their children in a [`ChildMap`] keyed by child name. Maps are
//! rebuilt wholesale from the wire model on every refresh and flattened back
//! into the wire model before a PUT.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::fluent::ResourceScope;
use crate::naming::random_resource_name;
use crate::resource_id::{ids_equal, ResourceId};
use crate::types::{ChildResource, SubResource};

/// Children of one kind keyed by name. Keys always equal [`Child::name`].
pub type ChildMap<C> = BTreeMap<String, C>;

/// A fluent wrapper around a nested child resource.
pub trait Child: Sized {
    /// Properties bag of the wrapped wire model.
    type Properties: Default + Clone;

    /// Wrap a wire model.
    fn from_inner(inner: ChildResource<Self::Properties>) -> Self;

    /// The wrapped wire model.
    fn inner(&self) -> &ChildResource<Self::Properties>;

    /// Child name, empty when the wire model carries none.
    fn name(&self) -> &str {
        self.inner().name.as_deref().unwrap_or_default()
    }
}

/// Build a child map from a wire list. Unnamed children are dropped.
#[must_use]
pub fn index_children<C: Child>(list: Option<Vec<ChildResource<C::Properties>>>) -> ChildMap<C> {
    list.unwrap_or_default()
        .into_iter()
        .filter(|child| child.name.as_deref().is_some_and(|n| !n.is_empty()))
        .map(C::from_inner)
        .map(|child| (child.name().to_string(), child))
        .collect()
}

/// Flatten a child map back into its wire list, ordered by name.
#[must_use]
pub fn children_to_inner<C: Child>(map: &ChildMap<C>) -> Vec<ChildResource<C::Properties>> {
    map.values().map(|child| child.inner().clone()).collect()
}

/// Insert a child under its own name, replacing any child of the same name.
pub fn insert_child<C: Child>(map: &mut ChildMap<C>, child: C) {
    map.insert(child.name().to_string(), child);
}

/// Outcome of resolving a default child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one candidate exists; it is the default.
    Existing(String),
    /// No candidate exists; a child with this generated name should be created.
    Create(String),
}

impl Resolution {
    /// Name of the resolved or to-be-created child.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Existing(name) | Self::Create(name) => name,
        }
    }
}

/// Resolve the default child among `candidates`.
///
/// One candidate is the default; none means a new child named from `prefix`
/// (at most `max_len` characters) must be created; several candidates are
/// ambiguous and the caller has to pick one by name.
///
/// # Errors
///
/// Returns [`Error::AmbiguousDefault`] when more than one candidate matches.
pub fn resolve_default<'a, I>(candidates: I, kind: &str, prefix: &str, max_len: usize) -> Result<Resolution>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&str> = candidates.into_iter().collect();
    match names.as_slice() {
        [] => Ok(Resolution::Create(random_resource_name(prefix, max_len))),
        [only] => Ok(Resolution::Existing((*only).to_string())),
        many => Err(Error::AmbiguousDefault(format!(
            "{} {kind}s exist ({}); specify one by name",
            many.len(),
            many.join(", ")
        ))),
    }
}

/// Name of the sibling a reference points to.
///
/// Until the parent is put, references to siblings hold the bare child name;
/// afterwards they hold a full ID whose last segment is the name.
#[must_use]
pub fn referenced_name(reference: Option<&SubResource>) -> Option<&str> {
    reference?
        .id
        .as_deref()?
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
}

/// Rewrite a reference to a sibling child as the child's ID under `scope`.
///
/// Bare names are resolved against `siblings`. Full IDs under the same
/// parent are checked against `siblings` too; IDs of other resources are
/// left untouched.
///
/// # Errors
///
/// Returns [`Error::InvalidReference`] when the named sibling does not exist,
/// or [`Error::InvalidArgument`] when the scope has no resource group.
pub fn link_sibling<C>(
    reference: Option<&mut SubResource>,
    scope: &ResourceScope,
    child_type: &str,
    siblings: &ChildMap<C>,
) -> Result<()> {
    let Some(reference) = reference else {
        return Ok(());
    };
    let Some(id) = reference.id.as_deref() else {
        return Ok(());
    };
    let name = if id.contains('/') {
        let parsed = ResourceId::parse(id)?;
        let parent = parsed.parent().map(|p| p.to_string()).unwrap_or_default();
        if !ids_equal(&parent, &scope.id()?.to_string()) {
            return Ok(());
        }
        parsed.name().to_string()
    } else {
        id.to_string()
    };
    let Some((actual, _)) = siblings.iter().find(|(key, _)| key.eq_ignore_ascii_case(&name)) else {
        return Err(Error::InvalidReference(format!(
            "{child_type} `{name}` is referenced by {} `{}` but not defined",
            scope.resource_type(),
            scope.name()
        )));
    };
    reference.id = Some(scope.child_id(child_type, actual)?);
    Ok(())
}
