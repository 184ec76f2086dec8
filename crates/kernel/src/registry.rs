use crate::error::RegistryError;
use crate::namespace::Namespace;
use nsreg_common::{PlayerId, Role};
use std::collections::{BTreeMap, BTreeSet};

/// Upper bound on candidate names tried by [`Registry::create_unique_namespace`].
pub const MAX_UNIQUE_NAME_ATTEMPTS: usize = 64;

/// Appended to a taken base name to derive the next candidate.
const UNIQUE_NAME_SUFFIX: char = '_';

/// The authoritative collection of namespaces, keyed by unique name.
///
/// Single-writer: every mutation takes `&mut self`, so one owner drives it at a
/// time. Hosts that need concurrent callers wrap the whole registry in one lock.
/// Authorization is always checked against the live member map of the target
/// namespace; there is no cached permission state and no super-admin bypass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    namespaces: BTreeMap<String, Namespace>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from already-restored namespaces (used by persistence).
    pub fn from_namespaces(
        namespaces: impl IntoIterator<Item = Namespace>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for ns in namespaces {
            if registry.exists(ns.name()) {
                return Err(RegistryError::AlreadyExists(ns.name().to_string()));
            }
            registry.namespaces.insert(ns.name().to_string(), ns);
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.namespaces.contains_key(name)
    }

    /// Iterate all namespaces in name order.
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.values()
    }

    /// Create a namespace owned by `owner`. Fails if the name is taken.
    pub fn create_namespace(
        &mut self,
        name: &str,
        owner: PlayerId,
    ) -> Result<String, RegistryError> {
        if self.exists(name) {
            return Err(RegistryError::AlreadyExists(name.to_string()));
        }
        self.insert_new(name.to_string(), owner);
        Ok(name.to_string())
    }

    /// Create a namespace under `base`, or the first free `base_`, `base__`, ...
    ///
    /// Gives up after [`MAX_UNIQUE_NAME_ATTEMPTS`] candidates.
    pub fn create_unique_namespace(
        &mut self,
        base: &str,
        owner: PlayerId,
    ) -> Result<String, RegistryError> {
        let mut candidate = base.to_string();
        for _ in 0..MAX_UNIQUE_NAME_ATTEMPTS {
            if !self.exists(&candidate) {
                self.insert_new(candidate.clone(), owner);
                return Ok(candidate);
            }
            candidate.push(UNIQUE_NAME_SUFFIX);
        }
        tracing::warn!(base, "unique namespace name search exhausted");
        Err(RegistryError::NamespaceExhausted {
            base: base.to_string(),
            attempts: MAX_UNIQUE_NAME_ATTEMPTS,
        })
    }

    pub fn get_namespace(&self, name: &str) -> Result<&Namespace, RegistryError> {
        self.namespaces
            .get(name)
            .ok_or_else(|| RegistryError::NamespaceNotFound(name.to_string()))
    }

    /// Add `member` with `role`; `sender` must be an Admin of the namespace.
    pub fn add_member(
        &mut self,
        name: &str,
        sender: PlayerId,
        member: PlayerId,
        role: Role,
    ) -> Result<(), RegistryError> {
        self.admin_namespace_mut(name, sender)?.add_member(member, role)
    }

    /// Remove `member`; `sender` must be an Admin of the namespace.
    pub fn del_member(
        &mut self,
        name: &str,
        sender: PlayerId,
        member: PlayerId,
    ) -> Result<(), RegistryError> {
        self.admin_namespace_mut(name, sender)?.del_member(member)
    }

    /// Change the role of `member`; `sender` must be an Admin of the namespace.
    pub fn mod_member(
        &mut self,
        name: &str,
        sender: PlayerId,
        member: PlayerId,
        role: Role,
    ) -> Result<(), RegistryError> {
        self.admin_namespace_mut(name, sender)?.mod_member(member, role)
    }

    pub fn list_members(&self, name: &str) -> Result<BTreeMap<PlayerId, Role>, RegistryError> {
        self.get_namespace(name).map(Namespace::list_members)
    }

    pub fn all_namespace_names(&self) -> BTreeSet<String> {
        self.namespaces.keys().cloned().collect()
    }

    /// Names of every namespace that has `member` in its member map.
    pub fn namespaces_containing(&self, member: PlayerId) -> BTreeSet<String> {
        self.namespaces
            .values()
            .filter(|ns| ns.exists(member))
            .map(|ns| ns.name().to_string())
            .collect()
    }

    fn insert_new(&mut self, name: String, owner: PlayerId) {
        tracing::info!(namespace = %name, %owner, "namespace created");
        self.namespaces.insert(name.clone(), Namespace::new(name, owner));
    }

    fn admin_namespace_mut(
        &mut self,
        name: &str,
        sender: PlayerId,
    ) -> Result<&mut Namespace, RegistryError> {
        let ns = self
            .namespaces
            .get_mut(name)
            .ok_or_else(|| RegistryError::NamespaceNotFound(name.to_string()))?;
        if !ns.is_admin(sender) {
            tracing::debug!(namespace = name, %sender, "rejected non-admin sender");
            return Err(RegistryError::Unauthorized {
                namespace: name.to_string(),
                sender,
            });
        }
        Ok(ns)
    }
}
