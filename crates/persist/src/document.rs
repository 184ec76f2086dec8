use crate::store::StoreError;
use nsreg_common::{PlayerId, Role};
use nsreg_kernel::{Namespace, Registry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialized shape of a whole registry.
///
/// ```yaml
/// namespaces:
///   town:
///     name: town
///     owner: 6f1c...
///     member:
///       6f1c...: Admin
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDocument {
    #[serde(default)]
    pub namespaces: BTreeMap<String, NamespaceDocument>,
}

/// Serialized shape of one namespace.
///
/// A missing `owner` parses, then fails [`RegistryDocument::restore`].
/// Member keys stay as written until restore, where two spellings of the
/// same identity are rejected instead of merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceDocument {
    pub name: String,
    pub owner: Option<PlayerId>,
    #[serde(default)]
    pub member: BTreeMap<String, Role>,
}

impl NamespaceDocument {
    fn parse_members(&self) -> Result<BTreeMap<PlayerId, Role>, StoreError> {
        let mut members = BTreeMap::new();
        for (raw, role) in &self.member {
            let id: PlayerId = raw.parse().map_err(|e| {
                StoreError::Corrupt(format!("namespace {:?} member {raw:?}: {e}", self.name))
            })?;
            if members.insert(id, *role).is_some() {
                return Err(StoreError::Corrupt(format!(
                    "namespace {:?} lists member {id} more than once",
                    self.name
                )));
            }
        }
        Ok(members)
    }
}

impl RegistryDocument {
    /// Capture the full state of a registry.
    pub fn capture(registry: &Registry) -> Self {
        let namespaces = registry
            .namespaces()
            .map(|ns| {
                (
                    ns.name().to_string(),
                    NamespaceDocument {
                        name: ns.name().to_string(),
                        owner: Some(ns.owner()),
                        member: ns
                            .members()
                            .iter()
                            .map(|(id, role)| (id.to_string(), *role))
                            .collect(),
                    },
                )
            })
            .collect();
        Self { namespaces }
    }

    /// Rebuild a registry, validating every namespace on the way in.
    pub fn restore(self) -> Result<Registry, StoreError> {
        let mut restored = Vec::with_capacity(self.namespaces.len());
        for (key, doc) in self.namespaces {
            if key != doc.name {
                return Err(StoreError::Corrupt(format!(
                    "namespace key {key:?} does not match its name {:?}",
                    doc.name
                )));
            }
            let owner = doc
                .owner
                .ok_or_else(|| StoreError::Corrupt(format!("namespace {key:?} has no owner")))?;
            let members = doc.parse_members()?;
            let ns = Namespace::restore(doc.name, owner, members)
                .map_err(|e| StoreError::Corrupt(e.to_string()))?;
            restored.push(ns);
        }
        Registry::from_namespaces(restored).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, StoreError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parse a document. Empty input is an empty registry.
    pub fn from_yaml(text: &str) -> Result<Self, StoreError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}
