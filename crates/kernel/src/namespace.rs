use crate::error::RegistryError;
use nsreg_common::{PlayerId, Role};
use std::collections::BTreeMap;

/// One named group with a fixed owner and role-tagged members.
///
/// The owner is seeded as an Admin member on creation and can never be
/// removed or have its role changed. Members live in a BTreeMap so listings
/// and persisted documents come out in a stable order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    name: String,
    owner: PlayerId,
    members: BTreeMap<PlayerId, Role>,
}

impl Namespace {
    /// Create a namespace whose only member is `owner` as Admin.
    pub fn new(name: impl Into<String>, owner: PlayerId) -> Self {
        let mut members = BTreeMap::new();
        members.insert(owner, Role::Admin);
        Self {
            name: name.into(),
            owner,
            members,
        }
    }

    /// Rebuild a namespace from persisted parts.
    ///
    /// Rejects parts where the owner is missing from `members` or is not an Admin.
    pub fn restore(
        name: impl Into<String>,
        owner: PlayerId,
        members: BTreeMap<PlayerId, Role>,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        match members.get(&owner) {
            Some(Role::Admin) => Ok(Self {
                name,
                owner,
                members,
            }),
            Some(Role::User) => Err(RegistryError::CorruptNamespace {
                namespace: name,
                reason: "owner is not an admin",
            }),
            None => Err(RegistryError::CorruptNamespace {
                namespace: name,
                reason: "owner is not a member",
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn exists(&self, id: PlayerId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn is_owner(&self, id: PlayerId) -> bool {
        self.owner == id
    }

    /// False for non-members.
    pub fn is_admin(&self, id: PlayerId) -> bool {
        self.members.get(&id) == Some(&Role::Admin)
    }

    pub fn role_of(&self, id: PlayerId) -> Option<Role> {
        self.members.get(&id).copied()
    }

    /// Add a new member. Never overwrites an existing entry.
    pub fn add_member(&mut self, id: PlayerId, role: Role) -> Result<(), RegistryError> {
        if self.exists(id) {
            return Err(RegistryError::AlreadyMember {
                namespace: self.name.clone(),
                member: id,
            });
        }
        self.members.insert(id, role);
        tracing::debug!(namespace = %self.name, member = %id, %role, "member added");
        Ok(())
    }

    /// Remove a member other than the owner.
    pub fn del_member(&mut self, id: PlayerId) -> Result<(), RegistryError> {
        self.check_mutable_member(id)?;
        self.members.remove(&id);
        tracing::debug!(namespace = %self.name, member = %id, "member removed");
        Ok(())
    }

    /// Change the role of a member other than the owner.
    pub fn mod_member(&mut self, id: PlayerId, role: Role) -> Result<(), RegistryError> {
        self.check_mutable_member(id)?;
        self.members.insert(id, role);
        tracing::debug!(namespace = %self.name, member = %id, %role, "member role changed");
        Ok(())
    }

    /// Read-only access to the member map.
    pub fn members(&self) -> &BTreeMap<PlayerId, Role> {
        &self.members
    }

    /// Owned snapshot of the member map.
    pub fn list_members(&self) -> BTreeMap<PlayerId, Role> {
        self.members.clone()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    fn check_mutable_member(&self, id: PlayerId) -> Result<(), RegistryError> {
        if !self.exists(id) {
            return Err(RegistryError::MemberNotFound {
                namespace: self.name.clone(),
                member: id,
            });
        }
        if self.is_owner(id) {
            return Err(RegistryError::OwnerProtected {
                namespace: self.name.clone(),
                member: id,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_owner_invariant(ns: &Namespace) {
        assert!(ns.exists(ns.owner()));
        assert_eq!(ns.role_of(ns.owner()), Some(Role::Admin));
    }

    #[test]
    fn new_namespace_seeds_owner_as_admin() {
        let owner = PlayerId::new();
        let ns = Namespace::new("town", owner);
        assert_eq!(ns.name(), "town");
        assert_eq!(ns.owner(), owner);
        assert_eq!(ns.member_count(), 1);
        assert!(ns.is_owner(owner));
        assert!(ns.is_admin(owner));
        assert_owner_invariant(&ns);
    }

    #[test]
    fn is_admin_false_for_non_member() {
        let ns = Namespace::new("town", PlayerId::new());
        let stranger = PlayerId::new();
        assert!(!ns.exists(stranger));
        assert!(!ns.is_admin(stranger));
        assert!(!ns.is_owner(stranger));
    }

    #[test]
    fn add_member_inserts_once() {
        let mut ns = Namespace::new("town", PlayerId::new());
        let b = PlayerId::new();
        ns.add_member(b, Role::User).unwrap();
        assert_eq!(ns.role_of(b), Some(Role::User));
        assert_eq!(ns.member_count(), 2);

        let err = ns.add_member(b, Role::Admin).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyMember { member, .. } if member == b));
        // no silent overwrite
        assert_eq!(ns.role_of(b), Some(Role::User));
    }

    #[test]
    fn add_owner_again_is_already_member() {
        let owner = PlayerId::new();
        let mut ns = Namespace::new("town", owner);
        assert!(matches!(
            ns.add_member(owner, Role::User),
            Err(RegistryError::AlreadyMember { .. })
        ));
        assert_owner_invariant(&ns);
    }

    #[test]
    fn del_member_requires_membership() {
        let mut ns = Namespace::new("town", PlayerId::new());
        let err = ns.del_member(PlayerId::new()).unwrap_err();
        assert!(matches!(err, RegistryError::MemberNotFound { .. }));
    }

    #[test]
    fn del_member_removes_entry() {
        let mut ns = Namespace::new("town", PlayerId::new());
        let b = PlayerId::new();
        ns.add_member(b, Role::Admin).unwrap();
        ns.del_member(b).unwrap();
        assert!(!ns.exists(b));
        assert_eq!(ns.member_count(), 1);
    }

    #[test]
    fn owner_cannot_be_removed_or_demoted() {
        let owner = PlayerId::new();
        let mut ns = Namespace::new("town", owner);
        assert!(matches!(
            ns.del_member(owner),
            Err(RegistryError::OwnerProtected { .. })
        ));
        assert!(matches!(
            ns.mod_member(owner, Role::User),
            Err(RegistryError::OwnerProtected { .. })
        ));
        assert_owner_invariant(&ns);
    }

    #[test]
    fn mod_member_replaces_role() {
        let mut ns = Namespace::new("town", PlayerId::new());
        let b = PlayerId::new();
        ns.add_member(b, Role::User).unwrap();
        ns.mod_member(b, Role::Admin).unwrap();
        assert!(ns.is_admin(b));
        ns.mod_member(b, Role::User).unwrap();
        assert!(!ns.is_admin(b));
    }

    #[test]
    fn mod_member_requires_membership() {
        let mut ns = Namespace::new("town", PlayerId::new());
        assert!(matches!(
            ns.mod_member(PlayerId::new(), Role::Admin),
            Err(RegistryError::MemberNotFound { .. })
        ));
    }

    #[test]
    fn owner_invariant_survives_mutation_sequence() {
        let owner = PlayerId::new();
        let mut ns = Namespace::new("town", owner);
        let others: Vec<PlayerId> = (0..8).map(|_| PlayerId::new()).collect();
        for (i, id) in others.iter().enumerate() {
            let role = if i % 2 == 0 { Role::Admin } else { Role::User };
            ns.add_member(*id, role).unwrap();
        }
        for id in others.iter().chain(std::iter::once(&owner)) {
            let _ = ns.mod_member(*id, Role::User);
            assert_owner_invariant(&ns);
            let _ = ns.del_member(*id);
            assert_owner_invariant(&ns);
        }
        assert_eq!(ns.member_count(), 1);
    }

    #[test]
    fn list_members_is_stable_without_mutation() {
        let mut ns = Namespace::new("town", PlayerId::new());
        ns.add_member(PlayerId::new(), Role::User).unwrap();
        assert_eq!(ns.list_members(), ns.list_members());
        assert_eq!(&ns.list_members(), ns.members());
    }

    #[test]
    fn restore_accepts_valid_parts() {
        let owner = PlayerId::new();
        let b = PlayerId::new();
        let members = BTreeMap::from([(owner, Role::Admin), (b, Role::User)]);
        let ns = Namespace::restore("town", owner, members.clone()).unwrap();
        assert_eq!(ns.members(), &members);
        assert_owner_invariant(&ns);
    }

    #[test]
    fn restore_rejects_missing_or_demoted_owner() {
        let owner = PlayerId::new();
        let missing = Namespace::restore("a", owner, BTreeMap::new()).unwrap_err();
        assert_eq!(
            missing,
            RegistryError::CorruptNamespace {
                namespace: "a".into(),
                reason: "owner is not a member",
            }
        );

        let demoted =
            Namespace::restore("b", owner, BTreeMap::from([(owner, Role::User)])).unwrap_err();
        assert!(matches!(demoted, RegistryError::CorruptNamespace { .. }));
    }
}
