//! Command layer: turns parsed user input into registry calls and renders
//! the results as chat-style text.

use nsreg_common::{PlayerId, Role, RoleParseError};
use nsreg_kernel::{Registry, RegistryError};
use std::collections::{BTreeMap, BTreeSet};

/// Failures a command can report back to its caller.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("this command can only be run by players (pass --as <uuid>)")]
    SenderRequired,
    #[error(transparent)]
    InvalidRole(#[from] RoleParseError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub fn create(
    registry: &mut Registry,
    name: &str,
    owner: PlayerId,
) -> Result<String, CommandError> {
    Ok(registry.create_namespace(name, owner)?)
}

/// The role text is parsed before the registry is touched.
pub fn add_member(
    registry: &mut Registry,
    name: &str,
    sender: PlayerId,
    target: PlayerId,
    role_text: &str,
) -> Result<(), CommandError> {
    let role: Role = role_text.parse()?;
    registry.add_member(name, sender, target, role)?;
    Ok(())
}

pub fn del_member(
    registry: &mut Registry,
    name: &str,
    sender: PlayerId,
    target: PlayerId,
) -> Result<(), CommandError> {
    registry.del_member(name, sender, target)?;
    Ok(())
}

pub fn set_role(
    registry: &mut Registry,
    name: &str,
    sender: PlayerId,
    target: PlayerId,
    role_text: &str,
) -> Result<(), CommandError> {
    let role: Role = role_text.parse()?;
    registry.mod_member(name, sender, target, role)?;
    Ok(())
}

pub fn list_members(
    registry: &Registry,
    name: &str,
) -> Result<BTreeMap<PlayerId, Role>, CommandError> {
    Ok(registry.list_members(name)?)
}

/// Namespaces of `member` when given, otherwise every namespace.
pub fn list_namespaces(registry: &Registry, member: Option<PlayerId>) -> BTreeSet<String> {
    match member {
        Some(id) => registry.namespaces_containing(id),
        None => registry.all_namespace_names(),
    }
}

pub fn render_members(name: &str, members: &BTreeMap<PlayerId, Role>) -> String {
    members
        .iter()
        .fold(format!("namespace ({name}) members"), |acc, (id, role)| {
            format!("{acc}\n- {id}: {role}")
        })
}

pub fn render_namespaces(heading: &str, names: &BTreeSet<String>) -> String {
    names
        .iter()
        .fold(format!("{heading} namespaces:"), |acc, name| {
            format!("{acc}\n- {name}")
        })
}
