//! Join-event handling: every player ends up in at least one namespace.

use nsreg_common::PlayerId;
use nsreg_kernel::{Registry, RegistryError};

/// Enroll a player who belongs to no namespace into a personal one.
///
/// The namespace is named after `display_name`, suffixed if the name is taken.
/// Returns the created name, or `None` when the player already has a namespace.
pub fn on_player_join(
    registry: &mut Registry,
    id: PlayerId,
    display_name: &str,
) -> Result<Option<String>, RegistryError> {
    if !registry.namespaces_containing(id).is_empty() {
        tracing::debug!(player = %id, "player already enrolled");
        return Ok(None);
    }
    let name = registry.create_unique_namespace(display_name, id)?;
    tracing::info!(player = %id, namespace = %name, "enrolled player in personal namespace");
    Ok(Some(name))
}
