use crate::composer::{
    document::{section_names, service_body_mut},
    errors::{ComposerError, ComposerResult},
    rewrite::references::{rename_keys, rewrite_reference_field, RefShape},
    types::{Renames, RewriteMode, MANAGED_NETWORK},
};
use serde_yaml::Mapping;
use tracing::debug;

/// Renames the networks declared in the root `networks:` section and every service
/// attachment to them, in list form or alias-config form.
///
/// The managed network keeps its name; so do `default` and any network that is not
/// declared at the root. Alias configs are carried over unchanged.
pub fn rewrite_network_names(
    services: Option<&mut Mapping>,
    networks_root: Option<&mut Mapping>,
    token: &str,
    mode: RewriteMode,
) -> ComposerResult<Renames> {
    let Some(networks_root) = networks_root else {
        return Ok(Renames::new());
    };

    let names = section_names(networks_root, "Network")?;
    let renames = Renames::build(
        names
            .iter()
            .map(String::as_str)
            .filter(|name| *name != MANAGED_NETWORK),
        token,
        mode,
    );
    // the managed network is attached after renaming, nothing may take its name
    if let Some((old, new)) = renames.iter().find(|(_, new)| *new == MANAGED_NETWORK) {
        return Err(ComposerError::name_collision(old, new));
    }
    rename_keys(networks_root, &renames)?;

    if let Some(services) = services {
        for (name, body) in services.iter_mut() {
            if let Some(service) = service_body_mut(name, body, false)? {
                if let Some(networks) = service.get_mut("networks") {
                    rewrite_reference_field(networks, &renames, RefShape::Exact)?;
                }
            }
        }
    }

    debug!("Renamed {} network(s)", renames.len());
    Ok(renames)
}
