//! Joins every stack to the platform-managed overlay network so Traefik can reach it.

use crate::composer::{
    document::{as_section_mut, kind, service_body_mut},
    errors::{ComposerError, ComposerResult},
    types::MANAGED_NETWORK,
};
use serde_yaml::{Mapping, Value};
use tracing::debug;

fn managed_key() -> Value {
    Value::String(MANAGED_NETWORK.to_string())
}

/// Declares the managed network as external at the root. An existing declaration of the
/// same name is left exactly as the user wrote it.
pub fn add_managed_network_to_root(networks_root: Option<Mapping>) -> Mapping {
    let mut networks = networks_root.unwrap_or_default();
    if networks.contains_key(MANAGED_NETWORK) {
        debug!("{} already declared at the root, keeping user config", MANAGED_NETWORK);
        return networks;
    }

    let mut config = Mapping::new();
    config.insert(Value::String("external".into()), Value::Bool(true));
    networks.insert(managed_key(), Value::Mapping(config));
    networks
}

/// Attaches a service to the managed network, keeping the shape it already uses: a list
/// gets the name appended, an alias map gets an empty config, nothing becomes a list.
pub fn add_managed_network_to_service(service_networks: Option<Value>) -> ComposerResult<Value> {
    match service_networks {
        None | Some(Value::Null) => Ok(Value::Sequence(vec![managed_key()])),
        Some(Value::Sequence(mut networks)) => {
            if !networks.iter().any(|n| n.as_str() == Some(MANAGED_NETWORK)) {
                networks.push(managed_key());
            }
            Ok(Value::Sequence(networks))
        }
        Some(Value::Mapping(mut networks)) => {
            if !networks.contains_key(MANAGED_NETWORK) {
                networks.insert(managed_key(), Value::Mapping(Mapping::new()));
            }
            Ok(Value::Mapping(networks))
        }
        Some(other) => Err(ComposerError::invalid_document(format!(
            "service networks must be a list or a mapping, found {}",
            kind(&other)
        ))),
    }
}

/// Applies [`add_managed_network_to_service`] to one service body in place.
pub fn attach_service(service: &mut Mapping) -> ComposerResult<()> {
    let current = service.get_mut("networks").map(std::mem::take);
    let networks = add_managed_network_to_service(current)?;
    // insert keeps the position of an existing key
    service.insert(Value::String("networks".into()), networks);
    Ok(())
}

/// Applies [`add_managed_network_to_root`] to a document root in place. A missing
/// `networks:` section is appended at the end of the document.
pub fn attach_root(root: &mut Mapping) -> ComposerResult<()> {
    let existing = as_section_mut(root.get_mut("networks"), "networks")?.map(std::mem::take);
    let networks = Value::Mapping(add_managed_network_to_root(existing));
    root.insert(Value::String("networks".into()), networks);
    Ok(())
}

/// Attaches the root and every service in `services` to the managed network.
pub fn inject_managed_network(root: &mut Mapping) -> ComposerResult<()> {
    if let Some(services) = as_section_mut(root.get_mut("services"), "services")? {
        for (name, body) in services.iter_mut() {
            if let Some(service) = service_body_mut(name, body, true)? {
                attach_service(service)?;
            }
        }
    }
    attach_root(root)
}
