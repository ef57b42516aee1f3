use crate::composer::{
    document::{section_names, service_body_mut},
    errors::ComposerResult,
    rewrite::references::{rename_keys, rewrite_mount_list},
    types::{Renames, RewriteMode},
};
use serde_yaml::Mapping;
use tracing::debug;

/// Renames the keys of the root `secrets:` section only. Each secret's definition
/// (`file`, `external`, `environment`, ...) is kept as is.
pub fn rewrite_root_secrets(
    secrets_root: &mut Mapping,
    token: &str,
    mode: RewriteMode,
) -> ComposerResult<Renames> {
    rename_root(secrets_root, "Secret", token, mode)
}

/// Renames the root `secrets:` section and every per-service `secrets:` reference,
/// shorthand or longhand.
pub fn rewrite_secret_names(
    services: Option<&mut Mapping>,
    secrets_root: Option<&mut Mapping>,
    token: &str,
    mode: RewriteMode,
) -> ComposerResult<Renames> {
    let renames = rewrite_declared_references(services, secrets_root, "secrets", token, mode)?;
    debug!("Renamed {} secret(s)", renames.len());
    Ok(renames)
}

pub(crate) fn rename_root(
    root: &mut Mapping,
    what: &str,
    token: &str,
    mode: RewriteMode,
) -> ComposerResult<Renames> {
    let names = section_names(root, what)?;
    let renames = Renames::build(names.iter().map(String::as_str), token, mode);
    rename_keys(root, &renames)?;
    Ok(renames)
}

/// Shared by secrets and configs: both are declared at the root and mounted into
/// services as `name` or `{source: name, target: ...}`.
pub(crate) fn rewrite_declared_references(
    services: Option<&mut Mapping>,
    root: Option<&mut Mapping>,
    field: &str,
    token: &str,
    mode: RewriteMode,
) -> ComposerResult<Renames> {
    let Some(root) = root else {
        return Ok(Renames::new());
    };
    let renames = rename_root(root, field, token, mode)?;

    if let Some(services) = services {
        for (name, body) in services.iter_mut() {
            if let Some(service) = service_body_mut(name, body, false)? {
                if let Some(mounts) = service.get_mut(field) {
                    rewrite_mount_list(mounts, &renames);
                }
            }
        }
    }

    Ok(renames)
}
