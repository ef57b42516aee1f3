use crate::composer::{
    errors::ComposerResult,
    rewrite::secrets::rewrite_declared_references,
    types::{Renames, RewriteMode},
};
use serde_yaml::Mapping;
use tracing::debug;

/// Renames the root `configs:` section and every per-service `configs:` reference.
/// Configs are mounted exactly like secrets, so the same rules apply.
pub fn rewrite_config_names(
    services: Option<&mut Mapping>,
    configs_root: Option<&mut Mapping>,
    token: &str,
    mode: RewriteMode,
) -> ComposerResult<Renames> {
    let renames = rewrite_declared_references(services, configs_root, "configs", token, mode)?;
    debug!("Renamed {} config(s)", renames.len());
    Ok(renames)
}
