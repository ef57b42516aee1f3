use crate::composer::{
    document::{as_section_mut, root_mapping_mut, sections_mut},
    errors::ComposerResult,
    network::inject_managed_network,
    rewrite::{
        rewrite_config_names, rewrite_network_names, rewrite_secret_names, rewrite_service_names,
        rewrite_volume_names,
    },
    token::validate_token,
    types::{RenameSummary, Renames, RewriteConfig, RewriteMode, RewriteOutput},
};

use serde_yaml::Value;
use tracing::{debug, info};

/// Makes a compose document safe to deploy next to other stacks on the same host by
/// scoping every service, volume, secret, config and network name with a token.
pub struct ComposeRewriter {
    config: RewriteConfig,
}

impl ComposeRewriter {
    pub fn try_new(config: RewriteConfig) -> ComposerResult<Self> {
        validate_token(&config.token)?;
        debug!(
            token = %config.token,
            mode = %config.mode,
            inject = config.inject_managed_network,
            "Created compose rewriter"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Rewrites `document` and reports every rename that was applied.
    pub fn rewrite(&self, mut document: Value) -> ComposerResult<RewriteOutput> {
        let renames = self.rewrite_in_place(&mut document)?;
        Ok(RewriteOutput { document, renames })
    }

    /// Same as [`ComposeRewriter::rewrite`] but mutates the caller's tree. On error the
    /// document may be partially rewritten.
    pub fn rewrite_in_place(&self, document: &mut Value) -> ComposerResult<RenameSummary> {
        let token = self.config.token.as_str();
        let mode = self.config.mode;
        let root = root_mapping_mut(document)?;

        let summary = {
            let sections = sections_mut(root);
            let mut services = as_section_mut(sections.services, "services")?;
            let secrets_root = as_section_mut(sections.secrets, "secrets")?;
            let configs_root = as_section_mut(sections.configs, "configs")?;
            let networks_root = as_section_mut(sections.networks, "networks")?;
            let volumes_root = as_section_mut(sections.volumes, "volumes")?;

            // services last: the other steps look services up by their original names
            let secrets = rewrite_secret_names(services.as_deref_mut(), secrets_root, token, mode)?;
            let configs = rewrite_config_names(services.as_deref_mut(), configs_root, token, mode)?;
            let networks =
                rewrite_network_names(services.as_deref_mut(), networks_root, token, mode)?;
            let volumes = rewrite_volume_names(services.as_deref_mut(), volumes_root, token, mode)?;
            let services = match services {
                Some(services) => rewrite_service_names(services, token, mode)?,
                None => Renames::new(),
            };

            RenameSummary {
                services,
                volumes,
                secrets,
                configs,
                networks,
            }
        };

        if self.config.inject_managed_network {
            inject_managed_network(root)?;
        }

        info!(
            services = summary.services.len(),
            volumes = summary.volumes.len(),
            secrets = summary.secrets.len(),
            configs = summary.configs.len(),
            networks = summary.networks.len(),
            "Rewrote compose document"
        );
        Ok(summary)
    }
}

/// Renames everything in `document` with `token` and joins it to the managed network.
pub fn rewrite_compose_for_deployment(
    document: Value,
    token: &str,
    mode: RewriteMode,
) -> ComposerResult<Value> {
    let rewriter = ComposeRewriter::try_new(RewriteConfig::new(token, mode))?;
    Ok(rewriter.rewrite(document)?.document)
}
