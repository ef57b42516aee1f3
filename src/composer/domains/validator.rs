use crate::composer::{
    document::service_names,
    errors::{ComposerError, ComposerResult},
    types::Domain,
};
use serde_yaml::Value;
use std::collections::HashSet;
use tracing::debug;

/// Checks that every domain routes to a service declared in the compose document.
///
/// Fails on the first domain whose service is missing; the error carries the domain's
/// host, the unknown service name and the services that do exist.
pub fn assert_domains_match_services(compose: &Value, domains: &[Domain]) -> ComposerResult<()> {
    let available = service_names(compose)?;
    let known: HashSet<&str> = available.iter().map(String::as_str).collect();

    for domain in domains {
        let service = domain
            .service_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ComposerError::MissingServiceName {
                host: domain.host.clone(),
            })?;

        if !known.contains(service) {
            return Err(ComposerError::service_not_found(
                &domain.host,
                service,
                available.clone(),
            ));
        }
    }

    debug!(
        "{} domain(s) match the {} declared service(s)",
        domains.len(),
        available.len()
    );
    Ok(())
}
