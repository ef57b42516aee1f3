use crate::composer::{
    document::{
        as_section, as_section_mut, kind, root_mapping, root_mapping_mut, service_body_mut,
    },
    domains::validator::assert_domains_match_services,
    errors::{ComposerError, ComposerResult},
    network::{attach_root, attach_service},
    types::{CertificateType, ComposeType, Domain, MANAGED_NETWORK},
};
use serde_yaml::{Mapping, Value};
use std::fmt;
use tracing::{debug, info};

const DEFAULT_PORT: u16 = 80;
const HTTPS_REDIRECT_MIDDLEWARE: &str = "redirect-to-https@file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entrypoint {
    Web,
    Websecure,
}

impl fmt::Display for Entrypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entrypoint::Web => write!(f, "web"),
            Entrypoint::Websecure => write!(f, "websecure"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DomainLabelOptions {
    pub app_name: String,
    pub compose_type: ComposeType,
    /// Isolated deployments run on their own network and skip the managed one.
    pub isolated: bool,
}

impl DomainLabelOptions {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            compose_type: ComposeType::DockerCompose,
            isolated: false,
        }
    }
}

fn non_root(path: Option<&str>) -> Option<&str> {
    path.filter(|p| !p.is_empty() && *p != "/")
}

/// Traefik labels routing `domain` through `entrypoint` to its service.
pub fn create_domain_labels(app_name: &str, domain: &Domain, entrypoint: Entrypoint) -> Vec<String> {
    let key = domain.unique_config_key;
    let router = format!("{}-{}-{}", app_name, key, entrypoint);
    let path = non_root(domain.path.as_deref());

    let mut rule = format!("Host(`{}`)", domain.host);
    if let Some(path) = path {
        rule.push_str(&format!(" && PathPrefix(`{}`)", path));
    }

    let mut labels = vec![
        format!("traefik.http.routers.{}.rule={}", router, rule),
        format!("traefik.http.routers.{}.entrypoints={}", router, entrypoint),
        format!(
            "traefik.http.services.{}.loadbalancer.server.port={}",
            router,
            domain.port.unwrap_or(DEFAULT_PORT)
        ),
        format!("traefik.http.routers.{}.service={}", router, router),
    ];

    // redirect must run before any path rewriting
    let mut middlewares = Vec::new();
    if entrypoint == Entrypoint::Web && domain.https {
        middlewares.push(HTTPS_REDIRECT_MIDDLEWARE.to_string());
    }

    // middleware definitions are shared, only the web router declares them
    if let (true, Some(path)) = (domain.strip_path, path) {
        let name = format!("stripprefix-{}-{}", app_name, key);
        if entrypoint == Entrypoint::Web {
            labels.push(format!(
                "traefik.http.middlewares.{}.stripprefix.prefixes={}",
                name, path
            ));
        }
        middlewares.push(name);
    }

    if let Some(internal) = non_root(domain.internal_path.as_deref()).filter(|p| p.starts_with('/')) {
        let name = format!("addprefix-{}-{}", app_name, key);
        if entrypoint == Entrypoint::Web {
            labels.push(format!(
                "traefik.http.middlewares.{}.addprefix.prefix={}",
                name, internal
            ));
        }
        middlewares.push(name);
    }

    if !middlewares.is_empty() {
        labels.push(format!(
            "traefik.http.routers.{}.middlewares={}",
            router,
            middlewares.join(",")
        ));
    }

    if entrypoint == Entrypoint::Websecure {
        let resolver = match domain.certificate_type {
            CertificateType::Letsencrypt => Some("letsencrypt"),
            CertificateType::Custom => domain.custom_cert_resolver.as_deref(),
            CertificateType::None => None,
        };
        if let Some(resolver) = resolver {
            labels.push(format!(
                "traefik.http.routers.{}.tls.certresolver={}",
                router, resolver
            ));
        }
    }

    labels
}

/// Labels every service referenced by `domains` for Traefik and, unless the deployment is
/// isolated, joins those services and the root to the managed network.
pub fn add_domains_to_compose(
    compose: &mut Value,
    domains: &[Domain],
    options: &DomainLabelOptions,
) -> ComposerResult<()> {
    if domains.is_empty() {
        return Ok(());
    }
    assert_domains_match_services(compose, domains)?;
    check_label_targets(compose, domains, options)?;

    let root = root_mapping_mut(compose)?;
    let services = as_section_mut(root.get_mut("services"), "services")?
        .ok_or_else(|| ComposerError::invalid_document("no services to attach domains to"))?;

    for domain in domains {
        // presence checked by assert_domains_match_services
        let name = domain.service_name.as_deref().unwrap_or_default();
        let Some((key, body)) = services.iter_mut().find(|(k, _)| k.as_str() == Some(name)) else {
            continue;
        };
        let Some(service) = service_body_mut(key, body, true)? else {
            continue;
        };

        let mut route_labels = create_domain_labels(&options.app_name, domain, Entrypoint::Web);
        if domain.https {
            route_labels.extend(create_domain_labels(
                &options.app_name,
                domain,
                Entrypoint::Websecure,
            ));
        }

        let labels = labels_slot(service, options.compose_type)?;
        push_labels(labels, &route_labels, options.isolated)?;

        if !options.isolated {
            attach_service(service)?;
        }
        info!(host = %domain.host, service = name, "Attached domain");
    }

    if !options.isolated {
        attach_root(root)?;
    }
    Ok(())
}

/// Rejects every shape the labelling loop would fail on, so a bad service never leaves
/// an earlier one half-labelled.
fn check_label_targets(
    compose: &Value,
    domains: &[Domain],
    options: &DomainLabelOptions,
) -> ComposerResult<()> {
    let root = root_mapping(compose)?;
    if !options.isolated {
        as_section(root.get("networks"), "networks")?;
    }
    let Some(services) = as_section(root.get("services"), "services")? else {
        return Ok(());
    };

    for domain in domains {
        let name = domain.service_name.as_deref().unwrap_or_default();
        let service = match services.get(name) {
            None | Some(Value::Null) => continue,
            Some(Value::Mapping(service)) => service,
            Some(other) => {
                return Err(ComposerError::invalid_document(format!(
                    "service '{}' must be a mapping, found {}",
                    name,
                    kind(other)
                )))
            }
        };

        let labels = match options.compose_type {
            ComposeType::DockerCompose => service.get("labels"),
            ComposeType::Stack => match service.get("deploy") {
                None | Some(Value::Null) => None,
                Some(Value::Mapping(deploy)) => deploy.get("labels"),
                Some(other) => {
                    return Err(ComposerError::invalid_document(format!(
                        "deploy must be a mapping, found {}",
                        kind(other)
                    )))
                }
            },
        };
        expect_collection(labels, "labels")?;
        if !options.isolated {
            expect_collection(service.get("networks"), "service networks")?;
        }
    }
    Ok(())
}

fn expect_collection(value: Option<&Value>, what: &str) -> ComposerResult<()> {
    match value {
        None | Some(Value::Null) | Some(Value::Sequence(_)) | Some(Value::Mapping(_)) => Ok(()),
        Some(other) => Err(ComposerError::invalid_document(format!(
            "{} must be a list or a mapping, found {}",
            what,
            kind(other)
        ))),
    }
}

/// `labels` for plain compose, `deploy.labels` for swarm stacks.
fn labels_slot(service: &mut Mapping, compose_type: ComposeType) -> ComposerResult<&mut Value> {
    let owner = match compose_type {
        ComposeType::DockerCompose => service,
        ComposeType::Stack => {
            let deploy = service
                .entry(Value::String("deploy".into()))
                .or_insert(Value::Null);
            if deploy.is_null() {
                *deploy = Value::Mapping(Mapping::new());
            }
            match deploy {
                Value::Mapping(deploy) => deploy,
                other => {
                    return Err(ComposerError::invalid_document(format!(
                        "deploy must be a mapping, found {}",
                        kind(other)
                    )))
                }
            }
        }
    };
    Ok(owner
        .entry(Value::String("labels".into()))
        .or_insert(Value::Null))
}

/// Puts the routing labels in front of whatever the service already declares.
fn push_labels(labels: &mut Value, route_labels: &[String], isolated: bool) -> ComposerResult<()> {
    if labels.is_null() {
        *labels = Value::Sequence(Vec::new());
    }

    let mut front: Vec<String> = Vec::new();
    if !isolated {
        front.push(format!("traefik.swarm.network={}", MANAGED_NETWORK));
        front.push(format!("traefik.docker.network={}", MANAGED_NETWORK));
    }
    front.extend(route_labels.iter().cloned());
    front.push("traefik.enable=true".to_string());

    match labels {
        Value::Sequence(existing) => {
            let present: Vec<String> = existing
                .iter()
                .filter_map(|l| l.as_str().map(str::to_string))
                .collect();
            let fresh: Vec<Value> = front
                .into_iter()
                .filter(|l| !present.contains(l))
                .map(Value::String)
                .collect();
            debug!("Prepending {} label(s)", fresh.len());
            let rest = std::mem::replace(existing, fresh);
            existing.extend(rest);
        }
        Value::Mapping(existing) => {
            for label in front {
                let (k, v) = label.split_once('=').unwrap_or((label.as_str(), ""));
                existing.insert(Value::String(k.to_string()), Value::String(v.to_string()));
            }
        }
        other => {
            return Err(ComposerError::invalid_document(format!(
                "labels must be a list or a mapping, found {}",
                kind(other)
            )))
        }
    }
    Ok(())
}
