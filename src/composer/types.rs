use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Name of the platform-owned overlay network every stack is joined to.
pub const MANAGED_NETWORK: &str = "dokploy-network";

/// Where the disambiguation token goes relative to the original name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteMode {
    Prefix,
    #[default]
    Suffix,
}

impl RewriteMode {
    /// `token-name` for prefix mode, `name-token` for suffix mode.
    pub fn apply(&self, name: &str, token: &str) -> String {
        match self {
            RewriteMode::Prefix => format!("{}-{}", token, name),
            RewriteMode::Suffix => format!("{}-{}", name, token),
        }
    }
}

impl fmt::Display for RewriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteMode::Prefix => write!(f, "prefix"),
            RewriteMode::Suffix => write!(f, "suffix"),
        }
    }
}

impl FromStr for RewriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prefix" => Ok(RewriteMode::Prefix),
            "suffix" => Ok(RewriteMode::Suffix),
            other => Err(format!(
                "unknown rewrite mode '{}', expected 'prefix' or 'suffix'",
                other
            )),
        }
    }
}

/// Old -> new names for one section of a compose document, kept in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Renames {
    order: Vec<String>,
    map: HashMap<String, String>,
}

impl Renames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the rename table for `names`, applying `mode` with `token` to each one.
    pub fn build<'a, I>(names: I, token: &str, mode: RewriteMode) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut renames = Self::new();
        for name in names {
            renames.insert(name, mode.apply(name, token));
        }
        renames
    }

    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) {
        let old = old.into();
        if self.map.insert(old.clone(), new.into()).is_none() {
            self.order.push(old);
        }
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.map.get(old).map(String::as_str)
    }

    pub fn contains(&self, old: &str) -> bool {
        self.map.contains_key(old)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(move |old| (old.as_str(), self.map[old].as_str()))
    }
}

/// Everything renamed by one rewriting pass, per section.
#[derive(Debug, Clone, Default)]
pub struct RenameSummary {
    pub services: Renames,
    pub volumes: Renames,
    pub secrets: Renames,
    pub configs: Renames,
    pub networks: Renames,
}

impl RenameSummary {
    pub fn sections(&self) -> [(&'static str, &Renames); 5] {
        [
            ("services", &self.services),
            ("volumes", &self.volumes),
            ("secrets", &self.secrets),
            ("configs", &self.configs),
            ("networks", &self.networks),
        ]
    }

    pub fn total(&self) -> usize {
        self.sections().iter().map(|(_, r)| r.len()).sum()
    }
}

#[derive(Debug, Clone)]
pub struct RewriteConfig {
    pub token: String,
    pub mode: RewriteMode,
    /// Attach every service to the managed network after renaming.
    pub inject_managed_network: bool,
}

impl RewriteConfig {
    pub fn new(token: impl Into<String>, mode: RewriteMode) -> Self {
        Self {
            token: token.into(),
            mode,
            inject_managed_network: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RewriteOutput {
    pub document: Value,
    pub renames: RenameSummary,
}

/// Whether labels end up on the service (`docker compose`) or under `deploy` (swarm stack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeType {
    #[default]
    DockerCompose,
    Stack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateType {
    Letsencrypt,
    #[default]
    None,
    Custom,
}

/// A routing record managed by the platform; only `service_name` and `host` matter for
/// consistency checks, the rest feeds Traefik labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub host: String,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub https: bool,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub unique_config_key: u32,
    #[serde(default)]
    pub certificate_type: CertificateType,
    #[serde(default)]
    pub custom_cert_resolver: Option<String>,
    #[serde(default)]
    pub strip_path: bool,
    #[serde(default)]
    pub internal_path: Option<String>,
}

impl Domain {
    pub fn new(host: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            service_name: Some(service_name.into()),
            ..Self::default()
        }
    }
}
