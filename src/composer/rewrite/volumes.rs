use crate::composer::{
    document::{section_names, service_body_mut},
    errors::ComposerResult,
    rewrite::references::{rename_keys, rewrite_source},
    types::{Renames, RewriteMode},
};
use serde_yaml::{Mapping, Value};
use tracing::{debug, trace};

/// Renames the named volumes declared in the root `volumes:` section and every service
/// mount that uses one of them.
///
/// Only declared volumes are renamed. Without a root declaration nothing is rewritten:
/// bind mounts, anonymous volumes and undeclared sources are all left verbatim.
pub fn rewrite_volume_names(
    services: Option<&mut Mapping>,
    volumes_root: Option<&mut Mapping>,
    token: &str,
    mode: RewriteMode,
) -> ComposerResult<Renames> {
    let Some(volumes_root) = volumes_root else {
        debug!("No root volumes declared, leaving service mounts untouched");
        return Ok(Renames::new());
    };

    let names = section_names(volumes_root, "Volume")?;
    let renames = Renames::build(names.iter().map(String::as_str), token, mode);
    rename_keys(volumes_root, &renames)?;

    if let Some(services) = services {
        for (name, body) in services.iter_mut() {
            let Some(service) = service_body_mut(name, body, false)? else {
                continue;
            };
            if let Some(Value::Sequence(mounts)) = service.get_mut("volumes") {
                let changed: usize = mounts
                    .iter_mut()
                    .map(|mount| rewrite_mount(mount, &renames) as usize)
                    .sum();
                trace!(service = ?name.as_str(), changed, "Rewrote volume mounts");
            }
        }
    }

    debug!("Renamed {} volume(s)", renames.len());
    Ok(renames)
}

fn rewrite_mount(mount: &mut Value, renames: &Renames) -> bool {
    match mount {
        Value::String(short) => match rewrite_short_mount(short, renames) {
            Some(new) => {
                *short = new;
                true
            }
            None => false,
        },
        Value::Mapping(long) => {
            let is_volume = match long.get("type") {
                None => true,
                Some(kind) => kind.as_str() == Some("volume"),
            };
            is_volume && rewrite_source(long, renames)
        }
        _ => false,
    }
}

/// Host paths are bind mounts and never named volumes.
fn is_host_path(source: &str) -> bool {
    source.starts_with('.')
        || source.starts_with('/')
        || source.starts_with('~')
        || source.starts_with('$')
}

/// `source:target[:mode]`. A source may carry a sub-path (`volume/subdir`), in which case
/// only the leading volume name is renamed.
fn rewrite_short_mount(mount: &str, renames: &Renames) -> Option<String> {
    // a lone path is an anonymous volume
    let (source, rest) = mount.split_once(':')?;
    if is_host_path(source) {
        return None;
    }

    let (volume, subpath) = match source.split_once('/') {
        Some((volume, subpath)) => (volume, Some(subpath)),
        None => (source, None),
    };
    let new_volume = renames.get(volume)?;

    Some(match subpath {
        Some(subpath) => format!("{}/{}:{}", new_volume, subpath, rest),
        None => format!("{}:{}", new_volume, rest),
    })
}
