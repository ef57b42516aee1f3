use crate::composer::{
    document::{section_names, service_body_mut},
    errors::ComposerResult,
    rewrite::references::{
        rename_keys, rewrite_in_place, rewrite_reference_field, rewrite_str,
        rewrite_string_value, RefShape,
    },
    types::{Renames, RewriteMode},
};
use serde_yaml::{Mapping, Value};
use tracing::{debug, trace};

/// Renames every service and rewrites every field that points at another service.
///
/// The rename table is built from the complete `services` map before any reference is
/// touched, so forward references resolve the same way as backward ones. References to
/// names that are not declared services are left as they are.
pub fn rewrite_service_names(
    services: &mut Mapping,
    token: &str,
    mode: RewriteMode,
) -> ComposerResult<Renames> {
    let names = section_names(services, "Service")?;
    let renames = Renames::build(names.iter().map(String::as_str), token, mode);

    rename_keys(services, &renames)?;

    for (name, body) in services.iter_mut() {
        let Some(service) = service_body_mut(name, body, false)? else {
            continue;
        };
        let changed = rewrite_service_references(service, &renames, token, mode)?;
        trace!(service = ?name.as_str(), changed, "Rewrote service references");
    }

    debug!("Renamed {} service(s)", renames.len());
    Ok(renames)
}

fn rewrite_service_references(
    service: &mut Mapping,
    renames: &Renames,
    token: &str,
    mode: RewriteMode,
) -> ComposerResult<usize> {
    let mut changed = 0;

    // container_name is a name of its own, it gets the token directly
    if let Some(Value::String(container)) = service.get_mut("container_name") {
        let renamed = mode.apply(container, token);
        *container = renamed;
        changed += 1;
    }

    if let Some(links) = service.get_mut("links") {
        changed += rewrite_reference_field(links, renames, RefShape::Colon)?;
    }

    if let Some(depends_on) = service.get_mut("depends_on") {
        changed += rewrite_reference_field(depends_on, renames, RefShape::Exact)?;
    }

    if let Some(Value::Sequence(entries)) = service.get_mut("volumes_from") {
        for entry in entries.iter_mut() {
            changed += rewrite_volumes_from_entry(entry, renames) as usize;
        }
    }

    if let Some(extends) = service.get_mut("extends") {
        changed += rewrite_extends(extends, renames) as usize;
    }

    if let Some(Value::String(network_mode)) = service.get_mut("network_mode") {
        if let Some(new) = network_mode
            .strip_prefix("service:")
            .and_then(|target| renames.get(target))
        {
            *network_mode = format!("service:{}", new);
            changed += 1;
        }
    }

    Ok(changed)
}

/// `name[:mode]`, `service:name[:mode]` or `container:name`. Containers are not services.
fn rewrite_volumes_from_entry(entry: &mut Value, renames: &Renames) -> bool {
    let Value::String(reference) = entry else {
        return false;
    };

    if reference.starts_with("container:") {
        return false;
    }

    let rewritten = match reference.strip_prefix("service:") {
        Some(rest) => rewrite_str(rest, renames, RefShape::Colon).map(|r| format!("service:{}", r)),
        None => rewrite_str(reference, renames, RefShape::Colon),
    };

    match rewritten {
        Some(new) => {
            *reference = new;
            true
        }
        None => false,
    }
}

/// `extends: base` or `extends: {service: base}`. A `file` key points at another
/// document whose services are not renamed here.
fn rewrite_extends(extends: &mut Value, renames: &Renames) -> bool {
    match extends {
        Value::String(base) => rewrite_in_place(base, renames, RefShape::Exact),
        Value::Mapping(spec) if !spec.contains_key("file") => spec
            .get_mut("service")
            .is_some_and(|service| rewrite_string_value(service, renames, RefShape::Exact)),
        _ => false,
    }
}
