mod common;

use common::{keys, rename_only, yaml, FULL_STACK, FULL_STACK_RENAMED, PLAUSIBLE};
use dcr::composer::{
    domains::{add_domains_to_compose, assert_domains_match_services, DomainLabelOptions},
    rewrite_compose_for_deployment,
    token::generate_token,
    ComposerError, Domain, RewriteMode, MANAGED_NETWORK,
};
use regex::Regex;
use std::collections::HashSet;

#[test]
fn test_full_stack_suffix() {
    let output = rename_only(FULL_STACK, "testhash", RewriteMode::Suffix);
    assert_eq!(output.document, yaml(FULL_STACK_RENAMED));
    assert_eq!(output.renames.services.len(), 5);
    assert_eq!(output.renames.networks.len(), 2);
}

#[test]
fn test_full_stack_prefix() {
    let output = rename_only(
        r#"
services:
  app:
    image: myapp
    volumes:
      - data:/d
      - type: volume
        source: data
        target: /backup
      - ./conf:/etc/app
    secrets:
      - pw
      - source: api_key
        target: /run/secrets/key
    configs:
      - app_conf
    networks:
      front:
        aliases: [app]
  proxy:
    image: nginx
    depends_on:
      app:
        condition: service_healthy
    networks:
      - front
volumes:
  data:
secrets:
  pw:
    file: ./pw.txt
  api_key:
    external: true
configs:
  app_conf:
    file: ./app.yml
networks:
  front:
    driver: overlay
"#,
        "t1",
        RewriteMode::Prefix,
    );

    let expected = yaml(
        r#"
services:
  t1-app:
    image: myapp
    volumes:
      - t1-data:/d
      - type: volume
        source: t1-data
        target: /backup
      - ./conf:/etc/app
    secrets:
      - t1-pw
      - source: t1-api_key
        target: /run/secrets/key
    configs:
      - t1-app_conf
    networks:
      t1-front:
        aliases: [app]
  t1-proxy:
    image: nginx
    depends_on:
      t1-app:
        condition: service_healthy
    networks:
      - t1-front
volumes:
  t1-data:
secrets:
  t1-pw:
    file: ./pw.txt
  t1-api_key:
    external: true
configs:
  t1-app_conf:
    file: ./app.yml
networks:
  t1-front:
    driver: overlay
"#,
    );
    assert_eq!(output.document, expected);
    assert_eq!(output.renames.volumes.get("data"), Some("t1-data"));
    assert_eq!(output.renames.networks.get("front"), Some("t1-front"));
}

#[test]
fn test_token_that_would_shadow_managed_network_fails() {
    let source = yaml(
        r#"
services:
  web:
    networks:
      - dokploy
networks:
  dokploy:
    driver: overlay
    attachable: true
  dokploy-network:
    external: true
"#,
    );

    let err = rewrite_compose_for_deployment(source, "network", RewriteMode::Suffix).unwrap_err();
    assert!(matches!(err, ComposerError::NameCollision { .. }));
    assert!(err.to_string().contains("dokploy-network"));

    // any other token keeps both networks apart
    let source = yaml(
        "services:\n  web:\n    networks: [dokploy]\nnetworks:\n  dokploy:\n    driver: overlay\n  dokploy-network:\n    external: true\n",
    );
    let out = rewrite_compose_for_deployment(source, "abc", RewriteMode::Suffix).unwrap();
    assert_eq!(
        out["networks"]["dokploy-abc"]["driver"].as_str(),
        Some("overlay")
    );
    assert_eq!(
        out["services"]["web-abc"]["networks"],
        yaml("[dokploy-abc, dokploy-network]")
    );
}

#[test]
fn test_services_renamed_and_originals_gone() {
    let out = rewrite_compose_for_deployment(
        yaml("services:\n  web:\n    image: nginx:latest\n  api:\n    image: myapi:latest\n"),
        "ab12cd34",
        RewriteMode::Suffix,
    )
    .unwrap();

    assert_eq!(keys(&out["services"]), vec!["web-ab12cd34", "api-ab12cd34"]);
    assert!(out["services"].get("web").is_none());
    assert!(out["services"].get("api").is_none());
}

#[test]
fn test_container_name_suffixed_image_kept() {
    let out = rewrite_compose_for_deployment(
        yaml("services:\n  web:\n    image: nginx:latest\n    container_name: web_container\n"),
        "xyz",
        RewriteMode::Suffix,
    )
    .unwrap();

    let web = &out["services"]["web-xyz"];
    assert_eq!(web["container_name"].as_str(), Some("web_container-xyz"));
    assert_eq!(web["image"].as_str(), Some("nginx:latest"));
}

#[test]
fn test_prefixed_links() {
    let out = rewrite_compose_for_deployment(
        yaml("services:\n  web:\n    links: [db]\n  db:\n    image: postgres\n"),
        "t1",
        RewriteMode::Prefix,
    )
    .unwrap();

    let links = out["services"]["t1-web"]["links"].as_sequence().unwrap();
    assert!(links.iter().any(|l| l.as_str() == Some("t1-db")));
}

#[test]
fn test_undeclared_volume_untouched() {
    let source = "services:\n  db:\n    volumes:\n      - db_data:/var/lib/postgresql/data\n";
    let output = rename_only(source, "tok", RewriteMode::Suffix);
    assert_eq!(
        output.document["services"]["db-tok"]["volumes"][0].as_str(),
        Some("db_data:/var/lib/postgresql/data")
    );

    let declared = format!("{}volumes:\n  db_data:\n    driver: local\n", source);
    let output = rename_only(&declared, "tok", RewriteMode::Suffix);
    assert_eq!(
        output.document["services"]["db-tok"]["volumes"][0].as_str(),
        Some("db_data-tok:/var/lib/postgresql/data")
    );
    assert_eq!(
        output.document["volumes"]["db_data-tok"]["driver"].as_str(),
        Some("local")
    );
}

#[test]
fn test_root_secret_file_kept() {
    let output = rename_only(
        "secrets:\n  db_password:\n    file: ./db_password.txt\n",
        "h8",
        RewriteMode::Suffix,
    );

    let secrets = keys(&output.document["secrets"]);
    assert_eq!(secrets.len(), 1);
    assert!(secrets[0].contains("-h8"));
    assert_eq!(
        output.document["secrets"][secrets[0].as_str()]["file"].as_str(),
        Some("./db_password.txt")
    );
}

#[test]
fn test_plausible_stack() {
    let output = rename_only(PLAUSIBLE, "testhash", RewriteMode::Suffix);
    let doc = &output.document;

    assert_eq!(
        keys(&doc["services"]),
        vec![
            "plausible_db-testhash",
            "plausible_events_db-testhash",
            "plausible-testhash"
        ]
    );
    assert_eq!(
        doc["services"]["plausible-testhash"]["depends_on"],
        yaml("[plausible_db-testhash, plausible_events_db-testhash]")
    );
    let events = &doc["services"]["plausible_events_db-testhash"]["volumes"];
    assert_eq!(events[0].as_str(), Some("event-data-testhash:/var/lib/clickhouse"));
    assert_eq!(
        events[1].as_str(),
        Some("event-logs-testhash:/var/log/clickhouse-server")
    );
    assert_eq!(
        events[2].as_str(),
        Some("./clickhouse/clickhouse-config.xml:/etc/clickhouse-server/config.d/logging.xml:ro")
    );
    assert_eq!(
        doc["services"]["plausible-testhash"]["ports"][0].as_str(),
        Some("127.0.0.1:8000:8000")
    );
    assert_eq!(
        keys(&doc["volumes"]),
        vec!["db-data-testhash", "event-data-testhash", "event-logs-testhash"]
    );
}

#[test]
fn test_names_do_not_collide_with_originals() {
    let before = yaml(FULL_STACK);
    let token = generate_token();
    let after = rewrite_compose_for_deployment(before.clone(), &token, RewriteMode::Suffix).unwrap();

    for section in ["services", "volumes", "secrets", "configs"] {
        let old: HashSet<_> = keys(&before[section]).into_iter().collect();
        let new = keys(&after[section]);
        assert_eq!(new.len(), old.len(), "{} count changed", section);
        assert!(new.iter().all(|name| !old.contains(name)), "{} collided", section);
    }
}

#[test]
fn test_every_service_joins_managed_network_once() {
    let first =
        rewrite_compose_for_deployment(yaml(FULL_STACK), "abc", RewriteMode::Suffix).unwrap();

    for (_, service) in first["services"].as_mapping().unwrap() {
        let networks = service["networks"].as_sequence().unwrap();
        let managed = networks
            .iter()
            .filter(|n| n.as_str() == Some(MANAGED_NETWORK))
            .count();
        assert_eq!(managed, 1);
    }
    assert_eq!(
        first["networks"][MANAGED_NETWORK]["external"].as_bool(),
        Some(true)
    );

    // a second pass renames again but never duplicates the managed network
    let second = rewrite_compose_for_deployment(first, "def", RewriteMode::Suffix).unwrap();
    let web = second["services"]["web-abc-def"]["networks"]
        .as_sequence()
        .unwrap();
    assert_eq!(
        web.iter()
            .filter(|n| n.as_str() == Some(MANAGED_NETWORK))
            .count(),
        1
    );
    assert!(second["networks"].get(MANAGED_NETWORK).is_some());
}

#[test]
fn test_domain_mismatch_message() {
    let doc = yaml("services:\n  python-backend: {}\n");
    let err = assert_domains_match_services(
        &doc,
        &[Domain::new("api.example.com", "php-backend")],
    )
    .unwrap_err();

    let pattern = Regex::new(r"(?i)api\.example\.com.*php-backend.*python-backend").unwrap();
    assert!(pattern.is_match(&err.to_string()));
}

#[test]
fn test_domains_after_rewrite() {
    let output = rename_only(
        "services:\n  web:\n    image: nginx\n    labels:\n      - keep=me\n",
        "abc",
        RewriteMode::Suffix,
    );
    let mut doc = output.document;

    let stale = Domain::new("example.com", "web");
    let err = add_domains_to_compose(&mut doc, &[stale], &DomainLabelOptions::new("shop"))
        .unwrap_err();
    assert!(matches!(err, ComposerError::ServiceNotFound { .. }));

    let domain = Domain {
        https: true,
        port: Some(3000),
        unique_config_key: 7,
        ..Domain::new("example.com", "web-abc")
    };
    add_domains_to_compose(&mut doc, &[domain], &DomainLabelOptions::new("shop")).unwrap();

    let labels: Vec<_> = doc["services"]["web-abc"]["labels"]
        .as_sequence()
        .unwrap()
        .iter()
        .filter_map(|l| l.as_str())
        .collect();
    assert!(labels.contains(&"traefik.http.routers.shop-7-websecure.rule=Host(`example.com`)"));
    assert!(labels.contains(&"traefik.http.services.shop-7-web.loadbalancer.server.port=3000"));
    assert!(labels.contains(&"traefik.enable=true"));
    assert_eq!(labels.last(), Some(&"keep=me"));
    assert!(doc["networks"][MANAGED_NETWORK].is_mapping());
}
