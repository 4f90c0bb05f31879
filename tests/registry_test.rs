use galaxy::services::catalog::{Catalog, ComponentName, SharedCatalog};
use galaxy::services::registry::{
    AnnounceError, Announcement, Registrar, Resolver, SUPPORTED_API_VERSION,
};

fn setup() -> (SharedCatalog, Registrar, Resolver) {
    let catalog = Catalog::shared();
    (
        catalog.clone(),
        Registrar::new(catalog.clone()),
        Resolver::new(catalog),
    )
}

fn announcement(address: &str, components: &[&str], host: &str) -> Announcement {
    Announcement {
        address: address.to_string(),
        components: components.iter().map(|c| c.to_string()).collect(),
        host: host.to_string(),
        api_version: SUPPORTED_API_VERSION,
    }
}

async fn host_names(catalog: &SharedCatalog, module: &str, service: &str) -> Vec<String> {
    let name: ComponentName = service.parse().expect("valid component name");
    let catalog = catalog.read().await;
    catalog
        .module(module)
        .and_then(|m| m.service(&name))
        .map(|s| s.instance().hosts().iter().map(|h| h.name.clone()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_announce_then_lookup_every_component() {
    let (_, registrar, resolver) = setup();

    registrar
        .announce(announcement(
            "10.0.0.1:9000",
            &["billing.Health", "billing.Charge", "billing.Refund", "Ping"],
            "node-a",
        ))
        .await
        .expect("announce should succeed");

    for method in ["billing.Charge", "billing.Refund", "Ping"] {
        assert_eq!(
            resolver.lookup(method).await.as_deref(),
            Some("10.0.0.1:9000"),
            "{method} should resolve"
        );
    }
    // Health 只是契约，不会被发布
    assert_eq!(resolver.lookup("billing.Health").await, None);
}

#[tokio::test]
async fn test_two_nodes_last_writer_wins() {
    let (catalog, registrar, resolver) = setup();

    registrar
        .announce(announcement(
            "10.0.0.1:9000",
            &["billing.Health", "billing.Charge"],
            "node-a",
        ))
        .await
        .expect("first announce");
    assert_eq!(
        resolver.lookup("billing.Charge").await.as_deref(),
        Some("10.0.0.1:9000")
    );

    registrar
        .announce(announcement(
            "10.0.0.2:9000",
            &["billing.Health", "billing.Charge"],
            "node-b",
        ))
        .await
        .expect("second announce");

    assert_eq!(
        resolver.lookup("billing.Charge").await.as_deref(),
        Some("10.0.0.2:9000")
    );
    assert_eq!(
        host_names(&catalog, "billing", "billing.Charge").await,
        vec!["node-a".to_string(), "node-b".to_string()]
    );
}

#[tokio::test]
async fn test_reannounce_same_host_keeps_host_count() {
    let (catalog, registrar, _) = setup();
    let req = announcement("10.0.0.1:9000", &["billing.Health", "billing.Charge"], "node-a");

    registrar.announce(req.clone()).await.expect("first announce");
    let before = host_names(&catalog, "billing", "billing.Charge").await;

    let outcome = registrar.announce(req).await.expect("second announce");
    let after = host_names(&catalog, "billing", "billing.Charge").await;

    assert_eq!(outcome.created, 0);
    assert_eq!(outcome.refreshed, 1);
    assert_eq!(before.len(), 1);
    assert_eq!(after.len(), before.len());
}

#[tokio::test]
async fn test_second_host_keeps_first_last_seen() {
    let (catalog, registrar, _) = setup();
    let charge: ComponentName = "billing.Charge".parse().unwrap();

    registrar
        .announce(announcement(
            "10.0.0.1:9000",
            &["billing.Health", "billing.Charge"],
            "node-a",
        ))
        .await
        .unwrap();
    let first_seen = {
        let catalog = catalog.read().await;
        let service = catalog.module("billing").unwrap().service(&charge).unwrap();
        service.instance().host("node-a").unwrap().last_seen
    };

    registrar
        .announce(announcement(
            "10.0.0.2:9000",
            &["billing.Health", "billing.Charge"],
            "node-b",
        ))
        .await
        .unwrap();

    let catalog = catalog.read().await;
    let instance = catalog
        .module("billing")
        .unwrap()
        .service(&charge)
        .unwrap()
        .instance();
    assert_eq!(instance.hosts().len(), 2);
    assert_eq!(instance.host("node-a").unwrap().last_seen, first_seen);
}

#[tokio::test]
async fn test_empty_host_is_accepted_and_resolves() {
    let (catalog, registrar, resolver) = setup();

    registrar
        .announce(announcement(
            "10.0.0.1:9000",
            &["billing.Health", "billing.Charge"],
            "",
        ))
        .await
        .expect("announce without host name should succeed");

    assert_eq!(
        resolver.lookup("billing.Charge").await.as_deref(),
        Some("10.0.0.1:9000")
    );
    assert_eq!(
        host_names(&catalog, "billing", "billing.Charge").await,
        vec![String::new()]
    );
}

#[tokio::test]
async fn test_missing_health_leaves_catalog_untouched() {
    let (catalog, registrar, resolver) = setup();
    let components = ["billing.Charge", "billing.Refund"];

    for method in components {
        assert_eq!(resolver.lookup(method).await, None);
    }

    let result = registrar
        .announce(announcement("10.0.0.1:9000", &components, "node-a"))
        .await;
    assert_eq!(
        result,
        Err(AnnounceError::MissingHealthExport {
            expected: "billing.Health".to_string()
        })
    );

    for method in components {
        assert_eq!(resolver.lookup(method).await, None);
    }
    assert!(catalog.read().await.is_empty());
}

#[tokio::test]
async fn test_multi_module_rejected() {
    let (catalog, registrar, resolver) = setup();

    let result = registrar
        .announce(announcement(
            "10.0.0.1:9000",
            &["billing.Health", "billing.Charge", "shipping.Track"],
            "node-a",
        ))
        .await;

    assert!(matches!(
        result,
        Err(AnnounceError::MultiModuleNotSupported { .. })
    ));
    assert_eq!(resolver.lookup("billing.Charge").await, None);
    assert!(catalog.read().await.is_empty());
}

#[tokio::test]
async fn test_version_and_empty_components_rejected() {
    let (catalog, registrar, _) = setup();

    let mut old = announcement("10.0.0.1:9000", &["billing.Health", "billing.Charge"], "node-a");
    old.api_version = 0;
    assert!(matches!(
        registrar.announce(old).await,
        Err(AnnounceError::VersionMismatch { remote: 0, .. })
    ));

    assert_eq!(
        registrar
            .announce(announcement("10.0.0.1:9000", &[], "node-a"))
            .await,
        Err(AnnounceError::NoComponents)
    );
    assert!(catalog.read().await.is_empty());
}

#[tokio::test]
async fn test_concurrent_announces_keep_every_host() {
    let (catalog, registrar, resolver) = setup();

    let tasks = (0..16).map(|i| {
        let registrar = registrar.clone();
        tokio::spawn(async move {
            registrar
                .announce(announcement(
                    &format!("10.0.0.{i}:9000"),
                    &["billing.Health", "billing.Charge"],
                    &format!("node-{i}"),
                ))
                .await
        })
    });

    for result in futures::future::join_all(tasks).await {
        result.expect("task panicked").expect("announce failed");
    }

    let hosts = host_names(&catalog, "billing", "billing.Charge").await;
    assert_eq!(hosts.len(), 16);
    assert_eq!(catalog.read().await.service_count(), 1);
    assert!(resolver.lookup("billing.Charge").await.is_some());
}
