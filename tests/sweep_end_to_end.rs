use common::config::{Configuration, StorageBackend};
use common::storage::create_object_store;
use object_store::ObjectStore;
use retention::PlanOutcome;
use std::sync::Arc;
use std::time::Duration;
use sweeper::{ObjectLister, Seeder, SweepError, Sweeper, SweeperConfig};
use tempfile::TempDir;

fn file_config(dir: &TempDir, keep: i64, dry_run: bool) -> Configuration {
    let mut config = Configuration::default();
    config.storage.backend = StorageBackend::File;
    config.storage.path = dir.path().to_string_lossy().into_owned();
    config.retention.keep = keep;
    config.sweep.dry_run = dry_run;
    config.sweep.batch_pause = Duration::ZERO;
    config
}

/// Seeds deployments one at a time so their modification times are ordered.
async fn seed_in_order(store: Arc<dyn ObjectStore>, prefixes: &[&str]) {
    let seeder = Seeder::new(store);
    for prefix in prefixes {
        seeder
            .seed(&[*prefix], &["/index.html", "/css/font.css"])
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

async fn keys(store: Arc<dyn ObjectStore>, prefix: Option<&str>) -> Vec<String> {
    let mut keys: Vec<String> = ObjectLister::new(store)
        .with_prefix(prefix)
        .list_objects()
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.key)
        .collect();
    keys.sort();
    keys
}

#[tokio::test]
async fn test_sweep_keeps_most_recent_deployments_on_disk() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir, 2, false);
    let store = create_object_store(&config.storage).unwrap();
    seed_in_order(store.clone(), &["first", "second", "third", "fourth"]).await;

    let report = Sweeper::new(SweeperConfig::from(&config), store.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(report.objects, 8);
    assert_eq!(
        report.outcome(),
        PlanOutcome::Delete {
            objects: 4,
            deployments: 2
        }
    );
    let retained: Vec<&str> = report
        .plan
        .retained
        .groups()
        .iter()
        .map(|g| g.prefix.as_str())
        .collect();
    assert_eq!(retained, vec!["fourth", "third"]);
    assert_eq!(report.deletion.unwrap().deleted_count, 4);
    assert_eq!(
        keys(store, None).await,
        vec![
            "fourth/css/font.css",
            "fourth/index.html",
            "third/css/font.css",
            "third/index.html",
        ]
    );
}

#[tokio::test]
async fn test_dry_run_leaves_files_in_place() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir, 1, true);
    let store = create_object_store(&config.storage).unwrap();
    seed_in_order(store.clone(), &["old", "new"]).await;

    let report = Sweeper::new(SweeperConfig::from(&config), store.clone())
        .run()
        .await
        .unwrap();

    let deletion = report.deletion.unwrap();
    assert!(deletion.dry_run);
    assert_eq!(deletion.deleted_count, 2);
    assert_eq!(keys(store, None).await.len(), 4);
}

#[tokio::test]
async fn test_prefix_scopes_the_sweep() {
    let dir = TempDir::new().unwrap();
    let mut config = file_config(&dir, 1, false);
    config.storage.prefix = Some("sites".to_string());
    let store = create_object_store(&config.storage).unwrap();
    seed_in_order(store.clone(), &["other/app", "sites/old", "sites/new"]).await;

    let report = Sweeper::new(SweeperConfig::from(&config), store.clone())
        .run()
        .await
        .unwrap();

    assert!(report.plan.retained.contains("new"));
    assert_eq!(
        report.remaining.unwrap(),
        vec!["new/css/font.css", "new/index.html"]
    );
    let all = keys(store, None).await;
    assert!(all.contains(&"other/app/index.html".to_string()));
    assert!(!all.contains(&"sites/old/index.html".to_string()));
}

#[tokio::test]
async fn test_unset_retention_count_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir, 0, false);
    let store = create_object_store(&config.storage).unwrap();
    seed_in_order(store.clone(), &["only"]).await;

    let err = Sweeper::new(SweeperConfig::from(&config), store.clone())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, SweepError::Retention(_)));
    assert_eq!(keys(store, None).await.len(), 2);
}
