use model::poller::{Error, ErrorKind};
use model::{HarnessSettings, SnapshotPoller, WarmMigrationGuard};
use selftest::{InventoryEvent, ScriptedInventory};
use std::time::Duration;

const PROVIDER: &str = "vs8";

fn poller(inventory: ScriptedInventory) -> SnapshotPoller<ScriptedInventory> {
    SnapshotPoller::new(inventory)
}

fn check(vm: &str) -> InventoryEvent {
    InventoryEvent::Check(vm.to_string())
}

fn refresh() -> InventoryEvent {
    InventoryEvent::Refresh(PROVIDER.to_string())
}

#[tokio::test(start_paused = true)]
async fn clean_vm_returns_without_refreshing() {
    let poller = poller(ScriptedInventory::new().vm("warm-vm", &[0]));
    let info = poller
        .wait_until_clean(
            "warm-vm",
            PROVIDER,
            Duration::from_secs(120),
            Duration::from_secs(10),
        )
        .await
        .unwrap();
    assert!(!info.has_snapshots());
    assert_eq!(poller.inventory().events(), vec![check("warm-vm")]);
}

#[tokio::test(start_paused = true)]
async fn times_out_after_ceil_of_timeout_over_interval_attempts() {
    let poller = poller(ScriptedInventory::new().vm("warm-vm", &[2]));
    let error = poller
        .wait_until_clean(
            "warm-vm",
            PROVIDER,
            Duration::from_secs(20),
            Duration::from_secs(10),
        )
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Timeout);
    match error {
        Error::Timeout {
            attempts,
            last_snapshot_count,
            ..
        } => {
            assert_eq!(attempts, 2);
            assert_eq!(last_snapshot_count, 2);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(poller.inventory().refreshes(), 2);
    assert_eq!(poller.inventory().checks(), 3);
}

#[tokio::test(start_paused = true)]
async fn refreshes_before_each_recheck() {
    let poller = poller(ScriptedInventory::new().vm("warm-vm", &[3, 1, 0]));
    let start = tokio::time::Instant::now();
    let info = poller
        .wait_until_clean(
            "warm-vm",
            PROVIDER,
            Duration::from_secs(120),
            Duration::from_secs(10),
        )
        .await
        .unwrap();

    assert_eq!(info.snapshot_count, 0);
    assert_eq!(
        poller.inventory().events(),
        vec![
            check("warm-vm"),
            refresh(),
            check("warm-vm"),
            refresh(),
            check("warm-vm"),
        ]
    );
    // Each attempt waits for the default 5s settle delay and the 10s poll interval.
    assert!(start.elapsed() >= Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn zero_timeout_fails_on_a_dirty_vm_without_refreshing() {
    let poller = poller(ScriptedInventory::new().vm("warm-vm", &[1]));
    let error = poller
        .wait_until_clean("warm-vm", PROVIDER, Duration::ZERO, Duration::from_secs(10))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Timeout);
    assert_eq!(poller.inventory().refreshes(), 0);
}

#[tokio::test(start_paused = true)]
async fn refresh_failure_ends_the_wait() {
    let poller = poller(
        ScriptedInventory::new()
            .vm("warm-vm", &[1, 0])
            .failing_refresh("provider 'vs8'"),
    );
    let error = poller
        .wait_until_clean(
            "warm-vm",
            PROVIDER,
            Duration::from_secs(60),
            Duration::from_secs(10),
        )
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(poller.inventory().checks(), 1);
}

#[tokio::test]
async fn fail_if_snapshots_reports_the_count() {
    let poller = poller(ScriptedInventory::new().vm("warm-vm", &[4]));
    let error = poller
        .fail_if_snapshots("warm-vm", PROVIDER)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Precondition);
    assert!(error.to_string().contains("has 4 pre-existing snapshot(s)"));
    match error {
        Error::Precondition {
            vm_name,
            snapshot_count,
        } => {
            assert_eq!(vm_name, "warm-vm");
            assert_eq!(snapshot_count, 4);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn fail_if_snapshots_passes_a_clean_vm() {
    let poller = poller(ScriptedInventory::new().vm("warm-vm", &[0]));
    let info = poller.fail_if_snapshots("warm-vm", PROVIDER).await.unwrap();
    assert_eq!(info.vm_id, "vm-warm-vm");
}

#[tokio::test]
async fn unknown_vm_is_not_found() {
    let poller = poller(ScriptedInventory::new());
    let error = poller
        .check_snapshots("missing", PROVIDER)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn check_many_keeps_each_result() {
    let poller = poller(
        ScriptedInventory::new()
            .vm("clean", &[0])
            .vm("dirty", &[2]),
    );
    let vms = ["clean", "missing", "dirty"];
    let results = poller.check_many(&vms[..], PROVIDER).await;

    let names: Vec<_> = results.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["clean", "missing", "dirty"]);
    assert_eq!(results[0].1.as_ref().unwrap().snapshot_count, 0);
    assert_eq!(
        results[1].1.as_ref().unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert!(results[2].1.as_ref().unwrap().has_snapshots());
}

#[tokio::test(start_paused = true)]
async fn refresh_inventory_waits_for_the_settle_delay() {
    let poller = poller(ScriptedInventory::new()).with_settle_delay(Duration::from_secs(2));
    let start = tokio::time::Instant::now();
    poller.refresh_inventory(PROVIDER).await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(2));
    assert_eq!(poller.inventory().events(), vec![refresh()]);
}

fn settings() -> HarnessSettings {
    HarnessSettings::from_vars(vec![(
        "WARM_TEST_VM".to_string(),
        "warm-vm".to_string(),
    )])
    .unwrap()
}

#[tokio::test]
async fn warm_guard_checks_before_and_after() {
    let poller = poller(ScriptedInventory::new().vm("warm-vm", &[2, 0]));
    let guard = WarmMigrationGuard::begin(&poller, &settings()).await;
    assert_eq!(guard.vm_name(), "warm-vm");
    assert_eq!(guard.initial().unwrap().snapshot_count, 2);

    let after = guard.finish().await.unwrap();
    assert!(!after.has_snapshots());
    assert_eq!(
        poller.inventory().events(),
        vec![check("warm-vm"), check("warm-vm")]
    );
}

#[tokio::test]
async fn warm_guard_does_not_fail_when_the_check_fails() {
    let poller = poller(ScriptedInventory::new());
    let guard = WarmMigrationGuard::begin(&poller, &settings()).await;
    assert!(guard.initial().is_none());
    assert!(guard.finish().await.is_none());
}
