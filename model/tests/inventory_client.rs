use model::clients::{HttpStatusCode, InventoryClient, StatusCode};
use model::SnapshotInfo;

const VMS: &str = "/providers/vsphere/uid-1/vms";

const BODY: &str = r#"[
    {"id": "vm-101", "name": "mtv-rhel8-warm-2disks2nics", "powerState": "poweredOn",
     "snapshots": [{"id": "snapshot-1"}, {"id": "snapshot-2"}]},
    {"id": "vm-102", "name": "mtv-rhel8-sanity", "snapshots": []},
    {"id": "vm-103", "name": "mtv-win2019"}
]"#;

async fn server_with_vms() -> (mockito::ServerGuard, mockito::Mock) {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", VMS)
        .match_header("authorization", "Bearer sha256~token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(BODY)
        .create_async()
        .await;
    (server, mock)
}

#[tokio::test]
async fn snapshot_counts_from_vm_records() {
    let (server, mock) = server_with_vms().await;
    let client = InventoryClient::new(server.url(), "sha256~token").unwrap();

    let vms = client.vsphere_vms("uid-1").await.unwrap();
    let infos: Vec<SnapshotInfo> = vms.into_iter().map(SnapshotInfo::from).collect();
    assert_eq!(
        infos,
        vec![
            SnapshotInfo::new("mtv-rhel8-warm-2disks2nics", "vm-101", 2),
            SnapshotInfo::new("mtv-rhel8-sanity", "vm-102", 0),
            SnapshotInfo::new("mtv-win2019", "vm-103", 0),
        ]
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn find_vm_by_name() {
    let (server, _mock) = server_with_vms().await;
    let client = InventoryClient::new(format!("{}/", server.url()), "sha256~token").unwrap();

    let vm = client
        .find_vm("uid-1", "mtv-rhel8-warm-2disks2nics")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(vm.id, "vm-101");
    assert_eq!(vm.snapshot_count(), 2);

    assert!(client.find_vm("uid-1", "absent").await.unwrap().is_none());
}

#[tokio::test]
async fn error_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", VMS)
        .with_status(500)
        .create_async()
        .await;
    let client = InventoryClient::new(server.url(), "sha256~token").unwrap();
    let error = client.vsphere_vms("uid-1").await.unwrap_err();
    assert!(error.is_status_code(StatusCode::INTERNAL_SERVER_ERROR));
}
