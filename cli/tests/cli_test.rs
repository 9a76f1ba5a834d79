use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

fn mtv_testsys(state_file: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mtv-testsys").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("BRIDGE_BASE_ADDRESS")
        .env_remove("BASE_ADDRESS")
        .env_remove("CLUSTER_TOKEN")
        .arg("--state-file")
        .arg(state_file);
    cmd
}

fn stdout(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn track_then_list() {
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("resources.json");

    mtv_testsys(&state_file)
        .args(&["track", "--type", "plans", "--name", "plan-1", "--namespace", "mtv-tests"])
        .assert()
        .success();
    mtv_testsys(&state_file)
        .args(&["track", "--type", "projects", "--name", "mtv-tests"])
        .assert()
        .success();

    let listed = stdout(mtv_testsys(&state_file).arg("list"));
    assert!(listed.contains(
        "/api/kubernetes/apis/forklift.konveyor.io/v1beta1/namespaces/mtv-tests/plans/plan-1"
    ));
    assert!(listed.contains("/api/kubernetes/apis/project.openshift.io/v1/projects/mtv-tests"));

    let json = stdout(mtv_testsys(&state_file).args(&["list", "--json"]));
    let resources: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(resources.as_array().unwrap().len(), 2);
    assert_eq!(resources[0]["resourceName"], "plan-1");
    assert_eq!(resources[1]["apiVersion"], "project.openshift.io/v1");
}

#[test]
fn cleanup_with_nothing_tracked() {
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("resources.json");
    let json = stdout(mtv_testsys(&state_file).args(&["cleanup", "--json"]));
    let summary: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(summary, serde_json::json!({"succeeded": 0, "failed": 0}));
    assert!(!state_file.exists());
}

#[test]
fn cleanup_tolerates_failures_and_empties_the_state_file() {
    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("resources.json");
    let storage_state = dir.path().join("user.json");
    std::fs::write(
        &storage_state,
        r#"{"cookies":[{"name":"openshift-session-token","value":"abc"},{"name":"csrf-token","value":"xyz"}]}"#,
    )
    .unwrap();

    let plans = "/api/kubernetes/apis/forklift.konveyor.io/v1beta1/namespaces/mtv-tests/plans";
    let mut server = mockito::Server::new();
    let ok = server
        .mock("DELETE", format!("{}/ok", plans).as_str())
        .match_header("x-csrftoken", "xyz")
        .with_status(200)
        .create();
    let absent = server
        .mock("DELETE", format!("{}/absent", plans).as_str())
        .with_status(404)
        .create();
    let broken = server
        .mock("DELETE", format!("{}/broken", plans).as_str())
        .with_status(500)
        .create();

    for name in ["ok", "absent", "broken"] {
        mtv_testsys(&state_file)
            .args(&["track", "--type", "plans", "--namespace", "mtv-tests", "--name", name])
            .assert()
            .success();
    }

    let url = server.url();
    let json = stdout(mtv_testsys(&state_file).args(&[
        "cleanup",
        "--json",
        "--console-url",
        url.as_str(),
        "--storage-state",
        storage_state.to_str().unwrap(),
    ]));
    let summary: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(summary, serde_json::json!({"succeeded": 2, "failed": 1}));
    ok.assert();
    absent.assert();
    broken.assert();

    let listed = stdout(mtv_testsys(&state_file).args(&["list", "--json"]));
    assert_eq!(listed.trim(), "[]");
}

#[test]
fn provider_table() {
    let dir = TempDir::new().unwrap();
    let providers = dir.path().join("providers.json");
    std::fs::write(
        &providers,
        r#"{
            "vsphere-8": {"type": "vsphere", "hostname": "vcenter.example.com", "username": "admin", "password": "secret"},
            "ova": {"type": "ova", "hostname": "nfs.example.com:/ova", "username": ""}
        }"#,
    )
    .unwrap();
    let state_file = dir.path().join("resources.json");

    let keys = stdout(mtv_testsys(&state_file).args(&[
        "provider",
        "--file",
        providers.to_str().unwrap(),
    ]));
    assert_eq!(keys, "ova\nvsphere-8\n");

    let shown = stdout(mtv_testsys(&state_file).args(&[
        "provider",
        "--file",
        providers.to_str().unwrap(),
        "vsphere-8",
    ]));
    assert!(shown.contains("vcenter.example.com"));
    assert!(!shown.contains("secret"));

    mtv_testsys(&state_file)
        .args(&["provider", "--file", providers.to_str().unwrap(), "missing"])
        .assert()
        .failure();
}
