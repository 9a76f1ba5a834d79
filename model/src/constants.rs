/// Helper macro to avoid retyping the Forklift API group when creating further string constants
/// from it. When given no parameters, this returns the group. When given a string literal parameter
/// it adds `/parameter` to the end.
macro_rules! forklift {
    () => {
        "forklift.konveyor.io"
    };
    ($s:literal) => {
        concat!(forklift!(), "/", $s)
    };
}

// API versions
pub const FORKLIFT_GROUP: &str = forklift!();
pub const FORKLIFT_VERSION: &str = "v1beta1";
pub const FORKLIFT_API_VERSION: &str = forklift!("v1beta1");
pub const PROJECT_API_VERSION: &str = "project.openshift.io/v1";
pub const ROUTE_GROUP: &str = "route.openshift.io";
pub const ROUTE_VERSION: &str = "v1";

// Resource types
pub const PROJECTS: &str = "projects";
pub const PROVIDERS: &str = "providers";
pub const PLANS: &str = "plans";
pub const NETWORK_MAPS: &str = "networkmaps";
pub const STORAGE_MAPS: &str = "storagemaps";

// Cluster objects
pub const DEFAULT_NAMESPACE: &str = "openshift-mtv";
pub const INVENTORY_ROUTE: &str = "forklift-inventory";
pub const ANNOTATION_REFRESHED_AT: &str = forklift!("refreshed-at");

// Console proxy
pub const CONSOLE_K8S_PREFIX: &str = "/api/kubernetes/apis";
pub const CONSOLE_VERSION_PATH: &str = "/api/kubernetes/version";
pub const CSRF_COOKIE: &str = "csrf-token";
pub const CSRF_HEADER: &str = "X-CSRFToken";

// Harness defaults
pub const DEFAULT_CONSOLE_URL: &str = "http://localhost:9000";
pub const DEFAULT_PROVIDER_NAME: &str = "vs8";
pub const DEFAULT_WARM_TEST_VM: &str = "mtv-rhel8-warm-2disks2nics";

// Paths
pub const RESOURCES_FILE: &str = "playwright/.resources.json";
pub const PROVIDERS_FILE: &str = ".providers.json";
pub const AUTH_STATE_FILE: &str = "playwright/.auth/user.json";

// Timing, in milliseconds
pub const INVENTORY_SETTLE_MS: u64 = 5_000;
pub const WAIT_CLEAN_TIMEOUT_MS: u64 = 120_000;
pub const WAIT_CLEAN_INTERVAL_MS: u64 = 10_000;

#[test]
fn forklift_constants_macro_test() {
    assert_eq!("forklift.konveyor.io", forklift!());
    assert_eq!("forklift.konveyor.io/v1beta1", FORKLIFT_API_VERSION);
    assert_eq!("forklift.konveyor.io/refreshed-at", ANNOTATION_REFRESHED_AT);
}
