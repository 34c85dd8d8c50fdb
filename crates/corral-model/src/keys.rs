//! Well-known option keys.
//!
//! Role-level keys may appear in any role's option map; global keys live in
//! the cluster specification's top-level options. Lookups fall back
//! role -> global -> supplied default.

/// Memory requirement of a role's containers, in megabytes.
pub const YARN_MEMORY: &str = "yarn.memory";

/// Virtual core requirement of a role's containers.
pub const YARN_CORES: &str = "yarn.vcores";

/// JVM heap size passed to the launched process.
pub const JVM_HEAP: &str = "jvm.heapsize";

/// Port of the role's informational web UI.
pub const APP_INFOPORT: &str = "app.infoport";

/// Name of the role an option map belongs to.
pub const ROLE_NAME: &str = "role.name";

/// Reserved marker: role options starting with this prefix are injected
/// into the container environment with the prefix stripped.
pub const ENV_PREFIX: &str = "env.";

// Global options.

/// Filesystem path holding the application's persistent data.
pub const DATA_PATH: &str = "data.path";

/// Coordination service quorum (comma-separated hosts).
pub const ZK_HOSTS: &str = "zk.hosts";

/// Coordination service client port.
pub const ZK_PORT: &str = "zk.port";

/// Coordination service path reserved for this cluster.
pub const ZK_PATH: &str = "zk.path";

/// Optional path to the application image/archive to stage into containers.
pub const IMAGE_PATH: &str = "image.path";

/// Local install path of the application, used when no image is staged.
pub const APPLICATION_HOME: &str = "application.home";
