//! HBase-specific constants: role names, defaults and the keys of the
//! generated site configuration.

pub const ROLE_WORKER: &str = "worker";
pub const ROLE_MASTER: &str = "master";

pub const DEFAULT_MASTER_HEAP: &str = "256M";
pub const DEFAULT_MASTER_INFOPORT: &str = "16010";
pub const DEFAULT_WORKER_HEAP: &str = "256M";
pub const DEFAULT_WORKER_INFOPORT: &str = "16030";

// Keys of the generated site configuration file.
pub const KEY_CLUSTER_DISTRIBUTED: &str = "hbase.cluster.distributed";
pub const KEY_MASTER_PORT: &str = "hbase.master.port";
pub const KEY_MASTER_INFO_PORT: &str = "hbase.master.info.port";
pub const KEY_ROOTDIR: &str = "hbase.rootdir";
pub const KEY_REGIONSERVER_PORT: &str = "hbase.regionserver.port";
pub const KEY_REGIONSERVER_INFO_PORT: &str = "hbase.regionserver.info.port";
pub const KEY_ZNODE_PARENT: &str = "zookeeper.znode.parent";
pub const KEY_ZOOKEEPER_PORT: &str = "hbase.zookeeper.property.clientPort";
pub const KEY_ZOOKEEPER_QUORUM: &str = "hbase.zookeeper.quorum";

/// Launch script, relative to the application directory.
pub const HBASE_SCRIPT: &str = "bin/hbase";

/// Directory an image archive expands into on localization.
pub const ARCHIVE_SUBDIR: &str = "hbase";

/// Name under which the generated configuration directory is propagated
/// into containers.
pub const PROPAGATED_CONF_DIR: &str = "propagatedconf";

/// Resource name the application image is staged under.
pub const IMAGE_RESOURCE: &str = "hbase.tar";

pub const ARG_CONFIG: &str = "--config";
pub const MASTER_COMMAND: &str = "master";
pub const REGION_SERVER_COMMAND: &str = "regionserver";
pub const ACTION_START: &str = "start";

/// Log directory expansion variable, substituted by the resource manager
/// at container start.
pub const LOG_DIR_EXPANSION: &str = "<LOG_DIR>";

/// Environment variable pointing the launched process at its log directory.
pub const HBASE_LOG_DIR_ENV: &str = "HBASE_LOG_DIR";
