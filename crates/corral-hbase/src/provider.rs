use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use corral_core::{Provider, ProviderError};
use corral_launch::{ContainerLauncher, ResourceShape, StagingFs, extract_resource_requirements};
use corral_model::{ClusterSpec, OptionMap, keys as model_keys};

use crate::keys;

const ROLES: &[&str] = &[keys::ROLE_WORKER, keys::ROLE_MASTER];

/// Provider for an HBase-like application: a master role plus a worker
/// (region server) role.
#[derive(Clone, Copy, Debug, Default)]
pub struct HBaseProvider;

impl HBaseProvider {
    pub fn new() -> Self {
        Self
    }

    /// Flat key -> value map for the generated site configuration file,
    /// derived from the two mandatory roles and the cluster globals. The
    /// caller merges this over a template configuration before writing it
    /// out.
    pub fn build_site_conf(
        &self,
        spec: &ClusterSpec,
    ) -> Result<BTreeMap<String, String>, ProviderError> {
        let master = spec.mandatory_role_options(keys::ROLE_MASTER)?;
        let worker = spec.mandatory_role_options(keys::ROLE_WORKER)?;

        let mut site = BTreeMap::new();
        site.insert(keys::KEY_CLUSTER_DISTRIBUTED.to_string(), "true".to_string());
        site.insert(keys::KEY_MASTER_PORT.to_string(), "0".to_string());
        site.insert(
            keys::KEY_MASTER_INFO_PORT.to_string(),
            master
                .get_or(model_keys::APP_INFOPORT, keys::DEFAULT_MASTER_INFOPORT)
                .to_string(),
        );
        site.insert(
            keys::KEY_ROOTDIR.to_string(),
            spec.options.get_or(model_keys::DATA_PATH, "").to_string(),
        );
        site.insert(
            keys::KEY_REGIONSERVER_INFO_PORT.to_string(),
            worker
                .get_or(model_keys::APP_INFOPORT, keys::DEFAULT_WORKER_INFOPORT)
                .to_string(),
        );
        site.insert(keys::KEY_REGIONSERVER_PORT.to_string(), "0".to_string());
        site.insert(
            keys::KEY_ZNODE_PARENT.to_string(),
            spec.options.get_or(model_keys::ZK_PATH, "/hbase").to_string(),
        );
        site.insert(
            keys::KEY_ZOOKEEPER_PORT.to_string(),
            spec.options.get_or(model_keys::ZK_PORT, "2181").to_string(),
        );
        site.insert(
            keys::KEY_ZOOKEEPER_QUORUM.to_string(),
            spec.options.get_or(model_keys::ZK_HOSTS, "localhost").to_string(),
        );
        Ok(site)
    }

    /// Path of the launch script: relative to the expanded image when one
    /// is staged, otherwise under the local application home.
    pub fn bin_path(&self, spec: &ClusterSpec) -> PathBuf {
        let app_dir = if spec.image_path().is_some() {
            PathBuf::from(keys::ARCHIVE_SUBDIR)
        } else {
            PathBuf::from(spec.application_home().unwrap_or("."))
        };
        app_dir.join(keys::HBASE_SCRIPT)
    }

    fn role_command(role: &str) -> Result<&'static str, ProviderError> {
        match role {
            keys::ROLE_MASTER => Ok(keys::MASTER_COMMAND),
            keys::ROLE_WORKER => Ok(keys::REGION_SERVER_COMMAND),
            other => Err(ProviderError::UnknownRole(other.to_string())),
        }
    }
}

impl Provider for HBaseProvider {
    fn name(&self) -> &str {
        "hbase"
    }

    fn roles(&self) -> &[&str] {
        ROLES
    }

    fn default_role_options(&self, role: &str) -> Result<OptionMap, ProviderError> {
        let (heap, infoport) = match role {
            keys::ROLE_WORKER => (keys::DEFAULT_WORKER_HEAP, keys::DEFAULT_WORKER_INFOPORT),
            keys::ROLE_MASTER => (keys::DEFAULT_MASTER_HEAP, keys::DEFAULT_MASTER_INFOPORT),
            other => return Err(ProviderError::UnknownRole(other.to_string())),
        };

        let mut options = OptionMap::new();
        options.insert(model_keys::ROLE_NAME, role);
        options.insert(model_keys::JVM_HEAP, heap);
        options.insert(model_keys::APP_INFOPORT, infoport);
        Ok(options)
    }

    fn prepare_control_resources(
        &self,
        spec: &ClusterSpec,
        shape: &mut ResourceShape,
    ) -> Result<(), ProviderError> {
        // Memory may be raised from the master role's options; cores are
        // pinned for the control container.
        if let Some(master) = spec.role_options(keys::ROLE_MASTER) {
            extract_resource_requirements(shape, master)?;
        }
        shape.virtual_cores = 1;
        Ok(())
    }

    fn build_launch_context(
        &self,
        launcher: &mut ContainerLauncher,
        fs: &dyn StagingFs,
        generated_conf_dir: Option<&Path>,
        role: &str,
        spec: &ClusterSpec,
        role_options: &OptionMap,
    ) -> Result<(), ProviderError> {
        let role_command = Self::role_command(role)?;

        launcher.copy_env_vars(Some(role_options));
        launcher.set_env(keys::HBASE_LOG_DIR_ENV, keys::LOG_DIR_EXPANSION);

        if let Some(conf_dir) = generated_conf_dir {
            let staged = fs
                .stage_directory(conf_dir)
                .map_err(ProviderError::Staging)?;
            debug!(files = staged.len(), "staged generated configuration");
            for (name, resource) in staged {
                launcher
                    .add_local_resource(format!("{}/{name}", keys::PROPAGATED_CONF_DIR), resource);
            }
        }

        if let Some(image) = spec.image_path() {
            info!(image, "staging application image");
            let resource = fs
                .stage_archive(Path::new(image))
                .map_err(ProviderError::Staging)?;
            launcher.add_local_resource(keys::IMAGE_RESOURCE, resource);
        }

        // The script path must stay relative when launching from an image.
        launcher.add_command(self.bin_path(spec).display().to_string());
        launcher.add_command(keys::ARG_CONFIG);
        launcher.add_command(keys::PROPAGATED_CONF_DIR);
        launcher.add_command(role_command);
        launcher.add_command(keys::ACTION_START);
        launcher.add_command(format!("1>{}/out.txt", keys::LOG_DIR_EXPANSION));
        launcher.add_command(format!("2>{}/err.txt", keys::LOG_DIR_EXPANSION));

        Ok(())
    }
}
