use std::path::Path;

use thiserror::Error;
use tracing::debug;

use corral_launch::{ContainerLauncher, LaunchError, ResourceShape, ServiceData, StagingFs};
use corral_model::{ClusterSpec, OptionMap, RoleSpec};

/// Stable prefix of the error raised for a role name a provider does not
/// understand. Clients match on this prefix.
pub const ERROR_UNKNOWN_ROLE: &str = "unknown role ";

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The role name is outside this provider's declared role set.
    #[error("unknown role {0}")]
    UnknownRole(String),

    /// Derived configuration cannot be generated from the specification.
    #[error("bad configuration: {0}")]
    BadConfig(String),

    /// Staging a configuration directory or image failed.
    #[error("staging failed: {0}")]
    Staging(std::io::Error),

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

impl From<corral_model::ModelError> for ProviderError {
    fn from(e: corral_model::ModelError) -> Self {
        match e {
            corral_model::ModelError::BadConfig(msg) => ProviderError::BadConfig(msg),
            corral_model::ModelError::BadArgument(msg) => {
                ProviderError::Launch(LaunchError::BadArgument(msg))
            }
        }
    }
}

/// Application-type strategy plugged into the orchestration engine.
///
/// Everything specific to one application type lives behind this trait:
/// the role set, per-role defaults, control-container sizing, opaque
/// service data and the container launch recipe. The engine holds a single
/// `&dyn Provider` and never inspects the concrete type.
pub trait Provider: Send + Sync {
    /// Short application-type name, for logging and status output.
    fn name(&self) -> &str;

    /// The fixed, ordered role set this provider understands. Used to
    /// validate flex requests and seed default role definitions.
    fn roles(&self) -> &[&str];

    /// Default option map for a named role.
    ///
    /// Unknown names fail deterministically with a message carrying the
    /// [`ERROR_UNKNOWN_ROLE`] prefix and the offending name.
    fn default_role_options(&self, role: &str) -> Result<OptionMap, ProviderError>;

    /// Adjust the orchestrator's own control-container resource shape from
    /// specification options. Fields not explicitly overridden must keep
    /// their prior values.
    fn prepare_control_resources(
        &self,
        spec: &ClusterSpec,
        shape: &mut ResourceShape,
    ) -> Result<(), ProviderError>;

    /// Inject opaque service-data payloads. The default is a no-op.
    fn prepare_service_data(
        &self,
        _spec: &ClusterSpec,
        _data: &mut ServiceData,
    ) -> Result<(), ProviderError> {
        Ok(())
    }

    /// Populate a launcher for one container of `role`: environment from
    /// role options, staged configuration directory, optionally the
    /// application image, and the command tokens.
    ///
    /// Must tolerate an absent image path (install-from-local-path mode)
    /// and an absent generated configuration directory.
    fn build_launch_context(
        &self,
        launcher: &mut ContainerLauncher,
        fs: &dyn StagingFs,
        generated_conf_dir: Option<&Path>,
        role: &str,
        spec: &ClusterSpec,
        role_options: &OptionMap,
    ) -> Result<(), ProviderError>;
}

/// Seed a specification with the provider's role set: roles the user did
/// not define are created with desired count 0, and defined roles have
/// missing options filled in from the provider defaults (user values win).
pub fn seed_roles(provider: &dyn Provider, spec: &mut ClusterSpec) -> Result<(), ProviderError> {
    for role in provider.roles() {
        let defaults = provider.default_role_options(role)?;
        match spec.roles.get_mut(*role) {
            Some(existing) => {
                let mut merged = defaults;
                merged.extend(&existing.options);
                existing.options = merged;
            }
            None => {
                debug!(role, provider = provider.name(), "seeding default role");
                spec.add_role(*role, RoleSpec::with_options(0, defaults));
            }
        }
    }
    Ok(())
}
