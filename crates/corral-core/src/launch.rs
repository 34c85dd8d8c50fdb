use std::path::Path;

use tracing::{debug, instrument};

use corral_launch::{ContainerLauncher, CredentialSource, LaunchContext, StagingFs};
use corral_model::ClusterSpec;

use crate::{CoreError, Provider};

/// Build one container's finalized launch descriptor for `role`.
///
/// This is the path the reconciliation loop takes per instance to create:
/// core contributions first (role environment overrides, optional identity
/// propagation), then the provider's launch recipe, then finalization. The
/// resulting descriptor plus a resource shape go to the resource-manager
/// collaborator; a failure aborts this attempt only.
#[instrument(level = "debug", skip_all, fields(role = %role, provider = provider.name()))]
pub fn prepare_container_launch(
    provider: &dyn Provider,
    fs: &dyn StagingFs,
    credentials: &dyn CredentialSource,
    generated_conf_dir: Option<&Path>,
    role: &str,
    spec: &ClusterSpec,
    propagate_identity: bool,
) -> Result<LaunchContext, CoreError> {
    let Some(role_spec) = spec.role(role) else {
        return Err(CoreError::BadArgument(format!("unknown role {role}")));
    };

    let mut launcher = ContainerLauncher::new();
    launcher.copy_env_vars(Some(&role_spec.options));
    if propagate_identity {
        launcher.propagate_identity()?;
    }

    provider.build_launch_context(
        &mut launcher,
        fs,
        generated_conf_dir,
        role,
        spec,
        &role_spec.options,
    )?;

    debug!(role, "finalizing launch context");
    Ok(launcher.complete(credentials)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io;

    use corral_launch::{InsecureCredentials, LocalResource, ResourceShape};
    use corral_model::{OptionMap, RoleSpec};

    use crate::ProviderError;

    struct EchoProvider;

    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        fn roles(&self) -> &[&str] {
            &["worker"]
        }

        fn default_role_options(&self, role: &str) -> Result<OptionMap, ProviderError> {
            if role != "worker" {
                return Err(ProviderError::UnknownRole(role.to_string()));
            }
            Ok(OptionMap::new())
        }

        fn prepare_control_resources(
            &self,
            _spec: &ClusterSpec,
            _shape: &mut ResourceShape,
        ) -> Result<(), ProviderError> {
            Ok(())
        }

        fn build_launch_context(
            &self,
            launcher: &mut ContainerLauncher,
            _fs: &dyn StagingFs,
            _generated_conf_dir: Option<&Path>,
            role: &str,
            _spec: &ClusterSpec,
            _role_options: &OptionMap,
        ) -> Result<(), ProviderError> {
            launcher.add_command("bin/echo");
            launcher.add_command(role.to_string());
            Ok(())
        }
    }

    struct NoopFs;

    impl StagingFs for NoopFs {
        fn stage_directory(
            &self,
            _dir: &Path,
        ) -> io::Result<BTreeMap<String, LocalResource>> {
            Ok(BTreeMap::new())
        }

        fn stage_archive(&self, path: &Path) -> io::Result<LocalResource> {
            Ok(LocalResource::archive(path.display().to_string(), 0, 0))
        }
    }

    fn sample_spec() -> ClusterSpec {
        let mut spec = ClusterSpec::new("t");
        let mut worker = RoleSpec::new(1);
        worker.options.insert("env.FOO", "bar");
        spec.add_role("worker", worker);
        spec
    }

    #[test]
    fn launch_prep_runs_core_then_provider() {
        let ctx = prepare_container_launch(
            &EchoProvider,
            &NoopFs,
            &InsecureCredentials,
            None,
            "worker",
            &sample_spec(),
            false,
        )
        .unwrap();

        assert_eq!(ctx.command_line(), "bin/echo worker");
        assert_eq!(ctx.env().get("FOO").map(String::as_str), Some("bar"));
    }

    #[test]
    fn launch_prep_unknown_role_is_bad_argument() {
        let err = prepare_container_launch(
            &EchoProvider,
            &NoopFs,
            &InsecureCredentials,
            None,
            "ghost",
            &sample_spec(),
            false,
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::BadArgument(_)));
    }
}
