use std::collections::BTreeMap;
use std::env;

use tracing::debug;

use corral_model::{OptionMap, keys};

use crate::{CredentialSource, LaunchError, LocalResource, ResourceShape, ServiceData};

/// Environment variable carrying the propagated process identity on
/// insecure deployments.
pub const PROPAGATED_USER_ENV: &str = "CORRAL_USER_NAME";

/// Mutable accumulator for one container's launch descriptor.
///
/// Multiple contributors (core launch logic first, then the provider) add
/// commands, environment variables, local resources and service data;
/// [`ContainerLauncher::complete`] consumes the builder and freezes
/// everything into a [`LaunchContext`]. Taking `self` by value makes
/// finalize-once a compile-time property: no contributor can touch the
/// builder after completion.
///
/// A launcher is owned by a single launch attempt and never shared across
/// containers.
#[derive(Debug, Default)]
pub struct ContainerLauncher {
    commands: Vec<String>,
    env: BTreeMap<String, String>,
    local_resources: BTreeMap<String, LocalResource>,
    service_data: ServiceData,
}

impl ContainerLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one command token. Ordering is the caller's responsibility.
    pub fn add_command(&mut self, token: impl Into<String>) {
        self.commands.push(token.into());
    }

    pub fn extend_commands<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands.extend(tokens.into_iter().map(Into::into));
    }

    /// Set one environment variable, last write wins.
    pub fn set_env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env.insert(key.into(), value.into());
    }

    /// Bulk environment merge, last write wins per key.
    pub fn add_env<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.env.insert(k.into(), v.into());
        }
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Attach a local resource; a later addition with the same name
    /// overwrites the earlier one.
    pub fn add_local_resource(&mut self, name: impl Into<String>, resource: LocalResource) {
        self.local_resources.insert(name.into(), resource);
    }

    pub fn add_local_resources(&mut self, resources: BTreeMap<String, LocalResource>) {
        self.local_resources.extend(resources);
    }

    pub fn local_resources(&self) -> &BTreeMap<String, LocalResource> {
        &self.local_resources
    }

    /// Attach an opaque service-data payload, passed through untouched.
    pub fn add_service_data(&mut self, key: impl Into<String>, payload: Vec<u8>) {
        self.service_data.insert(key, payload);
    }

    pub fn service_data_mut(&mut self) -> &mut ServiceData {
        &mut self.service_data
    }

    /// Propagate the process identity to the container on deployments
    /// without end-to-end authentication.
    ///
    /// Precondition: only valid when the deployment has no end-to-end
    /// authentication. The spawned work reads [`PROPAGATED_USER_ENV`] and
    /// acts under that identity; with real security in place the token blob
    /// carries identity instead.
    pub fn propagate_identity(&mut self) -> Result<(), LaunchError> {
        let user = env::var("USER")
            .or_else(|_| env::var("LOGNAME"))
            .map_err(|_| LaunchError::Identity("process user name is not available".into()))?;
        self.env.insert(PROPAGATED_USER_ENV.to_string(), user);
        Ok(())
    }

    /// Scan a role's options for `env.`-prefixed keys and inject the
    /// remainder as environment variables.
    ///
    /// Returns whether the option map was present at all, which is distinct
    /// from present-but-empty.
    pub fn copy_env_vars(&mut self, role_options: Option<&OptionMap>) -> bool {
        let Some(options) = role_options else {
            return false;
        };
        for (key, value) in options.iter() {
            if let Some(stripped) = key.strip_prefix(keys::ENV_PREFIX) {
                self.env.insert(stripped.to_string(), value.to_string());
            }
        }
        true
    }

    /// Deterministic finalization: join the command tokens, freeze the
    /// accumulated maps and serialize the credential set into the token
    /// blob. Consumes the builder.
    pub fn complete(
        self,
        credentials: &dyn CredentialSource,
    ) -> Result<LaunchContext, LaunchError> {
        let command_line = self.commands.join(" ");
        debug!(command = %command_line, resources = self.local_resources.len(),
               "completed launch context");

        let tokens = credentials.serialized_tokens()?;

        Ok(LaunchContext {
            command_line,
            env: self.env,
            local_resources: self.local_resources,
            service_data: self.service_data,
            tokens,
        })
    }
}

/// Override a resource shape's memory and virtual cores from option values
/// if and only if those options are present; absent options leave the prior
/// value untouched.
pub fn extract_resource_requirements(
    shape: &mut ResourceShape,
    options: &OptionMap,
) -> Result<(), LaunchError> {
    shape.memory_mb = options.get_u32(keys::YARN_MEMORY, shape.memory_mb)?;
    shape.virtual_cores = options.get_u32(keys::YARN_CORES, shape.virtual_cores)?;
    Ok(())
}

/// Immutable launch descriptor, produced exactly once per launch attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct LaunchContext {
    command_line: String,
    env: BTreeMap<String, String>,
    local_resources: BTreeMap<String, LocalResource>,
    service_data: ServiceData,
    tokens: Vec<u8>,
}

impl LaunchContext {
    /// The command tokens joined with single spaces.
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn local_resources(&self) -> &BTreeMap<String, LocalResource> {
        &self.local_resources
    }

    pub fn service_data(&self) -> &ServiceData {
        &self.service_data
    }

    /// Serialized security-credential token blob.
    pub fn tokens(&self) -> &[u8] {
        &self.tokens
    }
}
