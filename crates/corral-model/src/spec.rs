use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{InstanceCount, ModelError, OptionMap, RoleName, RoleSpec, keys};

/// Stable prefix of the error raised when a mandatory role is absent.
pub const ERROR_MISSING_MANDATORY_ROLE: &str = "missing mandatory role ";

/// The declarative cluster specification: the full set of roles plus the
/// cluster-wide option map.
///
/// Owned exclusively by the orchestrator; clients only ever see read-only
/// snapshots and mutate it through validated flex deltas.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Cluster name.
    pub name: String,
    /// Roles keyed by name.
    #[serde(default)]
    pub roles: BTreeMap<RoleName, RoleSpec>,
    /// Cluster-wide options: data paths, coordination endpoint, image path.
    #[serde(default, skip_serializing_if = "OptionMap::is_empty")]
    pub options: OptionMap,
}

impl ClusterSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: BTreeMap::new(),
            options: OptionMap::new(),
        }
    }

    pub fn add_role(&mut self, name: impl Into<RoleName>, role: RoleSpec) {
        self.roles.insert(name.into(), role);
    }

    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key, value);
    }

    pub fn role(&self, name: &str) -> Option<&RoleSpec> {
        self.roles.get(name)
    }

    pub fn role_options(&self, name: &str) -> Option<&OptionMap> {
        self.roles.get(name).map(|r| &r.options)
    }

    /// Role option map that must exist for configuration generation.
    pub fn mandatory_role_options(&self, name: &str) -> Result<&OptionMap, ModelError> {
        self.role_options(name)
            .ok_or_else(|| ModelError::BadConfig(format!("{ERROR_MISSING_MANDATORY_ROLE}{name}")))
    }

    /// Layered option lookup: role-level, then global, then `default`.
    pub fn role_opt<'a>(&'a self, role: &str, key: &str, default: &'a str) -> &'a str {
        if let Some(options) = self.role_options(role)
            && let Some(v) = options.get(key)
        {
            return v;
        }
        self.options.get_or(key, default)
    }

    /// Layered numeric lookup with the same fallback chain as [`Self::role_opt`].
    pub fn role_opt_u32(&self, role: &str, key: &str, default: u32) -> Result<u32, ModelError> {
        if let Some(options) = self.role_options(role)
            && options.contains(key)
        {
            return options.get_u32(key, default);
        }
        self.options.get_u32(key, default)
    }

    /// Current desired counts per role.
    pub fn desired_counts(&self) -> BTreeMap<RoleName, InstanceCount> {
        self.roles
            .iter()
            .map(|(name, role)| (name.clone(), role.desired))
            .collect()
    }

    /// Optional path to the application image archive.
    pub fn image_path(&self) -> Option<&str> {
        self.options.get(keys::IMAGE_PATH)
    }

    /// Local application install path (used when no image is staged).
    pub fn application_home(&self) -> Option<&str> {
        self.options.get(keys::APPLICATION_HOME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spec() -> ClusterSpec {
        let mut spec = ClusterSpec::new("test");
        let mut worker = RoleSpec::new(3);
        worker.options.insert(keys::YARN_MEMORY, "512");
        spec.add_role("worker", worker);
        spec.add_role("master", RoleSpec::new(1));
        spec.set_option(keys::YARN_MEMORY, "256");
        spec.set_option(keys::ZK_HOSTS, "zk1,zk2");
        spec
    }

    #[test]
    fn role_opt_prefers_role_level() {
        let spec = sample_spec();
        assert_eq!(spec.role_opt("worker", keys::YARN_MEMORY, "128"), "512");
    }

    #[test]
    fn role_opt_falls_back_to_global() {
        let spec = sample_spec();
        assert_eq!(spec.role_opt("master", keys::YARN_MEMORY, "128"), "256");
    }

    #[test]
    fn role_opt_falls_back_to_default() {
        let spec = sample_spec();
        assert_eq!(spec.role_opt("master", keys::APP_INFOPORT, "8080"), "8080");
    }

    #[test]
    fn role_opt_unknown_role_uses_global_chain() {
        let spec = sample_spec();
        assert_eq!(spec.role_opt("ghost", keys::YARN_MEMORY, "128"), "256");
    }

    #[test]
    fn mandatory_role_error_has_stable_prefix() {
        let spec = sample_spec();
        let err = spec.mandatory_role_options("ghost").unwrap_err();
        assert!(
            err.to_string()
                .contains(&format!("{ERROR_MISSING_MANDATORY_ROLE}ghost"))
        );
    }

    #[test]
    fn desired_counts_reflect_roles() {
        let spec = sample_spec();
        let counts = spec.desired_counts();
        assert_eq!(counts.get("worker"), Some(&3));
        assert_eq!(counts.get("master"), Some(&1));
    }

    #[test]
    fn image_path_absent_is_none() {
        let spec = sample_spec();
        assert!(spec.image_path().is_none());
    }
}
