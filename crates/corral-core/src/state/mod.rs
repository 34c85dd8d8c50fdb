use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use tracing::{debug, info, instrument, warn};

use corral_model::{
    ClusterSpec, ClusterStatus, FlexDelta, NodeInfo, NodeState, Phase, RoleName,
};

use crate::CoreError;

/// Authoritative desired/live cluster state.
///
/// Cloning shares the underlying state. All reads take a single lock
/// acquisition and return owned values, so protocol calls observe one
/// consistent snapshot instead of re-reading mutable structures
/// field-by-field. The single write lock serializes flex application
/// against the reconciliation loop's own mutations.
#[derive(Clone)]
pub struct ClusterState {
    inner: Arc<RwLock<ClusterStateInner>>,
}

struct ClusterStateInner {
    spec: ClusterSpec,
    phase: Phase,
    /// Tracked instances by id.
    nodes: HashMap<String, NodeInfo>,
    /// Index: role -> ids of tracked instances in that role.
    by_role: HashMap<RoleName, Vec<String>>,
}

impl ClusterState {
    pub fn new(spec: ClusterSpec) -> Self {
        let by_role = spec
            .roles
            .keys()
            .map(|role| (role.clone(), Vec::new()))
            .collect();
        Self {
            inner: Arc::new(RwLock::new(ClusterStateInner {
                spec,
                phase: Phase::Running,
                nodes: HashMap::new(),
                by_role,
            })),
        }
    }

    /// Apply a flex delta: replace the desired count of every role the
    /// delta names.
    ///
    /// Validation is all-or-nothing: every role name is checked against the
    /// specification before any count changes, so an unknown role leaves
    /// the model untouched. Returns as soon as the desired state is
    /// recorded; reconciliation is asynchronous.
    #[instrument(level = "debug", skip(self, delta))]
    pub fn apply_flex(&self, delta: &FlexDelta) -> Result<(), CoreError> {
        let mut inner = self.inner.write().unwrap();

        if inner.phase != Phase::Running {
            warn!("rejecting flex: cluster is stopping");
            return Err(CoreError::ClusterStopping);
        }

        for role in delta.roles() {
            if !inner.spec.roles.contains_key(role) {
                return Err(CoreError::BadArgument(format!("unknown role {role}")));
            }
        }

        for (role, count) in delta.iter() {
            if let Some(role_spec) = inner.spec.roles.get_mut(role)
                && role_spec.desired != count
            {
                info!(role, from = role_spec.desired, to = count, "flexing role");
                role_spec.desired = count;
            }
        }
        Ok(())
    }

    /// Begin orderly shutdown. Idempotent while already stopping or stopped.
    pub fn stop(&self) {
        let mut inner = self.inner.write().unwrap();
        if inner.phase == Phase::Running {
            info!("cluster entering stopping phase");
            inner.phase = Phase::Stopping;
        }
    }

    /// Record that shutdown has finished.
    pub fn mark_stopped(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.phase = Phase::Stopped;
    }

    pub fn phase(&self) -> Phase {
        self.inner.read().unwrap().phase
    }

    // Node registry, driven by the reconciliation loop.

    /// Track a new instance. The instance's role must exist in the
    /// specification and the id must not already be tracked.
    pub fn register_node(&self, node: NodeInfo) -> Result<(), CoreError> {
        let mut inner = self.inner.write().unwrap();
        if !inner.spec.roles.contains_key(&node.role) {
            return Err(CoreError::BadArgument(format!(
                "unknown role {}",
                node.role
            )));
        }
        if inner.nodes.contains_key(&node.id) {
            return Err(CoreError::BadArgument(format!(
                "node {} is already tracked",
                node.id
            )));
        }
        debug!(id = %node.id, role = %node.role, "registering node");
        let (id, role) = (node.id.clone(), node.role.clone());
        inner.nodes.insert(id.clone(), node);
        inner.by_role.entry(role).or_default().push(id);
        Ok(())
    }

    pub fn update_node_state(&self, id: &str, state: NodeState) -> Result<(), CoreError> {
        let mut inner = self.inner.write().unwrap();
        let node = inner
            .nodes
            .get_mut(id)
            .ok_or_else(|| CoreError::UnknownNode(id.to_string()))?;
        node.state = state;
        Ok(())
    }

    /// Stop tracking an instance (released or lost containers).
    pub fn remove_node(&self, id: &str) {
        let mut inner = self.inner.write().unwrap();
        if let Some(node) = inner.nodes.remove(id)
            && let Some(ids) = inner.by_role.get_mut(&node.role)
        {
            ids.retain(|tracked| tracked != id);
        }
    }

    // Reads. Each takes the read lock once.

    /// Identifiers of the instances currently assigned to a role.
    ///
    /// Zero instances is an empty sequence, not an error; an unrecognized
    /// role name is an error. This asymmetry with [`Self::get_cluster_nodes`]
    /// is intentional and client-visible.
    pub fn list_node_ids_by_role(&self, role: &str) -> Result<Vec<String>, CoreError> {
        let inner = self.inner.read().unwrap();
        if !inner.spec.roles.contains_key(role) {
            return Err(CoreError::BadArgument(format!("unknown role {role}")));
        }
        Ok(inner.by_role.get(role).cloned().unwrap_or_default())
    }

    /// Detail for one tracked instance.
    pub fn get_node(&self, id: &str) -> Result<NodeInfo, CoreError> {
        let inner = self.inner.read().unwrap();
        inner
            .nodes
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::UnknownNode(id.to_string()))
    }

    /// Details for exactly the requested identifiers that are tracked.
    ///
    /// Unknown identifiers are silently omitted; partial results are valid.
    pub fn get_cluster_nodes<I, S>(&self, ids: I) -> Vec<NodeInfo>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let inner = self.inner.read().unwrap();
        ids.into_iter()
            .filter_map(|id| inner.nodes.get(id.as_ref()).cloned())
            .collect()
    }

    /// One consistent point-in-time snapshot of the whole cluster.
    pub fn status(&self) -> ClusterStatus {
        let inner = self.inner.read().unwrap();
        let live = inner
            .by_role
            .iter()
            .map(|(role, ids)| (role.clone(), ids.clone()))
            .collect();
        ClusterStatus {
            spec: inner.spec.clone(),
            live,
            phase: inner.phase,
        }
    }

    /// Per-role difference between desired and tracked instance counts,
    /// for the reconciliation loop: positive means instances to create,
    /// negative means instances to release.
    pub fn pending_by_role(&self) -> BTreeMap<RoleName, i64> {
        let inner = self.inner.read().unwrap();
        inner
            .spec
            .roles
            .iter()
            .map(|(role, role_spec)| {
                let tracked = inner.by_role.get(role).map_or(0, Vec::len) as i64;
                (role.clone(), i64::from(role_spec.desired) - tracked)
            })
            .collect()
    }

    /// Read-only copy of the current specification.
    pub fn spec(&self) -> ClusterSpec {
        self.inner.read().unwrap().spec.clone()
    }
}
