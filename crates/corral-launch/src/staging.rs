use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use crate::LocalResource;

/// Filesystem staging collaborator.
///
/// Implementations upload local content to cluster-visible storage and hand
/// back opaque [`LocalResource`] references for the launcher to attach.
pub trait StagingFs: Send + Sync {
    /// Stage every file under `dir`, keyed by its name relative to `dir`.
    fn stage_directory(&self, dir: &Path) -> io::Result<BTreeMap<String, LocalResource>>;

    /// Stage a single archive for expansion inside the container.
    fn stage_archive(&self, path: &Path) -> io::Result<LocalResource>;
}
