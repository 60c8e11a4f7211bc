//! Repository port for model persistence.

use std::path::Path;

use crate::{Result, q_learning::SavedAgent};

/// Port for persisting and loading trained agents.
///
/// # Examples
///
/// ```no_run
/// use pacman_rl::ports::AgentRepository;
/// use pacman_rl::q_learning::SavedAgent;
/// use std::path::Path;
///
/// fn load_or_fresh<R: AgentRepository>(repo: &R, path: &Path) -> pacman_rl::Result<bool> {
///     Ok(repo.load(path)?.is_some())
/// }
/// ```
pub trait AgentRepository {
    /// Save an agent snapshot, replacing anything stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or serialization
    /// fails.
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()>;

    /// Load an agent snapshot.
    ///
    /// Returns `Ok(None)` when nothing is stored at `path`, meaning "start
    /// from scratch".
    ///
    /// # Errors
    ///
    /// Returns an error if the stored data cannot be read or decoded, or was
    /// written by an unsupported format version.
    fn load(&self, path: &Path) -> Result<Option<SavedAgent>>;
}
