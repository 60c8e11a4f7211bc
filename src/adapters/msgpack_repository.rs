//! MessagePack implementation of the agent repository.
//!
//! This adapter implements the AgentRepository port using rmp_serde with
//! named fields, so snapshots stay readable when optional fields are added.

use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::AgentRepository, q_learning::SavedAgent};

/// MessagePack-based agent repository.
///
/// # Examples
///
/// ```no_run
/// use pacman_rl::adapters::MsgPackRepository;
/// use pacman_rl::ports::AgentRepository;
/// use std::path::Path;
///
/// let repo = MsgPackRepository::new();
/// match repo.load(Path::new("pacman_model.msgpack"))? {
///     Some(saved) => println!("{} states", saved.entry_count()),
///     None => println!("starting from scratch"),
/// }
/// # Ok::<(), pacman_rl::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl AgentRepository for MsgPackRepository {
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write_named(&mut writer, agent).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize agent to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("write file {path:?}"),
            source,
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<Option<SavedAgent>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("open file {path:?}"),
                    source,
                });
            }
        };

        let agent: SavedAgent = rmp_serde::decode::from_read(BufReader::new(file)).map_err(
            |e| Error::SerializationContext {
                operation: "deserialize agent from MessagePack".to_string(),
                message: e.to_string(),
            },
        )?;
        agent.check_version()?;

        Ok(Some(agent))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        encoding::StateEncoder,
        q_learning::{Algorithm, LearnerConfig, TableId, TabularLearner, TrainingMetadata},
        simulation::{SimulationConfig, SimulationEngine},
    };

    fn saved_agent() -> SavedAgent {
        let engine = SimulationEngine::new(SimulationConfig::default()).unwrap();
        let key = StateEncoder::encode(engine.state());
        let mut learner = TabularLearner::new(LearnerConfig::new(Algorithm::QLearning)).unwrap();
        *learner.value(&key, TableId::First) = [1.0, -2.5, 0.25, 7.0];
        learner.export(TrainingMetadata::default())
    }

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("model.msgpack");

        let repo = MsgPackRepository::new();
        let saved = saved_agent();

        repo.save(&saved, &file_path).expect("Failed to save");
        let loaded = repo
            .load(&file_path)
            .expect("Failed to load")
            .expect("Model should exist");

        assert_eq!(loaded.tables, saved.tables);
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let repo = MsgPackRepository::new();
        let result = repo.load(&temp_dir.path().join("missing.msgpack")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_corrupt_file_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("corrupt.msgpack");
        std::fs::write(&path, b"not a model").unwrap();

        let repo = MsgPackRepository::new();
        assert!(repo.load(&path).is_err());
    }

    #[test]
    fn test_save_to_invalid_path_returns_error() {
        let repo = MsgPackRepository::new();
        let result = repo.save(&saved_agent(), Path::new("/invalid_dir_12345/file.msgpack"));
        assert!(result.is_err());
    }
}
