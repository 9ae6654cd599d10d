use crate::{Brain, GenomeError, CHECKPOINT_VERSION};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// File name of the best controller written at the end of training
pub const BEST_GENOME_FILE: &str = "best_genome.json";

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("failed to access checkpoint {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("checkpoint {} is not valid JSON: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("checkpoint {} has version {found}, expected {expected}", .path.display())]
    VersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("checkpoint {} holds an unusable brain: {source}", .path.display())]
    Genome {
        path: PathBuf,
        #[source]
        source: GenomeError,
    },
}

/// A saved controller together with where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: u32,
    pub genome_id: Uuid,
    pub generation: u32,

    /// Episode score when the checkpoint was taken
    pub score: u32,

    /// Fitness of the brain when the checkpoint was taken
    pub fitness: f64,
    pub brain: Brain,
}

impl Checkpoint {
    pub fn new(genome_id: Uuid, generation: u32, score: u32, fitness: f64, brain: Brain) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            genome_id,
            generation,
            score,
            fitness,
            brain,
        }
    }

    /// File name for a milestone checkpoint
    pub fn file_name(&self) -> String {
        format!("checkpoint_gen{}_score{}.json", self.generation, self.score)
    }
}

/// Write `checkpoint` into `dir` under `file_name`, creating `dir` if needed
pub fn save(
    dir: &Path,
    file_name: &str,
    checkpoint: &Checkpoint,
) -> Result<PathBuf, CheckpointError> {
    std::fs::create_dir_all(dir).map_err(|source| CheckpointError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(file_name);
    let json = serde_json::to_string_pretty(checkpoint).map_err(|source| {
        CheckpointError::Format {
            path: path.clone(),
            source,
        }
    })?;

    std::fs::write(&path, json).map_err(|source| CheckpointError::Io {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

/// Load a checkpoint.
///
/// A missing file is not an error: it yields `Ok(None)` so callers can tell
/// "nothing trained yet" apart from a broken file.
pub fn load(path: &Path) -> Result<Option<Checkpoint>, CheckpointError> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CheckpointError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let checkpoint: Checkpoint =
        serde_json::from_str(&json).map_err(|source| CheckpointError::Format {
            path: path.to_path_buf(),
            source,
        })?;

    if checkpoint.version != CHECKPOINT_VERSION {
        return Err(CheckpointError::VersionMismatch {
            path: path.to_path_buf(),
            found: checkpoint.version,
            expected: CHECKPOINT_VERSION,
        });
    }

    checkpoint
        .brain
        .validate()
        .map_err(|source| CheckpointError::Genome {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Some(checkpoint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> Checkpoint {
        let mut rng = StdRng::seed_from_u64(5);
        Checkpoint::new(Uuid::new_v4(), 12, 100, 431.5, Brain::random(&mut rng))
    }

    #[test]
    fn test_file_name() {
        let checkpoint = sample();
        assert_eq!(checkpoint.file_name(), "checkpoint_gen12_score100.json");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = sample();

        let path = save(dir.path(), BEST_GENOME_FILE, &checkpoint).unwrap();
        assert_eq!(path, dir.path().join(BEST_GENOME_FILE));

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, Some(checkpoint));
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("runs").join("latest");
        let checkpoint = sample();

        let path = save(&nested, &checkpoint.file_name(), &checkpoint).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load(&dir.path().join("nope.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_garbage_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BEST_GENOME_FILE);
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(load(&path), Err(CheckpointError::Format { .. })));
    }

    #[test]
    fn test_version_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut checkpoint = sample();
        checkpoint.version = CHECKPOINT_VERSION + 1;
        let path = save(dir.path(), BEST_GENOME_FILE, &checkpoint).unwrap();

        assert!(matches!(
            load(&path),
            Err(CheckpointError::VersionMismatch { found, .. }) if found == CHECKPOINT_VERSION + 1
        ));
    }

    #[test]
    fn test_malformed_brain_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut checkpoint = sample();
        checkpoint.brain.output_weights.pop();
        let path = save(dir.path(), BEST_GENOME_FILE, &checkpoint).unwrap();

        assert!(matches!(load(&path), Err(CheckpointError::Genome { .. })));
    }
}
