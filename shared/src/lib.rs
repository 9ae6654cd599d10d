pub mod checkpoint;
pub mod genes;
pub mod protocol;

pub use checkpoint::{Checkpoint, CheckpointError, BEST_GENOME_FILE};
pub use genes::*;
pub use protocol::*;

/// The checkpoint file format version - saved controllers must match this exactly
/// Version 1: fixed-topology 3-4-1 tanh network
pub const CHECKPOINT_VERSION: u32 = 1;
