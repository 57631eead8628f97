//! # Batch Module
//!
//! The dispatch-and-relocation core, split by responsibility:
//! - `coordinator`: pass sequencing and the run state machine
//! - `dispatcher`: per-file transcode dispatch and resolution caching
//! - `relocator`: move/copy/ignore execution
//! - `path_planner`: mirrored destination computation

pub mod coordinator;
pub mod dispatcher;
pub mod path_planner;
pub mod relocator;

pub use coordinator::BatchCoordinator;
pub use dispatcher::{TranscodeDispatcher, TranscodeOutcome};
pub use relocator::{RelocateAction, RelocationEngine};
