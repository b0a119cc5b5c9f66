//! Core traits and types for the weft pipeline engine.
//!
//! This crate has no runtime dependency. Depend on it to write behaviors,
//! context types and adapters; the executor lives in the `weft` crate.
//!
//! # Core Types
//!
//! - [`PipelineContext`] - The contract every context satisfies
//! - [`Context`] - A payload paired with its [`RunLog`]
//! - [`Behavior`] - One named, asynchronous processing step
//! - [`ContextAdapter`] - Import, export, setup and cleanup for a context type
//! - [`StatusMessage`] - A timestamped entry in a run's log
//! - [`PipelineOptions`] - Toggles for the setup and cleanup phases
//! - [`PipelineError`] - A failure captured on a context

mod adapter;
mod behavior;
mod cancel;
mod context;
mod error;
mod options;
mod status;

pub use adapter::{ContextAdapter, Imported, InputLabel};
pub use behavior::{Behavior, BehaviorName};
pub use cancel::CancellationToken;
pub use context::{Context, PipelineContext, RunLog};
pub use error::{BoxError, CapabilityError, Phase, PipelineError};
pub use options::{OptionsSource, PipelineOptions};
pub use status::{Status, StatusMessage};
