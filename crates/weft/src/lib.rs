//! An async pipeline engine that imports an input into a context and runs an
//! ordered list of behaviors over it.
//!
//! A run goes through import, optional setup, every behavior in order, and
//! optional cleanup. A failing behavior is recorded on the context and the
//! next behavior still runs; import and setup failures stop the run. The
//! executor never returns an error: inspect the returned context instead.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use weft::prelude::*;
//!
//! struct LineAdapter;
//!
//! #[async_trait]
//! impl ContextAdapter for LineAdapter {
//!     type Context = Context<Vec<String>>;
//!     type Input = str;
//!     type Output = String;
//!
//!     fn is_accepted_format(&self, input: &str) -> bool {
//!         !input.is_empty()
//!     }
//!
//!     async fn import(
//!         &self,
//!         input: &str,
//!         _cancel: &CancellationToken,
//!     ) -> Result<Imported<Self::Context>, CapabilityError> {
//!         let lines = input.lines().map(str::to_string).collect();
//!         Ok(Imported::named(Context::new(lines), "inline"))
//!     }
//!
//!     async fn export(
//!         &self,
//!         ctx: &Self::Context,
//!         _cancel: &CancellationToken,
//!     ) -> Result<String, CapabilityError> {
//!         Ok(ctx.payload().join("\n"))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct Uppercase;
//!
//! #[async_trait]
//! impl Behavior<Context<Vec<String>>> for Uppercase {
//!     async fn handle(
//!         &self,
//!         ctx: &mut Context<Vec<String>>,
//!         _cancel: &CancellationToken,
//!     ) -> Result<(), CapabilityError> {
//!         for line in ctx.payload_mut() {
//!             *line = line.to_uppercase();
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let executor = PipelineExecutor::builder(LineAdapter)
//!     .behavior(Uppercase)
//!     .build();
//!
//! let cancel = CancellationToken::new();
//! let ctx = executor.run("a\nb", &cancel).await;
//! assert!(ctx.is_success());
//! assert_eq!(ctx.applied_behaviors()[0].as_str(), "Uppercase");
//!
//! let output = executor.adapter().export(&ctx, &cancel).await;
//! assert_eq!(output.ok().as_deref(), Some("A\nB"));
//! # }
//! ```

mod executor;
mod logger;
mod options;

// Re-export core types
pub use weft_core::*;

pub use executor::{
    PipelineExecutor, PipelineExecutorBuilder, SharedBehavior, DEFAULT_SLOW_BEHAVIOR_THRESHOLD,
    IMPORT_FAILED_MESSAGE, NO_BEHAVIORS_MESSAGE,
};
pub use logger::{LogLevel, NoopLogger, PipelineEvent, PipelineLogger, TracingLogger};
pub use options::WatchOptions;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Behavior, BehaviorName, CancellationToken, CapabilityError, Context, ContextAdapter,
        Imported, InputLabel, NoopLogger, OptionsSource, PipelineContext, PipelineError,
        PipelineExecutor, PipelineLogger, PipelineOptions, Status, StatusMessage, TracingLogger,
        WatchOptions,
    };
}
