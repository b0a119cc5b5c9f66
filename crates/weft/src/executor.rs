//! Pipeline executor: import, setup, behaviors, cleanup.

use crate::logger::{PipelineEvent, PipelineLogger, TracingLogger};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use weft_core::{
    Behavior, BehaviorName, CancellationToken, ContextAdapter, Imported, InputLabel,
    OptionsSource, Phase, PipelineContext, PipelineError, PipelineOptions,
};

/// Behaviors running longer than this are reported as slow.
pub const DEFAULT_SLOW_BEHAVIOR_THRESHOLD: Duration = Duration::from_secs(30);

/// Failure message recorded when import does not produce a usable context.
pub const IMPORT_FAILED_MESSAGE: &str = "Failed to import input";

/// Failure message recorded when a run is given no behaviors.
pub const NO_BEHAVIORS_MESSAGE: &str = "There were no behaviors to apply";

/// A behavior as the executor stores it.
pub type SharedBehavior<C> = Arc<dyn Behavior<C>>;

/// Runs an ordered list of behaviors over contexts produced by a
/// [`ContextAdapter`].
///
/// A run never fails as a whole: every failure is recorded on the returned
/// context. Import, an empty behavior list and setup failures end the run
/// early. A failing behavior is recorded and the next one still runs. A
/// failing cleanup is recorded and nothing is undone.
pub struct PipelineExecutor<A: ContextAdapter> {
    adapter: A,
    behaviors: Vec<SharedBehavior<A::Context>>,
    options: Arc<dyn OptionsSource>,
    logger: Arc<dyn PipelineLogger>,
    slow_threshold: Duration,
}

impl<A: ContextAdapter> fmt::Debug for PipelineExecutor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineExecutor")
            .field("behaviors", &self.behavior_names().collect::<Vec<_>>())
            .field("options", &self.options.current())
            .field("slow_threshold", &self.slow_threshold)
            .finish()
    }
}

impl<A: ContextAdapter> PipelineExecutor<A> {
    /// Creates a new executor builder around `adapter`.
    pub fn builder(adapter: A) -> PipelineExecutorBuilder<A> {
        PipelineExecutorBuilder::new(adapter)
    }

    /// Returns the adapter, for callers that export or pre-filter inputs.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Returns the registered behaviors in execution order.
    pub fn behaviors(&self) -> &[SharedBehavior<A::Context>] {
        &self.behaviors
    }

    /// Returns the names of the registered behaviors in execution order.
    pub fn behavior_names(&self) -> impl Iterator<Item = BehaviorName> + '_ {
        self.behaviors.iter().map(|b| b.name())
    }

    /// Returns the options the next run would use.
    pub fn current_options(&self) -> PipelineOptions {
        self.options.current()
    }

    /// Runs the registered behaviors over `input`.
    pub async fn run(&self, input: &A::Input, cancel: &CancellationToken) -> A::Context {
        self.run_with(input, &self.behaviors, cancel).await
    }

    /// Runs `behaviors` over `input`, ignoring the registered ones.
    pub async fn run_with(
        &self,
        input: &A::Input,
        behaviors: &[SharedBehavior<A::Context>],
        cancel: &CancellationToken,
    ) -> A::Context {
        let options = self.options.current();

        let (mut context, input_name, import_error) = match self.adapter.import(input, cancel).await
        {
            Ok(Imported {
                context,
                input_name,
            }) => (context, input_name, None),
            Err(source) => (A::Context::default(), None, Some(source)),
        };

        let input_name = match input_name {
            Some(name) if context.is_success() => name,
            _ => {
                let label = input.input_label();
                let error = import_error.map(|source| PipelineError::Import {
                    input: label.clone(),
                    source,
                });
                self.logger.log(&PipelineEvent::ImportFailed {
                    input: &label,
                    error: error.as_ref(),
                });
                let message = match &error {
                    Some(error) => error.to_string(),
                    None => format!("{IMPORT_FAILED_MESSAGE} {label}"),
                };
                context.record_failure(message, error);
                return context;
            }
        };

        if behaviors.is_empty() {
            self.logger
                .log(&PipelineEvent::NoBehaviors { input: &input_name });
            context.record_failure(NO_BEHAVIORS_MESSAGE, None);
            return context;
        }

        if options.setup_enabled {
            self.logger
                .log(&PipelineEvent::SetupStarted { input: &input_name });
            if let Err(source) = self.adapter.setup(cancel).await {
                let error = PipelineError::Phase {
                    phase: Phase::Setup,
                    input: input_name.clone(),
                    source,
                };
                self.logger.log(&PipelineEvent::SetupFailed {
                    input: &input_name,
                    error: &error,
                });
                capture(&mut context, error);
                return context;
            }
        }

        self.logger.log(&PipelineEvent::RunStarted {
            input: &input_name,
            behaviors: behaviors.len(),
        });

        for behavior in behaviors {
            self.apply(&**behavior, &mut context, &input_name, cancel)
                .await;
        }

        if options.cleanup_enabled {
            self.logger
                .log(&PipelineEvent::CleanupStarted { input: &input_name });
            if let Err(source) = self.adapter.cleanup(cancel).await {
                let error = PipelineError::Phase {
                    phase: Phase::Cleanup,
                    input: input_name.clone(),
                    source,
                };
                self.logger.log(&PipelineEvent::CleanupFailed {
                    input: &input_name,
                    error: &error,
                });
                capture(&mut context, error);
            }
        }

        context
    }

    async fn apply(
        &self,
        behavior: &dyn Behavior<A::Context>,
        context: &mut A::Context,
        input_name: &str,
        cancel: &CancellationToken,
    ) {
        let name = behavior.name();
        self.logger.log(&PipelineEvent::BehaviorStarted {
            behavior: &name,
            input: input_name,
        });

        // Recorded before the call so a failing behavior is still attributed.
        context.record_behavior_applied(name.clone());

        let started = Instant::now();
        let outcome = behavior.handle(context, cancel).await;
        let elapsed = started.elapsed();

        if let Err(source) = outcome {
            let error = PipelineError::Behavior {
                behavior: name.clone(),
                input: input_name.to_string(),
                source,
            };
            self.logger.log(&PipelineEvent::BehaviorFailed {
                behavior: &name,
                input: input_name,
                error: &error,
            });
            capture(context, error);
        }

        self.logger.log(&PipelineEvent::BehaviorCompleted {
            behavior: &name,
            elapsed,
        });
        if elapsed > self.slow_threshold {
            self.logger.log(&PipelineEvent::BehaviorSlow {
                behavior: &name,
                elapsed,
                threshold: self.slow_threshold,
            });
        }
    }
}

fn capture<C: PipelineContext>(context: &mut C, error: PipelineError) {
    let message = error.to_string();
    context.record_failure(message, Some(error));
}

/// Builder for constructing [`PipelineExecutor`] instances.
pub struct PipelineExecutorBuilder<A: ContextAdapter> {
    adapter: A,
    behaviors: Vec<SharedBehavior<A::Context>>,
    options: Arc<dyn OptionsSource>,
    logger: Arc<dyn PipelineLogger>,
    slow_threshold: Duration,
}

impl<A: ContextAdapter> PipelineExecutorBuilder<A> {
    /// Creates a builder with no behaviors, both optional phases disabled and
    /// a [`TracingLogger`].
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            behaviors: Vec::new(),
            options: Arc::new(PipelineOptions::default()),
            logger: Arc::new(TracingLogger),
            slow_threshold: DEFAULT_SLOW_BEHAVIOR_THRESHOLD,
        }
    }

    /// Appends a behavior. Behaviors run in the order they are added.
    pub fn behavior<B: Behavior<A::Context> + 'static>(mut self, behavior: B) -> Self {
        self.behaviors.push(Arc::new(behavior));
        self
    }

    /// Appends a behavior that is shared with other executors or runs.
    pub fn shared_behavior(mut self, behavior: SharedBehavior<A::Context>) -> Self {
        self.behaviors.push(behavior);
        self
    }

    /// Sets where each run reads its options from.
    pub fn options<O: OptionsSource + 'static>(mut self, options: O) -> Self {
        self.options = Arc::new(options);
        self
    }

    /// Sets the logger.
    pub fn logger<L: PipelineLogger + 'static>(mut self, logger: L) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Sets how long a behavior may run before it is reported as slow.
    pub fn slow_behavior_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    /// Builds the executor.
    pub fn build(self) -> PipelineExecutor<A> {
        PipelineExecutor {
            adapter: self.adapter,
            behaviors: self.behaviors,
            options: self.options,
            logger: self.logger,
            slow_threshold: self.slow_threshold,
        }
    }
}
