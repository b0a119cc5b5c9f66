//! Pipeline contexts and the run record they carry.

use crate::behavior::BehaviorName;
use crate::error::PipelineError;
use crate::status::{Status, StatusMessage};

/// The payload-agnostic state of one pipeline run.
///
/// Every mutating method keeps the invariant that a run with a captured error
/// or a [`Status::Failure`] message is not successful. Nothing resets the
/// success flag once it has been cleared.
#[derive(Debug)]
pub struct RunLog {
    applied_behaviors: Vec<BehaviorName>,
    is_success: bool,
    error: Option<PipelineError>,
    status_messages: Vec<StatusMessage>,
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RunLog {
    /// Creates a successful, empty run log.
    pub fn new() -> Self {
        Self {
            applied_behaviors: Vec::new(),
            is_success: true,
            error: None,
            status_messages: Vec::new(),
        }
    }

    /// Returns `false` once any failure has been recorded.
    pub fn is_success(&self) -> bool {
        self.is_success
    }

    /// Returns the captured error, if any.
    pub fn error(&self) -> Option<&PipelineError> {
        self.error.as_ref()
    }

    /// Returns the behaviors applied so far, in execution order.
    pub fn applied_behaviors(&self) -> &[BehaviorName] {
        &self.applied_behaviors
    }

    /// Returns every status message in insertion order.
    pub fn status_messages(&self) -> &[StatusMessage] {
        &self.status_messages
    }

    /// Records a failure message and marks the run unsuccessful.
    ///
    /// A given `error` replaces the captured one; `None` leaves it untouched.
    pub fn record_failure(&mut self, message: impl Into<String>, error: Option<PipelineError>) {
        self.push_message(StatusMessage::new(Status::Failure, message));
        if let Some(error) = error {
            self.error = Some(error);
        }
    }

    /// Records a warning message. The success flag is not affected.
    pub fn record_warning(&mut self, message: impl Into<String>) {
        self.push_message(StatusMessage::new(Status::Warning, message));
    }

    /// Records a success message. The success flag is not affected.
    pub fn record_success(&mut self, message: impl Into<String>) {
        self.push_message(StatusMessage::new(Status::Success, message));
    }

    /// Appends an existing message, keeping its timestamp.
    pub fn push_message(&mut self, message: StatusMessage) {
        if message.status() == Status::Failure {
            self.is_success = false;
        }
        self.status_messages.push(message);
    }

    /// Appends a behavior to the applied list.
    pub fn record_behavior_applied(&mut self, name: BehaviorName) {
        self.applied_behaviors.push(name);
    }

    /// Joins the text of the messages matching `status` (all messages for
    /// `None`), ordered by timestamp.
    pub fn joined(&self, status: Option<Status>, separator: &str) -> String {
        let mut matching: Vec<&StatusMessage> = self
            .status_messages
            .iter()
            .filter(|m| status.map_or(true, |s| m.status() == s))
            .collect();
        matching.sort_by_key(|m| m.logged());
        matching
            .iter()
            .map(|m| m.message())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// All messages, joined.
    pub fn messages(&self, separator: &str) -> String {
        self.joined(None, separator)
    }

    /// Success messages, joined.
    pub fn successes(&self, separator: &str) -> String {
        self.joined(Some(Status::Success), separator)
    }

    /// Warning messages, joined.
    pub fn warnings(&self, separator: &str) -> String {
        self.joined(Some(Status::Warning), separator)
    }

    /// Failure messages, joined.
    pub fn failures(&self, separator: &str) -> String {
        self.joined(Some(Status::Failure), separator)
    }
}

/// A context the pipeline executor can run behaviors over.
///
/// Implementors only expose their [`RunLog`]; every run-state operation is
/// provided on top of it. `Default` builds the placeholder context used when
/// import fails.
///
/// # Examples
///
/// ```
/// use weft_core::{PipelineContext, RunLog};
///
/// #[derive(Debug, Default)]
/// struct EnrollmentContext {
///     members: Vec<String>,
///     run_log: RunLog,
/// }
///
/// impl PipelineContext for EnrollmentContext {
///     fn run_log(&self) -> &RunLog {
///         &self.run_log
///     }
///
///     fn run_log_mut(&mut self) -> &mut RunLog {
///         &mut self.run_log
///     }
/// }
///
/// let mut ctx = EnrollmentContext::default();
/// ctx.record_failure("missing subscriber", None);
/// assert!(!ctx.is_success());
/// assert_eq!(ctx.failures("\n"), "missing subscriber");
/// ```
pub trait PipelineContext: Default + Send + Sync + 'static {
    /// Returns the run record.
    fn run_log(&self) -> &RunLog;

    /// Returns the run record mutably.
    fn run_log_mut(&mut self) -> &mut RunLog;

    /// See [`RunLog::is_success`].
    fn is_success(&self) -> bool {
        self.run_log().is_success()
    }

    /// See [`RunLog::error`].
    fn error(&self) -> Option<&PipelineError> {
        self.run_log().error()
    }

    /// See [`RunLog::applied_behaviors`].
    fn applied_behaviors(&self) -> &[BehaviorName] {
        self.run_log().applied_behaviors()
    }

    /// See [`RunLog::status_messages`].
    fn status_messages(&self) -> &[StatusMessage] {
        self.run_log().status_messages()
    }

    /// See [`RunLog::record_failure`].
    fn record_failure(&mut self, message: impl Into<String>, error: Option<PipelineError>) {
        self.run_log_mut().record_failure(message, error);
    }

    /// See [`RunLog::record_warning`].
    fn record_warning(&mut self, message: impl Into<String>) {
        self.run_log_mut().record_warning(message);
    }

    /// See [`RunLog::record_success`].
    fn record_success(&mut self, message: impl Into<String>) {
        self.run_log_mut().record_success(message);
    }

    /// See [`RunLog::record_behavior_applied`].
    fn record_behavior_applied(&mut self, name: BehaviorName) {
        self.run_log_mut().record_behavior_applied(name);
    }

    /// See [`RunLog::messages`].
    fn messages(&self, separator: &str) -> String {
        self.run_log().messages(separator)
    }

    /// See [`RunLog::successes`].
    fn successes(&self, separator: &str) -> String {
        self.run_log().successes(separator)
    }

    /// See [`RunLog::warnings`].
    fn warnings(&self, separator: &str) -> String {
        self.run_log().warnings(separator)
    }

    /// See [`RunLog::failures`].
    fn failures(&self, separator: &str) -> String {
        self.run_log().failures(separator)
    }
}

/// A general-purpose context pairing a payload with its [`RunLog`].
#[derive(Debug, Default)]
pub struct Context<P> {
    payload: P,
    run_log: RunLog,
}

impl<P> Context<P> {
    /// Creates a successful context around `payload`.
    pub fn new(payload: P) -> Self {
        Self {
            payload,
            run_log: RunLog::new(),
        }
    }

    /// Returns the payload.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Returns the payload mutably.
    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    /// Consumes the context, returning the payload.
    pub fn into_payload(self) -> P {
        self.payload
    }

    /// Consumes the context, returning the payload and the run record.
    pub fn into_parts(self) -> (P, RunLog) {
        (self.payload, self.run_log)
    }
}

impl<P: Default + Send + Sync + 'static> PipelineContext for Context<P> {
    fn run_log(&self) -> &RunLog {
        &self.run_log
    }

    fn run_log_mut(&mut self) -> &mut RunLog {
        &mut self.run_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CapabilityError, Phase};
    use chrono::{Duration, Utc};

    fn behavior_error(name: &str) -> PipelineError {
        PipelineError::Behavior {
            behavior: BehaviorName::new(name),
            input: "input".to_string(),
            source: CapabilityError::msg(format!("{name} failed")),
        }
    }

    #[test]
    fn test_new_context_is_successful() {
        let ctx = Context::new(0u32);
        assert!(ctx.is_success());
        assert!(ctx.error().is_none());
        assert!(ctx.applied_behaviors().is_empty());
        assert!(ctx.status_messages().is_empty());
    }

    #[test]
    fn test_record_failure_marks_unsuccessful() {
        let mut ctx = Context::<u32>::default();
        ctx.record_failure("broken", None);

        assert!(!ctx.is_success());
        assert!(ctx.error().is_none());
        assert_eq!(ctx.status_messages().len(), 1);
        assert_eq!(ctx.status_messages()[0].status(), Status::Failure);
    }

    #[test]
    fn test_record_failure_never_clears_error() {
        let mut ctx = Context::<u32>::default();
        ctx.record_failure("first", Some(behavior_error("A")));
        ctx.record_failure("no error object", None);

        let error = ctx.error().expect("error retained");
        assert_eq!(error.behavior().map(|b| b.as_str()), Some("A"));
    }

    #[test]
    fn test_last_error_wins() {
        let mut ctx = Context::<u32>::default();
        ctx.record_failure("A failed", Some(behavior_error("A")));
        ctx.record_failure("B failed", Some(behavior_error("B")));

        assert_eq!(
            ctx.error().and_then(|e| e.behavior()).map(|b| b.as_str()),
            Some("B")
        );
        assert_eq!(ctx.failures("|"), "A failed|B failed");
    }

    #[test]
    fn test_warnings_and_successes_keep_success_flag() {
        let mut ctx = Context::<u32>::default();
        ctx.record_warning("slow upstream");
        ctx.record_success("validated");
        assert!(ctx.is_success());
    }

    #[test]
    fn test_success_flag_is_never_reset() {
        let mut ctx = Context::<u32>::default();
        ctx.record_failure("broken", None);
        ctx.record_success("recovered");
        ctx.record_behavior_applied(BehaviorName::new("Later"));
        assert!(!ctx.is_success());
    }

    #[test]
    fn test_pushed_failure_message_marks_unsuccessful() {
        let mut log = RunLog::new();
        log.push_message(StatusMessage::new(Status::Failure, "imported failure"));
        assert!(!log.is_success());
    }

    #[test]
    fn test_applied_behaviors_keep_insertion_order() {
        let mut ctx = Context::<u32>::default();
        for name in ["C", "A", "B"] {
            ctx.record_behavior_applied(BehaviorName::new(name));
        }
        let names: Vec<&str> = ctx.applied_behaviors().iter().map(|b| b.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_joined_text_is_ordered_by_timestamp() {
        let now = Utc::now();
        let mut log = RunLog::new();
        log.push_message(StatusMessage::at(Status::Warning, "third", now));
        log.push_message(StatusMessage::at(
            Status::Success,
            "first",
            now - Duration::seconds(10),
        ));
        log.push_message(StatusMessage::at(
            Status::Failure,
            "second",
            now - Duration::seconds(5),
        ));
        log.push_message(StatusMessage::at(
            Status::Warning,
            "fourth",
            now + Duration::seconds(1),
        ));

        assert_eq!(log.messages(", "), "first, second, third, fourth");
        assert_eq!(log.successes(", "), "first");
        assert_eq!(log.warnings(", "), "third, fourth");
        assert_eq!(log.failures(", "), "second");
    }

    #[test]
    fn test_equal_timestamps_keep_insertion_order() {
        let now = Utc::now();
        let mut log = RunLog::new();
        for text in ["a", "b", "c"] {
            log.push_message(StatusMessage::at(Status::Success, text, now));
        }
        assert_eq!(log.successes(""), "abc");
    }

    #[test]
    fn test_joined_accessors_are_pure() {
        let mut ctx = Context::<u32>::default();
        ctx.record_success("one");
        ctx.record_warning("two");
        ctx.record_failure(
            "three",
            Some(PipelineError::Phase {
                phase: Phase::Cleanup,
                input: "input".to_string(),
                source: CapabilityError::msg("x"),
            }),
        );

        let first = ctx.messages("\n");
        let second = ctx.messages("\n");
        assert_eq!(first, second);
        assert_eq!(ctx.status_messages().len(), 3);
        assert_eq!(ctx.warnings("\n"), "two");
        assert_eq!(ctx.status_messages()[0].message(), "one");
    }

    #[test]
    fn test_empty_accessors() {
        let ctx = Context::<u32>::default();
        assert_eq!(ctx.messages("\n"), "");
        assert_eq!(ctx.failures("\n"), "");
    }

    #[test]
    fn test_unsuccessful_log_always_has_failure_message() {
        let mut log = RunLog::new();
        log.record_warning("late segment");
        log.record_success("parsed");
        assert!(log.is_success());

        log.record_failure("Failed to apply Validate to a.edi: bad header", None);
        assert!(!log.is_success());
        assert!(log
            .status_messages()
            .iter()
            .any(|m| m.status() == Status::Failure));
    }

    #[test]
    fn test_into_parts() {
        let mut ctx = Context::new(vec![1, 2, 3]);
        ctx.payload_mut().push(4);
        ctx.record_warning("extra element");

        let (payload, log) = ctx.into_parts();
        assert_eq!(payload, vec![1, 2, 3, 4]);
        assert_eq!(log.warnings(""), "extra element");
    }
}
