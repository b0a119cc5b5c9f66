//! The per-context capabilities the executor consumes: import, export and
//! the optional setup and cleanup hooks.

use crate::behavior::short_type_name;
use crate::cancel::CancellationToken;
use crate::context::PipelineContext;
use crate::error::CapabilityError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A freshly imported context and the name of the input it came from.
///
/// An import without a name counts as a failed import.
#[derive(Debug)]
pub struct Imported<C> {
    /// The imported context.
    pub context: C,
    /// Display name of the input, used in logs and error messages.
    pub input_name: Option<String>,
}

impl<C> Imported<C> {
    /// An import that produced a named context.
    pub fn named(context: C, input_name: impl Into<String>) -> Self {
        Self {
            context,
            input_name: Some(input_name.into()),
        }
    }

    /// An import that could not name its input.
    pub fn unnamed(context: C) -> Self {
        Self {
            context,
            input_name: None,
        }
    }
}

/// Best-effort display label for an input, used when import fails before it
/// can name the input itself.
///
/// Strings label as themselves and paths as their file name. Every other type
/// falls back to its short type name, so an empty impl is enough:
///
/// ```
/// use weft_core::InputLabel;
///
/// struct MemberFeed {
///     bytes: Vec<u8>,
/// }
///
/// impl InputLabel for MemberFeed {}
///
/// let feed = MemberFeed { bytes: Vec::new() };
/// assert_eq!(feed.input_label(), "MemberFeed");
/// assert_eq!("inbound.edi".input_label(), "inbound.edi");
/// ```
pub trait InputLabel {
    /// Returns the label.
    fn input_label(&self) -> String {
        short_type_name::<Self>()
    }
}

impl InputLabel for str {
    fn input_label(&self) -> String {
        self.to_string()
    }
}

impl InputLabel for String {
    fn input_label(&self) -> String {
        self.clone()
    }
}

impl InputLabel for Path {
    fn input_label(&self) -> String {
        match self.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.display().to_string(),
        }
    }
}

impl InputLabel for PathBuf {
    fn input_label(&self) -> String {
        self.as_path().input_label()
    }
}

impl<T: InputLabel + ?Sized> InputLabel for &T {
    fn input_label(&self) -> String {
        (**self).input_label()
    }
}

impl InputLabel for [u8] {}

impl InputLabel for Vec<u8> {}

/// The capabilities a context type needs from its surroundings.
///
/// The executor calls [`import`](Self::import) and, when enabled,
/// [`setup`](Self::setup) and [`cleanup`](Self::cleanup). Callers use
/// [`is_accepted_format`](Self::is_accepted_format) to pre-filter inputs and
/// [`export`](Self::export) once a run has returned.
#[async_trait]
pub trait ContextAdapter: Send + Sync {
    /// The context this adapter produces.
    type Context: PipelineContext;
    /// The raw input accepted by [`import`](Self::import).
    type Input: InputLabel + Sync + ?Sized;
    /// What [`export`](Self::export) produces.
    type Output: Send;

    /// Returns `true` if the input looks importable.
    fn is_accepted_format(&self, input: &Self::Input) -> bool;

    /// Turns the raw input into a context.
    async fn import(
        &self,
        input: &Self::Input,
        cancel: &CancellationToken,
    ) -> Result<Imported<Self::Context>, CapabilityError>;

    /// Serializes a finished context.
    async fn export(
        &self,
        context: &Self::Context,
        cancel: &CancellationToken,
    ) -> Result<Self::Output, CapabilityError>;

    /// Prepares shared resources before the first behavior. Does nothing by
    /// default.
    async fn setup(&self, _cancel: &CancellationToken) -> Result<(), CapabilityError> {
        Ok(())
    }

    /// Releases shared resources after the last behavior. Does nothing by
    /// default.
    async fn cleanup(&self, _cancel: &CancellationToken) -> Result<(), CapabilityError> {
        Ok(())
    }
}
