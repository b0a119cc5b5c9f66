//! Behavior trait and related types.

use crate::cancel::CancellationToken;
use crate::context::PipelineContext;
use crate::error::CapabilityError;
use async_trait::async_trait;
use std::fmt::{self, Debug};

/// Type-safe behavior name wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BehaviorName(String);

impl BehaviorName {
    /// Creates a new BehaviorName.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a BehaviorName from a type's name, without its module path or
    /// generic arguments.
    pub fn from_type_name<T: ?Sized>() -> Self {
        Self(short_type_name::<T>())
    }

    /// Returns the behavior name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BehaviorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BehaviorName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for BehaviorName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for BehaviorName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for BehaviorName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for BehaviorName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

pub(crate) fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// A named, asynchronous unit of work applied to a context.
///
/// Behaviors run in the order they were registered. A behavior that returns
/// an error marks the run unsuccessful but does not stop the behaviors after
/// it. The executor keeps behaviors behind an `Arc`, so one instance may serve
/// several concurrent runs; keep any internal state safe for that.
///
/// # Examples
///
/// ```
/// use weft_core::{Behavior, BehaviorName, CancellationToken, CapabilityError, Context};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct TrimSegments;
///
/// #[async_trait]
/// impl Behavior<Context<Vec<String>>> for TrimSegments {
///     async fn handle(
///         &self,
///         ctx: &mut Context<Vec<String>>,
///         _cancel: &CancellationToken,
///     ) -> Result<(), CapabilityError> {
///         for segment in ctx.payload_mut() {
///             *segment = segment.trim().to_string();
///         }
///         Ok(())
///     }
/// }
///
/// assert_eq!(TrimSegments.name(), BehaviorName::new("TrimSegments"));
/// ```
#[async_trait]
pub trait Behavior<C: PipelineContext>: Send + Sync + Debug {
    /// Applies the behavior to the context.
    ///
    /// Return `Err` to record a failure for this behavior; the run continues
    /// with the next one.
    async fn handle(&self, ctx: &mut C, cancel: &CancellationToken)
        -> Result<(), CapabilityError>;

    /// Returns the behavior name. Defaults to the type name.
    fn name(&self) -> BehaviorName {
        BehaviorName::from_type_name::<Self>()
    }
}
