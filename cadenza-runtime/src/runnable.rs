use crate::error::ActionError;
use std::error::Error as StdError;

/// Unit of work executed by the event loop
///
/// Any `Fn()` closure that is `Send + Sync` is a `Runnable`. Implement the
/// trait on your own type to report typed failures, or wrap a fallible
/// closure with [`fallible`].
///
/// # Example
///
/// ```rust
/// use cadenza_runtime::{ActionError, Runnable};
///
/// struct Heartbeat {
///     endpoint: String,
/// }
///
/// impl Runnable for Heartbeat {
///     fn run(&self) -> Result<(), ActionError> {
///         if self.endpoint.is_empty() {
///             return Err(ActionError::msg("no endpoint configured"));
///         }
///         println!("ping {}", self.endpoint);
///         Ok(())
///     }
/// }
/// ```
pub trait Runnable: Send + Sync {
    /// Execute the task once
    fn run(&self) -> Result<(), ActionError>;
}

impl<F> Runnable for F
where
    F: Fn() + Send + Sync,
{
    fn run(&self) -> Result<(), ActionError> {
        self();
        Ok(())
    }
}

/// Adapter returned by [`fallible`]
pub struct Fallible<F>(F);

/// Wrap a closure returning `Result` so its errors are reported by the event loop
pub fn fallible<F, E>(f: F) -> Fallible<F>
where
    F: Fn() -> Result<(), E> + Send + Sync,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    Fallible(f)
}

impl<F, E> Runnable for Fallible<F>
where
    F: Fn() -> Result<(), E> + Send + Sync,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    fn run(&self) -> Result<(), ActionError> {
        (self.0)().map_err(|e| ActionError::from(e.into()))
    }
}
