//! The unified error handling system for the hook.

use std::fmt::Display;

// 1. Core Types
pub use types::StatsError;

/// A unified `Result` type for the whole crate.
pub type Result<T> = std::result::Result<T, StatsError>;

// 2. Module declarations
pub mod macros;
pub mod types;

// 3. Context Trait for adding context to errors.
pub trait Context<T, E> {
    /// 附加固定的上下文描述
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display;

    /// 惰性生成上下文描述
    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<StatsError>,
{
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display,
    {
        self.with_context(|| context)
    }

    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => {
                let context_message = context().to_string();
                Err(StatsError::Context {
                    context: context_message,
                    source: Box::new(error.into()),
                })
            }
        }
    }
}

/// Helper to attach context to an error without intermediate boilerplate.
#[track_caller]
pub fn context_error<T>(err: impl Into<StatsError>, context: impl Display) -> Result<T> {
    Err(err.into()).context(context)
}

// 4. Error Category for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Errors in local input (configuration, files, payload shape).
    Local,
    /// Errors caused by the credits service or the network path to it.
    Upstream,
    /// Errors raised by the host-provided status emitter.
    Host,
}
