use std::error::Error;

/// The error type returned at the boundary of the tools, any error that
/// implements [`Error`] can be converted into it with `?`.
pub type AutomError = Box<dyn Error + Send + Sync>;
