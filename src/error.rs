//! Contract violations reported by [`Engine::current`].

use_prelude!();

/// The ways [`Engine::current`] can fail.
///
/// These are all programmer errors: they are reported synchronously at the
/// point of misuse, and retrying without first calling
/// [`advance`][`Engine::advance`] will fail the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub
enum Error {
    /// `current()` was called before the first `advance()`
    /// (or after a `reset()`).
    NotInitialized,

    /// `current()` was called after the producer completed.
    NoSuchElement,

    /// `current()` was called after `dispose()`.
    Disposed,
}

impl Error {
    /// The error `current()` reports for an engine with no value in its
    /// slot, given the state the engine is in.
    pub(in crate)
    fn for_state (state: EngineState)
      -> Self
    {
        match state {
            | EngineState::NotStarted => Error::NotInitialized,
            | EngineState::Disposed => Error::Disposed,
            | EngineState::Running
            | EngineState::Suspended
            | EngineState::Completed => Error::NoSuchElement,
        }
    }
}

impl fmt::Display for Error {
    fn fmt (self: &'_ Self, f: &'_ mut fmt::Formatter<'_>)
      -> fmt::Result
    {
        f.write_str(match *self {
            | Error::NotInitialized => "Not initialized (call advance() first).",
            | Error::NoSuchElement => "No such element.",
            | Error::Disposed => "The engine has been disposed.",
        })
    }
}

#[cfg(feature = "std")]
impl ::std::error::Error for Error {}
