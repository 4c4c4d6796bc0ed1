macro_rules! use_prelude {() => (
    #[allow(unused_imports)]
    use crate::utils::prelude::*;
)}

/// Binds `$cx` to a `Context` whose waker does nothing: the engines only ever
/// re-poll from `advance`, never in response to a wake-up.
macro_rules! create_context {(
    $cx:ident
) => (
    let waker: ::core::task::Waker = crate::waker::noop();
    let mut $cx = ::core::task::Context::from_waker(&waker);
)}
