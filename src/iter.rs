//! The iterator adapter, and the factories creating it.

use_prelude!();

use crate::continuation::{Co, ContinuationEngine};

#[cfg(feature = "std")]
use crate::handshake::{Builder, HandshakeEngine, Yielder};

/// Runs `block` on the captured-continuation engine: the producer is polled
/// on the consumer's own thread, one yield point per
/// [`advance`][`Produced::advance`].
///
/// `block` is only called on the first `advance`, and again on the first
/// `advance` following every [`reset`][`Produced::reset`].
///
/// ```rust
/// use ::produce_iter::prelude::*;
///
/// let fibs = produce(|co| async move {
///     let (mut prev, mut next) = (0, 1);
///     co.yield_(prev).await;
///     co.yield_(next).await;
///     loop {
///         let fib = prev + next;
///         prev = next;
///         next = fib;
///         co.yield_(next).await;
///     }
/// });
/// assert_eq!(
///     fibs.take_while(|&fib| fib < 100).collect::<Vec<_>>(),
///     [0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89],
/// );
/// ```
pub
fn produce<T, F, Fut> (block: F)
  -> Produced<ContinuationEngine<T, F, Fut>>
where
    F : FnMut(Co<T>) -> Fut,
    Fut : Future<Output = ()>,
{
    Produced::new(ContinuationEngine::new(block))
}

/// Runs `block` on the parked-thread engine, under the default
/// [`Builder`] configuration.
///
/// The producer runs on a thread of its own, which takes turns with the
/// consumer: see [the `handshake` module][`crate::handshake`] for the
/// limitations this carries.
///
/// ```rust
/// use ::produce_iter::prelude::*;
///
/// let one_through_ten = produce_threaded(|co| async move {
///     for i in 1 ..= 10 {
///         co.yield_(i).await;
///     }
/// });
/// assert_eq!(one_through_ten.sum::<i32>(), 55);
/// ```
#[cfg(feature = "std")]
pub
fn produce_threaded<T, F, Fut> (block: F)
  -> Produced<HandshakeEngine<T, F>>
where
    F : FnMut(Yielder<T>) -> Fut,
    Fut : Future<Output = ()> + Send + 'static,
    T : Send + 'static,
{
    Builder::new().produce(block)
}

/// The external iterator over the values yielded by a producer, backed by
/// either [`Engine`].
///
/// It forwards the [`Engine`] contract as is, and, when the items are
/// [`Clone`], also implements [`Iterator`], so that the usual combinators
/// apply:
///
/// ```rust
/// use ::produce_iter::prelude::*;
///
/// let mut evens = produce(|co| async move {
///     for n in (0 ..).step_by(2) {
///         co.yield_(n).await;
///     }
/// });
/// assert_eq!(evens.by_ref().take(3).collect::<Vec<_>>(), [0, 2, 4]);
/// assert_eq!(evens.current(), Ok(&4));
///
/// evens.reset();
/// assert_eq!(evens.current(), Err(Error::NotInitialized));
/// assert_eq!(evens.next(), Some(0));
/// ```
#[derive(Debug)]
pub
struct Produced<E> {
    engine: E,
}

impl<E : Engine> Produced<E> {
    /// Wraps `engine`.
    #[inline]
    pub
    fn new (engine: E)
      -> Self
    {
        Self { engine }
    }

    /// See [`Engine::advance`].
    #[inline]
    pub
    fn advance (self: &'_ mut Self)
      -> bool
    {
        self.engine.advance()
    }

    /// See [`Engine::current`].
    #[inline]
    pub
    fn current (self: &'_ Self)
      -> Result<&'_ E::Item, Error>
    {
        self.engine.current()
    }

    /// See [`Engine::reset`].
    #[inline]
    pub
    fn reset (self: &'_ mut Self)
    {
        self.engine.reset()
    }

    /// See [`Engine::dispose`].
    #[inline]
    pub
    fn dispose (self: &'_ mut Self)
    {
        self.engine.dispose()
    }

    /// See [`Engine::state`].
    #[inline]
    pub
    fn state (self: &'_ Self)
      -> EngineState
    {
        self.engine.state()
    }
}

impl<E> Produced<E> {
    /// The backing engine.
    pub
    fn engine (self: &'_ Self)
      -> &'_ E
    {
        &self.engine
    }

    /// The backing engine.
    pub
    fn engine_mut (self: &'_ mut Self)
      -> &'_ mut E
    {
        &mut self.engine
    }

    /// Unwraps the backing engine.
    pub
    fn into_engine (self: Self)
      -> E
    {
        self.engine
    }
}

impl<E : Engine> Iterator for Produced<E>
where
    E::Item : Clone,
{
    type Item = E::Item;

    fn next (self: &'_ mut Self)
      -> Option<E::Item>
    {
        if self.engine.advance() {
            self.engine.current().ok().cloned()
        } else {
            None
        }
    }
}
