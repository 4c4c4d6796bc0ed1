//! The contract shared by both engines.

use_prelude!();

/// The capability handed to a producer: the one operation it uses to hand a
/// value over to the consumer.
///
/// Producers are written against this trait so that the very same producer
/// runs on either engine:
///
/// ```rust
/// use ::produce_iter::prelude::*;
///
/// async fn countdown<C : YieldCapability<u32>> (co: C)
/// {
///     for n in (1 ..= 3).rev() {
///         co.yield_(n).await;
///     }
/// }
///
/// assert_eq!(produce(countdown).collect::<Vec<_>>(), [3, 2, 1]);
/// assert_eq!(produce_threaded(countdown).collect::<Vec<_>>(), [3, 2, 1]);
/// ```
///
/// # Awaiting
///
/// The returned [`Suspension`][`YieldCapability::Suspension`] must be
/// `.await`ed right away. Storing it to await it later, or creating a second
/// one before the first has been awaited, breaks the one-value-at-a-time
/// handoff.
pub
trait YieldCapability<T> {
    /// The suspension point returned by [`yield_`][`YieldCapability::yield_`].
    type Suspension<'co> : Future<Output = ()>
    where
        Self : 'co,
    ;

    /// Hands `value` over to the consumer, and suspends the producer until
    /// the consumer asks for the next value.
    fn yield_ (self: &'_ Self, value: T)
      -> Self::Suspension<'_>
    ;
}

/// Where an [`Engine`] is in its lifecycle.
///
/// ```text
///                 advance                 advance
///   NotStarted ─────────────> Running ────────────> Suspended
///       ^                      │   ^                    │
///       │ reset                │   └────── advance ─────┘
///       │                      v
///       └───────────────── Completed
/// ```
///
/// `dispose` moves any state to `Disposed`, and `reset` moves any state back
/// to `NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub
enum EngineState {
    /// No producer has been created yet.
    NotStarted,

    /// The producer is executing. Only observable from within the producer
    /// itself, or while unwinding out of it.
    Running,

    /// The producer yielded a value and is parked until the next `advance`.
    Suspended,

    /// The producer returned.
    Completed,

    /// The engine released its resources.
    Disposed,
}

/// The external iteration contract implemented by both engines.
///
/// An engine drives one producer at a time; each [`advance`] resumes it until
/// it yields exactly one value (or completes), and [`current`] reads that
/// value without consuming it.
///
/// # Single consumer
///
/// An engine is not meant to be shared: `advance` takes `&mut self`, so
/// concurrent pulls against one engine are ruled out at compile time.
///
/// [`advance`]: `Engine::advance`
/// [`current`]: `Engine::current`
pub
trait Engine {
    /// The type of values the producer yields.
    type Item;

    /// Resumes the producer (starting it on the first call) until it yields
    /// a value or completes.
    ///
    /// Returns `true` if a new value is available through
    /// [`current`][`Engine::current`], and `false` once the producer has
    /// completed. Once `false` has been returned, every subsequent call
    /// returns `false` too, without re-running the producer.
    fn advance (self: &'_ mut Self)
      -> bool
    ;

    /// The value yielded by the producer at its latest suspension point.
    ///
    /// # Errors
    ///
    ///   - [`Error::NotInitialized`] before the first
    ///     [`advance`][`Engine::advance`];
    ///
    ///   - [`Error::NoSuchElement`] once the producer has completed;
    ///
    ///   - [`Error::Disposed`] after [`dispose`][`Engine::dispose`].
    fn current (self: &'_ Self)
      -> Result<&'_ Self::Item, Error>
    ;

    /// Abandons the ongoing run, if any: the next
    /// [`advance`][`Engine::advance`] starts a brand new run of the producer.
    fn reset (self: &'_ mut Self)
    ;

    /// Releases the resources held by the engine. Idempotent.
    fn dispose (self: &'_ mut Self)
    ;

    /// The current lifecycle state.
    fn state (self: &'_ Self)
      -> EngineState
    ;
}

impl<E : ?Sized + Engine> Engine for &'_ mut E {
    type Item = E::Item;

    #[inline]
    fn advance (self: &'_ mut Self)
      -> bool
    {
        E::advance(*self)
    }

    #[inline]
    fn current (self: &'_ Self)
      -> Result<&'_ Self::Item, Error>
    {
        E::current(&**self)
    }

    #[inline]
    fn reset (self: &'_ mut Self)
    {
        E::reset(*self)
    }

    #[inline]
    fn dispose (self: &'_ mut Self)
    {
        E::dispose(*self)
    }

    #[inline]
    fn state (self: &'_ Self)
      -> EngineState
    {
        E::state(&**self)
    }
}
