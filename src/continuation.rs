//! The captured-continuation engine.
//!
//! The producer is an `async` state machine, polled on the consumer's own
//! thread: the "rest of the producer's work" captured at each yield point is
//! the future itself, and resuming it is just polling it again.
//!
//! No thread, no lock: `advance` polls the producer until it deposits a value
//! in the slot (it then returns `Pending`) or completes (`Ready`).

use_prelude!();

/// A generation counter identifying the suspension the engine expects to
/// resume next.
///
/// It is bumped on every resumption and on every
/// [`reset`][`Engine::reset`], so that a continuation registered by an
/// earlier suspension (or an earlier run) can never be mistaken for the live
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub
struct ResumptionToken(u64);

impl ResumptionToken {
    fn next (self: Self)
      -> Self
    {
        Self(self.0.wrapping_add(1))
    }

    /// The raw counter value.
    #[inline]
    pub
    fn get (self: Self)
      -> u64
    {
        self.0
    }
}

/// The cell through which one run of the producer hands its values over.
///
/// A fresh one is allocated for every run, and only the engine owns it.
struct Handoff<T> {
    slot: Cell<Option<T>>,
    /// The token of the suspension registered by the latest `yield_`, if
    /// any.
    suspended: Cell<Option<ResumptionToken>>,
    /// The token the engine is currently running the producer under.
    live: Cell<ResumptionToken>,
}

/// The [`YieldCapability`] of the continuation engine.
///
/// It only holds a non-owning reference to the handoff cell of the run it
/// was created for: once that run is over (completed, [`reset`] or
/// disposed), yielding through it silently does nothing.
///
/// [`reset`]: `Engine::reset`
pub
struct Co<T> {
    handoff: Weak<Handoff<T>>,
}

impl<T> Clone for Co<T> {
    fn clone (self: &'_ Self)
      -> Self
    {
        Self { handoff: self.handoff.clone() }
    }
}

impl<T> fmt::Debug for Co<T> {
    fn fmt (self: &'_ Self, f: &'_ mut fmt::Formatter<'_>)
      -> fmt::Result
    {
        f   .debug_struct("Co")
            .field("live", &(self.handoff.strong_count() > 0))
            .finish()
    }
}

impl<T> Co<T> {
    /// Fills the slot with `value`, and returns the `.await`-able suspension
    /// point.
    pub
    fn yield_ (self: &'_ Self, value: T)
      -> Suspend<'_, T>
    {
        Suspend {
            co: self,
            value: Some(value),
            token: None,
        }
    }
}

impl<T> YieldCapability<T> for Co<T> {
    type Suspension<'co> = Suspend<'co, T>
    where
        Self : 'co,
    ;

    #[inline]
    fn yield_ (self: &'_ Self, value: T)
      -> Suspend<'_, T>
    {
        Co::yield_(self, value)
    }
}

/// The suspension point returned by [`Co::yield_`].
///
///  1. The first time it is polled, it deposits its value in the slot and
///     registers a suspension under the live token, returning `Pending`: the
///     `advance` polling the producer then picks the value up.
///
///  2. Once the engine resumes that suspension (bumping the live token),
///     the next poll returns `Ready`, and the producer carries on.
#[must_use = "a suspension point does nothing unless `.await`ed"]
pub
struct Suspend<'co, T> {
    co: &'co Co<T>,
    value: Option<T>,
    token: Option<ResumptionToken>,
}

/// No pinning projection.
impl<T> Unpin for Suspend<'_, T> {}

impl<T> Future for Suspend<'_, T> {
    type Output = ();

    fn poll (mut self: Pin<&'_ mut Self>, _: &'_ mut Context<'_>)
      -> Poll<()>
    {
        let this = &mut *self;
        let handoff = match this.co.handoff.upgrade() {
            | Some(handoff) => handoff,
            | None => {
                debug!("discarding a value yielded into a run that is over");
                this.value = None;
                return Poll::Ready(());
            },
        };
        if let Some(token) = this.token {
            return if handoff.live.get() == token {
                // polled again without the engine having resumed us.
                Poll::Pending
            } else {
                Poll::Ready(())
            };
        }
        match this.value.take() {
            | Some(value) => {
                let token = handoff.live.get();
                let prev = handoff.slot.replace(Some(value));
                debug_assert!(prev.is_none(), "slot was not empty");
                handoff.suspended.set(Some(token));
                this.token = Some(token);
                Poll::Pending
            },
            | None => Poll::Ready(()),
        }
    }
}

struct Run<T, Fut> {
    producer: Pin<Box<Fut>>,
    handoff: Rc<Handoff<T>>,
}

/// The captured-continuation [`Engine`]: runs the producer on the calling
/// thread.
///
/// Usually obtained wrapped in a [`Produced`][`crate::Produced`] adapter,
/// through [`produce`][`crate::produce`].
///
/// ```rust
/// use ::produce_iter::{prelude::*, continuation::{Co, ContinuationEngine}};
///
/// let mut engine = ContinuationEngine::new(|co: Co<&str>| async move {
///     co.yield_("ping").await;
///     co.yield_("pong").await;
/// });
/// assert_eq!(engine.current(), Err(Error::NotInitialized));
/// assert!(engine.advance());
/// assert_eq!(engine.current(), Ok(&"ping"));
/// assert!(engine.advance());
/// assert_eq!(engine.current(), Ok(&"pong"));
/// assert!(!engine.advance());
/// assert_eq!(engine.current(), Err(Error::NoSuchElement));
/// ```
///
/// # Panics
///
/// A producer must only ever suspend through its own [`Co`]: should it await
/// some other pending future, [`advance`][`Engine::advance`] panics, since
/// nothing would ever wake it up.
///
/// A panic inside the producer propagates out of `advance`, leaving the
/// engine [`Completed`][`EngineState::Completed`].
pub
struct ContinuationEngine<T, F, Fut> {
    block: F,
    run: Option<Run<T, Fut>>,
    current: Option<T>,
    token: ResumptionToken,
    state: EngineState,
}

impl<T, F, Fut> ContinuationEngine<T, F, Fut>
where
    F : FnMut(Co<T>) -> Fut,
    Fut : Future<Output = ()>,
{
    /// Wraps `block`, without calling it yet.
    pub
    fn new (block: F)
      -> Self
    {
        Self {
            block,
            run: None,
            current: None,
            token: ResumptionToken::default(),
            state: EngineState::NotStarted,
        }
    }

    fn start (self: &'_ mut Self)
    {
        let handoff = Rc::new(Handoff {
            slot: Cell::new(None),
            suspended: Cell::new(None),
            live: Cell::new(self.token),
        });
        let co = Co { handoff: Rc::downgrade(&handoff) };
        let producer = Box::pin((self.block)(co));
        self.run = Some(Run { producer, handoff });
        debug!("starting producer under {:?}", self.token);
    }

    /// Checks that the suspension the producer is parked at is the one the
    /// engine expects, and bumps the token to resume it.
    fn resume_suspension (self: &'_ mut Self)
      -> bool
    {
        let run = match self.run {
            | Some(ref run) => run,
            | None => return false,
        };
        match run.handoff.suspended.take() {
            | Some(token) if token == self.token => {
                self.token = token.next();
                run.handoff.live.set(self.token);
                true
            },
            | stale => {
                debug!(
                    "discarding stale continuation {:?} (live: {:?})",
                    stale, self.token,
                );
                false
            },
        }
    }

    fn poll_producer (self: &'_ mut Self)
      -> bool
    {
        let run = match self.run {
            | Some(ref mut run) => run,
            | None => {
                self.state = EngineState::Completed;
                return false;
            },
        };
        create_context!(cx);
        match run.producer.as_mut().poll(&mut cx) {
            | Poll::Ready(()) => {
                debug!("producer completed");
                self.run = None;
                self.state = EngineState::Completed;
                false
            },
            | Poll::Pending => {
                let value = match run.handoff.slot.take() {
                    | Some(value) => value,
                    | None => panic!(
                        "the producer suspended without yielding a value: \
                        it must only `.await` its own yield points",
                    ),
                };
                trace!("producer suspended under {:?}", self.token);
                self.current = Some(value);
                self.state = EngineState::Suspended;
                true
            },
        }
    }
}

impl<T, F, Fut> ContinuationEngine<T, F, Fut> {
    /// The token the next resumption will be checked against.
    #[inline]
    pub
    fn token (self: &'_ Self)
      -> ResumptionToken
    {
        self.token
    }

    fn release (self: &'_ mut Self)
    {
        // drop the producer before its handoff cell.
        self.run = None;
        self.current = None;
    }
}

impl<T, F, Fut> Engine for ContinuationEngine<T, F, Fut>
where
    F : FnMut(Co<T>) -> Fut,
    Fut : Future<Output = ()>,
{
    type Item = T;

    fn advance (self: &'_ mut Self)
      -> bool
    {
        match self.state {
            | EngineState::NotStarted => self.start(),
            | EngineState::Suspended => if !self.resume_suspension() {
                self.release();
                self.state = EngineState::Completed;
                return false;
            },
            | EngineState::Running
            | EngineState::Completed
            | EngineState::Disposed => return false,
        }
        self.current = None;
        self.state = EngineState::Running;
        ::unwind_safe::with_state(self)
            .try_eval(|this| this.poll_producer())
            .finally(|this| if this.state == EngineState::Running {
                // unwinding out of the producer.
                debug!("producer panicked");
                this.release();
                this.state = EngineState::Completed;
            })
    }

    fn current (self: &'_ Self)
      -> Result<&'_ T, Error>
    {
        self.current
            .as_ref()
            .ok_or_else(|| Error::for_state(self.state))
    }

    fn reset (self: &'_ mut Self)
    {
        if self.run.is_some() {
            debug!("abandoning the producer's run under {:?}", self.token);
        }
        self.release();
        self.token = self.token.next();
        self.state = EngineState::NotStarted;
    }

    fn dispose (self: &'_ mut Self)
    {
        if self.state != EngineState::Disposed {
            debug!("disposing engine");
        }
        self.release();
        self.state = EngineState::Disposed;
    }

    #[inline]
    fn state (self: &'_ Self)
      -> EngineState
    {
        self.state
    }
}

impl<T, F, Fut> Drop for ContinuationEngine<T, F, Fut> {
    fn drop (self: &'_ mut Self)
    {
        self.release();
    }
}

impl<T, F, Fut> fmt::Debug for ContinuationEngine<T, F, Fut> {
    fn fmt (self: &'_ Self, f: &'_ mut fmt::Formatter<'_>)
      -> fmt::Result
    {
        f   .debug_struct("ContinuationEngine")
            .field("state", &self.state)
            .field("token", &self.token)
            .finish()
    }
}
