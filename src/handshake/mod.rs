//! The parked-thread engine.
//!
//! The producer runs on a thread of its own, and the two sides take turns
//! through a pair of binary signals:
//!
//!   - `advance` releases `producer_go`, and blocks on `value_ready`;
//!
//!   - the producer thread waits on `producer_go` before starting, and each
//!     yield fills the slot, releases `value_ready`, and blocks on
//!     `producer_go` before returning;
//!
//!   - when the producer returns (or panics), its thread releases
//!     `value_ready` one last time, leaving the slot empty.
//!
//! Every `producer_go` is thus answered by exactly one `value_ready`, and
//! only one side ever runs at a time.
//!
//! # Limitations
//!
//!   - A producer that never yields again nor returns makes `advance` block
//!     forever.
//!
//!   - There is no cancellation: stopping the iteration early (dropping,
//!     [`reset`][`Engine::reset`]ting or [`dispose`][`Engine::dispose`]-ing
//!     the engine while the producer is suspended) leaves the producer thread
//!     parked until the process exits.

use_prelude!();

use {
    ::log::warn,
    ::std::{
        panic,
        sync::Arc,
        thread::{self, JoinHandle},
    },
    self::signal::Rendezvous,
    crate::iter::Produced,
};

mod signal;

/// The [`YieldCapability`] of the parked-thread engine.
pub
struct Yielder<T> {
    rendezvous: Arc<Rendezvous<T>>,
}

impl<T> fmt::Debug for Yielder<T> {
    fn fmt (self: &'_ Self, f: &'_ mut fmt::Formatter<'_>)
      -> fmt::Result
    {
        f   .debug_struct("Yielder")
            .finish_non_exhaustive()
    }
}

impl<T> Yielder<T> {
    /// Returns the suspension point handing `value` over to the consumer.
    pub
    fn yield_ (self: &'_ Self, value: T)
      -> Handshake<'_, T>
    {
        Handshake {
            yielder: self,
            value: Some(value),
        }
    }
}

impl<T> YieldCapability<T> for Yielder<T> {
    type Suspension<'y> = Handshake<'y, T>
    where
        Self : 'y,
    ;

    #[inline]
    fn yield_ (self: &'_ Self, value: T)
      -> Handshake<'_, T>
    {
        Yielder::yield_(self, value)
    }
}

/// The suspension point returned by [`Yielder::yield_`].
///
/// Polling it blocks the producer thread until the consumer asks for the
/// next value, after which it is `Ready`.
#[must_use = "a suspension point does nothing unless `.await`ed"]
pub
struct Handshake<'y, T> {
    yielder: &'y Yielder<T>,
    value: Option<T>,
}

/// No pinning projection.
impl<T> Unpin for Handshake<'_, T> {}

impl<T> Future for Handshake<'_, T> {
    type Output = ();

    fn poll (mut self: Pin<&'_ mut Self>, _: &'_ mut Context<'_>)
      -> Poll<()>
    {
        if let Some(value) = self.value.take() {
            let rendezvous = &*self.yielder.rendezvous;
            rendezvous.put(value);
            rendezvous.value_ready.release();
            // parked here until the next `advance`, possibly forever.
            rendezvous.producer_go.wait();
        }
        Poll::Ready(())
    }
}

/// Configuration of the producer thread, and factory of
/// [`HandshakeEngine`]s.
///
/// ```rust
/// use ::produce_iter::handshake::{Builder, Yielder};
///
/// let squares =
///     Builder::new()
///         .name("squares")
///         .stack_size(64 * 1024)
///         .produce(|co: Yielder<u64>| async move {
///             for n in 1 ..= 4 {
///                 co.yield_(n * n).await;
///             }
///         })
/// ;
/// assert_eq!(squares.collect::<Vec<_>>(), [1, 4, 9, 16]);
/// ```
#[derive(Debug, Clone)]
pub
struct Builder {
    name: String,
    stack_size: Option<usize>,
}

impl Default for Builder {
    fn default ()
      -> Self
    {
        Self {
            name: "producer".into(),
            stack_size: None,
        }
    }
}

impl Builder {
    /// The default configuration: threads named `"producer"`, with the
    /// platform's default stack size.
    pub
    fn new ()
      -> Self
    {
        Self::default()
    }

    /// Names the producer thread.
    pub
    fn name (self: Self, name: impl Into<String>)
      -> Self
    {
        Self { name: name.into(), ..self }
    }

    /// Sets the stack size of the producer thread, in bytes.
    pub
    fn stack_size (self: Self, stack_size: usize)
      -> Self
    {
        Self { stack_size: Some(stack_size), ..self }
    }

    /// Creates an engine running `block` under this configuration.
    pub
    fn engine<T, F, Fut> (self: Self, block: F)
      -> HandshakeEngine<T, F>
    where
        F : FnMut(Yielder<T>) -> Fut,
        Fut : Future<Output = ()> + Send + 'static,
        T : Send + 'static,
    {
        HandshakeEngine {
            block,
            config: self,
            rendezvous: None,
            producer: None,
            current: None,
            state: EngineState::NotStarted,
        }
    }

    /// Creates an iterator over the values yielded by `block`, run under
    /// this configuration.
    pub
    fn produce<T, F, Fut> (self: Self, block: F)
      -> Produced<HandshakeEngine<T, F>>
    where
        F : FnMut(Yielder<T>) -> Fut,
        Fut : Future<Output = ()> + Send + 'static,
        T : Send + 'static,
    {
        Produced::new(self.engine(block))
    }

    fn spawn<Fut> (
        self: &'_ Self,
        rendezvous: Arc<Rendezvous<impl Send + 'static>>,
        producer: Fut,
    ) -> JoinHandle<()>
    where
        Fut : Future<Output = ()> + Send + 'static,
    {
        let mut builder = thread::Builder::new().name(self.name.clone());
        if let Some(stack_size) = self.stack_size {
            builder = builder.stack_size(stack_size);
        }
        debug!("spawning producer thread {:?}", self.name);
        builder
            .spawn(move || run_producer(rendezvous, producer))
            .unwrap_or_else(|err| panic!(
                "failed to spawn the producer thread {:?}: {err}",
                self.name,
            ))
    }
}

fn run_producer<T> (
    rendezvous: Arc<Rendezvous<T>>,
    producer: impl Future<Output = ()>,
)
{
    rendezvous.producer_go.wait();
    trace!("producer thread running");
    ::unwind_safe::with_state(rendezvous)
        .try_eval(move |_| block_on(producer))
        .finally(|rendezvous| {
            // the slot is left empty: tells `advance` we are done.
            rendezvous.value_ready.release();
        })
}

/// Drives `future` to completion on the current thread, parking it whenever
/// the future is pending.
fn block_on<Fut : Future> (future: Fut)
  -> Fut::Output
{
    let mut future = Box::pin(future);
    let waker = crate::waker::unparker(thread::current());
    let mut cx = Context::from_waker(&waker);
    loop {
        if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
            return output;
        }
        thread::park();
    }
}

/// The parked-thread [`Engine`]: runs the producer on a thread of its own.
///
/// Usually obtained wrapped in a [`Produced`] adapter, through
/// [`produce_threaded`][`crate::produce_threaded`] or [`Builder::produce`].
///
/// ```rust
/// use ::produce_iter::{prelude::*, handshake::{Builder, Yielder}};
///
/// let mut engine = Builder::new().engine(|co: Yielder<String>| async move {
///     co.yield_("ping".to_owned()).await;
/// });
/// assert!(engine.advance());
/// assert_eq!(engine.current().map(String::as_str), Ok("ping"));
/// assert!(!engine.advance());
/// assert_eq!(engine.current(), Err(Error::NoSuchElement));
/// ```
///
/// # Panics
///
/// A panic inside the producer is propagated out of
/// [`advance`][`Engine::advance`], leaving the engine
/// [`Completed`][`EngineState::Completed`].
pub
struct HandshakeEngine<T, F> {
    block: F,
    config: Builder,
    rendezvous: Option<Arc<Rendezvous<T>>>,
    producer: Option<JoinHandle<()>>,
    current: Option<T>,
    state: EngineState,
}

impl<T, F> HandshakeEngine<T, F> {
    /// Whether a producer thread is still alive, parked waiting to be
    /// resumed.
    ///
    /// This stays `true` after an early stop of the iteration, until the
    /// engine is reset, disposed or dropped; the thread is then detached and
    /// stays parked.
    pub
    fn is_producer_parked (self: &'_ Self)
      -> bool
    {
        self.producer
            .as_ref()
            .map_or(false, |producer| !producer.is_finished())
    }

    fn release (self: &'_ mut Self)
    {
        self.current = None;
        self.rendezvous = None;
        if let Some(producer) = self.producer.take() {
            if producer.is_finished() {
                let _ = producer.join();
            } else {
                warn!(
                    "abandoning producer thread {:?}: \
                    it stays parked until the process exits",
                    self.config.name,
                );
            }
        }
    }

    fn join_producer (self: &'_ mut Self)
    {
        if let Some(producer) = self.producer.take() {
            if let Err(payload) = producer.join() {
                debug!("producer thread {:?} panicked", self.config.name);
                panic::resume_unwind(payload);
            }
        }
    }
}

impl<T, F, Fut> Engine for HandshakeEngine<T, F>
where
    F : FnMut(Yielder<T>) -> Fut,
    Fut : Future<Output = ()> + Send + 'static,
    T : Send + 'static,
{
    type Item = T;

    fn advance (self: &'_ mut Self)
      -> bool
    {
        match self.state {
            | EngineState::NotStarted
            | EngineState::Suspended => {},
            | EngineState::Running
            | EngineState::Completed
            | EngineState::Disposed => return false,
        }
        self.current = None;
        let rendezvous = Arc::clone(
            self.rendezvous.get_or_insert_with(|| Arc::new(Rendezvous::new()))
        );
        if self.producer.is_none() {
            let yielder = Yielder { rendezvous: Arc::clone(&rendezvous) };
            let producer = (self.block)(yielder);
            self.producer = Some(
                self.config.spawn(Arc::clone(&rendezvous), producer)
            );
        }
        self.state = EngineState::Running;
        rendezvous.producer_go.release();
        rendezvous.value_ready.wait();
        match rendezvous.take() {
            | Some(value) => {
                trace!("producer thread {:?} suspended", self.config.name);
                self.current = Some(value);
                self.state = EngineState::Suspended;
                true
            },
            | None => {
                debug!("producer thread {:?} completed", self.config.name);
                self.rendezvous = None;
                self.state = EngineState::Completed;
                self.join_producer();
                false
            },
        }
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
        debug!("resetting engine of producer thread {:?}", self.config.name);
        self.release();
        self.state = EngineState::NotStarted;
    }

    fn dispose (self: &'_ mut Self)
    {
        if self.state != EngineState::Disposed {
            debug!(
                "disposing engine of producer thread {:?}",
                self.config.name,
            );
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

impl<T, F> Drop for HandshakeEngine<T, F> {
    fn drop (self: &'_ mut Self)
    {
        self.release();
    }
}

impl<T, F> fmt::Debug for HandshakeEngine<T, F> {
    fn fmt (self: &'_ Self, f: &'_ mut fmt::Formatter<'_>)
      -> fmt::Result
    {
        f   .debug_struct("HandshakeEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
