use ::std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A binary signal: at most one pending permit, consumed by [`Signal::wait`].
///
/// Both sides of a handshake only ever touch shared data between a `wait` and
/// the matching `release`, so lock poisoning carries no broken invariant and
/// is ignored.
#[derive(Debug, Default)]
pub(in crate)
struct Signal {
    permit: Mutex<bool>,
    released: Condvar,
}

impl Signal {
    fn lock (self: &'_ Self)
      -> MutexGuard<'_, bool>
    {
        self.permit.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the permit available, waking up the waiter, if any.
    pub(in crate)
    fn release (self: &'_ Self)
    {
        let mut permit = self.lock();
        debug_assert!(!*permit, "signal released twice in a row");
        *permit = true;
        self.released.notify_one();
    }

    /// Blocks until the permit is available, and consumes it.
    pub(in crate)
    fn wait (self: &'_ Self)
    {
        let mut permit = self.lock();
        while !*permit {
            permit =
                self.released
                    .wait(permit)
                    .unwrap_or_else(PoisonError::into_inner)
            ;
        }
        *permit = false;
    }
}

/// What the consumer and the producer thread share.
#[derive(Debug)]
pub(in crate)
struct Rendezvous<T> {
    /// Consumer → producer: run until the next yield (or completion).
    pub(in crate) producer_go: Signal,
    /// Producer → consumer: the slot has been filled, or the producer is
    /// done.
    pub(in crate) value_ready: Signal,
    slot: Mutex<Option<T>>,
}

impl<T> Rendezvous<T> {
    pub(in crate)
    fn new ()
      -> Self
    {
        Self {
            producer_go: Signal::default(),
            value_ready: Signal::default(),
            slot: Mutex::new(None),
        }
    }

    /// Called by the producer thread, which is the only one running.
    pub(in crate)
    fn put (self: &'_ Self, value: T)
    {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let prev = slot.replace(value);
        debug_assert!(prev.is_none(), "slot was not empty");
    }

    /// Called by the consumer once `value_ready` has been signaled: `None`
    /// means the producer is done.
    pub(in crate)
    fn take (self: &'_ Self)
      -> Option<T>
    {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
