use ::core::{
    task::{RawWaker, RawWakerVTable, Waker},
};

/// A [`Waker`] whose every operation is a no-op.
///
/// The continuation engine resumes its producer only when `advance` is
/// called, so there is nobody to notify.
pub
fn noop ()
  -> Waker
{
    const RAW_WAKER: RawWaker = {
        const VTABLE: RawWakerVTable = {
            unsafe // Safety: no-op function
            fn clone (_: *const ())
              -> RawWaker
            {
                RAW_WAKER
            }

            unsafe // Safety: no-op function
            fn no_op (_: *const ())
            {}

            RawWakerVTable::new(clone, no_op, no_op, no_op)
        };

        RawWaker::new(::core::ptr::null(), &VTABLE)
    };

    unsafe {
        // # Safety
        //
        //   - the data pointer is never read, and all the vtable functions
        //     are no-ops, hence sound.
        Waker::from_raw(RAW_WAKER)
    }
}

/// A [`Waker`] that unparks the given thread.
///
/// Used by the producer thread's `block_on`, so that a producer awaiting
/// something other than its own yields gets polled again once woken.
#[cfg(feature = "std")]
pub
fn unparker (thread: ::std::thread::Thread)
  -> Waker
{
    use ::std::{sync::Arc, task::Wake, thread::Thread};

    struct Unparker(Thread);

    impl Wake for Unparker {
        fn wake (self: Arc<Self>)
        {
            self.0.unpark();
        }

        fn wake_by_ref (self: &'_ Arc<Self>)
        {
            self.0.unpark();
        }
    }

    Waker::from(Arc::new(Unparker(thread)))
}
