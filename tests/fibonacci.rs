use {
    ::produce_iter::prelude::*,
    ::std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

const FIBS_BELOW_1000: [i32; 17] = [
    0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, 233, 377, 610, 987,
];

/// Never returns.
async
fn fibs<C : YieldCapability<i32>> (co: C, _running: DropFlag)
{
    let mut prev = 0;
    let mut next = 1;

    co.yield_(prev).await;
    co.yield_(next).await;

    loop {
        let fib = prev + next;
        prev = next;
        next = fib;

        co.yield_(next).await;
    }
}

/// Raised once the producer's state is dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop (self: &'_ mut Self)
    {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[test]
fn continuation_engine ()
{
    let dropped = Arc::new(AtomicBool::new(false));
    let fibs = produce({
        let dropped = dropped.clone();
        move |co| fibs(co, DropFlag(dropped.clone()))
    });
    assert_eq!(
        fibs.take_while(|&fib| fib < 1000).collect::<Vec<_>>(),
        FIBS_BELOW_1000,
    );
    // nothing outlives the iterator.
    assert!(dropped.load(Ordering::SeqCst));
}

#[test]
fn handshake_engine ()
{
    let dropped = Arc::new(AtomicBool::new(false));
    let mut fibs = produce_threaded({
        let dropped = dropped.clone();
        move |co| fibs(co, DropFlag(dropped.clone()))
    });
    assert_eq!(
        fibs.by_ref().take_while(|&fib| fib < 1000).collect::<Vec<_>>(),
        FIBS_BELOW_1000,
    );
    assert!(fibs.engine().is_producer_parked());
    assert_eq!(fibs.state(), EngineState::Suspended);
    assert_eq!(fibs.current(), Ok(&1597));

    // stopping early leaves the producer thread parked, for good.
    drop(fibs);
    assert!(!dropped.load(Ordering::SeqCst));
}
