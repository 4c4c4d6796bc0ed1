use {
    ::produce_iter::{
        prelude::*,
        handshake::{Builder, Yielder},
    },
    ::std::{
        future::Future,
        panic,
        pin::Pin,
        sync::{Arc, Mutex},
        task::{Context, Poll},
        thread,
        time::Duration,
    },
};

#[test]
fn producer_runs_on_its_own_named_thread ()
{
    let mut names = Builder::new().name("letters").produce(|co| async move {
        let name = thread::current().name().map(str::to_owned);
        co.yield_(name).await;
    });
    assert_eq!(names.next(), Some(Some("letters".to_owned())));
    assert_eq!(names.next(), None);
}

#[test]
fn sides_take_turns ()
{
    let log = Arc::new(Mutex::new(Vec::<String>::new()));
    let mut iterator = produce_threaded({
        let log = log.clone();
        move |co| {
            let log = log.clone();
            async move {
                for i in 0 .. 3 {
                    log.lock().unwrap().push(format!("before {}", i));
                    co.yield_(i).await;
                    log.lock().unwrap().push(format!("after {}", i));
                }
            }
        }
    });
    assert!(iterator.advance());
    // the producer does not run ahead of the consumer.
    thread::sleep(Duration::from_millis(20));
    assert_eq!(*log.lock().unwrap(), ["before 0"]);
    assert!(iterator.advance());
    thread::sleep(Duration::from_millis(20));
    assert_eq!(*log.lock().unwrap(), ["before 0", "after 0", "before 1"]);
    assert_eq!(iterator.current(), Ok(&1));
}

#[test]
fn producer_is_not_rerun_after_completion ()
{
    let runs = Arc::new(Mutex::new(0));
    let mut iterator = produce_threaded({
        let runs = runs.clone();
        move |co: Yielder<u8>| {
            let runs = runs.clone();
            async move {
                *runs.lock().unwrap() += 1;
                co.yield_(7).await;
            }
        }
    });
    assert_eq!(iterator.by_ref().collect::<Vec<_>>(), [7]);
    assert!(!iterator.advance());
    assert!(!iterator.advance());
    assert!(!iterator.engine().is_producer_parked());
    assert_eq!(*runs.lock().unwrap(), 1);

    iterator.reset();
    assert_eq!(iterator.by_ref().collect::<Vec<_>>(), [7]);
    assert_eq!(*runs.lock().unwrap(), 2);
}

#[test]
fn reset_abandons_the_parked_producer ()
{
    let mut iterator = produce_threaded(|co| async move {
        for i in 0 .. {
            co.yield_(i).await;
        }
    });
    assert_eq!(iterator.by_ref().take(3).collect::<Vec<u32>>(), [0, 1, 2]);
    assert!(iterator.engine().is_producer_parked());
    iterator.reset();
    assert!(!iterator.engine().is_producer_parked());
    assert_eq!(iterator.current(), Err(Error::NotInitialized));
    assert_eq!(iterator.by_ref().take(3).collect::<Vec<u32>>(), [0, 1, 2]);
}

#[test]
fn panics_propagate ()
{
    let mut iterator = produce_threaded(|co| async move {
        co.yield_(1).await;
        panic!("boom");
    });
    assert!(iterator.advance());
    let caught = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        iterator.advance()
    }));
    assert!(caught.is_err());
    assert_eq!(iterator.state(), EngineState::Completed);
    assert!(!iterator.advance());
    assert_eq!(iterator.current(), Err(Error::NoSuchElement));
}

/// Pending once, waking itself right away.
struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll (mut self: Pin<&'_ mut Self>, cx: &'_ mut Context<'_>)
      -> Poll<()>
    {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[test]
fn producer_may_await_other_futures ()
{
    let iterator = produce_threaded(|co| async move {
        YieldNow(false).await;
        co.yield_("after").await;
        YieldNow(false).await;
    });
    assert_eq!(iterator.collect::<Vec<_>>(), ["after"]);
}

/// Needs about a megabyte of stack.
#[inline(never)]
fn stack_hungry ()
  -> u32
{
    let big = [1_u8; 1024 * 1024];
    big.iter().map(|&b| u32::from(b)).sum()
}

#[test]
fn stack_size_is_configurable ()
{
    let iterator =
        Builder::new()
            .stack_size(4 * 1024 * 1024)
            .produce(|co| async move {
                co.yield_(stack_hungry()).await;
            })
    ;
    assert_eq!(iterator.collect::<Vec<_>>(), [1024 * 1024]);
}
