//! The iteration contract, checked against both engines with the very same
//! producers.

use ::produce_iter::{
    prelude::*,
    continuation::ContinuationEngine,
    handshake::Builder,
};

async
fn one_through_ten<C : YieldCapability<i32>> (co: C)
{
    for i in 1 ..= 10 {
        co.yield_(i).await;
    }
}

async
fn nothing<C : YieldCapability<i32>> (_: C)
{}

fn drain<E : Engine<Item = i32>> (engine: &'_ mut E)
  -> Vec<i32>
{
    let mut values = vec![];
    while engine.advance() {
        values.push(*engine.current().unwrap());
    }
    values
}

fn check_finite_run<E : Engine<Item = i32>> (mut engine: E)
{
    assert_eq!(engine.current(), Err(Error::NotInitialized));
    assert_eq!(drain(&mut engine), (1 ..= 10).collect::<Vec<_>>());
    for _ in 0 .. 3 {
        assert!(!engine.advance());
    }
    assert_eq!(engine.state(), EngineState::Completed);
    assert_eq!(engine.current(), Err(Error::NoSuchElement));
}

fn check_replay<E : Engine<Item = i32>> (mut engine: E)
{
    let first = drain(&mut engine);
    engine.reset();
    assert_eq!(engine.current(), Err(Error::NotInitialized));
    let second = drain(&mut engine);
    assert_eq!(first, second);

    // also from the middle of a run.
    assert!(!engine.advance());
    engine.reset();
    assert!(engine.advance());
    assert!(engine.advance());
    assert_eq!(engine.current(), Ok(&2));
    engine.reset();
    assert_eq!(drain(&mut engine), first);
}

fn check_empty<E : Engine<Item = i32>> (mut engine: E)
{
    assert!(!engine.advance());
    assert!(!engine.advance());
    assert_eq!(engine.current(), Err(Error::NoSuchElement));
}

fn check_dispose<E : Engine<Item = i32>> (mut engine: E)
{
    engine.dispose();
    engine.dispose();
    assert_eq!(engine.state(), EngineState::Disposed);
    assert!(!engine.advance());
    assert_eq!(engine.current(), Err(Error::Disposed));
}

macro_rules! for_both_engines {(
    $($check:ident ( $producer:ident )),* $(,)?
) => (
    mod continuation {
        use super::*;
        $(
            #[test]
            fn $check ()
            {
                super::$check(ContinuationEngine::new($producer));
            }
        )*
    }

    mod handshake {
        use super::*;
        $(
            #[test]
            fn $check ()
            {
                super::$check(Builder::new().engine($producer));
            }
        )*
    }
)}

for_both_engines! {
    check_finite_run(one_through_ten),
    check_replay(one_through_ten),
    check_empty(nothing),
    check_dispose(one_through_ten),
}

#[test]
fn adapters_agree ()
{
    let inline: Vec<i32> = produce(one_through_ten).collect();
    let threaded: Vec<i32> = produce_threaded(one_through_ten).collect();
    assert_eq!(inline, threaded);
    assert_eq!(inline, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
}

#[test]
fn error_messages ()
{
    assert_eq!(
        Error::NotInitialized.to_string(),
        "Not initialized (call advance() first).",
    );
    assert_eq!(Error::NoSuchElement.to_string(), "No such element.");
    let _: &dyn ::std::error::Error = &Error::Disposed;
}
