//! Pull-style iterators out of push-style producers.
//!
//! A _producer_ is an `async` block handed a yield capability, through which
//! it emits values at arbitrary points (including inside unbounded loops):
//!
//! ```rust
//! use ::produce_iter::prelude::*;
//!
//! let mut one_two_three = produce(|co| async move {
//!     co.yield_(1).await;
//!     co.yield_(2).await;
//!     co.yield_(3).await;
//! });
//!
//! assert!(one_two_three.advance());
//! assert_eq!(one_two_three.current(), Ok(&1));
//! assert_eq!(one_two_three.collect::<Vec<_>>(), [2, 3]);
//! ```
//!
//! Each [`advance`][`Engine::advance`] resumes the producer until it yields
//! exactly one value, or completes. There is no buffering: the producer
//! cannot run past a yield point until the consumer asks for the next value.
//!
//! Two engines implement this handoff:
//!
//!   - [`produce`] polls the producer on the consumer's own thread
//!     ([`continuation`]). Stopping early leaves nothing behind.
//!
//!   - [`produce_threaded`] runs the producer on a thread of its own, parked
//!     between yields ([`handshake`]). Stopping early leaves that thread
//!     parked for good.
//!
//! Producers generic over [`YieldCapability`] run on both.

#![warn(
    future_incompatible,
    rust_2018_compatibility,
    missing_docs,
    clippy::cargo,
    clippy::pedantic,
)]
#![deny(
    unused_must_use,
)]
#![doc(test(attr(deny(warnings))))]

#![cfg_attr(not(feature = "std"),
    no_std,
)]

extern crate alloc;

#[path = "public_prelude.rs"]
pub
mod prelude;

mod public_macros;

#[macro_use]
mod utils;

mod waker;

pub use self::engine::*;
mod engine;

pub use self::error::Error;
mod error;

pub use self::iter::*;
mod iter;

pub
mod continuation;

#[cfg(feature = "std")]
pub
mod handshake;
