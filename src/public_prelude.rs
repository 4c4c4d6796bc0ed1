//! The crate prelude: reexport the most essential utilities so that blob
//! `use`-ing them should enable the most straight-forward usage.

pub use crate::{
    make_yield,
    produce,
    Engine,
    EngineState,
    Error,
    Produced,
    YieldCapability,
};

#[cfg(feature = "std")]
pub use crate::produce_threaded;
