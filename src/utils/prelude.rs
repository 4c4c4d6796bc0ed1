pub(in crate)
use {
    ::alloc::{
        boxed::Box,
        rc::{Rc, Weak},
    },
    ::core::{
        cell::Cell,
        fmt,
        future::Future,
        pin::Pin,
        task::{
            Context,
            Poll,
        },
    },
    ::log::{
        debug,
        trace,
    },
    crate::{
        engine::{
            Engine,
            EngineState,
            YieldCapability,
        },
        error::Error,
    },
};
