//! Core types and trait definitions for the Waggle health timeline engine.
//!
//! This crate holds plain data and pure derivation. It knows nothing about
//! HTTP or SQLite, and no date rule reads the clock: "today" always arrives
//! as a parameter. All other crates depend on it, never the reverse.

pub mod calendar;
pub mod error;
pub mod event;
pub mod home;
pub mod lifecycle;
pub mod medication;
pub mod repo;
pub mod store;
pub mod window;

pub use error::{Error, ErrorKind, Result};
