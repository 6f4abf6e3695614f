//! Core types, rules and game operations for the Reacher trivia backend.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! is reached only through the [`store::GameStore`] trait, which every
//! operation receives as an explicit handle.

pub mod city;
pub mod clue;
pub mod error;
pub mod guess;
pub mod id;
pub mod invite;
pub mod rules;
pub mod sampling;
pub mod session;
pub mod store;

#[cfg(test)]
mod memory;

pub use error::{Error, ErrorKind, Result};
