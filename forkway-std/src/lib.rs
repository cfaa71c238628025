//! # forkway-std
//!
//! Standard implementations for the forkway conditional dispatch framework.
//!
//! This crate provides:
//! - **Conditional dispatch**: [`conditional`], [`Conditional`], [`CandidateSet`], [`group!`]
//! - **Host pipeline**: [`Stack`]
//! - **Named handlers**: [`HandlerRegistry`]
//! - **Declarative candidates**: [`config`] (feature `config`)
//! - **Wrapper middleware**: Logging (feature `tracing`), Timeout (feature `timeout`)
//! - **Testing helpers**: [`testing`]
//!
//! [`conditional`]: conditional::conditional
//! [`Conditional`]: conditional::Conditional
//! [`CandidateSet`]: conditional::CandidateSet
//! [`Stack`]: pipeline::Stack
//! [`HandlerRegistry`]: registry::HandlerRegistry

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use forkway_core;

// Modules
pub mod conditional;
#[cfg(feature = "config")]
pub mod config;
mod guard;
pub mod middleware;
pub mod pipeline;
pub mod registry;
pub mod testing;
