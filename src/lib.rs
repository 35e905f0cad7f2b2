//! Palaver is the state core of a terminal AI chat client: which provider and
//! model are selected, which API keys are stored, and what the composer does
//! with a key press.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the chat shell ([`core::app`]), provider/model selection,
//!   the model catalog, credential persistence, and the composer.
//! - [`ui`] renders the chat panel with ratatui and runs the action channel
//!   that delivers background results back into the shell.
//! - [`api`] defines the `/models` payloads used by the HTTP catalog source.
//! - [`cli`] is the command-line entrypoint for listing providers and models
//!   and managing stored keys.
//!
//! Sending and prompt enhancement are delegated to implementations of
//! [`core::engine::SendEngine`] and [`core::engine::EnhanceEngine`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
