//! Terminal UI layer for the chat shell.
//!
//! - [`panel`]: draws a [`crate::core::app::ChatPanel`] with ratatui.
//! - [`keymap`]: turns key presses into shell actions.
//! - [`runtime`]: owns the action channel and runs commands as background
//!   tasks through [`executors`].
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns domain logic.

pub mod executors;
pub mod keymap;
pub mod panel;
pub mod runtime;
