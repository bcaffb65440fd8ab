//! Timed column board.
//!
//! This module provides the board state, the timer-driven mover on top of
//! it, and the text rendering used by the `columns` command.

pub mod board;
pub mod mover;
pub mod render;

pub use board::{default_items, ColumnBoard};
pub use mover::{Selection, TimedMover};
pub use render::{render_board, render_prompt};
