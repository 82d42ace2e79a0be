//! # Base types for duelchess
//!
//! This is an auxiliary crate for `duelchess`, which contains some core stuff: board
//! coordinates, colors, piece kinds and the pure geometry of piece movement.
//!
//! Normally you don't want to use this crate directly. Use `duelchess` instead.

pub mod geometry;
pub mod types;
