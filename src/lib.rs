/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! # abtt-rs
//!
//! Euler angle conventions and particle metadata tools for subtomogram averaging.
//!
//! Cryo-EM packages describe particle orientations with different euler angle
//! conventions. This crate converts orientations between them by way of rotation
//! matrices, reads and writes Dynamo tables and STAR files, and offers a few
//! table-level analyses.

pub mod analysis;
pub mod cli;
pub mod euler;
pub mod io;
pub mod rotation;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
