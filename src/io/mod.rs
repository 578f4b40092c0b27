/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Particle metadata file formats
//!
//! Readers and writers for Dynamo tables and table maps and for RELION/Warp
//! STAR files, plus conversion between the two. Euler angles are translated
//! with [`crate::euler`] on the way through.

pub mod convert;
pub mod dynamo;
pub mod errors;
pub mod star;

pub use convert::{dynamo_to_star, reextraction_map, reextraction_table, star_to_dynamo};
pub use dynamo::{column_index, read_table_map, write_table_map, DynamoTable};
pub use errors::{IoError, Result};
pub use star::{StarBlock, StarFile};
