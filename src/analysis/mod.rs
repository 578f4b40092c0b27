/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Per-particle summaries of Dynamo tables
//!
//! Class distributions, per-tomogram splitting, neighbour counts from
//! particle positions and FSC resolution estimates.

pub mod classes;
pub mod errors;
pub mod fsc;
pub mod neighbours;
pub mod spatial_frequency;

pub use classes::{
    class_distribution, split_by_tomogram, tomogram_distribution_per_class, ClassShare,
};
pub use errors::{AnalysisError, Result};
pub use fsc::{FscCurve, FscSummary};
pub use neighbours::{
    neighbourhood_analysis, neighbours_in_range, pairwise_distances, NeighbourhoodAnalysis,
};
