/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Pairwise distances and neighbour counts between particle positions

use super::errors::{AnalysisError, Result};
use log::debug;
use ndarray::{Array1, Array2, ArrayView2};
use rayon::prelude::*;

/// Euclidean distance matrix of (N, 3) positions
pub fn pairwise_distances(xyz: ArrayView2<f64>) -> Result<Array2<f64>> {
    if xyz.ncols() != 3 {
        return Err(AnalysisError::InvalidParameter(format!(
            "expected (N, 3) positions, got {} columns",
            xyz.ncols()
        )));
    }

    let n = xyz.nrows();
    let values: Vec<f64> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            let a = xyz.row(i);
            (0..n).map(move |j| {
                let b = xyz.row(j);
                (0..3).map(|k| (a[k] - b[k]).powi(2)).sum::<f64>().sqrt()
            })
        })
        .collect();

    Array2::from_shape_vec((n, n), values)
        .map_err(|e| AnalysisError::InvalidParameter(e.to_string()))
}

/// Number of other particles within `[min_distance, max_distance)` of each particle
pub fn neighbours_in_range(
    xyz: ArrayView2<f64>,
    min_distance: f64,
    max_distance: f64,
) -> Result<Vec<usize>> {
    check_range(min_distance, max_distance)?;
    let distances = pairwise_distances(xyz)?;
    Ok(count_in_range(&distances, min_distance, max_distance))
}

/// Per-particle neighbour counts in equal distance bins
#[derive(Debug, Clone, PartialEq)]
pub struct NeighbourhoodAnalysis {
    /// (N, bins) neighbour counts, one row per particle
    pub counts: Array2<usize>,
    /// Bin centres, evenly spaced from the minimum to the maximum distance
    pub bin_centres: Array1<f64>,
    /// (bins, 2) lower and upper edge of every bin
    pub bin_minmax: Array2<f64>,
}

/// Neighbour counts of every particle in `number_of_bins` equally wide bins
///
/// Bin centres run from `min_distance` to `max_distance` inclusive, so the
/// outer bins reach half a bin width beyond both ends of the range. Each bin
/// counts distances in `[lower, upper)` and a particle is never its own
/// neighbour.
pub fn neighbourhood_analysis(
    xyz: ArrayView2<f64>,
    min_distance: f64,
    max_distance: f64,
    number_of_bins: usize,
) -> Result<NeighbourhoodAnalysis> {
    check_range(min_distance, max_distance)?;
    if number_of_bins < 2 {
        return Err(AnalysisError::InvalidParameter(format!(
            "at least 2 bins are needed, got {}",
            number_of_bins
        )));
    }

    let bin_centres = Array1::linspace(min_distance, max_distance, number_of_bins);
    let half_width = (bin_centres[1] - bin_centres[0]).abs() / 2.0;
    let bin_minmax = Array2::from_shape_fn((number_of_bins, 2), |(bin, edge)| {
        if edge == 0 {
            bin_centres[bin] - half_width
        } else {
            bin_centres[bin] + half_width
        }
    });

    let distances = pairwise_distances(xyz)?;
    let mut counts = Array2::zeros((xyz.nrows(), number_of_bins));
    for (bin, edges) in bin_minmax.rows().into_iter().enumerate() {
        let in_bin = count_in_range(&distances, edges[0], edges[1]);
        counts.column_mut(bin).assign(&Array1::from(in_bin));
    }
    debug!(
        "neighbourhood analysis of {} particles in {} bins",
        xyz.nrows(),
        number_of_bins
    );

    Ok(NeighbourhoodAnalysis {
        counts,
        bin_centres,
        bin_minmax,
    })
}

fn check_range(min_distance: f64, max_distance: f64) -> Result<()> {
    // NaN fails both comparisons
    if !(min_distance >= 0.0 && min_distance < max_distance) {
        return Err(AnalysisError::InvalidParameter(format!(
            "distance range [{}, {}) is empty or negative",
            min_distance, max_distance
        )));
    }
    Ok(())
}

fn count_in_range(distances: &Array2<f64>, lower: f64, upper: f64) -> Vec<usize> {
    (0..distances.nrows())
        .into_par_iter()
        .map(|i| {
            distances
                .row(i)
                .iter()
                .enumerate()
                .filter(|&(j, d)| j != i && *d >= lower && *d < upper)
                .count()
        })
        .collect()
}
