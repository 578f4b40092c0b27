/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Class and tomogram breakdown of a particle table

use super::errors::Result;
use crate::io::DynamoTable;
use serde::Serialize;
use std::collections::BTreeMap;

/// Share of the particles assigned to one class
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassShare {
    pub particles: usize,
    /// Percentage of all particles in the table
    pub percentage: f64,
}

/// Particles per class, keyed by the table's `ref` column
pub fn class_distribution(table: &DynamoTable) -> Result<BTreeMap<i64, ClassShare>> {
    let total = table.n_particles();
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for class in table.column("ref")?.iter() {
        *counts.entry(class.round() as i64).or_default() += 1;
    }

    Ok(counts
        .into_iter()
        .map(|(class, particles)| {
            let percentage = 100.0 * particles as f64 / total as f64;
            (class, ClassShare { particles, percentage })
        })
        .collect())
}

/// One sub-table per tomogram, keyed by the table's `tomo` column
pub fn split_by_tomogram(table: &DynamoTable) -> Result<BTreeMap<i64, DynamoTable>> {
    let mut rows: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (row, tomo) in table.column("tomo")?.iter().enumerate() {
        rows.entry(tomo.round() as i64).or_default().push(row);
    }

    rows.into_iter()
        .map(|(tomo, rows)| -> Result<(i64, DynamoTable)> {
            Ok((tomo, table.subtable(&rows)?))
        })
        .collect()
}

/// Particles per tomogram for every class, keyed `{class: {tomogram: particles}}`
///
/// Every class lists every tomogram of the table, with zero where the class
/// has no particles in it.
pub fn tomogram_distribution_per_class(
    table: &DynamoTable,
) -> Result<BTreeMap<i64, BTreeMap<i64, usize>>> {
    let tomograms = split_by_tomogram(table)?;
    let mut distribution: BTreeMap<i64, BTreeMap<i64, usize>> = class_distribution(table)?
        .into_keys()
        .map(|class| (class, tomograms.keys().map(|tomo| (*tomo, 0)).collect()))
        .collect();

    for (tomo, subtable) in &tomograms {
        for (class, share) in class_distribution(subtable)? {
            if let Some(per_tomogram) = distribution.get_mut(&class) {
                per_tomogram.insert(*tomo, share.particles);
            }
        }
    }
    Ok(distribution)
}
