/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Conversion of particle metadata between Dynamo tables and STAR files

use super::dynamo::DynamoTable;
use super::errors::{IoError, Result};
use super::star::StarBlock;
use crate::euler::{dynamo_to_relion, relion_to_dynamo};
use log::info;
use ndarray::Axis;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Build a RELION/Warp particle block from a Dynamo table
///
/// Positions include the table shifts, angles are converted to RELION's
/// convention and `rlnMicrographName` is the file name of each particle's
/// tomogram in `table_map`.
pub fn dynamo_to_star(table: &DynamoTable, table_map: &BTreeMap<i64, String>) -> Result<StarBlock> {
    info!("converting {} particles from dynamo to star", table.n_particles());
    let xyz = table.xyz()?;
    let eulers = dynamo_to_relion(table.eulers()?.view())?;

    let micrographs = table
        .column("tomo")?
        .iter()
        .map(|tomo| -> Result<String> {
            let index = tomo.round() as i64;
            let path = table_map.get(&index).ok_or(IoError::UnknownTomogram(index))?;
            Ok(Path::new(path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut block = StarBlock::new("");
    for (heading, column) in ["rlnCoordinateX", "rlnCoordinateY", "rlnCoordinateZ"]
        .iter()
        .zip(xyz.axis_iter(Axis(1)))
    {
        block.set_column_f64(heading, &column.to_vec())?;
    }
    for (heading, column) in ["rlnAngleRot", "rlnAngleTilt", "rlnAnglePsi"]
        .iter()
        .zip(eulers.axis_iter(Axis(1)))
    {
        block.set_column_f64(heading, &column.to_vec())?;
    }
    block.set_column("rlnMicrographName", micrographs)?;
    Ok(block)
}

/// Build a Dynamo table and table map from a RELION/Warp particle block
///
/// Particles are tagged 1..=N and marked as aligned and averaged. Tomogram
/// indices are assigned from 1 over the sorted unique `rlnMicrographName`s.
pub fn star_to_dynamo(block: &StarBlock) -> Result<(DynamoTable, BTreeMap<i64, String>)> {
    let n = block.n_rows();
    info!("converting {} particles from star to dynamo", n);
    let xyz = block.xyz()?;
    let eulers = relion_to_dynamo(block.eulers_relion()?.view())?;
    let micrographs = block.column("rlnMicrographName")?;

    let unique: BTreeSet<&str> = micrographs.iter().copied().collect();
    let index_of: BTreeMap<&str, i64> = unique.iter().zip(1..).map(|(name, idx)| (*name, idx)).collect();
    let table_map: BTreeMap<i64, String> = index_of
        .iter()
        .map(|(name, idx)| (*idx, name.to_string()))
        .collect();

    let tags: Vec<f64> = (1..=n).map(|tag| tag as f64).collect();
    let ones = vec![1.0; n];
    let tomos: Vec<f64> = micrographs.iter().map(|name| index_of[name] as f64).collect();

    let mut table = DynamoTable::new(n);
    table.set_column("tag", &tags)?;
    table.set_column("aligned_value", &ones)?;
    table.set_column("averaged_value", &ones)?;
    for (name, column) in ["x", "y", "z"].iter().zip(xyz.axis_iter(Axis(1))) {
        table.set_column(name, &column.to_vec())?;
    }
    for (name, column) in ["tdrot", "tilt", "narot"].iter().zip(eulers.axis_iter(Axis(1))) {
        table.set_column(name, &column.to_vec())?;
    }
    table.set_column("tomo", &tomos)?;

    Ok((table, table_map))
}

/// Copy of `table` for re-extraction of already boxed particles
///
/// Every particle is centred in a box of `box_size` pixels and its tomogram
/// index becomes its tag.
pub fn reextraction_table(table: &DynamoTable, box_size: f64) -> Result<DynamoTable> {
    let n = table.n_particles();
    let centre = vec![box_size / 2.0; n];
    let tags = table.column("tag")?.to_vec();

    let mut reextract = table.clone();
    for axis in ["x", "y", "z"] {
        reextract.set_column(axis, &centre)?;
    }
    reextract.set_column("tomo", &tags)?;
    Ok(reextract)
}

/// Table map from particle tag (1..=N) to `rlnImageName`
pub fn reextraction_map(block: &StarBlock) -> Result<BTreeMap<i64, String>> {
    Ok(block
        .column("rlnImageName")?
        .into_iter()
        .zip(1..)
        .map(|(image, tag)| (tag, image.to_string()))
        .collect())
}
