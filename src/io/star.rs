/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! STAR files as written by RELION and Warp
//!
//! A file holds one or more `data_<name>` blocks. A block is either a
//! `loop_` table (`_heading #n` lines followed by whitespace-separated rows)
//! or a list of `_key value` pairs, which is held as a single-row table.

use super::errors::{IoError, Result};
use log::{debug, info, warn};
use ndarray::Array2;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Heading fragments whose values are written as fixed-point numbers
const FLOAT_HEADINGS: [&str; 5] = ["coordinate", "angle", "apix", "pixel", "magnification"];
/// Heading fragments whose values are written as integers
const INTEGER_HEADINGS: [&str; 2] = ["tag", "idx"];

/// One data block of a STAR file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarBlock {
    name: String,
    headings: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl StarBlock {
    /// Create an empty block; `name` is the part after `data_`
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column headings without the leading underscore
    pub fn headings(&self) -> &[String] {
        &self.headings
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, heading: &str) -> bool {
        self.headings.iter().any(|h| h == heading)
    }

    /// Raw values of a column
    pub fn column(&self, heading: &str) -> Result<Vec<&str>> {
        let idx = self.index_of(heading)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Values of a column parsed as numbers
    pub fn column_f64(&self, heading: &str) -> Result<Vec<f64>> {
        let idx = self.index_of(heading)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, values)| {
                values[idx]
                    .parse::<f64>()
                    .map_err(|_| IoError::InvalidNumber {
                        row,
                        column: heading.to_string(),
                        value: values[idx].clone(),
                    })
            })
            .collect()
    }

    /// Set a column, appending it if it does not exist yet
    ///
    /// The first column set on an empty block fixes the number of rows.
    pub fn set_column(&mut self, heading: &str, values: Vec<String>) -> Result<()> {
        if self.headings.is_empty() {
            self.rows = vec![Vec::new(); values.len()];
        } else if values.len() != self.n_rows() {
            return Err(IoError::LengthMismatch(format!(
                "column '{}' has {} values, block has {} rows",
                heading,
                values.len(),
                self.n_rows()
            )));
        }

        match self.headings.iter().position(|h| h == heading) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headings.push(heading.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Set a numeric column
    pub fn set_column_f64(&mut self, heading: &str, values: &[f64]) -> Result<()> {
        self.set_column(heading, values.iter().map(|v| v.to_string()).collect())
    }

    /// (N, 3) RELION euler angles `[rlnAngleRot, rlnAngleTilt, rlnAnglePsi]`
    pub fn eulers_relion(&self) -> Result<Array2<f64>> {
        self.stack(&["rlnAngleRot", "rlnAngleTilt", "rlnAnglePsi"])
    }

    /// (N, 3) particle coordinates `[rlnCoordinateX, rlnCoordinateY, rlnCoordinateZ]`
    pub fn xyz(&self) -> Result<Array2<f64>> {
        self.stack(&["rlnCoordinateX", "rlnCoordinateY", "rlnCoordinateZ"])
    }

    /// Write this block as a loop table
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "data_{}", self.name)?;
        writeln!(writer)?;
        writeln!(writer, "loop_")?;
        for (idx, heading) in self.headings.iter().enumerate() {
            writeln!(writer, "_{} #{}", heading, idx + 1)?;
        }

        for row in &self.rows {
            let fields: Vec<String> = self
                .headings
                .iter()
                .zip(row)
                .map(|(heading, value)| format_value(heading, value))
                .collect();
            writeln!(writer, "{}", fields.join("\t"))?;
        }
        writeln!(writer)?;
        Ok(())
    }

    fn index_of(&self, heading: &str) -> Result<usize> {
        self.headings
            .iter()
            .position(|h| h == heading)
            .ok_or_else(|| IoError::MissingColumn(heading.to_string()))
    }

    fn stack(&self, headings: &[&str; 3]) -> Result<Array2<f64>> {
        let columns = headings
            .iter()
            .map(|h| self.column_f64(h))
            .collect::<Result<Vec<_>>>()?;
        Ok(Array2::from_shape_fn((self.n_rows(), 3), |(i, j)| columns[j][i]))
    }
}

fn format_value(heading: &str, value: &str) -> String {
    let lower = heading.to_lowercase();
    let number = value.parse::<f64>().ok();

    match number {
        Some(v) if FLOAT_HEADINGS.iter().any(|f| lower.contains(f)) => format!("{:>12.5}", v),
        Some(v) if INTEGER_HEADINGS.iter().any(|f| lower.contains(f)) => format!("{:.0}", v),
        _ => value.to_string(),
    }
}

/// A parsed STAR file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarFile {
    blocks: Vec<StarBlock>,
}

impl StarFile {
    pub fn new(blocks: Vec<StarBlock>) -> Self {
        Self { blocks }
    }

    /// Read a STAR file from disk
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("reading star file: {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse STAR text
    pub fn parse(text: &str) -> Result<Self> {
        let mut blocks: Vec<StarBlock> = Vec::new();
        let mut current: Option<StarBlock> = None;
        let mut in_loop = false;

        for (idx, raw) in text.lines().enumerate() {
            let line_number = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix("data_") {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
                current = Some(StarBlock::new(name.trim()));
                in_loop = false;
                continue;
            }

            let block = current.get_or_insert_with(|| {
                warn!("star file content before the first data_ block");
                StarBlock::new("")
            });

            if line == "loop_" {
                if !block.headings.is_empty() {
                    return Err(IoError::parse(
                        line_number,
                        format!("data_{} already holds a table", block.name),
                    ));
                }
                in_loop = true;
                continue;
            }

            if let Some(rest) = line.strip_prefix('_') {
                let mut tokens = rest.split_whitespace();
                let heading = tokens.next().unwrap_or_default().to_string();
                if in_loop {
                    if !block.rows.is_empty() {
                        return Err(IoError::parse(
                            line_number,
                            "heading after the first data row",
                        ));
                    }
                    block.headings.push(heading);
                } else {
                    let value = tokens.next().ok_or_else(|| {
                        IoError::parse(line_number, format!("no value for _{}", heading))
                    })?;
                    if block.rows.is_empty() {
                        block.rows.push(Vec::new());
                    }
                    block.headings.push(heading);
                    block.rows[0].push(value.to_string());
                }
                continue;
            }

            if !in_loop {
                return Err(IoError::parse(line_number, "data row outside of a loop_"));
            }
            let fields: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            if fields.len() != block.headings.len() {
                return Err(IoError::parse(
                    line_number,
                    format!(
                        "expected {} fields, found {}",
                        block.headings.len(),
                        fields.len()
                    ),
                ));
            }
            block.rows.push(fields);
        }

        if let Some(block) = current.take() {
            blocks.push(block);
        }
        debug!("parsed star file with {} data blocks", blocks.len());
        Ok(Self { blocks })
    }

    pub fn blocks(&self) -> &[StarBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<StarBlock> {
        self.blocks
    }

    /// Block by name (without the `data_` prefix)
    pub fn block(&self, name: &str) -> Option<&StarBlock> {
        self.blocks.iter().find(|b| b.name == name)
    }

    /// First block holding a column with this heading
    pub fn block_with_column(&self, heading: &str) -> Option<&StarBlock> {
        self.blocks.iter().find(|b| b.has_column(heading))
    }

    /// Write all blocks to a file
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        info!("writing star file: {}", path.display());
        let mut writer = BufWriter::new(fs::File::create(path)?);
        for block in &self.blocks {
            block.write_to(&mut writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}
