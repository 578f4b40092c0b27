/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Dynamo table (`.tbl`) and table map (`.doc`) files
//!
//! A Dynamo table is a whitespace-delimited numeric matrix with one row per
//! particle. Column meanings follow the Dynamo table convention, see
//! <https://wiki.dynamo.biozentrum.unibas.ch/w/index.php/Table_convention>.

use super::errors::{IoError, Result};
use crate::euler::EulerTriplet;
use log::{debug, info};
use ndarray::{s, Array2, ArrayView1, Axis};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Column names and their 1-based column numbers
pub const TABLE_COLUMNS: [(&str, usize); 38] = [
    ("tag", 1),
    ("aligned_value", 2),
    ("averaged_value", 3),
    ("dx", 4),
    ("dy", 5),
    ("dz", 6),
    ("tdrot", 7),
    ("tilt", 8),
    ("narot", 9),
    ("cc", 10),
    ("cc2", 11),
    ("cpu", 12),
    ("ftype", 13),
    ("ymintilt", 14),
    ("ymaxtilt", 15),
    ("xmintilt", 16),
    ("xmaxtilt", 17),
    ("fs1", 18),
    ("fs2", 19),
    ("tomo", 20),
    ("reg", 21),
    ("class", 22),
    ("annotation", 23),
    ("x", 24),
    ("y", 25),
    ("z", 26),
    ("dshift", 27),
    ("daxis", 28),
    ("dnarot", 29),
    ("dcc", 30),
    ("otag", 31),
    ("npar", 32),
    ("ref", 34),
    ("sref", 35),
    ("apix", 36),
    ("def", 37),
    ("eig1", 41),
    ("eig2", 42),
];

/// Minimum number of columns written to a table file
pub const STANDARD_WIDTH: usize = 41;

/// Zero-based index of a named column
pub fn column_index(name: &str) -> Option<usize> {
    TABLE_COLUMNS
        .iter()
        .find(|(column, _)| *column == name)
        .map(|(_, number)| number - 1)
}

/// A Dynamo particle table
#[derive(Debug, Clone, PartialEq)]
pub struct DynamoTable {
    data: Array2<f64>,
}

impl DynamoTable {
    /// Create a zero-filled table with `n_rows` particles
    pub fn new(n_rows: usize) -> Self {
        Self {
            data: Array2::zeros((n_rows, STANDARD_WIDTH)),
        }
    }

    /// Wrap an (N, columns) matrix of table values
    pub fn from_array(data: Array2<f64>) -> Self {
        Self { data }
    }

    /// Read a table file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("reading table file: {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a table from any buffered reader
    ///
    /// Blank lines are skipped. Every row must have the same number of columns.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut values = Vec::new();
        let mut width = None;
        let mut n_rows = 0;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let mut row_width = 0;
            for token in line.split_whitespace() {
                let value: f64 = token.parse().map_err(|_| {
                    IoError::parse(line_number, format!("'{}' is not a number", token))
                })?;
                values.push(value);
                row_width += 1;
            }

            match width {
                None => width = Some(row_width),
                Some(w) if w != row_width => {
                    return Err(IoError::parse(
                        line_number,
                        format!("expected {} columns, found {}", w, row_width),
                    ))
                }
                Some(_) => {}
            }
            n_rows += 1;
        }

        let width = width.unwrap_or(STANDARD_WIDTH);
        if n_rows == 0 {
            return Ok(Self::new(0));
        }
        let data = Array2::from_shape_vec((n_rows, width), values)
            .map_err(|e| IoError::LengthMismatch(e.to_string()))?;
        debug!("parsed table with {} rows and {} columns", n_rows, width);
        Ok(Self { data })
    }

    /// Number of particles (rows)
    pub fn n_particles(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns held
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    /// The raw (N, columns) matrix
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Values of a named column
    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        let idx = self.index_of(name)?;
        Ok(self.data.column(idx))
    }

    /// Overwrite a named column, widening the table if needed
    pub fn set_column(&mut self, name: &str, values: &[f64]) -> Result<()> {
        let idx = column_index(name).ok_or_else(|| IoError::MissingColumn(name.to_string()))?;
        if values.len() != self.n_particles() {
            return Err(IoError::LengthMismatch(format!(
                "column '{}' has {} values, table has {} rows",
                name,
                values.len(),
                self.n_particles()
            )));
        }

        if idx >= self.width() {
            let mut wider = Array2::zeros((self.n_particles(), idx + 1));
            wider.slice_mut(s![.., ..self.width()]).assign(&self.data);
            self.data = wider;
        }

        for (cell, value) in self.data.column_mut(idx).iter_mut().zip(values) {
            *cell = *value;
        }
        Ok(())
    }

    /// (N, 3) euler angles `[tdrot, tilt, narot]`
    pub fn eulers(&self) -> Result<Array2<f64>> {
        self.stack(&["tdrot", "tilt", "narot"])
    }

    /// Euler angles as triplets in row order
    pub fn triplets(&self) -> Result<Vec<EulerTriplet>> {
        Ok(self
            .eulers()?
            .rows()
            .into_iter()
            .map(|row| EulerTriplet::new(row[0], row[1], row[2]))
            .collect())
    }

    /// Overwrite tdrot, tilt and narot
    pub fn set_eulers(&mut self, triplets: &[EulerTriplet]) -> Result<()> {
        let tdrot: Vec<f64> = triplets.iter().map(EulerTriplet::first).collect();
        let tilt: Vec<f64> = triplets.iter().map(EulerTriplet::second).collect();
        let narot: Vec<f64> = triplets.iter().map(EulerTriplet::third).collect();
        self.set_column("tdrot", &tdrot)?;
        self.set_column("tilt", &tilt)?;
        self.set_column("narot", &narot)
    }

    /// (N, 3) particle positions, shifts included: `[x + dx, y + dy, z + dz]`
    pub fn xyz(&self) -> Result<Array2<f64>> {
        let positions = self.stack(&["x", "y", "z"])?;
        let shifts = self.stack(&["dx", "dy", "dz"])?;
        Ok(positions + shifts)
    }

    /// Rows selected by index, in the given order
    pub fn subtable(&self, rows: &[usize]) -> Result<Self> {
        if let Some(&row) = rows.iter().find(|&&row| row >= self.n_particles()) {
            return Err(IoError::RowOutOfRange {
                row,
                rows: self.n_particles(),
            });
        }
        Ok(Self {
            data: self.data.select(Axis(0), rows),
        })
    }

    /// Particles which contributed to the average (averaged_value == 1)
    pub fn averaged(&self) -> Result<Self> {
        let rows: Vec<usize> = self
            .column("averaged_value")?
            .iter()
            .enumerate()
            .filter(|(_, value)| **value == 1.0)
            .map(|(row, _)| row)
            .collect();
        self.subtable(&rows)
    }

    /// Write the table to a file
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        info!("writing table file: {}", path.display());
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the table in Dynamo text format
    ///
    /// At least [`STANDARD_WIDTH`] columns are written. The tag is written as
    /// an integer, all other values with four decimals.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let width = self.width().max(STANDARD_WIDTH);

        for row in self.data.rows() {
            let mut fields = Vec::with_capacity(width);
            for col in 0..width {
                let value = row.get(col).copied().unwrap_or(0.0);
                if col == 0 {
                    fields.push(format!("{}", value.trunc() as i64));
                } else {
                    fields.push(format!("{:.4}", value));
                }
            }
            writeln!(writer, "{}", fields.join(" \t"))?;
        }
        Ok(())
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        match column_index(name) {
            Some(idx) if idx < self.width() => Ok(idx),
            _ => Err(IoError::MissingColumn(name.to_string())),
        }
    }

    fn stack(&self, names: &[&str]) -> Result<Array2<f64>> {
        let indices = names
            .iter()
            .map(|name| self.index_of(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.data.select(Axis(1), &indices))
    }
}

/// Read a table map: `{tomogram index: tomogram path}`
pub fn read_table_map<P: AsRef<Path>>(path: P) -> Result<BTreeMap<i64, String>> {
    let path = path.as_ref();
    info!("reading table map: {}", path.display());
    let file = File::open(path)?;
    parse_table_map(BufReader::new(file))
}

/// Parse `index path` lines of a table map
pub fn parse_table_map<R: BufRead>(reader: R) -> Result<BTreeMap<i64, String>> {
    let mut map = BTreeMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (index, path) = trimmed
            .split_once(char::is_whitespace)
            .ok_or_else(|| IoError::parse(idx + 1, "expected '<index> <path>'"))?;
        let index: i64 = index
            .parse()
            .map_err(|_| IoError::parse(idx + 1, format!("'{}' is not a tomogram index", index)))?;
        map.insert(index, path.trim().to_string());
    }

    Ok(map)
}

/// Write a table map, one `index<TAB>path` line per entry
pub fn write_table_map<P: AsRef<Path>>(path: P, map: &BTreeMap<i64, String>) -> Result<()> {
    let path = path.as_ref();
    info!("writing table map: {}", path.display());
    let mut writer = BufWriter::new(File::create(path)?);
    for (index, tomogram) in map {
        writeln!(writer, "{}\t{}", index, tomogram)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    fn two_row_table() -> String {
        let mut row1 = vec![0.0; 41];
        let mut row2 = vec![0.0; 41];
        row1[0] = 1.0;
        row2[0] = 2.0;
        row1[2] = 1.0;
        row1[6] = 10.0;
        row1[7] = 20.0;
        row1[8] = 30.0;
        row1[3] = 0.5;
        row1[23] = 100.0;
        row2[23] = 50.0;
        row2[19] = 3.0;
        [row1, row2]
            .iter()
            .map(|r| r.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_parse_table() {
        let table = DynamoTable::from_reader(Cursor::new(two_row_table())).unwrap();
        assert_eq!(table.n_particles(), 2);
        assert_eq!(table.width(), 41);
        assert_eq!(table.column("tomo").unwrap()[1], 3.0);

        let eulers = table.eulers().unwrap();
        assert_eq!(eulers.row(0).to_vec(), vec![10.0, 20.0, 30.0]);

        let xyz = table.xyz().unwrap();
        assert_relative_eq!(xyz[(0, 0)], 100.5);
        assert_relative_eq!(xyz[(1, 0)], 50.0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = DynamoTable::from_reader(Cursor::new("1 2 3\n\n4 5\n")).unwrap_err();
        assert!(matches!(err, IoError::Parse { line: 3, .. }));

        let err = DynamoTable::from_reader(Cursor::new("1 2 x\n")).unwrap_err();
        assert!(matches!(err, IoError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_narrow_table_missing_columns() {
        let table = DynamoTable::from_reader(Cursor::new("1 1 1 0 0 0 5 6 7\n")).unwrap();
        assert_eq!(table.eulers().unwrap().row(0).to_vec(), vec![5.0, 6.0, 7.0]);
        assert!(matches!(table.xyz(), Err(IoError::MissingColumn(ref c)) if c == "x"));
        assert!(matches!(table.column("bogus"), Err(IoError::MissingColumn(_))));
    }

    #[test]
    fn test_set_column_widens_table() {
        let mut table = DynamoTable::new(2);
        table.set_column("eig2", &[1.5, 2.5]).unwrap();
        assert_eq!(table.width(), 42);
        assert_eq!(table.column("eig2").unwrap().to_vec(), vec![1.5, 2.5]);

        let err = table.set_column("tag", &[1.0]).unwrap_err();
        assert!(matches!(err, IoError::LengthMismatch(_)));
    }

    #[test]
    fn test_averaged_subtable() {
        let table = DynamoTable::from_reader(Cursor::new(two_row_table())).unwrap();
        let averaged = table.averaged().unwrap();
        assert_eq!(averaged.n_particles(), 1);
        assert_eq!(averaged.column("tag").unwrap()[0], 1.0);

        assert!(matches!(
            table.subtable(&[0, 2]),
            Err(IoError::RowOutOfRange { row: 2, rows: 2 })
        ));
    }

    #[test]
    fn test_write_format() {
        let mut table = DynamoTable::new(1);
        table.set_column("tag", &[7.0]).unwrap();
        table.set_column("tilt", &[12.345678]).unwrap();
        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let fields: Vec<&str> = text.trim_end().split(" \t").collect();
        assert_eq!(fields.len(), STANDARD_WIDTH);
        assert_eq!(fields[0], "7");
        assert_eq!(fields[7], "12.3457");
    }

    #[test]
    fn test_parse_table_map() {
        let map = parse_table_map(Cursor::new("1\t/data/tomo_01.mrc\n2 /data/tomo 02.mrc\n")).unwrap();
        assert_eq!(map[&1], "/data/tomo_01.mrc");
        assert_eq!(map[&2], "/data/tomo 02.mrc");
        assert!(parse_table_map(Cursor::new("onlyone\n")).is_err());
    }
}
