/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Command Line Interface (CLI) module
//!
//! Thin wrappers that read metadata files, hand the numbers to the library
//! and write the results back out.

use crate::analysis::{
    neighbourhood_analysis, neighbours_in_range, FscCurve, NeighbourhoodAnalysis,
};
use crate::euler::{ConventionEngine, ConventionRegistry, EngineConfig, EulerTriplet};
use crate::io::{
    dynamo_to_star, read_table_map, reextraction_map, reextraction_table, star_to_dynamo,
    write_table_map, DynamoTable, StarFile,
};
use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::info;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Cryo-EM particle metadata and euler angle conversion
#[derive(Parser, Debug)]
#[command(name = "abtt", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON file with additional named conventions
    #[arg(long, value_name = "FILE", global = true)]
    pub conventions: Option<PathBuf>,

    /// Convert angle batches on a single thread
    #[arg(long, global = true)]
    pub serial: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert rows of three euler angles between software conventions
    Convert {
        /// Convention of the input angles, e.g. dynamo
        #[arg(long)]
        from: String,
        /// Convention of the output angles, e.g. relion
        #[arg(long)]
        to: String,
        /// Input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the registered conventions
    Conventions,
    /// Convert a Dynamo table and table map into a STAR file
    #[command(name = "dynamo2star")]
    DynamoToStar {
        #[arg(long)]
        table: PathBuf,
        #[arg(long)]
        table_map: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Convert a RELION/Warp STAR file into a Dynamo table and table map
    #[command(name = "star2dynamo")]
    StarToDynamo {
        #[arg(long)]
        star: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Also write a re-extraction table for particles boxed at this size (pixels)
        #[arg(long)]
        box_size: Option<f64>,
    },
    /// Count neighbours of every particle within a distance range
    Neighbours {
        #[arg(long)]
        table: PathBuf,
        #[arg(long)]
        min: f64,
        #[arg(long)]
        max: f64,
        /// Split the range into this many equally wide bins
        #[arg(long)]
        bins: Option<usize>,
    },
    /// Resolution at FSC 0.143 and 0.5 from a RELION postprocess.star
    Fsc {
        #[arg(long)]
        star: PathBuf,
        /// Print the estimate as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let registry = build_registry(cli.conventions.as_deref())?;
    let engine = ConventionEngine::new(&registry).with_config(EngineConfig {
        parallel: !cli.serial,
        ..EngineConfig::default()
    });

    match cli.command {
        Command::Convert {
            from,
            to,
            input,
            output,
        } => {
            let triplets = match &input {
                Some(path) => {
                    let file = File::open(path)
                        .with_context(|| format!("failed to open {}", path.display()))?;
                    parse_angle_rows(BufReader::new(file))?
                }
                None => parse_angle_rows(io::stdin().lock())?,
            };
            let converted = engine.convert_named(&triplets, &from, &to)?;

            match &output {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    let mut writer = BufWriter::new(file);
                    write_angle_rows(&mut writer, &converted)?;
                    writer.flush()?;
                }
                None => write_angle_rows(&mut io::stdout().lock(), &converted)?,
            }
        }
        Command::Conventions => {
            let mut stdout = io::stdout().lock();
            for (name, convention) in engine.registry().iter() {
                writeln!(stdout, "{:<12} {}", name, convention)?;
            }
        }
        Command::DynamoToStar {
            table,
            table_map,
            output,
        } => {
            let dynamo = DynamoTable::read(&table)
                .with_context(|| format!("failed to read table {}", table.display()))?;
            let map = read_table_map(&table_map)
                .with_context(|| format!("failed to read table map {}", table_map.display()))?;
            let block = dynamo_to_star(&dynamo, &map)?;
            StarFile::new(vec![block]).write(&output)?;
            info!("wrote {} particles to {}", dynamo.n_particles(), output.display());
        }
        Command::StarToDynamo {
            star,
            output,
            box_size,
        } => {
            let star_file = StarFile::read(&star)
                .with_context(|| format!("failed to read star file {}", star.display()))?;
            let block = star_file
                .block_with_column("rlnAngleRot")
                .ok_or_else(|| anyhow!("no particle block with rlnAngleRot in {}", star.display()))?;

            let (table, map) = star_to_dynamo(block)?;
            table.write(&output)?;
            write_table_map(output.with_extension("doc"), &map)?;

            if let Some(box_size) = box_size {
                reextraction_table(&table, box_size)?.write(with_suffix(&output, "_reextract", "tbl"))?;
                write_table_map(
                    with_suffix(&output, "_reextract", "doc"),
                    &reextraction_map(block)?,
                )?;
            }
            info!("wrote {} particles to {}", table.n_particles(), output.display());
        }
        Command::Neighbours {
            table,
            min,
            max,
            bins,
        } => {
            let dynamo = DynamoTable::read(&table)
                .with_context(|| format!("failed to read table {}", table.display()))?;
            let xyz = dynamo.xyz()?;
            let tags: Vec<i64> = dynamo
                .column("tag")?
                .iter()
                .map(|tag| tag.trunc() as i64)
                .collect();

            let mut stdout = io::stdout().lock();
            match bins {
                Some(bins) => {
                    let analysis = neighbourhood_analysis(xyz.view(), min, max, bins)?;
                    write_neighbourhood(&mut stdout, &tags, &analysis)?;
                }
                None => {
                    let counts = neighbours_in_range(xyz.view(), min, max)?;
                    for (tag, count) in tags.iter().zip(counts) {
                        writeln!(stdout, "{}\t{}", tag, count)?;
                    }
                }
            }
        }
        Command::Fsc { star, json } => {
            let curve = FscCurve::read(&star)
                .with_context(|| format!("failed to read FSC curve from {}", star.display()))?;
            let summary = curve.summary()?;

            let mut stdout = io::stdout().lock();
            if json {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&summary)?)?;
            } else {
                writeln!(
                    stdout,
                    "FSC 0.143: {:.2} A (shell {:.2})",
                    summary.resolution_0143, summary.fpix_0143
                )?;
                writeln!(
                    stdout,
                    "FSC 0.5:   {:.2} A (shell {:.2})",
                    summary.resolution_05, summary.fpix_05
                )?;
            }
        }
    }

    Ok(())
}

/// Built-in conventions plus any from a JSON file
pub fn build_registry(conventions: Option<&Path>) -> Result<ConventionRegistry> {
    let mut registry = ConventionRegistry::known_software();
    if let Some(path) = conventions {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read conventions file {}", path.display()))?;
        let added = registry.extend_from_json(&json)?;
        info!("registered {} conventions from {}", added, path.display());
    }
    Ok(registry)
}

/// Parse rows of three angles separated by whitespace or commas
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_angle_rows<R: BufRead>(reader: R) -> Result<Vec<EulerTriplet>> {
    let mut triplets = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let values = trimmed
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<f64>()
                    .with_context(|| format!("line {}: '{}' is not an angle", idx + 1, token))
            })
            .collect::<Result<Vec<_>>>()?;
        let triplet = EulerTriplet::try_from(values.as_slice())
            .with_context(|| format!("line {}", idx + 1))?;
        triplets.push(triplet);
    }

    Ok(triplets)
}

/// Write one triplet per line with four decimals
pub fn write_angle_rows<W: Write>(writer: &mut W, triplets: &[EulerTriplet]) -> Result<()> {
    for triplet in triplets {
        writeln!(writer, "{}", triplet)?;
    }
    Ok(())
}

/// Write binned neighbour counts, one particle per line after a header of bin centres
pub fn write_neighbourhood<W: Write>(
    writer: &mut W,
    tags: &[i64],
    analysis: &NeighbourhoodAnalysis,
) -> Result<()> {
    let header: Vec<String> = analysis
        .bin_centres
        .iter()
        .map(|centre| format!("{:.4}", centre))
        .collect();
    writeln!(writer, "tag\t{}", header.join("\t"))?;

    for (tag, counts) in tags.iter().zip(analysis.counts.rows()) {
        let counts: Vec<String> = counts.iter().map(|count| count.to_string()).collect();
        writeln!(writer, "{}\t{}", tag, counts.join("\t"))?;
    }
    Ok(())
}

fn with_suffix(path: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}{}.{}", stem, suffix, extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_angle_rows() {
        let text = "# tdrot tilt narot\n-155.55 63.924 197.81\n\n10,20, 30\n";
        let triplets = parse_angle_rows(Cursor::new(text)).unwrap();
        assert_eq!(triplets.len(), 2);
        assert_eq!(triplets[1].angles(), [10.0, 20.0, 30.0]);

        assert!(parse_angle_rows(Cursor::new("1 2\n")).is_err());
        assert!(parse_angle_rows(Cursor::new("1 2 x\n")).is_err());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["abtt", "-vv", "convert", "--from", "dynamo", "--to", "relion"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Convert { ref from, .. } if from == "dynamo"));

        let cli = Cli::try_parse_from([
            "abtt", "star2dynamo", "--star", "in.star", "-o", "out.tbl", "--box-size", "64",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::StarToDynamo { box_size: Some(b), .. } if b == 64.0));

        assert!(Cli::try_parse_from(["abtt", "convert", "--from", "dynamo"]).is_err());
    }

    #[test]
    fn test_write_neighbourhood() {
        let xyz = ndarray::array![[0.0, 0.0, 0.0], [3.0, 4.0, 0.0], [0.0, 0.0, 10.0]];
        let analysis = neighbourhood_analysis(xyz.view(), 0.0, 10.0, 3).unwrap();

        let mut out = Vec::new();
        write_neighbourhood(&mut out, &[7, 8, 9], &analysis).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "tag\t0.0000\t5.0000\t10.0000");
        assert_eq!(lines[3], "9\t0\t0\t2");

        let cli = Cli::try_parse_from([
            "abtt", "neighbours", "--table", "p.tbl", "--min", "0", "--max", "10", "--bins", "3",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Neighbours { bins: Some(3), .. }));
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(
            with_suffix(Path::new("/tmp/warp2dynamo.tbl"), "_reextract", "doc"),
            PathBuf::from("/tmp/warp2dynamo_reextract.doc")
        );
    }
}
