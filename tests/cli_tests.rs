/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

use abtt::cli::{run, Cli};
use abtt::io::{read_table_map, DynamoTable, StarFile};
use clap::Parser;
use std::fs;
use tempfile::tempdir;

const PARTICLES: &str = "data_

loop_
_rlnCoordinateX #1
_rlnCoordinateY #2
_rlnCoordinateZ #3
_rlnAngleRot #4
_rlnAngleTilt #5
_rlnAnglePsi #6
_rlnMicrographName #7
_rlnImageName #8
100.0 200.0 50.0 107.81 63.924 -65.55 TS_01.tomostar particles/TS_01_000001.mrc
110.0 190.0 55.0 -30.0 120.0 45.0 TS_02.tomostar particles/TS_02_000001.mrc
";

fn run_args(args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["abtt"];
    argv.extend_from_slice(args);
    run(Cli::try_parse_from(argv)?)
}

#[test]
fn test_convert_files() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("dynamo.txt");
    let output = dir.path().join("relion.txt");
    fs::write(&input, "# tdrot tilt narot\n-155.55 63.924 197.81\n0 0 0\n").unwrap();

    run_args(&[
        "--serial",
        "convert",
        "--from",
        "dynamo",
        "--to",
        "relion",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();

    let text = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    let values: Vec<f64> = lines[0]
        .split_whitespace()
        .map(|v| v.parse().unwrap())
        .collect();
    assert!((values[0] - 107.81).abs() < 1e-2);
    assert!((values[1] - 63.924).abs() < 1e-2);
    assert!((values[2] + 65.55).abs() < 1e-2);
}

#[test]
fn test_convert_with_custom_conventions() {
    let dir = tempdir().unwrap();
    let conventions = dir.path().join("conventions.json");
    let input = dir.path().join("angles.txt");
    let output = dir.path().join("out.txt");
    fs::write(
        &conventions,
        r#"{"dynamo_copy": {"axis_order": "ZXZ", "composition": "intrinsic", "acts_on": "reference"}}"#,
    )
    .unwrap();
    fs::write(&input, "10 20 30\n").unwrap();

    run_args(&[
        "--conventions",
        conventions.to_str().unwrap(),
        "convert",
        "--from",
        "dynamo",
        "--to",
        "dynamo_copy",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap().trim(), "10.0000 20.0000 30.0000");
}

#[test]
fn test_convert_rejects_unknown_convention() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("angles.txt");
    fs::write(&input, "10 20 30\n").unwrap();

    let result = run_args(&[
        "convert",
        "--from",
        "dynamo",
        "--to",
        "chimera",
        "-i",
        input.to_str().unwrap(),
    ]);
    assert!(result.is_err());
}

#[test]
fn test_star2dynamo_and_back() {
    let dir = tempdir().unwrap();
    let star = dir.path().join("particles.star");
    let table = dir.path().join("warp2dynamo.tbl");
    let back = dir.path().join("back.star");
    fs::write(&star, PARTICLES).unwrap();

    run_args(&[
        "star2dynamo",
        "--star",
        star.to_str().unwrap(),
        "-o",
        table.to_str().unwrap(),
        "--box-size",
        "64",
    ])
    .unwrap();

    let doc = dir.path().join("warp2dynamo.doc");
    let reextract_tbl = dir.path().join("warp2dynamo_reextract.tbl");
    let reextract_doc = dir.path().join("warp2dynamo_reextract.doc");
    assert!(doc.exists());

    let reextract = DynamoTable::read(&reextract_tbl).unwrap();
    assert_eq!(reextract.column("x").unwrap().to_vec(), vec![32.0, 32.0]);
    let images = read_table_map(&reextract_doc).unwrap();
    assert_eq!(images[&1], "particles/TS_01_000001.mrc");

    run_args(&[
        "dynamo2star",
        "--table",
        table.to_str().unwrap(),
        "--table-map",
        doc.to_str().unwrap(),
        "-o",
        back.to_str().unwrap(),
    ])
    .unwrap();

    let star = StarFile::read(&back).unwrap();
    let block = &star.blocks()[0];
    assert_eq!(block.n_rows(), 2);
    assert_eq!(
        block.column("rlnMicrographName").unwrap(),
        vec!["TS_01.tomostar", "TS_02.tomostar"]
    );
}

#[test]
fn test_missing_input_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.tbl");
    assert!(run_args(&["neighbours", "--table", missing.to_str().unwrap(), "--min", "0", "--max", "5"]).is_err());
}

const POSTPROCESS: &str = "data_general

_rlnFinalResolution 4.227

data_fsc

loop_
_rlnSpectralIndex #1
_rlnAngstromResolution #2
_rlnFourierShellCorrelationCorrected #3
0 999.0 1.0
1 16.0 0.9
2 8.0 0.6
3 5.333333 0.3
4 4.0 0.1
";

#[test]
fn test_fsc_command() {
    let dir = tempdir().unwrap();
    let star = dir.path().join("postprocess.star");
    fs::write(&star, POSTPROCESS).unwrap();
    run_args(&["fsc", "--star", star.to_str().unwrap()]).unwrap();
    run_args(&["fsc", "--star", star.to_str().unwrap(), "--json"]).unwrap();

    let particles = dir.path().join("particles.star");
    fs::write(&particles, PARTICLES).unwrap();
    assert!(run_args(&["fsc", "--star", particles.to_str().unwrap()]).is_err());
}

#[test]
fn test_neighbours_command() {
    let dir = tempdir().unwrap();
    let star = dir.path().join("particles.star");
    let table = dir.path().join("particles.tbl");
    fs::write(&star, PARTICLES).unwrap();
    run_args(&["star2dynamo", "--star", star.to_str().unwrap(), "-o", table.to_str().unwrap()])
        .unwrap();

    let table = table.to_str().unwrap();
    run_args(&["neighbours", "--table", table, "--min", "0", "--max", "20"]).unwrap();
    run_args(&["neighbours", "--table", table, "--min", "0", "--max", "20", "--bins", "4"]).unwrap();
    assert!(run_args(&["neighbours", "--table", table, "--min", "0", "--max", "20", "--bins", "1"]).is_err());
    assert!(run_args(&["neighbours", "--table", table, "--min", "NaN", "--max", "20"]).is_err());
}
