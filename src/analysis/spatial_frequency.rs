/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Conversions between resolution in angstroms and Fourier space sampling
//!
//! `fpix` is the distance from the origin in Fourier pixels of a cubic box,
//! Nyquist being `box_size / 2`. `cpix` is cycles per pixel, Nyquist being 0.5.

/// Resolution in angstroms at a Fourier pixel extent
pub fn fpix_to_resolution(fpix: f64, apix: f64, box_size: f64) -> f64 {
    let fraction_of_nyquist = fpix / (0.5 * box_size);
    let nyquist = 1.0 / (2.0 * apix);
    1.0 / (fraction_of_nyquist * nyquist)
}

/// Fourier pixel extent of a resolution in angstroms
pub fn resolution_to_fpix(resolution: f64, apix: f64, box_size: f64) -> f64 {
    let nyquist = 1.0 / (2.0 * apix);
    let fraction_of_nyquist = (1.0 / resolution) / nyquist;
    fraction_of_nyquist * 0.5 * box_size
}

/// Resolution in angstroms of a frequency in cycles per pixel
pub fn cpix_to_resolution(cpix: f64, apix: f64) -> f64 {
    apix / cpix
}

/// Cycles per pixel of a resolution in angstroms
pub fn resolution_to_cpix(resolution: f64, apix: f64) -> f64 {
    let nyquist = 1.0 / (2.0 * apix);
    0.5 * (1.0 / resolution) / nyquist
}
