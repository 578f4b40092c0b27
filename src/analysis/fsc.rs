/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Resolution estimates from RELION post-processing FSC curves
//!
//! The curve is read from the `data_fsc` block of a `postprocess.star` file.
//! Box size and pixel size are recovered from the last shell, which RELION
//! writes at Nyquist.

use super::errors::{AnalysisError, Result};
use super::spatial_frequency::fpix_to_resolution;
use crate::io::StarFile;
use log::{debug, info};
use serde::Serialize;
use std::path::Path;

/// Name of the FSC block in RELION post-processing output
pub const FSC_BLOCK: &str = "fsc";
/// Gold-standard cutoff
pub const CUTOFF_0143: f64 = 0.143;
/// Cutoff for comparison against a reference map
pub const CUTOFF_05: f64 = 0.5;

/// A corrected FSC curve sampled at Fourier shells
#[derive(Debug, Clone, PartialEq)]
pub struct FscCurve {
    spectral_index: Vec<f64>,
    fsc: Vec<f64>,
    resolution: Vec<f64>,
}

/// Resolution of a curve at both standard cutoffs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FscSummary {
    pub box_size: f64,
    pub apix: f64,
    pub fpix_0143: f64,
    pub resolution_0143: f64,
    pub fpix_05: f64,
    pub resolution_05: f64,
}

impl FscCurve {
    /// Build a curve from per-shell columns
    ///
    /// # Arguments
    ///
    /// * `spectral_index` - Shell index in Fourier pixels (`rlnSpectralIndex`)
    /// * `fsc` - Corrected FSC per shell (`rlnFourierShellCorrelationCorrected`)
    /// * `resolution` - Shell resolution in angstroms (`rlnAngstromResolution`)
    pub fn new(spectral_index: Vec<f64>, fsc: Vec<f64>, resolution: Vec<f64>) -> Result<Self> {
        if spectral_index.len() != fsc.len() || fsc.len() != resolution.len() {
            return Err(AnalysisError::InvalidParameter(format!(
                "FSC columns differ in length: {}, {} and {}",
                spectral_index.len(),
                fsc.len(),
                resolution.len()
            )));
        }
        if fsc.len() < 2 {
            return Err(AnalysisError::InvalidParameter(format!(
                "an FSC curve needs at least 2 shells, got {}",
                fsc.len()
            )));
        }
        Ok(Self {
            spectral_index,
            fsc,
            resolution,
        })
    }

    /// Take the curve from the `data_fsc` block of a parsed STAR file
    pub fn from_star(star: &StarFile) -> Result<Self> {
        let block = star
            .block(FSC_BLOCK)
            .ok_or_else(|| AnalysisError::MissingBlock(format!("data_{}", FSC_BLOCK)))?;
        Self::new(
            block.column_f64("rlnSpectralIndex")?,
            block.column_f64("rlnFourierShellCorrelationCorrected")?,
            block.column_f64("rlnAngstromResolution")?,
        )
    }

    /// Read the curve from a RELION post-processing STAR file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("reading FSC curve from {}", path.display());
        Self::from_star(&StarFile::read(path)?)
    }

    pub fn n_shells(&self) -> usize {
        self.fsc.len()
    }

    /// Spectral index of the outermost shell
    pub fn fpix_extent(&self) -> f64 {
        self.spectral_index[self.spectral_index.len() - 1]
    }

    /// Box size in pixels, twice the outermost shell
    pub fn box_size(&self) -> f64 {
        self.fpix_extent() * 2.0
    }

    /// Pixel size in angstroms, half the Nyquist resolution
    pub fn apix(&self) -> f64 {
        self.resolution[self.resolution.len() - 1] / 2.0
    }

    /// Fourier pixel at which the curve drops through `cutoff`
    ///
    /// The last shell above `cutoff` and the one after it are interpolated
    /// linearly, so with several crossings the outermost one wins.
    ///
    /// # Errors
    ///
    /// `CutoffNotCrossed` if no shell is above `cutoff` or the curve is still
    /// above it at the last shell.
    pub fn fpix_at_cutoff(&self, cutoff: f64) -> Result<f64> {
        let above = self
            .fsc
            .iter()
            .rposition(|value| *value > cutoff)
            .filter(|idx| idx + 1 < self.fsc.len())
            .ok_or(AnalysisError::CutoffNotCrossed(cutoff))?;

        let (fsc_above, fsc_below) = (self.fsc[above], self.fsc[above + 1]);
        let (fpix_above, fpix_below) = (self.spectral_index[above], self.spectral_index[above + 1]);
        let extent = (fsc_above - cutoff) / (fsc_above - fsc_below);
        let fpix = fpix_above + extent * (fpix_below - fpix_above);
        debug!("FSC crosses {} at shell {:.3}", cutoff, fpix);
        Ok(fpix)
    }

    /// Resolution in angstroms at which the curve drops through `cutoff`
    pub fn resolution_at_cutoff(&self, cutoff: f64) -> Result<f64> {
        let fpix = self.fpix_at_cutoff(cutoff)?;
        Ok(fpix_to_resolution(fpix, self.apix(), self.box_size()))
    }

    /// Resolution at 0.143 and 0.5
    pub fn summary(&self) -> Result<FscSummary> {
        let fpix_0143 = self.fpix_at_cutoff(CUTOFF_0143)?;
        let fpix_05 = self.fpix_at_cutoff(CUTOFF_05)?;
        let (apix, box_size) = (self.apix(), self.box_size());
        Ok(FscSummary {
            box_size,
            apix,
            fpix_0143,
            resolution_0143: fpix_to_resolution(fpix_0143, apix, box_size),
            fpix_05,
            resolution_05: fpix_to_resolution(fpix_05, apix, box_size),
        })
    }
}
