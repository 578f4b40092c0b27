/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Registry of named euler angle conventions
//!
//! Names are case-insensitive. The built-in table covers the cryo-EM
//! packages in common use; callers may register more without touching the
//! conversion engine.

use super::convention::{ActsOn, Convention};
use super::errors::{EulerError, Result};
use crate::rotation::{AxisOrder, Composition};
use log::debug;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Process-wide, read-only registry of the built-in software conventions
pub static KNOWN_CONVENTIONS: Lazy<ConventionRegistry> = Lazy::new(ConventionRegistry::known_software);

/// Mapping from convention name to convention
#[derive(Debug, Clone, Default)]
pub struct ConventionRegistry {
    conventions: BTreeMap<String, Convention>,
}

impl ConventionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in software conventions
    ///
    /// * `dynamo` - ZXZ intrinsic, `[tdrot, tilt, narot]` rotating the
    ///   template onto the particle
    /// * `relion` - ZYZ `[rot, tilt, psi]` in the Heymann, Chagoyen and
    ///   Belnap (2005) standard, handled as extrinsic rotations of the reference
    /// * `warp` - same as `relion`, Warp reads and writes RELION STAR files
    /// * `emclarity` - ZXZ intrinsic rotations of the particle coordinate system
    pub fn known_software() -> Self {
        let relion = Convention::new(AxisOrder::ZYZ, Composition::Extrinsic, ActsOn::Reference);

        let mut registry = Self::new();
        registry.register(
            "dynamo",
            Convention::new(AxisOrder::ZXZ, Composition::Intrinsic, ActsOn::Reference),
        );
        registry.register("relion", relion);
        registry.register("warp", relion);
        registry.register(
            "emclarity",
            Convention::new(AxisOrder::ZXZ, Composition::Intrinsic, ActsOn::Particle),
        );
        registry
    }

    /// Register a convention under `name`, returning any convention it replaced
    pub fn register(&mut self, name: &str, convention: Convention) -> Option<Convention> {
        debug!("registering euler angle convention '{}': {}", name, convention);
        self.conventions.insert(normalize(name), convention)
    }

    /// Look up a convention by name
    ///
    /// # Errors
    ///
    /// `UnknownConvention` if no convention is registered under `name`.
    pub fn get(&self, name: &str) -> Result<&Convention> {
        self.conventions
            .get(&normalize(name))
            .ok_or_else(|| EulerError::UnknownConvention(name.to_string()))
    }

    /// Whether a convention is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.conventions.contains_key(&normalize(name))
    }

    /// Registered names and conventions, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Convention)> {
        self.conventions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.conventions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conventions.is_empty()
    }

    /// Register all conventions of a JSON object
    ///
    /// The expected layout is
    /// `{"name": {"axis_order": "ZXZ", "composition": "intrinsic", "acts_on": "reference"}}`.
    /// Nothing is registered if any entry is malformed.
    ///
    /// # Returns
    ///
    /// The number of conventions registered
    pub fn extend_from_json(&mut self, json: &str) -> Result<usize> {
        let parsed: BTreeMap<String, Convention> = serde_json::from_str(json)
            .map_err(|e| EulerError::InvalidConvention(e.to_string()))?;

        let count = parsed.len();
        for (name, convention) in parsed {
            self.register(&name, convention);
        }
        Ok(count)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
