//! The ephemeris source: one opened dataset, state vectors in km and km/s
//!
//! [`EphemerisSource`] owns exactly one opened DE dataset and turns the
//! format layer's raw AU-valued states into physically meaningful
//! kilometers and kilometers per second. It is the single shared resource
//! of the engine: many [`crate::bodies::CelestialBody`] values may hold an
//! `Arc` to the same source.
//!
//! # Concurrency
//!
//! The dataset is memory-mapped read-only at open and never mutated, and
//! evaluation keeps no per-query state, so `EphemerisSource` is `Send +
//! Sync` and concurrent queries from any number of threads need no
//! locking. Queries are deterministic, bounded CPU-only computations; only
//! `open` performs I/O.

use std::path::Path;

use nalgebra::Vector3;

use crate::constants::DAY_S;
use crate::errors::Result;
use crate::jplde::DeFile;

/// A shared handle to one opened ephemeris dataset
///
/// Opened (and header-validated) at construction; the underlying mapping
/// is released exactly once, when the value drops.
pub struct EphemerisSource {
    dataset: DeFile,
    /// Kilometers per AU, cached from the dataset header at open
    au_km: f64,
}

impl EphemerisSource {
    /// Open and validate the dataset at `path`
    ///
    /// Fails if the file is missing, unreadable, or its header does not
    /// validate; a failed open is terminal and never retried here.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let dataset = DeFile::open(path)?;
        let au_km = dataset.header().au_km;
        Ok(EphemerisSource { dataset, au_km })
    }

    /// Kilometers per astronomical unit, as read from the dataset header
    pub fn au_km(&self) -> f64 {
        self.au_km
    }

    /// The Julian date range this dataset covers
    pub fn jd_range(&self) -> (f64, f64) {
        let header = self.dataset.header();
        (header.start_jd, header.end_jd)
    }

    /// The DE release number of the dataset (e.g. 440)
    pub fn de_number(&self) -> i32 {
        self.dataset.header().de_number
    }

    /// Whether this source can evaluate the given body id
    pub fn recognizes(&self, id: i32) -> bool {
        self.dataset.has_body(id)
    }

    /// The underlying dataset
    pub fn dataset(&self) -> &DeFile {
        &self.dataset
    }

    /// Position of `target` relative to `reference` at `jd`, in km
    ///
    /// Each raw AU component is scaled by the cached AU→km constant.
    /// Epochs outside the covered range and unrecognized ids are errors,
    /// never clamped or defaulted.
    pub fn evaluate_position(
        &self,
        jd: f64,
        reference: i32,
        target: i32,
    ) -> Result<Vector3<f64>> {
        let raw = self.dataset.position(jd, target, reference)?;
        Ok(Vector3::new(raw[0], raw[1], raw[2]) * self.au_km)
    }

    /// Position (km) and velocity (km/s) of `target` relative to
    /// `reference` at `jd`
    ///
    /// The raw state is in AU and AU/day. Position components are scaled
    /// by the AU→km constant; velocity components are scaled by the same
    /// constant and by the 86400 seconds-per-day factor:
    /// `velocity = raw * au_km * 86400`.
    pub fn evaluate_state(
        &self,
        jd: f64,
        reference: i32,
        target: i32,
    ) -> Result<(Vector3<f64>, Vector3<f64>)> {
        let (raw_position, raw_rate) = self.dataset.state(jd, target, reference)?;

        let position = Vector3::new(raw_position[0], raw_position[1], raw_position[2]) * self.au_km;
        let velocity = Vector3::new(raw_rate[0], raw_rate[1], raw_rate[2]) * self.au_km * DAY_S;

        Ok((position, velocity))
    }
}
