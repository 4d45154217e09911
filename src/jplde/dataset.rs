//! Memory-mapped DE dataset access and raw state evaluation
//!
//! `DeFile` owns exactly one opened dataset: the file is opened, mapped
//! read-only and header-validated at construction, and the mapping is
//! released when the value drops, including on every error path. After
//! open, all access is read-only, so evaluation takes `&self` and the type
//! is safe to share across threads without locking.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use memmap2::Mmap;

use crate::errors::{io_err, EphemerisError, Result};
use crate::jplde::chebyshev;
use crate::jplde::header::{series_components, DeHeader, Endian};
use crate::jplde::ids;

/// Raw three-component vector, in the layer's native units
pub type Triple = [f64; 3];

/// An opened DE export binary dataset
pub struct DeFile {
    path: PathBuf,
    map: Mmap,
    header: DeHeader,
    n_records: usize,
    constants: Vec<(String, f64)>,
}

impl DeFile {
    /// Open, map and validate the dataset at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| io_err(&path, e))?;
        let map = unsafe { Mmap::map(&file) }.map_err(|e| io_err(&path, e))?;

        let header = DeHeader::parse(&map)?;

        // The SS range promises a record count; a shorter file is truncated
        let expected = header.expected_records();
        let available = (map.len() / header.record_bytes).saturating_sub(2);
        if available < expected {
            return Err(EphemerisError::InvalidFormat(format!(
                "dataset truncated: {} of {} data records present",
                available, expected
            )));
        }

        let constants = read_constants(&map, &header);

        log::debug!(
            "opened DE{} dataset {:?}: JD {}..{} step {} d, {} records, au = {} km",
            header.de_number,
            path,
            header.start_jd,
            header.end_jd,
            header.step_days,
            expected,
            header.au_km
        );

        Ok(DeFile {
            path,
            map,
            header,
            n_records: expected,
            constants,
        })
    }

    /// The parsed dataset header
    pub fn header(&self) -> &DeHeader {
        &self.header
    }

    /// Path the dataset was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The header constants, in declaration order
    pub fn constants(&self) -> &[(String, f64)] {
        &self.constants
    }

    /// Whether this dataset can evaluate the given body id
    pub fn has_body(&self, id: i32) -> bool {
        match required_series(id) {
            Some(series) => series
                .iter()
                .all(|&s| self.header.layout[s].is_present()),
            None => false,
        }
    }

    /// Position of `target` relative to `center` at `jd`, in AU
    pub fn position(&self, jd: f64, target: i32, center: i32) -> Result<Triple> {
        // The format stores position and rate coefficients together; the
        // rate half is computed and discarded here
        let (position, _) = self.state(jd, target, center)?;
        Ok(position)
    }

    /// Position (AU) and rate (AU/day) of `target` relative to `center`
    /// at `jd`
    ///
    /// Both ids follow the DE numbering. Earth and Moon are derived from
    /// the Earth-Moon barycenter and geocentric Moon series using the
    /// header's mass ratio. Results are deterministic for fixed inputs and
    /// never clamped: epochs outside the covered range and ids the dataset
    /// cannot evaluate are errors.
    pub fn state(&self, jd: f64, target: i32, center: i32) -> Result<(Triple, Triple)> {
        self.check_epoch(jd)?;
        for id in [target, center] {
            if !self.has_body(id) {
                return Err(EphemerisError::UnknownBody { id });
            }
        }

        if target == center {
            return Ok(([0.0; 3], [0.0; 3]));
        }

        let (record, t) = self.record_slot(jd);
        let (tp, tv) = self.barycentric_km(target, record, t);
        let (cp, cv) = self.barycentric_km(center, record, t);

        let au = self.header.au_km;
        let mut position = [0.0; 3];
        let mut rate = [0.0; 3];
        for c in 0..3 {
            position[c] = (tp[c] - cp[c]) / au;
            rate[c] = (tv[c] - cv[c]) / au;
        }

        Ok((position, rate))
    }

    fn check_epoch(&self, jd: f64) -> Result<()> {
        if !jd.is_finite() || jd < self.header.start_jd || jd > self.header.end_jd {
            return Err(EphemerisError::OutOfRange {
                jd,
                start_jd: self.header.start_jd,
                end_jd: self.header.end_jd,
            });
        }
        Ok(())
    }

    /// Locate the data record covering `jd` and the fractional position of
    /// `jd` within it, in [0, 1]
    fn record_slot(&self, jd: f64) -> (usize, f64) {
        let elapsed = jd - self.header.start_jd;
        let mut record = (elapsed / self.header.step_days).floor() as usize;
        // The final epoch belongs to the last record
        if record >= self.n_records {
            record = self.n_records - 1;
        }
        let t = (elapsed - record as f64 * self.header.step_days) / self.header.step_days;
        (record, t)
    }

    /// State of a body relative to the solar-system barycenter, in km and
    /// km/day (the dataset's native units)
    fn barycentric_km(&self, id: i32, record: usize, t: f64) -> (Triple, Triple) {
        match id {
            ids::SOLAR_SYSTEM_BARYCENTER => ([0.0; 3], [0.0; 3]),
            ids::SUN => self.series_state(10, record, t),
            ids::EARTH_MOON_BARYCENTER => self.series_state(2, record, t),
            ids::EARTH => self.earth_km(record, t),
            ids::MOON => {
                let (ep, ev) = self.earth_km(record, t);
                let (mp, mv) = self.series_state(9, record, t);
                (add(ep, mp), add(ev, mv))
            }
            // Mercury, Venus and Mars..Pluto map straight onto series 0..8
            _ => self.series_state(id as usize - 1, record, t),
        }
    }

    /// Earth from the Earth-Moon barycenter and the geocentric Moon:
    /// earth = emb - moon / (1 + emrat)
    fn earth_km(&self, record: usize, t: f64) -> (Triple, Triple) {
        let (bp, bv) = self.series_state(2, record, t);
        let (mp, mv) = self.series_state(9, record, t);
        let scale = 1.0 / (1.0 + self.header.emrat);

        let mut position = [0.0; 3];
        let mut rate = [0.0; 3];
        for c in 0..3 {
            position[c] = bp[c] - mp[c] * scale;
            rate[c] = bv[c] - mv[c] * scale;
        }
        (position, rate)
    }

    /// Interpolate one coefficient series at intra-record fraction `t`
    fn series_state(&self, series: usize, record: usize, t: f64) -> (Triple, Triple) {
        let layout = self.header.layout[series];
        let n_coeffs = layout.n_coeffs as usize;
        let n_subs = layout.n_subintervals as usize;
        let components = series_components(series);

        // Pick the sub-interval and normalize into [-1, 1]
        let scaled = t * n_subs as f64;
        let sub = (scaled.floor() as usize).min(n_subs - 1);
        let tc = 2.0 * (scaled - sub as f64) - 1.0;
        // d(tc)/d(jd), for rescaling derivatives to per-day rates
        let dscale = 2.0 * n_subs as f64 / self.header.step_days;

        let base = layout.offset as usize - 1 + sub * n_coeffs * components;

        let mut position = [0.0; 3];
        let mut rate = [0.0; 3];
        let mut coeffs = vec![0.0; n_coeffs];
        for c in 0..components.min(3) {
            self.read_doubles(record, base + c * n_coeffs, &mut coeffs);
            position[c] = chebyshev::evaluate(&coeffs, tc);
            rate[c] = chebyshev::derivative(&coeffs, tc) * dscale;
        }
        (position, rate)
    }

    /// Read consecutive doubles from a data record into `out`
    ///
    /// `index` is 0-based within the record; data records start two records
    /// past the file head (header block, then constant block).
    fn read_doubles(&self, record: usize, index: usize, out: &mut [f64]) {
        let offset = (record + 2) * self.header.record_bytes + index * 8;
        let bytes = &self.map[offset..offset + out.len() * 8];
        match self.header.endian {
            Endian::Big => BigEndian::read_f64_into(bytes, out),
            Endian::Little => LittleEndian::read_f64_into(bytes, out),
        }
    }
}

impl fmt::Debug for DeFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeFile")
            .field("path", &self.path)
            .field("de_number", &self.header.de_number)
            .field("start_jd", &self.header.start_jd)
            .field("end_jd", &self.header.end_jd)
            .field("n_records", &self.n_records)
            .finish()
    }
}

/// The coefficient series a body id needs, or None for ids outside the
/// numbering. The barycenter needs nothing; Earth and Moon need both the
/// EMB and geocentric-Moon series.
fn required_series(id: i32) -> Option<&'static [usize]> {
    match id {
        ids::MERCURY => Some(&[0]),
        ids::VENUS => Some(&[1]),
        ids::EARTH => Some(&[2, 9]),
        ids::MARS => Some(&[3]),
        ids::JUPITER => Some(&[4]),
        ids::SATURN => Some(&[5]),
        ids::URANUS => Some(&[6]),
        ids::NEPTUNE => Some(&[7]),
        ids::PLUTO => Some(&[8]),
        ids::MOON => Some(&[2, 9]),
        ids::SUN => Some(&[10]),
        ids::SOLAR_SYSTEM_BARYCENTER => Some(&[]),
        ids::EARTH_MOON_BARYCENTER => Some(&[2]),
        _ => None,
    }
}

fn add(a: Triple, b: Triple) -> Triple {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Read the (name, value) constant table from the second file record
fn read_constants(map: &Mmap, header: &DeHeader) -> Vec<(String, f64)> {
    use crate::jplde::header::{constant_names, read_f64};

    let names = constant_names(map, header.n_constants);
    let values_offset = header.record_bytes;

    names
        .into_iter()
        .enumerate()
        .filter(|(i, _)| values_offset + (i + 1) * 8 <= map.len())
        .map(|(i, name)| (name, read_f64(map, values_offset + i * 8, header.endian)))
        .collect()
}
