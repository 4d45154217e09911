//! The DE export fixed header block
//!
//! The first record of a DE export binary holds three 84-character title
//! lines, 400 six-character constant names, the covered Julian date range
//! and record step (SS), the constant count (NCON), the AU-in-km constant,
//! the Earth/Moon mass ratio (EMRAT), the per-series coefficient layout
//! table (IPT) and the DE release number. The second record holds the NCON
//! constant values. Data records follow, each `record_bytes` long.
//!
//! Exports exist in both little-endian and big-endian flavors; the byte
//! order is not flagged in the file, so it is detected by checking which
//! interpretation yields plausible header fields.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::constants::AU_KM_IAU;
use crate::errors::{EphemerisError, Result};

/// Length of one title line (14 six-character words)
const TTL_LINE_BYTES: usize = 84;
/// Number of title lines
const TTL_LINES: usize = 3;
/// Constant-name slots in the fixed header area
const CNAM_SLOTS: usize = 400;
/// Length of one constant name
const NAME_BYTES: usize = 6;

/// Byte offsets of the fixed header fields
const CNAM_OFFSET: usize = TTL_LINES * TTL_LINE_BYTES; // 252
const SS_OFFSET: usize = CNAM_OFFSET + CNAM_SLOTS * NAME_BYTES; // 2652
const NCON_OFFSET: usize = SS_OFFSET + 24; // 2676
const AU_OFFSET: usize = NCON_OFFSET + 4; // 2680
const EMRAT_OFFSET: usize = AU_OFFSET + 8; // 2688
const IPT_OFFSET: usize = EMRAT_OFFSET + 8; // 2696
const NUMDE_OFFSET: usize = IPT_OFFSET + 12 * 12; // 2840
const LPT_OFFSET: usize = NUMDE_OFFSET + 4; // 2844
const EXTRA_NAMES_OFFSET: usize = LPT_OFFSET + 12; // 2856

/// Smallest header a well-formed export can have; also a lower bound on
/// the record size, since the header must fit in one record
pub const MIN_HEADER_BYTES: usize = EXTRA_NAMES_OFFSET;

/// Number of coefficient series a record can carry (planets through TT-TDB)
pub const SERIES_COUNT: usize = 15;

/// Dataset byte order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// Coefficient layout of one series within a data record
///
/// `offset` is the 1-based double-word index of the series' first
/// coefficient (the record's two epoch words are indices 1 and 2).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeriesLayout {
    /// 1-based double-word offset into the record
    pub offset: u32,
    /// Chebyshev coefficients per component
    pub n_coeffs: u32,
    /// Sub-intervals per record
    pub n_subintervals: u32,
}

impl SeriesLayout {
    /// Whether the dataset carries this series at all
    pub fn is_present(&self) -> bool {
        self.n_coeffs > 0 && self.n_subintervals > 0
    }
}

/// Number of components interpolated for a series
pub fn series_components(series: usize) -> usize {
    match series {
        0..=10 => 3, // Mercury..Pluto, geocentric Moon, Sun
        11 => 2,     // nutation angles
        12 | 13 => 3, // librations, lunar mantle angular velocity
        14 => 1,     // TT-TDB offsets
        _ => 0,
    }
}

/// Parsed and validated DE export header
#[derive(Clone, Debug)]
pub struct DeHeader {
    /// First title line, trimmed (e.g. "JPL Planetary Ephemeris DE440/LE440")
    pub title: String,
    /// DE release number (e.g. 440)
    pub de_number: i32,
    /// First Julian date covered
    pub start_jd: f64,
    /// Last Julian date covered
    pub end_jd: f64,
    /// Days spanned by one data record
    pub step_days: f64,
    /// Kilometers per astronomical unit, as stored in this dataset
    pub au_km: f64,
    /// Earth/Moon mass ratio
    pub emrat: f64,
    /// Number of header constants
    pub n_constants: u32,
    /// Per-series coefficient layout
    pub layout: [SeriesLayout; SERIES_COUNT],
    /// Detected byte order
    pub endian: Endian,
    /// Size of one record in bytes, derived from the layout table
    pub record_bytes: usize,
}

impl DeHeader {
    /// Parse and validate a header from the start of a mapped dataset
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_HEADER_BYTES {
            return Err(EphemerisError::InvalidFormat(format!(
                "header truncated: {} bytes, need at least {}",
                bytes.len(),
                MIN_HEADER_BYTES
            )));
        }

        let endian = detect_endian(bytes)?;

        let title = read_name(bytes, 0, TTL_LINE_BYTES);
        let start_jd = read_f64(bytes, SS_OFFSET, endian);
        let end_jd = read_f64(bytes, SS_OFFSET + 8, endian);
        let step_days = read_f64(bytes, SS_OFFSET + 16, endian);
        let n_constants = read_i32(bytes, NCON_OFFSET, endian);
        let au_km = read_f64(bytes, AU_OFFSET, endian);
        let emrat = read_f64(bytes, EMRAT_OFFSET, endian);
        let de_number = read_i32(bytes, NUMDE_OFFSET, endian);

        // IPT rows 0..=11 sit in the fixed table, row 12 (librations)
        // follows the DE number
        let mut layout = [SeriesLayout::default(); SERIES_COUNT];
        for (series, slot) in layout.iter_mut().take(12).enumerate() {
            *slot = read_layout(bytes, IPT_OFFSET + series * 12, endian);
        }
        layout[12] = read_layout(bytes, LPT_OFFSET, endian);

        // Datasets with more than 400 constants append the extra names
        // after the fixed block, then rows 13 and 14 of the layout table
        if n_constants > CNAM_SLOTS as i32 {
            let extra = (n_constants as usize - CNAM_SLOTS) * NAME_BYTES;
            let offset = EXTRA_NAMES_OFFSET + extra;
            if offset + 24 <= bytes.len() {
                layout[13] = read_layout(bytes, offset, endian);
                layout[14] = read_layout(bytes, offset + 12, endian);
            }
        }

        let header = DeHeader {
            title,
            de_number,
            start_jd,
            end_jd,
            step_days,
            au_km,
            emrat,
            n_constants: n_constants as u32,
            layout,
            endian,
            record_bytes: record_size_bytes(&layout),
        };
        header.validate()?;

        Ok(header)
    }

    /// Number of data records the SS range promises
    pub fn expected_records(&self) -> usize {
        ((self.end_jd - self.start_jd) / self.step_days).round() as usize
    }

    /// Double-words per record
    pub fn record_doubles(&self) -> usize {
        self.record_bytes / 8
    }

    fn validate(&self) -> Result<()> {
        if !self.start_jd.is_finite()
            || !self.end_jd.is_finite()
            || self.start_jd >= self.end_jd
        {
            return Err(EphemerisError::InvalidFormat(format!(
                "implausible epoch range {}..{}",
                self.start_jd, self.end_jd
            )));
        }
        if self.step_days.is_nan()
            || self.step_days <= 0.0
            || self.step_days > (self.end_jd - self.start_jd)
        {
            return Err(EphemerisError::InvalidFormat(format!(
                "implausible record step of {} days",
                self.step_days
            )));
        }
        // The AU constant differs between releases only far beyond the km
        // digit; anything outside a factor-of-two band is corruption
        if !(AU_KM_IAU / 2.0..AU_KM_IAU * 2.0).contains(&self.au_km) {
            return Err(EphemerisError::InvalidFormat(format!(
                "implausible AU constant {} km",
                self.au_km
            )));
        }
        if !(1.0..1000.0).contains(&self.emrat) {
            return Err(EphemerisError::InvalidFormat(format!(
                "implausible Earth/Moon mass ratio {}",
                self.emrat
            )));
        }
        if self.record_bytes < MIN_HEADER_BYTES {
            return Err(EphemerisError::InvalidFormat(format!(
                "record size {} bytes cannot hold the header",
                self.record_bytes
            )));
        }

        // Every present series must fit inside a record
        let doubles = self.record_doubles();
        for (series, slot) in self.layout.iter().enumerate() {
            if !slot.is_present() {
                continue;
            }
            let needed = slot.offset as usize
                + slot.n_subintervals as usize
                    * slot.n_coeffs as usize
                    * series_components(series);
            if slot.offset < 3 || needed - 1 > doubles {
                return Err(EphemerisError::InvalidFormat(format!(
                    "series {} layout {:?} overruns the {}-double record",
                    series, slot, doubles
                )));
            }
        }

        Ok(())
    }
}

/// Compute the record size in bytes from the layout table
///
/// A record holds two epoch doubles plus, for each series, one Chebyshev
/// coefficient set per component per sub-interval.
pub fn record_size_bytes(layout: &[SeriesLayout; SERIES_COUNT]) -> usize {
    let mut words: usize = 4; // the two epoch doubles, in 32-bit words
    for (series, slot) in layout.iter().enumerate() {
        words += 2
            * slot.n_subintervals as usize
            * slot.n_coeffs as usize
            * series_components(series);
    }
    words * 4
}

/// Read the constant names the header declares (fixed slots plus any
/// overflow names appended after the layout table)
pub fn constant_names(bytes: &[u8], n_constants: u32) -> Vec<String> {
    let mut names = Vec::with_capacity(n_constants as usize);
    for i in 0..(n_constants as usize).min(CNAM_SLOTS) {
        names.push(read_name(bytes, CNAM_OFFSET + i * NAME_BYTES, NAME_BYTES));
    }
    for i in 0..(n_constants as usize).saturating_sub(CNAM_SLOTS) {
        let offset = EXTRA_NAMES_OFFSET + i * NAME_BYTES;
        if offset + NAME_BYTES > bytes.len() {
            break;
        }
        names.push(read_name(bytes, offset, NAME_BYTES));
    }
    names
}

/// Decide the dataset's byte order from field plausibility: the constant
/// count is a small positive integer and the SS epochs are ordered Julian
/// dates in either valid interpretation
fn detect_endian(bytes: &[u8]) -> Result<Endian> {
    for endian in [Endian::Little, Endian::Big] {
        let ncon = read_i32(bytes, NCON_OFFSET, endian);
        let start = read_f64(bytes, SS_OFFSET, endian);
        let end = read_f64(bytes, SS_OFFSET + 8, endian);
        let step = read_f64(bytes, SS_OFFSET + 16, endian);

        let plausible_ncon = (1..=10_000).contains(&ncon);
        let plausible_ss = start.is_finite()
            && end.is_finite()
            && step.is_finite()
            && start > 0.0
            && start < end
            && step > 0.0;

        if plausible_ncon && plausible_ss {
            return Ok(endian);
        }
    }

    Err(EphemerisError::InvalidFormat(
        "could not determine byte order from header fields".to_string(),
    ))
}

pub(crate) fn read_f64(bytes: &[u8], offset: usize, endian: Endian) -> f64 {
    match endian {
        Endian::Big => BigEndian::read_f64(&bytes[offset..offset + 8]),
        Endian::Little => LittleEndian::read_f64(&bytes[offset..offset + 8]),
    }
}

pub(crate) fn read_i32(bytes: &[u8], offset: usize, endian: Endian) -> i32 {
    match endian {
        Endian::Big => BigEndian::read_i32(&bytes[offset..offset + 4]),
        Endian::Little => LittleEndian::read_i32(&bytes[offset..offset + 4]),
    }
}

fn read_layout(bytes: &[u8], offset: usize, endian: Endian) -> SeriesLayout {
    SeriesLayout {
        offset: read_i32(bytes, offset, endian).max(0) as u32,
        n_coeffs: read_i32(bytes, offset + 4, endian).max(0) as u32,
        n_subintervals: read_i32(bytes, offset + 8, endian).max(0) as u32,
    }
}

fn read_name(bytes: &[u8], offset: usize, len: usize) -> String {
    String::from_utf8_lossy(&bytes[offset..offset + len])
        .trim()
        .to_string()
}
