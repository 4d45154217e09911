//! Synthetic DE dataset fixture for tests
//!
//! Builds a tiny but fully valid export binary: eleven body series with
//! known low-order Chebyshev coefficients, one sub-interval per record and
//! two data records. Every expected value in the dataset-level tests can
//! therefore be written in closed form, without shipping a real ephemeris.

use byteorder::ByteOrder;
use std::io::Write;
use tempfile::NamedTempFile;

/// First covered Julian date
pub(crate) const START_JD: f64 = 2451536.5;
/// Days per data record
pub(crate) const STEP_DAYS: f64 = 32.0;
/// Data records in the fixture
pub(crate) const N_RECORDS: usize = 2;
/// Last covered Julian date
pub(crate) const END_JD: f64 = START_JD + STEP_DAYS * N_RECORDS as f64;
/// AU constant written to the header
pub(crate) const AU_KM: f64 = 149_597_870.7;
/// Earth/Moon mass ratio written to the header
pub(crate) const EMRAT: f64 = 81.300_56;
/// Chebyshev coefficients per component
pub(crate) const N_COEFFS: usize = 11;
/// Record size implied by the layout below
pub(crate) const RECORD_BYTES: usize = (2 + 11 * 3 * N_COEFFS) * 8;

/// Series carried by the fixture (Mercury .. geocentric Moon, Sun)
const N_SERIES: usize = 11;

/// Chebyshev coefficients [c0, c1, c2] for one (series, component) pair;
/// higher-order terms are zero
pub(crate) fn series_coeffs(series: usize, component: usize) -> [f64; 3] {
    let s = (series + 1) as f64;
    let c = component as f64;
    [1.0e6 * s + 1.0e4 * c, 10.0 * s + c, s + 0.5 * c]
}

/// Closed-form position (km) of a series component at normalized time `tc`
pub(crate) fn series_position(series: usize, component: usize, tc: f64) -> f64 {
    let [c0, c1, c2] = series_coeffs(series, component);
    c0 + c1 * tc + c2 * (2.0 * tc * tc - 1.0)
}

/// Closed-form rate (km/day) of a series component at normalized time `tc`
pub(crate) fn series_rate(series: usize, component: usize, tc: f64) -> f64 {
    let [_, c1, c2] = series_coeffs(series, component);
    // One sub-interval per record: d(tc)/d(jd) = 2 / STEP_DAYS
    (c1 + 4.0 * c2 * tc) * (2.0 / STEP_DAYS)
}

/// Normalized time within the fixture's record 0 for an epoch offset in
/// days from the dataset start
pub(crate) fn tc_for_offset(days: f64) -> f64 {
    2.0 * (days / STEP_DAYS) - 1.0
}

/// Serialize the fixture with the given byte order
pub(crate) fn dataset_bytes<E: ByteOrder>() -> Vec<u8> {
    let mut buf = vec![0u8; (2 + N_RECORDS) * RECORD_BYTES];

    // Title and constant-name slots are space-padded character fields
    for slot in buf[..2652].iter_mut() {
        *slot = b' ';
    }
    let title = b"Synthetic JPL DE ephemeris (swingby test fixture)";
    buf[..title.len()].copy_from_slice(title);
    for (i, name) in [b"DENUM ", b"AU    ", b"EMRAT "].iter().enumerate() {
        buf[252 + i * 6..252 + (i + 1) * 6].copy_from_slice(*name);
    }

    // SS, NCON, AU, EMRAT
    E::write_f64(&mut buf[2652..2660], START_JD);
    E::write_f64(&mut buf[2660..2668], END_JD);
    E::write_f64(&mut buf[2668..2676], STEP_DAYS);
    E::write_i32(&mut buf[2676..2680], 3);
    E::write_f64(&mut buf[2680..2688], AU_KM);
    E::write_f64(&mut buf[2688..2696], EMRAT);

    // Layout rows for the eleven body series; nutations and later rows
    // stay zero. The DE number follows the fixed table.
    for series in 0..N_SERIES {
        let offset = 2696 + series * 12;
        E::write_i32(&mut buf[offset..offset + 4], (3 + series * 3 * N_COEFFS) as i32);
        E::write_i32(&mut buf[offset + 4..offset + 8], N_COEFFS as i32);
        E::write_i32(&mut buf[offset + 8..offset + 12], 1);
    }
    E::write_i32(&mut buf[2840..2844], 440);

    // Constant values live in the second record
    for (i, value) in [440.0, AU_KM, EMRAT].iter().enumerate() {
        let offset = RECORD_BYTES + i * 8;
        E::write_f64(&mut buf[offset..offset + 8], *value);
    }

    // Data records: two epoch words then the coefficient sets
    for record in 0..N_RECORDS {
        let base = (2 + record) * RECORD_BYTES;
        E::write_f64(
            &mut buf[base..base + 8],
            START_JD + record as f64 * STEP_DAYS,
        );
        E::write_f64(
            &mut buf[base + 8..base + 16],
            START_JD + (record + 1) as f64 * STEP_DAYS,
        );
        for series in 0..N_SERIES {
            for component in 0..3 {
                let word = 2 + series * 3 * N_COEFFS + component * N_COEFFS;
                let offset = base + word * 8;
                for (i, c) in series_coeffs(series, component).iter().enumerate() {
                    E::write_f64(&mut buf[offset + i * 8..offset + (i + 1) * 8], *c);
                }
            }
        }
    }

    buf
}

/// Write the fixture to a temporary file and return its handle
pub(crate) fn dataset_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create fixture file");
    file.write_all(&dataset_bytes::<byteorder::LittleEndian>())
        .expect("write fixture file");
    file.flush().expect("flush fixture file");
    file
}
