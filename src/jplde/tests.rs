//! Dataset-level tests against the synthetic fixture
//!
//! The fixture's coefficients are low-order polynomials, so every expected
//! state below is a closed form evaluated by hand.

use std::io::Write;

use approx::assert_relative_eq;
use byteorder::LittleEndian;

use super::dataset::DeFile;
use super::ids;
use super::testutil as fx;
use crate::errors::EphemerisError;

#[test]
fn test_open_parses_header_and_constants() {
    let file = fx::dataset_file();
    let de = DeFile::open(file.path()).unwrap();

    let header = de.header();
    assert_eq!(header.de_number, 440);
    assert_eq!(header.start_jd, fx::START_JD);
    assert_eq!(header.end_jd, fx::END_JD);
    assert_eq!(header.au_km, fx::AU_KM);
    assert_eq!(header.record_bytes, fx::RECORD_BYTES);

    assert_eq!(
        de.constants(),
        &[
            ("DENUM".to_string(), 440.0),
            ("AU".to_string(), fx::AU_KM),
            ("EMRAT".to_string(), fx::EMRAT),
        ]
    );
}

#[test]
fn test_missing_file_is_open_error() {
    let err = DeFile::open("/nonexistent/de440.bin").unwrap_err();
    assert!(matches!(err, EphemerisError::DatasetOpen { .. }));
}

#[test]
fn test_truncated_dataset_rejected() {
    // Keep the header and constants but drop the second data record
    let bytes = fx::dataset_bytes::<LittleEndian>();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes[..3 * fx::RECORD_BYTES + 100]).unwrap();
    file.flush().unwrap();

    let err = DeFile::open(file.path()).unwrap_err();
    assert!(matches!(err, EphemerisError::InvalidFormat(_)));
}

#[test]
fn test_position_matches_closed_form() {
    let file = fx::dataset_file();
    let de = DeFile::open(file.path()).unwrap();

    // Mid-record epoch: tc = 0 within record 0
    let jd = fx::START_JD + 16.0;
    let position = de
        .position(jd, ids::MERCURY, ids::SOLAR_SYSTEM_BARYCENTER)
        .unwrap();

    for (c, &value) in position.iter().enumerate() {
        let expected_au = fx::series_position(0, c, 0.0) / fx::AU_KM;
        assert_relative_eq!(value, expected_au, epsilon = 1e-12);
    }
}

#[test]
fn test_state_rate_in_au_per_day() {
    let file = fx::dataset_file();
    let de = DeFile::open(file.path()).unwrap();

    let offset = 4.0;
    let tc = fx::tc_for_offset(offset);
    let (_, rate) = de
        .state(fx::START_JD + offset, ids::JUPITER, ids::SOLAR_SYSTEM_BARYCENTER)
        .unwrap();

    for (c, &value) in rate.iter().enumerate() {
        let expected = fx::series_rate(4, c, tc) / fx::AU_KM;
        assert_relative_eq!(value, expected, epsilon = 1e-12);
    }
}

#[test]
fn test_earth_derived_from_emb_and_moon() {
    let file = fx::dataset_file();
    let de = DeFile::open(file.path()).unwrap();

    let jd = fx::START_JD + 16.0;
    let position = de
        .position(jd, ids::EARTH, ids::SOLAR_SYSTEM_BARYCENTER)
        .unwrap();

    let scale = 1.0 / (1.0 + fx::EMRAT);
    for (c, &value) in position.iter().enumerate() {
        let emb = fx::series_position(2, c, 0.0);
        let moon = fx::series_position(9, c, 0.0);
        let expected = (emb - moon * scale) / fx::AU_KM;
        assert_relative_eq!(value, expected, epsilon = 1e-12);
    }
}

#[test]
fn test_moon_relative_to_earth_is_geocentric_series() {
    let file = fx::dataset_file();
    let de = DeFile::open(file.path()).unwrap();

    // moon_ssb - earth_ssb collapses to the geocentric Moon series
    let jd = fx::START_JD + 16.0;
    let position = de.position(jd, ids::MOON, ids::EARTH).unwrap();

    for (c, &value) in position.iter().enumerate() {
        let expected = fx::series_position(9, c, 0.0) / fx::AU_KM;
        assert_relative_eq!(value, expected, epsilon = 1e-12);
    }
}

#[test]
fn test_second_record_and_inclusive_end() {
    let file = fx::dataset_file();
    let de = DeFile::open(file.path()).unwrap();

    // Mid-point of record 1
    let jd = fx::START_JD + fx::STEP_DAYS + 16.0;
    let position = de
        .position(jd, ids::SATURN, ids::SOLAR_SYSTEM_BARYCENTER)
        .unwrap();
    for (c, &value) in position.iter().enumerate() {
        let expected = fx::series_position(5, c, 0.0) / fx::AU_KM;
        assert_relative_eq!(value, expected, epsilon = 1e-12);
    }

    // The final covered epoch evaluates (tc = 1 in the last record)
    let position = de
        .position(fx::END_JD, ids::SATURN, ids::SOLAR_SYSTEM_BARYCENTER)
        .unwrap();
    for (c, &value) in position.iter().enumerate() {
        let expected = fx::series_position(5, c, 1.0) / fx::AU_KM;
        assert_relative_eq!(value, expected, epsilon = 1e-12);
    }
}

#[test]
fn test_epoch_outside_range_rejected() {
    let file = fx::dataset_file();
    let de = DeFile::open(file.path()).unwrap();

    for jd in [fx::START_JD - 1.0, fx::END_JD + 1.0, f64::NAN] {
        let err = de
            .position(jd, ids::VENUS, ids::SOLAR_SYSTEM_BARYCENTER)
            .unwrap_err();
        match err {
            EphemerisError::OutOfRange {
                jd: reported,
                start_jd,
                end_jd,
            } => {
                assert!(reported.is_nan() || reported == jd);
                assert_eq!(start_jd, fx::START_JD);
                assert_eq!(end_jd, fx::END_JD);
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
    }
}

#[test]
fn test_unknown_body_rejected() {
    let file = fx::dataset_file();
    let de = DeFile::open(file.path()).unwrap();
    let jd = fx::START_JD + 16.0;

    for id in [0, 14, 99, -3] {
        let err = de.position(jd, id, ids::SOLAR_SYSTEM_BARYCENTER).unwrap_err();
        assert!(matches!(err, EphemerisError::UnknownBody { id: bad } if bad == id));
    }

    // The center id is validated too
    let err = de.position(jd, ids::VENUS, 99).unwrap_err();
    assert!(matches!(err, EphemerisError::UnknownBody { id: 99 }));
}

#[test]
fn test_reference_symmetry() {
    let file = fx::dataset_file();
    let de = DeFile::open(file.path()).unwrap();

    let jd = fx::START_JD + 7.25;
    let forward = de.position(jd, ids::MARS, ids::SUN).unwrap();
    let backward = de.position(jd, ids::SUN, ids::MARS).unwrap();

    // Same relative vector with opposite sign, bit for bit: both calls
    // subtract the same two barycentric states
    for c in 0..3 {
        assert_eq!(forward[c], -backward[c]);
    }
}

#[test]
fn test_same_body_is_zero() {
    let file = fx::dataset_file();
    let de = DeFile::open(file.path()).unwrap();

    let (position, rate) = de
        .state(fx::START_JD + 3.0, ids::NEPTUNE, ids::NEPTUNE)
        .unwrap();
    assert_eq!(position, [0.0; 3]);
    assert_eq!(rate, [0.0; 3]);
}

#[test]
fn test_evaluation_is_deterministic() {
    let file = fx::dataset_file();
    let de = DeFile::open(file.path()).unwrap();

    let jd = fx::START_JD + 11.375;
    let first = de.state(jd, ids::EARTH, ids::SUN).unwrap();
    let second = de.state(jd, ids::EARTH, ids::SUN).unwrap();

    // Bit-identical, not merely close
    assert_eq!(first, second);
}

#[test]
fn test_has_body() {
    let file = fx::dataset_file();
    let de = DeFile::open(file.path()).unwrap();

    for id in 1..=13 {
        assert!(de.has_body(id), "id {} should be evaluable", id);
    }
    assert!(!de.has_body(0));
    assert!(!de.has_body(14));
}
