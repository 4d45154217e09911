//! Standard DE body numbering and names
//!
//! The DE convention numbers bodies with small integers: Mercury=1 through
//! Pluto=9, Moon=10, Sun=11, Solar System Barycenter=12 and Earth-Moon
//! Barycenter=13. The crate accepts this mapping as given rather than
//! inventing its own.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Mercury
pub const MERCURY: i32 = 1;
/// Venus
pub const VENUS: i32 = 2;
/// Earth
pub const EARTH: i32 = 3;
/// Mars
pub const MARS: i32 = 4;
/// Jupiter
pub const JUPITER: i32 = 5;
/// Saturn
pub const SATURN: i32 = 6;
/// Uranus
pub const URANUS: i32 = 7;
/// Neptune
pub const NEPTUNE: i32 = 8;
/// Pluto
pub const PLUTO: i32 = 9;
/// Moon (of Earth)
pub const MOON: i32 = 10;
/// Sun
pub const SUN: i32 = 11;
/// Solar System Barycenter
pub const SOLAR_SYSTEM_BARYCENTER: i32 = 12;
/// Earth-Moon Barycenter
pub const EARTH_MOON_BARYCENTER: i32 = 13;

/// Pairs of (id, name); the first entry for an id is its canonical name
const BODY_NAME_PAIRS: &[(i32, &str)] = &[
    (MERCURY, "Mercury"),
    (VENUS, "Venus"),
    (EARTH, "Earth"),
    (MARS, "Mars"),
    (JUPITER, "Jupiter"),
    (SATURN, "Saturn"),
    (URANUS, "Uranus"),
    (NEPTUNE, "Neptune"),
    (PLUTO, "Pluto"),
    (MOON, "Moon"),
    (SUN, "Sun"),
    (SOLAR_SYSTEM_BARYCENTER, "Solar System Barycenter"),
    (SOLAR_SYSTEM_BARYCENTER, "SSB"),
    (EARTH_MOON_BARYCENTER, "Earth-Moon Barycenter"),
    (EARTH_MOON_BARYCENTER, "EMB"),
];

lazy_static! {
    /// Map from body id to canonical name
    static ref BODY_NAMES: HashMap<i32, &'static str> = {
        let mut m = HashMap::new();
        for &(id, name) in BODY_NAME_PAIRS.iter() {
            m.entry(id).or_insert(name);
        }
        m
    };

    /// Map from lowercase body name (canonical or alias) to id
    static ref BODY_IDS: HashMap<String, i32> = {
        let mut m = HashMap::new();
        for &(id, name) in BODY_NAME_PAIRS.iter() {
            m.insert(name.to_lowercase(), id);
        }
        m
    };
}

/// Get the canonical name of a body given its id
pub fn body_name(id: i32) -> Option<&'static str> {
    BODY_NAMES.get(&id).copied()
}

/// Get the id of a body given its name (case-insensitive, aliases allowed)
pub fn body_id(name: &str) -> Option<i32> {
    BODY_IDS.get(&name.to_lowercase()).copied()
}

/// Whether `id` is inside the DE numbering at all
pub fn in_numbering(id: i32) -> bool {
    (MERCURY..=EARTH_MOON_BARYCENTER).contains(&id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_de_numbering() {
        assert_eq!(MERCURY, 1);
        assert_eq!(EARTH, 3);
        assert_eq!(PLUTO, 9);
        assert_eq!(MOON, 10);
        assert_eq!(SUN, 11);
        assert_eq!(SOLAR_SYSTEM_BARYCENTER, 12);
        assert_eq!(EARTH_MOON_BARYCENTER, 13);
    }

    #[test]
    fn test_name_lookup() {
        assert_eq!(body_name(EARTH), Some("Earth"));
        assert_eq!(body_name(SOLAR_SYSTEM_BARYCENTER), Some("Solar System Barycenter"));
        assert_eq!(body_name(99), None);

        assert_eq!(body_id("earth"), Some(EARTH));
        assert_eq!(body_id("SSB"), Some(SOLAR_SYSTEM_BARYCENTER));
        assert_eq!(body_id("emb"), Some(EARTH_MOON_BARYCENTER));
        assert_eq!(body_id("Phobos"), None);
    }

    #[test]
    fn test_in_numbering() {
        for id in 1..=13 {
            assert!(in_numbering(id));
        }
        assert!(!in_numbering(0));
        assert!(!in_numbering(14));
        assert!(!in_numbering(-1));
    }
}
