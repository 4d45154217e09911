//! Celestial body model
//!
//! A [`CelestialBody`] is a named body with static physical attributes,
//! bound to a shared [`EphemerisSource`] and to a caller-chosen reference
//! body. Its kinematic queries are thin: delegate to the source, propagate
//! errors unchanged.
//!
//! There is deliberately no default reference body. Whether positions
//! should be barycentric ([`ids::SOLAR_SYSTEM_BARYCENTER`]) or
//! heliocentric ([`ids::SUN`]) is a modeling decision, so every
//! constructor takes the reference id explicitly.

use std::fmt;
use std::sync::Arc;

use nalgebra::Vector3;

use crate::constants::G;
use crate::ephemeris::EphemerisSource;
use crate::errors::{EphemerisError, Result};
use crate::jplde::ids;

/// A solar-system body bound to an ephemeris source
///
/// All fields are set at construction and never mutated. The source is
/// held through an `Arc`, so a body can never outlive the dataset it
/// queries.
#[derive(Clone)]
pub struct CelestialBody {
    /// Display name
    pub name: String,
    /// Mass in kg (informational)
    pub mass: f64,
    /// Mean radius in km (informational)
    pub radius: f64,
    /// Display color as packed 0xRRGGBB
    pub color: u32,
    /// This body's id within the ephemeris dataset (DE numbering)
    pub ephemeris_id: i32,
    reference_id: i32,
    source: Arc<EphemerisSource>,
}

impl CelestialBody {
    /// Create a body with all attributes set
    ///
    /// `reference_id` is the body every kinematic query is taken relative
    /// to; pass [`ids::SUN`] for heliocentric or
    /// [`ids::SOLAR_SYSTEM_BARYCENTER`] for barycentric results.
    pub fn new(
        name: &str,
        mass: f64,
        radius: f64,
        color: u32,
        ephemeris_id: i32,
        reference_id: i32,
        source: Arc<EphemerisSource>,
    ) -> Self {
        Self {
            name: name.to_string(),
            mass,
            radius,
            color,
            ephemeris_id,
            reference_id,
            source,
        }
    }

    /// The reference body id queries are taken relative to
    pub fn reference_id(&self) -> i32 {
        self.reference_id
    }

    /// The ephemeris source this body is bound to
    pub fn source(&self) -> &Arc<EphemerisSource> {
        &self.source
    }

    /// Standard gravitational parameter G·M in m³/s²
    pub fn mu(&self) -> f64 {
        G * self.mass
    }

    /// Position relative to the configured reference body at `jd`, in km
    pub fn position(&self, jd: f64) -> Result<Vector3<f64>> {
        self.check_bound()?;
        self.source
            .evaluate_position(jd, self.reference_id, self.ephemeris_id)
    }

    /// Velocity relative to the configured reference body at `jd`, in km/s
    pub fn velocity(&self, jd: f64) -> Result<Vector3<f64>> {
        let (_, velocity) = self.state(jd)?;
        Ok(velocity)
    }

    /// Position (km) and velocity (km/s) in one evaluation
    pub fn state(&self, jd: f64) -> Result<(Vector3<f64>, Vector3<f64>)> {
        self.check_bound()?;
        self.source
            .evaluate_state(jd, self.reference_id, self.ephemeris_id)
    }

    /// A body bound to an id its source cannot evaluate is a construction
    /// mistake; report it as such instead of as a lookup failure
    fn check_bound(&self) -> Result<()> {
        for id in [self.ephemeris_id, self.reference_id] {
            if !self.source.recognizes(id) {
                return Err(EphemerisError::InvariantViolation {
                    name: self.name.clone(),
                    id,
                });
            }
        }
        Ok(())
    }

    // Presets with real-world attributes. Radii are mean values in km,
    // masses in kg, colors as packed RGB for display.

    /// The Sun
    pub fn sun(reference_id: i32, source: Arc<EphemerisSource>) -> Self {
        Self::new("Sun", 1.989e30, 695_700.0, 0xffff66, ids::SUN, reference_id, source)
    }

    /// Mercury
    pub fn mercury(reference_id: i32, source: Arc<EphemerisSource>) -> Self {
        Self::new("Mercury", 3.285e23, 2_439.7, 0x999999, ids::MERCURY, reference_id, source)
    }

    /// Venus
    pub fn venus(reference_id: i32, source: Arc<EphemerisSource>) -> Self {
        Self::new("Venus", 4.867e24, 6_051.8, 0xffe6b3, ids::VENUS, reference_id, source)
    }

    /// Earth
    pub fn earth(reference_id: i32, source: Arc<EphemerisSource>) -> Self {
        Self::new("Earth", 5.972e24, 6_371.0, 0x0099ff, ids::EARTH, reference_id, source)
    }

    /// The Moon
    pub fn moon(reference_id: i32, source: Arc<EphemerisSource>) -> Self {
        Self::new("Moon", 7.34767309e22, 1_737.0, 0xcccccc, ids::MOON, reference_id, source)
    }

    /// Mars
    pub fn mars(reference_id: i32, source: Arc<EphemerisSource>) -> Self {
        Self::new("Mars", 6.39e23, 3_389.5, 0xff6600, ids::MARS, reference_id, source)
    }

    /// Jupiter
    pub fn jupiter(reference_id: i32, source: Arc<EphemerisSource>) -> Self {
        Self::new("Jupiter", 1.898e27, 69_911.0, 0xffcc66, ids::JUPITER, reference_id, source)
    }

    /// Saturn
    pub fn saturn(reference_id: i32, source: Arc<EphemerisSource>) -> Self {
        Self::new("Saturn", 5.683e26, 58_232.0, 0xfff7e6, ids::SATURN, reference_id, source)
    }

    /// Uranus
    pub fn uranus(reference_id: i32, source: Arc<EphemerisSource>) -> Self {
        Self::new("Uranus", 8.681e25, 25_362.0, 0xcceeff, ids::URANUS, reference_id, source)
    }

    /// Neptune
    pub fn neptune(reference_id: i32, source: Arc<EphemerisSource>) -> Self {
        Self::new("Neptune", 1.024e26, 24_622.0, 0x0066ff, ids::NEPTUNE, reference_id, source)
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CelestialBody")
            .field("name", &self.name)
            .field("mass", &self.mass)
            .field("radius", &self.radius)
            .field("color", &format_args!("{:#08x}", self.color))
            .field("ephemeris_id", &self.ephemeris_id)
            .field("reference_id", &self.reference_id)
            .finish()
    }
}

/// The Sun, the eight planets and the Moon, all bound to the same source
/// and the same reference body
pub fn solar_system(reference_id: i32, source: &Arc<EphemerisSource>) -> Vec<CelestialBody> {
    vec![
        CelestialBody::sun(reference_id, Arc::clone(source)),
        CelestialBody::mercury(reference_id, Arc::clone(source)),
        CelestialBody::venus(reference_id, Arc::clone(source)),
        CelestialBody::earth(reference_id, Arc::clone(source)),
        CelestialBody::moon(reference_id, Arc::clone(source)),
        CelestialBody::mars(reference_id, Arc::clone(source)),
        CelestialBody::jupiter(reference_id, Arc::clone(source)),
        CelestialBody::saturn(reference_id, Arc::clone(source)),
        CelestialBody::uranus(reference_id, Arc::clone(source)),
        CelestialBody::neptune(reference_id, Arc::clone(source)),
    ]
}
