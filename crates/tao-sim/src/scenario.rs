//! Scenario definitions: the raw contact list handed to `start_exercise`.
//!
//! Records arrive from an external generator, so every field is optional
//! at the serde layer and checked here. The first failing contact aborts the
//! whole load; nothing is spawned from a rejected scenario.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tao_core::constants::{DEFAULT_AIR_ALTITUDE_FT, GENERATED_CALLSIGN_BASE};
use tao_core::enums::{ActualIdentity, ThreatRole, TrackKind};
use tao_core::types::{Position, Vector};
use tao_threat_ai::profiles::default_ammo;

/// Description shown when the drill is substituted for a failed generator.
pub const FALLBACK_DESCRIPTION: &str =
    "Communications failure with simulation server. Loading fallback drill.";

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("contact {index}: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },
    #[error("contact {index}: `{field}` is not a finite number")]
    NotFinite { index: usize, field: &'static str },
    #[error("contact {index}: negative speed {speed} kt")]
    NegativeSpeed { index: usize, speed: f64 },
    #[error("contact {index}: negative altitude {altitude} ft")]
    NegativeAltitude { index: usize, altitude: f64 },
    #[error("contact {index}: unknown identity `{value}`")]
    UnknownIdentity { index: usize, value: String },
    #[error("contact {index}: unknown contact type `{value}`")]
    UnknownKind { index: usize, value: String },
    #[error("contact {index}: weapons cannot be placed by a scenario")]
    WeaponContact { index: usize },
    #[error("contact {index}: unknown role `{value}`")]
    UnknownRole { index: usize, value: String },
    #[error("an exercise is already in progress")]
    ExerciseInProgress,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPosition {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawVector {
    pub heading: Option<f64>,
    pub speed: Option<f64>,
}

/// One contact as written by the scenario generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRecord {
    pub callsign: Option<String>,
    pub position: Option<RawPosition>,
    pub vector: Option<RawVector>,
    pub altitude: Option<f64>,
    pub identity: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub role: Option<String>,
    pub responsive: Option<bool>,
    pub ammo: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioSpec {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tracks: Vec<ContactRecord>,
}

/// A contact that passed validation, ready to spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSpec {
    pub callsign: String,
    pub position: Position,
    pub vector: Vector,
    pub altitude_ft: f64,
    pub actual: ActualIdentity,
    pub kind: TrackKind,
    pub role: ThreatRole,
    pub responsive: bool,
    pub ammo: u32,
}

impl ScenarioSpec {
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check every record and fill in defaults.
    pub fn validate(&self) -> Result<Vec<ContactSpec>, ScenarioError> {
        self.tracks
            .iter()
            .enumerate()
            .map(|(index, record)| record.validate(index))
            .collect()
    }
}

impl ContactRecord {
    pub fn validate(&self, index: usize) -> Result<ContactSpec, ScenarioError> {
        let position = self
            .position
            .as_ref()
            .ok_or(ScenarioError::MissingField { index, field: "position" })?;
        let x = finite(index, "position.x", position.x)?;
        let y = finite(index, "position.y", position.y)?;

        let vector = self
            .vector
            .as_ref()
            .ok_or(ScenarioError::MissingField { index, field: "vector" })?;
        let heading = finite(index, "vector.heading", vector.heading)?;
        let speed = finite(index, "vector.speed", vector.speed)?;
        if speed < 0.0 {
            return Err(ScenarioError::NegativeSpeed { index, speed });
        }

        let kind = match self.kind.as_deref() {
            None => TrackKind::Air,
            Some(value) => parse_kind(index, value)?,
        };
        let actual = match self.identity.as_deref() {
            None => ActualIdentity::Neutral,
            Some(value) => parse_identity(index, value)?,
        };
        let role = match self.role.as_deref() {
            None => ThreatRole::None,
            Some(value) => parse_role(index, value)?,
        };

        let altitude_ft = match self.altitude {
            None => match kind {
                TrackKind::Surface => 0.0,
                _ => DEFAULT_AIR_ALTITUDE_FT,
            },
            Some(altitude) if !altitude.is_finite() => {
                return Err(ScenarioError::NotFinite { index, field: "altitude" })
            }
            Some(altitude) if altitude < 0.0 => {
                return Err(ScenarioError::NegativeAltitude { index, altitude })
            }
            Some(altitude) => altitude,
        };

        let callsign = match self.callsign.as_deref().map(str::trim) {
            Some(callsign) if !callsign.is_empty() => callsign.to_string(),
            _ => format!("UNK-{}", GENERATED_CALLSIGN_BASE + index),
        };

        Ok(ContactSpec {
            callsign,
            position: Position::new(x, y),
            vector: Vector::new(heading.rem_euclid(360.0), speed),
            altitude_ft,
            actual,
            kind,
            role,
            responsive: self.responsive.unwrap_or(true),
            ammo: self.ammo.unwrap_or_else(|| default_ammo(role)),
        })
    }
}

fn finite(index: usize, field: &'static str, value: Option<f64>) -> Result<f64, ScenarioError> {
    match value {
        None => Err(ScenarioError::MissingField { index, field }),
        Some(v) if !v.is_finite() => Err(ScenarioError::NotFinite { index, field }),
        Some(v) => Ok(v),
    }
}

fn parse_identity(index: usize, value: &str) -> Result<ActualIdentity, ScenarioError> {
    match value.trim().to_ascii_uppercase().as_str() {
        "FRIEND" => Ok(ActualIdentity::Friend),
        "HOSTILE" => Ok(ActualIdentity::Hostile),
        "NEUTRAL" => Ok(ActualIdentity::Neutral),
        _ => Err(ScenarioError::UnknownIdentity {
            index,
            value: value.to_string(),
        }),
    }
}

fn parse_kind(index: usize, value: &str) -> Result<TrackKind, ScenarioError> {
    match value.trim().to_ascii_uppercase().as_str() {
        "AIR" => Ok(TrackKind::Air),
        "SURFACE" => Ok(TrackKind::Surface),
        "MISSILE" => Err(ScenarioError::WeaponContact { index }),
        _ => Err(ScenarioError::UnknownKind {
            index,
            value: value.to_string(),
        }),
    }
}

fn parse_role(index: usize, value: &str) -> Result<ThreatRole, ScenarioError> {
    match value.trim().to_ascii_uppercase().as_str() {
        "NONE" => Ok(ThreatRole::None),
        "FIGHTER" => Ok(ThreatRole::Fighter),
        "ATTACK" => Ok(ThreatRole::Attack),
        _ => Err(ScenarioError::UnknownRole {
            index,
            value: value.to_string(),
        }),
    }
}

fn record(
    callsign: &str,
    (x, y): (f64, f64),
    (heading, speed): (f64, f64),
    altitude: f64,
    identity: &str,
    role: &str,
    responsive: bool,
) -> ContactRecord {
    ContactRecord {
        callsign: Some(callsign.to_string()),
        position: Some(RawPosition { x: Some(x), y: Some(y) }),
        vector: Some(RawVector {
            heading: Some(heading),
            speed: Some(speed),
        }),
        altitude: Some(altitude),
        identity: Some(identity.to_string()),
        kind: Some("AIR".to_string()),
        role: Some(role.to_string()),
        responsive: Some(responsive),
        ammo: None,
    }
}

/// Built-in drill used when no generated scenario is available.
pub fn fallback_drill() -> ScenarioSpec {
    ScenarioSpec {
        description: FALLBACK_DESCRIPTION.to_string(),
        tracks: vec![
            record("TN 4012", (40.0, 40.0), (225.0, 450.0), 30_000.0, "HOSTILE", "ATTACK", false),
            record("BOGEY 01", (-55.0, 45.0), (135.0, 500.0), 25_000.0, "HOSTILE", "FIGHTER", false),
            record("AIR FRANCE 22", (-30.0, -20.0), (45.0, 460.0), 35_000.0, "NEUTRAL", "NONE", true),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn minimal() -> ContactRecord {
        ContactRecord {
            position: Some(RawPosition {
                x: Some(10.0),
                y: Some(-5.0),
            }),
            vector: Some(RawVector {
                heading: Some(90.0),
                speed: Some(300.0),
            }),
            ..Default::default()
        }
    }

    // ---- Defaults ----

    #[test]
    fn test_minimal_record_defaults() {
        let contact = minimal().validate(3).expect("minimal record is valid");
        assert_eq!(contact.callsign, "UNK-1003");
        assert_eq!(contact.kind, TrackKind::Air);
        assert_eq!(contact.actual, ActualIdentity::Neutral);
        assert_eq!(contact.role, ThreatRole::None);
        assert_eq!(contact.altitude_ft, DEFAULT_AIR_ALTITUDE_FT);
        assert!(contact.responsive);
        assert_eq!(contact.ammo, 0);
    }

    #[test]
    fn test_surface_default_altitude_is_sea_level() {
        let record = ContactRecord {
            kind: Some("surface".into()),
            ..minimal()
        };
        assert_eq!(record.validate(0).expect("valid").altitude_ft, 0.0);
    }

    #[test]
    fn test_role_supplies_default_ammo() {
        let record = ContactRecord {
            role: Some("Fighter".into()),
            identity: Some("hostile".into()),
            ..minimal()
        };
        let contact = record.validate(0).expect("valid");
        assert_eq!(contact.role, ThreatRole::Fighter);
        assert_eq!(contact.actual, ActualIdentity::Hostile);
        assert_eq!(contact.ammo, 4);
    }

    #[test]
    fn test_heading_is_normalized() {
        let mut record = minimal();
        record.vector = Some(RawVector {
            heading: Some(-90.0),
            speed: Some(100.0),
        });
        assert_relative_eq!(record.validate(0).expect("valid").vector.heading, 270.0);
    }

    // ---- Rejections ----

    #[test]
    fn test_missing_position_rejected() {
        let record = ContactRecord {
            position: None,
            ..minimal()
        };
        assert!(matches!(
            record.validate(2),
            Err(ScenarioError::MissingField { index: 2, field: "position" })
        ));
    }

    #[test]
    fn test_missing_coordinate_rejected() {
        let record = ContactRecord {
            position: Some(RawPosition {
                x: Some(1.0),
                y: None,
            }),
            ..minimal()
        };
        assert!(matches!(
            record.validate(0),
            Err(ScenarioError::MissingField { field: "position.y", .. })
        ));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let record = ContactRecord {
            vector: Some(RawVector {
                heading: Some(f64::NAN),
                speed: Some(100.0),
            }),
            ..minimal()
        };
        assert!(matches!(
            record.validate(0),
            Err(ScenarioError::NotFinite { field: "vector.heading", .. })
        ));

        let record = ContactRecord {
            altitude: Some(f64::INFINITY),
            ..minimal()
        };
        assert!(matches!(
            record.validate(0),
            Err(ScenarioError::NotFinite { field: "altitude", .. })
        ));
    }

    #[test]
    fn test_negative_speed_and_altitude_rejected() {
        let mut record = minimal();
        record.vector = Some(RawVector {
            heading: Some(0.0),
            speed: Some(-1.0),
        });
        assert!(matches!(record.validate(0), Err(ScenarioError::NegativeSpeed { .. })));

        let record = ContactRecord {
            altitude: Some(-10.0),
            ..minimal()
        };
        assert!(matches!(record.validate(0), Err(ScenarioError::NegativeAltitude { .. })));
    }

    #[test]
    fn test_weapon_contact_rejected() {
        let record = ContactRecord {
            kind: Some("MISSILE".into()),
            ..minimal()
        };
        assert!(matches!(record.validate(0), Err(ScenarioError::WeaponContact { index: 0 })));
    }

    #[test]
    fn test_unknown_enum_values_rejected() {
        let record = ContactRecord {
            identity: Some("UNKNOWN".into()),
            ..minimal()
        };
        assert!(matches!(record.validate(0), Err(ScenarioError::UnknownIdentity { .. })));

        let record = ContactRecord {
            role: Some("BOMBER".into()),
            ..minimal()
        };
        assert!(matches!(record.validate(0), Err(ScenarioError::UnknownRole { .. })));
    }

    #[test]
    fn test_first_bad_contact_fails_whole_scenario() {
        let spec = ScenarioSpec {
            description: "mixed".into(),
            tracks: vec![
                minimal(),
                ContactRecord {
                    vector: None,
                    ..minimal()
                },
            ],
        };
        assert!(matches!(
            spec.validate(),
            Err(ScenarioError::MissingField { index: 1, field: "vector" })
        ));
    }

    // ---- JSON ----

    #[test]
    fn test_from_json() {
        let json = r#"{
            "description": "Strait transit",
            "tracks": [
                {"callsign": "IRIAF 41", "position": {"x": 30, "y": 45},
                 "vector": {"heading": 200, "speed": 480}, "altitude": 18000,
                 "identity": "HOSTILE", "type": "AIR", "role": "FIGHTER",
                 "responsive": false}
            ]
        }"#;
        let spec = ScenarioSpec::from_json(json).expect("parses");
        assert_eq!(spec.description, "Strait transit");
        let contacts = spec.validate().expect("valid");
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].callsign, "IRIAF 41");
        assert!(!contacts[0].responsive);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(ScenarioSpec::from_json("{ not json"), Err(ScenarioError::Json(_))));
    }

    #[test]
    fn test_fallback_drill_is_valid() {
        let drill = fallback_drill();
        assert_eq!(drill.description, FALLBACK_DESCRIPTION);
        let contacts = drill.validate().expect("drill must always validate");
        assert_eq!(contacts[0].callsign, "TN 4012");
        assert_eq!(contacts[0].position, Position::new(40.0, 40.0));
        assert_eq!(contacts[0].actual, ActualIdentity::Hostile);
        assert!(!contacts[0].responsive);
        assert!(contacts.iter().any(|c| c.actual == ActualIdentity::Neutral && c.responsive));
    }
}
