//! Data models for the Litchi Mission Generator.
//!
//! `RawWaypoint` is what callers send; `Waypoint` is the canonical,
//! fully-populated record produced by the validator and consumed by the
//! CSV writer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of (type, param) action slots on a Litchi waypoint
pub const ACTION_SLOTS: usize = 15;

/// Direction the aircraft turns while rotating between waypoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
    Shortest,
}

impl RotationDirection {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Clockwise),
            1 => Some(Self::CounterClockwise),
            2 => Some(Self::Shortest),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Clockwise => 0,
            Self::CounterClockwise => 1,
            Self::Shortest => 2,
        }
    }
}

/// Gimbal behaviour between waypoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GimbalMode {
    Disabled,
    FocusPoi,
    Interpolate,
}

impl GimbalMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Disabled),
            1 => Some(Self::FocusPoi),
            2 => Some(Self::Interpolate),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Disabled => 0,
            Self::FocusPoi => 1,
            Self::Interpolate => 2,
        }
    }
}

/// Reference used for an altitude value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltitudeMode {
    RelativeToTakeoff,
    AboveGround,
}

impl AltitudeMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::RelativeToTakeoff),
            1 => Some(Self::AboveGround),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::RelativeToTakeoff => 0,
            Self::AboveGround => 1,
        }
    }
}

/// Litchi action codes. `None` (-1) marks an empty slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    None,
    StayFor,
    TakePhoto,
    StartRecording,
    StopRecording,
    RotateAircraft,
    TiltCamera,
}

impl ActionType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Self::None),
            0 => Some(Self::StayFor),
            1 => Some(Self::TakePhoto),
            2 => Some(Self::StartRecording),
            3 => Some(Self::StopRecording),
            4 => Some(Self::RotateAircraft),
            5 => Some(Self::TiltCamera),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::None => -1,
            Self::StayFor => 0,
            Self::TakePhoto => 1,
            Self::StartRecording => 2,
            Self::StopRecording => 3,
            Self::RotateAircraft => 4,
            Self::TiltCamera => 5,
        }
    }

    /// Inclusive parameter range for actions whose parameter carries meaning.
    /// Stay time is in milliseconds, rotation and tilt in degrees.
    pub fn param_range(self) -> Option<(i64, i64)> {
        match self {
            Self::StayFor => Some((0, 32_000)),
            // Same span as a waypoint heading
            Self::RotateAircraft => Some((-180, 360)),
            Self::TiltCamera => Some((-90, 30)),
            _ => None,
        }
    }
}

/// One action slot on a canonical waypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub action_type: ActionType,
    pub param: i64,
}

impl Action {
    pub const NONE: Action = Action {
        action_type: ActionType::None,
        param: 0,
    };
}

/// Canonical waypoint: every field populated, every value in range
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    // Position
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,

    // Navigation
    pub heading: f64,
    pub curve_size: f64,
    pub rotation_direction: RotationDirection,

    // Gimbal
    pub gimbal_mode: GimbalMode,
    pub gimbal_pitch_angle: f64,

    pub actions: [Action; ACTION_SLOTS],

    pub altitude_mode: AltitudeMode,
    pub speed: f64,

    // Point of interest
    pub poi_latitude: f64,
    pub poi_longitude: f64,
    pub poi_altitude: f64,
    pub poi_altitude_mode: AltitudeMode,

    // Camera intervals, -1 = disabled
    pub photo_time_interval: f64,
    pub photo_dist_interval: f64,
}

/// A validated mission ready for serialization
#[derive(Debug, Clone, PartialEq)]
pub struct Mission {
    pub name: String,
    pub waypoints: Vec<Waypoint>,
}

/// Caller-supplied waypoint field map.
///
/// Kept as a JSON object so that missing keys and wrongly-typed values can be
/// reported per field instead of failing the whole request at decode time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawWaypoint(pub Map<String, Value>);

/// Outcome of reading a numeric field from a `RawWaypoint`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Absent,
    Number(f64),
    /// Present but not a finite number; carries nothing, the caller reports it
    NotNumeric,
}

impl RawWaypoint {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert, mostly used by presets and tests
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Read a field as a finite number. Numeric strings are accepted.
    pub fn number(&self, field: &str) -> FieldValue {
        match self.0.get(field) {
            None => FieldValue::Absent,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v.is_finite() => FieldValue::Number(v),
                _ => FieldValue::NotNumeric,
            },
            Some(Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => FieldValue::Number(v),
                _ => FieldValue::NotNumeric,
            },
            Some(_) => FieldValue::NotNumeric,
        }
    }

    /// Raw JSON value of a field, for error reporting
    pub fn raw(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }
}

/// Generate-mission request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionRequest {
    #[serde(default)]
    pub mission_name: Option<String>,
    #[serde(default)]
    pub waypoints: Vec<Value>,
}
