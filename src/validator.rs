//! Waypoint validation.
//!
//! Turns a caller-supplied `RawWaypoint` into a canonical `Waypoint`. Supplied
//! values are first merged over the `DEFAULTS` record (presence and type checks
//! happen here), then the merged record runs through the range and enum checks
//! in CSV column order. The first failure wins.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::models::{
    Action, ActionType, AltitudeMode, FieldValue, GimbalMode, RawWaypoint, RotationDirection,
    Waypoint, ACTION_SLOTS,
};

/// Inclusive numeric range; `max: None` means unbounded above
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AllowedRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl AllowedRange {
    pub const fn between(min: f64, max: f64) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_least(min: f64) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

impl fmt::Display for AllowedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "between {} and {}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

pub const LATITUDE_RANGE: AllowedRange = AllowedRange::between(-90.0, 90.0);
pub const LONGITUDE_RANGE: AllowedRange = AllowedRange::between(-180.0, 180.0);
pub const ALTITUDE_RANGE: AllowedRange = AllowedRange::at_least(0.0);
pub const HEADING_RANGE: AllowedRange = AllowedRange::between(-180.0, 360.0);
pub const CURVE_SIZE_RANGE: AllowedRange = AllowedRange::at_least(0.0);
pub const GIMBAL_PITCH_RANGE: AllowedRange = AllowedRange::between(-90.0, 30.0);
pub const SPEED_RANGE: AllowedRange = AllowedRange::at_least(0.0);
pub const INTERVAL_RANGE: AllowedRange = AllowedRange::at_least(-1.0);

/// Machine-readable category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    MissingField,
    WrongType,
    OutOfRange,
    InvalidEnum,
}

impl ValidationErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::WrongType => "wrong_type",
            Self::OutOfRange => "out_of_range",
            Self::InvalidEnum => "invalid_enum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("{field} must be a number, got {value}")]
    WrongType { field: String, value: String },

    #[error("{field} must be {allowed_range}, got {value}")]
    OutOfRange {
        field: String,
        value: f64,
        allowed_range: AllowedRange,
    },

    #[error("{field} must be one of {allowed:?}, got {value}")]
    InvalidEnum {
        field: String,
        value: i64,
        allowed: &'static [i64],
    },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::MissingField { .. } => ValidationErrorKind::MissingField,
            Self::WrongType { .. } => ValidationErrorKind::WrongType,
            Self::OutOfRange { .. } => ValidationErrorKind::OutOfRange,
            Self::InvalidEnum { .. } => ValidationErrorKind::InvalidEnum,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field }
            | Self::WrongType { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::InvalidEnum { field, .. } => field.as_str(),
        }
    }

    pub fn allowed_range(&self) -> Option<AllowedRange> {
        match self {
            Self::OutOfRange { allowed_range, .. } => Some(*allowed_range),
            _ => None,
        }
    }
}

/// Values used for every optional field the caller omits
#[derive(Debug, Clone, Copy)]
pub struct WaypointDefaults {
    pub heading: f64,
    pub curve_size: f64,
    pub rotation_direction: i64,
    pub gimbal_mode: i64,
    pub gimbal_pitch_angle: f64,
    pub action_type: i64,
    pub action_param: i64,
    pub altitude_mode: i64,
    pub speed: f64,
    pub poi_latitude: f64,
    pub poi_longitude: f64,
    pub poi_altitude: f64,
    pub poi_altitude_mode: i64,
    pub photo_time_interval: f64,
    pub photo_dist_interval: f64,
}

pub const DEFAULTS: WaypointDefaults = WaypointDefaults {
    heading: 0.0,
    curve_size: 0.0,
    rotation_direction: 0,
    gimbal_mode: 0,
    gimbal_pitch_angle: -90.0,
    action_type: -1,
    action_param: 0,
    altitude_mode: 0,
    speed: 0.0,
    poi_latitude: 0.0,
    poi_longitude: 0.0,
    poi_altitude: 0.0,
    poi_altitude_mode: 0,
    photo_time_interval: -1.0,
    photo_dist_interval: -1.0,
};

const REQUIRED_FIELDS: [&str; 3] = ["latitude", "longitude", "altitude"];

const ROTATION_CODES: &[i64] = &[0, 1, 2];
const GIMBAL_MODE_CODES: &[i64] = &[0, 1, 2];
const ALTITUDE_MODE_CODES: &[i64] = &[0, 1];
const ACTION_CODES: &[i64] = &[-1, 0, 1, 2, 3, 4, 5];

/// Keys accepted for the POI altitude mode; the first is canonical
const POI_ALTITUDE_MODE_KEYS: [&str; 2] = ["poi_altitude_mode", "poi_altitudemode"];

pub fn action_type_field(slot: usize) -> String {
    format!("action_type_{}", slot)
}

pub fn action_param_field(slot: usize) -> String {
    format!("action_param_{}", slot)
}

/// Merged but unchecked waypoint: every field populated, nothing range-checked
#[derive(Debug, Clone)]
struct MergedWaypoint {
    latitude: f64,
    longitude: f64,
    altitude: f64,
    heading: f64,
    curve_size: f64,
    rotation_direction: i64,
    gimbal_mode: i64,
    gimbal_pitch_angle: f64,
    actions: [(i64, i64); ACTION_SLOTS],
    altitude_mode: i64,
    speed: f64,
    poi_latitude: f64,
    poi_longitude: f64,
    poi_altitude: f64,
    poi_altitude_mode: i64,
    photo_time_interval: f64,
    photo_dist_interval: f64,
}

/// Validate one waypoint and fill in defaults for omitted optional fields
pub fn validate(raw: &RawWaypoint) -> Result<Waypoint, ValidationError> {
    for field in REQUIRED_FIELDS {
        if !raw.has(field) {
            return Err(ValidationError::MissingField {
                field: field.to_string(),
            });
        }
    }

    for key in raw.keys().filter(|k| !is_known_field(k)) {
        log::debug!("Ignoring unknown waypoint field: {}", key);
    }

    let merged = merge(raw)?;
    check(merged)
}

fn merge(raw: &RawWaypoint) -> Result<MergedWaypoint, ValidationError> {
    let latitude = required_number(raw, "latitude")?;
    let longitude = required_number(raw, "longitude")?;
    let altitude = required_number(raw, "altitude")?;
    let heading = optional_number(raw, "heading", DEFAULTS.heading)?;
    let curve_size = optional_number(raw, "curve_size", DEFAULTS.curve_size)?;
    let rotation_direction =
        optional_integer(raw, "rotation_direction", DEFAULTS.rotation_direction)?;
    let gimbal_mode = optional_integer(raw, "gimbal_mode", DEFAULTS.gimbal_mode)?;
    let gimbal_pitch_angle =
        optional_number(raw, "gimbal_pitch_angle", DEFAULTS.gimbal_pitch_angle)?;

    let mut actions = [(DEFAULTS.action_type, DEFAULTS.action_param); ACTION_SLOTS];
    for (i, slot) in actions.iter_mut().enumerate() {
        let n = i + 1;
        slot.0 = optional_integer(raw, &action_type_field(n), DEFAULTS.action_type)?;
        slot.1 = optional_integer(raw, &action_param_field(n), DEFAULTS.action_param)?;
    }

    let altitude_mode = optional_integer(raw, "altitude_mode", DEFAULTS.altitude_mode)?;
    let speed = optional_number(raw, "speed", DEFAULTS.speed)?;
    let poi_latitude = optional_number(raw, "poi_latitude", DEFAULTS.poi_latitude)?;
    let poi_longitude = optional_number(raw, "poi_longitude", DEFAULTS.poi_longitude)?;
    let poi_altitude = optional_number(raw, "poi_altitude", DEFAULTS.poi_altitude)?;
    let poi_mode_key = POI_ALTITUDE_MODE_KEYS
        .into_iter()
        .find(|k| raw.has(k))
        .unwrap_or(POI_ALTITUDE_MODE_KEYS[0]);
    let poi_altitude_mode = optional_integer(raw, poi_mode_key, DEFAULTS.poi_altitude_mode)?;
    let photo_time_interval =
        optional_number(raw, "photo_time_interval", DEFAULTS.photo_time_interval)?;
    let photo_dist_interval =
        optional_number(raw, "photo_dist_interval", DEFAULTS.photo_dist_interval)?;

    Ok(MergedWaypoint {
        latitude,
        longitude,
        altitude,
        heading,
        curve_size,
        rotation_direction,
        gimbal_mode,
        gimbal_pitch_angle,
        actions,
        altitude_mode,
        speed,
        poi_latitude,
        poi_longitude,
        poi_altitude,
        poi_altitude_mode,
        photo_time_interval,
        photo_dist_interval,
    })
}

fn check(m: MergedWaypoint) -> Result<Waypoint, ValidationError> {
    in_range("latitude", m.latitude, LATITUDE_RANGE)?;
    in_range("longitude", m.longitude, LONGITUDE_RANGE)?;
    in_range("altitude", m.altitude, ALTITUDE_RANGE)?;
    in_range("heading", m.heading, HEADING_RANGE)?;
    in_range("curve_size", m.curve_size, CURVE_SIZE_RANGE)?;
    let rotation_direction = enum_code(
        "rotation_direction",
        m.rotation_direction,
        ROTATION_CODES,
        RotationDirection::from_code,
    )?;
    let gimbal_mode = enum_code(
        "gimbal_mode",
        m.gimbal_mode,
        GIMBAL_MODE_CODES,
        GimbalMode::from_code,
    )?;
    in_range("gimbal_pitch_angle", m.gimbal_pitch_angle, GIMBAL_PITCH_RANGE)?;

    let mut actions = [Action::NONE; ACTION_SLOTS];
    for (i, (&(type_code, param), action)) in m
        .actions
        .iter()
        .zip(actions.iter_mut())
        .enumerate()
    {
        let n = i + 1;
        let action_type = enum_code(
            &action_type_field(n),
            type_code,
            ACTION_CODES,
            ActionType::from_code,
        )?;
        // Empty slots carry an inert parameter
        if let Some((min, max)) = action_type.param_range() {
            in_range(
                &action_param_field(n),
                param as f64,
                AllowedRange::between(min as f64, max as f64),
            )?;
        }
        *action = Action { action_type, param };
    }

    let altitude_mode = enum_code(
        "altitude_mode",
        m.altitude_mode,
        ALTITUDE_MODE_CODES,
        AltitudeMode::from_code,
    )?;
    in_range("speed", m.speed, SPEED_RANGE)?;
    in_range("poi_latitude", m.poi_latitude, LATITUDE_RANGE)?;
    in_range("poi_longitude", m.poi_longitude, LONGITUDE_RANGE)?;
    in_range("poi_altitude", m.poi_altitude, ALTITUDE_RANGE)?;
    let poi_altitude_mode = enum_code(
        POI_ALTITUDE_MODE_KEYS[0],
        m.poi_altitude_mode,
        ALTITUDE_MODE_CODES,
        AltitudeMode::from_code,
    )?;
    in_range("photo_time_interval", m.photo_time_interval, INTERVAL_RANGE)?;
    in_range("photo_dist_interval", m.photo_dist_interval, INTERVAL_RANGE)?;

    Ok(Waypoint {
        latitude: m.latitude,
        longitude: m.longitude,
        altitude: m.altitude,
        heading: m.heading,
        curve_size: m.curve_size,
        rotation_direction,
        gimbal_mode,
        gimbal_pitch_angle: m.gimbal_pitch_angle,
        actions,
        altitude_mode,
        speed: m.speed,
        poi_latitude: m.poi_latitude,
        poi_longitude: m.poi_longitude,
        poi_altitude: m.poi_altitude,
        poi_altitude_mode,
        photo_time_interval: m.photo_time_interval,
        photo_dist_interval: m.photo_dist_interval,
    })
}

fn wrong_type(raw: &RawWaypoint, field: &str) -> ValidationError {
    ValidationError::WrongType {
        field: field.to_string(),
        value: raw
            .raw(field)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "nothing".to_string()),
    }
}

fn required_number(raw: &RawWaypoint, field: &str) -> Result<f64, ValidationError> {
    match raw.number(field) {
        FieldValue::Number(v) => Ok(v),
        FieldValue::Absent => Err(ValidationError::MissingField {
            field: field.to_string(),
        }),
        FieldValue::NotNumeric => Err(wrong_type(raw, field)),
    }
}

fn optional_number(raw: &RawWaypoint, field: &str, default: f64) -> Result<f64, ValidationError> {
    match raw.number(field) {
        FieldValue::Number(v) => Ok(v),
        FieldValue::Absent => Ok(default),
        FieldValue::NotNumeric => Err(wrong_type(raw, field)),
    }
}

fn optional_integer(raw: &RawWaypoint, field: &str, default: i64) -> Result<i64, ValidationError> {
    let value = optional_number(raw, field, default as f64)?;
    if value.fract() != 0.0 || value < i64::MIN as f64 || value > i64::MAX as f64 {
        return Err(wrong_type(raw, field));
    }
    Ok(value as i64)
}

fn in_range(field: &str, value: f64, allowed_range: AllowedRange) -> Result<(), ValidationError> {
    if allowed_range.contains(value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            allowed_range,
        })
    }
}

fn enum_code<T>(
    field: &str,
    value: i64,
    allowed: &'static [i64],
    from_code: fn(i64) -> Option<T>,
) -> Result<T, ValidationError> {
    from_code(value).ok_or_else(|| ValidationError::InvalidEnum {
        field: field.to_string(),
        value,
        allowed,
    })
}

fn is_known_field(key: &str) -> bool {
    const FIXED: [&str; 17] = [
        "latitude",
        "longitude",
        "altitude",
        "heading",
        "curve_size",
        "rotation_direction",
        "gimbal_mode",
        "gimbal_pitch_angle",
        "altitude_mode",
        "speed",
        "poi_latitude",
        "poi_longitude",
        "poi_altitude",
        "poi_altitude_mode",
        "poi_altitudemode",
        "photo_time_interval",
        "photo_dist_interval",
    ];
    if FIXED.contains(&key) {
        return true;
    }
    key.strip_prefix("action_type_")
        .or_else(|| key.strip_prefix("action_param_"))
        .and_then(|n| n.parse::<usize>().ok())
        .map_or(false, |n| (1..=ACTION_SLOTS).contains(&n))
}
