//! Mission generation: validate every waypoint, then serialize.
//!
//! Validation runs to completion before the writer is touched, so a single
//! bad waypoint means no CSV at all.

use serde_json::Value;
use thiserror::Error;

use crate::litchi_writer;
use crate::models::{Mission, MissionRequest, RawWaypoint, Waypoint};
use crate::validator::{self, ValidationError};

/// Name used when the request carries none
pub const DEFAULT_MISSION_NAME: &str = "mission";

#[derive(Debug, Error)]
pub enum MissionError {
    #[error("No waypoints provided")]
    EmptyMission,

    #[error("Waypoint {index}: {source}")]
    InvalidWaypoint {
        index: usize,
        #[source]
        source: ValidationError,
    },
}

impl MissionError {
    pub fn waypoint_index(&self) -> Option<usize> {
        match self {
            Self::InvalidWaypoint { index, .. } => Some(*index),
            Self::EmptyMission => None,
        }
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            Self::InvalidWaypoint { source, .. } => Some(source),
            Self::EmptyMission => None,
        }
    }
}

/// A finished mission file
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMission {
    pub mission_name: String,
    pub file_name: String,
    pub waypoint_count: usize,
    pub csv: Vec<u8>,
}

/// Validate waypoints in submission order, stopping at the first failure
pub fn validate_mission(name: &str, waypoints: &[Value]) -> Result<Mission, MissionError> {
    if waypoints.is_empty() {
        return Err(MissionError::EmptyMission);
    }

    let waypoints = waypoints
        .iter()
        .enumerate()
        .map(|(index, value)| {
            validate_entry(value).map_err(|source| MissionError::InvalidWaypoint { index, source })
        })
        .collect::<Result<Vec<Waypoint>, MissionError>>()?;

    Ok(Mission {
        name: name.to_string(),
        waypoints,
    })
}

fn validate_entry(value: &Value) -> Result<Waypoint, ValidationError> {
    match value {
        Value::Object(map) => validator::validate(&RawWaypoint(map.clone())),
        other => Err(ValidationError::WrongType {
            field: "waypoint".to_string(),
            value: other.to_string(),
        }),
    }
}

/// Mission name with the default applied to absent or blank names
pub fn mission_name(request: &MissionRequest) -> &str {
    request
        .mission_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_MISSION_NAME)
}

/// File name for a mission: path separators, quotes and control characters
/// become `_`, leading/trailing dots are dropped, `.csv` is appended
pub fn mission_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '"' | ':' | ';' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let stem = cleaned.trim_matches('.');
    if stem.is_empty() {
        format!("{}.csv", DEFAULT_MISSION_NAME)
    } else {
        format!("{}.csv", stem)
    }
}

/// Full pipeline: request in, Litchi CSV out
pub fn generate_mission(request: &MissionRequest) -> Result<GeneratedMission, MissionError> {
    let name = mission_name(request);
    let mission = validate_mission(name, &request.waypoints)?;
    let csv = litchi_writer::serialize(&mission.name, &mission.waypoints);

    log::info!(
        "Generated mission '{}' with {} waypoints ({} bytes)",
        mission.name,
        mission.waypoints.len(),
        csv.len()
    );

    Ok(GeneratedMission {
        file_name: mission_file_name(&mission.name),
        waypoint_count: mission.waypoints.len(),
        mission_name: mission.name,
        csv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{AllowedRange, ValidationErrorKind};
    use serde_json::json;

    fn request(name: Option<&str>, waypoints: Vec<Value>) -> MissionRequest {
        MissionRequest {
            mission_name: name.map(str::to_string),
            waypoints,
        }
    }

    fn point(lat: f64, lon: f64) -> Value {
        json!({ "latitude": lat, "longitude": lon, "altitude": 50.0 })
    }

    #[test]
    fn test_generate_has_header_plus_one_row_per_waypoint() {
        let req = request(
            Some("survey"),
            vec![point(43.0, -81.0), point(43.1, -81.0), point(43.1, -81.1)],
        );
        let generated = generate_mission(&req).unwrap();
        let text = String::from_utf8(generated.csv).unwrap();

        assert_eq!(text.lines().count(), 4);
        assert_eq!(generated.file_name, "survey.csv");
        assert_eq!(generated.waypoint_count, 3);
        assert!(text.lines().nth(1).unwrap().starts_with("43,-81,50,"));
        assert!(text.lines().nth(3).unwrap().starts_with("43.1,-81.1,50,"));
    }

    #[test]
    fn test_empty_mission_rejected() {
        let err = generate_mission(&request(Some("x"), vec![])).unwrap_err();
        assert!(matches!(err, MissionError::EmptyMission));
        assert_eq!(err.to_string(), "No waypoints provided");
    }

    #[test]
    fn test_one_bad_waypoint_aborts_mission() {
        let req = request(
            None,
            vec![
                point(43.0, -81.0),
                json!({ "latitude": 95, "longitude": -81.0, "altitude": 50 }),
                point(43.1, -81.0),
            ],
        );
        let err = generate_mission(&req).unwrap_err();

        assert_eq!(err.waypoint_index(), Some(1));
        let source = err.validation_error().unwrap();
        assert_eq!(source.kind(), ValidationErrorKind::OutOfRange);
        assert_eq!(source.field(), "latitude");
        assert_eq!(source.allowed_range(), Some(AllowedRange::between(-90.0, 90.0)));
        assert_eq!(
            err.to_string(),
            "Waypoint 1: latitude must be between -90 and 90, got 95"
        );
    }

    #[test]
    fn test_non_object_waypoint() {
        let err = generate_mission(&request(None, vec![json!([1, 2, 3])])).unwrap_err();
        let source = err.validation_error().unwrap();
        assert_eq!(source.kind(), ValidationErrorKind::WrongType);
        assert_eq!(source.field(), "waypoint");
    }

    #[test]
    fn test_mission_name_defaults() {
        assert_eq!(mission_name(&request(None, vec![])), "mission");
        assert_eq!(mission_name(&request(Some("   "), vec![])), "mission");
        assert_eq!(mission_name(&request(Some(" Farm "), vec![])), "Farm");
    }

    #[test]
    fn test_default_waypoint_end_to_end() {
        let req = request(
            Some("ilderton"),
            vec![json!({
                "latitude": 43.0347,
                "longitude": -81.2453,
                "altitude": 50.0,
                "gimbal_pitch_angle": -90
            })],
        );
        let generated = generate_mission(&req).unwrap();
        let text = String::from_utf8(generated.csv).unwrap();

        let mut row = String::from("43.0347,-81.2453,50,0,0,0,0,-90");
        for _ in 0..15 {
            row.push_str(",-1,0");
        }
        row.push_str(",0,0,0,0,0,0,-1,-1");

        let rows: Vec<&str> = text.split("\r\n").collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], crate::litchi_writer::LITCHI_HEADERS.join(","));
        assert_eq!(rows[1], row);
        assert_eq!(rows[2], "");
    }

    #[test]
    fn test_mission_file_name() {
        assert_eq!(mission_file_name("survey"), "survey.csv");
        assert_eq!(mission_file_name("../etc/passwd"), "_etc_passwd.csv");
        assert_eq!(mission_file_name("a\"b\nc"), "a_b_c.csv");
        assert_eq!(mission_file_name("  ..  "), "mission.csv");
        assert_eq!(mission_file_name("Farm 2"), "Farm 2.csv");
    }

    #[test]
    fn test_generate_is_repeatable() {
        let req = request(Some("a"), vec![point(43.0347, -81.2453), point(43.0357, -81.2453)]);
        assert_eq!(generate_mission(&req).unwrap(), generate_mission(&req).unwrap());
    }
}
