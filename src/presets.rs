//! Built-in example missions.
//!
//! Presets are plain `MissionRequest`s and go through the same generation
//! path as caller-supplied missions.

use serde_json::{json, Value};

use crate::models::MissionRequest;

/// Known preset identifiers
pub const PRESET_NAMES: [&str; 1] = ["ilderton"];

/// Look up a preset mission by identifier (case-insensitive)
pub fn preset_mission(name: &str) -> Option<MissionRequest> {
    match name.trim().to_lowercase().as_str() {
        "ilderton" => Some(ilderton()),
        _ => None,
    }
}

/// Four-corner square around Ilderton, Ontario (approximately 43.0347° N,
/// 81.2453° W) at 50 m, camera pointing down, heading turning 90° at each corner
fn ilderton() -> MissionRequest {
    let corners = [
        (43.0347, -81.2453, 0),
        (43.0357, -81.2453, 90),
        (43.0357, -81.2443, 180),
        (43.0347, -81.2443, 270),
    ];

    MissionRequest {
        mission_name: Some("ilderton_mission".to_string()),
        waypoints: corners
            .iter()
            .map(|&(latitude, longitude, heading)| corner(latitude, longitude, heading))
            .collect(),
    }
}

fn corner(latitude: f64, longitude: f64, heading: i64) -> Value {
    json!({
        "latitude": latitude,
        "longitude": longitude,
        "altitude": 50.0,
        "heading": heading,
        "curve_size": 0,
        "rotation_direction": 0,
        "gimbal_mode": 0,
        "gimbal_pitch_angle": -90,
        "action_type_1": -1,
        "action_param_1": 0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::generate_mission;

    #[test]
    fn test_unknown_preset() {
        assert!(preset_mission("toronto").is_none());
        assert!(preset_mission("").is_none());
    }

    #[test]
    fn test_every_listed_preset_resolves() {
        for name in PRESET_NAMES {
            assert!(preset_mission(name).is_some(), "{}", name);
        }
        assert!(preset_mission(" Ilderton ").is_some());
    }

    #[test]
    fn test_ilderton_generates_square() {
        let generated = generate_mission(&preset_mission("ilderton").unwrap()).unwrap();
        let text = String::from_utf8(generated.csv).unwrap();
        let rows: Vec<Vec<&str>> = text.lines().skip(1).map(|l| l.split(',').collect()).collect();

        assert_eq!(generated.file_name, "ilderton_mission.csv");
        assert_eq!(rows.len(), 4);

        let coords: Vec<(&str, &str)> = rows.iter().map(|r| (r[0], r[1])).collect();
        assert_eq!(
            coords,
            vec![
                ("43.0347", "-81.2453"),
                ("43.0357", "-81.2453"),
                ("43.0357", "-81.2443"),
                ("43.0347", "-81.2443"),
            ]
        );

        let headings: Vec<&str> = rows.iter().map(|r| r[3]).collect();
        assert_eq!(headings, vec!["0", "90", "180", "270"]);
        assert!(rows.iter().all(|r| r[2] == "50" && r[7] == "-90"));
    }
}
