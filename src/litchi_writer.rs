//! Writer for Litchi mission CSV files.
//!
//! The header row and column order are what Litchi Mission Hub expects on
//! import; column names carry their unit suffixes, e.g. `altitude(m)` or
//! `speed(m/s)`. Rows end with CRLF.

use crate::models::Waypoint;

/// Litchi mission CSV column headers, in import order
pub const LITCHI_HEADERS: [&str; 46] = [
    "latitude",
    "longitude",
    "altitude(m)",
    "heading(deg)",
    "curvesize(m)",
    "rotationdir",
    "gimbalmode",
    "gimbalpitchangle",
    "actiontype1",
    "actionparam1",
    "actiontype2",
    "actionparam2",
    "actiontype3",
    "actionparam3",
    "actiontype4",
    "actionparam4",
    "actiontype5",
    "actionparam5",
    "actiontype6",
    "actionparam6",
    "actiontype7",
    "actionparam7",
    "actiontype8",
    "actionparam8",
    "actiontype9",
    "actionparam9",
    "actiontype10",
    "actionparam10",
    "actiontype11",
    "actionparam11",
    "actiontype12",
    "actionparam12",
    "actiontype13",
    "actionparam13",
    "actiontype14",
    "actionparam14",
    "actiontype15",
    "actionparam15",
    "altitudemode",
    "speed(m/s)",
    "poi_latitude",
    "poi_longitude",
    "poi_altitude(m)",
    "poi_altitudemode",
    "photo_timeinterval",
    "photo_distinterval",
];

const LINE_END: &str = "\r\n";

/// Serialize an ordered list of canonical waypoints into Litchi CSV bytes.
///
/// The waypoints are assumed valid; nothing is re-checked here. The mission
/// name never appears in the output.
pub fn serialize(mission_name: &str, waypoints: &[Waypoint]) -> Vec<u8> {
    let mut out = String::with_capacity(512 + waypoints.len() * 160);

    out.push_str(&LITCHI_HEADERS.join(","));
    out.push_str(LINE_END);

    for waypoint in waypoints {
        out.push_str(&row(waypoint).join(","));
        out.push_str(LINE_END);
    }

    log::debug!(
        "Serialized mission '{}': {} waypoints, {} bytes",
        mission_name,
        waypoints.len(),
        out.len()
    );

    out.into_bytes()
}

/// One data row, columns in `LITCHI_HEADERS` order
fn row(wp: &Waypoint) -> Vec<String> {
    let mut cols = Vec::with_capacity(LITCHI_HEADERS.len());

    cols.push(float(wp.latitude));
    cols.push(float(wp.longitude));
    cols.push(float(wp.altitude));
    cols.push(float(wp.heading));
    cols.push(float(wp.curve_size));
    cols.push(wp.rotation_direction.code().to_string());
    cols.push(wp.gimbal_mode.code().to_string());
    cols.push(float(wp.gimbal_pitch_angle));

    for action in &wp.actions {
        cols.push(action.action_type.code().to_string());
        cols.push(action.param.to_string());
    }

    cols.push(wp.altitude_mode.code().to_string());
    cols.push(float(wp.speed));
    cols.push(float(wp.poi_latitude));
    cols.push(float(wp.poi_longitude));
    cols.push(float(wp.poi_altitude));
    cols.push(wp.poi_altitude_mode.code().to_string());
    cols.push(float(wp.photo_time_interval));
    cols.push(float(wp.photo_dist_interval));

    cols
}

/// Shortest round-trip representation, no exponent, `-0` folded into `0`.
/// Whole values render without a fractional part (`50.0` -> `50`).
fn float(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, ActionType, AltitudeMode, GimbalMode, RotationDirection};

    fn waypoint(latitude: f64, longitude: f64) -> Waypoint {
        Waypoint {
            latitude,
            longitude,
            altitude: 50.0,
            heading: 0.0,
            curve_size: 0.0,
            rotation_direction: RotationDirection::Clockwise,
            gimbal_mode: GimbalMode::Disabled,
            gimbal_pitch_angle: -90.0,
            actions: [Action::NONE; 15],
            altitude_mode: AltitudeMode::RelativeToTakeoff,
            speed: 0.0,
            poi_latitude: 0.0,
            poi_longitude: 0.0,
            poi_altitude: 0.0,
            poi_altitude_mode: AltitudeMode::RelativeToTakeoff,
            photo_time_interval: -1.0,
            photo_dist_interval: -1.0,
        }
    }

    fn lines(bytes: &[u8]) -> Vec<String> {
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.ends_with("\r\n"));
        text.split("\r\n")
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect()
    }

    #[test]
    fn test_header_row() {
        let csv = serialize("m", &[waypoint(43.0, -81.0)]);

        let expected = "latitude,longitude,altitude(m),heading(deg),curvesize(m),rotationdir,\
gimbalmode,gimbalpitchangle,\
actiontype1,actionparam1,actiontype2,actionparam2,actiontype3,actionparam3,\
actiontype4,actionparam4,actiontype5,actionparam5,actiontype6,actionparam6,\
actiontype7,actionparam7,actiontype8,actionparam8,actiontype9,actionparam9,\
actiontype10,actionparam10,actiontype11,actionparam11,actiontype12,actionparam12,\
actiontype13,actionparam13,actiontype14,actionparam14,actiontype15,actionparam15,\
altitudemode,speed(m/s),poi_latitude,poi_longitude,poi_altitude(m),poi_altitudemode,\
photo_timeinterval,photo_distinterval\r\n";

        assert!(csv.starts_with(expected.as_bytes()));
        assert_eq!(lines(&csv)[0].split(',').count(), 46);
    }

    #[test]
    fn test_default_waypoint_row() {
        let csv = serialize("m", &[waypoint(43.0347, -81.2453)]);
        let rows = lines(&csv);

        let mut expected = vec!["43.0347", "-81.2453", "50", "0", "0", "0", "0", "-90"];
        for _ in 0..15 {
            expected.push("-1");
            expected.push("0");
        }
        expected.extend(["0", "0", "0", "0", "0", "0", "-1", "-1"]);

        assert_eq!(rows[1], expected.join(","));
    }

    #[test]
    fn test_one_row_per_waypoint_in_order() {
        let waypoints: Vec<Waypoint> = (0..5)
            .map(|i| waypoint(40.0 + i as f64 * 0.001, -80.0))
            .collect();
        let rows = lines(&serialize("m", &waypoints));

        assert_eq!(rows.len(), 6);
        for (i, row) in rows.iter().skip(1).enumerate() {
            assert!(row.starts_with(&format!("{},", float(40.0 + i as f64 * 0.001))));
            assert_eq!(row.split(',').count(), 46);
            assert!(!row.ends_with(','));
        }
    }

    #[test]
    fn test_actions_and_enums_render_as_integers() {
        let mut wp = waypoint(1.5, 2.5);
        wp.rotation_direction = RotationDirection::Shortest;
        wp.gimbal_mode = GimbalMode::FocusPoi;
        wp.altitude_mode = AltitudeMode::AboveGround;
        wp.actions[0] = Action {
            action_type: ActionType::StayFor,
            param: 2000,
        };
        wp.actions[14] = Action {
            action_type: ActionType::TiltCamera,
            param: -30,
        };

        let rows = lines(&serialize("m", &[wp]));
        let cols: Vec<&str> = rows[1].split(',').collect();

        assert_eq!(cols[5], "2");
        assert_eq!(cols[6], "1");
        assert_eq!(&cols[8..10], ["0", "2000"]);
        assert_eq!(&cols[36..38], ["5", "-30"]);
        assert_eq!(cols[38], "1");
    }

    #[test]
    fn test_float_formatting_is_uniform() {
        assert_eq!(float(50.0), "50");
        assert_eq!(float(50.5), "50.5");
        assert_eq!(float(-0.0), "0");
        assert_eq!(float(-81.2453), "-81.2453");
        assert_eq!(float(1e-7), "0.0000001");
        assert_eq!(float(12345678.0), "12345678");
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let waypoints = vec![waypoint(43.0347, -81.2453), waypoint(43.0357, -81.2443)];
        let first = serialize("m", &waypoints);
        let second = serialize("m", &waypoints);
        assert_eq!(first, second);

        // Name is not part of the content
        assert_eq!(first, serialize("other", &waypoints));
    }

    #[test]
    fn test_empty_list_is_header_only() {
        let rows = lines(&serialize("m", &[]));
        assert_eq!(rows.len(), 1);
    }
}
