pub mod litchi_writer;
pub mod mission;
pub mod models;
pub mod presets;
pub mod validator;

#[cfg(feature = "web")]
pub mod server;

pub use litchi_writer::{serialize, LITCHI_HEADERS};
pub use mission::{generate_mission, validate_mission, GeneratedMission, MissionError};
pub use models::*;
pub use validator::{validate, ValidationError, ValidationErrorKind};
