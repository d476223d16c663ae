pub mod diagnosis;
pub mod health;

pub use diagnosis::{create_diagnosis, get_diagnosis, list_history, root};
pub use health::{health_check, readiness_check};
