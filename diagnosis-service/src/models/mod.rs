pub mod diagnosis;

pub use diagnosis::{DiagnosisFields, DiagnosisRecord};
