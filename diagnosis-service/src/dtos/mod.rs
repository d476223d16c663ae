pub mod diagnosis;

pub use diagnosis::{DiagnoseRequest, DiagnosisResponse};
