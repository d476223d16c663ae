pub mod database;
pub mod diagnosis;
pub mod normalize;
pub mod providers;

pub use database::DiagnosisDb;
pub use diagnosis::DiagnosisService;
