pub mod telemetry;
pub mod types;
