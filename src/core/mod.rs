pub mod measurement;
pub mod record;

pub use measurement::{Code, DiagnosticTroubleCode, VehicleMessage};
pub use record::Record;
