use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A decoded vehicle measurement payload.
///
/// Trace consumers conventionally encode payloads as
/// `{"name": "...", "value": ...}`. The playback engine never inspects
/// payloads; decoding them is the consumer's step, and this type is
/// that step for the common case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleMessage {
    /// Generic measurement name, e.g. `steering_wheel_angle`
    pub name: String,

    /// Measurement value; numeric, string or boolean depending on the
    /// measurement
    pub value: serde_json::Value,
}

impl VehicleMessage {
    /// Decode a raw payload string into a measurement
    pub fn from_payload(payload: &str) -> Result<Self> {
        serde_json::from_str(payload.trim())
            .with_context(|| format!("not a vehicle measurement payload: {payload}"))
    }
}

/// A code-valued unit, such as a diagnostic trouble code string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Code(String);

impl Code {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The wire form of the code
    pub fn serialized_value(&self) -> &str {
        &self.0
    }
}

/// A diagnostic trouble code reported by the vehicle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticTroubleCode {
    value: Code,
}

impl DiagnosticTroubleCode {
    /// Generic name used for this measurement in trace payloads
    pub const ID: &'static str = "diagnostic_trouble_code";

    pub fn new(dtc: impl Into<String>) -> Self {
        Self {
            value: Code::new(dtc),
        }
    }

    pub fn value(&self) -> &Code {
        &self.value
    }

    pub fn generic_name(&self) -> &'static str {
        Self::ID
    }
}
