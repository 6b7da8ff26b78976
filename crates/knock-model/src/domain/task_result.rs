use serde::{Deserialize, Serialize};

/// Outcome of a single task operation.
///
/// Serialized with the wire field names `Retcode` and `Err`.
/// A zero `retcode` always carries an empty `err`; the constructors and deserialization keep it that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireResult")]
pub struct TaskResult {
    /// Result code, `0` on success.
    #[serde(rename = "Retcode")]
    retcode: i32,
    /// Failure detail, empty unless `retcode != 0`.
    #[serde(rename = "Err", default)]
    err: String,
}

impl TaskResult {
    /// Successful result.
    pub fn ok() -> Self {
        Self {
            retcode: 0,
            err: String::new(),
        }
    }

    /// Failed result with the given code and detail.
    ///
    /// A zero code is not a failure: it is kept as success and the detail is dropped.
    pub fn failed(retcode: i32, err: impl Into<String>) -> Self {
        if retcode == 0 {
            return Self::ok();
        }
        Self {
            retcode,
            err: err.into(),
        }
    }

    pub fn retcode(&self) -> i32 {
        self.retcode
    }

    pub fn err(&self) -> &str {
        &self.err
    }

    pub fn is_success(&self) -> bool {
        self.retcode == 0
    }
}

#[derive(Deserialize)]
struct WireResult {
    #[serde(rename = "Retcode")]
    retcode: i32,
    #[serde(rename = "Err", default)]
    err: String,
}

impl From<WireResult> for TaskResult {
    fn from(wire: WireResult) -> Self {
        Self::failed(wire.retcode, wire.err)
    }
}

impl Default for TaskResult {
    fn default() -> Self {
        Self::ok()
    }
}
