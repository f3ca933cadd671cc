use serde::{Deserialize, Serialize};

/// Default motion speed, matching the controller's own default profile.
pub const DEFAULT_SPEED: f64 = 10.0;

/// Grip change applied by `less-grip` / `more-grip`.
pub const GRIP_STEP: f64 = 0.1;

/// Interpreter tunables.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Speed used for moves (and `set-linear`) until `set-speed` changes it.
    pub speed: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
        }
    }
}
