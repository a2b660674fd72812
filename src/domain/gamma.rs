use serde::{Deserialize, Serialize};

/// Per-task / per-edge execution-time distribution. `shape` and `scale` must both be positive; the
/// sampler (`simulation::gamma_sampler`) enforces this at sample time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaParams {
    pub shape: f64,
    pub scale: f64,
}

impl GammaParams {
    pub fn new(shape: f64, scale: f64) -> Self {
        Self { shape, scale }
    }

    /// The distribution's mean, `shape * scale`. Used by the batch
    /// statistics' theoretical-validation check.
    pub fn mean(&self) -> f64 {
        self.shape * self.scale
    }
}

impl Default for GammaParams {
    fn default() -> Self {
        Self { shape: 1.0, scale: 1.0 }
    }
}
