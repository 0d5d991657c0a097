/// Source of the sessions configuration consulted at generation time.
pub trait SessionsSettings: Send + Sync {
    /// Probability in `[0, 1]` that a generated session is marked eligible
    /// for event dispatch. Values outside the range violate the contract.
    fn sampling_rate(&self) -> f64;
}

/// Fixed settings snapshot for callers without a remote settings source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticSettings {
    sampling_rate: f64,
}

impl StaticSettings {
    pub fn new(sampling_rate: f64) -> Self {
        Self { sampling_rate }
    }
}

impl Default for StaticSettings {
    fn default() -> Self {
        Self { sampling_rate: 1.0 }
    }
}

impl SessionsSettings for StaticSettings {
    fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }
}
