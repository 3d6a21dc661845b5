//! Per-step performance metrics.

use whorl_model::StageTimings;

/// Timing data for a single simulator step.
///
/// All durations are in microseconds. The simulator populates these
/// after each `step()`; consumers read them from the most recent step.
#[derive(Clone, Debug, Default)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step.
    pub total_us: u64,
    /// Time spent applying boundary-condition modifiers.
    pub boundary_us: u64,
    /// Model stage timings (transforms and spectral update).
    pub stages: StageTimings,
    /// Time spent in results writers, zero when no save fired.
    pub write_us: u64,
    /// Number of results writes performed so far.
    pub saves: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.boundary_us, 0);
        assert_eq!(m.stages, StageTimings::default());
        assert_eq!(m.write_us, 0);
        assert_eq!(m.saves, 0);
    }
}
