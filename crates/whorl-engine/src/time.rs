//! Simulation time tracking and save scheduling.

use std::fmt;

/// When the simulator should write results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveSchedule {
    /// Never write results.
    Never,
    /// Write after every increment (and at the start).
    EveryIncrement,
    /// Write every `stride` increments, plus at the start and at
    /// termination.
    Stride(u64),
}

/// Errors from time control.
#[derive(Clone, Debug, PartialEq)]
pub enum TimeError {
    /// The time increment is not a positive finite number.
    NonPositiveIncrement {
        /// The offending increment.
        dt: f64,
    },
    /// The end time precedes the start time.
    InvertedWindow {
        /// Start time.
        t0: f64,
        /// End time.
        t1: f64,
    },
    /// A stride of zero can never fire.
    ZeroStride,
    /// `next` was called after the simulation was already done. This
    /// is a contract violation in the caller, not a runtime fault.
    AlreadyDone,
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveIncrement { dt } => {
                write!(f, "time increment must be positive and finite, got {dt}")
            }
            Self::InvertedWindow { t0, t1 } => {
                write!(f, "end time {t1} precedes start time {t0}")
            }
            Self::ZeroStride => write!(f, "save stride must be at least 1"),
            Self::AlreadyDone => write!(f, "simulation time already at its end"),
        }
    }
}

impl std::error::Error for TimeError {}

/// Tracks `t = t0 + n * dt`, decides termination and the save cadence.
///
/// `n` strictly increases by one per [`next`](Self::next) call, and
/// [`done`](Self::done) is monotone: once true it stays true without
/// further `next` calls.
#[derive(Clone, Debug)]
pub struct TimeController {
    t0: f64,
    t1: f64,
    dt: f64,
    n: u64,
    max_increments: u64,
    schedule: SaveSchedule,
}

impl TimeController {
    /// Controller over the window `[t0, t1]` with increment `dt`.
    pub fn new(t0: f64, t1: f64, dt: f64, schedule: SaveSchedule) -> Result<Self, TimeError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(TimeError::NonPositiveIncrement { dt });
        }
        if !t0.is_finite() || !t1.is_finite() || t1 < t0 {
            return Err(TimeError::InvertedWindow { t0, t1 });
        }
        if schedule == SaveSchedule::Stride(0) {
            return Err(TimeError::ZeroStride);
        }
        Ok(Self {
            t0,
            t1,
            dt,
            n: 0,
            max_increments: u64::MAX,
            schedule,
        })
    }

    /// Caps the run regardless of `t1`: the controller is done once
    /// the increment counter exceeds `max`.
    pub fn with_max_increments(mut self, max: u64) -> Self {
        self.max_increments = max;
        self
    }

    /// Current simulation time.
    pub fn t(&self) -> f64 {
        self.t0 + self.n as f64 * self.dt
    }

    /// Time increment per step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of increments taken so far.
    pub fn increment(&self) -> u64 {
        self.n
    }

    /// Whether the simulation has reached its end.
    pub fn done(&self) -> bool {
        self.n > self.max_increments || self.t() >= self.t1
    }

    /// Advances to the next increment.
    pub fn next(&mut self) -> Result<(), TimeError> {
        if self.done() {
            return Err(TimeError::AlreadyDone);
        }
        self.n += 1;
        Ok(())
    }

    /// Whether results should be written at the current increment.
    pub fn do_save(&self) -> bool {
        match self.schedule {
            SaveSchedule::Never => false,
            SaveSchedule::EveryIncrement => true,
            SaveSchedule::Stride(stride) => {
                self.n % stride == 0 || self.done()
            }
        }
    }
}

impl fmt::Display for TimeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n = {}, t = {:.6} (t0 = {}, t1 = {}, dt = {})",
            self.n,
            self.t(),
            self.t0,
            self.t1,
            self.dt
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn termination_lands_exactly_on_the_end_time() {
        let mut time = TimeController::new(0.0, 10.0, 1.0, SaveSchedule::Never).unwrap();
        for n in 0..10 {
            assert!(!time.done(), "done too early at n = {n}");
            time.next().unwrap();
        }
        assert_eq!(time.increment(), 10);
        assert_eq!(time.t(), 10.0);
        assert!(time.done());
        assert_eq!(time.next().unwrap_err(), TimeError::AlreadyDone);
        // done() stays true without further calls.
        assert!(time.done());
    }

    #[test]
    fn max_increments_terminates_early() {
        let mut time = TimeController::new(0.0, 1e9, 1.0, SaveSchedule::Never)
            .unwrap()
            .with_max_increments(3);
        time.next().unwrap();
        time.next().unwrap();
        time.next().unwrap();
        // The cap fires once the counter exceeds the maximum, not when
        // it reaches it.
        assert!(!time.done());
        time.next().unwrap();
        assert!(time.done());
        assert_eq!(time.increment(), 4);
        assert_eq!(time.next().unwrap_err(), TimeError::AlreadyDone);
    }

    #[test]
    fn stride_schedule_fires_on_the_expected_increments() {
        let mut time = TimeController::new(0.0, 10.0, 1.0, SaveSchedule::Stride(2)).unwrap();
        let mut saves = Vec::new();
        if time.do_save() {
            saves.push(time.increment());
        }
        while !time.done() {
            time.next().unwrap();
            if time.do_save() {
                saves.push(time.increment());
            }
        }
        assert_eq!(saves, [0, 2, 4, 6, 8, 10]);
    }

    #[test]
    fn stride_savers_include_termination() {
        // 7 increments with stride 3: termination at n = 7 forces a
        // final save even though 7 % 3 != 0.
        let mut time = TimeController::new(0.0, 7.0, 1.0, SaveSchedule::Stride(3)).unwrap();
        let mut saves = Vec::new();
        if time.do_save() {
            saves.push(time.increment());
        }
        while !time.done() {
            time.next().unwrap();
            if time.do_save() {
                saves.push(time.increment());
            }
        }
        assert_eq!(saves, [0, 3, 6, 7]);
    }

    #[test]
    fn never_schedule_never_saves() {
        let mut time = TimeController::new(0.0, 3.0, 1.0, SaveSchedule::Never).unwrap();
        assert!(!time.do_save());
        while !time.done() {
            time.next().unwrap();
            assert!(!time.do_save());
        }
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        assert_eq!(
            TimeController::new(0.0, 1.0, 0.0, SaveSchedule::Never).unwrap_err(),
            TimeError::NonPositiveIncrement { dt: 0.0 }
        );
        assert_eq!(
            TimeController::new(0.0, 1.0, -0.5, SaveSchedule::Never).unwrap_err(),
            TimeError::NonPositiveIncrement { dt: -0.5 }
        );
        assert_eq!(
            TimeController::new(2.0, 1.0, 0.1, SaveSchedule::Never).unwrap_err(),
            TimeError::InvertedWindow { t0: 2.0, t1: 1.0 }
        );
        assert_eq!(
            TimeController::new(0.0, 1.0, 0.1, SaveSchedule::Stride(0)).unwrap_err(),
            TimeError::ZeroStride
        );
    }

    #[test]
    fn status_line_reports_time_and_increment() {
        let time = TimeController::new(0.0, 10.0, 0.5, SaveSchedule::Never).unwrap();
        let line = time.to_string();
        assert!(line.contains("n = 0"));
        assert!(line.contains("t1 = 10"));
    }
}
