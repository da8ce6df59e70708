//! Hooks for watching a tick progress.

/// Observes the phases of a pool tick.
///
/// Every method has a no-op default; implement only what you need (debug
/// overlays, profiling, logging). `strand` is the index of the strand inside
/// its pool.
pub trait StepObserver {
    /// Gravity has been applied and predictions advanced.
    fn on_external_forces(&mut self, _strand: usize) {}

    /// One distance sweep plus pin enforcement finished.
    fn on_constraint_iteration(&mut self, _strand: usize, _iteration: usize) {}

    /// Velocities were rebuilt and positions committed.
    fn on_integrate(&mut self, _strand: usize) {}

    /// Collision resolution corrected `contacts` segments.
    fn on_collision(&mut self, _strand: usize, _contacts: usize) {}

    /// The strand produced non-finite state and was rolled back.
    fn on_tick_rejected(&mut self, _strand: usize) {}

    /// Every strand has been advanced.
    fn on_tick_complete(&mut self) {}
}

/// Observer that does nothing.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}

/// Observer that forwards every phase to the `log` facade at trace level.
pub struct LogObserver;

impl StepObserver for LogObserver {
    fn on_external_forces(&mut self, strand: usize) {
        log::trace!("strand {}: external forces applied", strand);
    }

    fn on_constraint_iteration(&mut self, strand: usize, iteration: usize) {
        log::trace!("strand {}: constraint sweep {}", strand, iteration);
    }

    fn on_integrate(&mut self, strand: usize) {
        log::trace!("strand {}: committed", strand);
    }

    fn on_collision(&mut self, strand: usize, contacts: usize) {
        if contacts > 0 {
            log::trace!("strand {}: {} segment(s) pushed out of collider", strand, contacts);
        }
    }

    fn on_tick_rejected(&mut self, strand: usize) {
        log::trace!("strand {}: tick rejected", strand);
    }

    fn on_tick_complete(&mut self) {
        log::trace!("tick complete");
    }
}
