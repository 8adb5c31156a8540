use std::time::{Duration, Instant};

/// Accumulated phase timings of the ensemble, reported through `log`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StepProfiler {
    pub neighbor_time: Duration,
    pub force_time: Duration,
    pub acceleration_time: Duration,
    pub movement_time: Duration,

    pub steps: u64,
    pub particle_count: usize,
    pub contact_count: usize,
}

impl StepProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total_time(&self) -> Duration {
        self.neighbor_time + self.force_time + self.acceleration_time + self.movement_time
    }

    pub fn report(&self) {
        let total_us = self.total_time().as_micros() as f64;
        if total_us < 1.0 {
            return;
        }

        log::info!(
            "Shear profile: {} steps, {} particles, {} contacts, {:.2} ms total",
            self.steps,
            self.particle_count,
            self.contact_count,
            self.total_time().as_secs_f64() * 1000.0
        );
        let phases = [
            ("neighbors", self.neighbor_time),
            ("forces", self.force_time),
            ("acceleration", self.acceleration_time),
            ("movement", self.movement_time),
        ];
        for (label, time) in phases {
            log::info!(
                "  {:<13} {:.2} ms ({:.1}%)",
                label,
                time.as_secs_f64() * 1000.0,
                (time.as_micros() as f64 / total_us) * 100.0
            );
        }
    }
}

/// Adds the lifetime of the guard to a phase duration.
pub struct PhaseTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl<'a> Drop for PhaseTimer<'a> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}
