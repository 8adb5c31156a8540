//! Utility helpers: periodic math, logging guards, diagnostics, and profiling.

pub mod logging;
pub mod math;
pub mod profiling;

pub use logging::{Diagnostics, ScopedTimer};
pub use math::*;
pub use profiling::{PhaseTimer, StepProfiler};
