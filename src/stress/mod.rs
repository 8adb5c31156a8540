//! Stress tensors derived from the force register.

pub mod evaluator;
pub mod tensor;

pub use evaluator::{StressEvaluator, StressTensors};
pub use tensor::StressTensor;
