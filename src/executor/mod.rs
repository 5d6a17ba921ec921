pub mod accumulator;
pub use accumulator::*;

pub mod eval;
pub use eval::*;
