pub mod boundary;
pub mod sim;

pub use boundary::Boundary;
pub use sim::{StepStats, World};
