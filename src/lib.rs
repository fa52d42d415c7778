pub mod cli;
pub mod ddm;
pub mod error;
pub mod fixture;
pub mod harness;
pub mod logging;
pub mod oracle;

pub use ddm::{deg2ddm, Axis, Coordinate, Ddm};
