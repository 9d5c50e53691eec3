// Keyed numeric tables and their relational operations

pub mod frame;
pub mod join;

pub use frame::Frame;
pub use join::JoinOutcome;
