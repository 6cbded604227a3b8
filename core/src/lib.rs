pub mod probe;
pub mod sweep;
