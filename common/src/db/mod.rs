pub mod core;
pub mod gap;
pub mod indices;
