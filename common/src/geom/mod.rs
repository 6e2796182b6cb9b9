pub mod point;
pub mod span;
