pub mod segment;
pub mod style;
