pub mod aggregate;
pub mod lifecycle;
pub mod normalize;
