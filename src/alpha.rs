pub mod fill;
pub mod mask;
