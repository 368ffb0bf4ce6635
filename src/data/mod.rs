//! Matrix input and connection value extraction

pub mod loader;
pub mod extraction;

pub use loader::load_matrix;
