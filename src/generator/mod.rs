pub mod generator;

pub use generator::RequestGenerator;
