pub mod conversions;

pub use conversions::InfraError;
