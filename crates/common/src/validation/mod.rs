// Validation Module - field validators shared by request handlers and config
mod validators;

pub use validators::{EmailValidator, FieldValidator};
