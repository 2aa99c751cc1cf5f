pub mod engine;
pub mod secret_source;
