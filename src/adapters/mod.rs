pub mod engine;
pub mod secrets;
pub mod workspace;
