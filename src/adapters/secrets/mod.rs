pub mod env_secret_source;
pub mod file_secret_source;
