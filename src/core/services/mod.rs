pub mod encryption_service;
pub mod identity_resolver;
pub mod key_registry;

#[cfg(test)]
pub mod fake_engine;
