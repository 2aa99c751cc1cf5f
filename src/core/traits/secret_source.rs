/// Port for reading plaintext secrets by name.
///
/// Absence is `None`. Implementations never raise into the core; lookup
/// failures are logged and reported as absent.
pub trait SecretSource {
    fn get(&self, name: &str) -> Option<String>;

    /// Human-readable name of this source (e.g. "env", "file").
    fn name(&self) -> &str;
}
