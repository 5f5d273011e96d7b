//! Configuration access port trait.

/// Key/value configuration lookup by section.
///
/// `get_string` returns the raw value so callers can reject malformed numbers.
/// `get_bool` falls back to `default` when the key is absent or not a boolean.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
