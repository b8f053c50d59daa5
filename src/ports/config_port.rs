//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    /// Integer value of `key`, or `default` when absent or not an integer.
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
}
