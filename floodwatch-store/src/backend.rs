use super::Result;
use serde_json::Value;
use std::sync::Arc;

pub type WatchId = u64;

/// Invoked with the current value at the watched path,
/// `None` if there is nothing.
pub type WatchCallback = Arc<dyn Fn(Option<&Value>) + Send + Sync + 'static>;

pub trait JsonBackend {
    fn get(&self, path: &str) -> Result<Option<Value>>;
    /// Replace the value at `path`, `null` deletes it.
    fn set(&self, path: &str, value: Value) -> Result<()>;
    /// Add a child with a generated, chronologically ordered key.
    fn push(&self, path: &str, value: Value) -> Result<String>;
    fn remove(&self, path: &str) -> Result<()>;
    /// The callback is invoked immediately and after every change
    /// within the subtree of `path`.
    fn watch(&self, path: &str, callback: WatchCallback) -> Result<WatchId>;
    fn unwatch(&self, id: WatchId);
}

impl<B> JsonBackend for Arc<B>
where
    B: JsonBackend + ?Sized,
{
    fn get(&self, path: &str) -> Result<Option<Value>> {
        (**self).get(path)
    }
    fn set(&self, path: &str, value: Value) -> Result<()> {
        (**self).set(path, value)
    }
    fn push(&self, path: &str, value: Value) -> Result<String> {
        (**self).push(path, value)
    }
    fn remove(&self, path: &str) -> Result<()> {
        (**self).remove(path)
    }
    fn watch(&self, path: &str, callback: WatchCallback) -> Result<WatchId> {
        (**self).watch(path, callback)
    }
    fn unwatch(&self, id: WatchId) {
        (**self).unwatch(id)
    }
}
