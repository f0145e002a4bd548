use super::{
    backend::{JsonBackend, WatchCallback, WatchId},
    path::{is_within, segments},
    Result,
};
use floodwatch_entities::time::Timestamp;
use serde_json::{Map, Value};
use std::{
    io,
    path::Path,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

const TREE_ID: &str = "tree";

/// A JSON tree kept in memory and optionally
/// written to a JSON file after every change.
pub struct MemoryBackend {
    tree: Mutex<Value>,
    watchers: Mutex<Vec<(WatchId, String, WatchCallback)>>,
    next_watch_id: AtomicU64,
    push_counter: AtomicU64,
    json_store: Option<jfs::Store>,
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("persistent", &self.json_store.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::with_tree(Value::Null, None)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the tree from `directory` if it has been saved before.
    pub fn with_json_file<P: AsRef<Path>>(directory: P) -> io::Result<Self> {
        let json_store = jfs::Store::new(directory)?;
        let tree = match json_store.get::<Value>(TREE_ID) {
            Ok(tree) => tree,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Value::Null,
            Err(err) => return Err(err),
        };
        log::debug!("Using JSON file store in {}", json_store.path().display());
        Ok(Self::with_tree(tree, Some(json_store)))
    }

    fn with_tree(tree: Value, json_store: Option<jfs::Store>) -> Self {
        Self {
            tree: Mutex::new(tree),
            watchers: Mutex::new(Vec::new()),
            next_watch_id: AtomicU64::new(1),
            push_counter: AtomicU64::new(0),
            json_store,
        }
    }

    fn persist(&self, tree: &Value) -> Result<()> {
        if let Some(store) = &self.json_store {
            store.save_with_id(tree, TREE_ID)?;
        }
        Ok(())
    }

    /// Apply `f` to the tree, save it and inform all affected watchers.
    fn modify<F>(&self, path: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Value),
    {
        {
            let mut tree = lock(&self.tree);
            let mut updated = tree.clone();
            f(&mut updated);
            prune(&mut updated);
            // the tree in memory must not get ahead of the file
            self.persist(&updated)?;
            *tree = updated;
        }
        self.notify(path);
        Ok(())
    }

    fn notify(&self, changed: &str) {
        let affected: Vec<_> = lock(&self.watchers)
            .iter()
            .filter(|(_, path, _)| is_within(changed, path) || is_within(path, changed))
            .map(|(_, path, cb)| (path.clone(), cb.clone()))
            .collect();
        for (path, cb) in affected {
            let value = lookup(&lock(&self.tree), &path).cloned();
            cb(value.as_ref());
        }
    }

    fn next_push_key(&self) -> String {
        let now = Timestamp::now().as_millis();
        let count = self.push_counter.fetch_add(1, Ordering::Relaxed);
        format!("-{now:012x}{count:06x}")
    }
}

fn lookup<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path)
        .try_fold(tree, |node, key| node.as_object()?.get(key))
        .filter(|v| !v.is_null())
}

/// Get the node at `path`, creating missing parents on the way.
fn entry<'a>(tree: &'a mut Value, path: &str) -> &'a mut Value {
    segments(path).fold(tree, |node, key| {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        &mut node[key]
    })
}

/// Remove `null` values and empty objects.
fn prune(node: &mut Value) {
    if let Value::Object(map) = node {
        map.values_mut().for_each(prune);
        map.retain(|_, v| !v.is_null());
        if map.is_empty() {
            *node = Value::Null;
        }
    }
}

impl JsonBackend for MemoryBackend {
    fn get(&self, path: &str) -> Result<Option<Value>> {
        Ok(lookup(&lock(&self.tree), path).cloned())
    }

    fn set(&self, path: &str, value: Value) -> Result<()> {
        self.modify(path, |tree| *entry(tree, path) = value)
    }

    fn push(&self, path: &str, value: Value) -> Result<String> {
        let key = self.next_push_key();
        let child = format!("{path}/{key}");
        self.modify(&child, |tree| *entry(tree, &child) = value)?;
        Ok(key)
    }

    fn remove(&self, path: &str) -> Result<()> {
        self.set(path, Value::Null)
    }

    fn watch(&self, path: &str, callback: WatchCallback) -> Result<WatchId> {
        let id = self.next_watch_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.watchers).push((id, path.to_owned(), callback.clone()));
        let value = self.get(path)?;
        callback(value.as_ref());
        Ok(id)
    }

    fn unwatch(&self, id: WatchId) {
        lock(&self.watchers).retain(|(watch_id, _, _)| *watch_id != id);
    }
}
