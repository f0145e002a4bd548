//! REST client for a Firebase style realtime database.
//!
//! Every node of the JSON tree is available at `{db_url}/{path}.json`.
//! Changes are delivered as server sent events.

use anyhow::anyhow;
use floodwatch_store::{Error, JsonBackend, Result, WatchCallback, WatchId};
use reqwest::{
    blocking::{Client, RequestBuilder},
    header::ACCEPT,
    Method,
};
use serde::Deserialize;
use serde_json::Value;
use std::{
    collections::HashMap,
    io::{BufRead, BufReader},
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
    thread,
    time::Duration,
};

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
struct Endpoint {
    db_url: String,
    auth: Option<String>,
}

impl Endpoint {
    fn url(&self, path: &str) -> String {
        let base = self.db_url.trim_end_matches('/');
        let path = path.trim_matches('/');
        format!("{base}/{path}.json")
    }

    fn request(&self, client: &Client, method: Method, path: &str) -> RequestBuilder {
        let request = client.request(method, self.url(path));
        match &self.auth {
            Some(auth) => request.query(&[("auth", auth)]),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<reqwest::blocking::Response> {
        let response = request.send().map_err(other)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(Error::Other(anyhow!("Database responded with {status}: {body}")))
    }

    fn get(&self, path: &str) -> Result<Option<Value>> {
        let client = Client::new();
        let response = self.send(self.request(&client, Method::GET, path))?;
        let value: Value = response.json().map_err(other)?;
        Ok(Some(value).filter(|v| !v.is_null()))
    }
}

fn other(err: reqwest::Error) -> Error {
    Error::Other(err.into())
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

#[derive(Debug)]
pub struct RealtimeDatabase {
    endpoint: Endpoint,
    listeners: Mutex<HashMap<WatchId, Arc<AtomicBool>>>,
    next_watch_id: AtomicU64,
}

impl RealtimeDatabase {
    pub fn new(db_url: impl Into<String>, auth: Option<String>) -> Self {
        Self {
            endpoint: Endpoint {
                db_url: db_url.into(),
                auth,
            },
            listeners: Mutex::new(HashMap::new()),
            next_watch_id: AtomicU64::new(1),
        }
    }
}

impl Drop for RealtimeDatabase {
    fn drop(&mut self) {
        let listeners = self
            .listeners
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for stopped in listeners.values() {
            stopped.store(true, Ordering::Relaxed);
        }
    }
}

impl JsonBackend for RealtimeDatabase {
    fn get(&self, path: &str) -> Result<Option<Value>> {
        self.endpoint.get(path)
    }

    fn set(&self, path: &str, value: Value) -> Result<()> {
        if value.is_null() {
            return self.remove(path);
        }
        let client = Client::new();
        let request = self
            .endpoint
            .request(&client, Method::PUT, path)
            .json(&value);
        self.endpoint.send(request)?;
        Ok(())
    }

    fn push(&self, path: &str, value: Value) -> Result<String> {
        let client = Client::new();
        let request = self
            .endpoint
            .request(&client, Method::POST, path)
            .json(&value);
        let response: PushResponse = self.endpoint.send(request)?.json().map_err(other)?;
        Ok(response.name)
    }

    fn remove(&self, path: &str) -> Result<()> {
        let client = Client::new();
        let request = self.endpoint.request(&client, Method::DELETE, path);
        self.endpoint.send(request)?;
        Ok(())
    }

    fn watch(&self, path: &str, callback: WatchCallback) -> Result<WatchId> {
        let current = self.get(path)?;
        callback(current.as_ref());

        let id = self.next_watch_id.fetch_add(1, Ordering::Relaxed);
        let stopped = Arc::new(AtomicBool::new(false));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, stopped.clone());

        let endpoint = self.endpoint.clone();
        let path = path.to_owned();
        thread::spawn(move || {
            while !stopped.load(Ordering::Relaxed) {
                if let Err(err) = listen(&endpoint, &path, &callback, &stopped) {
                    log::warn!("Lost connection to the event stream of {path}: {err}");
                    thread::sleep(RECONNECT_DELAY);
                }
            }
            log::debug!("Stopped watching {path}");
        });
        Ok(id)
    }

    fn unwatch(&self, id: WatchId) {
        let removed = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if let Some(stopped) = removed {
            stopped.store(true, Ordering::Relaxed);
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum StreamEvent {
    Changed,
    KeepAlive,
    Cancelled,
}

fn stream_event(name: &str) -> Option<StreamEvent> {
    match name.trim() {
        "put" | "patch" => Some(StreamEvent::Changed),
        "keep-alive" => Some(StreamEvent::KeepAlive),
        "cancel" | "auth_revoked" => Some(StreamEvent::Cancelled),
        _ => None,
    }
}

/// Refetch the watched subtree after every change.
///
/// The events only carry the changed part of the
/// subtree, so the whole subtree is loaded again.
fn listen(
    endpoint: &Endpoint,
    path: &str,
    callback: &WatchCallback,
    stopped: &AtomicBool,
) -> Result<()> {
    let client = Client::builder().timeout(None).build().map_err(other)?;
    let request = endpoint
        .request(&client, Method::GET, path)
        .header(ACCEPT, "text/event-stream");
    let reader = BufReader::new(endpoint.send(request)?);
    for line in reader.lines() {
        if stopped.load(Ordering::Relaxed) {
            return Ok(());
        }
        let line = line?;
        let Some(name) = line.strip_prefix("event:") else {
            continue;
        };
        match stream_event(name) {
            Some(StreamEvent::Changed) => {
                let value = endpoint.get(path)?;
                if !stopped.load(Ordering::Relaxed) {
                    callback(value.as_ref());
                }
            }
            Some(StreamEvent::Cancelled) => {
                return Err(Error::Other(anyhow!("Event stream has been cancelled")));
            }
            Some(StreamEvent::KeepAlive) | None => {}
        }
    }
    Err(Error::Other(anyhow!("Event stream closed")))
}
