#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::process::{Command, Output, Stdio};
use std::sync::Arc;

use async_trait::async_trait;
use http::{Method, StatusCode};
use parking_lot::Mutex;
use serde_json::Value;
use tempfile::TempDir;

use catalog::{ApiError, ApiRequest, CatalogBackend, CatalogClient, Result};

/// Helper struct to run catalog commands against an isolated config root
pub struct CatalogTest {
    pub temp_dir: TempDir,
    binary_path: &'static str,
}

impl CatalogTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        CatalogTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_catalog"),
        }
    }

    pub fn root(&self) -> std::path::PathBuf {
        self.temp_dir.path().join(".catalog")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(self.binary_path)
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("CATALOG_ROOT", self.root())
            .env("NO_COLOR", "1")
            .env_remove("CATALOG_API_URL")
            .env_remove("CATALOG_TOKEN")
            .env_remove("CATALOG_LOG")
            .stdin(Stdio::null())
            .output()
            .expect("Failed to execute catalog command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_config(&self, yaml: &str) {
        fs::create_dir_all(self.root()).expect("Failed to create config root");
        fs::write(self.root().join("config.yaml"), yaml).expect("Failed to write config");
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.root().join("config.yaml")).expect("Failed to read config")
    }
}

impl Default for CatalogTest {
    fn default() -> Self {
        Self::new()
    }
}

/// A canned backend reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Ok(Value),
    Status(StatusCode, &'static str),
}

/// In-memory backend keyed by method and path.
///
/// Each route holds a queue of replies; the last one repeats once the
/// others are used up. Unknown routes answer 404. Every request is
/// recorded as `"METHOD endpoint"`.
#[derive(Default)]
pub struct MockBackend {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn next_reply(&self, method: &Method, path: &str) -> Option<Reply> {
        let mut routes = self.routes.lock();
        let queue = routes.get_mut(&(method.clone(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl CatalogBackend for MockBackend {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        self.calls
            .lock()
            .push(format!("{} {}", request.method, request.endpoint()));
        // Let concurrent readers interleave like a real transport would.
        tokio::task::yield_now().await;

        match self.next_reply(&request.method, &request.path) {
            Some(Reply::Ok(body)) => Ok(body),
            Some(Reply::Status(status, message)) => {
                Err(ApiError::with_status(request.path, status, message).into())
            }
            None => Err(ApiError::with_status(request.path, StatusCode::NOT_FOUND, "Not found").into()),
        }
    }
}

pub fn client(backend: &Arc<MockBackend>) -> CatalogClient {
    CatalogClient::from_backend(backend.clone())
}
