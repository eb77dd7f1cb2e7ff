//! File upload client.
//!
//! Uploads are fire-and-forget: a worker thread POSTs the file and sends
//! the outcome back over a channel. Failures are logged and mutate
//! nothing; the user may simply retry.

use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use uuid::Uuid;

/// File extensions the upload affordance accepts.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["txt", "json", "csv", "log", "md"];

/// Outcome of one upload attempt, reported back to the UI thread.
/// `stored_name` is the filename assigned by the server.
pub struct UploadOutcome {
    pub node_id: Uuid,
    pub result: Result<String>,
}

pub fn is_accepted(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| ACCEPTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

/// Spawn a worker that uploads `path` to `endpoint` and reports the
/// stored filename over `tx`. Never blocks the frame loop.
pub fn spawn_upload(endpoint: String, path: PathBuf, node_id: Uuid, tx: Sender<UploadOutcome>) {
    std::thread::spawn(move || {
        let result = upload_file(&endpoint, &path);
        if let Err(e) = &result {
            log::error!("File upload failed: {e:#}");
        } else {
            log::info!("Uploaded {} to {}", path.display(), endpoint);
        }
        let _ = tx.send(UploadOutcome { node_id, result });
    });
}

fn upload_file(endpoint: &str, path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading file {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.txt")
        .to_string();

    // The host API takes the file in the "image" field regardless of type.
    let part = reqwest::blocking::multipart::Part::bytes(bytes).file_name(file_name);
    let form = reqwest::blocking::multipart::Form::new()
        .part("image", part)
        .text("overwrite", "true");

    let response = reqwest::blocking::Client::new()
        .post(endpoint)
        .multipart(form)
        .send()
        .with_context(|| format!("posting to {endpoint}"))?;

    if !response.status().is_success() {
        return Err(anyhow!("upload rejected: HTTP {}", response.status()));
    }

    let body: serde_json::Value = response.json().context("parsing upload response")?;
    body.get("name")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .ok_or_else(|| anyhow!("upload response missing 'name'"))
}
