use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use log::{info, warn};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    models::feedback::{FeedbackEntry, ANONYMOUS, DATE_FORMAT},
    validation::Rejected,
};

/// Append-only feedback board persisted as a JSON array.
pub struct FeedbackStore {
    path: PathBuf,
    // Serializes read-append-rewrite within this process
    write_lock: Mutex<()>,
}

impl FeedbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FeedbackStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Every stored entry, oldest first. A missing or unreadable file is an
    /// empty board.
    pub async fn load(&self) -> Vec<FeedbackEntry> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!("failed to read {}: {}", self.path.display(), err);
                return Vec::new();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            warn!(
                "{} is not a valid feedback list, treating as empty: {}",
                self.path.display(),
                err
            );
            Vec::new()
        })
    }

    /// Up to `limit` entries, newest first.
    pub async fn recent(&self, limit: usize) -> Vec<FeedbackEntry> {
        self.load().await.into_iter().rev().take(limit).collect()
    }

    pub async fn submit(
        &self,
        name: Option<&str>,
        rating: i64,
        text: &str,
    ) -> Result<FeedbackEntry> {
        if text.trim().is_empty() {
            return Err(Rejected("Please share your feedback before submitting.".to_string()).into());
        }
        let rating = match u8::try_from(rating) {
            Ok(rating) if (1..=5).contains(&rating) => rating,
            _ => {
                return Err(Rejected(format!("Rating must be between 1 and 5, got {rating}")).into())
            }
        };

        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(ANONYMOUS);

        let entry = FeedbackEntry {
            name: name.to_string(),
            rating,
            feedback: text.to_string(),
            date: Local::now().format(DATE_FORMAT).to_string(),
        };

        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await;
        entries.push(entry.clone());
        self.save(&entries).await?;

        info!("stored feedback from {} ({} stars)", entry.name, entry.rating);
        Ok(entry)
    }

    async fn save(&self, entries: &[FeedbackEntry]) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        entries
            .serialize(&mut serializer)
            .context("Failed to serialize feedback")?;

        tokio::fs::write(&self.path, buf)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
