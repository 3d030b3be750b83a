//! Per-annotator session context: clip list, cursor, schema and settings.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::{Schema, Settings};

/// Drive file id in `/file/d/<ID>/`, `open?id=<ID>` or `?id=<ID>` form.
#[allow(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static DRIVE_FILE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/file/d/([^/?#&]+)|open\?id=([^&#]+)|id=([^&#]+)").unwrap());

/// Where a clip's video comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "location")]
pub enum ClipSource {
    File(PathBuf),
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clip {
    pub name: String,
    pub source: ClipSource,
}

impl Clip {
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self { name, source: ClipSource::File(path.to_path_buf()) }
    }

    /// Video id suggested to the annotator before they edit it.
    ///
    /// File clips use the file name without a `.mp4` suffix; URL clips use the URL.
    #[must_use]
    pub fn default_video_id(&self) -> String {
        match &self.source {
            ClipSource::File(_) => strip_mp4(&self.name).to_owned(),
            ClipSource::Url(url) => url.clone(),
        }
    }
}

fn strip_mp4(name: &str) -> &str {
    let cut = name.len().saturating_sub(4);
    match (name.get(..cut), name.get(cut..)) {
        (Some(stem), Some(ext)) if ext.eq_ignore_ascii_case(".mp4") => stem,
        _ => name,
    }
}

/// Turns a Google Drive share link into a direct download URL.
///
/// Non-Drive URLs, and Drive URLs without a recognizable file id, are returned trimmed.
#[must_use]
pub fn normalize_drive_link(url: &str) -> String {
    let url = url.trim();
    if !url.contains("drive.google.com") {
        return url.to_owned();
    }
    let file_id = DRIVE_FILE_ID
        .captures(url)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str())
        .filter(|id| !id.is_empty());
    match file_id {
        Some(id) => format!("https://drive.google.com/uc?export=download&id={id}"),
        None => url.to_owned(),
    }
}

/// Parses one URL per line, skipping blank lines and normalizing Drive links.
#[must_use]
pub fn clips_from_url_list(text: &str) -> Vec<Clip> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| Clip {
            name: format!("URL {}", i.saturating_add(1)),
            source: ClipSource::Url(normalize_drive_link(line)),
        })
        .collect()
}

/// Everything one annotator session needs, built once and passed explicitly.
#[derive(Debug, Clone)]
pub struct LabelSession {
    pub settings: Settings,
    pub schema: Schema,
    clips: Vec<Clip>,
    cursor: usize,
}

impl LabelSession {
    #[must_use]
    pub const fn new(settings: Settings, schema: Schema, clips: Vec<Clip>) -> Self {
        Self { settings, schema, clips, cursor: 0 }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Clip> {
        self.clips.get(self.cursor)
    }

    /// Zero-based cursor and clip count.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.cursor, self.clips.len())
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.cursor.saturating_add(1) >= self.clips.len()
    }

    /// Moves to the next clip; returns `false` when already on the last one.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.cursor = self.cursor.saturating_add(1);
        true
    }

    /// Moves to the previous clip; returns `false` when already on the first one.
    pub fn previous(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor = self.cursor.saturating_sub(1);
        true
    }

    #[must_use]
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }
}
