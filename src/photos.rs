//! Photo storage for plant pictures.
//!
//! The HTTP layer only needs "take these image bytes, give me back a URL", so that
//! is all [`PhotoStore`] promises. [`LocalPhotoStore`] writes files into a
//! directory that `main` serves under [`PHOTO_URL_PREFIX`].

use crate::errors::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// URL path under which stored photos are served
pub const PHOTO_URL_PREFIX: &str = "/uploads";

/// Somewhere to keep uploaded plant photos.
///
/// Implementations are called from a blocking task and may do synchronous I/O.
pub trait PhotoStore: Send + Sync {
    /// Stores an image and returns the URL clients should use to fetch it.
    fn save(&self, content_type: &str, bytes: &[u8]) -> Result<String>;
}

/// Writes photos to a local directory.
#[derive(Debug)]
pub struct LocalPhotoStore {
    dir: PathBuf,
}

impl LocalPhotoStore {
    /// Creates the store, creating `dir` if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory photos are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn new_file_name(content_type: &str) -> String {
    format!("{}.{}", Uuid::new_v4(), extension_for(content_type))
}

impl PhotoStore for LocalPhotoStore {
    fn save(&self, content_type: &str, bytes: &[u8]) -> Result<String> {
        let file_name = new_file_name(content_type);
        let path = self.dir.join(&file_name);
        fs::write(&path, bytes)?;
        debug!("Stored {} byte photo at {:?}", bytes.len(), path);
        Ok(format!("{PHOTO_URL_PREFIX}/{file_name}"))
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/heic" => "heic",
        _ => "img",
    }
}
