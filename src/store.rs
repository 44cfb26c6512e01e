//! JSON document store for channel definitions and the library index.
//!
//! Two whole documents under the data directory: `channels.json` (the
//! ordered channel list) and `library.json` (folder path → episodes).
//! Every read loads the whole document, every write replaces it. A missing
//! or corrupt document reads as empty — persisted state is never allowed to
//! fail a request or startup.

use crate::models::{Channel, Library};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tracing::warn;

const CHANNELS_FILE: &str = "channels.json";
const LIBRARY_FILE: &str = "library.json";

#[derive(Clone, Debug)]
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub async fn read_channels(&self) -> Vec<Channel> {
        self.read_document(CHANNELS_FILE).await
    }

    pub async fn write_channels(&self, channels: &[Channel]) -> std::io::Result<()> {
        self.write_document(CHANNELS_FILE, channels).await
    }

    pub async fn read_library(&self) -> Library {
        self.read_document(LIBRARY_FILE).await
    }

    pub async fn write_library(&self, library: &Library) -> std::io::Result<()> {
        self.write_document(LIBRARY_FILE, library).await
    }

    async fn read_document<T: DeserializeOwned + Default>(&self, file: &str) -> T {
        let path = self.data_dir.join(file);
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(_) => return T::default(),
        };
        match serde_json::from_slice(&data) {
            Ok(value) => value,
            Err(e) => {
                warn!("Corrupt {} treated as empty: {}", file, e);
                T::default()
            }
        }
    }

    async fn write_document<T: Serialize + ?Sized>(
        &self,
        file: &str,
        value: &T,
    ) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        let data = serde_json::to_vec_pretty(value).map_err(std::io::Error::other)?;
        tokio::fs::write(self.data_dir.join(file), data).await
    }
}
