use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing::warn;

/// A whole-value json file, the durable equivalent of a browser
/// local-storage key. Read and parse failures fall open to the default
/// value: the caller never observes storage corruption, at the price of
/// silently losing the stored data in that case.
pub struct JsonFile<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn load(&self) -> T {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return T::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "Unable to parse stored data at {}, treating store as empty: {:?}",
                    self.path.display(),
                    e
                );
                T::default()
            }
        }
    }

    pub fn store(&self, value: &T) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(value)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}
