//! Cache of loaded bus descriptors.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::builtin::builtin;
use crate::descriptor::BusDescriptor;
use crate::error::BusError;

/// Loads each bus descriptor once and hands out shared references.
///
/// A descriptor file `<dir>/<name>.toml` in the user bus directory takes
/// precedence over the built-in definition of the same name.
#[derive(Default)]
pub struct BusLibrary {
    dir: Option<PathBuf>,
    loaded: BTreeMap<String, Arc<BusDescriptor>>,
}

impl BusLibrary {
    /// A library with only the built-in descriptors.
    pub fn new() -> Self {
        Self::default()
    }

    /// A library that also looks in `dir` for descriptor files.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            loaded: BTreeMap::new(),
        }
    }

    /// Registers an already-built descriptor under its own name.
    pub fn insert(&mut self, desc: BusDescriptor) -> Arc<BusDescriptor> {
        let desc = Arc::new(desc);
        self.loaded.insert(desc.name().to_string(), Arc::clone(&desc));
        desc
    }

    /// Returns the descriptor called `name`, loading it on first use.
    pub fn get(&mut self, name: &str) -> Result<Arc<BusDescriptor>, BusError> {
        if let Some(desc) = self.loaded.get(name) {
            return Ok(Arc::clone(desc));
        }
        let desc = self.load(name)?;
        log::debug!("loaded bus descriptor '{}' ({})", name, desc.protocol());
        Ok(self.insert(desc))
    }

    /// Names of descriptors loaded so far.
    pub fn loaded_names(&self) -> impl Iterator<Item = &str> {
        self.loaded.keys().map(String::as_str)
    }

    fn load(&self, name: &str) -> Result<BusDescriptor, BusError> {
        if let Some(path) = self.file_for(name) {
            let content = std::fs::read_to_string(&path)?;
            return BusDescriptor::from_toml(&content, &path.display().to_string());
        }
        builtin(name).unwrap_or_else(|| Err(BusError::UnknownBus(name.to_string())))
    }

    fn file_for(&self, name: &str) -> Option<PathBuf> {
        let dir: &Path = self.dir.as_deref()?;
        let path = dir.join(format!("{name}.toml"));
        path.is_file().then_some(path)
    }
}
