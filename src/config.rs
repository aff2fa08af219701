//! Persisted configuration stores.
//!
//! Both the currencies store and the items store are hierarchical key-value
//! documents kept as JSON objects on disk. Values are addressed with dotted
//! paths such as `Currencies.gold.Name`, where each segment names a key in a
//! nested object.
//!
//! # Read-or-seed
//!
//! The `read_or_seed_*` helpers implement the merge-on-read contract used by
//! [`CurrencySettings::load`](crate::CurrencySettings::load): when the value
//! at a path is present and has the expected type it is returned as is;
//! otherwise the supplied default is written to that path and returned. After
//! the first load every field therefore exists explicitly on disk, and a
//! second load with unchanged data writes nothing.
//!
//! # File Format
//!
//! ```json
//! {
//!   "Currencies": {
//!     "xp_points": {
//!       "Decimal_Places": 0,
//!       "Enabled": true,
//!       "Format": "%amount% %name%",
//!       "Icon": "experience_bottle",
//!       "Name": "XP Points"
//!     }
//!   }
//! }
//! ```
//!
//! Keys are written in sorted order so that the persisted output is stable
//! across loads.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::ConfigError;

/// File name of the currencies store inside the data directory.
pub const FILE_CURRENCIES: &str = "currencies.json";

/// File name of the items store inside the data directory.
pub const FILE_ITEMS: &str = "items.json";

/// An in-memory hierarchical key-value document.
///
/// Tracks whether any call to [`set`](Self::set) actually changed the
/// document since the last [`mark_saved`](Self::mark_saved).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    root: Map<String, Value>,
    changed: bool,
}

impl ConfigDocument {
    /// Creates an empty document.
    pub fn new() -> Self { Self::default() }

    /// Wraps an existing JSON value. Returns `None` if `value` is not an
    /// object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(root) => Some(Self { root, changed: false }),
            _ => None,
        }
    }

    /// Returns the whole document as a JSON value.
    pub fn to_value(&self) -> Value { Value::Object(self.root.clone()) }

    /// Renders the document as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.root)
    }

    /// Returns true if the document was modified since it was last saved.
    pub fn is_changed(&self) -> bool { self.changed }

    /// Clears the modification flag.
    pub fn mark_saved(&mut self) { self.changed = false; }

    /// Returns true if the document has no top-level keys.
    pub fn is_empty(&self) -> bool { self.root.is_empty() }

    /// Looks up the value at a dotted path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut keys = split_path(path);
        let mut current = self.root.get(keys.next()?)?;
        for key in keys {
            current = current.as_object()?.get(key)?;
        }
        Some(current)
    }

    /// Returns true if any value, including a section, exists at `path`.
    pub fn contains(&self, path: &str) -> bool { self.get(path).is_some() }

    /// Returns the string at `path`, if present and a string.
    pub fn get_string(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Returns the keys of the section at `path`.
    ///
    /// Returns an empty list when the path is absent or not a section.
    pub fn section_keys(&self, path: &str) -> Vec<String> {
        self.get(path)
            .and_then(Value::as_object)
            .map(|section| section.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Writes `value` at a dotted path, creating intermediate sections.
    ///
    /// Any non-section value standing where a section is needed is replaced.
    /// Writing a value equal to the one already stored leaves the document
    /// unchanged.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let value = value.into();
        let keys: Vec<&str> = split_path(path).collect();
        let Some((last, parents)) = keys.split_last() else {
            return;
        };

        let mut section = &mut self.root;
        for key in parents {
            let entry = section
                .entry(*key)
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
                self.changed = true;
            }
            section = match entry.as_object_mut() {
                Some(inner) => inner,
                None => return,
            };
        }

        if section.get(*last) != Some(&value) {
            section.insert((*last).to_string(), value);
            self.changed = true;
        }
    }

    /// Reads a string at `path`, seeding `default` when absent or not a
    /// string.
    pub fn read_or_seed_string(&mut self, path: &str, default: &str) -> String {
        if let Some(value) = self.get_string(path) {
            return value.to_string();
        }
        self.set(path, default);
        default.to_string()
    }

    /// Reads a bool at `path`, seeding `default` when absent or not a bool.
    pub fn read_or_seed_bool(&mut self, path: &str, default: bool) -> bool {
        if let Some(value) = self.get(path).and_then(Value::as_bool) {
            return value;
        }
        self.set(path, default);
        default
    }

    /// Reads an unsigned integer at `path`, seeding `default` when absent,
    /// negative, fractional, or out of range.
    pub fn read_or_seed_u32(&mut self, path: &str, default: u32) -> u32 {
        if let Some(value) = self
            .get(path)
            .and_then(Value::as_u64)
            .and_then(|value| u32::try_from(value).ok())
        {
            return value;
        }
        self.set(path, default);
        default
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|key| !key.is_empty())
}

/// A configuration document optionally backed by a file.
///
/// In-memory files never touch the filesystem; [`save_changes`]
/// only clears their modification flag.
///
/// [`save_changes`]: Self::save_changes
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    path: Option<PathBuf>,
    document: ConfigDocument,
}

impl ConfigFile {
    /// Creates a file that lives only in memory.
    pub fn in_memory() -> Self { Self::default() }

    /// Creates an in-memory file from an existing document.
    pub fn from_document(document: ConfigDocument) -> Self {
        Self { path: None, document }
    }

    /// Loads the document at `path`, or starts an empty one if the file does
    /// not exist yet.
    ///
    /// A missing file is marked as changed so the next
    /// [`save_changes`](Self::save_changes) creates it.
    pub fn load_or_create(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if !path.exists() {
            let mut document = ConfigDocument::new();
            document.changed = true;
            return Ok(Self { path: Some(path), document });
        }

        let content = fs::read_to_string(&path).map_err(|error| ConfigError::Io {
            file: path.clone(),
            error,
        })?;
        let document = if content.trim().is_empty() {
            ConfigDocument::new()
        } else {
            let value: Value =
                serde_json::from_str(&content).map_err(|error| ConfigError::Json {
                    file: path.clone(),
                    error,
                })?;
            ConfigDocument::from_value(value)
                .ok_or_else(|| ConfigError::NotAnObject { file: path.clone() })?
        };
        Ok(Self { path: Some(path), document })
    }

    /// Returns the backing path, if any.
    pub fn path(&self) -> Option<&Path> { self.path.as_deref() }

    /// Returns the document.
    pub fn document(&self) -> &ConfigDocument { &self.document }

    /// Returns the document for modification.
    pub fn document_mut(&mut self) -> &mut ConfigDocument { &mut self.document }

    /// Writes the document to its backing file if it changed.
    ///
    /// Returns `Ok(true)` if the file was written.
    pub fn save_changes(&mut self) -> Result<bool, ConfigError> {
        if !self.document.is_changed() {
            return Ok(false);
        }
        let Some(path) = &self.path else {
            self.document.mark_saved();
            return Ok(false);
        };

        let content = self.document.to_json_string().map_err(|error| {
            ConfigError::Json { file: path.clone(), error }
        })?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|error| ConfigError::Io {
                file: parent.to_path_buf(),
                error,
            })?;
        }
        fs::write(path, content).map_err(|error| ConfigError::Io {
            file: path.clone(),
            error,
        })?;
        self.document.mark_saved();
        Ok(true)
    }
}

/// Location of the persisted stores.
///
/// # Examples
///
/// ```rust,ignore
/// use currency_bridge::StorageConfig;
///
/// // Use the default directory (~/.currency-bridge/)
/// let config = StorageConfig::default_only();
///
/// // Use a custom directory
/// let config = StorageConfig::with_directory("/srv/economy".into());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    directory: PathBuf,
}

impl StorageConfig {
    /// Creates configuration rooted at `directory`.
    pub fn with_directory(directory: PathBuf) -> Self { Self { directory } }

    /// Creates configuration rooted at the default directory.
    #[cfg(feature = "default-directory")]
    pub fn default_only() -> Self {
        Self { directory: Self::default_directory() }
    }

    /// Returns the default directory: `~/.currency-bridge/`
    ///
    /// Falls back to `./.currency-bridge/` if the home directory cannot be
    /// determined.
    #[cfg(feature = "default-directory")]
    pub fn default_directory() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".currency-bridge")
    }

    /// Returns the data directory.
    pub fn directory(&self) -> &Path { &self.directory }

    /// Path of the currencies store.
    pub fn currencies_path(&self) -> PathBuf { self.directory.join(FILE_CURRENCIES) }

    /// Path of the items store.
    pub fn items_path(&self) -> PathBuf { self.directory.join(FILE_ITEMS) }
}
