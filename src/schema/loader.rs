//! Schema loader for reading schema definitions from disk
//!
//! - Schemas stored as `<dir>/schema_<id>_<version>.json`
//! - One file per schema version
//! - Registered schemas are immutable

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

const FILE_PREFIX: &str = "schema_";
const FILE_SUFFIX: &str = ".json";

/// File name a schema is stored under
pub fn schema_file_name(schema_id: &str, schema_version: &str) -> String {
    format!("{}{}_{}{}", FILE_PREFIX, schema_id, schema_version, FILE_SUFFIX)
}

/// Reads schema files from a directory and keeps an in-memory registry.
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
    /// Loaded schemas indexed by (schema_id, schema_version)
    schemas: HashMap<(String, String), Schema>,
}

impl SchemaLoader {
    /// Creates a loader for the given schema directory.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: HashMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `schema_<id>_<version>.json` file in the schema directory.
    ///
    /// Other files are skipped. A schema whose id or version disagrees with
    /// its file name is refused.
    /// A missing directory is treated as empty. Any unreadable or malformed
    /// file aborts the load.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        if !self.schema_dir.exists() {
            tracing::warn!(dir = %self.schema_dir.display(), "Schema directory does not exist");
            return Ok(0);
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut loaded = 0;
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            let is_schema_file = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX));
            if !is_schema_file {
                tracing::debug!(path = %path.display(), "Skipping non-schema file");
                continue;
            }

            let schema = Self::read_schema_file(&path)?;
            let expected = schema_file_name(&schema.schema_id, &schema.schema_version);
            if path.file_name().and_then(|name| name.to_str()) != Some(expected.as_str()) {
                return Err(SchemaError::malformed(
                    path.display().to_string(),
                    format!("File name does not match schema, expected '{}'", expected),
                ));
            }
            self.register(schema)?;
            loaded += 1;
        }

        tracing::info!(count = loaded, dir = %self.schema_dir.display(), "Loaded schemas");
        Ok(loaded)
    }

    /// Reads and validates a single schema file without registering it.
    pub fn read_schema_file(path: &Path) -> SchemaResult<Schema> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let schema: Schema = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed(path.display().to_string(), e))?;

        Ok(schema)
    }

    /// Registers a schema directly.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<()> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed("<in-memory>", e))?;

        let key = (schema.schema_id.clone(), schema.schema_version.clone());
        if self.schemas.contains_key(&key) {
            return Err(SchemaError::immutable(&schema.schema_id, &schema.schema_version));
        }

        self.schemas.insert(key, schema);
        Ok(())
    }

    /// Gets a schema by ID and version.
    pub fn get(&self, schema_id: &str, schema_version: &str) -> Option<&Schema> {
        self.schemas
            .get(&(schema_id.to_string(), schema_version.to_string()))
    }

    /// Gets a schema, distinguishing an unknown ID from an unknown version.
    pub fn require(&self, schema_id: &str, schema_version: &str) -> SchemaResult<&Schema> {
        if !self.schema_id_exists(schema_id) {
            return Err(SchemaError::UnknownSchema(schema_id.to_string()));
        }
        self.get(schema_id, schema_version)
            .ok_or_else(|| SchemaError::unknown_version(schema_id, schema_version))
    }

    pub fn exists(&self, schema_id: &str, schema_version: &str) -> bool {
        self.get(schema_id, schema_version).is_some()
    }

    /// Checks if any version of a schema ID exists.
    pub fn schema_id_exists(&self, schema_id: &str) -> bool {
        self.schemas.keys().any(|(id, _)| id == schema_id)
    }

    pub fn all_schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Writes a schema to `<dir>/schema_<id>_<version>.json`.
    pub fn save_schema(&self, schema: &Schema) -> SchemaResult<PathBuf> {
        let path = self
            .schema_dir
            .join(schema_file_name(&schema.schema_id, &schema.schema_version));

        if path.exists() {
            return Err(SchemaError::immutable(&schema.schema_id, &schema.schema_version));
        }

        fs::create_dir_all(&self.schema_dir).map_err(|e| {
            SchemaError::malformed(
                self.schema_dir.display().to_string(),
                format!("Failed to create schema directory: {}", e),
            )
        })?;

        let content = serde_json::to_string_pretty(schema).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to serialize schema: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to write file: {}", e))
        })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaFields, SchemaNode};
    use tempfile::TempDir;

    fn sample_schema() -> Schema {
        Schema::new(
            "preload",
            "v1",
            SchemaFields::new()
                .with("txn_total", SchemaNode::float().required().decimals(2))
                .with("order_no", SchemaNode::string().limit(50).reject([" ", "<", ">"])),
        )
    }

    #[test]
    fn test_register_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        loader.register(sample_schema()).unwrap();

        let schema = loader.get("preload", "v1").unwrap();
        assert_eq!(schema.schema_id, "preload");
    }

    #[test]
    fn test_schema_immutability() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        loader.register(sample_schema()).unwrap();
        let err = loader.register(sample_schema()).unwrap_err();
        assert_eq!(err.code().code(), "PF_SCHEMA_IMMUTABLE");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let loader = SchemaLoader::new(temp_dir.path());
        loader.save_schema(&sample_schema()).unwrap();

        let mut loader2 = SchemaLoader::new(temp_dir.path());
        assert_eq!(loader2.load_all().unwrap(), 1);
        assert_eq!(loader2.get("preload", "v1"), Some(&sample_schema()));
    }

    #[test]
    fn test_require_distinguishes_version() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        loader.register(sample_schema()).unwrap();

        assert_eq!(
            loader.require("nope", "v1").unwrap_err().code().code(),
            "PF_UNKNOWN_SCHEMA"
        );
        assert_eq!(
            loader.require("preload", "v9").unwrap_err().code().code(),
            "PF_UNKNOWN_SCHEMA_VERSION"
        );
    }

    #[test]
    fn test_malformed_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("schema_bad_v1.json"), "{ not json").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert_eq!(err.code().code(), "PF_MALFORMED_SCHEMA");
    }

    #[test]
    fn test_non_json_files_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("README.txt"), "notes").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        assert_eq!(loader.load_all().unwrap(), 0);
        assert_eq!(loader.schema_count(), 0);
    }

    #[test]
    fn test_other_json_files_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("settings.json"), "{ not a schema }").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        assert_eq!(loader.load_all().unwrap(), 0);
    }

    #[test]
    fn test_file_name_must_match_schema() {
        let temp_dir = TempDir::new().unwrap();
        let content = serde_json::to_string(&sample_schema()).unwrap();
        fs::write(temp_dir.path().join("schema_preload_v2.json"), content).unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert_eq!(err.code().code(), "PF_MALFORMED_SCHEMA");
        assert!(err.to_string().contains("schema_preload_v1.json"));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(&temp_dir.path().join("absent"));
        assert_eq!(loader.load_all().unwrap(), 0);
    }
}
