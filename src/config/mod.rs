//! Layered configuration resolution
//!
//! Merges schema defaults, a persisted JSON file, explicit overrides,
//! environment variables, and interactive prompts into one concrete
//! configuration snapshot. Precedence, lowest to highest:
//! default < persisted file < environment < explicit override, with
//! prompting reserved for fields still empty after every non-interactive
//! source. Automation can therefore bypass prompts entirely by supplying
//! overrides or env vars for every promptable field.
//!
//! The engine persists the snapshot only when a prompt fired during init,
//! and on every explicit [`ConfigHandle::set`]. Writes always replace the
//! whole file; there is no on-disk merge.

mod path;
mod prompt;
mod schema;

pub use path::config_file_path;
pub use prompt::{PromptDriver, PromptRecord, ScriptedDriver, TerminalDriver};
pub use schema::{ConfigSchema, DescriptorOptions, PromptPolicy, SchemaValue};

use crate::error::{Error, Result};
use schema::is_empty_value;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Explicit per-key override values, the highest-precedence data source
pub type Overrides = BTreeMap<String, Value>;

/// Accessor for a fully resolved configuration snapshot.
///
/// The handle owns the snapshot; other components reach values only through
/// [`get`](Self::get) and [`set`](Self::set).
#[derive(Debug)]
pub struct ConfigHandle {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl ConfigHandle {
    /// Current value for a known key, or `None` for keys outside the schema
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Convenience accessor for string-typed fields
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Overwrite one key and re-persist the entire snapshot.
    ///
    /// Fails with [`Error::UnknownConfigKey`] for keys absent from the
    /// original schema; in that case nothing is modified or written. The
    /// file write completes before this returns, so a handle freshly
    /// initialized against the same path observes the update.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        if !self.values.contains_key(key) {
            return Err(Error::UnknownConfigKey {
                key: key.to_string(),
            });
        }
        self.values.insert(key.to_string(), value.into());
        self.persist()
    }

    /// Path of the persisted config file backing this handle
    pub fn config_file_path(&self) -> &Path {
        &self.path
    }

    /// The entire working snapshot as a JSON object, for display/debugging
    pub fn snapshot(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }

    /// Write the full snapshot to the config file, replacing it.
    fn persist(&self) -> Result<()> {
        let mut text = serde_json::to_string_pretty(&self.snapshot())?;
        text.push('\n');
        fs::write(&self.path, text).map_err(|source| Error::ConfigPersist {
            path: self.path.clone(),
            source,
        })
    }
}

/// Initialize configuration for an application identity.
///
/// Resolves the platform config file path for `app_id` and runs the
/// resolution algorithm against it.
pub fn init_config(
    app_id: &str,
    schema: &ConfigSchema,
    overrides: Option<&Overrides>,
    prompt: &dyn PromptDriver,
) -> Result<ConfigHandle> {
    let path = config_file_path(app_id)?;
    init_config_at(&path, schema, overrides, prompt)
}

/// Initialize configuration against an explicit config file path.
///
/// Later sources win: defaults are overwritten by the persisted file, the
/// file by environment variables, and the environment by explicit overrides.
/// Fields still empty after all of those, and declaring a prompt policy, are
/// asked for interactively; a cancelled prompt aborts the whole init with
/// [`Error::ConfigIncomplete`]. The snapshot is persisted only if a prompt
/// fired.
pub fn init_config_at(
    path: &Path,
    schema: &ConfigSchema,
    overrides: Option<&Overrides>,
    prompt: &dyn PromptDriver,
) -> Result<ConfigHandle> {
    // Base snapshot from unwrapped defaults, plus a key -> options side table.
    let mut options: BTreeMap<&str, &DescriptorOptions> = BTreeMap::new();
    let mut base: BTreeMap<String, Value> = BTreeMap::new();
    for (key, entry) in schema.iter() {
        base.insert(key.clone(), entry.default_value().clone());
        if let Some(opts) = entry.options() {
            options.insert(key.as_str(), opts);
        }
    }
    let mut values = base;

    // Persisted file: merge matching keys, ignore unknown ones. A missing
    // file means "use defaults"; any other failure is logged and ignored.
    match fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str::<Map<String, Value>>(&text) {
            Ok(saved) => {
                for (key, value) in saved {
                    if values.contains_key(&key) {
                        values.insert(key, value);
                    }
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring unparseable config file");
            }
        },
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring unreadable config file");
        }
    }

    // Explicit overrides beat everything, including the environment.
    let mut overridden: BTreeSet<&str> = BTreeSet::new();
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            if let Some(slot) = values.get_mut(key.as_str()) {
                *slot = value.clone();
                overridden.insert(key.as_str());
            }
        }
    }

    // Environment variables, for keys not explicitly overridden. Values are
    // taken as raw strings regardless of the field's declared type; an empty
    // variable counts as unset.
    for (key, opts) in &options {
        if overridden.contains(key) {
            continue;
        }
        let Some(var) = opts.env_override.as_deref() else {
            continue;
        };
        match env::var(var) {
            Ok(text) if !text.is_empty() => {
                values.insert((*key).to_string(), Value::String(text));
            }
            _ => {}
        }
    }

    // Prompt for fields that are still empty and opted in to prompting.
    let mut prompted = false;
    for (key, opts) in &options {
        let Some(policy) = &opts.prompt else {
            continue;
        };
        if !values.get(*key).is_some_and(is_empty_value) {
            continue;
        }

        let message = prompt_message(*key, policy, opts.env_override.as_deref());
        let answer = prompt.ask(&message).ok_or_else(|| Error::ConfigIncomplete {
            key: (*key).to_string(),
        })?;
        values.insert((*key).to_string(), Value::String(answer));
        prompted = true;
    }

    let handle = ConfigHandle {
        path: path.to_path_buf(),
        values,
    };

    // User-entered values must survive the process; everything else is
    // reproducible from its source, so the file is left untouched.
    if prompted {
        handle.persist()?;
    }

    Ok(handle)
}

/// Build the message for a prompt that is about to fire.
fn prompt_message(key: &str, policy: &PromptPolicy, env_var: Option<&str>) -> String {
    match policy {
        PromptPolicy::AskWith(message) => message.clone(),
        PromptPolicy::Ask => env_var.map_or_else(
            || format!("Enter a value for '{key}'"),
            |var| format!("Enter a value for '{key}' (or set {var})"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use tempfile::TempDir;

    fn temp_config_path(dir: &TempDir) -> PathBuf {
        dir.path().join("config.json")
    }

    fn basic_schema() -> ConfigSchema {
        ConfigSchema::new()
            .with_default("foo", "hello")
            .with_default("bar", 123)
            .with_default("baz", true)
    }

    #[test]
    fn test_defaults_only_no_file_written() {
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        let schema = basic_schema();

        let config = init_config_at(&path, &schema, None, &ScriptedDriver::new()).unwrap();

        assert_eq!(config.get("foo"), Some(&json!("hello")));
        assert_eq!(config.get("bar"), Some(&json!(123)));
        assert_eq!(config.get("baz"), Some(&json!(true)));
        assert!(!path.exists(), "init without prompts must not write the file");
    }

    #[test]
    fn test_persisted_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        fs::write(&path, r#"{"foo": "fromfile", "unknown": "ignored"}"#).unwrap();

        let config = init_config_at(&path, &basic_schema(), None, &ScriptedDriver::new()).unwrap();

        assert_eq!(config.get_str("foo"), Some("fromfile"));
        assert_eq!(config.get("bar"), Some(&json!(123)));
        assert_eq!(config.get("unknown"), None, "unknown file keys are dropped");
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        fs::write(&path, "{not valid json").unwrap();

        let config = init_config_at(&path, &basic_schema(), None, &ScriptedDriver::new()).unwrap();
        assert_eq!(config.get_str("foo"), Some("hello"));
    }

    #[test]
    fn test_explicit_override_beats_file() {
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        fs::write(&path, r#"{"foo": "fromfile"}"#).unwrap();

        let overrides = Overrides::from([("foo".to_string(), json!("fromoverride"))]);
        let config =
            init_config_at(&path, &basic_schema(), Some(&overrides), &ScriptedDriver::new())
                .unwrap();

        assert_eq!(config.get_str("foo"), Some("fromoverride"));
    }

    #[test]
    #[serial]
    #[allow(unsafe_code)]
    fn test_full_precedence_chain() {
        // env mutation is process-global, hence #[serial]
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        let schema = ConfigSchema::new().with_described(
            "greeting",
            "hello",
            DescriptorOptions {
                env_override: Some("AUTOPR_TEST_GREETING".to_string()),
                prompt: None,
            },
        );
        fs::write(&path, r#"{"greeting": "fromfile"}"#).unwrap();
        unsafe { env::set_var("AUTOPR_TEST_GREETING", "fromenv") };

        let overrides = Overrides::from([("greeting".to_string(), json!("fromoverride"))]);

        // override > env
        let config =
            init_config_at(&path, &schema, Some(&overrides), &ScriptedDriver::new()).unwrap();
        assert_eq!(config.get_str("greeting"), Some("fromoverride"));

        // env > file
        let config = init_config_at(&path, &schema, None, &ScriptedDriver::new()).unwrap();
        assert_eq!(config.get_str("greeting"), Some("fromenv"));

        // file > default
        unsafe { env::remove_var("AUTOPR_TEST_GREETING") };
        let config = init_config_at(&path, &schema, None, &ScriptedDriver::new()).unwrap();
        assert_eq!(config.get_str("greeting"), Some("fromfile"));

        // default
        fs::remove_file(&path).unwrap();
        let config = init_config_at(&path, &schema, None, &ScriptedDriver::new()).unwrap();
        assert_eq!(config.get_str("greeting"), Some("hello"));
    }

    #[test]
    #[serial]
    #[allow(unsafe_code)]
    fn test_empty_env_var_does_not_override() {
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        let schema = ConfigSchema::new().with_described(
            "greeting",
            "hello",
            DescriptorOptions {
                env_override: Some("AUTOPR_TEST_EMPTY".to_string()),
                prompt: None,
            },
        );
        unsafe { env::set_var("AUTOPR_TEST_EMPTY", "") };

        let config = init_config_at(&path, &schema, None, &ScriptedDriver::new()).unwrap();
        assert_eq!(config.get_str("greeting"), Some("hello"));

        unsafe { env::remove_var("AUTOPR_TEST_EMPTY") };
    }

    #[test]
    fn test_prompt_fires_once_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        let schema = ConfigSchema::new().with_described(
            "github_org",
            "",
            DescriptorOptions {
                env_override: None,
                prompt: Some(PromptPolicy::Ask),
            },
        );
        let driver = ScriptedDriver::with_answers(["test-org-scripted"]);

        let config = init_config_at(&path, &schema, None, &driver).unwrap();

        assert_eq!(config.get_str("github_org"), Some("test-org-scripted"));
        let history = driver.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].message, "Enter a value for 'github_org'");

        let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["github_org"], json!("test-org-scripted"));
    }

    #[test]
    fn test_prompt_suppressed_for_truthy_value() {
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        fs::write(&path, r#"{"github_org": "already-set"}"#).unwrap();
        let schema = ConfigSchema::new().with_described(
            "github_org",
            "",
            DescriptorOptions {
                env_override: None,
                prompt: Some(PromptPolicy::AskWith("Which org?".to_string())),
            },
        );
        let driver = ScriptedDriver::new();

        let config = init_config_at(&path, &schema, None, &driver).unwrap();

        assert_eq!(config.get_str("github_org"), Some("already-set"));
        assert!(driver.history().is_empty());
    }

    #[test]
    fn test_cancelled_prompt_fails_init() {
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        let schema = ConfigSchema::new().with_described(
            "token",
            "",
            DescriptorOptions {
                env_override: None,
                prompt: Some(PromptPolicy::Ask),
            },
        );

        let err = init_config_at(&path, &schema, None, &ScriptedDriver::new()).unwrap_err();
        match err {
            Error::ConfigIncomplete { key } => assert_eq!(key, "token"),
            other => panic!("expected ConfigIncomplete, got {other:?}"),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_prompt_message_forms() {
        assert_eq!(
            prompt_message("org", &PromptPolicy::AskWith("Which org?".to_string()), None),
            "Which org?"
        );
        assert_eq!(
            prompt_message("org", &PromptPolicy::Ask, Some("MY_ORG")),
            "Enter a value for 'org' (or set MY_ORG)"
        );
        assert_eq!(
            prompt_message("org", &PromptPolicy::Ask, None),
            "Enter a value for 'org'"
        );
    }

    #[test]
    fn test_set_round_trips_through_new_handle() {
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        let schema = basic_schema();

        let mut config = init_config_at(&path, &schema, None, &ScriptedDriver::new()).unwrap();
        config.set("foo", "modified").unwrap();

        let reloaded = init_config_at(&path, &schema, None, &ScriptedDriver::new()).unwrap();
        assert_eq!(reloaded.get_str("foo"), Some("modified"));
    }

    #[test]
    fn test_set_unknown_key_rejected_without_write() {
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        let mut config =
            init_config_at(&path, &basic_schema(), None, &ScriptedDriver::new()).unwrap();

        let err = config.set("nonexistent", "value").unwrap_err();
        match err {
            Error::UnknownConfigKey { ref key } => assert_eq!(key, "nonexistent"),
            ref other => panic!("expected UnknownConfigKey, got {other:?}"),
        }
        assert!(err.to_string().contains("nonexistent"));
        assert!(!path.exists(), "rejected set must not persist anything");
    }

    #[test]
    fn test_schema_not_mutated_by_set() {
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        let schema = ConfigSchema::new().with_default("value", "original");

        let mut config = init_config_at(&path, &schema, None, &ScriptedDriver::new()).unwrap();
        config.set("value", "modified").unwrap();

        let entry = schema.iter().next().unwrap().1;
        assert_eq!(entry.default_value(), &json!("original"));

        // A fresh init against a schema clone still starts from the default.
        let fresh_dir = TempDir::new().unwrap();
        let fresh = init_config_at(
            &temp_config_path(&fresh_dir),
            &schema,
            None,
            &ScriptedDriver::new(),
        )
        .unwrap();
        assert_eq!(fresh.get_str("value"), Some("original"));
    }

    #[test]
    fn test_snapshot_renders_full_object() {
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        let config = init_config_at(&path, &basic_schema(), None, &ScriptedDriver::new()).unwrap();

        let snapshot = config.snapshot();
        assert_eq!(snapshot, json!({"foo": "hello", "bar": 123, "baz": true}));
        assert_eq!(config.config_file_path(), path);
    }

    #[test]
    fn test_override_for_unknown_key_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        let overrides = Overrides::from([("stranger".to_string(), json!("x"))]);

        let config =
            init_config_at(&path, &basic_schema(), Some(&overrides), &ScriptedDriver::new())
                .unwrap();
        assert_eq!(config.get("stranger"), None);
    }

    #[test]
    fn test_prompt_persists_entire_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = temp_config_path(&dir);
        let schema = ConfigSchema::new().with_default("kept", "default").with_described(
            "asked",
            "",
            DescriptorOptions {
                env_override: None,
                prompt: Some(PromptPolicy::Ask),
            },
        );
        let driver = ScriptedDriver::with_answers(["answer"]);

        init_config_at(&path, &schema, None, &driver).unwrap();

        let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, json!({"asked": "answer", "kept": "default"}));
    }
}
