//! Declarative step kinds available to hook definition files.
//!
//! | kind            | params              | effect                                  |
//! |-----------------|---------------------|-----------------------------------------|
//! | `set_data`      | `key`, `value`      | stores `value` in the context data bag  |
//! | `require_data`  | `keys`              | rejects the publish if a key is missing |
//! | `register_file` | `name`, `path`      | appends a representation of the file    |

use super::Step;
use crate::context::PublishContext;
use crate::core::Representation;
use crate::errors::StepError;
use crate::pipeline::{StepCatalog, StepManifest};
use std::path::PathBuf;
use std::sync::Arc;

/// Stores a fixed value in the context data bag.
#[derive(Debug, Clone)]
pub struct SetDataStep {
    label: String,
    key: String,
    value: serde_json::Value,
}

impl SetDataStep {
    /// Creates the step.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        let key = key.into();
        Self {
            label: format!("set_data({key})"),
            key,
            value: value.into(),
        }
    }

    fn from_manifest(manifest: &StepManifest) -> anyhow::Result<Arc<dyn Step>> {
        let key: String = manifest.param("key")?;
        let value: serde_json::Value = manifest.param("value")?;
        Ok(Arc::new(Self::new(key, value)))
    }
}

impl Step for SetDataStep {
    fn label(&self) -> &str {
        &self.label
    }

    fn process(&self, ctx: &mut PublishContext) -> Result<(), StepError> {
        ctx.data.insert(self.key.clone(), self.value.clone());
        Ok(())
    }
}

/// Rejects the publish unless every listed key is present in the data bag.
#[derive(Debug, Clone)]
pub struct RequireDataStep {
    label: String,
    keys: Vec<String>,
}

impl RequireDataStep {
    /// Creates the step.
    #[must_use]
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            label: "require_data".to_string(),
            keys,
        }
    }

    fn from_manifest(manifest: &StepManifest) -> anyhow::Result<Arc<dyn Step>> {
        let keys: Vec<String> = manifest.param("keys")?;
        Ok(Arc::new(Self::new(keys)))
    }
}

impl Step for RequireDataStep {
    fn label(&self) -> &str {
        &self.label
    }

    fn process(&self, ctx: &mut PublishContext) -> Result<(), StepError> {
        match self.keys.iter().find(|k| !ctx.data.contains_key(k)) {
            Some(missing) => Err(StepError::rejected(format!(
                "Missing required context data '{missing}'"
            ))),
            None => Ok(()),
        }
    }
}

/// Appends a representation describing an existing file.
#[derive(Debug, Clone)]
pub struct RegisterFileStep {
    label: String,
    name: String,
    path: PathBuf,
}

impl RegisterFileStep {
    /// Creates the step.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        Self {
            label: format!("register_file({name})"),
            name,
            path: path.into(),
        }
    }

    fn from_manifest(manifest: &StepManifest) -> anyhow::Result<Arc<dyn Step>> {
        let name: String = manifest.param("name")?;
        let path: PathBuf = manifest.param("path")?;
        Ok(Arc::new(Self::new(name, path)))
    }
}

impl Step for RegisterFileStep {
    fn label(&self) -> &str {
        &self.label
    }

    fn process(&self, ctx: &mut PublishContext) -> Result<(), StepError> {
        let representation = Representation::from_file(self.name.clone(), &self.path)?;
        tracing::debug!(
            name = %representation.name,
            path = %representation.path.display(),
            "Registered representation"
        );
        ctx.add_representation(representation);
        Ok(())
    }
}

/// Adds the built-in kinds to a catalog.
pub fn register_builtins(catalog: &mut StepCatalog) {
    catalog.register_fn("set_data", SetDataStep::from_manifest);
    catalog.register_fn("require_data", RequireDataStep::from_manifest);
    catalog.register_fn("register_file", RegisterFileStep::from_manifest);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_data_overwrites() {
        let step = SetDataStep::new("plates", json!(["/a.exr"]));
        let mut ctx = PublishContext::default().with_data("plates", json!([]));

        step.process(&mut ctx).unwrap();
        assert_eq!(ctx.data.get("plates"), Some(&json!(["/a.exr"])));
        assert_eq!(step.label(), "set_data(plates)");
    }

    #[test]
    fn test_require_data_names_missing_key() {
        let step = RequireDataStep::new(vec!["plates".into(), "camera".into()]);
        let mut ctx = PublishContext::default().with_data("plates", json!([]));

        let err = step.process(&mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "Missing required context data 'camera'");

        ctx.data.insert("camera", "main");
        assert!(step.process(&mut ctx).is_ok());
    }

    #[test]
    fn test_register_file_appends_representation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beauty.exr");
        std::fs::write(&path, b"pixels").unwrap();

        let step = RegisterFileStep::new("beauty", &path);
        let mut ctx = PublishContext::default();
        step.process(&mut ctx).unwrap();

        let rep = ctx.representations().find("beauty").unwrap();
        assert_eq!(rep.path, path);
        assert_eq!(rep.size, Some(6));
        assert_eq!(rep.checksum.as_ref().map(String::len), Some(32));
    }

    #[test]
    fn test_register_missing_file_fails() {
        let step = RegisterFileStep::new("beauty", "/no/such/beauty.exr");
        let mut ctx = PublishContext::default();

        assert!(matches!(step.process(&mut ctx), Err(StepError::Io(_))));
        assert!(ctx.representations().is_empty());
    }

    #[test]
    fn test_factories_validate_params() {
        let mut catalog = StepCatalog::new();
        register_builtins(&mut catalog);
        let path = std::path::Path::new("hooks/collectors/x.toml");

        let ok = StepManifest::new("set_data")
            .with_param("key", "k")
            .with_param("value", 1);
        assert!(catalog.build(path, &ok).is_ok());

        let missing = StepManifest::new("require_data");
        let err = catalog.build(path, &missing).err().unwrap();
        assert!(err.to_string().contains("missing parameter 'keys'"));
    }
}
