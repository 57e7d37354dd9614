//! Filesystem hook packages.
//!
//! A package root holds one directory per phase under its hook area:
//!
//! ```text
//! <root>/hooks/collectors/a_plates.toml
//! <root>/hooks/validators/check_fps.toml
//! <root>/hooks/extractors/...
//! <root>/hooks/integrators/...
//! ```
//!
//! Each definition file exposes at most one step, under the `step` table:
//!
//! ```toml
//! [step]
//! kind = "set_data"
//! label = "Stash plates"
//! order = 10
//!
//! [step.params]
//! key = "plates"
//! value = ["/plates/a.exr"]
//! ```
//!
//! The `kind` is resolved through a [`StepCatalog`] of factories.

use super::StepSource;
use crate::config::PipelineConfig;
use crate::core::Phase;
use crate::errors::{LoadError, PublishError};
use crate::steps::{builtin, Step, StepDescriptor};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the table a definition file exposes its step under.
pub const STEP_TABLE: &str = "step";

/// The `step` table of a definition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepManifest {
    /// Factory name in the catalog.
    pub kind: String,
    /// Label override.
    #[serde(default)]
    pub label: Option<String>,
    /// Order override.
    #[serde(default)]
    pub order: Option<i32>,
    /// Free-form parameters handed to the factory.
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl StepManifest {
    /// Creates a manifest for a step kind.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            label: None,
            order: None,
            params: serde_json::Map::new(),
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Decodes a required parameter.
    pub fn param<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<T> {
        let value = self
            .params
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("missing parameter '{key}' for step kind '{}'", self.kind))?;
        T::deserialize(value)
            .map_err(|e| anyhow::anyhow!("invalid parameter '{key}' for step kind '{}': {e}", self.kind))
    }

    /// Decodes an optional parameter.
    pub fn param_opt<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        if self.params.contains_key(key) {
            self.param(key).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Factory building a step from its manifest.
pub type StepFactory = Box<dyn Fn(&StepManifest) -> anyhow::Result<Arc<dyn Step>> + Send + Sync>;

/// Catalog of step factories, keyed by kind.
#[derive(Default)]
pub struct StepCatalog {
    factories: HashMap<String, StepFactory>,
}

impl StepCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the built-in step kinds.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        builtin::register_builtins(&mut catalog);
        catalog
    }

    /// Registers a factory, replacing any previous one for the kind.
    pub fn register(&mut self, kind: impl Into<String>, factory: StepFactory) {
        self.factories.insert(kind.into(), factory);
    }

    /// Registers a factory closure.
    pub fn register_fn<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&StepManifest) -> anyhow::Result<Arc<dyn Step>> + Send + Sync + 'static,
    {
        self.register(kind, Box::new(factory));
    }

    /// Checks if a kind is known.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Lists the known kinds, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.factories.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Builds the step described by a manifest found at `path`.
    pub fn build(&self, path: &Path, manifest: &StepManifest) -> Result<Arc<dyn Step>, LoadError> {
        let factory = self
            .factories
            .get(&manifest.kind)
            .ok_or_else(|| LoadError::UnknownKind {
                path: path.to_path_buf(),
                kind: manifest.kind.clone(),
            })?;

        factory(manifest).map_err(|source| LoadError::Build {
            path: path.to_path_buf(),
            kind: manifest.kind.clone(),
            source,
        })
    }
}

impl std::fmt::Debug for StepCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepCatalog")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// A hook package on disk.
#[derive(Debug, Clone)]
pub struct HookDirectory {
    root: PathBuf,
    name: String,
    config: PipelineConfig,
    catalog: Arc<StepCatalog>,
}

impl HookDirectory {
    /// Opens the package rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::PackageNotFound` if `root` is not a directory.
    pub fn open(root: impl Into<PathBuf>, catalog: Arc<StepCatalog>) -> Result<Self, PublishError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(PublishError::PackageNotFound(root));
        }

        Ok(Self {
            name: root.display().to_string(),
            root,
            config: PipelineConfig::default(),
            catalog,
        })
    }

    /// Applies a configuration.
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the package root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory holding the definitions of `phase`.
    #[must_use]
    pub fn phase_dir(&self, phase: Phase) -> PathBuf {
        self.root.join(&self.config.hooks_dir).join(phase.dir_name())
    }

    /// Lists the definition files of a phase in lexicographic file-name order.
    ///
    /// A missing phase directory yields an empty list.
    pub fn definition_files(&self, phase: Phase) -> Result<Vec<PathBuf>, LoadError> {
        let dir = self.phase_dir(phase);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let read_err = |source| LoadError::Read {
            path: dir.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            let matches_ext = path
                .extension()
                .is_some_and(|ext| ext == self.config.definition_extension.as_str());
            if matches_ext && path.is_file() {
                files.push(path);
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Loads one definition file.
    ///
    /// Returns `Ok(None)` if the file loads but exposes no step.
    pub fn load_definition(
        &self,
        phase: Phase,
        path: &Path,
    ) -> Result<Option<StepDescriptor>, LoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: toml::Table = toml::from_str(&raw).map_err(|source| LoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

        let Some(entry) = doc.get(STEP_TABLE) else {
            return Ok(None);
        };
        if entry.is_array() {
            return Err(LoadError::Ambiguous {
                path: path.to_path_buf(),
            });
        }

        let manifest = entry
            .clone()
            .try_into::<StepManifest>()
            .map_err(|source| LoadError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        let step = self.catalog.build(path, &manifest)?;
        let mut desc = StepDescriptor::new(phase, definition_name(path), step);
        if let Some(label) = manifest.label {
            desc = desc.with_label(label);
        }
        if let Some(order) = manifest.order {
            desc = desc.with_order(order);
        }
        Ok(Some(desc))
    }
}

impl StepSource for HookDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_phase(&self, phase: Phase) -> Result<Vec<StepDescriptor>, PublishError> {
        let mut steps = Vec::new();
        for path in self.definition_files(phase)? {
            match self.load_definition(phase, &path)? {
                Some(desc) => steps.push(desc),
                None => tracing::debug!(
                    phase = %phase,
                    path = %path.display(),
                    "Definition exposes no step, skipping"
                ),
            }
        }
        Ok(steps)
    }
}

fn definition_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PublishContext;
    use crate::steps::NoOpStep;
    use tempfile::TempDir;

    fn package() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    fn write_def(root: &Path, phase: Phase, file: &str, body: &str) -> PathBuf {
        let dir = root.join("hooks").join(phase.dir_name());
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file);
        std::fs::write(&path, body).unwrap();
        path
    }

    fn catalog() -> Arc<StepCatalog> {
        let mut catalog = StepCatalog::with_builtins();
        catalog.register_fn("noop", |m| {
            Ok(Arc::new(NoOpStep::new(m.kind.clone())) as Arc<dyn Step>)
        });
        catalog.register_fn("explode", |_| anyhow::bail!("factory exploded"));
        Arc::new(catalog)
    }

    #[test]
    fn test_open_missing_package() {
        let err = HookDirectory::open("/no/such/package", catalog()).unwrap_err();
        assert!(matches!(err, PublishError::PackageNotFound(_)));
    }

    #[test]
    fn test_missing_phase_dir_is_empty() {
        let pkg = package();
        let hooks = HookDirectory::open(pkg.path(), catalog()).unwrap();

        for phase in Phase::ALL {
            assert!(hooks.load_phase(phase).unwrap().is_empty());
        }
    }

    #[test]
    fn test_definition_files_sorted_and_filtered() {
        let pkg = package();
        write_def(pkg.path(), Phase::Collect, "b_collect.toml", "[step]\nkind = \"noop\"\n");
        write_def(pkg.path(), Phase::Collect, "a_collect.toml", "[step]\nkind = \"noop\"\n");
        write_def(pkg.path(), Phase::Collect, "README.md", "not a definition");
        std::fs::create_dir_all(pkg.path().join("hooks/collectors/nested.toml")).unwrap();

        let hooks = HookDirectory::open(pkg.path(), catalog()).unwrap();
        let files = hooks.definition_files(Phase::Collect).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a_collect.toml", "b_collect.toml"]);
    }

    #[test]
    fn test_load_phase_follows_file_names_not_stems() {
        let pkg = package();
        write_def(pkg.path(), Phase::Collect, "plates.toml", "[step]\nkind = \"noop\"\n");
        write_def(pkg.path(), Phase::Collect, "plates-extra.toml", "[step]\nkind = \"noop\"\n");

        let hooks = HookDirectory::open(pkg.path(), catalog()).unwrap();
        let steps = crate::pipeline::discover_steps(&hooks, Phase::Collect).unwrap();
        let names: Vec<_> = steps.iter().map(|s| s.definition.as_str()).collect();
        assert_eq!(names, vec!["plates-extra", "plates"]);
    }

    #[test]
    fn test_load_definition_with_overrides() {
        let pkg = package();
        let path = write_def(
            pkg.path(),
            Phase::Validate,
            "check.toml",
            "[step]\nkind = \"noop\"\nlabel = \"Check fps\"\norder = 10\n",
        );

        let hooks = HookDirectory::open(pkg.path(), catalog()).unwrap();
        let desc = hooks.load_definition(Phase::Validate, &path).unwrap().unwrap();
        assert_eq!(desc.definition, "check");
        assert_eq!(desc.label, "Check fps");
        assert_eq!(desc.order, 10);
        assert_eq!(desc.phase, Phase::Validate);
    }

    #[test]
    fn test_definition_without_step_is_skipped() {
        let pkg = package();
        write_def(pkg.path(), Phase::Collect, "helpers.toml", "[shared]\nroot = \"/plates\"\n");
        write_def(pkg.path(), Phase::Collect, "plates.toml", "[step]\nkind = \"noop\"\n");

        let hooks = HookDirectory::open(pkg.path(), catalog()).unwrap();
        let steps = hooks.load_phase(Phase::Collect).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].definition, "plates");
    }

    #[test]
    fn test_malformed_definition_is_fatal() {
        let pkg = package();
        write_def(pkg.path(), Phase::Collect, "a.toml", "[step]\nkind = \"noop\"\n");
        write_def(pkg.path(), Phase::Collect, "b.toml", "[step\nkind = ");

        let hooks = HookDirectory::open(pkg.path(), catalog()).unwrap();
        let err = hooks.load_phase(Phase::Collect).unwrap_err();
        assert!(matches!(err, PublishError::Load(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_step_without_kind_is_malformed() {
        let pkg = package();
        write_def(pkg.path(), Phase::Collect, "a.toml", "[step]\norder = 3\n");

        let hooks = HookDirectory::open(pkg.path(), catalog()).unwrap();
        let err = hooks.load_phase(Phase::Collect).unwrap_err();
        assert!(matches!(err, PublishError::Load(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_unknown_kind_is_fatal() {
        let pkg = package();
        write_def(pkg.path(), Phase::Extract, "a.toml", "[step]\nkind = \"transcode\"\n");

        let hooks = HookDirectory::open(pkg.path(), catalog()).unwrap();
        let err = hooks.load_phase(Phase::Extract).unwrap_err();
        assert!(matches!(
            err,
            PublishError::Load(LoadError::UnknownKind { ref kind, .. }) if kind == "transcode"
        ));
    }

    #[test]
    fn test_factory_error_is_fatal() {
        let pkg = package();
        write_def(pkg.path(), Phase::Extract, "a.toml", "[step]\nkind = \"explode\"\n");

        let hooks = HookDirectory::open(pkg.path(), catalog()).unwrap();
        let err = hooks.load_phase(Phase::Extract).unwrap_err();
        assert!(err.to_string().contains("factory exploded"));
    }

    #[test]
    fn test_multiple_candidates_are_rejected() {
        let pkg = package();
        write_def(
            pkg.path(),
            Phase::Collect,
            "twice.toml",
            "[[step]]\nkind = \"noop\"\n\n[[step]]\nkind = \"noop\"\n",
        );

        let hooks = HookDirectory::open(pkg.path(), catalog()).unwrap();
        let err = hooks.load_phase(Phase::Collect).unwrap_err();
        assert!(matches!(err, PublishError::Load(LoadError::Ambiguous { .. })));
    }

    #[test]
    fn test_custom_hooks_dir_and_extension() {
        let pkg = package();
        let dir = pkg.path().join("publish").join("collectors");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.hook"), "[step]\nkind = \"noop\"\n").unwrap();
        std::fs::write(dir.join("b.toml"), "[step]\nkind = \"noop\"\n").unwrap();

        let config = PipelineConfig::new()
            .with_hooks_dir("publish")
            .with_definition_extension("hook");
        let hooks = HookDirectory::open(pkg.path(), catalog())
            .unwrap()
            .with_config(config);

        let steps = hooks.load_phase(Phase::Collect).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].definition, "a");
    }

    #[test]
    fn test_manifest_params() {
        let manifest = StepManifest::new("set_data")
            .with_param("key", "plates")
            .with_param("count", 3);

        assert_eq!(manifest.param::<String>("key").unwrap(), "plates");
        assert_eq!(manifest.param::<u32>("count").unwrap(), 3);
        assert!(manifest.param::<String>("missing").is_err());
        assert!(manifest.param::<u32>("key").is_err());
        assert_eq!(manifest.param_opt::<String>("missing").unwrap(), None);
    }

    #[test]
    fn test_catalog_kinds() {
        let catalog = StepCatalog::with_builtins();
        assert_eq!(
            catalog.kinds(),
            vec!["register_file", "require_data", "set_data"]
        );
        assert!(!catalog.contains("noop"));
    }

    #[test]
    fn test_loaded_step_runs() {
        let pkg = package();
        write_def(
            pkg.path(),
            Phase::Collect,
            "stash.toml",
            "[step]\nkind = \"set_data\"\n\n[step.params]\nkey = \"plates\"\nvalue = [\"/a.exr\"]\n",
        );

        let hooks = HookDirectory::open(pkg.path(), catalog()).unwrap();
        let steps = hooks.load_phase(Phase::Collect).unwrap();

        let mut ctx = PublishContext::default();
        steps[0].step.process(&mut ctx).unwrap();
        assert_eq!(ctx.data.get("plates"), Some(&serde_json::json!(["/a.exr"])));
    }
}
