//! Test fixtures for publish pipelines.

use std::path::{Path, PathBuf};

use crate::context::{PublishContext, Resolution};
use crate::core::Phase;

/// Returns a context for a typical comp publish.
#[must_use]
pub fn sample_context() -> PublishContext {
    PublishContext::new("SHOW", "010", "020", "comp")
        .with_version(3)
        .with_user("artist")
        .with_fps(24.0)
        .with_resolution(Resolution::new(1920, 1080))
}

/// Writes hook definition files under a package root.
#[derive(Debug, Clone)]
pub struct HookPackage {
    root: PathBuf,
    hooks_dir: String,
}

impl HookPackage {
    /// Targets the package at `root`, using the default `hooks` area.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            hooks_dir: "hooks".to_string(),
        }
    }

    /// Uses another hook area name.
    #[must_use]
    pub fn with_hooks_dir(mut self, hooks_dir: impl Into<String>) -> Self {
        self.hooks_dir = hooks_dir.into();
        self
    }

    /// Returns the package root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a definition file with raw content.
    pub fn write_raw(&self, phase: Phase, file_name: &str, content: &str) -> std::io::Result<PathBuf> {
        let dir = self.root.join(&self.hooks_dir).join(phase.dir_name());
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(file_name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Writes `<definition>.toml` exposing a step of `kind`.
    pub fn write_step(
        &self,
        phase: Phase,
        definition: &str,
        kind: &str,
        order: Option<i32>,
    ) -> std::io::Result<PathBuf> {
        let mut content = format!("[step]\nkind = \"{kind}\"\n");
        if let Some(order) = order {
            content.push_str(&format!("order = {order}\n"));
        }
        self.write_raw(phase, &format!("{definition}.toml"), &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_context_is_valid() {
        let ctx = sample_context();
        assert!(ctx.check().is_empty());
        assert_eq!(ctx.version, 3);
    }

    #[test]
    fn test_hook_package_writes_definitions() {
        let dir = tempfile::tempdir().unwrap();
        let package = HookPackage::new(dir.path());

        let path = package
            .write_step(Phase::Validate, "check_fps", "require_data", Some(10))
            .unwrap();

        assert_eq!(path, dir.path().join("hooks/validators/check_fps.toml"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("kind = \"require_data\""));
        assert!(content.contains("order = 10"));
    }

    #[test]
    fn test_hook_package_custom_hooks_dir() {
        let dir = tempfile::tempdir().unwrap();
        let package = HookPackage::new(dir.path()).with_hooks_dir("publish");
        assert_eq!(package.root(), dir.path());

        let path = package
            .write_step(Phase::Integrate, "deliver", "set_data", None)
            .unwrap();

        assert_eq!(path, dir.path().join("publish/integrators/deliver.toml"));
        assert!(!std::fs::read_to_string(&path).unwrap().contains("order"));
    }
}
