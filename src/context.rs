use std::path::Path;

use crate::util::pascal_case;

/// Naming context for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContext {
    /// File-local module name used in `from './<local_name>'`.
    pub local_name: String,
    /// Namespace a consumer binds the default export to.
    pub namespace_name: String,
    /// Identifier used in diagnostics (usually the path as given).
    pub source_id: String,
}

impl ModuleContext {
    pub fn new(
        local_name: impl Into<String>,
        namespace_name: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            local_name: local_name.into(),
            namespace_name: namespace_name.into(),
            source_id: source_id.into(),
        }
    }

    /// Derive the context from a file path: `src/date-utils.js` gives local
    /// name `date-utils` and namespace `DateUtils`.
    pub fn from_path(path: &Path) -> Self {
        let local_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let namespace_name = pascal_case(&local_name);
        Self {
            local_name,
            namespace_name,
            source_id: path.display().to_string(),
        }
    }

    /// Replace the derived namespace.
    pub fn with_namespace(mut self, namespace_name: impl Into<String>) -> Self {
        self.namespace_name = namespace_name.into();
        self
    }
}
