use std::path::Path;

use serde::Serialize;

use crate::context::ModuleContext;
use crate::error::ExportMetaError;
use crate::extract::extract_module;
use crate::import::import_statement;
use crate::model::ExtractedModule;
use crate::parser;

/// Extraction result for one file on disk, ready for display.
#[derive(Debug, Serialize)]
pub struct ModuleReport {
    pub source: String,
    #[serde(skip)]
    pub context: ModuleContext,
    #[serde(flatten)]
    pub module: ExtractedModule,
}

impl ModuleReport {
    /// Parse and extract a file, deriving names from its path unless a
    /// namespace is given.
    pub fn from_path(path: &Path, namespace: Option<&str>) -> Result<Self, ExportMetaError> {
        let parsed = parser::parse_file(path)?;
        let mut context = ModuleContext::from_path(path);
        if let Some(namespace) = namespace {
            context = context.with_namespace(namespace);
        }

        let module = extract_module(parsed.tree.root_node(), parsed.source.as_bytes(), &context)?;

        Ok(Self {
            source: context.source_id.clone(),
            context,
            module,
        })
    }

    /// The import line for this module, or `None` when it exports nothing
    /// importable.
    pub fn import_statement(&self) -> Option<String> {
        if self.module.exports.is_empty() {
            return None;
        }
        Some(import_statement(
            &self.module.exports,
            &self.context.namespace_name,
            &self.context.local_name,
        ))
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, ExportMetaError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
