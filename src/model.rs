use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::ExtractionError;

/// Which bucket of the metadata a declaration lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Variable,
    Class,
    Function,
}

impl Category {
    /// JSON key of the bucket holding this category.
    pub fn bucket(self) -> &'static str {
        match self {
            Self::Variable => "variables",
            Self::Class => "classes",
            Self::Function => "functions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Variable => "variable",
            Self::Class => "class",
            Self::Function => "function",
        };
        f.write_str(label)
    }
}

/// Normalized record for one top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub category: Category,
    pub is_exported: bool,
    /// Dotted path a consumer uses to reach the binding.
    pub accessor: String,
    /// Reconstructed parameter list; `None` for variables.
    pub params: Option<String>,
}

// Serialized in the generator's format: `params` for functions,
// `constructorParams` for classes, nothing extra for variables.
impl Serialize for Descriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let params_key = match self.category {
            Category::Variable => None,
            Category::Class => Some("constructorParams"),
            Category::Function => Some("params"),
        };
        let params = params_key.map(|key| (key, self.params.as_deref().unwrap_or("")));

        let mut map = serializer.serialize_map(Some(1 + usize::from(params.is_some())))?;
        map.serialize_entry("accessor", &self.accessor)?;
        if let Some((key, value)) = params {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Which names a module exports, and whether it has a default export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub has_default_export: bool,
    /// Named exports in declaration order.
    pub named_exports: IndexSet<String>,
}

impl ExportSummary {
    /// True when importing the module would bind nothing.
    pub fn is_empty(&self) -> bool {
        !self.has_default_export && self.named_exports.is_empty()
    }
}

/// The final artifact: descriptors grouped by category. Empty buckets are
/// `None` and omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<IndexMap<String, Descriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<IndexMap<String, Descriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<IndexMap<String, Descriptor>>,
}

impl ModuleMetadata {
    /// Group resolved `(key, descriptor)` pairs into buckets.
    ///
    /// A key or accessor seen twice is an error, and so is a module where
    /// every bucket ends up empty.
    pub fn assemble(
        resolved: impl IntoIterator<Item = (String, Descriptor)>,
    ) -> Result<Self, ExtractionError> {
        let mut buckets: [IndexMap<String, Descriptor>; 3] = Default::default();
        let mut accessors = IndexSet::new();

        for (key, descriptor) in resolved {
            let bucket = &mut buckets[bucket_index(descriptor.category)];
            if bucket.contains_key(&key) || !accessors.insert(descriptor.accessor.clone()) {
                return Err(ExtractionError::DuplicateBinding {
                    bucket: descriptor.category.bucket(),
                    name: key,
                    accessor: descriptor.accessor,
                });
            }
            bucket.insert(key, descriptor);
        }

        if buckets.iter().all(IndexMap::is_empty) {
            return Err(ExtractionError::EmptyExtractionResult);
        }

        let [variables, classes, functions] = buckets.map(|b| (!b.is_empty()).then_some(b));
        Ok(Self {
            variables,
            classes,
            functions,
        })
    }

    /// Look up a descriptor by key within the bucket for `category`.
    pub fn get(&self, category: Category, key: &str) -> Option<&Descriptor> {
        let bucket = match category {
            Category::Variable => &self.variables,
            Category::Class => &self.classes,
            Category::Function => &self.functions,
        };
        bucket.as_ref().and_then(|b| b.get(key))
    }

    /// Iterate all descriptors, bucket by bucket.
    pub fn descriptors(&self) -> impl Iterator<Item = (&String, &Descriptor)> {
        [&self.variables, &self.classes, &self.functions]
            .into_iter()
            .flatten()
            .flat_map(|bucket| bucket.iter())
    }
}

fn bucket_index(category: Category) -> usize {
    match category {
        Category::Variable => 0,
        Category::Class => 1,
        Category::Function => 2,
    }
}

/// Everything extracted from one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedModule {
    pub exports: ExportSummary,
    pub metadata: ModuleMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(category: Category, accessor: &str, params: Option<&str>) -> Descriptor {
        Descriptor {
            category,
            is_exported: true,
            accessor: accessor.to_string(),
            params: params.map(str::to_string),
        }
    }

    #[test]
    fn descriptor_json_uses_category_specific_params_key() {
        let class = descriptor(Category::Class, "Widget", Some("/* opts */ {}"));
        let func = descriptor(Category::Function, "Ns.greet", Some("name"));
        let var = descriptor(Category::Variable, "version", None);

        assert_eq!(
            serde_json::to_string(&class).unwrap(),
            r#"{"accessor":"Widget","constructorParams":"/* opts */ {}"}"#
        );
        assert_eq!(
            serde_json::to_string(&func).unwrap(),
            r#"{"accessor":"Ns.greet","params":"name"}"#
        );
        assert_eq!(
            serde_json::to_string(&var).unwrap(),
            r#"{"accessor":"version"}"#
        );
    }

    #[test]
    fn assemble_omits_empty_buckets() {
        let metadata = ModuleMetadata::assemble([(
            "greet".to_string(),
            descriptor(Category::Function, "greet", Some("")),
        )])
        .unwrap();

        assert!(metadata.variables.is_none());
        assert!(metadata.classes.is_none());
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert!(json.get("classes").is_none());
        assert_eq!(json["functions"]["greet"]["params"], "");
    }

    #[test]
    fn assemble_rejects_empty_result() {
        let err = ModuleMetadata::assemble(Vec::new()).unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyExtractionResult));
    }

    #[test]
    fn assemble_rejects_duplicate_keys_and_accessors() {
        let err = ModuleMetadata::assemble([
            ("a".to_string(), descriptor(Category::Variable, "Ns.a", None)),
            ("a".to_string(), descriptor(Category::Variable, "a", None)),
        ])
        .unwrap_err();
        assert!(matches!(err, ExtractionError::DuplicateBinding { .. }));

        let err = ModuleMetadata::assemble([
            ("a".to_string(), descriptor(Category::Variable, "a", None)),
            ("a".to_string(), descriptor(Category::Function, "a", Some(""))),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "duplicate functions binding `a` (accessor `a`)"
        );
    }

    #[test]
    fn export_summary_serializes_in_camel_case() {
        let mut summary = ExportSummary::default();
        assert!(summary.is_empty());
        summary.named_exports.insert("b".to_string());
        summary.named_exports.insert("a".to_string());

        assert_eq!(
            serde_json::to_string(&summary).unwrap(),
            r#"{"hasDefaultExport":false,"namedExports":["b","a"]}"#
        );
    }
}
