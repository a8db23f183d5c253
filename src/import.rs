use crate::model::ExportSummary;

/// Build the import line a consumer writes to bind a module's exports:
/// `import Default, { a, b } from './local'`.
///
/// A summary with no exports still yields a (vacuous) statement; check
/// [`ExportSummary::is_empty`] first to avoid it.
pub fn import_statement(exports: &ExportSummary, default_name: &str, local_name: &str) -> String {
    let mut list = Vec::new();
    if exports.has_default_export {
        list.push(default_name.to_string());
    }
    if !exports.named_exports.is_empty() {
        let named: Vec<&str> = exports.named_exports.iter().map(String::as_str).collect();
        list.push(format!("{{ {} }}", named.join(", ")));
    }
    format!("import {} from './{local_name}'", list.join(", "))
}
