/*
 * Responsibility
 * - SQLx data access, one module per table
 * - shared query helpers
 */
pub mod city_repo;
pub mod department_repo;
pub mod error;
pub mod material_repo;

/// `ILIKE` pattern matching `needle` anywhere, with LIKE metacharacters escaped.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
