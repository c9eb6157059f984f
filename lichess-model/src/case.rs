//! Key case conversion

/// Convert a camelCase key to snake_case.
///
/// An underscore is inserted before every ASCII uppercase letter that is not
/// the first character, then the whole key is lowercased. Keys that are
/// already snake_case come back unchanged. Two source keys that convert to the
/// same name are not detected.
pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(c);
    }
    out.to_lowercase()
}
