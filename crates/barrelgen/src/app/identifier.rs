//! Identifier derivation from file paths.

/// Map a relative path to a bare identifier that is legal in both output
/// dialects.
///
/// ASCII alphanumerics, `_` and `$` pass through unchanged; every other
/// character is escaped as `$<decimal scalar value>$`, so `fixtures/one.js`
/// becomes `fixtures$47$one$46$js`. A leading digit is escaped too since it
/// cannot start a binding name. Pure and deterministic: equal paths always
/// yield equal identifiers.
pub fn to_identifier(path: &str) -> String {
    let mut identifier = String::with_capacity(path.len());
    for (index, ch) in path.chars().enumerate() {
        let passthrough = ch == '_' || ch == '$' || ch.is_ascii_alphanumeric();
        if passthrough && !(index == 0 && ch.is_ascii_digit()) {
            identifier.push(ch);
        } else {
            identifier.push('$');
            identifier.push_str(&(ch as u32).to_string());
            identifier.push('$');
        }
    }
    identifier
}
