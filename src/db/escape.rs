//! String escaping for SQL literals.

/// Escape a string for interpolation inside a quoted MySQL string literal.
///
/// Escaping is delegated to the driver. With `no_backslash_escape` set (the
/// session runs under `NO_BACKSLASH_ESCAPES`) single quotes are doubled and
/// backslashes are left alone; otherwise NUL, newline, carriage return,
/// backslash, both quote characters and Ctrl-Z are backslash-escaped.
pub fn escape_literal(s: &str, no_backslash_escape: bool) -> String {
    let quoted = mysql::Value::Bytes(s.as_bytes().to_vec()).as_sql(no_backslash_escape);
    match quoted
        .strip_prefix('\'')
        .and_then(|inner| inner.strip_suffix('\''))
    {
        Some(inner) => inner.to_string(),
        None => quoted,
    }
}
