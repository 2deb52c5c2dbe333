use anyhow::Result;

/// Whitespace characters accepted alongside printable ASCII.
const SAFE_WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0b', '\x0c'];

/// True for characters in the "safe" set: printable ASCII and plain whitespace.
///
/// Everything else (emoji, other non-ASCII symbols, control characters) is
/// treated as decoration.
pub fn is_safe_char(c: char) -> bool {
    c.is_ascii_graphic() || SAFE_WHITESPACE.contains(&c)
}

/// Characters of `name` that fall outside the safe set, in order of appearance.
pub fn decorative_chars(name: &str) -> Vec<char> {
    name.chars().filter(|c| !is_safe_char(*c)).collect()
}

/// `name` with every decorative character removed.
pub fn strip_decorations(name: &str) -> String {
    name.chars().filter(|c| is_safe_char(*c)).collect()
}

pub fn validate_nickname(value: &str) -> Result<&str> {
    if value.trim().is_empty() {
        return Err(anyhow::anyhow!("Nickname must not be empty"));
    }

    if let Some(bad) = value.chars().find(|c| !is_safe_char(*c)) {
        return Err(anyhow::anyhow!(
            "Nickname contains a disallowed character: {:?}",
            bad
        ));
    }

    Ok(value)
}
