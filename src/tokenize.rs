/// Split `input` into its first whitespace-delimited token, the remainder
/// after the separating whitespace, and whether the input ends in whitespace.
///
/// A trailing space is how the parser tells a finished token from one still
/// being typed. Empty input yields an empty token.
pub fn leading_token(input: &str) -> (&str, &str, bool) {
    let trailing = input.ends_with(char::is_whitespace);
    let trimmed = input.trim_start();
    match trimmed.find(char::is_whitespace) {
        Some(pos) => (&trimmed[..pos], trimmed[pos..].trim_start(), trailing),
        None => (trimmed, "", trailing),
    }
}

/// Split an arbitrary remainder into its full token list plus the
/// trailing-space flag.
pub fn split_tokens(input: &str) -> (Vec<&str>, bool) {
    let trailing = input.ends_with(char::is_whitespace);
    (input.split_whitespace().collect(), trailing)
}
