use crate::error::PokedexError;

pub const MAX_QUERY_LENGTH: usize = 100;

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, PokedexError> {
    if input.len() > max_len {
        return Err(PokedexError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(PokedexError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a lookup query (name or national dex number) and normalize it
/// to lower case.
///
/// Queries made only of dots are rejected: URL parsing resolves `.` and `..`
/// segments (escaped or not), which would move the request off the resource
/// path.
pub fn validate_query(input: &str) -> Result<String, PokedexError> {
    let query = sanitize_text(input, MAX_QUERY_LENGTH)?.to_lowercase();
    if query.chars().all(|c| c == '.') {
        return Err(PokedexError::InvalidInput(format!(
            "'{}' is not a valid name or number",
            query
        )));
    }
    Ok(query)
}

/// Percent-encode a validated query for use as one URL path segment.
pub fn encode_segment(query: &str) -> String {
    urlencoding::encode(query).into_owned()
}

/// True if the raw input has nothing left once whitespace is trimmed.
pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}
