use crate::config::AuthConfig;
use crate::request::TokenSource;

/// Locate a candidate token in a request.
///
/// Ordered, first match wins: the configured header (with the scheme prefix
/// stripped), then the configured query parameter. `None` is the normal
/// "no token supplied" outcome, not an error. No other source is consulted
/// and nothing is mutated.
pub fn extract_token<R>(request: &R, config: &AuthConfig) -> Option<String>
where
    R: TokenSource + ?Sized,
{
    if !config.header.is_empty() {
        if let Some(value) = request.header(&config.header) {
            if !value.is_empty() {
                return Some(strip_scheme(value, &config.prefix));
            }
        }
    }

    if !config.parameter.is_empty() {
        if let Some(value) = request.query_param(&config.parameter) {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    None
}

// Strips one leading "<prefix> " occurrence, case-insensitively. A value
// without the scheme is returned unchanged.
fn strip_scheme(value: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return value.to_string();
    }
    let scheme = format!("{} ", prefix);
    match value.get(..scheme.len()) {
        Some(head) if head.eq_ignore_ascii_case(&scheme) => value[scheme.len()..].to_string(),
        _ => value.to_string(),
    }
}
