/// Port for the incoming request, as seen by the token extractor.
///
/// Host frameworks adapt their request type to this trait; the adapter never
/// touches anything else about the request.
pub trait TokenSource {
    /// Look up a named header. Matching must be case-insensitive.
    fn header(&self, name: &str) -> Option<&str>;

    /// Look up a named query parameter.
    fn query_param(&self, name: &str) -> Option<&str>;
}

/// Fixed header/parameter request, backed by plain key-value pairs.
///
/// Useful for tests and for hosts whose request type is already flattened
/// into maps by the time authentication runs.
#[derive(Debug, Clone, Default)]
pub struct StaticRequest {
    headers: Vec<(String, String)>,
    params: Vec<(String, String)>,
}

impl StaticRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl ToString, value: impl ToString) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a query parameter.
    pub fn with_query_param(mut self, name: impl ToString, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }
}

impl TokenSource for StaticRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn query_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}
