//! Where in a request a client_id was found.

use std::fmt;

/// Request location a client_id was extracted from.
///
/// Displayed in snake_case, which is also the `source` field of the
/// resolution log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientIdSource {
    /// Username of HTTP Basic credentials.
    BasicAuth,
    /// First field of a Bearer token.
    BearerToken,
    /// `application/x-www-form-urlencoded` request body.
    FormBody,
    /// URL query string, including the query of a form request.
    Query,
}

impl ClientIdSource {
    /// Returns the snake_case name of this source.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientIdSource::BasicAuth => "basic_auth",
            ClientIdSource::BearerToken => "bearer_token",
            ClientIdSource::FormBody => "form_body",
            ClientIdSource::Query => "query",
        }
    }
}

impl fmt::Display for ClientIdSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_log_field_names() {
        let names: Vec<_> = [
            ClientIdSource::BasicAuth,
            ClientIdSource::BearerToken,
            ClientIdSource::FormBody,
            ClientIdSource::Query,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(names, ["basic_auth", "bearer_token", "form_body", "query"]);
    }
}
