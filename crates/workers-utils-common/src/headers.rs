//! Request header parsing

use http::HeaderMap;
use http::header::ACCEPT;

/// Request headers in a friendlier shape
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHeaders {
    /// Media types from the `Accept` header, in order, without `;q=` weights
    pub accept: Vec<String>,
}

impl ParsedHeaders {
    /// Check whether the client listed `media_type` in its `Accept` header
    pub fn accepts(&self, media_type: &str) -> bool {
        self.accept.iter().any(|item| item == media_type)
    }
}

/// Parse the headers of an incoming request
pub fn parse_headers(headers: &HeaderMap) -> ParsedHeaders {
    let accept = headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .map(|item| {
                    let item = item.trim();
                    item.split_once(';')
                        .map_or(item, |(media_type, _)| media_type)
                        .to_string()
                })
                .collect()
        })
        .unwrap_or_default();

    ParsedHeaders { accept }
}
