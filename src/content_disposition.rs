use crate::constants;
use http::header::{self, HeaderMap};
use regex::Regex;

/// The `name` and `filename` parameters of a part's `Content-Disposition` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentDisposition {
    pub field_name: Option<String>,
    pub file_name: Option<String>,
}

impl ContentDisposition {
    /// Parses a raw `Content-Disposition` header value.
    pub fn parse(value: &str) -> ContentDisposition {
        ContentDisposition {
            field_name: param(&constants::CONTENT_DISPOSITION_FIELD_NAME_RE, value),
            file_name: param(&constants::CONTENT_DISPOSITION_FILE_NAME_RE, value),
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> ContentDisposition {
        headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|val| val.to_str().ok())
            .map(ContentDisposition::parse)
            .unwrap_or_default()
    }
}

fn param(re: &Regex, value: &str) -> Option<String> {
    re.captures(value)
        .and_then(|cap| cap.get(1).or_else(|| cap.get(2)))
        .map(|m| m.as_str().to_owned())
}
