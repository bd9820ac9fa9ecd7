use lazy_static::lazy_static;
use regex::Regex;

pub(crate) const DEFAULT_WHOLE_STREAM_SIZE_LIMIT: u64 = std::u64::MAX;
pub(crate) const DEFAULT_PER_PART_SIZE_LIMIT: u64 = std::u64::MAX;

/// RFC 5322 caps a line at 998 characters, excluding the CRLF.
pub(crate) const MAX_HEADER_LINE_LENGTH: usize = 998;

pub(crate) const BOUNDARY_EXT: &str = "--";
pub(crate) const CRLF: &str = "\r\n";

lazy_static! {
    pub(crate) static ref CONTENT_DISPOSITION_FIELD_NAME_RE: Regex =
        Regex::new(r#"(?i)\bname=(?:"([^"]*)"|([^\s;"]+))"#).unwrap();
    pub(crate) static ref CONTENT_DISPOSITION_FILE_NAME_RE: Regex =
        Regex::new(r#"(?i)\bfilename=(?:"([^"]*)"|([^\s;"]+))"#).unwrap();
}
