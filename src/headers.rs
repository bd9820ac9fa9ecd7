use crate::content_disposition::ContentDisposition;
use crate::helpers;
use http::header::{self, HeaderMap};

/// Collects the header fields of one part into a [`HeaderMap`].
///
/// Meant to be embedded in a [`Handler`](crate::Handler): push every
/// `parsed_field`, read it back once `header_complete` fires, and `clear` it
/// on the next `start_part`.
///
/// # Examples
///
/// ```
/// use multer_parser::PartHeaders;
///
/// let mut headers = PartHeaders::new();
/// headers.push("Content-Disposition", r#"form-data; name="avatar"; filename="me.png""#).unwrap();
/// headers.push("Content-Type", "image/png").unwrap();
///
/// assert_eq!(headers.name().as_deref(), Some("avatar"));
/// assert_eq!(headers.file_name().as_deref(), Some("me.png"));
/// assert_eq!(headers.content_type(), Some(mime::IMAGE_PNG));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PartHeaders {
    headers: HeaderMap,
}

impl PartHeaders {
    pub fn new() -> PartHeaders {
        PartHeaders::default()
    }

    /// Adds a parsed header field. Repeated names are kept in order.
    pub fn push(&mut self, name: &str, value: &str) -> crate::Result<()> {
        let (name, value) = helpers::convert_parsed_field(name, value)?;
        self.headers.append(name, value);
        Ok(())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn content_disposition(&self) -> ContentDisposition {
        ContentDisposition::from_headers(&self.headers)
    }

    /// The `name` parameter of the `Content-Disposition` header.
    pub fn name(&self) -> Option<String> {
        self.content_disposition().field_name
    }

    /// The `filename` parameter of the `Content-Disposition` header.
    pub fn file_name(&self) -> Option<String> {
        self.content_disposition().file_name
    }

    pub fn content_type(&self) -> Option<mime::Mime> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<mime::Mime>().ok())
    }

    pub fn clear(&mut self) {
        self.headers.clear();
    }

    pub fn into_inner(self) -> HeaderMap {
        self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_read_back() {
        let mut headers = PartHeaders::new();
        headers
            .push("Content-Disposition", r#"form-data; name="File Field"; filename="a-text-file.txt""#)
            .unwrap();
        headers.push("Content-Type", "text/plain").unwrap();
        headers.push("X-Tag", "one").unwrap();
        headers.push("x-tag", "two").unwrap();

        assert_eq!(headers.name().as_deref(), Some("File Field"));
        assert_eq!(headers.file_name().as_deref(), Some("a-text-file.txt"));
        assert_eq!(headers.content_type(), Some(mime::TEXT_PLAIN));

        let tags: Vec<_> = headers.headers().get_all("x-tag").iter().collect();
        assert_eq!(tags, vec!["one", "two"]);

        headers.clear();
        assert!(headers.headers().is_empty());
        assert_eq!(headers.name(), None);
    }

    #[test]
    fn test_push_invalid_name() {
        let mut headers = PartHeaders::new();
        assert!(headers.push("", "value").is_err());
        assert!(headers.into_inner().is_empty());
    }
}
