use std::fmt::{self, Debug, Display, Formatter};

use derive_more::Display;

use crate::State;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A set of errors that can occur while parsing multipart content and in other
/// operations.
#[derive(Display)]
#[non_exhaustive]
pub enum Error {
    /// A control byte, or a byte not allowed at this position, was found.
    #[display(fmt = "illegal character 0x{:02x} in {:?} state", byte, state)]
    IllegalCharacter { byte: u8, state: State },

    /// A CR was not immediately followed by an LF.
    #[display(fmt = "bad end of line in {:?} state", state)]
    BadLineEnding { state: State },

    /// A folded continuation line appeared before any header field.
    #[display(fmt = "first header field of a part is folded")]
    IllegalFolding,

    /// A header line grew beyond the configured maximum length.
    #[display(fmt = "header line exceeded the maximum length: {} bytes", limit)]
    HeaderLineTooLong { limit: usize },

    /// The parser was used after it had already failed.
    #[display(fmt = "parser is in an illegal state: {:?}", _0)]
    IllegalState(State),

    /// The content of a part exceeded its size limit.
    #[display(
        fmt = "part '{}' exceeded the maximum size limit: {} bytes",
        "part_name.as_deref().unwrap_or(\"<unknown>\")",
        limit
    )]
    PartSizeExceeded { limit: u64, part_name: Option<String> },

    /// The input exceeded the whole stream size limit.
    #[display(fmt = "stream size exceeded the maximum limit: {} bytes", limit)]
    StreamSizeExceeded { limit: u64 },

    /// A part whose name is not in
    /// [`allowed_parts`](crate::Constraints::allowed_parts) was received.
    #[display(fmt = "unknown part received: {}", "part_name.as_deref().unwrap_or(\"<unknown>\")")]
    UnknownPart { part_name: Option<String> },

    /// Reading from the input stream failed.
    #[display(fmt = "stream read failed: {}", _0)]
    StreamReadFailed(BoxError),

    /// Failed to decode a parsed header name to
    /// [`HeaderName`](http::header::HeaderName) type.
    #[display(fmt = "failed to decode part's header name: {:?} {}", name, cause)]
    DecodeHeaderName { name: String, cause: BoxError },

    /// Failed to decode a parsed header value to
    /// [`HeaderValue`](http::header::HeaderValue) type.
    #[display(fmt = "failed to decode part's header value: {}", cause)]
    DecodeHeaderValue { value: Vec<u8>, cause: BoxError },

    /// The `Content-Type` header is not `multipart/form-data`.
    #[display(fmt = "Content-Type is not multipart/form-data")]
    NoMultipart,

    /// Failed to convert the `Content-Type` to [`mime::Mime`] type.
    #[display(fmt = "Failed to convert Content-Type to `mime::Mime` type: {}", _0)]
    DecodeContentType(mime::FromStrError),

    /// No boundary found in `Content-Type` header.
    #[display(fmt = "multipart boundary not found in Content-Type")]
    NoBoundary,
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().eq(&other.to_string())
    }
}

impl Eq for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldState;

    #[test]
    fn test_display() {
        let err = Error::IllegalCharacter {
            byte: 0x01,
            state: State::BodyPart(FieldState::InName),
        };
        assert_eq!(err.to_string(), "illegal character 0x01 in BodyPart(InName) state");

        let err = Error::PartSizeExceeded {
            limit: 10,
            part_name: None,
        };
        assert_eq!(err.to_string(), "part '<unknown>' exceeded the maximum size limit: 10 bytes");

        let err = Error::HeaderLineTooLong { limit: 998 };
        assert_eq!(err.to_string(), "header line exceeded the maximum length: 998 bytes");
    }

    #[test]
    fn test_eq_compares_messages() {
        assert_eq!(Error::NoBoundary, Error::NoBoundary);
        assert_ne!(Error::NoBoundary, Error::NoMultipart);
        assert_eq!(
            Error::BadLineEnding { state: State::Delimiter },
            Error::BadLineEnding { state: State::Delimiter }
        );
    }
}
