//! An incremental, push-based parser for MIME multipart content
//! ([RFC 2046 §5.1](https://tools.ietf.org/html/rfc2046#section-5.1)), as found in
//! `multipart/form-data` request bodies.
//!
//! Bytes are pushed into a [`MultipartParser`] in chunks of any size. It reports
//! parts, their header fields and their content to a [`Handler`] without
//! buffering the message, and a delimiter may straddle any chunk border.
//!
//! # Examples
//!
//! ```
//! use multer_parser::{parse_boundary, Flow, Handler, MultipartParser, PartHeaders};
//!
//! #[derive(Default)]
//! struct Print {
//!     headers: PartHeaders,
//! }
//!
//! impl Handler for Print {
//!     fn start_part(&mut self) {
//!         self.headers.clear();
//!     }
//!
//!     fn parsed_field(&mut self, name: &str, value: &str) {
//!         self.headers.push(name, value).unwrap();
//!     }
//!
//!     fn content(&mut self, data: &[u8], last: bool) -> Flow {
//!         println!("{:?}: {:?} (last: {})", self.headers.name(), data, last);
//!         Flow::Continue
//!     }
//! }
//!
//! # fn run() -> multer_parser::Result<()> {
//! let boundary = parse_boundary("multipart/form-data; boundary=X-BOUNDARY")?;
//! let mut parser = MultipartParser::new(Print::default(), boundary);
//!
//! let mut data: &[u8] = b"--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
//! parser.parse(&mut data, true)?;
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! # Optional Features
//!
//! * `tokio-io`: Adds [`MultipartParser::parse_reader`] for tokio's `AsyncRead`.
//! * `log`: Traces state transitions and callbacks through the `log` crate.

pub use bytes;
pub use constraints::Constraints;
pub use content_disposition::ContentDisposition;
pub use error::Error;
pub use handler::{Flow, Handler};
pub use headers::PartHeaders;
pub use parser::MultipartParser;
pub use size_limit::SizeLimit;
pub use state::{FieldState, State};

#[cfg(feature = "log")]
macro_rules! trace {
    ($($t:tt)*) => (::log::trace!($($t)*););
}

#[cfg(feature = "log")]
macro_rules! debug {
    ($($t:tt)*) => (::log::debug!($($t)*););
}

#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($t:tt)*) => {
        if false {
            let _ = format_args!($($t)*);
        }
    };
}

#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($t:tt)*) => {
        if false {
            let _ = format_args!($($t)*);
        }
    };
}

mod constants;
mod constraints;
mod content_disposition;
mod error;
mod field;
mod handler;
mod headers;
mod helpers;
mod parser;
mod search;
mod size_limit;
mod state;
mod stream;
mod token;

/// A Result type often returned from methods that can have `multer-parser` errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Parses the `Content-Type` header to extract the boundary value.
///
/// # Examples
///
/// ```
/// let content_type = "multipart/form-data; boundary=ABCDEFG";
///
/// assert_eq!(multer_parser::parse_boundary(content_type), Ok("ABCDEFG".to_owned()));
/// ```
pub fn parse_boundary<T: AsRef<str>>(content_type: T) -> Result<String> {
    let m = content_type
        .as_ref()
        .parse::<mime::Mime>()
        .map_err(Error::DecodeContentType)?;

    if !(m.type_() == mime::MULTIPART && m.subtype() == mime::FORM_DATA) {
        return Err(Error::NoMultipart);
    }

    m.get_param(mime::BOUNDARY)
        .map(|name| name.as_str().to_owned())
        .ok_or(Error::NoBoundary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boundary() {
        let content_type = "multipart/form-data; boundary=ABCDEFG";
        assert_eq!(parse_boundary(content_type), Ok("ABCDEFG".to_owned()));

        let content_type = "multipart/form-data; boundary=------ABCDEFG";
        assert_eq!(parse_boundary(content_type), Ok("------ABCDEFG".to_owned()));

        let content_type = "boundary=------ABCDEFG";
        assert!(parse_boundary(content_type).is_err());

        let content_type = "text/plain";
        assert_eq!(parse_boundary(content_type), Err(Error::NoMultipart));

        let content_type = "text/plain; boundary=------ABCDEFG";
        assert_eq!(parse_boundary(content_type), Err(Error::NoMultipart));

        let content_type = "multipart/form-data";
        assert_eq!(parse_boundary(content_type), Err(Error::NoBoundary));
    }
}
