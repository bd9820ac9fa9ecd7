use crate::constants;
use crate::size_limit::SizeLimit;

/// Represents some rules to be applied while parsing multipart content.
///
/// # Examples
///
/// ```
/// use multer_parser::{Constraints, SizeLimit};
///
/// let constraints = Constraints::new()
///     .allowed_parts(vec!["email", "avatar"])
///     .size_limit(
///         SizeLimit::new()
///             .whole_stream(15 * 1024 * 1024)
///             .per_part(10 * 1024 * 1024)
///             .for_part("email", 30),
///     )
///     .max_header_line_length(512);
/// # drop(constraints);
/// ```
#[derive(Debug, Clone)]
pub struct Constraints {
    pub(crate) size_limit: SizeLimit,
    pub(crate) allowed_parts: Option<Vec<String>>,
    pub(crate) max_header_line_length: usize,
}

impl Constraints {
    /// Creates a set of rules with default behaviour.
    pub fn new() -> Constraints {
        Constraints::default()
    }

    /// Applies rules on the content sizes.
    pub fn size_limit(mut self, size_limit: SizeLimit) -> Constraints {
        self.size_limit = size_limit;
        self
    }

    /// Specifies which parts, by `Content-Disposition` name, may be received.
    /// Any other part fails the parse with [`Error::UnknownPart`](crate::Error::UnknownPart).
    pub fn allowed_parts<N: Into<String>>(mut self, allowed_parts: Vec<N>) -> Constraints {
        let allowed_parts = allowed_parts.into_iter().map(|item| item.into()).collect();
        self.allowed_parts = Some(allowed_parts);
        self
    }

    /// Sets the maximum length of a single header line, excluding its line
    /// terminator. Defaults to 998.
    pub fn max_header_line_length(mut self, limit: usize) -> Constraints {
        self.max_header_line_length = limit;
        self
    }

    pub(crate) fn is_it_allowed(&self, part: Option<&str>) -> bool {
        if let Some(ref allowed_parts) = self.allowed_parts {
            part.map(|part| allowed_parts.iter().any(|item| item == part))
                .unwrap_or(false)
        } else {
            true
        }
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Constraints {
            size_limit: SizeLimit::default(),
            allowed_parts: None,
            max_header_line_length: constants::MAX_HEADER_LINE_LENGTH,
        }
    }
}
