/// Tells the parser whether to keep going after a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep consuming the current buffer.
    Continue,
    /// Return from [`parse`](crate::MultipartParser::parse) as soon as possible.
    /// Unconsumed bytes stay in the buffer and must be fed again.
    Pause,
}

impl Flow {
    /// Returns `true` for [`Flow::Pause`].
    pub fn is_pause(self) -> bool {
        self == Flow::Pause
    }
}

impl Default for Flow {
    fn default() -> Self {
        Flow::Continue
    }
}

/// Receives the structure of a multipart message as it is parsed.
///
/// Callbacks are invoked synchronously from within
/// [`MultipartParser::parse`](crate::MultipartParser::parse). Slices and strings
/// handed to a callback are only valid for the duration of that call; copy them
/// to keep them around.
///
/// If several pausing callbacks fire from the same point of the input (e.g.
/// `content` with `last` set followed by `message_complete`), it is enough for
/// the caller to process the events once.
#[allow(unused_variables)]
pub trait Handler {
    /// A new body part begins. Its header fields follow.
    fn start_part(&mut self) {}

    /// One header field of the current part.
    ///
    /// The name is never empty, and neither name nor value contain a line
    /// terminator. Folded lines are joined with a single space.
    fn parsed_field(&mut self, name: &str, value: &str) {}

    /// The header section of the current part is finished.
    fn header_complete(&mut self) -> Flow {
        Flow::Continue
    }

    /// A slice of the current part's content.
    ///
    /// `last` is `true` exactly once per part, when its closing delimiter has
    /// been found; that final slice may be empty.
    fn content(&mut self, data: &[u8], last: bool) -> Flow {
        Flow::Continue
    }

    /// The close delimiter was seen and the input has ended.
    fn message_complete(&mut self) -> Flow {
        Flow::Continue
    }

    /// The input ended before the close delimiter was seen.
    fn early_eof(&mut self) {}
}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn start_part(&mut self) {
        (**self).start_part()
    }

    fn parsed_field(&mut self, name: &str, value: &str) {
        (**self).parsed_field(name, value)
    }

    fn header_complete(&mut self) -> Flow {
        (**self).header_complete()
    }

    fn content(&mut self, data: &[u8], last: bool) -> Flow {
        (**self).content(data, last)
    }

    fn message_complete(&mut self) -> Flow {
        (**self).message_complete()
    }

    fn early_eof(&mut self) {
        (**self).early_eof()
    }
}
