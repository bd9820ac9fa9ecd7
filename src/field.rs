use bytes::{BufMut, BytesMut};

/// Accumulates a header field name or value.
///
/// `length` marks the end of the last non-whitespace byte so trailing linear
/// whitespace is dropped without rescanning. Field strings are UTF-8 as per
/// RFC 7578 §5.1; invalid sequences decode to U+FFFD.
#[derive(Debug, Default)]
pub(crate) struct FieldBuffer {
    buf: BytesMut,
    length: usize,
}

impl FieldBuffer {
    pub(crate) fn new() -> FieldBuffer {
        FieldBuffer::default()
    }

    pub(crate) fn reset(&mut self) {
        self.buf.clear();
        self.length = 0;
    }

    /// Restarts the buffer with a previously taken string.
    pub(crate) fn set(&mut self, s: &str) {
        self.reset();
        self.buf.put_slice(s.as_bytes());
        self.length = self.buf.len();
    }

    pub(crate) fn push(&mut self, byte: u8) {
        self.buf.put_u8(byte);
        self.length = self.buf.len();
    }

    /// Appends a single space, collapsing runs of linear whitespace.
    pub(crate) fn push_space(&mut self) {
        if self.buf.last() != Some(&b' ') {
            self.buf.put_u8(b' ');
        }
    }

    pub(crate) fn has_content(&self) -> bool {
        self.length > 0
    }

    pub(crate) fn take(&mut self) -> String {
        let s = String::from_utf8_lossy(&self.buf[..self.length]).into_owned();
        self.reset();
        s
    }
}
