use crate::constants;
use bytes::{BufMut, Bytes, BytesMut};
use memchr::memmem::Finder;

/// Outcome of extending a pending partial match into a new buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resume {
    /// The first `usize` bytes of the buffer complete the delimiter.
    Matched(usize),
    /// The whole buffer continues the delimiter without completing it.
    Extended,
    /// The buffer breaks the match; carries the prefix length that was pending.
    Broken(usize),
}

/// Outcome of scanning a buffer for the delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scan {
    /// A full delimiter starts at this index.
    Found(usize),
    /// The buffer ends with a delimiter prefix starting at this index.
    PartialTail(usize),
    NotFound,
}

/// Searches for `CRLF "--" boundary` across chunk borders.
///
/// `partial` counts the leading delimiter bytes already matched at the tail of
/// previously consumed input. The boundary is expected to contain no CR, so a
/// broken partial match never hides the start of another one.
#[derive(Debug, Clone)]
pub(crate) struct DelimiterSearch {
    pattern: Bytes,
    finder: Finder<'static>,
    partial: usize,
}

impl DelimiterSearch {
    pub(crate) fn new(boundary: &str) -> DelimiterSearch {
        let mut pattern =
            BytesMut::with_capacity(constants::CRLF.len() + constants::BOUNDARY_EXT.len() + boundary.len());
        pattern.put_slice(constants::CRLF.as_bytes());
        pattern.put_slice(constants::BOUNDARY_EXT.as_bytes());
        pattern.put_slice(boundary.as_bytes());
        let pattern = pattern.freeze();

        let finder = Finder::new(&pattern[..]).into_owned();

        DelimiterSearch {
            pattern,
            finder,
            partial: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.pattern.len()
    }

    pub(crate) fn partial(&self) -> usize {
        self.partial
    }

    pub(crate) fn set_partial(&mut self, partial: usize) {
        debug_assert!(partial <= self.len());
        self.partial = partial;
    }

    /// The delimiter bytes in `start..end`, e.g. to replay a prefix that turned
    /// out to be content.
    pub(crate) fn prefix(&self, start: usize, end: usize) -> Bytes {
        self.pattern.slice(start.min(end)..end)
    }

    /// Index of the first full delimiter in `data`.
    pub(crate) fn find(&self, data: &[u8]) -> Option<usize> {
        self.finder.find(data)
    }

    /// Length of the longest proper delimiter prefix that `data` ends with.
    pub(crate) fn ends_with(&self, data: &[u8]) -> usize {
        let max = data.len().min(self.len() - 1);
        let window_start = data.len() - max;

        for idx in memchr::memchr_iter(self.pattern[0], &data[window_start..]) {
            let tail = &data[window_start + idx..];
            if self.pattern.starts_with(tail) {
                return tail.len();
            }
        }

        0
    }

    /// Given `matched` delimiter bytes already seen, returns the new matched
    /// total if `data` continues the delimiter, or zero if it does not.
    pub(crate) fn starts_with(&self, data: &[u8], matched: usize) -> usize {
        let rest = &self.pattern[matched..];
        let n = rest.len().min(data.len());

        if data[..n] == rest[..n] {
            matched + n
        } else {
            0
        }
    }

    /// Continues the pending partial match into `data`.
    pub(crate) fn resume(&mut self, data: &[u8]) -> Resume {
        let pending = self.partial;
        let matched = self.starts_with(data, pending);

        if matched == 0 {
            self.partial = 0;
            Resume::Broken(pending)
        } else if matched == self.len() {
            self.partial = 0;
            Resume::Matched(matched - pending)
        } else {
            self.partial = matched;
            Resume::Extended
        }
    }

    /// Looks for a full delimiter in `data`, remembering a partial match at its
    /// tail for the next buffer.
    pub(crate) fn scan(&mut self, data: &[u8]) -> Scan {
        if let Some(idx) = self.find(data) {
            self.partial = 0;
            return Scan::Found(idx);
        }

        self.partial = self.ends_with(data);
        if self.partial > 0 {
            Scan::PartialTail(data.len() - self.partial)
        } else {
            Scan::NotFound
        }
    }
}
