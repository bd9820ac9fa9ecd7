/// Where the parser currently is within the multipart message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Discarding bytes before the first delimiter.
    Preamble,
    /// The boundary was matched; classifying what follows it.
    Delimiter,
    /// Skipping transport padding up to the end of the delimiter line.
    DelimiterPadding,
    /// One `-` has been seen after the boundary.
    DelimiterClose,
    /// Parsing the header section of a body part.
    BodyPart(FieldState),
    /// The header section is done, no content has been delivered yet.
    FirstOctets,
    /// Streaming body part content.
    Octets,
    /// Discarding bytes after the close delimiter.
    Epilogue,
    /// Parsing has finished, either normally or by an early EOF.
    End,
}

/// Tokenizer position within a single header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Field,
    InName,
    AfterName,
    Value,
    InValue,
}

impl State {
    pub(crate) fn is_delimiter(self) -> bool {
        matches!(self, State::Delimiter | State::DelimiterPadding | State::DelimiterClose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_delimiter() {
        assert!(State::Delimiter.is_delimiter());
        assert!(State::DelimiterPadding.is_delimiter());
        assert!(State::DelimiterClose.is_delimiter());

        assert!(!State::Preamble.is_delimiter());
        assert!(!State::BodyPart(FieldState::Field).is_delimiter());
        assert!(!State::Epilogue.is_delimiter());
    }
}
