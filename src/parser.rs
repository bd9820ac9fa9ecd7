use crate::constants;
use crate::constraints::Constraints;
use crate::content_disposition::ContentDisposition;
use crate::field::FieldBuffer;
use crate::handler::{Flow, Handler};
use crate::search::{DelimiterSearch, Resume, Scan};
use crate::state::{FieldState, State};
use crate::token::{self, Kind};
use crate::Error;
use bytes::Buf;
use std::fmt::{self, Debug, Formatter};

/// A push parser for `multipart/*` content as described by
/// [RFC 2046 §5.1](https://tools.ietf.org/html/rfc2046#section-5.1).
///
/// The parser owns no input. Each call to [`parse`](MultipartParser::parse)
/// consumes bytes from the given buffer and reports the structure it finds to
/// the [`Handler`]. A delimiter may straddle any number of buffers.
///
/// One parser handles exactly one message; once it reaches [`State::End`] it
/// stays there.
///
/// # Examples
///
/// ```
/// use multer_parser::{Flow, Handler, MultipartParser};
///
/// #[derive(Default)]
/// struct Collect {
///     fields: Vec<(String, String)>,
///     body: Vec<u8>,
/// }
///
/// impl Handler for Collect {
///     fn parsed_field(&mut self, name: &str, value: &str) {
///         self.fields.push((name.to_owned(), value.to_owned()));
///     }
///
///     fn content(&mut self, data: &[u8], _last: bool) -> Flow {
///         self.body.extend_from_slice(data);
///         Flow::Continue
///     }
/// }
///
/// let mut parser = MultipartParser::new(Collect::default(), "X-BOUNDARY");
///
/// let mut first: &[u8] = b"--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nhel";
/// let mut second: &[u8] = b"lo\r\n--X-BOUNDARY--\r\n";
///
/// parser.parse(&mut first, false).unwrap();
/// parser.parse(&mut second, true).unwrap();
///
/// let collect = parser.into_handler();
/// assert_eq!(collect.fields[0].1, "form-data; name=\"a\"");
/// assert_eq!(collect.body, b"hello");
/// ```
pub struct MultipartParser<H> {
    handler: H,
    constraints: Constraints,
    search: DelimiterSearch,
    state: State,
    cr: bool,
    dead: bool,
    field: FieldBuffer,
    field_name: Option<String>,
    field_value: Option<String>,
    header_line_length: usize,
    stream_size_counter: u64,
    curr_part_name: Option<String>,
    curr_part_size_limit: u64,
    curr_part_size_counter: u64,
}

impl<H: Handler> MultipartParser<H> {
    /// Constructs a parser for the given boundary, as found in the `boundary`
    /// parameter of the `Content-Type` header (without quotes or leading `--`).
    pub fn new<B: AsRef<str>>(handler: H, boundary: B) -> MultipartParser<H> {
        MultipartParser::with_constraints(handler, boundary, Constraints::default())
    }

    /// Constructs a parser that enforces the given [`Constraints`].
    pub fn with_constraints<B: AsRef<str>>(handler: H, boundary: B, constraints: Constraints) -> MultipartParser<H> {
        let mut search = DelimiterSearch::new(boundary.as_ref());
        // The first delimiter may come without its CRLF when there is no preamble.
        search.set_partial(constants::CRLF.len());

        MultipartParser {
            handler,
            curr_part_size_limit: constraints.size_limit.per_part,
            constraints,
            search,
            state: State::Preamble,
            cr: false,
            dead: false,
            field: FieldBuffer::new(),
            field_name: None,
            field_value: None,
            header_line_length: 0,
            stream_size_counter: 0,
            curr_part_name: None,
            curr_part_size_counter: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Returns `true` once the message has completed or hit an early EOF.
    pub fn is_finished(&self) -> bool {
        self.state == State::End
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Parses bytes from `buf` until it is drained or a callback pauses.
    ///
    /// Consumed bytes are advanced out of `buf`. Set `last` when `buf` holds the
    /// final bytes of the message: once it is drained, the parser fires either
    /// `message_complete` or `early_eof` and reaches [`State::End`].
    ///
    /// Returns [`Flow::Pause`] if a callback asked to pause, in which case the
    /// remaining bytes must be passed again, or if parsing has already ended.
    ///
    /// Any error is fatal: the parser does not consume further input and every
    /// later call fails with [`Error::IllegalState`].
    pub fn parse<B: Buf>(&mut self, buf: &mut B, last: bool) -> crate::Result<Flow> {
        if self.dead {
            return Err(Error::IllegalState(self.state));
        }

        let res = self.parse_buf(buf, last);

        if let Err(ref err) = res {
            debug!("multipart parse failed in {:?} state: {}", self.state, err);
            self.dead = true;
        }

        res
    }

    fn parse_buf<B: Buf>(&mut self, buf: &mut B, last: bool) -> crate::Result<Flow> {
        if self.state == State::End {
            return Ok(Flow::Pause);
        }

        let mut flow = Flow::Continue;

        while flow == Flow::Continue && buf.has_remaining() {
            let chunk = self.limit_chunk(buf.chunk())?;

            let (consumed, next) = match self.state {
                State::Preamble => (self.parse_preamble(chunk), Flow::Continue),
                State::Delimiter | State::DelimiterPadding | State::DelimiterClose => {
                    (self.parse_delimiter(chunk)?, Flow::Continue)
                }
                State::BodyPart(_) => self.parse_part_headers(chunk)?,
                State::FirstOctets | State::Octets => self.parse_octet_content(chunk)?,
                State::Epilogue => (chunk.len(), Flow::Continue),
                State::End => (0, Flow::Pause),
            };

            self.stream_size_counter += consumed as u64;
            buf.advance(consumed);
            flow = next;
        }

        if last && !buf.has_remaining() {
            if self.state == State::Epilogue {
                self.set_state(State::End);
                trace!("message complete");
                return Ok(self.handler.message_complete());
            }

            trace!("early EOF in {:?} state", self.state);
            self.set_state(State::End);
            self.handler.early_eof();
            return Ok(Flow::Pause);
        }

        Ok(flow)
    }

    /// Caps the chunk at what is left of the whole stream size limit.
    fn limit_chunk<'a>(&self, chunk: &'a [u8]) -> crate::Result<&'a [u8]> {
        let limit = self.constraints.size_limit.whole_stream;
        let budget = limit.saturating_sub(self.stream_size_counter);

        if budget == 0 {
            return Err(Error::StreamSizeExceeded { limit });
        }

        if (chunk.len() as u64) > budget {
            Ok(&chunk[..budget as usize])
        } else {
            Ok(chunk)
        }
    }

    /// Classifies the next byte. A CR is swallowed and remembered, so `None`
    /// means "nothing to interpret yet".
    fn next(&mut self, byte: u8) -> crate::Result<Option<Kind>> {
        let kind = token::kind_of(byte);

        match kind {
            Kind::Cntl => Err(Error::IllegalCharacter {
                byte,
                state: self.state,
            }),
            Kind::Lf => {
                self.cr = false;
                Ok(Some(kind))
            }
            Kind::Cr => {
                if self.cr {
                    return Err(Error::BadLineEnding { state: self.state });
                }
                self.cr = true;
                Ok(None)
            }
            _ => {
                if self.cr {
                    return Err(Error::BadLineEnding { state: self.state });
                }
                Ok(Some(kind))
            }
        }
    }

    fn parse_preamble(&mut self, data: &[u8]) -> usize {
        if self.search.partial() > 0 {
            match self.search.resume(data) {
                Resume::Matched(consumed) => {
                    self.set_state(State::Delimiter);
                    return consumed;
                }
                Resume::Extended => return data.len(),
                Resume::Broken(_) => {}
            }
        }

        match self.search.scan(data) {
            Scan::Found(idx) => {
                self.set_state(State::Delimiter);
                idx + self.search.len()
            }
            Scan::PartialTail(_) | Scan::NotFound => data.len(),
        }
    }

    fn parse_delimiter(&mut self, data: &[u8]) -> crate::Result<usize> {
        let mut pos = 0;

        while self.state.is_delimiter() && pos < data.len() {
            let byte = data[pos];
            pos += 1;

            let kind = match self.next(byte)? {
                Some(kind) => kind,
                None => continue,
            };

            if kind == Kind::Lf {
                self.set_state(State::BodyPart(FieldState::Field));
                self.start_part();
                break;
            }

            match self.state {
                State::Delimiter => {
                    if byte == b'-' {
                        self.set_state(State::DelimiterClose);
                    } else {
                        self.set_state(State::DelimiterPadding);
                    }
                }
                State::DelimiterClose => {
                    if byte == b'-' {
                        self.set_state(State::Epilogue);
                        break;
                    }
                    self.set_state(State::DelimiterPadding);
                }
                _ => {}
            }
        }

        Ok(pos)
    }

    fn start_part(&mut self) {
        self.header_line_length = 0;
        self.curr_part_name = None;
        self.curr_part_size_limit = self.constraints.size_limit.per_part;
        self.curr_part_size_counter = 0;

        trace!("start part");
        self.handler.start_part();
    }

    fn parse_part_headers(&mut self, data: &[u8]) -> crate::Result<(usize, Flow)> {
        let mut pos = 0;

        while let State::BodyPart(field_state) = self.state {
            if pos == data.len() {
                break;
            }

            let byte = data[pos];
            pos += 1;

            let kind = match self.next(byte)? {
                Some(kind) => kind,
                None => continue,
            };

            if kind == Kind::Lf {
                self.header_line_length = 0;
            } else {
                self.header_line_length += 1;
                if self.header_line_length > self.constraints.max_header_line_length {
                    return Err(Error::HeaderLineTooLong {
                        limit: self.constraints.max_header_line_length,
                    });
                }
            }

            match field_state {
                FieldState::Field => match kind {
                    k if k.is_whitespace() => {
                        // Folded line: reopen the previous value.
                        if self.field_name.is_none() {
                            return Err(Error::IllegalFolding);
                        }

                        match self.field_value.take() {
                            Some(value) => {
                                self.field.set(&value);
                                self.field.push_space();
                            }
                            None => self.field.reset(),
                        }
                        self.set_field_state(FieldState::Value);
                    }
                    Kind::Lf => {
                        self.handle_field();
                        self.set_state(State::FirstOctets);
                        // The CRLF ending the header section doubles as the
                        // delimiter's CRLF when the part is empty.
                        self.search.set_partial(constants::CRLF.len());

                        if !self.constraints.is_it_allowed(self.curr_part_name.as_deref()) {
                            return Err(Error::UnknownPart {
                                part_name: self.curr_part_name.clone(),
                            });
                        }

                        trace!("header complete");
                        if self.handler.header_complete().is_pause() {
                            return Ok((pos, Flow::Pause));
                        }
                    }
                    k if k.is_name() => {
                        self.handle_field();
                        self.field.reset();
                        self.field.push(byte);
                        self.set_field_state(FieldState::InName);
                    }
                    _ => return Err(self.illegal_character(byte)),
                },

                FieldState::InName => match kind {
                    Kind::Colon => {
                        self.field_name = Some(self.field.take());
                        self.set_field_state(FieldState::Value);
                    }
                    Kind::Space => self.set_field_state(FieldState::AfterName),
                    Kind::Lf => {
                        // A name without a colon carries no field.
                        trace!("line feed in header name, dropping it");
                        self.field.reset();
                        self.handle_field();
                        self.set_field_state(FieldState::Field);
                    }
                    k if k.is_name() => self.field.push(byte),
                    _ => return Err(self.illegal_character(byte)),
                },

                FieldState::AfterName => match kind {
                    Kind::Colon => {
                        self.field_name = Some(self.field.take());
                        self.set_field_state(FieldState::Value);
                    }
                    Kind::Lf => {
                        self.field_name = Some(self.field.take());
                        self.field_value = Some(String::new());
                        self.set_field_state(FieldState::Field);
                    }
                    Kind::Space => {}
                    _ => return Err(self.illegal_character(byte)),
                },

                FieldState::Value => match kind {
                    Kind::Lf => {
                        // A blank fold keeps the reopened value.
                        self.field_value = Some(self.field.take());
                        self.set_field_state(FieldState::Field);
                    }
                    k if k.is_whitespace() => {}
                    k if k.is_value() => {
                        self.field.push(byte);
                        self.set_field_state(FieldState::InValue);
                    }
                    _ => return Err(self.illegal_character(byte)),
                },

                FieldState::InValue => match kind {
                    k if k.is_whitespace() => self.field.push_space(),
                    Kind::Lf => {
                        if self.field.has_content() {
                            self.field_value = Some(self.field.take());
                        } else {
                            self.field.reset();
                        }
                        self.set_field_state(FieldState::Field);
                    }
                    k if k.is_value() => self.field.push(byte),
                    _ => return Err(self.illegal_character(byte)),
                },
            }
        }

        Ok((pos, Flow::Continue))
    }

    /// Delivers the pending field, if both its name and value are complete.
    fn handle_field(&mut self) {
        if let (Some(name), Some(value)) = (self.field_name.take(), self.field_value.take()) {
            if name.eq_ignore_ascii_case(http::header::CONTENT_DISPOSITION.as_str()) {
                self.curr_part_name = ContentDisposition::parse(&value).field_name;
                self.curr_part_size_limit = self
                    .constraints
                    .size_limit
                    .extract_size_limit_for(self.curr_part_name.as_deref());
            }

            trace!("parsed field {:?}: {:?}", name, value);
            self.handler.parsed_field(&name, &value);
        }
    }

    fn parse_octet_content(&mut self, data: &[u8]) -> crate::Result<(usize, Flow)> {
        if self.search.partial() > 0 {
            match self.search.resume(data) {
                Resume::Matched(consumed) => {
                    self.set_state(State::Delimiter);
                    let flow = self.deliver_content(&[], true)?;
                    return Ok((consumed, flow));
                }
                Resume::Extended => return Ok((data.len(), Flow::Continue)),
                Resume::Broken(partial) => {
                    // The held-back bytes were content after all. In FirstOctets
                    // the leading CRLF was assumed, never received.
                    let start = if self.state == State::FirstOctets {
                        self.set_state(State::Octets);
                        constants::CRLF.len()
                    } else {
                        0
                    };

                    let held = self.search.prefix(start, partial);
                    if self.deliver_content(&held, false)?.is_pause() {
                        return Ok((0, Flow::Pause));
                    }
                }
            }
        }

        match self.search.scan(data) {
            Scan::Found(idx) => {
                self.set_state(State::Delimiter);
                let flow = self.deliver_content(&data[..idx], true)?;
                Ok((idx + self.search.len(), flow))
            }
            Scan::PartialTail(idx) => {
                let flow = self.deliver_content(&data[..idx], false)?;
                Ok((data.len(), flow))
            }
            Scan::NotFound => {
                let flow = self.deliver_content(data, false)?;
                Ok((data.len(), flow))
            }
        }
    }

    /// Hands content to the handler. Empty slices are only delivered when they
    /// close a part.
    fn deliver_content(&mut self, data: &[u8], last: bool) -> crate::Result<Flow> {
        self.curr_part_size_counter += data.len() as u64;

        if self.curr_part_size_counter > self.curr_part_size_limit {
            return Err(Error::PartSizeExceeded {
                limit: self.curr_part_size_limit,
                part_name: self.curr_part_name.clone(),
            });
        }

        if data.is_empty() && !last {
            return Ok(Flow::Continue);
        }

        trace!("content: {} bytes, last: {}", data.len(), last);
        Ok(self.handler.content(data, last))
    }

    fn illegal_character(&self, byte: u8) -> Error {
        Error::IllegalCharacter {
            byte,
            state: self.state,
        }
    }

    fn set_state(&mut self, state: State) {
        trace!("{:?} --> {:?}", self.state, state);
        self.state = state;
    }

    fn set_field_state(&mut self, field_state: FieldState) {
        self.set_state(State::BodyPart(field_state));
    }
}

impl<H> Debug for MultipartParser<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultipartParser")
            .field("state", &self.state)
            .field("partial_boundary", &self.search.partial())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Events(Vec<String>);

    impl Handler for Events {
        fn start_part(&mut self) {
            self.0.push("start".to_owned());
        }

        fn parsed_field(&mut self, name: &str, value: &str) {
            self.0.push(format!("field {}={}", name, value));
        }

        fn header_complete(&mut self) -> Flow {
            self.0.push("headers".to_owned());
            Flow::Continue
        }

        fn content(&mut self, data: &[u8], last: bool) -> Flow {
            self.0.push(format!("content {:?} {}", String::from_utf8_lossy(data), last));
            Flow::Continue
        }

        fn message_complete(&mut self) -> Flow {
            self.0.push("complete".to_owned());
            Flow::Continue
        }

        fn early_eof(&mut self) {
            self.0.push("eof".to_owned());
        }
    }

    fn parse_all(boundary: &str, input: &[u8]) -> crate::Result<Vec<String>> {
        let mut parser = MultipartParser::new(Events::default(), boundary);
        let mut buf = input;
        parser.parse(&mut buf, true)?;
        Ok(parser.into_handler().0)
    }

    #[test]
    fn test_preamble_and_epilogue_are_discarded() {
        let events = parse_all(
            "XYZ",
            b"This is the preamble.\r\n--XYZ\r\nA: b\r\n\r\nbody\r\n--XYZ--\r\nThis is the epilogue.\r\n",
        )
        .unwrap();

        assert_eq!(
            events,
            vec!["start", "field A=b", "headers", "content \"body\" true", "complete"]
        );
    }

    #[test]
    fn test_transport_padding() {
        let events = parse_all("XYZ", b"--XYZ \t \r\nA: b\r\n\r\nx\r\n--XYZ-q\r\n\r\ny\r\n--XYZ--").unwrap();

        assert_eq!(
            events,
            vec![
                "start",
                "field A=b",
                "headers",
                "content \"x\" true",
                "start",
                "headers",
                "content \"y\" true",
                "complete"
            ]
        );
    }

    #[test]
    fn test_empty_part_body() {
        let events = parse_all("XYZ", b"--XYZ\r\nA: b\r\n\r\n--XYZ--\r\n").unwrap();

        assert_eq!(
            events,
            vec!["start", "field A=b", "headers", "content \"\" true", "complete"]
        );
    }

    #[test]
    fn test_body_starting_like_a_delimiter() {
        let events = parse_all("XYZ", b"--XYZ\r\n\r\n--XYQ\r\n--XYZ--").unwrap();

        assert_eq!(
            events,
            vec!["start", "headers", "content \"--XYQ\" true", "complete"]
        );
    }

    #[test]
    fn test_field_states() {
        let events = parse_all(
            "XYZ",
            b"--XYZ\r\nName  : spaced\r\nEmpty:\r\nBare\r\nTrailing \r\nX:  a \t b  \r\n\r\n\r\n--XYZ--",
        )
        .unwrap();

        assert_eq!(
            events,
            vec![
                "start",
                "field Name=spaced",
                "field Empty=",
                "field Trailing=",
                "field X=a b",
                "headers",
                "content \"\" true",
                "complete"
            ]
        );
    }

    #[test]
    fn test_folded_whitespace_line_keeps_value() {
        let events = parse_all("XYZ", b"--XYZ\r\nX: a\r\n \t \r\n\r\n\r\n--XYZ--").unwrap();

        assert_eq!(events[1], "field X=a");
    }

    #[test]
    fn test_folded_whitespace_line_keeps_empty_value() {
        let events = parse_all("XYZ", b"--XYZ\r\nSpaced \r\n \r\nColon:\r\n\t\r\n\r\nx\r\n--XYZ--").unwrap();

        assert_eq!(
            events,
            vec![
                "start",
                "field Spaced=",
                "field Colon=",
                "headers",
                "content \"x\" true",
                "complete"
            ]
        );
    }

    #[test]
    fn test_illegal_characters() {
        assert_eq!(
            parse_all("XYZ", b"--XYZ\r\nA\x01: b\r\n"),
            Err(Error::IllegalCharacter {
                byte: 0x01,
                state: State::BodyPart(FieldState::InName),
            })
        );

        assert_eq!(
            parse_all("XYZ", b"--XYZ\r\n\"A: b\r\n"),
            Err(Error::IllegalCharacter {
                byte: b'"',
                state: State::BodyPart(FieldState::Field),
            })
        );

        assert_eq!(
            parse_all("XYZ", b"--XYZ\r\nA b: c\r\n"),
            Err(Error::IllegalCharacter {
                byte: b'b',
                state: State::BodyPart(FieldState::AfterName),
            })
        );
    }

    #[test]
    fn test_bad_line_endings() {
        assert_eq!(
            parse_all("XYZ", b"--XYZ\r\nA: b\rc\r\n"),
            Err(Error::BadLineEnding {
                state: State::BodyPart(FieldState::InValue),
            })
        );

        assert_eq!(
            parse_all("XYZ", b"--XYZ\r\r\n"),
            Err(Error::BadLineEnding { state: State::Delimiter })
        );
    }

    #[test]
    fn test_first_field_folded() {
        assert_eq!(parse_all("XYZ", b"--XYZ\r\n folded: x\r\n"), Err(Error::IllegalFolding));
    }

    #[test]
    fn test_dead_after_error() {
        let mut parser = MultipartParser::new(Events::default(), "XYZ");

        let mut buf: &[u8] = b"--XYZ\r\n\x7f";
        assert!(parser.parse(&mut buf, false).is_err());

        let mut buf: &[u8] = b"A: b\r\n";
        assert_eq!(
            parser.parse(&mut buf, false),
            Err(Error::IllegalState(State::BodyPart(FieldState::Field)))
        );
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut parser = MultipartParser::new(Events::default(), "XYZ");

        let mut buf: &[u8] = b"--XYZ\r\n";
        assert_eq!(parser.parse(&mut buf, true), Ok(Flow::Pause));
        assert!(parser.is_finished());

        let mut buf: &[u8] = b"";
        assert_eq!(parser.parse(&mut buf, true), Ok(Flow::Pause));

        assert_eq!(parser.into_handler().0, vec!["start", "eof"]);
    }

    #[test]
    fn test_debug() {
        let parser = MultipartParser::new(Events::default(), "XYZ");
        assert_eq!(
            format!("{:?}", parser),
            "MultipartParser { state: Preamble, partial_boundary: 2 }"
        );
    }
}
