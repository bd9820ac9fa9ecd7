/// Byte classes used while tokenizing delimiter and header lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Cntl,
    Cr,
    Lf,
    Alpha,
    Digit,
    Tchar,
    Vchar,
    Htab,
    Space,
    Colon,
    Otext,
}

const fn classify(byte: u8) -> Kind {
    match byte {
        b'\n' => Kind::Lf,
        b'\r' => Kind::Cr,
        b' ' => Kind::Space,
        b'\t' => Kind::Htab,
        b':' => Kind::Colon,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~' => {
            Kind::Tchar
        }
        b'0'..=b'9' => Kind::Digit,
        b'A'..=b'Z' | b'a'..=b'z' => Kind::Alpha,
        0x21..=0x7e => Kind::Vchar,
        0x80..=0xff => Kind::Otext,
        _ => Kind::Cntl,
    }
}

const fn build_table() -> [Kind; 256] {
    let mut table = [Kind::Cntl; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = classify(i as u8);
        i += 1;
    }
    table
}

static TOKENS: [Kind; 256] = build_table();

#[inline]
pub(crate) fn kind_of(byte: u8) -> Kind {
    TOKENS[byte as usize]
}

impl Kind {
    /// Bytes that may start or continue a header field name.
    pub(crate) fn is_name(self) -> bool {
        matches!(self, Kind::Alpha | Kind::Digit | Kind::Tchar)
    }

    /// Bytes kept verbatim inside a header field value. Multi-byte UTF-8
    /// sequences fall into `Otext`.
    pub(crate) fn is_value(self) -> bool {
        matches!(
            self,
            Kind::Alpha | Kind::Digit | Kind::Tchar | Kind::Vchar | Kind::Colon | Kind::Otext
        )
    }

    pub(crate) fn is_whitespace(self) -> bool {
        matches!(self, Kind::Space | Kind::Htab)
    }
}
