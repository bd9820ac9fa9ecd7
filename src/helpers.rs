use http::header::{HeaderName, HeaderValue};
use std::convert::TryFrom;

pub(crate) fn convert_parsed_field(name: &str, value: &str) -> crate::Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::try_from(name).map_err(|e| crate::Error::DecodeHeaderName {
        name: name.to_owned(),
        cause: e.into(),
    })?;

    let header_value = HeaderValue::try_from(value).map_err(|e| crate::Error::DecodeHeaderValue {
        value: value.as_bytes().to_owned(),
        cause: e.into(),
    })?;

    Ok((header_name, header_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_parsed_field() {
        let (name, value) = convert_parsed_field("Content-Type", "text/plain").unwrap();
        assert_eq!(name, http::header::CONTENT_TYPE);
        assert_eq!(value, "text/plain");

        assert!(matches!(
            convert_parsed_field("Bad Name", "x"),
            Err(crate::Error::DecodeHeaderName { .. })
        ));
        assert!(matches!(
            convert_parsed_field("X-Ok", "bad\u{7f}value"),
            Err(crate::Error::DecodeHeaderValue { .. })
        ));
    }
}
