//! JSON minification.

use serde::de::IgnoredAny;

use crate::error::{Error, Result};

/// Minify a JSON document.
///
/// The input is validated with serde_json first; insignificant whitespace
/// outside strings is then dropped. Numbers, key order and duplicate keys are
/// kept exactly as written.
pub fn minify_json(media_type: &str, input: &[u8]) -> Result<Vec<u8>> {
    serde_json::from_slice::<IgnoredAny>(input).map_err(|e| Error::minify(media_type, e))?;

    let mut out = Vec::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    for &byte in input {
        if in_string {
            out.push(byte);
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b' ' | b'\t' | b'\n' | b'\r' => {}
            b'"' => {
                in_string = true;
                out.push(byte);
            }
            _ => out.push(byte),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minify(json: &str) -> String {
        String::from_utf8(minify_json("application/json", json.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn test_whitespace_removed() {
        assert_eq!(
            minify("{\n  \"name\" : \"x\",\n  \"list\" : [ 1, 2.50, true, null ]\n}\n"),
            r#"{"name":"x","list":[1,2.50,true,null]}"#
        );
    }

    #[test]
    fn test_strings_untouched() {
        assert_eq!(
            minify(r#"{ "a b" : "c \" d\\", "e": "\n" }"#),
            r#"{"a b":"c \" d\\","e":"\n"}"#
        );
    }

    #[test]
    fn test_large_numbers_and_key_order_kept() {
        assert_eq!(
            minify(r#"{ "z": 123456789012345678901234567890, "a": 2.50e+3 }"#),
            r#"{"z":123456789012345678901234567890,"a":2.50e+3}"#
        );
    }

    #[test]
    fn test_invalid_json() {
        let err = minify_json("application/ld+json", b"{ \"a\": }").unwrap_err();
        match err {
            Error::Minify { media_type, .. } => assert_eq!(media_type, "application/ld+json"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
