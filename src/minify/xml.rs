//! XML and SVG minification over quick-xml events.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesStart, BytesText, Event};

use crate::error::{Error, Result};

/// SVG elements whose whitespace is rendered even when they hold no text of
/// their own.
const TEXT_ELEMENTS: &[&[u8]] = &[b"text", b"tspan", b"textPath"];

/// Minify an XML document.
///
/// Comments are dropped. Whitespace-only text is dropped between elements
/// that hold no text, and collapsed to a single space inside elements that
/// do (mixed content, SVG text elements). Everything inside an
/// `xml:space="preserve"` element is kept.
pub fn minify_xml(media_type: &str, input: &[u8]) -> Result<Vec<u8>> {
    let mixed = mixed_elements(input).map_err(|e| Error::minify(media_type, e))?;

    let mut reader = Reader::from_reader(input);
    let mut writer = Writer::new(Vec::with_capacity(input.len()));
    let mut buf = Vec::new();

    // Per open element: whether blank text inside it is significant.
    let mut open: Vec<bool> = Vec::new();
    let mut ordinal = 0usize;
    let mut preserve_depth = 0usize;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| Error::minify(media_type, e))?;

        let written = match event {
            Event::Eof => break,
            Event::Comment(_) => Ok(()),
            Event::Text(text) if preserve_depth == 0 && is_blank(&text) => {
                if open.last().copied().unwrap_or(false) {
                    writer.write_event(Event::Text(BytesText::from_escaped(" ")))
                } else {
                    Ok(())
                }
            }
            Event::Start(start) => {
                open.push(mixed.get(ordinal).copied().unwrap_or(false));
                ordinal += 1;
                if preserve_depth > 0 || preserves_space(&start) {
                    preserve_depth += 1;
                }
                writer.write_event(Event::Start(start))
            }
            Event::End(end) => {
                open.pop();
                preserve_depth = preserve_depth.saturating_sub(1);
                writer.write_event(Event::End(end))
            }
            other => writer.write_event(other),
        };
        written.map_err(|e| Error::minify(media_type, e))?;
        buf.clear();
    }

    Ok(writer.into_inner())
}

/// For every start tag, in document order: does the element directly hold
/// text, or is it an SVG text element.
fn mixed_elements(input: &[u8]) -> quick_xml::Result<Vec<bool>> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut mixed = Vec::new();
    let mut open = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(start) => {
                open.push(mixed.len());
                let name = start.local_name();
                mixed.push(TEXT_ELEMENTS.iter().any(|text| *text == name.as_ref()));
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Text(text) if is_blank(&text) => {}
            Event::Text(_) | Event::CData(_) | Event::GeneralRef(_) => {
                if let Some(&index) = open.last() {
                    mixed[index] = true;
                }
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(mixed)
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn preserves_space(start: &BytesStart<'_>) -> bool {
    start
        .attributes()
        .flatten()
        .any(|attr| attr.key.as_ref() == b"xml:space" && attr.value.as_ref() == b"preserve")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minify(xml: &str) -> String {
        String::from_utf8(minify_xml("image/svg+xml", xml.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn test_drops_comments_and_indentation() {
        let svg = r#"<?xml version="1.0"?>
<!-- generated -->
<svg xmlns="http://www.w3.org/2000/svg" width="10">
    <rect x="0" y="0"/>
    <text>Label text</text>
</svg>
"#;
        assert_eq!(
            minify(svg),
            r#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" width="10"><rect x="0" y="0"/><text>Label text</text></svg>"#
        );
    }

    #[test]
    fn test_mixed_content_kept() {
        assert_eq!(minify("<p>one <b>two</b> three</p>"), "<p>one <b>two</b> three</p>");
    }

    #[test]
    fn test_space_between_entities_kept() {
        assert_eq!(minify("<a>&lt; &gt;</a>"), "<a>&lt; &gt;</a>");
    }

    #[test]
    fn test_space_between_svg_text_spans_kept() {
        assert_eq!(
            minify("<svg><text><tspan>a</tspan> <tspan>b</tspan></text></svg>"),
            "<svg><text><tspan>a</tspan> <tspan>b</tspan></text></svg>"
        );
    }

    #[test]
    fn test_blank_runs_in_mixed_content_collapse() {
        assert_eq!(
            minify("<p><b>x</b>\n    <i>y</i> done</p>"),
            "<p><b>x</b> <i>y</i> done</p>"
        );
    }

    #[test]
    fn test_preserve_space() {
        let xml = "<root>\n  <pre xml:space=\"preserve\">\n  <i>x</i>\n</pre>\n</root>";
        assert_eq!(minify(xml), "<root><pre xml:space=\"preserve\">\n  <i>x</i>\n</pre></root>");
    }

    #[test]
    fn test_idempotent() {
        let once = minify("<feed>\n  <entry>\n    <title>A &amp; B</title>\n  </entry>\n</feed>");
        assert_eq!(minify(&once), once);
    }

    #[test]
    fn test_mismatched_tags() {
        let err = minify_xml("text/xml", b"<a><b></a>").unwrap_err();
        assert!(matches!(err, Error::Minify { .. }));
    }
}
