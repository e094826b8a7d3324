//! Markup and script minification via minify-html.

use crate::error::{Error, Result};

const SCRIPT_OPEN: &[u8] = b"<script>";
const SCRIPT_CLOSE: &[u8] = b"</script>";
const SCRIPT_END_TAG_START: &[u8] = b"</script";

fn cfg(minify_js: bool) -> minify_html::Cfg {
    minify_html::Cfg {
        minify_css: true,
        minify_js,
        keep_html_and_head_opening_tags: true,
        ..minify_html::Cfg::default()
    }
}

/// Minify an HTML document and its inline `<style>` sheets.
///
/// Inline scripts are copied through untouched.
pub fn minify_html(input: &[u8]) -> Vec<u8> {
    minify_html::minify(input, &cfg(false))
}

/// Minify a standalone script with minify-html's script minifier.
///
/// This is lossy: function declarations become arrow functions bound with
/// `var`, which loses hoisting, constructibility and their own `this` and
/// `arguments`. It is only registered by
/// [`Minifier::add_lossy_scripts`](super::Minifier::add_lossy_scripts).
pub fn minify_js(input: &[u8]) -> Result<Vec<u8>> {
    let media_type = "application/javascript";
    if contains_ignore_ascii_case(input, SCRIPT_END_TAG_START) {
        return Err(Error::minify(media_type, "script contains a closing script tag"));
    }

    let mut wrapped = Vec::with_capacity(input.len() + SCRIPT_OPEN.len() + SCRIPT_CLOSE.len());
    wrapped.extend_from_slice(SCRIPT_OPEN);
    wrapped.extend_from_slice(input);
    wrapped.extend_from_slice(SCRIPT_CLOSE);

    let minified = minify_html::minify(&wrapped, &cfg(true));
    minified
        .strip_prefix(SCRIPT_OPEN)
        .and_then(|rest| rest.strip_suffix(SCRIPT_CLOSE))
        .map(<[u8]>::to_vec)
        .ok_or_else(|| Error::minify(media_type, "unexpected script minifier output"))
}

fn contains_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}
