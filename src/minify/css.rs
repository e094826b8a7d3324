//! Stylesheet compaction over cssparser tokens.
//!
//! Comments are dropped and whitespace collapses to at most one space. Space is
//! removed entirely next to punctuation where it can never be significant, and
//! re-inserted wherever two adjacent tokens would otherwise merge.

use std::fmt::Write as _;

use cssparser::{ParseError, Parser, ParserInput, ToCss, Token, TokenSerializationType};

use crate::error::{Error, Result};

/// Minify a stylesheet.
pub fn minify_css(input: &[u8]) -> Result<Vec<u8>> {
    let source = std::str::from_utf8(input).map_err(|e| Error::minify("text/css", e))?;

    let mut parser_input = ParserInput::new(source);
    let mut parser = Parser::new(&mut parser_input);
    let mut out = String::with_capacity(source.len());
    compact(&mut parser, &mut out).map_err(|e| Error::minify("text/css", e))?;
    Ok(out.into_bytes())
}

/// Whitespace before this token is never significant.
fn tight_before(token: &Token<'_>) -> bool {
    matches!(
        token,
        Token::Semicolon
            | Token::Comma
            | Token::CurlyBracketBlock
            | Token::CloseCurlyBracket
            | Token::Delim('>')
            | Token::Delim('~')
    )
}

/// Whitespace after this token is never significant.
fn tight_after(token: &Token<'_>) -> bool {
    matches!(
        token,
        Token::Semicolon
            | Token::Comma
            | Token::Colon
            | Token::CloseCurlyBracket
            | Token::Delim('>')
            | Token::Delim('~')
    )
}

fn closing(token: &Token<'_>) -> Option<char> {
    match token {
        Token::Function(_) | Token::ParenthesisBlock => Some(')'),
        Token::SquareBracketBlock => Some(']'),
        Token::CurlyBracketBlock => Some('}'),
        _ => None,
    }
}

fn compact(parser: &mut Parser<'_, '_>, out: &mut String) -> std::fmt::Result {
    let mut previous: Option<Token<'_>> = None;
    let mut previous_type = TokenSerializationType::nothing();
    let mut pending_space = false;

    while let Ok(token) = parser.next_including_whitespace_and_comments() {
        let token = token.clone();
        match token {
            Token::WhiteSpace(_) => {
                pending_space = true;
                continue;
            }
            Token::Comment(_) => continue,
            _ => {}
        }

        if let Some(prev) = &previous {
            let significant_space =
                pending_space && !tight_after(prev) && !tight_before(&token);
            if significant_space || previous_type.needs_separator_when_before(token.serialization_type()) {
                out.push(' ');
            }
        }
        pending_space = false;

        token.to_css(out)?;
        previous_type = token.serialization_type();

        if let Some(close) = closing(&token) {
            let nested: std::result::Result<(), ParseError<'_, std::fmt::Error>> = parser
                .parse_nested_block(|block| compact(block, out).map_err(|e| block.new_custom_error(e)));
            nested.map_err(|_| std::fmt::Error)?;
            out.write_char(close)?;
            previous_type = TokenSerializationType::nothing();
            previous = Some(match close {
                '}' => Token::CloseCurlyBracket,
                ']' => Token::CloseSquareBracket,
                _ => Token::CloseParenthesis,
            });
        } else {
            previous = Some(token);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minify(css: &str) -> String {
        String::from_utf8(minify_css(css.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn test_rules_and_declarations() {
        assert_eq!(
            minify("body {\n  color: red;\n  margin : 0 auto ;\n}\n\np , li { padding: 1px 2px; }"),
            "body{color:red;margin :0 auto;}p,li{padding:1px 2px;}"
        );
    }

    #[test]
    fn test_comments_removed() {
        assert_eq!(minify("/* header */ a { /* x */ color: blue; }"), "a{color:blue;}");
    }

    #[test]
    fn test_descendant_and_pseudo_spacing_kept() {
        assert_eq!(minify("nav  .item :hover {}"), "nav .item :hover{}");
        assert_eq!(minify("ul > li ~ p {}"), "ul>li~p{}");
    }

    #[test]
    fn test_calc_keeps_operator_spaces() {
        assert_eq!(minify("a { width: calc( 100% - 2px ); }"), "a{width:calc(100% - 2px);}");
    }

    #[test]
    fn test_media_query() {
        assert_eq!(
            minify("@media screen and (max-width: 600px) {\n  a { color: red }\n}"),
            "@media screen and (max-width:600px){a{color:red}}"
        );
    }

    #[test]
    fn test_strings_and_urls_preserved() {
        assert_eq!(
            minify(r#"a::before { content: "a  b"; background: url(x.png) }"#),
            r#"a::before{content:"a  b";background:url(x.png)}"#
        );
    }

    #[test]
    fn test_idempotent() {
        let once = minify("h1 , h2 { font : 12px/1.5 serif ; }  /* end */");
        assert_eq!(minify(&once), once);
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(minify_css(b"a{\xFF}").unwrap_err(), Error::Minify { .. }));
    }
}
