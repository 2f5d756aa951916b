/// Recursive descent parser for the flat command subset of SIEVE.
///
/// Grammar accepted:
///
/// ```text
/// script    := command*
/// command   := identifier argument* ";"
/// argument  := tag | number | string | string-list
/// string-list := "[" string ("," string)* "]"
/// ```
///
/// Comments are skipped. Anything else (`if`, blocks, test lists) is a
/// syntax error, which callers treat as "not ours to edit".
use crate::sieve::ast::{Argument, Command, Script};
use crate::sieve::lexer::{tokenize, Span, Token};
use crate::sieve::SyntaxError;

pub fn parse(input: &str) -> Result<Script, SyntaxError> {
    let spans: Vec<Span> = tokenize(input)?
        .into_iter()
        .filter(|s| !matches!(s.token, Token::Comment(_) | Token::BlockComment(_)))
        .collect();

    let mut parser = Parser {
        spans: &spans,
        pos: 0,
        end: input.len(),
    };
    let mut commands = Vec::new();
    while !parser.at_end() {
        commands.push(parser.command()?);
    }

    Ok(Script { commands })
}

struct Parser<'a> {
    spans: &'a [Span],
    pos: usize,
    end: usize,
}

impl Parser<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.spans.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.spans.get(self.pos).map(|s| &s.token)
    }

    fn offset(&self) -> usize {
        self.spans.get(self.pos).map_or(self.end, |s| s.offset)
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.offset(), message)
    }

    fn command(&mut self) -> Result<Command, SyntaxError> {
        let identifier = match self.peek() {
            Some(Token::Identifier(name)) => name.clone(),
            Some(other) => return Err(self.error(format!("expected command, got {other:?}"))),
            None => return Err(self.error("expected command, got end of input")),
        };
        self.pos += 1;

        let mut arguments = Vec::new();
        loop {
            match self.peek() {
                Some(Token::Semicolon) => {
                    self.pos += 1;
                    break;
                }
                Some(Token::Tag(tag)) => {
                    arguments.push(Argument::Tag(tag.clone()));
                    self.pos += 1;
                }
                Some(Token::Number(n)) => {
                    arguments.push(Argument::Number(*n));
                    self.pos += 1;
                }
                Some(Token::QuotedString(s) | Token::MultiLineString(s)) => {
                    arguments.push(Argument::String(s.clone()));
                    self.pos += 1;
                }
                Some(Token::LBracket) => {
                    self.pos += 1;
                    arguments.push(Argument::StringList(self.string_list()?));
                }
                Some(Token::LBrace | Token::LParen | Token::Identifier(_)) => {
                    return Err(self.error(format!(
                        "'{identifier}' is not a simple command"
                    )));
                }
                Some(other) => {
                    return Err(self.error(format!("unexpected {other:?} in '{identifier}'")));
                }
                None => return Err(self.error(format!("missing ';' after '{identifier}'"))),
            }
        }

        Ok(Command {
            identifier,
            arguments,
        })
    }

    /// Parses the remainder of a string list after `[`.
    fn string_list(&mut self) -> Result<Vec<String>, SyntaxError> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                Some(Token::QuotedString(s) | Token::MultiLineString(s)) => {
                    items.push(s.clone());
                    self.pos += 1;
                }
                _ => return Err(self.error("expected string in list")),
            }
            match self.peek() {
                Some(Token::Comma) => self.pos += 1,
                Some(Token::RBracket) => {
                    self.pos += 1;
                    return Ok(items);
                }
                _ => return Err(self.error("expected ',' or ']' in string list")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let script = parse("  # nothing here\n").unwrap();
        assert!(script.commands.is_empty());
    }

    #[test]
    fn test_parse_require_list() {
        let script = parse("require [\"vacation\", \"fileinto\"];").unwrap();
        assert_eq!(
            script.commands[0],
            Command {
                identifier: "require".into(),
                arguments: vec![Argument::StringList(vec![
                    "vacation".into(),
                    "fileinto".into()
                ])],
            }
        );
    }

    #[test]
    fn test_parse_vacation_command() {
        let script = parse("vacation :days 7 :subject \"Away\" \"Back soon\";").unwrap();
        let cmd = script.command("vacation").unwrap();
        assert_eq!(cmd.tagged(":days").and_then(Argument::as_number), Some(7));
        assert_eq!(cmd.tagged(":subject").and_then(Argument::as_str), Some("Away"));
        assert_eq!(cmd.arguments.last().and_then(Argument::as_str), Some("Back soon"));
    }

    #[test]
    fn test_rejects_if_block() {
        let err = parse("if header :contains \"Subject\" \"x\" { discard; }").unwrap_err();
        assert!(err.message.contains("not a simple command"));
    }

    #[test]
    fn test_rejects_missing_semicolon() {
        assert!(parse("vacation \"body\"").is_err());
    }

    #[test]
    fn test_rejects_empty_list() {
        assert!(parse("require [];").is_err());
    }

    #[test]
    fn test_error_offset_points_at_token() {
        let err = parse("keep; {").unwrap_err();
        assert_eq!(err.offset, 6);
    }
}
