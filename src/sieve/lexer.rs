/// SIEVE script tokenizer (RFC 5228 §2.2 - §2.4).
use std::iter::Peekable;
use std::str::CharIndices;

use crate::sieve::SyntaxError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A `:tag` like `:days` or `:subject`, lowercased.
    Tag(String),
    /// An unquoted identifier like `require` or `vacation`.
    Identifier(String),
    /// A double-quoted string with escapes resolved.
    QuotedString(String),
    /// A multi-line string `text: ... .` with dot-stuffing removed.
    MultiLineString(String),
    /// A number with any K/M/G quantifier already applied.
    Number(u64),
    /// A `# ...` single-line comment.
    Comment(String),
    /// A `/* ... */` block comment.
    BlockComment(String),
    Semicolon,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
}

#[derive(Debug, Clone)]
pub struct Span {
    pub token: Token,
    pub offset: usize,
}

pub fn tokenize(input: &str) -> Result<Vec<Span>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match c {
            ';' => single(&mut chars, Token::Semicolon),
            ',' => single(&mut chars, Token::Comma),
            '(' => single(&mut chars, Token::LParen),
            ')' => single(&mut chars, Token::RParen),
            '{' => single(&mut chars, Token::LBrace),
            '}' => single(&mut chars, Token::RBrace),
            '[' => single(&mut chars, Token::LBracket),
            ']' => single(&mut chars, Token::RBracket),
            '#' => {
                chars.next();
                let mut text = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    text.push(c);
                    chars.next();
                }
                Token::Comment(text.trim().to_string())
            }
            '/' if input[start..].starts_with("/*") => {
                chars.next();
                chars.next();
                Token::BlockComment(lex_block_comment(input, start, &mut chars)?)
            }
            '"' => {
                chars.next();
                Token::QuotedString(lex_quoted(start, &mut chars)?)
            }
            ':' => {
                chars.next();
                let name = take_word(&mut chars);
                if name.is_empty() {
                    return Err(SyntaxError::new(start, "empty tag"));
                }
                Token::Tag(format!(":{}", name.to_lowercase()))
            }
            '0'..='9' => Token::Number(lex_number(start, &mut chars)?),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let word = take_word(&mut chars);
                if word.eq_ignore_ascii_case("text")
                    && matches!(chars.peek(), Some(&(_, ':')))
                {
                    chars.next();
                    Token::MultiLineString(lex_multiline(start, &mut chars)?)
                } else {
                    Token::Identifier(word)
                }
            }
            other => {
                return Err(SyntaxError::new(
                    start,
                    format!("unexpected character '{other}'"),
                ));
            }
        };

        tokens.push(Span { token, offset: start });
    }

    Ok(tokens)
}

fn single(chars: &mut Peekable<CharIndices<'_>>, token: Token) -> Token {
    chars.next();
    token
}

fn take_word(chars: &mut Peekable<CharIndices<'_>>) -> String {
    let mut word = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            word.push(c);
            chars.next();
        } else {
            break;
        }
    }
    word
}

fn lex_block_comment(
    input: &str,
    start: usize,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<String, SyntaxError> {
    let body_start = start + 2;
    while let Some((i, c)) = chars.next() {
        if c == '*' && matches!(chars.peek(), Some(&(_, '/'))) {
            chars.next();
            return Ok(input[body_start..i].trim().to_string());
        }
    }
    Err(SyntaxError::new(start, "unterminated block comment"))
}

/// Reads a quoted string after the opening quote. `\x` yields `x` for any
/// character, which covers the two escapes the grammar defines (`\\`, `\"`).
fn lex_quoted(start: usize, chars: &mut Peekable<CharIndices<'_>>) -> Result<String, SyntaxError> {
    let mut s = String::new();
    loop {
        match chars.next() {
            Some((_, '\\')) => match chars.next() {
                Some((_, escaped)) => s.push(escaped),
                None => break,
            },
            Some((_, '"')) => return Ok(s),
            Some((_, c)) => s.push(c),
            None => break,
        }
    }
    Err(SyntaxError::new(start, "unterminated string"))
}

fn lex_number(start: usize, chars: &mut Peekable<CharIndices<'_>>) -> Result<u64, SyntaxError> {
    let mut value: u64 = 0;
    while let Some(&(_, c)) = chars.peek() {
        let Some(digit) = c.to_digit(10) else {
            break;
        };
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or_else(|| SyntaxError::new(start, "number out of range"))?;
        chars.next();
    }

    let multiplier = match chars.peek() {
        Some(&(_, 'K' | 'k')) => 1 << 10,
        Some(&(_, 'M' | 'm')) => 1 << 20,
        Some(&(_, 'G' | 'g')) => 1 << 30,
        _ => 1,
    };
    if multiplier != 1 {
        chars.next();
    }

    value
        .checked_mul(multiplier)
        .ok_or_else(|| SyntaxError::new(start, "number out of range"))
}

/// Reads the body of `text:` up to a line holding a single `.`.
fn lex_multiline(
    start: usize,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<String, SyntaxError> {
    // Rest of the `text:` line may only hold whitespace or a comment.
    let mut saw_newline = false;
    let mut in_comment = false;
    for (offset, c) in chars.by_ref() {
        match c {
            '\n' => {
                saw_newline = true;
                break;
            }
            _ if in_comment => {}
            '#' => in_comment = true,
            ' ' | '\t' | '\r' => {}
            _ => {
                return Err(SyntaxError::new(
                    offset,
                    format!("unexpected '{c}' after text:"),
                ))
            }
        }
    }
    if !saw_newline {
        return Err(SyntaxError::new(start, "unterminated multi-line string"));
    }

    let mut body = String::new();
    loop {
        let mut line = String::new();
        let mut terminated = false;
        for (_, c) in chars.by_ref() {
            if c == '\n' {
                terminated = true;
                break;
            }
            line.push(c);
        }
        let content = line.strip_suffix('\r').unwrap_or(&line);

        if content == "." {
            return Ok(body);
        }
        if !terminated {
            return Err(SyntaxError::new(start, "unterminated multi-line string"));
        }
        let unstuffed = if content.starts_with("..") {
            &content[1..]
        } else {
            content
        };
        body.push_str(unstuffed);
        body.push_str("\r\n");
    }
}
