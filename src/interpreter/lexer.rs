use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::Chars;
use lazy_static::lazy_static;
use thiserror::Error;
use crate::util;


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    ParenthesisLeft, ParenthesisRight,
    BracketLeft, BracketRight,
    Comma,

    Assign, Equal, NotEqual,
    Greater, GreaterEqual,
    Less, LessEqual,

    Plus, Minus,
    Multiply, Divide, Modulo,

    Identifier,
    Number,
    String,

    // Keywords
    Have, Say,
    If, Else,
    Repeat,
    Func, Return,
    And, Or, Not,

    // EOF
    Eof,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("have", TokenType::Have),
        ("say", TokenType::Say),
        ("if", TokenType::If),
        ("else", TokenType::Else),
        ("repeat", TokenType::Repeat),
        ("and", TokenType::And),
        ("or", TokenType::Or),
        ("not", TokenType::Not),
        ("func", TokenType::Func),
        ("return", TokenType::Return),
    ]);
}

/// Value carried by literal and identifier tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    literal: Option<Literal>,
    start: TokenPos, end: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, source: String, start: TokenPos, end: TokenPos) -> Token {
        Token {
            token_type, source,
            literal: None,
            start, end,
        }
    }

    pub fn eof(pos: TokenPos) -> Token {
        Token::new(TokenType::Eof, String::new(), pos, pos)
    }

    pub fn with_literal(self, literal: Literal) -> Token {
        Token { literal: Some(literal), ..self }
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn literal(&self) -> Option<&Literal> { self.literal.as_ref() }
    pub fn start(&self) -> &TokenPos { &self.start }
    pub fn end(&self) -> &TokenPos { &self.end }

    /// The integer payload of a `Number` token.
    pub fn int_value(&self) -> Option<i64> {
        match self.literal {
            Some(Literal::Int(value)) => Some(value),
            _ => None,
        }
    }

    /// The text payload of a `String` or `Identifier` token.
    pub fn text_value(&self) -> Option<&str> {
        match &self.literal {
            Some(Literal::Text(text)) => Some(text),
            _ => None,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::Eof => f.write_str("EOF"),
            _ => write!(f, "`{}`", self.source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexerError {
    #[error("Invalid character: {1} {0}")]
    InvalidCharacter(TokenPos, char),
    #[error("Unterminated string {pos}")]
    UnterminatedString {
        pos: TokenPos,
    },
    #[error("Integer literal too large: {literal} {pos}")]
    IntegerOverflow {
        pos: TokenPos,
        literal: String,
    },
}

impl LexerError {
    pub fn pos(&self) -> TokenPos {
        match self {
            LexerError::InvalidCharacter(pos, _) => *pos,
            LexerError::UnterminatedString { pos } => *pos,
            LexerError::IntegerOverflow { pos, .. } => *pos,
        }
    }
}

pub type LexerResult<T> = Result<T, LexerError>;

/// Collects the complete token stream of `source`, including the final `Eof` token.
pub fn tokenize(source: &str) -> LexerResult<Vec<Token>> {
    Lexer::new(source).collect()
}

pub struct Lexer<'source> {
    input: &'source str,

    chars: Chars<'source>,
    peek_1: Option<char>,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,

    emitted_eof: bool,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,

            chars: source.chars(),
            peek_1: None,

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),

            emitted_eof: false,
        }
    }

    /// Scans the next token. Once the input is exhausted every call returns `Eof`.
    pub fn next_token(&mut self) -> LexerResult<Token> {
        loop {
            self.skip_whitespace();
            self.start_index = self.current_index;
            self.start_pos = self.current_pos;

            let c = match self.consume() {
                Some(c) => c,
                None => return Ok(Token::eof(self.current_pos)),
            };

            return match c {
                '#' => {
                    self.skip_line();
                    continue;
                },

                '(' => Ok(self.make_token(TokenType::ParenthesisLeft)),
                ')' => Ok(self.make_token(TokenType::ParenthesisRight)),
                '{' => Ok(self.make_token(TokenType::BracketLeft)),
                '}' => Ok(self.make_token(TokenType::BracketRight)),
                ',' => Ok(self.make_token(TokenType::Comma)),

                '+' => Ok(self.make_token(TokenType::Plus)),
                '-' => Ok(self.make_token(TokenType::Minus)),
                '*' => Ok(self.make_token(TokenType::Multiply)),
                '/' => Ok(self.make_token(TokenType::Divide)),
                '%' => Ok(self.make_token(TokenType::Modulo)),

                '=' => Ok(if self.expect('=') { self.make_token(TokenType::Equal) } else {
                    self.make_token(TokenType::Assign)
                }),
                '>' => Ok(if self.expect('=') { self.make_token(TokenType::GreaterEqual) } else {
                    self.make_token(TokenType::Greater)
                }),
                '<' => Ok(if self.expect('=') { self.make_token(TokenType::LessEqual) } else {
                    self.make_token(TokenType::Less)
                }),
                '!' => if self.expect('=') {
                    Ok(self.make_token(TokenType::NotEqual))
                } else {
                    Err(LexerError::InvalidCharacter(self.start_pos, '!'))
                },

                c if util::is_quote(c) => self.scan_string(c),
                c if util::is_numeric(c) => self.scan_number(),
                c if util::is_identifier_start(c) => Ok(self.scan_identifier()),

                _ => Err(LexerError::InvalidCharacter(self.start_pos, c)),
            };
        }
    }

    fn scan_string(&mut self, quote: char) -> LexerResult<Token> {
        let mut text = String::new();

        loop {
            match self.consume() {
                None => return Err(LexerError::UnterminatedString { pos: self.start_pos }),
                Some(c) if c == quote => break,
                Some('\\') => match self.consume() {
                    None => return Err(LexerError::UnterminatedString { pos: self.start_pos }),
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    // `\\`, `\"`, `\'` and unknown escapes all keep the escaped character
                    Some(c) => text.push(c),
                },
                Some(c) => text.push(c),
            }
        }

        Ok(self.make_token(TokenType::String).with_literal(Literal::Text(text)))
    }

    fn scan_number(&mut self) -> LexerResult<Token> {
        while let Some(c) = self.peek() {
            if !util::is_numeric(c) {
                break;
            }

            self.consume();
        }

        let token = self.make_token(TokenType::Number);

        match token.source().parse::<i64>() {
            Ok(value) => Ok(token.with_literal(Literal::Int(value))),
            Err(_) => Err(LexerError::IntegerOverflow { pos: self.start_pos, literal: token.source().to_owned() }),
        }
    }

    fn scan_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_identifier_part(c) {
                break;
            }

            self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];

        match KEYWORDS.get(name) {
            Some(&keyword) => self.make_token(keyword),
            None => self.make_token(TokenType::Identifier).with_literal(Literal::Text(name.to_owned())),
        }
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token::new(token_type, self.input[self.start_index..self.current_index].to_owned(),
                   self.start_pos, self.current_pos)
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek_1.take().or_else(|| self.chars.next())?;
        self.current_index += c.len_utf8();

        if c == '\n' {
            self.current_pos.line += 1;
            self.current_pos.column = 1;
        } else {
            self.current_pos.column += 1;
        }

        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        if self.peek_1.is_none() {
            self.peek_1 = self.chars.next();
        }

        self.peek_1
    }

    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.consume();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                return;
            }

            self.consume();
        }
    }

    // Leaves the newline itself to `skip_whitespace`
    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                return;
            }

            self.consume();
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = LexerResult<Token>;

    /// Yields every token up to and including the first `Eof`, or stops after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted_eof {
            return None;
        }

        let result = self.next_token();

        match &result {
            Ok(token) if token.token_type() == TokenType::Eof => self.emitted_eof = true,
            Err(_) => self.emitted_eof = true,
            _ => {},
        }

        Some(result)
    }
}
