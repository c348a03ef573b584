use std::rc::Rc;
use thiserror::Error;
use crate::interpreter::ast::{BinaryOperator, ComparisonOperator, Expr, FunctionDef, Program, Stmt, UnaryOperator};
use crate::interpreter::lexer::{Lexer, LexerError, Token, TokenPos, TokenType};


#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error("{message} {pos}")]
    Expected {
        pos: TokenPos,
        message: &'static str,
    },
    #[error("Unexpected token: {token} {pos}")]
    UnexpectedToken {
        pos: TokenPos,
        token: String,
    },
    #[error("Unexpected token in expression: {token} {pos}")]
    UnexpectedTokenInExpression {
        pos: TokenPos,
        token: String,
    },
    #[error("Expected ')' in function call, got {token} {pos}")]
    UnclosedCall {
        pos: TokenPos,
        token: String,
    },
}

impl ParseError {
    pub fn pos(&self) -> TokenPos {
        match self {
            ParseError::Lexer(err) => err.pos(),
            ParseError::Expected { pos, .. } => *pos,
            ParseError::UnexpectedToken { pos, .. } => *pos,
            ParseError::UnexpectedTokenInExpression { pos, .. } => *pos,
            ParseError::UnclosedCall { pos, .. } => *pos,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

const COMPARISON_OPERATORS: [TokenType; 6] = [
    TokenType::Greater, TokenType::Less,
    TokenType::GreaterEqual, TokenType::LessEqual,
    TokenType::Equal, TokenType::NotEqual,
];

/// Recursive-descent parser with a single token of lookahead.
///
/// Statements are not terminated by newlines or semicolons; each statement ends
/// where its grammar rule stops matching. The first syntax error aborts parsing.
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    previous: Token, current: Token,
}

impl<'source> Parser<'source> {
    pub fn new(lexer: Lexer<'source>) -> Parser<'source> {
        Parser {
            lexer,
            previous: Token::eof(TokenPos::begin()), current: Token::eof(TokenPos::begin()),
        }
    }

    pub fn parse(&mut self) -> ParseResult<Program> {
        self.consume()?;

        let mut statements = Vec::new();

        while !self.is_eof() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    // Statement parsing

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        if self.matches(TokenType::Have)? {
            self.parse_assignment()
        } else if self.matches(TokenType::Say)? {
            Ok(Stmt::Print(self.parse_expression()?))
        } else if self.matches(TokenType::If)? {
            self.parse_if_statement()
        } else if self.matches(TokenType::Repeat)? {
            self.parse_repeat_statement()
        } else if self.matches(TokenType::Func)? {
            self.parse_function_definition()
        } else if self.matches(TokenType::Return)? {
            self.parse_return_statement()
        } else {
            Err(ParseError::UnexpectedToken { pos: *self.current.start(), token: self.current.to_string() })
        }
    }

    fn parse_assignment(&mut self) -> ParseResult<Stmt> {
        let name = self.expect_identifier("Expected variable name")?;
        self.expect(TokenType::Assign, "Expected '='")?;

        let value = self.parse_expression()?;
        Ok(Stmt::Assign { name, value })
    }

    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::ParenthesisLeft, "Expected '(' after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenType::ParenthesisRight, "Expected ')' after condition")?;

        self.expect(TokenType::BracketLeft, "Expected '{' after condition")?;
        let then_block = self.parse_block("Expected '}' to close if block")?;

        // Each `if` takes its own `else`, so nested ifs never compete for one
        let else_block = if self.matches(TokenType::Else)? {
            self.expect(TokenType::BracketLeft, "Expected '{' after 'else'")?;
            Some(self.parse_block("Expected '}' to close else block")?)
        } else {
            None
        };

        Ok(Stmt::If { condition, then_block, else_block })
    }

    fn parse_repeat_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::ParenthesisLeft, "Expected '(' after 'repeat'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenType::ParenthesisRight, "Expected ')' after repeat condition")?;

        self.expect(TokenType::BracketLeft, "Expected '{' after repeat condition")?;
        let body = self.parse_block("Expected '}' to close repeat block")?;

        Ok(Stmt::Repeat { condition, body })
    }

    fn parse_function_definition(&mut self) -> ParseResult<Stmt> {
        let name = self.expect_identifier("Expected function name")?;
        self.expect(TokenType::ParenthesisLeft, "Expected '(' after function name")?;

        let mut params = vec![];

        if self.check(TokenType::Identifier) {
            params.push(self.expect_identifier("Expected parameter name")?);

            while self.matches(TokenType::Comma)? {
                params.push(self.expect_identifier("Expected parameter name")?);
            }
        }

        self.expect(TokenType::ParenthesisRight, "Expected ')' after parameters")?;
        self.expect(TokenType::BracketLeft, "Expected '{' to start function body")?;
        let body = self.parse_block("Expected '}' to close function body")?;

        Ok(Stmt::Function(Rc::new(FunctionDef { name, params, body })))
    }

    fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        if self.check(TokenType::BracketRight) || self.is_eof() {
            return Ok(Stmt::Return(None));
        }

        Ok(Stmt::Return(Some(self.parse_expression()?)))
    }

    /// Parses statements up to the closing `}`, which is consumed. Expects the `{` to be consumed already.
    fn parse_block(&mut self, message: &'static str) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenType::BracketRight) && !self.is_eof() {
            statements.push(self.parse_statement()?);
        }

        self.expect(TokenType::BracketRight, message)?;
        Ok(statements)
    }

    // Expression parsing

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_and()?;

        while self.matches(TokenType::Or)? {
            let right = self.parse_and()?;
            expr = Expr::Binary { left: Box::new(expr), operator: BinaryOperator::Or, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_not()?;

        while self.matches(TokenType::And)? {
            let right = self.parse_not()?;
            expr = Expr::Binary { left: Box::new(expr), operator: BinaryOperator::And, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_not(&mut self) -> ParseResult<Expr> {
        if self.matches(TokenType::Not)? {
            let operand = self.parse_not()?;
            return Ok(Expr::Unary { operator: UnaryOperator::Not, operand: Box::new(operand) });
        }

        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_arithmetic()?;

        while self.matches_any(&COMPARISON_OPERATORS)? {
            let operator = match self.previous.token_type() {
                TokenType::Greater => ComparisonOperator::Greater,
                TokenType::Less => ComparisonOperator::Less,
                TokenType::GreaterEqual => ComparisonOperator::GreaterEqual,
                TokenType::LessEqual => ComparisonOperator::LessEqual,
                TokenType::Equal => ComparisonOperator::Equal,
                _ => ComparisonOperator::NotEqual,
            };
            let right = self.parse_arithmetic()?;

            expr = Expr::Comparison { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_arithmetic(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_multiply()?;

        while self.matches_any(&[TokenType::Plus, TokenType::Minus])? {
            let operator = if self.previous.token_type() == TokenType::Plus {
                BinaryOperator::Add
            } else {
                BinaryOperator::Subtract
            };
            let right = self.parse_multiply()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_multiply(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_term()?;

        while self.matches_any(&[TokenType::Multiply, TokenType::Divide, TokenType::Modulo])? {
            let operator = match self.previous.token_type() {
                TokenType::Multiply => BinaryOperator::Multiply,
                TokenType::Divide => BinaryOperator::Divide,
                _ => BinaryOperator::Modulo,
            };
            let right = self.parse_term()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        if self.matches(TokenType::Number)? {
            // The lexer always attaches the parsed value to number tokens
            return Ok(Expr::Number(self.previous.int_value().unwrap_or_default()));
        } else if self.matches(TokenType::String)? {
            return Ok(Expr::String(self.previous.text_value().unwrap_or_default().to_owned()));
        } else if self.matches(TokenType::Identifier)? {
            let name = self.previous.source().to_owned();

            if self.matches(TokenType::ParenthesisLeft)? {
                return self.finish_call(name);
            }

            return Ok(Expr::Variable(name));
        } else if self.matches(TokenType::ParenthesisLeft)? {
            let expr = self.parse_expression()?;
            self.expect(TokenType::ParenthesisRight, "Expected ')' to close parenthesized expression")?;

            return Ok(expr);
        }

        Err(ParseError::UnexpectedTokenInExpression { pos: *self.current.start(), token: self.current.to_string() })
    }

    fn finish_call(&mut self, name: String) -> ParseResult<Expr> {
        let mut args = vec![];

        if !self.check(TokenType::ParenthesisRight) {
            args.push(self.parse_expression()?);

            while self.matches(TokenType::Comma)? {
                args.push(self.parse_expression()?);
            }
        }

        if !self.matches(TokenType::ParenthesisRight)? {
            return Err(ParseError::UnclosedCall { pos: *self.current.start(), token: self.current.to_string() });
        }

        Ok(Expr::Call { name, args })
    }

    // Token handling

    fn consume(&mut self) -> ParseResult<()> {
        let next = self.lexer.next_token()?;
        self.previous = std::mem::replace(&mut self.current, next);
        Ok(())
    }

    fn expect(&mut self, token_type: TokenType, message: &'static str) -> ParseResult<()> {
        if self.matches(token_type)? {
            Ok(())
        } else {
            Err(ParseError::Expected { pos: *self.current.start(), message })
        }
    }

    fn expect_identifier(&mut self, message: &'static str) -> ParseResult<String> {
        self.expect(TokenType::Identifier, message)?;
        Ok(self.previous.source().to_owned())
    }

    fn matches(&mut self, token_type: TokenType) -> ParseResult<bool> { // Should be called "match", but that's a keyword
        if !self.check(token_type) {
            return Ok(false);
        }

        self.consume()?;
        Ok(true)
    }

    fn matches_any(&mut self, token_types: &[TokenType]) -> ParseResult<bool> {
        for token_type in token_types {
            if self.check(*token_type) {
                self.consume()?;
                return Ok(true);
            }
        }

        Ok(false)
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    fn is_eof(&self) -> bool {
        self.current.token_type() == TokenType::Eof
    }
}

/// Parses a complete program from source text.
pub fn parse(source: &str) -> ParseResult<Program> {
    Parser::new(Lexer::new(source)).parse()
}
