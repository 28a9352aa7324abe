//! Lexer: source text → token stream (`spec.md` §4.1).

use graft_util::Span;

use crate::cursor::Cursor;
use crate::error::{LexError, LexResult};
use crate::token::{Op, Token, TokenKind};

/// Lexer for Graft source text.
///
/// Restartable and streaming-friendly: `next_token` never looks back
/// further than one character of lookahead, per `spec.md` §4.1.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Lex the whole input into a token vector, ending with `Eof`.
    pub fn tokenize(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> LexResult<Token> {
        if let Some(sep) = self.skip_whitespace()? {
            return Ok(sep);
        }

        let start = self.cursor.position();
        let (line, column) = (self.cursor.line(), self.cursor.column());

        if self.cursor.is_at_end() {
            return Ok(Token::new(TokenKind::Eof, Span::new(start, start, line, column)));
        }

        let c = self.cursor.current_char();
        let kind = match c {
            ',' => {
                self.cursor.advance();
                TokenKind::ListSeparator
            }
            ':' => {
                self.cursor.advance();
                TokenKind::ParamListPrelude
            }
            '(' => {
                self.cursor.advance();
                TokenKind::StartParamList
            }
            ')' => {
                self.cursor.advance();
                TokenKind::EndParamList
            }
            '{' => {
                self.cursor.advance();
                TokenKind::StartFunctionDef
            }
            '}' => {
                self.cursor.advance();
                TokenKind::EndFunctionDef
            }
            '[' => {
                self.cursor.advance();
                TokenKind::StartArray
            }
            ']' => {
                self.cursor.advance();
                TokenKind::EndArray
            }
            '^' => {
                self.cursor.advance();
                TokenKind::Label
            }
            '=' => self.lex_equals(),
            '+' => self.lex_op_or_modify(Op::Add),
            '-' => self.lex_op_or_modify(Op::Sub),
            '*' => self.lex_op_or_modify(Op::Mul),
            '/' => self.lex_op_or_modify(Op::Div),
            '<' => self.lex_lt_gt(Op::Lt),
            '>' => self.lex_lt_gt(Op::Gt),
            '\'' | '"' => return self.lex_string(start, line, column),
            '0'..='9' | '.' if self.looks_like_number() => return self.lex_number(start, line, column),
            c if is_ident_start(c) => return self.lex_symbol(start, line, column),
            other => {
                self.cursor.advance();
                return Err(LexError::UnrecognizedCharacter {
                    ch: other,
                    line,
                    column,
                });
            }
        };

        let end = self.cursor.position();
        Ok(Token::new(kind, Span::new(start, end, line, column)))
    }

    /// `.` only starts a number if followed by a digit; a bare `.` has
    /// no meaning in Graft and is an unrecognized character.
    fn looks_like_number(&self) -> bool {
        let c = self.cursor.current_char();
        if c.is_ascii_digit() {
            return true;
        }
        c == '.' && self.cursor.char_at(1).is_ascii_digit()
    }

    /// Coalesce a run of whitespace (spaces and newlines) into a single
    /// `StatementSeparator`; reject a lone tab as a hard error.
    fn skip_whitespace(&mut self) -> LexResult<Option<Token>> {
        let start = self.cursor.position();
        let (line, column) = (self.cursor.line(), self.cursor.column());
        let mut saw_any = false;

        loop {
            match self.cursor.current_char() {
                ' ' | '\n' | '\r' => {
                    saw_any = true;
                    self.cursor.advance();
                }
                '\t' => {
                    return Err(LexError::TabCharacter {
                        line: self.cursor.line(),
                        column: self.cursor.column(),
                    });
                }
                _ => break,
            }
        }

        if saw_any {
            let end = self.cursor.position();
            Ok(Some(Token::new(
                TokenKind::StatementSeparator,
                Span::new(start, end, line, column),
            )))
        } else {
            Ok(None)
        }
    }

    /// `=` alone is `Assignment`; `==` is the equality operator.
    fn lex_equals(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            TokenKind::Operator(Op::Eq)
        } else {
            TokenKind::Assignment
        }
    }

    /// `+`, `-`, `*`, `/` are each either a plain operator or, followed
    /// by `=`, a modifying-assignment operator.
    fn lex_op_or_modify(&mut self, op: Op) -> TokenKind {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            TokenKind::Modify(op)
        } else {
            TokenKind::Operator(op)
        }
    }

    /// `<`/`>` are each either a plain comparison or, followed by `=`,
    /// the corresponding `<=`/`>=` operator.
    fn lex_lt_gt(&mut self, op: Op) -> TokenKind {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            TokenKind::Operator(if matches!(op, Op::Lt) { Op::Le } else { Op::Ge })
        } else {
            TokenKind::Operator(op)
        }
    }

    fn lex_string(&mut self, start: usize, line: u32, column: u32) -> LexResult<Token> {
        let quote = self.cursor.advance();
        let mut text = String::new();
        loop {
            let c = self.cursor.current_char();
            if c == quote {
                self.cursor.advance();
                break;
            }
            if self.cursor.is_at_end() {
                return Err(LexError::UnterminatedString { line, column });
            }
            text.push(self.cursor.advance());
        }
        let end = self.cursor.position();
        Ok(Token::new(TokenKind::String(text), Span::new(start, end, line, column)))
    }

    fn lex_number(&mut self, start: usize, line: u32, column: u32) -> LexResult<Token> {
        let mut text = String::new();
        let mut seen_dot = false;
        loop {
            let c = self.cursor.current_char();
            if c.is_ascii_digit() {
                text.push(self.cursor.advance());
            } else if c == '.' && !seen_dot && self.cursor.char_at(1).is_ascii_digit() {
                seen_dot = true;
                text.push(self.cursor.advance());
            } else {
                break;
            }
        }
        let end = self.cursor.position();
        Ok(Token::new(TokenKind::Number(text), Span::new(start, end, line, column)))
    }

    fn lex_symbol(&mut self, start: usize, line: u32, column: u32) -> LexResult<Token> {
        let mut text = String::new();
        while is_ident_continue(self.cursor.current_char()) {
            text.push(self.cursor.advance());
        }
        let end = self.cursor.position();
        Ok(Token::new(TokenKind::Symbol(text), Span::new(start, end, line, column)))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience entry point: lex a whole source string.
pub fn lex(source: &str) -> LexResult<Vec<Token>> {
    Lexer::new(source).tokenize()
}
