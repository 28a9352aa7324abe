//! Recursive-descent parser: token stream → AST (`spec.md` §4.2).

use std::rc::Rc;

use graft_lex::{Op, Token, TokenKind};
use graft_util::Span;

use crate::ast::Ast;
use crate::error::{ParseError, ParseResult};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse a whole program: a sequence of top-level statements.
    pub fn parse_program(&mut self) -> ParseResult<Vec<Ast>> {
        let mut stmts = Vec::new();
        self.skip_separators();
        while !self.at_eof() {
            stmts.push(self.parse_statement()?);
            self.skip_separators();
        }
        Ok(stmts)
    }

    // -- token stream plumbing -----------------------------------------

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), TokenKind::StatementSeparator) {
            self.advance();
        }
    }

    /// Skip separators *and* a single trailing `,` followed by more
    /// separators, for argument/array lists (`spec.md` §4.2).
    fn skip_list_tail(&mut self) {
        self.skip_separators();
        if matches!(self.peek(), TokenKind::ListSeparator) {
            self.advance();
            self.skip_separators();
        }
    }

    fn unexpected(&self) -> ParseError {
        ParseError::UnexpectedToken(self.peek().to_string())
    }

    // -- statements ------------------------------------------------------

    fn parse_statement(&mut self) -> ParseResult<Ast> {
        if matches!(self.peek(), TokenKind::Label) {
            let span = self.peek_span();
            self.advance();
            return Ok(Ast::Label(span));
        }

        let expr = self.parse_expr()?;

        match self.peek().clone() {
            TokenKind::Assignment => {
                self.advance();
                let name = self.symbol_name_of(&expr, ParseError::NonSymbolAssignTarget)?;
                let value = self.parse_expr()?;
                let span = expr.span().to(value.span());
                Ok(Ast::Assignment(name, Box::new(value), span))
            }
            TokenKind::Modify(op) => {
                self.advance();
                let name = self.symbol_name_of(
                    &expr,
                    ParseError::NonSymbolModifyTarget(format!("{op}=")),
                )?;
                let value = self.parse_expr()?;
                let span = expr.span().to(value.span());
                Ok(Ast::Modify(op, name, Box::new(value), span))
            }
            _ => Ok(expr),
        }
    }

    fn symbol_name_of(&self, expr: &Ast, err: ParseError) -> ParseResult<String> {
        match expr {
            Ast::Symbol(name, _) => Ok(name.clone()),
            _ => Err(err),
        }
    }

    // -- expressions -------------------------------------------------------

    fn parse_expr(&mut self) -> ParseResult<Ast> {
        let lhs = self.parse_postfix()?;

        if let TokenKind::Operator(op) = self.peek().clone() {
            self.advance();
            let rhs = self.parse_expr()?;
            let span = lhs.span().to(rhs.span());
            return Ok(Ast::Operation(op, Box::new(lhs), Box::new(rhs), span));
        }

        Ok(lhs)
    }

    /// A primary expression followed by zero or more call argument lists:
    /// `expr(args)(args)...`.
    fn parse_postfix(&mut self) -> ParseResult<Ast> {
        let mut expr = self.parse_primary()?;
        while matches!(self.peek(), TokenKind::StartParamList) {
            let start_span = expr.span();
            self.advance();
            let args = self.parse_arg_list()?;
            let end_span = self.expect_end_param_list()?;
            expr = Ast::FunctionCall(Box::new(expr), args, start_span.to(end_span));
        }
        Ok(expr)
    }

    fn parse_arg_list(&mut self) -> ParseResult<Vec<Ast>> {
        let mut args = Vec::new();
        self.skip_separators();
        while !matches!(self.peek(), TokenKind::EndParamList) {
            if self.at_eof() {
                return Err(ParseError::UnterminatedBracket(')'));
            }
            args.push(self.parse_expr()?);
            self.skip_list_tail();
        }
        Ok(args)
    }

    fn expect_end_param_list(&mut self) -> ParseResult<Span> {
        if matches!(self.peek(), TokenKind::EndParamList) {
            Ok(self.advance().span)
        } else if self.at_eof() {
            Err(ParseError::UnterminatedBracket(')'))
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Ast> {
        match self.peek().clone() {
            TokenKind::Number(text) => {
                let span = self.advance().span;
                Ok(Ast::Number(text, span))
            }
            TokenKind::String(text) => {
                let span = self.advance().span;
                Ok(Ast::String(text, span))
            }
            TokenKind::Symbol(name) => {
                let span = self.advance().span;
                Ok(Ast::Symbol(name, span))
            }
            TokenKind::Operator(Op::Sub) => {
                let start = self.advance().span;
                let inner = self.parse_primary()?;
                let span = start.to(inner.span());
                Ok(Ast::Negative(Box::new(inner), span))
            }
            TokenKind::StartParamList => {
                self.advance();
                let inner = self.parse_expr()?;
                self.skip_separators();
                self.expect_end_param_list()?;
                Ok(inner)
            }
            TokenKind::StartFunctionDef => self.parse_function_def(),
            TokenKind::StartArray => self.parse_array(),
            _ => Err(self.unexpected()),
        }
    }

    /// `{ body }` or `{ : ( p1, p2, ... ) body }`.
    fn parse_function_def(&mut self) -> ParseResult<Ast> {
        let start = self.advance().span; // consume '{'
        self.skip_separators();

        let params = if matches!(self.peek(), TokenKind::ParamListPrelude) {
            self.advance();
            if !matches!(self.peek(), TokenKind::StartParamList) {
                return Err(ParseError::ColonWithoutParamList);
            }
            self.advance();
            let params = self.parse_param_list()?;
            self.expect_end_param_list()?;
            self.skip_separators();
            params
        } else {
            Vec::new()
        };

        let mut body = Vec::new();
        while !matches!(self.peek(), TokenKind::EndFunctionDef) {
            if self.at_eof() {
                return Err(ParseError::UnterminatedBracket('}'));
            }
            body.push(self.parse_statement()?);
            self.skip_separators();
        }
        let end = self.advance().span; // consume '}'

        Ok(Ast::FunctionDef(params, Rc::from(body), start.to(end)))
    }

    fn parse_param_list(&mut self) -> ParseResult<Vec<String>> {
        let mut params = Vec::new();
        self.skip_separators();
        while !matches!(self.peek(), TokenKind::EndParamList) {
            if self.at_eof() {
                return Err(ParseError::UnterminatedBracket(')'));
            }
            let expr = self.parse_expr()?;
            match expr {
                Ast::Symbol(name, _) => params.push(name),
                other => return Err(ParseError::NonSymbolParameter(ast_repr(&other))),
            }
            self.skip_list_tail();
        }
        Ok(params)
    }

    /// `[ e1, e2, ... ]`.
    fn parse_array(&mut self) -> ParseResult<Ast> {
        let start = self.advance().span; // consume '['
        let mut items = Vec::new();
        self.skip_separators();
        while !matches!(self.peek(), TokenKind::EndArray) {
            if self.at_eof() {
                return Err(ParseError::UnterminatedBracket(']'));
            }
            items.push(self.parse_expr()?);
            self.skip_list_tail();
        }
        let end = self.advance().span; // consume ']'
        Ok(Ast::Array(items, start.to(end)))
    }
}

/// Render an AST node compactly for the "non-symbol parameter" error
/// message (`spec.md` §4.2).
fn ast_repr(ast: &Ast) -> String {
    match ast {
        Ast::Number(text, _) => format!("Number({text})"),
        Ast::String(text, _) => format!("String({text})"),
        Ast::Symbol(name, _) => format!("Symbol({name})"),
        Ast::Negative(inner, _) => format!("Negative({})", ast_repr(inner)),
        Ast::Operation(op, l, r, _) => {
            format!("Operation({op}, {}, {})", ast_repr(l), ast_repr(r))
        }
        Ast::Modify(op, name, v, _) => format!("Modify({op}=, {name}, {})", ast_repr(v)),
        Ast::Assignment(name, v, _) => format!("Assignment({name}, {})", ast_repr(v)),
        Ast::FunctionCall(callee, args, _) => format!(
            "FunctionCall({}, [{}])",
            ast_repr(callee),
            args.iter().map(ast_repr).collect::<Vec<_>>().join(", ")
        ),
        Ast::FunctionDef(params, _, _) => format!("FunctionDef({})", params.join(", ")),
        Ast::Array(items, _) => format!(
            "Array([{}])",
            items.iter().map(ast_repr).collect::<Vec<_>>().join(", ")
        ),
        Ast::Label(_) => "Label".to_string(),
    }
}

/// Lex and parse a complete Graft program.
pub fn parse(source: &str) -> ParseResult<Vec<Ast>> {
    let tokens = graft_lex::lex(source)?;
    Parser::new(tokens).parse_program()
}
