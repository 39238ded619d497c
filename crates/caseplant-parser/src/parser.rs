//! Parser for Caseplant source tokens.
//!
//! This module turns the token stream from the [`lexer`](super::lexer) into a
//! [`Diagram`]. The public entry point is [`build_diagram`].
//!
//! ## Grammar
//!
//! ```text
//! program    := statement*
//! statement  := module_def | actor_def | relation
//! module_def := "module" "(" (STRING | ID) ")" "{" case_list? "}"
//! case_list  := case (("," | ";") case)* ("," | ";")?
//! case       := "case" STRING ("as" ID)?
//! actor_def  := "actor" STRING ("as" ID)? ";"
//! relation   := operand RELOP operand ";"?
//! operand    := ID | STRING
//! ```
//!
//! ## Recovery
//!
//! Every expected token is parsed through `recover`. When the next token
//! does not fit, it is reported and discarded and the same expectation is
//! tried again on the token after it, so a stray token does not cost the
//! statement around it. Recovery gives up at end of input and at `actor` or
//! `module`, which always begin a new statement; the incomplete statement is
//! then dropped and parsing restarts there.

use std::collections::HashMap;

use winnow::{
    Parser as _,
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use caseplant_core::{
    model::{Actor, Diagram, Module, UseCase},
    relation::{Operand, Relation, RelationOperator},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token, TokenKind},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what was expected at the failure point
    Label(&'static str),
}

type Input<'src> = CaseTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
/// Type alias for winnow TokenSlice with our positioned tokens
type CaseTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

/// A parsed top-level statement.
#[derive(Debug)]
enum Statement {
    Actor(Spanned<Actor>),
    Module(Spanned<Module>),
    Relation(Relation),
}

/// Run the single-token parser `f`, discarding tokens it rejects.
///
/// Each discarded token is reported as `E100`. Stops with a cut error at end
/// of input or at a token that starts a statement, leaving that token in
/// place for the statement loop.
fn recover<'src, O, F>(
    input: &mut Input<'src>,
    diagnostics: &mut DiagnosticCollector,
    mut f: F,
) -> IResult<O>
where
    F: FnMut(&mut Input<'src>) -> IResult<O>,
{
    loop {
        let err = match f(input) {
            Err(ErrMode::Backtrack(e) | ErrMode::Cut(e)) => e,
            other => return other,
        };

        match input.peek_token() {
            Some(token) if !starts_statement(token) => {
                let err = ErrMode::Backtrack(err);
                diagnostics.emit(convert_error(&err, Some(token), token.span.end()));
                log::trace!(offset = token.position(); "Discarded token");
                let _ = input.next_token();
            }
            _ => return Err(ErrMode::Cut(err)),
        }
    }
}

/// Parse one token of `kind`, returning its span.
fn expect<'src>(input: &mut Input<'src>, kind: TokenKind, label: &'static str) -> IResult<Span> {
    expect_any(input, &[kind], label).map(|token| token.span())
}

/// Parse one token of any of `kinds`, returning which kind was found.
fn expect_any<'src>(
    input: &mut Input<'src>,
    kinds: &[TokenKind],
    label: &'static str,
) -> IResult<Spanned<TokenKind>> {
    any.verify_map(|token: &PositionedToken<'_>| {
        kinds
            .contains(&token.kind())
            .then(|| Spanned::new(token.kind(), token.span))
    })
    .context(Context::Label(label))
    .parse_next(input)
}

/// Consume a token of `kind` if it is next.
fn accept<'src>(input: &mut Input<'src>, kind: TokenKind) -> Option<Span> {
    let checkpoint = input.checkpoint();
    let result: IResult<Span> = any
        .verify_map(move |token: &PositionedToken<'_>| (token.kind() == kind).then_some(token.span))
        .parse_next(input);
    match result {
        Ok(span) => Some(span),
        Err(_) => {
            input.reset(&checkpoint);
            None
        }
    }
}

/// Returns the kind of the next token without consuming it.
fn peek_kind(input: &Input<'_>) -> Option<TokenKind> {
    input.peek_token().map(PositionedToken::kind)
}

/// Parse string literal
fn string_literal<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::StringLiteral(s) => Some(Spanned::new(s.clone(), token.span)),
        _ => None,
    })
    .context(Context::Label("string literal"))
    .parse_next(input)
}

fn identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|token: &PositionedToken<'src>| match &token.token {
        Token::Identifier(name) => Some(Spanned::new(*name, token.span)),
        _ => None,
    })
    .context(Context::Label("identifier"))
    .parse_next(input)
}

/// Parse a module name, which may be quoted or a bare identifier
fn module_name<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::StringLiteral(s) => Some(Spanned::new(s.clone(), token.span)),
        Token::Identifier(name) => Some(Spanned::new(name.to_string(), token.span)),
        _ => None,
    })
    .context(Context::Label("module name"))
    .parse_next(input)
}

/// Parse a relation operand: a bare alias or quoted label text
fn operand<'src>(input: &mut Input<'src>) -> IResult<Spanned<Operand>> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::Identifier(name) => Some(Spanned::new(Operand::Alias(name.to_string()), token.span)),
        Token::StringLiteral(s) => Some(Spanned::new(Operand::Label(s.clone()), token.span)),
        _ => None,
    })
    .context(Context::Label("identifier or string literal"))
    .parse_next(input)
}

fn relation_operator<'src>(input: &mut Input<'src>) -> IResult<RelationOperator> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::Operator(op) => Some(*op),
        _ => None,
    })
    .context(Context::Label("relation operator"))
    .parse_next(input)
}

/// Parse the identifier after `as`
fn alias<'src>(
    input: &mut Input<'src>,
    diagnostics: &mut DiagnosticCollector,
) -> IResult<Spanned<&'src str>> {
    recover(input, diagnostics, |input| {
        identifier
            .context(Context::Label("alias after `as`"))
            .parse_next(input)
    })
}

/// Parse an actor declaration
///
/// ## Grammar:
///   `actor <string> [as <identifier>];`
fn actor_def<'src>(
    input: &mut Input<'src>,
    diagnostics: &mut DiagnosticCollector,
) -> IResult<Statement> {
    let keyword = expect(input, TokenKind::Actor, "`actor`")?;

    let name = recover(input, diagnostics, |input| {
        string_literal
            .context(Context::Label("actor name"))
            .parse_next(input)
    })?;

    let mut next = recover(input, diagnostics, |input| {
        expect_any(input, &[TokenKind::As, TokenKind::Semicolon], "`as` or `;`")
    })?;
    let mut alias_name = None;
    if *next.inner() == TokenKind::As {
        alias_name = Some(alias(input, diagnostics)?.into_inner().to_string());
        next = recover(input, diagnostics, |input| {
            expect_any(input, &[TokenKind::Semicolon], "`;` after actor declaration")
        })?;
    }

    let actor = Actor::new(name.into_inner(), alias_name);
    Ok(Statement::Actor(Spanned::new(actor, keyword.union(next.span()))))
}

/// Parse the entries between `{` and `}`, including the closing brace
///
/// Entries are `case <string> [as <identifier>]`, separated by `,` or `;`.
/// One trailing separator is allowed.
fn case_list<'src>(
    input: &mut Input<'src>,
    diagnostics: &mut DiagnosticCollector,
) -> IResult<Vec<UseCase>> {
    const AFTER_NAME: &[TokenKind] = &[
        TokenKind::As,
        TokenKind::Comma,
        TokenKind::Semicolon,
        TokenKind::RightBrace,
    ];
    const AFTER_ALIAS: &[TokenKind] =
        &[TokenKind::Comma, TokenKind::Semicolon, TokenKind::RightBrace];

    let mut use_cases = Vec::new();
    loop {
        let start = recover(input, diagnostics, |input| {
            expect_any(input, &[TokenKind::Case, TokenKind::RightBrace], "`case` or `}`")
        })?;
        if *start.inner() == TokenKind::RightBrace {
            return Ok(use_cases);
        }

        let name = recover(input, diagnostics, |input| {
            string_literal
                .context(Context::Label("use case name"))
                .parse_next(input)
        })?;

        let mut next = recover(input, diagnostics, |input| {
            expect_any(input, AFTER_NAME, "`as`, `,` or `}`")
        })?;
        let mut alias_name = None;
        if *next.inner() == TokenKind::As {
            alias_name = Some(alias(input, diagnostics)?.into_inner().to_string());
            next = recover(input, diagnostics, |input| {
                expect_any(input, AFTER_ALIAS, "`,` or `}`")
            })?;
        }

        use_cases.push(UseCase::new(name.into_inner(), alias_name));
        if *next.inner() == TokenKind::RightBrace {
            return Ok(use_cases);
        }
    }
}

/// Parse a module declaration
///
/// ## Grammar:
///   `module(<string | identifier>) { case ..., case ... }`
fn module_def<'src>(
    input: &mut Input<'src>,
    diagnostics: &mut DiagnosticCollector,
) -> IResult<Statement> {
    expect(input, TokenKind::Module, "`module`")?;

    recover(input, diagnostics, |input| {
        expect(input, TokenKind::LeftParen, "`(` after `module`")
    })?;
    let name = recover(input, diagnostics, module_name)?;
    recover(input, diagnostics, |input| {
        expect(input, TokenKind::RightParen, "`)` after module name")
    })?;
    recover(input, diagnostics, |input| {
        expect(input, TokenKind::LeftBrace, "`{`")
    })?;
    let use_cases = case_list(input, diagnostics)?;

    let span = name.span();
    Ok(Statement::Module(Spanned::new(
        Module::new(name.into_inner(), use_cases),
        span,
    )))
}

/// Parse a relation
///
/// ## Grammar:
///   `<operand> <operator> <operand> [;]`
fn relation<'src>(
    input: &mut Input<'src>,
    diagnostics: &mut DiagnosticCollector,
) -> IResult<Statement> {
    let left = operand(input)?;
    let operator = recover(input, diagnostics, relation_operator)?;
    let right = recover(input, diagnostics, |input| {
        operand
            .context(Context::Label("operand after relation operator"))
            .parse_next(input)
    })?;
    accept(input, TokenKind::Semicolon);

    Ok(Statement::Relation(Relation::new(
        left.into_inner(),
        operator,
        right.into_inner(),
    )))
}

fn statement<'src>(
    input: &mut Input<'src>,
    diagnostics: &mut DiagnosticCollector,
) -> IResult<Statement> {
    match peek_kind(input) {
        Some(TokenKind::Actor) => actor_def(input, diagnostics),
        Some(TokenKind::Module) => module_def(input, diagnostics),
        Some(TokenKind::Identifier | TokenKind::StringLiteral) => relation(input, diagnostics),
        _ => {
            let mut err = ContextError::new();
            err.push(Context::Label("`actor`, `module` or a relation"));
            Err(ErrMode::Backtrack(err))
        }
    }
}

/// Returns `true` for tokens that can only begin a statement.
fn starts_statement(token: &PositionedToken<'_>) -> bool {
    matches!(token.token, Token::Actor | Token::Module)
}

/// Convert a winnow error at `offending` into a diagnostic.
///
/// `offending` is the token the parser could not accept, or `None` when
/// input ended first at byte offset `end`.
fn convert_error(
    error: &ErrMode<ContextError<Context>>,
    offending: Option<&PositionedToken<'_>>,
    end: usize,
) -> Diagnostic {
    let expected = match error {
        // Outermost label is the most descriptive
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e
            .context()
            .map(|ctx| match ctx {
                Context::Label(label) => *label,
            })
            .last(),
        ErrMode::Incomplete(_) => None,
    };

    match offending {
        Some(token) => {
            let label = expected.map_or_else(
                || "unexpected token".to_string(),
                |expected| format!("expected {expected}"),
            );
            Diagnostic::error(format!(
                "unexpected {} at offset {}",
                token.describe(),
                token.position()
            ))
            .with_code(ErrorCode::E100)
            .with_label(token.span, label)
        }
        None => {
            let mut diag = Diagnostic::error(format!("unexpected end of input at offset {end}"))
                .with_code(ErrorCode::E101)
                .with_label(Span::new(end..end), ErrorCode::E101.description());
            if let Some(expected) = expected {
                diag = diag.with_help(format!("expected {expected}"));
            }
            diag
        }
    }
}

/// Accumulates the model and diagnostics while statements are parsed.
struct DiagramParser {
    diagram: Diagram,
    diagnostics: DiagnosticCollector,
    module_spans: HashMap<String, Span>,
    actor_spans: HashMap<String, Span>,
}

impl DiagramParser {
    fn new() -> Self {
        Self {
            diagram: Diagram::new(),
            diagnostics: DiagnosticCollector::new(),
            module_spans: HashMap::new(),
            actor_spans: HashMap::new(),
        }
    }

    fn parse<'src>(&mut self, tokens: &'src [PositionedToken<'src>]) {
        let end = tokens.last().map_or(0, |token| token.span.end());
        let mut index = 0;

        while index < tokens.len() {
            let mut input = TokenSlice::new(&tokens[index..]);

            match statement(&mut input, &mut self.diagnostics) {
                Ok(stmt) => {
                    index = tokens.len() - input.eof_offset();
                    self.record(stmt);
                }
                Err(err) => {
                    let offending = match &err {
                        ErrMode::Cut(_) => tokens.len() - input.eof_offset(),
                        _ => index,
                    };
                    let diagnostic = convert_error(&err, tokens.get(offending), end);
                    log::debug!(offset:? = diagnostic.offset(); "Recovering from syntax error");
                    self.diagnostics.emit(diagnostic);

                    // Out of tokens before the statement was complete
                    if offending >= tokens.len() {
                        break;
                    }

                    // An incomplete statement stops at the keyword of the next one
                    index = if offending > index && starts_statement(&tokens[offending]) {
                        offending
                    } else {
                        offending + 1
                    };
                }
            }
        }
    }

    fn record(&mut self, stmt: Statement) {
        match stmt {
            Statement::Actor(actor) => {
                let span = actor.span();
                let actor = actor.into_inner();
                let key = actor.reference().to_string();
                if self.diagram.add_actor(actor).is_some() {
                    let first = self.actor_spans[&key];
                    self.diagnostics.emit(
                        Diagnostic::warning(format!("actor `{key}` is declared multiple times"))
                            .with_code(ErrorCode::W002)
                            .with_label(span, "redeclared here")
                            .with_secondary_label(first, "first declared here")
                            .with_help("the later declaration replaces the earlier one"),
                    );
                } else {
                    self.actor_spans.insert(key, span);
                }
            }
            Statement::Module(module) => {
                let span = module.span();
                let module = module.into_inner();
                let name = module.name().to_string();
                if self.diagram.add_module(module).is_some() {
                    let first = self.module_spans[&name];
                    self.diagnostics.emit(
                        Diagnostic::warning(format!("module `{name}` is defined multiple times"))
                            .with_code(ErrorCode::W001)
                            .with_label(span, "redefined here")
                            .with_secondary_label(first, "first defined here")
                            .with_help("the later case list replaces the earlier one"),
                    );
                } else {
                    self.module_spans.insert(name, span);
                }
            }
            Statement::Relation(relation) => self.diagram.add_relation(relation),
        }
    }

    fn finish(self) -> (Diagram, Vec<Diagnostic>) {
        log::trace!(has_errors = self.diagnostics.has_errors(); "Statements parsed");
        (self.diagram, self.diagnostics.into_diagnostics())
    }
}

/// Build a diagram from tokens.
///
/// Never fails: syntax errors are returned as diagnostics next to the
/// partial model built from every statement that parsed.
pub fn build_diagram<'src>(tokens: &'src [PositionedToken<'src>]) -> (Diagram, Vec<Diagnostic>) {
    let mut parser = DiagramParser::new();
    parser.parse(tokens);
    parser.finish()
}
