//! Lexical analyzer for Caseplant source text.
//!
//! The lexer converts source text into [`PositionedToken`]s for the parser.
//! Whitespace and `//` line comments are insignificant and produce no tokens.
//!
//! The public entry point is [`tokenize`], which never fails: characters that
//! match no token rule are reported and skipped one at a time. An unterminated
//! string literal is reported and only its opening quote is skipped. Unknown
//! escape sequences are reported and kept in the literal as written.

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, preceded, repeat, terminated},
    error::{ContextError, ErrMode},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, none_of, one_of, take_while},
};

use caseplant_core::relation::RelationOperator;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Diagnostic details attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = Result<O, ErrMode<ContextError<LexerDiagnostic>>>;

/// Quote pairs accepted around string literals.
const QUOTES: [(char, char); 3] = [('\'', '\''), ('"', '"'), ('\u{201C}', '\u{201D}')];

/// An unknown escape: the offset of its backslash and the escaped character.
type InvalidEscape = (usize, char);

/// One unit of string literal content.
#[derive(Debug, Clone, Copy)]
enum Fragment {
    Char(char),
    Invalid(InvalidEscape),
}

/// The decoded content of a string literal.
#[derive(Debug, Default)]
struct StringBody {
    value: String,
    invalid_escapes: Vec<InvalidEscape>,
}

impl StringBody {
    fn push(mut self, fragment: Fragment) -> Self {
        match fragment {
            Fragment::Char(ch) => self.value.push(ch),
            Fragment::Invalid((start, ch)) => {
                self.value.push('\\');
                self.value.push(ch);
                self.invalid_escapes.push((start, ch));
            }
        }
        self
    }
}

fn backtrack<O>() -> IResult<O> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

/// Parse an escape sequence starting with a backslash.
///
/// A backslash at the end of a line is not an escape; the literal is then
/// unterminated.
fn string_escape(input: &mut Input<'_>) -> IResult<Fragment> {
    let escape_start = input.current_token_start();

    '\\'.parse_next(input)?;

    alt((
        one_of(['\\', '\'', '"', 'n', 't']).map(|c| {
            Fragment::Char(match c {
                'n' => '\n',
                't' => '\t',
                other => other,
            })
        }),
        none_of(['\n', '\r']).map(move |ch| Fragment::Invalid((escape_start, ch))),
    ))
    .parse_next(input)
}

/// Parse a string literal delimited by `open` and `close`.
///
/// The literal may not span lines. Once the opening quote is consumed the
/// parser commits, so a missing closing quote is reported as `E001`.
/// Surrounding spaces and tabs are trimmed from the value.
fn quoted(input: &mut Input<'_>, open: char, close: char) -> IResult<StringBody> {
    let start_pos = input.current_token_start();

    one_of(open)
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError<LexerDiagnostic>>| {
            ErrMode::Backtrack(ContextError::new())
        })?;

    let content = repeat(
        0..,
        alt((
            string_escape,
            none_of([close, '\\', '\n', '\r']).map(Fragment::Char),
        )),
    )
    .fold(StringBody::default, StringBody::push);

    let mut body = cut_err(terminated(content, close))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("close the string on the same line"),
            start: start_pos,
        })
        .parse_next(input)?;

    let trimmed = body.value.trim_matches([' ', '\t']);
    if trimmed.len() != body.value.len() {
        body.value = trimmed.to_string();
    }
    Ok(body)
}

/// Parse a string literal with any of the accepted quote pairs.
fn string_literal(input: &mut Input<'_>) -> IResult<StringBody> {
    for (open, close) in QUOTES {
        match quoted(input, open, close) {
            Err(ErrMode::Backtrack(_)) => continue,
            result => return result,
        }
    }
    backtrack()
}

/// Parse a relation operator, trying longer symbols first.
fn relation_operator<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    for op in RelationOperator::ALL {
        let matched: IResult<&str> = literal(op.symbol()).parse_next(input);
        if matched.is_ok() {
            return Ok(Token::Operator(op));
        }
    }
    backtrack()
}

/// Parse a keyword or an identifier.
///
/// Keywords are identifier-shaped, so the whole word is read first and then
/// checked against the keyword list.
fn word<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_')
        .map(|word: &str| match word {
            "module" => Token::Module,
            "case" => Token::Case,
            "as" => Token::As,
            "actor" => Token::Actor,
            _ => Token::Identifier(word),
        })
        .parse_next(input)
}

fn punctuation<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        ','.value(Token::Comma),
        ';'.value(Token::Semicolon),
    ))
    .parse_next(input)
}

/// Skip whitespace and line comments.
fn trivia(input: &mut Input<'_>) -> IResult<()> {
    repeat(
        0..,
        alt((
            take_while(1.., [' ', '\t', '\r', '\n']).void(),
            preceded("//", take_while(0.., |c| c != '\n')).void(),
        )),
    )
    .parse_next(input)
}

/// Parse a single token with position tracking.
///
/// A string literal also yields the unknown escapes it contained.
fn positioned_token<'a>(
    input: &mut Input<'a>,
) -> IResult<(PositionedToken<'a>, Vec<InvalidEscape>)> {
    let start_pos = input.current_token_start();

    // Strings first, so a quote is never read as anything else
    let (token, invalid_escapes) = match string_literal(input) {
        Ok(body) => (Token::StringLiteral(body.value), body.invalid_escapes),
        Err(ErrMode::Backtrack(_)) => {
            let token = alt((
                relation_operator, // Longest symbols first
                word,              // Keywords and identifiers
                punctuation,
            ))
            .parse_next(input)?;
            (token, Vec::new())
        }
        Err(err) => return Err(err),
    };

    let end_pos = input.current_token_start();
    Ok((
        PositionedToken::new(token, Span::new(start_pos..end_pos)),
        invalid_escapes,
    ))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn tokenize(&mut self, mut input: Input<'a>) {
        loop {
            // repeat(0..) over consuming parsers cannot fail
            let _ = trivia(&mut input);
            if input.is_empty() {
                break;
            }

            let checkpoint = input.checkpoint();
            let start_pos = input.current_token_start();

            match positioned_token(&mut input) {
                Ok((token, invalid_escapes)) => {
                    for (start, ch) in invalid_escapes {
                        self.diagnostics.emit(Self::invalid_escape(start, ch));
                    }
                    self.tokens.push(token);
                }
                Err(err) => {
                    let error_pos = input.current_token_start();
                    let context = Self::context_of(err);

                    // Skip a single character: the opening quote of an
                    // unterminated string, or the unrecognized character
                    input.reset(&checkpoint);
                    match (context, input.next_token()) {
                        (Some(context), Some(_)) => self
                            .diagnostics
                            .emit(Self::string_diagnostic(&context, error_pos)),
                        (None, Some(ch)) => self
                            .diagnostics
                            .emit(Self::unexpected_character(ch, start_pos)),
                        (_, None) => break,
                    }
                }
            }
        }
    }

    fn finish(self) -> (Vec<PositionedToken<'a>>, Vec<Diagnostic>) {
        (self.tokens, self.diagnostics.into_diagnostics())
    }

    fn context_of(err: ErrMode<ContextError<LexerDiagnostic>>) -> Option<LexerDiagnostic> {
        match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx.context().next().cloned(),
            ErrMode::Incomplete(_) => None,
        }
    }

    fn string_diagnostic(context: &LexerDiagnostic, error_pos: usize) -> Diagnostic {
        let span = Span::new(context.start..error_pos.max(context.start + 1));
        let mut diag = Diagnostic::error(format!(
            "{} at offset {}",
            context.message, context.start
        ))
        .with_code(context.code)
        .with_label(span, context.code.description());
        if let Some(help) = context.help {
            diag = diag.with_help(help);
        }
        diag
    }

    fn invalid_escape(start: usize, ch: char) -> Diagnostic {
        let span = Span::new(start..start + 1 + ch.len_utf8());
        Diagnostic::error(format!(
            "invalid escape sequence `\\{}` at offset {start}",
            ch.escape_debug()
        ))
        .with_code(ErrorCode::E003)
        .with_label(span, ErrorCode::E003.description())
        .with_help("valid escapes: `\\\\`, `\\'`, `\\\"`, `\\n`, `\\t`")
    }

    fn unexpected_character(ch: char, position: usize) -> Diagnostic {
        let span = Span::new(position..position + ch.len_utf8());
        Diagnostic::error(format!(
            "unexpected character `{}` at offset {position}",
            ch.escape_debug()
        ))
        .with_code(ErrorCode::E002)
        .with_label(span, ErrorCode::E002.description())
    }
}

/// Tokenize source text, collecting diagnostics instead of stopping.
///
/// Returns every token that could be recognized, in source order, together
/// with the lexical diagnostics in the order they occurred.
pub fn tokenize(input: &str) -> (Vec<PositionedToken<'_>>, Vec<Diagnostic>) {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(input));
    let (tokens, diagnostics) = lexer.finish();
    log::trace!(tokens = tokens.len(), diagnostics = diagnostics.len(); "Tokenized source");
    (tokens, diagnostics)
}
