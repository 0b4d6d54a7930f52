use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    FileId, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(regex).expect("token patterns are valid regexes"),
        handler,
    }
}

lazy_static! {
    /// Tried in order; the first pattern matching at the current position wins.
    /// Longer operators therefore come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("^\\s+", skip_handler),
        pattern("^//[^\\n]*", skip_handler),
        pattern("^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern(
            "^[0-9][0-9_]*(?:\\.[0-9][0-9_]*(?:[eE][+-]?[0-9]+)?|[eE][+-]?[0-9]+)(?:f32|f64)?",
            float_handler,
        ),
        pattern(
            "^(?:0x[0-9a-fA-F][0-9a-fA-F_]*|0o[0-7][0-7_]*|0b[01][01_]*|[0-9][0-9_]*)(?:[iu](?:8|16|32|64)|f32|f64)?",
            integer_handler,
        ),
        pattern("^<<=", MK_DEFAULT_HANDLER!(TokenKind::ShiftLeftEquals, "<<=")),
        pattern("^>>=", MK_DEFAULT_HANDLER!(TokenKind::ShiftRightEquals, ">>=")),
        pattern("^<<", MK_DEFAULT_HANDLER!(TokenKind::ShiftLeft, "<<")),
        pattern("^>>", MK_DEFAULT_HANDLER!(TokenKind::ShiftRight, ">>")),
        pattern("^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern("^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern("^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern("^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern("^&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern("^\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern("^\\+\\+", MK_DEFAULT_HANDLER!(TokenKind::PlusPlus, "++")),
        pattern("^--", MK_DEFAULT_HANDLER!(TokenKind::MinusMinus, "--")),
        pattern("^\\+=", MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=")),
        pattern("^-=", MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=")),
        pattern("^\\*=", MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=")),
        pattern("^/=", MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=")),
        pattern("^%=", MK_DEFAULT_HANDLER!(TokenKind::PercentEquals, "%=")),
        pattern("^&=", MK_DEFAULT_HANDLER!(TokenKind::AmpersandEquals, "&=")),
        pattern("^\\|=", MK_DEFAULT_HANDLER!(TokenKind::PipeEquals, "|=")),
        pattern("^\\^=", MK_DEFAULT_HANDLER!(TokenKind::CaretEquals, "^=")),
        pattern("^->", MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->")),
        pattern("^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern("^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern("^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern("^!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        pattern("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern("^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern("^\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern("^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern("^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        pattern("^&", MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&")),
        pattern("^\\|", MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|")),
        pattern("^\\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
        pattern("^~", MK_DEFAULT_HANDLER!(TokenKind::Tilde, "~")),
        pattern("^\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("^\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("^\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern("^\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern("^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern("^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern("^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
    ];
}

pub struct Lexer<'a> {
    tokens: Vec<Token>,
    source: &'a str,
    pub pos: usize,
    pub file: FileId,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: FileId) -> Lexer<'a> {
        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            file,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn remainder(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn span(&self, len: usize) -> Span {
        Span::new(self.file, self.pos, self.pos + len)
    }
}

fn matched<'a>(lexer: &Lexer<'a>, regex: &Regex) -> &'a str {
    regex
        .find(lexer.remainder())
        .map(|found| found.as_str())
        .unwrap_or("")
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let len = matched(lexer, regex).len();
    lexer.advance_n(len);
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = matched(lexer, regex);
    let kind = RESERVED_LOOKUP
        .get(value)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, value.to_string(), lexer.span(value.len())));
    lexer.advance_n(value.len());
    Ok(())
}

fn float_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    number_handler(lexer, regex, TokenKind::Float)
}

fn integer_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    number_handler(lexer, regex, TokenKind::Integer)
}

/// Numbers keep their full spelling; the parser splits off base and suffix.
/// A number running straight into more letters or digits (`0b102`, `12abc`)
/// is rejected as a whole.
fn number_handler(lexer: &mut Lexer, regex: &Regex, kind: TokenKind) -> Result<(), Error> {
    let value = matched(lexer, regex);
    let rest = &lexer.remainder()[value.len()..];
    let trailing = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());

    if trailing > 0 {
        let token = &lexer.remainder()[..value.len() + trailing];
        return Err(Error::new(
            ErrorImpl::NumberParseError {
                token: token.to_string(),
            },
            lexer.span(token.len()),
        ));
    }

    lexer.push(MK_TOKEN!(kind, value.to_string(), lexer.span(value.len())));
    lexer.advance_n(value.len());
    Ok(())
}

pub fn tokenize(source: &str, file: FileId) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let pattern = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex)?,
            None => {
                let token = lex.remainder().chars().next().unwrap_or_default();
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken {
                        token: token.to_string(),
                    },
                    lex.span(token.len_utf8()),
                ));
            }
        }
    }

    let eof = lex.span(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), eof));
    trace!(file, tokens = lex.tokens.len(), "tokenized source");
    Ok(lex.tokens)
}
