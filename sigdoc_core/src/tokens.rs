use std::fmt::Display;

use crate::Point;

/// The significant token kinds that survive lexing. Whitespace, comments and
/// line continuations are trivia and only show up as [`Token::spaced`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
	/// An identifier or keyword, e.g. `def`, `self`, `Optional`.
	Ident,
	/// A numeric literal, e.g. `42`, `0x1f`, `1.5e3`.
	Number,
	/// A string literal of any quoting style, prefix included.
	String,
	/// `(`, `[` or `{`
	Open,
	/// `)`, `]` or `}`
	Close,
	/// `:`
	Colon,
	/// `,`
	Comma,
	/// `;`
	Semicolon,
	/// `=`
	Equals,
	/// `->`
	Arrow,
	/// `*`
	Star,
	/// `**`
	DoubleStar,
	/// `/`
	Slash,
	/// `@`
	At,
	/// `.`
	Dot,
	/// Any other operator, e.g. `==`, `|`, `-`, `:=`.
	Operator,
}

/// A significant token together with its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
	pub kind: TokenKind,
	/// The exact source slice of the token.
	pub text: &'a str,
	/// Where the token starts.
	pub start: Point,
	/// Whether any whitespace, comment or line break separated this token
	/// from the previous one on the same logical line.
	pub spaced: bool,
}

impl Token<'_> {
	/// True for an identifier with exactly the given text.
	pub fn is_keyword(&self, keyword: &str) -> bool {
		self.kind == TokenKind::Ident && self.text == keyword
	}
}

impl Display for Token<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.text)
	}
}

/// One logical line of source: a physical line plus any lines joined to it
/// by open brackets or backslash continuations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine<'a> {
	/// Indentation width of the first physical line, tabs expanded to the
	/// next multiple of eight.
	pub indent: usize,
	/// The significant tokens of the line. Never empty.
	pub tokens: Vec<Token<'a>>,
}

impl LogicalLine<'_> {
	pub fn start(&self) -> Point {
		self.tokens.first().map(|token| token.start).unwrap_or_default()
	}
}

impl Display for LogicalLine<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}{}", " ".repeat(self.indent), source_text(&self.tokens))
	}
}

/// Render a token run as canonical source text.
///
/// Tokens are joined with a single space wherever the source separated them,
/// except directly after an opening bracket and directly before a closing
/// bracket or a comma. The result depends only on the tokens, so the same
/// expression always prints the same way.
pub fn source_text(tokens: &[Token<'_>]) -> String {
	let mut text = String::new();
	let mut previous: Option<&Token<'_>> = None;

	for token in tokens {
		if let Some(previous) = previous {
			let glued = previous.kind == TokenKind::Open
				|| matches!(token.kind, TokenKind::Close | TokenKind::Comma);
			if token.spaced && !glued {
				text.push(' ');
			}
		}
		text.push_str(token.text);
		previous = Some(token);
	}

	text
}
