use std::ops::Range;

use logos::Lexer;
use logos::Logos;

use crate::LineTable;
use crate::Point;
use crate::SigdocError;
use crate::SigdocResult;
use crate::tokens::LogicalLine;
use crate::tokens::Token;
use crate::tokens::TokenKind;

/// Raw tokens produced by logos for flat tokenization of a source unit.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum RawToken {
	#[regex(r"\r?\n")]
	Newline,
	#[regex(r"[ \t\x0C]+")]
	Whitespace,
	#[regex(r"#[^\r\n]*", allow_greedy = true)]
	Comment,
	#[regex(r"\\\r?\n")]
	LineContinuation,
	#[regex(r"([A-Za-z_]|[^\x00-\x7F])([A-Za-z0-9_]|[^\x00-\x7F])*")]
	Ident,
	#[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?[jJ]?")]
	#[regex(r"0[xXoObB][0-9a-fA-F_]+")]
	Number,
	#[regex(r#"[rRbBuUfF]{0,2}"([^"\\\r\n]|\\(.|\r?\n))*""#)]
	#[regex(r"[rRbBuUfF]{0,2}'([^'\\\r\n]|\\(.|\r?\n))*'")]
	ShortString,
	#[regex(r#"[rRbBuUfF]{0,2}""""#, |lex| close_long_string(lex, b"\"\"\""))]
	#[regex(r"[rRbBuUfF]{0,2}'''", |lex| close_long_string(lex, b"'''"))]
	LongString,
	#[regex(r"[(\[{]")]
	Open,
	#[regex(r"[)\]}]")]
	Close,
	#[token(":")]
	Colon,
	#[token(",")]
	Comma,
	#[token(";")]
	Semicolon,
	#[token("=")]
	Equals,
	#[token("->")]
	Arrow,
	#[token("*")]
	Star,
	#[token("**")]
	DoubleStar,
	#[token("/")]
	Slash,
	#[token("@")]
	At,
	#[token(".")]
	Dot,
	#[regex(r"==|!=|<=|>=|<<|>>|//|:=|\*\*=|//=|<<=|>>=|[-+*/%&|^@]=|[-+%&|^~<>]")]
	Operator,
}

/// Consume the body of a triple-quoted string up to and including its
/// closing delimiter. Returns `false` when the string is never closed.
fn close_long_string(lex: &mut Lexer<'_, RawToken>, delimiter: &[u8]) -> bool {
	let remainder = lex.remainder().as_bytes();
	let mut index = 0;

	while index < remainder.len() {
		if remainder[index] == b'\\' {
			index += 2;
			continue;
		}

		if remainder[index..].starts_with(delimiter) {
			lex.bump(index + delimiter.len());
			return true;
		}

		index += 1;
	}

	false
}

/// Walks the logos token stream and groups significant tokens into logical
/// lines, tracking indentation and bracket nesting.
struct LineWalker<'a> {
	/// The full source text.
	source: &'a str,
	/// The collected raw tokens and their byte spans.
	raw_tokens: Vec<(Result<RawToken, ()>, Range<usize>)>,
	/// Offset to line/column conversion.
	line_table: LineTable,
	/// Open brackets, innermost last, with the position of each opener.
	brackets: Vec<(u8, Point)>,
	/// Indentation measured so far on the current physical line.
	indent: usize,
	/// Whether no significant token has been seen on the current line yet.
	at_line_start: bool,
	/// Whether trivia was seen since the last significant token.
	spaced: bool,
	/// The logical line being built.
	line: LogicalLine<'a>,
	/// Completed logical lines.
	lines: Vec<LogicalLine<'a>>,
}

impl<'a> LineWalker<'a> {
	fn new(source: &'a str) -> Self {
		let raw_tokens: Vec<_> = RawToken::lexer(source).spanned().collect();

		Self {
			source,
			raw_tokens,
			line_table: LineTable::new(source),
			brackets: vec![],
			indent: 0,
			at_line_start: true,
			spaced: false,
			line: LogicalLine {
				indent: 0,
				tokens: vec![],
			},
			lines: vec![],
		}
	}

	fn process(mut self) -> SigdocResult<Vec<LogicalLine<'a>>> {
		let raw_tokens = std::mem::take(&mut self.raw_tokens);

		for (result, span) in raw_tokens {
			let text = &self.source[span.clone()];
			let Ok(raw) = result else {
				return Err(self.unrecognized(text, span.start));
			};

			match raw {
				RawToken::Newline => {
					if self.brackets.is_empty() {
						self.end_line();
					} else {
						self.spaced = true;
					}
				}
				RawToken::Whitespace => {
					if self.at_line_start {
						self.indent = expand_indent(self.indent, text);
					} else {
						self.spaced = true;
					}
				}
				RawToken::Comment | RawToken::LineContinuation => {
					self.spaced = true;
				}
				RawToken::Ident => self.push(TokenKind::Ident, text, span.start)?,
				RawToken::Number => self.push(TokenKind::Number, text, span.start)?,
				RawToken::ShortString | RawToken::LongString => {
					self.push(TokenKind::String, text, span.start)?;
				}
				RawToken::Open => self.push(TokenKind::Open, text, span.start)?,
				RawToken::Close => self.push(TokenKind::Close, text, span.start)?,
				RawToken::Colon => self.push(TokenKind::Colon, text, span.start)?,
				RawToken::Comma => self.push(TokenKind::Comma, text, span.start)?,
				RawToken::Semicolon => self.push(TokenKind::Semicolon, text, span.start)?,
				RawToken::Equals => self.push(TokenKind::Equals, text, span.start)?,
				RawToken::Arrow => self.push(TokenKind::Arrow, text, span.start)?,
				RawToken::Star => self.push(TokenKind::Star, text, span.start)?,
				RawToken::DoubleStar => self.push(TokenKind::DoubleStar, text, span.start)?,
				RawToken::Slash => self.push(TokenKind::Slash, text, span.start)?,
				RawToken::At => self.push(TokenKind::At, text, span.start)?,
				RawToken::Dot => self.push(TokenKind::Dot, text, span.start)?,
				RawToken::Operator => self.push(TokenKind::Operator, text, span.start)?,
			}
		}

		if let Some((bracket, opened_at)) = self.brackets.last() {
			return Err(SigdocError::syntax(
				format!("`{}` was never closed", *bracket as char),
				*opened_at,
			));
		}

		self.end_line();
		Ok(self.lines)
	}

	/// Add a significant token to the current logical line.
	fn push(&mut self, kind: TokenKind, text: &'a str, offset: usize) -> SigdocResult<()> {
		let start = self.line_table.point(offset);

		if self.at_line_start {
			self.line.indent = self.indent;
			self.at_line_start = false;
			self.spaced = false;
		}

		match kind {
			TokenKind::Open => self.brackets.push((text.as_bytes()[0], start)),
			TokenKind::Close => {
				let expected = match text {
					")" => b'(',
					"]" => b'[',
					_ => b'{',
				};
				match self.brackets.pop() {
					Some((open, _)) if open == expected => {}
					Some((open, _)) => {
						return Err(SigdocError::syntax(
							format!(
								"closing `{text}` does not match opening `{}`",
								open as char
							),
							start,
						));
					}
					None => {
						return Err(SigdocError::syntax(format!("unmatched `{text}`"), start));
					}
				}
			}
			_ => {}
		}

		self.line.tokens.push(Token {
			kind,
			text,
			start,
			spaced: self.spaced,
		});
		self.spaced = false;

		Ok(())
	}

	/// Finish the current logical line. Lines holding only trivia are
	/// dropped.
	fn end_line(&mut self) {
		let line = std::mem::replace(
			&mut self.line,
			LogicalLine {
				indent: 0,
				tokens: vec![],
			},
		);

		if !line.tokens.is_empty() {
			tracing::trace!(line = %line, "logical line");
			self.lines.push(line);
		}

		self.at_line_start = true;
		self.indent = 0;
		self.spaced = false;
	}

	fn unrecognized(&self, text: &str, offset: usize) -> SigdocError {
		let start = self.line_table.point(offset);
		let quoted = text
			.trim_start_matches(['r', 'R', 'b', 'B', 'u', 'U', 'f', 'F'])
			.starts_with(['"', '\'']);

		if quoted {
			SigdocError::syntax("unterminated string literal", start)
		} else {
			let found = text.chars().next().unwrap_or(' ');
			SigdocError::syntax(format!("unexpected character `{found}`"), start)
		}
	}
}

/// Advance an indentation width across leading whitespace. Tabs move to the
/// next multiple of eight and a form feed resets the count.
fn expand_indent(mut indent: usize, whitespace: &str) -> usize {
	for ch in whitespace.chars() {
		match ch {
			'\t' => indent = (indent / 8 + 1) * 8,
			'\x0C' => indent = 0,
			_ => indent += 1,
		}
	}

	indent
}

/// Split a source unit into logical lines of significant tokens.
pub fn logical_lines(source: &str) -> SigdocResult<Vec<LogicalLine<'_>>> {
	LineWalker::new(source).process()
}
