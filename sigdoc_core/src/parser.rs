use std::iter::Peekable;
use std::str::Chars;

use crate::Point;
use crate::SigdocError;
use crate::SigdocResult;
use crate::lexer::logical_lines;
use crate::syntax::Arg;
use crate::syntax::Arguments;
use crate::syntax::ClassDef;
use crate::syntax::Expr;
use crate::syntax::FunctionDef;
use crate::syntax::FunctionKind;
use crate::syntax::ModuleRoot;
use crate::syntax::Stmt;
use crate::tokens::LogicalLine;
use crate::tokens::Token;
use crate::tokens::TokenKind;
use crate::tokens::source_text;

/// Keywords that always open a compound statement.
const COMPOUND_KEYWORDS: [&str; 10] = [
	"if", "elif", "else", "for", "while", "try", "except", "finally", "with", "async",
];

/// Soft keywords that open a compound statement only when the header ends
/// with a colon.
const SOFT_COMPOUND_KEYWORDS: [&str; 2] = ["match", "case"];

/// Parse one source unit into its syntax tree.
pub fn parse(source: &str) -> SigdocResult<ModuleRoot> {
	let source = source.strip_prefix('\u{feff}').unwrap_or(source);
	let lines = logical_lines(source)?;
	let mut parser = Parser { lines, cursor: 0 };
	let body = parser.parse_block(0)?;

	tracing::debug!(statements = body.len(), "parsed source unit");

	Ok(ModuleRoot { body })
}

struct Parser<'a> {
	lines: Vec<LogicalLine<'a>>,
	cursor: usize,
}

impl<'a> Parser<'a> {
	/// Parse consecutive lines at exactly `indent` until a shallower line or
	/// the end of input.
	fn parse_block(&mut self, indent: usize) -> SigdocResult<Vec<Stmt>> {
		let mut body = vec![];
		let mut decorators: Vec<Expr> = vec![];
		let mut last_decorator = Point::default();

		while let Some(line) = self.lines.get(self.cursor) {
			if line.indent < indent {
				break;
			}

			if line.indent > indent {
				return Err(SigdocError::syntax("unexpected indent", line.start()));
			}

			let tokens = line.tokens.clone();
			self.cursor += 1;

			if tokens[0].kind == TokenKind::At {
				last_decorator = tokens[0].start;
				decorators.push(expression(&tokens[1..], tokens[0].start, "decorator")?);
				continue;
			}

			let statements = self.parse_statement(&tokens, indent, std::mem::take(&mut decorators))?;
			body.extend(statements);
		}

		if !decorators.is_empty() {
			return Err(SigdocError::syntax(
				"decorator is not followed by a function or class definition",
				last_decorator,
			));
		}

		Ok(body)
	}

	fn parse_statement(
		&mut self,
		tokens: &[Token<'a>],
		indent: usize,
		decorators: Vec<Expr>,
	) -> SigdocResult<Vec<Stmt>> {
		let first = tokens[0];

		if first.is_keyword("def") {
			return self
				.parse_function(tokens, 1, FunctionKind::Sync, decorators, indent)
				.map(|def| vec![Stmt::FunctionDef(def)]);
		}

		if first.is_keyword("async") && tokens.get(1).is_some_and(|token| token.is_keyword("def")) {
			return self
				.parse_function(tokens, 2, FunctionKind::Async, decorators, indent)
				.map(|def| vec![Stmt::FunctionDef(def)]);
		}

		if first.is_keyword("class") {
			return self
				.parse_class(tokens, decorators, indent)
				.map(|def| vec![Stmt::ClassDef(def)]);
		}

		if !decorators.is_empty() {
			return Err(SigdocError::syntax(
				"decorators must precede a function or class definition",
				first.start,
			));
		}

		if is_compound(tokens) {
			let Some(colon) = find_top_level(tokens, TokenKind::Colon) else {
				return Err(SigdocError::syntax(
					format!("expected `:` after `{}` header", first.text),
					first.start,
				));
			};
			let body = self.parse_suite(&tokens[colon + 1..], indent, tokens[colon].start)?;
			return Ok(vec![Stmt::Other { body }]);
		}

		Ok(simple_statements(tokens))
	}

	/// Parse `def name(params) -> returns: body`. `name_index` points at the
	/// name token.
	fn parse_function(
		&mut self,
		tokens: &[Token<'a>],
		name_index: usize,
		kind: FunctionKind,
		decorator_list: Vec<Expr>,
		indent: usize,
	) -> SigdocResult<FunctionDef> {
		let position = tokens[0].start;
		let name = declaration_name(tokens, name_index, "function")?;
		let mut cursor = skip_type_parameters(tokens, name_index + 1)?;

		let Some(open) = tokens.get(cursor).filter(|token| token.text == "(") else {
			return Err(SigdocError::syntax(
				format!("expected `(` after function name `{name}`"),
				token_or_end(tokens, cursor),
			));
		};
		let close = matching_close(tokens, cursor).ok_or_else(|| {
			SigdocError::syntax("`(` was never closed", open.start)
		})?;
		let args = parse_arguments(&tokens[cursor + 1..close], &name, open.start)?;
		cursor = close + 1;

		let colon = find_top_level(&tokens[cursor..], TokenKind::Colon)
			.map(|offset| cursor + offset)
			.ok_or_else(|| {
				SigdocError::syntax(
					format!("expected `:` after signature of `{name}`"),
					token_or_end(tokens, cursor),
				)
			})?;

		let returns = match tokens.get(cursor) {
			Some(arrow) if arrow.kind == TokenKind::Arrow => {
				Some(expression(&tokens[cursor + 1..colon], arrow.start, "return annotation")?)
			}
			Some(token) if cursor < colon => {
				return Err(SigdocError::syntax(
					format!("unexpected `{}` in signature of `{name}`", token.text),
					token.start,
				));
			}
			_ => None,
		};

		let body = self.parse_suite(&tokens[colon + 1..], indent, tokens[colon].start)?;

		tracing::trace!(name = %name, ?kind, "parsed function definition");

		Ok(FunctionDef {
			kind,
			name,
			args,
			returns,
			body,
			decorator_list,
			position,
		})
	}

	/// Parse `class Name(bases): body`.
	fn parse_class(
		&mut self,
		tokens: &[Token<'a>],
		decorator_list: Vec<Expr>,
		indent: usize,
	) -> SigdocResult<ClassDef> {
		let position = tokens[0].start;
		let name = declaration_name(tokens, 1, "class")?;
		let mut cursor = skip_type_parameters(tokens, 2)?;
		let mut bases = vec![];
		let mut keywords = vec![];

		if let Some(open) = tokens.get(cursor).filter(|token| token.text == "(") {
			let close = matching_close(tokens, cursor).ok_or_else(|| {
				SigdocError::syntax("`(` was never closed", open.start)
			})?;

			for item in split_top_level(&tokens[cursor + 1..close], TokenKind::Comma) {
				let Some(first) = item.first() else {
					continue;
				};
				let is_keyword = first.kind == TokenKind::DoubleStar
					|| (first.kind == TokenKind::Ident
						&& item.get(1).is_some_and(|token| token.kind == TokenKind::Equals));

				if is_keyword {
					keywords.push(Expr::new(source_text(item)));
				} else {
					bases.push(Expr::new(source_text(item)));
				}
			}

			cursor = close + 1;
		}

		match tokens.get(cursor) {
			Some(token) if token.kind == TokenKind::Colon => {}
			_ => {
				return Err(SigdocError::syntax(
					format!("expected `:` after class `{name}`"),
					token_or_end(tokens, cursor),
				));
			}
		}

		let body = self.parse_suite(&tokens[cursor + 1..], indent, tokens[cursor].start)?;

		tracing::trace!(name = %name, bases = bases.len(), "parsed class definition");

		Ok(ClassDef {
			name,
			bases,
			keywords,
			body,
			decorator_list,
			position,
		})
	}

	/// Parse the body after a header colon: either the rest of the line or
	/// an indented block on the following lines.
	fn parse_suite(
		&mut self,
		rest: &[Token<'a>],
		indent: usize,
		colon: Point,
	) -> SigdocResult<Vec<Stmt>> {
		if !rest.is_empty() {
			return Ok(simple_statements(rest));
		}

		let next_indent = self.lines.get(self.cursor).map(|line| line.indent);
		match next_indent {
			Some(nested) if nested > indent => self.parse_block(nested),
			_ => Err(SigdocError::syntax("expected an indented block", colon)),
		}
	}
}

fn is_compound(tokens: &[Token<'_>]) -> bool {
	let first = tokens[0];
	if first.kind != TokenKind::Ident {
		return false;
	}

	if COMPOUND_KEYWORDS.contains(&first.text) {
		return true;
	}

	SOFT_COMPOUND_KEYWORDS.contains(&first.text)
		&& tokens.len() > 1
		&& tokens.last().is_some_and(|token| token.kind == TokenKind::Colon)
}

/// Split a run of `;`-separated simple statements.
fn simple_statements(tokens: &[Token<'_>]) -> Vec<Stmt> {
	split_top_level(tokens, TokenKind::Semicolon)
		.into_iter()
		.filter(|part| !part.is_empty())
		.map(|part| {
			let inner = strip_parentheses(part);
			if !inner.is_empty() && inner.iter().all(|token| token.kind == TokenKind::String) {
				Stmt::Expr(string_expression(inner))
			} else {
				Stmt::Other { body: vec![] }
			}
		})
		.collect()
}

/// Remove parentheses that enclose the whole token run, e.g. `(("doc"))`.
fn strip_parentheses<'t, 'a>(mut tokens: &'t [Token<'a>]) -> &'t [Token<'a>] {
	while tokens.first().is_some_and(|token| token.text == "(")
		&& matching_close(tokens, 0) == Some(tokens.len() - 1)
	{
		tokens = &tokens[1..tokens.len() - 1];
	}

	tokens
}

fn declaration_name(tokens: &[Token<'_>], index: usize, what: &str) -> SigdocResult<String> {
	match tokens.get(index) {
		Some(token) if token.kind == TokenKind::Ident => Ok(token.text.to_string()),
		_ => Err(SigdocError::syntax(
			format!("expected {what} name"),
			token_or_end(tokens, index),
		)),
	}
}

/// Skip a `[T, ...]` type parameter list if one starts at `index`.
fn skip_type_parameters(tokens: &[Token<'_>], index: usize) -> SigdocResult<usize> {
	match tokens.get(index) {
		Some(open) if open.text == "[" => matching_close(tokens, index)
			.map(|close| close + 1)
			.ok_or_else(|| SigdocError::syntax("`[` was never closed", open.start)),
		_ => Ok(index),
	}
}

/// Parse the tokens between the parentheses of a function signature.
fn parse_arguments(tokens: &[Token<'_>], function: &str, open: Point) -> SigdocResult<Arguments> {
	let mut arguments = Arguments::default();
	let mut keyword_only = false;
	let mut seen_default = false;
	let mut seen_kwarg = false;
	let mut seen_slash = false;
	let mut bare_star: Option<Point> = None;
	let items = split_top_level(tokens, TokenKind::Comma);
	let last = items.len().saturating_sub(1);

	for (index, item) in items.into_iter().enumerate() {
		let Some(first) = item.first() else {
			if index == last && index > 0 {
				continue;
			}
			if tokens.is_empty() {
				continue;
			}
			return Err(SigdocError::syntax(
				format!("invalid parameter list for `{function}`"),
				open,
			));
		};

		if seen_kwarg {
			return Err(SigdocError::syntax(
				"parameters cannot follow the keyword collector",
				first.start,
			));
		}

		match first.kind {
			TokenKind::Slash if item.len() == 1 => {
				if seen_slash || keyword_only || arguments.args.is_empty() {
					return Err(SigdocError::syntax("misplaced `/`", first.start));
				}
				seen_slash = true;
				arguments.posonlyargs = std::mem::take(&mut arguments.args);
			}
			TokenKind::Star => {
				if keyword_only {
					return Err(SigdocError::syntax("`*` may appear only once", first.start));
				}
				keyword_only = true;
				if item.len() > 1 {
					arguments.vararg = Some(variadic(&item[1..], first.start)?);
				} else {
					bare_star = Some(first.start);
				}
			}
			TokenKind::DoubleStar => {
				if let Some(star) = bare_star {
					return Err(bare_star_error(star));
				}
				seen_kwarg = true;
				arguments.kwarg = Some(variadic(&item[1..], first.start)?);
			}
			_ => {
				let (arg, default) = parameter(item)?;
				if keyword_only {
					bare_star = None;
					arguments.kwonlyargs.push(arg);
					arguments.kw_defaults.push(default);
				} else {
					match default {
						Some(default) => {
							seen_default = true;
							arguments.defaults.push(default);
						}
						None if seen_default => {
							return Err(SigdocError::syntax(
								format!(
									"parameter `{}` without a default follows a parameter with a \
									 default",
									arg.name
								),
								first.start,
							));
						}
						None => {}
					}
					arguments.args.push(arg);
				}
			}
		}
	}

	if let Some(star) = bare_star {
		return Err(bare_star_error(star));
	}

	Ok(arguments)
}

fn bare_star_error(star: Point) -> SigdocError {
	SigdocError::syntax("named parameters must follow a bare `*`", star)
}

/// Parse `name[: annotation][= default]`.
fn parameter(item: &[Token<'_>]) -> SigdocResult<(Arg, Option<Expr>)> {
	let first = item[0];
	if first.kind != TokenKind::Ident {
		return Err(SigdocError::syntax(
			format!("unexpected `{}` in parameter list", first.text),
			first.start,
		));
	}

	let rest = &item[1..];
	let equals = find_top_level(rest, TokenKind::Equals);
	let (annotated, default) = match equals {
		Some(index) => (&rest[..index], Some(&rest[index + 1..])),
		None => (rest, None),
	};

	let annotation = match annotated.split_first() {
		None => None,
		Some((colon, annotation)) if colon.kind == TokenKind::Colon => {
			Some(expression(annotation, colon.start, "annotation")?)
		}
		Some((token, _)) => {
			return Err(SigdocError::syntax(
				format!("unexpected `{}` after parameter `{}`", token.text, first.text),
				token.start,
			));
		}
	};

	let default = match default {
		Some(tokens) => Some(expression(tokens, first.start, "default value")?),
		None => None,
	};

	Ok((
		Arg {
			name: first.text.to_string(),
			annotation,
		},
		default,
	))
}

/// Parse the `name[: annotation]` after a `*` or `**`.
fn variadic(item: &[Token<'_>], marker: Point) -> SigdocResult<Arg> {
	let (arg, default) = match item.first() {
		Some(_) => parameter(item)?,
		None => {
			return Err(SigdocError::syntax("expected a parameter name", marker));
		}
	};

	if default.is_some() {
		return Err(SigdocError::syntax(
			format!("variadic parameter `{}` cannot have a default", arg.name),
			marker,
		));
	}

	Ok(arg)
}

/// Build an expression from a non-empty token run.
fn expression(tokens: &[Token<'_>], at: Point, what: &str) -> SigdocResult<Expr> {
	if tokens.is_empty() {
		return Err(SigdocError::syntax(format!("expected {what}"), at));
	}

	if tokens.iter().all(|token| token.kind == TokenKind::String) {
		return Ok(string_expression(tokens));
	}

	Ok(Expr::new(source_text(tokens)))
}

/// Build an expression from adjacent string literal tokens, decoding the
/// value when every part is a plain (non-bytes, non-format) string.
fn string_expression(tokens: &[Token<'_>]) -> Expr {
	let text = source_text(tokens);
	let value: Option<String> = tokens.iter().map(|token| decode_string(token.text)).collect();

	Expr {
		text,
		string_value: value,
	}
}

/// Decode the value of a single string literal token. Returns `None` for
/// bytes and format strings, which are not string constants.
fn decode_string(literal: &str) -> Option<String> {
	let prefix_len = literal.find(['"', '\''])?;
	let (prefix, quoted) = literal.split_at(prefix_len);
	let prefix = prefix.to_ascii_lowercase();

	if prefix.contains('b') || prefix.contains('f') {
		return None;
	}

	let quote_len = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
		3
	} else {
		1
	};
	let body = quoted.get(quote_len..quoted.len().saturating_sub(quote_len))?;

	if prefix.contains('r') || !body.contains('\\') {
		return Some(body.to_string());
	}

	Some(unescape_body(body))
}

/// Resolve backslash escapes in a string body. Unrecognised escapes, and
/// `\N{...}` character names, are kept verbatim.
fn unescape_body(body: &str) -> String {
	let mut value = String::with_capacity(body.len());
	let mut chars = body.chars().peekable();

	while let Some(ch) = chars.next() {
		if ch != '\\' {
			value.push(ch);
			continue;
		}

		let Some(escape) = chars.next() else {
			value.push('\\');
			break;
		};

		match escape {
			'\n' => {}
			'\r' => {
				chars.next_if_eq(&'\n');
			}
			'\\' | '\'' | '"' => value.push(escape),
			'a' => value.push('\x07'),
			'b' => value.push('\x08'),
			'f' => value.push('\x0C'),
			'n' => value.push('\n'),
			'r' => value.push('\r'),
			't' => value.push('\t'),
			'v' => value.push('\x0B'),
			'0'..='7' => {
				let mut code = escape.to_digit(8).unwrap_or_default();
				for _ in 0..2 {
					let Some(digit) = chars.next_if(|next| next.is_digit(8)) else {
						break;
					};
					code = code * 8 + digit.to_digit(8).unwrap_or_default();
				}
				value.extend(char::from_u32(code));
			}
			'x' => push_hex_escape(&mut value, &mut chars, escape, 2),
			'u' => push_hex_escape(&mut value, &mut chars, escape, 4),
			'U' => push_hex_escape(&mut value, &mut chars, escape, 8),
			other => {
				value.push('\\');
				value.push(other);
			}
		}
	}

	value
}

/// Decode a `\x`, `\u` or `\U` escape of exactly `width` hex digits. A
/// short or out-of-range escape is kept as written.
fn push_hex_escape(
	value: &mut String,
	chars: &mut Peekable<Chars<'_>>,
	escape: char,
	width: usize,
) {
	let mut digits = String::with_capacity(width);
	while digits.len() < width {
		let Some(digit) = chars.next_if(char::is_ascii_hexdigit) else {
			break;
		};
		digits.push(digit);
	}

	let decoded = (digits.len() == width)
		.then(|| u32::from_str_radix(&digits, 16).ok())
		.flatten()
		.and_then(char::from_u32);

	match decoded {
		Some(ch) => value.push(ch),
		None => {
			value.push('\\');
			value.push(escape);
			value.push_str(&digits);
		}
	}
}

/// Index of the bracket closing the one opened at `open`.
fn matching_close(tokens: &[Token<'_>], open: usize) -> Option<usize> {
	let mut depth = 0usize;

	for (index, token) in tokens.iter().enumerate().skip(open) {
		match token.kind {
			TokenKind::Open => depth += 1,
			TokenKind::Close => {
				depth -= 1;
				if depth == 0 {
					return Some(index);
				}
			}
			_ => {}
		}
	}

	None
}

/// Index of the first token of `kind` outside any brackets.
fn find_top_level(tokens: &[Token<'_>], kind: TokenKind) -> Option<usize> {
	let mut depth = 0usize;

	for (index, token) in tokens.iter().enumerate() {
		match token.kind {
			TokenKind::Open => depth += 1,
			TokenKind::Close => depth = depth.saturating_sub(1),
			found if found == kind && depth == 0 => return Some(index),
			_ => {}
		}
	}

	None
}

/// Split at every `separator` outside brackets. A trailing separator yields
/// a final empty part. Commas between a `lambda` and its `:` belong to the
/// lambda's own parameter list and never split.
fn split_top_level<'t, 'a>(tokens: &'t [Token<'a>], separator: TokenKind) -> Vec<&'t [Token<'a>]> {
	let mut parts = vec![];
	let mut depth = 0usize;
	let mut open_lambdas = 0usize;
	let mut start = 0;

	for (index, token) in tokens.iter().enumerate() {
		match token.kind {
			TokenKind::Open => depth += 1,
			TokenKind::Close => depth = depth.saturating_sub(1),
			TokenKind::Ident if depth == 0 && token.text == "lambda" => open_lambdas += 1,
			TokenKind::Colon if depth == 0 && open_lambdas > 0 => open_lambdas -= 1,
			TokenKind::Comma if depth == 0 && open_lambdas > 0 => {}
			found if found == separator && depth == 0 => {
				parts.push(&tokens[start..index]);
				start = index + 1;
			}
			_ => {}
		}
	}

	parts.push(&tokens[start..]);
	parts
}

fn token_or_end(tokens: &[Token<'_>], index: usize) -> Point {
	tokens
		.get(index)
		.or_else(|| tokens.last())
		.map(|token| token.start)
		.unwrap_or_default()
}
