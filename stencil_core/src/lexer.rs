use std::ops::Range;

use logos::Logos;

use crate::is_valid_name;
use crate::tokens::Segment;

/// Raw tokens produced by logos for flat tokenization of a template body.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum RawToken {
	#[token("{{>")]
	IncludeOpen,
	#[token("{{")]
	SlotOpen,
	#[token("}}")]
	TagClose,
	#[token("{")]
	#[token("}")]
	Brace,
	#[regex(r"[^{}]+")]
	Text,
}

/// Walks the logos token stream and builds the body segments. Anything that
/// is not a well formed tag is kept as literal text.
struct SegmentWalker<'a> {
	source: &'a str,
	raw_tokens: Vec<(Result<RawToken, ()>, Range<usize>)>,
	cursor: usize,
	text: String,
	segments: Vec<Segment>,
}

impl<'a> SegmentWalker<'a> {
	fn new(source: &'a str) -> Self {
		let raw_tokens: Vec<_> = RawToken::lexer(source).spanned().collect();

		Self {
			source,
			raw_tokens,
			cursor: 0,
			text: String::new(),
			segments: vec![],
		}
	}

	fn slice(&self, index: usize) -> &'a str {
		let (_, span) = &self.raw_tokens[index];
		&self.source[span.clone()]
	}

	fn kind(&self, index: usize) -> Option<RawToken> {
		self.raw_tokens[index].0.ok()
	}

	fn push_text(&mut self, text: &str) {
		self.text.push_str(text);
	}

	fn push_segment(&mut self, segment: Segment) {
		if !self.text.is_empty() {
			let text = std::mem::take(&mut self.text);
			self.segments.push(Segment::Text(text));
		}
		self.segments.push(segment);
	}

	/// Find the closing `}}` for the tag opened at `open`. Only plain text may
	/// appear between the two.
	fn find_close(&self, open: usize) -> Option<usize> {
		for index in open + 1..self.raw_tokens.len() {
			match self.kind(index) {
				Some(RawToken::TagClose) => return Some(index),
				Some(RawToken::Text) => {}
				_ => return None,
			}
		}
		None
	}

	fn inner_text(&self, open: usize, close: usize) -> String {
		(open + 1..close).map(|index| self.slice(index)).collect()
	}

	fn walk(mut self) -> Vec<Segment> {
		while self.cursor < self.raw_tokens.len() {
			let open = self.cursor;
			let kind = self.kind(open);

			let segment = match kind {
				Some(RawToken::SlotOpen | RawToken::IncludeOpen) => {
					self.find_close(open).and_then(|close| {
						let inner = self.inner_text(open, close);
						let segment = if kind == Some(RawToken::SlotOpen) {
							slot_segment(&inner)
						} else {
							include_segment(&inner)
						};
						segment.map(|segment| (segment, close))
					})
				}
				_ => None,
			};

			if let Some((segment, close)) = segment {
				self.push_segment(segment);
				self.cursor = close + 1;
			} else {
				let text = self.slice(open);
				self.push_text(text);
				self.cursor += 1;
			}
		}

		if !self.text.is_empty() {
			self.segments.push(Segment::Text(self.text));
		}

		self.segments
	}
}

fn is_valid_path(path: &str) -> bool {
	!path.is_empty()
		&& path.split('.').all(|segment| {
			!segment.is_empty()
				&& segment
					.chars()
					.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
		})
}

fn slot_segment(inner: &str) -> Option<Segment> {
	let path = inner.trim();
	is_valid_path(path).then(|| Segment::Slot(path.to_string()))
}

fn include_segment(inner: &str) -> Option<Segment> {
	let mut words = inner.split_whitespace();
	let name = words.next().filter(|name| is_valid_name(name))?;
	let scope = match words.next() {
		Some(scope) if is_valid_path(scope) => Some(scope.to_string()),
		Some(_) => return None,
		None => None,
	};

	if words.next().is_some() {
		return None;
	}

	Some(Segment::Include {
		name: name.to_string(),
		scope,
	})
}

/// Split a template body into literal text, slot and include segments.
pub(crate) fn tokenize(body: &str) -> Vec<Segment> {
	SegmentWalker::new(body).walk()
}
