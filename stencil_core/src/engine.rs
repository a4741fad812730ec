use std::cell::RefCell;
use std::collections::HashMap;

use crate::DuplicatePolicy;
use crate::Fingerprint;
use crate::Library;
use crate::Slots;
use crate::StencilError;
use crate::StencilResult;
use crate::Template;
use crate::parser::parse_into;

/// Hit and miss counters for the render cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
	/// Renders answered from the cache.
	pub hits: usize,
	/// Renders that invoked the template.
	pub misses: usize,
	/// Number of memoized outputs.
	pub entries: usize,
}

/// Memoized render output keyed by [`Fingerprint`].
///
/// Entries are written once and never evicted or invalidated, so rendering a
/// name again after its template was overwritten returns the output cached
/// for the same slots before the overwrite. Call [`Engine::clear_cache`] to
/// drop everything explicitly.
#[derive(Debug, Default)]
struct RenderCache {
	entries: HashMap<Fingerprint, String>,
	hits: usize,
	misses: usize,
}

impl RenderCache {
	fn get(&mut self, fingerprint: &Fingerprint) -> Option<String> {
		if let Some(content) = self.entries.get(fingerprint) {
			self.hits += 1;
			Some(content.clone())
		} else {
			self.misses += 1;
			None
		}
	}

	/// Store `content` unless the fingerprint is already present, returning
	/// the value that ends up cached.
	fn insert(&mut self, fingerprint: Fingerprint, content: String) -> String {
		self.entries.entry(fingerprint).or_insert(content).clone()
	}

	fn stats(&self) -> CacheStats {
		CacheStats {
			hits: self.hits,
			misses: self.misses,
			entries: self.entries.len(),
		}
	}
}

/// The template engine: one [`Library`] plus one render cache.
///
/// Mutations (`parse`, `add_template`, `merge`) need `&mut self`, so they can
/// never overlap with a render. The cache lives in a `RefCell`, which keeps
/// the engine `!Sync`; share it between threads behind a `Mutex`.
#[derive(Debug, Default)]
pub struct Engine {
	library: Library,
	cache: RefCell<RenderCache>,
}

impl Engine {
	pub fn new() -> Self {
		Self::default()
	}

	/// Create an engine over an existing library.
	pub fn with_library(library: Library) -> Self {
		Self {
			library,
			cache: RefCell::default(),
		}
	}

	pub fn library(&self) -> &Library {
		&self.library
	}

	/// Find every `<%%STARTTEMPLATE name%%>...<%%ENDTEMPLATE name%%>` block in
	/// `input` and add it to the library.
	pub fn parse(&mut self, input: &str, policy: DuplicatePolicy) -> StencilResult<()> {
		parse_into(&mut self.library, input, policy)
	}

	pub fn add_template(&mut self, template: Template, policy: DuplicatePolicy) -> StencilResult<()> {
		self.library.add(template, policy)
	}

	/// Copy all templates of `other` into this engine. The render cache of
	/// `other` is not carried over.
	pub fn merge(&mut self, other: &Engine, policy: DuplicatePolicy) -> StencilResult<()> {
		self.library.merge(&other.library, policy)
	}

	pub fn list_templates(&self) -> Vec<String> {
		self.library.list()
	}

	pub fn get_template(&self, name: &str) -> StencilResult<&Template> {
		self.library.get(name)
	}

	/// Render the template `name` with `slots`.
	///
	/// Output is memoized by the fingerprint of `(name, slots)`: a second call
	/// with equal slots returns the cached string without invoking the
	/// template again.
	pub fn render(&self, name: &str, slots: &Slots) -> StencilResult<String> {
		let mut renderer = Renderer::new(self);
		renderer.render(name, slots)
	}

	pub fn cache_stats(&self) -> CacheStats {
		self.cache.borrow().stats()
	}

	/// Drop all memoized output. Nothing calls this implicitly; library
	/// mutations leave the cache untouched.
	pub fn clear_cache(&self) {
		let mut cache = self.cache.borrow_mut();
		tracing::debug!(entries = cache.entries.len(), "clearing render cache");
		cache.entries.clear();
	}

	fn render_in_chain(
		&self,
		name: &str,
		slots: &Slots,
		renderer: &mut Renderer<'_>,
	) -> StencilResult<String> {
		let template = self.library.get(name)?;

		if renderer.chain.iter().any(|entry| entry == name) {
			let mut chain = renderer.chain.clone();
			chain.push(name.to_string());
			return Err(StencilError::RenderCycle {
				name: name.to_string(),
				chain,
			});
		}

		let fingerprint = Fingerprint::new(name, slots)?;
		let cached = self.cache.borrow_mut().get(&fingerprint);
		if let Some(content) = cached {
			tracing::trace!(name, "render cache hit");
			return Ok(content);
		}

		tracing::trace!(name, depth = renderer.chain.len(), "rendering template");
		renderer.chain.push(name.to_string());
		let result = template.render(slots, renderer);
		renderer.chain.pop();

		let content = result?;
		Ok(self.cache.borrow_mut().insert(fingerprint, content))
	}
}

/// Handle passed to [`Template::render`] for nested template invocations.
///
/// It carries the chain of template names currently being rendered so that a
/// template reached again through its own invocations fails with
/// [`StencilError::RenderCycle`] instead of recursing forever.
#[derive(Debug)]
pub struct Renderer<'engine> {
	engine: &'engine Engine,
	chain: Vec<String>,
}

impl<'engine> Renderer<'engine> {
	pub fn new(engine: &'engine Engine) -> Self {
		Self {
			engine,
			chain: vec![],
		}
	}

	/// Render `name` as part of the current chain.
	pub fn render(&mut self, name: &str, slots: &Slots) -> StencilResult<String> {
		let engine = self.engine;
		engine.render_in_chain(name, slots, self)
	}

	/// Names currently being rendered, outermost first.
	pub fn chain(&self) -> &[String] {
		&self.chain
	}
}
