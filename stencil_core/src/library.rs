use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Deserialize;
use serde::Serialize;

use crate::StencilError;
use crate::StencilResult;
use crate::Template;

/// What to do when a template name is already present in the library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
	/// Fail with [`StencilError::DuplicateTemplate`].
	#[default]
	Error,
	/// Replace the existing template.
	Overwrite,
	/// Keep the existing template and drop the new one.
	Ignore,
}

impl std::fmt::Display for DuplicatePolicy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Error => write!(f, "error"),
			Self::Overwrite => write!(f, "overwrite"),
			Self::Ignore => write!(f, "ignore"),
		}
	}
}

/// Name-keyed template store. Names are listed in first-insertion order, and
/// an overwrite keeps the original position.
#[derive(Debug, Clone, Default)]
pub struct Library {
	templates: HashMap<String, Template>,
	order: Vec<String>,
}

impl Library {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a template, resolving a name collision with `policy`.
	pub fn add(&mut self, template: Template, policy: DuplicatePolicy) -> StencilResult<()> {
		match self.templates.entry(template.name().to_string()) {
			Entry::Vacant(entry) => {
				tracing::debug!(name = template.name(), "adding template");
				self.order.push(entry.key().clone());
				entry.insert(template);
				Ok(())
			}
			Entry::Occupied(mut entry) => {
				match policy {
					DuplicatePolicy::Overwrite => {
						tracing::debug!(name = template.name(), "replacing template");
						entry.insert(template);
						Ok(())
					}
					DuplicatePolicy::Ignore => {
						tracing::debug!(name = template.name(), "ignoring duplicate template");
						Ok(())
					}
					DuplicatePolicy::Error => {
						Err(StencilError::DuplicateTemplate {
							name: entry.key().clone(),
							line: None,
						})
					}
				}
			}
		}
	}

	pub fn get(&self, name: &str) -> StencilResult<&Template> {
		self.templates
			.get(name)
			.ok_or_else(|| StencilError::MissingTemplate {
				name: name.to_string(),
			})
	}

	pub fn contains(&self, name: &str) -> bool {
		self.templates.contains_key(name)
	}

	/// All registered names in first-insertion order.
	pub fn list(&self) -> Vec<String> {
		self.order.clone()
	}

	pub fn len(&self) -> usize {
		self.order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Iterate over the templates in first-insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &Template> {
		self.order
			.iter()
			.filter_map(|name| self.templates.get(name))
	}

	/// Copy every template from `other` into this library. The names are
	/// snapshotted up front and each template is cloned, so later changes to
	/// `other` never leak into `self`. Under [`DuplicatePolicy::Error`] the
	/// first collision aborts the merge; names merged before it stay merged.
	pub fn merge(&mut self, other: &Library, policy: DuplicatePolicy) -> StencilResult<()> {
		for name in other.list() {
			let template = other.get(&name)?.clone();
			self.add(template, policy)?;
		}

		Ok(())
	}
}
