use std::collections::BTreeMap;
use std::fmt::Display;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Deserialize;
use serde::Serialize;

use crate::StencilError;
use crate::StencilResult;

/// A slot value supplied at render time.
///
/// Maps are backed by a `BTreeMap`, so two values built from the same
/// key/value pairs are equal and serialize identically no matter the order
/// the keys were inserted in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
	Bool(bool),
	Number(f64),
	String(String),
	List(Vec<Value>),
	Map(BTreeMap<String, Value>),
}

impl Value {
	/// Walk a dotted path (`user.name`, `items.0`) into nested maps and lists.
	pub fn lookup<'a, I>(&self, segments: I) -> Option<&Value>
	where
		I: IntoIterator<Item = &'a str>,
	{
		let mut current = self;
		for segment in segments {
			current = match current {
				Value::Map(map) => map.get(segment)?,
				Value::List(items) => items.get(segment.parse::<usize>().ok()?)?,
				_ => return None,
			};
		}
		Some(current)
	}

	/// False when this value is, or contains, `NaN` or an infinity.
	pub fn is_finite(&self) -> bool {
		match self {
			Value::Number(value) => value.is_finite(),
			Value::List(items) => items.iter().all(Value::is_finite),
			Value::Map(map) => map.values().all(Value::is_finite),
			Value::Bool(_) | Value::String(_) => true,
		}
	}

	/// Returns the nested mapping when this value is a `Map`.
	pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
		match self {
			Value::Map(map) => Some(map),
			_ => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Bool(value) => write!(f, "{value}"),
			Value::Number(value) => write!(f, "{value}"),
			Value::String(value) => f.write_str(value),
			Value::List(items) => {
				for (index, item) in items.iter().enumerate() {
					if index > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				Ok(())
			}
			Value::Map(_) => {
				let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
				f.write_str(&json)
			}
		}
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Number(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Number(value as f64)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Number(f64::from(value))
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(items: Vec<T>) -> Self {
		Value::List(items.into_iter().map(Into::into).collect())
	}
}

impl From<Slots> for Value {
	fn from(slots: Slots) -> Self {
		Value::Map(slots.0)
	}
}

/// Named slot values passed to a render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Deref, DerefMut)]
#[serde(transparent)]
pub struct Slots(BTreeMap<String, Value>);

impl Slots {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insert.
	#[must_use]
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.0.insert(name.into(), value.into());
		self
	}

	/// Parse slots from a JSON object.
	pub fn from_json(input: &str) -> StencilResult<Self> {
		serde_json::from_str(input).map_err(|e| StencilError::InvalidSlots(e.to_string()))
	}

	/// Reject slots holding `NaN` or an infinity anywhere in their values.
	pub fn check_finite(&self) -> StencilResult<()> {
		match self.0.iter().find(|(_, value)| !value.is_finite()) {
			Some((name, _)) => {
				Err(StencilError::InvalidSlots(format!(
					"slot `{name}` contains a number that is not finite"
				)))
			}
			None => Ok(()),
		}
	}

	/// Copy every entry of `other` into `self`, replacing existing keys.
	pub fn extend_from(&mut self, other: &Slots) {
		for (name, value) in other.iter() {
			self.0.insert(name.clone(), value.clone());
		}
	}
}

impl From<BTreeMap<String, Value>> for Slots {
	fn from(map: BTreeMap<String, Value>) -> Self {
		Self(map)
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Slots {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(
			iter.into_iter()
				.map(|(name, value)| (name.into(), value.into()))
				.collect(),
		)
	}
}

/// Canonical render-cache key for a `(template name, slots)` pair.
///
/// The key is the JSON array `[name, slots]`. Every map serializes with its
/// keys in sorted order, so structurally equal inputs always produce the same
/// fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
	/// Fails with [`StencilError::InvalidSlots`] when a slot holds `NaN` or an
	/// infinity, which JSON cannot represent distinctly.
	pub fn new(name: &str, slots: &Slots) -> StencilResult<Self> {
		slots.check_finite()?;
		let canonical = serde_json::to_string(&(name, slots))
			.map_err(|e| StencilError::InvalidSlots(e.to_string()))?;
		Ok(Self(canonical))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for Fingerprint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}
