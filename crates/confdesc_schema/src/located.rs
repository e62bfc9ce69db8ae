use std::ops::Deref;
use std::ops::Range;
use std::sync::Arc;

use serde::Deserialize;

use crate::ConflictLocation;
use crate::SourceInfo;

/// A schema value together with where it was written.
///
/// Deserialization only knows the byte span (via `toml::Spanned<T>`); the file
/// the value came from is attached afterwards by [`crate::SchemaDocument::from_file`].
#[derive(Debug, Clone)]
pub struct Located<T> {
    value: T,
    span: Range<usize>,
    source: Option<Arc<SourceInfo>>,
}

impl<T> Located<T> {
    pub fn new(value: T, span: Range<usize>, source: Option<Arc<SourceInfo>>) -> Self {
        Self {
            value,
            span,
            source,
        }
    }

    /// A value with no location, for schemas assembled in code.
    pub fn detached(value: T) -> Self {
        Self::new(value, 0..0, None)
    }

    pub fn get_ref(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    /// Byte span in the source file
    pub fn span(&self) -> &Range<usize> {
        &self.span
    }

    pub fn source(&self) -> Option<&Arc<SourceInfo>> {
        self.source.as_ref()
    }

    pub fn map<U, F>(self, f: F) -> Located<U>
    where
        F: FnOnce(T) -> U,
    {
        Located {
            value: f(self.value),
            span: self.span,
            source: self.source,
        }
    }

    pub(crate) fn attach(&mut self, source: &Arc<SourceInfo>) {
        self.source = Some(Arc::clone(source));
    }

    /// Location of this value for a duplicate-definition report
    pub fn to_conflict_location(&self) -> ConflictLocation {
        ConflictLocation {
            span: self.span.clone(),
            source: self.source.clone(),
        }
    }
}

impl<T> Deref for Located<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<'de, T> Deserialize<'de> for Located<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let spanned = toml::Spanned::<T>::deserialize(deserializer)?;
        let span = spanned.span().clone();

        Ok(Located {
            value: spanned.into_inner(),
            span,
            source: None,
        })
    }
}

impl<T: PartialEq> PartialEq for Located<T> {
    fn eq(&self, other: &Self) -> bool {
        // Location is not part of a value's identity
        self.value == other.value
    }
}

impl<T: Eq> Eq for Located<T> {}
