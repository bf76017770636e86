use std::fmt;

use serde::{Serialize, Serializer};

/// One step of a [`Path`].
///
/// ```
/// # use jeq_core::PathSegment;
/// assert_eq!(PathSegment::property("name").to_string(), ".name");
/// assert_eq!(PathSegment::Index(2).to_string(), "[2]");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Descent into an object property.
    Property(String),
    /// Descent into an array element.
    Index(usize),
}

impl PathSegment {
    /// Creates a property segment.
    #[must_use]
    pub fn property<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self::Property(name.into())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(name) if is_plain_name(name) => write!(f, ".{name}"),
            Self::Property(name) => {
                f.write_str("['")?;
                for ch in name.chars() {
                    if matches!(ch, '\'' | '\\') {
                        f.write_str("\\")?;
                    }
                    write!(f, "{ch}")?;
                }
                f.write_str("']")
            }
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Names that render unambiguously after a dot.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|ch| ch.is_alphanumeric() || matches!(ch, '_' | '-' | '$'))
}

/// Location of a node inside a document, relative to the root `$`.
///
/// Paths are values: extending one returns a new path and leaves the
/// original untouched.
///
/// ```
/// # use jeq_core::Path;
/// let data = Path::root().with_property("data");
/// let name = data.with_index(2).with_property("name");
/// assert_eq!(data.to_string(), "$.data");
/// assert_eq!(name.to_string(), "$.data[2].name");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The document root, rendered as `$`.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path extended by `segment`.
    #[must_use]
    pub fn with_segment(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(segment);
        Self(segments)
    }

    /// Returns a new path descending into property `name`.
    #[must_use]
    pub fn with_property(&self, name: impl Into<String>) -> Self {
        self.with_segment(PathSegment::property(name))
    }

    /// Returns a new path descending into array element `index`.
    #[must_use]
    pub fn with_index(&self, index: usize) -> Self {
        self.with_segment(PathSegment::Index(index))
    }

    /// Indicates whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
