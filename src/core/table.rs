//! Table data model
//!
//! A [`Table`] is the raw input of a render: an identifier, a name and
//! description, a grid of string cells (rows outer, columns inner) and optional
//! per-row / per-column visibility flags.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cell grid: rows of string cells
pub type Grid = Vec<Vec<String>>;

/// Per-row and per-column visibility flags
///
/// Missing entries count as visible, so an empty `Visibility` shows everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Visibility {
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "flags::deserialize"))]
    pub rows: Vec<bool>,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "flags::deserialize"))]
    pub columns: Vec<bool>,
}

impl Visibility {
    /// All rows and columns visible
    pub fn all_visible(row_count: usize, column_count: usize) -> Self {
        Self {
            rows: vec![true; row_count],
            columns: vec![true; column_count],
        }
    }

    pub fn is_row_visible(&self, index: usize) -> bool {
        self.rows.get(index).copied().unwrap_or(true)
    }

    pub fn is_column_visible(&self, index: usize) -> bool {
        self.columns.get(index).copied().unwrap_or(true)
    }
}

/// A table to be rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Table {
    /// Opaque identifier, only used for hook context and id-specific classes
    #[cfg_attr(feature = "serde", serde(deserialize_with = "ids::deserialize"))]
    pub id: String,
    pub name: String,
    pub description: String,
    pub data: Grid,
    pub visibility: Visibility,
}

impl Table {
    pub fn new(id: impl Into<String>, data: Grid) -> Self {
        Self {
            id: id.into(),
            data,
            ..Default::default()
        }
    }

    /// Builder-style name setter
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn num_rows(&self) -> usize {
        self.data.len()
    }

    /// Width of the widest row
    pub fn num_cols(&self) -> usize {
        self.data.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0 || self.num_cols() == 0
    }

    /// Pad short rows with empty cells so the grid is rectangular
    pub fn make_rectangular(&mut self) {
        let width = self.num_cols();
        for row in &mut self.data {
            row.resize(width, String::new());
        }
    }
}

/// Build a grid from string literals, mostly for tests and examples
pub fn grid<R, C>(rows: R) -> Grid
where
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: Into<String>,
{
    rows.into_iter()
        .map(|row| row.into_iter().map(Into::into).collect())
        .collect()
}

#[cfg(feature = "serde")]
pub(crate) mod ids {
    use serde::{Deserialize, Deserializer};

    /// Table ids arrive as strings or as numbers
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    impl Id {
        fn into_string(self) -> String {
            match self {
                Id::Text(s) => s,
                Id::Int(n) => n.to_string(),
                Id::Float(n) => n.to_string(),
            }
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Id::deserialize(deserializer).map(Id::into_string)
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Id>::deserialize(deserializer)?.map(Id::into_string))
    }
}

#[cfg(feature = "serde")]
mod flags {
    use serde::{Deserialize, Deserializer};

    /// Visibility flags arrive either as booleans or as `0`/`1` integers
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    impl Flag {
        fn is_visible(&self) -> bool {
            match self {
                Flag::Bool(b) => *b,
                Flag::Int(n) => *n != 0,
                Flag::Text(s) => !matches!(s.trim(), "" | "0" | "false"),
            }
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let flags = Vec::<Flag>::deserialize(deserializer)?;
        Ok(flags.iter().map(Flag::is_visible).collect())
    }
}
