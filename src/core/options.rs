//! Render options
//!
//! [`RenderOptions`] is what a caller asks for. Several flags are tri-state:
//! they are either set explicitly or left [`TriState::Unset`], in which case the
//! value comes from [`SiteDefaults`] when the options are resolved into
//! [`ResolvedOptions`] at the start of a render.

use crate::utils::error::{RenderError, RenderResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A flag that may be left to the site default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    #[default]
    Unset,
    Enabled,
    Disabled,
}

impl TriState {
    /// Resolve against a default
    pub fn resolve(self, default: bool) -> bool {
        match self {
            TriState::Unset => default,
            TriState::Enabled => true,
            TriState::Disabled => false,
        }
    }

    pub fn is_set(self) -> bool {
        self != TriState::Unset
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::Enabled
        } else {
            TriState::Disabled
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        value.map(TriState::from).unwrap_or_default()
    }
}

/// Where the table name or description is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePosition {
    #[default]
    Unset,
    Off,
    Above,
    Below,
}

/// Resolved placement of the name or description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Above,
    Below,
}

impl NamePosition {
    pub fn resolve(self, default: NamePosition) -> Option<Placement> {
        let position = if self == NamePosition::Unset {
            default
        } else {
            self
        };
        match position {
            NamePosition::Above => Some(Placement::Above),
            NamePosition::Below => Some(Placement::Below),
            NamePosition::Off | NamePosition::Unset => None,
        }
    }

    /// Parse `above`, `below`, `off`/`false`, `true` (means above) or `-1`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "above" | "true" => Some(NamePosition::Above),
            "below" => Some(NamePosition::Below),
            "off" | "false" | "no" | "none" => Some(NamePosition::Off),
            "-1" | "unset" | "" => Some(NamePosition::Unset),
            _ => None,
        }
    }
}

/// Flags of the client-side sorting/filtering layer
///
/// The renderer does not act on them; they are carried so that a host can read
/// the complete option set from one place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DataTablesOptions {
    #[cfg_attr(feature = "serde", serde(rename = "datatables_sort"))]
    pub sort: TriState,
    #[cfg_attr(feature = "serde", serde(rename = "datatables_filter"))]
    pub filter: TriState,
    #[cfg_attr(feature = "serde", serde(rename = "datatables_paginate"))]
    pub paginate: TriState,
    #[cfg_attr(feature = "serde", serde(rename = "datatables_lengthchange"))]
    pub lengthchange: TriState,
    #[cfg_attr(feature = "serde", serde(rename = "datatables_paginate_entries"))]
    pub paginate_entries: Option<u32>,
    #[cfg_attr(feature = "serde", serde(rename = "datatables_info"))]
    pub info: TriState,
    #[cfg_attr(feature = "serde", serde(rename = "datatables_scrollx"))]
    pub scrollx: TriState,
    #[cfg_attr(feature = "serde", serde(rename = "datatables_custom_commands"))]
    pub custom_commands: Option<String>,
}

/// Options for a single render
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderOptions {
    /// Overrides the table id used for classes and hook context
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "crate::core::table::ids::deserialize_option")
    )]
    pub id: Option<String>,
    /// Per-column CSS widths, applied to the first rendered row
    pub column_widths: Vec<String>,
    pub alternating_row_colors: TriState,
    pub row_hover: TriState,
    /// Promote the first row to `<thead>`
    pub table_head: TriState,
    /// Render the first column with header cells
    pub first_column_th: bool,
    /// Promote the last row to `<tfoot>`
    pub table_foot: TriState,
    pub print_name: NamePosition,
    pub print_description: NamePosition,
    pub cache_table_output: TriState,
    /// Additional classes for the `<table>` element, space separated
    pub extra_css_classes: String,
    pub use_datatables: TriState,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub datatables: DataTablesOptions,
    /// First row to render, 1-based
    pub row_offset: usize,
    /// Number of rows to render, `None` renders to the end
    pub row_count: Option<usize>,
    /// 1-based rows to show even when hidden
    pub show_rows: Vec<usize>,
    /// 1-based columns to show even when hidden
    pub show_columns: Vec<usize>,
    pub hide_rows: Vec<usize>,
    pub hide_columns: Vec<usize>,
    pub cellspacing: Option<String>,
    pub cellpadding: Option<String>,
    pub border: Option<String>,
    pub html_id: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            id: None,
            column_widths: Vec::new(),
            alternating_row_colors: TriState::Unset,
            row_hover: TriState::Unset,
            table_head: TriState::Unset,
            first_column_th: false,
            table_foot: TriState::Unset,
            print_name: NamePosition::Unset,
            print_description: NamePosition::Unset,
            cache_table_output: TriState::Unset,
            extra_css_classes: String::new(),
            use_datatables: TriState::Unset,
            datatables: DataTablesOptions::default(),
            row_offset: 1,
            row_count: None,
            show_rows: Vec::new(),
            show_columns: Vec::new(),
            hide_rows: Vec::new(),
            hide_columns: Vec::new(),
            cellspacing: None,
            cellpadding: None,
            border: None,
            html_id: "test".to_string(),
        }
    }
}

/// The documented default option set
pub fn default_render_options() -> RenderOptions {
    RenderOptions::default()
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bare table: no head, foot, striping or hover classes
    pub fn plain() -> Self {
        Self {
            table_head: TriState::Disabled,
            table_foot: TriState::Disabled,
            alternating_row_colors: TriState::Disabled,
            row_hover: TriState::Disabled,
            print_name: NamePosition::Off,
            print_description: NamePosition::Off,
            ..Default::default()
        }
    }

    /// Resolve tri-state flags against the site defaults
    pub fn resolve(&self, defaults: &SiteDefaults) -> ResolvedOptions {
        ResolvedOptions {
            table_head: self.table_head.resolve(defaults.table_head),
            table_foot: self.table_foot.resolve(defaults.table_foot),
            first_column_th: self.first_column_th,
            alternating_row_colors: self
                .alternating_row_colors
                .resolve(defaults.alternating_row_colors),
            row_hover: self.row_hover.resolve(defaults.row_hover),
            print_name: self.print_name.resolve(defaults.print_name),
            print_description: self.print_description.resolve(defaults.print_description),
            column_widths: self.column_widths.clone(),
            extra_css_classes: self.extra_css_classes.clone(),
            html_id: self.html_id.clone(),
            row_offset: self.row_offset.max(1),
            row_count: self.row_count,
            show_rows: self.show_rows.clone(),
            show_columns: self.show_columns.clone(),
            hide_rows: self.hide_rows.clone(),
            hide_columns: self.hide_columns.clone(),
            cellspacing: self.cellspacing.clone(),
            cellpadding: self.cellpadding.clone(),
            border: self.border.clone(),
        }
    }
}

/// Values used for options left [`TriState::Unset`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDefaults {
    pub table_head: bool,
    pub table_foot: bool,
    pub alternating_row_colors: bool,
    pub row_hover: bool,
    pub print_name: NamePosition,
    pub print_description: NamePosition,
    pub use_datatables: bool,
    pub cache_table_output: bool,
    pub datatables_paginate_entries: u32,
}

impl Default for SiteDefaults {
    fn default() -> Self {
        Self {
            table_head: true,
            table_foot: false,
            alternating_row_colors: true,
            row_hover: true,
            print_name: NamePosition::Off,
            print_description: NamePosition::Off,
            use_datatables: true,
            cache_table_output: false,
            datatables_paginate_entries: 10,
        }
    }
}

/// Options with every tri-state decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub table_head: bool,
    pub table_foot: bool,
    pub first_column_th: bool,
    pub alternating_row_colors: bool,
    pub row_hover: bool,
    pub print_name: Option<Placement>,
    pub print_description: Option<Placement>,
    pub column_widths: Vec<String>,
    pub extra_css_classes: String,
    pub html_id: String,
    pub row_offset: usize,
    pub row_count: Option<usize>,
    pub show_rows: Vec<usize>,
    pub show_columns: Vec<usize>,
    pub hide_rows: Vec<usize>,
    pub hide_columns: Vec<usize>,
    pub cellspacing: Option<String>,
    pub cellpadding: Option<String>,
    pub border: Option<String>,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        RenderOptions::default().resolve(&SiteDefaults::default())
    }
}

/// Parse a 1-based index list like `1,3-5` or `all`
///
/// `count` is the number of rows or columns `all` expands to; ranges are cut
/// off there as well. Ranges may be given in either order; duplicates are
/// removed and the result is sorted.
pub fn parse_index_list(list: &str, count: usize) -> RenderResult<Vec<usize>> {
    let mut indices = Vec::new();

    for part in list.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if part.eq_ignore_ascii_case("all") {
            indices.extend(1..=count);
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start = parse_index(start)?;
            let end = parse_index(end)?;
            let (low, high) = if start <= end {
                (start, end)
            } else {
                (end, start)
            };
            // rows or columns past the table do not exist
            indices.extend(low..=high.min(count));
        } else {
            indices.push(parse_index(part)?);
        }
    }

    indices.sort_unstable();
    indices.dedup();
    Ok(indices)
}

fn parse_index(value: &str) -> RenderResult<usize> {
    let value = value.trim();
    match value.parse::<usize>() {
        Ok(0) => Err(RenderError::invalid(format!(
            "index list entries are 1-based, got '{}'",
            value
        ))),
        Ok(n) => Ok(n),
        Err(_) => Err(RenderError::invalid(format!(
            "'{}' is not a row or column number",
            value
        ))),
    }
}

#[cfg(feature = "serde")]
impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TriState::Unset => serializer.serialize_i64(-1),
            TriState::Enabled => serializer.serialize_bool(true),
            TriState::Disabled => serializer.serialize_bool(false),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Int(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => TriState::from(b),
            Raw::Int(n) if n < 0 => TriState::Unset,
            Raw::Int(n) => TriState::from(n != 0),
        })
    }
}

#[cfg(feature = "serde")]
impl Serialize for NamePosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NamePosition::Unset => serializer.serialize_i64(-1),
            NamePosition::Off => serializer.serialize_bool(false),
            NamePosition::Above => serializer.serialize_str("above"),
            NamePosition::Below => serializer.serialize_str("below"),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for NamePosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Int(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bool(true) => Ok(NamePosition::Above),
            Raw::Bool(false) => Ok(NamePosition::Off),
            Raw::Int(n) if n < 0 => Ok(NamePosition::Unset),
            Raw::Int(0) => Ok(NamePosition::Off),
            Raw::Int(_) => Ok(NamePosition::Above),
            Raw::Text(s) => NamePosition::parse(&s).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid name position '{}'", s))
            }),
        }
    }
}
