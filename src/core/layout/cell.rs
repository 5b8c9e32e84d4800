//! Row and cell descriptors produced by the layout engine

/// Element used for a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellTag {
    #[default]
    Data,
    Header,
}

impl CellTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellTag::Data => "td",
            CellTag::Header => "th",
        }
    }
}

/// A cell ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellDescriptor {
    /// Sanitized content
    pub content: String,
    pub tag: CellTag,
    /// Number of columns this cell spans
    pub colspan: usize,
    /// Number of rows this cell spans
    pub rowspan: usize,
    pub class: String,
    /// Inline style, only set on the first row when a column width is given
    pub style: Option<String>,
}

impl CellDescriptor {
    pub fn new(content: impl Into<String>) -> Self {
        CellDescriptor {
            content: content.into(),
            tag: CellTag::Data,
            colspan: 1,
            rowspan: 1,
            class: String::new(),
            style: None,
        }
    }

    pub fn to_html(&self) -> String {
        let tag = self.tag.as_str();
        let mut html = format!("<{}", tag);
        if self.colspan > 1 {
            html.push_str(&format!(" colspan=\"{}\"", self.colspan));
        }
        if self.rowspan > 1 {
            html.push_str(&format!(" rowspan=\"{}\"", self.rowspan));
        }
        if !self.class.is_empty() {
            html.push_str(&format!(" class=\"{}\"", self.class));
        }
        if let Some(style) = &self.style {
            html.push_str(&format!(" style=\"{}\"", style));
        }
        html.push('>');
        html.push_str(&self.content);
        html.push_str(&format!("</{}>", tag));
        html
    }
}

/// Part of the table a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSection {
    Header,
    Body,
    Footer,
}

/// A row with the cells that survived merging, left to right
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDescriptor {
    /// 1-based position in the filtered grid
    pub index: usize,
    pub section: RowSection,
    pub class: String,
    pub cells: Vec<CellDescriptor>,
}

impl RowDescriptor {
    pub fn to_html(&self) -> String {
        let class = if self.class.is_empty() {
            String::new()
        } else {
            format!(" class=\"{}\"", self.class)
        };
        let cells: Vec<String> = self.cells.iter().map(CellDescriptor::to_html).collect();
        format!("\t<tr{}>\n\t\t{}\n\t</tr>\n", class, cells.join("\n\t\t"))
    }
}

/// `<caption>` content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub text: String,
    pub class: String,
}

/// `<col>` attribute strings, one per column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGroup {
    pub columns: Vec<String>,
}

/// Everything the emitter writes between `<table>` and `</table>`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableLayout {
    pub header: Option<RowDescriptor>,
    pub footer: Option<RowDescriptor>,
    pub body: Vec<RowDescriptor>,
    pub caption: Option<Caption>,
    pub colgroup: Option<ColumnGroup>,
}

impl TableLayout {
    /// All rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &RowDescriptor> {
        self.header
            .iter()
            .chain(self.body.iter())
            .chain(self.footer.iter())
    }
}
