//! Data structures describing the logical content of a report.
//!
//! The types in this module form a plain model of the finished report.  They do not reference
//! the rendering crate directly, so the content of a report can be inspected and compared
//! without producing PDF bytes; [`crate::builder`] turns them into `genpdf` elements.

/// Metadata that controls how text is aligned once it is converted into `genpdf` elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
}

/// A bordered table with a fixed set of columns.
///
/// Column widths are stored in millimetres.  Every row has exactly one value per column.
#[derive(Clone, Debug, PartialEq)]
pub struct TableBlock {
    headers: Vec<String>,
    widths_mm: Vec<f64>,
    rows: Vec<Vec<String>>,
    alignment: HorizontalAlignment,
}

impl TableBlock {
    /// Creates an empty table from `(header, width in mm)` pairs.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let (headers, widths_mm) = columns
            .into_iter()
            .map(|(header, width)| (header.into(), width))
            .unzip();
        Self {
            headers,
            widths_mm,
            rows: Vec::new(),
            alignment: HorizontalAlignment::Left,
        }
    }

    /// Returns the column headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the column widths in millimetres.
    pub fn widths_mm(&self) -> &[f64] {
        &self.widths_mm
    }

    /// Returns the sum of all column widths in millimetres.
    pub fn total_width_mm(&self) -> f64 {
        self.widths_mm.iter().sum()
    }

    /// Returns the body rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the cell alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Sets the cell alignment and returns the updated table.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Appends a row, truncating or padding it with empty cells to the column count.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.headers.len())
            .map(Into::into)
            .collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }
}

/// Individual content blocks that make up sections.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Body text; every line becomes its own wrapped paragraph.
    Text(String),
    /// Bordered table.
    Table(TableBlock),
}

impl Block {
    /// Convenience helper for building a text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Logical representation of a titled document section.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    title: String,
    blocks: Vec<Block>,
}

impl Section {
    /// Creates a new section with the provided title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    /// Returns the title of the section.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the blocks contained in the section.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Appends a block and returns the updated section.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }
}

/// Complete report: running header and footer plus the ordered sections.
///
/// The footer template replaces `{n}` with the one-based page number.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportDocument {
    title: String,
    footer_template: String,
    sections: Vec<Section>,
}

impl ReportDocument {
    /// Creates a report whose running header shows `title`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            footer_template: "Page {n}".to_owned(),
            sections: Vec::new(),
        }
    }

    /// Returns the running header title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the sections in order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the first section with the given title.
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.title == title)
    }

    /// Appends a section and returns the updated report.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Returns the footer template.
    pub fn footer_template(&self) -> &str {
        &self.footer_template
    }
}

/// Substitutes the one-based page number for `{n}` in `template`.
pub fn page_label(template: &str, page: usize) -> String {
    template.replace("{n}", &page.to_string())
}
