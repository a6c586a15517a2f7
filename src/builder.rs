//! Conversion of a [`ReportDocument`] into PDF bytes.

use std::cell::Cell;
use std::rc::Rc;

use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::error::{Error, ErrorKind};
use genpdf::style::Style;
use genpdf::{self, Alignment, Element, Margins, Mm, PageDecorator, PaperSize, Position};
use log::{debug, info};

use crate::elements::{mm_from_f64, FixedWidth};
use crate::error::ReportError;
use crate::fonts;
use crate::model::{page_label, Block, HorizontalAlignment, ReportDocument, Section, TableBlock};

const PAGE_MARGIN_MM: f64 = 10.0;
const BODY_FONT_SIZE: u8 = 12;
const HEADER_FONT_SIZE: u8 = 16;
const SECTION_TITLE_FONT_SIZE: u8 = 14;
const FOOTER_FONT_SIZE: u8 = 8;
const HEADER_GAP_MM: f64 = 5.0;
const FOOTER_HEIGHT_MM: f64 = 15.0;
const SECTION_GAP_MM: f64 = 5.0;
const CELL_PADDING_MM: f64 = 2.0;

/// Draws the report title and the page label on every page.
///
/// The number of decorated pages is shared through `pages` so the caller can read it back after
/// the document has been consumed by rendering.
struct RunningDecorator {
    title: String,
    footer_template: String,
    margins: Margins,
    footer_height: Mm,
    pages: Rc<Cell<usize>>,
}

impl PageDecorator for RunningDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        let page = self.pages.get() + 1;
        self.pages.set(page);
        debug!("Decorating page {}", page);

        area.add_margins(self.margins);

        let result = header_element(&self.title).render(context, area.clone(), style)?;
        area.add_offset(Position::new(0, result.size.height));

        let available = area.size().height;
        if self.footer_height > available {
            return Err(Error::new(
                "Footer height exceeds available space",
                ErrorKind::InvalidData,
            ));
        }

        let mut footer_area = area.clone();
        footer_area.add_offset(Position::new(0, available - self.footer_height));
        let mut footer = footer_element(page_label(&self.footer_template, page));
        if footer.render(context, footer_area, style)?.has_more {
            return Err(Error::new(
                "Footer does not fit into the reserved space",
                ErrorKind::PageSizeExceeded,
            ));
        }

        area.set_height(available - self.footer_height);
        Ok(area)
    }
}

/// PDF output of a rendered report.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    /// Number of pages that received the running header and footer.
    pub pages: usize,
}

impl From<HorizontalAlignment> for Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => Alignment::Left,
            HorizontalAlignment::Center => Alignment::Center,
            HorizontalAlignment::Right => Alignment::Right,
        }
    }
}

fn gap_below(bottom_mm: f64) -> Margins {
    Margins::trbl(0, 0, mm_from_f64(bottom_mm), 0)
}

fn header_element(title: &str) -> impl Element {
    Paragraph::new(title)
        .aligned(Alignment::Center)
        .styled(Style::new().bold().with_font_size(HEADER_FONT_SIZE))
        .padded(gap_below(HEADER_GAP_MM))
}

fn footer_element(text: String) -> impl Element {
    Paragraph::new(text)
        .aligned(Alignment::Center)
        .styled(Style::new().italic().with_font_size(FOOTER_FONT_SIZE))
}

fn table_cell(text: &str, alignment: Alignment) -> impl Element {
    Paragraph::new(text)
        .aligned(alignment)
        .padded(Margins::all(mm_from_f64(CELL_PADDING_MM)))
}

fn table_element(table: &TableBlock) -> Result<impl Element, Error> {
    let weights = table
        .widths_mm()
        .iter()
        .map(|width| width.round().max(1.0) as usize)
        .collect();
    let alignment = Alignment::from(table.alignment());

    let mut layout = TableLayout::new(weights);
    layout.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let mut header_row = layout.row();
    for header in table.headers() {
        header_row.push_element(table_cell(header, alignment).styled(Style::new().bold()));
    }
    header_row.push()?;

    for row in table.rows() {
        let mut table_row = layout.row();
        for cell in row {
            table_row.push_element(table_cell(cell, alignment));
        }
        table_row.push()?;
    }

    Ok(FixedWidth::new(layout, mm_from_f64(table.total_width_mm())))
}

fn push_section(document: &mut genpdf::Document, section: &Section) -> Result<(), Error> {
    document.push(
        Paragraph::new(section.title())
            .styled(Style::new().bold().with_font_size(SECTION_TITLE_FONT_SIZE))
            .padded(gap_below(SECTION_GAP_MM)),
    );

    for block in section.blocks() {
        match block {
            Block::Text(text) => {
                for line in text.lines() {
                    document.push(Paragraph::new(line));
                }
                document.push(Break::new(0).padded(gap_below(SECTION_GAP_MM)));
            }
            Block::Table(table) => {
                document.push(table_element(table)?.padded(gap_below(SECTION_GAP_MM)));
            }
        }
    }

    Ok(())
}

/// Renders the report into PDF bytes, entirely in memory.
///
/// Fails with [`ReportError::FontLoad`] when no font family is available and with
/// [`ReportError::Render`] for layout failures.
pub fn render_report(report: &ReportDocument) -> Result<RenderedPdf, ReportError> {
    let font_family = fonts::default_font_family().map_err(ReportError::FontLoad)?;
    let mut document = genpdf::Document::new(font_family);
    document.set_title(report.title());
    document.set_paper_size(PaperSize::A4);
    document.set_font_size(BODY_FONT_SIZE);

    let pages = Rc::new(Cell::new(0));
    document.set_page_decorator(RunningDecorator {
        title: report.title().to_owned(),
        footer_template: report.footer_template().to_owned(),
        margins: Margins::all(mm_from_f64(PAGE_MARGIN_MM)),
        footer_height: mm_from_f64(FOOTER_HEIGHT_MM),
        pages: Rc::clone(&pages),
    });

    for section in report.sections() {
        push_section(&mut document, section).map_err(ReportError::Render)?;
    }

    let mut bytes = Vec::new();
    document.render(&mut bytes).map_err(ReportError::Render)?;
    info!("Rendered report to {} bytes on {} page(s)", bytes.len(), pages.get());

    Ok(RenderedPdf {
        bytes,
        pages: pages.get(),
    })
}
