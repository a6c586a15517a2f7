//! Element implementations built on top of `genpdf` primitives.
//!
//! `genpdf` layouts always stretch to the available width.  The report table has fixed column
//! widths instead, so this module adds a wrapper that narrows the area handed to an element.

use genpdf::error::Error;
use genpdf::style::Style;
use genpdf::{render, Element, Mm, RenderResult};

/// Converts millimetres given as a float into the `genpdf` unit.
pub fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

/// Converts a `genpdf` length into millimetres.
pub fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Renders the wrapped element into an area of at most `width`, starting at the left edge.
///
/// A page narrower than `width` leaves the area untouched.
pub struct FixedWidth<E: Element> {
    element: E,
    width: Mm,
}

impl<E: Element> FixedWidth<E> {
    /// Wraps `element` so that it is rendered `width` wide.
    pub fn new(element: E, width: impl Into<Mm>) -> Self {
        Self {
            element,
            width: width.into(),
        }
    }

    /// Returns the requested width.
    pub fn width(&self) -> Mm {
        self.width
    }
}

impl<E: Element> Element for FixedWidth<E> {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        if area.size().width > self.width {
            area.set_width(self.width);
        }

        self.element.render(context, area, style)
    }
}

#[cfg(test)]
mod tests {
    use super::{mm_from_f64, mm_to_f64, FixedWidth};
    use genpdf::elements::Paragraph;

    #[test]
    fn millimetres_round_trip() {
        assert!((mm_to_f64(mm_from_f64(40.0)) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn keeps_requested_width() {
        let element = FixedWidth::new(Paragraph::new("cell"), mm_from_f64(120.0));

        assert!((mm_to_f64(element.width()) - 120.0).abs() < f64::EPSILON);
    }
}
