//! Test support: a paint surface that records draw calls.

use alder_geom::{Point, Rect, Vector};

use crate::drawing::{Brush, Color, DrawContext, Font, Image, Pen};

/// Install a subscriber that routes trace output through the test harness,
/// so `--nocapture` shows handler and widget tracing. Callable from every
/// test; only the first call installs.
#[cfg(test)]
pub(crate) fn init_tracing() {
    let format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(false)
        .without_time()
        .compact();
    let _ = tracing_subscriber::fmt()
        .event_format(format)
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Format a color as a hex triple for recorded operations.
fn fmt_color(c: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// Format a brush briefly for recorded operations.
fn fmt_brush(b: &Brush) -> String {
    match b {
        Brush::Solid(c) => fmt_color(*c),
        Brush::LinearGradient { .. } => "linear".into(),
        Brush::RadialGradient { .. } => "radial".into(),
    }
}

/// A [`DrawContext`] that records every operation as a line of text, with
/// offsets already applied. Render tests assert on the recorded lines.
#[derive(Default)]
pub struct RecordingSurface {
    /// Recorded operations, in call order.
    ops: Vec<String>,
    /// The offset stack.
    offsets: Vec<Vector>,
}

impl RecordingSurface {
    /// Construct an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded operations.
    pub fn ops(&self) -> &[String] {
        &self.ops
    }

    /// True if any recorded operation contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.ops.iter().any(|op| op.contains(needle))
    }

    /// The current accumulated offset.
    fn offset(&self) -> Vector {
        self.offsets
            .iter()
            .fold(Vector::new(0.0, 0.0), |acc, v| acc + *v)
    }

    /// Shift a rect by the current offset.
    fn place(&self, rect: Rect) -> Rect {
        rect.translate(self.offset())
    }

    /// Shift a point by the current offset.
    fn place_point(&self, p: Point) -> Point {
        p + self.offset()
    }

    /// Record one operation.
    fn record(&mut self, op: String) {
        self.ops.push(op);
    }
}

impl DrawContext for RecordingSurface {
    fn fill_rect(&mut self, brush: &Brush, rect: Rect) {
        let r = self.place(rect);
        self.record(format!(
            "fill {},{} {}x{} {}",
            r.origin.x,
            r.origin.y,
            r.size.w,
            r.size.h,
            fmt_brush(brush)
        ));
    }

    fn draw_rect(&mut self, pen: &Pen, rect: Rect) {
        let r = self.place(rect);
        self.record(format!(
            "rect {},{} {}x{} {}",
            r.origin.x,
            r.origin.y,
            r.size.w,
            r.size.h,
            fmt_color(pen.color)
        ));
    }

    fn draw_line(&mut self, pen: &Pen, from: Point, to: Point) {
        let (a, b) = (self.place_point(from), self.place_point(to));
        self.record(format!(
            "line {},{} {},{} {}",
            a.x,
            a.y,
            b.x,
            b.y,
            fmt_color(pen.color)
        ));
    }

    fn draw_text(&mut self, _font: &Font, color: Color, origin: Point, text: &str) {
        let p = self.place_point(origin);
        self.record(format!("text {},{} {} '{text}'", p.x, p.y, fmt_color(color)));
    }

    fn draw_image(&mut self, image: &Image, origin: Point) {
        let p = self.place_point(origin);
        self.record(format!(
            "image {},{} {}x{}",
            p.x, p.y, image.size.w, image.size.h
        ));
    }

    fn push_offset(&mut self, offset: Vector) {
        self.offsets.push(offset);
    }

    fn pop_offset(&mut self) {
        self.offsets.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_accumulate() {
        let mut s = RecordingSurface::new();
        s.push_offset(Vector::new(10.0, 0.0));
        s.push_offset(Vector::new(0.0, 5.0));
        s.fill_rect(&Brush::solid(Color::RED), Rect::new(1.0, 1.0, 2.0, 2.0));
        s.pop_offset();
        s.fill_rect(&Brush::solid(Color::RED), Rect::new(1.0, 1.0, 2.0, 2.0));
        assert_eq!(
            s.ops(),
            [
                "fill 11,6 2x2 #ff0000".to_string(),
                "fill 11,1 2x2 #ff0000".to_string(),
            ]
        );
    }
}
