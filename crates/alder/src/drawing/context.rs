use alder_geom::{Point, Rect, Vector};

use super::{Brush, Font, Image, Pen};
use crate::drawing::Color;

/// The paint surface a control draws into.
///
/// Implemented by rendering backends; the core only issues calls. The
/// coordinate space is the control's client space; containers shift it for
/// children with [`DrawContext::push_offset`] / [`DrawContext::pop_offset`].
pub trait DrawContext {
    /// Fill a rectangle with a brush.
    fn fill_rect(&mut self, brush: &Brush, rect: Rect);

    /// Stroke a rectangle outline with a pen.
    fn draw_rect(&mut self, pen: &Pen, rect: Rect);

    /// Stroke a line segment with a pen.
    fn draw_line(&mut self, pen: &Pen, from: Point, to: Point);

    /// Draw a text run at a baseline origin.
    fn draw_text(&mut self, font: &Font, color: Color, origin: Point, text: &str);

    /// Draw an image with its top-left corner at `origin`, at the image's
    /// own size.
    fn draw_image(&mut self, image: &Image, origin: Point);

    /// Shift the coordinate space for a child control.
    fn push_offset(&mut self, offset: Vector);

    /// Undo the most recent [`DrawContext::push_offset`].
    fn pop_offset(&mut self);
}
