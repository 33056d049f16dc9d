use crate::error::{GvizError, GvizResult};
use crate::render::{
    LinePrimitive, MarkerPrimitive, PolylinePrimitive, Primitive, RectPrimitive, TextPrimitive,
};

/// Backend-agnostic scene for one page, sized in points.
///
/// Primitives are kept in emission order, which is also the painting order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<Primitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            primitives: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.push_line(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.push_text(text);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.push_rect(rect);
        self
    }

    pub fn push_line(&mut self, line: LinePrimitive) {
        self.primitives.push(Primitive::Line(line));
    }

    pub fn push_polyline(&mut self, polyline: PolylinePrimitive) {
        self.primitives.push(Primitive::Polyline(polyline));
    }

    pub fn push_rect(&mut self, rect: RectPrimitive) {
        self.primitives.push(Primitive::Rect(rect));
    }

    pub fn push_marker(&mut self, marker: MarkerPrimitive) {
        self.primitives.push(Primitive::Marker(marker));
    }

    pub fn push_text(&mut self, text: TextPrimitive) {
        self.primitives.push(Primitive::Text(text));
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePrimitive> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn polylines(&self) -> impl Iterator<Item = &PolylinePrimitive> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Polyline(polyline) => Some(polyline),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectPrimitive> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Rect(rect) => Some(rect),
            _ => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerPrimitive> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Marker(marker) => Some(marker),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn validate(&self) -> GvizResult<()> {
        if !self.width.is_finite()
            || !self.height.is_finite()
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(GvizError::InvalidPageSize {
                width: self.width,
                height: self.height,
            });
        }

        for primitive in &self.primitives {
            primitive.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::RenderFrame;
    use crate::core::Color;
    use crate::error::GvizError;
    use crate::render::{LinePrimitive, RectPrimitive};

    #[test]
    fn primitives_keep_emission_order() {
        let frame = RenderFrame::new(100.0, 50.0)
            .with_rect(RectPrimitive::new(0.0, 0.0, 10.0, 10.0, Color::WHITE))
            .with_line(LinePrimitive::new(0.0, 0.0, 5.0, 5.0, 1.0, Color::BLACK));

        frame.validate().expect("valid frame");
        assert_eq!(frame.rects().count(), 1);
        assert_eq!(frame.lines().count(), 1);
        assert!(matches!(frame.primitives[0], crate::render::Primitive::Rect(_)));
    }

    #[test]
    fn zero_sized_page_is_rejected() {
        let err = RenderFrame::new(0.0, 50.0).validate().expect_err("empty page");
        assert!(matches!(err, GvizError::InvalidPageSize { .. }));
    }
}
