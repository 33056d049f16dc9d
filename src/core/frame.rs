//! Nested reference frames with inherited parameter environments.
//!
//! Frames live in an arena and point upward to their parent. Each frame maps
//! its own coordinate system onto a placement expressed in the parent's
//! coordinates, so composing local transforms up to the root yields device
//! coordinates. Parameter lookups fall back along the same chain.

use serde::{Deserialize, Serialize};

use crate::core::params::{ParamValue, Params};
use crate::core::style::{Color, Font};
use crate::error::{GvizError, GvizResult};

/// Closed interval `start..end` on one axis; `end < start` is allowed and
/// expresses an axis that runs the other way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn min(self) -> f64 {
        self.start.min(self.end)
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.start.max(self.end)
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min() && value <= self.max()
    }

    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        value.clamp(self.min(), self.max())
    }

    pub fn validate(self) -> GvizResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() || self.start == self.end {
            return Err(GvizError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Two-dimensional extent: a coordinate system or a placement rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub x: Span,
    pub y: Span,
}

impl Extent {
    #[must_use]
    pub const fn new(x: Span, y: Span) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn from_bounds(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        Self::new(Span::new(x0, x1), Span::new(y0, y1))
    }

    pub fn validate(self) -> GvizResult<()> {
        self.x.validate()?;
        self.y.validate()
    }
}

/// Axis-aligned scale plus translation: `(x, y) -> (sx * x + tx, sy * y + ty)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Affine {
    pub const IDENTITY: Self = Self {
        sx: 1.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Transform taking `from` onto `to` component-wise.
    pub fn between(from: Extent, to: Extent) -> GvizResult<Self> {
        from.validate()?;
        if !to.x.start.is_finite()
            || !to.x.end.is_finite()
            || !to.y.start.is_finite()
            || !to.y.end.is_finite()
        {
            return Err(GvizError::InvalidData(
                "frame placement must be finite".to_owned(),
            ));
        }

        let sx = to.x.length() / from.x.length();
        let sy = to.y.length() / from.y.length();
        Ok(Self {
            sx,
            sy,
            tx: to.x.start - sx * from.x.start,
            ty: to.y.start - sy * from.y.start,
        })
    }

    #[must_use]
    pub fn apply(self, x: f64, y: f64) -> (f64, f64) {
        (self.sx * x + self.tx, self.sy * y + self.ty)
    }

    #[must_use]
    pub fn apply_x(self, x: f64) -> f64 {
        self.sx * x + self.tx
    }

    #[must_use]
    pub fn apply_y(self, y: f64) -> f64 {
        self.sy * y + self.ty
    }

    /// Returns `outer ∘ self`: first `self`, then `outer`.
    #[must_use]
    pub fn then(self, outer: Self) -> Self {
        Self {
            sx: outer.sx * self.sx,
            sy: outer.sy * self.sy,
            tx: outer.sx * self.tx + outer.tx,
            ty: outer.sy * self.ty + outer.ty,
        }
    }

    pub fn inverse(self) -> GvizResult<Self> {
        if self.sx == 0.0 || self.sy == 0.0 {
            return Err(GvizError::InvalidData(
                "degenerate transform cannot be inverted".to_owned(),
            ));
        }
        Ok(Self {
            sx: 1.0 / self.sx,
            sy: 1.0 / self.sy,
            tx: -self.tx / self.sx,
            ty: -self.ty / self.sy,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(usize);

impl FrameId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceFrame {
    pub name: String,
    pub parent: Option<FrameId>,
    pub coords: Extent,
    pub placement: Extent,
    pub env: Params,
    children: Vec<FrameId>,
    local: Affine,
}

impl ReferenceFrame {
    #[must_use]
    pub fn children(&self) -> &[FrameId] {
        &self.children
    }

    #[must_use]
    pub fn local_transform(&self) -> Affine {
        self.local
    }
}

/// Arena of reference frames rooted at a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTree {
    frames: Vec<ReferenceFrame>,
}

impl FrameTree {
    /// Creates a tree whose root maps its coordinates onto themselves.
    pub fn new(root_name: impl Into<String>, coords: Extent, env: Params) -> GvizResult<Self> {
        coords.validate()?;
        Ok(Self {
            frames: vec![ReferenceFrame {
                name: root_name.into(),
                parent: None,
                coords,
                placement: coords,
                env,
                children: Vec::new(),
                local: Affine::IDENTITY,
            }],
        })
    }

    #[must_use]
    pub const fn root(&self) -> FrameId {
        FrameId(0)
    }

    /// Appends a child frame whose `coords` are mapped onto `placement`
    /// (given in the parent's coordinates).
    pub fn add_child(
        &mut self,
        parent: FrameId,
        name: impl Into<String>,
        coords: Extent,
        placement: Extent,
        env: Params,
    ) -> GvizResult<FrameId> {
        self.frame(parent)?;
        let local = Affine::between(coords, placement)?;
        let id = FrameId(self.frames.len());
        self.frames.push(ReferenceFrame {
            name: name.into(),
            parent: Some(parent),
            coords,
            placement,
            env,
            children: Vec::new(),
            local,
        });
        self.frames[parent.0].children.push(id);
        Ok(id)
    }

    /// Re-places an existing frame once layout has measured it.
    ///
    /// The root keeps an identity transform; only its coordinate system changes.
    pub fn place(&mut self, id: FrameId, coords: Extent, placement: Extent) -> GvizResult<()> {
        let is_root = self.frame(id)?.parent.is_none();
        let (placement, local) = if is_root {
            coords.validate()?;
            (coords, Affine::IDENTITY)
        } else {
            (placement, Affine::between(coords, placement)?)
        };

        let frame = &mut self.frames[id.0];
        frame.coords = coords;
        frame.placement = placement;
        frame.local = local;
        Ok(())
    }

    pub fn frame(&self, id: FrameId) -> GvizResult<&ReferenceFrame> {
        self.frames.get(id.0).ok_or(GvizError::UnknownFrame(id.0))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn parent(&self, id: FrameId) -> Option<FrameId> {
        self.frames.get(id.0).and_then(|frame| frame.parent)
    }

    pub fn children(&self, id: FrameId) -> GvizResult<&[FrameId]> {
        Ok(self.frame(id)?.children())
    }

    /// Iterates `id` and then each ancestor up to and including the root.
    pub fn ancestors(&self, id: FrameId) -> impl Iterator<Item = &ReferenceFrame> + '_ {
        let mut next = self.frames.get(id.0).map(|_| id);
        std::iter::from_fn(move || {
            let current = &self.frames[next?.0];
            next = current.parent;
            Some(current)
        })
    }

    /// Resolves `key` at `id`, falling back to ancestors. `None` means unset
    /// everywhere up to the root.
    #[must_use]
    pub fn lookup(&self, id: FrameId, key: &str) -> Option<&ParamValue> {
        self.lookup_origin(id, key).map(|(_, value)| value)
    }

    /// Like [`Self::lookup`] but also reports which frame supplied the value.
    #[must_use]
    pub fn lookup_origin(&self, id: FrameId, key: &str) -> Option<(&ReferenceFrame, &ParamValue)> {
        self.ancestors(id)
            .find_map(|frame| frame.env.get(key).map(|value| (frame, value)))
    }

    /// Set and not `Nothing`.
    #[must_use]
    pub fn lookup_value(&self, id: FrameId, key: &str) -> Option<&ParamValue> {
        self.lookup(id, key).filter(|value| !value.is_nothing())
    }

    pub fn require(&self, id: FrameId, key: &str) -> GvizResult<&ParamValue> {
        self.lookup_value(id, key)
            .ok_or_else(|| GvizError::MissingParameter {
                key: key.to_owned(),
                frame: self
                    .frames
                    .get(id.0)
                    .map_or_else(|| id.0.to_string(), |frame| frame.name.clone()),
            })
    }

    pub fn length(&self, id: FrameId, key: &str) -> GvizResult<f64> {
        self.require(id, key)?.as_length_pt(key)
    }

    pub fn number(&self, id: FrameId, key: &str) -> GvizResult<f64> {
        self.require(id, key)?.as_f64(key)
    }

    pub fn color(&self, id: FrameId, key: &str) -> GvizResult<Color> {
        self.require(id, key)?.as_color(key)
    }

    pub fn font(&self, id: FrameId, key: &str) -> GvizResult<Font> {
        self.require(id, key)?.as_font(key)
    }

    pub fn text(&self, id: FrameId, key: &str) -> GvizResult<&str> {
        self.require(id, key)?.as_str(key)
    }

    pub fn numbers(&self, id: FrameId, key: &str) -> GvizResult<&[f64]> {
        self.require(id, key)?.as_numbers(key)
    }

    pub fn opt_number(&self, id: FrameId, key: &str) -> GvizResult<Option<f64>> {
        self.lookup_value(id, key)
            .map(|value| value.as_f64(key))
            .transpose()
    }

    pub fn opt_text(&self, id: FrameId, key: &str) -> GvizResult<Option<&str>> {
        self.lookup_value(id, key)
            .map(|value| value.as_str(key))
            .transpose()
    }

    pub fn local_transform(&self, id: FrameId) -> GvizResult<Affine> {
        Ok(self.frame(id)?.local)
    }

    /// Composition of local transforms from `id` up to the root.
    pub fn device_transform(&self, id: FrameId) -> GvizResult<Affine> {
        self.frame(id)?;
        Ok(self
            .ancestors(id)
            .fold(Affine::IDENTITY, |acc, frame| acc.then(frame.local)))
    }

    pub fn to_device(&self, id: FrameId, x: f64, y: f64) -> GvizResult<(f64, f64)> {
        Ok(self.device_transform(id)?.apply(x, y))
    }

    pub fn from_device(&self, id: FrameId, x: f64, y: f64) -> GvizResult<(f64, f64)> {
        Ok(self.device_transform(id)?.inverse()?.apply(x, y))
    }

    /// Device-space extent covered by the frame's coordinate system.
    pub fn device_extent(&self, id: FrameId) -> GvizResult<Extent> {
        let frame = self.frame(id)?;
        let transform = self.device_transform(id)?;
        let (x0, y0) = transform.apply(frame.coords.x.start, frame.coords.y.start);
        let (x1, y1) = transform.apply(frame.coords.x.end, frame.coords.y.end);
        Ok(Extent::from_bounds(x0, x1, y0, y1))
    }
}
