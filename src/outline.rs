//! Outline documents and arc-length sampling.
//!
//! An outline document is a flat vector drawing: a viewport rectangle plus any
//! number of path curves. Sampling walks each curve by arc length at a fixed
//! linear density, producing the 2D points that become particle homes.
//!
//! # Example
//!
//! ```ignore
//! let doc = OutlineDocument::from_path_data("bar", 100.0, 100.0, &["M0 50 L100 50"])?;
//! let points = sample_outline(&doc, 2);
//! assert_eq!(points.len(), 200);
//! ```

use crate::error::OutlineError;
use glam::Vec2;
use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathEl, PathSeg, Point};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Accuracy used for arc-length queries on curved segments.
const ARCLEN_ACCURACY: f64 = 1e-4;

/// Slack below an integer `L * density` product that still counts as that integer.
const COUNT_EPSILON: f64 = 1e-9;

/// `ceil(length * density)`, at least 1.
fn count_for_length(length: f64, density: u32) -> usize {
    let product = length * density.max(1) as f64;
    if product > 0.0 {
        (product - COUNT_EPSILON).ceil().max(1.0) as usize
    } else {
        1
    }
}

/// Anything that can be measured and walked by arc length.
pub trait ArcLengthCurve {
    /// Total arc length of the curve.
    fn length(&self) -> f32;

    /// Position at `offset` units of arc length from the start.
    ///
    /// Offsets outside `[0, length]` are clamped.
    fn point_at_length(&self, offset: f32) -> Vec2;

    /// Points to take at `density` per unit length: `ceil(length * density)`,
    /// and one for a zero-length curve.
    fn sample_count(&self, density: u32) -> usize {
        count_for_length(self.length() as f64, density)
    }
}

/// Width and height of a document's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Center of the viewport in document coordinates.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// A single path outline with precomputed segment lengths.
///
/// Subpath jumps (`M` commands in the middle of a path) contribute no length,
/// matching how vector documents measure multi-contour paths.
#[derive(Debug, Clone)]
pub struct PathCurve {
    segments: Vec<PathSeg>,
    /// Cumulative arc length at the end of each segment.
    ends: Vec<f64>,
    /// First point of the path, used when it has no drawable segments.
    origin: Point,
}

impl PathCurve {
    /// Measure a parsed path. Returns `None` if the path has no elements.
    pub fn from_bez_path(path: &BezPath) -> Option<Self> {
        let origin = match path.elements().first()? {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => *p,
            PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => *p,
            PathEl::ClosePath => Point::ZERO,
        };

        let segments: Vec<PathSeg> = path.segments().collect();
        let mut ends = Vec::with_capacity(segments.len());
        let mut total = 0.0;
        for seg in &segments {
            total += seg.arclen(ARCLEN_ACCURACY);
            ends.push(total);
        }

        Some(Self {
            segments,
            ends,
            origin,
        })
    }

    /// Parse SVG path data (`d` attribute syntax).
    pub fn from_svg(data: &str) -> Result<Option<Self>, kurbo::SvgParseError> {
        let path = BezPath::from_svg(data.trim())?;
        Ok(Self::from_bez_path(&path))
    }

    /// Number of drawable segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn total_length(&self) -> f64 {
        self.ends.last().copied().unwrap_or(0.0)
    }
}

impl ArcLengthCurve for PathCurve {
    fn length(&self) -> f32 {
        self.total_length() as f32
    }

    fn sample_count(&self, density: u32) -> usize {
        count_for_length(self.total_length(), density)
    }

    fn point_at_length(&self, offset: f32) -> Vec2 {
        if self.segments.is_empty() {
            return Vec2::new(self.origin.x as f32, self.origin.y as f32);
        }

        let s = (offset as f64).clamp(0.0, self.total_length());
        let idx = self
            .ends
            .partition_point(|&end| end < s)
            .min(self.segments.len() - 1);
        let seg_start = if idx == 0 { 0.0 } else { self.ends[idx - 1] };
        let seg_len = self.ends[idx] - seg_start;

        let seg = &self.segments[idx];
        let t = if seg_len <= 0.0 {
            0.0
        } else {
            seg.inv_arclen((s - seg_start).min(seg_len), ARCLEN_ACCURACY)
        };
        let p = seg.eval(t);
        Vec2::new(p.x as f32, p.y as f32)
    }
}

/// A vector drawing: viewport plus path curves in document order.
#[derive(Debug, Clone)]
pub struct OutlineDocument {
    pub viewport: Viewport,
    pub curves: Vec<PathCurve>,
}

impl OutlineDocument {
    pub fn new(viewport: Viewport, curves: Vec<PathCurve>) -> Self {
        Self { viewport, curves }
    }

    /// Build a document from SVG path data strings.
    ///
    /// `shape` is only used for error messages. Paths with no elements are
    /// skipped.
    pub fn from_path_data<S: AsRef<str>>(
        shape: &str,
        width: f32,
        height: f32,
        paths: &[S],
    ) -> Result<Self, OutlineError> {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(OutlineError::InvalidViewport {
                shape: shape.to_string(),
                width,
                height,
            });
        }

        let mut curves = Vec::with_capacity(paths.len());
        for data in paths {
            let parsed = PathCurve::from_svg(data.as_ref()).map_err(|source| {
                OutlineError::InvalidPathData {
                    shape: shape.to_string(),
                    source,
                }
            })?;
            curves.extend(parsed);
        }

        Ok(Self::new(Viewport::new(width, height), curves))
    }

    /// Sum of all curve lengths.
    pub fn total_length(&self) -> f32 {
        self.curves.iter().map(|c| c.length()).sum()
    }
}

/// Sample one curve at `density` points per unit of arc length, appending to `out`.
///
/// A curve of length `L` yields `ceil(L * density)` points at offsets
/// `0, 1/density, 2/density, ...`. A zero-length curve yields a single point.
pub fn sample_curve<C: ArcLengthCurve + ?Sized>(curve: &C, density: u32, out: &mut Vec<Vec2>) {
    let density = density.max(1);
    let count = curve.sample_count(density);

    out.reserve(count);
    let step = 1.0 / density as f32;
    for i in 0..count {
        out.push(curve.point_at_length(i as f32 * step));
    }
}

/// Sample every curve of a document, concatenated in document order.
pub fn sample_outline(document: &OutlineDocument, density: u32) -> Vec<Vec2> {
    let mut points = Vec::new();
    for curve in &document.curves {
        sample_curve(curve, density, &mut points);
    }
    points
}

/// A named document in a [`ShapeLibrary`].
#[derive(Debug, Clone)]
pub struct ShapeEntry {
    pub name: String,
    pub document: OutlineDocument,
    /// Required shapes are always part of a showcase selection.
    pub required: bool,
}

/// Name-keyed collection of outline documents, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ShapeLibrary {
    entries: Vec<ShapeEntry>,
    indices: HashMap<String, usize>,
}

impl ShapeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under `name`.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        document: OutlineDocument,
        required: bool,
    ) -> Result<(), OutlineError> {
        let name = name.into();
        if self.indices.contains_key(&name) {
            return Err(OutlineError::DuplicateShape(name));
        }
        self.indices.insert(name.clone(), self.entries.len());
        self.entries.push(ShapeEntry {
            name,
            document,
            required,
        });
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_shape(
        mut self,
        name: impl Into<String>,
        document: OutlineDocument,
    ) -> Result<Self, OutlineError> {
        self.insert(name, document, false)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&OutlineDocument> {
        self.indices.get(name).map(|&i| &self.entries[i].document)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn entries(&self) -> &[ShapeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the shape following `name`, wrapping around.
    pub fn next_name(&self, name: &str) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let next = self.indices.get(name).map_or(0, |&i| (i + 1) % self.entries.len());
        Some(self.entries[next].name.as_str())
    }

    /// Pick the shapes to show: every required shape in library order, then
    /// `optional_count` optional shapes in random order.
    pub fn showcase<R: Rng + ?Sized>(&self, rng: &mut R, optional_count: usize) -> Vec<&str> {
        let mut optional: Vec<&str> = self
            .entries
            .iter()
            .filter(|e| !e.required)
            .map(|e| e.name.as_str())
            .collect();
        optional.shuffle(rng);

        self.entries
            .iter()
            .filter(|e| e.required)
            .map(|e| e.name.as_str())
            .chain(optional.into_iter().take(optional_count))
            .collect()
    }
}
