//! Text as glyph outlines
//!
//! Labels go through the same fill pipeline as every other shape: glyph
//! outlines are read with ttf-parser, scaled from font units into display
//! pixels and collected into a lyon path. There is no glyph atlas. The face
//! is a sans-serif system font located with fontdb.

use cursors_core::{Point, TextAnchor};
use fontdb::{Database, Family, Query};
use lyon::math::point;
use lyon::path::{path::Builder, Path};
use thiserror::Error;
use ttf_parser::{GlyphId, OutlineBuilder};

/// Error type for font loading
#[derive(Error, Debug)]
pub enum FontError {
    /// No face matched and none is installed
    #[error("No usable system font found")]
    NotFound,
    /// The font data could not be parsed
    #[error("Invalid font data: {0}")]
    Parse(#[from] ttf_parser::FaceParsingError),
}

/// Pixel extent of one laid-out line
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineExtent {
    pub width: f32,
    /// Top of the line box to the baseline
    pub ascent: f32,
    /// Baseline to the bottom of the line box
    pub descent: f32,
}

impl LineExtent {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    /// Pen origin on the baseline for a line placed at `position`
    pub fn baseline_origin(&self, position: Point, anchor: TextAnchor) -> Point {
        match anchor {
            TextAnchor::TopLeft => Point::new(position.x, position.y + self.ascent),
            TextAnchor::Center => Point::new(
                position.x - self.width / 2.0,
                position.y - self.height() / 2.0 + self.ascent,
            ),
        }
    }
}

/// An owned font face
pub struct FontFace {
    data: Vec<u8>,
    index: u32,
    family: String,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("index", &self.index)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl FontFace {
    /// Wrap raw font data, checking that face `index` parses
    pub fn from_data(data: Vec<u8>, index: u32) -> Result<Self, FontError> {
        ttf_parser::Face::parse(&data, index)?;
        Ok(Self {
            data,
            index,
            family: String::new(),
        })
    }

    /// Load the system sans-serif face, or any installed face if there is none
    pub fn system_sans_serif() -> Result<Self, FontError> {
        let mut db = Database::new();
        db.load_system_fonts();

        let query = Query {
            families: &[Family::SansSerif],
            ..Query::default()
        };
        let id = db
            .query(&query)
            .or_else(|| db.faces().next().map(|face| face.id))
            .ok_or(FontError::NotFound)?;

        let family = db
            .face(id)
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone())
            .unwrap_or_default();
        let (data, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or(FontError::NotFound)?;

        let mut face = Self::from_data(data, index)?;
        tracing::trace!(faces = db.len(), "scanned system fonts");
        face.family = family;
        Ok(face)
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.index).ok()
    }

    /// Extent of `text` at `size` pixels per em
    pub fn measure(&self, text: &str, size: f32) -> Option<LineExtent> {
        let face = self.face()?;
        let scale = scale_for(&face, size)?;
        Some(line_extent(&face, text, scale))
    }

    /// Outlines of `text` as one path in display pixels
    ///
    /// Characters the face has no glyph for are drawn as its missing glyph.
    pub fn text_path(
        &self,
        text: &str,
        size: f32,
        position: Point,
        anchor: TextAnchor,
    ) -> Option<Path> {
        let face = self.face()?;
        let scale = scale_for(&face, size)?;
        let origin = line_extent(&face, text, scale).baseline_origin(position, anchor);

        let mut path = GlyphPath::new(origin, scale);
        let mut pen = 0.0;
        for ch in text.chars() {
            let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
            path.origin = Point::new(origin.x + pen, origin.y);
            face.outline_glyph(glyph, &mut path);
            pen += advance(&face, glyph) * scale;
        }
        Some(path.finish())
    }
}

fn scale_for(face: &ttf_parser::Face<'_>, size: f32) -> Option<f32> {
    let units = face.units_per_em();
    (units > 0 && size > 0.0).then(|| size / f32::from(units))
}

fn advance(face: &ttf_parser::Face<'_>, glyph: GlyphId) -> f32 {
    face.glyph_hor_advance(glyph).map_or(0.0, f32::from)
}

fn line_extent(face: &ttf_parser::Face<'_>, text: &str, scale: f32) -> LineExtent {
    let width: f32 = text
        .chars()
        .map(|ch| advance(face, face.glyph_index(ch).unwrap_or(GlyphId(0))))
        .sum();
    LineExtent {
        width: width * scale,
        ascent: f32::from(face.ascender()) * scale,
        descent: -f32::from(face.descender()) * scale,
    }
}

/// Collects glyph outlines into a lyon path
///
/// Font units are y-up; display pixels are y-down.
struct GlyphPath {
    builder: Builder,
    origin: Point,
    scale: f32,
    open: bool,
}

impl GlyphPath {
    fn new(origin: Point, scale: f32) -> Self {
        Self {
            builder: Path::builder(),
            origin,
            scale,
            open: false,
        }
    }

    fn map(&self, x: f32, y: f32) -> lyon::math::Point {
        point(self.origin.x + x * self.scale, self.origin.y - y * self.scale)
    }

    /// Start a contour at `to` unless one is already open
    fn ensure_open(&mut self, to: lyon::math::Point) -> bool {
        if self.open {
            return true;
        }
        self.builder.begin(to);
        self.open = true;
        false
    }

    fn finish(mut self) -> Path {
        if self.open {
            self.builder.end(true);
        }
        self.builder.build()
    }
}

impl OutlineBuilder for GlyphPath {
    fn move_to(&mut self, x: f32, y: f32) {
        if self.open {
            self.builder.end(true);
            self.open = false;
        }
        let to = self.map(x, y);
        self.ensure_open(to);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let to = self.map(x, y);
        if self.ensure_open(to) {
            self.builder.line_to(to);
        }
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let ctrl = self.map(x1, y1);
        let to = self.map(x, y);
        if self.ensure_open(to) {
            self.builder.quadratic_bezier_to(ctrl, to);
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let ctrl1 = self.map(x1, y1);
        let ctrl2 = self.map(x2, y2);
        let to = self.map(x, y);
        if self.ensure_open(to) {
            self.builder.cubic_bezier_to(ctrl1, ctrl2, to);
        }
    }

    fn close(&mut self) {
        if self.open {
            self.builder.close();
            self.open = false;
        }
    }
}
