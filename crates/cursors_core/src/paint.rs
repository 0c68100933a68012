//! Draw lists
//!
//! Frames are described as a flat list of paint commands. Scene code records
//! into a [`DrawList`] without touching the GPU, and a renderer consumes the
//! list afterwards. This keeps everything above the renderer testable
//! headlessly.

use crate::geometry::{Color, Point, Rect};
use smallvec::SmallVec;

/// Polygon outline storage. Cursor sprites have seven vertices.
pub type Outline = SmallVec<[Point; 8]>;

/// Which point of a text run its `position` names
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Top-left corner of the line box
    #[default]
    TopLeft,
    /// Center of the line box
    Center,
}

/// A paint command for the renderer
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole target
    Clear(Color),
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f32,
    },
    /// A closed polygon in display coordinates
    FillPolygon {
        points: Outline,
        color: Color,
    },
    /// A single line of text, `size` pixels per em
    Text {
        text: String,
        position: Point,
        size: f32,
        color: Color,
        anchor: TextAnchor,
    },
}

/// Recorded paint commands for one frame
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded commands
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take ownership of recorded commands
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.commands
            .push(DrawCommand::StrokeRect { rect, color, width });
    }

    pub fn fill_polygon(&mut self, points: impl IntoIterator<Item = Point>, color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.into_iter().collect(),
            color,
        });
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        position: Point,
        size: f32,
        color: Color,
        anchor: TextAnchor,
    ) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            position,
            size,
            color,
            anchor,
        });
    }

    /// Draw a sprite outline rotated by `rotation_degrees` and centered at `center`
    ///
    /// `outline` is expressed relative to the sprite's own center. Rotation is
    /// counter-clockwise on screen.
    pub fn draw_sprite(
        &mut self,
        outline: &[Point],
        color: Color,
        center: Point,
        rotation_degrees: f32,
    ) {
        self.fill_polygon(
            outline
                .iter()
                .map(|p| p.rotate_degrees(rotation_degrees) + center),
            color,
        );
    }
}
