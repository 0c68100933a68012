//! Path tessellation for GPU rendering
//!
//! Converts draw list commands into one triangle mesh using lyon.

use crate::text::FontFace;
use cursors_core::{Color, DrawCommand, DrawList, Point, Rect};
use lyon::lyon_tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, StrokeOptions,
    StrokeTessellator, StrokeVertex, VertexBuffers,
};
use lyon::math::point;
use lyon::path::Path;

/// A vertex for path rendering
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PathVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Tessellated geometry for one frame
#[derive(Debug, Default)]
pub struct FrameMesh {
    /// Color of the last `Clear` command, if any
    pub clear_color: Option<Color>,
    pub vertices: Vec<PathVertex>,
    pub indices: Vec<u32>,
}

impl FrameMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }
}

/// Closed polygon through `points`, `None` when fewer than three points
fn polygon_path(points: &[Point]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    if rest.len() < 2 {
        return None;
    }
    let mut builder = Path::builder();
    builder.begin(point(first.x, first.y));
    for p in rest {
        builder.line_to(point(p.x, p.y));
    }
    builder.close();
    Some(builder.build())
}

fn rect_corners(rect: &Rect) -> [Point; 4] {
    [
        Point::new(rect.x, rect.y),
        Point::new(rect.right(), rect.y),
        Point::new(rect.right(), rect.bottom()),
        Point::new(rect.x, rect.bottom()),
    ]
}

/// Tessellate every command of a draw list, in order
///
/// Later commands draw over earlier ones. Strokes are kept inside the rect
/// they outline. Text is skipped when no font is available.
pub fn tessellate_draw_list(list: &DrawList, font: Option<&FontFace>) -> FrameMesh {
    let mut mesh = FrameMesh::new();
    let mut geometry: VertexBuffers<PathVertex, u32> = VertexBuffers::new();
    let mut fill = FillTessellator::new();
    let mut stroke = StrokeTessellator::new();
    let fill_options = FillOptions::default().with_tolerance(0.1);
    // Glyph contours overlap and wind in opposite directions for holes
    let glyph_options = FillOptions::default()
        .with_tolerance(0.1)
        .with_fill_rule(FillRule::NonZero);

    for command in list.commands() {
        match command {
            DrawCommand::Clear(color) => {
                mesh.clear_color = Some(*color);
            }
            DrawCommand::FillRect { rect, color } => {
                let corners = rect_corners(rect);
                fill_polygon(&mut fill, &fill_options, &corners, *color, &mut geometry);
            }
            DrawCommand::FillPolygon { points, color } => {
                fill_polygon(&mut fill, &fill_options, points, *color, &mut geometry);
            }
            DrawCommand::StrokeRect { rect, color, width } => {
                let inset = width / 2.0;
                let inner = Rect::new(
                    rect.x + inset,
                    rect.y + inset,
                    (rect.width - width).max(0.0),
                    (rect.height - width).max(0.0),
                );
                let Some(path) = polygon_path(&rect_corners(&inner)) else {
                    continue;
                };
                let color = color.to_array();
                let options = StrokeOptions::default()
                    .with_line_width(*width)
                    .with_tolerance(0.1);
                let result = stroke.tessellate_path(
                    &path,
                    &options,
                    &mut BuffersBuilder::new(&mut geometry, |vertex: StrokeVertex| PathVertex {
                        position: vertex.position().to_array(),
                        color,
                    }),
                );
                if let Err(e) = result {
                    tracing::warn!("Rect stroke tessellation failed: {:?}", e);
                }
            }
            DrawCommand::Text {
                text,
                position,
                size,
                color,
                anchor,
            } => {
                let Some(path) =
                    font.and_then(|font| font.text_path(text, *size, *position, *anchor))
                else {
                    continue;
                };
                fill_path(&mut fill, &glyph_options, &path, *color, &mut geometry);
            }
        }
    }

    mesh.vertices = geometry.vertices;
    mesh.indices = geometry.indices;
    mesh
}

fn fill_polygon(
    tessellator: &mut FillTessellator,
    options: &FillOptions,
    points: &[Point],
    color: Color,
    geometry: &mut VertexBuffers<PathVertex, u32>,
) {
    if let Some(path) = polygon_path(points) {
        fill_path(tessellator, options, &path, color, geometry);
    }
}

fn fill_path(
    tessellator: &mut FillTessellator,
    options: &FillOptions,
    path: &Path,
    color: Color,
    geometry: &mut VertexBuffers<PathVertex, u32>,
) {
    let color = color.to_array();
    let result = tessellator.tessellate_path(
        path,
        options,
        &mut BuffersBuilder::new(geometry, |vertex: FillVertex| PathVertex {
            position: vertex.position().to_array(),
            color,
        }),
    );
    if let Err(e) = result {
        tracing::warn!("Fill tessellation failed: {:?}", e);
    }
}
