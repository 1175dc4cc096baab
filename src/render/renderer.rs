//! Draw-call façade over a single layer.
//!
//! A [`Renderer`] is obtained from the surface for one layer and translates
//! shape and text requests into raster-context calls. All coordinates are raster
//! pixels. The width and height are captured when the renderer is created: after
//! the surface is resized, acquire a new renderer.

use crate::errors::DrawError;
use crate::math::Vector;
use crate::render::backend::RasterContext;
use crate::render::style::{Color, FillStyle, Font, StrokeStyle, TextAlign, TextBaseline};
use std::cell::RefCell;
use std::f64::consts::{FRAC_PI_2, PI};
use std::rc::Rc;

/// Shared handle to one layer's raster context.
pub type LayerContext = Rc<RefCell<Box<dyn RasterContext>>>;

/// Distance kept between a stroke and the buffer edge so edge lines stay crisp.
const EDGE_INSET: f64 = 0.5;

/// Angle 0 points up instead of right.
const ANGLE_OFFSET: f64 = -FRAC_PI_2;

pub struct Renderer {
    context: LayerContext,
    rendering_width: f64,
    rendering_height: f64,
    font_family: String,
    arc_inset: f64,
}

impl Renderer {
    pub(crate) fn new(context: LayerContext, width: f64, height: f64, font_family: &str, arc_inset: f64) -> Self {
        Self {
            context,
            rendering_width: width,
            rendering_height: height,
            font_family: font_family.to_string(),
            arc_inset,
        }
    }

    #[inline]
    pub fn rendering_width(&self) -> f64 {
        self.rendering_width
    }

    #[inline]
    pub fn rendering_height(&self) -> f64 {
        self.rendering_height
    }

    /// Clears the layer, then fills it with `background` when given.
    pub fn clear(&self, background: Option<&FillStyle>) -> Result<(), DrawError> {
        self.context
            .borrow_mut()
            .clear_rect(0.0, 0.0, self.rendering_width, self.rendering_height)?;
        if let Some(style) = background {
            self.fill_rect(
                Vector::ZERO,
                Vector::new(self.rendering_width, self.rendering_height),
                style,
            )?;
        }
        Ok(())
    }

    /// Fills the axis-aligned rectangle spanned by `from` and `to`.
    pub fn fill_rect(&self, from: Vector, to: Vector, style: &FillStyle) -> Result<(), DrawError> {
        self.context
            .borrow_mut()
            .fill_rect(from.x, from.y, to.x - from.x, to.y - from.y, style)?;
        Ok(())
    }

    /// Strokes an open path through `vertices`.
    ///
    /// Vertices below the last pixel row are pulled up to it.
    pub fn draw_polyline(&self, vertices: &[Vector], stroke: &StrokeStyle) -> Result<(), DrawError> {
        let (first, rest) = vertices.split_first().ok_or(DrawError::EmptyPath)?;

        let mut ctx = self.context.borrow_mut();
        ctx.begin_path();
        ctx.move_to(first.x, self.clamp_bottom(first.y));
        for v in rest {
            ctx.line_to(v.x, self.clamp_bottom(v.y));
        }
        Self::stroke(&mut **ctx, stroke)?;
        ctx.close_path();
        Ok(())
    }

    /// Closed path through `vertices`, stroked and/or filled.
    ///
    /// The outline is stroked only for a stroke with a positive width; the
    /// stroke is painted before the fill.
    pub fn draw_polygon(
        &self,
        vertices: &[Vector],
        fill: Option<&FillStyle>,
        stroke: Option<&StrokeStyle>,
    ) -> Result<(), DrawError> {
        let (first, rest) = vertices.split_first().ok_or(DrawError::EmptyPath)?;

        let mut ctx = self.context.borrow_mut();
        ctx.begin_path();
        ctx.move_to(first.x, first.y);
        for v in rest {
            ctx.line_to(v.x, v.y);
        }
        ctx.line_to(first.x, first.y);
        Self::paint(&mut **ctx, fill, stroke, true)?;
        ctx.close_path();
        Ok(())
    }

    /// Pie slice around the center of the layer, from `start` to `end` radians
    /// with 0 pointing up and angles growing clockwise.
    ///
    /// The outline is always stroked solid: `stroke.segments` is ignored.
    pub fn draw_arc(
        &self,
        start: f64,
        end: f64,
        fill: Option<&FillStyle>,
        stroke: Option<&StrokeStyle>,
    ) -> Result<(), DrawError> {
        let (x, y, radius) = self.wedge_geometry();

        let mut ctx = self.context.borrow_mut();
        ctx.begin_path();
        ctx.move_to(x, y);
        ctx.arc(x, y, radius, ANGLE_OFFSET + start, ANGLE_OFFSET + end);
        ctx.line_to(x, y);
        Self::paint(&mut **ctx, fill, stroke, false)?;
        ctx.close_path();
        Ok(())
    }

    /// Consecutive solid slices: slice `i` spans `radians[i - 1]` (0 for the
    /// first) to `radians[i]` and is filled with `colors[i]`.
    ///
    /// `radians` should be non-decreasing.
    pub fn draw_arcs(&self, radians: &[f64], colors: &[Color]) -> Result<(), DrawError> {
        if radians.len() != colors.len() {
            return Err(DrawError::ArcColorMismatch {
                radians: radians.len(),
                colors: colors.len(),
            });
        }

        let (x, y, radius) = self.wedge_geometry();
        let mut ctx = self.context.borrow_mut();
        let mut start = 0.0;
        for (&end, &color) in radians.iter().zip(colors) {
            ctx.begin_path();
            ctx.arc(x, y, radius, ANGLE_OFFSET + start, ANGLE_OFFSET + end);
            ctx.line_to(x, y);
            ctx.fill(&FillStyle::Solid(color))?;
            start = end;
        }
        Ok(())
    }

    /// Full circle of `radius` around `origin`.
    ///
    /// The outline is always stroked solid: `stroke.segments` is ignored.
    pub fn draw_circle(
        &self,
        origin: Vector,
        radius: f64,
        fill: Option<&FillStyle>,
        stroke: Option<&StrokeStyle>,
    ) -> Result<(), DrawError> {
        let mut ctx = self.context.borrow_mut();
        ctx.begin_path();
        ctx.ellipse(origin.x, origin.y, radius, radius, 0.0, 0.0, 2.0 * PI);
        Self::paint(&mut **ctx, fill, stroke, false)?;
        ctx.close_path();
        Ok(())
    }

    /// Full-width horizontal line through `origin.y`.
    ///
    /// A line on or beyond the top or bottom edge is moved half a pixel inside.
    /// Returns the origin actually used.
    pub fn draw_cross_x(&self, origin: Vector, stroke: &StrokeStyle) -> Result<Vector, DrawError> {
        let origin = Vector::new(origin.x, inset_from_edges(origin.y, self.rendering_height));

        let mut ctx = self.context.borrow_mut();
        ctx.begin_path();
        ctx.move_to(0.0, origin.y);
        ctx.line_to(self.rendering_width, origin.y);
        Self::stroke(&mut **ctx, stroke)?;
        ctx.close_path();
        Ok(origin)
    }

    /// Full-height vertical line through `origin.x`. See [`draw_cross_x`](Self::draw_cross_x).
    pub fn draw_cross_y(&self, origin: Vector, stroke: &StrokeStyle) -> Result<Vector, DrawError> {
        let origin = Vector::new(inset_from_edges(origin.x, self.rendering_width), origin.y);

        let mut ctx = self.context.borrow_mut();
        ctx.begin_path();
        ctx.move_to(origin.x, 0.0);
        ctx.line_to(origin.x, self.rendering_height);
        Self::stroke(&mut **ctx, stroke)?;
        ctx.close_path();
        Ok(origin)
    }

    /// Draws `text` with its top edge at `origin.y`.
    pub fn draw_text(
        &self,
        origin: Vector,
        text: &str,
        color: Color,
        size: f64,
        align: TextAlign,
    ) -> Result<(), DrawError> {
        let font = Font {
            size,
            family: self.font_family.clone(),
            align,
            baseline: TextBaseline::Top,
        };
        self.context
            .borrow_mut()
            .fill_text(text, origin.x, origin.y, &font, color)?;
        Ok(())
    }

    fn wedge_geometry(&self) -> (f64, f64, f64) {
        let radius = self.rendering_width.min(self.rendering_height) / 2.0 - self.arc_inset;
        (self.rendering_width / 2.0, self.rendering_height / 2.0, radius)
    }

    fn clamp_bottom(&self, y: f64) -> f64 {
        y.min(self.rendering_height - EDGE_INSET)
    }

    /// Stroke (when visible) then fill (when given) the current path.
    fn paint(
        ctx: &mut dyn RasterContext,
        fill: Option<&FillStyle>,
        stroke: Option<&StrokeStyle>,
        dashes: bool,
    ) -> Result<(), DrawError> {
        if let Some(s) = stroke.filter(|s| s.is_visible()) {
            if dashes || !s.is_dashed() {
                Self::stroke(ctx, s)?;
            } else {
                let solid = StrokeStyle::new(s.width, s.color);
                Self::stroke(ctx, &solid)?;
            }
        }
        if let Some(style) = fill {
            Self::fill(ctx, style)?;
        }
        Ok(())
    }

    fn stroke(ctx: &mut dyn RasterContext, style: &StrokeStyle) -> Result<(), DrawError> {
        ctx.stroke(style)?;
        Ok(())
    }

    fn fill(ctx: &mut dyn RasterContext, style: &FillStyle) -> Result<(), DrawError> {
        ctx.fill(style)?;
        Ok(())
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("rendering_width", &self.rendering_width)
            .field("rendering_height", &self.rendering_height)
            .finish()
    }
}

fn inset_from_edges(value: f64, extent: f64) -> f64 {
    if value <= 0.0 {
        EDGE_INSET
    } else if value >= extent {
        extent - EDGE_INSET
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::SurfaceSize;
    use crate::render::backends::recording::{CommandLog, RecordingContext};
    use crate::render::render_list::{CommandList, DrawCommand};
    use crate::render::style::LinearGradient;

    fn renderer(width: f64, height: f64) -> (Renderer, CommandLog) {
        let log: CommandLog = Rc::new(RefCell::new(CommandList::new()));
        let ctx: Box<dyn RasterContext> = Box::new(RecordingContext::new(
            SurfaceSize::new(width as u32, height as u32),
            log.clone(),
        ));
        let renderer = Renderer::new(Rc::new(RefCell::new(ctx)), width, height, "sans-serif", 4.0);
        (renderer, log)
    }

    fn red() -> Color {
        Color::from_u8(255, 0, 0, 255)
    }

    fn triangle() -> Vec<Vector> {
        vec![Vector::new(30.0, 45.0), Vector::new(96.0, 123.0), Vector::new(183.0, 87.0)]
    }

    #[test]
    fn clear_with_background_fills_full_rect() {
        let (r, log) = renderer(200.0, 100.0);
        let bg = FillStyle::Solid(Color::BLACK);
        r.clear(Some(&bg)).unwrap();

        assert_eq!(
            log.borrow().items,
            vec![
                DrawCommand::ClearRect { x: 0.0, y: 0.0, w: 200.0, h: 100.0 },
                DrawCommand::FillRect { x: 0.0, y: 0.0, w: 200.0, h: 100.0, style: bg },
            ]
        );
    }

    #[test]
    fn clear_without_background_only_clears() {
        let (r, log) = renderer(10.0, 10.0);
        r.clear(None).unwrap();
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow().paints().count(), 0);
    }

    #[test]
    fn fill_rect_keeps_signed_spans() {
        let (r, log) = renderer(100.0, 100.0);
        let gradient: FillStyle = LinearGradient::new(Vector::ZERO, Vector::new(0.0, 50.0))
            .with_stop(0.0, Color::WHITE)
            .with_stop(1.0, Color::BLACK)
            .into();
        r.fill_rect(Vector::new(50.0, 40.0), Vector::new(10.0, 60.0), &gradient).unwrap();

        assert_eq!(
            log.borrow().last(),
            Some(&DrawCommand::FillRect { x: 50.0, y: 40.0, w: -40.0, h: 20.0, style: gradient })
        );
    }

    #[test]
    fn polyline_is_open_and_clamps_bottom() {
        let (r, log) = renderer(100.0, 50.0);
        let stroke = StrokeStyle::new(1.0, red()).dashed(vec![4.0, 2.0]);
        r.draw_polyline(
            &[Vector::new(0.0, 80.0), Vector::new(10.0, 20.0), Vector::new(20.0, 49.7), Vector::new(30.0, -5.0)],
            &stroke,
        )
        .unwrap();

        assert_eq!(
            log.borrow().items,
            vec![
                DrawCommand::BeginPath,
                DrawCommand::MoveTo { x: 0.0, y: 49.5 },
                DrawCommand::LineTo { x: 10.0, y: 20.0 },
                DrawCommand::LineTo { x: 20.0, y: 49.5 },
                DrawCommand::LineTo { x: 30.0, y: -5.0 },
                DrawCommand::Stroke { style: stroke },
                DrawCommand::ClosePath,
            ]
        );
    }

    #[test]
    fn empty_paths_are_rejected() {
        let (r, log) = renderer(10.0, 10.0);
        let stroke = StrokeStyle::new(1.0, red());
        assert!(matches!(r.draw_polyline(&[], &stroke), Err(DrawError::EmptyPath)));
        assert!(matches!(r.draw_polygon(&[], None, Some(&stroke)), Err(DrawError::EmptyPath)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn polygon_fill_only() {
        let (r, log) = renderer(200.0, 200.0);
        let fill = FillStyle::Solid(Color::from_u8(0, 128, 0, 255));
        r.draw_polygon(&triangle(), Some(&fill), Some(&StrokeStyle::new(0.0, red()))).unwrap();

        let log = log.borrow();
        assert_eq!(log.fills().collect::<Vec<_>>(), vec![&fill]);
        assert_eq!(log.strokes().count(), 0);
    }

    #[test]
    fn polygon_stroke_only_closes_back_to_first_vertex() {
        let (r, log) = renderer(200.0, 200.0);
        let stroke = StrokeStyle::new(1.0, red());
        r.draw_polygon(&triangle(), None, Some(&stroke)).unwrap();

        assert_eq!(
            log.borrow().items,
            vec![
                DrawCommand::BeginPath,
                DrawCommand::MoveTo { x: 30.0, y: 45.0 },
                DrawCommand::LineTo { x: 96.0, y: 123.0 },
                DrawCommand::LineTo { x: 183.0, y: 87.0 },
                DrawCommand::LineTo { x: 30.0, y: 45.0 },
                DrawCommand::Stroke { style: stroke },
                DrawCommand::ClosePath,
            ]
        );
    }

    #[test]
    fn polygon_stroke_precedes_fill() {
        let (r, log) = renderer(200.0, 200.0);
        let fill = FillStyle::Solid(Color::from_u8(0, 128, 0, 255));
        let stroke = StrokeStyle::new(1.0, red());
        r.draw_polygon(&triangle(), Some(&fill), Some(&stroke)).unwrap();

        let paints: Vec<DrawCommand> = log.borrow().paints().cloned().collect();
        assert_eq!(
            paints,
            vec![DrawCommand::Stroke { style: stroke }, DrawCommand::Fill { style: fill }]
        );
    }

    #[test]
    fn polygon_without_styles_paints_nothing() {
        let (r, log) = renderer(200.0, 200.0);
        r.draw_polygon(&triangle(), None, None).unwrap();
        assert_eq!(log.borrow().paints().count(), 0);
        assert_eq!(log.borrow().last(), Some(&DrawCommand::ClosePath));
    }

    #[test]
    fn arc_is_a_wedge_from_the_center_starting_at_twelve_o_clock() {
        let (r, log) = renderer(200.0, 100.0);
        let fill = FillStyle::Solid(red());
        // dashes are ignored for wedges
        let stroke = StrokeStyle::new(2.0, Color::BLACK).dashed(vec![1.0, 1.0]);
        r.draw_arc(0.0, PI, Some(&fill), Some(&stroke)).unwrap();

        assert_eq!(
            log.borrow().items,
            vec![
                DrawCommand::BeginPath,
                DrawCommand::MoveTo { x: 100.0, y: 50.0 },
                DrawCommand::Arc { cx: 100.0, cy: 50.0, radius: 46.0, start: -FRAC_PI_2, end: FRAC_PI_2 },
                DrawCommand::LineTo { x: 100.0, y: 50.0 },
                DrawCommand::Stroke { style: StrokeStyle::new(2.0, Color::BLACK) },
                DrawCommand::Fill { style: fill },
                DrawCommand::ClosePath,
            ]
        );
    }

    #[test]
    fn arcs_cover_consecutive_ranges() {
        let (r, log) = renderer(100.0, 100.0);
        let colors = [red(), Color::BLACK, Color::WHITE];
        r.draw_arcs(&[1.0, 2.5, 4.0], &colors).unwrap();

        let log = log.borrow();
        let arcs: Vec<(f64, f64)> = log
            .items
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Arc { start, end, radius, .. } => {
                    assert_eq!(*radius, 46.0);
                    Some((start - ANGLE_OFFSET, end - ANGLE_OFFSET))
                }
                _ => None,
            })
            .collect();
        assert_eq!(arcs.len(), 3);
        let expected = [(0.0, 1.0), (1.0, 2.5), (2.5, 4.0)];
        for ((s, e), (es, ee)) in arcs.iter().zip(expected) {
            assert!((s - es).abs() < 1e-12 && (e - ee).abs() < 1e-12);
        }

        let expected: Vec<FillStyle> = colors.iter().map(|c| FillStyle::Solid(*c)).collect();
        assert_eq!(log.fills().cloned().collect::<Vec<_>>(), expected);
        assert_eq!(log.strokes().count(), 0);
    }

    #[test]
    fn arcs_reject_mismatched_lengths() {
        let (r, _log) = renderer(100.0, 100.0);
        match r.draw_arcs(&[1.0, 2.0], &[red()]) {
            Err(DrawError::ArcColorMismatch { radians: 2, colors: 1 }) => {}
            other => panic!("expected ArcColorMismatch, got {:?}", other),
        }
    }

    #[test]
    fn circle_is_a_full_ellipse() {
        let (r, log) = renderer(500.0, 500.0);
        let fill = FillStyle::Solid(red());
        r.draw_circle(Vector::new(100.0, 100.0), 30.0, Some(&fill), None).unwrap();

        assert_eq!(
            log.borrow().items,
            vec![
                DrawCommand::BeginPath,
                DrawCommand::Ellipse {
                    cx: 100.0,
                    cy: 100.0,
                    rx: 30.0,
                    ry: 30.0,
                    rotation: 0.0,
                    start: 0.0,
                    end: 2.0 * PI,
                },
                DrawCommand::Fill { style: fill },
                DrawCommand::ClosePath,
            ]
        );
    }

    #[test]
    fn circle_stroke_drops_dashes() {
        let (r, log) = renderer(100.0, 100.0);
        let stroke = StrokeStyle::new(3.0, red()).dashed(vec![2.0, 5.0]);
        r.draw_circle(Vector::new(50.0, 50.0), 10.0, None, Some(&stroke)).unwrap();

        let log = log.borrow();
        let strokes: Vec<&StrokeStyle> = log.strokes().collect();
        assert_eq!(strokes, vec![&StrokeStyle::new(3.0, red())]);
        assert!(!strokes[0].is_dashed());
        assert_eq!(log.fills().count(), 0);
    }

    #[test]
    fn cross_x_snaps_to_edges() {
        let (r, log) = renderer(300.0, 100.0);
        let stroke = StrokeStyle::new(1.0, Color::BLACK);

        assert_eq!(r.draw_cross_x(Vector::new(7.0, -3.0), &stroke).unwrap(), Vector::new(7.0, 0.5));
        assert_eq!(r.draw_cross_x(Vector::new(7.0, 100.0), &stroke).unwrap(), Vector::new(7.0, 99.5));
        assert_eq!(r.draw_cross_x(Vector::new(7.0, 42.0), &stroke).unwrap(), Vector::new(7.0, 42.0));

        let log = log.borrow();
        assert!(log.items.contains(&DrawCommand::MoveTo { x: 0.0, y: 0.5 }));
        assert!(log.items.contains(&DrawCommand::LineTo { x: 300.0, y: 99.5 }));
        assert_eq!(log.strokes().count(), 3);
    }

    #[test]
    fn cross_y_snaps_to_edges() {
        let (r, log) = renderer(300.0, 100.0);
        let stroke = StrokeStyle::new(1.0, Color::BLACK).dashed(vec![3.0, 3.0]);

        let origin = Vector::new(0.0, 12.0);
        let used = r.draw_cross_y(origin, &stroke).unwrap();
        assert_eq!(used, Vector::new(0.5, 12.0));
        // the caller's value is untouched
        assert_eq!(origin.x, 0.0);
        assert_eq!(r.draw_cross_y(Vector::new(301.0, 0.0), &stroke).unwrap().x, 299.5);

        let log = log.borrow();
        assert!(log.items.contains(&DrawCommand::LineTo { x: 0.5, y: 100.0 }));
        assert!(log.strokes().all(|s| s.is_dashed()));
    }

    #[test]
    fn text_uses_top_baseline_and_configured_family() {
        let (r, log) = renderer(100.0, 100.0);
        r.draw_text(Vector::new(50.0, 10.0), "hello", Color::WHITE, 14.0, TextAlign::Left)
            .unwrap();

        let log = log.borrow();
        match log.last() {
            Some(DrawCommand::FillText { text, x, y, font, color }) => {
                assert_eq!(text, "hello");
                assert_eq!((*x, *y), (50.0, 10.0));
                assert_eq!(font.css(), "14px sans-serif");
                assert_eq!(font.align, TextAlign::Left);
                assert_eq!(font.baseline, TextBaseline::Top);
                assert_eq!(*color, Color::WHITE);
            }
            other => panic!("expected FillText, got {:?}", other),
        }
    }
}
