//! Pixel value probe: an arrow pointing at the sampled pixel, linked to a
//! label box placed by the user.

use medview_core::format_value;

use crate::geometry::{arrow_barbs, colinear_point_with_length};
use crate::measure::{names, MeasureCollector, MeasureContext, MeasureItem, Measurement};
use crate::model::shape::{polyline_path, segment_path, GraphicShape};
use crate::model::{Bounds, GraphicTool, HandlePoints, Point, PointCount};

/// Arrow head length and width in screen pixels
const ARROW_LENGTH: f64 = 15.0;
const ARROW_WIDTH: f64 = 8.0;

/// Label text when the anchor is outside the image or nothing is sampled
pub const NO_VALUE: &str = "no value";

/// Handles are the probed anchor and the label box position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelInfoTool;

impl GraphicTool for PixelInfoTool {
    fn class_id(&self) -> &'static str {
        "pixel_info"
    }

    fn name(&self) -> &'static str {
        "Pixel Info"
    }

    fn point_count(&self) -> PointCount {
        PointCount::Fixed(2)
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape> {
        let (anchor, label_box) = match points {
            [a, b, ..] if a != b => (*a, *b),
            _ => return None,
        };
        let mut shape = GraphicShape::new(segment_path(label_box, anchor), false);
        // Arrow head in screen pixels, pointing at the anchor
        let far = Point::new(label_box.x - anchor.x, label_box.y - anchor.y);
        if let Some(tail) = colinear_point_with_length(Point::default(), far, ARROW_LENGTH * 2.0) {
            if let Some((left, right)) =
                arrow_barbs(tail, Point::default(), ARROW_LENGTH, ARROW_WIDTH)
            {
                shape.add_invariant(polyline_path(&[left, Point::default(), right], true), anchor);
            }
        }
        Some(shape)
    }

    fn is_shape_valid(&self, handles: &HandlePoints) -> bool {
        handles.is_complete()
    }

    fn measurement_list(&self) -> Vec<Measurement> {
        vec![
            names::ANCHOR_X,
            names::ANCHOR_Y,
            names::PIXEL_X,
            names::PIXEL_Y,
            names::PIXEL_VALUE,
        ]
    }

    fn compute_measurements(
        &self,
        points: &[Point],
        _shape: Option<&GraphicShape>,
        ctx: &MeasureContext<'_>,
    ) -> Vec<MeasureItem> {
        let Some(anchor) = points.first().copied() else {
            return Vec::new();
        };
        let cal = ctx.calibration();
        let unit = cal.length_unit();
        let mut m = MeasureCollector::new(self.class_id(), ctx);
        m.add(names::ANCHOR_X, unit.as_str(), || Some(cal.x_calibrated(anchor.x)));
        m.add(names::ANCHOR_Y, unit.as_str(), || Some(cal.y_calibrated(anchor.y)));
        if cal.unit().is_physical() {
            m.add(names::PIXEL_X, "pix", || Some(anchor.x.floor()));
            m.add(names::PIXEL_Y, "pix", || Some(anchor.y.floor()));
        }

        if let Some(sampler) = ctx.sampler() {
            let (x, y) = (anchor.x.floor(), anchor.y.floor());
            let inside = x >= 0.0 && y >= 0.0;
            let value_unit = cal.pixel_value_unit().unwrap_or("");
            let bands = sampler.band_count();
            for band in 0..bands {
                let extension = (bands > 1).then(|| format!(" {}", band + 1));
                m.add_with_extension(names::PIXEL_VALUE, extension, value_unit, || {
                    if !inside {
                        return None;
                    }
                    sampler
                        .sample(x as u32, y as u32, band)
                        .map(|raw| cal.pixel_to_real(raw))
                });
            }
        }
        m.finish()
    }

    /// The sampled values on a single line, or `no value`
    fn label_lines(&self, items: &[MeasureItem], decimals: usize) -> Vec<String> {
        let values: Vec<String> = items
            .iter()
            .filter(|item| item.measurement.id == names::PIXEL_VALUE.id)
            .filter_map(|item| {
                item.value.map(|v| {
                    if item.unit.is_empty() {
                        format_value(v, decimals)
                    } else {
                        format!("{} {}", format_value(v, decimals), item.unit)
                    }
                })
            })
            .collect();
        if values.is_empty() {
            vec![NO_VALUE.to_string()]
        } else {
            vec![values.join(", ")]
        }
    }

    fn label_anchor(&self, points: &[Point], _bounds: Option<Bounds>) -> Option<Point> {
        points.get(1).copied()
    }
}
