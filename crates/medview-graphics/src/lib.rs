//! # Medview Graphics
//!
//! Interactive annotations drawn over medical images, and the calibrated
//! measurements derived from them.
//!
//! ## Core Components
//!
//! - **Handle points**: ordered control points, fixed or variable in number
//! - **Tools**: line, rectangle, ellipse, polygon, polyline, angle tools,
//!   Cobb angle, parallel and perpendicular lines, point, pixel info and
//!   three-point circle
//! - **Drag sequences**: press/drag/release protocol used to draw and edit
//! - **Measurements**: lengths, areas, angles and pixel statistics scaled by
//!   the image calibration
//! - **Layer**: selection, hit-testing and double-click routing
//! - **Serialization**: JSON annotation documents
//!
//! ## Architecture
//!
//! ```text
//! PointerEvent
//!   └── DragSequence ── mutates ──> Graphic (HandlePoints)
//!                                     ├── GraphicShape (lyon paths)
//!                                     ├── MeasureItem list (MeasureContext)
//!                                     └── GraphicLabel
//! ```
//!
//! Every mutation returns a [`DirtyRegion`] telling the host what to repaint.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medview_core::Calibration;
//! use medview_graphics::{DragSequence, Graphic, GraphicKind, LineTool, MeasureContext, PointerEvent};
//!
//! let cal = Calibration::pixel();
//! let ctx = MeasureContext::new(&cal);
//! let mut line = Graphic::new(GraphicKind::Line(LineTool));
//! let mut seq = DragSequence::drawing();
//! seq.start_drag(&mut line, &PointerEvent::at(0.0, 0.0));
//! seq.drag(&mut line, &PointerEvent::at(3.0, 4.0), &ctx);
//! seq.complete_drag(&mut line, &PointerEvent::at(3.0, 4.0), &ctx);
//! ```

pub mod drag;
pub mod geometry;
pub mod graphic;
pub mod label;
pub mod layer;
pub mod measure;
pub mod model;
pub mod serialization;
pub mod statistics;

pub use drag::{DragOutcome, DragSequence, DragState, LabelDragSequence, PointerEvent};
pub use graphic::Graphic;
pub use label::GraphicLabel;
pub use layer::{DoubleClickAction, GraphicLayer, LayerHit};
pub use measure::{names, MeasureContext, MeasureItem, Measurement, MeasurementCatalog};
pub use model::{
    AngleTool, Bounds, CobbAngleTool, DirtyRegion, DragTarget, EllipseTool, FourPointsAngleTool,
    GraphicKind, GraphicShape, GraphicTool, HandlePoints, LineTool, OpenAngleTool,
    ParallelLineTool, PerpendicularLineTool, PixelInfoTool, Point, PointCount, PointTool,
    PolygonTool, PolylineTool, RectangleHandle, RectangleTool, ThreePointsCircleTool,
};
pub use serialization::{AnnotationDocument, GraphicData};
pub use statistics::{BandStatistics, ImageSampler, PixelSampler};
