//! Save and load annotation documents.
//!
//! Documents are JSON files holding the handle points and paint
//! attributes of every graphic. Shapes and labels are derived data and are
//! rebuilt on load.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use medview_core::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use crate::graphic::Graphic;
use crate::layer::GraphicLayer;
use crate::model::{GraphicKind, GraphicTool, Point};

/// Annotation file format version
const FILE_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationDocument {
    pub version: String,
    pub metadata: DocumentMetadata,
    pub graphics: Vec<GraphicData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    /// Image the annotations belong to
    #[serde(default)]
    pub image: Option<String>,
}

/// Serialized graphic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphicData {
    pub id: Uuid,
    pub class_id: String,
    pub points: Vec<Point>,
    #[serde(default)]
    pub color: Color,
    #[serde(default = "default_thickness")]
    pub thickness: f64,
    #[serde(default)]
    pub filled: bool,
    #[serde(default = "default_label_visible")]
    pub label_visible: bool,
    #[serde(default)]
    pub layer: u32,
}

fn default_thickness() -> f64 {
    1.0
}

fn default_label_visible() -> bool {
    true
}

impl GraphicData {
    pub fn from_graphic(graphic: &Graphic) -> Self {
        Self {
            id: graphic.id(),
            class_id: graphic.class_id().to_string(),
            points: graphic.points().to_vec(),
            color: graphic.color(),
            thickness: graphic.thickness(),
            filled: graphic.is_filled(),
            label_visible: graphic.is_label_visible(),
            layer: graphic.layer(),
        }
    }

    /// Rebuild the graphic. Fails on unknown classes and unusable points.
    pub fn to_graphic(&self) -> Result<Graphic> {
        let kind = GraphicKind::from_class_id(&self.class_id)
            .with_context(|| format!("Unknown graphic class: {}", self.class_id))?;
        let mut graphic = Graphic::from_points(kind, &self.points)
            .with_context(|| format!("Invalid {} graphic {}", self.class_id, self.id))?;
        graphic.set_id(self.id);
        graphic.set_color(self.color);
        graphic.set_thickness(self.thickness);
        graphic.set_filled(self.filled);
        graphic.set_layer(self.layer);
        if !self.label_visible {
            graphic.hide_label();
        }
        Ok(graphic)
    }
}

impl AnnotationDocument {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: DocumentMetadata {
                name: name.into(),
                created: now,
                modified: now,
                image: None,
            },
            graphics: Vec::new(),
        }
    }

    pub fn from_layer(name: impl Into<String>, layer: &GraphicLayer) -> Self {
        let mut doc = Self::new(name);
        doc.graphics = layer.graphics().iter().map(GraphicData::from_graphic).collect();
        doc
    }

    /// Graphics of the document. Entries that cannot be rebuilt are
    /// skipped with a warning.
    pub fn to_layer(&self) -> GraphicLayer {
        let mut layer = GraphicLayer::new();
        for data in &self.graphics {
            match data.to_graphic() {
                Ok(graphic) => {
                    layer.add(graphic);
                }
                Err(err) => warn!(id = %data.id, "skipping graphic: {err:#}"),
            }
        }
        layer
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize annotations")?;
        std::fs::write(path.as_ref(), json).context("Failed to write annotation file")?;
        info!(path = %path.as_ref().display(), graphics = self.graphics.len(), "annotations saved");
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .context("Failed to read annotation file")?;
        let mut doc: AnnotationDocument =
            serde_json::from_str(&content).context("Failed to parse annotation file")?;
        doc.metadata.modified = Utc::now();
        info!(path = %path.as_ref().display(), graphics = doc.graphics.len(), "annotations loaded");
        Ok(doc)
    }
}
