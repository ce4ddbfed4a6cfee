//! Typed registry over the pre-authored cartographic project file. Lookups
//! are by name and fail fast with a distinguishable error when a name is
//! absent, instead of an index error into an untyped element list.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("project has no map named {0:?}")]
    MapMissing(String),
    #[error("project has no layout named {0:?}")]
    LayoutMissing(String),
    #[error("map {map:?} has no layer named {layer:?}")]
    LayerMissing { map: String, layer: String },
    #[error("layout {0:?} has no map frame")]
    FrameMissing(String),
    #[error("layout {layout:?} has no text element named {name:?}")]
    TextMissing { layout: String, name: String },
    #[error("final layer has no row with a parcel number")]
    NoData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub maps: Vec<MapDoc>,
    pub layouts: Vec<Layout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDoc {
    pub name: String,
    pub layers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    #[serde(default = "default_page_width")]
    pub page_width_in: f64,
    #[serde(default = "default_page_height")]
    pub page_height_in: f64,
    pub frames: Vec<MapFrame>,
    pub texts: Vec<TextElement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapFrame {
    pub name: String,
    pub x_in: f64,
    pub y_in: f64,
    pub width_in: f64,
    pub height_in: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextElement {
    pub name: String,
    #[serde(default)]
    pub x_in: f64,
    #[serde(default)]
    pub y_in: f64,
}

fn default_page_width() -> f64 {
    8.5
}

fn default_page_height() -> f64 {
    11.0
}

impl Project {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read project {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parse project {}", path.display()))
    }

    pub fn map(&self, name: &str) -> Result<&MapDoc, RenderError> {
        self.maps
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| RenderError::MapMissing(name.to_string()))
    }

    pub fn layout(&self, name: &str) -> Result<&Layout, RenderError> {
        self.layouts
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| RenderError::LayoutMissing(name.to_string()))
    }
}

impl MapDoc {
    pub fn layer(&self, name: &str) -> Result<&str, RenderError> {
        self.layers
            .iter()
            .find(|l| l.as_str() == name)
            .map(String::as_str)
            .ok_or_else(|| RenderError::LayerMissing {
                map: self.name.clone(),
                layer: name.to_string(),
            })
    }
}

impl Layout {
    pub fn first_frame(&self) -> Result<&MapFrame, RenderError> {
        self.frames
            .first()
            .ok_or_else(|| RenderError::FrameMissing(self.name.clone()))
    }

    pub fn text(&self, name: &str) -> Result<&TextElement, RenderError> {
        self.texts
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| RenderError::TextMissing {
                layout: self.name.clone(),
                name: name.to_string(),
            })
    }
}
