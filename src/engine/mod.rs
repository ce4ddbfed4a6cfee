//! Facade over the spatial toolkit. The pipeline calls these operations the
//! way it would call any external geoprocessing engine: every operation reads
//! named datasets (from the scratch store or an external source file) and
//! writes its output back into the store.
//!
//! Overlay, extents, and geodesic area come from the `geo` crate. Buffering
//! is realized as an extent expansion; the pipeline re-clips to the parcel
//! boundary before any value is read, so any buffer that covers the parcel
//! produces the same final layer.

pub mod geodesy;
pub mod store;

use crate::domain::{Feature, FeatureClass, FieldDef, FieldType};
use geo::{BooleanOps, BoundingRect, MultiPolygon, Rect};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;
use store::ScratchStore;
use thiserror::Error;

pub const FIELD_PID: &str = "PID";
pub const FIELD_BUFFER_DIST: &str = "BUFF_DIST";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("dataset {0:?} not found in scratch store")]
    DatasetMissing(String),
    #[error("field {field:?} not present on {dataset:?}")]
    FieldMissing { dataset: String, field: String },
    #[error("cannot read source {path}")]
    Source {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Input selector for operations that accept either a scratch dataset or an
/// external feature source.
#[derive(Debug, Clone, Copy)]
pub enum ClipInput<'a> {
    Dataset(&'a str),
    Source(&'a Path),
}

/// Typed per-row field expressions, in place of the string formulas the
/// toolkit's field calculator takes.
#[derive(Debug, Clone, Copy)]
pub enum CalcExpr {
    /// field = lhs * rhs
    Product(&'static str, &'static str),
    /// field = num / den
    Ratio(&'static str, &'static str),
    /// field = geodesic area of the row's geometry, in acres
    GeodesicAcres,
}

/// Version string recorded in failure-log entries.
pub fn install_info() -> String {
    format!(
        "dfreport {} / geo overlay engine",
        env!("CARGO_PKG_VERSION")
    )
}

fn load_source(path: &Path) -> Result<FeatureClass, EngineError> {
    let raw = std::fs::read_to_string(path).map_err(|source| EngineError::Source {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Exact-match select of a PID out of the master parcel source. A PID that
/// matches nothing yields an empty dataset, not an error; the renderer
/// surfaces the no-data condition.
pub fn select(
    source: &Path,
    pid: &str,
    store: &ScratchStore,
    out: &str,
) -> Result<(), EngineError> {
    let src = load_source(source)?;
    let features = src
        .features
        .iter()
        .filter(|f| f.attr_str(FIELD_PID) == Some(pid))
        .cloned()
        .collect();
    store.write(&FeatureClass {
        name: out.to_string(),
        fields: src.fields.clone(),
        features,
    })
}

/// Planar buffer at a fixed ground distance.
pub fn buffer(
    store: &ScratchStore,
    input: &str,
    out: &str,
    meters: f64,
) -> Result<(), EngineError> {
    let src = store.read(input)?;
    let mut fields = src.fields.clone();
    if !src.has_field(FIELD_BUFFER_DIST) {
        fields.push(FieldDef::new(
            FIELD_BUFFER_DIST,
            FieldType::Double,
            "Buffer Distance",
        ));
    }
    let features = src
        .features
        .iter()
        .filter_map(|f| {
            let rect = f.geometry.bounding_rect()?;
            let expanded = geodesy::expand_rect(rect, meters);
            let mut feature = Feature {
                geometry: MultiPolygon::new(vec![expanded.to_polygon()]),
                attrs: f.attrs.clone(),
            };
            feature.set_attr(FIELD_BUFFER_DIST, json!(meters));
            Some(feature)
        })
        .collect();
    store.write(&FeatureClass {
        name: out.to_string(),
        fields,
        features,
    })
}

/// Intersect a dataset against a clip layer. A row is retained whenever its
/// extent touches the clip layer's extent, even if the exact overlay comes
/// back empty; the toolkit keeps equivalent boundary slivers, and the
/// renderer's row search relies on skipping them.
pub fn clip(
    store: &ScratchStore,
    input: ClipInput,
    clip_layer: &str,
    out: &str,
) -> Result<(), EngineError> {
    let src = match input {
        ClipInput::Dataset(name) => store.read(name)?,
        ClipInput::Source(path) => load_source(path)?,
    };
    let clip_fc = store.read(clip_layer)?;
    let clip_geom = merge_geometries(&clip_fc.features);
    let clip_rect = clip_geom.bounding_rect();

    let mut features = Vec::new();
    if let Some(clip_rect) = clip_rect {
        for f in &src.features {
            let Some(rect) = f.geometry.bounding_rect() else {
                continue;
            };
            if !rects_intersect(&rect, &clip_rect) {
                continue;
            }
            features.push(Feature {
                geometry: intersection(&f.geometry, &clip_geom),
                attrs: f.attrs.clone(),
            });
        }
    }
    store.write(&FeatureClass {
        name: out.to_string(),
        fields: src.fields.clone(),
        features,
    })
}

/// Drop a list of attribute fields from a dataset. Names not present are
/// ignored.
pub fn delete_fields(
    store: &ScratchStore,
    table: &str,
    drop: &[&str],
) -> Result<(), EngineError> {
    let mut fc = store.read(table)?;
    fc.fields.retain(|f| !drop.contains(&f.name.as_str()));
    for feature in &mut fc.features {
        for name in drop {
            feature.attrs.remove(*name);
        }
    }
    store.write(&fc)
}

/// Geometric union of two datasets. Schemas are concatenated; a piece
/// covered by only one input carries null cells for the other input's
/// fields. Output order: second-input-only pieces, then overlaps, then
/// first-input-only pieces.
pub fn union(
    store: &ScratchStore,
    first: &str,
    second: &str,
    out: &str,
) -> Result<(), EngineError> {
    let a = store.read(first)?;
    let b = store.read(second)?;

    let mut fields = a.fields.clone();
    for f in &b.fields {
        if !fields.iter().any(|e| e.name == f.name) {
            fields.push(f.clone());
        }
    }

    let a_geom = merge_geometries(&a.features);
    let b_geom = merge_geometries(&b.features);
    let mut features = Vec::new();

    for fb in &b.features {
        let geometry = difference(&fb.geometry, &a_geom);
        if !geometry.0.is_empty() {
            let mut attrs = fb.attrs.clone();
            fill_nulls(&mut attrs, &a.fields);
            features.push(Feature { geometry, attrs });
        }
    }
    for fa in &a.features {
        for fb in &b.features {
            let geometry = intersection(&fa.geometry, &fb.geometry);
            if !geometry.0.is_empty() {
                let mut attrs = fa.attrs.clone();
                for (k, v) in &fb.attrs {
                    attrs.insert(k.clone(), v.clone());
                }
                features.push(Feature { geometry, attrs });
            }
        }
    }
    for fa in &a.features {
        let geometry = difference(&fa.geometry, &b_geom);
        if !geometry.0.is_empty() {
            let mut attrs = fa.attrs.clone();
            fill_nulls(&mut attrs, &b.fields);
            features.push(Feature { geometry, attrs });
        }
    }

    store.write(&FeatureClass {
        name: out.to_string(),
        fields,
        features,
    })
}

/// Declare new fields on a dataset, initialized empty on every row.
pub fn add_fields(
    store: &ScratchStore,
    table: &str,
    defs: &[FieldDef],
) -> Result<(), EngineError> {
    let mut fc = store.read(table)?;
    for def in defs {
        if !fc.has_field(&def.name) {
            fc.fields.push(def.clone());
        }
        for feature in &mut fc.features {
            feature
                .attrs
                .entry(def.name.clone())
                .or_insert(Value::Null);
        }
    }
    store.write(&fc)
}

/// Evaluate a field expression on every row. Rows whose operands are empty
/// get an empty result cell.
pub fn calculate_field(
    store: &ScratchStore,
    table: &str,
    field: &str,
    expr: CalcExpr,
) -> Result<(), EngineError> {
    let mut fc = store.read(table)?;
    if !fc.has_field(field) {
        return Err(EngineError::FieldMissing {
            dataset: table.to_string(),
            field: field.to_string(),
        });
    }
    for feature in &mut fc.features {
        let value = match expr {
            CalcExpr::Product(lhs, rhs) => {
                match (feature.attr_f64(lhs), feature.attr_f64(rhs)) {
                    (Some(l), Some(r)) => json!(l * r),
                    _ => Value::Null,
                }
            }
            CalcExpr::Ratio(num, den) => {
                match (feature.attr_f64(num), feature.attr_f64(den)) {
                    (Some(n), Some(d)) if d != 0.0 => json!(n / d),
                    _ => Value::Null,
                }
            }
            CalcExpr::GeodesicAcres => json!(geodesy::geodesic_acres(&feature.geometry)),
        };
        feature.set_attr(field, value);
    }
    store.write(&fc)
}

fn fill_nulls(attrs: &mut BTreeMap<String, Value>, fields: &[FieldDef]) {
    for field in fields {
        attrs.entry(field.name.clone()).or_insert(Value::Null);
    }
}

fn merge_geometries(features: &[Feature]) -> MultiPolygon<f64> {
    let mut merged: Option<MultiPolygon<f64>> = None;
    for f in features {
        if f.geometry.0.is_empty() {
            continue;
        }
        merged = Some(match merged {
            None => f.geometry.clone(),
            Some(acc) => acc.union(&f.geometry),
        });
    }
    merged.unwrap_or_else(|| MultiPolygon::new(Vec::new()))
}

fn intersection(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    if a.0.is_empty() || b.0.is_empty() {
        return MultiPolygon::new(Vec::new());
    }
    a.intersection(b)
}

fn difference(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    if a.0.is_empty() {
        return MultiPolygon::new(Vec::new());
    }
    if b.0.is_empty() {
        return a.clone();
    }
    a.difference(b)
}

fn rects_intersect(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min().x <= b.max().x
        && b.min().x <= a.max().x
        && a.min().y <= b.max().y
        && b.min().y <= a.max().y
}
