//! Binds the finished `Soil_final` layer into the pre-authored layout,
//! populates the named text elements, and exports the report PDF.

use crate::config::Config;
use crate::domain::FeatureClass;
use crate::engine::{geodesy, store::ScratchStore};
use crate::services::pdf::{self, PageText, PdfPage};
use crate::services::pipeline::{
    FIELD_GIS_ACRES, FIELD_LEGAL_ACRES, FIELD_PARCEL_NO, FINAL_LAYER,
};
use crate::services::project::{Layout, MapFrame, Project, RenderError};
use anyhow::{Context, Result};
use geo::{BoundingRect, Rect};
use std::path::PathBuf;
use tracing::info;

pub const MAP_NAME: &str = "DF_Map";
pub const LAYOUT_NAME: &str = "DF_Layout";
pub const TEXT_DF_NUMBER: &str = "DF_number_text";
pub const TEXT_PARCEL_NO: &str = "Parcel Number Text";
pub const TEXT_GIS_ACRES: &str = "GIS acre number text";
pub const TEXT_LEGAL_ACRES: &str = "Legal acre number text";

/// Report number marking a dry run; the exported file gets a `_TEST` suffix
/// so it cannot be mistaken for a production report.
pub const TEST_SENTINEL: &str = "TEST";

const SCALE_MARGIN: f64 = 1.1;
const POINTS_PER_INCH: f64 = 72.0;
const METERS_PER_INCH: f64 = 0.0254;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportFields {
    pub parcel_no: String,
    pub gis_acres: f64,
    pub legal_acres: f64,
}

/// Values for the text elements, read from the first row whose parcel number
/// is non-empty. The union emits rows for soil pieces outside the parcel;
/// those carry no parcel attributes and must be skipped.
pub fn report_fields(layer: &FeatureClass) -> Result<ReportFields, RenderError> {
    for feature in &layer.features {
        let parcel_no = feature.attr_str(FIELD_PARCEL_NO).unwrap_or("");
        if parcel_no.is_empty() {
            continue;
        }
        return Ok(ReportFields {
            parcel_no: parcel_no.to_string(),
            gis_acres: round2(feature.attr_f64(FIELD_GIS_ACRES).unwrap_or(0.0)),
            legal_acres: round2(feature.attr_f64(FIELD_LEGAL_ACRES).unwrap_or(0.0)),
        });
    }
    Err(RenderError::NoData)
}

/// Tightest-fit display scale for an extent in a frame: ground meters per
/// page meter, the larger of the two axis ratios.
pub fn fit_scale(extent: &Rect<f64>, frame: &MapFrame) -> f64 {
    let (width_m, height_m) = geodesy::rect_size_meters(extent);
    let frame_width_m = frame.width_in * METERS_PER_INCH;
    let frame_height_m = frame.height_in * METERS_PER_INCH;
    (width_m / frame_width_m).max(height_m / frame_height_m)
}

/// Display scale actually used: tightest fit widened by 10% so feature edges
/// stay clear of the frame border.
pub fn frame_scale(extent: &Rect<f64>, frame: &MapFrame) -> f64 {
    fit_scale(extent, frame) * SCALE_MARGIN
}

pub fn render(config: &Config, store: &ScratchStore, df_number: &str) -> Result<PathBuf> {
    info!("connecting to project");
    let project = Project::load(&config.project_file)?;

    info!("getting layout objects");
    let map = project.map(MAP_NAME)?;
    let layout = project.layout(LAYOUT_NAME)?;
    map.layer(FINAL_LAYER)?;
    let frame = layout.first_frame()?;
    // resolve every text element up front so a renamed layout fails before export
    for name in [TEXT_DF_NUMBER, TEXT_PARCEL_NO, TEXT_GIS_ACRES, TEXT_LEGAL_ACRES] {
        layout.text(name)?;
    }

    let layer = store.read(FINAL_LAYER)?;

    info!("setting extent");
    let extent = layer_extent(&layer).ok_or(RenderError::NoData)?;
    let default_scale = fit_scale(&extent, frame);
    let scale = frame_scale(&extent, frame);
    info!("default scale: {}:1", default_scale.round());
    info!("updated scale: {}:1", scale.round());

    let fields = report_fields(&layer)?;
    info!("setting DF number to: {df_number}");
    info!("setting parcel number text to: {}", fields.parcel_no);
    info!("setting GIS acres text to: {}", fields.gis_acres);
    info!("setting legal acres text to: {}", fields.legal_acres);

    let mut file_stem = fields.parcel_no.clone();
    if df_number == TEST_SENTINEL {
        file_stem.push_str("_TEST");
    }
    std::fs::create_dir_all(&config.output_dir).context("create output directory")?;
    let pdf_path = config.output_dir.join(format!("DF_{file_stem}.pdf"));

    info!("exporting map");
    let page = compose_page(layout, frame, &layer, &extent, df_number, &fields)?;
    pdf::export(&pdf_path, &page).context("export layout to PDF")?;
    info!("done exporting {}", pdf_path.display());

    Ok(pdf_path)
}

fn layer_extent(layer: &FeatureClass) -> Option<Rect<f64>> {
    let mut extent: Option<Rect<f64>> = None;
    for feature in &layer.features {
        let Some(rect) = feature.geometry.bounding_rect() else {
            continue;
        };
        extent = Some(match extent {
            None => rect,
            Some(acc) => Rect::new(
                geo::coord! {
                    x: acc.min().x.min(rect.min().x),
                    y: acc.min().y.min(rect.min().y),
                },
                geo::coord! {
                    x: acc.max().x.max(rect.max().x),
                    y: acc.max().y.max(rect.max().y),
                },
            ),
        });
    }
    extent
}

fn compose_page(
    layout: &Layout,
    frame: &MapFrame,
    layer: &FeatureClass,
    extent: &Rect<f64>,
    df_number: &str,
    fields: &ReportFields,
) -> Result<PdfPage> {
    let frame_rect = (
        frame.x_in * POINTS_PER_INCH,
        frame.y_in * POINTS_PER_INCH,
        frame.width_in * POINTS_PER_INCH,
        frame.height_in * POINTS_PER_INCH,
    );

    // uniform map-to-page transform at the widened scale, centered in the frame
    let scale_x = frame_rect.2 / extent.width().max(f64::EPSILON);
    let scale_y = frame_rect.3 / extent.height().max(f64::EPSILON);
    let k = scale_x.min(scale_y) / SCALE_MARGIN;
    let center = extent.center();
    let frame_cx = frame_rect.0 + frame_rect.2 / 2.0;
    let frame_cy = frame_rect.1 + frame_rect.3 / 2.0;

    let mut outlines = Vec::new();
    for feature in &layer.features {
        for polygon in &feature.geometry.0 {
            let ring: Vec<(f64, f64)> = polygon
                .exterior()
                .0
                .iter()
                .map(|c| {
                    (
                        frame_cx + (c.x - center.x) * k,
                        frame_cy + (c.y - center.y) * k,
                    )
                })
                .collect();
            if !ring.is_empty() {
                outlines.push(ring);
            }
        }
    }

    let mut texts = Vec::new();
    for (name, value) in [
        (TEXT_DF_NUMBER, df_number.to_string()),
        (TEXT_PARCEL_NO, fields.parcel_no.clone()),
        (TEXT_GIS_ACRES, format!("{:.2}", fields.gis_acres)),
        (TEXT_LEGAL_ACRES, format!("{:.2}", fields.legal_acres)),
    ] {
        let element = layout.text(name)?;
        texts.push(PageText {
            x_pt: element.x_in * POINTS_PER_INCH,
            y_pt: element.y_in * POINTS_PER_INCH,
            text: value,
        });
    }

    Ok(PdfPage {
        width_pt: layout.page_width_in * POINTS_PER_INCH,
        height_pt: layout.page_height_in * POINTS_PER_INCH,
        frame_rect,
        outlines,
        texts,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
