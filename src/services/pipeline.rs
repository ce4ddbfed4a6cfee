//! The geometry pipeline: turns a PID into the finished `Soil_final` layer
//! inside the run's scratch store. Every step depends on the previous one's
//! output, so the order is fixed.

use crate::config::Config;
use crate::domain::{FieldDef, FieldType};
use crate::engine::{self, store::ScratchStore, CalcExpr, ClipInput};
use anyhow::{Context, Result};
use tracing::info;

const PARCEL: &str = "Parcel";
const PARCEL_BUFFER: &str = "Parcel_buffer";
const SOIL_CLIP: &str = "TreeSoil_clip";
const PARCEL_SOIL_UNION: &str = "ParcelTree_Union";
pub const FINAL_LAYER: &str = "Soil_final";

pub const FIELD_PARCEL_NO: &str = "ParcelNo";
pub const FIELD_GIS_ACRES: &str = "GIS_Acres";
pub const FIELD_LEGAL_ACRES: &str = "legal_acreage";
pub const FIELD_VALUE: &str = "DF_VALUE";
pub const FIELD_ACRE_RATIO: &str = "ACRE_RATIO";
/// Holds acres, not square feet. The name is wrong, but the layout's text
/// bindings expect it, so it stays.
pub const FIELD_SQ_FT: &str = "SQ_FT";
const FIELD_VAL_PER_ACRE: &str = "Val_Per_Acre2016";

/// Assessment, address, and contact fields dropped from the parcel before
/// the union. They are noise on the map product, and several are not for
/// publication.
const DROPPED_FIELDS: &[&str] = &[
    "appraisal_year",
    "assessed_value",
    "exemptions",
    "improvement_value",
    "land_value",
    "mailing_addr_city",
    "mailing_addr_state",
    "mailing_addr_zip",
    "mailing_addr1",
    "mailing_addr2",
    "mailing_addr3",
    "market_value",
    "ModifyDate",
    "physical_addr",
    "physical_addr_city",
    "physical_addr_state",
    "physical_addr_zip",
    "smartgov_url",
    "taxpayer",
    "water_source",
];

pub fn run(config: &Config, store: &ScratchStore, pid: &str) -> Result<()> {
    info!("selecting parcel");
    engine::select(&config.parcel_source, pid, store, PARCEL).context("select parcel")?;

    info!("buffering parcel");
    engine::buffer(store, PARCEL, PARCEL_BUFFER, config.buffer_meters)
        .context("buffer parcel")?;

    info!("clipping soil layer");
    engine::clip(
        store,
        ClipInput::Source(&config.soil_source),
        PARCEL_BUFFER,
        SOIL_CLIP,
    )
    .context("clip soil index to buffer")?;

    info!("deleting fields");
    engine::delete_fields(store, PARCEL, DROPPED_FIELDS).context("prune parcel fields")?;

    info!("unioning parcel and soil");
    engine::union(store, PARCEL, SOIL_CLIP, PARCEL_SOIL_UNION)
        .context("union parcel and soil clip")?;

    info!("adding derived fields");
    engine::add_fields(
        store,
        PARCEL_SOIL_UNION,
        &[
            FieldDef::new(FIELD_VALUE, FieldType::Double, "Value"),
            FieldDef::new(FIELD_ACRE_RATIO, FieldType::Double, "Acre Ratio"),
            FieldDef::new(FIELD_SQ_FT, FieldType::Double, "Square Feet"),
        ],
    )
    .context("add derived fields")?;

    info!("clipping soil to parcel");
    engine::clip(
        store,
        ClipInput::Dataset(PARCEL_SOIL_UNION),
        PARCEL,
        FINAL_LAYER,
    )
    .context("clip union to parcel boundary")?;

    info!("calculating value field");
    engine::calculate_field(
        store,
        FINAL_LAYER,
        FIELD_VALUE,
        CalcExpr::Product(FIELD_VAL_PER_ACRE, FIELD_GIS_ACRES),
    )
    .context("calculate value field")?;

    info!("calculating acre ratio field");
    engine::calculate_field(
        store,
        FINAL_LAYER,
        FIELD_ACRE_RATIO,
        CalcExpr::Ratio(FIELD_LEGAL_ACRES, FIELD_GIS_ACRES),
    )
    .context("calculate acre ratio field")?;

    info!("calculating area field");
    engine::calculate_field(store, FINAL_LAYER, FIELD_SQ_FT, CalcExpr::GeodesicAcres)
        .context("calculate area field")?;

    Ok(())
}
