#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use dfreport::config::Config;
use dfreport::domain::{Feature, FeatureClass, FieldDef, FieldType};
use dfreport::services::project::{Layout, MapDoc, MapFrame, Project, TextElement};
use geo::{coord, MultiPolygon, Rect};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated fixture environment: parcel and soil sources, a project file,
/// and a config pointing everything into one temp dir.
pub struct TestEnv {
    _tmp: TempDir,
    pub config_path: PathBuf,
    pub config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path();

        let parcel_source = root.join("parcels.json");
        fs::write(
            &parcel_source,
            serde_json::to_string(&parcel_fixture()).expect("serialize parcels"),
        )
        .expect("write parcel source");

        let soil_source = root.join("tree_soil_index.json");
        fs::write(
            &soil_source,
            serde_json::to_string(&soil_fixture()).expect("serialize soils"),
        )
        .expect("write soil source");

        let project_file = root.join("df_layout.json");
        fs::write(
            &project_file,
            serde_json::to_string(&project_fixture()).expect("serialize project"),
        )
        .expect("write project file");

        let config = Config {
            temp_root: root.join("temp"),
            parcel_source,
            soil_source,
            project_file,
            output_dir: root.join("out"),
            log_file: root.join("log/dfreport.log"),
            buffer_meters: 10.0,
        };
        let config_path = root.join("config.json");
        fs::write(
            &config_path,
            serde_json::to_string_pretty(&config).expect("serialize config"),
        )
        .expect("write config");

        Self {
            _tmp: tmp,
            config_path,
            config,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("dfreport");
        cmd.arg("--config").arg(&self.config_path);
        cmd
    }

    pub fn pdf_path(&self, file: &str) -> PathBuf {
        self.config.output_dir.join(file)
    }

    pub fn pdf_count(&self) -> usize {
        fs::read_dir(&self.config.output_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub fn log_contents(&self) -> String {
        fs::read_to_string(&self.config.log_file).unwrap_or_default()
    }
}

pub fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![Rect::new(
        coord! { x: x0, y: y0 },
        coord! { x: x1, y: y1 },
    )
    .to_polygon()])
}

pub fn attrs_from(value: serde_json::Value) -> BTreeMap<String, serde_json::Value> {
    value
        .as_object()
        .expect("attrs object")
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn text_field(name: &str) -> FieldDef {
    FieldDef::new(name, FieldType::Text, "")
}

fn double_field(name: &str) -> FieldDef {
    FieldDef::new(name, FieldType::Double, "")
}

fn parcel_feature(
    pid: &str,
    bounds: (f64, f64, f64, f64),
    gis_acres: f64,
    legal_acres: f64,
) -> Feature {
    let (x0, y0, x1, y1) = bounds;
    Feature {
        geometry: square(x0, y0, x1, y1),
        attrs: attrs_from(json!({
            "PID": pid,
            "ParcelNo": pid,
            "GIS_Acres": gis_acres,
            "legal_acreage": legal_acres,
            "appraisal_year": 2016,
            "assessed_value": 185000.0,
            "exemptions": "",
            "improvement_value": 52000.0,
            "land_value": 133000.0,
            "mailing_addr_city": "Coupeville",
            "mailing_addr_state": "WA",
            "mailing_addr_zip": "98239",
            "mailing_addr1": "PO Box 1",
            "mailing_addr2": "",
            "mailing_addr3": "",
            "market_value": 185000.0,
            "ModifyDate": "2023-01-15",
            "physical_addr": "123 Forest Rd",
            "physical_addr_city": "Coupeville",
            "physical_addr_state": "WA",
            "physical_addr_zip": "98239",
            "smartgov_url": "https://permits.example.gov/123",
            "taxpayer": "DOE, JANE",
            "water_source": "well",
        })),
    }
}

/// Two parcels: the first partially covered by soil polygon A (which also
/// sticks out past the parcel, producing union rows without a parcel
/// number), the second fully covered by soil polygon C.
fn parcel_fixture() -> FeatureClass {
    FeatureClass {
        name: "parcels".to_string(),
        fields: vec![
            text_field("PID"),
            text_field("ParcelNo"),
            double_field("GIS_Acres"),
            double_field("legal_acreage"),
            double_field("appraisal_year"),
            double_field("assessed_value"),
            text_field("exemptions"),
            double_field("improvement_value"),
            double_field("land_value"),
            text_field("mailing_addr_city"),
            text_field("mailing_addr_state"),
            text_field("mailing_addr_zip"),
            text_field("mailing_addr1"),
            text_field("mailing_addr2"),
            text_field("mailing_addr3"),
            double_field("market_value"),
            text_field("ModifyDate"),
            text_field("physical_addr"),
            text_field("physical_addr_city"),
            text_field("physical_addr_state"),
            text_field("physical_addr_zip"),
            text_field("smartgov_url"),
            text_field("taxpayer"),
            text_field("water_source"),
        ],
        features: vec![
            parcel_feature("123-45-6789", (-122.6000, 48.2000, -122.5990, 48.2007), 2.45, 2.50),
            parcel_feature("987-65-4321", (-122.5000, 48.3000, -122.4990, 48.3007), 5.10, 5.00),
        ],
    }
}

fn soil_feature(bounds: (f64, f64, f64, f64), class: &str, value_per_acre: f64) -> Feature {
    let (x0, y0, x1, y1) = bounds;
    Feature {
        geometry: square(x0, y0, x1, y1),
        attrs: attrs_from(json!({
            "SoilClass": class,
            "Val_Per_Acre2016": value_per_acre,
        })),
    }
}

fn soil_fixture() -> FeatureClass {
    FeatureClass {
        name: "tree_soil_index".to_string(),
        fields: vec![text_field("SoilClass"), double_field("Val_Per_Acre2016")],
        features: vec![
            soil_feature((-122.6005, 48.1995, -122.5995, 48.2010), "Forest 2", 850.0),
            soil_feature((-122.7000, 48.1000, -122.6990, 48.1010), "Forest 3", 500.0),
            soil_feature((-122.5005, 48.2995, -122.4985, 48.3012), "Forest 1", 640.0),
        ],
    }
}

fn project_fixture() -> Project {
    Project {
        maps: vec![MapDoc {
            name: "DF_Map".to_string(),
            layers: vec!["Soil_final".to_string()],
        }],
        layouts: vec![Layout {
            name: "DF_Layout".to_string(),
            page_width_in: 8.5,
            page_height_in: 11.0,
            frames: vec![MapFrame {
                name: "DF_Frame".to_string(),
                x_in: 0.75,
                y_in: 3.0,
                width_in: 7.0,
                height_in: 7.0,
            }],
            texts: vec![
                TextElement {
                    name: "DF_number_text".to_string(),
                    x_in: 7.0,
                    y_in: 10.3,
                },
                TextElement {
                    name: "Parcel Number Text".to_string(),
                    x_in: 1.0,
                    y_in: 10.3,
                },
                TextElement {
                    name: "GIS acre number text".to_string(),
                    x_in: 1.0,
                    y_in: 2.2,
                },
                TextElement {
                    name: "Legal acre number text".to_string(),
                    x_in: 1.0,
                    y_in: 1.9,
                },
            ],
        }],
    }
}
