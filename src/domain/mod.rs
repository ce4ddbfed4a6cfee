pub mod models;

pub use models::{Feature, FeatureClass, FieldDef, FieldType};
