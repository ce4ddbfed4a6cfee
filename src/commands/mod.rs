pub mod batch;
pub mod run;
