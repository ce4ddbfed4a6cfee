pub mod pdf;
pub mod pipeline;
pub mod project;
pub mod renderer;
pub mod runlog;
pub mod scratch;
