pub mod project_source;
pub mod scene;
