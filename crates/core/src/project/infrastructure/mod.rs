pub mod json_project_source;
