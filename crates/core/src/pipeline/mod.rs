pub mod infrastructure;
pub mod section_executor;
pub mod section_job;
pub mod time_scenes_use_case;
