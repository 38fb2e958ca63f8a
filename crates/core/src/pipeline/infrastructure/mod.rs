pub mod threaded_section_executor;
