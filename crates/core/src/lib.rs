pub mod alignment;
pub mod captions;
pub mod pipeline;
pub mod project;
pub mod shared;
