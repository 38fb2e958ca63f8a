pub mod caption_writer;
pub mod scene_timing;
pub mod srt;
