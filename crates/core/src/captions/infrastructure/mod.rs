pub mod file_caption_writer;
