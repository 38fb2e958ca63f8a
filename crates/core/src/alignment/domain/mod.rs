pub mod alignment_engine;
pub mod alignment_params;
pub mod alignment_result;
pub mod even_split;
pub mod text_normalizer;
pub mod transcript;
pub mod word_matcher;
