/// Seconds of speech assumed per character when a segment has no transcript evidence.
pub const DEFAULT_SECS_PER_CHAR: f64 = 0.08;

/// Gap inserted after the previous caption when a fallback segment follows it.
pub const DEFAULT_GAP_SECS: f64 = 0.2;

/// Extra transcript words scanned past the expected segment end.
pub const DEFAULT_SEARCH_SLACK: usize = 3;

/// Characters compared by the prefix rule of the default matcher.
pub const DEFAULT_PREFIX_CHARS: usize = 2;

/// Duration given to a scene that produced no captions at all.
pub const EMPTY_SCENE_DURATION: f64 = 5.0;

/// Delimiter separating subtitle segments inside a `subtitle_display` string.
pub const SEGMENT_DELIMITER: &str = ";;";

pub const SCRIPTS_DIR: &str = "output/1_scripts";
pub const AUDIO_DIR: &str = "output/2_audio";
pub const SCENES_INDEX_FILENAME: &str = "scenes.json";
pub const TRANSCRIPT_SUFFIX: &str = "_whisper.json";
pub const TIMED_SUFFIX: &str = "_timed.json";
pub const SECTION_AUDIO_EXTENSION: &str = "mp3";
