mod settings;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use caption_align_core::alignment::domain::word_matcher::MatchStrategy;
use caption_align_core::captions::domain::scene_timing::SceneTiming;
use caption_align_core::captions::domain::srt::render_srt;
use caption_align_core::captions::infrastructure::file_caption_writer::FileCaptionWriter;
use caption_align_core::pipeline::infrastructure::threaded_section_executor::ThreadedSectionExecutor;
use caption_align_core::pipeline::section_executor::{SectionExecutor, SequentialSectionExecutor};
use caption_align_core::pipeline::section_job::TimingMode;
use caption_align_core::pipeline::time_scenes_use_case::TimeScenesUseCase;
use caption_align_core::project::domain::scene::split_subtitle_display;
use caption_align_core::project::infrastructure::json_project_source::{
    load_transcript, JsonProjectSource,
};
use caption_align_core::shared::constants::TRANSCRIPT_SUFFIX;

use settings::Settings;

/// Times subtitle segments against word-level transcripts.
#[derive(Parser)]
#[command(name = "caption-align")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Time every scene of a project and write SRT and timing reports.
    Time(TimeArgs),
    /// Align one segment file against one transcript.
    Align(AlignArgs),
}

#[derive(Args)]
struct TimeArgs {
    /// Project root containing output/1_scripts and output/2_audio.
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Only time these sections (comma-separated or repeated).
    #[arg(long = "section", value_delimiter = ',')]
    sections: Vec<String>,

    /// Timing mode: aligned or even.
    #[arg(long)]
    mode: Option<String>,

    /// Sections timed in parallel (1 = sequential).
    #[arg(long)]
    workers: Option<usize>,

    /// Where caption files are written (defaults to the audio directory).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    tuning: TuningArgs,
}

#[derive(Args)]
struct AlignArgs {
    /// Word-level transcript JSON (`{ "words": [{ "word", "start", "end" }] }`).
    #[arg(long)]
    transcript: PathBuf,

    /// Segments: a JSON array of strings, or text with one segment per line or `;;`.
    #[arg(long)]
    segments: PathBuf,

    /// Write SRT here (printed to stdout when neither --srt nor --json is given).
    #[arg(long)]
    srt: Option<PathBuf>,

    /// Write the timing report here.
    #[arg(long)]
    json: Option<PathBuf>,

    #[command(flatten)]
    tuning: TuningArgs,
}

#[derive(Args)]
struct TuningArgs {
    /// Settings file (defaults to the per-user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Word matcher: prefix or substring.
    #[arg(long)]
    matcher: Option<String>,

    /// Leading characters compared by the prefix matcher.
    #[arg(long)]
    prefix_chars: Option<usize>,

    /// Estimated seconds per character for unmatched segments.
    #[arg(long)]
    secs_per_char: Option<f64>,

    /// Seconds between an unmatched segment and the one before it.
    #[arg(long)]
    gap: Option<f64>,

    /// Extra words scanned past a segment's expected end.
    #[arg(long)]
    search_slack: Option<usize>,

    /// Let the end-word scan stop on a segment's first word.
    #[arg(long)]
    inclusive_end_scan: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Time(args) => run_time(args),
        Command::Align(args) => run_align(args),
    }
}

fn run_time(args: TimeArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate_time(&args)?;
    let mut settings = resolve_settings(&args.tuning)?;
    if let Some(mode) = args.mode.as_deref().and_then(TimingMode::parse) {
        settings.mode = mode;
    }
    if let Some(workers) = args.workers {
        settings.workers = workers;
    }
    settings.validate()?;

    let source = JsonProjectSource::new(&args.project_dir);
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| source.audio_dir().to_path_buf());
    let executor: Box<dyn SectionExecutor> = if settings.workers > 1 {
        Box::new(ThreadedSectionExecutor::with_workers(settings.workers))
    } else {
        Box::new(SequentialSectionExecutor)
    };

    let use_case = TimeScenesUseCase::new(
        Box::new(source),
        Box::new(FileCaptionWriter::new(&output_dir)),
        settings.build_engine(),
        executor,
        settings.mode,
    )
    .with_sections(args.sections);
    let reports = use_case.run()?;

    let scenes: usize = reports.iter().map(|r| r.scenes.len()).sum();
    log::info!(
        "Timed {scenes} scenes in {} sections, output in {}",
        reports.len(),
        output_dir.display()
    );
    Ok(())
}

fn run_align(args: AlignArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate_align(&args)?;
    let settings = resolve_settings(&args.tuning)?;
    settings.validate()?;

    let transcript = load_transcript(&args.transcript)?;
    let raw = fs::read_to_string(&args.segments)
        .map_err(|e| format!("Cannot read {}: {e}", args.segments.display()))?;
    let segments = parse_segments(&raw)
        .map_err(|e| format!("Invalid segments in {}: {e}", args.segments.display()))?;

    let engine = settings.build_engine();
    let alignment = engine.align(&transcript, &segments);
    log::info!(
        "{}/{} segments matched ({}, {})",
        alignment.summary.matched_segments,
        alignment.summary.total_segments,
        alignment.summary.match_rate_label(),
        alignment.summary.confidence
    );

    let srt = render_srt(&alignment.results);
    if args.srt.is_none() && args.json.is_none() {
        print!("{srt}");
        return Ok(());
    }
    if let Some(path) = &args.srt {
        fs::write(path, &srt).map_err(|e| format!("Cannot write {}: {e}", path.display()))?;
        log::info!("SRT written to {}", path.display());
    }
    if let Some(path) = &args.json {
        let timing = SceneTiming::build(
            &file_stem(&args.segments),
            file_stem(&args.transcript).trim_end_matches(transcript_stem_suffix()),
            &args.transcript.to_string_lossy(),
            &alignment.results,
        );
        let json = serde_json::to_string_pretty(&timing)?;
        fs::write(path, json).map_err(|e| format!("Cannot write {}: {e}", path.display()))?;
        log::info!("Timing report written to {}", path.display());
    }
    Ok(())
}

fn resolve_settings(tuning: &TuningArgs) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = Settings::load(tuning.config.as_deref())?;
    apply_tuning(&mut settings, tuning);
    Ok(settings)
}

/// Command-line flags take precedence over the settings file.
fn apply_tuning(settings: &mut Settings, tuning: &TuningArgs) {
    if let Some(matcher) = tuning.matcher.as_deref().and_then(MatchStrategy::parse) {
        settings.matcher = matcher;
    }
    if let Some(n) = tuning.prefix_chars {
        settings.prefix_chars = n;
    }
    if let Some(secs) = tuning.secs_per_char {
        settings.alignment.secs_per_char = secs;
    }
    if let Some(gap) = tuning.gap {
        settings.alignment.gap_secs = gap;
    }
    if let Some(slack) = tuning.search_slack {
        settings.alignment.search_slack = slack;
    }
    if tuning.inclusive_end_scan {
        settings.alignment.inclusive_end_scan = true;
    }
}

fn validate_time(args: &TimeArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.project_dir.is_dir() {
        return Err(format!(
            "Project directory not found: {}",
            args.project_dir.display()
        )
        .into());
    }
    if let Some(mode) = &args.mode {
        if TimingMode::parse(mode).is_none() {
            return Err(format!("Mode must be 'aligned' or 'even', got '{mode}'").into());
        }
    }
    validate_tuning(&args.tuning)
}

fn validate_align(args: &AlignArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.transcript.exists() {
        return Err(format!("Transcript not found: {}", args.transcript.display()).into());
    }
    if !args.segments.exists() {
        return Err(format!("Segments file not found: {}", args.segments.display()).into());
    }
    validate_tuning(&args.tuning)
}

fn validate_tuning(tuning: &TuningArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(matcher) = &tuning.matcher {
        if MatchStrategy::parse(matcher).is_none() {
            return Err(
                format!("Matcher must be 'prefix' or 'substring', got '{matcher}'").into(),
            );
        }
    }
    Ok(())
}

/// A JSON array of strings, or plain text split on newlines and `;;`.
fn parse_segments(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    if raw.trim_start().starts_with('[') {
        let segments: Vec<String> = serde_json::from_str(raw)?;
        return Ok(segments
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect());
    }
    Ok(raw.lines().flat_map(split_subtitle_display).collect())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn transcript_stem_suffix() -> &'static str {
    TRANSCRIPT_SUFFIX.trim_end_matches(".json")
}
