use crate::alignment::domain::alignment_result::AlignmentResult;

/// Formats seconds as an SRT timestamp, `HH:MM:SS,mmm`.
///
/// Negative inputs clamp to zero.
pub fn format_srt_time(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_sec = total_ms / 1000;
    let s = total_sec % 60;
    let total_min = total_sec / 60;
    let m = total_min % 60;
    let h = total_min / 60;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

/// Renders results as an SRT document with 1-based cue numbers.
pub fn render_srt(results: &[AlignmentResult]) -> String {
    let mut out = String::new();
    for (i, r) in results.iter().enumerate() {
        out.push_str(&format!("{}\n", i + 1));
        out.push_str(&format!(
            "{} --> {}\n",
            format_srt_time(r.start),
            format_srt_time(r.end)
        ));
        out.push_str(r.text.trim());
        out.push_str("\n\n");
    }
    out
}
