use super::alignment_params::AlignmentParams;
use super::alignment_result::{round2, AlignmentResult, SectionSummary};
use super::text_normalizer::{normalize_text, target_words};
use super::transcript::TranscriptWord;
use super::word_matcher::{PrefixWordMatcher, WordMatcher};

/// Results for one segment sequence plus their aggregate confidence.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionAlignment {
    pub results: Vec<AlignmentResult>,
    pub summary: SectionSummary,
}

/// Maps subtitle segments onto word-level transcript timings.
///
/// Segments are processed strictly in order against a forward-only cursor
/// into the transcript, so no transcript word is assigned to two segments and
/// total work stays linear in the transcript length. Segments without
/// transcript evidence get a duration estimated from their character count.
///
/// The engine holds no per-run state and can be shared across threads; each
/// run owns its cursor.
pub struct AlignmentEngine {
    params: AlignmentParams,
    matcher: Box<dyn WordMatcher>,
}

impl AlignmentEngine {
    pub fn new(params: AlignmentParams, matcher: Box<dyn WordMatcher>) -> Self {
        Self { params, matcher }
    }

    pub fn params(&self) -> &AlignmentParams {
        &self.params
    }

    /// Aligns one sequence of segments against a whole transcript.
    ///
    /// Always returns one result per segment, in input order.
    pub fn align<S: AsRef<str>>(
        &self,
        transcript: &[TranscriptWord],
        segments: &[S],
    ) -> SectionAlignment {
        let results = self.start_run(transcript).align_segments(segments);
        let summary = SectionSummary::from_results(&results);
        SectionAlignment { results, summary }
    }

    /// Starts a run whose cursor can be carried across several segment
    /// sequences that share one transcript.
    pub fn start_run<'a>(&'a self, transcript: &'a [TranscriptWord]) -> AlignmentRun<'a> {
        AlignmentRun {
            engine: self,
            words: transcript,
            normalized: transcript.iter().map(|w| normalize_text(&w.word)).collect(),
            cursor: 0,
        }
    }
}

impl Default for AlignmentEngine {
    fn default() -> Self {
        Self::new(
            AlignmentParams::default(),
            Box::new(PrefixWordMatcher::default()),
        )
    }
}

/// One pass over a transcript. The cursor only moves forward.
pub struct AlignmentRun<'a> {
    engine: &'a AlignmentEngine,
    words: &'a [TranscriptWord],
    normalized: Vec<String>,
    cursor: usize,
}

impl AlignmentRun<'_> {
    /// Index of the first transcript word not yet consumed.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.words.len()
    }

    /// Aligns a segment sequence, continuing from the current cursor.
    ///
    /// Fallback segments are placed after the previous result of this call
    /// only; the first segment of a call falls back to the cursor position.
    pub fn align_segments<S: AsRef<str>>(&mut self, segments: &[S]) -> Vec<AlignmentResult> {
        let mut results: Vec<AlignmentResult> = Vec::with_capacity(segments.len());
        for (index, segment) in segments.iter().enumerate() {
            let result = self.align_segment(index, segment.as_ref(), results.last());
            log::debug!(
                "segment {index}: {:.2}-{:.2}s fallback={} matched_words={} cursor={}",
                result.start,
                result.end,
                result.is_fallback,
                result.matched_word_indices.len(),
                self.cursor
            );
            results.push(result);
        }
        results
    }

    fn align_segment(
        &mut self,
        index: usize,
        text: &str,
        previous: Option<&AlignmentResult>,
    ) -> AlignmentResult {
        let normalized = normalize_text(text);
        let targets = target_words(&normalized);

        match self.locate(&targets) {
            Some((first, last)) => self.matched(index, text, first, last),
            None => self.fallback(index, text, &normalized, previous),
        }
    }

    fn locate(&self, targets: &[&str]) -> Option<(usize, usize)> {
        let (first_target, last_target) = (*targets.first()?, *targets.last()?);
        if self.is_exhausted() {
            return None;
        }
        let first = self.find_first(first_target)?;
        let last = self.find_last(first, last_target, targets.len());
        Some((first, last))
    }

    fn find_first(&self, target: &str) -> Option<usize> {
        let matcher = self.engine.matcher.as_ref();
        let range = self.cursor..self.words.len();
        range
            .clone()
            .find(|&i| matcher.is_match(&self.normalized[i], target))
            .or_else(|| {
                range
                    .into_iter()
                    .find(|&i| matcher.is_prefix_match(&self.words[i].word, target))
            })
    }

    fn find_last(&self, first: usize, target: &str, target_count: usize) -> usize {
        let matcher = self.engine.matcher.as_ref();
        let params = &self.engine.params;
        let estimate = (first + target_count + params.search_slack).min(self.words.len() - 1);
        let lowest = if params.inclusive_end_scan {
            first
        } else {
            first + 1
        };
        (lowest..=estimate)
            .rev()
            .find(|&i| matcher.is_end_match(&self.normalized[i], target))
            .unwrap_or(estimate)
    }

    fn matched(&mut self, index: usize, text: &str, first: usize, last: usize) -> AlignmentResult {
        let start = self.words[first].start_time;
        let end = self.words[last].end_time.max(start);
        self.cursor = last + 1;

        AlignmentResult {
            index,
            text: text.to_string(),
            start: round2(start),
            end: round2(end),
            duration: round2(end - start),
            matched_word_indices: (first..=last).collect(),
            matched_words: self.words[first..=last]
                .iter()
                .map(|w| w.word.clone())
                .collect(),
            is_fallback: false,
        }
    }

    fn fallback(
        &self,
        index: usize,
        text: &str,
        normalized: &str,
        previous: Option<&AlignmentResult>,
    ) -> AlignmentResult {
        let params = &self.engine.params;
        let duration = normalized.chars().count() as f64 * params.secs_per_char;
        let next_word_start = self.words.get(self.cursor).map(|w| w.start_time);
        let start = match (previous, next_word_start) {
            // Never past the next unconsumed word, or a later match would start earlier.
            (Some(prev), Some(next)) => (prev.end + params.gap_secs).min(next).max(prev.start),
            (Some(prev), None) => prev.end + params.gap_secs,
            (None, next) => next.unwrap_or(0.0),
        };

        AlignmentResult {
            index,
            text: text.to_string(),
            start: round2(start),
            end: round2(start + duration),
            duration: round2(duration),
            matched_word_indices: Vec::new(),
            matched_words: Vec::new(),
            is_fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::domain::alignment_result::Confidence;
    use crate::alignment::domain::word_matcher::SubstringWordMatcher;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn word(w: &str, start: f64, end: f64) -> TranscriptWord {
        TranscriptWord::new(w, start, end)
    }

    fn greeting_transcript() -> Vec<TranscriptWord> {
        vec![
            word("안녕", 0.0, 0.5),
            word("하세요", 0.5, 1.0),
            word("반갑습니다", 1.0, 1.8),
        ]
    }

    #[test]
    fn test_split_words_match_one_segment_each() {
        let engine = AlignmentEngine::default();
        let out = engine.align(&greeting_transcript(), &["안녕하세요", "반갑습니다"]);

        assert_eq!(out.results.len(), 2);
        let first = &out.results[0];
        assert_eq!(first.matched_word_indices, vec![0, 1]);
        assert_eq!(first.matched_words, vec!["안녕", "하세요"]);
        assert_relative_eq!(first.start, 0.0);
        assert_relative_eq!(first.end, 1.0);
        assert!(!first.is_fallback);

        let second = &out.results[1];
        assert_eq!(second.matched_word_indices, vec![2]);
        assert_relative_eq!(second.start, 1.0);
        assert_relative_eq!(second.end, 1.8);
        assert_relative_eq!(second.duration, 0.8);
        assert!(!second.is_fallback);

        assert_eq!(out.summary.confidence, Confidence::High);
    }

    #[test]
    fn test_empty_transcript_estimates_from_zero() {
        let engine = AlignmentEngine::default();
        let out = engine.align(&[], &["테스트 문장입니다"]);

        assert_eq!(out.results.len(), 1);
        let r = &out.results[0];
        assert!(r.is_fallback);
        assert_relative_eq!(r.start, 0.0);
        assert_relative_eq!(r.duration, 0.72);
        assert_relative_eq!(r.end, 0.72);
        assert!(r.matched_word_indices.is_empty());
        assert_eq!(out.summary.confidence, Confidence::Medium);
    }

    #[test]
    fn test_unmatched_segment_follows_previous_result() {
        let engine = AlignmentEngine::default();
        let transcript = vec![word("hello", 0.0, 0.5), word("world", 0.5, 1.0)];
        let out = engine.align(&transcript, &["hello world", "zzqx"]);

        assert!(!out.results[0].is_fallback);
        let r = &out.results[1];
        assert!(r.is_fallback);
        assert_relative_eq!(r.start, 1.2);
        assert_relative_eq!(r.duration, 0.32);
        assert_relative_eq!(r.end, 1.52);
    }

    #[test]
    fn test_unmatched_first_segment_starts_at_cursor_word() {
        let engine = AlignmentEngine::default();
        let transcript = vec![word("alpha", 1.5, 2.0), word("beta", 2.0, 2.4)];
        let out = engine.align(&transcript, &["xyz"]);

        let r = &out.results[0];
        assert!(r.is_fallback);
        assert_relative_eq!(r.start, 1.5);
        assert_relative_eq!(r.end, 1.74);
    }

    #[rstest]
    #[case::punctuation_only("?!...")]
    #[case::empty("")]
    #[case::quotes("\"''\"")]
    fn test_segment_without_words_falls_back_with_zero_duration(#[case] text: &str) {
        let engine = AlignmentEngine::default();
        let out = engine.align(&greeting_transcript(), &[text]);

        let r = &out.results[0];
        assert!(r.is_fallback);
        assert_relative_eq!(r.duration, 0.0);
        assert_relative_eq!(r.start, r.end);
    }

    #[test]
    fn test_empty_segments_give_empty_results() {
        let engine = AlignmentEngine::default();
        let segments: [&str; 0] = [];
        let out = engine.align(&greeting_transcript(), &segments);
        assert!(out.results.is_empty());
        assert_eq!(out.summary.total_segments, 0);
    }

    #[test]
    fn test_every_segment_gets_a_result_in_order() {
        let engine = AlignmentEngine::default();
        let segments = ["안녕하세요", "???", "없는 문장", "반갑습니다", "마지막"];
        let out = engine.align(&greeting_transcript(), &segments);

        assert_eq!(out.results.len(), segments.len());
        for (i, r) in out.results.iter().enumerate() {
            assert_eq!(r.index, i);
            assert_eq!(r.text, segments[i]);
            assert!(r.start <= r.end);
        }
    }

    #[test]
    fn test_empty_transcript_results_are_finite_and_ordered() {
        let engine = AlignmentEngine::default();
        let out = engine.align(&[], &["하나", "둘 셋", "넷째 문장"]);

        for r in &out.results {
            assert!(r.is_fallback);
            assert!(r.start.is_finite() && r.end.is_finite());
            assert!(r.start >= 0.0);
            assert!(r.end >= r.start);
        }
        assert_relative_eq!(
            out.results[1].start,
            out.results[0].end + 0.2,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_matched_ranges_never_overlap() {
        let engine = AlignmentEngine::default();
        let transcript = vec![
            word("the", 0.0, 0.2),
            word("cat", 0.2, 0.5),
            word("the", 0.5, 0.7),
            word("dog", 0.7, 1.0),
            word("ran", 1.0, 1.3),
        ];
        let out = engine.align(&transcript, &["The cat", "the dog", "ran."]);

        let mut last_consumed: Option<usize> = None;
        for r in out.results.iter().filter(|r| !r.is_fallback) {
            let first = r.matched_word_indices[0];
            if let Some(prev) = last_consumed {
                assert!(first > prev);
            }
            last_consumed = r.matched_word_indices.last().copied();
        }
        assert_eq!(out.results[0].matched_word_indices, vec![0, 1]);
        assert_eq!(out.results[1].matched_word_indices, vec![2, 3]);
        assert_eq!(out.results[2].matched_word_indices, vec![4]);
    }

    #[rstest]
    #[case("a", 0.08)]
    #[case("abcde", 0.4)]
    #[case("열두 글자의 자막 문장", 0.96)]
    fn test_fallback_duration_scales_with_characters(#[case] text: &str, #[case] expected: f64) {
        let engine = AlignmentEngine::default();
        let out = engine.align(&[], &[text]);
        assert_relative_eq!(out.results[0].duration, expected);
    }

    #[test]
    fn test_confidence_high_only_without_fallbacks() {
        let engine = AlignmentEngine::default();
        let all_matched = engine.align(&greeting_transcript(), &["안녕하세요", "반갑습니다"]);
        assert_eq!(all_matched.summary.confidence, Confidence::High);

        let one_missing = engine.align(&greeting_transcript(), &["안녕하세요", "반갑습니다", "끝"]);
        assert!(one_missing.results[2].is_fallback);
        assert_eq!(one_missing.summary.confidence, Confidence::Medium);
        assert_eq!(one_missing.summary.match_rate_label(), "67%");
    }

    #[test]
    fn test_exhausted_transcript_forces_fallback() {
        let engine = AlignmentEngine::default();
        let transcript = vec![word("one", 0.0, 0.4)];
        let out = engine.align(&transcript, &["one", "one"]);
        assert!(!out.results[0].is_fallback);
        assert!(out.results[1].is_fallback);
        assert_relative_eq!(out.results[1].start, 0.6);
    }

    #[test]
    fn test_end_estimate_is_clamped_to_transcript() {
        let engine = AlignmentEngine::default();
        let transcript = vec![word("alpha", 0.0, 0.3), word("beta", 0.3, 0.6)];
        let out = engine.align(&transcript, &["alpha gamma delta"]);

        let r = &out.results[0];
        assert!(!r.is_fallback);
        assert_eq!(r.matched_word_indices, vec![0, 1]);
        assert_relative_eq!(r.end, 0.6);
    }

    #[test]
    fn test_search_slack_bounds_the_end_scan() {
        let params = AlignmentParams {
            search_slack: 0,
            ..AlignmentParams::default()
        };
        let engine = AlignmentEngine::new(params, Box::new(PrefixWordMatcher::default()));
        let transcript = vec![
            word("alpha", 0.0, 0.3),
            word("filler", 0.3, 0.6),
            word("omega", 0.6, 0.9),
        ];
        let out = engine.align(&transcript, &["alpha omega"]);
        // Without slack the scan starts exactly at first + word count.
        assert_eq!(out.results[0].matched_word_indices, vec![0, 1, 2]);

        // A single word has no later match, so the estimate stands.
        let out = engine.align(&transcript, &["alpha"]);
        assert_eq!(out.results[0].matched_word_indices, vec![0, 1]);
    }

    #[test]
    fn test_single_word_segment_keeps_end_estimate() {
        let engine = AlignmentEngine::default();
        let transcript = vec![
            word("alpha", 0.0, 0.3),
            word("beta", 0.3, 0.6),
            word("gamma", 0.6, 0.9),
            word("delta", 0.9, 1.2),
        ];
        let out = engine.align(&transcript, &["alpha", "beta gamma"]);

        assert_eq!(out.results[0].matched_word_indices, vec![0, 1, 2, 3]);
        assert_relative_eq!(out.results[0].end, 1.2);
        assert!(out.results[1].is_fallback);
        assert_relative_eq!(out.results[1].start, 1.4, epsilon = 1e-9);
    }

    #[test]
    fn test_inclusive_end_scan_stops_on_first_word() {
        let params = AlignmentParams {
            inclusive_end_scan: true,
            ..AlignmentParams::default()
        };
        let engine = AlignmentEngine::new(params, Box::new(PrefixWordMatcher::default()));
        let transcript = vec![
            word("alpha", 0.0, 0.3),
            word("beta", 0.3, 0.6),
            word("gamma", 0.6, 0.9),
            word("delta", 0.9, 1.2),
        ];
        let out = engine.align(&transcript, &["alpha", "beta gamma"]);

        assert_eq!(out.results[0].matched_word_indices, vec![0]);
        assert_eq!(out.results[1].matched_word_indices, vec![1, 2]);
        assert_eq!(out.summary.confidence, Confidence::High);
    }

    #[test]
    fn test_start_times_never_decrease_around_fallback() {
        let engine = AlignmentEngine::default();
        let transcript = vec![
            word("hello", 0.0, 0.5),
            word("world", 0.5, 1.0),
            word("again", 1.0, 1.5),
        ];
        let out = engine.align(&transcript, &["hello world", "zzqx", "again"]);

        assert!(!out.results[0].is_fallback);
        assert!(out.results[1].is_fallback);
        assert!(!out.results[2].is_fallback);
        // Capped at the next unconsumed word instead of 1.0 + 0.2.
        assert_relative_eq!(out.results[1].start, 1.0);
        assert_relative_eq!(out.results[2].start, 1.0);
        for pair in out.results.windows(2) {
            assert!(pair[1].start >= pair[0].start);
        }
    }

    #[test]
    fn test_fallback_chain_stays_at_next_word() {
        let engine = AlignmentEngine::default();
        let transcript = vec![
            word("hello", 0.0, 0.5),
            word("world", 0.5, 1.0),
            word("again", 1.0, 1.5),
        ];
        let out = engine.align(&transcript, &["hello world", "zz", "qq", "again"]);

        let starts: Vec<f64> = out.results.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0.0, 1.0, 1.0, 1.0]);
    }

    struct RetryOnlyMatcher;

    impl WordMatcher for RetryOnlyMatcher {
        fn is_match(&self, _word: &str, _target: &str) -> bool {
            false
        }

        fn is_prefix_match(&self, raw_word: &str, _target: &str) -> bool {
            raw_word == "Raw"
        }

        fn is_end_match(&self, _word: &str, _target: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_retry_pass_runs_on_raw_text_when_first_pass_fails() {
        let engine = AlignmentEngine::new(AlignmentParams::default(), Box::new(RetryOnlyMatcher));
        let transcript = vec![word("skip", 0.0, 0.2), word("Raw", 0.2, 0.6)];
        let out = engine.align(&transcript, &["anything"]);
        assert!(!out.results[0].is_fallback);
        assert_eq!(out.results[0].matched_word_indices, vec![1]);
        assert_relative_eq!(out.results[0].start, 0.2);
    }

    #[test]
    fn test_substring_matcher_rejects_prefix_only_matches() {
        let engine = AlignmentEngine::new(
            AlignmentParams::default(),
            Box::new(SubstringWordMatcher),
        );
        let transcript = vec![word("반가워요", 0.0, 0.8)];
        let out = engine.align(&transcript, &["반갑습니다"]);
        assert!(out.results[0].is_fallback);
    }

    #[test]
    fn test_run_carries_cursor_across_calls() {
        let engine = AlignmentEngine::default();
        let transcript = greeting_transcript();
        let mut run = engine.start_run(&transcript);

        let first = run.align_segments(&["안녕하세요"]);
        assert_eq!(run.cursor(), 2);
        let second = run.align_segments(&["반갑습니다"]);
        assert_eq!(second[0].index, 0);
        assert_eq!(second[0].matched_word_indices, vec![2]);
        assert!(run.is_exhausted());

        // A fallback opening a new call starts from the cursor, not the previous call.
        let third = run.align_segments(&["없음"]);
        assert!(third[0].is_fallback);
        assert_relative_eq!(third[0].start, 0.0);
        assert!(!first[0].is_fallback);
    }

    #[test]
    fn test_fallback_does_not_advance_cursor() {
        let engine = AlignmentEngine::default();
        let transcript = vec![word("hello", 0.0, 0.5), word("world", 0.5, 1.0)];
        let mut run = engine.start_run(&transcript);
        run.align_segments(&["zzqx"]);
        assert_eq!(run.cursor(), 0);
    }

    #[test]
    fn test_matched_times_are_rounded() {
        let engine = AlignmentEngine::default();
        let transcript = vec![word("hello", 0.123456, 0.987654)];
        let r = &engine.align(&transcript, &["hello"]).results[0];
        assert_relative_eq!(r.start, 0.12);
        assert_relative_eq!(r.end, 0.99);
        assert_relative_eq!(r.duration, 0.86);
    }
}
