// Unit tests for caption rules

use super::*;

const TOLERANCE: f64 = 1e-9;

fn words(n: usize) -> String {
    (1..=n)
        .map(|i| format!("w{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_proportional_twenty_words_over_ten_seconds() {
    let synth = CaptionSynthesizer::default();
    let set = synth
        .proportional(&words(20), TimeSpec::from_seconds(10.0))
        .unwrap();

    assert_eq!(set.len(), 4);
    assert_eq!(set.source, CaptionSource::Proportional);
    for (i, entry) in set.iter().enumerate() {
        assert_eq!(entry.index, i + 1);
        assert!((entry.end - entry.start - 2.5).abs() < TOLERANCE);
    }
    assert_eq!(set.entries[0].text, "w1 w2 w3 w4 w5");
    assert_eq!(set.entries[3].text, "w16 w17 w18 w19 w20");
}

#[test]
fn test_proportional_entry_count_is_ceiling() {
    let synth = CaptionSynthesizer::default();
    for (word_count, expected) in [(1, 1), (5, 1), (6, 2), (11, 3), (23, 5)] {
        let set = synth
            .proportional(&words(word_count), TimeSpec::from_seconds(7.0))
            .unwrap();
        assert_eq!(set.len(), expected, "{} words", word_count);
    }
}

#[test]
fn test_proportional_windows_are_contiguous_and_span_duration() {
    let synth = CaptionSynthesizer::default();
    let duration = 13.37;
    let set = synth
        .proportional(&words(17), TimeSpec::from_seconds(duration))
        .unwrap();

    assert_eq!(set.entries[0].start, 0.0);
    for pair in set.entries.windows(2) {
        assert_eq!(pair[1].start, pair[0].end);
        assert!(pair[0].end > pair[0].start);
    }
    assert_eq!(set.end_time(), duration);

    let total: f64 = set.iter().map(|e| e.end - e.start).sum();
    assert!((total - duration).abs() < TOLERANCE);
}

#[test]
fn test_proportional_short_last_chunk_gets_equal_time() {
    let synth = CaptionSynthesizer::default();
    let set = synth
        .proportional(&words(6), TimeSpec::from_seconds(4.0))
        .unwrap();

    assert_eq!(set.entries[1].text, "w6");
    assert!((set.entries[1].end - set.entries[1].start - 2.0).abs() < TOLERANCE);
}

#[test]
fn test_proportional_collapses_whitespace() {
    let synth = CaptionSynthesizer::new(2).unwrap();
    let set = synth
        .proportional("  one\ttwo\n\nthree  ", TimeSpec::from_seconds(2.0))
        .unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(set.entries[0].text, "one two");
    assert_eq!(set.entries[1].text, "three");
}

#[test]
fn test_proportional_zero_words_is_empty_input() {
    let synth = CaptionSynthesizer::default();
    let err = synth
        .proportional(" \n\t ", TimeSpec::from_seconds(5.0))
        .unwrap_err();
    assert!(matches!(err, DomainError::EmptyInput(_)));
}

#[test]
fn test_proportional_rejects_negative_duration() {
    let synth = CaptionSynthesizer::default();
    let err = synth
        .proportional("hello", TimeSpec::from_seconds(-1.0))
        .unwrap_err();
    assert!(matches!(err, DomainError::BadArgs(_)));
}

#[test]
fn test_zero_chunk_size_rejected() {
    assert!(matches!(
        CaptionSynthesizer::new(0),
        Err(DomainError::BadArgs(_))
    ));
}

#[test]
fn test_segments_pass_through_and_reindex() {
    let segments = vec![
        Segment {
            start: 0.4,
            end: 1.9,
            text: " Hello there.".to_string(),
        },
        Segment {
            start: 2.1,
            end: 3.75,
            text: "General Kenobi.".to_string(),
        },
        Segment {
            start: 3.75,
            end: 5.0,
            text: "You are a bold one.".to_string(),
        },
    ];

    let set = CaptionSynthesizer::default()
        .from_segments(&segments)
        .unwrap();

    assert_eq!(set.len(), segments.len());
    assert_eq!(set.source, CaptionSource::Segments);
    for (i, (entry, segment)) in set.iter().zip(&segments).enumerate() {
        assert_eq!(entry.index, i + 1);
        assert_eq!(entry.start, segment.start);
        assert_eq!(entry.end, segment.end);
        assert_eq!(entry.text, segment.text);
    }
}

#[test]
fn test_empty_segments_is_empty_input() {
    let err = CaptionSynthesizer::default()
        .from_segments(&[])
        .unwrap_err();
    assert!(matches!(err, DomainError::EmptyInput(_)));
}

#[test]
fn test_select_prefers_segments() {
    let script = Script::new("from the script").unwrap();
    let transcription = InferenceResult::Segments(vec![Segment {
        start: 0.0,
        end: 1.0,
        text: "from the transcript".to_string(),
    }]);

    match CaptionInput::select(Some(&transcription), &script) {
        CaptionInput::Segments(segments) => assert_eq!(segments.len(), 1),
        other => panic!("expected segments, got {:?}", other),
    }
}

#[test]
fn test_select_uses_transcribed_text_then_script() {
    let script = Script::new("from the script").unwrap();

    let plain = InferenceResult::PlainText("heard words".to_string());
    assert_eq!(
        CaptionInput::select(Some(&plain), &script),
        CaptionInput::Text("heard words")
    );

    assert_eq!(
        CaptionInput::select(Some(&InferenceResult::NoResult), &script),
        CaptionInput::Text("from the script")
    );
    assert_eq!(
        CaptionInput::select(None, &script),
        CaptionInput::Text("from the script")
    );
    assert_eq!(
        CaptionInput::select(Some(&InferenceResult::Segments(Vec::new())), &script),
        CaptionInput::Text("from the script")
    );
}

#[test]
fn test_blank_segment_text_is_empty_input() {
    let segments = vec![
        Segment {
            start: 0.0,
            end: 1.0,
            text: "spoken".to_string(),
        },
        Segment {
            start: 1.0,
            end: 2.0,
            text: " \t".to_string(),
        },
    ];
    match CaptionSynthesizer::default().from_segments(&segments) {
        Err(DomainError::EmptyInput(message)) => assert!(message.contains("Segment 2")),
        other => panic!("expected empty input, got {:?}", other),
    }
}

#[test]
fn test_select_skips_segments_without_words() {
    let script = Script::new("from the script").unwrap();
    let transcription = InferenceResult::Segments(vec![Segment {
        start: 0.0,
        end: 1.0,
        text: String::new(),
    }]);
    assert_eq!(
        CaptionInput::select(Some(&transcription), &script),
        CaptionInput::Text("from the script")
    );
}
