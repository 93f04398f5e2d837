// Unit tests for domain models

use super::*;

#[test]
fn test_time_spec_from_frames_is_exact() {
    let duration = TimeSpec::from_frames(160_000, 16_000).unwrap();
    assert_eq!(duration.as_seconds(), 10.0);

    let odd = TimeSpec::from_frames(12_345, 44_100).unwrap();
    assert_eq!(odd.as_seconds(), 12_345.0 / 44_100.0);
}

#[test]
fn test_time_spec_zero_rate_is_invalid_media() {
    assert!(matches!(
        TimeSpec::from_frames(10, 0),
        Err(DomainError::InvalidMediaFormat(_))
    ));
}

#[test]
fn test_time_spec_display_uses_caption_format() {
    assert_eq!(TimeSpec::from_seconds(3661.5).to_string(), "01:01:01,500");
}

#[test]
fn test_script_rejects_blank_text() {
    assert!(matches!(Script::new("   \n"), Err(DomainError::EmptyInput(_))));
    let script = Script::new("a dark and stormy night").unwrap();
    assert_eq!(script.word_count(), 5);
}

#[test]
fn test_dimensions_parse() {
    assert_eq!(
        Dimensions::parse("1080x1920").unwrap(),
        Dimensions {
            width: 1080,
            height: 1920
        }
    );
    assert_eq!(Dimensions::parse(" 720X1280 ").unwrap().to_string(), "720x1280");
    assert!(Dimensions::parse("1080").is_err());
    assert!(Dimensions::parse("0x1920").is_err());
    assert!(Dimensions::parse("widex1920").is_err());
}

#[test]
fn test_artifacts_live_in_work_dir() {
    let artifacts = Artifacts::in_dir(Path::new("/tmp/run1"), Path::new("final.mp4"));
    assert_eq!(artifacts.voiceover, PathBuf::from("/tmp/run1/voiceover.wav"));
    assert_eq!(artifacts.captions, PathBuf::from("/tmp/run1/captions.srt"));
    assert_eq!(artifacts.output, PathBuf::from("/tmp/run1/final.mp4"));

    let absolute = Artifacts::in_dir(Path::new("/tmp/run1"), Path::new("/out/video.mp4"));
    assert_eq!(absolute.output, PathBuf::from("/out/video.mp4"));
}

#[test]
fn test_run_requires_measured_duration() {
    let run = PipelineRun::new(
        PathBuf::from("bg.mp4"),
        Artifacts::in_dir(Path::new("."), Path::new("final.mp4")),
    );
    assert!(matches!(run.duration(), Err(DomainError::InternalError(_))));
    assert!(run.script().is_err());
}

#[test]
fn test_run_state_transitions() {
    let mut run = PipelineRun::new(
        PathBuf::from("bg.mp4"),
        Artifacts::in_dir(Path::new("."), Path::new("final.mp4")),
    );
    assert_eq!(run.state, PipelineState::Pending);

    run.begin(Stage::GeneratingScript).unwrap();
    assert_eq!(run.state, PipelineState::Running(Stage::GeneratingScript));
    run.complete(Stage::GeneratingScript, None);

    run.begin(Stage::SynthesizingVoice).unwrap();
    run.complete(Stage::SynthesizingVoice, Some(PathBuf::from("voiceover.wav")));
    assert_eq!(run.last_artifact(), Some(Path::new("voiceover.wav")));

    run.begin(Stage::MeasuringDuration).unwrap();
    run.fail(
        Stage::MeasuringDuration,
        DomainError::InvalidMediaFormat("bad header".to_string()),
    );
    assert!(matches!(
        run.state,
        PipelineState::Failed {
            stage: Stage::MeasuringDuration,
            ..
        }
    ));
    assert!(run.begin(Stage::TrimmingVideo).is_err());
    assert_eq!(
        run.completed,
        vec![Stage::GeneratingScript, Stage::SynthesizingVoice]
    );
}

#[test]
fn test_caption_set_end_time() {
    let set = CaptionSet {
        entries: vec![CaptionEntry {
            index: 1,
            start: 0.0,
            end: 1.5,
            text: "hi".to_string(),
        }],
        source: CaptionSource::Proportional,
    };
    assert_eq!(set.end_time(), 1.5);
    assert!(!set.is_empty());
}
