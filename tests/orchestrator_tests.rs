use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use discord_encode::app::{EncodeInteractor, OutputLayout};
use discord_encode::cli::parse_args;
use discord_encode::engine::EncoderProfile;
use discord_encode::ports::*;
use discord_encode::*;

/// Test doubles standing in for ffprobe, ffmpeg and the filesystem
mod fakes {
    use super::*;

    #[derive(Default)]
    pub struct FakeProbe {
        pub media: HashMap<String, Result<MediaInfo, DomainError>>,
        pub calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ProbePort for FakeProbe {
        async fn probe_media(&self, file_path: &str) -> Result<MediaInfo, DomainError> {
            self.calls.lock().unwrap().push(file_path.to_string());
            self.media
                .get(file_path)
                .cloned()
                .unwrap_or_else(|| Err(DomainError::ProbeFailed {
                    path: file_path.to_string(),
                    code: 1,
                }))
        }
    }

    #[derive(Default)]
    pub struct FakeEncoder {
        /// Exit codes handed out in order; 0 once exhausted
        pub exit_codes: Mutex<VecDeque<i32>>,
        pub passes: Mutex<Vec<PassSpec>>,
    }

    #[async_trait]
    impl EncodePort for FakeEncoder {
        async fn run_pass(&self, spec: &PassSpec) -> Result<i32, DomainError> {
            self.passes.lock().unwrap().push(spec.clone());
            Ok(self.exit_codes.lock().unwrap().pop_front().unwrap_or(0))
        }

        async fn list_audio_encoders(&self) -> Result<Vec<String>, DomainError> {
            Ok(vec!["aac".to_string()])
        }
    }

    #[derive(Default)]
    pub struct FakeFs {
        pub existing: HashSet<String>,
        pub cleaned: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl FsPort for FakeFs {
        async fn file_exists(&self, file_path: &str) -> Result<bool, DomainError> {
            Ok(self.existing.contains(file_path))
        }

        async fn remove_pass_logs(&self, prefix: &Path) -> Result<usize, DomainError> {
            self.cleaned.lock().unwrap().push(prefix.to_path_buf());
            Ok(2)
        }
    }
}

use fakes::*;

fn media(path: &str, duration: f64) -> MediaInfo {
    MediaInfo {
        path: path.to_string(),
        duration,
        video: Some(VideoStreamInfo {
            height: 720,
            frame_count: Some((duration * 30.0) as u64),
        }),
        audio: Some(AudioStreamInfo {
            codec_name: "aac".to_string(),
            bit_rate_bps: Some(128_000.0),
        }),
    }
}

fn probe_with(files: &[(&str, f64)]) -> FakeProbe {
    FakeProbe {
        media: files
            .iter()
            .map(|(path, duration)| (path.to_string(), Ok(media(path, *duration))))
            .collect(),
        ..FakeProbe::default()
    }
}

struct Harness {
    probe: Arc<FakeProbe>,
    encoder: Arc<FakeEncoder>,
    fs: Arc<FakeFs>,
    interactor: EncodeInteractor,
}

fn harness(probe: FakeProbe, encoder: FakeEncoder, fs: FakeFs) -> Harness {
    let probe = Arc::new(probe);
    let encoder = Arc::new(encoder);
    let fs = Arc::new(fs);
    let interactor = EncodeInteractor::new(
        probe.clone(),
        encoder.clone(),
        fs.clone(),
        EncoderProfile::default(),
        OutputLayout::default(),
    );
    Harness {
        probe,
        encoder,
        fs,
        interactor,
    }
}

fn arg_pairs(spec: &PassSpec) -> Vec<String> {
    spec.to_args()
}

#[tokio::test]
async fn test_existing_output_aborts_before_any_external_call() {
    let fs = FakeFs {
        existing: HashSet::from(["clip_discord.mp4".to_string()]),
        ..FakeFs::default()
    };
    let h = harness(probe_with(&[("clip.mkv", 30.0)]), FakeEncoder::default(), fs);

    let err = h
        .interactor
        .execute(&parse_args(["clip.mkv"]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DomainError::OutputExists {
            path: "clip_discord.mp4".to_string()
        }
    );
    assert_eq!(err.exit_code(), 1);
    assert!(h.probe.calls.lock().unwrap().is_empty());
    assert!(h.encoder.passes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_overwrite_flag_skips_collision_check() {
    let fs = FakeFs {
        existing: HashSet::from(["clip_discord.mp4".to_string()]),
        ..FakeFs::default()
    };
    let h = harness(probe_with(&[("clip.mkv", 30.0)]), FakeEncoder::default(), fs);

    let report = h
        .interactor
        .execute(&parse_args(["clip.mkv", "-y"]))
        .await
        .unwrap();

    assert_eq!(report.files.len(), 1);
    let passes = h.encoder.passes.lock().unwrap();
    assert_eq!(passes.len(), 2);
    assert!(arg_pairs(&passes[1]).contains(&"-y".to_string()));
}

#[tokio::test]
async fn test_default_run_two_passes_and_cleanup() {
    let h = harness(
        probe_with(&[("clip.mkv", 30.0)]),
        FakeEncoder::default(),
        FakeFs::default(),
    );

    let report = h.interactor.execute(&parse_args(["clip.mkv"])).await.unwrap();

    let file = &report.files[0];
    assert_eq!(file.output, "clip_discord.mp4");
    assert_eq!(file.removed_logs, 2);
    assert_eq!(file.passes.second.output, "clip_discord.mp4");

    let passes = h.encoder.passes.lock().unwrap();
    assert_eq!(passes[0].pass.as_u8(), 1);
    assert_eq!(passes[1].pass.as_u8(), 2);

    // Both passes share the private pass-log prefix that gets cleaned
    let cleaned = h.fs.cleaned.lock().unwrap();
    assert_eq!(cleaned.len(), 1);
    let prefix = cleaned[0].to_string_lossy().into_owned();
    assert!(prefix.ends_with("ffmpeg2pass"));
    for pass in passes.iter() {
        let args = arg_pairs(pass);
        let at = args.iter().position(|a| a == "-passlogfile").unwrap();
        assert_eq!(args[at + 1], prefix);
    }
}

#[tokio::test]
async fn test_probe_failure_code_propagates() {
    let probe = FakeProbe {
        media: HashMap::from([(
            "broken.mkv".to_string(),
            Err(DomainError::ProbeFailed {
                path: "broken.mkv".to_string(),
                code: 2,
            }),
        )]),
        ..FakeProbe::default()
    };
    let h = harness(probe, FakeEncoder::default(), FakeFs::default());

    let err = h
        .interactor
        .execute(&parse_args(["broken.mkv"]))
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), 2);
    assert!(h.encoder.passes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_first_pass_failure_stops_the_batch() {
    let encoder = FakeEncoder {
        exit_codes: Mutex::new(VecDeque::from([3])),
        ..FakeEncoder::default()
    };
    let h = harness(
        probe_with(&[("a.mkv", 30.0), ("b.mkv", 30.0)]),
        encoder,
        FakeFs::default(),
    );

    let err = h
        .interactor
        .execute(&parse_args(["a.mkv", "b.mkv"]))
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::EncodeFailed { pass: 1, code: 3 });
    assert_eq!(err.exit_code(), 3);
    assert_eq!(h.encoder.passes.lock().unwrap().len(), 1);
    assert_eq!(*h.probe.calls.lock().unwrap(), vec!["a.mkv".to_string()]);
    // Logs are still cleaned after the failed pass
    assert_eq!(h.fs.cleaned.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_second_pass_failure_reports_pass_two() {
    let encoder = FakeEncoder {
        exit_codes: Mutex::new(VecDeque::from([0, 5])),
        ..FakeEncoder::default()
    };
    let h = harness(probe_with(&[("a.mkv", 30.0)]), encoder, FakeFs::default());

    let err = h
        .interactor
        .execute(&parse_args(["a.mkv"]))
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::EncodeFailed { pass: 2, code: 5 });
}

#[tokio::test]
async fn test_each_file_plans_from_the_untouched_template() {
    let h = harness(
        probe_with(&[("a.mkv", 30.0), ("b.mkv", 60.0)]),
        FakeEncoder::default(),
        FakeFs::default(),
    );

    let report = h
        .interactor
        .execute(&parse_args(["-size", "50", "a.mkv", "b.mkv"]))
        .await
        .unwrap();

    assert_eq!(report.files.len(), 2);
    for file in &report.files {
        assert_eq!(file.plan.target_size_kbits, 400_000.0);
        assert!(!arg_pairs(&file.passes.second).contains(&"-size".to_string()));
    }
}

#[tokio::test]
async fn test_output_flag_is_a_suffix_for_several_files() {
    let h = harness(
        probe_with(&[("a.mkv", 30.0), ("b.mkv", 30.0)]),
        FakeEncoder::default(),
        FakeFs::default(),
    );

    let report = h
        .interactor
        .execute(&parse_args(["-o", "_small.mp4", "a.mkv", "b.mkv"]))
        .await
        .unwrap();

    let outputs: Vec<_> = report.files.iter().map(|f| f.output.as_str()).collect();
    assert_eq!(outputs, vec!["a_small.mp4", "b_small.mp4"]);
}

#[tokio::test]
async fn test_output_flag_is_a_path_for_one_file() {
    let h = harness(
        probe_with(&[("a.mkv", 30.0)]),
        FakeEncoder::default(),
        FakeFs::default(),
    );

    let report = h
        .interactor
        .execute(&parse_args(["-o", "out/short.mp4", "a.mkv"]))
        .await
        .unwrap();

    assert_eq!(report.files[0].output, "out/short.mp4");
    assert!(!arg_pairs(&report.files[0].passes.second).contains(&"-o".to_string()));
}

#[tokio::test]
async fn test_output_flag_without_value_is_rejected() {
    let h = harness(
        probe_with(&[("a.mkv", 30.0)]),
        FakeEncoder::default(),
        FakeFs::default(),
    );

    let err = h
        .interactor
        .execute(&parse_args(["a.mkv", "-o"]))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::InvalidOverride { .. }));
    assert!(h.probe.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_audio_bitrate_warns_and_keeps_going() {
    let h = harness(
        probe_with(&[("a.mkv", 30.0)]),
        FakeEncoder::default(),
        FakeFs::default(),
    );

    let report = h
        .interactor
        .execute(&parse_args(["a.mkv", "-b:a", "abc"]))
        .await
        .unwrap();

    let plan = &report.files[0].plan;
    assert_eq!(plan.warnings.len(), 1);
    assert_eq!(plan.audio_bitrate_kbps, 128.0);
    assert_eq!(h.encoder.passes.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_user_passlogfile_is_used_and_cleaned() {
    let h = harness(
        probe_with(&[("a.mkv", 30.0)]),
        FakeEncoder::default(),
        FakeFs::default(),
    );

    h.interactor
        .execute(&parse_args(["a.mkv", "-passlogfile", "stats/run"]))
        .await
        .unwrap();

    assert_eq!(
        *h.fs.cleaned.lock().unwrap(),
        vec![PathBuf::from("stats/run")]
    );
    for pass in h.encoder.passes.lock().unwrap().iter() {
        let args = arg_pairs(pass);
        let at = args.iter().position(|a| a == "-passlogfile").unwrap();
        assert_eq!(args[at + 1], "stats/run");
    }
}

#[tokio::test]
async fn test_passlog_in_working_dir_when_temp_dir_disabled() {
    let probe = Arc::new(probe_with(&[("a.mkv", 30.0)]));
    let encoder = Arc::new(FakeEncoder::default());
    let fs = Arc::new(FakeFs::default());
    let interactor = EncodeInteractor::new(
        probe,
        encoder.clone(),
        fs.clone(),
        EncoderProfile::default(),
        OutputLayout {
            passlog_in_temp_dir: false,
            ..OutputLayout::default()
        },
    );

    interactor.execute(&parse_args(["a.mkv"])).await.unwrap();

    assert_eq!(
        *fs.cleaned.lock().unwrap(),
        vec![PathBuf::from("ffmpeg2pass")]
    );
    for pass in encoder.passes.lock().unwrap().iter() {
        assert!(!arg_pairs(pass).contains(&"-passlogfile".to_string()));
    }
}
