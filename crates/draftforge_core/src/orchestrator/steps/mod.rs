//! Pipeline step implementations.
//!
//! Each step handles one phase of draft generation. Only the last step
//! touches the filesystem outside the run log.

mod captions;
mod install;
mod scan;
mod serialize;
mod timeline;

pub use captions::CaptionsStep;
pub use install::InstallStep;
pub use scan::ScanStep;
pub use serialize::SerializeStep;
pub use timeline::TimelineStep;

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use tempfile::{tempdir, TempDir};

    use crate::config::Settings;
    use crate::logging::{init_test_tracing, LogConfig, RunLogger};
    use crate::orchestrator::types::{Context, GenerateRequest, InstallTarget};
    use crate::probe::FixedProbe;

    pub const TWO_CAPTIONS: &str = "1\n00:00:00,000 --> 00:00:01,500\nHello\n\n\
                                    2\n00:00:01,500 --> 00:00:03,000\nSecond\nline\n";

    /// Temp workspace with `in/` holding narration, three images and
    /// optionally a caption file, and `out/` as the install target.
    pub struct Fixture {
        pub dir: TempDir,
    }

    impl Fixture {
        pub fn new(captions: Option<&str>) -> Self {
            init_test_tracing();
            let dir = tempdir().unwrap();
            let input = dir.path().join("in");
            fs::create_dir_all(&input).unwrap();
            fs::write(input.join("narration.wav"), b"not really audio").unwrap();
            for name in ["scene10.png", "scene2.png", "scene1.jpg"] {
                fs::write(input.join(name), name.as_bytes()).unwrap();
            }
            if let Some(srt) = captions {
                fs::write(input.join("captions.srt"), srt).unwrap();
            }
            Self { dir }
        }

        pub fn input(&self) -> PathBuf {
            self.dir.path().join("in")
        }

        pub fn output(&self) -> PathBuf {
            self.dir.path().join("out")
        }

        pub fn logs(&self) -> PathBuf {
            self.dir.path().join("logs")
        }

        /// Context targeting `out/`, with every probe returning `duration`.
        pub fn context(&self, duration: i64) -> Context {
            self.context_for(GenerateRequest::new(
                self.input(),
                InstallTarget::OutputDir(self.output()),
            ))
            .with_probe(Box::new(FixedProbe(duration)))
        }

        pub fn context_for(&self, request: GenerateRequest) -> Context {
            let logger = RunLogger::new("test", self.logs(), LogConfig::default(), None).unwrap();
            Context::new(request, Settings::default(), "test_job", Arc::new(logger))
        }
    }

    pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths.iter().map(|p| name_of(p)).collect()
    }

    pub fn name_of(path: &Path) -> String {
        path.file_name().unwrap().to_string_lossy().to_string()
    }
}
