// Adapters - External system implementations

pub mod exec_process;
pub mod fs_local;
pub mod inference_http;
pub mod probe_wav;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_process::ProcessToolAdapter;
pub use fs_local::FsLocalAdapter;
pub use inference_http::{HttpInferenceAdapter, InferenceEndpoints};
pub use probe_wav::WavProbeAdapter;
pub use toml_config::{AppConfig, TomlConfigAdapter};
pub use tracing_log::TracingLogAdapter;
