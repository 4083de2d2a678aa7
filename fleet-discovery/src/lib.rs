#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod clone;
pub mod config;
pub mod debug_log;
pub mod dependencies;
pub mod discovery;
pub mod process;
pub mod remote_url;
pub mod request;
pub mod scanner;
pub mod workspace;

pub use clone::{CloneRequest, CloneRunner, ClonedWorkspace};
pub use config::{
    load_config, ConfigError, DiscoveryConfig, DEFAULT_CLONE_TIMEOUT_SECS, DEFAULT_DEBUG_LOG_CAPACITY,
};
pub use debug_log::DebugLog;
pub use dependencies::extract_depends_on;
pub use discovery::{
    DebugSnapshot, DiscoveryError, DiscoveryResult, DiscoveryService, ErrorBody, ErrorKind,
    PathInfo,
};
pub use process::{CommandSpec, ProcessError, ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use remote_url::{build_authenticated_url, sanitize_text, sanitize_url};
pub use request::{Credentials, CredentialsInput, DiscoveryRequest, ValidatedRequest};
pub use scanner::find_bundle_files;
pub use workspace::Workspace;
