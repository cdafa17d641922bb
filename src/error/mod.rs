// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Errors, one enum per stage.
//!
//! ```text
//! HoardError        Forge | Mirror | Archive | Upload | Config | Process | Fs | Io
//!   each variant boxes its sub-error, so HoardResult<()> stays at 24 bytes
//!
//! ForgeError        fatal for the run (listing)
//! MirrorError  ┐
//! ArchiveError ├──  fatal for one repository, recorded in the RunSummary
//! UploadError  ┘
//!
//! RetryableError    Transient (and some transport) variants of Forge and Upload
//! ```
//!
//! Library code below `cmd` returns these; `cmd` and `main` work in
//! `anyhow::Result` and add context.

use thiserror::Error;

pub type Result<T> = anyhow::Result<T>;

/// Result type using [`HoardError`].
pub type HoardResult<T> = std::result::Result<T, HoardError>;

/// Any failure a pipeline stage can report.
#[derive(Debug, Error)]
pub enum HoardError {
    /// Listing repositories from the code forge failed.
    #[error("forge error: {0}")]
    Forge(#[from] Box<ForgeError>),

    /// Creating or refreshing a mirror failed.
    #[error("mirror error: {0}")]
    Mirror(#[from] Box<MirrorError>),

    /// Compressing a mirror failed.
    #[error("archive error: {0}")]
    Archive(#[from] Box<ArchiveError>),

    /// Uploading an archive failed.
    #[error("upload error: {0}")]
    Upload(#[from] Box<UploadError>),

    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// git or tar could not be run.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

// Sub-errors convert straight into HoardError, boxing on the way.
macro_rules! boxed_into_hoard_error {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for HoardError {
                fn from(err: $error) -> Self {
                    HoardError::$variant(Box::new(err))
                }
            }
        )+
    };
}

boxed_into_hoard_error! {
    ForgeError => Forge,
    MirrorError => Mirror,
    ArchiveError => Archive,
    UploadError => Upload,
    ConfigError => Config,
    ProcessError => Process,
    FsError => Fs,
    std::io::Error => Io,
}

/// Errors that may succeed when the same operation is attempted again.
pub trait RetryableError {
    /// Whether a retry has a chance of succeeding.
    fn is_retryable(&self) -> bool;
}

/// Whether a transport-level reqwest failure is worth retrying.
fn reqwest_is_retryable(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
}

// --- Forge Errors ---

/// Errors from the code-forge (GitHub) API.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// The credential was rejected.
    #[error("authentication rejected while listing repositories of '{account}'")]
    Authentication { account: String },

    /// The account does not exist.
    #[error("account not found: '{account}'")]
    NotFound { account: String },

    /// Rate limiting or a server-side failure; the request may succeed later.
    #[error("transient service error from {url}: {message}")]
    Transient { url: String, message: String },

    /// Any other non-success HTTP response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Transport error from reqwest.
    #[error("request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// The configured API URL is unusable.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl RetryableError for ForgeError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Transient { .. } => true,
            Self::Reqwest(e) => reqwest_is_retryable(e),
            Self::Authentication { .. }
            | Self::NotFound { .. }
            | Self::HttpError { .. }
            | Self::Decode { .. }
            | Self::InvalidUrl(_) => false,
        }
    }
}

// --- Mirror Errors ---

/// Mirror Manager errors. Fatal for the affected repository only.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// `git clone --mirror` failed.
    #[error("failed to clone mirror of '{repo}': {message}")]
    CloneFailed { repo: String, message: String },

    /// `git remote update` failed.
    #[error("failed to update mirror of '{repo}': {message}")]
    UpdateFailed { repo: String, message: String },

    /// The mirror path exists but is not a bare repository.
    #[error("'{path}' exists but is not a bare git mirror")]
    NotAMirror { path: String },

    /// Reading repository state failed.
    #[error("failed to inspect repository at '{path}': {message}")]
    Query { path: String, message: String },

    /// The git process was interrupted by cancellation.
    #[error("mirroring of '{repo}' was interrupted")]
    Interrupted { repo: String },
}

// --- Archive Errors ---

/// Archiver errors.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive command failed.
    #[error("failed to compress '{path}': {message}")]
    CommandFailed { path: String, message: String },

    /// I/O error while preparing or inspecting the artifact.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The archive process was interrupted by cancellation.
    #[error("compression of '{path}' was interrupted")]
    Interrupted { path: String },
}

// --- Upload Errors ---

/// Uploader errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// No archive.org credentials were found.
    #[error(
        "no archive.org credentials found (run `ia configure` or set IA_ACCESS_KEY_ID/IA_SECRET_ACCESS_KEY)"
    )]
    MissingCredentials,

    /// The configured upload endpoint is not a usable base URL.
    #[error("invalid archive.org endpoint: {0}")]
    InvalidUrl(String),

    /// The archival service rejected the credentials.
    #[error("archive.org rejected the credentials for item '{identifier}' (http {status})")]
    Authentication { identifier: String, status: u16 },

    /// Network failure or a server-side error; the upload may succeed later.
    #[error("transient failure uploading item '{identifier}': {message}")]
    Transient { identifier: String, message: String },

    /// Any other non-success response.
    #[error("archive.org refused item '{identifier}' (http {status}): {body}")]
    Rejected {
        identifier: String,
        status: u16,
        body: String,
    },

    /// Reading the artifact failed.
    #[error("failed to read artifact '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The upload was interrupted by cancellation.
    #[error("upload of item '{identifier}' was interrupted")]
    Interrupted { identifier: String },
}

impl RetryableError for UploadError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

// --- Config Errors ---

/// Problems with hoard.toml, the environment, flags or ia.ini.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// ia.ini is not valid INI.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Needed for a run but set nowhere; `hint` names the flag.
    #[error("missing required config key '{key}' in section '[{section}]'{hint}")]
    MissingKey {
        section: String,
        key: String,
        hint: String,
    },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Running git or tar.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// `stderr` is `": "` plus the last lines of output, or empty.
    #[error("process '{command}' exited with code {code}{stderr}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },
}

// --- Filesystem Errors ---

/// Creating the output directory or removing local copies.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("path not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Classify an I/O error on `path`.
    #[must_use]
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        let path = path.display().to_string();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::IoError { path, source },
        }
    }
}

#[cfg(test)]
mod tests;
