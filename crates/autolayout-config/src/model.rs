//! Configuration data model

use std::path::PathBuf;

/// Default binary asked for the IPC socket path
pub const DEFAULT_WM_COMMAND: &str = "i3";

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub global: GlobalConfig,
    pub ipc: IpcConfig,
}

/// Global settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalConfig {
    pub log_level: LogLevel,
}

/// How the window manager's IPC socket is located
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpcConfig {
    /// Fixed socket path; skips discovery when set
    pub socket_path: Option<PathBuf>,
    /// Binary invoked with `--get-socketpath` (e.g. "i3" or "sway")
    pub wm_command: String,
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            socket_path: None,
            wm_command: DEFAULT_WM_COMMAND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}
