use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to parse KDL")]
    #[diagnostic(code(autolayout::config::parse_error))]
    ParseError {
        #[source_code]
        src: String,
        #[label("here")]
        span: miette::SourceSpan,
        #[source]
        source: kdl::KdlError,
    },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(autolayout::config::invalid))]
    Invalid { message: String },

    #[error("Missing value for `{field}`")]
    #[diagnostic(code(autolayout::config::missing_value))]
    MissingValue { field: String },

    #[error("Unknown key: {key}")]
    #[diagnostic(
        code(autolayout::config::unknown_key),
        help("valid sections are `global` (log-level) and `ipc` (socket-path, wm-command)")
    )]
    UnknownKey { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
