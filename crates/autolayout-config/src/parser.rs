//! KDL configuration parser

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::model::*;

/// Parse a configuration file from the given path
pub fn parse_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}

/// Parse configuration from a string
pub fn parse_config_str(content: &str) -> Result<Config, ConfigError> {
    let doc: kdl::KdlDocument = content.parse().map_err(|e: kdl::KdlError| {
        // kdl uses an older miette version, so we need to extract offset/len manually
        let offset = e.span.offset();
        let len = e.span.len();
        let span = miette::SourceSpan::from((offset, len));
        ConfigError::ParseError {
            src: content.to_string(),
            span,
            source: e,
        }
    })?;

    let mut config = Config::default();

    for node in doc.nodes() {
        match node.name().value() {
            "global" => {
                config.global = parse_global(node)?;
            }
            "ipc" => {
                config.ipc = parse_ipc(node)?;
            }
            name => {
                return Err(ConfigError::UnknownKey {
                    key: name.to_string(),
                });
            }
        }
    }

    Ok(config)
}

fn parse_global(node: &kdl::KdlNode) -> Result<GlobalConfig, ConfigError> {
    let mut global = GlobalConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "log-level" => {
                    let val = string_argument(child, "global.log-level")?;
                    global.log_level = val
                        .parse()
                        .map_err(|message| ConfigError::Invalid { message })?;
                }
                name => {
                    return Err(ConfigError::UnknownKey {
                        key: format!("global.{}", name),
                    });
                }
            }
        }
    }

    Ok(global)
}

fn parse_ipc(node: &kdl::KdlNode) -> Result<IpcConfig, ConfigError> {
    let mut ipc = IpcConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "socket-path" => {
                    let val = string_argument(child, "ipc.socket-path")?;
                    if val.is_empty() {
                        return Err(ConfigError::Invalid {
                            message: "ipc.socket-path must not be empty".to_string(),
                        });
                    }
                    let expanded: PathBuf = shellexpand::tilde(val).into_owned().into();
                    ipc.socket_path = Some(expanded);
                }
                "wm-command" => {
                    let val = string_argument(child, "ipc.wm-command")?;
                    if val.trim().is_empty() {
                        return Err(ConfigError::Invalid {
                            message: "ipc.wm-command must not be empty".to_string(),
                        });
                    }
                    ipc.wm_command = val.to_string();
                }
                name => {
                    return Err(ConfigError::UnknownKey {
                        key: format!("ipc.{}", name),
                    });
                }
            }
        }
    }

    Ok(ipc)
}

/// First positional argument of a node, which must be a string
fn string_argument<'a>(node: &'a kdl::KdlNode, field: &str) -> Result<&'a str, ConfigError> {
    let entry = node
        .entries()
        .iter()
        .find(|entry| entry.name().is_none())
        .ok_or_else(|| ConfigError::MissingValue {
            field: field.to_string(),
        })?;

    entry.value().as_string().ok_or_else(|| ConfigError::Invalid {
        message: format!("{} expects a string, got `{}`", field, entry.value()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.global.log_level, LogLevel::Info);
        assert_eq!(config.ipc.socket_path, None);
        assert_eq!(config.ipc.wm_command, "i3");
    }

    #[test]
    fn test_full_config() {
        let config = r#"
            global {
                log-level "debug"
            }
            ipc {
                socket-path "/run/user/1000/i3/ipc-socket.42"
                wm-command "sway"
            }
        "#;

        let config = parse_config_str(config).unwrap();
        assert_eq!(config.global.log_level, LogLevel::Debug);
        assert_eq!(
            config.ipc.socket_path,
            Some(PathBuf::from("/run/user/1000/i3/ipc-socket.42"))
        );
        assert_eq!(config.ipc.wm_command, "sway");
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let config = parse_config_str(r#"global { log-level "WARNING"; }"#).unwrap();
        assert_eq!(config.global.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_invalid_log_level() {
        let result = parse_config_str(r#"global { log-level "loud"; }"#);
        match result {
            Err(ConfigError::Invalid { message }) => {
                assert!(message.contains("loud"), "unexpected message: {}", message);
            }
            other => panic!("Expected Invalid error, got: {:?}", other),
        }
    }

    #[test]
    fn test_non_string_value_rejected() {
        let result = parse_config_str(r#"ipc { wm-command 3; }"#);
        assert!(
            matches!(result, Err(ConfigError::Invalid { .. })),
            "Expected Invalid error, got: {:?}",
            result
        );
    }

    #[test]
    fn test_missing_value_rejected() {
        let result = parse_config_str(r#"ipc { socket-path; }"#);
        match result {
            Err(ConfigError::MissingValue { field }) => assert_eq!(field, "ipc.socket-path"),
            other => panic!("Expected MissingValue error, got: {:?}", other),
        }
    }

    #[test]
    fn test_empty_socket_path_rejected() {
        let result = parse_config_str(r#"ipc { socket-path ""; }"#);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_unknown_top_level_node() {
        let result = parse_config_str(r#"device "Keyboard" {}"#);
        match result {
            Err(ConfigError::UnknownKey { key }) => assert_eq!(key, "device"),
            other => panic!("Expected UnknownKey error, got: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_nested_option() {
        let result = parse_config_str(r#"ipc { timeout 5; }"#);
        match result {
            Err(ConfigError::UnknownKey { key }) => assert_eq!(key, "ipc.timeout"),
            other => panic!("Expected UnknownKey error, got: {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error_carries_source() {
        let source = "global {";
        match parse_config_str(source) {
            Err(ConfigError::ParseError { src, .. }) => assert_eq!(src, source),
            other => panic!("Expected ParseError, got: {:?}", other),
        }
    }

    #[test]
    fn test_tilde_expansion_in_socket_path() {
        let config = parse_config_str(r#"ipc { socket-path "~/.i3/ipc.sock"; }"#).unwrap();

        let path = config.ipc.socket_path.unwrap();
        let path_str = path.to_string_lossy();
        assert!(
            !path_str.starts_with('~'),
            "Tilde should be expanded, but got: {}",
            path_str
        );

        let home = std::env::var("HOME").expect("HOME environment variable not set");
        assert!(
            path_str.starts_with(&home),
            "Path should start with home directory '{}', but got: {}",
            home,
            path_str
        );
        assert!(path_str.ends_with("/.i3/ipc.sock"));
    }

    #[test]
    fn test_parse_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.kdl");
        std::fs::write(&path, "global {\n    log-level \"trace\"\n}\n").unwrap();

        let config = parse_config(&path).unwrap();
        assert_eq!(config.global.log_level, LogLevel::Trace);
    }

    #[test]
    fn test_parse_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_config(&dir.path().join("absent.kdl"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
