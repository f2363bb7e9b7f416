use std::{env, env::VarError};

/// Variables that are safe to print, with the default that applies when they are not set.
const DISPLAY_ENVS: [(&str, Option<&str>); 6] = [
    ("RUST_LOG", None),
    ("QPG_HOST", Some("127.0.0.1")),
    ("QPG_PORT", Some("8370")),
    ("QPG_DB_MAX_CONNECTIONS", Some("10")),
    ("QPG_USE_X_FORWARDED_FOR", Some("false")),
    ("QPG_USE_FORWARDED", Some("false")),
];

/// Variables whose values are never printed. Only whether they are set is shown. The database URL may embed
/// credentials.
const SECRET_ENVS: [&str; 2] = ["QPG_DATABASE_URL", "QPG_SERVER_KEY"];

/// The server takes no arguments. If any are given, print the help and the current configuration and return true, so
/// that the caller can exit.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        const README: &str = include_str!("./cli-help.txt");
        println!("\n{README}\n");
        println!("Current environment:");
        for line in describe_envs(|name| env::var(name)) {
            println!("{line}");
        }
    }
    has_cli_args
}

fn describe_envs<F>(lookup: F) -> Vec<String>
where F: Fn(&str) -> Result<String, VarError> {
    let visible = DISPLAY_ENVS.iter().map(|&(name, default)| {
        let val = match (lookup(name), default) {
            (Ok(s), _) => s,
            (Err(VarError::NotPresent), Some(d)) => format!("Not set (default {d})"),
            (Err(VarError::NotPresent), None) => "Not set".into(),
            (Err(VarError::NotUnicode(s)), _) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        format!("  {name:<35} {val}")
    });
    let hidden = SECRET_ENVS.iter().map(|&name| {
        let val = match lookup(name) {
            Ok(s) if !s.trim().is_empty() => "Set (hidden)",
            _ => "Not set (required)",
        };
        format!("  {name:<35} {val}")
    });
    visible.chain(hidden).collect()
}
