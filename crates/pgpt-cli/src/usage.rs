//! Usage guidance generated from the command catalog.

use std::fmt::Write as _;

use crate::catalog::{
    Command, CommandSpec, FieldKind, Presence, SERVER_IP_FLAG, SERVER_PORT_FLAG, TOKEN_FLAG,
};

pub(crate) const BINARY_NAME: &str = "pgpt";

/// One-line synopsis such as
/// `Usage: pgpt logout --server-ip <SERVER_IP> --server-port <SERVER_PORT> --token <TOKEN>`.
pub(crate) fn usage_line(spec: &CommandSpec) -> String {
    let mut line = format!("Usage: {BINARY_NAME} {}", spec.command);
    push_value(&mut line, SERVER_IP_FLAG);
    push_value(&mut line, SERVER_PORT_FLAG);
    if spec.requires_token {
        push_value(&mut line, TOKEN_FLAG);
    }
    for field in spec.fields {
        let placeholder = placeholder(field.flag);
        let rendered = match field.kind {
            FieldKind::Flag => format!("[{}]", field.flag),
            FieldKind::List => format!("[{} <{placeholder}>...]", field.flag),
            FieldKind::Text if field.presence == Presence::Required => {
                format!("{} <{placeholder}>", field.flag)
            }
            FieldKind::Text => format!("[{} <{placeholder}>]", field.flag),
        };
        line.push(' ');
        line.push_str(&rendered);
    }
    line
}

/// Summary, synopsis, and defaults for `pgpt <COMMAND> --help`.
pub(crate) fn command_help(spec: &CommandSpec) -> String {
    let mut help = format!("{}\n\n{}\n", spec.summary, usage_line(spec));
    let defaults: Vec<String> = spec
        .fields
        .iter()
        .filter_map(|field| match field.presence {
            Presence::DefaultText(default) => {
                Some(format!("{} defaults to \"{default}\"", field.flag))
            }
            _ => None,
        })
        .collect();
    if !defaults.is_empty() {
        help.push('\n');
        for line in defaults {
            let _ = writeln!(help, "  {line}");
        }
    }
    help
}

/// Table of every command with its summary.
pub(crate) fn command_list() -> String {
    let width = Command::all()
        .map(|command| command.to_string().len())
        .max()
        .unwrap_or_default();
    let mut listing = String::from("Commands:\n");
    for command in Command::all() {
        let name = command.to_string();
        let _ = writeln!(listing, "  {name:<width$}  {}", command.spec().summary);
    }
    listing
}

fn push_value(line: &mut String, flag: &str) {
    let _ = write!(line, " {flag} <{}>", placeholder(flag));
}

/// `--chat-id` becomes `CHAT_ID` and `--ftpPassword` becomes `FTP_PASSWORD`.
fn placeholder(flag: &str) -> String {
    let mut name = String::new();
    for character in flag.trim_start_matches('-').chars() {
        if character == '-' {
            name.push('_');
        } else if character.is_ascii_uppercase() {
            name.push('_');
            name.push(character);
        } else {
            name.push(character.to_ascii_uppercase());
        }
    }
    name
}
