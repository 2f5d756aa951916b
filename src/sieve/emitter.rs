/// Emit SIEVE script text from AST nodes.
use crate::sieve::ast::{Argument, Command, Script};

const INDENT: &str = "  ";

/// Render a script. Commands are separated by newlines and the text has no
/// trailing newline.
pub fn emit(script: &Script) -> String {
    script
        .commands
        .iter()
        .map(emit_command)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Commands with a single argument stay on one line. Longer ones put every
/// tag (with its value) and every positional argument on its own indented
/// line, with the terminating `;` after the last one.
fn emit_command(cmd: &Command) -> String {
    if cmd.arguments.len() <= 1 {
        let mut line = cmd.identifier.clone();
        for arg in &cmd.arguments {
            line.push(' ');
            line.push_str(&emit_argument(arg));
        }
        line.push(';');
        return line;
    }

    let mut lines = vec![cmd.identifier.clone()];
    let last = cmd.arguments.len() - 1;
    let mut i = 0;
    while i <= last {
        let arg = &cmd.arguments[i];
        let mut line = format!("{INDENT}{}", emit_argument(arg));
        if matches!(arg, Argument::Tag(_)) && i < last {
            let next = &cmd.arguments[i + 1];
            // The final argument is always positional, never a tag value.
            if !matches!(next, Argument::Tag(_)) && i + 1 < last {
                line.push(' ');
                line.push_str(&emit_argument(next));
                i += 1;
            }
        }
        lines.push(line);
        i += 1;
    }

    let mut out = lines.join("\n");
    out.push(';');
    out
}

fn emit_argument(arg: &Argument) -> String {
    match arg {
        Argument::Tag(t) => t.clone(),
        Argument::Number(n) => n.to_string(),
        Argument::String(s) => quote(s),
        Argument::StringList(items) => {
            let list = items.iter().map(|s| quote(s)).collect::<Vec<_>>().join(", ");
            format!("[{list}]")
        }
    }
}

/// Wrap `s` in double quotes, escaping as RFC 5228 §2.4.2 requires.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape(s))
}

/// Escape the two characters that are special inside a quoted string.
/// Everything else, line breaks included, is legal as-is.
pub fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_argument_inline() {
        let script = Script {
            commands: vec![Command {
                identifier: "require".into(),
                arguments: vec![Argument::StringList(vec!["vacation".into()])],
            }],
        };
        assert_eq!(emit(&script), "require [\"vacation\"];");
    }

    #[test]
    fn test_tagged_arguments_on_own_lines() {
        let cmd = Command {
            identifier: "vacation".into(),
            arguments: vec![
                Argument::Tag(":days".into()),
                Argument::Number(3),
                Argument::Tag(":subject".into()),
                Argument::String("Away".into()),
                Argument::String("Back soon".into()),
            ],
        };
        assert_eq!(
            emit_command(&cmd),
            "vacation\n  :days 3\n  :subject \"Away\"\n  \"Back soon\";"
        );
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a "b" \c"#), r#"a \"b\" \\c"#);
        assert_eq!(escape("line\nbreak"), "line\nbreak");
    }

    #[test]
    fn test_commands_joined_without_trailing_newline() {
        let script = Script {
            commands: vec![
                Command {
                    identifier: "keep".into(),
                    arguments: vec![],
                },
                Command {
                    identifier: "stop".into(),
                    arguments: vec![],
                },
            ],
        };
        assert_eq!(emit(&script), "keep;\nstop;");
    }
}
