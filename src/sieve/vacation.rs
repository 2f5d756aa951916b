/// Bidirectional conversion between `VacationRule` and the script this
/// client stores under the name `vacation`.
///
/// `encode()`: rule → AST → emitted text
/// `decode()`: stored script → parse → rule, or "externally managed"
use crate::model::script::FilterScript;
use crate::model::vacation::{VacationRule, VacationState};
use crate::sieve::ast::{Argument, Command, Script};
use crate::sieve::{emitter, parser};

/// Name of the backend script holding the auto-responder.
pub const SCRIPT_NAME: &str = "vacation";

const EXTENSION: &str = "vacation";

/// Render a rule as:
///
/// ```text
/// require ["vacation"];
/// vacation
///   :days <days>
///   :subject "<subject>"
///   "<body>";
/// ```
pub fn encode(rule: &VacationRule) -> String {
    let script = Script {
        commands: vec![
            Command {
                identifier: "require".to_string(),
                arguments: vec![Argument::StringList(vec![EXTENSION.to_string()])],
            },
            Command {
                identifier: "vacation".to_string(),
                arguments: vec![
                    Argument::Tag(":days".to_string()),
                    Argument::Number(u64::from(rule.days)),
                    Argument::Tag(":subject".to_string()),
                    Argument::String(rule.subject.clone()),
                    Argument::String(rule.body.clone()),
                ],
            },
        ],
    };
    emitter::emit(&script)
}

/// Classify the stored `vacation` script. `enabled` always comes from the
/// backend's activation flag, never from the text.
pub fn decode(script: Option<&FilterScript>) -> VacationState {
    let Some(script) = script else {
        return VacationState::Absent;
    };

    match parse_template(&script.content) {
        Ok(fields) => VacationState::Recognized(VacationRule {
            enabled: script.is_active,
            subject: fields.subject,
            body: fields.body,
            days: fields.days.unwrap_or(VacationRule::default().days),
        }),
        Err(reason) => {
            tracing::info!(%reason, "vacation script not editable here");
            VacationState::ExternallyManaged {
                active: script.is_active,
            }
        }
    }
}

struct TemplateFields {
    subject: String,
    body: String,
    days: Option<u32>,
}

/// Accepts exactly `require "vacation"` followed by one `vacation` command
/// carrying `:subject`, an optional `:days` and a final body string.
fn parse_template(content: &str) -> Result<TemplateFields, String> {
    let script = parser::parse(content).map_err(|e| e.to_string())?;

    if script.commands.len() != 2 {
        return Err(format!(
            "expected 2 commands, found {}",
            script.commands.len()
        ));
    }
    let require = &script.commands[0];
    if !require.identifier.eq_ignore_ascii_case("require") {
        return Err(format!("expected 'require', found '{}'", require.identifier));
    }
    let vacation = script
        .command("vacation")
        .ok_or_else(|| "missing 'vacation' command".to_string())?;

    let extensions: Vec<&str> = match require.arguments.as_slice() {
        [Argument::StringList(items)] => items.iter().map(String::as_str).collect(),
        [single] => single.as_str().into_iter().collect(),
        _ => Vec::new(),
    };
    if extensions != [EXTENSION] {
        return Err(format!("unexpected extensions {extensions:?}"));
    }

    let Some((body, tagged)) = vacation.arguments.split_last() else {
        return Err("missing reason string".to_string());
    };
    let body = body
        .as_str()
        .ok_or_else(|| "missing reason string".to_string())?;

    // Only `:subject` and `:days`, each at most once and each with a value.
    let mut seen: Vec<&str> = Vec::new();
    for pair in tagged.chunks(2) {
        match pair {
            [Argument::Tag(tag), value]
                if matches!(tag.as_str(), ":subject" | ":days")
                    && !seen.contains(&tag.as_str())
                    && !matches!(value, Argument::Tag(_)) =>
            {
                seen.push(tag);
            }
            other => return Err(format!("unsupported argument {other:?}")),
        }
    }

    let subject = vacation
        .tagged(":subject")
        .ok_or_else(|| "missing :subject".to_string())?
        .as_str()
        .ok_or_else(|| ":subject needs a string".to_string())?;

    let days = match vacation.tagged(":days") {
        None => None,
        Some(arg) => {
            let n = arg
                .as_number()
                .ok_or_else(|| ":days needs a number".to_string())?;
            let n = u32::try_from(n)
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| format!(":days {n} out of range"))?;
            Some(n)
        }
    };

    if subject.is_empty() || body.is_empty() {
        return Err("empty subject or body".to_string());
    }

    Ok(TemplateFields {
        subject: subject.to_string(),
        body: body.to_string(),
        days,
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn stored(content: &str, is_active: bool) -> FilterScript {
        FilterScript {
            name: SCRIPT_NAME.to_string(),
            content: content.to_string(),
            is_active,
            ..Default::default()
        }
    }

    fn rule(subject: &str, body: &str, days: u32) -> VacationRule {
        VacationRule {
            enabled: true,
            subject: subject.to_string(),
            body: body.to_string(),
            days,
        }
    }

    #[test]
    fn test_encode_template() {
        let text = encode(&rule("Away", "Back soon", 3));
        assert_eq!(
            text,
            "require [\"vacation\"];\nvacation\n  :days 3\n  :subject \"Away\"\n  \"Back soon\";"
        );
    }

    #[test]
    fn test_encode_escapes_quotes() {
        let text = encode(&rule("Say \"hi\"", "Back soon", 1));
        assert!(text.contains(r#"Say \"hi\""#));
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            rule("Away", "Back soon", 3),
            rule("Out of Office", "I am currently away and will respond when I return.", 1),
            rule("Urlaub", "Bin bis Montag weg. Grüße", 14),
            rule("x", "y", 365),
        ];
        for original in cases {
            let decoded = decode(Some(&stored(&encode(&original), true)));
            assert_eq!(decoded, VacationState::Recognized(original));
        }
    }

    #[test]
    fn test_round_trip_special_characters() {
        let specials = ["\"", "\\", "\\\"", "\n", "\r\n", "\t", ";", "#", "/*", "*/", "]", ":days 9", "text:", "é"];
        for s in specials {
            let original = rule(&format!("a{s}b"), &format!("{s}body{s}"), 2);
            let decoded = decode(Some(&stored(&encode(&original), true)));
            assert_eq!(decoded, VacationState::Recognized(original), "failed for {s:?}");
        }
    }

    proptest! {
        #[test]
        fn test_round_trip_any_text(
            subject in "[\\PC\n\r\t]{1,60}",
            body in "[\\PC\n\r\t]{1,200}",
            days in 1u32..=u32::MAX,
        ) {
            let original = rule(&subject, &body, days);
            let decoded = decode(Some(&stored(&encode(&original), true)));
            prop_assert_eq!(decoded, VacationState::Recognized(original));
        }
    }

    #[test]
    fn test_enabled_comes_from_activation_flag() {
        let text = encode(&rule("Away", "Back soon", 3));
        match decode(Some(&stored(&text, false))) {
            VacationState::Recognized(r) => assert!(!r.enabled),
            other => panic!("expected recognized, got {other:?}"),
        }
    }

    #[test]
    fn test_absent() {
        let state = decode(None);
        assert_eq!(state, VacationState::Absent);
        let r = state.rule();
        assert!(!r.enabled);
        assert_eq!(r, VacationRule::default());
    }

    #[test]
    fn test_missing_subject_is_externally_managed() {
        let text = "require [\"vacation\"];\nvacation :days 3 \"Back soon\";";
        assert_eq!(
            decode(Some(&stored(text, true))),
            VacationState::ExternallyManaged { active: true }
        );
    }

    #[test]
    fn test_missing_days_keeps_default() {
        let text = "require \"vacation\";\nvacation :subject \"Away\" \"Back soon\";";
        assert_eq!(
            decode(Some(&stored(text, true))),
            VacationState::Recognized(rule("Away", "Back soon", 1))
        );
    }

    #[test]
    fn test_extra_whitespace_and_comments_accepted() {
        let text = "# written by hand\nrequire   [ \"vacation\" ] ;\n\n\tvacation :subject \"Away\"\t:days 5\n\"Back soon\" ;\n";
        assert_eq!(
            decode(Some(&stored(text, false))),
            VacationState::Recognized(VacationRule {
                enabled: false,
                ..rule("Away", "Back soon", 5)
            })
        );
    }

    #[test]
    fn test_body_is_last_quoted_argument() {
        let text = "require [\"vacation\"];\nvacation :subject \"Away\" \"Back soon\";";
        match decode(Some(&stored(text, true))) {
            VacationState::Recognized(r) => assert_eq!(r.body, "Back soon"),
            other => panic!("expected recognized, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_scripts_outside_template() {
        let cases = [
            // spam rules mixed in
            "require [\"vacation\", \"fileinto\"];\nif header :contains \"Subject\" \"SPAM\" { fileinto \"Junk\"; }\nvacation :subject \"Away\" \"Back\";",
            // extra options this page cannot show
            "require [\"vacation\"];\nvacation :days 3 :subject \"Away\" :from \"me@example.com\" \"Back\";",
            // two responders
            "require [\"vacation\"];\nvacation :subject \"A\" \"B\";\nvacation :subject \"C\" \"D\";",
            // no require
            "vacation :subject \"Away\" \"Back soon\";",
            // body missing
            "require [\"vacation\"];\nvacation :subject \"Away\";",
            // zero days
            "require [\"vacation\"];\nvacation :days 0 :subject \"Away\" \"Back\";",
            // not sieve at all
            "this is { not valid",
            "",
        ];
        for text in cases {
            assert_eq!(
                decode(Some(&stored(text, true))),
                VacationState::ExternallyManaged { active: true },
                "should reject {text:?}"
            );
        }
    }

    #[test]
    fn test_multiline_body_accepted() {
        let text = "require \"vacation\";\nvacation :subject \"Away\" text:\r\nBack soon.\r\n.\r\n;";
        match decode(Some(&stored(text, true))) {
            VacationState::Recognized(r) => assert_eq!(r.body, "Back soon.\r\n"),
            other => panic!("expected recognized, got {other:?}"),
        }
    }
}
