use std::str::FromStr;

use pulse_application::MentionKey;
use pulse_core::{AppError, AppResult, SubjectId};
use pulse_domain::ReactionEmoji;

pub const HELP: &str = "\
commands:
  <text>                      type text into the composer
  :up | :down                 move the suggestion highlight
  :enter | :tab               insert the highlighted suggestion
  :esc                        close suggestions
  :pick N                     click suggestion N
  :away                       click outside the composer
  :send                       post the composed message
  :edit MESSAGE_ID TEXT       edit a posted message
  :delete MESSAGE_ID          delete a posted message
  :react MESSAGE_ID EMOJI     toggle a reaction (glyph or name)
  :upload NAME MIME SIZE      validate and upload a synthetic file
  :theme NAME                 switch theme
  :name DISPLAY_NAME          change your display name
  :role SUBJECT ROLE          assign a role
  :revoke SUBJECT             revoke a role
  :audit                      show recent admin actions
  :whoami                     show your resolved role
  :quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Type(String),
    Key(MentionKey),
    Pick(usize),
    ClickAway,
    Send,
    Edit { message_id: String, content: String },
    Delete { message_id: String },
    React { message_id: String, emoji: ReactionEmoji },
    Upload { name: String, mime_type: String, size: u64 },
    Theme(String),
    Name(String),
    AssignRole { subject: SubjectId, role: String },
    RevokeRole { subject: SubjectId },
    Audit,
    WhoAmI,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> AppResult<ConsoleCommand> {
    let Some(command) = line.strip_prefix(':') else {
        return Ok(ConsoleCommand::Type(line.to_owned()));
    };

    let (name, rest) = command
        .trim()
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((command.trim(), ""));

    match name {
        "up" => Ok(ConsoleCommand::Key(MentionKey::ArrowUp)),
        "down" => Ok(ConsoleCommand::Key(MentionKey::ArrowDown)),
        "enter" => Ok(ConsoleCommand::Key(MentionKey::Enter)),
        "tab" => Ok(ConsoleCommand::Key(MentionKey::Tab)),
        "esc" => Ok(ConsoleCommand::Key(MentionKey::Escape)),
        "pick" => rest
            .parse::<usize>()
            .map(ConsoleCommand::Pick)
            .map_err(|error| AppError::Validation(format!("invalid suggestion index: {error}"))),
        "away" => Ok(ConsoleCommand::ClickAway),
        "send" => Ok(ConsoleCommand::Send),
        "edit" => {
            let (message_id, content) = two_arguments(rest, "usage: :edit MESSAGE_ID TEXT")?;
            Ok(ConsoleCommand::Edit {
                message_id,
                content,
            })
        }
        "delete" => Ok(ConsoleCommand::Delete {
            message_id: one_argument(rest, "usage: :delete MESSAGE_ID")?,
        }),
        "react" => {
            let (message_id, emoji) = two_arguments(rest, "usage: :react MESSAGE_ID EMOJI")?;
            Ok(ConsoleCommand::React {
                message_id,
                emoji: parse_emoji(&emoji)?,
            })
        }
        "upload" => {
            let arguments: Vec<&str> = rest.split_whitespace().collect();
            let [name, mime_type, size] = arguments.as_slice() else {
                return Err(AppError::Validation(
                    "usage: :upload NAME MIME SIZE".to_owned(),
                ));
            };
            let size = size
                .parse::<u64>()
                .map_err(|error| AppError::Validation(format!("invalid size '{size}': {error}")))?;
            Ok(ConsoleCommand::Upload {
                name: (*name).to_owned(),
                mime_type: (*mime_type).to_owned(),
                size,
            })
        }
        "theme" => Ok(ConsoleCommand::Theme(one_argument(rest, "usage: :theme NAME")?)),
        "name" => {
            if rest.is_empty() {
                return Err(AppError::Validation("usage: :name DISPLAY_NAME".to_owned()));
            }
            Ok(ConsoleCommand::Name(rest.to_owned()))
        }
        "role" => {
            let (subject, role) = two_arguments(rest, "usage: :role SUBJECT ROLE")?;
            Ok(ConsoleCommand::AssignRole {
                subject: SubjectId::new(subject)?,
                role,
            })
        }
        "revoke" => Ok(ConsoleCommand::RevokeRole {
            subject: SubjectId::new(one_argument(rest, "usage: :revoke SUBJECT")?)?,
        }),
        "audit" => Ok(ConsoleCommand::Audit),
        "whoami" => Ok(ConsoleCommand::WhoAmI),
        "help" => Ok(ConsoleCommand::Help),
        "quit" | "q" => Ok(ConsoleCommand::Quit),
        other => Err(AppError::Validation(format!(
            "unknown command ':{other}', try :help"
        ))),
    }
}

/// Accepts a glyph or a display name such as `thumbs up` or `thumbsup`.
fn parse_emoji(value: &str) -> AppResult<ReactionEmoji> {
    if let Ok(emoji) = ReactionEmoji::from_str(value) {
        return Ok(emoji);
    }

    let wanted: String = value
        .chars()
        .filter(|character| !character.is_whitespace() && *character != '_')
        .collect::<String>()
        .to_lowercase();
    ReactionEmoji::all()
        .iter()
        .copied()
        .find(|emoji| emoji.display_name().replace(' ', "").to_lowercase() == wanted)
        .ok_or_else(|| AppError::Validation(format!("unsupported reaction '{value}'")))
}

fn one_argument(rest: &str, usage: &str) -> AppResult<String> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(AppError::Validation(usage.to_owned()));
    }
    Ok(rest.to_owned())
}

fn two_arguments(rest: &str, usage: &str) -> AppResult<(String, String)> {
    rest.split_once(char::is_whitespace)
        .map(|(first, second)| (first.to_owned(), second.trim().to_owned()))
        .filter(|(_, second)| !second.is_empty())
        .ok_or_else(|| AppError::Validation(usage.to_owned()))
}

#[cfg(test)]
mod tests {
    use pulse_application::MentionKey;
    use pulse_core::AppError;
    use pulse_domain::ReactionEmoji;

    use super::{ConsoleCommand, parse_command};

    fn parse(line: &str) -> ConsoleCommand {
        parse_command(line).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn plain_lines_are_typed_text() {
        assert_eq!(parse("hi @al"), ConsoleCommand::Type("hi @al".to_owned()));
        assert_eq!(parse(" "), ConsoleCommand::Type(" ".to_owned()));
    }

    #[test]
    fn navigation_commands_map_to_keys() {
        assert_eq!(parse(":up"), ConsoleCommand::Key(MentionKey::ArrowUp));
        assert_eq!(parse(":esc"), ConsoleCommand::Key(MentionKey::Escape));
        assert_eq!(parse(":pick 2"), ConsoleCommand::Pick(2));
    }

    #[test]
    fn edit_keeps_the_rest_of_the_line() {
        assert_eq!(
            parse(":edit m1 hello  there"),
            ConsoleCommand::Edit {
                message_id: "m1".to_owned(),
                content: "hello  there".to_owned(),
            }
        );
    }

    #[test]
    fn reactions_accept_glyphs_and_names() {
        assert_eq!(
            parse(":react m1 🔥"),
            ConsoleCommand::React {
                message_id: "m1".to_owned(),
                emoji: ReactionEmoji::Fire,
            }
        );
        assert_eq!(
            parse(":react m1 thumbs up"),
            ConsoleCommand::React {
                message_id: "m1".to_owned(),
                emoji: ReactionEmoji::ThumbsUp,
            }
        );
    }

    #[test]
    fn upload_parses_size() {
        assert_eq!(
            parse(":upload clip.mp4 video/mp4 1024"),
            ConsoleCommand::Upload {
                name: "clip.mp4".to_owned(),
                mime_type: "video/mp4".to_owned(),
                size: 1024,
            }
        );
    }

    #[test]
    fn malformed_commands_are_validation_errors() {
        for line in [":pick x", ":edit m1", ":upload a b", ":role u1", ":bogus", ":react m1 crab"] {
            assert!(matches!(parse_command(line), Err(AppError::Validation(_))));
        }
    }
}
