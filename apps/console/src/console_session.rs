use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use pulse_application::{
    AttachmentService, AuditLogQuery, AuthorizationService, Document, DocumentStore, KeyOutcome,
    MentionController, MentionKey, MessageService, NotificationService, PointerTarget,
    ProfileService, ReactionService, ReactionTarget, ThemeService,
};
use pulse_core::{AppError, AppResult, SubjectId, SubjectIdentity};
use pulse_domain::{FileDescriptor, MessageRef, edit_indicator, mention};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::info;

use crate::console_command::{ConsoleCommand, HELP};
use crate::console_surfaces::ConsoleInput;

const MESSAGES_PATH: &str = "channels/general/messages";
const ATTACHMENTS_PATH: &str = "channels/general/attachments";
const AUDIT_PAGE_SIZE: usize = 20;

/// Wired services behind one interactive console.
pub struct Console {
    pub store: Arc<dyn DocumentStore>,
    pub input: Arc<ConsoleInput>,
    pub controller: MentionController,
    pub authorization: AuthorizationService,
    pub attachments: AttachmentService,
    pub messages: MessageService,
    pub reactions: ReactionService,
    pub notifications: NotificationService,
    pub profile: ProfileService,
    pub themes: ThemeService,
}

impl Console {
    /// Runs one command. Returns `false` when the console should exit.
    pub async fn handle(&self, command: ConsoleCommand) -> AppResult<bool> {
        match command {
            ConsoleCommand::Type(text) => {
                let snapshot = self.input.type_text(&text);
                self.controller.on_input(snapshot).await;
            }
            ConsoleCommand::Key(key) => {
                let outcome = self.controller.on_key(key).await;
                if outcome == KeyOutcome::PassThrough && key == MentionKey::Enter {
                    self.send().await?;
                }
            }
            ConsoleCommand::Pick(index) => {
                if self
                    .controller
                    .on_pointer(PointerTarget::Suggestion(index))
                    .await
                    .is_none()
                {
                    println!("no suggestion at {index}");
                }
            }
            ConsoleCommand::ClickAway => {
                self.controller.on_pointer(PointerTarget::Outside).await;
            }
            ConsoleCommand::Send => self.send().await?,
            ConsoleCommand::Edit {
                message_id,
                content,
            } => self.edit(&message_id, &content).await?,
            ConsoleCommand::Delete { message_id } => {
                let actor = self.require_subject().await?;
                let message = self.load_message(&message_id).await?;
                self.messages.delete_message(&actor, &message).await?;
                println!("deleted {message_id}");
            }
            ConsoleCommand::React { message_id, emoji } => {
                let actor = self.require_subject().await?;
                self.load_message(&message_id).await?;
                let target = ReactionTarget::new(MESSAGES_PATH, message_id);
                let present = self.reactions.toggle_reaction(&target, &actor, emoji).await?;
                println!(
                    "{} {}",
                    emoji.as_str(),
                    if present { "added" } else { "removed" }
                );
                for entry in self.reactions.summary(&target).await.entries() {
                    println!("  {} {} ({})", entry.emoji.as_str(), entry.count(), entry.tooltip());
                }
            }
            ConsoleCommand::Upload {
                name,
                mime_type,
                size,
            } => self.upload(FileDescriptor::new(name, mime_type, size)).await?,
            ConsoleCommand::Theme(name) => {
                let theme = self.themes.set_theme(&name)?;
                println!("theme set to {theme}");
            }
            ConsoleCommand::Name(display_name) => {
                let actor = self.require_subject().await?;
                let updated = self.profile.set_display_name(&actor, &display_name).await?;
                println!("you are now {}", updated.label());
            }
            ConsoleCommand::AssignRole { subject, role } => {
                let actor = self.require_subject().await?;
                self.authorization.assign_role(&actor, &subject, &role).await?;
                println!("{subject} is now {role}");
            }
            ConsoleCommand::RevokeRole { subject } => {
                let actor = self.require_subject().await?;
                self.authorization.revoke_role(&actor, &subject).await?;
                println!("{subject} is back to user");
            }
            ConsoleCommand::Audit => {
                let actor = self.require_subject().await?;
                let entries = self
                    .authorization
                    .list_audit_log(
                        &actor,
                        AuditLogQuery {
                            limit: AUDIT_PAGE_SIZE,
                            action: None,
                        },
                    )
                    .await?;
                for entry in entries {
                    let line = serde_json::to_string(&entry).map_err(|error| {
                        AppError::Internal(format!("failed to encode audit entry: {error}"))
                    })?;
                    println!("{line}");
                }
            }
            ConsoleCommand::WhoAmI => {
                let actor = self.require_subject().await?;
                let role = self.authorization.effective_role(&actor).await;
                match role.badge() {
                    Some(badge) => println!("{} [{}]", actor.label(), badge.label),
                    None => println!("{} ({})", actor.label(), role.display_name()),
                }
            }
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Quit => return Ok(false),
        }

        Ok(true)
    }

    async fn require_subject(&self) -> AppResult<SubjectIdentity> {
        self.profile
            .current_subject()
            .await?
            .ok_or_else(|| AppError::Unauthorized("no subject is signed in".to_owned()))
    }

    async fn send(&self) -> AppResult<()> {
        let actor = self.require_subject().await?;
        if self.profile.requires_display_name(&actor) {
            return Err(AppError::Validation(
                "pick a display name with :name before posting".to_owned(),
            ));
        }

        let content = self.input.snapshot().text.trim().to_owned();
        if content.is_empty() {
            return Err(AppError::Validation("message is empty".to_owned()));
        }

        let document: Document = [
            ("content", Value::from(content.as_str())),
            ("authorId", Value::from(actor.id().as_str())),
            ("authorName", Value::from(actor.label())),
            (
                "createdAt",
                Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            ),
        ]
        .into_iter()
        .map(|(field, value)| (field.to_owned(), value))
        .collect();
        let message_id = self.store.add(MESSAGES_PATH, document).await?;

        let notified = self
            .notifications
            .notify_mentions(&actor, &content, &format!("/channels/general#{message_id}"))
            .await;
        info!(message = %message_id, notified, "message posted");

        println!(
            "[{message_id}] {}: {}",
            actor.label(),
            mention::render_highlighted(&content).to_html()
        );

        let snapshot = self.input.clear();
        self.controller.on_input(snapshot).await;
        Ok(())
    }

    async fn edit(&self, message_id: &str, content: &str) -> AppResult<()> {
        let actor = self.require_subject().await?;
        let message = self.load_message(message_id).await?;
        if !self.messages.edit_message(&actor, &message, content).await? {
            println!("no changes");
            return Ok(());
        }

        let edited_at = self
            .store
            .get(&message_path(message_id))
            .await?
            .as_ref()
            .and_then(|document| document.get("editedAt"))
            .and_then(Value::as_str)
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            .map(|value| value.format("%H:%M").to_string());
        let indicator = edit_indicator(true, edited_at.as_deref()).unwrap_or_default();
        println!("[{message_id}] {} {indicator}", content.trim());
        Ok(())
    }

    async fn upload(&self, file: FileDescriptor) -> AppResult<()> {
        let actor = self.require_subject().await?;
        if let Some(reason) = self.attachments.validate_for(&actor, Some(&file)).await.reason() {
            println!("cannot upload {}: {reason}", file.name);
            return Ok(());
        }

        let size = usize::try_from(file.size)
            .map_err(|error| AppError::Validation(format!("file is too large: {error}")))?;
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let uploaded = self
            .attachments
            .upload(&actor, &file, vec![0; size], ATTACHMENTS_PATH, Some(sender))
            .await?;

        while let Ok(progress) = receiver.try_recv() {
            println!("  {:.0}%", progress.percent());
        }
        println!("uploaded {} ({:?}) to {}", file.name, uploaded.kind, uploaded.url);
        Ok(())
    }

    async fn load_message(&self, message_id: &str) -> AppResult<MessageRef> {
        let document = self
            .store
            .get(&message_path(message_id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("message '{message_id}'")))?;

        let field = |name: &str| {
            document
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| {
                    AppError::Internal(format!("message '{message_id}' has no '{name}'"))
                })
        };

        Ok(MessageRef {
            collection_path: MESSAGES_PATH.to_owned(),
            message_id: message_id.to_owned(),
            author: SubjectId::new(field("authorId")?)?,
            content: field("content")?,
        })
    }
}

fn message_path(message_id: &str) -> String {
    format!("{MESSAGES_PATH}/{message_id}")
}
