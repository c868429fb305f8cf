//! Pulse console client composition root.

#![forbid(unsafe_code)]

mod console_command;
mod console_config;
mod console_session;
mod console_surfaces;

use std::sync::Arc;

use pulse_application::{
    AttachmentService, AuthorizationPolicy, AuthorizationService, DirectorySuggestionSource,
    DocumentStore, MentionController, MessageService, NotificationService, ProfileService,
    ReactionService, SubjectDirectory, ThemeService,
};
use pulse_core::{AppError, SubjectId, SubjectIdentity};
use pulse_domain::DisplayName;
use pulse_infrastructure::{
    DocumentAuditRepository, DocumentMessageRepository, DocumentNotificationRepository,
    DocumentReactionRepository, DocumentRoleAssignmentRepository, DocumentSubjectDirectory,
    InMemoryAuthProvider, InMemoryBlobStore, InMemoryDocumentStore, InMemoryKeyValueStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::console_command::parse_command;
use crate::console_config::{ConsoleConfig, init_tracing};
use crate::console_session::Console;
use crate::console_surfaces::{ConsoleInput, ConsoleSuggestionList, ConsoleThemeSink};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;

    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
    let directory: Arc<dyn SubjectDirectory> =
        Arc::new(DocumentSubjectDirectory::new(store.clone()));
    seed_directory(directory.as_ref(), &config).await?;

    let audit_repository = Arc::new(DocumentAuditRepository::new(store.clone()));
    let authorization = AuthorizationService::new(
        AuthorizationPolicy::new(
            config.admin_subject_ids.clone(),
            config.legacy_admin_display_name.clone(),
        ),
        Arc::new(DocumentRoleAssignmentRepository::new(store.clone())),
        audit_repository.clone(),
        audit_repository,
    );

    let input = Arc::new(ConsoleInput::default());
    let controller = MentionController::attach(
        input.clone(),
        Arc::new(DirectorySuggestionSource::new(directory.clone())),
        Arc::new(ConsoleSuggestionList),
        config.mention_suggestion_limit,
    );

    let auth_provider = Arc::new(InMemoryAuthProvider::new(Some(SubjectIdentity::new(
        config.subject_id.clone(),
        config.display_name.clone(),
    ))));
    let themes = ThemeService::new(
        Arc::new(InMemoryKeyValueStore::new()),
        Arc::new(ConsoleThemeSink),
    );
    themes.load_theme();

    let console = Console {
        store: store.clone(),
        input,
        controller,
        authorization: authorization.clone(),
        attachments: AttachmentService::new(
            authorization.clone(),
            Arc::new(InMemoryBlobStore::new()),
        ),
        messages: MessageService::new(
            authorization,
            Arc::new(DocumentMessageRepository::new(store.clone())),
        ),
        reactions: ReactionService::new(Arc::new(DocumentReactionRepository::new(store.clone()))),
        notifications: NotificationService::new(
            directory.clone(),
            Arc::new(DocumentNotificationRepository::new(store)),
        ),
        profile: ProfileService::new(auth_provider, directory),
        themes,
    };

    info!(
        subject = %config.subject_id,
        admins = config.admin_subject_ids.len(),
        legacy_marker = config.legacy_admin_display_name.is_some(),
        suggestion_limit = config.mention_suggestion_limit,
        "pulse console ready, type :help for commands"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                warn!(error = %error, "failed to read console input");
                break;
            }
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(error) => {
                warn!(error = %error, "invalid command");
                continue;
            }
        };

        match console.handle(command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(error) => warn!(error = %error, "command failed"),
        }
    }

    console.controller.detach().await;
    info!("pulse console stopped");
    Ok(())
}

async fn seed_directory(
    directory: &dyn SubjectDirectory,
    config: &ConsoleConfig,
) -> Result<(), AppError> {
    for (index, name) in config.seed_display_names.iter().enumerate() {
        let subject = SubjectId::new(format!("seed-{index}"))?;
        directory
            .save_display_name(&subject, &DisplayName::new(name.as_str())?)
            .await?;
    }

    if let Some(name) = config.display_name.as_deref() {
        directory
            .save_display_name(&config.subject_id, &DisplayName::new(name)?)
            .await?;
    }

    Ok(())
}
