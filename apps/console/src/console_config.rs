use std::env;

use pulse_application::{DEFAULT_SUGGESTION_LIMIT, LEGACY_ADMIN_DISPLAY_NAME};
use pulse_core::{AppError, AppResult, SubjectId};
use tracing_subscriber::EnvFilter;

const MAX_SUGGESTION_LIMIT: usize = 25;
const DEFAULT_SUBJECT_ID: &str = "local-user";
const DEFAULT_SEED_DISPLAY_NAMES: &str = "alice,alfred,bob,bobby,carol";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub admin_subject_ids: Vec<SubjectId>,
    pub legacy_admin_display_name: Option<String>,
    pub mention_suggestion_limit: usize,
    pub subject_id: SubjectId,
    pub display_name: Option<String>,
    pub seed_display_names: Vec<String>,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let admin_subject_ids = split_list(lookup("PULSE_ADMIN_SUBJECT_IDS").as_deref())
            .into_iter()
            .map(SubjectId::new)
            .collect::<AppResult<Vec<_>>>()
            .map_err(|error| {
                AppError::Validation(format!("invalid PULSE_ADMIN_SUBJECT_IDS: {error}"))
            })?;

        // Set but empty disables the legacy marker.
        let legacy_admin_display_name = Some(
            lookup("PULSE_LEGACY_ADMIN_DISPLAY_NAME")
                .unwrap_or_else(|| LEGACY_ADMIN_DISPLAY_NAME.to_owned()),
        );

        let mention_suggestion_limit = match lookup("PULSE_MENTION_SUGGESTION_LIMIT") {
            Some(value) => value.trim().parse::<usize>().map_err(|error| {
                AppError::Validation(format!(
                    "invalid PULSE_MENTION_SUGGESTION_LIMIT value '{value}': {error}"
                ))
            })?,
            None => DEFAULT_SUGGESTION_LIMIT,
        };
        if !(1..=MAX_SUGGESTION_LIMIT).contains(&mention_suggestion_limit) {
            return Err(AppError::Validation(format!(
                "PULSE_MENTION_SUGGESTION_LIMIT must be between 1 and {MAX_SUGGESTION_LIMIT}"
            )));
        }

        let subject_id = lookup("PULSE_SUBJECT_ID")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SUBJECT_ID.to_owned());
        let subject_id = SubjectId::new(subject_id)
            .map_err(|error| AppError::Validation(format!("invalid PULSE_SUBJECT_ID: {error}")))?;

        let display_name = lookup("PULSE_DISPLAY_NAME")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let seed_display_names = split_list(Some(
            lookup("PULSE_SEED_DISPLAY_NAMES")
                .as_deref()
                .unwrap_or(DEFAULT_SEED_DISPLAY_NAMES),
        ));

        Ok(Self {
            admin_subject_ids,
            legacy_admin_display_name,
            mention_suggestion_limit,
            subject_id,
            display_name,
            seed_display_names,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}
