//! crates/dreamlog_core/src/validate.rs
//!
//! Entity schema validation. Each validator inspects the whole attribute set
//! and reports every violation at once; a single bad field aborts the whole
//! write (all-or-nothing, no partial acceptance).
//!
//! The topic-reference validator lives here too: every topic id attached to
//! a dream must resolve in the topic collection at write time, both at
//! creation and whenever a patch replaces the topic set.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::domain::{
    Dream, DreamDraft, DreamPatch, DreamTypeDraft, NewDream, NewDreamType, NewReaction, NewTopic,
    NewUser, ReactionDraft, ReactionPatch, TopicDraft, User, UserPatch,
};
use crate::error::{Error, Violation, ViolationKind};
use crate::ports::{JournalStore, StoreResult};

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#([0-9a-f]{3}){1,2}$").expect("hex color pattern"));

// Deliberately loose, matching the historical behavior: anything shaped
// like <something>@<something>.<something>.
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern"));

fn required(field: &'static str, message: &str) -> Violation {
    Violation::new(field, ViolationKind::Required, message)
}

/// Empty strings count as missing, like a required text field left blank.
fn filled(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

//=========================================================================================
// Topic-Reference Validator
//=========================================================================================

/// Checks a candidate topic set: at least one id, and every id must resolve
/// in the topic collection. Read-only; performs no mutation.
pub async fn topic_refs(store: &dyn JournalStore, topics: &[Uuid]) -> Result<(), Error> {
    let violations = topic_violations(store, topics).await?;
    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(violations))
    }
}

async fn topic_violations(store: &dyn JournalStore, topics: &[Uuid]) -> StoreResult<Vec<Violation>> {
    if topics.is_empty() {
        return Ok(vec![Violation::new(
            "topics",
            ViolationKind::TopicRequired,
            "At least one topic is required",
        )]);
    }
    let mut violations = Vec::new();
    for id in topics {
        if !store.topic_exists(*id).await? {
            violations.push(Violation::new(
                "topics",
                ViolationKind::InvalidTopic,
                format!("Topic {} does not exist", id),
            ));
        }
    }
    Ok(violations)
}

//=========================================================================================
// Dreams
//=========================================================================================

/// Validates a dream creation and assembles the draft. Violations are
/// reported in schema order: author, content, topics, type, title.
pub async fn dream_draft(store: &dyn JournalStore, attrs: NewDream) -> Result<DreamDraft, Error> {
    let mut violations = Vec::new();

    if attrs.author.is_none() {
        violations.push(required("author", "Dream author is required"));
    }
    let content = filled(attrs.content);
    if content.is_none() {
        violations.push(required("content", "Dream content is required"));
    }
    let topics = attrs.topics.unwrap_or_default();
    violations.extend(topic_violations(store, &topics).await?);
    if attrs.kind.is_none() {
        violations.push(required("type", "Dream type is required"));
    }
    let title = filled(attrs.title);
    if title.is_none() {
        violations.push(required("title", "Dream title is required"));
    }

    match (attrs.author, content, attrs.kind, title) {
        (Some(author), Some(content), Some(kind), Some(title)) if violations.is_empty() => {
            Ok(DreamDraft {
                author,
                anonym: attrs.anonym.unwrap_or(false),
                content,
                title,
                topics,
                kind,
                published: attrs.published.unwrap_or(false),
            })
        }
        _ => Err(Error::Validation(violations)),
    }
}

/// Applies a partial patch to a dream. Absent fields leave the dream
/// untouched; a replaced topic set goes through the reference validator
/// again. Nothing is mutated unless the whole patch is valid.
pub async fn apply_dream_patch(
    store: &dyn JournalStore,
    dream: &mut Dream,
    patch: DreamPatch,
) -> Result<(), Error> {
    let mut violations = Vec::new();

    if let Some(title) = &patch.title {
        if title.is_empty() {
            violations.push(required("title", "Dream title is required"));
        }
    }
    if let Some(content) = &patch.content {
        if content.is_empty() {
            violations.push(required("content", "Dream content is required"));
        }
    }
    if let Some(topics) = &patch.topics {
        violations.extend(topic_violations(store, topics).await?);
    }
    if !violations.is_empty() {
        return Err(Error::Validation(violations));
    }

    if let Some(title) = patch.title {
        dream.title = title;
    }
    if let Some(content) = patch.content {
        dream.content = content;
    }
    if let Some(topics) = patch.topics {
        dream.topics = topics;
    }
    if let Some(kind) = patch.kind {
        dream.kind = kind;
    }
    if let Some(anonym) = patch.anonym {
        dream.anonym = anonym;
    }
    Ok(())
}

//=========================================================================================
// Users
//=========================================================================================

/// Validates a new account. Name uniqueness is checked against the store;
/// the email is optional but must look like an address when present.
pub async fn new_user(store: &dyn JournalStore, attrs: &NewUser) -> Result<(), Error> {
    let mut violations = Vec::new();

    if let Some(email) = &attrs.email {
        if !EMAIL.is_match(email) {
            violations.push(Violation::new(
                "email",
                ViolationKind::InvalidFormat,
                "Invalid email",
            ));
        }
    }
    match attrs.name.as_deref() {
        None | Some("") => violations.push(required("name", "Name is required")),
        Some(name) => {
            if store.user_name_taken(name, None).await? {
                violations.push(Violation::new(
                    "name",
                    ViolationKind::NameTaken,
                    "Name already exists",
                ));
            }
        }
    }
    match attrs.password.as_deref() {
        None | Some("") => violations.push(required("password", "Password is required")),
        Some(password) => {
            if password.chars().count() < 8 {
                violations.push(Violation::new(
                    "password",
                    ViolationKind::TooShort,
                    "Password is too small",
                ));
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(violations))
    }
}

/// Validates a partial user update against the current document. Keeping
/// the current name is allowed; taking another user's name is not.
pub async fn user_patch(
    store: &dyn JournalStore,
    current: &User,
    patch: &UserPatch,
) -> Result<(), Error> {
    let mut violations = Vec::new();

    if let Some(email) = &patch.email {
        if !EMAIL.is_match(email) {
            violations.push(Violation::new(
                "email",
                ViolationKind::InvalidFormat,
                "Invalid email",
            ));
        }
    }
    if let Some(name) = &patch.name {
        if name.is_empty() {
            violations.push(required("name", "Name is required"));
        } else if store.user_name_taken(name, Some(current.id)).await? {
            violations.push(Violation::new(
                "name",
                ViolationKind::NameTaken,
                "Name already exists",
            ));
        }
    }
    if let Some(password) = &patch.password {
        if password.is_empty() {
            violations.push(required("password", "Password is required"));
        } else if password.chars().count() < 8 {
            violations.push(Violation::new(
                "password",
                ViolationKind::TooShort,
                "Password is too small",
            ));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(violations))
    }
}

//=========================================================================================
// Topics, Types, Reactions
//=========================================================================================

pub fn new_topic(attrs: NewTopic) -> Result<TopicDraft, Error> {
    named_color_draft(attrs.name, attrs.color, "Topic name is required", "Topic color is required")
        .map(|(name, color)| TopicDraft { name, color })
}

pub fn new_dream_type(attrs: NewDreamType) -> Result<DreamTypeDraft, Error> {
    named_color_draft(attrs.name, attrs.color, "Type name is required", "Type color is required")
        .map(|(name, color)| DreamTypeDraft { name, color })
}

// Topics and types share the same shape: a required name and a required
// hex color (#RGB or #RRGGBB, case-insensitive).
fn named_color_draft(
    name: Option<String>,
    color: Option<String>,
    name_message: &str,
    color_message: &str,
) -> Result<(String, String), Error> {
    let mut violations = Vec::new();

    let name = filled(name);
    if name.is_none() {
        violations.push(required("name", name_message));
    }
    let color = match filled(color) {
        None => {
            violations.push(required("color", color_message));
            None
        }
        Some(color) if !HEX_COLOR.is_match(&color) => {
            violations.push(Violation::new(
                "color",
                ViolationKind::InvalidFormat,
                "Invalid color",
            ));
            None
        }
        Some(color) => Some(color),
    };

    match (name, color) {
        (Some(name), Some(color)) if violations.is_empty() => Ok((name, color)),
        _ => Err(Error::Validation(violations)),
    }
}

pub fn new_reaction(attrs: NewReaction) -> Result<ReactionDraft, Error> {
    let mut violations = Vec::new();

    let name = filled(attrs.name);
    if name.is_none() {
        violations.push(required("name", "Reaction name is required"));
    }
    let icon = filled(attrs.icon);
    if icon.is_none() {
        violations.push(required("icon", "Icon is required"));
    }

    match (name, icon) {
        (Some(name), Some(icon)) => Ok(ReactionDraft { name, icon }),
        _ => Err(Error::Validation(violations)),
    }
}

/// A reaction patch may touch either field, but cannot blank one out.
pub fn reaction_patch(patch: &ReactionPatch) -> Result<(), Error> {
    let mut violations = Vec::new();

    if patch.name.as_deref() == Some("") {
        violations.push(required("name", "Reaction name is required"));
    }
    if patch.icon.as_deref() == Some("") {
        violations.push(required("icon", "Icon is required"));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(violations))
    }
}
