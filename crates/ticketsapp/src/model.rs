//! # Domain Model
//!
//! The persisted records of the ticket system: [`Ticket`], [`Message`],
//! [`Attachment`] and [`User`], plus the [`Priority`], [`Status`] and
//! [`Language`] enums.
//!
//! ## Field Tables
//!
//! Each record implements [`Record`] with a closed field enum and a static
//! field table. The table decides which fields are filterable:
//!
//! | Record       | Filterable fields                                        |
//! |--------------|----------------------------------------------------------|
//! | `Ticket`     | title, name, email, priority, status, is_assigned        |
//! | `Message`    | author, content                                          |
//! | `Attachment` | path                                                     |
//! | `User`       | user_name, full_name, email                              |
//!
//! ## Enum Representation
//!
//! `Priority` and `Status` are stored, filtered and projected by their
//! canonical SCREAMING_CASE name (`"NOT_SURE"`, `"OPENED"`). The integer
//! ordinals exist for the sentinel-carrying wire request only.
//!
//! ## Navigation Fields
//!
//! `Ticket::messages` and `Message::attachments` are filled by the detail
//! commands from their own tables. They are never persisted inline.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fields::{FieldKind, FieldSpec, FieldValue, Record};
use crate::store::Entity;

/// Error returned when parsing an enum member from text or an ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Canonical spelling of an enum member name: trimmed, with spaces and
/// dashes as underscores. Matching then ignores ASCII case.
fn member_name(s: &str) -> String {
    s.trim().replace([' ', '-'], "_")
}

// --- Priority ---

/// Ticket priority, ordered from `NotSure` to `Highest`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[default]
    NotSure,
    Lowest,
    Low,
    Medium,
    High,
    Highest,
}

impl Priority {
    pub const ALL: [Priority; 6] = [
        Priority::NotSure,
        Priority::Lowest,
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Highest,
    ];

    pub const NAMES: &'static [&'static str] =
        &["NOT_SURE", "LOWEST", "LOW", "MEDIUM", "HIGH", "HIGHEST"];

    pub fn as_str(self) -> &'static str {
        Self::NAMES[self.ordinal() as usize]
    }

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    pub fn from_ordinal(ordinal: i64) -> Result<Self, ParseEnumError> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.ordinal() == ordinal)
            .ok_or_else(|| ParseEnumError {
                kind: "priority",
                value: ordinal.to_string(),
            })
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = member_name(s);
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ParseEnumError {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Status ---

/// Ticket lifecycle status: `Pending` → `Opened` → `Paused` → `Finished`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Pending,
    Opened,
    Paused,
    Finished,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Pending,
        Status::Opened,
        Status::Paused,
        Status::Finished,
    ];

    pub const NAMES: &'static [&'static str] = &["PENDING", "OPENED", "PAUSED", "FINISHED"];

    pub fn as_str(self) -> &'static str {
        Self::NAMES[self.ordinal() as usize]
    }

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    pub fn from_ordinal(ordinal: i64) -> Result<Self, ParseEnumError> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.ordinal() == ordinal)
            .ok_or_else(|| ParseEnumError {
                kind: "status",
                value: ordinal.to_string(),
            })
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = member_name(s);
        Self::ALL
            .iter()
            .copied()
            .find(|st| st.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ParseEnumError {
                kind: "status",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Language ---

/// Preferred language of a user. Ordinals start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    #[default]
    English = 1,
    Spanish = 2,
}

impl Language {
    pub const NAMES: &'static [&'static str] = &["ENGLISH", "SPANISH"];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "ENGLISH",
            Language::Spanish => "SPANISH",
        }
    }
}

impl FromStr for Language {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" | "1" => Ok(Language::English),
            "spanish" | "es" | "2" => Ok(Language::Spanish),
            _ => Err(ParseEnumError {
                kind: "language",
                value: s.to_string(),
            }),
        }
    }
}

// --- Ticket ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub title: String,
    /// Requester name
    pub name: String,
    /// Requester email
    pub email: String,
    pub timestamp: DateTime<Utc>,
    /// Assigned user, if any
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub is_assigned: bool,
    #[serde(default)]
    pub has_new_messages: bool,
    #[serde(default)]
    pub new_messages_count: i64,
    #[serde(skip)]
    pub messages: Vec<Message>,
}

impl Ticket {
    /// A new, unassigned ticket with `NotSure` priority in `Pending` status.
    pub fn new(title: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            name: name.into(),
            email: email.into(),
            timestamp: Utc::now(),
            user_id: None,
            priority: Priority::NotSure,
            status: Status::Pending,
            is_assigned: false,
            has_new_messages: false,
            new_messages_count: 0,
            messages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketField {
    Id,
    Title,
    Name,
    Email,
    Timestamp,
    UserId,
    Priority,
    Status,
    IsAssigned,
    HasNewMessages,
    NewMessagesCount,
}

impl Record for Ticket {
    type Field = TicketField;
    const NAME: &'static str = "ticket";
    const FIELDS: &'static [FieldSpec<TicketField>] = &[
        FieldSpec::new(TicketField::Id, "id", FieldKind::Integer),
        FieldSpec::new(TicketField::Title, "title", FieldKind::Text).filterable(),
        FieldSpec::new(TicketField::Name, "name", FieldKind::Text).filterable(),
        FieldSpec::new(TicketField::Email, "email", FieldKind::Text).filterable(),
        FieldSpec::new(TicketField::Timestamp, "timestamp", FieldKind::Timestamp),
        FieldSpec::new(TicketField::UserId, "user_id", FieldKind::Integer).nullable(),
        FieldSpec::enumeration(TicketField::Priority, "priority", Priority::NAMES).filterable(),
        FieldSpec::enumeration(TicketField::Status, "status", Status::NAMES).filterable(),
        FieldSpec::new(TicketField::IsAssigned, "is_assigned", FieldKind::Bool).filterable(),
        FieldSpec::new(TicketField::HasNewMessages, "has_new_messages", FieldKind::Bool),
        FieldSpec::new(TicketField::NewMessagesCount, "new_messages_count", FieldKind::Integer),
    ];

    fn get(&self, field: TicketField) -> FieldValue {
        match field {
            TicketField::Id => FieldValue::Integer(self.id),
            TicketField::Title => FieldValue::Text(self.title.clone()),
            TicketField::Name => FieldValue::Text(self.name.clone()),
            TicketField::Email => FieldValue::Text(self.email.clone()),
            TicketField::Timestamp => FieldValue::Timestamp(self.timestamp),
            TicketField::UserId => self.user_id.map_or(FieldValue::Null, FieldValue::Integer),
            TicketField::Priority => FieldValue::Enum(self.priority.as_str().to_string()),
            TicketField::Status => FieldValue::Enum(self.status.as_str().to_string()),
            TicketField::IsAssigned => FieldValue::Bool(self.is_assigned),
            TicketField::HasNewMessages => FieldValue::Bool(self.has_new_messages),
            TicketField::NewMessagesCount => FieldValue::Integer(self.new_messages_count),
        }
    }
}

impl Entity for Ticket {
    const TABLE: &'static str = "tickets";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

// --- Message ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub ticket_id: i64,
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip)]
    pub attachments: Vec<Attachment>,
}

impl Message {
    pub fn new(ticket_id: i64, author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: 0,
            ticket_id,
            author: author.into(),
            content: content.into(),
            timestamp: Utc::now(),
            attachments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageField {
    Id,
    TicketId,
    Author,
    Content,
    Timestamp,
}

impl Record for Message {
    type Field = MessageField;
    const NAME: &'static str = "message";
    const FIELDS: &'static [FieldSpec<MessageField>] = &[
        FieldSpec::new(MessageField::Id, "id", FieldKind::Integer),
        FieldSpec::new(MessageField::TicketId, "ticket_id", FieldKind::Integer),
        FieldSpec::new(MessageField::Author, "author", FieldKind::Text).filterable(),
        FieldSpec::new(MessageField::Content, "content", FieldKind::Text).filterable(),
        FieldSpec::new(MessageField::Timestamp, "timestamp", FieldKind::Timestamp),
    ];

    fn get(&self, field: MessageField) -> FieldValue {
        match field {
            MessageField::Id => FieldValue::Integer(self.id),
            MessageField::TicketId => FieldValue::Integer(self.ticket_id),
            MessageField::Author => FieldValue::Text(self.author.clone()),
            MessageField::Content => FieldValue::Text(self.content.clone()),
            MessageField::Timestamp => FieldValue::Timestamp(self.timestamp),
        }
    }
}

impl Entity for Message {
    const TABLE: &'static str = "messages";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

// --- Attachment ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub message_id: i64,
    /// Where the attachment bytes live; storing them is someone else's job
    pub path: String,
}

impl Attachment {
    pub fn new(message_id: i64, path: impl Into<String>) -> Self {
        Self {
            id: 0,
            message_id,
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentField {
    Id,
    MessageId,
    Path,
}

impl Record for Attachment {
    type Field = AttachmentField;
    const NAME: &'static str = "attachment";
    const FIELDS: &'static [FieldSpec<AttachmentField>] = &[
        FieldSpec::new(AttachmentField::Id, "id", FieldKind::Integer),
        FieldSpec::new(AttachmentField::MessageId, "message_id", FieldKind::Integer),
        FieldSpec::new(AttachmentField::Path, "path", FieldKind::Text).filterable(),
    ];

    fn get(&self, field: AttachmentField) -> FieldValue {
        match field {
            AttachmentField::Id => FieldValue::Integer(self.id),
            AttachmentField::MessageId => FieldValue::Integer(self.message_id),
            AttachmentField::Path => FieldValue::Text(self.path.clone()),
        }
    }
}

impl Entity for Attachment {
    const TABLE: &'static str = "attachments";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

// --- User ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub is_deleted: bool,
}

impl User {
    pub fn new(
        user_name: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            user_name: user_name.into(),
            full_name: full_name.into(),
            email: email.into(),
            phone_number: None,
            language: Language::English,
            is_deleted: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Id,
    UserName,
    FullName,
    Email,
    PhoneNumber,
    Language,
    IsDeleted,
}

impl Record for User {
    type Field = UserField;
    const NAME: &'static str = "user";
    const FIELDS: &'static [FieldSpec<UserField>] = &[
        FieldSpec::new(UserField::Id, "id", FieldKind::Integer),
        FieldSpec::new(UserField::UserName, "user_name", FieldKind::Text).filterable(),
        FieldSpec::new(UserField::FullName, "full_name", FieldKind::Text).filterable(),
        FieldSpec::new(UserField::Email, "email", FieldKind::Text).filterable(),
        FieldSpec::new(UserField::PhoneNumber, "phone_number", FieldKind::Text).nullable(),
        FieldSpec::enumeration(UserField::Language, "language", Language::NAMES),
        FieldSpec::new(UserField::IsDeleted, "is_deleted", FieldKind::Bool),
    ];

    fn get(&self, field: UserField) -> FieldValue {
        match field {
            UserField::Id => FieldValue::Integer(self.id),
            UserField::UserName => FieldValue::Text(self.user_name.clone()),
            UserField::FullName => FieldValue::Text(self.full_name.clone()),
            UserField::Email => FieldValue::Text(self.email.clone()),
            UserField::PhoneNumber => self
                .phone_number
                .clone()
                .map_or(FieldValue::Null, FieldValue::Text),
            UserField::Language => FieldValue::Enum(self.language.as_str().to_string()),
            UserField::IsDeleted => FieldValue::Bool(self.is_deleted),
        }
    }
}

impl Entity for User {
    const TABLE: &'static str = "users";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}
