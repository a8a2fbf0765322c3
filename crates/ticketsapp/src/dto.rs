//! Response shapes.
//!
//! Lightweight projections of the entities, produced by [`Mapper`]s that the
//! API facade builds once at startup. Field names match the entity field
//! names they are copied from.
//!
//! [`Mapper`]: crate::mapper::Mapper

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::fields::{filterable_names, Assign, FieldKind, FieldSpec, FieldValue, Record};
use crate::model::{Priority, Status, Ticket};

/// Filtered listing: the items, their count and the filterable field names
/// of the entity they were projected from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterResult<T> {
    pub items: Vec<T>,
    pub count: usize,
    pub filterable_fields: Vec<&'static str>,
}

impl<T> FilterResult<T> {
    /// Wrap items projected from `E`.
    pub fn of<E: Record + 'static>(items: Vec<T>) -> Self {
        Self {
            count: items.len(),
            items,
            filterable_fields: filterable_names::<E>(),
        }
    }
}

/// A ticket with its messages and their attachments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketDetail {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub messages: Vec<MessageView>,
}

// --- TicketSummary ---

/// Listing and search view of a ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TicketSummary {
    pub id: i64,
    pub title: String,
    pub name: String,
    pub email: String,
    pub priority: Priority,
    pub status: Status,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketSummaryField {
    Id,
    Title,
    Name,
    Email,
    Priority,
    Status,
    Timestamp,
    UserId,
}

impl Record for TicketSummary {
    type Field = TicketSummaryField;
    const NAME: &'static str = "ticket summary";
    const FIELDS: &'static [FieldSpec<TicketSummaryField>] = &[
        FieldSpec::new(TicketSummaryField::Id, "id", FieldKind::Integer),
        FieldSpec::new(TicketSummaryField::Title, "title", FieldKind::Text),
        FieldSpec::new(TicketSummaryField::Name, "name", FieldKind::Text),
        FieldSpec::new(TicketSummaryField::Email, "email", FieldKind::Text),
        FieldSpec::enumeration(TicketSummaryField::Priority, "priority", Priority::NAMES),
        FieldSpec::enumeration(TicketSummaryField::Status, "status", Status::NAMES),
        FieldSpec::new(TicketSummaryField::Timestamp, "timestamp", FieldKind::Timestamp),
        FieldSpec::new(TicketSummaryField::UserId, "user_id", FieldKind::Integer).nullable(),
    ];

    fn get(&self, field: TicketSummaryField) -> FieldValue {
        match field {
            TicketSummaryField::Id => FieldValue::Integer(self.id),
            TicketSummaryField::Title => FieldValue::Text(self.title.clone()),
            TicketSummaryField::Name => FieldValue::Text(self.name.clone()),
            TicketSummaryField::Email => FieldValue::Text(self.email.clone()),
            TicketSummaryField::Priority => FieldValue::Enum(self.priority.as_str().to_string()),
            TicketSummaryField::Status => FieldValue::Enum(self.status.as_str().to_string()),
            TicketSummaryField::Timestamp => FieldValue::Timestamp(self.timestamp),
            TicketSummaryField::UserId => self.user_id.map_or(FieldValue::Null, FieldValue::Integer),
        }
    }
}

impl Assign for TicketSummary {
    fn set(&mut self, field: TicketSummaryField, value: FieldValue) -> Result<(), FieldValue> {
        match (field, value) {
            (TicketSummaryField::Id, FieldValue::Integer(v)) => self.id = v,
            (TicketSummaryField::Title, FieldValue::Text(v)) => self.title = v,
            (TicketSummaryField::Name, FieldValue::Text(v)) => self.name = v,
            (TicketSummaryField::Email, FieldValue::Text(v)) => self.email = v,
            (TicketSummaryField::Priority, FieldValue::Enum(name)) => match name.parse() {
                Ok(priority) => self.priority = priority,
                Err(_) => return Err(FieldValue::Enum(name)),
            },
            (TicketSummaryField::Status, FieldValue::Enum(name)) => match name.parse() {
                Ok(status) => self.status = status,
                Err(_) => return Err(FieldValue::Enum(name)),
            },
            (TicketSummaryField::Timestamp, FieldValue::Timestamp(v)) => self.timestamp = v,
            (TicketSummaryField::UserId, FieldValue::Integer(v)) => self.user_id = Some(v),
            (TicketSummaryField::UserId, FieldValue::Null) => self.user_id = None,
            (_, other) => return Err(other),
        }
        Ok(())
    }
}

// --- MessageView ---

/// A message with its attachments, as shown under a ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageView {
    pub id: i64,
    pub ticket_id: i64,
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Filled from the attachments table, not by the mapper
    pub attachments: Vec<AttachmentView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageViewField {
    Id,
    TicketId,
    Author,
    Content,
    Timestamp,
}

impl Record for MessageView {
    type Field = MessageViewField;
    const NAME: &'static str = "message view";
    const FIELDS: &'static [FieldSpec<MessageViewField>] = &[
        FieldSpec::new(MessageViewField::Id, "id", FieldKind::Integer),
        FieldSpec::new(MessageViewField::TicketId, "ticket_id", FieldKind::Integer),
        FieldSpec::new(MessageViewField::Author, "author", FieldKind::Text),
        FieldSpec::new(MessageViewField::Content, "content", FieldKind::Text),
        FieldSpec::new(MessageViewField::Timestamp, "timestamp", FieldKind::Timestamp),
    ];

    fn get(&self, field: MessageViewField) -> FieldValue {
        match field {
            MessageViewField::Id => FieldValue::Integer(self.id),
            MessageViewField::TicketId => FieldValue::Integer(self.ticket_id),
            MessageViewField::Author => FieldValue::Text(self.author.clone()),
            MessageViewField::Content => FieldValue::Text(self.content.clone()),
            MessageViewField::Timestamp => FieldValue::Timestamp(self.timestamp),
        }
    }
}

impl Assign for MessageView {
    fn set(&mut self, field: MessageViewField, value: FieldValue) -> Result<(), FieldValue> {
        match (field, value) {
            (MessageViewField::Id, FieldValue::Integer(v)) => self.id = v,
            (MessageViewField::TicketId, FieldValue::Integer(v)) => self.ticket_id = v,
            (MessageViewField::Author, FieldValue::Text(v)) => self.author = v,
            (MessageViewField::Content, FieldValue::Text(v)) => self.content = v,
            (MessageViewField::Timestamp, FieldValue::Timestamp(v)) => self.timestamp = v,
            (_, other) => return Err(other),
        }
        Ok(())
    }
}

// --- AttachmentView ---

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttachmentView {
    pub path: String,
    pub message_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentViewField {
    Path,
    MessageId,
}

impl Record for AttachmentView {
    type Field = AttachmentViewField;
    const NAME: &'static str = "attachment view";
    const FIELDS: &'static [FieldSpec<AttachmentViewField>] = &[
        FieldSpec::new(AttachmentViewField::Path, "path", FieldKind::Text),
        FieldSpec::new(AttachmentViewField::MessageId, "message_id", FieldKind::Integer),
    ];

    fn get(&self, field: AttachmentViewField) -> FieldValue {
        match field {
            AttachmentViewField::Path => FieldValue::Text(self.path.clone()),
            AttachmentViewField::MessageId => FieldValue::Integer(self.message_id),
        }
    }
}

impl Assign for AttachmentView {
    fn set(&mut self, field: AttachmentViewField, value: FieldValue) -> Result<(), FieldValue> {
        match (field, value) {
            (AttachmentViewField::Path, FieldValue::Text(v)) => self.path = v,
            (AttachmentViewField::MessageId, FieldValue::Integer(v)) => self.message_id = v,
            (_, other) => return Err(other),
        }
        Ok(())
    }
}

// --- UserSummary ---

/// Listing view of a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserSummaryField {
    Id,
    UserName,
    FullName,
    Email,
}

impl Record for UserSummary {
    type Field = UserSummaryField;
    const NAME: &'static str = "user summary";
    const FIELDS: &'static [FieldSpec<UserSummaryField>] = &[
        FieldSpec::new(UserSummaryField::Id, "id", FieldKind::Integer),
        FieldSpec::new(UserSummaryField::UserName, "user_name", FieldKind::Text),
        FieldSpec::new(UserSummaryField::FullName, "full_name", FieldKind::Text),
        FieldSpec::new(UserSummaryField::Email, "email", FieldKind::Text),
    ];

    fn get(&self, field: UserSummaryField) -> FieldValue {
        match field {
            UserSummaryField::Id => FieldValue::Integer(self.id),
            UserSummaryField::UserName => FieldValue::Text(self.user_name.clone()),
            UserSummaryField::FullName => FieldValue::Text(self.full_name.clone()),
            UserSummaryField::Email => FieldValue::Text(self.email.clone()),
        }
    }
}

impl Assign for UserSummary {
    fn set(&mut self, field: UserSummaryField, value: FieldValue) -> Result<(), FieldValue> {
        match (field, value) {
            (UserSummaryField::Id, FieldValue::Integer(v)) => self.id = v,
            (UserSummaryField::UserName, FieldValue::Text(v)) => self.user_name = v,
            (UserSummaryField::FullName, FieldValue::Text(v)) => self.full_name = v,
            (UserSummaryField::Email, FieldValue::Text(v)) => self.email = v,
            (_, other) => return Err(other),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::Mapper;
    use crate::model::{Attachment, Message, User};

    #[test]
    fn entity_projections_validate() {
        Mapper::<Ticket, TicketSummary>::strict().unwrap();
        Mapper::<Message, MessageView>::strict().unwrap();
        Mapper::<Attachment, AttachmentView>::strict().unwrap();
        Mapper::<User, UserSummary>::strict().unwrap();
    }

    #[test]
    fn ticket_summary_copies_enums_and_optional_user() {
        let mut ticket = Ticket::new("Printer", "Ann", "ann@example.com");
        ticket.id = 3;
        ticket.priority = Priority::High;
        ticket.status = Status::Opened;
        ticket.user_id = Some(5);

        let summary = Mapper::<Ticket, TicketSummary>::new()
            .unwrap()
            .convert(&ticket)
            .unwrap();
        assert_eq!(summary.id, 3);
        assert_eq!(summary.priority, Priority::High);
        assert_eq!(summary.status, Status::Opened);
        assert_eq!(summary.user_id, Some(5));
        assert_eq!(summary.timestamp, ticket.timestamp);
    }

    #[test]
    fn enum_summary_rejects_unknown_member() {
        let mut summary = TicketSummary::default();
        let rejected = summary.set(TicketSummaryField::Status, FieldValue::Enum("CLOSED".into()));
        assert_eq!(rejected, Err(FieldValue::Enum("CLOSED".into())));
    }

    #[test]
    fn filter_result_carries_registry_fields() {
        let result = FilterResult::of::<User>(vec![UserSummary::default()]);
        assert_eq!(result.count, 1);
        assert_eq!(result.filterable_fields, vec!["user_name", "full_name", "email"]);
    }
}
