use std::collections::HashSet;

use tracing::info;

use super::Projections;
use crate::dto::{AttachmentView, MessageView};
use crate::error::Result;
use crate::model::{Attachment, Message};
use crate::store::{RemoveOutcome, StorageBackend, UnitOfWork};

/// Post a message under a ticket, with attachment paths.
///
/// Flags the ticket as having new messages and bumps its unread counter.
pub async fn post<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    ticket_id: i64,
    author: impl Into<String>,
    content: impl Into<String>,
    attachment_paths: Vec<String>,
    projections: &Projections,
) -> Result<MessageView> {
    let mut ticket = uow.tickets().await?.get(ticket_id)?.clone();

    let message = uow
        .messages()
        .await?
        .add(Message::new(ticket_id, author, content))?;

    let attachments = uow.attachments().await?;
    let mut views = Vec::with_capacity(attachment_paths.len());
    for path in attachment_paths {
        let attachment = attachments.add(Attachment::new(message.id, path))?;
        views.push(projections.attachment_view.convert(&attachment)?);
    }

    ticket.has_new_messages = true;
    ticket.new_messages_count += 1;
    uow.tickets().await?.update(ticket)?;

    info!(ticket_id, id = message.id, attachments = views.len(), "Posted message");
    let mut view = projections.message_view.convert(&message)?;
    view.attachments = views;
    Ok(view)
}

pub async fn get<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    id: i64,
    projections: &Projections,
) -> Result<MessageView> {
    let message = uow.messages().await?.get(id)?.clone();
    let mut view = projections.message_view.convert(&message)?;
    view.attachments = attachment_views(uow, id, projections).await?;
    Ok(view)
}

/// Messages of an existing ticket, with their attachments.
pub async fn for_ticket<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    ticket_id: i64,
    projections: &Projections,
) -> Result<Vec<MessageView>> {
    uow.tickets().await?.get(ticket_id)?;
    views(uow, ticket_id, projections).await
}

/// Message views of a ticket in storage order, without checking the ticket.
pub(crate) async fn views<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    ticket_id: i64,
    projections: &Projections,
) -> Result<Vec<MessageView>> {
    let messages: Vec<Message> = uow
        .messages()
        .await?
        .find(move |m| m.ticket_id == ticket_id)
        .cloned()
        .collect();

    let mut views = Vec::with_capacity(messages.len());
    for message in &messages {
        let mut view = projections.message_view.convert(message)?;
        view.attachments = attachment_views(uow, message.id, projections).await?;
        views.push(view);
    }
    Ok(views)
}

async fn attachment_views<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    message_id: i64,
    projections: &Projections,
) -> Result<Vec<AttachmentView>> {
    uow.attachments()
        .await?
        .find(move |a| a.message_id == message_id)
        .map(|a| projections.attachment_view.convert(a))
        .collect()
}

/// Replace a message's content.
///
/// A non-empty `attachment_paths` replaces the message's attachments; an
/// empty one keeps them.
pub async fn update<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    id: i64,
    content: impl Into<String>,
    attachment_paths: Vec<String>,
    projections: &Projections,
) -> Result<MessageView> {
    let messages = uow.messages().await?;
    let mut message = messages.get(id)?.clone();
    message.content = content.into();
    messages.update(message.clone())?;

    if !attachment_paths.is_empty() {
        remove_attachments(uow, &HashSet::from([id])).await?;
        let attachments = uow.attachments().await?;
        for path in attachment_paths {
            attachments.add(Attachment::new(id, path))?;
        }
    }

    info!(id, "Updated message");
    let mut view = projections.message_view.convert(&message)?;
    view.attachments = attachment_views(uow, id, projections).await?;
    Ok(view)
}

/// Remove a message and its attachments. A missing message is a soft failure.
pub async fn remove<B: StorageBackend>(uow: &mut UnitOfWork<B>, id: i64) -> Result<RemoveOutcome> {
    if uow.messages().await?.any(|m| m.id == id) {
        let removed = remove_attachments(uow, &HashSet::from([id])).await?;
        info!(id, attachments = removed, "Removed message");
    }
    Ok(uow.messages().await?.remove(id))
}

/// Remove every message of a ticket and their attachments.
///
/// Returns the number of messages removed.
pub async fn remove_for_ticket<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    ticket_id: i64,
) -> Result<usize> {
    let message_ids: HashSet<i64> = uow
        .messages()
        .await?
        .find(move |m| m.ticket_id == ticket_id)
        .map(|m| m.id)
        .collect();

    remove_attachments(uow, &message_ids).await?;

    let messages = uow.messages().await?;
    for id in &message_ids {
        messages.remove(*id);
    }
    Ok(message_ids.len())
}

async fn remove_attachments<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    message_ids: &HashSet<i64>,
) -> Result<usize> {
    let attachments = uow.attachments().await?;
    let ids: Vec<i64> = attachments
        .find(|a| message_ids.contains(&a.message_id))
        .map(|a| a.id)
        .collect();
    for id in &ids {
        attachments.remove(*id);
    }
    Ok(ids.len())
}

/// Clear the ticket's new-message flag and counter.
pub async fn mark_read<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    ticket_id: i64,
) -> Result<crate::model::Ticket> {
    let tickets = uow.tickets().await?;
    let mut ticket = tickets.get(ticket_id)?.clone();
    ticket.has_new_messages = false;
    ticket.new_messages_count = 0;
    tickets.update(ticket.clone())?;
    Ok(ticket)
}
