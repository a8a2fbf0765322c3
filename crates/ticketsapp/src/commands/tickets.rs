use serde::{Deserialize, Serialize};
use tracing::info;

use super::filter::{self, GenericFilterRequest};
use super::messages;
use super::search::{self, TicketFilter};
use super::Projections;
use crate::dto::{FilterResult, TicketDetail, TicketSummary};
use crate::error::Result;
use crate::model::{Priority, Status, Ticket};
use crate::store::{RemoveOutcome, StorageBackend, UnitOfWork};

/// Changes to apply to a ticket. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketPatch {
    pub title: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    /// `Some(None)` clears the assignee
    pub user_id: Option<Option<i64>>,
}

impl TicketPatch {
    fn apply(self, ticket: &mut Ticket) {
        if let Some(title) = self.title {
            ticket.title = title;
        }
        if let Some(name) = self.name {
            ticket.name = name;
        }
        if let Some(email) = self.email {
            ticket.email = email;
        }
        if let Some(priority) = self.priority {
            ticket.priority = priority;
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }
        if let Some(user_id) = self.user_id {
            ticket.user_id = user_id;
            ticket.is_assigned = user_id.is_some();
        }
    }
}

pub async fn create<B: StorageBackend>(uow: &mut UnitOfWork<B>, ticket: Ticket) -> Result<Ticket> {
    let created = uow.tickets().await?.add(ticket)?;
    info!(id = created.id, "Created ticket");
    Ok(created)
}

pub async fn get<B: StorageBackend>(uow: &mut UnitOfWork<B>, id: i64) -> Result<Ticket> {
    Ok(uow.tickets().await?.get(id)?.clone())
}

/// The ticket with its messages and their attachments, in storage order.
pub async fn detail<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    id: i64,
    projections: &Projections,
) -> Result<TicketDetail> {
    let ticket = get(uow, id).await?;
    let messages = messages::views(uow, id, projections).await?;
    Ok(TicketDetail { ticket, messages })
}

pub async fn list<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    projections: &Projections,
) -> Result<Vec<TicketSummary>> {
    uow.tickets()
        .await?
        .get_all()
        .map(|t| projections.ticket_summary.convert(t))
        .collect()
}

pub async fn update<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    id: i64,
    patch: TicketPatch,
) -> Result<Ticket> {
    let tickets = uow.tickets().await?;
    let mut ticket = tickets.get(id)?.clone();
    patch.apply(&mut ticket);
    tickets.update(ticket.clone())?;
    info!(id, "Updated ticket");
    Ok(ticket)
}

/// Remove a ticket along with its messages and their attachments.
///
/// A missing ticket is a soft failure reported in the outcome; nothing else
/// is touched in that case.
pub async fn remove<B: StorageBackend>(uow: &mut UnitOfWork<B>, id: i64) -> Result<RemoveOutcome> {
    if !uow.tickets().await?.any(|t| t.id == id) {
        return Ok(uow.tickets().await?.remove(id));
    }

    let removed_messages = messages::remove_for_ticket(uow, id).await?;
    let outcome = uow.tickets().await?.remove(id);
    info!(id, messages = removed_messages, "Removed ticket");
    Ok(outcome)
}

/// Tickets assigned to `user_id`, in storage order.
pub async fn by_assignee<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    user_id: i64,
    projections: &Projections,
) -> Result<Vec<TicketSummary>> {
    uow.tickets()
        .await?
        .find(move |t| t.user_id == Some(user_id))
        .map(|t| projections.ticket_summary.convert(t))
        .collect()
}

pub async fn search<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    ticket_filter: &TicketFilter,
    projections: &Projections,
) -> Result<FilterResult<TicketSummary>> {
    let tickets = uow.tickets().await?;
    search::run(tickets, ticket_filter, &projections.ticket_summary)
}

pub async fn filter<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    request: &GenericFilterRequest,
    projections: &Projections,
) -> Result<FilterResult<TicketSummary>> {
    let tickets = uow.tickets().await?;
    filter::run(tickets, request, &projections.ticket_summary, |_| true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TicketsError;
    use crate::fields::FilterOp;
    use crate::store::mem_backend::MemBackend;

    fn uow() -> UnitOfWork<MemBackend> {
        UnitOfWork::new(MemBackend::new())
    }

    #[tokio::test]
    async fn create_and_get() {
        let mut uow = uow();
        let created = create(&mut uow, Ticket::new("Printer", "Ann", "ann@example.com"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        let fetched = get(&mut uow, 1).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let mut uow = uow();
        assert!(matches!(
            get(&mut uow, 5).await,
            Err(TicketsError::NotFound { id: 5, .. })
        ));
    }

    #[tokio::test]
    async fn update_applies_patch() {
        let mut uow = uow();
        create(&mut uow, Ticket::new("Printer", "Ann", "ann@example.com"))
            .await
            .unwrap();

        let patch = TicketPatch {
            status: Some(Status::Opened),
            user_id: Some(Some(4)),
            ..Default::default()
        };
        let updated = update(&mut uow, 1, patch).await.unwrap();
        assert_eq!(updated.status, Status::Opened);
        assert_eq!(updated.user_id, Some(4));
        assert!(updated.is_assigned);
        assert_eq!(updated.title, "Printer");

        let cleared = update(
            &mut uow,
            1,
            TicketPatch {
                user_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!cleared.is_assigned);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let mut uow = uow();
        assert!(matches!(
            update(&mut uow, 9, TicketPatch::default()).await,
            Err(TicketsError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn remove_cascades_to_messages_and_attachments() {
        let mut uow = uow();
        let projections = Projections::new().unwrap();
        create(&mut uow, Ticket::new("a", "Ann", "ann@example.com"))
            .await
            .unwrap();
        create(&mut uow, Ticket::new("b", "Bob", "bob@example.com"))
            .await
            .unwrap();
        messages::post(&mut uow, 1, "ann", "hello", vec!["a.png".into()], &projections)
            .await
            .unwrap();
        messages::post(&mut uow, 2, "bob", "hi", vec!["b.png".into()], &projections)
            .await
            .unwrap();

        let outcome = remove(&mut uow, 1).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(uow.tickets().await.unwrap().len(), 1);
        assert_eq!(uow.messages().await.unwrap().len(), 1);
        let paths: Vec<String> = uow
            .attachments()
            .await
            .unwrap()
            .get_all()
            .map(|a| a.path.clone())
            .collect();
        assert_eq!(paths, vec!["b.png".to_string()]);
    }

    #[tokio::test]
    async fn remove_missing_is_soft_failure() {
        let mut uow = uow();
        let outcome = remove(&mut uow, 3).await.unwrap();
        assert_eq!(outcome.id, 3);
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn detail_includes_messages_with_attachments() {
        let mut uow = uow();
        let projections = Projections::new().unwrap();
        create(&mut uow, Ticket::new("a", "Ann", "ann@example.com"))
            .await
            .unwrap();
        messages::post(&mut uow, 1, "ann", "first", vec![], &projections)
            .await
            .unwrap();
        messages::post(
            &mut uow,
            1,
            "support",
            "second",
            vec!["log.txt".into(), "shot.png".into()],
            &projections,
        )
        .await
        .unwrap();

        let detail = detail(&mut uow, 1, &projections).await.unwrap();
        assert_eq!(detail.ticket.id, 1);
        assert_eq!(detail.messages.len(), 2);
        assert!(detail.messages[0].attachments.is_empty());
        assert_eq!(detail.messages[1].attachments.len(), 2);
        assert_eq!(detail.messages[1].attachments[0].path, "log.txt");
    }

    #[tokio::test]
    async fn by_assignee_lists_only_that_user() {
        let mut uow = uow();
        let projections = Projections::new().unwrap();
        let mut mine = Ticket::new("mine", "Ann", "ann@example.com");
        mine.user_id = Some(3);
        create(&mut uow, mine).await.unwrap();
        create(&mut uow, Ticket::new("other", "Bob", "bob@example.com"))
            .await
            .unwrap();

        let listed = by_assignee(&mut uow, 3, &projections).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "mine");
    }

    #[tokio::test]
    async fn generic_filter_over_tickets() {
        let mut uow = uow();
        let projections = Projections::new().unwrap();
        create(&mut uow, Ticket::new("VPN down", "Ann", "ann@example.com"))
            .await
            .unwrap();
        create(&mut uow, Ticket::new("Printer", "Bob", "bob@example.com"))
            .await
            .unwrap();

        let request = GenericFilterRequest::by_field("title", FilterOp::Contains, "vpn");
        let result = filter(&mut uow, &request, &projections).await.unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.items[0].title, "VPN down");
    }

    #[tokio::test]
    async fn search_goes_through_the_composer() {
        let mut uow = uow();
        let projections = Projections::new().unwrap();
        create(&mut uow, Ticket::new("a", "Ann", "ann@example.com"))
            .await
            .unwrap();
        let result = search(&mut uow, &TicketFilter::default(), &projections)
            .await
            .unwrap();
        assert_eq!(result.count, 1);
    }
}
