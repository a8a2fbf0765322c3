//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every ticket operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the [`UnitOfWork`] and the validated [`Projections`]
//! - **Dispatches** to the appropriate command function
//! - **Commits** after every mutation, so each call is one transaction
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Presentation**: it returns data structures, not strings
//!
//! ## Transactions
//!
//! A mutation that fails inside the command layer discards whatever it had
//! staged. A mutation whose commit fails returns `Persistence` and keeps its
//! changes staged; the next successful commit writes them.
//!
//! ## Generic Over StorageBackend
//!
//! `TicketsApi<B: StorageBackend>`:
//! - Production: `TicketsApi<FsBackend>`
//! - Testing: `TicketsApi<MemBackend>`

use std::path::PathBuf;

use crate::commands::filter::{GenericFilterRequest, UserFilterRequest};
use crate::commands::search::{TicketFilter, TicketFilterRequest};
use crate::commands::tickets::TicketPatch;
use crate::commands::users::UserPatch;
use crate::commands::{self, Projections};
use crate::dto::{FilterResult, MessageView, TicketDetail, TicketSummary, UserSummary};
use crate::error::Result;
use crate::model::{Language, Ticket, User};
use crate::store::fs_backend::FsBackend;
use crate::store::{RemoveOutcome, StorageBackend, UnitOfWork};

/// The main API facade for ticket operations.
pub struct TicketsApi<B: StorageBackend> {
    uow: UnitOfWork<B>,
    projections: Projections,
}

impl TicketsApi<FsBackend> {
    /// Open the file store rooted at `data_dir`.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::new(FsBackend::new(data_dir))
    }
}

impl<B: StorageBackend> TicketsApi<B> {
    /// Fails when a projection does not line up with its entity.
    pub fn new(backend: B) -> Result<Self> {
        Ok(Self {
            uow: UnitOfWork::new(backend),
            projections: Projections::new()?,
        })
    }

    pub fn backend(&self) -> &B {
        self.uow.backend()
    }

    async fn commit<T>(&mut self, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.uow.save_changes().await?;
                Ok(value)
            }
            Err(e) => {
                self.uow.discard();
                Err(e)
            }
        }
    }

    // --- tickets ---

    pub async fn create_ticket(&mut self, ticket: Ticket) -> Result<Ticket> {
        let result = commands::tickets::create(&mut self.uow, ticket).await;
        self.commit(result).await
    }

    pub async fn get_ticket(&mut self, id: i64) -> Result<Ticket> {
        commands::tickets::get(&mut self.uow, id).await
    }

    pub async fn ticket_detail(&mut self, id: i64) -> Result<TicketDetail> {
        commands::tickets::detail(&mut self.uow, id, &self.projections).await
    }

    pub async fn list_tickets(&mut self) -> Result<Vec<TicketSummary>> {
        commands::tickets::list(&mut self.uow, &self.projections).await
    }

    pub async fn tickets_assigned_to(&mut self, user_id: i64) -> Result<Vec<TicketSummary>> {
        commands::tickets::by_assignee(&mut self.uow, user_id, &self.projections).await
    }

    pub async fn update_ticket(&mut self, id: i64, patch: TicketPatch) -> Result<Ticket> {
        let result = commands::tickets::update(&mut self.uow, id, patch).await;
        self.commit(result).await
    }

    pub async fn remove_ticket(&mut self, id: i64) -> Result<RemoveOutcome> {
        let result = commands::tickets::remove(&mut self.uow, id).await;
        self.commit(result).await
    }

    pub async fn search_tickets(
        &mut self,
        filter: &TicketFilter,
    ) -> Result<FilterResult<TicketSummary>> {
        commands::tickets::search(&mut self.uow, filter, &self.projections).await
    }

    /// Search with a sentinel-encoded request.
    pub async fn search_tickets_request(
        &mut self,
        request: TicketFilterRequest,
    ) -> Result<FilterResult<TicketSummary>> {
        let filter = TicketFilter::try_from(request)?;
        self.search_tickets(&filter).await
    }

    pub async fn filter_tickets(
        &mut self,
        request: &GenericFilterRequest,
    ) -> Result<FilterResult<TicketSummary>> {
        commands::tickets::filter(&mut self.uow, request, &self.projections).await
    }

    // --- messages ---

    pub async fn post_message(
        &mut self,
        ticket_id: i64,
        author: impl Into<String>,
        content: impl Into<String>,
        attachment_paths: Vec<String>,
    ) -> Result<MessageView> {
        let result = commands::messages::post(
            &mut self.uow,
            ticket_id,
            author,
            content,
            attachment_paths,
            &self.projections,
        )
        .await;
        self.commit(result).await
    }

    pub async fn get_message(&mut self, id: i64) -> Result<MessageView> {
        commands::messages::get(&mut self.uow, id, &self.projections).await
    }

    pub async fn ticket_messages(&mut self, ticket_id: i64) -> Result<Vec<MessageView>> {
        commands::messages::for_ticket(&mut self.uow, ticket_id, &self.projections).await
    }

    pub async fn update_message(
        &mut self,
        id: i64,
        content: impl Into<String>,
        attachment_paths: Vec<String>,
    ) -> Result<MessageView> {
        let result = commands::messages::update(
            &mut self.uow,
            id,
            content,
            attachment_paths,
            &self.projections,
        )
        .await;
        self.commit(result).await
    }

    pub async fn remove_message(&mut self, id: i64) -> Result<RemoveOutcome> {
        let result = commands::messages::remove(&mut self.uow, id).await;
        self.commit(result).await
    }

    pub async fn mark_messages_read(&mut self, ticket_id: i64) -> Result<Ticket> {
        let result = commands::messages::mark_read(&mut self.uow, ticket_id).await;
        self.commit(result).await
    }

    // --- users ---

    pub async fn create_user(&mut self, user: User) -> Result<User> {
        let result = commands::users::create(&mut self.uow, user).await;
        self.commit(result).await
    }

    pub async fn get_user(&mut self, id: i64) -> Result<User> {
        commands::users::get(&mut self.uow, id).await
    }

    pub async fn user_by_email(&mut self, email: &str) -> Result<Option<User>> {
        commands::users::by_email(&mut self.uow, email).await
    }

    pub async fn user_by_name(&mut self, user_name: &str) -> Result<Option<User>> {
        commands::users::by_user_name(&mut self.uow, user_name).await
    }

    pub async fn list_users(&mut self) -> Result<Vec<UserSummary>> {
        commands::users::list(&mut self.uow, &self.projections).await
    }

    pub async fn filter_users(
        &mut self,
        request: &UserFilterRequest,
    ) -> Result<FilterResult<UserSummary>> {
        commands::users::filter(&mut self.uow, request, &self.projections).await
    }

    pub async fn update_user(&mut self, id: i64, patch: UserPatch) -> Result<User> {
        let result = commands::users::update(&mut self.uow, id, patch).await;
        self.commit(result).await
    }

    pub async fn change_user_language(&mut self, id: i64, language: Language) -> Result<User> {
        let result = commands::users::change_language(&mut self.uow, id, language).await;
        self.commit(result).await
    }

    pub async fn deactivate_user(&mut self, id: i64) -> Result<User> {
        let result = commands::users::deactivate(&mut self.uow, id).await;
        self.commit(result).await
    }

    pub async fn remove_user(&mut self, id: i64) -> Result<RemoveOutcome> {
        let result = commands::users::remove(&mut self.uow, id).await;
        self.commit(result).await
    }
}
