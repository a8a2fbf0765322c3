//! # Command Layer
//!
//! The services of the ticket system. Each area lives in its own submodule
//! and works on a [`UnitOfWork`](crate::store::UnitOfWork) handed in by the
//! caller.
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Load the repositories they need and stage mutations on them
//! - Project entities into response shapes through [`Projections`]
//! - Return structured types, never strings
//!
//! ## What Commands Do NOT Do
//!
//! - **Commit**: staged changes become durable when the caller invokes
//!   `save_changes` (the API facade does it after every mutation)
//! - **Any I/O** beyond the unit of work: no stdout, no formatting
//! - **Argument parsing**: that's the UI layer's job
//!
//! ## Command Modules
//!
//! - [`tickets`]: create, read, update and remove tickets
//! - [`messages`]: messages and their attachments under a ticket
//! - [`users`]: user records
//! - [`search`]: the multi-criterion ticket search
//! - [`filter`]: the generic named-field / free-text filter shared by all

use crate::dto::{AttachmentView, MessageView, TicketSummary, UserSummary};
use crate::error::Result;
use crate::mapper::Mapper;
use crate::model::{Attachment, Message, Ticket, User};

pub mod filter;
pub mod messages;
pub mod search;
pub mod tickets;
pub mod users;

/// The validated mappers from entities into their response shapes.
#[derive(Debug, Clone)]
pub struct Projections {
    pub ticket_summary: Mapper<Ticket, TicketSummary>,
    pub message_view: Mapper<Message, MessageView>,
    pub attachment_view: Mapper<Attachment, AttachmentView>,
    pub user_summary: Mapper<User, UserSummary>,
}

impl Projections {
    /// Build and validate every mapper. Fails on the first field mismatch.
    pub fn new() -> Result<Self> {
        Ok(Self {
            ticket_summary: Mapper::strict()?,
            message_view: Mapper::strict()?,
            attachment_view: Mapper::strict()?,
            user_summary: Mapper::strict()?,
        })
    }
}
