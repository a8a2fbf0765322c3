use serde::{Deserialize, Serialize};
use tracing::info;

use super::filter::{self, UserFilterRequest};
use super::Projections;
use crate::dto::{FilterResult, UserSummary};
use crate::error::{Result, TicketsError};
use crate::model::{Language, User};
use crate::store::{RemoveOutcome, Repository, StorageBackend, UnitOfWork};

/// Changes to a user's identity fields. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub user_name: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the phone number
    pub phone_number: Option<Option<String>>,
}

impl UserPatch {
    fn apply(self, user: &mut User) {
        if let Some(user_name) = self.user_name {
            user.user_name = user_name;
        }
        if let Some(full_name) = self.full_name {
            user.full_name = full_name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(phone_number) = self.phone_number {
            user.phone_number = phone_number;
        }
    }
}

/// User names are unique as written, emails ignoring ASCII case. Deactivated
/// users still hold theirs.
fn ensure_unique(users: &Repository<User>, user: &User) -> Result<()> {
    let taken = |what: &str, value: &str| TicketsError::Invalid {
        record: "user",
        reason: format!("{} `{}` is already taken", what, value),
    };
    if users.any(|u| u.id != user.id && u.user_name == user.user_name) {
        return Err(taken("user name", &user.user_name));
    }
    if users.any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email)) {
        return Err(taken("email", &user.email));
    }
    Ok(())
}

pub async fn create<B: StorageBackend>(uow: &mut UnitOfWork<B>, user: User) -> Result<User> {
    let users = uow.users().await?;
    ensure_unique(users, &user)?;
    let created = users.add(user)?;
    info!(id = created.id, user_name = %created.user_name, "Created user");
    Ok(created)
}

pub async fn update<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    id: i64,
    patch: UserPatch,
) -> Result<User> {
    let users = uow.users().await?;
    let mut user = users.get(id)?.clone();
    patch.apply(&mut user);
    ensure_unique(users, &user)?;
    users.update(user.clone())?;
    info!(id, "Updated user");
    Ok(user)
}

pub async fn get<B: StorageBackend>(uow: &mut UnitOfWork<B>, id: i64) -> Result<User> {
    Ok(uow.users().await?.get(id)?.clone())
}

/// First user whose email matches, ignoring ASCII case.
pub async fn by_email<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    email: &str,
) -> Result<Option<User>> {
    Ok(uow
        .users()
        .await?
        .get_first(|u| u.email.eq_ignore_ascii_case(email))
        .cloned())
}

pub async fn by_user_name<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    user_name: &str,
) -> Result<Option<User>> {
    Ok(uow
        .users()
        .await?
        .get_first(|u| u.user_name == user_name)
        .cloned())
}

/// Live users, in storage order.
pub async fn list<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    projections: &Projections,
) -> Result<Vec<UserSummary>> {
    uow.users()
        .await?
        .find(|u| !u.is_deleted)
        .map(|u| projections.user_summary.convert(u))
        .collect()
}

/// Generic filter over live or soft-deleted users.
pub async fn filter<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    request: &UserFilterRequest,
    projections: &Projections,
) -> Result<FilterResult<UserSummary>> {
    let users = uow.users().await?;
    let deleted = request.deleted;
    filter::run(users, &request.filter, &projections.user_summary, |u| {
        u.is_deleted == deleted
    })
}

pub async fn change_language<B: StorageBackend>(
    uow: &mut UnitOfWork<B>,
    id: i64,
    language: Language,
) -> Result<User> {
    let users = uow.users().await?;
    let mut user = users.get(id)?.clone();
    user.language = language;
    users.update(user.clone())?;
    Ok(user)
}

/// Soft delete: the user stays stored but drops out of listings.
pub async fn deactivate<B: StorageBackend>(uow: &mut UnitOfWork<B>, id: i64) -> Result<User> {
    let users = uow.users().await?;
    let mut user = users.get(id)?.clone();
    user.is_deleted = true;
    users.update(user.clone())?;
    info!(id, "Deactivated user");
    Ok(user)
}

/// Hard removal. A missing user is a soft failure.
///
/// Tickets assigned to the user are left unassigned.
pub async fn remove<B: StorageBackend>(uow: &mut UnitOfWork<B>, id: i64) -> Result<RemoveOutcome> {
    let outcome = uow.users().await?.remove(id);
    if !outcome.is_success() {
        return Ok(outcome);
    }

    let tickets = uow.tickets().await?;
    let assigned: Vec<_> = tickets.find(move |t| t.user_id == Some(id)).cloned().collect();
    let unassigned = assigned.len();
    for mut ticket in assigned {
        ticket.user_id = None;
        ticket.is_assigned = false;
        tickets.update(ticket)?;
    }
    info!(id, unassigned, "Removed user");
    Ok(outcome)
}
