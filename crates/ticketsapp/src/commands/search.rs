//! Multi-criterion ticket search.
//!
//! Every criterion of a [`TicketFilter`] is evaluated on its own against the
//! tickets repository, producing a set of ticket ids. The result is the
//! intersection of those sets, walked in storage order and projected into
//! [`TicketSummary`]s.
//!
//! An absent criterion imposes no restriction. It would contribute the full
//! ticket set to the intersection, which is the identity, so it is skipped
//! instead of materialized. With every criterion absent the search returns
//! every ticket.
//!
//! The date window is two independent criteria: `timestamp >= start` and
//! `timestamp <= end`.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dto::{FilterResult, TicketSummary};
use crate::error::{Result, TicketsError};
use crate::fields::{FieldValue, FilterOp};
use crate::mapper::Mapper;
use crate::model::{Priority, Status, Ticket};
use crate::store::Repository;

/// Ticket search criteria. `None` means "no restriction".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    /// Assigned user
    pub user_id: Option<i64>,
    /// Inclusive lower bound on the creation timestamp
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the creation timestamp
    pub end: Option<DateTime<Utc>>,
    /// Free text matched against the filterable fields
    pub search_text: Option<String>,
}

impl TicketFilter {
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn between(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// Whether no criterion restricts the result.
    pub fn is_unfiltered(&self) -> bool {
        *self == TicketFilter::default()
    }
}

fn no_ordinal() -> i64 {
    -1
}

/// 0001-01-01T00:00:00Z
const MIN_DATE_SECS: i64 = -62_135_596_800;
/// 9999-12-31T23:59:59Z
const MAX_DATE_SECS: i64 = 253_402_300_799;

/// Earliest date with a four-digit RFC 3339 year.
fn min_date() -> DateTime<Utc> {
    DateTime::from_timestamp(MIN_DATE_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Latest whole second with a four-digit RFC 3339 year.
fn max_date() -> DateTime<Utc> {
    DateTime::from_timestamp(MAX_DATE_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Ticket search request as it arrives over the wire.
///
/// Each criterion carries a sentinel meaning "no restriction": `-1` for the
/// status and priority ordinals, `0` for the user id and an empty search
/// text. For the window, any start at or before 0001-01-01T00:00:00Z and any
/// end at or after 9999-12-31T23:59:59Z is no bound; the defaults are those
/// two instants, so they survive RFC 3339 serialization. Convert the request
/// into a [`TicketFilter`] with `TryFrom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketFilterRequest {
    pub status: i64,
    pub priority: i64,
    pub user_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub search_text: String,
}

impl Default for TicketFilterRequest {
    fn default() -> Self {
        Self {
            status: no_ordinal(),
            priority: no_ordinal(),
            user_id: 0,
            start: min_date(),
            end: max_date(),
            search_text: String::new(),
        }
    }
}

impl TryFrom<TicketFilterRequest> for TicketFilter {
    type Error = TicketsError;

    fn try_from(request: TicketFilterRequest) -> Result<Self> {
        let invalid = |field: &str, value: i64| TicketsError::InvalidFilterValue {
            record: "ticket",
            field: field.to_string(),
            value: value.to_string(),
        };

        let status = match request.status {
            -1 => None,
            ordinal => Some(Status::from_ordinal(ordinal).map_err(|_| invalid("status", ordinal))?),
        };
        let priority = match request.priority {
            -1 => None,
            ordinal => {
                Some(Priority::from_ordinal(ordinal).map_err(|_| invalid("priority", ordinal))?)
            }
        };

        Ok(TicketFilter {
            status,
            priority,
            user_id: (request.user_id != 0).then_some(request.user_id),
            start: (request.start > min_date()).then_some(request.start),
            end: (request.end < max_date()).then_some(request.end),
            search_text: (!request.search_text.is_empty()).then_some(request.search_text),
        })
    }
}

/// Run the search over `tickets`.
pub fn run(
    tickets: &Repository<Ticket>,
    filter: &TicketFilter,
    mapper: &Mapper<Ticket, TicketSummary>,
) -> Result<FilterResult<TicketSummary>> {
    let mut candidates: Vec<(&'static str, BTreeSet<i64>)> = Vec::new();

    if let Some(status) = filter.status {
        let value = FieldValue::Enum(status.as_str().to_string());
        let ids = tickets
            .get_filtered("status", value, FilterOp::Equals)?
            .map(|t| t.id)
            .collect();
        candidates.push(("status", ids));
    }

    if let Some(priority) = filter.priority {
        let value = FieldValue::Enum(priority.as_str().to_string());
        let ids = tickets
            .get_filtered("priority", value, FilterOp::Equals)?
            .map(|t| t.id)
            .collect();
        candidates.push(("priority", ids));
    }

    if let Some(user_id) = filter.user_id {
        let ids = tickets
            .find(move |t| t.user_id == Some(user_id))
            .map(|t| t.id)
            .collect();
        candidates.push(("user_id", ids));
    }

    if let Some(end) = filter.end {
        let ids = tickets
            .find(move |t| t.timestamp <= end)
            .map(|t| t.id)
            .collect();
        candidates.push(("end", ids));
    }

    if let Some(start) = filter.start {
        let ids = tickets
            .find(move |t| t.timestamp >= start)
            .map(|t| t.id)
            .collect();
        candidates.push(("start", ids));
    }

    if let Some(text) = filter.search_text.as_deref() {
        let ids = tickets
            .get_filtered_text(text)
            .items
            .iter()
            .map(|t| t.id)
            .collect();
        candidates.push(("search_text", ids));
    }

    for (criterion, ids) in &candidates {
        debug!(criterion, matches = ids.len(), "Evaluated search criterion");
    }

    let survivors = intersect(candidates.into_iter().map(|(_, ids)| ids));

    let mut items = Vec::new();
    for ticket in tickets.get_all() {
        let keep = survivors.as_ref().map_or(true, |ids| ids.contains(&ticket.id));
        if keep {
            items.push(mapper.convert(ticket)?);
        }
    }

    debug!(results = items.len(), "Ticket search complete");
    Ok(FilterResult::of::<Ticket>(items))
}

/// Intersection of every set, `None` when there are no sets at all.
fn intersect(sets: impl Iterator<Item = BTreeSet<i64>>) -> Option<BTreeSet<i64>> {
    sets.reduce(|acc, ids| acc.intersection(&ids).copied().collect())
}
