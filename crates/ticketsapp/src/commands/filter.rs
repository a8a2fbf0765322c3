//! Generic filter shared by every service.
//!
//! A [`GenericFilterRequest`] is resolved in this order:
//!
//! 1. `property_name` set: filter on that field with `filter_type`
//! 2. otherwise `search_string` non-empty: free-text search
//! 3. otherwise: every record
//!
//! Results keep storage order and are projected through the given mapper.

use serde::{Deserialize, Serialize};

use crate::dto::FilterResult;
use crate::error::Result;
use crate::fields::{Assign, FieldValue, FilterOp};
use crate::mapper::Mapper;
use crate::store::{Entity, Repository};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericFilterRequest {
    pub property_name: Option<String>,
    pub value: Option<serde_json::Value>,
    pub filter_type: FilterOp,
    pub search_string: Option<String>,
}

impl GenericFilterRequest {
    /// Filter on one named field.
    pub fn by_field(
        property_name: impl Into<String>,
        filter_type: FilterOp,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            property_name: Some(property_name.into()),
            value: Some(value.into()),
            filter_type,
            search_string: None,
        }
    }

    /// Free-text search across the filterable fields.
    pub fn by_text(search_string: impl Into<String>) -> Self {
        Self {
            search_string: Some(search_string.into()),
            ..Default::default()
        }
    }

    fn property(&self) -> Option<&str> {
        self.property_name.as_deref().filter(|name| !name.trim().is_empty())
    }

    fn search(&self) -> Option<&str> {
        self.search_string.as_deref().filter(|text| !text.is_empty())
    }
}

/// User filter: a generic filter restricted to live or soft-deleted users.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFilterRequest {
    #[serde(flatten)]
    pub filter: GenericFilterRequest,
    /// `true` selects soft-deleted users instead of live ones
    pub deleted: bool,
}

/// Apply `request` to `repo`, keep records accepted by `keep`, and project.
pub fn run<E: Entity, T: Assign>(
    repo: &Repository<E>,
    request: &GenericFilterRequest,
    mapper: &Mapper<E, T>,
    keep: impl Fn(&E) -> bool,
) -> Result<FilterResult<T>> {
    let matches: Vec<&E> = if let Some(name) = request.property() {
        let value = request.value.clone().map_or(FieldValue::Null, FieldValue::from);
        repo.get_filtered(name, value, request.filter_type)?.collect()
    } else if let Some(text) = request.search() {
        repo.get_filtered_text(text).items
    } else {
        repo.get_all().collect()
    };

    let mut items = Vec::new();
    for entity in matches.into_iter().filter(|&e| keep(e)) {
        items.push(mapper.convert(entity)?);
    }
    Ok(FilterResult::of::<E>(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::UserSummary;
    use crate::error::TicketsError;
    use crate::model::User;

    fn users() -> Repository<User> {
        let mut repo = Repository::new();
        repo.add(User::new("ann", "Ann Lee", "ann@example.com")).unwrap();
        repo.add(User::new("bob", "Bob Stone", "bob@corp.example")).unwrap();
        let mut gone = User::new("cat", "Cat Annis", "cat@example.com");
        gone.is_deleted = true;
        repo.add(gone).unwrap();
        repo
    }

    fn names(result: &FilterResult<UserSummary>) -> Vec<&str> {
        result.items.iter().map(|u| u.user_name.as_str()).collect()
    }

    fn mapper() -> Mapper<User, UserSummary> {
        Mapper::strict().unwrap()
    }

    #[test]
    fn empty_request_returns_everything() {
        let result = run(&users(), &GenericFilterRequest::default(), &mapper(), |_| true).unwrap();
        assert_eq!(names(&result), vec!["ann", "bob", "cat"]);
        assert_eq!(result.filterable_fields, vec!["user_name", "full_name", "email"]);
    }

    #[test]
    fn named_field_defaults_to_contains() {
        let request: GenericFilterRequest =
            serde_json::from_str(r#"{"property_name": "email", "value": "EXAMPLE.COM"}"#).unwrap();
        assert_eq!(request.filter_type, FilterOp::Contains);
        let result = run(&users(), &request, &mapper(), |_| true).unwrap();
        assert_eq!(names(&result), vec!["ann", "cat"]);
    }

    #[test]
    fn named_field_equals() {
        let request = GenericFilterRequest::by_field("user_name", FilterOp::Equals, "bob");
        let result = run(&users(), &request, &mapper(), |_| true).unwrap();
        assert_eq!(names(&result), vec!["bob"]);
    }

    #[test]
    fn property_wins_over_search_string() {
        let mut request = GenericFilterRequest::by_field("user_name", FilterOp::Equals, "bob");
        request.search_string = Some("ann".into());
        let result = run(&users(), &request, &mapper(), |_| true).unwrap();
        assert_eq!(names(&result), vec!["bob"]);
    }

    #[test]
    fn search_string_spans_fields() {
        let request = GenericFilterRequest::by_text("ann");
        let result = run(&users(), &request, &mapper(), |_| true).unwrap();
        // "ann" user name, "Cat Annis" full name
        assert_eq!(names(&result), vec!["ann", "cat"]);
    }

    #[test]
    fn keep_applies_after_matching() {
        let request = UserFilterRequest {
            filter: GenericFilterRequest::by_text("ann"),
            deleted: false,
        };
        let result = run(&users(), &request.filter, &mapper(), |u| {
            u.is_deleted == request.deleted
        })
        .unwrap();
        assert_eq!(names(&result), vec!["ann"]);
        assert_eq!(result.count, 1);
    }

    #[test]
    fn unknown_property_is_rejected() {
        let request = GenericFilterRequest::by_field("password", FilterOp::Equals, "x");
        assert!(matches!(
            run(&users(), &request, &mapper(), |_| true),
            Err(TicketsError::UnknownField { .. })
        ));
    }

    #[test]
    fn user_request_flattens_generic_fields() {
        let request: UserFilterRequest =
            serde_json::from_str(r#"{"search_string": "bob", "deleted": true}"#).unwrap();
        assert!(request.deleted);
        assert_eq!(request.filter.search_string.as_deref(), Some("bob"));
    }
}
