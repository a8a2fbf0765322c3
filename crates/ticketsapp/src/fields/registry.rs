//! Filterable field registry.
//!
//! For each record type, the ordered list of fields carrying the filterable
//! marker. The list is derived from [`Record::FIELDS`] the first time a type
//! is asked for and cached by `TypeId` for the rest of the process.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use super::{FieldSpec, Record};

type Entry = &'static (dyn Any + Send + Sync);

static REGISTRY: Lazy<RwLock<HashMap<TypeId, Entry>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Filterable fields of `R`, in declaration order.
pub fn filterable_fields<R: Record + 'static>() -> &'static [&'static FieldSpec<R::Field>] {
    let key = TypeId::of::<R>();

    if let Some(fields) = lookup::<R>(key) {
        return fields;
    }

    let mut registry = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    // Another caller may have filled the slot between the two locks.
    let entry = *registry.entry(key).or_insert_with(|| {
        let fields: Vec<&'static FieldSpec<R::Field>> =
            R::FIELDS.iter().filter(|spec| spec.filterable).collect();
        // One allocation per record type, kept for the process lifetime.
        let leaked: Entry = Box::leak(Box::new(fields));
        leaked
    });
    drop(registry);

    entry
        .downcast_ref::<Vec<&'static FieldSpec<R::Field>>>()
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Names of the filterable fields of `R`, in declaration order.
pub fn filterable_names<R: Record + 'static>() -> Vec<&'static str> {
    filterable_fields::<R>().iter().map(|spec| spec.name).collect()
}

fn lookup<R: Record + 'static>(key: TypeId) -> Option<&'static [&'static FieldSpec<R::Field>]> {
    let registry = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
    let entry: Entry = *registry.get(&key)?;
    entry
        .downcast_ref::<Vec<&'static FieldSpec<R::Field>>>()
        .map(Vec::as_slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attachment, Message, Ticket, User};

    #[test]
    fn ticket_filterable_fields_in_declaration_order() {
        assert_eq!(
            filterable_names::<Ticket>(),
            vec!["title", "name", "email", "priority", "status", "is_assigned"]
        );
    }

    #[test]
    fn repeated_calls_return_the_same_slice() {
        let first = filterable_fields::<Ticket>();
        let second = filterable_fields::<Ticket>();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn types_do_not_share_entries() {
        assert_eq!(filterable_names::<Message>(), vec!["author", "content"]);
        assert_eq!(filterable_names::<Attachment>(), vec!["path"]);
        assert_eq!(
            filterable_names::<User>(),
            vec!["user_name", "full_name", "email"]
        );
    }
}
