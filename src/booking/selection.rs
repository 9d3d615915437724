//! Property selection.

use crate::api::Property;

/// First property in listing order not owned by `excluded_owner`.
///
/// Guards against a user booking their own listing. Properties without an
/// owner are eligible.
pub fn select_bookable<'a>(properties: &'a [Property], excluded_owner: &str) -> Option<&'a Property> {
    properties
        .iter()
        .find(|p| p.owner_id.as_deref() != Some(excluded_owner))
}
