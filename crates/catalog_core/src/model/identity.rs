//! Identity-based equality shared by all catalog entities.
//!
//! Two entities are equal when both carry an assigned id and the ids match.
//! If either side is not persisted yet, only the very same instance compares
//! equal, so two fresh values with identical attributes are never equal.
//! `Hash` implementations hash the optional id, which keeps `Hash` consistent
//! with this equality.

/// Row identifier assigned by the store.
pub type EntityId = i64;

/// Compares two entities of the same type by assigned identifier, falling
/// back to instance identity while either identifier is unset.
pub fn same_identity<T>(
    left: &T,
    left_id: Option<EntityId>,
    right: &T,
    right_id: Option<EntityId>,
) -> bool {
    match (left_id, right_id) {
        (Some(left_id), Some(right_id)) => left_id == right_id,
        _ => std::ptr::eq(left, right),
    }
}

#[cfg(test)]
mod tests {
    use super::same_identity;

    #[test]
    fn assigned_ids_decide_equality() {
        let left = "a".to_string();
        let right = "b".to_string();
        assert!(same_identity(&left, Some(4), &right, Some(4)));
        assert!(!same_identity(&left, Some(4), &right, Some(5)));
    }

    #[test]
    fn unassigned_ids_fall_back_to_instance_identity() {
        let left = "same".to_string();
        let right = "same".to_string();
        assert!(same_identity(&left, None, &left, None));
        assert!(!same_identity(&left, None, &right, None));
        assert!(!same_identity(&left, Some(1), &right, None));
    }
}
