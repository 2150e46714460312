#[cfg(test)]
mod tests {
    use crate::constants::ORDER_ID_PATTERN;
    use crate::routes::order::schemas::OrderStatusType;
    use crate::utils::generate_order_id;

    #[test]
    fn generated_order_ids_match_the_published_format() {
        for _ in 0..50 {
            let order_id = generate_order_id();
            assert!(
                ORDER_ID_PATTERN.is_match(&order_id),
                "unexpected order id: {}",
                order_id
            );
        }
    }

    #[test]
    fn pending_order_can_complete_or_cancel() {
        assert!(OrderStatusType::Pending.can_transition_to(&OrderStatusType::Completed));
        assert!(OrderStatusType::Pending.can_transition_to(&OrderStatusType::Cancelled));
    }

    #[test]
    fn completed_order_never_reverts_to_pending() {
        assert!(!OrderStatusType::Completed.can_transition_to(&OrderStatusType::Pending));
        assert!(!OrderStatusType::Completed.can_transition_to(&OrderStatusType::Completed));
        assert!(OrderStatusType::Completed.can_transition_to(&OrderStatusType::Cancelled));
    }

    #[test]
    fn cancelled_order_is_terminal() {
        assert!(!OrderStatusType::Cancelled.can_transition_to(&OrderStatusType::Pending));
        assert!(!OrderStatusType::Cancelled.can_transition_to(&OrderStatusType::Completed));
        assert!(!OrderStatusType::Cancelled.can_transition_to(&OrderStatusType::Cancelled));
    }
}
