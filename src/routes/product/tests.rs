#[cfg(test)]
mod tests {
    use crate::tests::tests::get_dummy_custom_link;

    #[test]
    fn effective_price_uses_base_price_without_discount() {
        let link = get_dummy_custom_link(Some(1999), None);
        assert_eq!(link.effective_price(), Some(1999));
    }

    #[test]
    fn effective_price_prefers_lower_discounted_price() {
        let link = get_dummy_custom_link(Some(1999), Some(1499));
        assert_eq!(link.effective_price(), Some(1499));
    }

    #[test]
    fn effective_price_ignores_discount_above_base_price() {
        let link = get_dummy_custom_link(Some(1999), Some(2499));
        assert_eq!(link.effective_price(), Some(1999));
    }

    #[test]
    fn effective_price_is_none_without_base_price() {
        let link = get_dummy_custom_link(None, Some(1499));
        assert_eq!(link.effective_price(), None);
    }
}
