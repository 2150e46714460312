#[cfg(test)]
mod tests {
    use crate::routes::checkout::errors::CheckoutError;
    use crate::routes::checkout::utils::{validate_product_for_checkout, validate_seller_account};
    use crate::tests::tests::{get_dummy_connect_account, get_dummy_custom_link};

    #[test]
    fn purchasable_link_resolves_its_effective_price() {
        let link = get_dummy_custom_link(Some(1999), None);
        assert_eq!(validate_product_for_checkout(&link).unwrap(), 1999);

        let link = get_dummy_custom_link(Some(1999), Some(1499));
        assert_eq!(validate_product_for_checkout(&link).unwrap(), 1499);
    }

    #[test]
    fn link_without_price_is_rejected() {
        let link = get_dummy_custom_link(None, None);
        let err = validate_product_for_checkout(&link).unwrap_err();
        assert!(matches!(err, CheckoutError::MissingPrice(_)));
    }

    #[test]
    fn link_with_checkout_disabled_is_rejected() {
        let mut link = get_dummy_custom_link(Some(1999), None);
        link.checkout_enabled = false;
        let err = validate_product_for_checkout(&link).unwrap_err();
        assert!(matches!(err, CheckoutError::ValidationError(_)));
    }

    #[test]
    fn seller_without_charges_enabled_is_rejected() {
        let account = get_dummy_connect_account(false, false);
        let err = validate_seller_account(&account).unwrap_err();
        assert!(matches!(err, CheckoutError::SellerNotReady(_)));
    }

    #[test]
    fn deactivated_seller_account_is_rejected() {
        let mut account = get_dummy_connect_account(true, true);
        account.is_active = false;
        let err = validate_seller_account(&account).unwrap_err();
        assert!(matches!(err, CheckoutError::SellerNotReady(_)));
    }

    #[test]
    fn onboarded_seller_passes_validation() {
        let account = get_dummy_connect_account(true, true);
        assert!(validate_seller_account(&account).is_ok());
    }
}
