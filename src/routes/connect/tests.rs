#[cfg(test)]
mod tests {
    use crate::routes::connect::schemas::currency_from_stripe;
    use crate::schemas::CurrencyType;
    use crate::tests::tests::get_dummy_connect_account;

    #[test]
    fn known_stripe_currencies_are_mapped() {
        assert_eq!(currency_from_stripe("usd"), Some(CurrencyType::Usd));
        assert_eq!(currency_from_stripe("eur"), Some(CurrencyType::Eur));
        assert_eq!(currency_from_stripe("jpy"), None);
    }

    #[test]
    fn account_is_fully_enabled_only_with_both_capabilities() {
        let mut account = get_dummy_connect_account(true, true);
        assert!(account.is_fully_enabled());

        account.payouts_enabled = false;
        assert!(!account.is_fully_enabled());

        account.payouts_enabled = true;
        account.charges_enabled = false;
        assert!(!account.is_fully_enabled());
    }
}
