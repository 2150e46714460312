#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use quickcheck_macros::quickcheck;
    use std::str::FromStr;

    use crate::routes::payment::schemas::PaymentStatusType;
    use crate::routes::payment::utils::{
        calculate_fee_split, calculate_refund_fee_share, validate_refund_amount,
    };
    use crate::tests::tests::get_dummy_payment_transaction;

    #[quickcheck]
    fn fee_split_sums_exactly_to_gross(gross: u32, fee_basis_points: u16) -> bool {
        let gross = i64::from(gross) % 10_000_001;
        let fee_percentage =
            BigDecimal::from(i64::from(fee_basis_points) % 10_001) / BigDecimal::from(100);
        let split = calculate_fee_split(gross, &fee_percentage).unwrap();
        split.platform_fee + split.seller_amount == gross
            && split.platform_fee >= 0
            && split.platform_fee <= gross
    }

    #[test]
    fn four_percent_of_nineteen_ninety_nine() {
        let fee_percentage = BigDecimal::from_str("4.00").unwrap();
        let split = calculate_fee_split(1999, &fee_percentage).unwrap();
        assert_eq!(split.platform_fee, 80);
        assert_eq!(split.seller_amount, 1919);
    }

    #[test]
    fn fee_is_rounded_half_up() {
        // 2.5% of 101 cents is 2.525, which rounds up to 3.
        let fee_percentage = BigDecimal::from_str("2.50").unwrap();
        let split = calculate_fee_split(101, &fee_percentage).unwrap();
        assert_eq!(split.platform_fee, 3);
        assert_eq!(split.seller_amount, 98);
    }

    #[test]
    fn zero_gross_amount_splits_to_zero() {
        let fee_percentage = BigDecimal::from_str("4.00").unwrap();
        let split = calculate_fee_split(0, &fee_percentage).unwrap();
        assert_eq!(split.platform_fee, 0);
        assert_eq!(split.seller_amount, 0);
    }

    #[test]
    fn hundred_percent_fee_gives_everything_to_the_platform() {
        let fee_percentage = BigDecimal::from_str("100.00").unwrap();
        let split = calculate_fee_split(1999, &fee_percentage).unwrap();
        assert_eq!(split.platform_fee, 1999);
        assert_eq!(split.seller_amount, 0);
    }

    #[test]
    fn out_of_range_inputs_are_rejected() {
        let fee_percentage = BigDecimal::from_str("4.00").unwrap();
        assert!(calculate_fee_split(-1, &fee_percentage).is_err());
        let fee_percentage = BigDecimal::from_str("100.01").unwrap();
        assert!(calculate_fee_split(1999, &fee_percentage).is_err());
        let fee_percentage = BigDecimal::from_str("-0.01").unwrap();
        assert!(calculate_fee_split(1999, &fee_percentage).is_err());
    }

    #[test]
    fn partial_refund_fee_share_is_proportional() {
        // 500 of 1999 refunded against a fee of 80: 500/1999 * 80 = 20.01 -> 20.
        assert_eq!(calculate_refund_fee_share(80, 500, 1999), 20);
    }

    #[test]
    fn full_refund_returns_the_entire_fee() {
        assert_eq!(calculate_refund_fee_share(80, 1999, 1999), 80);
    }

    #[test]
    fn refund_fee_share_of_zero_total_is_zero() {
        assert_eq!(calculate_refund_fee_share(80, 0, 0), 0);
    }

    #[test]
    fn refund_defaults_to_the_remaining_balance() {
        let transaction =
            get_dummy_payment_transaction(PaymentStatusType::Succeeded, 1999, 0, 80, 0);
        assert_eq!(validate_refund_amount(&transaction, None).unwrap(), 1999);

        let transaction =
            get_dummy_payment_transaction(PaymentStatusType::PartiallyRefunded, 1999, 500, 80, 20);
        assert_eq!(validate_refund_amount(&transaction, None).unwrap(), 1499);
    }

    #[test]
    fn refund_beyond_remaining_balance_is_rejected() {
        let transaction =
            get_dummy_payment_transaction(PaymentStatusType::PartiallyRefunded, 1999, 500, 80, 20);
        assert!(validate_refund_amount(&transaction, Some(1500)).is_err());
        assert!(validate_refund_amount(&transaction, Some(1499)).is_ok());
    }

    #[test]
    fn refund_of_unsettled_payment_is_rejected() {
        let transaction = get_dummy_payment_transaction(PaymentStatusType::Pending, 1999, 0, 80, 0);
        assert!(validate_refund_amount(&transaction, Some(100)).is_err());

        let transaction =
            get_dummy_payment_transaction(PaymentStatusType::Refunded, 1999, 1999, 80, 80);
        assert!(validate_refund_amount(&transaction, Some(1)).is_err());
    }

    #[test]
    fn non_positive_refund_amounts_are_rejected() {
        let transaction =
            get_dummy_payment_transaction(PaymentStatusType::Succeeded, 1999, 0, 80, 0);
        assert!(validate_refund_amount(&transaction, Some(0)).is_err());
        assert!(validate_refund_amount(&transaction, Some(-5)).is_err());
    }

    #[test]
    fn settled_payment_only_moves_towards_refund_states() {
        assert!(PaymentStatusType::Pending.can_transition_to(&PaymentStatusType::Succeeded));
        assert!(PaymentStatusType::Pending.can_transition_to(&PaymentStatusType::Failed));
        assert!(
            PaymentStatusType::Succeeded.can_transition_to(&PaymentStatusType::PartiallyRefunded)
        );
        assert!(PaymentStatusType::Succeeded.can_transition_to(&PaymentStatusType::Refunded));
        assert!(!PaymentStatusType::Succeeded.can_transition_to(&PaymentStatusType::Pending));
        assert!(!PaymentStatusType::Refunded.can_transition_to(&PaymentStatusType::Succeeded));
        assert!(!PaymentStatusType::Failed.can_transition_to(&PaymentStatusType::Succeeded));
    }
}
