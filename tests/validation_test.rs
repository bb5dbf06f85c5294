use paylink::domain::payment::{display_amount, validate_payment_request, PaymentRequest};
use paylink::testing::sample_request;
use rand::Rng;

#[test]
fn test_any_positive_amount_is_accepted() {
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        let req = PaymentRequest {
            amount: rng.gen_range(1..=i64::MAX),
            ..sample_request()
        };
        assert!(validate_payment_request(&req).is_ok(), "amount {}", req.amount);
    }
}

#[test]
fn test_any_non_positive_amount_is_rejected_with_value() {
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        let amount = rng.gen_range(i64::MIN..=0);
        let req = PaymentRequest {
            amount,
            ..sample_request()
        };
        let err = validate_payment_request(&req).unwrap_err();
        assert!(err.to_string().contains(&amount.to_string()));
    }
}

#[test]
fn test_display_amount_matches_integer_division() {
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        let v: i64 = rng.gen_range(0..10_000_000);
        let displayed = display_amount(v);
        let expected = format!("{}.{:02}", v / 100, v % 100);
        assert_eq!(displayed, expected, "minor units {v}");
    }
}
