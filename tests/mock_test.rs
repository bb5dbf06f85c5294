use paylink::domain::payment::PaymentRequest;
use paylink::domain::ports::{ClientHandler, PaymentLinkGenerator};
use paylink::testing::{
    sample_generation_result, sample_merchant, sample_payment, sample_request,
    MockClientHandler, MockPaymentGenerator,
};
use std::sync::Arc;

#[test]
fn test_handler_mock_records_calls_in_order() {
    let mock = MockClientHandler::new();
    let payment = sample_payment();

    mock.handle_payment_created(&payment).unwrap();
    mock.handle_payment_created(&payment).unwrap();
    mock.handle_payment_success(&payment).unwrap();

    // No deduplication: both created calls are kept, in order.
    assert_eq!(mock.payment_created_calls().len(), 2);
    assert_eq!(mock.payment_success_calls().len(), 1);
    assert_eq!(mock.call_counts()["handle_payment_created"], 2);
}

#[test]
fn test_handler_mock_records_request_arguments() {
    let mock = MockClientHandler::new();
    let first = sample_request();
    let second = PaymentRequest {
        amount: 2500,
        ..sample_request()
    };

    mock.validate_request(&first).unwrap();
    mock.validate_request(&second).unwrap();

    let calls = mock.validate_request_calls();
    assert_eq!(calls[0].amount, 1000);
    assert_eq!(calls[1].amount, 2500);
}

#[test]
fn test_handler_mock_configured_error() {
    let mock = MockClientHandler::new();
    mock.set_validate_request_error("canned rejection");

    let err = mock.validate_request(&sample_request()).unwrap_err();
    assert!(err.to_string().contains("canned rejection"));

    // Held until reset: a second call still fails.
    assert!(mock.validate_request(&sample_request()).is_err());

    mock.reset();
    assert!(mock.validate_request(&sample_request()).is_ok());
}

#[test]
fn test_handler_mock_reset_keeps_generator() {
    let mock = MockClientHandler::new();
    mock.set_merchant(Arc::new(sample_merchant()));
    mock.set_payment_link_generator(Arc::new(MockPaymentGenerator::new()));
    mock.handle_payment_created(&sample_payment()).unwrap();

    mock.reset();

    assert_eq!(mock.payment_created_calls().len(), 0);
    // The generator reference survives a reset.
    assert!(mock.payment_link_generator().is_some());
}

#[test]
fn test_handler_mock_without_merchant_returns_empty_identity() {
    let mock = MockClientHandler::new();
    assert!(mock.merchant_config().is_none());
    assert_eq!(mock.merchant_id(), "");
    assert_eq!(mock.merchant_name(), "");
}

#[test]
fn test_generator_mock_echoes_request_without_canned_result() {
    let mock = MockPaymentGenerator::new();
    let req = sample_request();

    let result = mock.generate_payment_data(&req).unwrap();
    assert_eq!(result.amount, req.amount);
    assert_eq!(result.return_url, req.return_url);
}

#[test]
fn test_generator_mock_canned_result_and_error() {
    let mock = MockPaymentGenerator::new();
    mock.set_generate_result(sample_generation_result());

    let result = mock.generate_payment_data(&sample_request()).unwrap();
    assert_eq!(result.order_id, "order_1700000000_1000");

    mock.set_generate_error("gateway down");
    assert!(mock.generate_payment_data(&sample_request()).is_err());
}

#[test]
fn test_generator_mock_reset_clears_errors_keeps_canned_outputs() {
    let mock = MockPaymentGenerator::new();
    mock.set_generate_result(sample_generation_result());
    mock.set_generate_error("boom");
    mock.set_validate_price_error("boom");
    mock.generate_payment_data(&sample_request()).unwrap_err();
    let _ = mock.payment_settings();

    mock.reset();

    assert_eq!(mock.call_counts()["generate_payment_data"], 0);
    assert_eq!(mock.call_counts()["payment_settings"], 0);
    assert!(mock.validate_price_from_backend(&sample_request()).is_ok());

    // Non-error canned outputs remain until explicitly overwritten.
    let result = mock.generate_payment_data(&sample_request()).unwrap();
    assert_eq!(result.order_id, "order_1700000000_1000");
    assert_eq!(mock.payment_settings().currency, "RUB");
}

#[test]
fn test_generator_mock_records_payload_snapshots() {
    let mock = MockPaymentGenerator::new();
    let mut payload = serde_json::Map::new();
    payload.insert("order".to_string(), serde_json::Value::String("a".into()));

    mock.customize_gateway_payload(&mut payload).unwrap();
    payload.insert("order".to_string(), serde_json::Value::String("b".into()));
    mock.customize_gateway_payload(&mut payload).unwrap();

    let calls = mock.customize_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0]["order"], "a");
    assert_eq!(calls[1]["order"], "b");
}

#[test]
fn test_mock_instances_do_not_share_state() {
    let first = MockClientHandler::new();
    let second = MockClientHandler::new();

    first.handle_payment_created(&sample_payment()).unwrap();
    assert_eq!(second.payment_created_calls().len(), 0);
}
