use contract::{
    ContractStore, ContractVerifier, Error, FileContractStore, Mismatch, RequestMatcher, ResponseData,
    StubServer,
};
use furniture_service::ProducerServer;

const CONSUMER: &str = "furniture-ui-consumer";
const PROVIDER: &str = "furniture-service-producer";

/// The workspace contract directory the furniture UI's consumer tests record into.
fn contract_store() -> FileContractStore {
    FileContractStore::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../contracts"))
}

fn stubbed_provider(body: &str) -> StubServer {
    let mut server = StubServer::new();
    server
        .register_stub(
            RequestMatcher::get("/furniture-types"),
            ResponseData::new(200)
                .with_header("Content-Type", "application/json")
                .with_body(body),
        )
        .unwrap();
    server.start(0).unwrap();
    server
}

#[test]
fn test_furniture_service_honours_ui_contract() {
    let server = ProducerServer::start(0).unwrap();

    let report = ContractVerifier::new()
        .verify_from_store(&contract_store(), CONSUMER, PROVIDER, &server.base_url())
        .unwrap();

    assert_eq!(report.results.len(), 1);
    assert!(report.passed(), "{}", report);
}

#[test]
fn test_stubbed_provider_honours_ui_contract() {
    let server = stubbed_provider(r#"["Tables","Chairs"]"#);

    let report = ContractVerifier::new()
        .verify_from_store(
            &contract_store(),
            CONSUMER,
            PROVIDER,
            &server.base_url().unwrap(),
        )
        .unwrap();

    assert!(report.into_result().is_ok());
}

#[test]
fn test_provider_dropping_a_type_breaks_contract() {
    let server = stubbed_provider(r#"["Tables"]"#);
    let contract = contract_store().load(CONSUMER, PROVIDER).unwrap();

    let report = ContractVerifier::new()
        .verify(&contract, &server.base_url().unwrap())
        .unwrap();

    assert_eq!(report.failures().count(), 1);
    assert_eq!(
        report.results[0].mismatches,
        vec![Mismatch::Body {
            expected: String::from(r#"["Tables","Chairs"]"#),
            actual: Some(String::from(r#"["Tables"]"#)),
        }]
    );
}

#[test]
fn test_unknown_consumer_has_no_contract() {
    let server = ProducerServer::start(0).unwrap();

    let result = ContractVerifier::new().verify_from_store(
        &contract_store(),
        "furniture-mobile-consumer",
        PROVIDER,
        &server.base_url(),
    );

    assert!(matches!(result, Err(Error::ContractNotFound { .. })));
}
