#[cfg(test)]
mod tests {
    use contract::{
        contract_test, ConsumerSession, ContractConfiguration, ContractStore, ContractVerifier,
        FileContractStore, Mismatch, RequestMatcher, ResponseData,
    };
    use furniture_service::ProducerServer;
    use furniture_ui::FurnitureServiceClientBuilder;
    use std::fs;

    const CONSUMER: &str = "furniture-ui-consumer";
    const PROVIDER: &str = "furniture-service-producer";

    fn furniture_types_stub(session: &ConsumerSession, body: &str) {
        session
            .register_stub(
                RequestMatcher::get("/furniture-types"),
                ResponseData::new(200)
                    .with_header("Content-Type", "application/json")
                    .with_body(body),
            )
            .unwrap();
    }

    fn record_contract(directory: &std::path::Path, body: &str) -> Vec<String> {
        let mut configuration = ContractConfiguration::new(CONSUMER, PROVIDER);
        configuration.set_contract_directory(directory);
        let session = ConsumerSession::start(configuration).unwrap();
        furniture_types_stub(&session, body);

        let furniture_types = FurnitureServiceClientBuilder::new()
            .with_base_url(session.base_url().unwrap())
            .build()
            .get_furniture_types()
            .unwrap();
        session.finish().unwrap();

        furniture_types
    }

    fn configure_contract(config: &mut ContractConfiguration) {
        config.set_contract_directory(concat!(env!("CARGO_MANIFEST_DIR"), "/target/contracts"));
    }

    #[contract_test("furniture-ui-consumer", "furniture-service-producer", configure_contract)]
    fn recorded_furniture_types(session: &ConsumerSession) {
        furniture_types_stub(session, r#"["Tables","Chairs"]"#);

        let furniture_types = FurnitureServiceClientBuilder::new()
            .with_base_url(session.base_url().unwrap())
            .build()
            .get_furniture_types()
            .unwrap();

        assert_eq!(furniture_types, vec!["Tables", "Chairs"]);
    }

    #[test]
    fn consumer_contract_is_honoured_by_producer() {
        let dir = tempfile::tempdir().unwrap();
        let furniture_types = record_contract(dir.path(), r#"["Tables","Chairs"]"#);
        assert_eq!(furniture_types, vec!["Tables", "Chairs"]);

        let producer = ProducerServer::start(0).unwrap();
        let report = ContractVerifier::new()
            .verify_from_store(
                &FileContractStore::new(dir.path()),
                CONSUMER,
                PROVIDER,
                &producer.base_url(),
            )
            .unwrap();

        assert_eq!(report.results.len(), 1);
        assert!(report.passed(), "{}", report);
    }

    #[test]
    fn recorded_contract_replays_against_same_fixture() {
        let dir = tempfile::tempdir().unwrap();
        record_contract(dir.path(), r#"["Tables","Chairs"]"#);
        let contract = FileContractStore::new(dir.path())
            .load(CONSUMER, PROVIDER)
            .unwrap();

        let mut configuration = ContractConfiguration::new("replay-consumer", PROVIDER);
        configuration.set_contract_directory(dir.path());
        let replay = ConsumerSession::start(configuration).unwrap();
        furniture_types_stub(&replay, r#"["Tables","Chairs"]"#);

        let report = ContractVerifier::new()
            .verify(&contract, &replay.base_url().unwrap())
            .unwrap();

        assert!(report.results.iter().all(|result| result.mismatches.is_empty()));
    }

    #[test]
    fn shared_contract_matches_consumer_recording() {
        let dir = tempfile::tempdir().unwrap();
        record_contract(dir.path(), r#"["Tables","Chairs"]"#);
        let recorded = FileContractStore::new(dir.path())
            .load(CONSUMER, PROVIDER)
            .unwrap();

        let shared = FileContractStore::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../contracts"))
            .load(CONSUMER, PROVIDER)
            .unwrap();

        assert_eq!(
            shared, recorded,
            "contracts/ is stale, run the furniture-ui tests to record it again"
        );
    }

    #[test]
    fn recording_twice_gives_identical_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = FileContractStore::new(dir.path()).contract_path(CONSUMER, PROVIDER);

        record_contract(dir.path(), r#"["Tables","Chairs"]"#);
        let first = fs::read(&path).unwrap();
        record_contract(dir.path(), r#"["Tables","Chairs"]"#);
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn producer_missing_a_type_breaks_recorded_contract() {
        let dir = tempfile::tempdir().unwrap();
        record_contract(dir.path(), r#"["Tables","Chairs","Sofas"]"#);

        let producer = ProducerServer::start(0).unwrap();
        let report = ContractVerifier::new()
            .verify_from_store(
                &FileContractStore::new(dir.path()),
                CONSUMER,
                PROVIDER,
                &producer.base_url(),
            )
            .unwrap();

        let failure = report.failures().next().unwrap();
        assert_eq!(failure.mismatches.len(), 1);
        assert!(matches!(failure.mismatches[0], Mismatch::Body { .. }));
        assert!(report.into_result().is_err());
    }
}
