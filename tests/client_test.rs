use std::time::Duration;

use std::time::Instant;

use kafka_client::{
    Client, ClientType, CommitMode, ConfigError, Consumer, GlobalConfig, KafkaClientError,
    PartitionOffset, Producer, TopicConfig,
};

fn offline_config() -> GlobalConfig {
    let mut conf = GlobalConfig::new();
    assert!(conf.put("bootstrap.servers", "127.0.0.1:1"));
    assert!(conf.put("socket.timeout.ms", "100"));
    conf
}

#[test]
fn producer_gets_a_library_assigned_name() {
    let producer = Producer::new(offline_config()).unwrap();
    assert_eq!(producer.client().client_type(), ClientType::Producer);
    assert!(producer.client().name().starts_with("rdkafka#producer"));
    assert!(!producer.client().native_ptr().is_null());
}

#[test]
fn client_id_is_reflected_in_the_name() {
    let mut conf = offline_config();
    assert!(conf.put("client.id", "ledger"));
    let client = Client::new(ClientType::Producer, conf).unwrap();
    assert!(client.name().starts_with("ledger#producer"));
}

#[test]
fn released_config_cannot_create_a_client() {
    let mut conf = offline_config();
    let _native = conf.release_handle();
    let err = Client::new(ClientType::Producer, conf).unwrap_err();
    assert!(matches!(
        err,
        KafkaClientError::Config(ConfigError::Released {
            kind: "GlobalConfig"
        })
    ));
}

#[test]
fn topic_handles_take_their_config() {
    let producer = Producer::new(offline_config()).unwrap();
    let mut topic_conf = TopicConfig::new();
    assert!(topic_conf.put("message.timeout.ms", "1000"));
    let topic = producer.topic("orders", Some(topic_conf)).unwrap();
    assert_eq!(topic.name(), "orders");

    let plain = producer.topic("audit", None).unwrap();
    assert_eq!(plain.name(), "audit");
}

#[test]
fn topic_name_with_nul_is_an_invalid_argument() {
    let producer = Producer::new(offline_config()).unwrap();
    assert!(matches!(
        producer.topic("bad\0name", None),
        Err(KafkaClientError::InvalidArgument(_))
    ));
}

#[test]
fn produce_is_queued_while_offline() {
    let producer = Producer::new(offline_config()).unwrap();
    let topic = producer.topic("orders", None).unwrap();
    producer.produce(&topic, b"payload", Some(b"key")).unwrap();
    producer.poll(Duration::from_millis(0));
}

#[test]
fn consumer_without_broker_lists_no_members() {
    let mut conf = offline_config();
    assert!(conf.put("group.id", "readers"));
    let consumer = Consumer::new(conf).unwrap();
    assert_eq!(consumer.client().client_type(), ClientType::Consumer);
    assert!(consumer.client().name().starts_with("rdkafka#consumer"));
    // Without a reachable broker the listing either fails or comes back empty.
    if let Ok(groups) = consumer.list_groups(Some("readers"), Duration::from_millis(200)) {
        assert!(groups.iter().all(|g| g.members.is_empty()));
    }
}

#[test]
fn group_name_with_nul_is_an_invalid_argument() {
    let mut conf = offline_config();
    assert!(conf.put("group.id", "readers"));
    let consumer = Consumer::new(conf).unwrap();
    assert!(matches!(
        consumer.list_groups(Some("a\0b"), Duration::from_millis(10)),
        Err(KafkaClientError::InvalidArgument(_))
    ));
}

fn offline_consumer() -> Consumer {
    let mut conf = offline_config();
    assert!(conf.put("group.id", "readers"));
    Consumer::new(conf).unwrap()
}

#[test]
fn producer_flushes_an_empty_queue() {
    let producer = Producer::new(offline_config()).unwrap();
    producer.flush(Duration::from_millis(10)).unwrap();
}

#[test]
fn consumer_lifecycle_without_broker() {
    let consumer = offline_consumer();
    consumer.subscribe(&["a", "b"]).unwrap();
    if let Some(message) = consumer.consume(Duration::from_millis(50)) {
        assert!(message.has_error());
    }
    consumer.close().unwrap();
}

#[test]
fn connection_errors_carry_their_own_text() {
    let consumer = offline_consumer();
    consumer.subscribe(&["orders"]).unwrap();

    // Broker errors arrive on the consumer queue as error messages. The text
    // attached to them is more specific than the generic code description.
    let deadline = Instant::now() + Duration::from_secs(3);
    let mut errors = Vec::new();
    while Instant::now() < deadline {
        if let Some(message) = consumer.consume(Duration::from_millis(100)) {
            if let Some(error) = message.error() {
                errors.push(error);
            }
        }
    }
    for error in &errors {
        assert!(!error.is_empty());
    }
    if !errors.is_empty() {
        assert!(
            errors
                .iter()
                .any(|e| e.contains("127.0.0.1:1") || e.contains("brokers are down")),
            "{errors:?}"
        );
    }
    consumer.close().unwrap();
}

#[test]
fn committed_offsets_without_broker() {
    let consumer = offline_consumer();
    match consumer.committed(&[("orders", 0)], Duration::from_millis(200)) {
        Ok(offsets) => {
            assert_eq!(offsets.len(), 1);
            assert_eq!(offsets[0].topic, "orders");
        }
        Err(err) => assert!(
            matches!(err, KafkaClientError::Kafka { operation: "committed", .. }),
            "{err}"
        ),
    }
}

#[test]
fn async_commit_is_queued_without_broker() {
    let consumer = offline_consumer();
    consumer
        .commit(&[PartitionOffset::new("orders", 0, 42)], CommitMode::Async)
        .unwrap();
}

#[test]
fn commit_rejects_topic_with_nul() {
    let consumer = offline_consumer();
    assert!(matches!(
        consumer.commit(&[PartitionOffset::new("a\0b", 0, 1)], CommitMode::Async),
        Err(KafkaClientError::InvalidArgument(_))
    ));
}
