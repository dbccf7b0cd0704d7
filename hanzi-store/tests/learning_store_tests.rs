use hanzi_crypto::{CryptoConfig, Keyring, encrypt_record, hash_pin};
use hanzi_store::{LearningStore, StoreConfig, StoreError};
use hanzi_types::{
    LearningData, LearningStatistics, MistakeEntry, MistakeKind, MistakeLog, PracticeCounter,
    PracticeKind, PracticeLog,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PIN: &str = "12345678";
const USER: &str = "user-1";

fn setup(server: &MockServer) -> LearningStore {
    let keyring = Keyring::new(CryptoConfig {
        default_key: Some("test-default-key".into()),
        production: false,
    })
    .unwrap();
    let config = StoreConfig {
        api_base_url: server.uri(),
        anon_key: "anon-key".into(),
    };
    LearningStore::new(config, Arc::new(keyring))
}

fn sample_data() -> LearningData {
    let mut data = LearningData::initial(chrono::Utc::now());
    data.pinyin_practice.insert(
        "你".into(),
        PracticeCounter {
            attempts: 3,
            correct: 2,
            last_attempt: "2026-08-01T00:00:00Z".into(),
        },
    );
    data.mistakes_sound.insert(
        "好".into(),
        MistakeEntry {
            count: 1,
            pinyin: "hǎo".into(),
            last_wrong: "2026-08-01T00:00:00Z".into(),
        },
    );
    data.statistics.record(true, chrono::Utc::now());
    data
}

fn encrypted_row(data: &LearningData, pin: &str) -> Value {
    json!({
        "pinyin_practice": encrypt_record(&data.pinyin_practice, pin).unwrap(),
        "dictation_practice": encrypt_record(&data.dictation_practice, pin).unwrap(),
        "sound_game": encrypt_record(&data.sound_game, pin).unwrap(),
        "mistakes_dictation": encrypt_record(&data.mistakes_dictation, pin).unwrap(),
        "mistakes_sound": encrypt_record(&data.mistakes_sound, pin).unwrap(),
        "statistics": encrypt_record(&data.statistics, pin).unwrap(),
    })
}

async fn patch_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    let patch = requests
        .iter()
        .find(|r| r.method.as_str() == "PATCH")
        .expect("no PATCH request recorded");
    serde_json::from_slice(&patch.body).unwrap()
}

#[tokio::test]
async fn load_round_trips_with_correct_pin() {
    let server = MockServer::start().await;
    let data = sample_data();

    Mock::given(method("GET"))
        .and(path("/rest/v1/learning_data"))
        .and(query_param("user_id", format!("eq.{USER}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([encrypted_row(&data, PIN)])))
        .mount(&server)
        .await;

    let store = setup(&server);
    let loaded = store.load(USER, PIN).await.unwrap();
    assert_eq!(loaded, data);
}

#[tokio::test]
async fn load_with_wrong_pin_reads_as_empty() {
    let server = MockServer::start().await;
    let data = sample_data();

    Mock::given(method("GET"))
        .and(path("/rest/v1/learning_data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([encrypted_row(&data, PIN)])))
        .mount(&server)
        .await;

    let store = setup(&server);
    let loaded = store.load(USER, "00000000").await.unwrap();

    assert!(loaded.pinyin_practice.is_empty());
    assert!(loaded.mistakes_sound.is_empty());
    // Statistics fall back to a fresh starting record
    assert_eq!(loaded.statistics.total_practice, 0);
}

#[tokio::test]
async fn load_substitutes_defaults_for_null_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/learning_data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "pinyin_practice": null,
            "dictation_practice": null,
            "sound_game": null,
            "mistakes_dictation": null,
            "mistakes_sound": null,
            "statistics": null,
        }])))
        .mount(&server)
        .await;

    let store = setup(&server);
    let loaded = store.load(USER, PIN).await.unwrap();

    assert!(loaded.pinyin_practice.is_empty());
    assert!(loaded.dictation_practice.is_empty());
    assert!(loaded.sound_game.is_empty());
    assert_eq!(loaded.statistics.total_practice, 0);
}

#[tokio::test]
async fn load_missing_row_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/learning_data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = setup(&server);
    let result = store.load(USER, PIN).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn save_sends_envelopes_not_plaintext() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/learning_data"))
        .and(query_param("user_id", format!("eq.{USER}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = setup(&server);
    let data = sample_data();
    store.save(USER, PIN, &data).await.unwrap();

    let body = patch_body(&server).await;
    let raw = body.to_string();
    assert!(!raw.contains("你"), "plaintext leaked into the row");
    assert!(!raw.contains("hǎo"), "plaintext leaked into the row");

    // Each column decrypts back to the original field under the PIN
    let envelope = body["pinyin_practice"].as_str().unwrap();
    let log: hanzi_types::PracticeLog = hanzi_crypto::decrypt_record(envelope, PIN).unwrap();
    assert_eq!(log, data.pinyin_practice);

    let envelope = body["statistics"].as_str().unwrap();
    let stats: LearningStatistics = hanzi_crypto::decrypt_record(envelope, PIN).unwrap();
    assert_eq!(stats, data.statistics);
}

#[tokio::test]
async fn record_practice_bumps_existing_counter() {
    let server = MockServer::start().await;

    let mut existing = PracticeLog::new();
    existing.insert(
        "你".into(),
        PracticeCounter {
            attempts: 3,
            correct: 2,
            last_attempt: "2026-08-01T00:00:00Z".into(),
        },
    );

    Mock::given(method("GET"))
        .and(path("/rest/v1/learning_data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "pinyin_practice": encrypt_record(&existing, PIN).unwrap(),
        }])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/learning_data"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = setup(&server);
    store
        .record_practice(USER, PIN, PracticeKind::Pinyin, "你", true)
        .await
        .unwrap();

    let body = patch_body(&server).await;
    let envelope = body["pinyin_practice"].as_str().unwrap();
    let log: PracticeLog = hanzi_crypto::decrypt_record(envelope, PIN).unwrap();
    assert_eq!(log["你"].attempts, 4);
    assert_eq!(log["你"].correct, 3);
}

#[tokio::test]
async fn record_practice_starts_fresh_counter_for_new_character() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/learning_data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "sound_game": null }])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/learning_data"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let store = setup(&server);
    store
        .record_practice(USER, PIN, PracticeKind::Sound, "好", false)
        .await
        .unwrap();

    let body = patch_body(&server).await;
    let envelope = body["sound_game"].as_str().unwrap();
    let log: PracticeLog = hanzi_crypto::decrypt_record(envelope, PIN).unwrap();
    assert_eq!(log["好"].attempts, 1);
    assert_eq!(log["好"].correct, 0);
}

#[tokio::test]
async fn record_mistake_bumps_existing_count() {
    let server = MockServer::start().await;

    let mut existing = MistakeLog::new();
    existing.insert(
        "汉".into(),
        MistakeEntry {
            count: 1,
            pinyin: "hàn".into(),
            last_wrong: "2026-08-01T00:00:00Z".into(),
        },
    );

    Mock::given(method("GET"))
        .and(path("/rest/v1/learning_data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "mistakes_dictation": encrypt_record(&existing, PIN).unwrap(),
        }])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/learning_data"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = setup(&server);
    store
        .record_mistake(USER, PIN, MistakeKind::Dictation, "汉", "hàn")
        .await
        .unwrap();

    let body = patch_body(&server).await;
    let envelope = body["mistakes_dictation"].as_str().unwrap();
    let log: MistakeLog = hanzi_crypto::decrypt_record(envelope, PIN).unwrap();
    assert_eq!(log["汉"].count, 2);
    assert_eq!(log["汉"].pinyin, "hàn");
}

#[tokio::test]
async fn record_mistake_starts_fresh_log_when_column_unreadable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/learning_data"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "mistakes_sound": null }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/learning_data"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let store = setup(&server);
    store
        .record_mistake(USER, PIN, MistakeKind::Sound, "好", "hǎo")
        .await
        .unwrap();

    let body = patch_body(&server).await;
    let envelope = body["mistakes_sound"].as_str().unwrap();
    let log: MistakeLog = hanzi_crypto::decrypt_record(envelope, PIN).unwrap();
    assert_eq!(log["好"].count, 1);
}

#[tokio::test]
async fn update_statistics_increments_and_returns() {
    let server = MockServer::start().await;

    let mut stats = LearningStatistics::starting(chrono::Utc::now());
    stats.record(true, chrono::Utc::now());
    stats.record(false, chrono::Utc::now());

    Mock::given(method("GET"))
        .and(path("/rest/v1/learning_data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "statistics": encrypt_record(&stats, PIN).unwrap(),
        }])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/learning_data"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let store = setup(&server);
    let updated = store.update_statistics(USER, PIN, true).await.unwrap();

    assert_eq!(updated.total_practice, 3);
    assert_eq!(updated.correct_count, 2);
    assert_eq!(updated.wrong_count, 1);

    let body = patch_body(&server).await;
    let envelope = body["statistics"].as_str().unwrap();
    let stored: LearningStatistics = hanzi_crypto::decrypt_record(envelope, PIN).unwrap();
    assert_eq!(stored, updated);
}

#[tokio::test]
async fn ensure_user_stores_digest_never_the_pin() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let store = setup(&server);
    store
        .ensure_user(USER, Some("pin_12345678@hanzi-learning.internal"), PIN)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["pin_digest"], json!(hash_pin(PIN)));
    assert!(body.get("pin").is_none());
    assert_eq!(body["id"], json!(USER));
}

#[tokio::test]
async fn upstream_error_surfaces_as_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/learning_data"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = setup(&server);
    let result = store.load(USER, PIN).await;
    assert!(matches!(result, Err(StoreError::Api(_))));
}
