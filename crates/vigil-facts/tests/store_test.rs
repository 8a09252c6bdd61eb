//! FactsStore: fact writes, answer commits, expiry-aware views, snapshots.

use chrono::{DateTime, Duration, TimeZone, Utc};
use vigil_core::config::FactsConfig;
use vigil_core::errors::{FactsError, VigilErrorCode};
use vigil_core::facts::{FactMeta, FactSource, FactValue};
use vigil_core::{Question, QuestionOption};
use vigil_facts::{derive_answer, FactsStore};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

fn wifi_question() -> Question {
    let mut q = Question::new("wifi_encryption")
        .with_option(QuestionOption::new("wpa3", 10).with_fact("wifi_secure", true))
        .with_option(
            QuestionOption::new("none", 0)
                .with_fact("wifi_secure", false)
                .with_fact("wifi_risk", "high"),
        );
    q.domain = Some("network".to_string());
    q
}

#[test]
fn inject_fact_is_last_write_wins() {
    let mut store = FactsStore::new();
    store
        .inject_fact("os_detected", "windows".into(), FactMeta::auto_detected(0.6), now())
        .unwrap();
    store
        .inject_fact("os_detected", "macos".into(), FactMeta::new(FactSource::Manual), now())
        .unwrap();

    let fact = store.get_fact("os_detected").unwrap();
    assert_eq!(fact.value, FactValue::from("macos"));
    assert_eq!(fact.source, FactSource::Manual);
    assert_eq!(store.get_facts().len(), 1);
    assert!(store.has_fact_value("os_detected", &"macos".into()));
    assert!(!store.has_fact_value("os_detected", &"windows".into()));
}

#[test]
fn inject_fact_rejects_empty_key_and_nan() {
    let mut store = FactsStore::new();
    let err = store
        .inject_fact("  ", true.into(), FactMeta::default(), now())
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_FACT");

    let err = store
        .inject_fact("score", FactValue::Num(f64::NAN), FactMeta::default(), now())
        .unwrap_err();
    assert!(matches!(err, FactsError::InvalidFact { .. }));
    assert!(store.get_facts().is_empty());
}

#[test]
fn fact_expiry_boundary_is_strict() {
    let mut store = FactsStore::new();
    let deadline = now() + Duration::hours(1);
    store
        .inject_fact("on_vpn", true.into(), FactMeta::default().with_expiry(deadline), now())
        .unwrap();

    assert!(store.is_fact_active("on_vpn", deadline));
    assert!(store.context_at(deadline).contains("on_vpn"));

    let later = deadline + Duration::seconds(1);
    assert!(!store.is_fact_active("on_vpn", later));
    assert!(!store.context_at(later).contains("on_vpn"));
    // Reads without `now` still see it.
    assert!(store.get_fact("on_vpn").is_some());
    assert!(store.has_fact_value("on_vpn", &true.into()));
}

#[test]
fn clear_expired_facts_removes_only_expired() {
    let mut store = FactsStore::new();
    let soon = now() + Duration::minutes(5);
    store
        .inject_fact("a", 1.into(), FactMeta::default().with_expiry(soon), now())
        .unwrap();
    store.inject_fact("b", 2.into(), FactMeta::default(), now()).unwrap();

    assert!(store.clear_expired_facts(soon).is_empty());
    let removed = store.clear_expired_facts(soon + Duration::minutes(1));
    assert_eq!(removed, vec!["a".to_string()]);
    assert!(store.get_fact("a").is_none());
    assert!(store.get_fact("b").is_some());
}

#[test]
fn record_answer_commits_answer_and_facts_together() {
    let mut store = FactsStore::new();
    let record = derive_answer(
        &wifi_question(),
        "none".into(),
        now(),
        None,
        &FactsConfig::default(),
    )
    .unwrap();
    assert_eq!(record.facts.len(), 2);

    store.record_answer(record).unwrap();

    let answer = store.get_answer("wifi_encryption").unwrap();
    assert_eq!(answer.value, FactValue::from("none"));
    assert_eq!(answer.points_earned, 0);

    let risk = store.get_fact("wifi_risk").unwrap();
    assert_eq!(risk.source, FactSource::UserAnswer);
    assert_eq!(risk.category, "network");

    let ctx = store.context_at(now());
    assert_eq!(ctx.get("wifi_encryption"), Some(&FactValue::from("none")));
    assert_eq!(ctx.get("wifi_secure"), Some(&FactValue::Bool(false)));
}

#[test]
fn reanswer_withdraws_facts_of_previous_option() {
    let mut store = FactsStore::new();
    let config = FactsConfig::default();
    let first = derive_answer(&wifi_question(), "none".into(), now(), None, &config).unwrap();
    store.record_answer(first).unwrap();
    assert!(store.get_fact("wifi_risk").is_some());

    let later = now() + Duration::hours(1);
    let second = derive_answer(&wifi_question(), "wpa3".into(), later, None, &config).unwrap();
    store.record_answer(second).unwrap();

    assert!(store.get_fact("wifi_risk").is_none());
    assert_eq!(store.get_fact("wifi_secure").unwrap().value, FactValue::Bool(true));
    let ctx = store.context_at(later);
    assert!(!ctx.contains("wifi_risk"));
    assert_eq!(
        store.get_fact("wifi_secure").unwrap().answered_by.as_deref(),
        Some("wifi_encryption")
    );
}

#[test]
fn reanswer_keeps_facts_another_writer_replaced() {
    let mut store = FactsStore::new();
    let config = FactsConfig::default();
    let first = derive_answer(&wifi_question(), "none".into(), now(), None, &config).unwrap();
    store.record_answer(first).unwrap();
    store
        .inject_fact("wifi_risk", "low".into(), FactMeta::new(FactSource::Manual), now())
        .unwrap();

    let second = derive_answer(&wifi_question(), "wpa3".into(), now(), None, &config).unwrap();
    store.record_answer(second).unwrap();

    let risk = store.get_fact("wifi_risk").unwrap();
    assert_eq!(risk.value, FactValue::from("low"));
    assert_eq!(risk.answered_by, None);
}

#[test]
fn rejected_record_leaves_store_untouched() {
    let mut store = FactsStore::new();
    store.inject_fact("wifi_secure", true.into(), FactMeta::default(), now()).unwrap();
    let before = store.clone();

    let mut record = derive_answer(
        &wifi_question(),
        "none".into(),
        now(),
        None,
        &FactsConfig::default(),
    )
    .unwrap();
    record.facts[1].key = String::new();

    assert!(store.record_answer(record).is_err());
    assert_eq!(store, before);
}

#[test]
fn answers_override_facts_with_same_key() {
    let mut store = FactsStore::new();
    store
        .inject_fact("wifi_encryption", "wpa2".into(), FactMeta::auto_detected(0.4), now())
        .unwrap();
    let record = derive_answer(
        &wifi_question(),
        "wpa3".into(),
        now(),
        None,
        &FactsConfig::default(),
    )
    .unwrap();
    store.record_answer(record).unwrap();

    let ctx = store.context_at(now());
    assert_eq!(ctx.get("wifi_encryption"), Some(&FactValue::from("wpa3")));
}

#[test]
fn expired_answer_drops_out_of_context() {
    let mut store = FactsStore::new();
    let deadline = now() + Duration::days(1);
    let record = derive_answer(
        &wifi_question(),
        "none".into(),
        now(),
        Some(deadline),
        &FactsConfig::default(),
    )
    .unwrap();
    store.record_answer(record).unwrap();

    assert!(store.is_answered("wifi_encryption", deadline));
    assert!(!store.is_answer_expired("wifi_encryption", deadline));

    let later = deadline + Duration::seconds(1);
    assert!(store.is_answer_expired("wifi_encryption", later));
    assert!(!store.is_answered("wifi_encryption", later));
    let ctx = store.context_at(later);
    assert!(!ctx.contains("wifi_encryption"));
    // Derived facts expire with the answer.
    assert!(!ctx.contains("wifi_risk"));
}

#[test]
fn unanswered_question_is_not_expired() {
    assert!(!FactsStore::new().is_answer_expired("anything", now()));
}

#[test]
fn reset_clears_everything() {
    let mut store = FactsStore::new();
    store.inject_fact("a", true.into(), FactMeta::default(), now()).unwrap();
    let record = derive_answer(
        &wifi_question(),
        "wpa3".into(),
        now(),
        None,
        &FactsConfig::default(),
    )
    .unwrap();
    store.record_answer(record).unwrap();

    store.reset();
    assert!(store.answers().is_empty());
    assert!(store.get_facts().is_empty());
    assert!(store.context_at(now()).is_empty());
}

#[test]
fn snapshot_restore_round_trip_through_json() {
    let mut store = FactsStore::new();
    store
        .inject_fact("browser_detected", "firefox".into(), FactMeta::auto_detected(0.9), now())
        .unwrap();
    let record = derive_answer(
        &wifi_question(),
        "wpa3".into(),
        now(),
        Some(now() + Duration::days(90)),
        &FactsConfig::default(),
    )
    .unwrap();
    store.record_answer(record).unwrap();

    let json = serde_json::to_string(&store.snapshot()).unwrap();
    let mut restored = FactsStore::new();
    restored.restore(serde_json::from_str(&json).unwrap()).unwrap();

    assert_eq!(restored, store);
    assert_eq!(restored.context_at(now()), store.context_at(now()));
}

#[test]
fn restore_rejects_mismatched_keys() {
    let mut source = FactsStore::new();
    source.inject_fact("a", true.into(), FactMeta::default(), now()).unwrap();
    let mut snapshot = source.snapshot();
    let fact = snapshot.facts.remove("a").unwrap();
    snapshot.facts.insert("b".to_string(), fact);

    let mut store = FactsStore::new();
    store.inject_fact("keep", 1.into(), FactMeta::default(), now()).unwrap();
    let before = store.clone();
    assert!(store.restore(snapshot).is_err());
    assert_eq!(store, before);
}
