//! End-to-end assessment flow over the fixture bank with a fixed clock.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;
use vigil_core::config::{SessionConfig, VisibilityConfig};
use vigil_core::errors::{FactsError, VigilError, VigilErrorCode};
use vigil_core::facts::{FactMeta, FactSource, FactValue};
use vigil_core::traits::{FixedClock, IClock};
use vigil_core::content::{Gate, GateCondition, Question, QuestionOption};
use vigil_core::{QuestionBank, VigilConfig};
use vigil_facts::MemorySnapshotStore;
use vigil_session::AssessmentSession;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()))
}

fn config() -> VigilConfig {
    VigilConfig {
        visibility: VisibilityConfig {
            external_facts: test_fixtures::EXTERNAL_FACTS.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn session_with(clock: Arc<FixedClock>) -> AssessmentSession {
    let bank = test_fixtures::load_bank(test_fixtures::SECURITY_HYGIENE);
    AssessmentSession::with_config(bank, config(), clock).unwrap()
}

#[test]
fn answering_unlocks_suite_and_hides_answered() {
    let mut session = session_with(clock());
    assert!(!session.visibility().is_visible("advanced_2fa"));

    session.submit_answer("lock_screen", "yes").unwrap();
    assert!(!session.visibility().is_visible("advanced_2fa"));
    assert!(!session.pending_questions().contains(&"lock_screen".to_string()));

    session.submit_answer("browser_passwords", "yes").unwrap();
    let visibility = session.visibility();
    assert!(visibility.is_unlocked("advanced_accounts"));
    assert!(visibility.is_visible("advanced_2fa"));
    assert!(session.pending_questions().contains(&"advanced_2fa".to_string()));

    let suites: Vec<&str> = session.unlocked_suites().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(suites, vec!["advanced_accounts"]);
}

#[test]
fn answer_facts_propagate_in_one_step() {
    let mut session = session_with(clock());
    session.submit_answer("wifi_encryption", "none").unwrap();

    let ctx = session.context();
    assert_eq!(ctx.get("wifi_risk"), Some(&FactValue::from("high")));

    let visibility = session.visibility();
    assert!(visibility.is_visible("router_admin"));
    assert!(visibility.is_unlocked("home_network"));
    assert!(visibility.is_visible("router_firmware"));

    let fact = session.store().get_fact("wifi_risk").unwrap();
    assert_eq!(fact.source, FactSource::UserAnswer);
    assert_eq!(fact.category, "network");
}

#[test]
fn reanswering_retracts_facts_of_the_old_option() {
    let clock = clock();
    let mut session = session_with(clock.clone());
    session.submit_answer("wifi_encryption", "none").unwrap();
    assert!(session.visibility().is_visible("router_admin"));

    clock.advance(Duration::minutes(5));
    session.submit_answer("wifi_encryption", "wpa3").unwrap();

    let ctx = session.context();
    assert_eq!(ctx.get("wifi_encryption"), Some(&FactValue::from("wpa3")));
    assert_eq!(ctx.get("wifi_risk"), None);
    assert!(session.store().get_fact("wifi_risk").is_none());

    let visibility = session.visibility();
    assert!(!visibility.is_visible("router_admin"));
    assert!(!visibility.is_unlocked("home_network"));

    session.submit_answer("wifi_encryption", "wep").unwrap();
    assert_eq!(session.context().get("wifi_risk"), Some(&FactValue::from("medium")));
    assert!(session.visibility().is_visible("router_admin"));
}

#[test]
fn detector_facts_expose_questions() {
    let mut session = session_with(clock());
    session
        .inject_fact("browser_detected", "firefox", FactMeta::auto_detected(0.9))
        .unwrap();
    session
        .inject_fact("os_detected", "ios", FactMeta::auto_detected(0.8))
        .unwrap();

    let pending = session.pending_questions();
    assert_eq!(&pending[..2], &["adblock".to_string(), "os_confirm".to_string()]);

    session.submit_answer("wifi_encryption", "none").unwrap();
    assert!(!session.visibility().is_unlocked("home_network"));
}

#[test]
fn unknown_question_or_option_is_rejected_without_writes() {
    let mut session = session_with(clock());

    let err = session.submit_answer("nonexistent", "yes").unwrap_err();
    assert!(matches!(err, VigilError::Facts(FactsError::UnknownQuestion { .. })));
    assert_eq!(err.error_code(), "UNKNOWN_QUESTION");

    let err = session.submit_answer("wifi_encryption", "wpa9").unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_OPTION");

    assert!(session.store().answers().is_empty());
    assert!(session.store().get_facts().is_empty());
}

#[test]
fn expired_answer_resurfaces_question() {
    let clock = clock();
    let mut session = session_with(clock.clone());

    let expiration = session.submit_answer("wifi_encryption", "none").unwrap();
    assert_eq!(expiration.days, 1);
    assert!(!session.pending_questions().contains(&"wifi_encryption".to_string()));
    assert_eq!(session.expiration_label("wifi_encryption").as_deref(), Some("Expires tomorrow"));

    // Exactly at the deadline the answer still holds.
    clock.set(expiration.expires_at);
    assert!(!session.is_answer_expired("wifi_encryption"));
    assert!(session.visibility().is_visible("router_admin"));

    clock.advance(Duration::seconds(1));
    assert!(session.is_answer_expired("wifi_encryption"));
    assert!(session.pending_questions().contains(&"wifi_encryption".to_string()));
    // The derived risk fact expired with it.
    assert!(!session.visibility().is_visible("router_admin"));

    let expired: Vec<&str> = session
        .expired_answers()
        .iter()
        .map(|a| a.question_id.as_str())
        .collect();
    assert_eq!(expired, vec!["wifi_encryption"]);
}

#[test]
fn expiring_queries_use_policy_windows() {
    let clock = clock();
    let mut session = session_with(clock.clone());
    session.submit_answer("os_updates", "never").unwrap();
    session.submit_answer("password_manager", "yes").unwrap();
    session.submit_answer("lock_screen", "yes").unwrap();

    let soon: Vec<&str> = session.expiring_soon().iter().map(|a| a.question_id.as_str()).collect();
    assert_eq!(soon, vec!["os_updates"]);

    let quarter = StdDuration::from_secs(91 * 24 * 3600);
    let within: Vec<&str> = session
        .expiring_answers(quarter)
        .iter()
        .map(|a| a.question_id.as_str())
        .collect();
    assert_eq!(within, vec!["os_updates", "lock_screen"]);

    clock.advance(Duration::days(100));
    let expired: Vec<&str> = session
        .expired_answers()
        .iter()
        .map(|a| a.question_id.as_str())
        .collect();
    assert_eq!(expired, vec!["os_updates", "lock_screen"]);
    assert!(session.expired_answers().iter().all(|a| a.question_id != "password_manager"));
}

#[test]
fn hide_answered_can_be_disabled() {
    let bank = test_fixtures::load_bank(test_fixtures::SECURITY_HYGIENE);
    let mut config = config();
    config.visibility.hide_answered = Some(false);
    let mut session = AssessmentSession::with_config(bank, config, clock()).unwrap();

    session.submit_answer("lock_screen", "yes").unwrap();
    assert!(session.pending_questions().contains(&"lock_screen".to_string()));
}

#[test]
fn invalid_bank_is_rejected_on_load() {
    let bank = test_fixtures::load_bank(test_fixtures::BROKEN);
    let err = AssessmentSession::with_config(bank, VigilConfig::default(), clock()).unwrap_err();
    assert_eq!(err.error_code(), "LINT_FAILED");

    let bank = test_fixtures::load_bank(test_fixtures::BROKEN);
    let config = VigilConfig {
        session: SessionConfig {
            validate_on_load: Some(false),
            ..Default::default()
        },
        ..Default::default()
    };
    let session = AssessmentSession::with_config(bank, config, clock()).unwrap();
    assert!(session.lint_report().is_clean());
}

#[test]
fn lint_warnings_are_kept() {
    let bank = test_fixtures::load_bank(test_fixtures::SECURITY_HYGIENE);
    let session = AssessmentSession::with_config(bank, VigilConfig::default(), clock()).unwrap();
    assert_eq!(session.lint_report().warnings().count(), 3);
}

#[test]
fn snapshot_round_trip_through_stores() {
    let mut session = session_with(clock());
    session.inject_fact("os_detected", "linux", FactMeta::auto_detected(0.7)).unwrap();
    session.submit_answer("lock_screen", "yes").unwrap();
    session.submit_answer("browser_passwords", "yes").unwrap();
    let expected = session.visibility();

    let memory = MemorySnapshotStore::new();
    session.save_to(&memory).unwrap();

    let mut fresh = session_with(clock());
    assert!(fresh.load_from(&memory).unwrap());
    assert_eq!(fresh.visibility(), expected);
    assert_eq!(fresh.snapshot(), session.snapshot());

    let dir = TempDir::new().unwrap();
    let mut config = config();
    config.session.snapshot_path = Some(dir.path().join("state.json").display().to_string());
    let bank = test_fixtures::load_bank(test_fixtures::SECURITY_HYGIENE);
    let mut on_disk = AssessmentSession::with_config(bank, config, clock()).unwrap();
    let file_store = on_disk.configured_snapshot_store().unwrap();

    assert!(!on_disk.load_from(&file_store).unwrap());
    session.save_to(&file_store).unwrap();
    assert!(on_disk.load_from(&file_store).unwrap());
    assert_eq!(on_disk.visibility(), expected);
}

#[test]
fn reset_returns_to_initial_visibility() {
    let mut session = session_with(clock());
    let initial = session.visibility();
    session.submit_answer("wifi_encryption", "none").unwrap();
    assert_ne!(session.visibility(), initial);

    session.reset();
    assert_eq!(session.visibility(), initial);
    assert!(session.snapshot().is_empty());
}

#[test]
fn clear_expired_facts_uses_the_clock() {
    let clock = clock();
    let mut session = session_with(clock.clone());
    let deadline = clock.now() + Duration::hours(2);
    session
        .inject_fact("on_vpn", true, FactMeta::default().with_expiry(deadline))
        .unwrap();

    assert!(session.clear_expired_facts().is_empty());
    clock.advance(Duration::hours(3));
    assert_eq!(session.clear_expired_facts(), vec!["on_vpn".to_string()]);
}

#[test]
fn session_works_with_in_memory_bank() {
    let bank = QuestionBank::from_json(
        r#"{"questions":[{"id":"q","options":[{"id":"a","facts":{"k":1},"points":3}]}]}"#,
    )
    .unwrap();
    let mut session = AssessmentSession::new(bank).unwrap();
    session.submit_answer("q", "a").unwrap();
    assert_eq!(session.store().get_answer("q").unwrap().points_earned, 3);
    assert!(session.pending_questions().is_empty());
}

#[test]
fn question_hidden_by_its_own_answer_loads_and_hides() {
    let os_manual = Question::new("os_manual")
        .with_conditions(Gate::open().with_none(vec![GateCondition::exists("os_known")]))
        .with_option(QuestionOption::new("windows", 0).with_fact("os_known", true));
    let bank = QuestionBank::new(vec![os_manual], vec![]);
    let mut config = VigilConfig::default();
    config.visibility.hide_answered = Some(false);
    let mut session = AssessmentSession::with_config(bank, config, clock()).unwrap();
    assert!(session.lint_report().is_clean());
    assert_eq!(session.pending_questions(), vec!["os_manual".to_string()]);

    session.submit_answer("os_manual", "windows").unwrap();
    assert!(session.pending_questions().is_empty());
}
