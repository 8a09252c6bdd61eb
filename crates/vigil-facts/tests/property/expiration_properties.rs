//! Property tests for expiry: strict boundary and context exclusion.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use vigil_core::facts::{FactMeta, FactValue};
use vigil_facts::{ExpirationPolicy, FactsStore};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

proptest! {
    #[test]
    fn fact_visible_until_strictly_after_deadline(
        ttl in 0i64..100_000,
        offset in -1000i64..200_000,
    ) {
        let mut store = FactsStore::new();
        let deadline = base() + Duration::seconds(ttl);
        store
            .inject_fact(
                "k",
                FactValue::Bool(true),
                FactMeta::default().with_expiry(deadline),
                base(),
            )
            .unwrap();

        let at = base() + Duration::seconds(offset);
        let visible = store.context_at(at).contains("k");
        prop_assert_eq!(visible, at <= deadline);
        prop_assert_eq!(store.is_fact_active("k", at), at <= deadline);
    }

    #[test]
    fn expiration_is_now_plus_days(
        question in prop::sample::select(
            vec!["wifi_encryption", "password_manager", "os_updates", "misc"],
        ),
        answer in prop::sample::select(vec!["none", "wep", "yes", "never", "automatic", "other"]),
        offset in 0i64..10_000_000,
    ) {
        let now = base() + Duration::seconds(offset);
        let e = ExpirationPolicy::new()
            .calculate_answer_expiration(question, &FactValue::from(answer), now);
        prop_assert!(e.days >= 1 && e.days <= 180);
        prop_assert_eq!(e.expires_at, now + Duration::days(i64::from(e.days)));
    }
}
