//! Typed ID definitions for API resources.

use crate::define_id;

define_id!(
    /// Identifies a registered user.
    UserId,
    "usr"
);

define_id!(
    /// Identifies an event.
    EventId,
    "evt"
);

define_id!(
    /// Correlates an HTTP request across logs and error bodies.
    RequestId,
    "req"
);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::new();
        let parsed: UserId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_event_id_prefix() {
        let id = EventId::new();
        assert!(id.to_string().starts_with("evt_"));
    }

    #[test]
    fn test_event_id_rejects_user_prefix() {
        let result: Result<EventId, _> = "usr_01HV4Z2WQXKJNM8GPQY6VBKC3D".parse();
        let err = result.unwrap_err();
        assert!(err.is_prefix_error());
        assert_eq!(
            err,
            crate::IdError::InvalidPrefix {
                expected: "evt",
                actual: "usr".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_separator() {
        let result: Result<UserId, _> = "usr01HV4Z2WQXKJNM8GPQY6VBKC3D".parse();
        assert!(matches!(
            result.unwrap_err(),
            crate::IdError::MissingSeparator
        ));
    }

    #[test]
    fn test_empty() {
        let result: Result<UserId, _> = "".parse();
        assert!(matches!(result.unwrap_err(), crate::IdError::Empty));
    }

    #[test]
    fn test_invalid_ulid() {
        let result: Result<EventId, _> = "evt_not-a-ulid".parse();
        assert!(matches!(
            result.unwrap_err(),
            crate::IdError::InvalidUlid(_)
        ));
    }

    #[test]
    fn test_json_is_prefixed_string() {
        let id = EventId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let parsed: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_json_rejects_wrong_prefix() {
        let user = UserId::new();
        let json = serde_json::to_string(&user).unwrap();
        assert!(serde_json::from_str::<EventId>(&json).is_err());
    }

    #[test]
    fn test_ids_sort_by_creation_time() {
        let first = EventId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = EventId::new();
        assert!(first < second);
    }

    #[test]
    fn test_prefixes_unique() {
        let prefixes = [UserId::PREFIX, EventId::PREFIX, RequestId::PREFIX];
        let unique: std::collections::HashSet<_> = prefixes.iter().collect();
        assert_eq!(prefixes.len(), unique.len());
    }

    proptest! {
        #[test]
        fn prop_parse_accepts_any_ulid(raw in any::<u128>()) {
            let id = UserId::from_ulid(crate::Ulid(raw));
            let parsed = UserId::parse(&id.to_string()).unwrap();
            prop_assert_eq!(parsed.ulid(), id.ulid());
        }

        #[test]
        fn prop_parse_never_panics(input in ".*") {
            let _ = EventId::parse(&input);
        }
    }
}
