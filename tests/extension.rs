#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use studyguard::libs::config::ExtensionConfig;
    use studyguard::libs::extension::{ExtensionMonitor, ExtensionRequest, ExtensionResponse, ExtensionUpdate, StudyMode};

    fn request(json: &str) -> ExtensionRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_tab_activation_protocol() {
        let start = Utc::now();
        let mut monitor = ExtensionMonitor::new_at(ExtensionConfig::default(), start);

        let first = monitor.handle_at(request(r#"{"action":"tabActivated","data":{"tabId":10}}"#), start);
        assert_eq!(first, ExtensionResponse::Ack { success: true });

        let later = start + Duration::seconds(150);
        match monitor.handle_at(request(r#"{"action":"tabActivated","data":{"tabId":11}}"#), later) {
            ExtensionResponse::Stats(stats) => {
                assert_eq!(stats.tab_switches, 1);
                // 100 - 2 + 5 for half the focus window
                assert_eq!(stats.attention_score, 100.0);
                assert_eq!(stats.session_time, 2);
                assert!(stats.is_extension_active);
            }
            other => panic!("expected stats, got {:?}", other),
        }

        let response = serde_json::to_value(monitor.handle_at(request(r#"{"action":"resetSession"}"#), later)).unwrap();
        assert_eq!(response, serde_json::json!({ "success": true }));
        assert_eq!(monitor.tab_switch_count(), 0);
    }

    #[test]
    fn test_configured_nudge_thresholds() {
        let now = Utc::now();
        let mut monitor = ExtensionMonitor::new_at(
            ExtensionConfig {
                study_mode: StudyMode::Exam,
                nudge_score_threshold: 99.0,
                nudge_min_switches: 1,
                ..ExtensionConfig::default()
            },
            now,
        );
        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = updates.clone();
        monitor.add_sink(move |update: &ExtensionUpdate| sink.lock().push(update.clone()));

        monitor.on_tab_activated_at(1, now);
        monitor.on_tab_activated_at(2, now);
        assert!(updates.lock().iter().all(|update| matches!(update, ExtensionUpdate::Stats(_))));

        monitor.on_tab_activated_at(3, now);
        let updates = updates.lock();
        assert_eq!(updates.len(), 3);
        match &updates[2] {
            ExtensionUpdate::Nudge(nudge) => assert_eq!(nudge.title, "Stay Focused!"),
            other => panic!("expected nudge, got {:?}", other),
        }
        let json = serde_json::to_value(&updates[1]).unwrap();
        assert_eq!(json["data"]["studyMode"], "exam");
    }

    #[test]
    fn test_settings_update_keeps_unset_fields() {
        let mut monitor = ExtensionMonitor::new(ExtensionConfig::default());
        let response = monitor.handle(request(r#"{"action":"updateSettings","data":{"blockedSites":["example.org"]}}"#));

        assert_eq!(response, ExtensionResponse::Ack { success: true });
        assert_eq!(monitor.settings().blocked_sites, vec!["example.org".to_string()]);
        assert_eq!(monitor.settings().study_mode, StudyMode::Basic);
    }
}
