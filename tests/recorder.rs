#[cfg(test)]
mod tests {
    use chrono::Utc;
    use std::time::Duration;
    use studyguard::api::MonitoringApi;
    use studyguard::libs::config::ServerConfig;
    use studyguard::libs::emitter::Subscriber;
    use studyguard::libs::event::{EventKind, MonitorEvent};
    use studyguard::libs::recorder::{Destination, Recorder, RecorderSummary};
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    async fn capture_server() -> (String, mpsc::UnboundedReceiver<(String, serde_json::Value)>) {
        capture_server_answering("{}").await
    }

    /// Minimal HTTP endpoint that answers 201 with `reply` and forwards each JSON body.
    async fn capture_server_answering(reply: &'static str) -> (String, mpsc::UnboundedReceiver<(String, serde_json::Value)>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/adaptive", listener.local_addr().unwrap());
        let (sender, receiver) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let sender = sender.clone();
                tokio::spawn(async move {
                    let mut reader = BufReader::new(stream);
                    loop {
                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
                            break;
                        }
                        let path = request_line.split_whitespace().nth(1).unwrap_or_default().to_string();

                        let mut content_length = 0;
                        loop {
                            let mut header = String::new();
                            reader.read_line(&mut header).await.unwrap();
                            if header == "\r\n" || header.is_empty() {
                                break;
                            }
                            if let Some(value) = header.to_ascii_lowercase().strip_prefix("content-length:") {
                                content_length = value.trim().parse().unwrap();
                            }
                        }

                        let mut body = vec![0; content_length];
                        reader.read_exact(&mut body).await.unwrap();
                        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
                        let _ = sender.send((path, json));

                        let response = format!(
                            "HTTP/1.1 201 Created\r\ncontent-length: {}\r\ncontent-type: application/json\r\n\r\n{}",
                            reply.len(),
                            reply
                        );
                        reader.get_mut().write_all(response.as_bytes()).await.unwrap();
                    }
                });
            }
        });

        (url, receiver)
    }

    fn api(api_url: &str) -> MonitoringApi {
        MonitoringApi::new(&ServerConfig {
            api_url: api_url.to_string(),
            auth_token: "token123".to_string(),
        })
        .unwrap()
    }

    fn event(kind: EventKind) -> MonitorEvent {
        MonitorEvent::new(kind, Utc::now())
    }

    #[tokio::test]
    async fn test_records_violations_in_order() {
        let (url, mut received) = capture_server().await;
        let (mut recorder, handle) = Recorder::spawn(api(&url), "sess-1");

        recorder.on_event(&event(EventKind::TabSwitch { hidden: true }));
        recorder.on_event(&event(EventKind::TimeUpdate {
            total_time: 10,
            active_time: 8,
        }));
        recorder.on_event(&event(EventKind::FocusLost));
        drop(recorder);

        let summary = tokio::time::timeout(Duration::from_secs(10), handle.finish()).await.unwrap();
        assert_eq!(summary, RecorderSummary { sent: 2, failed: 0 });

        let (path, first) = received.recv().await.unwrap();
        assert_eq!(path, "/api/adaptive/session-monitoring/");
        assert_eq!(first["session_id"], "sess-1");
        assert_eq!(first["event_type"], "tab_switch");
        assert_eq!(first["event_data"]["hidden"], true);

        let (_, second) = received.recv().await.unwrap();
        assert_eq!(second["event_type"], "focus_lost");
    }

    #[tokio::test]
    async fn test_heartbeats_are_opt_in() {
        let (url, mut received) = capture_server().await;
        let (recorder, handle) = Recorder::spawn(api(&url), "sess-2");
        let mut recorder = recorder.with_heartbeats(true);

        recorder.on_event(&event(EventKind::TimeUpdate {
            total_time: 20,
            active_time: 15,
        }));
        drop(recorder);

        let summary = tokio::time::timeout(Duration::from_secs(10), handle.finish()).await.unwrap();
        assert_eq!(summary.sent, 1);
        let (_, body) = received.recv().await.unwrap();
        assert_eq!(body["event_type"], "time_update");
        assert_eq!(body["event_data"]["active_time"], 15);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_swallowed() {
        // Bind then drop to get a port nothing listens on
        let port = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap().port();
        let (mut recorder, handle) = Recorder::spawn(api(&format!("http://127.0.0.1:{}", port)), "sess-3");

        recorder.on_event(&event(EventKind::TabSwitch { hidden: true }));
        recorder.on_event(&event(EventKind::FocusLost));
        drop(recorder);

        let summary = tokio::time::timeout(Duration::from_secs(30), handle.finish()).await.unwrap();
        assert_eq!(summary, RecorderSummary { sent: 0, failed: 2 });
    }

    #[tokio::test]
    async fn test_session_endpoints() {
        let (url, mut received) = capture_server().await;
        let api = api(&url);

        // The capture server answers `{}`, which carries no id
        assert!(api.start_session("course-7").await.is_err());
        let (path, body) = received.recv().await.unwrap();
        assert_eq!(path, "/api/adaptive/monitoring/start_session/");
        assert_eq!(body["content_id"], "course-7");

        api.end_session("42").await.unwrap();
        let (path, _) = received.recv().await.unwrap();
        assert_eq!(path, "/api/adaptive/monitoring/42/end_session/");
    }

    #[tokio::test]
    async fn test_string_session_id_is_accepted() {
        let (url, _received) = capture_server_answering(r#"{"id":"abc"}"#).await;
        assert_eq!(api(&url).start_session("course-7").await.unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_monitoring_session_events_use_track_event() {
        let (url, mut received) = capture_server_answering(r#"{"id":7}"#).await;
        let api = api(&url);

        let id = api.start_session("course-7").await.unwrap();
        assert_eq!(id, "7");
        let (path, _) = received.recv().await.unwrap();
        assert_eq!(path, "/api/adaptive/monitoring/start_session/");

        let (mut recorder, handle) = Recorder::spawn(api, Destination::MonitoringSession(id));
        assert_eq!(recorder.session_id(), "7");
        recorder.on_event(&event(EventKind::TabSwitch { hidden: true }));
        recorder.on_event(&event(EventKind::FocusLost));
        drop(recorder);

        let (summary, ended) = tokio::time::timeout(Duration::from_secs(10), handle.close()).await.unwrap();
        assert_eq!(summary, RecorderSummary { sent: 2, failed: 0 });
        assert!(ended.is_ok());

        let (path, first) = received.recv().await.unwrap();
        assert_eq!(path, "/api/adaptive/monitoring/7/track_event/");
        assert_eq!(first["event_type"], "tab_switch");
        assert_eq!(first["data"]["hidden"], true);
        assert!(first.get("session_id").is_none());

        let (path, second) = received.recv().await.unwrap();
        assert_eq!(path, "/api/adaptive/monitoring/7/track_event/");
        assert_eq!(second["event_type"], "focus_lost");
        assert!(second["data"].is_object());

        // Ending comes strictly after the queued events
        let (path, _) = received.recv().await.unwrap();
        assert_eq!(path, "/api/adaptive/monitoring/7/end_session/");
    }

    #[tokio::test]
    async fn test_closing_study_session_does_not_end_anything() {
        let (url, mut received) = capture_server().await;
        let (mut recorder, handle) = Recorder::spawn(api(&url), "sess-4");
        recorder.on_event(&event(EventKind::FocusLost));
        drop(recorder);

        let (summary, ended) = tokio::time::timeout(Duration::from_secs(10), handle.close()).await.unwrap();
        assert_eq!(summary.sent, 1);
        assert!(ended.is_ok());

        let (path, _) = received.recv().await.unwrap();
        assert_eq!(path, "/api/adaptive/session-monitoring/");
        assert!(received.try_recv().is_err());
    }
}
