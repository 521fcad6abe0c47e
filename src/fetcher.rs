//! Background execution of application commands.
//!
//! Runs fetch attempts and avatar probes on tokio tasks and reports their
//! progress back to the event loop over a channel.

use crate::app::{Command, FetchRequest};
use crate::executives::{Executive, ExecutivesClient, FetchError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Progress reported by background tasks.
#[derive(Debug)]
pub enum FetchEvent {
    /// A fetch attempt is about to send its request
    AttemptStarted { generation: u64, attempt: u32 },
    /// A fetch attempt settled
    AttemptFinished {
        generation: u64,
        attempt: u32,
        result: Result<Vec<Executive>, FetchError>,
    },
    /// An avatar image was probed
    AvatarProbed { url: String, loaded: bool },
}

/// Executes [`Command`]s in the background.
///
/// At most one fetch task is alive: starting a fetch aborts the previous one.
#[derive(Debug)]
pub struct Fetcher {
    client: ExecutivesClient,
    events: UnboundedSender<FetchEvent>,
    in_flight: Option<JoinHandle<()>>,
}

impl Fetcher {
    /// Create a fetcher and the receiver for its events.
    pub fn new(client: ExecutivesClient) -> (Self, UnboundedReceiver<FetchEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let fetcher = Self {
            client,
            events,
            in_flight: None,
        };
        (fetcher, receiver)
    }

    /// Execute a command.
    ///
    /// Must be called from within a tokio runtime.
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Fetch(request) => self.spawn_fetch(request),
            Command::ProbeAvatars(urls) => self.spawn_probes(urls),
        }
    }

    fn spawn_fetch(&mut self, request: FetchRequest) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }

        let client = self.client.clone();
        let events = self.events.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let FetchRequest {
                generation,
                attempt,
                session,
                delay,
            } = request;

            if let Some(delay) = delay {
                tracing::debug!(generation, attempt, ?delay, "waiting before retry");
                tokio::time::sleep(delay).await;
            }

            // Receiver dropped: the UI is gone.
            if events
                .send(FetchEvent::AttemptStarted {
                    generation,
                    attempt,
                })
                .is_err()
            {
                return;
            }

            tracing::debug!(generation, attempt, session, "sending request");
            let result = client.fetch_executives(session).await;
            let _ = events.send(FetchEvent::AttemptFinished {
                generation,
                attempt,
                result,
            });
        }));
    }

    fn spawn_probes(&self, urls: Vec<String>) {
        for url in urls {
            let client = self.client.clone();
            let events = self.events.clone();
            tokio::spawn(async move {
                let loaded = client.probe_image(&url).await;
                let _ = events.send(FetchEvent::AvatarProbed { url, loaded });
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{App, Avatar, RetryPolicy, ViewKind};
    use crate::config::Config;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_for(server: &MockServer) -> (Fetcher, UnboundedReceiver<FetchEvent>) {
        let config = Config {
            api_url: format!("{}/api/executives", server.uri()),
            request_timeout_ms: 1_000,
            ..Config::default()
        };
        Fetcher::new(ExecutivesClient::new(&config).unwrap())
    }

    fn fast_app() -> App {
        App::new(
            RetryPolicy {
                max_auto_retries: 2,
                delay: Duration::from_millis(20),
            },
            "https://placeholder.example.org/150".to_string(),
        )
    }

    #[tokio::test]
    async fn test_persistent_failure_retries_twice_then_settles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/executives"))
            .and(query_param("session", "2022-2023"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let (mut fetcher, mut events) = fetcher_for(&server);
        let mut app = fast_app();
        fetcher.execute(app.mount());

        let mut finished = 0;
        tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(event) = events.recv().await {
                if matches!(event, FetchEvent::AttemptFinished { .. }) {
                    finished += 1;
                }
                if let Some(command) = app.handle_fetch_event(event) {
                    fetcher.execute(command);
                }
                if finished == 3 {
                    break;
                }
            }
        })
        .await
        .unwrap();

        // No fourth attempt is scheduled.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(events.try_recv().is_err());
        assert_eq!(app.view_kind(), ViewKind::Error);
        assert!(app.state.error.as_ref().unwrap().user_message().contains("500"));
    }

    #[tokio::test]
    async fn test_success_probes_avatars() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/executives"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "email": "ngozi@x.org",
                    "name": "Ngozi Eze",
                    "position": "Vice President",
                    "studentId": "190412",
                    "session": "2022-2023",
                    "imageUrl": format!("{}/images/missing.png", server.uri())
                }]
            })))
            .mount(&server)
            .await;

        let (mut fetcher, mut events) = fetcher_for(&server);
        let mut app = fast_app();
        fetcher.execute(app.mount());

        tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(event) = events.recv().await {
                let probed = matches!(event, FetchEvent::AvatarProbed { .. });
                if let Some(command) = app.handle_fetch_event(event) {
                    fetcher.execute(command);
                }
                if probed {
                    break;
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(app.view_kind(), ViewKind::Grid);
        let executive = app.state.executives[0].clone();
        assert_eq!(
            app.avatar(&executive),
            Avatar::Image("https://placeholder.example.org/150")
        );
    }

    #[tokio::test]
    async fn test_new_fetch_aborts_pending_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let (mut fetcher, mut events) = fetcher_for(&server);
        fetcher.execute(Command::Fetch(FetchRequest {
            generation: 1,
            attempt: 1,
            session: "2022-2023",
            delay: Some(Duration::from_secs(60)),
        }));
        fetcher.execute(Command::Fetch(FetchRequest {
            generation: 2,
            attempt: 0,
            session: "2022-2023",
            delay: None,
        }));

        let first = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            first,
            FetchEvent::AttemptStarted {
                generation: 2,
                attempt: 0
            }
        ));
        let second = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            second,
            FetchEvent::AttemptFinished {
                generation: 2,
                result: Ok(_),
                ..
            }
        ));
    }
}
