//! Background fetch worker.
//!
//! All resource-client calls run on one dedicated thread so the UI thread
//! never blocks. Completions flow back over a channel and carry the panel
//! id and fetch token they belong to; the receiving side decides whether
//! they are still current.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use flowdeck_client::{Record, ResourceClient};
use flowdeck_ui::PanelId;

#[derive(Debug)]
pub enum FetchCommand {
    List {
        panel: PanelId,
        token: u64,
        collection: String,
    },
    Invoke {
        collection: String,
        id: String,
        command: String,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum FetchEvent {
    Records {
        panel: PanelId,
        token: u64,
        outcome: Result<Vec<Record>, String>,
    },
    Invoked {
        collection: String,
        id: String,
        command: String,
        outcome: Result<(), String>,
    },
}

pub fn spawn(client: Arc<dyn ResourceClient>) -> (Sender<FetchCommand>, Receiver<FetchEvent>) {
    let (command_tx, command_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel::<FetchEvent>();

    thread::spawn(move || {
        while let Ok(command) = command_rx.recv() {
            let event = match command {
                FetchCommand::List {
                    panel,
                    token,
                    collection,
                } => FetchEvent::Records {
                    panel,
                    token,
                    outcome: client.list(&collection).map_err(|err| err.to_string()),
                },
                FetchCommand::Invoke {
                    collection,
                    id,
                    command,
                } => {
                    let outcome = client
                        .invoke(&collection, &id, &command)
                        .map_err(|err| err.to_string());
                    FetchEvent::Invoked {
                        collection,
                        id,
                        command,
                        outcome,
                    }
                }
                FetchCommand::Shutdown => break,
            };
            if event_tx.send(event).is_err() {
                break;
            }
        }
    });

    (command_tx, event_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdeck_client::MemoryClient;
    use std::time::Duration;

    #[test]
    fn lists_and_invokes_through_the_worker() {
        let client = Arc::new(MemoryClient::sample());
        let (tx, rx) = spawn(Arc::clone(&client) as Arc<dyn ResourceClient>);

        tx.send(FetchCommand::List {
            panel: 7,
            token: 1,
            collection: "dataflow".to_string(),
        })
        .unwrap();
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            FetchEvent::Records {
                panel,
                token,
                outcome,
            } => {
                assert_eq!(panel, 7);
                assert_eq!(token, 1);
                assert_eq!(outcome.unwrap().len(), 3);
            }
            other => panic!("unexpected event {other:?}"),
        }

        tx.send(FetchCommand::Invoke {
            collection: "dataflow".to_string(),
            id: "log-aggregation".to_string(),
            command: "stop".to_string(),
        })
        .unwrap();
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            FetchEvent::Invoked { outcome, .. } => outcome.unwrap(),
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(client.invocations().len(), 1);

        tx.send(FetchCommand::Shutdown).unwrap();
    }

    #[test]
    fn list_failure_surfaces_as_display_text() {
        let client = Arc::new(MemoryClient::new());
        let (tx, rx) = spawn(client as Arc<dyn ResourceClient>);
        tx.send(FetchCommand::Invoke {
            collection: "dataflow".to_string(),
            id: "missing".to_string(),
            command: "stop".to_string(),
        })
        .unwrap();
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            FetchEvent::Invoked { outcome, .. } => {
                let message = outcome.unwrap_err();
                assert!(message.contains("missing"), "unhelpful error: {message}");
            }
            other => panic!("unexpected event {other:?}"),
        }
        tx.send(FetchCommand::Shutdown).unwrap();
    }
}
