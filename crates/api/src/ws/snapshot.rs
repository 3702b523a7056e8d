use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use pageforge_db::store::Subscription;
use serde::Serialize;

/// Outbound frame carrying one full snapshot.
#[derive(Debug, Serialize)]
pub struct SnapshotMessage<T: Serialize> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: Vec<T>,
}

impl<T: Serialize> SnapshotMessage<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            kind: "snapshot",
            data,
        }
    }
}

/// Forward every snapshot of `subscription` to `socket` as a JSON text frame.
///
/// Runs until the client closes the socket, a send fails, or the
/// subscription ends. The subscription is cancelled on return.
pub async fn stream_snapshots<T>(socket: WebSocket, mut subscription: Subscription<T>)
where
    T: Serialize + Send + 'static,
{
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "Snapshot stream connected");

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            snapshot = subscription.next() => {
                let Some(items) = snapshot else { break };
                let text = match serde_json::to_string(&SnapshotMessage::new(items)) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!(conn_id = %conn_id, error = %e, "Snapshot encoding failed");
                        break;
                    }
                };
                if sink.send(Message::Text(text.into())).await.is_err() {
                    tracing::debug!(conn_id = %conn_id, "WebSocket sink closed");
                    break;
                }
            }
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                    break;
                }
            },
        }
    }

    subscription.unsubscribe();
    tracing::info!(conn_id = %conn_id, "Snapshot stream disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_frame_is_tagged() {
        let frame = serde_json::to_value(SnapshotMessage::new(vec![1, 2])).unwrap();
        assert_eq!(frame, serde_json::json!({"type": "snapshot", "data": [1, 2]}));
    }
}
