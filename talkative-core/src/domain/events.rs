//! Wire-level events exchanged with clients
//!
//! Every frame is a JSON object `{"event": "<name>", "data": <payload>}`;
//! `data` is absent for payload-less events. Signaling and chat payloads are
//! kept as raw JSON values and forwarded without interpretation.

use chrono::{SecondsFormat, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

const CLIENT_EVENT_NAMES: &[&str] = &[
    "find-peer",
    "stop-search",
    "skip-peer",
    "offer",
    "answer",
    "ice-candidate",
    "chat-message",
];

/// Events a client sends to the relay
///
/// Decoding only looks at the event name. A relayed event without `data`
/// carries `null`, and whatever `data` a control event brings is dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Ask to be matched with a peer
    FindPeer,
    /// Leave the waiting queue
    StopSearch,
    /// Drop the current peer
    SkipPeer,
    Offer(Value),
    Answer(Value),
    IceCandidate(Value),
    ChatMessage(Value),
}

/// Inbound frame before its event name is resolved
#[derive(Deserialize)]
struct ClientFrame {
    event: String,
    #[serde(default)]
    data: Value,
}

impl<'de> Deserialize<'de> for ClientEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let frame = ClientFrame::deserialize(deserializer)?;
        ClientEvent::from_wire(&frame.event, frame.data)
            .ok_or_else(|| de::Error::unknown_variant(&frame.event, CLIENT_EVENT_NAMES))
    }
}

impl ClientEvent {
    /// Build an event from its wire name and payload
    pub fn from_wire(name: &str, data: Value) -> Option<Self> {
        let event = match name {
            "find-peer" => ClientEvent::FindPeer,
            "stop-search" => ClientEvent::StopSearch,
            "skip-peer" => ClientEvent::SkipPeer,
            "offer" => ClientEvent::Offer(data),
            "answer" => ClientEvent::Answer(data),
            "ice-candidate" => ClientEvent::IceCandidate(data),
            "chat-message" => ClientEvent::ChatMessage(data),
            _ => return None,
        };
        Some(event)
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::FindPeer => "find-peer",
            ClientEvent::StopSearch => "stop-search",
            ClientEvent::SkipPeer => "skip-peer",
            ClientEvent::Offer(_) => RelayKind::Offer.name(),
            ClientEvent::Answer(_) => RelayKind::Answer.name(),
            ClientEvent::IceCandidate(_) => RelayKind::IceCandidate.name(),
            ClientEvent::ChatMessage(_) => RelayKind::ChatMessage.name(),
        }
    }

    /// Split relayable events from control events
    pub fn into_signal(self) -> Result<Signal, Control> {
        match self {
            ClientEvent::FindPeer => Err(Control::FindPeer),
            ClientEvent::StopSearch => Err(Control::StopSearch),
            ClientEvent::SkipPeer => Err(Control::SkipPeer),
            ClientEvent::Offer(payload) => Ok(Signal::new(RelayKind::Offer, payload)),
            ClientEvent::Answer(payload) => Ok(Signal::new(RelayKind::Answer, payload)),
            ClientEvent::IceCandidate(payload) => {
                Ok(Signal::new(RelayKind::IceCandidate, payload))
            }
            ClientEvent::ChatMessage(payload) => Ok(Signal::new(RelayKind::ChatMessage, payload)),
        }
    }
}

/// Client events that steer matching and carry no payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    FindPeer,
    StopSearch,
    SkipPeer,
}

/// Events the relay pushes to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// The session now has a peer and should start its own handshake
    Matched,
    /// The peer skipped or disconnected
    PeerDisconnected,
    Offer(Value),
    Answer(Value),
    IceCandidate(Value),
    ChatMessage(Value),
    /// Number of currently connected sessions
    UserCount(usize),
}

impl ServerEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Matched => "matched",
            ServerEvent::PeerDisconnected => "peer-disconnected",
            ServerEvent::Offer(_) => RelayKind::Offer.name(),
            ServerEvent::Answer(_) => RelayKind::Answer.name(),
            ServerEvent::IceCandidate(_) => RelayKind::IceCandidate.name(),
            ServerEvent::ChatMessage(_) => RelayKind::ChatMessage.name(),
            ServerEvent::UserCount(_) => "user-count",
        }
    }
}

/// Event types the relay forwards between paired sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayKind {
    Offer,
    Answer,
    IceCandidate,
    ChatMessage,
}

impl RelayKind {
    pub fn name(&self) -> &'static str {
        match self {
            RelayKind::Offer => "offer",
            RelayKind::Answer => "answer",
            RelayKind::IceCandidate => "ice-candidate",
            RelayKind::ChatMessage => "chat-message",
        }
    }
}

impl fmt::Display for RelayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A relayable event: its type plus the opaque payload
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    kind: RelayKind,
    payload: Value,
}

impl Signal {
    pub fn new(kind: RelayKind, payload: Value) -> Self {
        Self { kind, payload }
    }

    pub fn kind(&self) -> RelayKind {
        self.kind
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Re-emit the payload unmodified under the same event type
    pub fn into_server_event(self) -> ServerEvent {
        match self.kind {
            RelayKind::Offer => ServerEvent::Offer(self.payload),
            RelayKind::Answer => ServerEvent::Answer(self.payload),
            RelayKind::IceCandidate => ServerEvent::IceCandidate(self.payload),
            RelayKind::ChatMessage => ServerEvent::ChatMessage(self.payload),
        }
    }
}

/// Conventional chat payload sent by clients
///
/// The relay never parses this; it exists for clients and tests that build
/// `chat-message` frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    /// ISO-8601 timestamp
    pub timestamp: String,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Chat message stamped with the current UTC time
    pub fn now(text: impl Into<String>) -> Self {
        Self::new(text, Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn into_event(self) -> ClientEvent {
        ClientEvent::ChatMessage(serde_json::json!({
            "text": self.text,
            "timestamp": self.timestamp,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_control_events() {
        let event: ClientEvent = serde_json::from_str(r#"{"event":"find-peer"}"#).unwrap();
        assert_eq!(event, ClientEvent::FindPeer);

        let event: ClientEvent = serde_json::from_str(r#"{"event":"stop-search"}"#).unwrap();
        assert_eq!(event, ClientEvent::StopSearch);

        let event: ClientEvent = serde_json::from_str(r#"{"event":"skip-peer"}"#).unwrap();
        assert_eq!(event, ClientEvent::SkipPeer);
    }

    #[test]
    fn test_parse_signaling_payload_is_kept_verbatim() {
        let text = r#"{"event":"ice-candidate","data":{"candidate":"candidate:1 1 udp 2122260223 10.0.0.2 54321 typ host","sdpMid":"0","sdpMLineIndex":0}}"#;
        let event: ClientEvent = serde_json::from_str(text).unwrap();

        assert_eq!(
            event,
            ClientEvent::IceCandidate(json!({
                "candidate": "candidate:1 1 udp 2122260223 10.0.0.2 54321 typ host",
                "sdpMid": "0",
                "sdpMLineIndex": 0
            }))
        );
    }

    #[test]
    fn test_relay_event_without_data_carries_null() {
        let event: ClientEvent = serde_json::from_str(r#"{"event":"offer"}"#).unwrap();
        assert_eq!(event, ClientEvent::Offer(Value::Null));

        let event: ClientEvent = serde_json::from_str(r#"{"event":"chat-message"}"#).unwrap();
        assert_eq!(event, ClientEvent::ChatMessage(Value::Null));
    }

    #[test]
    fn test_any_payload_shape_is_accepted() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"answer","data":"not an object"}"#).unwrap();
        assert_eq!(event, ClientEvent::Answer(json!("not an object")));

        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"ice-candidate","data":[1,2,3]}"#).unwrap();
        assert_eq!(event, ClientEvent::IceCandidate(json!([1, 2, 3])));
    }

    #[test]
    fn test_control_event_payload_is_ignored() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"find-peer","data":{}}"#).unwrap();
        assert_eq!(event, ClientEvent::FindPeer);

        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"skip-peer","data":"now"}"#).unwrap();
        assert_eq!(event, ClientEvent::SkipPeer);
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let result = serde_json::from_str::<ClientEvent>(r#"{"event":"join-room"}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<ClientEvent>(r#"{"data":{}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_server_events() {
        assert_eq!(
            serde_json::to_string(&ServerEvent::Matched).unwrap(),
            r#"{"event":"matched"}"#
        );
        assert_eq!(
            serde_json::to_string(&ServerEvent::PeerDisconnected).unwrap(),
            r#"{"event":"peer-disconnected"}"#
        );
        assert_eq!(
            serde_json::to_string(&ServerEvent::UserCount(3)).unwrap(),
            r#"{"event":"user-count","data":3}"#
        );
    }

    #[test]
    fn test_into_signal_splits_relay_from_control() {
        let signal = ClientEvent::Offer(json!({"type": "offer", "sdp": "v=0"}))
            .into_signal()
            .unwrap();
        assert_eq!(signal.kind(), RelayKind::Offer);
        assert_eq!(
            signal.into_server_event(),
            ServerEvent::Offer(json!({"type": "offer", "sdp": "v=0"}))
        );

        let control = ClientEvent::SkipPeer.into_signal().unwrap_err();
        assert_eq!(control, Control::SkipPeer);
    }

    #[test]
    fn test_event_names_match_wire_names() {
        let event = ClientEvent::ChatMessage(json!("hi"));
        let wire = serde_json::to_value(&event).unwrap();
        assert_eq!(wire["event"], event.name());

        let event = ServerEvent::IceCandidate(json!(null));
        let wire = serde_json::to_value(&event).unwrap();
        assert_eq!(wire["event"], event.name());
    }

    #[test]
    fn test_chat_message_into_event() {
        let event = ChatMessage::new("hi", "2024-01-01T00:00:00.000Z").into_event();

        assert_eq!(
            event,
            ClientEvent::ChatMessage(json!({
                "text": "hi",
                "timestamp": "2024-01-01T00:00:00.000Z"
            }))
        );
    }

    #[test]
    fn test_chat_message_now_is_iso8601() {
        let message = ChatMessage::now("hello");
        assert!(chrono::DateTime::parse_from_rfc3339(&message.timestamp).is_ok());
    }
}
