//! Socket.IO wire codec
//!
//! Text framing for Socket.IO v4 riding on Engine.IO v4 over a plain WebSocket.
//! Only the subset a listening client needs: handshake, heartbeats, namespace
//! connect and event packets. Binary attachments and acks are recognized and skipped.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_NAMESPACE: &str = "/";

/// Engine.IO pong, sent in reply to every ping
pub const PONG: &str = "3";
/// Socket.IO connect to the default namespace
pub const CONNECT: &str = "40";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("empty frame")]
    Empty,
    #[error("unknown engine packet type {0:?}")]
    UnknownEngineType(char),
    #[error("unknown socket packet type {0:?}")]
    UnknownSocketType(char),
    #[error("malformed payload: {0}")]
    Payload(String),
}

/// Engine.IO open handshake
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineFrame {
    Open(Handshake),
    Close,
    Ping(String),
    Pong(String),
    Message(SocketPacket),
    Upgrade,
    Noop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect { namespace: String },
    Disconnect { namespace: String },
    Event {
        namespace: String,
        ack_id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    ConnectError { namespace: String, message: String },
    /// Acks and binary packets; this client never requests acks
    Unsupported(char),
}

impl SocketPacket {
    pub fn is_default_namespace(&self) -> bool {
        let namespace = match self {
            SocketPacket::Connect { namespace }
            | SocketPacket::Disconnect { namespace }
            | SocketPacket::Event { namespace, .. }
            | SocketPacket::ConnectError { namespace, .. } => namespace,
            SocketPacket::Unsupported(_) => return false,
        };
        namespace == DEFAULT_NAMESPACE
    }
}

pub fn decode_frame(text: &str) -> Result<EngineFrame, FrameError> {
    let mut chars = text.chars();
    let kind = chars.next().ok_or(FrameError::Empty)?;
    let rest = chars.as_str();

    match kind {
        '0' => serde_json::from_str(rest)
            .map(EngineFrame::Open)
            .map_err(|e| FrameError::Payload(e.to_string())),
        '1' => Ok(EngineFrame::Close),
        '2' => Ok(EngineFrame::Ping(rest.to_string())),
        '3' => Ok(EngineFrame::Pong(rest.to_string())),
        '4' => decode_packet(rest).map(EngineFrame::Message),
        '5' => Ok(EngineFrame::Upgrade),
        '6' => Ok(EngineFrame::Noop),
        other => Err(FrameError::UnknownEngineType(other)),
    }
}

fn decode_packet(text: &str) -> Result<SocketPacket, FrameError> {
    let mut chars = text.chars();
    let kind = chars.next().ok_or(FrameError::Empty)?;
    let mut rest = chars.as_str();

    let namespace = if rest.starts_with('/') {
        let end = rest.find(',').unwrap_or(rest.len());
        let ns = rest[..end].to_string();
        rest = rest.get(end + 1..).unwrap_or("");
        ns
    } else {
        DEFAULT_NAMESPACE.to_string()
    };

    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    let ack_id = if digits > 0 { rest[..digits].parse().ok() } else { None };
    let payload = &rest[digits..];

    match kind {
        '0' => Ok(SocketPacket::Connect { namespace }),
        '1' => Ok(SocketPacket::Disconnect { namespace }),
        '2' => {
            let value: Value = serde_json::from_str(payload).map_err(|e| FrameError::Payload(e.to_string()))?;
            let mut args = match value {
                Value::Array(items) => items,
                _ => return Err(FrameError::Payload("event payload is not an array".to_string())),
            };
            if args.is_empty() {
                return Err(FrameError::Payload("event without a name".to_string()));
            }
            let name = match args.remove(0) {
                Value::String(name) => name,
                _ => return Err(FrameError::Payload("event name is not a string".to_string())),
            };
            Ok(SocketPacket::Event { namespace, ack_id, name, args })
        }
        '4' => {
            let message = match serde_json::from_str::<Value>(payload) {
                Ok(Value::Object(map)) => map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                Ok(Value::String(s)) => s,
                _ => payload.to_string(),
            };
            Ok(SocketPacket::ConnectError { namespace, message })
        }
        '3' | '5' | '6' => Ok(SocketPacket::Unsupported(kind)),
        other => Err(FrameError::UnknownSocketType(other)),
    }
}

/// Encode an event on the default namespace, e.g. `42["joinTodoRoom"]`
pub fn encode_event(name: &str, args: &[Value]) -> String {
    let mut items = Vec::with_capacity(args.len() + 1);
    items.push(Value::String(name.to_string()));
    items.extend(args.iter().cloned());
    format!("42{}", Value::Array(items))
}

/// Reply to an Engine.IO ping, echoing its payload
pub fn encode_pong(payload: &str) -> String {
    format!("{}{}", PONG, payload)
}
