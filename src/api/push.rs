//! Push Notifications
//!
//! Typed todo events, the per-kind callback registry and the WebSocket channel
//! that feeds it.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use super::socket_io::{self, EngineFrame, SocketPacket};
use crate::error::{TodoError, TodoResult};
use crate::models::Todo;

/// Room every client joins right after connecting
pub const JOIN_ROOM_EVENT: &str = "joinTodoRoom";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Created, EventKind::Updated, EventKind::Deleted];

    pub fn event_name(self) -> &'static str {
        match self {
            EventKind::Created => "todoCreated",
            EventKind::Updated => "todoUpdated",
            EventKind::Deleted => "todoDeleted",
        }
    }

    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.event_name() == name)
    }
}

/// Change pushed by the server, made by this or any other client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    Created(Todo),
    Updated(Todo),
    Deleted(String),
}

impl PushEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PushEvent::Created(_) => EventKind::Created,
            PushEvent::Updated(_) => EventKind::Updated,
            PushEvent::Deleted(_) => EventKind::Deleted,
        }
    }

    /// Decode a Socket.IO event; unknown names and bad payloads yield None
    pub fn from_socket_event(name: &str, args: &[Value]) -> Option<Self> {
        let kind = EventKind::from_event_name(name)?;
        let payload = args.first()?;
        match kind {
            EventKind::Created => serde_json::from_value(payload.clone()).ok().map(PushEvent::Created),
            EventKind::Updated => serde_json::from_value(payload.clone()).ok().map(PushEvent::Updated),
            EventKind::Deleted => match payload {
                Value::String(id) => Some(PushEvent::Deleted(id.clone())),
                Value::Object(map) => map
                    .get("_id")
                    .and_then(Value::as_str)
                    .map(|id| PushEvent::Deleted(id.to_string())),
                _ => None,
            },
        }
    }
}

pub type EventCallback = Rc<dyn Fn(&PushEvent)>;

/// Anything that can deliver push events to registered callbacks
pub trait PushSource {
    fn subscribe(&self, kind: EventKind, callback: EventCallback);
}

/// Callbacks registered per event kind
#[derive(Default)]
pub struct EventHandlers {
    handlers: RefCell<Vec<(EventKind, EventCallback)>>,
    disposed: Cell<bool>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, kind: EventKind, callback: EventCallback) {
        if self.disposed.get() {
            log::debug!("[PUSH] Ignoring {} subscription after dispose", kind.event_name());
            return;
        }
        self.handlers.borrow_mut().push((kind, callback));
    }

    /// Invoke every callback for the event's kind, in registration order
    pub fn dispatch(&self, event: &PushEvent) -> usize {
        if self.disposed.get() {
            return 0;
        }
        let kind = event.kind();
        // Snapshot so a callback may subscribe or dispose without a borrow conflict
        let matching: Vec<EventCallback> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in &matching {
            if self.disposed.get() {
                break;
            }
            callback(event);
        }
        matching.len()
    }

    pub fn dispose(&self) {
        self.disposed.set(true);
        self.handlers.borrow_mut().clear();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl PushSource for EventHandlers {
    fn subscribe(&self, kind: EventKind, callback: EventCallback) {
        self.register(kind, callback);
    }
}

/// What the channel does with one decoded frame
#[derive(Debug, Clone, PartialEq)]
enum Reaction {
    Send(String),
    Dispatch(PushEvent),
    /// The server ended the session; no further events will arrive
    Close,
    Ignore,
}

fn react(frame: EngineFrame) -> Reaction {
    match frame {
        EngineFrame::Open(handshake) => {
            log::info!("[PUSH] Engine open, sid={}", handshake.sid);
            Reaction::Send(socket_io::CONNECT.to_string())
        }
        EngineFrame::Ping(payload) => Reaction::Send(socket_io::encode_pong(&payload)),
        EngineFrame::Close => {
            log::info!("[PUSH] Server closed the session");
            Reaction::Close
        }
        EngineFrame::Message(SocketPacket::Unsupported(kind)) => {
            log::debug!("[PUSH] Ignoring unsupported packet type {}", kind);
            Reaction::Ignore
        }
        EngineFrame::Message(packet) if !packet.is_default_namespace() => {
            log::debug!("[PUSH] Ignoring packet outside the default namespace: {:?}", packet);
            Reaction::Ignore
        }
        EngineFrame::Message(SocketPacket::Connect { .. }) => {
            log::info!("[PUSH] Connected, joining room");
            Reaction::Send(socket_io::encode_event(JOIN_ROOM_EVENT, &[]))
        }
        EngineFrame::Message(SocketPacket::Event { name, args, .. }) => match PushEvent::from_socket_event(&name, &args) {
            Some(event) => Reaction::Dispatch(event),
            None => {
                log::debug!("[PUSH] Ignoring event {}", name);
                Reaction::Ignore
            }
        },
        EngineFrame::Message(SocketPacket::Disconnect { .. }) => {
            log::warn!("[PUSH] Disconnected by server");
            Reaction::Close
        }
        EngineFrame::Message(SocketPacket::ConnectError { message, .. }) => {
            log::error!("[PUSH] Connect rejected: {}", message);
            Reaction::Ignore
        }
        EngineFrame::Pong(_) | EngineFrame::Upgrade | EngineFrame::Noop => Reaction::Ignore,
    }
}

struct ChannelInner {
    socket: WebSocket,
    handlers: EventHandlers,
    on_message: RefCell<Option<Closure<dyn FnMut(MessageEvent)>>>,
    on_close: RefCell<Option<Closure<dyn FnMut(CloseEvent)>>>,
}

impl ChannelInner {
    fn send(&self, text: &str) {
        if let Err(e) = self.socket.send_with_str(text) {
            log::warn!("[PUSH] Send failed: {:?}", e);
        }
    }

    fn handle_text(&self, text: &str) {
        let frame = match socket_io::decode_frame(text) {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("[PUSH] Dropping frame {:?}: {}", text, e);
                return;
            }
        };
        match react(frame) {
            Reaction::Send(reply) => self.send(&reply),
            Reaction::Dispatch(event) => {
                self.handlers.dispatch(&event);
            }
            Reaction::Close => self.release(),
            Reaction::Ignore => {}
        }
    }

    fn release(&self) {
        if self.handlers.is_disposed() {
            return;
        }
        self.handlers.dispose();
        self.socket.set_onmessage(None);
        self.socket.set_onclose(None);
        if let Err(e) = self.socket.close() {
            log::debug!("[PUSH] Close failed: {:?}", e);
        }
        // Closures stay alive until the channel drops; release may run inside one of them
    }
}

impl Drop for ChannelInner {
    fn drop(&mut self) {
        self.release();
    }
}

/// Long-lived Socket.IO connection to the todo room
pub struct PushChannel {
    inner: Rc<ChannelInner>,
}

impl PushChannel {
    /// Open the socket; the join happens once the server acknowledges the connect
    pub fn connect(url: &str) -> TodoResult<Self> {
        let socket = WebSocket::new(url).map_err(|e| TodoError::Channel(format!("{:?}", e)))?;
        let inner = Rc::new(ChannelInner {
            socket,
            handlers: EventHandlers::new(),
            on_message: RefCell::new(None),
            on_close: RefCell::new(None),
        });

        let weak: Weak<ChannelInner> = Rc::downgrade(&inner);
        let close_weak = weak.clone();
        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
            let Some(inner) = weak.upgrade() else { return };
            match ev.data().as_string() {
                Some(text) => inner.handle_text(&text),
                None => log::debug!("[PUSH] Ignoring binary frame"),
            }
        });
        inner.socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        *inner.on_message.borrow_mut() = Some(on_message);

        let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
            log::warn!("[PUSH] Connection closed (code {}), no further events", ev.code());
            if let Some(inner) = close_weak.upgrade() {
                inner.release();
            }
        });
        inner.socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        *inner.on_close.borrow_mut() = Some(on_close);

        log::info!("[PUSH] Connecting to {}", url);
        Ok(Self { inner })
    }

    pub fn dispose(&self) {
        log::info!("[PUSH] Disposing channel");
        self.inner.release();
    }
}

impl PushSource for PushChannel {
    fn subscribe(&self, kind: EventKind, callback: EventCallback) {
        self.inner.handlers.register(kind, callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn todo(id: &str) -> Todo {
        Todo { id: id.to_string(), title: format!("Todo {}", id), completed: false }
    }

    #[test]
    fn test_decode_known_events() {
        let payload = json!({"_id":"1","title":"Todo 1","completed":false});
        assert_eq!(
            PushEvent::from_socket_event("todoCreated", &[payload.clone()]),
            Some(PushEvent::Created(todo("1")))
        );
        assert_eq!(
            PushEvent::from_socket_event("todoUpdated", &[payload]),
            Some(PushEvent::Updated(todo("1")))
        );
        assert_eq!(
            PushEvent::from_socket_event("todoDeleted", &[json!("1")]),
            Some(PushEvent::Deleted("1".to_string()))
        );
        assert_eq!(
            PushEvent::from_socket_event("todoDeleted", &[json!({"_id":"1"})]),
            Some(PushEvent::Deleted("1".to_string()))
        );
    }

    #[test]
    fn test_unknown_or_malformed_events_are_ignored() {
        assert_eq!(PushEvent::from_socket_event("somethingElse", &[json!("1")]), None);
        assert_eq!(PushEvent::from_socket_event("todoCreated", &[]), None);
        assert_eq!(PushEvent::from_socket_event("todoCreated", &[json!({"title":"no id"})]), None);
        assert_eq!(PushEvent::from_socket_event("todoDeleted", &[json!(42)]), None);
    }

    fn react_to(text: &str) -> Reaction {
        react(socket_io::decode_frame(text).unwrap())
    }

    #[test]
    fn test_handshake_then_join() {
        assert_eq!(
            react_to(r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#),
            Reaction::Send("40".to_string())
        );
        assert_eq!(react_to(r#"40{"sid":"xyz"}"#), Reaction::Send(r#"42["joinTodoRoom"]"#.to_string()));
    }

    #[test]
    fn test_ping_gets_pong() {
        assert_eq!(react_to("2"), Reaction::Send("3".to_string()));
        assert_eq!(react_to("2abc"), Reaction::Send("3abc".to_string()));
        assert_eq!(react_to("3"), Reaction::Ignore);
    }

    #[test]
    fn test_server_close_and_disconnect_end_the_channel() {
        assert_eq!(react_to("1"), Reaction::Close);
        assert_eq!(react_to("41"), Reaction::Close);
        assert_eq!(react_to("41/admin,"), Reaction::Ignore);
    }

    #[test]
    fn test_events_are_dispatched_only_on_default_namespace() {
        assert_eq!(react_to(r#"42["todoDeleted","1"]"#), Reaction::Dispatch(PushEvent::Deleted("1".to_string())));
        assert_eq!(react_to(r#"42/admin,["todoDeleted","1"]"#), Reaction::Ignore);
        assert_eq!(react_to(r#"42["chat","hi"]"#), Reaction::Ignore);
        assert_eq!(react_to(r#"44{"message":"Not authorized"}"#), Reaction::Ignore);
    }

    #[test]
    fn test_dispatch_by_kind() {
        let handlers = EventHandlers::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b"] {
            let seen = seen.clone();
            handlers.register(EventKind::Created, Rc::new(move |ev: &PushEvent| {
                seen.borrow_mut().push(format!("{}:{:?}", tag, ev.kind()));
            }));
        }
        let deleted = seen.clone();
        handlers.register(EventKind::Deleted, Rc::new(move |ev: &PushEvent| {
            deleted.borrow_mut().push(format!("d:{:?}", ev.kind()));
        }));

        assert_eq!(handlers.dispatch(&PushEvent::Created(todo("1"))), 2);
        assert_eq!(handlers.dispatch(&PushEvent::Updated(todo("1"))), 0);
        assert_eq!(handlers.dispatch(&PushEvent::Deleted("1".to_string())), 1);
        assert_eq!(*seen.borrow(), vec!["a:Created", "b:Created", "d:Deleted"]);
    }

    #[test]
    fn test_nothing_fires_after_dispose() {
        let handlers = EventHandlers::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        handlers.register(EventKind::Updated, Rc::new(move |_: &PushEvent| c.set(c.get() + 1)));

        handlers.dispatch(&PushEvent::Updated(todo("1")));
        handlers.dispose();
        handlers.dispatch(&PushEvent::Updated(todo("1")));
        assert_eq!(count.get(), 1);

        let c = count.clone();
        handlers.register(EventKind::Updated, Rc::new(move |_: &PushEvent| c.set(c.get() + 1)));
        assert_eq!(handlers.len(), 0);
        handlers.dispatch(&PushEvent::Updated(todo("1")));
        assert_eq!(count.get(), 1);
    }
}
