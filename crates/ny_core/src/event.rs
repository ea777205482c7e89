//! Event model
//!
//! An [`Event`] is a tagged [`EventKind`] plus a weak reference to its target
//! handler and an optional backend payload. Every kind has a stable numeric
//! [`EventType`] used for callback routing and queue coalescing.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::data::DataOffer;
use crate::error::{CoreError, Result};
use crate::handler::{EventHandler, HandlerRef};
use crate::keys::{KeyboardModifiers, Keycode, MouseButton, ToplevelState};

/// Event type identifier
pub type EventType = u32;

/// Stable ids of the built-in event kinds
///
/// Ids are grouped per subsystem so backend extensions can never collide
/// with the core vocabulary.
pub mod event_types {
    use super::EventType;

    // Window events: 11..=20
    pub const SIZE: EventType = 11;
    pub const POSITION: EventType = 12;
    pub const DRAW: EventType = 13;
    pub const SHOW: EventType = 14;
    pub const CLOSE: EventType = 15;
    pub const REFRESH: EventType = 16;
    pub const DESTROY: EventType = 17;
    pub const REPARENT: EventType = 18;
    pub const STATE: EventType = 19;

    // Input events: 21..=26
    pub const MOUSE_MOVE: EventType = 21;
    pub const MOUSE_BUTTON: EventType = 22;
    pub const MOUSE_WHEEL: EventType = 23;
    pub const MOUSE_CROSS: EventType = 24;
    pub const KEY: EventType = 25;
    pub const FOCUS: EventType = 26;

    // Data exchange events: 30..
    pub const DATA_OFFER: EventType = 30;
    pub const DND_ENTER: EventType = 31;
    pub const DND_MOVE: EventType = 32;
    pub const DND_LEAVE: EventType = 33;
    pub const DND_DROP: EventType = 34;

    /// First id available to backend-private events
    pub const CUSTOM_BEGIN: EventType = 1000;
}

/// Backend-specific payload attached to an event
///
/// Implemented for every `Clone + Debug + Send + Sync` type, so backends can
/// attach their raw native structs directly.
pub trait EventData: Any + Send + Sync + fmt::Debug {
    fn clone_box(&self) -> Box<dyn EventData>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> EventData for T
where
    T: Any + Clone + Send + Sync + fmt::Debug,
{
    fn clone_box(&self) -> Box<dyn EventData> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Clone for Box<dyn EventData> {
    fn clone(&self) -> Self {
        // Dispatch through the vtable, not the blanket impl for the box itself.
        (**self).clone_box()
    }
}

/// Backend-private event in the `CUSTOM_BEGIN..` range
#[derive(Clone)]
pub struct CustomEvent {
    type_id: EventType,
    overrideable: bool,
    payload: Arc<dyn Any + Send + Sync>,
}

impl CustomEvent {
    /// Fails for ids below [`event_types::CUSTOM_BEGIN`]
    pub fn new<T>(type_id: EventType, overrideable: bool, payload: T) -> Result<Self>
    where
        T: Any + Send + Sync,
    {
        if type_id < event_types::CUSTOM_BEGIN {
            return Err(CoreError::InvalidEventType(type_id));
        }
        Ok(Self {
            type_id,
            overrideable,
            payload: Arc::new(payload),
        })
    }

    pub fn type_id(&self) -> EventType {
        self.type_id
    }

    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref()
    }
}

impl fmt::Debug for CustomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomEvent")
            .field("type_id", &self.type_id)
            .field("overrideable", &self.overrideable)
            .finish_non_exhaustive()
    }
}

/// The concrete event variants
#[derive(Clone, Debug)]
pub enum EventKind {
    /// Window was resized
    Size { size: (u32, u32) },
    /// Window was moved
    Position { position: (i32, i32) },
    /// Window contents must be drawn
    Draw,
    /// Window was shown or hidden
    Show { shown: bool },
    /// Close was requested (e.g. close button clicked)
    Close,
    /// Redraw scheduled through `refresh()`
    Refresh,
    /// Native window is gone
    Destroy,
    /// Window got a new native parent
    Reparent { parent: Option<u64> },
    /// Toplevel state changed
    State { state: ToplevelState },

    MouseMove {
        position: (i32, i32),
        delta: (i32, i32),
    },
    MouseButton {
        button: MouseButton,
        pressed: bool,
        position: (i32, i32),
    },
    MouseWheel {
        /// Horizontal and vertical scroll amount, in lines
        value: (f32, f32),
    },
    MouseCross {
        entered: bool,
        position: (i32, i32),
    },
    Key {
        keycode: Keycode,
        pressed: bool,
        /// Decoded text, only for presses that produce any
        text: Option<String>,
        modifiers: KeyboardModifiers,
        repeat: bool,
    },
    /// Keyboard focus gained or lost
    Focus { gained: bool },

    /// Selection (clipboard) owner changed
    DataOffer { offer: Arc<dyn DataOffer> },
    DndEnter {
        position: (i32, i32),
        offer: Arc<dyn DataOffer>,
    },
    DndMove { position: (i32, i32) },
    DndLeave,
    DndDrop {
        position: (i32, i32),
        offer: Arc<dyn DataOffer>,
    },

    Custom(CustomEvent),
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        use event_types::*;
        match self {
            EventKind::Size { .. } => SIZE,
            EventKind::Position { .. } => POSITION,
            EventKind::Draw => DRAW,
            EventKind::Show { .. } => SHOW,
            EventKind::Close => CLOSE,
            EventKind::Refresh => REFRESH,
            EventKind::Destroy => DESTROY,
            EventKind::Reparent { .. } => REPARENT,
            EventKind::State { .. } => STATE,
            EventKind::MouseMove { .. } => MOUSE_MOVE,
            EventKind::MouseButton { .. } => MOUSE_BUTTON,
            EventKind::MouseWheel { .. } => MOUSE_WHEEL,
            EventKind::MouseCross { .. } => MOUSE_CROSS,
            EventKind::Key { .. } => KEY,
            EventKind::Focus { .. } => FOCUS,
            EventKind::DataOffer { .. } => DATA_OFFER,
            EventKind::DndEnter { .. } => DND_ENTER,
            EventKind::DndMove { .. } => DND_MOVE,
            EventKind::DndLeave => DND_LEAVE,
            EventKind::DndDrop { .. } => DND_DROP,
            EventKind::Custom(custom) => custom.type_id,
        }
    }

    /// Whether a newer queued event of the same type may replace this one
    pub fn overrideable(&self) -> bool {
        match self {
            EventKind::Size { .. }
            | EventKind::Position { .. }
            | EventKind::Draw
            | EventKind::Refresh
            | EventKind::DndMove { .. } => true,
            EventKind::Custom(custom) => custom.overrideable,
            _ => false,
        }
    }

    /// Whether the event may meaningfully propagate past a handler that ignores it
    pub fn passable(&self) -> bool {
        matches!(
            self,
            EventKind::MouseMove { .. }
                | EventKind::MouseButton { .. }
                | EventKind::MouseWheel { .. }
                | EventKind::MouseCross { .. }
                | EventKind::Key { .. }
        )
    }
}

/// A dispatched event
#[derive(Clone)]
pub struct Event {
    /// Target handler. `None` means "no specific recipient".
    pub handler: Option<HandlerRef>,
    /// Backend payload, deep-cloned with the event
    pub data: Option<Box<dyn EventData>>,
    pub kind: EventKind,
}

impl Event {
    /// Create an event without a target
    pub fn new(kind: EventKind) -> Self {
        Self {
            handler: None,
            data: None,
            kind,
        }
    }

    /// Create a backend-private event
    pub fn custom<T>(type_id: EventType, overrideable: bool, payload: T) -> Result<Self>
    where
        T: Any + Send + Sync,
    {
        let custom = CustomEvent::new(type_id, overrideable, payload)?;
        Ok(Self::new(EventKind::Custom(custom)))
    }

    /// Set the target handler
    pub fn with_handler(mut self, handler: HandlerRef) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Target a shared handler
    pub fn to<H: EventHandler + 'static>(self, handler: &Arc<H>) -> Self {
        self.with_handler(crate::handler::handler_ref(handler))
    }

    /// Attach a backend payload
    pub fn with_data<D: EventData>(mut self, data: D) -> Self {
        self.data = Some(Box::new(data));
        self
    }

    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    pub fn overrideable(&self) -> bool {
        self.kind.overrideable()
    }

    pub fn passable(&self) -> bool {
        self.kind.passable()
    }

    /// Borrow the payload as `T`
    pub fn data<T: Any>(&self) -> Option<&T> {
        self.data.as_deref()?.as_any().downcast_ref()
    }

    /// Mutably borrow the payload as `T`
    pub fn data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.data.as_deref_mut()?.as_any_mut().downcast_mut()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("type", &self.event_type())
            .field("kind", &self.kind)
            .field("has_handler", &self.handler.is_some())
            .field("data", &self.data)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct RawNative {
        serial: u32,
        bytes: Vec<u8>,
    }

    #[test]
    fn test_clone_keeps_type_and_flags() {
        let event = Event::new(EventKind::Size { size: (640, 480) });
        let copy = event.clone();
        assert_eq!(copy.event_type(), event_types::SIZE);
        assert_eq!(copy.overrideable(), event.overrideable());
        assert_eq!(copy.passable(), event.passable());
        match copy.kind {
            EventKind::Size { size } => assert_eq!(size, (640, 480)),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_clone_deep_copies_data() {
        let event = Event::new(EventKind::Draw).with_data(RawNative {
            serial: 7,
            bytes: vec![1, 2, 3],
        });
        let mut copy = event.clone();

        let data = copy.data_mut::<RawNative>().expect("payload survives clone");
        data.serial = 8;
        data.bytes.push(4);

        let original = event.data::<RawNative>().expect("original payload");
        assert_eq!(original.serial, 7);
        assert_eq!(original.bytes, vec![1, 2, 3]);
        assert_eq!(copy.data::<RawNative>().map(|d| d.serial), Some(8));
    }

    #[test]
    fn test_data_downcast_to_wrong_type_is_none() {
        let event = Event::new(EventKind::Draw).with_data(5u32);
        assert!(event.data::<String>().is_none());
        assert_eq!(event.data::<u32>(), Some(&5));
    }

    #[test]
    fn test_custom_event_range_is_enforced() {
        assert_eq!(
            Event::custom(30, false, ()).err(),
            Some(CoreError::InvalidEventType(30))
        );

        let event = Event::custom(1042, true, "payload").expect("custom id in range");
        assert_eq!(event.event_type(), 1042);
        assert!(event.overrideable());
        match &event.kind {
            EventKind::Custom(custom) => assert_eq!(custom.payload::<&str>(), Some(&"payload")),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_event_type_ranges() {
        let window = [
            EventKind::Size { size: (1, 1) },
            EventKind::Position { position: (0, 0) },
            EventKind::Draw,
            EventKind::Show { shown: true },
            EventKind::Close,
            EventKind::Refresh,
            EventKind::Destroy,
            EventKind::Reparent { parent: None },
            EventKind::State {
                state: ToplevelState::Maximized,
            },
        ];
        for kind in &window {
            assert!((11..=20).contains(&kind.event_type()), "{:?}", kind);
        }

        let input = [
            EventKind::MouseMove {
                position: (0, 0),
                delta: (0, 0),
            },
            EventKind::MouseWheel { value: (0.0, 1.0) },
            EventKind::Focus { gained: true },
        ];
        for kind in &input {
            assert!((21..=26).contains(&kind.event_type()), "{:?}", kind);
        }

        assert!(EventKind::DndLeave.event_type() >= 30);
    }

    #[test]
    fn test_only_high_frequency_kinds_are_overrideable() {
        assert!(EventKind::Size { size: (1, 1) }.overrideable());
        assert!(EventKind::Draw.overrideable());
        assert!(!EventKind::Close.overrideable());
        assert!(!EventKind::MouseButton {
            button: MouseButton::Left,
            pressed: true,
            position: (0, 0),
        }
        .overrideable());
    }
}
