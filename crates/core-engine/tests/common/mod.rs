#![allow(dead_code)] // Shared across integration test binaries; each uses a subset of helpers.

use core_engine::{
    BufferEvent, EngineSettings, InputSourceId, InputSourcePort, SwitchEngine, SwitchOutcome,
};
use core_script::PatternSet;
use core_text::Buffer;
use std::cell::RefCell;
use std::rc::Rc;

pub const PRIMARY: &str = "layout.abc";
pub const SECONDARY: &str = "im.cjk";

pub fn buf(content: &str) -> Buffer {
    Buffer::from_str("t", content)
}

#[derive(Debug, Default)]
pub struct PortState {
    pub current: Option<InputSourceId>,
    pub activations: Vec<InputSourceId>,
}

/// Test double recording every activation and echoing the last one back as
/// the current source, the way a real input method would.
#[derive(Clone, Default)]
pub struct SharedPort(Rc<RefCell<PortState>>);

impl SharedPort {
    pub fn with_current(id: &str) -> Self {
        let port = Self::default();
        port.0.borrow_mut().current = Some(InputSourceId::new(id));
        port
    }

    pub fn current(&self) -> Option<InputSourceId> {
        self.0.borrow().current.clone()
    }

    pub fn activations(&self) -> Vec<InputSourceId> {
        self.0.borrow().activations.clone()
    }
}

impl InputSourcePort for SharedPort {
    fn current(&mut self) -> Option<InputSourceId> {
        self.0.borrow().current.clone()
    }

    fn activate(&mut self, id: &InputSourceId) {
        let mut state = self.0.borrow_mut();
        state.activations.push(id.clone());
        state.current = Some(id.clone());
    }
}

pub fn engine_with(port: &SharedPort) -> SwitchEngine {
    let settings = EngineSettings::new(PatternSet::default(), PRIMARY, SECONDARY);
    SwitchEngine::new(settings, Box::new(port.clone()))
}

/// Stand-in for the host's cursor event wiring. A real adapter hooks the
/// editor's cursor-moved signal while the engine observes and unhooks it
/// when observation stops; this fake tracks those transitions and refuses
/// delivery while unsubscribed.
#[derive(Debug, Default)]
pub struct FakeCursorFeed {
    pub subscribed: bool,
    pub subscribe_count: usize,
    pub unsubscribe_count: usize,
}

impl FakeCursorFeed {
    pub fn sync(&mut self, engine: &SwitchEngine) {
        let want = engine.is_observing_cursor();
        if want && !self.subscribed {
            self.subscribed = true;
            self.subscribe_count += 1;
        } else if !want && self.subscribed {
            self.subscribed = false;
            self.unsubscribe_count += 1;
        }
    }

    pub fn deliver(
        &mut self,
        engine: &mut SwitchEngine,
        text: &Buffer,
        cursor: usize,
    ) -> Option<SwitchOutcome> {
        if !self.subscribed {
            return None;
        }
        let outcome = engine.handle(text, BufferEvent::CursorMoved { cursor });
        self.sync(engine);
        Some(outcome)
    }
}
