/// Raw host input, in world coordinates for pointers and browser key codes
/// for keys. `KeyBindings` turns these into gameplay controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    KeyDown { key_code: u32 },
    KeyUp { key_code: u32 },
    /// Sent by the page chrome (menu buttons). `kind` picks the action.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// Events pushed by the host since the last simulation tick.
///
/// The runner clears the queue only after a frame that ran at least one
/// tick, so a key tapped during a short frame is not lost.
#[derive(Debug, Default, Clone)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drop every pending event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Whether a custom event of `kind` is pending.
    pub fn has_custom(&self, kind: u32) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, InputEvent::Custom { kind: k, .. } if *k == kind))
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl FromIterator<InputEvent> for InputQueue {
    fn from_iter<I: IntoIterator<Item = InputEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_empties_the_queue() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::KeyDown { key_code: 32 });
        assert_eq!(q.len(), 2);
        q.clear();
        assert!(q.is_empty());
    }

    #[test]
    fn finds_custom_events_by_kind() {
        let q: InputQueue = [
            InputEvent::KeyUp { key_code: 65 },
            InputEvent::Custom { kind: 7, a: 1.5, b: 2.5, c: 3.5 },
        ]
        .into_iter()
        .collect();
        assert!(q.has_custom(7));
        assert!(!q.has_custom(1));
        assert_eq!(q.iter().count(), 2);
    }
}
