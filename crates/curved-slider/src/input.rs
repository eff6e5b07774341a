//! Pointer and touch input, and the container surface that receives it.
//!
//! The host translates its native events into [`PointerEvent`]s and hands
//! them to the slider. Only the horizontal coordinate matters to a
//! horizontal carousel, so events carry just `x` in container pixels.

/// A pointer or touch event in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    MouseDown { x: f32 },
    MouseMove { x: f32 },
    MouseUp,
    /// The cursor left the container. Ends a drag like a release.
    MouseLeave,
    TouchStart { x: f32 },
    TouchMove { x: f32 },
    TouchEnd,
}

/// Cursor affordance shown over the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    Grab,
    Grabbing,
}

/// Which touch gestures the host should leave to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchAction {
    #[default]
    Auto,
    /// Vertical panning scrolls the page; horizontal swipes belong to the slider.
    PanY,
}

/// The surface the slider is mounted in.
pub trait Container {
    /// Current size in physical pixels.
    fn size(&self) -> (u32, u32);
    fn set_cursor(&mut self, cursor: CursorStyle);
    fn set_touch_action(&mut self, action: TouchAction);
}

/// Follows the first finger of a multi-touch gesture.
///
/// Touch platforms report every finger separately; the slider only tracks
/// the one that started the gesture, like reading `touches[0]`.
#[derive(Debug, Default)]
pub struct PrimaryTouch {
    id: Option<u64>,
}

impl PrimaryTouch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A finger went down. Returns the event to forward, if this finger
    /// becomes the primary one.
    pub fn start(&mut self, id: u64, x: f32) -> Option<PointerEvent> {
        if self.id.is_some() {
            return None;
        }
        self.id = Some(id);
        Some(PointerEvent::TouchStart { x })
    }

    pub fn moved(&mut self, id: u64, x: f32) -> Option<PointerEvent> {
        (self.id == Some(id)).then_some(PointerEvent::TouchMove { x })
    }

    /// A finger lifted or the gesture was cancelled.
    pub fn end(&mut self, id: u64) -> Option<PointerEvent> {
        if self.id == Some(id) {
            self.id = None;
            Some(PointerEvent::TouchEnd)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_touch_ignores_second_finger() {
        let mut touch = PrimaryTouch::new();
        assert_eq!(touch.start(1, 10.0), Some(PointerEvent::TouchStart { x: 10.0 }));
        assert_eq!(touch.start(2, 50.0), None);
        assert_eq!(touch.moved(2, 60.0), None);
        assert_eq!(touch.moved(1, 20.0), Some(PointerEvent::TouchMove { x: 20.0 }));
        assert_eq!(touch.end(2), None);
        assert_eq!(touch.end(1), Some(PointerEvent::TouchEnd));
        // Released, so a new finger can take over.
        assert_eq!(touch.start(2, 5.0), Some(PointerEvent::TouchStart { x: 5.0 }));
    }
}
