use glam::Vec2;

/// A camera action produced from raw pointer input.
///
/// Controls consume actions, never windowing events, so the same controls work
/// for any host that can produce these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Drag with the primary button, in pixels.
    Rotate(Vec2),
    /// Drag with the secondary button, in pixels.
    Pan(Vec2),
    /// Wheel movement in lines; positive scrolls towards the user.
    Zoom(f32),
    /// Input that maps to nothing.
    Noop,
}

/// Pointer buttons the controls care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Turns button and cursor events into [`PointerAction`]s.
#[derive(Debug, Default)]
pub struct PointerTracker {
    held: Option<PointerButton>,
    last: Option<Vec2>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> Option<PointerButton> {
        self.held
    }

    pub fn button(&mut self, button: PointerButton, pressed: bool) {
        tracing::trace!(?button, pressed, "pointer button");
        if pressed {
            if self.held.is_none() {
                self.held = Some(button);
            }
        } else if self.held == Some(button) {
            self.held = None;
        }
    }

    /// Cursor moved to `position`; yields the drag action, if any.
    pub fn moved(&mut self, position: Vec2) -> PointerAction {
        let delta = self.last.map(|last| position - last);
        self.last = Some(position);
        match (self.held, delta) {
            (Some(PointerButton::Primary), Some(d)) => PointerAction::Rotate(d),
            (Some(PointerButton::Secondary), Some(d)) => PointerAction::Pan(d),
            _ => PointerAction::Noop,
        }
    }

    /// Pointer left the surface; the next move starts a fresh drag.
    pub fn left(&mut self) {
        self.last = None;
        self.held = None;
    }

    pub fn wheel(&self, lines: f32) -> PointerAction {
        if lines == 0.0 {
            PointerAction::Noop
        } else {
            PointerAction::Zoom(lines)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_without_button_is_noop() {
        let mut t = PointerTracker::new();
        assert_eq!(t.moved(Vec2::new(1.0, 1.0)), PointerAction::Noop);
        assert_eq!(t.moved(Vec2::new(5.0, 1.0)), PointerAction::Noop);
    }

    #[test]
    fn primary_drag_rotates() {
        let mut t = PointerTracker::new();
        t.moved(Vec2::new(10.0, 10.0));
        t.button(PointerButton::Primary, true);
        assert_eq!(
            t.moved(Vec2::new(13.0, 8.0)),
            PointerAction::Rotate(Vec2::new(3.0, -2.0))
        );
        t.button(PointerButton::Primary, false);
        assert_eq!(t.held(), None);
    }

    #[test]
    fn secondary_drag_pans_and_first_button_wins() {
        let mut t = PointerTracker::new();
        t.moved(Vec2::ZERO);
        t.button(PointerButton::Secondary, true);
        t.button(PointerButton::Primary, true);
        assert_eq!(t.held(), Some(PointerButton::Secondary));
        assert_eq!(
            t.moved(Vec2::new(1.0, 2.0)),
            PointerAction::Pan(Vec2::new(1.0, 2.0))
        );
    }

    #[test]
    fn leaving_resets_drag_origin() {
        let mut t = PointerTracker::new();
        t.moved(Vec2::ZERO);
        t.button(PointerButton::Primary, true);
        t.left();
        t.button(PointerButton::Primary, true);
        assert_eq!(t.moved(Vec2::new(50.0, 50.0)), PointerAction::Noop);
    }

    #[test]
    fn wheel_zero_is_noop() {
        let t = PointerTracker::new();
        assert_eq!(t.wheel(0.0), PointerAction::Noop);
        assert_eq!(t.wheel(-1.0), PointerAction::Zoom(-1.0));
    }
}
