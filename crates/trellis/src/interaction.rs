//! Pointer interaction state.
//!
//! Every node keeps one [`MouseTracker`] per [`MouseButton`]. The tracker turns
//! raw per-frame pointer signals into an [`InteractionState`] plus a one-frame
//! click edge. The canvas then combines tracker states across the tree using
//! [`InteractionState::merge`] and [`InheritChildrenStateFlags`].

use serde::{Deserialize, Serialize};

/// Interaction state of a node for one mouse button, ordered by merge
/// strength.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum InteractionState {
    /// Not hovered, not pressed.
    #[default]
    Default,
    /// Pointer is over the node.
    Hovered,
    /// The button was pressed on the node and is still held over it.
    Pressed,
    /// The node or an ancestor is not interactable.
    Disabled,
}

/// How [`InteractionState::merge`] treats a `Disabled` right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisabledMerge {
    /// A disabled contribution disables the result.
    Apply,
    /// A disabled contribution is treated as `Default`.
    Ignore,
}

impl InteractionState {
    /// Combine this state with a contribution from elsewhere in the tree.
    ///
    /// A disabled `self` always stays disabled. A disabled `other` disables
    /// the result only with [`DisabledMerge::Apply`]. Otherwise the stronger
    /// of the two wins, so hovered over pressed resolves to pressed.
    pub fn merge(self, other: Self, disabled: DisabledMerge) -> Self {
        if self == Self::Disabled {
            return Self::Disabled;
        }
        if other == Self::Disabled {
            return match disabled {
                DisabledMerge::Apply => Self::Disabled,
                DisabledMerge::Ignore => self,
            };
        }
        self.max(other)
    }

    /// Is this `Hovered` or `Pressed`?
    pub fn is_engaged(self) -> bool {
        matches!(self, Self::Hovered | Self::Pressed)
    }
}

/// Which descendant states a node adopts as its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InheritChildrenStateFlags {
    /// Adopt hovered descendants.
    pub hovered: bool,
    /// Adopt pressed descendants and their clicks.
    pub pressed: bool,
}

impl InheritChildrenStateFlags {
    /// Inherit nothing.
    pub const NONE: Self = Self {
        hovered: false,
        pressed: false,
    };
    /// Inherit hover only.
    pub const HOVERED: Self = Self {
        hovered: true,
        pressed: false,
    };
    /// Inherit press only.
    pub const PRESSED: Self = Self {
        hovered: false,
        pressed: true,
    };
    /// Inherit hover and press.
    pub const ALL: Self = Self {
        hovered: true,
        pressed: true,
    };

    /// Does this node inherit anything?
    pub fn any(self) -> bool {
        self.hovered || self.pressed
    }

    /// Reduce a child's state to what this node opts into. Pressed falls back
    /// to hovered when only hover is inherited, and engaged states fall back
    /// to default when nothing matching is inherited. Disabled passes
    /// through; merges drop it separately.
    pub fn demote(self, state: InteractionState) -> InteractionState {
        match state {
            InteractionState::Pressed if self.pressed => InteractionState::Pressed,
            InteractionState::Pressed | InteractionState::Hovered if self.hovered => {
                InteractionState::Hovered
            }
            InteractionState::Pressed | InteractionState::Hovered => InteractionState::Default,
            other => other,
        }
    }
}

/// A mouse button tracked by the interaction system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
}

impl MouseButton {
    /// Both tracked buttons, left first.
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    /// Slot index for per-button arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// Button signals for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonInput {
    /// Went down this frame.
    pub down: bool,
    /// Is held this frame.
    pub pressed: bool,
    /// Went up this frame.
    pub up: bool,
}

impl ButtonInput {
    /// Button went down this frame and is held.
    pub const DOWN: Self = Self {
        down: true,
        pressed: true,
        up: false,
    };
    /// Button is held.
    pub const HELD: Self = Self {
        down: false,
        pressed: true,
        up: false,
    };
    /// Button went up this frame.
    pub const UP: Self = Self {
        down: false,
        pressed: false,
        up: true,
    };
}

/// Per-node, per-button press and hover tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseTracker {
    /// The press began over this node and has not been released.
    press_started: bool,
    /// Pointer is over the node this frame.
    hovered: bool,
    /// Press is held and the pointer is over the node.
    pressed: bool,
    /// A click completed this frame.
    clicked: bool,
    /// Interactable as of the last update.
    interactable: bool,
}

impl Default for MouseTracker {
    fn default() -> Self {
        Self {
            press_started: false,
            hovered: false,
            pressed: false,
            clicked: false,
            interactable: true,
        }
    }
}

impl MouseTracker {
    /// Advance one frame.
    ///
    /// `over_for_hover` and `over_for_press` are usually the same geometric
    /// test, widened by inherited child states for nodes that opt in.
    pub fn update(
        &mut self,
        input: ButtonInput,
        over_for_hover: bool,
        over_for_press: bool,
        interactable: bool,
    ) {
        self.clicked = false;
        self.interactable = interactable;
        if !interactable {
            self.press_started = false;
            self.hovered = false;
            self.pressed = false;
            return;
        }
        if input.down && over_for_press {
            self.press_started = true;
        }
        if input.up {
            if self.press_started && over_for_press {
                self.clicked = true;
            }
            self.press_started = false;
        }
        if !input.pressed && !input.down {
            self.press_started = false;
        }
        self.hovered = over_for_hover;
        self.pressed = self.press_started && over_for_press;
    }

    /// Forget any press in progress.
    pub fn reset(&mut self) {
        *self = Self {
            interactable: self.interactable,
            ..Self::default()
        };
    }

    /// State implied by the last update.
    pub fn state(&self) -> InteractionState {
        if !self.interactable {
            InteractionState::Disabled
        } else if self.pressed {
            InteractionState::Pressed
        } else if self.hovered {
            InteractionState::Hovered
        } else {
            InteractionState::Default
        }
    }

    /// Did a click complete on the last update?
    pub fn clicked(&self) -> bool {
        self.clicked
    }

    /// Is a press in progress that began over this node?
    pub fn press_started(&self) -> bool {
        self.press_started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InteractionState::{Disabled, Hovered, Pressed};

    /// Shorthand for the resting state.
    const IDLE: InteractionState = InteractionState::Default;

    #[test]
    fn merge_order() {
        assert_eq!(Hovered.merge(Pressed, DisabledMerge::Apply), Pressed);
        assert_eq!(Pressed.merge(Hovered, DisabledMerge::Apply), Pressed);
        assert_eq!(IDLE.merge(Hovered, DisabledMerge::Ignore), Hovered);
        assert_eq!(IDLE.merge(IDLE, DisabledMerge::Ignore), IDLE);
    }

    #[test]
    fn merge_disabled() {
        assert_eq!(Disabled.merge(Pressed, DisabledMerge::Ignore), Disabled);
        assert_eq!(Hovered.merge(Disabled, DisabledMerge::Apply), Disabled);
        assert_eq!(Hovered.merge(Disabled, DisabledMerge::Ignore), Hovered);
    }

    #[test]
    fn demotion() {
        let h = InheritChildrenStateFlags::HOVERED;
        assert_eq!(h.demote(Pressed), Hovered);
        assert_eq!(h.demote(Hovered), Hovered);
        let p = InheritChildrenStateFlags::PRESSED;
        assert_eq!(p.demote(Pressed), Pressed);
        assert_eq!(p.demote(Hovered), IDLE);
        let n = InheritChildrenStateFlags::NONE;
        assert_eq!(n.demote(Pressed), IDLE);
        assert_eq!(n.demote(Disabled), Disabled);
        assert!(InheritChildrenStateFlags::ALL.any());
        assert!(!n.any());
    }

    #[test]
    fn click_is_one_frame() {
        let mut t = MouseTracker::default();
        t.update(ButtonInput::default(), true, true, true);
        assert_eq!(t.state(), Hovered);
        t.update(ButtonInput::DOWN, true, true, true);
        assert_eq!(t.state(), Pressed);
        t.update(ButtonInput::HELD, true, true, true);
        assert_eq!(t.state(), Pressed);
        t.update(ButtonInput::UP, true, true, true);
        assert!(t.clicked());
        assert_eq!(t.state(), Hovered);
        t.update(ButtonInput::default(), true, true, true);
        assert!(!t.clicked());
    }

    #[test]
    fn release_outside_does_not_click() {
        let mut t = MouseTracker::default();
        t.update(ButtonInput::DOWN, true, true, true);
        t.update(ButtonInput::HELD, false, false, true);
        assert_eq!(t.state(), IDLE);
        t.update(ButtonInput::HELD, true, true, true);
        assert_eq!(t.state(), Pressed);
        t.update(ButtonInput::UP, false, false, true);
        assert!(!t.clicked());
    }

    #[test]
    fn press_started_elsewhere_does_not_press() {
        let mut t = MouseTracker::default();
        t.update(ButtonInput::DOWN, false, false, true);
        t.update(ButtonInput::HELD, true, true, true);
        assert_eq!(t.state(), Hovered);
        t.update(ButtonInput::UP, true, true, true);
        assert!(!t.clicked());
    }

    #[test]
    fn not_interactable_is_disabled() {
        let mut t = MouseTracker::default();
        t.update(ButtonInput::DOWN, true, true, true);
        t.update(ButtonInput::HELD, true, true, false);
        assert_eq!(t.state(), Disabled);
        assert!(!t.press_started());
        t.update(ButtonInput::UP, true, true, true);
        assert!(!t.clicked());
    }
}
