//! Translation of window events into inspector input

use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixels a single wheel "line" counts as
pub const LINE_HEIGHT_PX: f32 = 100.0;

/// Movement (in pixels) between press and release beyond which a press is a drag, not a click
pub const CLICK_SLOP_PX: f32 = 4.0;

/// Keyboard-level commands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    CycleView(i32),
    ToggleZoom,
    ToggleExplode,
    ToggleProjection,
    JumpToContext(usize),
}

/// Input as the inspector understands it
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InspectorInput {
    PointerMoved { x: f32, y: f32 },
    Clicked { x: f32, y: f32 },
    Scrolled { delta: f32 },
    Key(KeyAction),
}

/// Map a physical key to an action
pub fn key_action(key: KeyCode) -> Option<KeyAction> {
    let action = match key {
        KeyCode::ArrowRight => KeyAction::CycleView(1),
        KeyCode::ArrowLeft => KeyAction::CycleView(-1),
        KeyCode::KeyZ => KeyAction::ToggleZoom,
        KeyCode::KeyE => KeyAction::ToggleExplode,
        KeyCode::KeyP => KeyAction::ToggleProjection,
        KeyCode::Digit1 => KeyAction::JumpToContext(0),
        KeyCode::Digit2 => KeyAction::JumpToContext(1),
        KeyCode::Digit3 => KeyAction::JumpToContext(2),
        KeyCode::Digit4 => KeyAction::JumpToContext(3),
        KeyCode::Digit5 => KeyAction::JumpToContext(4),
        KeyCode::Digit6 => KeyAction::JumpToContext(5),
        KeyCode::Digit7 => KeyAction::JumpToContext(6),
        KeyCode::Digit8 => KeyAction::JumpToContext(7),
        KeyCode::Digit9 => KeyAction::JumpToContext(8),
        KeyCode::Digit0 => KeyAction::JumpToContext(9),
        _ => return None,
    };
    Some(action)
}

/// Wheel delta in scroll units (pixels); positive scrolls forward
pub fn scroll_units(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT_PX,
        MouseScrollDelta::PixelDelta(p) => -p.y as f32,
    }
}

/// Tracks pointer state across window events
pub struct InputState {
    /// Current cursor position
    pointer: (f32, f32),
    /// Where the left button went down, if it is held
    press_origin: Option<(f32, f32)>,
}

impl InputState {
    /// Create new input state
    pub fn new() -> Self {
        Self {
            pointer: (0.0, 0.0),
            press_origin: None,
        }
    }

    /// Process a window event
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<InspectorInput> {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(key_code),
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
                ..
            } => key_action(*key_code).map(InspectorInput::Key),
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.pointer_moved(position.x as f32, position.y as f32))
            }
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => match state {
                ElementState::Pressed => {
                    self.left_pressed();
                    None
                }
                ElementState::Released => self.left_released(),
            },
            WindowEvent::MouseWheel { delta, .. } => Some(InspectorInput::Scrolled {
                delta: scroll_units(*delta),
            }),
            _ => None,
        }
    }

    fn pointer_moved(&mut self, x: f32, y: f32) -> InspectorInput {
        self.pointer = (x, y);
        InspectorInput::PointerMoved { x, y }
    }

    fn left_pressed(&mut self) {
        self.press_origin = Some(self.pointer);
    }

    /// A release close to where the press happened is a click
    fn left_released(&mut self) -> Option<InspectorInput> {
        let (ox, oy) = self.press_origin.take()?;
        let (x, y) = self.pointer;
        let moved = ((x - ox).powi(2) + (y - oy).powi(2)).sqrt();
        (moved <= CLICK_SLOP_PX).then_some(InspectorInput::Clicked { x, y })
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
