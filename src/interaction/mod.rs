use serde::{Deserialize, Serialize};

use crate::core::PixelRect;

/// Arrow-key pans move this many update steps at once.
pub const KEY_PAN_STEPS: i64 = 10;
/// Horizontal wheel deltas are scaled by this many update steps.
pub const WHEEL_PAN_STEPS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    /// `L`: one element forward.
    StepForward,
    /// `H`: one element back.
    StepBackward,
}

/// Backend-neutral input delivered between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Key(Key),
    Wheel { dx: f64, dy: f64 },
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Panning,
    /// A drag left its axes; nothing pans until the pointer is released.
    WaitingRelease,
}

/// Navigation requested by an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanIntent {
    /// Pan by whole update steps; positive values move back in time.
    Steps(i64),
    StepForward,
    StepBackward,
}

/// Hit-test box of one axes; only axes holding artists accept drags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxesHitBox {
    pub rect: PixelRect,
    pub active: bool,
}

/// Figure geometry needed to translate pointer motion into steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionContext<'a> {
    pub axes: &'a [AxesHitBox],
    pub x_span: f64,
    pub timeframe: f64,
}

impl InteractionContext<'_> {
    /// Index of the active axes under the pointer.
    #[must_use]
    pub fn axes_at(&self, x: f64, y: f64) -> Option<usize> {
        self.axes
            .iter()
            .position(|hit| hit.rect.contains(x, y))
            .filter(|index| self.axes[*index].active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    axes: usize,
    last_x: f64,
    accumulator: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    mode: InteractionMode,
    drag: Option<DragState>,
    pointer: Option<(f64, f64)>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            drag: None,
            pointer: None,
        }
    }
}

impl InteractionState {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    /// Last pointer position seen, in figure pixels.
    #[must_use]
    pub fn pointer(self) -> Option<(f64, f64)> {
        self.pointer
    }

    /// Drag distance accumulated in x units and not yet turned into steps.
    #[must_use]
    pub fn pending_drag(self) -> f64 {
        self.drag.map_or(0.0, |drag| drag.accumulator)
    }

    pub fn on_event(
        &mut self,
        event: InputEvent,
        context: &InteractionContext<'_>,
    ) -> Option<PanIntent> {
        match event {
            InputEvent::Key(Key::Left) => Some(PanIntent::Steps(KEY_PAN_STEPS)),
            InputEvent::Key(Key::Right) => Some(PanIntent::Steps(-KEY_PAN_STEPS)),
            InputEvent::Key(Key::StepForward) => Some(PanIntent::StepForward),
            InputEvent::Key(Key::StepBackward) => Some(PanIntent::StepBackward),
            InputEvent::Wheel { dx, dy } => {
                if dy == 0.0 && dx != 0.0 && dx.is_finite() {
                    let steps = (WHEEL_PAN_STEPS * dx).trunc() as i64;
                    (steps != 0).then_some(PanIntent::Steps(steps))
                } else {
                    None
                }
            }
            InputEvent::PointerDown { x, y } => {
                self.pointer = Some((x, y));
                self.on_pointer_down(x, y, context);
                None
            }
            InputEvent::PointerMove { x, y } => {
                self.pointer = Some((x, y));
                self.on_pointer_move(x, y, context)
            }
            InputEvent::PointerUp => {
                self.mode = InteractionMode::Idle;
                self.drag = None;
                None
            }
        }
    }

    fn on_pointer_down(&mut self, x: f64, y: f64, context: &InteractionContext<'_>) {
        if self.mode == InteractionMode::WaitingRelease {
            return;
        }
        match context.axes_at(x, y) {
            Some(axes) => {
                self.mode = InteractionMode::Panning;
                self.drag = Some(DragState {
                    axes,
                    last_x: x,
                    accumulator: 0.0,
                });
            }
            None => self.cancel_drag(),
        }
    }

    fn on_pointer_move(
        &mut self,
        x: f64,
        y: f64,
        context: &InteractionContext<'_>,
    ) -> Option<PanIntent> {
        let mut drag = self.drag?;
        if context.axes_at(x, y) != Some(drag.axes) {
            self.cancel_drag();
            return None;
        }

        let width = context.axes[drag.axes].rect.width;
        if x == drag.last_x || width <= 0.0 || context.timeframe <= 0.0 {
            return None;
        }
        drag.accumulator += (x - drag.last_x) / width * context.x_span;
        drag.last_x = x;

        let intent = if drag.accumulator.abs() > context.timeframe {
            let steps = (drag.accumulator / context.timeframe).trunc() as i64;
            drag.accumulator = 0.0;
            Some(PanIntent::Steps(steps))
        } else {
            None
        };
        self.drag = Some(drag);
        intent
    }

    fn cancel_drag(&mut self) {
        self.mode = InteractionMode::WaitingRelease;
        self.drag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AxesHitBox, InputEvent, InteractionContext, InteractionMode, InteractionState, Key,
        PanIntent,
    };
    use crate::core::PixelRect;

    const BOXES: [AxesHitBox; 2] = [
        AxesHitBox {
            rect: PixelRect {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 100.0,
            },
            active: true,
        },
        AxesHitBox {
            rect: PixelRect {
                x: 0.0,
                y: 100.0,
                width: 100.0,
                height: 100.0,
            },
            active: false,
        },
    ];

    fn context() -> InteractionContext<'static> {
        InteractionContext {
            axes: &BOXES,
            x_span: 100.0,
            timeframe: 10.0,
        }
    }

    #[test]
    fn keys_and_wheel_map_to_steps() {
        let mut state = InteractionState::default();
        let ctx = context();
        assert_eq!(
            state.on_event(InputEvent::Key(Key::Left), &ctx),
            Some(PanIntent::Steps(10))
        );
        assert_eq!(
            state.on_event(InputEvent::Key(Key::Right), &ctx),
            Some(PanIntent::Steps(-10))
        );
        assert_eq!(
            state.on_event(InputEvent::Wheel { dx: -0.5, dy: 0.0 }, &ctx),
            Some(PanIntent::Steps(-5))
        );
        assert_eq!(state.on_event(InputEvent::Wheel { dx: 1.0, dy: 1.0 }, &ctx), None);
    }

    #[test]
    fn drag_accumulates_until_one_timeframe() {
        let mut state = InteractionState::default();
        let ctx = context();
        state.on_event(InputEvent::PointerDown { x: 10.0, y: 10.0 }, &ctx);
        assert_eq!(state.mode(), InteractionMode::Panning);
        assert_eq!(
            state.on_event(InputEvent::PointerMove { x: 15.0, y: 10.0 }, &ctx),
            None
        );
        assert_eq!(
            state.on_event(InputEvent::PointerMove { x: 35.0, y: 10.0 }, &ctx),
            Some(PanIntent::Steps(2))
        );
        assert_eq!(state.pending_drag(), 0.0);
    }

    #[test]
    fn leaving_the_axes_cancels_until_release() {
        let mut state = InteractionState::default();
        let ctx = context();
        state.on_event(InputEvent::PointerDown { x: 10.0, y: 10.0 }, &ctx);
        state.on_event(InputEvent::PointerMove { x: 10.0, y: 150.0 }, &ctx);
        assert_eq!(state.mode(), InteractionMode::WaitingRelease);

        state.on_event(InputEvent::PointerDown { x: 10.0, y: 10.0 }, &ctx);
        assert_eq!(
            state.on_event(InputEvent::PointerMove { x: 90.0, y: 10.0 }, &ctx),
            None
        );

        state.on_event(InputEvent::PointerUp, &ctx);
        assert_eq!(state.mode(), InteractionMode::Idle);
        assert_eq!(state.pointer(), Some((90.0, 10.0)));
    }

    #[test]
    fn axes_without_artists_reject_drags() {
        let mut state = InteractionState::default();
        state.on_event(InputEvent::PointerDown { x: 10.0, y: 150.0 }, &context());
        assert_eq!(state.mode(), InteractionMode::WaitingRelease);
    }
}
