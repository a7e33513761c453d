use crate::{
    core::{canvas::Canvas, context::FrameInput, id::NodeId},
    error::Result,
    geom::Vec2,
    interaction::{ButtonInput, MouseButton},
};

/// Frame length used by the harness, in seconds.
pub const FRAME_TIME: f64 = 1.0 / 60.0;

/// Drives a [`Canvas`] the way a host application would: every call runs one
/// or more frames with synthesized pointer input. Button state persists
/// between calls, so a press followed by several moves is a drag.
pub struct Harness {
    /// The canvas under test.
    pub canvas: Canvas,
    /// Current pointer position.
    pub cursor: Vec2,
    /// Seconds per frame.
    pub delta_time: f64,
    /// Held state of the left and right buttons.
    held: [bool; 2],
}

impl Harness {
    /// A harness around a fresh canvas of `size`.
    pub fn new(size: Vec2) -> Self {
        Self::with_canvas(Canvas::new(size))
    }

    /// A harness around an existing canvas.
    pub fn with_canvas(canvas: Canvas) -> Self {
        Self {
            canvas,
            cursor: Vec2::ZERO,
            delta_time: FRAME_TIME,
            held: [false; 2],
        }
    }

    /// The canvas root.
    pub fn root(&self) -> NodeId {
        self.canvas.root()
    }

    /// Base input for the next frame: cursor plus held buttons.
    fn input(&self) -> FrameInput {
        let held = |b: MouseButton| {
            if self.held[b.index()] {
                ButtonInput::HELD
            } else {
                ButtonInput::default()
            }
        };
        FrameInput {
            cursor: self.cursor,
            left: held(MouseButton::Left),
            right: held(MouseButton::Right),
            wheel: Vec2::ZERO,
        }
    }

    /// Run one frame with `input`.
    fn run(&mut self, input: &FrameInput) -> Result<()> {
        self.canvas.update(input, self.delta_time)
    }

    /// Run one frame with no change in input.
    pub fn frame(&mut self) -> Result<()> {
        let input = self.input();
        self.run(&input)
    }

    /// Run `n` idle frames.
    pub fn frames(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.frame()?;
        }
        Ok(())
    }

    /// Move the pointer and run a frame.
    pub fn move_to(&mut self, pos: Vec2) -> Result<()> {
        self.cursor = pos;
        self.frame()
    }

    /// Press `button` at the current position.
    pub fn press(&mut self, button: MouseButton) -> Result<()> {
        let mut input = self.input();
        match button {
            MouseButton::Left => input.left = ButtonInput::DOWN,
            MouseButton::Right => input.right = ButtonInput::DOWN,
        }
        self.held[button.index()] = true;
        self.run(&input)
    }

    /// Release `button` at the current position.
    pub fn release(&mut self, button: MouseButton) -> Result<()> {
        let mut input = self.input();
        match button {
            MouseButton::Left => input.left = ButtonInput::UP,
            MouseButton::Right => input.right = ButtonInput::UP,
        }
        self.held[button.index()] = false;
        self.run(&input)
    }

    /// Press the left button.
    pub fn press_left(&mut self) -> Result<()> {
        self.press(MouseButton::Left)
    }

    /// Release the left button.
    pub fn release_left(&mut self) -> Result<()> {
        self.release(MouseButton::Left)
    }

    /// Press and release the left button at the current position.
    pub fn click_left(&mut self) -> Result<()> {
        self.press_left()?;
        self.release_left()
    }

    /// Move to `pos`, then left-click.
    pub fn click_at(&mut self, pos: Vec2) -> Result<()> {
        self.move_to(pos)?;
        self.click_left()
    }

    /// Press the right button.
    pub fn press_right(&mut self) -> Result<()> {
        self.press(MouseButton::Right)
    }

    /// Release the right button.
    pub fn release_right(&mut self) -> Result<()> {
        self.release(MouseButton::Right)
    }

    /// Press and release the right button at the current position.
    pub fn click_right(&mut self) -> Result<()> {
        self.press_right()?;
        self.release_right()
    }

    /// Send one frame of wheel movement.
    pub fn wheel(&mut self, delta: Vec2) -> Result<()> {
        let input = FrameInput {
            wheel: delta,
            ..self.input()
        };
        self.run(&input)
    }

    /// Press the left button at `from`, move to `to` in `steps` frames and
    /// release there.
    pub fn drag(&mut self, from: Vec2, to: Vec2, steps: usize) -> Result<()> {
        self.move_to(from)?;
        self.press_left()?;
        let steps = steps.max(1);
        for i in 1..=steps {
            self.move_to(from.lerp(to, i as f64 / steps as f64))?;
        }
        self.release_left()
    }
}
