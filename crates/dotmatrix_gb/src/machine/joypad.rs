use crate::cpu::Interrupt;
use crate::io;

use super::Memory;

/// The eight DMG inputs, in the order of [`JoypadInput`]'s array form.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::Right,
        Button::Left,
        Button::Up,
        Button::Down,
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
    ];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Snapshot of the pressed buttons, sampled by the front end.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct JoypadInput {
    pressed: [bool; 8],
}

impl From<[bool; 8]> for JoypadInput {
    fn from(pressed: [bool; 8]) -> Self {
        Self { pressed }
    }
}

impl JoypadInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, button: Button, pressed: bool) -> Self {
        self.set(button, pressed);
        self
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        self.pressed[button.index()] = pressed;
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed[button.index()]
    }

    /// All eight inputs as a bitmask, bit n set when `Button::ALL[n]` is
    /// held. The low nibble is the d-pad, the high nibble the buttons.
    fn mask(&self) -> u8 {
        self.pressed
            .iter()
            .enumerate()
            .fold(0, |mask, (bit, &down)| mask | (u8::from(down) << bit))
    }
}

/// Drives P1 (0xFF00) from the front end's input snapshot.
#[derive(Clone, Debug, Default)]
pub(super) struct Joypad {
    held: u8,
}

impl Joypad {
    /// Rebuild P1's low nibble from the selected groups and request the
    /// joypad interrupt for any button that was not held at the previous
    /// latch.
    pub(super) fn latch(&mut self, memory: &mut Memory, input: &JoypadInput) {
        let held = input.mask();
        let dpad = held & 0x0F;
        let buttons = held >> 4;

        // Bits 5 (buttons) and 4 (d-pad) are selection bits; 0 selects.
        let select = memory.read(io::P1) & 0x30;
        let mut low = 0x0F;
        if select & 0x10 == 0 {
            low &= !dpad;
        }
        if select & 0x20 == 0 {
            low &= !buttons;
        }
        // Bits 7-6 always read as 1 on DMG.
        memory.poke(io::P1, 0xC0 | select | (low & 0x0F));

        if held & !self.held != 0 {
            Interrupt::JOYPAD.request(memory);
        }
        self.held = held;
    }
}
