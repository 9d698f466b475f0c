use crate::config::EmulatorConfig;
use crate::cpu::Cpu;
use crate::error::{GbError, Result};

use super::joypad::Joypad;
use super::{
    BackgroundRenderer, CartridgeHeader, FrameBuffer, JoypadInput, LineRenderer, Memory,
    ScanlineTimer, VBLANK_LINE,
};

/// Zero-cost steps in a row after which a `step` call gives up on its
/// budget. Only reachable when execution runs through skipped opcode holes.
const MAX_ZERO_COST_STEPS: u32 = 0x10000;

/// High-level Game Boy machine.
///
/// Owns the CPU, the address space, display timing and the frame buffer.
/// Every call runs to completion on the caller's thread; the frame buffer
/// is consistent between calls.
pub struct GameBoy {
    pub cpu: Cpu,
    memory: Memory,
    timer: ScanlineTimer,
    joypad: Joypad,
    frame: FrameBuffer,
    renderer: Box<dyn LineRenderer>,
    config: EmulatorConfig,
    /// Image last passed to `load_program`, restored by `reset`.
    program: Vec<u8>,
    fault: Option<GbError>,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoy {
    pub fn new() -> Self {
        Self::with_config(EmulatorConfig::default())
    }

    /// Machine with the default [`BackgroundRenderer`] using the configured
    /// palette.
    pub fn with_config(config: EmulatorConfig) -> Self {
        let renderer = Box::new(BackgroundRenderer::new(config.palette));
        Self::with_renderer(config, renderer)
    }

    pub fn with_renderer(config: EmulatorConfig, renderer: Box<dyn LineRenderer>) -> Self {
        let mut cpu = Cpu::new();
        cpu.unassigned_opcodes = config.unassigned_opcodes;
        cpu.trace_instructions = config.trace_instructions;

        Self {
            cpu,
            memory: Memory::new(),
            timer: ScanlineTimer::new(),
            joypad: Joypad::default(),
            frame: FrameBuffer::new(),
            renderer,
            config,
            program: Vec::new(),
            fault: None,
        }
    }

    /// Return to the power-on state, reloading the current program and
    /// clearing any latched fault.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.memory = Memory::new();
        self.timer = ScanlineTimer::new();
        self.joypad = Joypad::default();
        self.frame = FrameBuffer::new();
        self.fault = None;

        if !self.program.is_empty() {
            let window = self.config.effective_load_window();
            if let Err(err) = self.memory.load_program(&self.program, window) {
                log::error!("GB: failed to reload program on reset: {err}");
            }
        }
    }

    /// Copy a program image into the cartridge window at 0x0000.
    ///
    /// Execution starts at 0x0100. Images larger than the configured load
    /// window are truncated; banked cartridges load but only their first
    /// window is reachable.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        let window = self.config.effective_load_window();
        let copied = self.memory.load_program(program, window)?;

        match CartridgeHeader::parse(program) {
            Some(header) => {
                log::info!(
                    "GB: loaded '{}' type=0x{:02X} rom_size=0x{:02X} ({} of {} bytes mapped)",
                    header.title,
                    header.cartridge_type,
                    header.rom_size,
                    copied,
                    program.len(),
                );
                if !header.checksum_ok() {
                    log::warn!(
                        "GB: header checksum mismatch (header=0x{:02X} computed=0x{:02X})",
                        header.header_checksum,
                        header.computed_checksum,
                    );
                }
                if header.is_banked() {
                    log::warn!(
                        "GB: cartridge type 0x{:02X} uses bank switching; only the first 0x{:04X} bytes are mapped",
                        header.cartridge_type,
                        window,
                    );
                }
            }
            None => log::info!("GB: loaded {copied} bytes (no cartridge header)"),
        }

        self.program = program.to_vec();
        Ok(())
    }

    /// Run until at least `cycle_budget` machine cycles have retired and
    /// return the cycles actually retired.
    ///
    /// Each iteration checks interrupts, executes one instruction and feeds
    /// the combined cost to the scanline timer. The last instruction may
    /// overshoot the budget. A fault aborts the call and is latched: later
    /// calls return it again until [`GameBoy::reset`].
    pub fn step(&mut self, input: &JoypadInput, cycle_budget: u32) -> Result<u32> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        match self.run(input, cycle_budget) {
            Ok(retired) => Ok(retired),
            Err(err) => {
                self.fault = Some(err.clone());
                Err(err)
            }
        }
    }

    /// One frame's worth of cycles (`cycles_per_frame`).
    pub fn step_frame(&mut self, input: &JoypadInput) -> Result<u32> {
        let budget = self.config.cycles_per_frame;
        self.step(input, budget)
    }

    fn run(&mut self, input: &JoypadInput, cycle_budget: u32) -> Result<u32> {
        self.joypad.latch(&mut self.memory, input);

        let mut retired = 0u32;
        let mut zero_cost_steps = 0u32;
        while retired < cycle_budget {
            let cycles = self.cpu.service_interrupts(&mut self.memory)?
                + self.cpu.step(&mut self.memory)?;

            self.joypad.latch(&mut self.memory, input);
            if let Some(line) = self.timer.advance(&mut self.memory, cycles) {
                if line < VBLANK_LINE {
                    self.renderer.render_line(&self.memory, line, &mut self.frame);
                }
            }

            if cycles == 0 {
                zero_cost_steps += 1;
                if zero_cost_steps >= MAX_ZERO_COST_STEPS {
                    log::warn!(
                        "GB: no cycles retired for {zero_cost_steps} steps at pc=0x{:04X}; ending step early",
                        self.cpu.regs.pc,
                    );
                    break;
                }
            } else {
                zero_cost_steps = 0;
            }
            retired = retired.saturating_add(cycles);
        }

        Ok(retired)
    }

    #[inline]
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame
    }

    #[inline]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    #[inline]
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    #[inline]
    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// The fault that stopped the machine, if any.
    #[inline]
    pub fn fault(&self) -> Option<&GbError> {
        self.fault.as_ref()
    }
}
