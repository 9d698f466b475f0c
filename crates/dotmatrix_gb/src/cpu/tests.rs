use super::*;
use crate::config::UnassignedOpcodePolicy;
use crate::error::GbError;
use crate::io;

struct TestBus {
    memory: [u8; 0x10000],
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
        }
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }
}

/// CPU at its power-on state with `program` placed at the entry point.
fn setup(program: &[u8]) -> (Cpu, TestBus) {
    let cpu = Cpu::new();
    let mut bus = TestBus::default();
    let start = cpu.regs.pc as usize;
    bus.memory[start..start + program.len()].copy_from_slice(program);
    (cpu, bus)
}

#[test]
fn power_on_registers_match_dmg_boot_handoff() {
    let cpu = Cpu::new();
    assert_eq!(cpu.regs.af(), 0x01B0);
    assert_eq!(cpu.regs.bc(), 0x0013);
    assert_eq!(cpu.regs.de(), 0x00D8);
    assert_eq!(cpu.regs.hl(), 0x014D);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(cpu.regs.pc, 0x0100);
    assert!(!cpu.ime);
    assert!(!cpu.halted);
}

#[test]
fn nop_costs_one_cycle() {
    let (mut cpu, mut bus) = setup(&[0x00]);
    assert_eq!(cpu.step(&mut bus).unwrap(), 1);
    assert_eq!(cpu.regs.pc, 0x0101);
}

#[test]
fn ld_bc_d16_loads_little_endian_immediate() {
    let (mut cpu, mut bus) = setup(&[0x01, 0x34, 0x12]);
    assert_eq!(cpu.step(&mut bus).unwrap(), 3);
    assert_eq!(cpu.regs.b, 0x12);
    assert_eq!(cpu.regs.c, 0x34);
    assert_eq!(cpu.regs.pc, 0x0103);
}

#[test]
fn xor_a_clears_a_and_sets_only_zero() {
    let (mut cpu, mut bus) = setup(&[0xAF]);
    cpu.regs.a = 0x42;
    assert_eq!(cpu.step(&mut bus).unwrap(), 1);
    assert_eq!(cpu.regs.a, 0);
    assert_eq!(cpu.regs.f, 0x80);
}

#[test]
fn add_sets_half_carry_from_low_nibble() {
    let (mut cpu, mut bus) = setup(&[0xC6, 0x01]);
    cpu.regs.a = 0x0F;
    assert_eq!(cpu.step(&mut bus).unwrap(), 2);
    assert_eq!(cpu.regs.a, 0x10);
    assert!(cpu.regs.get_flag(Flag::H));
    assert!(!cpu.regs.get_flag(Flag::C));
    assert!(!cpu.regs.get_flag(Flag::Z));
}

#[test]
fn adc_folds_carry_into_operand_before_adding() {
    // 0xFF + carry wraps to 0x00, so A is unchanged and no carry results.
    let (mut cpu, mut bus) = setup(&[0xCE, 0xFF]);
    cpu.regs.a = 0x10;
    cpu.regs.set_flag(Flag::C, true);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 0x10);
    assert!(!cpu.regs.get_flag(Flag::C));
    assert!(!cpu.regs.get_flag(Flag::H));
}

#[test]
fn sbc_folds_carry_into_subtrahend() {
    let (mut cpu, mut bus) = setup(&[0xDE, 0x01]);
    cpu.regs.a = 0x05;
    cpu.regs.set_flag(Flag::C, true);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 0x03);
    assert!(cpu.regs.get_flag(Flag::N));
    assert!(!cpu.regs.get_flag(Flag::C));
}

#[test]
fn cp_leaves_a_untouched() {
    let (mut cpu, mut bus) = setup(&[0xFE, 0x42]);
    cpu.regs.a = 0x42;
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 0x42);
    assert!(cpu.regs.get_flag(Flag::Z));
    assert!(cpu.regs.get_flag(Flag::N));
}

#[test]
fn inc_preserves_carry() {
    let (mut cpu, mut bus) = setup(&[0x3C]);
    cpu.regs.a = 0xFF;
    cpu.regs.set_flag(Flag::C, true);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.get_flag(Flag::Z));
    assert!(cpu.regs.get_flag(Flag::H));
    assert!(cpu.regs.get_flag(Flag::C));
}

#[test]
fn daa_corrects_bcd_addition() {
    // 0x45 + 0x38 = 0x7D, adjusted to BCD 83.
    let (mut cpu, mut bus) = setup(&[0xC6, 0x38, 0x27]);
    cpu.regs.a = 0x45;
    cpu.step(&mut bus).unwrap();
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 0x83);
    assert!(!cpu.regs.get_flag(Flag::C));
}

#[test]
fn daa_corrects_bcd_subtraction() {
    // 0x10 - 0x01 = 0x0F with H set, adjusted to BCD 09.
    let (mut cpu, mut bus) = setup(&[0xD6, 0x01, 0x27]);
    cpu.regs.a = 0x10;
    cpu.step(&mut bus).unwrap();
    assert!(cpu.regs.get_flag(Flag::H));
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 0x09);
    assert_eq!(cpu.regs.f, 0x40);
}

#[test]
fn daa_after_borrowing_subtraction_keeps_carry() {
    // 0x20 - 0x30 = 0xF0 with C set, adjusted to BCD 90 (i.e. 20 - 30 = -10).
    let (mut cpu, mut bus) = setup(&[0xD6, 0x30, 0x27]);
    cpu.regs.a = 0x20;
    cpu.step(&mut bus).unwrap();
    assert!(cpu.regs.get_flag(Flag::C));
    assert!(!cpu.regs.get_flag(Flag::H));
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 0x90);
    assert!(cpu.regs.get_flag(Flag::C));
    assert!(cpu.regs.get_flag(Flag::N));
    assert!(!cpu.regs.get_flag(Flag::Z));
}

#[test]
fn add_hl_half_carry_comes_from_bit_11() {
    let (mut cpu, mut bus) = setup(&[0x09]);
    cpu.regs.set_hl(0x0FFF);
    cpu.regs.set_bc(0x0001);
    cpu.regs.set_flag(Flag::Z, true);
    assert_eq!(cpu.step(&mut bus).unwrap(), 2);
    assert_eq!(cpu.regs.hl(), 0x1000);
    assert!(cpu.regs.get_flag(Flag::H));
    assert!(!cpu.regs.get_flag(Flag::C));
    assert!(cpu.regs.get_flag(Flag::Z), "Z is unaffected");
}

#[test]
fn add_sp_signed_offset() {
    let (mut cpu, mut bus) = setup(&[0xE8, 0xFF]);
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.regs.sp, 0xFFFD);
    assert!(cpu.regs.get_flag(Flag::H));
    assert!(cpu.regs.get_flag(Flag::C));
    assert!(!cpu.regs.get_flag(Flag::Z));
}

#[test]
fn ld_hl_increment_and_decrement() {
    let (mut cpu, mut bus) = setup(&[0x22, 0x3A]);
    cpu.regs.set_hl(0xC000);
    cpu.regs.a = 0x5A;
    cpu.step(&mut bus).unwrap();
    assert_eq!(bus.memory[0xC000], 0x5A);
    assert_eq!(cpu.regs.hl(), 0xC001);

    bus.memory[0xC001] = 0x77;
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 0x77);
    assert_eq!(cpu.regs.hl(), 0xC000);
}

#[test]
fn ld_a16_sp_stores_both_bytes() {
    let (mut cpu, mut bus) = setup(&[0x08, 0x00, 0xC0]);
    assert_eq!(cpu.step(&mut bus).unwrap(), 5);
    assert_eq!(bus.memory[0xC000], 0xFE);
    assert_eq!(bus.memory[0xC001], 0xFF);
}

#[test]
fn ldh_addresses_high_page() {
    let (mut cpu, mut bus) = setup(&[0xE0, 0x80, 0xF2]);
    cpu.regs.a = 0x42;
    assert_eq!(cpu.step(&mut bus).unwrap(), 3);
    assert_eq!(bus.memory[0xFF80], 0x42);

    cpu.regs.c = 0x81;
    bus.memory[0xFF81] = 0x99;
    assert_eq!(cpu.step(&mut bus).unwrap(), 2);
    assert_eq!(cpu.regs.a, 0x99);
}

#[test]
fn jr_nz_charges_taken_cost_only_when_branching() {
    let (mut cpu, mut bus) = setup(&[0x20, 0x05, 0x20, 0xFC]);
    cpu.regs.set_flag(Flag::Z, true);
    assert_eq!(cpu.step(&mut bus).unwrap(), 2);
    assert_eq!(cpu.regs.pc, 0x0102);

    cpu.regs.set_flag(Flag::Z, false);
    assert_eq!(cpu.step(&mut bus).unwrap(), 3);
    assert_eq!(cpu.regs.pc, 0x0100);
}

#[test]
fn call_and_ret_round_trip_through_stack() {
    let (mut cpu, mut bus) = setup(&[0xCD, 0x00, 0x20]);
    bus.memory[0x2000] = 0xC9;

    assert_eq!(cpu.step(&mut bus).unwrap(), 6);
    assert_eq!(cpu.regs.pc, 0x2000);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.memory[0xFFFC], 0x03);
    assert_eq!(bus.memory[0xFFFD], 0x01);

    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.regs.pc, 0x0103);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn conditional_call_not_taken_skips_operand() {
    let (mut cpu, mut bus) = setup(&[0xC4, 0x00, 0x20]);
    cpu.regs.set_flag(Flag::Z, true);
    assert_eq!(cpu.step(&mut bus).unwrap(), 3);
    assert_eq!(cpu.regs.pc, 0x0103);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn rst_pushes_return_and_jumps_to_vector() {
    let (mut cpu, mut bus) = setup(&[0xEF]);
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.regs.pc, 0x0028);
    assert_eq!(bus.read16(cpu.regs.sp), 0x0101);
}

#[test]
fn pop_af_masks_low_flag_nibble() {
    let (mut cpu, mut bus) = setup(&[0xC5, 0xF1]);
    cpu.regs.set_bc(0x12FF);
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.step(&mut bus).unwrap(), 3);
    assert_eq!(cpu.regs.a, 0x12);
    assert_eq!(cpu.regs.f, 0xF0);
}

#[test]
fn ei_takes_effect_after_following_instruction() {
    let (mut cpu, mut bus) = setup(&[0xFB, 0x00, 0x00]);
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.ime);
    assert!(cpu.ime_scheduled());
    cpu.step(&mut bus).unwrap();
    assert!(cpu.ime);
    assert!(!cpu.ime_scheduled());
}

#[test]
fn di_cancels_pending_ei() {
    let (mut cpu, mut bus) = setup(&[0xFB, 0xF3, 0x00]);
    cpu.step(&mut bus).unwrap();
    cpu.step(&mut bus).unwrap();
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.ime);
    assert!(!cpu.ime_scheduled());
}

#[test]
fn reti_enables_interrupts_immediately() {
    let (mut cpu, mut bus) = setup(&[0xD9]);
    cpu.regs.sp = 0xFFFC;
    bus.memory[0xFFFC] = 0x34;
    bus.memory[0xFFFD] = 0x12;
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.regs.pc, 0x1234);
    assert!(cpu.ime);
}

#[test]
fn vblank_interrupt_is_serviced() {
    let (mut cpu, mut bus) = setup(&[0x00]);
    cpu.ime = true;
    bus.memory[io::IE as usize] = 0x01;
    bus.memory[io::IF as usize] = 0x01;

    assert_eq!(cpu.service_interrupts(&mut bus).unwrap(), 5);
    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.read16(0xFFFC), 0x0100);
    assert_eq!(bus.memory[io::IF as usize], 0x00);
    assert!(!cpu.ime);
}

#[test]
fn interrupts_are_serviced_in_priority_order() {
    let (mut cpu, mut bus) = setup(&[0x00]);
    cpu.ime = true;
    bus.memory[io::IE as usize] = 0x1F;
    bus.memory[io::IF as usize] = 0x14;

    assert_eq!(cpu.service_interrupts(&mut bus).unwrap(), 5);
    assert_eq!(cpu.regs.pc, 0x0050);
    assert_eq!(bus.memory[io::IF as usize], 0x10);
}

#[test]
fn masked_or_disabled_interrupts_cost_nothing() {
    let (mut cpu, mut bus) = setup(&[0x00]);
    bus.memory[io::IE as usize] = 0x01;
    bus.memory[io::IF as usize] = 0x01;
    assert_eq!(cpu.service_interrupts(&mut bus).unwrap(), 0);
    assert_eq!(cpu.regs.pc, 0x0100);

    cpu.ime = true;
    bus.memory[io::IE as usize] = 0x02;
    assert_eq!(cpu.service_interrupts(&mut bus).unwrap(), 0);
    assert_eq!(bus.memory[io::IF as usize], 0x01);
}

#[test]
fn overlap_outside_known_sources_is_an_error() {
    let (mut cpu, mut bus) = setup(&[0x00]);
    cpu.ime = true;
    bus.memory[io::IE as usize] = 0xE0;
    bus.memory[io::IF as usize] = 0xE0;
    assert_eq!(
        cpu.service_interrupts(&mut bus),
        Err(GbError::InvalidInterruptState {
            pending: 0xE0,
            enabled: 0xE0,
        })
    );
}

#[test]
fn halt_idles_until_interrupt_pending() {
    let (mut cpu, mut bus) = setup(&[0x76, 0x3C]);
    cpu.regs.a = 0;
    cpu.step(&mut bus).unwrap();
    assert!(cpu.halted);

    assert_eq!(cpu.step(&mut bus).unwrap(), 1);
    assert_eq!(cpu.regs.pc, 0x0101);

    bus.memory[io::IE as usize] = 0x04;
    bus.memory[io::IF as usize] = 0x04;
    // IME is off: the CPU wakes without dispatching.
    assert_eq!(cpu.service_interrupts(&mut bus).unwrap(), 0);
    assert!(!cpu.halted);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 1);
}

#[test]
fn halt_bug_repeats_next_opcode() {
    let (mut cpu, mut bus) = setup(&[0x76, 0x3C, 0x00]);
    cpu.regs.a = 0;
    bus.memory[io::IE as usize] = 0x01;
    bus.memory[io::IF as usize] = 0x01;

    cpu.step(&mut bus).unwrap();
    assert!(!cpu.halted);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.pc, 0x0101);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 2);
    assert_eq!(cpu.regs.pc, 0x0102);
}

#[test]
fn interrupt_after_ei_halt_returns_to_halt() {
    // EI; HALT with a request already pending: IME turns on at the end of
    // HALT, so the dispatch lands between HALT and the repeated fetch.
    let (mut cpu, mut bus) = setup(&[0xFB, 0x76, 0x00]);
    bus.memory[0x0040] = 0xF5; // PUSH AF
    bus.memory[io::IE as usize] = 0x01;
    bus.memory[io::IF as usize] = 0x01;

    assert_eq!(cpu.service_interrupts(&mut bus).unwrap(), 0);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.service_interrupts(&mut bus).unwrap(), 0);
    cpu.step(&mut bus).unwrap();
    assert!(cpu.ime);
    assert!(!cpu.halted);

    assert_eq!(cpu.service_interrupts(&mut bus).unwrap(), 5);
    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(bus.read16(cpu.regs.sp), 0x0101);

    let sp = cpu.regs.sp;
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.regs.pc, 0x0041);
    assert_eq!(cpu.regs.sp, sp - 2);
}

#[test]
fn stopped_cpu_leaves_interrupts_pending() {
    let (mut cpu, mut bus) = setup(&[0x10, 0x00, 0x00]);
    bus.memory[io::P1 as usize] = 0xCF;
    cpu.ime = true;

    cpu.step(&mut bus).unwrap();
    assert!(cpu.is_stopped());

    bus.memory[io::IE as usize] = 0x04;
    bus.memory[io::IF as usize] = 0x04;
    assert_eq!(cpu.service_interrupts(&mut bus).unwrap(), 0);
    assert_eq!(cpu.regs.pc, 0x0102);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(bus.memory[io::IF as usize], 0x04);

    bus.memory[io::P1 as usize] = 0xCE;
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.is_stopped());
    assert_eq!(cpu.service_interrupts(&mut bus).unwrap(), 5);
    assert_eq!(cpu.regs.pc, 0x0050);
}

#[test]
fn stop_waits_for_joypad_line() {
    let (mut cpu, mut bus) = setup(&[0x10, 0x00, 0x3C]);
    bus.memory[io::P1 as usize] = 0xCF;
    cpu.regs.a = 0;

    cpu.step(&mut bus).unwrap();
    assert!(cpu.is_stopped());
    assert_eq!(cpu.regs.pc, 0x0102);
    assert_eq!(cpu.step(&mut bus).unwrap(), 1);
    assert_eq!(cpu.regs.a, 0);

    bus.memory[io::P1 as usize] = 0xCE;
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.is_stopped());
    assert_eq!(cpu.regs.a, 1);
}

#[test]
fn cb_swap_register() {
    let (mut cpu, mut bus) = setup(&[0xCB, 0x37]);
    cpu.regs.a = 0xF1;
    assert_eq!(cpu.step(&mut bus).unwrap(), 2);
    assert_eq!(cpu.regs.a, 0x1F);
    assert_eq!(cpu.regs.f, 0x00);
}

#[test]
fn cb_bit_tests_without_touching_carry() {
    let (mut cpu, mut bus) = setup(&[0xCB, 0x7C, 0xCB, 0x46]);
    cpu.regs.h = 0x80;
    cpu.regs.set_flag(Flag::C, true);
    assert_eq!(cpu.step(&mut bus).unwrap(), 2);
    assert!(!cpu.regs.get_flag(Flag::Z));
    assert!(cpu.regs.get_flag(Flag::H));
    assert!(cpu.regs.get_flag(Flag::C));

    cpu.regs.set_hl(0xC000);
    bus.memory[0xC000] = 0xFE;
    assert_eq!(cpu.step(&mut bus).unwrap(), 3);
    assert!(cpu.regs.get_flag(Flag::Z));
}

#[test]
fn cb_set_and_res_on_memory() {
    let (mut cpu, mut bus) = setup(&[0xCB, 0xC6, 0xCB, 0xBE]);
    cpu.regs.set_hl(0xC000);
    bus.memory[0xC000] = 0x80;
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(bus.memory[0xC000], 0x81);
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(bus.memory[0xC000], 0x01);
}

#[test]
fn rla_clears_zero_even_for_zero_result() {
    let (mut cpu, mut bus) = setup(&[0x17]);
    cpu.regs.a = 0x80;
    cpu.regs.set_flag(Flag::C, false);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 0x00);
    assert!(!cpu.regs.get_flag(Flag::Z));
    assert!(cpu.regs.get_flag(Flag::C));
}

#[test]
fn unassigned_opcode_is_skipped_by_default() {
    let (mut cpu, mut bus) = setup(&[0xD3, 0x00]);
    assert_eq!(cpu.step(&mut bus).unwrap(), 0);
    assert_eq!(cpu.regs.pc, 0x0101);
}

#[test]
fn unassigned_opcode_faults_when_configured() {
    let (mut cpu, mut bus) = setup(&[0xFD]);
    cpu.unassigned_opcodes = UnassignedOpcodePolicy::Fault;
    assert_eq!(
        cpu.step(&mut bus),
        Err(GbError::UnassignedOpcode {
            opcode: 0xFD,
            pc: 0x0100,
        })
    );
}

#[test]
fn reset_keeps_dispatch_settings() {
    let mut cpu = Cpu::new();
    cpu.unassigned_opcodes = UnassignedOpcodePolicy::Fault;
    cpu.trace_instructions = true;
    cpu.regs.pc = 0x4000;
    cpu.halted = true;
    cpu.reset();
    assert_eq!(cpu.regs.pc, 0x0100);
    assert!(!cpu.halted);
    assert_eq!(cpu.unassigned_opcodes, UnassignedOpcodePolicy::Fault);
    assert!(cpu.trace_instructions);
}

#[test]
fn ccf_toggles_carry() {
    let (mut cpu, mut bus) = setup(&[0x3F, 0x3F]);
    cpu.regs.set_flag(Flag::C, true);
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.regs.get_flag(Flag::C));
    cpu.step(&mut bus).unwrap();
    assert!(cpu.regs.get_flag(Flag::C));
}

#[test]
#[should_panic(expected = "non-bit value")]
fn flag_bit_outside_zero_or_one_panics() {
    let mut regs = Registers::default();
    regs.set_flag_bit(Flag::Z, 2);
}
