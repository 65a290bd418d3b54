/// Cycle model of the serial register interface.
///
/// Three stages, all clocked by the same local clock:
/// - `sync`: two flip-flop synchronizers for chip select, serial clock and
///   data, plus one cycle of history for edge detection
/// - `decoder`: assembles the 16-bit frame on rising serial clock edges
///   while chip select is asserted, validates the length on release
/// - `commit`: writes the decoded value into one of the five registers,
///   once per completed frame
///
/// `Peripheral::tick` computes every next value from the current state
/// before assigning any of them, so each stage sees what the previous one
/// held before the clock edge.

mod commit;
mod decoder;
mod sync;

pub use self::commit::{
	CommitEvent,
	CommitUnit,
};
pub use self::decoder::{
	DecodeEvent,
	FrameDecoder,
};
pub use self::sync::{
	EdgeSynchronizer,
	InputSync,
	Synchronizer,
};

use crate::frame::Frame;
use crate::registers::{
	Register,
	Registers,
};

// local clock edges from chip select release at the input to the commit:
// two synchronizer stages, edge detection, register write
pub const COMMIT_LATENCY: u64 = 4;

/// Raw levels of the three external lines during one local clock cycle.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Inputs {
	// active low
	pub chip_select_n: bool,
	pub sclk: bool,
	pub copi: bool,
}

impl Inputs {
	/// Lines at rest: chip select released, clock and data low.
	pub fn idle() -> Self {
		Inputs {
			chip_select_n: true,
			sclk: false,
			copi: false,
		}
	}

	pub fn selected(sclk: bool, copi: bool) -> Self {
		Inputs {
			chip_select_n: false,
			sclk,
			copi,
		}
	}

	pub fn released(sclk: bool, copi: bool) -> Self {
		Inputs {
			chip_select_n: true,
			sclk,
			copi,
		}
	}
}

impl Default for Inputs {
	fn default() -> Self {
		Inputs::idle()
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Event {
	Reset,
	FrameStart,
	FrameAccepted(Frame),
	FrameDropped { bits: u8, overrun: bool },
	Written { register: Register, value: u8 },
	Ignored(Frame),
}

#[derive(Clone, Debug)]
pub struct Peripheral {
	sync: InputSync,
	decoder: FrameDecoder,
	commit: CommitUnit,
	registers: Registers,
	in_reset: bool,
	cycle: u64,
	last_inputs: Inputs,
	events: Vec<(u64, Event)>,
}

impl Peripheral {
	pub fn new() -> Self {
		Peripheral {
			sync: InputSync::new(),
			decoder: FrameDecoder::default(),
			commit: CommitUnit::default(),
			registers: Registers::default(),
			in_reset: false,
			cycle: 0,
			last_inputs: Inputs::idle(),
			events: Vec::new(),
		}
	}

	/// Pull `rst_n` low: all state returns to its defaults right away,
	/// without waiting for a clock edge, and stays there until released.
	pub fn assert_reset(&mut self) {
		self.sync.reset();
		self.decoder = FrameDecoder::default();
		self.commit = CommitUnit::default();
		self.registers = Registers::default();
		if !self.in_reset {
			debug!("cycle {}: reset asserted", self.cycle);
			self.events.push((self.cycle, Event::Reset));
		}
		self.in_reset = true;
	}

	pub fn release_reset(&mut self) {
		if self.in_reset {
			debug!("cycle {}: reset released", self.cycle);
		}
		self.in_reset = false;
	}

	pub fn in_reset(&self) -> bool {
		self.in_reset
	}

	pub fn registers(&self) -> &Registers {
		&self.registers
	}

	pub fn decoder(&self) -> &FrameDecoder {
		&self.decoder
	}

	pub fn commit_unit(&self) -> &CommitUnit {
		&self.commit
	}

	pub fn sync(&self) -> &InputSync {
		&self.sync
	}

	/// Number of local clock edges seen so far, including those spent in reset.
	pub fn cycle(&self) -> u64 {
		self.cycle
	}

	/// Events with the cycle they happened in, oldest first.
	pub fn take_events(&mut self) -> Vec<(u64, Event)> {
		std::mem::replace(&mut self.events, Vec::new())
	}

	/// One rising edge of the local clock.
	pub fn tick(&mut self, inputs: Inputs) {
		if inputs != self.last_inputs {
			trace!("cycle {}: inputs {:?}", self.cycle, inputs);
			self.last_inputs = inputs;
		}

		let cycle = self.cycle;
		self.cycle += 1;
		if self.in_reset {
			return;
		}

		let (decoder, decode_event) = self.decoder.next(&self.sync, self.commit.frame_processed());
		let (commit, registers, commit_event) = self.commit.next(&self.decoder, &self.registers);

		self.sync.clock(inputs);
		self.decoder = decoder;
		self.commit = commit;
		self.registers = registers;

		match decode_event {
			None => (),
			Some(DecodeEvent::Start) => {
				trace!("cycle {}: frame start", cycle);
				self.events.push((cycle, Event::FrameStart));
			},
			Some(DecodeEvent::Bit { position, value }) => {
				trace!("cycle {}: bit {} = {}", cycle, position, value as u8);
			},
			Some(DecodeEvent::Complete(frame)) => {
				debug!("cycle {}: frame accepted: {:?}", cycle, frame);
				self.events.push((cycle, Event::FrameAccepted(frame)));
			},
			Some(DecodeEvent::Dropped { bits, overrun }) => {
				if overrun {
					debug!("cycle {}: frame dropped: more than {} bits", cycle, bits);
				} else {
					debug!("cycle {}: frame dropped after {} bits", cycle, bits);
				}
				self.events.push((cycle, Event::FrameDropped { bits, overrun }));
			},
		}

		match commit_event {
			None => (),
			Some(CommitEvent::Written { register, value }) => {
				info!("cycle {}: {} <- 0x{:02x}", cycle, register, value);
				self.events.push((cycle, Event::Written { register, value }));
			},
			Some(CommitEvent::Ignored(frame)) => {
				debug!("cycle {}: frame without effect: {:?}", cycle, frame);
				self.events.push((cycle, Event::Ignored(frame)));
			},
		}
	}

	pub fn run(&mut self, inputs: Inputs, cycles: u64) {
		for _ in 0..cycles {
			self.tick(inputs);
		}
	}
}

impl Default for Peripheral {
	fn default() -> Self {
		Peripheral::new()
	}
}

#[cfg(test)]
mod test {
	use super::{
		Event,
		Inputs,
		Peripheral,
		COMMIT_LATENCY,
	};
	use crate::frame::Frame;
	use crate::registers::{
		Register,
		Registers,
	};

	const HALF: u64 = 4;

	fn bits_of(word: u16, num: usize) -> Vec<bool> {
		(0..num).map(|i| 0 != word & (0x8000 >> i)).collect()
	}

	// chip select asserted; clock toggled once per bit; chip select left asserted
	fn shift_in(p: &mut Peripheral, bits: &[bool]) {
		p.run(Inputs::selected(false, false), HALF);
		for &bit in bits {
			p.run(Inputs::selected(false, bit), HALF);
			p.run(Inputs::selected(true, bit), HALF);
		}
		p.run(Inputs::selected(false, false), HALF);
	}

	fn send(p: &mut Peripheral, bits: &[bool]) {
		shift_in(p, bits);
		p.run(Inputs::idle(), 20);
	}

	fn fresh() -> Peripheral {
		let mut p = Peripheral::new();
		p.assert_reset();
		p.run(Inputs::idle(), 5);
		p.release_reset();
		p.run(Inputs::idle(), 5);
		p.take_events();
		p
	}

	fn writes(events: &[(u64, Event)]) -> Vec<(Register, u8)> {
		events.iter().filter_map(|&(_, e)| match e {
			Event::Written { register, value } => Some((register, value)),
			_ => None,
		}).collect()
	}

	#[test]
	fn reset_clears_everything() {
		let mut p = Peripheral::new();
		send(&mut p, &bits_of(0x80ff, 16));
		assert_eq!(p.registers().get(Register::OutputEnableLow), 0xff);

		p.assert_reset();
		assert_eq!(*p.registers(), Registers::default(), "reset must not wait for the clock");
		p.run(Inputs::selected(true, true), 5);
		p.release_reset();
		p.run(Inputs::idle(), 5);
		for &reg in Register::ALL.iter() {
			assert_eq!(p.registers().get(reg), 0);
		}
		assert!(!p.decoder().frame_complete());
		assert!(!p.commit_unit().frame_processed());
	}

	#[test]
	fn write_commits_after_sync_latency() {
		let mut p = fresh();
		shift_in(&mut p, &bits_of(0b1_0000010_00000101, 16));

		// two cycles through the synchronizer, one for the edge, then the commit
		p.run(Inputs::idle(), COMMIT_LATENCY - 1);
		assert_eq!(p.registers().get(Register::PwmEnableLow), 0x00);
		p.tick(Inputs::idle());
		assert_eq!(p.registers().get(Register::PwmEnableLow), 0x05);

		p.run(Inputs::idle(), 100);
		let mut expected = Registers::default();
		expected.set(Register::PwmEnableLow, 0x05);
		assert_eq!(*p.registers(), expected);
	}

	#[test]
	fn aborted_frame_has_no_effect() {
		let mut p = fresh();
		send(&mut p, &bits_of(0b1_0000010_00000101, 10));
		assert_eq!(*p.registers(), Registers::default());
		let events = p.take_events();
		assert!(events.iter().any(|&(_, e)| e == Event::FrameDropped { bits: 10, overrun: false }));
		assert!(writes(&events).is_empty());
	}

	#[test]
	fn cleared_instruction_bit_has_no_effect() {
		let mut p = fresh();
		send(&mut p, &bits_of(0b0_0000000_11111111, 16));
		assert_eq!(*p.registers(), Registers::default());
		let events = p.take_events();
		assert!(events.iter().any(|&(_, e)| e == Event::Ignored(Frame::from_word(0x00ff))));
		assert!(!p.commit_unit().frame_processed());
	}

	#[test]
	fn out_of_range_address_has_no_effect() {
		let mut p = fresh();
		send(&mut p, &bits_of(0b1_0011111_10101010, 16));
		assert_eq!(*p.registers(), Registers::default());
		let events = p.take_events();
		assert!(events.iter().any(|&(_, e)| e == Event::Ignored(Frame::from_word(0x9faa))));
	}

	#[test]
	fn every_register_reachable() {
		let mut p = fresh();
		for (i, &reg) in Register::ALL.iter().enumerate() {
			let data = 0x11 * (i as u8 + 1);
			send(&mut p, &bits_of(Frame::write(reg, data).to_word(), 16));
			assert_eq!(p.registers().get(reg), data);
		}
		assert_eq!(p.registers().output_enable(), 0x2211);
		assert_eq!(p.registers().pwm_enable(), 0x4433);
		assert_eq!(p.registers().pwm_duty_cycle(), 0x55);
	}

	#[test]
	fn commit_exactly_once() {
		let mut p = fresh();
		send(&mut p, &bits_of(Frame::write(Register::PwmDutyCycle, 0x80).to_word(), 16));
		p.run(Inputs::idle(), 1000);
		let events = p.take_events();
		assert_eq!(writes(&events), vec![(Register::PwmDutyCycle, 0x80)]);
		assert!(!p.decoder().frame_complete());
		assert!(!p.commit_unit().frame_processed(), "commit unit must re-arm");

		send(&mut p, &bits_of(Frame::write(Register::PwmDutyCycle, 0x01).to_word(), 16));
		assert_eq!(writes(&p.take_events()), vec![(Register::PwmDutyCycle, 0x01)]);
	}

	#[test]
	fn long_frame_dropped() {
		let mut p = fresh();
		let mut bits = bits_of(Frame::write(Register::OutputEnableLow, 0xf0).to_word(), 16);
		bits.push(false);
		send(&mut p, &bits);
		assert_eq!(*p.registers(), Registers::default());
	}

	#[test]
	fn registers_hold_until_overwritten() {
		let mut p = fresh();
		send(&mut p, &bits_of(Frame::write(Register::OutputEnableLow, 0xf0).to_word(), 16));
		send(&mut p, &bits_of(Frame::write(Register::OutputEnableHigh, 0xcc).to_word(), 16));
		send(&mut p, &bits_of(Frame::new(true, 0x30, 0xaa).unwrap().to_word(), 16));
		send(&mut p, &bits_of(Frame::new(false, 0x00, 0xbe).unwrap().to_word(), 16));
		send(&mut p, &bits_of(Frame::write(Register::OutputEnableLow, 0xff).to_word(), 8));
		assert_eq!(p.registers().output_enable(), 0xccf0);
	}

	#[test]
	fn input_change_needs_two_cycles() {
		let mut p = fresh();
		p.tick(Inputs::selected(false, false));
		assert!(!p.sync().selected());
		p.tick(Inputs::selected(false, false));
		assert!(p.sync().selected());
		assert!(p.sync().frame_start());
		p.tick(Inputs::selected(false, false));
		let events = p.take_events();
		assert_eq!(events.iter().filter(|&&(_, e)| e == Event::FrameStart).count(), 1);
	}

	#[test]
	fn ticks_ignored_in_reset() {
		let mut p = fresh();
		p.assert_reset();
		assert!(p.in_reset());
		shift_in(&mut p, &bits_of(0x80ff, 16));
		p.run(Inputs::idle(), 20);
		p.release_reset();
		assert!(!p.in_reset());
		p.run(Inputs::idle(), 20);
		assert_eq!(*p.registers(), Registers::default());
		assert_eq!(p.decoder().bit_count(), 0);
	}
}
