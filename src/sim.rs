/// Drives a `Peripheral` through the host side `Hardware` trait, so frames
/// travel over the same three lines a real controller would toggle.

use crate::peripheral::{
	Event,
	Inputs,
	Peripheral,
	COMMIT_LATENCY,
};
use crate::registers::Registers;
use crate::serial::{
	Hardware,
	OutPins,
};

/// All values in cycles of the peripheral's local clock.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Timing {
	/// cycles per edge of the serial clock (half a serial clock period)
	pub half_period: u64,
	/// cycles to wait with released lines after a frame
	pub settle: u64,
	/// cycles `rst_n` is held low, and cycles to run after releasing it
	pub reset_cycles: u64,
}

impl Default for Timing {
	// 10 MHz local clock, 100 kHz serial clock
	fn default() -> Self {
		Timing {
			half_period: 50,
			settle: 600,
			reset_cycles: 5,
		}
	}
}

impl Timing {
	pub fn validate(&self) -> crate::AResult<()> {
		// the synchronizer needs a level to be present for more than one
		// cycle to see both sides of an edge
		ensure!(self.half_period >= 2, "half period must be at least 2 cycles, got {}", self.half_period);
		ensure!(self.reset_cycles >= 1, "reset must be held for at least 1 cycle");
		// a frame ends with one half period after releasing chip select,
		// followed by the settle time
		ensure!(self.half_period + self.settle >= COMMIT_LATENCY,
			"half period plus settle time must cover the {} cycle commit latency, got {} + {}",
			COMMIT_LATENCY, self.half_period, self.settle
		);
		Ok(())
	}
}

pub struct SimulatedLink {
	peripheral: Peripheral,
	pins: OutPins,
	timing: Timing,
}

impl SimulatedLink {
	pub fn new(timing: Timing) -> crate::AResult<Self> {
		timing.validate()?;
		Ok(SimulatedLink {
			peripheral: Peripheral::new(),
			pins: OutPins::released(),
			timing,
		})
	}

	pub fn peripheral(&self) -> &Peripheral {
		&self.peripheral
	}

	pub fn registers(&self) -> &Registers {
		self.peripheral.registers()
	}

	pub fn take_events(&mut self) -> Vec<(u64, Event)> {
		self.peripheral.take_events()
	}

	fn inputs(&self) -> Inputs {
		Inputs {
			chip_select_n: !self.pins.chip_select,
			sclk: self.pins.clock,
			copi: self.pins.data,
		}
	}

	pub fn run(&mut self, cycles: u64) {
		let inputs = self.inputs();
		self.peripheral.run(inputs, cycles);
	}

	/// Release all lines and let the clock run.
	pub fn idle(&mut self, cycles: u64) {
		self.pins = OutPins::released();
		self.run(cycles);
	}

	/// Wait the configured settle time; frames have been committed after this.
	pub fn settle(&mut self) {
		self.idle(self.timing.settle);
	}

	pub fn reset(&mut self) {
		info!("reset");
		self.pins = OutPins::released();
		self.peripheral.assert_reset();
		self.run(self.timing.reset_cycles);
		self.peripheral.release_reset();
		self.run(self.timing.reset_cycles);
	}
}

impl Hardware for SimulatedLink {
	fn set_pins(&mut self, pins: OutPins) {
		self.pins = pins;
	}

	fn delay(&mut self) {
		self.run(self.timing.half_period);
	}
}
