use std::ops::{
	Deref,
	DerefMut,
};

use super::{
	Hardware,
	OutPins,
};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Signal {
	Clear,
	Zero,
	One,
}

impl Signal {
	pub fn with_clock(self, clock: bool) -> OutPins {
		let (chip_select, data) = match self {
			Signal::Clear => (false, false),
			Signal::Zero => (true, false),
			Signal::One => (true, true),
		};
		OutPins {
			chip_select,
			clock,
			data,
		}
	}
}

impl From<bool> for Signal {
	fn from(v: bool) -> Self {
		match v {
			false => Signal::Zero,
			true => Signal::One,
		}
	}
}

/// Chip select is asserted for the lifetime of a transaction; dropping it
/// ends the frame.
pub struct Transaction<'a, H: ?Sized+LowLevel+'a>(&'a mut H);

impl<'a, H: ?Sized+LowLevel> Drop for Transaction<'a, H> {
	fn drop(&mut self) {
		self.0._finish_frame();
	}
}

impl<'a, H: ?Sized+LowLevel> Deref for Transaction<'a, H> {
	type Target = H;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<'a, H: ?Sized+LowLevel> DerefMut for Transaction<'a, H> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

trait InternalLowLevel: Hardware {
	// assert chip select with the clock low; the peripheral only starts a
	// frame on the chip select edge, so give it a half cycle before the
	// first rising clock
	fn _start_frame(&mut self) {
		self.set_pins(Signal::Zero.with_clock(false));
		self.delay();
	}

	// bring the clock down first, then release chip select and wait for a
	// half cycle
	fn _finish_frame(&mut self) {
		self.set_pins(Signal::Zero.with_clock(false));
		self.delay();
		self.set_pins(Signal::Clear.with_clock(false));
		self.delay();
	}
}

impl<H: Hardware+?Sized> InternalLowLevel for H {
}

pub trait LowLevel: Hardware {
	// prepare data during CLK lo, then bring CLK up
	//
	// waits for the full CLK-HIGH edge after pulling it up
	fn send_bit(&mut self, data: bool) {
		let signal = Signal::from(data);

		self.set_pins(signal.with_clock(false));
		self.delay(); // wait for pins to be stable

		self.set_pins(signal.with_clock(true));
		self.delay(); // wait for peripheral sampling the pins
	}

	// send `num` lowest bits from word, starting with highest bit
	fn send_bits(&mut self, word: u16, num: usize) {
		assert!(num <= 16);
		for bit in (0..num).rev() {
			let bit_mask = 1u16 << bit;
			self.send_bit(0 != (word & bit_mask));
		}
	}

	fn start_transaction(&mut self) -> Transaction<Self> {
		self._start_frame();

		Transaction(self)
	}
}

impl<H: Hardware+?Sized> LowLevel for H {
}
