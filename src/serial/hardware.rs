#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct OutPins {
	// logical: true = asserted (the line itself is active low)
	pub chip_select: bool,
	pub clock: bool,
	pub data: bool,
}

impl OutPins {
	pub fn released() -> Self {
		OutPins {
			chip_select: false,
			clock: false,
			data: false,
		}
	}
}

pub trait Hardware {
	fn set_pins(&mut self, pins: OutPins);

	// delay for (at least) one clock edge, i.e. half a serial clock period
	fn delay(&mut self);
}

impl<'a, H: ?Sized + Hardware> Hardware for &'a mut H {
	fn set_pins(&mut self, pins: OutPins) {
		H::set_pins(*self, pins)
	}

	fn delay(&mut self) {
		H::delay(*self)
	}
}
