/// Two flip-flop synchronizer for a signal driven from outside the local
/// clock domain.
///
/// Nothing is passed through combinationally: `output` only ever shows a
/// level that went through both stages, two clock edges after it was
/// present at the input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Synchronizer<T: Copy> {
	reset_value: T,
	stage1: T,
	stage2: T,
}

impl<T: Copy> Synchronizer<T> {
	pub fn new(reset_value: T) -> Self {
		Synchronizer {
			reset_value,
			stage1: reset_value,
			stage2: reset_value,
		}
	}

	pub fn reset(&mut self) {
		*self = Self::new(self.reset_value);
	}

	pub fn output(&self) -> T {
		self.stage2
	}

	pub fn clock(&mut self, input: T) {
		self.stage2 = self.stage1;
		self.stage1 = input;
	}
}

/// Synchronized level plus the level it had one cycle earlier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EdgeSynchronizer {
	sync: Synchronizer<bool>,
	previous: bool,
}

impl EdgeSynchronizer {
	pub fn new(reset_value: bool) -> Self {
		EdgeSynchronizer {
			sync: Synchronizer::new(reset_value),
			previous: reset_value,
		}
	}

	pub fn reset(&mut self) {
		self.sync.reset();
		self.previous = self.sync.output();
	}

	pub fn level(&self) -> bool {
		self.sync.output()
	}

	pub fn rising(&self) -> bool {
		!self.previous && self.sync.output()
	}

	pub fn falling(&self) -> bool {
		self.previous && !self.sync.output()
	}

	pub fn clock(&mut self, input: bool) {
		self.previous = self.sync.output();
		self.sync.clock(input);
	}
}

/// Synchronized copies of the three serial lines.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct InputSync {
	pub chip_select_n: EdgeSynchronizer,
	pub sclk: EdgeSynchronizer,
	pub copi: Synchronizer<bool>,
}

impl InputSync {
	// idle: chip select released (high), clock and data low
	pub fn new() -> Self {
		InputSync {
			chip_select_n: EdgeSynchronizer::new(true),
			sclk: EdgeSynchronizer::new(false),
			copi: Synchronizer::new(false),
		}
	}

	pub fn reset(&mut self) {
		self.chip_select_n.reset();
		self.sclk.reset();
		self.copi.reset();
	}

	pub fn clock(&mut self, inputs: super::Inputs) {
		self.chip_select_n.clock(inputs.chip_select_n);
		self.sclk.clock(inputs.sclk);
		self.copi.clock(inputs.copi);
	}

	/// Chip select is asserted (active low on the wire).
	pub fn selected(&self) -> bool {
		!self.chip_select_n.level()
	}

	pub fn frame_start(&self) -> bool {
		self.chip_select_n.falling()
	}

	pub fn frame_end(&self) -> bool {
		self.chip_select_n.rising()
	}

	pub fn sample_edge(&self) -> bool {
		self.sclk.rising()
	}

	pub fn data(&self) -> bool {
		self.copi.output()
	}
}

impl Default for InputSync {
	fn default() -> Self {
		InputSync::new()
	}
}
