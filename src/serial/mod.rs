/// Host side of the serial register interface: bit-bangs frames onto
/// chip select, clock and data.
///
/// Frame: (16 clock cycles while chip select is asserted)
/// - Instruction bit: "1" = write, "0" = no effect
/// - 7-bit Address
/// - 8-bit Data
///
/// Data is set up while the clock is low and sampled by the peripheral on
/// the rising clock edge, highest bit first. The protocol is write-only;
/// there is no data line back to the host and no acknowledge.

mod hardware;
mod low_level;
mod operations;

pub use self::hardware::{
	Hardware,
	OutPins,
};

pub use self::low_level::{
	LowLevel,
	Transaction,
};

pub use self::operations::{
	HardwareOperations,
};
