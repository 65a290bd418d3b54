use super::decoder::FrameDecoder;
use crate::frame::Frame;
use crate::registers::{
	Register,
	Registers,
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CommitEvent {
	Written { register: Register, value: u8 },
	// complete frame without effect: instruction bit clear or address out of range
	Ignored(Frame),
}

/// Writes exactly one register per completed frame.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct CommitUnit {
	frame_processed: bool,
}

impl CommitUnit {
	pub fn frame_processed(&self) -> bool {
		self.frame_processed
	}

	/// Flag and register file after the next clock edge, given the current
	/// decoder state.
	pub fn next(&self, decoder: &FrameDecoder, registers: &Registers) -> (Self, Registers, Option<CommitEvent>) {
		let mut registers = *registers;

		if decoder.frame_complete() && !self.frame_processed {
			let frame = decoder.frame();
			let event = match frame.target() {
				Some(register) => {
					registers.set(register, frame.data);
					CommitEvent::Written { register, value: frame.data }
				},
				None => CommitEvent::Ignored(frame),
			};
			return (CommitUnit { frame_processed: true }, registers, Some(event));
		}

		if !decoder.frame_complete() && self.frame_processed {
			return (CommitUnit { frame_processed: false }, registers, None);
		}

		(*self, registers, None)
	}
}
