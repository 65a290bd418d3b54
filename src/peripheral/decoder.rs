use super::sync::InputSync;
use crate::frame::{
	Frame,
	FRAME_BITS,
};

/// What the decoder saw on a single clock edge.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DecodeEvent {
	Start,
	Bit { position: u8, value: bool },
	// chip select released after exactly 16 bits
	Complete(Frame),
	// chip select released after `bits` bits (capped at 16; `overrun` set if more arrived)
	Dropped { bits: u8, overrun: bool },
}

/// Bit assembly state of the frame currently on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct FrameDecoder {
	bit_count: u8,
	// a sample edge arrived while `bit_count` was already at the cap
	overrun: bool,
	instruction: bool,
	address: u8,
	data: u8,
	frame_complete: bool,
}

impl FrameDecoder {
	pub fn bit_count(&self) -> u8 {
		self.bit_count
	}

	pub fn frame_complete(&self) -> bool {
		self.frame_complete
	}

	/// Fields assembled so far; only meaningful while `frame_complete` is set.
	pub fn frame(&self) -> Frame {
		Frame {
			write: self.instruction,
			address: self.address,
			data: self.data,
		}
	}

	/// State after the next clock edge; `frame_processed` is the current
	/// flag of the commit unit.
	pub fn next(&self, sync: &InputSync, frame_processed: bool) -> (Self, Option<DecodeEvent>) {
		let mut next = *self;

		if sync.frame_start() {
			next.bit_count = 0;
			next.overrun = false;
			next.instruction = false;
			next.address = 0;
			next.data = 0;
			return (next, Some(DecodeEvent::Start));
		}

		if sync.selected() && sync.sample_edge() {
			let bit = sync.data();
			let position = self.bit_count;
			match position {
				0 => next.instruction = bit,
				1..=7 => next.address = ((self.address << 1) | bit as u8) & 0x7f,
				8..=15 => next.data = (self.data << 1) | bit as u8,
				_ => next.overrun = true,
			}
			if (self.bit_count as usize) < FRAME_BITS {
				next.bit_count = self.bit_count + 1;
			}
			return (next, Some(DecodeEvent::Bit { position, value: bit }));
		}

		if sync.frame_end() {
			next.bit_count = 0;
			if self.bit_count as usize == FRAME_BITS && !self.overrun {
				next.frame_complete = true;
				return (next, Some(DecodeEvent::Complete(self.frame())));
			}
			return (next, Some(DecodeEvent::Dropped { bits: self.bit_count, overrun: self.overrun }));
		}

		if frame_processed {
			next.frame_complete = false;
		}

		(next, None)
	}
}
