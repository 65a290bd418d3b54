use super::{
	Hardware,
	LowLevel,
};
use crate::frame::{
	Frame,
	FRAME_BITS,
};
use crate::registers::Register;

pub trait HardwareOperations: LowLevel {
	fn send_frame(&mut self, frame: Frame) {
		debug!("sending frame {:?}", frame);
		let mut tx = self.start_transaction();
		tx.send_bits(frame.to_word(), FRAME_BITS);
	}

	fn write_register(&mut self, register: Register, value: u8) {
		self.send_frame(Frame::write(register, value))
	}

	// release chip select after the first `bits` bits of the frame
	fn send_partial(&mut self, frame: Frame, bits: usize) -> crate::AResult<()> {
		ensure!(bits <= FRAME_BITS, "can't send {} bits of a {}-bit frame", bits, FRAME_BITS);
		debug!("sending {} of {} bits of frame {:?}", bits, FRAME_BITS, frame);
		let mut tx = self.start_transaction();
		let word = frame.to_word().checked_shr((FRAME_BITS - bits) as u32).unwrap_or(0);
		tx.send_bits(word, bits);
		Ok(())
	}

	// arbitrary bit string in one chip select window
	fn send_raw(&mut self, bits: &[bool]) {
		debug!("sending {} raw bits", bits.len());
		let mut tx = self.start_transaction();
		for &bit in bits {
			tx.send_bit(bit);
		}
	}
}

impl<H: Hardware+?Sized> HardwareOperations for H {
}
