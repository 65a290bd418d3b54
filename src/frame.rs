/// One 16-bit frame on the wire, most significant bit first:
///
/// - bit 15: instruction bit ("1" = write, "0" = no-op / read)
/// - bits 14..8: 7-bit address
/// - bits 7..0: data
///
/// There is no read path; a frame with instruction bit "0" is accepted by
/// the peripheral but has no effect.

use std::fmt;
use std::str;

use crate::registers::Register;

pub const FRAME_BITS: usize = 16;
pub const ADDRESS_LIMIT: u8 = 0x80;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frame {
	pub write: bool,
	pub address: u8,
	pub data: u8,
}

impl Frame {
	pub fn new(write: bool, address: u8, data: u8) -> crate::AResult<Self> {
		ensure!(address < ADDRESS_LIMIT, "address must be 7-bit (0-127): 0x{:02x}", address);
		Ok(Frame { write, address, data })
	}

	pub fn write(reg: Register, data: u8) -> Self {
		Frame {
			write: true,
			address: reg.address(),
			data,
		}
	}

	pub fn from_word(word: u16) -> Self {
		Frame {
			write: 0 != word & 0x8000,
			address: ((word >> 8) & 0x7f) as u8,
			data: word as u8,
		}
	}

	pub fn to_word(&self) -> u16 {
		let instruction = if self.write { 0x8000 } else { 0x0000 };
		instruction | (u16::from(self.address & 0x7f) << 8) | u16::from(self.data)
	}

	/// Register this frame would change, if any.
	pub fn target(&self) -> Option<Register> {
		if self.write {
			Register::from_address(self.address)
		} else {
			None
		}
	}
}

impl fmt::Display for Frame {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}:0x{:02x}:0x{:02x}", if self.write { 'w' } else { 'r' }, self.address, self.data)
	}
}

impl fmt::Debug for Frame {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:04x} (address: 0x{:02x}, data: 0x{:02x}", self.to_word(), self.address, self.data)?;
		if self.write { write!(f, " [WR]")?; }
		match self.target() {
			Some(reg) => write!(f, " [{}])", reg),
			None => write!(f, ")"),
		}
	}
}

/// Parse a byte given in decimal or as hex with a `0x` prefix.
pub fn parse_number(s: &str) -> crate::AResult<u8> {
	with_context!(("invalid number {:?}", s), {
		if s.starts_with("0x") || s.starts_with("0X") {
			Ok(u8::from_str_radix(&s[2..], 16)?)
		} else {
			Ok(s.parse::<u8>()?)
		}
	})
}

impl str::FromStr for Frame {
	type Err = ::failure::Error;

	// short: w:2:5, long: r:0x7f:0xff
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let parts: Vec<&str> = s.split(':').collect();
		ensure!(parts.len() == 3, "expected INSTRUCTION:ADDRESS:DATA, got {:?}", s);

		let write = match parts[0] {
			"w" | "W" | "1" => true,
			"r" | "R" | "0" => false,
			other => bail!("invalid instruction {:?} (expected 'w' or 'r')", other),
		};
		let address = parse_number(parts[1])?;
		let data = parse_number(parts[2])?;

		Frame::new(write, address, data)
	}
}

#[cfg(test)]
mod test {
	use super::Frame;
	use crate::registers::Register;

	#[test]
	fn wire_layout() {
		let frame = Frame::new(true, 0x02, 0x05).unwrap();
		assert_eq!(frame.to_word(), 0b1_0000010_00000101);
		assert_eq!(Frame::from_word(0b1_0000010_00000101), frame);
		assert_eq!(frame.target(), Some(Register::PwmEnableLow));

		let frame = Frame::from_word(0x30aa);
		assert!(!frame.write);
		assert_eq!(frame.address, 0x30);
		assert_eq!(frame.data, 0xaa);
		assert_eq!(frame.target(), None);
	}

	#[test]
	fn reject_wide_address() {
		assert!(Frame::new(true, 0x7f, 0).is_ok());
		assert!(Frame::new(true, 0x80, 0).is_err());
	}

	#[test]
	fn parse_frame() {
		assert_eq!("w:2:5".parse::<Frame>().unwrap(), Frame::write(Register::PwmEnableLow, 5));
		assert_eq!("r:0x30:0xbe".parse::<Frame>().unwrap(), Frame::new(false, 0x30, 0xbe).unwrap());
		assert_eq!("w:0x04:0xcf".parse::<Frame>().unwrap().to_string(), "w:0x04:0xcf");
		assert!("w:2".parse::<Frame>().is_err());
		assert!("x:2:5".parse::<Frame>().is_err());
		assert!("w:0x80:5".parse::<Frame>().is_err());
		assert!("w:2:256".parse::<Frame>().is_err());
	}
}
