use std::fmt;
use std::str;

/// Targets of a write frame, by address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Register {
	OutputEnableLow,  // 0x00
	OutputEnableHigh, // 0x01
	PwmEnableLow,     // 0x02
	PwmEnableHigh,    // 0x03
	PwmDutyCycle,     // 0x04
}

impl Register {
	pub const ALL: [Register; 5] = [
		Register::OutputEnableLow,
		Register::OutputEnableHigh,
		Register::PwmEnableLow,
		Register::PwmEnableHigh,
		Register::PwmDutyCycle,
	];

	// addresses 5..=127 are accepted on the wire but map to nothing
	pub fn from_address(address: u8) -> Option<Self> {
		match address {
			0x00 => Some(Register::OutputEnableLow),
			0x01 => Some(Register::OutputEnableHigh),
			0x02 => Some(Register::PwmEnableLow),
			0x03 => Some(Register::PwmEnableHigh),
			0x04 => Some(Register::PwmDutyCycle),
			_ => None,
		}
	}

	pub fn address(self) -> u8 {
		match self {
			Register::OutputEnableLow => 0x00,
			Register::OutputEnableHigh => 0x01,
			Register::PwmEnableLow => 0x02,
			Register::PwmEnableHigh => 0x03,
			Register::PwmDutyCycle => 0x04,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Register::OutputEnableLow => "en_out_lo",
			Register::OutputEnableHigh => "en_out_hi",
			Register::PwmEnableLow => "en_pwm_lo",
			Register::PwmEnableHigh => "en_pwm_hi",
			Register::PwmDutyCycle => "pwm_duty",
		}
	}
}

impl fmt::Display for Register {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl str::FromStr for Register {
	type Err = ::failure::Error;

	/// Accepts a register name or its address.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		for &reg in Register::ALL.iter() {
			if reg.name() == s {
				return Ok(reg);
			}
		}
		let address = crate::frame::parse_number(s)?;
		match Register::from_address(address) {
			Some(reg) => Ok(reg),
			None => bail!("no register at address 0x{:02x}", address),
		}
	}
}

/// The five output registers; consumers read them continuously, only the
/// commit unit writes them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Registers {
	values: [u8; 5],
}

impl Registers {
	pub fn get(&self, reg: Register) -> u8 {
		self.values[reg.address() as usize]
	}

	pub(crate) fn set(&mut self, reg: Register, value: u8) {
		self.values[reg.address() as usize] = value;
	}

	pub fn output_enable(&self) -> u16 {
		u16::from(self.get(Register::OutputEnableHigh)) << 8 | u16::from(self.get(Register::OutputEnableLow))
	}

	pub fn pwm_enable(&self) -> u16 {
		u16::from(self.get(Register::PwmEnableHigh)) << 8 | u16::from(self.get(Register::PwmEnableLow))
	}

	pub fn pwm_duty_cycle(&self) -> u8 {
		self.get(Register::PwmDutyCycle)
	}
}

impl fmt::Display for Registers {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f,
			"en_out=0x{:04x} en_pwm=0x{:04x} pwm_duty=0x{:02x}",
			self.output_enable(),
			self.pwm_enable(),
			self.pwm_duty_cycle(),
		)
	}
}

impl fmt::Debug for Registers {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let mut d = f.debug_struct("Registers");
		for &reg in Register::ALL.iter() {
			d.field(reg.name(), &format_args!("0x{:02x}", self.get(reg)));
		}
		d.finish()
	}
}
