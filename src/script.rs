/// Line based scripts for the simulator, one command per line:
///
/// ```text
/// # comment
/// reset
/// write 0x02 0x05      # instruction bit 1
/// read 0x30 0xbe       # instruction bit 0, no effect
/// bits 1000001000000   # raw bits in one chip select window
/// idle 1000
/// expect en_pwm_lo 0x05
/// ```
///
/// `write`, `read` and `bits` wait the settle time after the frame.

use std::str;

use crate::frame::{
	parse_number,
	Frame,
};
use crate::peripheral::Event;
use crate::registers::Register;
use crate::serial::HardwareOperations;
use crate::sim::SimulatedLink;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Command {
	Reset,
	Idle(u64),
	Send(Frame),
	Bits(Vec<bool>),
	Expect(Register, u8),
}

fn parse_bits(s: &str) -> crate::AResult<Vec<bool>> {
	s.chars().filter(|&c| c != '_').map(|c| match c {
		'0' => Ok(false),
		'1' => Ok(true),
		_ => bail!("invalid bit {:?} in {:?}", c, s),
	}).collect()
}

impl str::FromStr for Command {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let words: Vec<&str> = s.split_whitespace().collect();
		ensure!(!words.is_empty(), "empty command");

		let args = &words[1..];
		let expect_args = |n: usize| -> crate::AResult<()> {
			ensure!(args.len() == n, "{} expects {} argument(s), got {}", words[0], n, args.len());
			Ok(())
		};

		match words[0] {
			"reset" => {
				expect_args(0)?;
				Ok(Command::Reset)
			},
			"idle" => {
				expect_args(1)?;
				let cycles = with_context!(("invalid cycle count {:?}", args[0]),
					Ok(args[0].parse::<u64>()?)
				)?;
				Ok(Command::Idle(cycles))
			},
			"write" | "read" => {
				expect_args(2)?;
				let frame = Frame::new(words[0] == "write", parse_number(args[0])?, parse_number(args[1])?)?;
				Ok(Command::Send(frame))
			},
			"send" => {
				expect_args(1)?;
				Ok(Command::Send(args[0].parse()?))
			},
			"bits" => {
				expect_args(1)?;
				Ok(Command::Bits(parse_bits(args[0])?))
			},
			"expect" => {
				expect_args(2)?;
				Ok(Command::Expect(args[0].parse()?, parse_number(args[1])?))
			},
			cmd => bail!("unknown command {:?}", cmd),
		}
	}
}

/// Commands with their (1-based) line number.
pub fn parse_script(source: &str) -> crate::AResult<Vec<(usize, Command)>> {
	let mut commands = Vec::new();
	for (index, line) in source.lines().enumerate() {
		let line = match line.find('#') {
			Some(pos) => &line[..pos],
			None => line,
		}.trim();
		if line.is_empty() {
			continue;
		}
		let command = with_context!(("line {}", index + 1), line.parse::<Command>())?;
		commands.push((index + 1, command));
	}
	Ok(commands)
}

pub fn run_command(link: &mut SimulatedLink, command: &Command) -> crate::AResult<()> {
	match *command {
		Command::Reset => link.reset(),
		Command::Idle(cycles) => link.idle(cycles),
		Command::Send(frame) => {
			link.send_frame(frame);
			link.settle();
		},
		Command::Bits(ref bits) => {
			link.send_raw(bits);
			link.settle();
		},
		Command::Expect(register, value) => {
			let actual = link.registers().get(register);
			ensure!(actual == value, "expected {} = 0x{:02x}, got 0x{:02x}", register, value, actual);
		},
	}
	Ok(())
}

/// Runs the commands in order, stopping at the first failure. The events of
/// each command are drained from the link and passed to `observe` together
/// with the command's line, also for the failing command.
pub fn run_script<F>(link: &mut SimulatedLink, commands: &[(usize, Command)], mut observe: F) -> crate::AResult<()>
where
	F: FnMut(usize, Vec<(u64, Event)>),
{
	for &(line, ref command) in commands {
		trace!("line {}: {:?}", line, command);
		let result = run_command(link, command);
		observe(line, link.take_events());
		with_context!(("line {}", line), result)?;
	}
	Ok(())
}
