#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate spi_pwm_regs;
use spi_pwm_regs::*;

use std::fs;
use std::process::exit;

use failure::ResultExt;

use spi_pwm_regs::frame::{
	parse_number,
	FRAME_BITS,
};
use spi_pwm_regs::serial::HardwareOperations;
use spi_pwm_regs::sim::{
	SimulatedLink,
	Timing,
};

fn get_param<T>(matches: &clap::ArgMatches, name: &str) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => bail!("missing parameter {}", name),
	};
	param.parse::<T>().map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid parameter {}: {}", name, e);
		e.context(msg).into()
	})
}

fn get_optional_param<T>(matches: &clap::ArgMatches, name: &str, default: T) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	if matches.is_present(name) {
		get_param(matches, name)
	} else {
		Ok(default)
	}
}

fn get_number(matches: &clap::ArgMatches, name: &str) -> AResult<u8> {
	match matches.value_of(name) {
		Some(p) => parse_number(p),
		None => bail!("missing parameter {}", name),
	}
}

// global options are propagated into the subcommand matches
fn timing(matches: &clap::ArgMatches) -> AResult<Timing> {
	let defaults = Timing::default();
	Ok(Timing {
		half_period: get_optional_param(matches, "half_period", defaults.half_period)?,
		settle: get_optional_param(matches, "settle", defaults.settle)?,
		reset_cycles: defaults.reset_cycles,
	})
}

fn print_events(events: Vec<(u64, Event)>) {
	for (cycle, event) in events {
		match event {
			Event::FrameAccepted(frame) => println!("@{:>8}: frame {}", cycle, frame),
			Event::FrameDropped { bits, overrun: false } => println!("@{:>8}: dropped after {} bits", cycle, bits),
			Event::FrameDropped { bits, overrun: true } => println!("@{:>8}: dropped, more than {} bits", cycle, bits),
			Event::Written { register, value } => println!("@{:>8}: {} <- 0x{:02x}", cycle, register, value),
			Event::Ignored(frame) => println!("@{:>8}: no effect: {}", cycle, frame),
			Event::Reset | Event::FrameStart => (),
		}
	}
}

fn report(link: &mut SimulatedLink) {
	print_events(link.take_events());
	println!("{}", link.registers());
}

fn write_register(sub_m: &clap::ArgMatches) -> AResult<()> {
	let address = get_number(sub_m, "ADDRESS")?;
	let data = get_number(sub_m, "DATA")?;
	let frame = Frame::new(true, address, data)?;

	let mut link = SimulatedLink::new(timing(sub_m)?)?;
	link.reset();
	link.send_frame(frame);
	link.settle();
	report(&mut link);
	Ok(())
}

fn send_frames(sub_m: &clap::ArgMatches) -> AResult<()> {
	let frames = sub_m.values_of("FRAME").map(|v| v.collect::<Vec<_>>()).unwrap_or_default();
	let bits: usize = get_optional_param(sub_m, "bits", FRAME_BITS)?;

	let mut link = SimulatedLink::new(timing(sub_m)?)?;
	link.reset();
	for f in frames {
		let frame = f.parse::<Frame>().with_context(|e| format!("invalid frame {:?}: {}", f, e))?;
		if bits == FRAME_BITS {
			link.send_frame(frame);
		} else {
			link.send_partial(frame, bits)?;
		}
		link.settle();
	}
	report(&mut link);
	Ok(())
}

fn run_script_file(sub_m: &clap::ArgMatches) -> AResult<()> {
	let path = match sub_m.value_of("FILE") {
		Some(p) => p,
		None => bail!("missing parameter FILE"),
	};
	let source = fs::read_to_string(path).with_context(|e| format!("couldn't read script {}: {}", path, e))?;
	let commands = script::parse_script(&source).with_context(|e| format!("in script {}: {}", path, e))?;

	let mut link = SimulatedLink::new(timing(sub_m)?)?;
	link.reset();
	info!("running {} commands from {}", commands.len(), path);
	let result = script::run_script(&mut link, &commands, |_, events| print_events(events));
	println!("{}", link.registers());
	Ok(result.with_context(|e| format!("in script {}: {}", path, e))?)
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@setting SubcommandRequiredElseHelp)
		(global_setting: clap::AppSettings::VersionlessSubcommands)
		(@arg half_period: --("half-period") +takes_value +global "local clock cycles per serial clock edge (default 50)")
		(@arg settle: --settle +takes_value +global "idle cycles after each frame (default 600)")
		(@subcommand write =>
			(about: "reset, write one register and show the result")
			(@arg ADDRESS: +required "register address (0-127, decimal or 0x..)")
			(@arg DATA: +required "value to write (0-255, decimal or 0x..)")
		)
		(@subcommand send =>
			(about: "reset and send frames given as w:ADDRESS:DATA or r:ADDRESS:DATA")
			(@arg bits: -b --bits +takes_value "release chip select after this many bits of each frame")
			(@arg FRAME: +required +multiple "frames to send")
		)
		(@subcommand script =>
			(about: "reset and run a script (reset, idle, write, read, send, bits, expect)")
			(@arg FILE: +required "script file")
		)
	).get_matches();

	match matches.subcommand() {
		("write", Some(sub_m)) => {
			write_register(sub_m)
		}
		("send", Some(sub_m)) => {
			send_frames(sub_m)
		}
		("script", Some(sub_m)) => {
			run_script_file(sub_m)
		}
		("", _) => bail!("no subcommand"),
		(cmd, _) => bail!("not implemented subcommand {:?}", cmd),
	}
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
