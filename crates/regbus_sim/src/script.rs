//! Line-oriented transaction scripts.
//!
//! ```text
//! # comment
//! reset [cycles]
//! write <addr> <data>
//! read <addr> [expect <value>]
//! both <write_addr> <data> <read_addr>
//! idle <cycles>
//! ```
//!
//! Numbers are decimal or `0x`-prefixed hex. Anything after `#` is ignored.

use anyhow::{bail, Context};
use regbus_common::PinDevice;

use crate::driver::Driver;
use crate::error::Result;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// `None` uses the driver's configured reset length.
    Reset { cycles: Option<u32> },
    Write { addr: u8, data: u8 },
    Read { addr: u8, expect: Option<u8> },
    Both { write_addr: u8, data: u8, read_addr: u8 },
    Idle { cycles: u32 },
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ScriptReport {
    /// Completed write, read and write+read transactions.
    pub transactions: u64,
    /// Reads whose value was checked.
    pub checks: u64,
    pub cycles: u64,
}

pub fn parse_script(text: &str) -> anyhow::Result<Vec<Command>> {
    let mut commands = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let command =
            parse_line(line).with_context(|| format!("line {}: `{}`", index + 1, line))?;
        commands.push(command);
    }
    Ok(commands)
}

fn parse_line(line: &str) -> anyhow::Result<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["reset"] => Command::Reset { cycles: None },
        ["reset", cycles] => Command::Reset {
            cycles: Some(parse_num(cycles)?),
        },
        ["write", addr, data] => Command::Write {
            addr: parse_num(addr)?,
            data: parse_num(data)?,
        },
        ["read", addr] => Command::Read {
            addr: parse_num(addr)?,
            expect: None,
        },
        ["read", addr, "expect", value] => Command::Read {
            addr: parse_num(addr)?,
            expect: Some(parse_num(value)?),
        },
        ["both", write_addr, data, read_addr] => Command::Both {
            write_addr: parse_num(write_addr)?,
            data: parse_num(data)?,
            read_addr: parse_num(read_addr)?,
        },
        ["idle", cycles] => Command::Idle {
            cycles: parse_num(cycles)?,
        },
        [op, ..] => bail!("unknown or malformed `{op}` command"),
        [] => bail!("empty command"),
    };
    Ok(command)
}

fn parse_num<T: TryFrom<u64>>(word: &str) -> anyhow::Result<T> {
    let value = match word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => word.parse::<u64>(),
    }
    .with_context(|| format!("`{word}` is not a number"))?;
    T::try_from(value)
        .ok()
        .with_context(|| format!("`{word}` is out of range"))
}

/// Execute `commands` in order, stopping at the first failure.
pub fn run_script<D: PinDevice>(
    driver: &mut Driver<D>,
    commands: &[Command],
) -> Result<ScriptReport> {
    let start = driver.cycle();
    let mut report = ScriptReport::default();
    for command in commands {
        log::debug!("script: {command:?}");
        match *command {
            Command::Reset { cycles } => match cycles {
                Some(cycles) => driver.reset_for(cycles),
                None => driver.reset(),
            },
            Command::Write { addr, data } => {
                driver.write(addr, data)?;
                report.transactions += 1;
            }
            Command::Read { addr, expect } => {
                match expect {
                    Some(expected) => {
                        driver.expect_read(addr, expected)?;
                        report.checks += 1;
                    }
                    None => {
                        driver.read(addr)?;
                    }
                }
                report.transactions += 1;
            }
            Command::Both {
                write_addr,
                data,
                read_addr,
            } => {
                driver.write_and_read(write_addr, data, read_addr)?;
                report.transactions += 1;
            }
            Command::Idle { cycles } => driver.idle(cycles),
        }
    }
    report.cycles = driver.cycle() - start;
    Ok(report)
}
