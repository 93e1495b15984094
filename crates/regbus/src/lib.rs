use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regbus_common::{PinMap, MAX_REGISTERS};
use regbus_periph::{PeripheralConfig, PeripheralTop};
use regbus_sim::{parse_script, run_script, Driver, ScriptReport, SimInitInfo};

/// Script run when `script` is given without a path.
pub const DEFAULT_SCRIPT: &str = include_str!("../../../assets/scripts/roundtrip.txt");

pub const DEFAULT_SOAK_TRANSACTIONS: u32 = 1000;

pub enum Scenario {
    /// Reset, write 0x04 to register 1, read it back.
    RoundTrip,
    /// Two registers written back to back keep their own values.
    Independent,
    /// Both start lines on one edge; the write must land.
    Priority,
    /// Random writes, reads and resets checked against a shadow copy.
    Soak { seed: u64, transactions: u32 },
    /// Transaction script source text.
    Script(String),
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SoakReport {
    pub writes: u32,
    pub reads: u32,
    pub resets: u32,
    pub cycles: u64,
}

pub fn run(scenario: Scenario, pin_map: PinMap) -> Result<()> {
    match scenario {
        Scenario::RoundTrip => {
            run_round_trip(pin_map)?;
        }
        Scenario::Independent => {
            run_independent(pin_map)?;
        }
        Scenario::Priority => {
            run_priority(pin_map)?;
        }
        Scenario::Soak { seed, transactions } => {
            let report = run_soak(pin_map, seed, transactions)?;
            log::info!(
                "soak seed={}: {} writes, {} reads, {} resets in {} cycles",
                seed,
                report.writes,
                report.reads,
                report.resets,
                report.cycles
            );
        }
        Scenario::Script(text) => {
            let report = run_script_text(pin_map, &text)?;
            log::info!(
                "script: {} transactions, {} checks in {} cycles",
                report.transactions,
                report.checks,
                report.cycles
            );
        }
    }
    log::info!("TEST PASSED");
    Ok(())
}

/// Build the peripheral for `pin_map` and bring it out of reset. The store
/// gets as many address bits as the pin fields carry.
pub fn reset_driver(pin_map: PinMap) -> Result<Driver<PeripheralTop>> {
    let config = PeripheralConfig::builder()
        .addr_width(pin_map.addr_field_width)
        .pin_map(pin_map)
        .build();
    let top = PeripheralTop::new(&config)?;
    let mut driver = Driver::new(top, SimInitInfo::default());
    driver.reset();
    Ok(driver)
}

pub fn run_round_trip(pin_map: PinMap) -> Result<()> {
    let mut driver = reset_driver(pin_map)?;
    let write_addr = 0x1;
    let write_data = 0x4;
    driver.write(write_addr, write_data)?;
    driver.expect_read(write_addr, write_data)?;
    Ok(())
}

pub fn run_independent(pin_map: PinMap) -> Result<()> {
    let mut driver = reset_driver(pin_map)?;
    driver.write(0x2, 0xAB)?;
    driver.write(0x1, 0x11)?;
    driver.expect_read(0x2, 0xAB)?;
    driver.expect_read(0x1, 0x11)?;
    Ok(())
}

pub fn run_priority(pin_map: PinMap) -> Result<()> {
    let mut driver = reset_driver(pin_map)?;
    driver.write_and_read(0x1, 0x5A, 0x2)?;

    let counters = driver.device().controller().counters();
    if counters.writes != 1 || counters.reads != 0 {
        bail!(
            "simultaneous start ran {} write(s) and {} read(s), expected exactly one write",
            counters.writes,
            counters.reads
        );
    }
    driver.expect_read(0x1, 0x5A)?;
    Ok(())
}

pub fn run_soak(pin_map: PinMap, seed: u64, transactions: u32) -> Result<SoakReport> {
    let mut driver = reset_driver(pin_map)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut shadow = [0u8; MAX_REGISTERS];
    let mask = pin_map.addr_mask();
    let start = driver.cycle();
    let mut report = SoakReport::default();

    for _ in 0..transactions {
        // Full-byte addresses: the high bits must be masked away.
        let addr: u8 = rng.gen();
        let index = (addr & mask) as usize;
        match rng.gen_range(0..64u32) {
            0 => {
                driver.reset();
                shadow = [0; MAX_REGISTERS];
                report.resets += 1;
            }
            1..=31 => {
                let data: u8 = rng.gen();
                driver.write(addr, data)?;
                shadow[index] = data;
                report.writes += 1;
            }
            _ => {
                driver.expect_read(addr, shadow[index])?;
                report.reads += 1;
            }
        }
    }
    report.cycles = driver.cycle() - start;
    Ok(report)
}

pub fn run_script_text(pin_map: PinMap, text: &str) -> Result<ScriptReport> {
    let commands = parse_script(text)?;
    let mut driver = reset_driver(pin_map)?;
    Ok(run_script(&mut driver, &commands)?)
}

#[cfg(test)]
mod tests;
