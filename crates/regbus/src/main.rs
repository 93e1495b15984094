use regbus::{Scenario, DEFAULT_SCRIPT, DEFAULT_SOAK_TRANSACTIONS};
use regbus_common::{PinMap, DEFAULT_PRESET};

fn main() {
    env_logger::init();

    let mut positional = Vec::new();
    let mut preset = DEFAULT_PRESET.to_string();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--pins" {
            preset = args.next().unwrap_or_default();
        } else {
            positional.push(arg);
        }
    }
    let mut positional = positional.into_iter();
    let name = positional.next().unwrap_or_else(|| "roundtrip".to_string());
    let arg = positional.next().unwrap_or_default();

    let Some(pin_map) = PinMap::preset(&preset) else {
        eprintln!(
            "Unknown pin preset '{}'. Supported: {}",
            preset,
            PinMap::preset_names().join(", ")
        );
        std::process::exit(1);
    };

    let scenario = match name.as_str() {
        "roundtrip" | "round-trip" => Scenario::RoundTrip,
        "independent" => Scenario::Independent,
        "priority" => Scenario::Priority,
        "soak" => {
            let seed = if arg.is_empty() {
                0
            } else {
                match arg.parse() {
                    Ok(seed) => seed,
                    Err(_) => {
                        eprintln!("Soak seed must be a number, got '{}'", arg);
                        std::process::exit(1);
                    }
                }
            };
            Scenario::Soak {
                seed,
                transactions: DEFAULT_SOAK_TRANSACTIONS,
            }
        }
        "script" => {
            if arg.is_empty() {
                log::info!("No script path provided, running bundled round-trip script");
                Scenario::Script(DEFAULT_SCRIPT.to_string())
            } else {
                log::info!("Running script: '{}'", arg);
                match std::fs::read_to_string(&arg) {
                    Ok(text) => Scenario::Script(text),
                    Err(err) => {
                        eprintln!("Failed to read script '{}': {}", arg, err);
                        std::process::exit(1);
                    }
                }
            }
        }
        other => {
            eprintln!(
                "Unknown scenario '{}'. Supported: roundtrip, independent, priority, soak, script",
                other
            );
            std::process::exit(1);
        }
    };

    if let Err(err) = regbus::run(scenario, pin_map) {
        log::error!("{err:#}");
        eprintln!("TEST FAILED: {err:#}");
        std::process::exit(1);
    }
}
