//! Command-line configuration for the shutdown binaries.
//!
//! Every binary takes optional positional arguments and falls back to the
//! defaults below. `-h` or `--help` as the first argument prints usage.

use crate::drivers::power::DEFAULT_POWER_OFF;
use crate::drivers::sound::{DEFAULT_PLAYER, DEFAULT_PROBE};
use crate::feedback::sound::GRACE_TIME;
use core::fmt;
use embassy_time::Duration;
use std::path::PathBuf;

pub const DEFAULT_BUTTON_PIN: u64 = 21;
pub const DEFAULT_HOLD_SECS: u64 = 6;
pub const DEFAULT_LED_PIN: u64 = 2;

pub const ACTIVITY_LED_PIN: u64 = 47;
pub const POWER_LED_PIN: u64 = 35;
/// Hold time after which the LED board first reacts, and its repeat period.
pub const BOARD_NOTICE_TIME: Duration = Duration::from_secs(1);

pub const SOUND_HOLD_SECS: u64 = 10;
pub const WARNING_SAMPLE: &str = "ImMeltingMelting.ogg";
pub const FINALE_SAMPLE: &str = "NoPlaceLikeHome.ogg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber {
        position: usize,
        name: &'static str,
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber {
                position,
                name,
                value,
            } => write!(
                f,
                "argument {} ({}) must be a non-negative integer, got {:?}",
                position, name, value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation<C> {
    Run(C),
    Help,
}

pub trait Configuration: Sized {
    const USAGE: &'static str;

    fn parse(args: &[String]) -> Result<Self, ConfigError>;

    fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Invocation<Self>, ConfigError> {
        let args: Vec<String> = args.into_iter().collect();
        match args.first().map(String::as_str) {
            Some("-h") | Some("--help") => Ok(Invocation::Help),
            _ => Self::parse(&args).map(Invocation::Run),
        }
    }
}

fn positional(
    args: &[String],
    index: usize,
    name: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match args.get(index) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber {
                position: index + 1,
                name,
                value: value.clone(),
            }),
    }
}

/// `shutdown-led [button-pin] [hold-seconds] [led-pin]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedConfig {
    pub button_pin: u64,
    pub hold_time: Duration,
    pub led_pin: u64,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            button_pin: DEFAULT_BUTTON_PIN,
            hold_time: Duration::from_secs(DEFAULT_HOLD_SECS),
            led_pin: DEFAULT_LED_PIN,
        }
    }
}

impl Configuration for LedConfig {
    const USAGE: &'static str = "USAGE shutdown-led [button-pin] [hold-seconds] [led-pin]";

    fn parse(args: &[String]) -> Result<Self, ConfigError> {
        Ok(Self {
            button_pin: positional(args, 0, "button pin", DEFAULT_BUTTON_PIN)?,
            hold_time: Duration::from_secs(positional(
                args,
                1,
                "hold seconds",
                DEFAULT_HOLD_SECS,
            )?),
            led_pin: positional(args, 2, "LED pin", DEFAULT_LED_PIN)?,
        })
    }
}

/// `shutdown-ledboard [button-pin] [off-seconds]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedBoardConfig {
    pub button_pin: u64,
    pub off_time: Duration,
    pub notice_time: Duration,
    pub led_pins: [u64; 2],
}

impl Default for LedBoardConfig {
    fn default() -> Self {
        Self {
            button_pin: DEFAULT_BUTTON_PIN,
            off_time: Duration::from_secs(DEFAULT_HOLD_SECS),
            notice_time: BOARD_NOTICE_TIME,
            led_pins: [ACTIVITY_LED_PIN, POWER_LED_PIN],
        }
    }
}

impl Configuration for LedBoardConfig {
    const USAGE: &'static str = "USAGE shutdown-ledboard [button-pin] [off-seconds]";

    fn parse(args: &[String]) -> Result<Self, ConfigError> {
        Ok(Self {
            button_pin: positional(args, 0, "button pin", DEFAULT_BUTTON_PIN)?,
            off_time: Duration::from_secs(positional(
                args,
                1,
                "off seconds",
                DEFAULT_HOLD_SECS,
            )?),
            ..Self::default()
        })
    }
}

/// `shutdown-melting`, no arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundConfig {
    pub button_pin: u64,
    pub hold_time: Duration,
    pub warning: PathBuf,
    pub finale: PathBuf,
    pub grace: Duration,
    pub player: Vec<String>,
    pub probe: Vec<String>,
    pub power_off: Vec<String>,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            button_pin: DEFAULT_BUTTON_PIN,
            hold_time: Duration::from_secs(SOUND_HOLD_SECS),
            warning: PathBuf::from(WARNING_SAMPLE),
            finale: PathBuf::from(FINALE_SAMPLE),
            grace: GRACE_TIME,
            player: DEFAULT_PLAYER.iter().map(|s| s.to_string()).collect(),
            probe: DEFAULT_PROBE.iter().map(|s| s.to_string()).collect(),
            power_off: DEFAULT_POWER_OFF.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Configuration for SoundConfig {
    const USAGE: &'static str = "USAGE shutdown-melting";

    fn parse(_: &[String]) -> Result<Self, ConfigError> {
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_led_defaults() {
        assert_eq!(
            Invocation::Run(LedConfig {
                button_pin: 21,
                hold_time: Duration::from_secs(6),
                led_pin: 2,
            }),
            LedConfig::from_args(args(&[])).unwrap()
        );
    }

    #[test]
    fn test_led_positional_overrides() {
        let config = LedConfig::from_args(args(&["17", "3"])).unwrap();
        assert_eq!(
            Invocation::Run(LedConfig {
                button_pin: 17,
                hold_time: Duration::from_secs(3),
                led_pin: 2,
            }),
            config
        );

        let config = LedConfig::from_args(args(&["17", "3", "4", "extra"])).unwrap();
        assert!(matches!(config, Invocation::Run(LedConfig { led_pin: 4, .. })));
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert_eq!(
            Err(ConfigError::InvalidNumber {
                position: 2,
                name: "hold seconds",
                value: "six".to_string(),
            }),
            LedConfig::from_args(args(&["21", "six"]))
        );
        assert!(LedBoardConfig::from_args(args(&["-5"])).is_err());
    }

    #[test]
    fn test_board_pins_fixed() {
        let config = LedBoardConfig::from_args(args(&["20", "8", "99"])).unwrap();
        assert_eq!(
            Invocation::Run(LedBoardConfig {
                button_pin: 20,
                off_time: Duration::from_secs(8),
                notice_time: Duration::from_secs(1),
                led_pins: [47, 35],
            }),
            config
        );
    }

    #[test]
    fn test_sound_uses_constants() {
        let config = SoundConfig::from_args(args(&["5", "5"])).unwrap();
        let expected = SoundConfig::default();
        assert_eq!(Invocation::Run(expected.clone()), config);
        assert_eq!(Duration::from_secs(10), expected.hold_time);
        assert_eq!(PathBuf::from("ImMeltingMelting.ogg"), expected.warning);
    }

    #[test]
    fn test_help() {
        assert_eq!(
            Invocation::Help,
            LedConfig::from_args(args(&["--help"])).unwrap()
        );
        assert_eq!(Invocation::Help, SoundConfig::from_args(args(&["-h"])).unwrap());
    }
}
