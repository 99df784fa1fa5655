//! Blink one LED while the button is held, power off after the hold time.

use embassy_executor::Executor;
use embassy_time::Delay;
use shutdown_button::actors::{BlinkSignal, Blinker, EventQueue, HoldButton};
use shutdown_button::config::LedConfig;
use shutdown_button::drivers::button::Button;
use shutdown_button::drivers::led::GpioLed;
use shutdown_button::drivers::linux::{SysfsInput, SysfsOutput};
use shutdown_button::drivers::power::SystemPower;
use shutdown_button::feedback::{LedFeedback, RateMode};
use shutdown_button::runtime::{configure, fatal, init_logger};
use shutdown_button::{HoldTracker, ShutdownController};
use static_cell::StaticCell;

static EXECUTOR: StaticCell<Executor> = StaticCell::new();
static EVENTS: EventQueue = EventQueue::new();
static PATTERNS: BlinkSignal = BlinkSignal::new();

type Controller = ShutdownController<LedFeedback<'static>, SystemPower>;

#[embassy_executor::task]
async fn button_task(mut button: HoldButton<SysfsInput>) {
    match button.run(&EVENTS).await {
        Ok(never) => match never {},
        Err(e) => fatal("Button", e),
    }
}

#[embassy_executor::task]
async fn blinker_task(mut blinker: Blinker<GpioLed<SysfsOutput>, Delay>) {
    match blinker.run(&PATTERNS).await {
        Ok(never) => match never {},
        Err(e) => fatal("LED", e),
    }
}

#[embassy_executor::task]
async fn controller_task(mut controller: Controller) {
    match controller.run(&EVENTS).await {
        Ok(never) | Err(never) => match never {},
    }
}

fn main() -> Result<(), anyhow::Error> {
    init_logger();
    let config: LedConfig = match configure()? {
        Some(config) => config,
        None => return Ok(()),
    };
    log::info!(
        "Watching gpio{}, hold {} s to power off, LED on gpio{}",
        config.button_pin,
        config.hold_time.as_secs(),
        config.led_pin
    );

    let button = HoldButton::new(
        Button::new(SysfsInput::new(config.button_pin)?),
        HoldTracker::new(config.hold_time, false),
    );
    let blinker = Blinker::new(GpioLed::new(SysfsOutput::new(config.led_pin)?), Delay);
    let controller = ShutdownController::new(
        LedFeedback::new(&PATTERNS, RateMode::Constant),
        SystemPower::default(),
        config.hold_time,
    );

    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(blinker_task(blinker));
        spawner.must_spawn(controller_task(controller));
        spawner.must_spawn(button_task(button));
    })
}
