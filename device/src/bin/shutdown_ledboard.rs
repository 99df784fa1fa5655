//! Blink the activity and power LEDs while the button is held, faster the
//! longer it stays down, and power off once it has been held long enough.

use embassy_executor::Executor;
use embassy_time::Delay;
use shutdown_button::actors::{BlinkSignal, Blinker, EventQueue, HoldButton};
use shutdown_button::config::LedBoardConfig;
use shutdown_button::drivers::button::Button;
use shutdown_button::drivers::led::{GpioLed, LedBoard};
use shutdown_button::drivers::linux::{SysfsInput, SysfsOutput};
use shutdown_button::drivers::power::SystemPower;
use shutdown_button::feedback::{LedFeedback, RateMode};
use shutdown_button::runtime::{configure, fatal, init_logger};
use shutdown_button::{HoldTracker, ShutdownController};
use static_cell::StaticCell;

static EXECUTOR: StaticCell<Executor> = StaticCell::new();
static EVENTS: EventQueue = EventQueue::new();
static PATTERNS: BlinkSignal = BlinkSignal::new();

type Leds = LedBoard<GpioLed<SysfsOutput>, 2>;
type Controller = ShutdownController<LedFeedback<'static>, SystemPower>;

#[embassy_executor::task]
async fn button_task(mut button: HoldButton<SysfsInput>) {
    match button.run(&EVENTS).await {
        Ok(never) => match never {},
        Err(e) => fatal("Button", e),
    }
}

#[embassy_executor::task]
async fn blinker_task(mut blinker: Blinker<Leds, Delay>) {
    match blinker.run(&PATTERNS).await {
        Ok(never) => match never {},
        Err(e) => fatal("LED board", e),
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
    let config: LedBoardConfig = match configure()? {
        Some(config) => config,
        None => return Ok(()),
    };
    let [activity, power] = config.led_pins;
    log::info!(
        "Watching gpio{}, hold {} s to power off, LEDs on gpio{} and gpio{}",
        config.button_pin,
        config.off_time.as_secs(),
        activity,
        power
    );

    let button = HoldButton::new(
        Button::new(SysfsInput::new(config.button_pin)?),
        HoldTracker::new(config.notice_time, true),
    );
    let leds = LedBoard::new([
        GpioLed::new(SysfsOutput::new(activity)?),
        GpioLed::new(SysfsOutput::new(power)?),
    ]);
    let blinker = Blinker::new(leds, Delay);
    let controller = ShutdownController::new(
        LedFeedback::new(&PATTERNS, RateMode::Accelerating),
        SystemPower::default(),
        config.off_time,
    );

    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(blinker_task(blinker));
        spawner.must_spawn(controller_task(controller));
        spawner.must_spawn(button_task(button));
    })
}
