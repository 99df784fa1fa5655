//! Play a warning clip while the button is held; once it has been held long
//! enough, play a parting clip and power off.

use embassy_executor::Executor;
use embassy_time::Delay;
use shutdown_button::actors::{EventQueue, HoldButton};
use shutdown_button::config::SoundConfig;
use shutdown_button::drivers::button::Button;
use shutdown_button::drivers::linux::SysfsInput;
use shutdown_button::drivers::power::SystemPower;
use shutdown_button::drivers::sound::CommandSample;
use shutdown_button::feedback::SoundFeedback;
use shutdown_button::runtime::{configure, fatal, init_logger};
use shutdown_button::{HoldTracker, ShutdownController};
use static_cell::StaticCell;

static EXECUTOR: StaticCell<Executor> = StaticCell::new();
static EVENTS: EventQueue = EventQueue::new();

type Controller = ShutdownController<SoundFeedback<CommandSample, Delay>, SystemPower>;

#[embassy_executor::task]
async fn button_task(mut button: HoldButton<SysfsInput>) {
    match button.run(&EVENTS).await {
        Ok(never) => match never {},
        Err(e) => fatal("Button", e),
    }
}

#[embassy_executor::task]
async fn controller_task(mut controller: Controller) {
    match controller.run(&EVENTS).await {
        Ok(never) => match never {},
        Err(e) => fatal("Sound", e),
    }
}

fn main() -> Result<(), anyhow::Error> {
    init_logger();
    let config: SoundConfig = match configure()? {
        Some(config) => config,
        None => return Ok(()),
    };
    log::info!(
        "Watching gpio{}, hold {} s to power off",
        config.button_pin,
        config.hold_time.as_secs()
    );

    let player = config.player.as_slice();
    let probe = config.probe.as_slice();
    let warning = CommandSample::probe(&config.warning, player, probe)?;
    let finale = CommandSample::probe(&config.finale, player, probe)?;
    let power = SystemPower::new(config.power_off.as_slice())
        .ok_or_else(|| anyhow::anyhow!("empty power-off command"))?;

    let button = HoldButton::new(
        Button::new(SysfsInput::new(config.button_pin)?),
        HoldTracker::new(config.hold_time, false),
    );
    let controller = ShutdownController::new(
        SoundFeedback::new(warning, finale, config.hold_time, Delay).with_grace(config.grace),
        power,
        config.hold_time,
    );

    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(controller_task(controller));
        spawner.must_spawn(button_task(button));
    })
}
