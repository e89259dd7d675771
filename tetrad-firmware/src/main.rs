//! Tetrad - 4-digit 7-segment clock firmware
//!
//! Firmware binary for the Raspberry Pi Pico W. Shows the time and the
//! chip temperature in rotation, a short manual menu behind one button,
//! and takes text to display over a small HTTP API.
//!
//! The main loop is the only writer of the display. It refreshes the
//! multiplexed digits, samples the button, steps the application and
//! drains at most one API command per pass, yielding in between so the
//! radio, stack and server tasks can run.

#![no_std]
#![no_main]

extern crate alloc;

use core::convert::Infallible;

use cortex_m::peripheral::SCB;
use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_futures::yield_now;
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::InterruptHandler as PioInterruptHandler;
use embassy_rp::watchdog::Watchdog;
use embassy_time::{Duration, Instant, Timer};
use embedded_alloc::LlffHeap as Heap;
use rand_core::RngCore;
use {defmt_rtt as _, panic_probe as _};

use tetrad_core::config::DeviceConfig;
use tetrad_core::{Application, Command};
use tetrad_core::traits::ButtonInput;
use tetrad_drivers::OnChipTemperature;
use tetrad_hal_rp2040::{PinBank, PinError, RadioPins, RemainingPeripherals, TemperatureChannel};
use tetrad_protocol::Tagged;

use crate::board::Display;
use crate::channels::{API_REPLY, API_REQUESTS};
use crate::network::{ConnectOutcome, Network};
use crate::tasks::{server_task, ServerConfig};

mod board;
mod channels;
mod config;
mod network;
mod tasks;

// Heap allocator for JSON request and response handling
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 32KB
const HEAP_SIZE: usize = 32 * 1024;

/// Hardware watchdog period, fed on every main-loop pass
const WATCHDOG_PERIOD: Duration = Duration::from_secs(8);

bind_interrupts!(pub struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

type Sensor = OnChipTemperature<TemperatureChannel>;

/// Unrecoverable startup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Fault {
    /// Configuration reuses a pin or claims a radio pin
    PinConflict { pin: u8, error: PinError },
    /// A configured pin could not be taken from the bank
    PinClaim { pin: u8, error: PinError },
    /// A task could not be spawned
    Spawn,
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tetrad firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    let (bank, radio, peripherals) = PinBank::split(p);
    info!("Peripherals initialized");

    let config = config::load();
    let restart_delay_s = config.timing.restart_delay_s;

    let fault = match run(spawner, bank, radio, peripherals, config).await {
        Ok(never) => match never {},
        Err(fault) => fault,
    };

    error!("Fault: {}", fault);
    error!("Restarting in {} s", restart_delay_s);
    Timer::after_secs(u64::from(restart_delay_s)).await;
    SCB::sys_reset();
}

/// Bring the board up and run the display loop forever
async fn run(
    spawner: Spawner,
    mut bank: PinBank,
    radio: RadioPins,
    peripherals: RemainingPeripherals,
    config: DeviceConfig,
) -> Result<Infallible, Fault> {
    board::check_pins(&config)?;
    let mut display = board::display(&mut bank, &config.display)?;
    let mut button = board::button(&mut bank, &config.button)?;
    let sensor = OnChipTemperature::new(TemperatureChannel::new(
        peripherals.adc,
        peripherals.temp_sensor,
    ));
    info!("Display, button and sensor ready");

    let mut network = Network::init(
        spawner,
        radio,
        peripherals.pio0,
        peripherals.dma_ch0,
        &config.network,
        RoscRng.next_u64(),
    )
    .await?;

    let server = ServerConfig {
        port: config.network.port,
        read_timeout_ms: config.network.read_timeout_ms,
        default_duration_s: config.timing.remote_default_duration_s,
    };
    spawner
        .spawn(server_task(network.stack(), server))
        .map_err(|_| Fault::Spawn)?;

    let mut app = Application::new(&config, sensor);

    // Started last so a setup fault can wait out the restart delay
    let mut watchdog = Watchdog::new(peripherals.watchdog);
    watchdog.start(WATCHDOG_PERIOD);
    info!("All tasks spawned, firmware running");

    loop {
        watchdog.feed();
        display.refresh();

        let now = now_ms();
        if app.sample_button(&mut display, button.is_pressed(), now) {
            info!("Button press, page {}", app.manual_index());
        }

        if let Some(Command::Connect) = app.tick(&mut display, now) {
            let outcome =
                connect_while_refreshing(&mut network, &config, &mut app, &mut display, &mut watchdog)
                    .await;
            if let Some((unix, at_ms)) = outcome.time {
                app.time_synced(unix, at_ms);
            }
            app.connect_finished(&mut display, outcome.address, now_ms());
        }

        poll_api(&mut app, &mut display);
        log_transition(&mut app);

        yield_now().await;
    }
}

/// Run the connect sequence while keeping the digits lit
///
/// API commands that arrive meanwhile are still answered; anything
/// that would change the display is refused until the network is up.
async fn connect_while_refreshing(
    network: &mut Network,
    config: &DeviceConfig,
    app: &mut Application<Sensor>,
    display: &mut Display,
    watchdog: &mut Watchdog,
) -> ConnectOutcome {
    let refresh = async {
        loop {
            watchdog.feed();
            display.refresh();
            poll_api(app, display);
            yield_now().await;
        }
    };

    match select(network.connect(&config.network), refresh).await {
        Either::First(outcome) => outcome,
        Either::Second(()) => ConnectOutcome::default(),
    }
}

/// Apply at most one pending API command
fn poll_api(app: &mut Application<Sensor>, display: &mut Display) {
    if let Ok(Tagged { ticket, body }) = API_REQUESTS.try_receive() {
        info!("API {} #{}", body.name(), ticket.number());
        let reply = app.handle_api(display, body, now_ms());
        API_REPLY.signal(Tagged::new(ticket, reply));
        log_transition(app);
    }
}

fn log_transition(app: &mut Application<Sensor>) {
    if let Some(transition) = app.take_transition() {
        info!("State {} -> {}", transition.from.name(), transition.to.name());
    }
}

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
