#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_halt as _;

use ec11_encoder::RotationCounter;

mod config;
mod lines;

#[link_section = ".boot2"]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

/// Written by the edge task, read by the poll task.
static COUNTER: RotationCounter = RotationCounter::new();

#[rtic::app(
    device = rp2040_hal::pac,
    peripherals = true,
    dispatchers = [PIO1_IRQ_0]
)]
mod app {
    use ec11_encoder::{ButtonState, Ec11Encoder, EncoderInput, EncoderReading, QuadratureDecoder};
    use fugit::ExtU32;
    use rp2040_hal::{
        clocks::init_clocks_and_plls,
        gpio::{bank0, FunctionSio, Interrupt, Pin, Pins, PullUp, SioInput},
        timer::{Alarm, Alarm0, Timer},
        Sio, Watchdog,
    };

    use crate::{config, lines::BankLines, COUNTER};

    type EncoderPinA = Pin<bank0::Gpio1, FunctionSio<SioInput>, PullUp>;
    type EncoderPinB = Pin<bank0::Gpio2, FunctionSio<SioInput>, PullUp>;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        decoder: QuadratureDecoder<'static>,
        pin_a: EncoderPinA,
        pin_b: EncoderPinB,
        edge_timer: Timer,
        encoder: Ec11Encoder<'static, BankLines>,
        poll_alarm: Alarm0,
        watchdog: Watchdog,
        last_button: ButtonState,
    }

    #[init]
    fn init(c: init::Context) -> (Shared, Local, init::Monotonics) {
        // Soft-reset does not release the hardware spinlocks
        // Release them now to avoid a deadlock after watchdog reset
        unsafe {
            rp2040_hal::sio::spinlock_reset();
        }

        let mut resets = c.device.RESETS;
        let mut watchdog = Watchdog::new(c.device.WATCHDOG);

        // ---- get clocks ----
        let clocks = init_clocks_and_plls(
            config::XOSC_FREQ_HZ,
            c.device.XOSC,
            c.device.CLOCKS,
            c.device.PLL_SYS,
            c.device.PLL_USB,
            &mut resets,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        // ---- get pins ----
        let sio = Sio::new(c.device.SIO);
        let pins = Pins::new(
            c.device.IO_BANK0,
            c.device.PADS_BANK0,
            sio.gpio_bank0,
            &mut resets,
        );

        // ---- set up rotary encoder ----
        let mut pin_a: EncoderPinA = pins.gpio1.into_pull_up_input();
        let mut pin_b: EncoderPinB = pins.gpio2.into_pull_up_input();
        for interrupt in [Interrupt::EdgeLow, Interrupt::EdgeHigh] {
            pin_a.clear_interrupt(interrupt);
            pin_b.clear_interrupt(interrupt);
        }

        let mut encoder = Ec11Encoder::new(BankLines::new(), &COUNTER);
        let decoder = match encoder.init(config::ENCODER) {
            Ok(outcome) => outcome.into_decoder().unwrap(),
            Err(e) => defmt::panic!("encoder setup failed: {}", e),
        };

        // ---- create alarms ----
        let mut timer = Timer::new(c.device.TIMER, &mut resets, &clocks);

        let mut poll_alarm = timer.alarm_0().unwrap();
        poll_alarm.enable_interrupt();
        poll_alarm.schedule(config::POLL_TIME_US.micros()).unwrap();

        // ---- start watchdog ----
        watchdog.start(config::WATCHDOG_US.micros());

        // ---- set up state ---
        (
            Shared {},
            Local {
                decoder,
                pin_a,
                pin_b,
                edge_timer: timer,
                encoder,
                poll_alarm,
                watchdog,
                last_button: ButtonState::Released,
            },
            init::Monotonics(),
        )
    }

    /* ---------------------------------- edges --------------------------------- */

    /// Runs on every edge of either channel. No locks, no logging.
    #[task(
        binds = IO_IRQ_BANK0,
        priority = 3,
        local = [decoder, pin_a, pin_b, edge_timer],
    )]
    fn encoder_edge(c: encoder_edge::Context) {
        for interrupt in [Interrupt::EdgeLow, Interrupt::EdgeHigh] {
            c.local.pin_a.clear_interrupt(interrupt);
            c.local.pin_b.clear_interrupt(interrupt);
        }

        let now = c.local.edge_timer.get_counter();
        c.local.decoder.sample_edge(c.local.pin_a, c.local.pin_b, now);
    }

    /* ---------------------------------- poll ---------------------------------- */

    #[task(
        binds = TIMER_IRQ_0,
        priority = 1,
        local = [encoder, poll_alarm, watchdog, last_button],
    )]
    fn poll(c: poll::Context) {
        // schedule the next poll
        let poll_alarm = c.local.poll_alarm;
        poll_alarm.clear_interrupt();
        poll_alarm.schedule(config::POLL_TIME_US.micros()).unwrap();

        // feed watchdog so it knows this did not freeze
        c.local.watchdog.feed();

        let Ok(mut device) = c.local.encoder.input_device() else {
            return;
        };
        let reading = device.read();

        if reading.delta != 0 || reading.button != *c.local.last_button {
            *c.local.last_button = reading.button;
            let _ = report::spawn(reading);
        }
    }

    #[task(priority = 2, capacity = 8)]
    fn report(_: report::Context, reading: EncoderReading) {
        defmt::debug!(
            "delta={} button={} count={}",
            reading.delta,
            reading.button,
            COUNTER.get()
        );
    }
}
