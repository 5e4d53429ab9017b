#![no_main]
#![no_std]

use defmt_rtt as _;
use panic_probe as _;

use hal::{
    self,
    adc::{Adc, AdcDevice},
    clocks::Clocks,
    pac,
    timer::{Timer, TimerInterrupt},
    usart::{Usart, UsartConfig},
};

use packmon_algo::LipoMonitor;
use packmon_cli::{Cli, Dispatch};
use packmon_drivers::{adc::PackAdc, flash_params::ParamFlash, pinout, serial::Console};

mod commands;
mod config;

use commands::CmdContext;

#[rtic::app(device = pac, peripherals = true, dispatchers = [TIM7])]
mod app {
    use super::*;

    use core::fmt::Write;

    #[shared]
    struct Shared {
        ctx: CmdContext,
    }

    #[local]
    struct Local {
        tick_timer: Timer<pac::TIM2>,
        cli: Cli,
        led: hal::gpio::Pin,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local) {
        let dp = cx.device;
        let clock_cfg = Clocks::default();
        clock_cfg.setup().unwrap();
        defmt::debug!("SYSTEM: Clock frequency is {} MHz", clock_cfg.sysclk() / 1_000_000);

        // pin map
        pinout::analog::CELL0.init();
        pinout::analog::CELL1.init();
        pinout::analog::CELL2.init();
        pinout::console::TX.init();
        pinout::console::RX.init();
        let led = pinout::led::STATUS.init();

        let adc1 = Adc::new_adc1(
            dp.ADC1,
            AdcDevice::One,
            Default::default(),
            clock_cfg.systick(),
        );
        let source = PackAdc::new(adc1);

        let usart = Usart::new(
            dp.USART1,
            config::CONSOLE_BAUD,
            UsartConfig::default(),
            &clock_cfg,
        );
        let console = Console::new(usart);

        let mut store = ParamFlash::new(dp.FLASH);
        let mut monitor = LipoMonitor::new(source, config::LIPO);
        match store.read() {
            Some(params) => {
                monitor.restore_params(&params);
                defmt::info!("PARAM: persisted calibration loaded");
            }
            None => {
                // first boot or corrupted record: defaults plus explicit save
                monitor.load_default_params();
                if store.save(&monitor.params()).is_err() {
                    defmt::warn!("PARAM: saving defaults failed");
                } else {
                    defmt::info!("PARAM: no valid record, defaults saved");
                }
            }
        }

        let mut tick_timer = Timer::new_tim2(
            dp.TIM2,
            config::TICK_HZ as f32,
            Default::default(),
            &clock_cfg,
        );
        tick_timer.enable_interrupt(TimerInterrupt::Update);
        tick_timer.enable();

        let mut ctx = CmdContext {
            monitor,
            console,
            store,
        };
        let _ = writeln!(ctx.console, "packmon ready, try 'help'");

        (
            Shared { ctx },
            Local {
                tick_timer,
                cli: Cli::new(),
                led,
            },
        )
    }

    /// Control loop: one monitor tick per timer update, LED heartbeat on
    /// the side.
    #[task(binds = TIM2, shared = [ctx], local = [tick_timer, led, tick: u32 = 0])]
    fn tick(mut cx: tick::Context) {
        cx.local.tick_timer.clear_interrupt(TimerInterrupt::Update);

        *cx.local.tick += 1;
        let now = *cx.local.tick;

        cx.shared.ctx.lock(|ctx| ctx.monitor.tick(now));

        if now % config::LED_PERIOD_TICKS == 0 {
            cx.local.led.toggle();
        }
    }

    /// Console input: every received byte goes through the dispatcher and
    /// command handlers run right here at interrupt level, with `ctx`
    /// locked while the byte and any completed command are handled.
    #[task(binds = USART1, shared = [ctx], local = [cli])]
    fn console_rx(mut cx: console_rx::Context) {
        cx.shared.ctx.lock(|ctx| {
            ctx.console.clear_rx_interrupt();
            let byte = ctx.console.read_byte();

            match cx.local.cli.push(byte, commands::COMMANDS, ctx) {
                Dispatch::Unknown => {
                    let _ = writeln!(ctx.console, "Unknown command, try 'help'.");
                }
                Dispatch::Overflow => {
                    let _ = writeln!(ctx.console, "Line too long, discarded.");
                }
                Dispatch::Done(code) if code < 0 => {
                    let _ = writeln!(ctx.console, "Usage error, try 'help'.");
                }
                _ => {}
            }
        });
    }
}
