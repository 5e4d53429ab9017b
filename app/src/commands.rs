//! Console command bodies: thin I/O over the monitoring core.

use core::fmt::Write;

use packmon_algo::{dev_temp, LipoMonitor};
use packmon_cli::Command;
use packmon_drivers::{adc::PackAdc, flash_params::ParamFlash, serial::Console};

use crate::config::CELL_COUNT;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything the handlers may touch; owned by the RTIC shared resource.
pub struct CmdContext {
    pub monitor: LipoMonitor<PackAdc, CELL_COUNT>,
    pub console: Console,
    pub store: ParamFlash,
}

pub static COMMANDS: &[Command<CmdContext>] = &[
    Command {
        name: "help",
        handler: cmd_help,
    },
    Command {
        name: "ver",
        handler: cmd_ver,
    },
    Command {
        name: "bat",
        handler: cmd_bat,
    },
    Command {
        name: "temp",
        handler: cmd_temp,
    },
    Command {
        name: "cal",
        handler: cmd_cal,
    },
    Command {
        name: "param",
        handler: cmd_param,
    },
    Command {
        name: "reset",
        handler: cmd_reset,
    },
];

fn cmd_help(ctx: &mut CmdContext, _args: &[&str]) -> i8 {
    let _ = writeln!(ctx.console, "Supported commands:");
    let _ = writeln!(ctx.console, "  bat            Prints Vref and all cell voltages.");
    let _ = writeln!(ctx.console, "  temp           Reads the CPU temperature.");
    let _ = writeln!(ctx.console, "  cal cell mV    Calibrates the given cell.");
    let _ = writeln!(ctx.console, "  param");
    let _ = writeln!(ctx.console, "        save     Writes the data from RAM to flash.");
    let _ = writeln!(ctx.console, "        clear    Resets the RAM data to defaults.");
    let _ = writeln!(ctx.console, "        discard  Wipes the flash data.");
    let _ = writeln!(ctx.console, "  reset          Resets the CPU.");
    let _ = writeln!(ctx.console, "  ver            Prints version infos.");
    let _ = writeln!(ctx.console, "  help           Prints this text.");
    0
}

fn cmd_ver(ctx: &mut CmdContext, _args: &[&str]) -> i8 {
    let _ = writeln!(ctx.console, "packmon {}", VERSION);
    let _ = writeln!(ctx.console, "{} cell LiPo pack monitor", CELL_COUNT);
    0
}

fn cmd_bat(ctx: &mut CmdContext, _args: &[&str]) -> i8 {
    let cells = ctx.monitor.num_cells();
    if cells < 0 {
        let _ = writeln!(ctx.console, "Error: no LiPo pack detected!");
        return 0;
    }

    let vref = ctx.monitor.vref_mv();
    let _ = writeln!(ctx.console, "Vref: {}mV", vref);
    for i in 0..cells as usize {
        match ctx.monitor.cell_mv(i, true) {
            Ok(mv) => {
                let _ = writeln!(ctx.console, "{}: {},{:03}V", i, mv / 1000, mv % 1000);
            }
            Err(err) => {
                let _ = writeln!(ctx.console, "{}: read failed ({:?})", i, err);
            }
        }
    }
    0
}

fn cmd_temp(ctx: &mut CmdContext, _args: &[&str]) -> i8 {
    let vref_mv = ctx.monitor.vref_mv();
    let raw = ctx.monitor.source_mut().read_temp_raw();
    let _ = writeln!(ctx.console, "CPU: {}degC", dev_temp::cpu_temp_c(vref_mv, raw));
    0
}

fn cmd_cal(ctx: &mut CmdContext, args: &[&str]) -> i8 {
    if args.len() != 2 {
        return -1;
    }
    let Ok(cell) = args[0].parse::<usize>() else {
        return -1;
    };
    let Ok(millivolts) = args[1].parse::<u32>() else {
        return -1;
    };

    match ctx.monitor.calibrate(cell, millivolts) {
        Ok(()) => {
            let _ = writeln!(
                ctx.console,
                "Cell {} calibrated to {}mV, 'param save' persists it.",
                cell, millivolts
            );
        }
        Err(err) => {
            let _ = writeln!(ctx.console, "Calibration failed: {:?}", err);
        }
    }
    0
}

fn cmd_param(ctx: &mut CmdContext, args: &[&str]) -> i8 {
    let Some(action) = args.first() else {
        return -1;
    };

    match *action {
        "save" => {
            let params = ctx.monitor.params();
            match ctx.store.save(&params) {
                Ok(()) => {
                    let _ = writeln!(ctx.console, "Parameter saved.");
                }
                Err(err) => {
                    let _ = writeln!(ctx.console, "Parameter save failed: {:?}", err);
                }
            }
        }
        "clear" => {
            ctx.monitor.load_default_params();
            let _ = writeln!(ctx.console, "Parameter reset to defaults in RAM.");
        }
        "discard" => match ctx.store.discard() {
            Ok(()) => {
                let _ = writeln!(ctx.console, "Parameter discarded.");
            }
            Err(err) => {
                let _ = writeln!(ctx.console, "Parameter discard failed: {:?}", err);
            }
        },
        _ => {
            let _ = writeln!(ctx.console, "Invalid parameter.");
            return -1;
        }
    }
    0
}

fn cmd_reset(ctx: &mut CmdContext, _args: &[&str]) -> i8 {
    let _ = writeln!(ctx.console, "Resetting the CPU...");
    cortex_m::asm::delay(1_000_000);
    cortex_m::peripheral::SCB::sys_reset();
}
