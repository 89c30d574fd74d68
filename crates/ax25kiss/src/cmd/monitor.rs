use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

use ax25kiss::inspect;
use ax25kiss_frame::{FramePump, KissReader};

use crate::cmd::{Context, MonitorArgs, SerialArgs};
use crate::exit::{frame_error, serial_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::print_frames;

/// How often the receive loop wakes up to check for Ctrl-C.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Read timeout on the serial port; the reader retries on expiry.
pub const SERIAL_READ_TIMEOUT: Duration = Duration::from_millis(100);

pub fn run(args: MonitorArgs, ctx: Context) -> CliResult<i32> {
    let port = open_serial(&args.serial)?;
    let pump = FramePump::spawn(args.serial.serial.clone(), KissReader::new(port))
        .map_err(|err| frame_error("failed to start reader", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    tracing::info!(port = %args.serial.serial, baud = args.serial.baud, "monitoring");

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        let frame = match pump.recv_timeout(POLL_INTERVAL) {
            Ok(frame) => frame,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        printed = printed.saturating_add(1);
        print_frames(&[inspect(&frame)], printed, &ctx.checksum, ctx.format);

        if args.count.is_some_and(|count| printed >= count) {
            break;
        }
    }

    if !pump.is_finished() {
        // The reader thread is blocked on the port; it ends with the process.
        tracing::debug!(printed, "monitor stopping");
        return Ok(SUCCESS);
    }

    let summary = pump
        .join()
        .map_err(|err| frame_error("serial read failed", err))?;
    tracing::info!(
        frames = summary.delivered,
        violations = summary.stats.violations,
        oversized = summary.stats.oversized,
        "serial port closed"
    );
    Ok(SUCCESS)
}

pub fn open_serial(args: &SerialArgs) -> CliResult<Box<dyn serialport::SerialPort>> {
    serialport::new(&args.serial, args.baud)
        .timeout(SERIAL_READ_TIMEOUT)
        .open()
        .map_err(|err| serial_error(&format!("failed to open {}", args.serial), err))
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
