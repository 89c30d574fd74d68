use std::thread;
use std::time::Duration;

use ax25kiss_frame::KissWriter;
use ax25kiss_header::{Checksum, UiFrameBuilder};

use crate::cmd::encode::filler_rng;
use crate::cmd::monitor::open_serial;
use crate::cmd::{Context, SendArgs};
use crate::exit::{frame_error, header_error, CliResult, SUCCESS};
use crate::output::format_checksum;

pub fn run(args: SendArgs, ctx: Context) -> CliResult<i32> {
    let builder = UiFrameBuilder::new(&args.source, &args.dest)
        .map_err(|err| header_error("invalid station", err))?
        .pad_to(args.length);

    let port = open_serial(&args.serial)?;
    let mut writer = KissWriter::new(port);
    let mut rng = filler_rng(args.seed);
    let interval = Duration::from_millis(args.interval);

    for index in 1..=args.count {
        let body = builder.build_with_rng(&mut rng);
        let checksum = ctx.checksum.checksum(&body);
        writer
            .send_data(args.port, &body)
            .map_err(|err| frame_error("send failed", err))?;

        tracing::info!(
            frame = index,
            of = args.count,
            len = body.len(),
            checksum = %format_checksum(checksum),
            algorithm = ctx.checksum.name(),
            "frame sent"
        );

        if index < args.count && !interval.is_zero() {
            thread::sleep(interval);
        }
    }

    Ok(SUCCESS)
}
