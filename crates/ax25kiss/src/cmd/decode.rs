use std::fs;
use std::io::Read;

use ax25kiss::inspect;
use ax25kiss_frame::{KissDecoder, KissFrame};

use crate::cmd::{Context, DecodeArgs};
use crate::exit::{io_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::print_frames;

pub fn run(args: DecodeArgs, ctx: Context) -> CliResult<i32> {
    let input = read_input(&args)?;

    let mut decoder = KissDecoder::new();
    let frames = deframe(&mut decoder, &input);
    let stats = decoder.stats();
    tracing::debug!(
        input_bytes = input.len(),
        frames = stats.frames,
        violations = stats.violations,
        oversized = stats.oversized,
        "input decoded"
    );
    if !decoder.is_idle() {
        tracing::warn!(
            discarded = decoder.buffered_len(),
            "input ended inside a frame"
        );
    }

    if frames.is_empty() {
        return Err(CliError::new(FAILURE, "no complete KISS frames in input"));
    }

    let inspected: Vec<_> = frames.iter().map(inspect).collect();
    print_frames(&inspected, 1, &ctx.checksum, ctx.format);
    Ok(SUCCESS)
}

fn deframe(decoder: &mut KissDecoder, input: &[u8]) -> Vec<KissFrame> {
    decoder.feed(input)
}

fn read_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(text) = &args.hex {
        return parse_hex(text);
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(input)
}

fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&digits).map_err(|err| CliError::new(USAGE, format!("--hex is not valid hex: {err}")))
}
