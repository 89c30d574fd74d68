use std::io::{IsTerminal, Write};

use ax25kiss::Inspected;
use ax25kiss_header::{Checksum, Header};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct AddressOutput {
    role: String,
    callsign: String,
    ssid: u8,
    command: bool,
}

#[derive(Serialize)]
struct FrameOutput {
    index: usize,
    port: u8,
    command: &'static str,
    path: String,
    addresses: Vec<AddressOutput>,
    terminated: bool,
    frame_type: Option<String>,
    control: Option<String>,
    pid: Option<String>,
    payload_size: usize,
    payload: String,
    checksum: String,
    checksum_algorithm: &'static str,
}

impl FrameOutput {
    fn new(index: usize, inspected: &Inspected, checksum: &dyn Checksum) -> Self {
        match inspected {
            Inspected::Data { port, header } => Self::data(index, *port, header, checksum),
            Inspected::Command { port, params, .. } => Self {
                index,
                port: *port,
                command: inspected.command_name(),
                path: String::new(),
                addresses: Vec::new(),
                terminated: false,
                frame_type: None,
                control: None,
                pid: None,
                payload_size: params.len(),
                payload: payload_preview(params),
                checksum: format_checksum(checksum.checksum(params)),
                checksum_algorithm: checksum.name(),
            },
        }
    }

    fn data(index: usize, port: u8, header: &Header, checksum: &dyn Checksum) -> Self {
        let addresses = header
            .chain()
            .roles()
            .map(|(role, address)| AddressOutput {
                role: role.to_string(),
                callsign: address.callsign.to_string(),
                ssid: address.ssid,
                command: address.command,
            })
            .collect();

        Self {
            index,
            port,
            command: "DATA",
            path: header.chain().to_string(),
            addresses,
            terminated: header.chain().is_terminated(),
            frame_type: header.frame_type().map(|t| t.to_string()),
            control: header.control().map(|c| c.to_string()),
            pid: header.pid().map(|p| p.to_string()),
            payload_size: header.payload().len(),
            payload: payload_preview(header.payload()),
            checksum: format_checksum(checksum.checksum(header.raw())),
            checksum_algorithm: checksum.name(),
        }
    }
}

/// Print decoded frames; `first_index` numbers them for display.
pub fn print_frames(
    frames: &[Inspected],
    first_index: usize,
    checksum: &dyn Checksum,
    format: OutputFormat,
) {
    let rows: Vec<FrameOutput> = frames
        .iter()
        .enumerate()
        .map(|(offset, inspected)| FrameOutput::new(first_index + offset, inspected, checksum))
        .collect();

    match format {
        OutputFormat::Json => {
            for row in &rows {
                println!(
                    "{}",
                    serde_json::to_string(row).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                return;
            }
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "#", "PORT", "CMD", "PATH", "CONTROL", "PID", "SIZE", "CHECKSUM", "PAYLOAD",
                ]);
            for row in &rows {
                table.add_row(vec![
                    row.index.to_string(),
                    row.port.to_string(),
                    row.command.to_string(),
                    row.path.clone(),
                    row.control.clone().unwrap_or_else(|| "-".to_string()),
                    row.pid.clone().unwrap_or_else(|| "-".to_string()),
                    row.payload_size.to_string(),
                    row.checksum.clone(),
                    row.payload.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                if row.command == "DATA" {
                    println!(
                        "#{} port={} {} <{}> [{}] size={} {}={} payload={}",
                        row.index,
                        row.port,
                        row.path,
                        row.control.as_deref().unwrap_or("truncated"),
                        row.pid.as_deref().unwrap_or("-"),
                        row.payload_size,
                        row.checksum_algorithm,
                        row.checksum,
                        row.payload
                    );
                } else {
                    println!(
                        "#{} port={} command={} size={} params={}",
                        row.index, row.port, row.command, row.payload_size, row.payload
                    );
                }
            }
        }
    }
}

#[derive(Serialize)]
pub struct EncodeOutput {
    pub source: String,
    pub destination: String,
    pub port: u8,
    pub info_len: usize,
    pub frame_len: usize,
    pub wire_len: usize,
    pub checksum: String,
    pub checksum_algorithm: &'static str,
    pub wire: String,
}

pub fn print_encoded(out: &EncodeOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["source", out.source.as_str()])
                .add_row(vec!["destination", out.destination.as_str()])
                .add_row(vec!["port".to_string(), out.port.to_string()])
                .add_row(vec!["info_len".to_string(), out.info_len.to_string()])
                .add_row(vec!["frame_len".to_string(), out.frame_len.to_string()])
                .add_row(vec!["wire_len".to_string(), out.wire_len.to_string()])
                .add_row(vec![out.checksum_algorithm, out.checksum.as_str()])
                .add_row(vec!["wire", out.wire.as_str()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{}", out.wire);
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn format_checksum(value: u16) -> String {
    format!("0x{value:04X}")
}

/// Printable text as-is, anything else as hex.
pub fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) if text.chars().all(|c| !c.is_control() || c == '\r' || c == '\n') => {
            text.to_string()
        }
        _ => format!("hex:{}", hex::encode(payload)),
    }
}
