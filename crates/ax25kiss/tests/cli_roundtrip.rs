#![cfg(feature = "cli")]

use std::io::Write;
use std::process::{Command, Output, Stdio};

const HELLO_WIRE: &str = "c000a6a89c88a488ee60a88aa6a8606b03f048454c4c4fc0";

fn ax25kiss(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ax25kiss"))
        .args(["--log-level", "error", "--format", "json"])
        .args(args)
        .output()
        .expect("ax25kiss should run")
}

fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout lines should be JSON"))
        .collect()
}

#[test]
fn encode_produces_expected_wire_bytes() {
    let output = ax25kiss(&[
        "encode", "--source", "0TEST0-5", "--dest", "STNDRD-7", "--data", "HELLO",
    ]);
    assert!(output.status.success());

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["wire"], HELLO_WIRE);
    assert_eq!(lines[0]["source"], "0TEST0-5");
    assert_eq!(lines[0]["destination"], "STNDRD-7");
    assert_eq!(lines[0]["frame_len"], 21);
    assert_eq!(lines[0]["checksum_algorithm"], "CRC-16/X.25");
}

#[test]
fn decode_hex_reports_header_fields() {
    let output = ax25kiss(&["decode", "--hex", HELLO_WIRE]);
    assert!(output.status.success());

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 1);
    let frame = &lines[0];
    assert_eq!(frame["port"], 0);
    assert_eq!(frame["command"], "DATA");
    assert_eq!(frame["path"], "0TEST0-5>STNDRD-7");
    assert_eq!(frame["addresses"][0]["role"], "Destination");
    assert_eq!(frame["addresses"][0]["callsign"], "STNDRD");
    assert_eq!(frame["addresses"][0]["ssid"], 7);
    assert_eq!(frame["addresses"][1]["role"], "Source");
    assert_eq!(frame["addresses"][1]["ssid"], 5);
    assert_eq!(frame["terminated"], true);
    assert_eq!(frame["frame_type"], "Unnumbered");
    assert_eq!(frame["control"], "UI");
    assert_eq!(frame["pid"], "No Layer 3");
    assert_eq!(frame["payload"], "HELLO");
}

#[test]
fn raw_encode_pipes_into_decode() {
    let encoded = ax25kiss(&[
        "encode", "--source", "N0CALL", "--dest", "CQ", "--length", "40", "--seed", "7", "--port",
        "3", "--raw",
    ]);
    assert!(encoded.status.success());
    assert_eq!(encoded.stdout.first(), Some(&0xC0));
    assert_eq!(encoded.stdout.last(), Some(&0xC0));

    let mut child = Command::new(env!("CARGO_BIN_EXE_ax25kiss"))
        .args(["--log-level", "error", "--format", "json", "decode"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("decode should start");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(&encoded.stdout)
        .expect("stdin should accept input");
    let decoded = child.wait_with_output().expect("decode should finish");
    assert!(decoded.status.success());

    let lines = json_lines(&decoded);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["port"], 3);
    assert_eq!(lines[0]["path"], "N0CALL>CQ");
    assert_eq!(lines[0]["payload_size"], 40);
}

#[test]
fn checksum_flag_selects_algorithm() {
    let output = ax25kiss(&["--checksum", "xmodem", "decode", "--hex", HELLO_WIRE]);
    assert!(output.status.success());
    assert_eq!(json_lines(&output)[0]["checksum_algorithm"], "CRC-16/XMODEM");
}

#[test]
fn command_frames_are_passed_through() {
    let output = ax25kiss(&["decode", "--hex", "c0 0a 01 2c c0 c0 00 c0"]);
    assert!(output.status.success());

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["command"], "VENDOR");
    assert_eq!(lines[0]["payload"], "hex:012c");
    assert_eq!(lines[1]["command"], "DATA");
    assert_eq!(lines[1]["control"], serde_json::Value::Null);
}

#[test]
fn decode_without_frames_fails() {
    let output = ax25kiss(&["decode", "--hex", "c0c0c0"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn invalid_station_is_a_usage_error() {
    let output = ax25kiss(&["encode", "--source", "BAD CALL", "--dest", "CQ"]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid station"));
}
