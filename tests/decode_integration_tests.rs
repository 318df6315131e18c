//! Integration tests for frame decoding
//!
//! Drives [`EnforaDecoder`] through the public API with frames laid out the
//! way devices send them: a 7-byte binary header, the ASCII report and a
//! 7-byte trailer for telemetry, a 9-byte envelope and CRLF for
//! acknowledgements.

use enfora_parser::{
    decode_alarm, decode_frame, AttributeValue, DecodedFrame, DeviceResolver, EnforaDecoder,
    InMemorySessions, LastFix, LastFixProvider,
};
use std::net::SocketAddr;
use std::sync::Arc;

const IMEI: &str = "356612021234567";
const HEADER: &[u8] = b"\x00\x6e\x00\x04\x02\x00\x01";
const TRAILER: &[u8] = b"\r\n\x00\x00\x00\x00\x00";
const ACK_ENVELOPE: &[u8] = b"\x00\x0d\x00\x04\x01\x00\x00\x00\x00";

fn telemetry(report: &str) -> Vec<u8> {
    [HEADER, report.as_bytes(), TRAILER].concat()
}

fn report(event: i64, status: &str) -> Vec<u8> {
    telemetry(&format!(
        " {event} {IMEI} {status} $GPRMC,102030,A,4807.038000,N,01131.000000,E,1.5,270.0,010223,*00"
    ))
}

fn ack(text: &str) -> Vec<u8> {
    [ACK_ENVELOPE, text.as_bytes(), b"\r\n".as_slice()].concat()
}

fn remote() -> SocketAddr {
    "192.0.2.7:1721".parse().unwrap()
}

fn sessions() -> InMemorySessions {
    let sessions = InMemorySessions::new();
    sessions.register(IMEI);
    sessions
}

fn decode_position(sessions: &InMemorySessions, buf: &[u8]) -> enfora_parser::Position {
    match decode_frame(sessions, &remote(), buf) {
        Some(DecodedFrame::Position(position)) => position,
        other => panic!("expected a position, got {other:?}"),
    }
}

#[test]
fn test_ignition_events() {
    let sessions = sessions();

    let on = decode_position(&sessions, &report(10, "0"));
    assert_eq!(on.attribute("ignition"), Some(&AttributeValue::Bool(true)));
    assert_eq!(on.attribute("alarm"), None);

    let off = decode_position(&sessions, &report(11, "0"));
    assert_eq!(off.attribute("ignition"), Some(&AttributeValue::Bool(false)));
    assert_eq!(off.attribute("alarm"), None);
}

#[test]
fn test_alarm_table() {
    let sessions = sessions();
    let expected = [
        (12, "sos"),
        (14, "powerCut"),
        (15, "powerRestored"),
        (17, "powerOff"),
        (18, "powerOn"),
        (19, "gpsAntennaCut"),
        (40, "overspeed"),
        (91, "braking"),
        (92, "acceleration"),
    ];

    for (event, alarm) in expected {
        let position = decode_position(&sessions, &report(event, "0"));
        assert_eq!(
            position.attribute("alarm").and_then(AttributeValue::as_str),
            Some(alarm),
            "event {event}"
        );
        assert_eq!(position.attribute("ignition"), None, "event {event}");
    }

    for event in [0, 1, 13, 16, 99] {
        assert_eq!(decode_alarm(event), None, "event {event}");
        let position = decode_position(&sessions, &report(event, "0"));
        assert_eq!(position.attribute("alarm"), None, "event {event}");
    }
}

#[test]
fn test_io_flags_follow_status_bits() {
    let sessions = sessions();

    for status in [0i64, 1, 2, 5, 170, 256, 511] {
        let position = decode_position(&sessions, &report(0, &status.to_string()));
        for bit in 0..9 {
            let key = format!("io{}", bit + 1);
            assert_eq!(
                position.attribute(&key).and_then(AttributeValue::as_bool),
                Some(status & (1 << bit) != 0),
                "status {status} {key}"
            );
        }
        assert_eq!(position.attribute("io10"), None);
    }

    // bits above the ninth are ignored
    for (status, expected) in [("512", false), ("1536", false), ("1023", true)] {
        let position = decode_position(&sessions, &report(0, status));
        for bit in 1..=9 {
            let key = format!("io{bit}");
            assert_eq!(
                position.attribute(&key).and_then(AttributeValue::as_bool),
                Some(expected),
                "status {status} {key}"
            );
        }
    }
}

#[test]
fn test_analog_and_power_scaling() {
    let buf = telemetry(concat!(
        " 0 356612021234567 0 12345 4000 ",
        "$GPRMC,102030,A,4807.038000,N,01131.000000,E,,,010223,,,*00",
        " 87 1200 34567 12345"
    ));
    let position = decode_position(&sessions(), &buf);

    let adc1 = position.attribute("adc1").and_then(AttributeValue::as_f64).unwrap();
    let adc2 = position.attribute("adc2").and_then(AttributeValue::as_f64).unwrap();
    let power = position.attribute("power").and_then(AttributeValue::as_f64).unwrap();
    assert!((adc1 - 12.345).abs() < 1e-9);
    assert!((adc2 - 4.0).abs() < 1e-9);
    assert!((power - 12.345).abs() < 1e-9);
}

#[test]
fn test_negative_altitude_and_satellites() {
    let buf = telemetry(&format!(
        " 0 {IMEI} 0 $GPRMC,102030,A,4807.038000,N,01131.000000,E,,,010223,-12,08,*00"
    ));
    let position = decode_position(&sessions(), &buf);
    assert_eq!(position.altitude, Some(-12.0));
    assert_eq!(position.attribute("sat"), Some(&AttributeValue::Int(8)));
}

#[test]
fn test_satellites_without_altitude() {
    let buf = telemetry(&format!(
        " 0 {IMEI} 0 $GPRMC,102030,A,4807.038000,N,01131.000000,E,,,010223,,08,*00"
    ));
    let position = decode_position(&sessions(), &buf);
    assert_eq!(position.altitude, None);
    assert_eq!(position.attribute("sat"), Some(&AttributeValue::Int(8)));
}

#[test]
fn test_malformed_analog_token_is_skipped() {
    let buf = telemetry(&format!(
        " 0 {IMEI} 0 - 4000 $GPRMC,102030,A,4807.038000,N,01131.000000,E,,,010223,*00"
    ));
    let position = decode_position(&sessions(), &buf);
    assert_eq!(position.attribute("adc1"), None);
    let adc2 = position.attribute("adc2").and_then(AttributeValue::as_f64).unwrap();
    assert!((adc2 - 4.0).abs() < 1e-9);
    assert!(position.valid);
}

#[test]
fn test_fix_time_from_time_and_date_groups() {
    let position = decode_position(&sessions(), &report(0, "0"));
    assert_eq!(position.fix_time.to_rfc3339(), "2023-02-01T10:20:30+00:00");
    assert!(position.valid);
    assert!((position.latitude - 48.1173).abs() < 1e-6);
    assert!((position.longitude - 11.516_666_7).abs() < 1e-6);
    assert!((position.speed - 1.5).abs() < 1e-9);
    assert!((position.course - 270.0).abs() < 1e-9);
}

#[test]
fn test_marker_anywhere_routes_to_acknowledgement() {
    let sessions = sessions();
    let decoder = EnforaDecoder::new(&sessions);

    // "OK" inside a telemetry-shaped frame still selects the ack path
    let mut buf = report(0, "0");
    buf.extend_from_slice(b"BOOKED\r\n");
    assert_eq!(decoder.decode(&remote(), &buf), None, "no device bound yet");

    assert!(matches!(
        decoder.decode(&remote(), &report(0, "0")),
        Some(DecodedFrame::Position(_))
    ));
    match decoder.decode(&remote(), &buf) {
        Some(DecodedFrame::Result(result)) => assert!(result.result().contains("BOOKED")),
        other => panic!("expected a command result, got {other:?}"),
    }
}

#[test]
fn test_acknowledgement_uses_last_fix() {
    let sessions = sessions();
    let decoder = EnforaDecoder::new(&sessions);

    let position = decode_position(&sessions, &report(0, "0"));
    sessions.record_fix(position.device_id, position.to_last_fix());

    for text in ["OK", "ERROR"] {
        match decoder.decode(&remote(), &ack(text)) {
            Some(DecodedFrame::Result(result)) => {
                assert_eq!(result.result(), text);
                assert!(result.outdated);
                assert_eq!(result.device_id, position.device_id);
                assert_eq!(result.fix, position.to_last_fix());
            }
            other => panic!("expected a command result, got {other:?}"),
        }
    }
}

#[test]
fn test_acknowledgement_without_fix_defaults_to_epoch() {
    let sessions = sessions();
    let device_id = sessions.device_id(IMEI).unwrap();
    sessions.bind(remote(), device_id);
    assert_eq!(sessions.last_fix(device_id), None);

    match decode_frame(&sessions, &remote(), &ack("OK")) {
        Some(DecodedFrame::Result(result)) => {
            assert_eq!(result.fix, LastFix::default());
            assert_eq!(result.fix.fix_time.timestamp(), 0);
            assert_eq!(result.fix.latitude, 0.0);
            assert_eq!(result.fix.longitude, 0.0);
        }
        other => panic!("expected a command result, got {other:?}"),
    }
}

#[test]
fn test_malformed_frames_are_discarded() {
    let sessions = sessions();

    let truncated = report(0, "0");
    assert_eq!(decode_frame(&sessions, &remote(), &truncated[..40]), None);
    assert_eq!(decode_frame(&sessions, &remote(), b""), None);
    assert_eq!(decode_frame(&sessions, &remote(), &truncated[..10]), None);

    let no_gprmc = telemetry(&format!(
        " 0 {IMEI} 0 102030,A,4807.038000,N,01131.000000,E,,,010223,*00"
    ));
    assert_eq!(decode_frame(&sessions, &remote(), &no_gprmc), None);

    let unknown = telemetry(
        " 0 356612029999999 0 $GPRMC,102030,A,4807.038000,N,01131.000000,E,,,010223,*00",
    );
    assert_eq!(decode_frame(&sessions, &remote(), &unknown), None);
}

#[test]
fn test_decoding_is_idempotent() {
    let sessions = sessions();
    let buf = report(12, "37");

    let first = decode_frame(&sessions, &remote(), &buf);
    let second = decode_frame(&sessions, &remote(), &buf);
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(sessions.device_count(), 1);
}

#[test]
fn test_concurrent_decoding() {
    let sessions = Arc::new(InMemorySessions::new());
    let imeis: Vec<String> = (0..4).map(|i| format!("35661202123450{i}")).collect();
    for imei in &imeis {
        sessions.register(imei);
    }
    let decoder = EnforaDecoder::new(Arc::clone(&sessions));

    std::thread::scope(|scope| {
        for (i, imei) in imeis.iter().enumerate() {
            let decoder = &decoder;
            scope.spawn(move || {
                let remote = SocketAddr::from(([192, 0, 2, 1], 2000 + i as u16));
                let buf = telemetry(&format!(
                    " 10 {imei} 0 $GPRMC,102030,A,4807.038000,N,01131.000000,E,,,010223,*00"
                ));
                for _ in 0..50 {
                    match decoder.decode(&remote, &buf) {
                        Some(DecodedFrame::Position(position)) => {
                            assert_eq!(decoder.sessions().device_id(imei), Some(position.device_id));
                        }
                        other => panic!("expected a position, got {other:?}"),
                    }
                }
                assert!(decoder.sessions().resolve_connection(&remote).is_some());
            });
        }
    });

    assert_eq!(sessions.device_count(), imeis.len());
}
