use crate::parser::ack::decode_result;
use crate::parser::classifier::classify;
use crate::parser::telemetry::decode_position;
use crate::session::{DeviceResolver, LastFixProvider};
use crate::types::{DecodedFrame, FrameKind};
use std::net::SocketAddr;

/// Decode one pre-delimited frame
///
/// Exactly one decode path runs per frame. `None` means the frame is to be
/// dropped silently: garbled report, unknown device, or too short.
pub fn decode_frame<S>(sessions: &S, remote: &SocketAddr, buf: &[u8]) -> Option<DecodedFrame>
where
    S: DeviceResolver + LastFixProvider + ?Sized,
{
    match classify(buf) {
        FrameKind::Result => decode_result(sessions, remote, buf).map(DecodedFrame::Result),
        FrameKind::Telemetry => decode_position(sessions, remote, buf).map(DecodedFrame::Position),
    }
}

/// Enfora frame decoder bound to its device session collaborators
///
/// Holds no state of its own; concurrent use is as safe as the sessions are.
#[derive(Debug, Clone, Default)]
pub struct EnforaDecoder<S> {
    sessions: S,
}

impl<S> EnforaDecoder<S>
where
    S: DeviceResolver + LastFixProvider,
{
    pub fn new(sessions: S) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    pub fn decode(&self, remote: &SocketAddr, buf: &[u8]) -> Option<DecodedFrame> {
        decode_frame(&self.sessions, remote, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeviceId, LastFix};

    /// Resolves every IMEI and connection to one device with a fixed last fix
    struct SingleDevice;

    impl DeviceResolver for SingleDevice {
        fn resolve_connection(&self, _remote: &SocketAddr) -> Option<DeviceId> {
            Some(DeviceId(42))
        }

        fn resolve_imei(&self, _remote: &SocketAddr, _imei: &str) -> Option<DeviceId> {
            Some(DeviceId(42))
        }
    }

    impl LastFixProvider for SingleDevice {
        fn last_fix(&self, _device_id: DeviceId) -> Option<LastFix> {
            Some(LastFix {
                latitude: 1.0,
                longitude: 2.0,
                ..LastFix::default()
            })
        }
    }

    fn remote() -> SocketAddr {
        "192.0.2.10:1721".parse().unwrap()
    }

    #[test]
    fn test_routes_result_frames() {
        let decoder = EnforaDecoder::new(SingleDevice);
        let frame = decoder
            .decode(&remote(), b"\x00\x10\x00\x04\x01\x00\x00\x00\x00ERROR\r\n")
            .unwrap();
        assert_eq!(frame.kind(), FrameKind::Result);
        assert_eq!(frame.as_result().unwrap().result(), "ERROR");
        assert_eq!(frame.as_result().unwrap().fix.latitude, 1.0);
    }

    #[test]
    fn test_routes_telemetry_frames() {
        let decoder = EnforaDecoder::new(SingleDevice);
        let buf = b"\x00\x5a\x00\x04\x02\x00\x01 10 356612021234567 $GPRMC,101010,A,0230.000000,N,00315.000000,W,,,010223,*00\r\n\x00\x00\x00\x00\x00";
        let frame = decoder.decode(&remote(), buf).unwrap();
        assert_eq!(frame.kind(), FrameKind::Telemetry);
        assert_eq!(frame.device_id(), DeviceId(42));
    }

    #[test]
    fn test_garbage_yields_nothing() {
        let decoder = EnforaDecoder::new(SingleDevice);
        assert!(decoder.decode(&remote(), b"\xff\xfe\xfd\xfc\xfb\xfa\xf9 garbage").is_none());
        assert!(decoder.decode(&remote(), b"").is_none());
    }
}
