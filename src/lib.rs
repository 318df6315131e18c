//! Enfora Parser Library
//!
//! A Rust library for decoding frames sent by Enfora GPS tracking terminals.
//! A frame is either a telemetry report (vendor header, event code, IMEI, I/O
//! status and an embedded GPRMC sentence with optional trailing telemetry) or
//! a textual command acknowledgement ("OK" / "ERROR").
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV export functionality
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Enable record export in JSON lines format
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Decode a single frame received on a connection:
//! ```rust
//! use enfora_parser::{EnforaDecoder, InMemorySessions, DecodedFrame};
//! use std::net::SocketAddr;
//!
//! let sessions = InMemorySessions::new();
//! sessions.register("356612021234567");
//! let decoder = EnforaDecoder::new(&sessions);
//!
//! let remote: SocketAddr = "192.0.2.1:1721".parse().unwrap();
//! let frame = [
//!     b"\x00\x5a\x00\x04\x02\x00\x01".as_slice(),
//!     b" 10 356612021234567 $GPRMC,101010,A,0230.000000,N,00315.000000,W,,,010223,*00".as_slice(),
//!     b"\r\n\x00\x00\x00\x00\x00".as_slice(),
//! ]
//! .concat();
//!
//! match decoder.decode(&remote, &frame) {
//!     Some(DecodedFrame::Position(position)) => {
//!         println!("{} at {:.5},{:.5}", position.fix_time, position.latitude, position.longitude)
//!     }
//!     Some(DecodedFrame::Result(result)) => println!("command result: {}", result.result()),
//!     None => println!("frame discarded"),
//! }
//! ```
//!
//! # Public API
//!
//! ## Decoding
//! - [`EnforaDecoder`] - Decoder bound to its device session collaborators
//! - [`decode_frame`] - Classify and decode one frame
//! - [`classify`] - Decide whether a frame is telemetry or an acknowledgement
//! - [`decode_position`] / [`decode_result`] - The two decode paths
//! - [`decode_alarm`] - Map an event code to its alarm category
//! - [`assemble_fix_time`] - Merge the GPRMC time and date groups
//!
//! ## Sessions
//! - [`DeviceResolver`] / [`LastFixProvider`] - Collaborator interfaces
//! - [`InMemorySessions`] - Thread-safe in-memory implementation of both
//!
//! ## Frame Files and Export
//! - [`parse_hex_frames`] / [`read_frame_file`] - Hex-encoded frame files
//! - [`parse_capture`] / [`parse_frame_file`] - Decode one connection's frames
//! - [`export_to_csv`] / `export_to_json` - Write decoded records

// Module declarations
pub mod conversion;
pub mod error;
pub mod export;
pub mod parser;
pub mod session;
pub mod types;

pub use conversion::*;
pub use error::{EnforaError, Result};
pub use export::*;
pub use parser::*;
pub use session::*;
pub use types::*;
