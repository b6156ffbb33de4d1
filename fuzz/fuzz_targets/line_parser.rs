//! Fuzz target for the line codec and event parser.
//!
//! Raw bytes go through the codec exactly as they would off the socket, and
//! every decoded line is classified. Neither step may panic.

#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use slirc_bot::{event, LineCodec};
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    let mut codec = LineCodec::with_max_len(512);
    let mut buf = BytesMut::from(data);

    while let Ok(Some(line)) = codec.decode(&mut buf) {
        let _ = event::parse(&line, "DevBot");
        let _ = LineCodec::sanitize(line);
    }
    let _ = codec.decode_eof(&mut buf);
});
