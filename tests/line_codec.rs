//! Property-based tests for the line codec and the event parser.
//!
//! Verifies that:
//! 1. Chunk boundaries never change what the codec decodes
//! 2. Lines that cannot be decoded are dropped without affecting neighbours
//! 3. The parser never panics, whatever the line

use bytes::BytesMut;
use proptest::prelude::*;
use slirc_bot::{event, LineCodec};
use tokio_util::codec::Decoder;

// =============================================================================
// STRATEGIES
// =============================================================================

/// A line body without CR or LF.
fn body_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\r\n]{0,40}").expect("valid regex")
}

/// Server lines shaped like the ones the parser handles.
fn irc_line_strategy() -> impl Strategy<Value = String> {
    let nick = "[a-zA-Z][a-zA-Z0-9_]{0,8}";
    let chan = "#[a-z0-9]{1,10}";
    prop_oneof![
        prop::string::string_regex(&format!("PING :{nick}")).expect("valid regex"),
        prop::string::string_regex(&format!(":irc\\.test [0-9]{{3}} {nick} :[ -~]{{0,20}}"))
            .expect("valid regex"),
        prop::string::string_regex(&format!(":{nick}!u@h JOIN :?{chan}")).expect("valid regex"),
        prop::string::string_regex(&format!(":{nick}!u@h PRIVMSG ({chan}|{nick}) :[ -~\x01]{{0,30}}"))
            .expect("valid regex"),
        prop::string::string_regex(&format!(":{nick}!u@h KICK {chan} {nick}( :[ -~]*)?"))
            .expect("valid regex"),
    ]
}

fn decode_all(codec: &mut LineCodec, buf: &mut BytesMut, out: &mut Vec<String>) {
    while let Some(line) = codec.decode(buf).expect("decode never fails") {
        out.push(line);
    }
}

fn decode_whole(data: &[u8]) -> Vec<String> {
    decode_whole_with(LineCodec::new(), data)
}

fn decode_whole_with(mut codec: LineCodec, data: &[u8]) -> Vec<String> {
    let mut buf = BytesMut::from(data);
    let mut lines = Vec::new();
    decode_all(&mut codec, &mut buf, &mut lines);
    lines
}

fn decode_chunked(data: &[u8], cuts: &[usize]) -> Vec<String> {
    decode_chunked_with(LineCodec::new(), data, cuts)
}

fn decode_chunked_with(mut codec: LineCodec, data: &[u8], cuts: &[usize]) -> Vec<String> {
    let mut buf = BytesMut::new();
    let mut lines = Vec::new();

    let mut start = 0;
    for &cut in cuts.iter().chain(std::iter::once(&data.len())) {
        let end = cut.clamp(start, data.len());
        buf.extend_from_slice(&data[start..end]);
        decode_all(&mut codec, &mut buf, &mut lines);
        start = end;
    }
    lines
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn chunking_does_not_change_output(
        bodies in prop::collection::vec(body_strategy(), 0..8),
        mut cuts in prop::collection::vec(0usize..400, 0..12),
    ) {
        let data: String = bodies.iter().map(|b| format!("{b}\r\n")).collect();
        cuts.sort_unstable();

        let whole = decode_whole(data.as_bytes());
        let chunked = decode_chunked(data.as_bytes(), &cuts);
        prop_assert_eq!(&whole, &chunked);

        let expected: Vec<String> = bodies.into_iter().filter(|b| !b.is_empty()).collect();
        prop_assert_eq!(whole, expected);
    }

    #[test]
    fn chunking_does_not_change_output_near_limit(
        bodies in prop::collection::vec("[ -~]{0,20}", 0..8),
        mut cuts in prop::collection::vec(0usize..200, 0..12),
    ) {
        const LIMIT: usize = 16;
        let data: String = bodies.iter().map(|b| format!("{b}\r\n")).collect();
        cuts.sort_unstable();

        let whole = decode_whole_with(LineCodec::with_max_len(LIMIT), data.as_bytes());
        let chunked =
            decode_chunked_with(LineCodec::with_max_len(LIMIT), data.as_bytes(), &cuts);
        prop_assert_eq!(&whole, &chunked);

        let expected: Vec<String> = bodies
            .into_iter()
            .filter(|b| !b.is_empty() && b.len() <= LIMIT)
            .collect();
        prop_assert_eq!(whole, expected);
    }

    #[test]
    fn max_len_line_survives_any_split(split in 0usize..20) {
        let data = b"0123456789abcdef\r\nPING :x\r\n";
        let lines = decode_chunked_with(LineCodec::with_max_len(16), data, &[split]);
        prop_assert_eq!(lines, vec!["0123456789abcdef".to_string(), "PING :x".to_string()]);
    }

    #[test]
    fn invalid_utf8_drops_only_that_line(
        before in body_strategy(),
        after in body_strategy(),
        split in 0usize..64,
    ) {
        prop_assume!(!before.is_empty() && !after.is_empty());

        let mut data = Vec::new();
        data.extend_from_slice(before.as_bytes());
        data.extend_from_slice(b"\r\nbad \xff\xfe line\r\n");
        data.extend_from_slice(after.as_bytes());
        data.extend_from_slice(b"\r\n");

        let lines = decode_chunked(&data, &[split]);
        prop_assert_eq!(lines, vec![before, after]);
    }

    #[test]
    fn parser_never_panics(line in "\\PC{0,120}") {
        let _ = event::parse(&line, "DevBot");
    }

    #[test]
    fn parser_accepts_well_formed_lines(line in irc_line_strategy()) {
        let parsed = event::parse(&line, "DevBot");
        prop_assert!(parsed.is_ok(), "{:?} -> {:?}", line, parsed);
        prop_assert!(parsed.unwrap().is_some());
    }
}
