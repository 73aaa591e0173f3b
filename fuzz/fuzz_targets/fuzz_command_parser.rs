//! Fuzz target: command poll response handling
//!
//! Drives arbitrary bodies through the same classification the HTTP
//! adapter applies to `GET /api/pump` responses and asserts that it never
//! panics, that oversized bodies are always rejected, and that anything
//! accepted re-serialises to a body that parses to the same command.
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use irrigation::adapters::http::decode_command_response;
use irrigation::error::{CommandError, ProtocolError};
use irrigation::protocol::parse_command;
use libfuzzer_sys::fuzz_target;

const MAX_BODY: usize = 256;

fuzz_target!(|data: &[u8]| {
    match decode_command_response(200, data, MAX_BODY) {
        Ok(cmd) => {
            assert!(data.len() <= MAX_BODY);
            let body = serde_json::to_vec(&cmd).expect("command serialises");
            assert_eq!(parse_command(&body), Ok(cmd));
        }
        Err(CommandError::Protocol(ProtocolError::BodyTooLarge)) => {
            assert!(data.len() > MAX_BODY);
        }
        Err(CommandError::Protocol(_)) => {}
        Err(CommandError::Network(e)) => panic!("status 200 reported as {e}"),
    }
});
