//! Transport layer: wire-format details (payload encoding, status classification).

mod send_sms;

pub use send_sms::{
    StatusClass, classify_status, decode_send_sms_response, encode_send_sms_json,
};
