//! Protocol bindings for the Local Supports Local foundation API.
//!
//! Everything that travels over the wire between the `lsl` tools and the
//! foundation backend is defined here, along with the field checks that the
//! client applies before a request is sent.

#![deny(warnings)]
#![warn(unused_extern_crates)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unreachable)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::trivially_copy_pass_by_ref)]

pub mod constants;
pub mod v1;
pub mod validation;
