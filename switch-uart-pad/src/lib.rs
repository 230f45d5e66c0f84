//! Drive a Nintendo Switch controller emulated by a microcontroller over a serial link.
//!
//! Input events are folded into a [HeldState], encoded into a single [Command] word and
//! sent to the MCU by a [Pad], which serializes all events behind one lock.

#![warn(
    absolute_paths_not_starting_with_crate,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    meta_variable_misuse,
    missing_abi,
    missing_copy_implementations,
    missing_debug_implementations,
    non_ascii_idents,
    noop_method_call,
    semicolon_in_expressions_from_macros,
    single_use_lifetimes,
    unreachable_pub,
    unused_crate_dependencies,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    variant_size_differences
)]

pub mod command;
pub mod error;
pub mod input;
pub mod link;
pub mod packet;
pub mod pad;
pub mod state;
pub mod stick;

pub use command::Command;
pub use error::*;
pub use input::{Button, Buttons, Direction, Directions, Key, Stick};
pub use link::{open_serial, Link, SerialTransport, Synced, Transport, Unsynced};
pub use pad::{Outcome, Pad, Snapshot};
pub use state::HeldState;
pub use stick::{PointerConfig, PointerDelta, StickPosition};
