use std::sync::Arc;

use eyre::Result;
use slog::{info, o, Logger};
use switch_uart_pad::{open_serial, Link, Pad, SerialTransport};

use crate::config::Config;

fn setup_logging() -> Logger {
    use slog::Drain;
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(drain, slog::o!())
}

mod config;

mod request;

mod server;

/// Open the serial device, sync with the MCU and check that commands get through.
/// Any failure here is fatal.
fn connect(logger: &Logger, config: &Config) -> Result<Pad<SerialTransport>> {
    let serial = &config.serial;
    let port = open_serial(&serial.device, serial.baud, serial.timeout())?;
    info!(logger, "serial.open"; "device" => &serial.device, "baud" => serial.baud);

    let mut link = Link::new(port, serial.timeout()).sync(logger)?;
    info!(logger, "serial.synced");

    link.exercise(config.settle())?;
    info!(logger, "serial.verified");

    Ok(Pad::new(
        logger.new(o!("component" => "pad")),
        link,
        config.pointer,
    ))
}

fn main() -> Result<()> {
    let logger = setup_logging();
    let (config, path) = config::load(std::env::args_os().nth(1))?;
    info!(logger, "config.loaded"; "path" => ?path, "pointer_stick" => ?config.pointer.stick);

    let pad = Arc::new(connect(&logger, &config)?);
    server::mainloop(logger, pad, &config.http)
}
