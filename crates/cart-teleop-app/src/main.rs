mod terminal;

use anyhow::{Context, Result};
use cart_teleop_core::{PortResolver, SerialTransport, Teleop, TeleopConfig, TickPacer};
use std::process::ExitCode;
use terminal::{CrosstermKeys, Screen, TerminalSession};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR. . .{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cfg = TeleopConfig::from_env();

    let port = cfg.port.resolve().context("could not find the cart's serial port")?;
    log::info!("using serial port {port}");

    let transport = SerialTransport::open(&port, &cfg.serial).context("could not connect to the cart")?;
    let pacer = TickPacer::new(cfg.tick);

    let session = TerminalSession::enter().context("could not set up the terminal")?;
    let mut teleop = Teleop::new(cfg, transport, CrosstermKeys, Screen::stdout(port.as_str()), pacer);
    let result = teleop.run();
    drop(session);

    result.context("teleop stopped")
}
