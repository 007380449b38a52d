//! The fixed-rate keyboard to serial control loop.

use crate::braking::BrakeRamp;
use crate::config::TeleopConfig;
use crate::error::Result;
use crate::framelog::FrameLog;
use crate::serial::Transport;
use crate::state::{CartState, KeyCommand};
use cart_teleop_protocol::CommandFrame;
use crossbeam_channel::Receiver;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Command(KeyCommand),
    /// Operator asked to quit.
    Interrupt,
    Ignored,
}

pub trait KeySource {
    /// Returns the next pending key without blocking.
    fn poll_key(&mut self) -> Result<Option<KeyInput>>;
}

pub trait StatusSink {
    fn show_instructions(&mut self) -> Result<()> {
        Ok(())
    }

    fn show(&mut self, frame: &CommandFrame, log: &FrameLog) -> Result<()>;
}

/// Blocks until the next tick boundary.
pub trait Pacer {
    fn wait(&mut self);
}

/// Steady-interval pacing. Ticks missed while busy are not made up.
pub struct TickPacer {
    ticker: Receiver<Instant>,
}

impl TickPacer {
    pub fn new(period: Duration) -> Self {
        Self {
            ticker: crossbeam_channel::tick(period),
        }
    }
}

impl Pacer for TickPacer {
    fn wait(&mut self) {
        let _ = self.ticker.recv();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Interrupted,
}

pub struct Teleop<T, K, S, P> {
    cfg: TeleopConfig,
    state: CartState,
    transport: T,
    keys: K,
    status: S,
    pacer: P,
    log: FrameLog,
}

impl<T, K, S, P> Teleop<T, K, S, P>
where
    T: Transport,
    K: KeySource,
    S: StatusSink,
    P: Pacer,
{
    pub fn new(cfg: TeleopConfig, transport: T, keys: K, status: S, pacer: P) -> Self {
        let log = FrameLog::new();
        Self {
            cfg,
            state: CartState::new(),
            transport,
            keys,
            status,
            pacer,
            log,
        }
    }

    pub fn state(&self) -> CartState {
        self.state
    }

    pub fn frame_log(&self) -> &FrameLog {
        &self.log
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    /// Runs until the operator interrupts or an unrecoverable error occurs.
    pub fn run(&mut self) -> Result<()> {
        self.status.show_instructions()?;
        while self.tick()? == Tick::Continue {}
        log::info!("interrupted after {} frames", self.log.total());
        Ok(())
    }

    /// One loop iteration: read a key, update state, send one frame, wait.
    pub fn tick(&mut self) -> Result<Tick> {
        match self.keys.poll_key()? {
            Some(KeyInput::Interrupt) => return Ok(Tick::Interrupted),
            Some(KeyInput::Command(KeyCommand::Brake)) => {
                if self.brake()? == Tick::Interrupted {
                    return Ok(Tick::Interrupted);
                }
                self.state.apply(KeyCommand::Brake, self.cfg.increments);
            }
            Some(KeyInput::Command(cmd)) => self.state.apply(cmd, self.cfg.increments),
            Some(KeyInput::Ignored) | None => {}
        }

        let frame = CommandFrame::new(self.state.velocity(), 0, self.state.angle());
        self.transmit(frame)?;
        self.pacer.wait();
        Ok(Tick::Continue)
    }

    fn brake(&mut self) -> Result<Tick> {
        let ramp = BrakeRamp::for_velocity(self.state.velocity(), self.cfg.full_brake_secs);
        log::debug!(
            "braking from {} over {} steps ({:?})",
            self.state.velocity(),
            ramp.steps(),
            ramp.duration()
        );

        for brake in ramp {
            self.transmit(CommandFrame::new(0, brake, self.state.angle()))?;
            self.pacer.wait();
            // Keys pressed mid-ramp are consumed without effect.
            if self.keys.poll_key()? == Some(KeyInput::Interrupt) {
                return Ok(Tick::Interrupted);
            }
        }
        Ok(Tick::Continue)
    }

    fn transmit(&mut self, frame: CommandFrame) -> Result<()> {
        self.transport.send(&frame)?;
        self.log.push(frame);
        self.status.show(&frame, &self.log)
    }
}
