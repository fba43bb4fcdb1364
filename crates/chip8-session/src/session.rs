//! Session lifecycle: one core instance, one config, three states.
//!
//! The controller owns the only handle through which configuration reaches
//! the core, and gates every operation on the
//! `Unconfigured -> Armed -> Running` state machine so that `Core::start`
//! fires exactly once per arming no matter how enthusiastically the host
//! clicks.

use tracing::debug;

use crate::error::{Result, SessionError};

/// Instruction-set dialect the core should emulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// Classic CHIP-8.
    Chip,
    /// SCHIP with the modern (schipc) quirk set.
    SuperModern,
    /// SCHIP 1.1.
    SuperLegacy,
    #[default]
    Xo,
}

impl Target {
    /// Numeric code used across the host ABI (select-option values).
    pub fn code(self) -> u32 {
        match self {
            Target::Chip => 0,
            Target::SuperModern => 1,
            Target::SuperLegacy => 2,
            Target::Xo => 3,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Target::Chip),
            1 => Some(Target::SuperModern),
            2 => Some(Target::SuperLegacy),
            3 => Some(Target::Xo),
            _ => None,
        }
    }

    /// Recommended instructions-per-second default for the dialect. The XO
    /// figure is much higher because XO-CHIP software is written for fast
    /// interpreters.
    pub fn recommended_clock(self) -> u32 {
        match self {
            Target::Chip => 2966,
            Target::SuperModern | Target::SuperLegacy => 5000,
            Target::Xo => 30000,
        }
    }
}

/// Timing strategy driving the core's execution cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Fixed-interval host timer.
    Interval,
    /// Execution paced by the audio output callback.
    #[default]
    AudioCallback,
}

impl SyncMode {
    pub fn code(self) -> u32 {
        match self {
            SyncMode::Interval => 0,
            SyncMode::AudioCallback => 1,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(SyncMode::Interval),
            1 => Some(SyncMode::AudioCallback),
            _ => None,
        }
    }
}

/// The external interpreter core, consumed as a black box.
pub trait Core {
    fn apply_config(&mut self, target: Target, clock_hz: u32, rom: &[u8]);
    fn set_sync_mode(&mut self, mode: SyncMode);
    fn start(&mut self);
    fn reset(&mut self);
    fn display_width(&self) -> usize;
    fn display_height(&self) -> usize;
}

/// Complete configuration for one session. A new `configure` call replaces
/// the prior value wholesale; there is no partial merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub target: Target,
    pub clock_hz: u32,
    pub sync_mode: SyncMode,
    pub rom: Vec<u8>,
}

impl SessionConfig {
    fn validate(&self) -> Result<()> {
        if self.clock_hz == 0 {
            return Err(SessionError::InvalidConfig("clock rate must be positive"));
        }
        if self.rom.is_empty() {
            return Err(SessionError::InvalidConfig("ROM must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconfigured,
    Armed,
    Running,
}

impl SessionState {
    fn as_str(self) -> &'static str {
        match self {
            SessionState::Unconfigured => "unconfigured",
            SessionState::Armed => "armed",
            SessionState::Running => "running",
        }
    }
}

/// Owns the one core instance per session and its current config.
///
/// State machine: `Unconfigured --configure--> Armed --start--> Running
/// --reset--> Armed`. `start` while `Running` is an idempotent no-op;
/// `configure` while `Running` and `start` while `Unconfigured` fail with
/// [`SessionError::InvalidState`]. A rejected operation never partially
/// applies: validation happens before anything reaches the core.
pub struct SessionController<C: Core> {
    core: C,
    config: Option<SessionConfig>,
    state: SessionState,
}

impl<C: Core> SessionController<C> {
    pub fn new(core: C) -> Self {
        Self {
            core,
            config: None,
            state: SessionState::Unconfigured,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The active configuration, if the session has ever been configured.
    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    pub fn core(&self) -> &C {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    /// Apply a full configuration to an idle session.
    pub fn configure(&mut self, config: SessionConfig) -> Result<()> {
        if self.state == SessionState::Running {
            return Err(SessionError::InvalidState {
                op: "configure",
                state: self.state.as_str(),
            });
        }
        config.validate()?;
        self.apply(config);
        self.state = SessionState::Armed;
        Ok(())
    }

    /// Start the armed session. Exactly one `Core::start` per arming; calling
    /// this on an already-running session is a no-op so a double-clicked
    /// trigger cannot double-start.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            SessionState::Running => Ok(()),
            SessionState::Unconfigured => Err(SessionError::InvalidState {
                op: "start",
                state: self.state.as_str(),
            }),
            SessionState::Armed => {
                debug!("session start");
                self.core.start();
                self.state = SessionState::Running;
                Ok(())
            }
        }
    }

    /// Tear down any in-progress run state and re-arm with a fresh config in
    /// one step. Accepted from every state (from `Armed` it is equivalent to
    /// re-`configure` and does not start anything); a validation failure
    /// leaves the previous state, config and core untouched.
    pub fn reset(&mut self, config: SessionConfig) -> Result<()> {
        config.validate()?;
        debug!(from = self.state.as_str(), "session reset");
        self.core.reset();
        self.apply(config);
        self.state = SessionState::Armed;
        Ok(())
    }

    fn apply(&mut self, config: SessionConfig) {
        debug!(
            target_code = config.target.code(),
            clock_hz = config.clock_hz,
            rom_len = config.rom.len(),
            "applying session config"
        );
        self.core
            .apply_config(config.target, config.clock_hz, &config.rom);
        self.core.set_sync_mode(config.sync_mode);
        self.config = Some(config);
    }
}
