//! Session state and the serialized control surface
//!
//! One mutex serializes every entry point that touches the session or
//! issues bus transactions. The host framework calls in synchronously on
//! its own worker context; concurrent callers block and are never
//! interleaved mid-transaction.

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::data::{
    default_mode, validate_platform_config, FormatRequest, FrameDescEntry, FrameDescriptor,
    PlatformConfig, ResolutionMode, SensorState, SUPPORTED_MODES,
};
use crate::engine::machine;
use crate::error::Result;
use crate::hw::{apply_register_list, power_on_and_wait, RegisterBus, ResetLine};

/// Host-managed reference-counted device power
#[cfg_attr(test, mockall::automock)]
pub trait RuntimePower: Send {
    /// Take a power reference; the device must be usable on return
    fn acquire(&mut self) -> Result<()>;

    /// Drop the power reference
    fn release(&mut self);
}

/// Keeps the device powered for its whole lifetime
pub struct AlwaysOn;

impl RuntimePower for AlwaysOn {
    fn acquire(&mut self) -> Result<()> {
        Ok(())
    }

    fn release(&mut self) {}
}

/// Host control plumbing
///
/// Defaults are pushed once per stream start; the only control today is
/// the fixed read-only link frequency.
pub trait HostControls: Send {
    /// Push control defaults to the host
    fn push_defaults(&mut self) -> Result<()>;
}

/// No host controls wired
pub struct NoControls;

impl HostControls for NoControls {
    fn push_defaults(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Mutable sensor runtime state plus the hardware it owns
struct SensorSession<B> {
    bus: B,
    reset: Option<Box<dyn ResetLine>>,
    power: Box<dyn RuntimePower>,
    controls: Box<dyn HostControls>,
    config: PlatformConfig,
    /// Currently selected mode; always a catalog entry
    cur_mode: &'static ResolutionMode,
    /// Last mode whose register program reached the sensor; None forces
    /// application on the next stream start
    pre_mode: Option<&'static ResolutionMode>,
    streaming: bool,
}

impl<B: RegisterBus> SensorSession<B> {
    fn apply_cur_mode(&mut self) -> Result<()> {
        apply_register_list(&mut self.bus, self.cur_mode.reg_list, true)
    }

    /// Program the mode registers if they changed, push control defaults,
    /// and move the sensor to streaming
    fn start_streaming(&mut self) -> Result<()> {
        let mode_applied = self
            .pre_mode
            .is_some_and(|pre| std::ptr::eq(pre, self.cur_mode));
        if !mode_applied {
            self.apply_cur_mode().map_err(|e| {
                error!("failed to set stream mode: {}", e);
                e
            })?;
            self.pre_mode = Some(self.cur_mode);
        }

        self.controls.push_defaults().map_err(|e| {
            error!("failed to setup controls: {}", e);
            e
        })?;

        machine::transit(
            &mut self.bus,
            self.config.lanes,
            self.cur_mode.fps,
            SensorState::Streaming,
        )
    }

    /// Best-effort return to startup; a caller's original error stays
    /// authoritative, so this swallows its own
    fn stop_streaming(&mut self) {
        if let Err(e) = machine::transit(
            &mut self.bus,
            self.config.lanes,
            self.cur_mode.fps,
            SensorState::Startup,
        ) {
            warn!("failed to stop streaming: {}", e);
        }
    }

    fn set_streaming(&mut self, enable: bool) -> Result<()> {
        if self.streaming == enable {
            return Ok(());
        }

        if enable {
            self.power.acquire()?;

            if let Err(e) = self.start_streaming() {
                self.stop_streaming();
                self.power.release();
                return Err(e);
            }

            self.streaming = true;
            info!(
                "streaming started ({}x{}@{})",
                self.cur_mode.width, self.cur_mode.height, self.cur_mode.fps
            );
        } else {
            self.stop_streaming();
            self.power.release();
            self.streaming = false;
            info!("streaming stopped");
        }

        Ok(())
    }
}

/// Serialized public surface over a single sensor session
///
/// Constructed once at device attach; every operation locks the session
/// for its full duration.
pub struct SessionController<B> {
    session: Mutex<SensorSession<B>>,
}

impl<B: RegisterBus> SessionController<B> {
    /// Bring up the sensor and construct its session
    ///
    /// Verifies the module identity, runs initialization, and applies the
    /// default mode program so the first stream start has nothing left to
    /// configure.
    pub fn attach(
        bus: B,
        reset: Option<Box<dyn ResetLine>>,
        power: Box<dyn RuntimePower>,
        controls: Box<dyn HostControls>,
        config: PlatformConfig,
    ) -> Result<Self> {
        validate_platform_config(&config)?;

        let mut session = SensorSession {
            bus,
            reset,
            power,
            controls,
            config,
            cur_mode: default_mode(),
            pre_mode: None,
            streaming: false,
        };

        machine::identify(&mut session.bus)?;
        machine::initialize(
            &mut session.bus,
            session.config.lanes,
            session.cur_mode.fps,
            session.config.fsin_interrupt_driven,
        )?;
        session.apply_cur_mode()?;
        session.pre_mode = Some(session.cur_mode);

        info!(
            "sensor{} attached ({} lanes, {}x{}@{})",
            session
                .config
                .suffix
                .as_deref()
                .map(|s| format!(" {s}"))
                .unwrap_or_default(),
            session.config.lanes,
            session.cur_mode.width,
            session.cur_mode.height,
            session.cur_mode.fps
        );
        Ok(Self {
            session: Mutex::new(session),
        })
    }

    /// Start the output stream; a no-op when already streaming
    pub fn enable_streams(&self) -> Result<()> {
        self.session.lock().set_streaming(true)
    }

    /// Stop the output stream; a no-op when already stopped
    ///
    /// A failed transition is logged but the streaming flag is cleared
    /// regardless - disable must not get stuck on.
    pub fn disable_streams(&self) -> Result<()> {
        self.session.lock().set_streaming(false)
    }

    /// Currently selected mode
    pub fn get_format(&self) -> &'static ResolutionMode {
        self.session.lock().cur_mode
    }

    /// Select the supported mode for a host format request
    ///
    /// Exact match on pixel code, width, and height; anything else falls
    /// back to the default catalog entry. Registers apply lazily on the
    /// next stream start, so setting a format while stopped only updates
    /// the selection.
    pub fn set_format(&self, request: FormatRequest) -> &'static ResolutionMode {
        let mode = SUPPORTED_MODES
            .iter()
            .find(|m| {
                m.code == request.code && m.width == request.width && m.height == request.height
            })
            .unwrap_or_else(|| default_mode());

        let mut session = self.session.lock();
        session.cur_mode = mode;
        debug!("format set to {}x{}@{}", mode.width, mode.height, mode.fps);
        mode
    }

    /// Streaming flag as tracked by the session
    pub fn is_streaming(&self) -> bool {
        self.session.lock().streaming
    }

    /// Park the sensor and cut power ahead of a system sleep
    ///
    /// Always succeeds from the caller's perspective: stop failures are
    /// logged, and the reset line is asserted regardless. The streaming
    /// flag is left set so resume can restore the stream.
    pub fn suspend(&self) {
        let mut session = self.session.lock();

        if session.streaming {
            session.stop_streaming();
        }

        if let Some(reset) = session.reset.as_mut() {
            if let Err(e) = reset.assert_reset() {
                warn!("failed to assert reset on suspend: {}", e);
            }
        }
    }

    /// Re-power and reprogram the sensor after a system sleep
    ///
    /// Power sequencing, identification, initialization, and the current
    /// mode program all propagate their failures. If the session was
    /// streaming before suspend, the stream is restarted; a failure there
    /// clears the streaming flag and parks the sensor instead of leaving
    /// it half-started.
    pub fn resume(&self) -> Result<()> {
        let mut guard = self.session.lock();
        let session = &mut *guard;

        if let Some(reset) = session.reset.as_mut() {
            power_on_and_wait(reset.as_mut()).map_err(|e| {
                error!("failed to power on sensor in resume: {}", e);
                e
            })?;
        }

        machine::identify(&mut session.bus)?;
        machine::initialize(
            &mut session.bus,
            session.config.lanes,
            session.cur_mode.fps,
            session.config.fsin_interrupt_driven,
        )?;

        session.apply_cur_mode().map_err(|e| {
            error!("failed to apply current mode in resume: {}", e);
            e
        })?;

        if session.streaming {
            if let Err(e) = session.start_streaming() {
                session.streaming = false;
                session.stop_streaming();
                return Err(e);
            }
        }

        info!("sensor resumed");
        Ok(())
    }

    /// Pixel output description for the active mode
    ///
    /// Exactly one stream entry on virtual channel 0.
    pub fn frame_descriptor(&self) -> FrameDescriptor {
        let session = self.session.lock();
        FrameDescriptor {
            entries: vec![FrameDescEntry {
                stream: 0,
                pixel_code: session.cur_mode.code,
                datatype: session.cur_mode.datatype,
                vc: 0,
            }],
        }
    }
}
