//! Greenhouse controller: main entry point.
//!
//! Hexagonal architecture with one periodic cycle and one input worker.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        CloudAdapter          LogEventSink     │
//! │  (Sensor+Thermal+       (ObjectStore+         (EventSink)      │
//! │   Camera+Clock)          RecordStore)         JsonConfigFile   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   AppService (capture · persist · thermostat)          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Joystick thread ─▶ InputDispatcher ─▶ CommandWorker thread    │
//! │  FanController · AuxRelayController · StatusIndicator          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exit status: 0 after an interrupt, 1 after a fatal error.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{error, info, warn};

use greenhouse::adapters::cloud::CloudAdapter;
use greenhouse::adapters::config_file::JsonConfigFile;
use greenhouse::adapters::hardware::HardwareAdapter;
use greenhouse::adapters::log_sink::LogEventSink;
use greenhouse::adapters::object_store::BucketDirectory;
use greenhouse::adapters::record_store::JsonLinesTable;
use greenhouse::app::dispatcher::{CommandWorker, InputDispatcher};
use greenhouse::app::ports::{ConfigPort, RelayOutput};
use greenhouse::app::service::AppService;
use greenhouse::app::shutdown::Shutdown;
use greenhouse::config::SystemConfig;
use greenhouse::control::aux_relay::AuxRelayController;
use greenhouse::control::fan::FanController;
use greenhouse::drivers::fan_animation::FanAnimation;
use greenhouse::drivers::joystick::Joystick;
use greenhouse::drivers::led_matrix::{FramebufferMatrix, MemoryMatrix, SharedMatrix, shared};
use greenhouse::drivers::relay::{Relay, SimPin, SysfsPin};
use greenhouse::drivers::status_indicator::StatusIndicator;
use greenhouse::units::c_to_f;

fn main() -> ExitCode {
    // ── Structured logging ────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("greenhouse terminated: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    info!("greenhouse v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Config ─────────────────────────────────────────────
    let config_file = JsonConfigFile::from_env();
    let config = config_file
        .load()
        .with_context(|| format!("loading {}", config_file.path().display()))?;
    info!(
        "bucket={} table={} interval={}s threshold={:.1}F",
        config.bucket,
        config.record_table,
        config.log_interval_secs,
        c_to_f(config.fan_on_threshold_c)
    );

    // ── 2. Output devices ─────────────────────────────────────
    let matrix = open_matrix(&config)?;
    let indicator = Arc::new(StatusIndicator::new(
        Arc::clone(&matrix),
        Duration::from_millis(config.success_hold_ms),
    ));
    indicator.clear();

    let fan = Arc::new(FanController::new(
        relay_output(&config, config.fan_relay_gpio, "fan")?,
        FanAnimation::new(Arc::clone(&matrix)),
        Arc::clone(&indicator),
        config.fan_on_threshold_c,
        Duration::from_millis(config.fan_stop_settle_ms),
    ));
    let aux = Arc::new(AuxRelayController::new(
        relay_output(&config, config.aux_relay_gpio, "aux")?,
        Arc::clone(&indicator),
    ));

    // ── 3. Input: joystick → queue → worker ───────────────────
    let (dispatcher, commands) = InputDispatcher::channel();
    let mut joystick = Joystick::new(&config.joystick_path);
    dispatcher.register(&mut joystick);
    if let Err(e) = joystick.spawn() {
        warn!("joystick {} unavailable ({}), buttons disabled", config.joystick_path, e);
    }
    CommandWorker::new(Arc::clone(&fan), Arc::clone(&aux))
        .spawn(commands)
        .context("spawning input worker")?;

    // ── 4. Input-side adapters ────────────────────────────────
    let mut hw = HardwareAdapter::from_config(&config)
        .with_context(|| format!("opening Sense HAT sensors under {}", config.iio_root))?;
    let mut cloud = CloudAdapter::new(
        BucketDirectory::new(&config.bucket_root, &config.bucket),
        JsonLinesTable::new(&config.record_dir, &config.record_table),
    );
    let mut sink = LogEventSink::new();

    // ── 5. Interrupt handling ─────────────────────────────────
    let (shutdown, trigger) = Shutdown::channel();
    ctrlc::set_handler(move || {
        info!("interrupt received, stopping after the current cycle");
        let _ = trigger.send(());
    })
    .context("installing signal handler")?;

    // ── 6. Main loop ──────────────────────────────────────────
    let mut app = AppService::new(&config, fan, indicator);
    app.run(&mut hw, &mut cloud, &mut sink, &shutdown)?;
    Ok(())
}

fn open_matrix(config: &SystemConfig) -> Result<SharedMatrix> {
    match FramebufferMatrix::open(&config.framebuffer_path) {
        Ok(fb) => Ok(shared(fb)),
        Err(e) if config.simulate_devices => {
            warn!(
                "LED matrix {} unavailable ({}), rendering to memory",
                config.framebuffer_path, e
            );
            Ok(shared(MemoryMatrix::new()))
        }
        Err(e) => Err(e).with_context(|| format!("opening LED matrix {}", config.framebuffer_path)),
    }
}

fn relay_output(
    config: &SystemConfig,
    gpio: u32,
    label: &'static str,
) -> Result<Box<dyn RelayOutput>> {
    match SysfsPin::export(&config.gpio_sysfs_root, gpio) {
        Ok(pin) => Ok(Box::new(Relay::active_low(pin, label)?)),
        Err(e) if config.simulate_devices => {
            warn!("GPIO {} for {} relay unavailable ({}), simulating", gpio, label, e);
            Ok(Box::new(Relay::active_low(SimPin::new(), label)?))
        }
        Err(e) => Err(e).with_context(|| format!("exporting GPIO {gpio} for the {label} relay")),
    }
}
