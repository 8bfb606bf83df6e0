//! Core types: battery samples, thresholds, snooze state machine

pub mod config;
pub mod logging;
pub mod monitor;
pub mod traits;
pub mod types;

pub use config::{
    ConfigError, MonitorConfig, PLUG_PERCENT_CHOICES, UNPLUG_PERCENT_CHOICES,
};
pub use logging::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use monitor::{ChargeMonitor, MonitorStatus, SNOOZE_MINUTES};
pub use traits::{AlertSink, ConfigStore, IconSurface, PowerSource, SensorError};
pub use types::{BatterySample, ConfirmChoice, IconState, ThresholdEvent};
