//! Battery sampling via the `battery` crate.
//!
//! Reads the first battery the platform reports. Hosts without a battery
//! (or without a readable power supply) surface a [`SensorError`]; the
//! service layer degrades that to the safe default sample instead of
//! failing the tick.

use battery::units::ratio::percent;
use battery::{Manager, State};
use tracing::warn;

use chargemon_core::{BatterySample, PowerSource, SensorError};

/// Battery-backed power source.
pub struct BatteryProbe {
    manager: Option<Manager>,
}

impl BatteryProbe {
    /// Creates a probe. A host where the platform battery interface is
    /// unavailable still gets a probe; every sample then reports a
    /// sensor error.
    pub fn new() -> Self {
        let manager = match Manager::new() {
            Ok(manager) => Some(manager),
            Err(e) => {
                warn!(error = %e, "Battery interface unavailable, samples will degrade");
                None
            }
        };
        Self { manager }
    }
}

impl Default for BatteryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerSource for BatteryProbe {
    fn sample(&mut self) -> Result<BatterySample, SensorError> {
        let manager = self
            .manager
            .as_ref()
            .ok_or_else(|| SensorError("battery interface unavailable".into()))?;

        let mut batteries = manager
            .batteries()
            .map_err(|e| SensorError(e.to_string()))?;

        match batteries.next() {
            Some(Ok(battery)) => Ok(BatterySample::new(
                plugged_from_state(battery.state()),
                percent_from_charge(battery.state_of_charge().get::<percent>()),
            )),
            Some(Err(e)) => Err(SensorError(e.to_string())),
            None => Err(SensorError("no battery present".into())),
        }
    }
}

/// Maps a battery state to the plugged flag.
///
/// Only charging and full unambiguously mean external power; everything
/// else (including an unknown state) reads as unplugged.
fn plugged_from_state(state: State) -> bool {
    matches!(state, State::Charging | State::Full)
}

/// Converts the charge ratio (0.0–100.0) to a whole percent.
fn percent_from_charge(charge: f32) -> u8 {
    charge.round().clamp(0.0, 100.0) as u8
}
