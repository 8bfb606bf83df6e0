//! In-memory collaborator fakes shared by the daemon tests.

use std::cell::RefCell;
use std::rc::Rc;

use chargemon_core::{
    AlertSink, BatterySample, ChargeMonitor, ConfigError, ConfigStore, ConfirmChoice, IconState,
    IconSurface, MonitorConfig, PowerSource, SensorError,
};

use crate::service::MonitorService;

/// Shared handles into the fakes, kept by the test after the service has
/// taken ownership of the collaborators.
pub(crate) struct Handles {
    pub sample: Rc<RefCell<BatterySample>>,
    pub power_fails: Rc<RefCell<bool>>,
    pub power_reads: Rc<RefCell<u32>>,
    pub alert_calls: Rc<RefCell<Vec<String>>>,
    pub confirm_choice: Rc<RefCell<ConfirmChoice>>,
    pub icon_states: Rc<RefCell<Vec<IconState>>>,
    pub saved: Rc<RefCell<Vec<MonitorConfig>>>,
    pub stored: Rc<RefCell<MonitorConfig>>,
}

struct ScriptedPower {
    sample: Rc<RefCell<BatterySample>>,
    fails: Rc<RefCell<bool>>,
    reads: Rc<RefCell<u32>>,
}

impl PowerSource for ScriptedPower {
    fn sample(&mut self) -> Result<BatterySample, SensorError> {
        *self.reads.borrow_mut() += 1;
        if *self.fails.borrow() {
            Err(SensorError("scripted failure".into()))
        } else {
            Ok(*self.sample.borrow())
        }
    }
}

struct RecordingAlerts {
    calls: Rc<RefCell<Vec<String>>>,
    choice: Rc<RefCell<ConfirmChoice>>,
}

impl AlertSink for RecordingAlerts {
    fn confirm(
        &mut self,
        title: &str,
        _message: &str,
        _affirmative_label: &str,
        _dismiss_label: &str,
    ) -> ConfirmChoice {
        self.calls.borrow_mut().push(format!("confirm:{title}"));
        *self.choice.borrow()
    }

    fn notify(&mut self, title: &str, _subtitle: &str, _message: &str) {
        self.calls.borrow_mut().push(format!("notify:{title}"));
    }
}

struct RecordingIcon {
    states: Rc<RefCell<Vec<IconState>>>,
}

impl IconSurface for RecordingIcon {
    fn set_icon(&mut self, state: IconState) {
        self.states.borrow_mut().push(state);
    }
}

struct MemoryStore {
    saved: Rc<RefCell<Vec<MonitorConfig>>>,
    stored: Rc<RefCell<MonitorConfig>>,
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> MonitorConfig {
        self.stored.borrow().clone()
    }

    fn save(&self, config: &MonitorConfig) -> Result<(), ConfigError> {
        self.saved.borrow_mut().push(config.clone());
        Ok(())
    }
}

/// Builds a service over fakes with the given initial battery sample.
pub(crate) fn fixture(sample: BatterySample) -> (MonitorService, Handles) {
    let handles = Handles {
        sample: Rc::new(RefCell::new(sample)),
        power_fails: Rc::new(RefCell::new(false)),
        power_reads: Rc::new(RefCell::new(0)),
        alert_calls: Rc::new(RefCell::new(Vec::new())),
        confirm_choice: Rc::new(RefCell::new(ConfirmChoice::Acknowledged)),
        icon_states: Rc::new(RefCell::new(Vec::new())),
        saved: Rc::new(RefCell::new(Vec::new())),
        stored: Rc::new(RefCell::new(MonitorConfig::default())),
    };

    let service = MonitorService::new(
        ChargeMonitor::new(MonitorConfig::default()),
        Box::new(ScriptedPower {
            sample: handles.sample.clone(),
            fails: handles.power_fails.clone(),
            reads: handles.power_reads.clone(),
        }),
        Box::new(RecordingAlerts {
            calls: handles.alert_calls.clone(),
            choice: handles.confirm_choice.clone(),
        }),
        Box::new(RecordingIcon {
            states: handles.icon_states.clone(),
        }),
        Box::new(MemoryStore {
            saved: handles.saved.clone(),
            stored: handles.stored.clone(),
        }),
    );

    (service, handles)
}
