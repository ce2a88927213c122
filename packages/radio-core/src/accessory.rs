//! On/off switch surface for a smart-home bridge.
//!
//! Bridges expect "set" requests to return immediately and "get" requests to
//! report the real state, so switching is fire-and-forget while the state
//! query awaits the controller.

use std::sync::Arc;

use crate::controller::DeviceController;
use crate::error::RadioResult;
use crate::protocol_constants::STATION_TITLE;
use crate::runtime::TaskSpawner;

/// A single switch that turns the whole household radio on and off.
pub struct RadioSwitch<S: TaskSpawner> {
    controller: Arc<DeviceController>,
    spawner: S,
}

impl<S: TaskSpawner> RadioSwitch<S> {
    pub fn new(controller: Arc<DeviceController>, spawner: S) -> Self {
        Self {
            controller,
            spawner,
        }
    }

    /// Name the bridge shows for the switch.
    pub fn name(&self) -> &'static str {
        STATION_TITLE
    }

    /// Starts the station in the background.
    pub fn turn_on(&self) {
        log::debug!("[Radio] Switch turned on");
        let controller = Arc::clone(&self.controller);
        self.spawner.spawn(async move { controller.play().await });
    }

    /// Stops every group in the background.
    pub fn turn_off(&self) {
        log::debug!("[Radio] Switch turned off");
        let controller = Arc::clone(&self.controller);
        self.spawner.spawn(async move { controller.pause().await });
    }

    /// Applies the bridge's "On" characteristic.
    pub fn set_on(&self, on: bool) {
        if on {
            self.turn_on();
        } else {
            self.turn_off();
        }
    }

    /// Reports whether any group is playing.
    pub async fn query_on_state(&self) -> RadioResult<bool> {
        self.controller.status().await
    }
}
