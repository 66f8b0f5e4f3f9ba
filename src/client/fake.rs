// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory bulb used by unit tests.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::types::{Brightness, ColorTemperature, PowerState, RgbColor};

use super::{DeviceClient, Properties, Property};

#[derive(Debug, Default)]
struct FakeState {
    connected: bool,
    properties: Properties,
    calls: Vec<String>,
    connect_attempts: usize,
    fail_connect: bool,
    fail_fetch: bool,
    fail_commands: bool,
    fetch_delay: Option<Duration>,
}

/// Bulb whose state lives in memory. Clones share the same state so a test
/// can keep one clone for inspection while a handle drives the other.
#[derive(Debug, Clone)]
pub(crate) struct FakeBulb {
    hostname: String,
    state: Arc<Mutex<FakeState>>,
}

impl FakeBulb {
    pub(crate) fn new(hostname: &str, properties: Properties) -> Self {
        Self {
            hostname: hostname.to_string(),
            state: Arc::new(Mutex::new(FakeState {
                properties,
                ..FakeState::default()
            })),
        }
    }

    /// Bulb that is on, in RGB mode.
    pub(crate) fn rgb(hostname: &str, name: &str, packed: u32, bright: u8) -> Self {
        Self::new(
            hostname,
            Properties::new()
                .with(Property::Name, name)
                .with(Property::Power, "on")
                .with(Property::ColorMode, "1")
                .with(Property::Rgb, packed.to_string())
                .with(Property::Bright, bright.to_string())
                .with(Property::Ct, "6500"),
        )
    }

    /// Bulb that is on, in temperature mode.
    pub(crate) fn ct(hostname: &str, name: &str, kelvin: u16, bright: u8) -> Self {
        Self::new(
            hostname,
            Properties::new()
                .with(Property::Name, name)
                .with(Property::Power, "on")
                .with(Property::ColorMode, "2")
                .with(Property::Rgb, "16777215")
                .with(Property::Bright, bright.to_string())
                .with(Property::Ct, kelvin.to_string()),
        )
    }

    pub(crate) fn failing_connect(self) -> Self {
        self.state.lock().fail_connect = true;
        self
    }

    pub(crate) fn set_fail_connect(&self, fail: bool) {
        self.state.lock().fail_connect = fail;
    }

    pub(crate) fn set_fail_fetch(&self, fail: bool) {
        self.state.lock().fail_fetch = fail;
    }

    pub(crate) fn set_fail_commands(&self, fail: bool) {
        self.state.lock().fail_commands = fail;
    }

    pub(crate) fn set_fetch_delay(&self, delay: Duration) {
        self.state.lock().fetch_delay = Some(delay);
    }

    pub(crate) fn force_disconnected(&self) {
        self.state.lock().connected = false;
    }

    pub(crate) fn set_property(&self, property: Property, value: &str) {
        self.state.lock().properties.insert(property, value);
    }

    pub(crate) fn property(&self, property: Property) -> Option<String> {
        self.state.lock().properties.get(property).map(str::to_string)
    }

    pub(crate) fn connected(&self) -> bool {
        self.state.lock().connected
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Calls other than connect/disconnect/fetches.
    pub(crate) fn commands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("set_"))
            .collect()
    }

    pub(crate) fn connect_attempts(&self) -> usize {
        self.state.lock().connect_attempts
    }

    fn command(
        &self,
        name: &'static str,
        detail: String,
        update: &[(Property, String)],
    ) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(format!("{name} {detail}"));
        if !state.connected {
            return Err(Error::NotConnected {
                hostname: self.hostname.clone(),
            });
        }
        if state.fail_commands {
            return Err(Error::command(&self.hostname, name, "timeout"));
        }
        for (property, value) in update {
            state.properties.insert(*property, value.clone());
        }
        Ok(())
    }
}

impl DeviceClient for FakeBulb {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    async fn connect(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push("connect".to_string());
        state.connect_attempts += 1;
        if state.fail_connect {
            return Err(Error::connection(&self.hostname, "unreachable"));
        }
        state.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push("disconnect".to_string());
        state.connected = false;
        Ok(())
    }

    async fn get_property(&mut self, property: Property) -> Result<Option<String>> {
        let state = self.state.lock();
        if !state.connected || state.fail_fetch {
            return Err(Error::property_fetch(&self.hostname, "no response"));
        }
        Ok(state.properties.get(property).map(str::to_string))
    }

    async fn get_all_properties(&mut self) -> Result<Properties> {
        let delay = {
            let mut state = self.state.lock();
            state.calls.push("get_all_properties".to_string());
            state.fetch_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.state.lock();
        if !state.connected || state.fail_fetch {
            return Err(Error::property_fetch(&self.hostname, "no response"));
        }
        Ok(state.properties.clone())
    }

    async fn set_power(&mut self, power: PowerState) -> Result<()> {
        self.command(
            "set_power",
            power.as_str().to_string(),
            &[(Property::Power, power.as_str().to_string())],
        )
    }

    async fn set_rgb(&mut self, color: RgbColor) -> Result<()> {
        self.command(
            "set_rgb",
            color.to_string(),
            &[
                (Property::Rgb, color.to_packed().to_string()),
                (Property::ColorMode, "1".to_string()),
            ],
        )
    }

    async fn set_brightness(&mut self, brightness: Brightness) -> Result<()> {
        self.command(
            "set_brightness",
            brightness.value().to_string(),
            &[(Property::Bright, brightness.value().to_string())],
        )
    }

    async fn set_color_temperature(&mut self, temperature: ColorTemperature) -> Result<()> {
        self.command(
            "set_color_temperature",
            temperature.kelvin().to_string(),
            &[
                (Property::Ct, temperature.kelvin().to_string()),
                (Property::ColorMode, "2".to_string()),
            ],
        )
    }

    async fn set_name(&mut self, name: &str) -> Result<()> {
        self.command(
            "set_name",
            name.to_string(),
            &[(Property::Name, name.to_string())],
        )
    }
}
