// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simulated bulbs and a JSON-text store shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use yeegroup_lib::client::{DeviceClient, Properties, Property};
use yeegroup_lib::store::Store;
use yeegroup_lib::types::{Brightness, ColorTemperature, PowerState, RgbColor};
use yeegroup_lib::{ConfigurationError, Error, Result};

#[derive(Debug, Default)]
struct Bulb {
    connected: bool,
    reachable: bool,
    properties: Properties,
    commands: Vec<String>,
    fetches: usize,
}

/// A bulb simulated in memory with a fixed round-trip latency.
///
/// Clones share the same bulb, so a test keeps one clone to observe what a
/// group did to the other.
#[derive(Debug, Clone)]
pub struct SimBulb {
    hostname: String,
    latency: Duration,
    bulb: Arc<Mutex<Bulb>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl SimBulb {
    pub fn new(hostname: &str, name: &str) -> Self {
        let properties = Properties::new()
            .with(Property::Name, name)
            .with(Property::Power, "on")
            .with(Property::ColorMode, "1")
            .with(Property::Rgb, "16777215")
            .with(Property::Bright, "100")
            .with(Property::Ct, "4000");
        Self {
            hostname: hostname.to_string(),
            latency: Duration::from_millis(50),
            bulb: Arc::new(Mutex::new(Bulb {
                reachable: true,
                properties,
                ..Bulb::default()
            })),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_reachable(&self, reachable: bool) {
        let mut bulb = self.bulb.lock();
        bulb.reachable = reachable;
        if !reachable {
            bulb.connected = false;
        }
    }

    pub fn get(&self, property: Property) -> Option<String> {
        self.bulb.lock().properties.get(property).map(str::to_string)
    }

    pub fn put(&self, property: Property, value: &str) {
        self.bulb.lock().properties.insert(property, value);
    }

    pub fn connected(&self) -> bool {
        self.bulb.lock().connected
    }

    pub fn commands(&self) -> Vec<String> {
        self.bulb.lock().commands.clone()
    }

    pub fn fetches(&self) -> usize {
        self.bulb.lock().fetches
    }

    /// Highest number of calls seen running at once on this bulb.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn round_trip(&self) -> Result<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let bulb = self.bulb.lock();
        if !bulb.reachable {
            return Err(Error::connection(&self.hostname, "timed out"));
        }
        if !bulb.connected {
            return Err(Error::NotConnected {
                hostname: self.hostname.clone(),
            });
        }
        Ok(())
    }

    async fn command(&self, name: &str, updates: &[(Property, String)]) -> Result<()> {
        self.round_trip().await?;
        let mut bulb = self.bulb.lock();
        bulb.commands.push(name.to_string());
        for (property, value) in updates {
            bulb.properties.insert(*property, value.clone());
        }
        Ok(())
    }
}

impl DeviceClient for SimBulb {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn is_connected(&self) -> bool {
        self.bulb.lock().connected
    }

    async fn connect(&mut self) -> Result<()> {
        tokio::time::sleep(self.latency).await;
        let mut bulb = self.bulb.lock();
        if !bulb.reachable {
            return Err(Error::connection(&self.hostname, "no route to host"));
        }
        bulb.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.bulb.lock().connected = false;
        Ok(())
    }

    async fn get_property(&mut self, property: Property) -> Result<Option<String>> {
        self.round_trip().await?;
        Ok(self.get(property))
    }

    async fn get_all_properties(&mut self) -> Result<Properties> {
        self.round_trip().await?;
        let mut bulb = self.bulb.lock();
        bulb.fetches += 1;
        Ok(bulb.properties.clone())
    }

    async fn set_power(&mut self, power: PowerState) -> Result<()> {
        self.command("power", &[(Property::Power, power.as_str().to_string())])
            .await
    }

    async fn set_rgb(&mut self, color: RgbColor) -> Result<()> {
        self.command(
            "rgb",
            &[
                (Property::Rgb, color.to_packed().to_string()),
                (Property::ColorMode, "1".to_string()),
            ],
        )
        .await
    }

    async fn set_brightness(&mut self, brightness: Brightness) -> Result<()> {
        self.command("bright", &[(Property::Bright, brightness.value().to_string())])
            .await
    }

    async fn set_color_temperature(&mut self, temperature: ColorTemperature) -> Result<()> {
        self.command(
            "ct",
            &[
                (Property::Ct, temperature.kelvin().to_string()),
                (Property::ColorMode, "2".to_string()),
            ],
        )
        .await
    }

    async fn set_name(&mut self, name: &str) -> Result<()> {
        self.command("name", &[(Property::Name, name.to_string())])
            .await
    }
}

/// A store that keeps its list as JSON text, the way a file-backed store
/// would.
#[derive(Debug, Clone, Default)]
pub struct JsonStore {
    text: Arc<Mutex<String>>,
}

impl JsonStore {
    pub fn new() -> Self {
        Self {
            text: Arc::new(Mutex::new("[]".to_string())),
        }
    }

    pub fn text(&self) -> String {
        self.text.lock().clone()
    }

    pub fn set_text(&self, text: &str) {
        *self.text.lock() = text.to_string();
    }
}

impl<T> Store<T> for JsonStore
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Vec<T>> {
        serde_json::from_str(&self.text.lock()).map_err(|e| Error::Store(e.to_string()))
    }

    fn save(&self, items: &[T]) -> Result<()> {
        let text = serde_json::to_string_pretty(items).map_err(|e| Error::Store(e.to_string()))?;
        *self.text.lock() = text;
        Ok(())
    }

    fn delete_at(&self, index: usize) -> Result<Vec<T>> {
        let mut items: Vec<T> = self.load()?;
        if index >= items.len() {
            return Err(ConfigurationError::IndexOutOfRange {
                index,
                len: items.len(),
            }
            .into());
        }
        items.remove(index);
        self.save(&items)?;
        Ok(items)
    }
}
