//! Bill of materials and installation cost (USD)

use serde::Serialize;

pub const GATEWAY_HARDWARE_USD: u64 = 150;
pub const GATEWAY_INSTALLATION_USD: u64 = 200;
pub const SENSOR_HARDWARE_USD: u64 = 45;
pub const SENSOR_INSTALLATION_USD: u64 = 10;

pub const GATEWAY_UNIT_USD: u64 = GATEWAY_HARDWARE_USD + GATEWAY_INSTALLATION_USD;
pub const SENSOR_UNIT_USD: u64 = SENSOR_HARDWARE_USD + SENSOR_INSTALLATION_USD;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostEstimate {
    pub gateways: usize,
    pub sensors: usize,
    pub gateway_hardware_usd: u64,
    pub gateway_installation_usd: u64,
    pub sensor_hardware_usd: u64,
    pub sensor_installation_usd: u64,
    pub total_usd: u64,
    pub per_hectare_usd: f64,
}

impl CostEstimate {
    pub fn new(gateways: usize, sensors: usize, hectares: f64) -> Self {
        let (g, s) = (gateways as u64, sensors as u64);
        let total = g * GATEWAY_UNIT_USD + s * SENSOR_UNIT_USD;
        Self {
            gateways,
            sensors,
            gateway_hardware_usd: g * GATEWAY_HARDWARE_USD,
            gateway_installation_usd: g * GATEWAY_INSTALLATION_USD,
            sensor_hardware_usd: s * SENSOR_HARDWARE_USD,
            sensor_installation_usd: s * SENSOR_INSTALLATION_USD,
            total_usd: total,
            per_hectare_usd: total as f64 / hectares,
        }
    }

    pub fn gateway_subtotal_usd(&self) -> u64 {
        self.gateway_hardware_usd + self.gateway_installation_usd
    }

    pub fn sensor_subtotal_usd(&self) -> u64 {
        self.sensor_hardware_usd + self.sensor_installation_usd
    }
}
