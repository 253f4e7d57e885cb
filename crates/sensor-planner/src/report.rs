//! Plain-text deployment guide
//!
//! Sections, in order: executive summary, gateway placement, sensor grid,
//! sensor to gateway assignment, installation protocol, LoRa configuration
//! and cost estimate.

use crate::plan::DeploymentPlan;
use crate::Result;
use chrono::NaiveDateTime;
use field_survey::format::{metres, thousands};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

const WIDTH: usize = 80;
/// Sensors listed per gateway before the remainder is summarised
const LISTED_PER_GATEWAY: usize = 10;
const LISTED_OUT_OF_RANGE: usize = 5;

const GATEWAY_REQUIREMENTS: [&str; 5] = [
    "LoRa module (915 MHz, TX power set to 14 dBm)",
    "Omnidirectional antenna 3-5 dBi",
    "Power: solar panel + battery or AC mains",
    "Recommended mounting height: 3-5 metres",
    "Connectivity: WiFi/Ethernet/Cellular uplink to cloud",
];

const SENSOR_SPECIFICATIONS: [&str; 6] = [
    "Type: capacitive soil moisture sensor",
    "Module: ESP32 + LoRa (SX1276/RFM95)",
    "Measurement range: 0-100% VWC",
    "Sampling interval: every 30-60 minutes",
    "Power: batteries + small solar panel",
    "Expected autonomy: >1 year with sleep mode",
];

const INSTALLATION_PHASES: [(&str, [&str; 5]); 3] = [
    (
        "PHASE 1 - GATEWAY INSTALLATION",
        [
            "Install gateways at the specified positions",
            "Orient antennas vertically (polarisation)",
            "Configure LoRa parameters (SF, BW, CR)",
            "Verify connectivity to cloud/server",
            "Run a range test with a mobile sensor",
        ],
    ),
    (
        "PHASE 2 - SENSOR DEPLOYMENT",
        [
            "Mark grid positions with stakes",
            "Install sensors at the specified depth (20-30cm)",
            "Program the device ID and assigned gateway on each sensor",
            "Verify data transmission",
            "Record each location in the database",
        ],
    ),
    (
        "PHASE 3 - VALIDATION AND COMMISSIONING",
        [
            "Verify data reception from every sensor",
            "Calibrate moisture thresholds for the soil type",
            "Configure alarms and notifications",
            "Train staff on maintenance",
            "Document the system and draw up a maintenance plan",
        ],
    ),
];

const LORA_CONFIGURATION: [&str; 7] = [
    "Frequency: 915 MHz (ISM band, Americas)",
    "Spreading Factor (SF): 7-9 (range/speed balance)",
    "Bandwidth (BW): 125 kHz",
    "Coding Rate (CR): 4/5",
    "TX power: 14 dBm (gateways), 14 dBm (sensors)",
    "Airtime: ~50-200ms per message",
    "Payload: 20-30 bytes (ID + moisture + battery + temperature)",
];

/// The deployment guide for one plan, stamped with its generation time
pub struct DeploymentReport<'a> {
    plan: &'a DeploymentPlan,
    generated_at: NaiveDateTime,
}

impl<'a> DeploymentReport<'a> {
    pub fn new(plan: &'a DeploymentPlan, generated_at: NaiveDateTime) -> Self {
        Self { plan, generated_at }
    }

    /// Write the guide to `path`, creating parent directories and
    /// overwriting any existing file
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_string())?;
        info!("Deployment guide saved to {:?}", path);
        Ok(())
    }

    fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        writeln!(f, "{}", title)?;
        writeln!(f, "{}", "-".repeat(WIDTH))
    }

    fn bullets(f: &mut fmt::Formatter<'_>, items: &[&str]) -> fmt::Result {
        for item in items {
            writeln!(f, "  • {}", item)?;
        }
        Ok(())
    }

    fn header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(WIDTH))?;
        writeln!(f, "DEPLOYMENT GUIDE - SOIL MOISTURE IoT MONITORING SYSTEM")?;
        writeln!(f, "Two-Tier Architecture: LoRa Gateways + Soil Moisture Sensors")?;
        writeln!(f, "{}", "=".repeat(WIDTH))?;
        writeln!(f)?;
        writeln!(f, "Date: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f)
    }

    fn executive_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.plan;
        Self::section(f, "1. EXECUTIVE SUMMARY")?;
        writeln!(
            f,
            "Field: {:.1} hectares ({}m × {}m)",
            plan.field.hectares(),
            metres(plan.field.dimension_x_m),
            metres(plan.field.dimension_y_m)
        )?;
        writeln!(f, "Crop: Avocado")?;
        writeln!(f, "Technology: LoRa 915 MHz + capacitive soil moisture sensors")?;
        writeln!(f)?;
        writeln!(f, "SYSTEM COMPONENTS:")?;
        writeln!(f, "  • LoRa gateways: {} units", plan.gateways.len())?;
        writeln!(f, "  • Soil moisture sensors: {} units", plan.sensors.len())?;
        writeln!(
            f,
            "  • Monitoring density: {:.2} sensors/hectare",
            plan.strategy().density_per_ha
        )?;
        writeln!(f, "  • Strategy: {}", plan.strategy().name)?;
        writeln!(f)
    }

    fn gateway_placement(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.plan;
        Self::section(f, "2. LORA GATEWAY PLACEMENT")?;
        writeln!(
            f,
            "{:<12} {:<12} {:<12} {:<12}",
            "Gateway", "X (m)", "Y (m)", "Sensors"
        )?;
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        for (idx, gw) in plan.gateways.iter().enumerate() {
            writeln!(
                f,
                "Gateway {:<4} {:<12.1} {:<12.1} {:<12}",
                gw.id,
                gw.position.x,
                gw.position.y,
                plan.assignments.assigned_to(idx).len()
            )?;
        }
        writeln!(f)?;
        writeln!(f, "GATEWAY REQUIREMENTS:")?;
        Self::bullets(f, &GATEWAY_REQUIREMENTS)?;
        writeln!(f)
    }

    fn sensor_grid(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::section(f, "3. SOIL MOISTURE SENSOR GRID")?;
        writeln!(f, "Grid spacing: {} m", metres(self.plan.strategy().spacing_m))?;
        writeln!(f, "Total sensors: {}", self.plan.sensors.len())?;
        writeln!(f, "Measurement depth: 20-30 cm (root zone)")?;
        writeln!(f)?;
        writeln!(f, "SENSOR SPECIFICATIONS:")?;
        Self::bullets(f, &SENSOR_SPECIFICATIONS)?;
        writeln!(f)
    }

    fn sensor_line(&self, f: &mut fmt::Formatter<'_>, sensor: usize, suffix: &str) -> fmt::Result {
        let a = &self.plan.assignments.assignments[sensor];
        writeln!(
            f,
            "    Sensor {:3}: ({:7.1}, {:7.1}) - {:6.1}m{}",
            a.sensor, a.position.x, a.position.y, a.distance_m, suffix
        )
    }

    fn assignment(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.plan;
        Self::section(f, "4. SENSOR -> GATEWAY ASSIGNMENT")?;

        for (idx, gw) in plan.gateways.iter().enumerate() {
            let assigned = plan.assignments.assigned_to(idx);
            writeln!(f)?;
            writeln!(
                f,
                "Gateway {} ({:.1}, {:.1}):",
                gw.id, gw.position.x, gw.position.y
            )?;
            writeln!(f, "  Assigned sensors: {}", assigned.len())?;
            writeln!(f, "  First {} sensors:", LISTED_PER_GATEWAY)?;
            for &sensor in assigned.iter().take(LISTED_PER_GATEWAY) {
                self.sensor_line(f, sensor, "")?;
            }
            if assigned.len() > LISTED_PER_GATEWAY {
                writeln!(
                    f,
                    "    ... and {} more sensors",
                    assigned.len() - LISTED_PER_GATEWAY
                )?;
            }
        }

        let out = &plan.assignments.out_of_range;
        if !out.is_empty() {
            writeln!(f)?;
            writeln!(f, "!! SENSORS OUT OF RANGE ({}):", out.len())?;
            for &sensor in out.iter().take(LISTED_OUT_OF_RANGE) {
                self.sensor_line(f, sensor, " from nearest gateway")?;
            }
            writeln!(f, "  ACTION: Consider adding a gateway or raising TX power")?;
        }
        writeln!(f)
    }

    fn installation(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::section(f, "5. INSTALLATION PROTOCOL")?;
        for (phase, steps) in &INSTALLATION_PHASES {
            writeln!(f)?;
            writeln!(f, "{}:", phase)?;
            for (n, step) in steps.iter().enumerate() {
                writeln!(f, "  {}. {}", n + 1, step)?;
            }
        }
        writeln!(f)
    }

    fn lora_configuration(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::section(f, "6. RECOMMENDED LORA CONFIGURATION")?;
        for line in LORA_CONFIGURATION {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }

    fn cost_estimate(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::cost::{
            GATEWAY_HARDWARE_USD, GATEWAY_INSTALLATION_USD, SENSOR_HARDWARE_USD,
            SENSOR_INSTALLATION_USD,
        };
        let cost = &self.plan.cost;

        Self::section(f, "7. COST ESTIMATE (USD)")?;
        writeln!(f, "LoRa gateways ({} units):", cost.gateways)?;
        writeln!(
            f,
            "  • Hardware: ${} (${}/unit)",
            cost.gateway_hardware_usd, GATEWAY_HARDWARE_USD
        )?;
        writeln!(
            f,
            "  • Installation: ${} (${}/unit)",
            cost.gateway_installation_usd, GATEWAY_INSTALLATION_USD
        )?;
        writeln!(f, "  • Gateway subtotal: ${}", cost.gateway_subtotal_usd())?;
        writeln!(f)?;
        writeln!(f, "Soil moisture sensors ({} units):", cost.sensors)?;
        writeln!(
            f,
            "  • Hardware: ${} (${}/unit)",
            cost.sensor_hardware_usd, SENSOR_HARDWARE_USD
        )?;
        writeln!(
            f,
            "  • Installation: ${} (${}/unit)",
            cost.sensor_installation_usd, SENSOR_INSTALLATION_USD
        )?;
        writeln!(f, "  • Sensor subtotal: ${}", cost.sensor_subtotal_usd())?;
        writeln!(f)?;
        writeln!(
            f,
            "TOTAL ESTIMATED COST: ${}",
            thousands(cost.total_usd as f64)
        )?;
        writeln!(
            f,
            "Cost per hectare: ${}/ha",
            thousands(cost.per_hectare_usd)
        )
    }
}

impl fmt::Display for DeploymentReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.header(f)?;
        self.executive_summary(f)?;
        self.gateway_placement(f)?;
        self.sensor_grid(f)?;
        self.assignment(f)?;
        self.installation(f)?;
        self.lora_configuration(f)?;
        self.cost_estimate(f)?;

        writeln!(f)?;
        writeln!(f, "{}", "=".repeat(WIDTH))?;
        writeln!(f, "END OF REPORT")?;
        writeln!(f, "{}", "=".repeat(WIDTH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateways_from;
    use crate::plan::tests::{field, field_plan};
    use chrono::NaiveDate;
    use field_survey::FieldConfig;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap()
    }

    fn field_report() -> String {
        let plan = field_plan();
        DeploymentReport::new(&plan, stamp()).to_string()
    }

    #[test]
    fn test_sections_in_order() {
        let text = field_report();
        let titles = [
            "1. EXECUTIVE SUMMARY",
            "2. LORA GATEWAY PLACEMENT",
            "3. SOIL MOISTURE SENSOR GRID",
            "4. SENSOR -> GATEWAY ASSIGNMENT",
            "5. INSTALLATION PROTOCOL",
            "6. RECOMMENDED LORA CONFIGURATION",
            "7. COST ESTIMATE (USD)",
            "END OF REPORT",
        ];
        let mut last = 0;
        for title in titles {
            let at = text[last..]
                .find(title)
                .unwrap_or_else(|| panic!("missing {}", title));
            last += at + title.len();
        }
        assert!(text.starts_with(&"=".repeat(80)));
        assert!(text.contains("Date: 2024-03-05 14:07:09\n"));
    }

    #[test]
    fn test_summary_and_gateway_table() {
        let text = field_report();
        assert!(text.contains("Field: 144.0 hectares (1600m × 900m)\n"));
        assert!(text.contains("  • Soil moisture sensors: 91 units\n"));
        assert!(text.contains("  • Monitoring density: 0.67 sensors/hectare\n"));
        assert!(text.contains("  • Strategy: Medium Precision\n"));
        assert!(text.contains("Gateway      X (m)        Y (m)        Sensors     \n"));
        assert!(text.contains("Gateway 1    1525.0       525.0        41          \n"));
        assert!(text.contains("Gateway 2    225.0        675.0        47          \n"));
        assert!(text.contains("Grid spacing: 120 m\n"));
    }

    #[test]
    fn test_assignment_listing() {
        let text = field_report();
        assert!(text.contains("Gateway 1 (1525.0, 525.0):\n  Assigned sensors: 41\n  First 10 sensors:\n"));
        assert!(text.contains("    Sensor   8: ( 1020.0,    60.0) -  686.5m\n"));
        assert!(text.contains("    Sensor   0: (   60.0,    60.0) -  636.7m\n"));
        assert!(text.contains("    ... and 31 more sensors\n"));
        assert!(text.contains("    ... and 37 more sensors\n"));

        assert!(text.contains("!! SENSORS OUT OF RANGE (3):\n"));
        assert!(text.contains("    Sensor   5: (  660.0,    60.0) -  753.3m from nearest gateway\n"));
        assert!(text.contains("  ACTION: Consider adding a gateway or raising TX power\n"));
    }

    #[test]
    fn test_cost_section() {
        let text = field_report();
        assert!(text.contains("  • Hardware: $4095 ($45/unit)\n"));
        assert!(text.contains("  • Gateway subtotal: $700\n"));
        assert!(text.contains("  • Sensor subtotal: $5005\n"));
        assert!(text.contains("TOTAL ESTIMATED COST: $5,705\n"));
        assert!(text.contains("Cost per hectare: $40/ha\n"));
    }

    #[test]
    fn test_no_out_of_range_block_when_covered() {
        let gateways = gateways_from(&[(1525.0, 525.0), (225.0, 675.0), (700.0, 200.0)], 750.0);
        let plan = DeploymentPlan::build(field(), gateways).unwrap();
        let text = DeploymentReport::new(&plan, stamp()).to_string();
        assert!(!text.contains("OUT OF RANGE"));
        assert!(text.contains("Gateway 3 (700.0, 200.0):"));
    }

    #[test]
    fn test_short_lists_have_no_remainder_line() {
        let small = FieldConfig {
            dimension_x_m: 300.0,
            dimension_y_m: 200.0,
            total_area_m2: 60_000.0,
            ..field()
        };
        let plan = DeploymentPlan::build(small, gateways_from(&[(150.0, 100.0)], 750.0)).unwrap();
        let text = DeploymentReport::new(&plan, stamp()).to_string();
        assert!(text.contains("  Assigned sensors: 4\n"));
        assert!(!text.contains("more sensors"));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/deployment_guide.txt");
        let plan = field_plan();
        DeploymentReport::new(&plan, stamp()).write_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("TOTAL ESTIMATED COST: $5,705"));

        // Overwritten on the next run
        DeploymentReport::new(&plan, stamp()).write_to(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
    }
}
