//! Sensor to gateway assignment

use crate::{Gateway, PlanError, Result, Sensor};
use nalgebra::Point2;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assignment {
    pub sensor: usize,
    pub position: Point2<f64>,
    /// Index into the gateway list (not the 1-based gateway id)
    pub gateway: usize,
    pub distance_m: f64,
    pub in_range: bool,
}

/// Result of assigning every sensor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentPlan {
    /// One entry per sensor, in sensor index order
    pub assignments: Vec<Assignment>,
    /// In-range sensor indices, per gateway
    pub by_gateway: Vec<Vec<usize>>,
    /// Sensors whose nearest gateway is still beyond its range
    pub out_of_range: Vec<usize>,
}

impl AssignmentPlan {
    pub fn assigned_to(&self, gateway: usize) -> &[usize] {
        self.by_gateway
            .get(gateway)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn in_range_count(&self) -> usize {
        self.assignments.len() - self.out_of_range.len()
    }

    pub fn all_covered(&self) -> bool {
        self.out_of_range.is_empty()
    }
}

/// Nearest gateway to `point` as `(index, distance)`.
///
/// Ties go to the gateway listed first.
pub fn nearest_gateway(point: &Point2<f64>, gateways: &[Gateway]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, gw) in gateways.iter().enumerate() {
        let d = gw.distance_to(point);
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best
}

/// Assign each sensor to its nearest gateway
pub fn assign_sensors(sensors: &[Sensor], gateways: &[Gateway]) -> Result<AssignmentPlan> {
    if gateways.is_empty() {
        return Err(PlanError::NoGateways);
    }

    let mut assignments = Vec::with_capacity(sensors.len());
    let mut by_gateway = vec![Vec::new(); gateways.len()];
    let mut out_of_range = Vec::new();

    for sensor in sensors {
        let (gateway, distance_m) =
            nearest_gateway(&sensor.position, gateways).ok_or(PlanError::NoGateways)?;
        let in_range = distance_m <= gateways[gateway].range_m;

        if in_range {
            by_gateway[gateway].push(sensor.index);
        } else {
            debug!(
                "Sensor {} is {:.1}m from {}, beyond range",
                sensor.index,
                distance_m,
                gateways[gateway].label()
            );
            out_of_range.push(sensor.index);
        }

        assignments.push(Assignment {
            sensor: sensor.index,
            position: sensor.position,
            gateway,
            distance_m,
            in_range,
        });
    }

    for (gw, assigned) in gateways.iter().zip(&by_gateway) {
        info!("  Gateway {}: {} sensors assigned", gw.id, assigned.len());
    }

    Ok(AssignmentPlan {
        assignments,
        by_gateway,
        out_of_range,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::gateways_from;
    use proptest::prelude::*;

    fn gateway_list() -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec((0.0f64..2000.0, 0.0f64..2000.0), 1..6)
    }

    fn sensor_list() -> impl Strategy<Value = Vec<Sensor>> {
        prop::collection::vec((0.0f64..2000.0, 0.0f64..2000.0), 0..40).prop_map(|points| {
            points
                .into_iter()
                .enumerate()
                .map(|(index, (x, y))| Sensor {
                    index,
                    position: Point2::new(x, y),
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_assigned_gateway_is_global_minimum(
            positions in gateway_list(),
            sensors in sensor_list(),
            range in 1.0f64..1500.0,
        ) {
            let gateways = gateways_from(&positions, range);
            let plan = assign_sensors(&sensors, &gateways).unwrap();
            for a in &plan.assignments {
                for gw in &gateways {
                    prop_assert!(a.distance_m <= gw.distance_to(&a.position));
                }
                // Nothing earlier in the list is equally close
                for gw in &gateways[..a.gateway] {
                    prop_assert!(gw.distance_to(&a.position) > a.distance_m);
                }
            }
        }

        #[test]
        fn prop_out_of_range_iff_beyond_range(
            positions in gateway_list(),
            sensors in sensor_list(),
            range in 1.0f64..1500.0,
        ) {
            let gateways = gateways_from(&positions, range);
            let plan = assign_sensors(&sensors, &gateways).unwrap();
            for a in &plan.assignments {
                prop_assert_eq!(!a.in_range, a.distance_m > range);
                prop_assert_eq!(plan.out_of_range.contains(&a.sensor), !a.in_range);
            }
            let listed: usize = plan.by_gateway.iter().map(Vec::len).sum();
            prop_assert_eq!(listed + plan.out_of_range.len(), sensors.len());
        }

        #[test]
        fn prop_assignment_is_idempotent(
            positions in gateway_list(),
            sensors in sensor_list(),
        ) {
            let gateways = gateways_from(&positions, 750.0);
            let first = assign_sensors(&sensors, &gateways).unwrap();
            let second = assign_sensors(&sensors, &gateways).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
