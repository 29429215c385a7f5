//! Aircraft performance profile used to shape the vertical profile and timing.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Climb, descent and speed figures for one sortie.
///
/// Climb and descent are flown at the transit airspeed, so the gradients
/// below are derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceProfile {
    /// Transit climb rate in feet per minute
    pub climb_rate_ft_per_min: f64,
    /// Transit descent rate in feet per minute
    pub descent_rate_ft_per_min: f64,
    /// Average transit ground speed in knots
    pub transit_airspeed_kts: f64,
    /// Low-level route ground speed in knots
    pub route_airspeed_kts: f64,
    /// Low-level route altitude in feet
    pub route_altitude_ft: f64,
}

impl Default for PerformanceProfile {
    fn default() -> Self {
        Self {
            climb_rate_ft_per_min: 6000.0,
            descent_rate_ft_per_min: 6000.0,
            transit_airspeed_kts: 495.0, // about M0.75 at medium level
            route_airspeed_kts: 420.0,
            route_altitude_ft: 500.0,
        }
    }
}

impl PerformanceProfile {
    /// Build a profile and validate it in one step.
    pub fn new(
        climb_rate_ft_per_min: f64,
        descent_rate_ft_per_min: f64,
        transit_airspeed_kts: f64,
        route_airspeed_kts: f64,
        route_altitude_ft: f64,
    ) -> Result<Self, PlanError> {
        let profile = Self {
            climb_rate_ft_per_min,
            descent_rate_ft_per_min,
            transit_airspeed_kts,
            route_airspeed_kts,
            route_altitude_ft,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check that every figure is a finite, positive number.
    pub fn validate(&self) -> Result<(), PlanError> {
        let fields = [
            ("climb_rate_ft_per_min", self.climb_rate_ft_per_min),
            ("descent_rate_ft_per_min", self.descent_rate_ft_per_min),
            ("transit_airspeed_kts", self.transit_airspeed_kts),
            ("route_airspeed_kts", self.route_airspeed_kts),
            ("route_altitude_ft", self.route_altitude_ft),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlanError::InvalidProfile { field, value });
            }
        }
        Ok(())
    }

    /// Feet gained per nautical mile flown in the climb.
    pub fn climb_gradient_ft_per_nm(&self) -> f64 {
        self.climb_rate_ft_per_min / self.transit_airspeed_kts * 60.0
    }

    /// Feet lost per nautical mile flown in the descent.
    pub fn descent_gradient_ft_per_nm(&self) -> f64 {
        self.descent_rate_ft_per_min / self.transit_airspeed_kts * 60.0
    }
}
