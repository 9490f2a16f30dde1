// Energy accumulation and bill estimate
//
// The readings are instantaneous power values with no reliable spacing, so
// each one is treated as covering a fixed minute. The result is an estimate,
// not a metered figure: a sensor publishing faster or slower than once a
// minute skews the total in proportion.
use serde::Serialize;

use super::error::GatewayError;

/// Readings per hour under the one-reading-per-minute assumption.
pub const SAMPLES_PER_HOUR: f64 = 60.0;

/// Days projected by the bill estimate.
pub const BILLING_DAYS: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyReading {
    pub cumulative_kwh: f64,
    pub estimated_bill: f64,
}

impl EnergyReading {
    pub fn kwh_display(&self) -> String {
        format!("{:.3}", self.cumulative_kwh)
    }

    pub fn bill_display(&self) -> String {
        format!("{:.2}", self.estimated_bill)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyState {
    cumulative_kwh: f64,
    tariff_per_kwh: f64,
}

impl EnergyState {
    pub fn new(tariff_per_kwh: f64) -> Result<Self, GatewayError> {
        validate_tariff(tariff_per_kwh)?;
        Ok(Self {
            cumulative_kwh: 0.0,
            tariff_per_kwh,
        })
    }

    pub fn cumulative_kwh(&self) -> f64 {
        self.cumulative_kwh
    }

    pub fn tariff_per_kwh(&self) -> f64 {
        self.tariff_per_kwh
    }

    pub fn set_tariff(&mut self, tariff_per_kwh: f64) -> Result<EnergyReading, GatewayError> {
        validate_tariff(tariff_per_kwh)?;
        self.tariff_per_kwh = tariff_per_kwh;
        Ok(self.reading())
    }

    /// Add one reading worth of energy. Negative and non-finite readings are
    /// rejected and leave the state untouched.
    pub fn accumulate(&mut self, power_watts: f64) -> Result<EnergyReading, GatewayError> {
        if !power_watts.is_finite() || power_watts < 0.0 {
            return Err(GatewayError::InvalidPower(power_watts));
        }
        self.cumulative_kwh += power_watts / 1000.0 / SAMPLES_PER_HOUR;
        Ok(self.reading())
    }

    pub fn reading(&self) -> EnergyReading {
        EnergyReading {
            cumulative_kwh: self.cumulative_kwh,
            estimated_bill: self.cumulative_kwh * self.tariff_per_kwh * BILLING_DAYS,
        }
    }
}

fn validate_tariff(tariff: f64) -> Result<(), GatewayError> {
    if tariff.is_finite() && tariff >= 0.0 {
        Ok(())
    } else {
        Err(GatewayError::InvalidTariff(tariff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_kilowatt_reading() {
        let mut energy = EnergyState::new(8.0).unwrap();
        let reading = energy.accumulate(1000.0).unwrap();
        assert!((reading.cumulative_kwh - 0.016_666_7).abs() < 1e-6);
        assert_eq!(reading.kwh_display(), "0.017");
    }

    #[test]
    fn test_bill_projection() {
        let mut energy = EnergyState::new(8.0).unwrap();
        // 60 kW for one assumed minute is exactly 1 kWh
        let reading = energy.accumulate(60_000.0).unwrap();
        assert_eq!(reading.cumulative_kwh, 1.0);
        assert_eq!(reading.estimated_bill, 240.0);
        assert_eq!(reading.bill_display(), "240.00");
    }

    #[test]
    fn test_monotonic_for_valid_readings() {
        let mut energy = EnergyState::new(5.5).unwrap();
        let mut previous = energy.cumulative_kwh();
        for watts in [0.0, 12.5, 3000.0, 0.0, 1.0e-9, 750.0] {
            let reading = energy.accumulate(watts).unwrap();
            assert!(reading.cumulative_kwh >= previous);
            previous = reading.cumulative_kwh;
        }
    }

    #[test]
    fn test_rejects_invalid_power() {
        let mut energy = EnergyState::new(8.0).unwrap();
        energy.accumulate(500.0).unwrap();
        let before = energy.clone();

        for watts in [f64::NAN, f64::INFINITY, -20.0] {
            assert!(energy.accumulate(watts).is_err());
        }
        assert_eq!(energy, before);
    }

    #[test]
    fn test_tariff_change_reprices_total() {
        let mut energy = EnergyState::new(8.0).unwrap();
        energy.accumulate(60_000.0).unwrap();
        let reading = energy.set_tariff(10.0).unwrap();
        assert_eq!(reading.estimated_bill, 300.0);

        assert!(energy.set_tariff(-1.0).is_err());
        assert!(EnergyState::new(f64::NAN).is_err());
        assert_eq!(energy.tariff_per_kwh(), 10.0);
    }
}
