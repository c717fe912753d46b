use crate::constants::{JOULES_PER_KWH, KELVIN_OFFSET, STANDARD_GRAVITY};
use crate::error::ClimateResult;
use crate::models::field::Field;

/// Geopotential [m²/s²] to geopotential height [m]
pub fn geopotential_height(z: f64) -> f64 {
    z / STANDARD_GRAVITY
}

pub fn wind_speed(u: f64, v: f64) -> f64 {
    u.hypot(v)
}

pub fn kelvin_to_celsius(t: f64) -> f64 {
    t - KELVIN_OFFSET
}

/// accumulated energy [J/m²] to [kWh/m²]
pub fn joules_to_kwh(energy: f64) -> f64 {
    energy / JOULES_PER_KWH
}

/// Wind speed from the two wind components on identical axes
pub fn wind_speed_field(u: &Field, v: &Field) -> ClimateResult<Field> {
    u.zip_with(v, wind_speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::month_start;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, Array3};

    #[test]
    fn unit_conversions() {
        assert_abs_diff_eq!(geopotential_height(9.80665 * 5500.0), 5500.0, epsilon = 1e-9);
        assert_eq!(wind_speed(3.0, -4.0), 5.0);
        assert_abs_diff_eq!(kelvin_to_celsius(273.15), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(joules_to_kwh(7.2e6), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn wind_speed_on_a_field() {
        let time = Array1::from(vec![month_start(2000, 1).expect("valid")]);
        let lats = Array1::from(vec![50.0]);
        let lons = Array1::from(vec![10.0, 11.0]);
        let u = Field::new(time.clone(), lats.clone(), lons.clone(), Array3::from_elem((1, 1, 2), 6.0))
            .expect("valid");
        let v = Field::new(time, lats, lons, Array3::from_elem((1, 1, 2), 8.0)).expect("valid");
        let speed = wind_speed_field(&u, &v).expect("same axes");
        assert!(speed.values.iter().all(|s| *s == 10.0));

        let shifted = Field {
            lons: Array1::from(vec![12.0, 13.0]),
            ..v
        };
        assert!(wind_speed_field(&u, &shifted).is_err());
    }
}
