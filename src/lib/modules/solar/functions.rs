use chrono::{DateTime, Datelike, Timelike, Utc};
use log::debug;
use ndarray::{Array1, Array2, Zip};

use crate::constants::{DAYS_IN_YEAR, DEGREES_PER_HOUR, EQUINOX_DAY, MAX_DECLINATION};
use crate::error::{ClimateError, ClimateResult, Stage};

use super::models::{ElevationTable, SolarSite};

/// Solar declination [°] for a day of the year
pub fn declination_deg(day_of_year: f64) -> f64 {
    MAX_DECLINATION * (360.0 / DAYS_IN_YEAR * (day_of_year - EQUINOX_DAY)).to_radians().sin()
}

/// (lat, lon) of the point where the sun stands at the zenith
pub fn subsolar_point(time: &DateTime<Utc>) -> (f64, f64) {
    let hours = time.hour() as f64 + time.minute() as f64 / 60.0;
    let lat = declination_deg(time.ordinal() as f64);
    let lon = 180.0 - hours / 24.0 * 360.0;
    (lat, lon)
}

/// Angular distance of the sun from local solar noon [°]
pub fn hour_angle_deg(utc_hours: f64, lon: f64) -> f64 {
    let solar_hour = utc_hours + lon / DEGREES_PER_HOUR;
    DEGREES_PER_HOUR * (solar_hour - 12.0)
}

/// Solar elevation [°]; negative below the horizon
pub fn elevation_deg(lat: f64, declination: f64, hour_angle: f64) -> f64 {
    let (lat, decl, h) = (
        lat.to_radians(),
        declination.to_radians(),
        hour_angle.to_radians(),
    );
    let sin_elev = lat.sin() * decl.sin() + lat.cos() * decl.cos() * h.cos();
    sin_elev.clamp(-1.0, 1.0).asin().to_degrees()
}

/// Astronomical day length [h] from the sunset hour angle
pub fn daylight_hours(lat: f64, day_of_year: f64) -> f64 {
    let decl = declination_deg(day_of_year).to_radians();
    let cos_sunset = -lat.to_radians().tan() * decl.tan();
    if cos_sunset >= 1.0 {
        // polar night
        0.0
    } else if cos_sunset <= -1.0 {
        24.0
    } else {
        2.0 * cos_sunset.acos().to_degrees() / DEGREES_PER_HOUR
    }
}

/// Elevation of the sun over a full year of local clock times,
/// sampled every `minutes_step` minutes
pub fn elevation_table(site: &SolarSite, minutes_step: u32) -> ClimateResult<ElevationTable> {
    if minutes_step == 0 || minutes_step > 24 * 60 {
        return Err(ClimateError::new(
            Stage::Config,
            format!("time step must be between 1 and 1440 minutes, got {minutes_step}"),
        ));
    }
    let n_steps = (24 * 60 / minutes_step) as usize;
    let local_hours: Array1<f64> = (0..n_steps)
        .map(|k| (k as u32 * minutes_step) as f64 / 60.0)
        .collect();
    let days: Array1<u32> = (1..=DAYS_IN_YEAR as u32).collect();
    let declinations = days.mapv(|d| declination_deg(d as f64));

    let mut values = Array2::<f64>::zeros((local_hours.len(), days.len()));
    Zip::indexed(&mut values).par_for_each(|(k, d), value| {
        let utc_hours = local_hours[k] - site.utc_offset as f64;
        let h = hour_angle_deg(utc_hours, site.lon);
        let elevation = elevation_deg(site.lat, declinations[d], h);
        *value = if elevation < 0.0 { f64::NAN } else { elevation };
    });
    debug!(
        "elevation table for {}: {}x{}",
        site.name,
        local_hours.len(),
        days.len()
    );

    Ok(ElevationTable {
        site: site.clone(),
        local_hours,
        days,
        values,
    })
}
