//! Lambert conformal conic projection for WRF native grids
//!
//! Spherical earth of radius 6 370 km, as used by WRF. The grid centre
//! `(CEN_LAT, CEN_LON)` sits at the middle of the mass grid.

use crate::errors::{GalleryError, Result};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Earth radius assumed by WRF (m)
pub const WRF_EARTH_RADIUS: f64 = 6_370_000.0;

/// Lambert conformal conic grid description
#[derive(Debug, Clone, PartialEq)]
pub struct LambertConformal {
    pub truelat1: f64,
    pub truelat2: f64,
    pub stand_lon: f64,
    pub cen_lat: f64,
    pub cen_lon: f64,
    pub dx: f64,
    pub dy: f64,
    pub nx: usize,
    pub ny: usize,
    n: f64,
    f: f64,
    rho0: f64,
    centre: (f64, f64),
}

impl LambertConformal {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        truelat1: f64,
        truelat2: f64,
        stand_lon: f64,
        cen_lat: f64,
        cen_lon: f64,
        dx: f64,
        dy: f64,
        nx: usize,
        ny: usize,
    ) -> Result<Self> {
        if truelat1.abs() >= 90.0 || truelat2.abs() >= 90.0 || dx <= 0.0 || dy <= 0.0 {
            return Err(GalleryError::Generic(format!(
                "Invalid Lambert conformal parameters: truelat1={}, truelat2={}, dx={}, dy={}",
                truelat1, truelat2, dx, dy
            )));
        }
        let phi1 = truelat1.to_radians();
        let phi2 = truelat2.to_radians();

        let n = if (truelat1 - truelat2).abs() < 1e-10 {
            phi1.sin()
        } else {
            (phi1.cos() / phi2.cos()).ln()
                / ((FRAC_PI_4 + phi2 / 2.0).tan() / (FRAC_PI_4 + phi1 / 2.0).tan()).ln()
        };
        let f = phi1.cos() * (FRAC_PI_4 + phi1 / 2.0).tan().powf(n) / n;
        let rho0 = WRF_EARTH_RADIUS * f / (FRAC_PI_4 + cen_lat.to_radians() / 2.0).tan().powf(n);

        let mut proj = Self {
            truelat1,
            truelat2,
            stand_lon,
            cen_lat,
            cen_lon,
            dx,
            dy,
            nx,
            ny,
            n,
            f,
            rho0,
            centre: (0.0, 0.0),
        };
        proj.centre = proj.forward(cen_lat, cen_lon);
        Ok(proj)
    }

    /// Cone constant.
    pub fn cone(&self) -> f64 {
        self.n
    }

    /// Geographic (degrees) to projected metres, relative to the grid centre.
    pub fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        let rho = WRF_EARTH_RADIUS * self.f / (FRAC_PI_4 + lat.to_radians() / 2.0).tan().powf(self.n);
        let dlon = wrap_degrees(lon - self.stand_lon).to_radians();
        let theta = self.n * dlon;
        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();
        (x - self.centre.0, y - self.centre.1)
    }

    /// Projected metres (relative to the grid centre) to geographic degrees.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let x = x + self.centre.0;
        let y = y + self.centre.1;
        let sign = self.n.signum();
        let dy = self.rho0 - y;
        let rho = sign * (x * x + dy * dy).sqrt();
        let theta = (sign * x).atan2(sign * dy);
        let lat = if rho == 0.0 {
            sign * 90.0
        } else {
            (2.0 * (WRF_EARTH_RADIUS * self.f / rho).powf(1.0 / self.n).atan() - FRAC_PI_2).to_degrees()
        };
        let lon = wrap_degrees(self.stand_lon + (theta / self.n).to_degrees());
        (lat, lon)
    }

    /// Geographic degrees to fractional grid indices `(i, j)` (column, row).
    pub fn geo_to_grid(&self, lat: f64, lon: f64) -> (f64, f64) {
        let (x, y) = self.forward(lat, lon);
        (
            x / self.dx + (self.nx as f64 - 1.0) / 2.0,
            y / self.dy + (self.ny as f64 - 1.0) / 2.0,
        )
    }

    /// Fractional grid indices to geographic degrees.
    pub fn grid_to_geo(&self, i: f64, j: f64) -> (f64, f64) {
        let (x, y) = self.grid_to_xy(i, j);
        self.inverse(x, y)
    }

    /// Fractional grid indices to projected metres.
    pub fn grid_to_xy(&self, i: f64, j: f64) -> (f64, f64) {
        (
            (i - (self.nx as f64 - 1.0) / 2.0) * self.dx,
            (j - (self.ny as f64 - 1.0) / 2.0) * self.dy,
        )
    }

    /// Projected extent of the mass grid: `(x_min, x_max, y_min, y_max)`.
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.grid_to_xy(0.0, 0.0);
        let (x1, y1) = self.grid_to_xy(self.nx as f64 - 1.0, self.ny as f64 - 1.0);
        (x0, x1, y0, y1)
    }
}

/// Wraps an angle in degrees into `[-180, 180)`.
pub fn wrap_degrees(degrees: f64) -> f64 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}
