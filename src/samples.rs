//! Synthetic stand-ins for the bundled reference datasets
//!
//! Each writer produces a small NetCDF file with the same variable names,
//! dimension order and attributes the recipes read from the real files.

use crate::datafiles::{DataFiles, MXCLIM, SST, WRFOUT};
use crate::errors::Result;
use crate::projection::LambertConformal;
use ndarray::{Array1, Array3, Array4};
use netcdf::create;
use std::f64::consts::PI;
use std::{fs, path::Path, path::PathBuf};

/// Fill value used by the synthetic SST file
pub const SST_FILL: f32 = -1.0e20;

fn prepare(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Zonal-mean zonal wind `U(time, lev, lat)` on pressure levels.
pub fn write_mxclim(path: &Path) -> Result<()> {
    prepare(path)?;
    let mut file = create(path)?;
    file.add_attribute("title", "Synthetic zonal mean climatology")?;

    let lev: Vec<f64> = vec![
        1000.0, 850.0, 700.0, 500.0, 400.0, 300.0, 250.0, 200.0, 150.0, 100.0, 70.0, 50.0, 30.0, 20.0,
        10.0,
    ];
    let lat: Vec<f64> = (0..49).map(|i| -90.0 + 3.75 * i as f64).collect();

    file.add_dimension("time", 1)?;
    file.add_dimension("lev", lev.len())?;
    file.add_dimension("lat", lat.len())?;

    {
        let mut var = file.add_variable::<f64>("lev", &["lev"])?;
        var.put_attribute("units", "hPa")?;
        var.put_attribute("long_name", "pressure level")?;
        var.put(Array1::from(lev.clone()).view(), ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("lat", &["lat"])?;
        var.put_attribute("units", "degrees_north")?;
        var.put(Array1::from(lat.clone()).view(), ..)?;
    }
    {
        let mut u = Array3::<f32>::zeros((1, lev.len(), lat.len()));
        for (k, &p) in lev.iter().enumerate() {
            // Jets peak near 200 hPa at 30-45 degrees, easterlies in the tropics
            let height = (1000.0f64 / p).ln() / (1000.0f64 / 10.0).ln();
            for (j, &phi) in lat.iter().enumerate() {
                let north = (-((phi - 35.0) / 12.0).powi(2)).exp();
                let south = (-((phi + 40.0) / 12.0).powi(2)).exp();
                let jet = 45.0 * north * (PI * height).sin() + 50.0 * south * (PI * height * 0.9).sin();
                let easterly = -12.0 * (-(phi / 15.0).powi(2)).exp() * height;
                u[[0, k, j]] = (jet + easterly) as f32;
            }
        }
        let mut var = file.add_variable::<f32>("U", &["time", "lev", "lat"])?;
        var.put_attribute("units", "m/s")?;
        var.put_attribute("long_name", "Zonal Wind")?;
        var.put(u.view(), ..)?;
    }
    Ok(())
}

/// Sea surface temperature `TEMP(time, depth, lat, lon)` with `LAT`/`LON`
/// coordinates and land masked by `_FillValue`.
pub fn write_sst(path: &Path) -> Result<()> {
    prepare(path)?;
    let mut file = create(path)?;
    file.add_attribute("title", "Synthetic sea surface temperature")?;

    let lat: Vec<f64> = (0..31).map(|i| -60.0 + 4.0 * i as f64).collect();
    let lon: Vec<f64> = (0..72).map(|i| -180.0 + 5.0 * i as f64).collect();

    file.add_dimension("time", 1)?;
    file.add_dimension("depth", 1)?;
    file.add_dimension("lat", lat.len())?;
    file.add_dimension("lon", lon.len())?;

    {
        let mut var = file.add_variable::<f64>("LAT", &["lat"])?;
        var.put_attribute("units", "degrees_north")?;
        var.put(Array1::from(lat.clone()).view(), ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("LON", &["lon"])?;
        var.put_attribute("units", "degrees_east")?;
        var.put(Array1::from(lon.clone()).view(), ..)?;
    }
    {
        let mut temp = Array4::<f32>::zeros((1, 1, lat.len(), lon.len()));
        for (j, &phi) in lat.iter().enumerate() {
            for (i, &lambda) in lon.iter().enumerate() {
                let land = (phi > 10.0 && phi < 50.0 && lambda > -110.0 && lambda < -80.0)
                    || (phi > -30.0 && phi < 30.0 && lambda > 15.0 && lambda < 35.0);
                temp[[0, 0, j, i]] = if land {
                    SST_FILL
                } else {
                    let base = 29.0 * phi.to_radians().cos().powi(2) - 1.5;
                    (base + 2.0 * (2.0 * lambda.to_radians()).sin()) as f32
                };
            }
        }
        let mut var = file.add_variable::<f32>("TEMP", &["time", "depth", "lat", "lon"])?;
        var.put_attribute("units", "degC")?;
        var.put_attribute("long_name", "Sea Surface Temperature")?;
        var.put_attribute("_FillValue", SST_FILL)?;
        var.put(temp.view(), ..)?;
    }
    Ok(())
}

/// WRF-style output with `Q2(Time, south_north, west_east)`, `XLAT`, `XLONG`
/// and the Lambert conformal global attributes.
pub fn write_wrfout(path: &Path) -> Result<()> {
    prepare(path)?;
    let (nx, ny) = (60usize, 50usize);
    let proj = LambertConformal::new(30.0, 60.0, -98.0, 27.0, -95.0, 30_000.0, 30_000.0, nx, ny)?;

    let mut file = create(path)?;
    file.add_attribute("TITLE", "Synthetic WRF output")?;
    file.add_attribute("MAP_PROJ", 1i32)?;
    file.add_attribute("TRUELAT1", proj.truelat1 as f32)?;
    file.add_attribute("TRUELAT2", proj.truelat2 as f32)?;
    file.add_attribute("STAND_LON", proj.stand_lon as f32)?;
    file.add_attribute("CEN_LAT", proj.cen_lat as f32)?;
    file.add_attribute("CEN_LON", proj.cen_lon as f32)?;
    file.add_attribute("DX", proj.dx as f32)?;
    file.add_attribute("DY", proj.dy as f32)?;

    file.add_dimension("Time", 1)?;
    file.add_dimension("south_north", ny)?;
    file.add_dimension("west_east", nx)?;

    let mut xlat = Array3::<f32>::zeros((1, ny, nx));
    let mut xlong = Array3::<f32>::zeros((1, ny, nx));
    let mut q2 = Array3::<f32>::zeros((1, ny, nx));
    for j in 0..ny {
        for i in 0..nx {
            let (lat, lon) = proj.grid_to_geo(i as f64, j as f64);
            xlat[[0, j, i]] = lat as f32;
            xlong[[0, j, i]] = lon as f32;
            // Moist Gulf air decreasing inland and northward
            let gulf = (-((lat - 24.0) / 6.0).powi(2) - ((lon + 92.0) / 10.0).powi(2)).exp();
            q2[[0, j, i]] = (0.013 + 0.006 * gulf + 0.002 * ((lon + 100.0) / 8.0).cos()) as f32;
        }
    }

    for (name, values, units, description) in [
        ("XLAT", &xlat, "degree_north", "LATITUDE, SOUTH IS NEGATIVE"),
        ("XLONG", &xlong, "degree_east", "LONGITUDE, WEST IS NEGATIVE"),
        ("Q2", &q2, "kg kg-1", "QV at 2 M"),
    ] {
        let mut var = file.add_variable::<f32>(name, &["Time", "south_north", "west_east"])?;
        var.put_attribute("units", units)?;
        var.put_attribute("description", description)?;
        var.put(values.view(), ..)?;
    }
    Ok(())
}

/// Writes all synthetic datasets under the data directory.
pub fn write_all(data_files: &DataFiles) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (name, writer) in [
        (MXCLIM, write_mxclim as fn(&Path) -> Result<()>),
        (SST, write_sst),
        (WRFOUT, write_wrfout),
    ] {
        let path = data_files.target_path(name);
        writer(&path)?;
        println!("✅ Wrote sample dataset {}", path.display());
        written.push(path);
    }
    Ok(written)
}
