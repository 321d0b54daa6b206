//! Unit tests for the numerical core: regression, interpolation, contour
//! levels, colormaps, tick labels and projection.

use approx::assert_abs_diff_eq;
use ncl_gallery::{
    colormaps::Colormap,
    config::GalleryConfig,
    contouring::{contour_labels, contour_lines, format_level, level_bin, nice_levels, Extend},
    datafiles::{DataFiles, MXCLIM},
    errors::GalleryError,
    field::{Coordinate, GriddedField, Monotonic},
    gallery::{regress::brownlee_regression, Recipe},
    interpolation::{index_to_coordinate, linint1, linint2, linint2_points, GridInterpolator},
    parallel::ParallelConfig,
    projection::{wrap_degrees, LambertConformal},
    regression::{fit_linear, linspace, student_t_quantile, BandMethod, SamplePair},
    viz::{
        arange, build_chart, draw_frame, draw_line, font_px, lat_label, lon_label, minor_ticks, AxisSpec, Titles,
        Transform,
    },
};
use ndarray::{array, Array2};
use plotters::prelude::{BitMapBackend, IntoDrawingArea, BLUE};
use tempfile::tempdir;

#[test]
fn test_error_types() {
    let generic_err = GalleryError::Generic("Test error".to_string());
    assert_eq!(format!("{}", generic_err), "Test error");

    let var_err = GalleryError::VariableNotFound {
        var: "Q2".to_string(),
    };
    assert!(format!("{}", var_err).contains("Variable 'Q2' not found"));

    let dim_err = GalleryError::DimensionNotFound {
        var: "TEMP".to_string(),
        dim: "depth".to_string(),
    };
    assert!(format!("{}", dim_err).contains("Dimension 'depth' not found in variable 'TEMP'"));

    let io_err: GalleryError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(format!("{}", io_err).contains("I/O error"));
    assert!(std::error::Error::source(&io_err).is_some());
}

// ---------------------------------------------------------------------------
// Regression
// ---------------------------------------------------------------------------

#[test]
fn test_exact_line_fit() {
    let samples = SamplePair::new(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 3.0, 5.0, 7.0]).unwrap();
    let fit = fit_linear(&samples).unwrap();
    assert_abs_diff_eq!(fit.slope, 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(fit.intercept, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(fit.rss, 0.0, epsilon = 1e-20);
    assert_eq!(fit.degrees_of_freedom().unwrap(), 2);

    let grid = linspace(0.0, 3.0, 7);
    let band = fit
        .confidence_band(&samples, &grid, 0.05, BandMethod::Pointwise)
        .unwrap();
    assert_eq!(band.x, grid);
    for (fitted, &x) in band.fitted.iter().zip(&grid) {
        assert_abs_diff_eq!(*fitted, 2.0 * x + 1.0, epsilon = 1e-12);
    }
    for w in &band.half_width {
        assert_abs_diff_eq!(*w, 0.0, epsilon = 1e-9);
    }
    assert_eq!(band.lower(), band.upper());
}

#[test]
fn test_brownlee_fit_values() {
    let summary = brownlee_regression().unwrap();
    assert_eq!(summary.fit.n, 18);
    assert_abs_diff_eq!(summary.fit.slope, 0.974561, epsilon = 1e-5);
    assert_abs_diff_eq!(summary.fit.intercept, 15.3523, epsilon = 1e-3);
    assert_abs_diff_eq!(summary.fit.residual_std().unwrap(), 56.3870, epsilon = 1e-3);
    assert_abs_diff_eq!(summary.band.t_value, 1.745884, epsilon = 1e-3);

    assert_eq!(summary.grid.len(), 50);
    assert_eq!(summary.grid[0], 1190.0);
    assert_eq!(summary.grid[49], 3010.0);

    // The reference band has a constant width over the grid
    let first = summary.band.half_width[0];
    assert!(first > 0.0);
    assert!(summary.band.half_width.iter().all(|w| (w - first).abs() < 1e-12));
}

#[test]
fn test_pointwise_band_narrowest_at_mean() {
    let summary = brownlee_regression().unwrap();
    let x_mean = summary.samples.x.iter().sum::<f64>() / summary.samples.len() as f64;
    let grid = vec![1200.0, x_mean, 3000.0];
    let band = summary
        .fit
        .confidence_band(&summary.samples, &grid, 0.05, BandMethod::default())
        .unwrap();
    assert!(band.half_width[1] < band.half_width[0]);
    assert!(band.half_width[1] < band.half_width[2]);
}

#[test]
fn test_fit_errors() {
    let one = SamplePair::new(vec![1.0], vec![2.0]).unwrap();
    assert!(matches!(
        fit_linear(&one),
        Err(GalleryError::InsufficientSamples {
            required: 2,
            found: 1
        })
    ));

    let constant_x = SamplePair::new(vec![2.0, 2.0, 2.0], vec![1.0, 2.0, 3.0]).unwrap();
    assert!(matches!(fit_linear(&constant_x), Err(GalleryError::DegenerateFit(_))));

    assert!(matches!(
        SamplePair::new(vec![1.0, 2.0], vec![1.0]),
        Err(GalleryError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_non_finite_samples_rejected() {
    let nan_x = SamplePair::new(vec![0.0, f64::NAN, 2.0], vec![1.0, 2.0, 3.0]).unwrap();
    match fit_linear(&nan_x) {
        Err(GalleryError::DegenerateFit(message)) => assert!(message.contains("non-finite")),
        other => panic!("expected DegenerateFit, got {:?}", other.map(|f| f.slope)),
    }

    let nan_y = SamplePair::new(vec![0.0, 1.0, 2.0], vec![1.0, f64::NAN, 3.0]).unwrap();
    assert!(matches!(fit_linear(&nan_y), Err(GalleryError::DegenerateFit(_))));

    let inf_y = SamplePair::new(vec![0.0, 1.0, 2.0], vec![1.0, f64::INFINITY, 3.0]).unwrap();
    assert!(matches!(fit_linear(&inf_y), Err(GalleryError::DegenerateFit(_))));
}

#[test]
fn test_reference_band_degenerate_grids() {
    let samples = SamplePair::new(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 3.2, 4.9, 7.1]).unwrap();
    let fit = fit_linear(&samples).unwrap();

    // Grid mean equals the sample mean, so the deviation sum vanishes
    let centered = linspace(0.0, 3.0, 5);
    assert!(matches!(
        fit.confidence_band(&samples, &centered, 0.05, BandMethod::Reference),
        Err(GalleryError::DegenerateFit(_))
    ));

    assert!(matches!(
        fit.confidence_band(&samples, &[], 0.05, BandMethod::Reference),
        Err(GalleryError::DegenerateFit(_))
    ));

    // The pointwise band has no such restriction
    let band = fit
        .confidence_band(&samples, &centered, 0.05, BandMethod::Pointwise)
        .unwrap();
    assert_eq!(band.x.len(), 5);

    let shifted = linspace(4.0, 6.0, 3);
    let band = fit
        .confidence_band(&samples, &shifted, 0.05, BandMethod::Reference)
        .unwrap();
    assert!(band.half_width.iter().all(|w| w.is_finite() && *w > 0.0));
}

#[test]
fn test_two_samples_have_no_band() {
    let samples = SamplePair::new(vec![0.0, 1.0], vec![0.0, 2.0]).unwrap();
    let fit = fit_linear(&samples).unwrap();
    assert_abs_diff_eq!(fit.slope, 2.0, epsilon = 1e-12);
    assert!(fit.covariance.is_none());
    assert!(matches!(
        fit.confidence_band(&samples, &[0.5], 0.05, BandMethod::Pointwise),
        Err(GalleryError::InsufficientDegreesOfFreedom {
            samples: 2,
            parameters: 2
        })
    ));
}

#[test]
fn test_fit_scaling_and_order() {
    let x = vec![1.0, 2.0, 4.0, 5.0, 7.0];
    let y = vec![2.0, 2.5, 5.0, 4.5, 8.0];
    let base = fit_linear(&SamplePair::new(x.clone(), y.clone()).unwrap()).unwrap();

    let k = 3.0;
    let scaled = fit_linear(&SamplePair::new(x.clone(), y.iter().map(|v| v * k).collect()).unwrap()).unwrap();
    assert_abs_diff_eq!(scaled.slope, k * base.slope, epsilon = 1e-10);
    assert_abs_diff_eq!(scaled.intercept, k * base.intercept, epsilon = 1e-10);

    let negated = fit_linear(&SamplePair::new(x.clone(), y.iter().map(|v| -v).collect()).unwrap()).unwrap();
    let grid = linspace(1.0, 7.0, 4);
    let widths = |fit: &ncl_gallery::regression::LinearFit, ys: Vec<f64>| {
        fit.confidence_band(&SamplePair::new(x.clone(), ys).unwrap(), &grid, 0.05, BandMethod::Pointwise)
            .unwrap()
            .half_width
    };
    let base_w = widths(&base, y.clone());
    let scaled_w = widths(&scaled, y.iter().map(|v| v * k).collect());
    let negated_w = widths(&negated, y.iter().map(|v| -v).collect());
    for i in 0..grid.len() {
        assert_abs_diff_eq!(scaled_w[i], k * base_w[i], epsilon = 1e-9);
        assert_abs_diff_eq!(negated_w[i], base_w[i], epsilon = 1e-9);
    }

    let reversed = fit_linear(
        &SamplePair::new(x.iter().rev().cloned().collect(), y.iter().rev().cloned().collect()).unwrap(),
    )
    .unwrap();
    assert_abs_diff_eq!(reversed.slope, base.slope, epsilon = 1e-12);
    assert_abs_diff_eq!(reversed.intercept, base.intercept, epsilon = 1e-12);
}

#[test]
fn test_band_rejects_bad_alpha() {
    let samples = SamplePair::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.1, 1.9]).unwrap();
    let fit = fit_linear(&samples).unwrap();
    for alpha in [0.0, 1.0, -0.1, f64::NAN] {
        assert!(fit
            .confidence_band(&samples, &[1.0], alpha, BandMethod::Pointwise)
            .is_err());
    }
}

#[test]
fn test_student_t_quantile_and_linspace() {
    assert_abs_diff_eq!(student_t_quantile(0.975, 10.0).unwrap(), 2.228139, epsilon = 1e-3);
    assert_abs_diff_eq!(student_t_quantile(0.5, 5.0).unwrap(), 0.0, epsilon = 1e-6);

    assert!(linspace(0.0, 1.0, 0).is_empty());
    assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
    let values = linspace(-1.0, 1.0, 5);
    assert_eq!(values, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
}

// ---------------------------------------------------------------------------
// Coordinates and interpolation
// ---------------------------------------------------------------------------

fn grid_field(x: Vec<f64>, y: Vec<f64>, f: impl Fn(f64, f64) -> f64) -> GriddedField {
    let data = Array2::from_shape_fn((y.len(), x.len()), |(j, i)| f(x[i], y[j]));
    GriddedField::new("f", Coordinate::new("y", y), Coordinate::new("x", x), data).unwrap()
}

#[test]
fn test_coordinate_monotonic() {
    assert_eq!(
        Coordinate::new("lat", vec![-10.0, 0.0, 10.0]).monotonic().unwrap(),
        Monotonic::Increasing
    );
    assert_eq!(
        Coordinate::new("lev", vec![1000.0, 500.0, 10.0]).monotonic().unwrap(),
        Monotonic::Decreasing
    );
    assert!(Coordinate::new("bad", vec![0.0, 1.0, 1.0]).monotonic().is_err());
    assert!(Coordinate::new("short", vec![0.0]).monotonic().is_err());
    assert!(Coordinate::new("nan", vec![0.0, f64::NAN]).monotonic().is_err());
}

#[test]
fn test_field_shape_checked() {
    let result = GriddedField::new(
        "f",
        Coordinate::new("y", vec![0.0, 1.0]),
        Coordinate::new("x", vec![0.0, 1.0, 2.0]),
        Array2::zeros((3, 2)),
    );
    assert!(matches!(result, Err(GalleryError::ShapeMismatch { .. })));
}

#[test]
fn test_linint2_identity() {
    let field = grid_field(vec![0.0, 1.0, 3.0, 6.0], vec![-5.0, 0.0, 5.0], |x, y| x * x - y);
    let out = linint2(&field.x, &field.y, field.data.view(), false, &field.x.values, &field.y.values).unwrap();
    assert_eq!(out.dim(), field.data.dim());
    for (a, b) in out.iter().zip(field.data.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn test_linint2_linear_field_exact() {
    let field = grid_field(vec![0.0, 2.0, 3.0, 7.0], vec![0.0, 1.0, 4.0], |x, y| 2.0 * x + 3.0 * y - 1.0);
    let xo = vec![0.5, 1.7, 2.9, 6.1];
    let yo = vec![0.25, 2.0, 3.5];
    let out = linint2(&field.x, &field.y, field.data.view(), false, &xo, &yo).unwrap();
    for (j, &y) in yo.iter().enumerate() {
        for (i, &x) in xo.iter().enumerate() {
            assert_abs_diff_eq!(out[[j, i]], 2.0 * x + 3.0 * y - 1.0, epsilon = 1e-10);
        }
    }
}

#[test]
fn test_linint2_missing_and_out_of_range() {
    let mut field = grid_field(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 2.0], |x, y| x + y);
    field.data[[1, 1]] = f64::NAN;
    let interp = GridInterpolator::for_field(&field, false).unwrap();

    assert!(interp.sample(0.5, 0.5).is_nan());
    assert!(interp.sample(1.0, 1.0).is_nan());
    // Cell away from the missing point
    assert_abs_diff_eq!(interp.sample(2.5, 1.5), 4.0, epsilon = 1e-12);
    // On the row below the hole the missing point carries zero weight
    assert_abs_diff_eq!(interp.sample(1.5, 0.0), 1.5, epsilon = 1e-12);

    assert!(interp.sample(-0.1, 1.0).is_nan());
    assert!(interp.sample(1.0, 2.1).is_nan());
    assert!(interp.sample(f64::NAN, 1.0).is_nan());
}

#[test]
fn test_linint2_descending_coordinates() {
    let ascending = grid_field(vec![0.0, 1.0, 2.0], vec![10.0, 20.0, 30.0], |x, y| x * y);
    let descending = grid_field(vec![2.0, 1.0, 0.0], vec![30.0, 20.0, 10.0], |x, y| x * y);
    let xo = vec![0.25, 1.5];
    let yo = vec![12.0, 27.5];
    let a = linint2(&ascending.x, &ascending.y, ascending.data.view(), false, &xo, &yo).unwrap();
    let d = linint2(&descending.x, &descending.y, descending.data.view(), false, &xo, &yo).unwrap();
    for (u, v) in a.iter().zip(d.iter()) {
        assert_abs_diff_eq!(*u, *v, epsilon = 1e-12);
    }
}

#[test]
fn test_linint2_cyclic_wrap() {
    let field = grid_field(vec![0.0, 90.0, 180.0, 270.0], vec![0.0, 1.0], |x, _| x / 90.0);
    let cyclic = GridInterpolator::for_field(&field, true).unwrap();
    let plain = GridInterpolator::for_field(&field, false).unwrap();

    assert_abs_diff_eq!(cyclic.sample(315.0, 0.5), 1.5, epsilon = 1e-12);
    assert_abs_diff_eq!(cyclic.sample(-45.0, 0.5), 1.5, epsilon = 1e-12);
    assert_abs_diff_eq!(cyclic.sample(450.0, 0.0), 1.0, epsilon = 1e-12);
    assert!(plain.sample(315.0, 0.5).is_nan());
}

#[test]
fn test_linint2_points_and_linint1() {
    let field = grid_field(vec![0.0, 1.0, 2.0], vec![0.0, 1.0], |x, y| 10.0 * x + y);
    let values = linint2_points(&field.x, &field.y, field.data.view(), false, &[0.5, 1.5], &[0.5, 1.0]).unwrap();
    assert_abs_diff_eq!(values[0], 5.5, epsilon = 1e-12);
    assert_abs_diff_eq!(values[1], 16.0, epsilon = 1e-12);
    assert!(linint2_points(&field.x, &field.y, field.data.view(), false, &[0.5], &[]).is_err());

    let xi = Coordinate::new("lev", vec![1000.0, 500.0, 100.0]);
    let out = linint1(&xi, &[0.0, 5.0, 9.0], &[750.0, 100.0, 50.0]).unwrap();
    assert_abs_diff_eq!(out[0], 2.5, epsilon = 1e-12);
    assert_abs_diff_eq!(out[1], 9.0, epsilon = 1e-12);
    assert!(out[2].is_nan());
}

#[test]
fn test_index_to_coordinate() {
    let values = [1000.0, 850.0, 700.0, 500.0];
    assert_abs_diff_eq!(index_to_coordinate(&values, 0.0), 1000.0);
    assert_abs_diff_eq!(index_to_coordinate(&values, 2.5), 600.0);
    assert_abs_diff_eq!(index_to_coordinate(&values, -0.5), 1075.0);
    assert_abs_diff_eq!(index_to_coordinate(&values, 3.5), 400.0);
}

// ---------------------------------------------------------------------------
// Contouring and colormaps
// ---------------------------------------------------------------------------

#[test]
fn test_nice_levels() {
    let levels = nice_levels(-30.0, 30.0, 16).unwrap();
    assert_eq!(levels.len(), 13);
    assert_abs_diff_eq!(levels[0], -30.0);
    assert_abs_diff_eq!(levels[12], 30.0);
    assert_abs_diff_eq!(levels[1] - levels[0], 5.0, epsilon = 1e-12);

    let small = nice_levels(0.0012, 0.0187, 16).unwrap();
    assert!(small.len() - 1 <= 16);
    assert!(small[0] <= 0.0012 && *small.last().unwrap() >= 0.0187);

    assert_eq!(nice_levels(4.0, 4.0, 10).unwrap(), vec![4.0]);
    assert!(nice_levels(0.0, f64::NAN, 10).is_err());
    assert!(nice_levels(0.0, 1.0, 0).is_err());
}

#[test]
fn test_level_bins() {
    let levels = [0.0, 10.0, 20.0];
    assert_eq!(level_bin(-5.0, &levels, Extend::Both), Some(0));
    assert_eq!(level_bin(0.0, &levels, Extend::Both), Some(1));
    assert_eq!(level_bin(15.0, &levels, Extend::Both), Some(2));
    assert_eq!(level_bin(25.0, &levels, Extend::Both), Some(3));

    assert_eq!(level_bin(-5.0, &levels, Extend::Neither), None);
    assert_eq!(level_bin(0.0, &levels, Extend::Neither), Some(0));
    assert_eq!(level_bin(10.0, &levels, Extend::Neither), Some(1));
    assert_eq!(level_bin(20.0, &levels, Extend::Neither), Some(1));
    assert_eq!(level_bin(25.0, &levels, Extend::Neither), None);
    assert_eq!(level_bin(f64::NAN, &levels, Extend::Both), None);

    assert_eq!(Extend::Both.band_count(23), 24);
    assert_eq!(Extend::Neither.band_count(13), 12);
}

#[test]
fn test_contour_lines_follow_level() {
    let field = grid_field(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 10.0, 20.0, 30.0], |x, _| x);
    let lines = contour_lines(&field, &[1.5]).unwrap();
    assert!(!lines.is_empty());
    for line in &lines {
        assert_eq!(line.level, 1.5);
        for &(x, y) in &line.points {
            assert_abs_diff_eq!(x, 1.5, epsilon = 1e-9);
            assert!((0.0..=30.0).contains(&y));
        }
    }

    let labels = contour_labels(&lines, 2);
    assert_eq!(labels.len(), lines.len());
    assert_eq!(labels[0].text, "1");

    let thin = grid_field(vec![0.0, 1.0, 2.0], vec![0.0], |x, _| x);
    assert!(matches!(
        contour_lines(&thin, &[1.0]),
        Err(GalleryError::InvalidSelection { .. })
    ));
}

#[test]
fn test_format_level_truncates() {
    assert_eq!(format_level(-12.5), "-12");
    assert_eq!(format_level(45.0), "45");
    assert_eq!(format_level(0.4), "0");
}

#[test]
fn test_colormap_ends() {
    let jet = Colormap::jet();
    assert_eq!(jet.sample(0.0), plotters::style::RGBColor(0, 0, 128));
    assert_eq!(jet.sample(1.0), plotters::style::RGBColor(128, 0, 0));
    assert_eq!(jet.sample(-3.0), jet.sample(0.0));
    assert_eq!(jet.sample(7.0), jet.sample(1.0));

    let blwhre = Colormap::by_name("BlWhRe").unwrap();
    let colors = blwhre.discrete(24);
    assert_eq!(colors.len(), 24);
    assert_eq!(colors[0], blwhre.sample(0.0));
    assert_eq!(colors[23], blwhre.sample(1.0));
    assert_eq!(blwhre.discrete(1), vec![blwhre.sample(0.5)]);

    assert!(Colormap::by_name("MAGMA").is_some());
    assert!(Colormap::by_name("viridis").is_none());
}

#[test]
fn test_custom_colormap_anchors() {
    assert!(matches!(Colormap::new("empty", Vec::new()), Err(GalleryError::Generic(_))));

    let single = Colormap::new("grey", vec![(90, 90, 90)]).unwrap();
    assert_eq!(single.sample(0.0), plotters::style::RGBColor(90, 90, 90));
    assert_eq!(single.sample(1.0), plotters::style::RGBColor(90, 90, 90));
    assert_eq!(single.discrete(3).len(), 3);

    let ramp = Colormap::new("ramp", vec![(0, 0, 0), (200, 100, 50)]).unwrap();
    assert_eq!(ramp.sample(0.5), plotters::style::RGBColor(100, 50, 25));
}

// ---------------------------------------------------------------------------
// Axes and ticks
// ---------------------------------------------------------------------------

#[test]
fn test_tick_labels() {
    assert_eq!(lat_label(-60.0, false), "60S");
    assert_eq!(lat_label(0.0, false), "0");
    assert_eq!(lat_label(30.0, false), "30N");
    assert_eq!(lon_label(-120.0, false), "120W");
    assert_eq!(lon_label(0.0, false), "0");
    assert_eq!(lon_label(0.0, true), "0E");
    assert_eq!(lon_label(60.0, false), "60E");
    assert_eq!(lon_label(180.0, false), "180");
    assert_eq!(lon_label(-180.0, false), "180");
    assert_eq!(lon_label(270.0, false), "90W");
}

#[test]
fn test_arange_and_minor_ticks() {
    assert_eq!(arange(900.0, 3001.0, 300.0).len(), 8);
    assert_eq!(arange(-105.0, -80.0, 5.0), vec![-105.0, -100.0, -95.0, -90.0, -85.0]);
    assert!(arange(1.0, 0.0, 1.0).is_empty());

    let minor = minor_ticks(&[0.0, 4.0, 8.0], 4, 0.0, 8.0);
    assert!(minor.contains(&1.0));
    assert!(minor.contains(&7.0));
    assert!(!minor.contains(&4.0));

    assert_eq!(font_px(72.0, 100), 100);
}

#[test]
fn test_log_axis_transform() {
    let axis = AxisSpec::new(1000.0, 10.0, vec![1000.0, 100.0, 10.0]).with_transform(Transform::NegLog10);
    let (lo, hi) = axis.plot_range();
    assert!(lo < hi);
    assert_abs_diff_eq!(axis.to_plot(100.0), -2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(axis.from_plot(axis.to_plot(250.0)), 250.0, epsilon = 1e-9);
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

fn wrf_like() -> LambertConformal {
    LambertConformal::new(30.0, 60.0, -98.0, 27.0, -95.0, 30_000.0, 30_000.0, 60, 50).unwrap()
}

#[test]
fn test_projection_centre_and_round_trip() {
    let proj = wrf_like();
    let (x, y) = proj.forward(27.0, -95.0);
    assert_abs_diff_eq!(x, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(y, 0.0, epsilon = 1e-6);

    let (i, j) = proj.geo_to_grid(27.0, -95.0);
    assert_abs_diff_eq!(i, 29.5, epsilon = 1e-9);
    assert_abs_diff_eq!(j, 24.5, epsilon = 1e-9);

    for &(lat, lon) in &[(20.0, -105.0), (35.0, -80.0), (27.0, -98.0), (15.5, -120.25)] {
        let (x, y) = proj.forward(lat, lon);
        let (lat2, lon2) = proj.inverse(x, y);
        assert_abs_diff_eq!(lat2, lat, epsilon = 1e-8);
        assert_abs_diff_eq!(lon2, lon, epsilon = 1e-8);
    }

    let (lat, lon) = proj.grid_to_geo(10.0, 40.0);
    let (i, j) = proj.geo_to_grid(lat, lon);
    assert_abs_diff_eq!(i, 10.0, epsilon = 1e-6);
    assert_abs_diff_eq!(j, 40.0, epsilon = 1e-6);

    let (x_min, x_max, y_min, y_max) = proj.extent();
    assert_abs_diff_eq!(x_max - x_min, 59.0 * 30_000.0, epsilon = 1e-6);
    assert_abs_diff_eq!(y_max - y_min, 49.0 * 30_000.0, epsilon = 1e-6);
}

#[test]
fn test_projection_tangent_and_invalid() {
    let tangent = LambertConformal::new(45.0, 45.0, 10.0, 45.0, 10.0, 1000.0, 1000.0, 3, 3).unwrap();
    assert_abs_diff_eq!(tangent.cone(), 45f64.to_radians().sin(), epsilon = 1e-12);

    assert!(LambertConformal::new(90.0, 60.0, 0.0, 45.0, 0.0, 1000.0, 1000.0, 3, 3).is_err());
    assert!(LambertConformal::new(30.0, 60.0, 0.0, 45.0, 0.0, 0.0, 1000.0, 3, 3).is_err());

    assert_abs_diff_eq!(wrap_degrees(190.0), -170.0);
    assert_abs_diff_eq!(wrap_degrees(-180.0), -180.0);
    assert_abs_diff_eq!(wrap_degrees(540.0), -180.0);
}

// ---------------------------------------------------------------------------
// Configuration and lookup
// ---------------------------------------------------------------------------

#[test]
fn test_parallel_config() {
    let default_config = ParallelConfig::default();
    assert!(default_config.num_threads.is_none());
    assert!(default_config.setup_global_pool().is_ok());
    assert!(default_config.current_threads() > 0);

    assert_eq!(ParallelConfig::with_threads(4).num_threads, Some(4));
    assert!(ParallelConfig::all_cores().num_threads.unwrap() > 0);

    assert!(matches!(
        ParallelConfig::with_threads(0).setup_global_pool(),
        Err(GalleryError::ThreadPoolError(_))
    ));
}

#[test]
fn test_gallery_config() {
    let config = GalleryConfig::default();
    assert_eq!(config.dpi, 100);
    assert_eq!(config.data_dir, std::path::PathBuf::from("data"));

    let config = GalleryConfig::new("in", "out").with_dpi(300);
    assert_eq!(config.dpi, 300);
    assert_eq!(config.output_path("linint2.png"), std::path::PathBuf::from("out/linint2.png"));
}

#[test]
fn test_data_file_not_found() {
    let dir = tempdir().unwrap();
    let files = DataFiles::new(dir.path());
    assert_eq!(files.candidates(MXCLIM).len(), 2);
    assert_eq!(files.candidates("flat.nc").len(), 1);

    match files.get(MXCLIM) {
        Err(GalleryError::DataFileNotFound { name, tried }) => {
            assert_eq!(name, MXCLIM);
            assert_eq!(tried[0], dir.path().join(MXCLIM));
            assert_eq!(tried[1], dir.path().join("mxclim.nc"));
        }
        other => panic!("expected DataFileNotFound, got {:?}", other.map(|_| ())),
    }

    // A flat copy next to the root is found through the basename
    std::fs::write(dir.path().join("mxclim.nc"), b"").unwrap();
    assert_eq!(files.get(MXCLIM).unwrap(), dir.path().join("mxclim.nc"));
}

#[test]
fn test_recipe_names() {
    let names: Vec<&str> = Recipe::all().iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["regress_1a", "h_lat_6", "dataonmap_10", "linint2"]);
    assert_eq!(Recipe::from_name("H-LAT_6").unwrap(), Recipe::HLat6);
    assert_eq!(Recipe::from_name("linint2").unwrap().to_string(), "linint2");
    assert!(Recipe::from_name("xy_1").is_err());
}

#[test]
fn test_field_summary_helpers() {
    let mut field = GriddedField::new(
        "f",
        Coordinate::new("y", vec![0.0, 1.0]),
        Coordinate::new("x", vec![0.0, 1.0]),
        array![[1.0, -2.0], [f64::NAN, 5.0]],
    )
    .unwrap();
    assert_eq!(field.value_range(), Some((-2.0, 5.0)));
    assert_eq!(field.missing_count(), 1);
    assert_eq!(field.display_name(), "f");
    field.long_name = Some("Forcing".to_string());
    assert_eq!(field.display_name(), "Forcing");
}

#[test]
fn test_chart_renders_into_buffer() {
    let (width, height) = (320u32, 240u32);
    let mut buffer = vec![255u8; (width * height * 3) as usize];
    {
        let area = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        let x = AxisSpec::new(0.0, 10.0, vec![0.0, 5.0, 10.0]).with_minor_per_major(4);
        let y = AxisSpec::new(1000.0, 100.0, vec![1000.0, 500.0, 100.0]).with_transform(Transform::NegLog10);
        let titles = Titles::main("Frame").with_axis_labels("x", "hPa");

        let mut chart = build_chart(&area, &x, &y, &titles, 72).unwrap();
        draw_frame(&mut chart, &x, &y).unwrap();
        draw_line(&mut chart, &x, &y, &[0.0, 10.0], &[900.0, 200.0], BLUE, 2).unwrap();
        area.present().unwrap();
    }
    // Frame in black, data line in blue
    assert!(buffer.chunks(3).any(|px| px.iter().all(|&c| c < 40)));
    assert!(buffer.chunks(3).any(|px| px[2] > 200 && px[0] < 60 && px[1] < 60));
}
