//! End-to-end checks over bzip2 fixtures written to a temp data directory.

use anyhow::Result;
use bzip2::write::BzEncoder;
use bzip2::Compression;
use fars_explorer::{
    build_filename, init_logging, read_table, FarsConfig, FarsData, FarsError, MapOutcome,
    MapSurface, StateMap,
};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

const ACCIDENTS_2013: &str = "STATE,ST_CASE,MONTH,YEAR,LONGITUD,LATITUDE\n\
                              1,10001,1,2013,-86.25,32.36\n\
                              1,10002,1,2013,-87.10,33.52\n\
                              1,10003,2,2013,-85.40,31.20\n\
                              6,60001,1,2013,-118.24,34.05\n\
                              6,60002,12,2013,999.99999999,99.99999999\n\
                              48,480001,7,2013,-97.74,30.27\n";

const ACCIDENTS_2014: &str = "STATE,ST_CASE,MONTH,YEAR,LONGITUD,LATITUDE\n\
                              1,10001,2,2014,-86.80,33.50\n\
                              2,20001,2,2014,999.99999999,99.99999999\n\
                              2,20002,3,2014,999.99999999,77.77777777\n\
                              6,60001,3,2014,-121.49,38.58\n";

#[derive(Default)]
struct RecordingSurface {
    drawn: Vec<(i64, i32, Vec<(f64, f64)>)>,
}

impl MapSurface for RecordingSurface {
    fn draw(&mut self, map: &StateMap<'_>) -> fars_explorer::Result<()> {
        self.drawn.push((map.state, map.year, map.points.to_vec()));
        Ok(())
    }
}

fn write_year(dir: &Path, year: i32, contents: &str) -> Result<()> {
    let file = File::create(dir.join(build_filename(year)))?;
    let mut encoder = BzEncoder::new(file, Compression::default());
    encoder.write_all(contents.as_bytes())?;
    encoder.finish()?;
    Ok(())
}

fn fixture() -> Result<(TempDir, FarsData)> {
    init_logging("warn");
    let dir = TempDir::new()?;
    write_year(dir.path(), 2013, ACCIDENTS_2013)?;
    write_year(dir.path(), 2014, ACCIDENTS_2014)?;
    let config = FarsConfig::default()
        .with_data_dir(dir.path())
        .with_output_dir(dir.path().join("maps"));
    Ok((dir, FarsData::new(config)))
}

#[test]
fn read_table_counts_data_rows() -> Result<()> {
    let (dir, _) = fixture()?;
    let df = read_table(dir.path().join("accident_2013.csv.bz2"))?;
    assert_eq!(df.height(), 6);
    Ok(())
}

#[test]
fn read_years_isolates_missing_year() -> Result<()> {
    let (_dir, fars) = fixture()?;

    let tables = fars.read_years(&[2013, 9999]);
    assert_eq!(tables.len(), 2);

    let first = &tables[0];
    assert_eq!(first.year(), 2013);
    let data = first.data().expect("2013 should load");
    assert_eq!(data.width(), 2);
    assert_eq!(data.height(), 6);
    assert!(first.warning().is_none());

    let second = &tables[1];
    assert_eq!(second.year(), 9999);
    assert!(second.data().is_none());

    let warnings: Vec<&str> = tables.iter().filter_map(|t| t.warning()).collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("9999"));
    Ok(())
}

#[test]
fn parallel_read_keeps_input_order() -> Result<()> {
    let (dir, _) = fixture()?;
    let fars = FarsData::new(FarsConfig::default().with_data_dir(dir.path()).with_parallel(true));

    let years = [2014, 9999, 2013, 2014];
    let tables = fars.read_years(&years);
    let order: Vec<i32> = tables.iter().map(|t| t.year()).collect();
    assert_eq!(order, years.to_vec());
    let loaded: Vec<bool> = tables.iter().map(|t| t.is_loaded()).collect();
    assert_eq!(loaded, vec![true, false, true, true]);
    Ok(())
}

#[test]
fn summarize_years_pivots_months_against_years() -> Result<()> {
    let (_dir, fars) = fixture()?;

    let summary = fars.summarize_years(&[2013, 2014, 9999])?;
    assert_eq!(summary.years(), &[2013, 2014]);
    assert_eq!(summary.months(), &[1, 2, 3, 7, 12]);
    assert_eq!(summary.count(1, 2013), Some(3));
    assert_eq!(summary.count(2, 2014), Some(2));
    assert_eq!(summary.count(1, 2014), None);
    assert_eq!(summary.frame().shape(), (5, 3));
    Ok(())
}

#[test]
fn map_state_draws_valid_points_only() -> Result<()> {
    let (_dir, fars) = fixture()?;
    let mut surface = RecordingSurface::default();

    let outcome = fars.map_state(6, 2013, &mut surface)?;
    assert_eq!(
        outcome,
        MapOutcome::Rendered {
            state: 6,
            year: 2013,
            points: 1
        }
    );
    assert_eq!(surface.drawn.len(), 1);
    assert_eq!(surface.drawn[0].2, vec![(-118.24, 34.05)]);
    Ok(())
}

#[test]
fn map_state_rejects_unknown_state() -> Result<()> {
    let (_dir, fars) = fixture()?;
    let mut surface = RecordingSurface::default();

    let err = fars.map_state(99, 2013, &mut surface).unwrap_err();
    assert!(matches!(err, FarsError::InvalidState { state: 99 }));
    assert!(err.to_string().contains("99"));
    assert!(surface.drawn.is_empty());
    Ok(())
}

#[test]
fn map_state_without_plottable_rows_skips_rendering() -> Result<()> {
    let (_dir, fars) = fixture()?;
    let mut surface = RecordingSurface::default();

    let outcome = fars.map_state(2, 2014, &mut surface)?;
    assert_eq!(outcome, MapOutcome::NoAccidents { state: 2, year: 2014 });
    assert!(surface.drawn.is_empty());
    Ok(())
}

#[test]
fn map_state_png_writes_image_file() -> Result<()> {
    let (dir, fars) = fixture()?;

    let (outcome, path) = fars.map_state_png(1, 2013)?;
    assert_eq!(
        outcome,
        MapOutcome::Rendered {
            state: 1,
            year: 2013,
            points: 3
        }
    );

    let path = path.expect("a rendered map has a file");
    assert_eq!(path, dir.path().join("maps").join("state_1_2013.png"));
    assert!(std::fs::metadata(&path)?.len() > 0);
    Ok(())
}

#[test]
fn map_state_png_without_boundaries_still_renders() -> Result<()> {
    let (dir, _) = fixture()?;
    let mut config = FarsConfig::default()
        .with_data_dir(dir.path())
        .with_output_dir(dir.path().join("plain"));
    config.map.draw_boundaries = false;
    let fars = FarsData::new(config);

    let (outcome, path) = fars.map_state_png(48, 2013)?;
    assert!(matches!(outcome, MapOutcome::Rendered { points: 1, .. }));
    assert!(std::fs::metadata(path.expect("rendered"))?.len() > 0);
    Ok(())
}

#[test]
fn map_state_png_skips_file_when_nothing_to_plot() -> Result<()> {
    let (dir, fars) = fixture()?;

    let (outcome, path) = fars.map_state_png(2, 2014)?;
    assert_eq!(outcome, MapOutcome::NoAccidents { state: 2, year: 2014 });
    assert!(path.is_none());
    assert!(!dir.path().join("maps").join("state_2_2014.png").exists());
    Ok(())
}

#[test]
fn map_state_propagates_missing_file() -> Result<()> {
    let (_dir, fars) = fixture()?;
    let mut surface = RecordingSurface::default();

    let err = fars.map_state(1, 2020, &mut surface).unwrap_err();
    match err {
        FarsError::FileNotFound { path } => {
            assert!(path.ends_with("accident_2020.csv.bz2"))
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}
