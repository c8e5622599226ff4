//! Tabular export of a marched field through polars.
//!
//! - points: x, y, mach, pressure, boundary, status, shock (one row per point)
//! - rays: x0, y0, x1, y1, family, mutual (one row per closed ray)
//!
//! Format follows the file extension: `.parquet`, anything else is CSV.

use anyhow::{Context, Result};
use moc::march::GeometryCluster;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub fn points_frame(gc: &GeometryCluster) -> PolarsResult<DataFrame> {
    let samples = gc.samples();
    DataFrame::new(vec![
        Series::new("x".into(), samples.iter().map(|s| s.x).collect::<Vec<f64>>()),
        Series::new("y".into(), samples.iter().map(|s| s.y).collect::<Vec<f64>>()),
        Series::new(
            "mach".into(),
            samples.iter().map(|s| s.mach).collect::<Vec<Option<f64>>>(),
        ),
        Series::new(
            "pressure".into(),
            samples
                .iter()
                .map(|s| s.static_pressure)
                .collect::<Vec<Option<f64>>>(),
        ),
        Series::new(
            "boundary".into(),
            samples
                .iter()
                .map(|s| s.boundary.as_str())
                .collect::<Vec<&str>>(),
        ),
        Series::new(
            "status".into(),
            samples.iter().map(|s| s.status.as_str()).collect::<Vec<&str>>(),
        ),
        Series::new("shock".into(), samples.iter().map(|s| s.shock).collect::<Vec<bool>>()),
    ])
}

pub fn rays_frame(gc: &GeometryCluster) -> PolarsResult<DataFrame> {
    let n = gc.dead_rays().len();
    let (mut x0, mut y0, mut x1, mut y1) = (
        Vec::with_capacity(n),
        Vec::with_capacity(n),
        Vec::with_capacity(n),
        Vec::with_capacity(n),
    );
    let mut family = Vec::with_capacity(n);
    let mut mutual = Vec::with_capacity(n);
    for ray in gc.dead_rays() {
        let a = gc.point(ray.origin()).position();
        let b = ray
            .end()
            .map(|e| gc.point(e).position())
            .unwrap_or(a);
        x0.push(a.x);
        y0.push(a.y);
        x1.push(b.x);
        y1.push(b.y);
        family.push(ray.family().as_str());
        mutual.push(ray.complement().is_some());
    }
    DataFrame::new(vec![
        Series::new("x0".into(), x0),
        Series::new("y0".into(), y0),
        Series::new("x1".into(), x1),
        Series::new("y1".into(), y1),
        Series::new("family".into(), family),
        Series::new("mutual".into(), mutual),
    ])
}

/// `<dir>/<stem>_rays.<ext>` next to `points`.
pub fn rays_path(points: &Path) -> PathBuf {
    let stem = points
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "field".to_string());
    let name = match points.extension() {
        Some(ext) => format!("{stem}_rays.{}", ext.to_string_lossy()),
        None => format!("{stem}_rays"),
    };
    points.with_file_name(name)
}

pub fn write_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let is_parquet = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        ParquetWriter::new(&mut file)
            .finish(df)
            .with_context(|| format!("writing {}", path.display()))?;
    } else {
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

/// Write both tables; returns the ray table path.
pub fn write_tables(gc: &GeometryCluster, points: &Path) -> Result<PathBuf> {
    let mut pts = points_frame(gc)?;
    write_frame(&mut pts, points)?;
    let rays = rays_path(points);
    let mut rdf = rays_frame(gc)?;
    write_frame(&mut rdf, &rays)?;
    tracing::info!(
        points = pts.height(),
        rays = rdf.height(),
        out = %points.display(),
        "tables_written"
    );
    Ok(rays)
}

#[cfg(test)]
mod tests {
    use super::*;
    use moc::jet::{seed_points, JetConfig};
    use moc::march::MarchCfg;

    fn small_cluster() -> GeometryCluster {
        let cfg = JetConfig::default();
        let mut gc = GeometryCluster::new(seed_points(&cfg).unwrap(), MarchCfg::default());
        gc.run(5).unwrap();
        gc
    }

    #[test]
    fn rays_path_keeps_extension() {
        assert_eq!(
            rays_path(Path::new("out/field.parquet")),
            Path::new("out/field_rays.parquet")
        );
        assert_eq!(rays_path(Path::new("field")), Path::new("field_rays"));
    }

    #[test]
    fn frames_have_one_row_per_item() {
        let gc = small_cluster();
        let pts = points_frame(&gc).unwrap();
        assert_eq!(pts.height(), gc.points().len());
        assert_eq!(pts.width(), 7);
        let rays = rays_frame(&gc).unwrap();
        assert_eq!(rays.height(), gc.dead_rays().len());
    }
}
