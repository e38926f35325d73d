//! Chart export.
//!
//! Renders the dashboard charts to PNG files: a fit-ratio pie and a
//! top-skills bar chart, using the same palette the dashboard view shows.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::prelude::*;

use crate::dashboard::{total_fit_count, FitSlice};
use crate::types::SkillCount;

const FIT_CHART_FILE: &str = "fit_ratio.png";
const SKILLS_CHART_FILE: &str = "top_skills.png";

const BAR_COLOR: RGBColor = RGBColor(0xFF, 0x8C, 0x00);

/// Write both charts into `out_dir`, returning their paths.
pub fn export_charts(
    out_dir: &Path,
    slices: &[FitSlice],
    top_skills: &[SkillCount],
) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let fit_path = out_dir.join(FIT_CHART_FILE);
    let skills_path = out_dir.join(SKILLS_CHART_FILE);
    write_fit_pie(&fit_path, slices)?;
    write_skills_bar(&skills_path, top_skills)?;
    Ok((fit_path, skills_path))
}

pub fn write_fit_pie(output_path: &Path, slices: &[FitSlice]) -> Result<()> {
    let total = total_fit_count(slices);
    if total == 0 {
        return Ok(());
    }

    let root = BitMapBackend::new(output_path, (400, 350)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Fit vs Not Fit", ("sans-serif", 24))?;

    let sizes: Vec<f64> = slices.iter().map(|s| s.value as f64).collect();
    let colors: Vec<RGBColor> = slices
        .iter()
        .map(|s| {
            let (r, g, b) = s.color.rgb();
            RGBColor(r, g, b)
        })
        .collect();
    let labels: Vec<String> = slices
        .iter()
        .map(|s| format!("{} ({:.0}%)", s.name, s.percent_of(total)))
        .collect();

    let center = (200, 160);
    let radius = 110.0;
    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 14).into_font());
    root.draw(&pie)?;
    root.present()?;
    Ok(())
}

pub fn write_skills_bar(output_path: &Path, top_skills: &[SkillCount]) -> Result<()> {
    if top_skills.is_empty() {
        return Ok(());
    }
    let max_count = top_skills.iter().map(|s| s.count).max().unwrap_or(0) as f64;

    let root = BitMapBackend::new(output_path, (900, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Top Extracted Skills", ("sans-serif", 24))
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..top_skills.len() as f64, 0f64..(max_count * 1.1).max(1.0))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(top_skills.len())
        .x_label_formatter(&|x| {
            let idx = (*x).floor() as usize;
            top_skills.get(idx).map(|s| s.skill.clone()).unwrap_or_default()
        })
        .x_desc("Skills")
        .y_desc("Count")
        .draw()?;

    for (idx, entry) in top_skills.iter().enumerate() {
        let idx_f = idx as f64;
        let rect = Rectangle::new(
            [(idx_f + 0.1, 0.0), (idx_f + 0.9, entry.count as f64)],
            BAR_COLOR.filled(),
        );
        chart.draw_series(std::iter::once(rect))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{shape_fit_distribution, PaletteColor};
    use crate::types::DashboardSummary;
    use std::collections::BTreeMap;

    #[test]
    fn test_export_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let summary = DashboardSummary {
            total_jobs: 1,
            total_resumes: 10,
            avg_similarity: 52.0,
            fit_distribution: BTreeMap::from([
                ("Fit".to_string(), 4u64),
                ("Not Fit".to_string(), 6u64),
            ]),
            top_skills: vec![
                SkillCount { skill: "Python".to_string(), count: 7 },
                SkillCount { skill: "SQL".to_string(), count: 3 },
            ],
        };
        let slices = shape_fit_distribution(&summary);

        let (fit_path, skills_path) =
            export_charts(dir.path(), &slices, &summary.top_skills).unwrap();
        assert!(fit_path.exists());
        assert!(skills_path.exists());
    }

    #[test]
    fn test_empty_inputs_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let fit_path = dir.path().join("empty_pie.png");
        write_fit_pie(&fit_path, &[]).unwrap();
        assert!(!fit_path.exists());

        let bar_path = dir.path().join("empty_bar.png");
        write_skills_bar(&bar_path, &[]).unwrap();
        assert!(!bar_path.exists());
    }

    #[test]
    fn test_slice_palette_maps_to_original_hex_colors() {
        assert_eq!(PaletteColor::Blue.rgb(), (0x00, 0x88, 0xFE));
        assert_eq!(PaletteColor::Red.rgb(), (0xFF, 0x00, 0x00));
    }
}
