//! Dashboard state and data shaping.
//!
//! The summary is fetched fresh on every dashboard entry; nothing is cached.
//! A fetch failure is logged and leaves the view loading — the dashboard has
//! no user-facing error surface.

use crate::types::DashboardSummary;

/// The fixed two-entry chart palette, cycled by slice index: even indices
/// take the first color, odd the second. With more than two fit labels the
/// colors alias; the service only ever emits "Fit" and "Not Fit".
pub const FIT_PALETTE: [PaletteColor; 2] = [PaletteColor::Blue, PaletteColor::Red];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteColor {
    Blue,
    Red,
}

impl PaletteColor {
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            PaletteColor::Blue => (0x00, 0x88, 0xFE),
            PaletteColor::Red => (0xFF, 0x00, 0x00),
        }
    }
}

/// One slice of the fit-ratio chart.
#[derive(Debug, Clone, PartialEq)]
pub struct FitSlice {
    pub name: String,
    pub value: u64,
    pub color: PaletteColor,
}

impl FitSlice {
    pub fn percent_of(&self, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.value as f64 * 100.0 / total as f64
        }
    }
}

/// View state machine. `Loading` is re-entered on every dashboard entry;
/// there is no error state by design (failures only log).
#[derive(Debug, Default)]
pub enum DashboardState {
    #[default]
    Idle,
    Loading,
    Ready {
        summary: DashboardSummary,
        slices: Vec<FitSlice>,
    },
}

impl DashboardState {
    pub fn is_loading(&self) -> bool {
        matches!(self, DashboardState::Loading)
    }
}

/// Shape the fit distribution for chart rendering, assigning palette colors
/// by index parity.
pub fn shape_fit_distribution(summary: &DashboardSummary) -> Vec<FitSlice> {
    summary
        .fit_distribution
        .iter()
        .enumerate()
        .map(|(index, (name, value))| FitSlice {
            name: name.clone(),
            value: *value,
            color: FIT_PALETTE[index % FIT_PALETTE.len()],
        })
        .collect()
}

pub fn total_fit_count(slices: &[FitSlice]) -> u64 {
    slices.iter().map(|s| s.value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn summary(distribution: &[(&str, u64)]) -> DashboardSummary {
        DashboardSummary {
            total_jobs: 1,
            total_resumes: distribution.iter().map(|(_, v)| v).sum(),
            avg_similarity: 50.0,
            fit_distribution: distribution
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
            top_skills: Vec::new(),
        }
    }

    #[test]
    fn test_two_labels_take_distinct_colors() {
        let slices = shape_fit_distribution(&summary(&[("Fit", 5), ("Not Fit", 7)]));
        assert_eq!(slices.len(), 2);
        // BTreeMap order: "Fit" sorts before "Not Fit".
        assert_eq!(slices[0].name, "Fit");
        assert_eq!(slices[0].color, PaletteColor::Blue);
        assert_eq!(slices[1].name, "Not Fit");
        assert_eq!(slices[1].color, PaletteColor::Red);
    }

    #[test]
    fn test_palette_aliases_by_index_parity_beyond_two_labels() {
        let slices = shape_fit_distribution(&summary(&[
            ("Borderline", 1),
            ("Fit", 2),
            ("Not Fit", 3),
            ("Unknown", 4),
        ]));
        let colors: Vec<PaletteColor> = slices.iter().map(|s| s.color).collect();
        assert_eq!(
            colors,
            vec![
                PaletteColor::Blue,
                PaletteColor::Red,
                PaletteColor::Blue,
                PaletteColor::Red,
            ]
        );
    }

    #[test]
    fn test_percentages() {
        let slices = shape_fit_distribution(&summary(&[("Fit", 1), ("Not Fit", 3)]));
        let total = total_fit_count(&slices);
        assert_eq!(total, 4);
        assert_eq!(slices[0].percent_of(total), 25.0);
        assert_eq!(slices[1].percent_of(total), 75.0);
    }

    #[test]
    fn test_empty_distribution() {
        let slices = shape_fit_distribution(&summary(&[]));
        assert!(slices.is_empty());
        assert_eq!(total_fit_count(&slices), 0);
    }
}
