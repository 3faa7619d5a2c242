//! Results table writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use drunkard_core::CellStats;

use crate::error::ResultsError;
use crate::layout::SavedLayout;
use crate::CSV_HEADER;

/// Write a results table to `w`.
///
/// `stats` must list every cell of the grid in row-major order, the
/// center included. When `layout` is given, the parameter and map block
/// is written first and the table size is checked against it.
pub fn write_results<W: Write>(
    w: &mut W,
    stats: &[CellStats],
    layout: Option<&SavedLayout>,
) -> Result<(), ResultsError> {
    if let Some(layout) = layout {
        let expected = layout.cell_count();
        if stats.len() != expected {
            return Err(ResultsError::TableSize {
                expected,
                got: stats.len(),
            });
        }
        layout.write_header(w)?;
    }
    writeln!(w, "{CSV_HEADER}")?;
    for s in stats {
        writeln!(
            w,
            "{},{},{:.2},{:.2}",
            s.cell.x, s.cell.y, s.avg_steps, s.prob_reach
        )?;
    }
    Ok(())
}

/// Create (or truncate) the file at `path` and write the results table.
pub fn persist(
    path: &Path,
    stats: &[CellStats],
    layout: Option<&SavedLayout>,
) -> Result<(), ResultsError> {
    let mut w = BufWriter::new(File::create(path)?);
    write_results(&mut w, stats, layout)?;
    w.flush()?;
    tracing::info!(
        path = %path.display(),
        cells = stats.len(),
        metadata = layout.is_some(),
        "results persisted"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use drunkard_core::{Cell, ObstacleMode, Probabilities};

    fn stats_2x2() -> Vec<CellStats> {
        (0..4)
            .map(|i| {
                let cell = Cell::from_index(i, 2);
                CellStats {
                    cell,
                    avg_steps: if cell.is_center() { 0.0 } else { i as f64 * 1.1 },
                    prob_reach: if cell.is_center() { 0.0 } else { 0.5 },
                    is_obstacle: false,
                }
            })
            .collect()
    }

    #[test]
    fn plain_table_has_header_and_every_cell() {
        let mut out = Vec::new();
        write_results(&mut out, &stats_2x2(), None).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "X,Y,AvgSteps,ProbReachK\n0,0,0.00,0.00\n1,0,1.10,0.50\n0,1,2.20,0.50\n1,1,3.30,0.50\n"
        );
    }

    #[test]
    fn metadata_block_precedes_header() {
        let layout = SavedLayout {
            rows: 2,
            cols: 2,
            max_steps: 7,
            probabilities: Probabilities::uniform(),
            obstacles: ObstacleMode::Explicit,
            obstacle_map: Some(vec![false, false, true, false]),
        };
        let mut out = Vec::new();
        write_results(&mut out, &stats_2x2(), Some(&layout)).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "# Params: R=2, C=2, K=7, Prob=0.25/0.25/0.25/0.25, Obstacles=explicit"
        );
        assert_eq!(lines[1], "# Map:");
        assert_eq!(lines[2], "# 0 0");
        assert_eq!(lines[3], "# 1 0");
        assert_eq!(lines[4], CSV_HEADER);
    }

    #[test]
    fn table_size_mismatch_is_rejected() {
        let layout = SavedLayout {
            rows: 3,
            cols: 3,
            max_steps: 7,
            probabilities: Probabilities::uniform(),
            obstacles: ObstacleMode::None,
            obstacle_map: None,
        };
        let err = write_results(&mut Vec::new(), &stats_2x2(), Some(&layout)).unwrap_err();
        assert!(matches!(
            err,
            ResultsError::TableSize {
                expected: 9,
                got: 4
            }
        ));
    }

    #[test]
    fn persist_writes_to_disk() {
        let path = std::env::temp_dir().join(format!(
            "drunkard-results-persist-{}.csv",
            std::process::id()
        ));
        persist(&path, &stats_2x2(), None).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(text.starts_with(CSV_HEADER));
        assert_eq!(text.lines().count(), 5);
    }
}
