//! Run parameters and obstacle map as recorded in a results file.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use drunkard_core::{
    ConfigError, DisplayMode, ObstacleMode, Probabilities, SimulationConfig, MAX_GRID_SIZE,
};
use drunkard_space::Grid;

use crate::error::ResultsError;
use crate::{CSV_HEADER, MAP_PREFIX, PARAMS_PREFIX};

/// The reproducible part of a run: dimensions, step budget,
/// probabilities, obstacle mode and (when obstacles were used) the exact
/// map.
#[derive(Clone, Debug, PartialEq)]
pub struct SavedLayout {
    /// Grid rows.
    pub rows: u32,
    /// Grid columns.
    pub cols: u32,
    /// Step budget `K`.
    pub max_steps: u32,
    /// Movement probabilities.
    pub probabilities: Probabilities,
    /// Obstacle mode of the recorded run.
    pub obstacles: ObstacleMode,
    /// Row-major obstacle bitmap, if recorded.
    pub obstacle_map: Option<Vec<bool>>,
}

impl SavedLayout {
    /// Capture the layout of a run. The map is recorded only when
    /// obstacles were enabled.
    pub fn from_run(config: &SimulationConfig, grid: &Grid) -> Self {
        Self {
            rows: config.rows,
            cols: config.cols,
            max_steps: config.max_steps,
            probabilities: config.probabilities,
            obstacles: config.obstacles,
            obstacle_map: config
                .obstacles
                .enabled()
                .then(|| grid.bitmap().to_vec()),
        }
    }

    /// `rows * cols`.
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// The `# Params:` line, without a trailing newline.
    pub fn params_line(&self) -> String {
        let p = &self.probabilities;
        format!(
            "{PARAMS_PREFIX} R={}, C={}, K={}, Prob={}/{}/{}/{}, Obstacles={}",
            self.rows,
            self.cols,
            self.max_steps,
            p.up,
            p.down,
            p.left,
            p.right,
            mode_name(self.obstacles)
        )
    }

    /// Write the parameter line and, if present, the map block.
    pub fn write_header<W: Write>(&self, w: &mut W) -> Result<(), ResultsError> {
        writeln!(w, "{}", self.params_line())?;
        if let Some(map) = &self.obstacle_map {
            writeln!(w, "{MAP_PREFIX}")?;
            for row in map.chunks(self.cols.max(1) as usize) {
                let cells: Vec<&str> = row.iter().map(|&b| if b { "1" } else { "0" }).collect();
                writeln!(w, "# {}", cells.join(" "))?;
            }
        }
        Ok(())
    }

    /// Rebuild the recorded grid. Without a map the grid is open.
    pub fn grid(&self) -> Result<Grid, ResultsError> {
        match &self.obstacle_map {
            Some(map) => Ok(Grid::from_bitmap(self.rows, self.cols, map)?),
            None => Ok(Grid::open(self.rows, self.cols)),
        }
    }

    /// Turn the recorded layout into a fresh, validated configuration.
    ///
    /// A recorded map reruns as an explicit layout, so a random layout
    /// is reproduced exactly. Replication count and output target are
    /// not part of the layout and must be supplied.
    pub fn into_config(
        self,
        replications: u32,
        output: impl Into<String>,
        initial_mode: DisplayMode,
    ) -> Result<SimulationConfig, ResultsError> {
        let obstacles = match (&self.obstacle_map, self.obstacles) {
            (Some(_), _) => ObstacleMode::Explicit,
            (None, mode) => mode,
        };
        let config = SimulationConfig {
            rows: self.rows,
            cols: self.cols,
            replications,
            max_steps: self.max_steps,
            probabilities: self.probabilities,
            obstacles,
            obstacle_map: self.obstacle_map,
            output: output.into(),
            initial_mode,
        };
        config.validate()?;
        Ok(config)
    }
}

fn mode_name(mode: ObstacleMode) -> &'static str {
    match mode {
        ObstacleMode::None => "none",
        ObstacleMode::Random => "random",
        ObstacleMode::Explicit => "explicit",
    }
}

fn mode_from_name(name: &str) -> Result<ObstacleMode, ResultsError> {
    match name {
        "none" => Ok(ObstacleMode::None),
        "random" => Ok(ObstacleMode::Random),
        "explicit" => Ok(ObstacleMode::Explicit),
        other => Err(malformed_params(format!("unknown obstacle mode {other:?}"))),
    }
}

fn malformed_params(detail: impl Into<String>) -> ResultsError {
    ResultsError::MalformedParams {
        detail: detail.into(),
    }
}

fn malformed_map(detail: impl Into<String>) -> ResultsError {
    ResultsError::MalformedMap {
        detail: detail.into(),
    }
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ResultsError> {
    value
        .trim()
        .parse()
        .map_err(|_| malformed_params(format!("{key}={value:?} is not an unsigned integer")))
}

/// Parsed `# Params:` fields; `obstacles` is absent in older files.
struct Params {
    rows: u32,
    cols: u32,
    max_steps: u32,
    probabilities: Probabilities,
    obstacles: Option<ObstacleMode>,
}

fn parse_params(rest: &str) -> Result<Params, ResultsError> {
    let (mut rows, mut cols, mut max_steps, mut probs, mut obstacles) =
        (None, None, None, None, None);
    for field in rest.split(',') {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        let (key, value) = field
            .split_once('=')
            .ok_or_else(|| malformed_params(format!("field {field:?} has no '='")))?;
        match key.trim() {
            "R" => rows = Some(parse_u32("R", value)?),
            "C" => cols = Some(parse_u32("C", value)?),
            "K" => max_steps = Some(parse_u32("K", value)?),
            "Prob" => {
                let parts: Vec<f64> = value
                    .split('/')
                    .map(|p| p.trim().parse::<f64>())
                    .collect::<Result<_, _>>()
                    .map_err(|_| malformed_params(format!("Prob={value:?} is not numeric")))?;
                let [up, down, left, right] = parts[..] else {
                    return Err(malformed_params(format!(
                        "Prob has {} values, expected 4",
                        parts.len()
                    )));
                };
                probs = Some(Probabilities {
                    up,
                    down,
                    left,
                    right,
                });
            }
            "Obstacles" => obstacles = Some(mode_from_name(value.trim())?),
            other => tracing::debug!(key = other, "ignoring unknown parameter"),
        }
    }
    let rows = rows.ok_or_else(|| malformed_params("missing R"))?;
    let cols = cols.ok_or_else(|| malformed_params("missing C"))?;
    // Dimensions size the map buffer, so they are checked here.
    if rows == 0 || cols == 0 {
        return Err(ConfigError::EmptyGrid { rows, cols }.into());
    }
    if rows > MAX_GRID_SIZE || cols > MAX_GRID_SIZE {
        return Err(ConfigError::GridTooLarge {
            rows,
            cols,
            max: MAX_GRID_SIZE,
        }
        .into());
    }
    Ok(Params {
        rows,
        cols,
        max_steps: max_steps.ok_or_else(|| malformed_params("missing K"))?,
        probabilities: probs.ok_or_else(|| malformed_params("missing Prob"))?,
        obstacles,
    })
}

fn parse_map_row(line: &str, cols: u32, row: u32) -> Result<Vec<bool>, ResultsError> {
    let body = line
        .strip_prefix('#')
        .ok_or_else(|| malformed_map(format!("row {row} is not a comment line")))?;
    let cells: Vec<bool> = body
        .split_whitespace()
        .map(|tok| match tok {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(malformed_map(format!("row {row} has cell {other:?}"))),
        })
        .collect::<Result<_, _>>()?;
    if cells.len() != cols as usize {
        return Err(malformed_map(format!(
            "row {row} has {} cells, expected {cols}",
            cells.len()
        )));
    }
    Ok(cells)
}

/// Read the parameter line and map block from a results file.
///
/// Scanning stops at the CSV header. A missing `Obstacles=` field falls
/// back to explicit when a map follows and random otherwise.
pub fn load_layout<R: BufRead>(reader: R) -> Result<SavedLayout, ResultsError> {
    let mut lines = reader.lines();
    let mut params: Option<Params> = None;
    let mut map: Option<Vec<bool>> = None;

    while let Some(line) = lines.next() {
        let line = line?;
        let line = line.trim_end();
        if line == CSV_HEADER {
            break;
        }
        if let Some(rest) = line.strip_prefix(PARAMS_PREFIX) {
            params = Some(parse_params(rest)?);
        } else if line.starts_with(MAP_PREFIX) {
            let p = params
                .as_ref()
                .ok_or_else(|| malformed_map("map block before the parameter line"))?;
            let mut bits = Vec::with_capacity(p.rows as usize * p.cols as usize);
            for row in 0..p.rows {
                let row_line = lines
                    .next()
                    .transpose()?
                    .ok_or_else(|| malformed_map(format!("file ends at row {row}")))?;
                bits.extend(parse_map_row(row_line.trim_end(), p.cols, row)?);
            }
            map = Some(bits);
        }
    }

    let params = params.ok_or(ResultsError::MissingParams)?;
    let obstacles = match (params.obstacles, map.is_some()) {
        (Some(ObstacleMode::Explicit), false) => {
            return Err(malformed_map("explicit layout recorded without a map"));
        }
        (Some(mode), _) => mode,
        (None, true) => ObstacleMode::Explicit,
        (None, false) => ObstacleMode::Random,
    };
    tracing::debug!(
        rows = params.rows,
        cols = params.cols,
        ?obstacles,
        map = map.is_some(),
        "layout loaded"
    );
    Ok(SavedLayout {
        rows: params.rows,
        cols: params.cols,
        max_steps: params.max_steps,
        probabilities: params.probabilities,
        obstacles,
        obstacle_map: map,
    })
}

/// [`load_layout`] from a file path.
pub fn load_layout_file(path: &Path) -> Result<SavedLayout, ResultsError> {
    load_layout(BufReader::new(File::open(path)?))
}
