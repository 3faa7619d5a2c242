//! Binary encode/decode for protocol messages.
//!
//! All integers are little-endian. Strings and byte arrays are
//! length-prefixed with a `u32` length. Booleans are a single byte that
//! must be `0` or `1`. Nothing here depends on in-memory layout.

use std::io::{self, Read, Write};

use drunkard_core::{
    Cell, CellStats, ControlCommand, DisplayMode, GameOver, Message, ObstacleMode, Outcome,
    Probabilities, SimulationConfig, StateUpdate, StatsUpdate,
};

use crate::error::WireError;
use crate::{
    LEN_PREFIX, MAX_FRAME_LEN, TAG_CONFIG, TAG_CONTROL, TAG_ERROR, TAG_GAME_OVER,
    TAG_LOAD_CONFIG, TAG_STATE_UPDATE, TAG_STATS_UPDATE,
};

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), WireError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a boolean as `0` or `1`.
pub fn write_bool(w: &mut dyn Write, v: bool) -> Result<(), WireError> {
    write_u8(w, u8::from(v))
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), WireError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f64.
pub fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), WireError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a length-prefixed UTF-8 string (u32 length + bytes).
pub fn write_length_prefixed_str(w: &mut dyn Write, s: &str) -> Result<(), WireError> {
    write_length_prefixed_bytes(w, s.as_bytes())
}

/// Write a length-prefixed byte array (u32 length + bytes).
pub fn write_length_prefixed_bytes(w: &mut dyn Write, b: &[u8]) -> Result<(), WireError> {
    let len = u32::try_from(b.len()).map_err(|_| WireError::Malformed {
        detail: format!("byte array of {} bytes does not fit a u32 length", b.len()),
    })?;
    write_u32_le(w, len)?;
    w.write_all(b)?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, WireError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a boolean, rejecting anything but `0` or `1`.
pub fn read_bool(r: &mut dyn Read, what: &str) -> Result<bool, WireError> {
    match read_u8(r)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(WireError::Malformed {
            detail: format!("invalid {what} flag: {other}"),
        }),
    }
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, WireError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian f64.
pub fn read_f64_le(r: &mut dyn Read) -> Result<f64, WireError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

/// Read a length-prefixed byte array.
pub fn read_length_prefixed_bytes(r: &mut dyn Read) -> Result<Vec<u8>, WireError> {
    let len = read_u32_le(r)?;
    if len > MAX_FRAME_LEN {
        return Err(WireError::Malformed {
            detail: format!("byte array length {len} exceeds frame limit"),
        });
    }
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

/// Read a length-prefixed UTF-8 string.
pub fn read_length_prefixed_str(r: &mut dyn Read) -> Result<String, WireError> {
    let buf = read_length_prefixed_bytes(r)?;
    String::from_utf8(buf).map_err(|e| WireError::Malformed {
        detail: format!("invalid UTF-8 string: {e}"),
    })
}

// ── Enum tags ───────────────────────────────────────────────────

fn control_tag(cmd: ControlCommand) -> u8 {
    match cmd {
        ControlCommand::Pause => 0,
        ControlCommand::Resume => 1,
        ControlCommand::SwitchMode => 2,
        ControlCommand::Stop => 3,
    }
}

fn control_from_tag(tag: u8) -> Result<ControlCommand, WireError> {
    match tag {
        0 => Ok(ControlCommand::Pause),
        1 => Ok(ControlCommand::Resume),
        2 => Ok(ControlCommand::SwitchMode),
        3 => Ok(ControlCommand::Stop),
        _ => Err(WireError::Malformed {
            detail: format!("unknown control command {tag}"),
        }),
    }
}

fn mode_tag(mode: DisplayMode) -> u8 {
    match mode {
        DisplayMode::Interactive => 0,
        DisplayMode::Summary => 1,
    }
}

fn mode_from_tag(tag: u8) -> Result<DisplayMode, WireError> {
    match tag {
        0 => Ok(DisplayMode::Interactive),
        1 => Ok(DisplayMode::Summary),
        _ => Err(WireError::Malformed {
            detail: format!("unknown display mode {tag}"),
        }),
    }
}

fn obstacle_tag(mode: ObstacleMode) -> u8 {
    match mode {
        ObstacleMode::None => 0,
        ObstacleMode::Random => 1,
        ObstacleMode::Explicit => 2,
    }
}

fn obstacle_from_tag(tag: u8) -> Result<ObstacleMode, WireError> {
    match tag {
        0 => Ok(ObstacleMode::None),
        1 => Ok(ObstacleMode::Random),
        2 => Ok(ObstacleMode::Explicit),
        _ => Err(WireError::Malformed {
            detail: format!("unknown obstacle mode {tag}"),
        }),
    }
}

fn outcome_tag(outcome: Outcome) -> u8 {
    match outcome {
        Outcome::Completed => 0,
        Outcome::Stopped => 1,
        Outcome::Failed => 2,
    }
}

fn outcome_from_tag(tag: u8) -> Result<Outcome, WireError> {
    match tag {
        0 => Ok(Outcome::Completed),
        1 => Ok(Outcome::Stopped),
        2 => Ok(Outcome::Failed),
        _ => Err(WireError::Malformed {
            detail: format!("unknown outcome {tag}"),
        }),
    }
}

// ── Payload encode/decode ───────────────────────────────────────

fn encode_config(w: &mut dyn Write, c: &SimulationConfig) -> Result<(), WireError> {
    write_u32_le(w, c.rows)?;
    write_u32_le(w, c.cols)?;
    write_u32_le(w, c.replications)?;
    write_u32_le(w, c.max_steps)?;
    write_f64_le(w, c.probabilities.up)?;
    write_f64_le(w, c.probabilities.down)?;
    write_f64_le(w, c.probabilities.left)?;
    write_f64_le(w, c.probabilities.right)?;
    write_u8(w, obstacle_tag(c.obstacles))?;
    // Presence flag + bitmap for the optional obstacle map
    match &c.obstacle_map {
        Some(map) => {
            write_u8(w, 1)?;
            let bytes: Vec<u8> = map.iter().map(|&o| u8::from(o)).collect();
            write_length_prefixed_bytes(w, &bytes)?;
        }
        None => write_u8(w, 0)?,
    }
    write_length_prefixed_str(w, &c.output)?;
    write_u8(w, mode_tag(c.initial_mode))?;
    Ok(())
}

fn decode_config(r: &mut dyn Read) -> Result<SimulationConfig, WireError> {
    let rows = read_u32_le(r)?;
    let cols = read_u32_le(r)?;
    let replications = read_u32_le(r)?;
    let max_steps = read_u32_le(r)?;
    let probabilities = Probabilities {
        up: read_f64_le(r)?,
        down: read_f64_le(r)?,
        left: read_f64_le(r)?,
        right: read_f64_le(r)?,
    };
    let obstacles = obstacle_from_tag(read_u8(r)?)?;
    let obstacle_map = if read_bool(r, "obstacle map presence")? {
        let bytes = read_length_prefixed_bytes(r)?;
        let map = bytes
            .iter()
            .map(|&b| match b {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(WireError::Malformed {
                    detail: format!("invalid obstacle map cell {other}"),
                }),
            })
            .collect::<Result<Vec<bool>, WireError>>()?;
        Some(map)
    } else {
        None
    };
    let output = read_length_prefixed_str(r)?;
    let initial_mode = mode_from_tag(read_u8(r)?)?;
    Ok(SimulationConfig {
        rows,
        cols,
        replications,
        max_steps,
        probabilities,
        obstacles,
        obstacle_map,
        output,
        initial_mode,
    })
}

fn encode_cell(w: &mut dyn Write, cell: Cell) -> Result<(), WireError> {
    write_u32_le(w, cell.x)?;
    write_u32_le(w, cell.y)
}

fn decode_cell(r: &mut dyn Read) -> Result<Cell, WireError> {
    Ok(Cell::new(read_u32_le(r)?, read_u32_le(r)?))
}

fn encode_stats(w: &mut dyn Write, s: &StatsUpdate) -> Result<(), WireError> {
    let count = u32::try_from(s.cells.len()).map_err(|_| WireError::Malformed {
        detail: format!("stats chunk of {} cells is too large", s.cells.len()),
    })?;
    write_u32_le(w, count)?;
    for cell in &s.cells {
        encode_cell(w, cell.cell)?;
        write_f64_le(w, cell.avg_steps)?;
        write_f64_le(w, cell.prob_reach)?;
        write_bool(w, cell.is_obstacle)?;
    }
    write_u32_le(w, s.replications_done)?;
    write_u32_le(w, s.replications_target)?;
    write_bool(w, s.final_update)?;
    write_bool(w, s.last_chunk)?;
    Ok(())
}

fn decode_stats(r: &mut dyn Read) -> Result<StatsUpdate, WireError> {
    let count = read_u32_le(r)? as usize;
    // Each entry is at least 25 bytes; the frame bound caps this.
    let mut cells = Vec::with_capacity(count.min(MAX_FRAME_LEN as usize / 25));
    for _ in 0..count {
        cells.push(CellStats {
            cell: decode_cell(r)?,
            avg_steps: read_f64_le(r)?,
            prob_reach: read_f64_le(r)?,
            is_obstacle: read_bool(r, "obstacle")?,
        });
    }
    Ok(StatsUpdate {
        cells,
        replications_done: read_u32_le(r)?,
        replications_target: read_u32_le(r)?,
        final_update: read_bool(r, "final update")?,
        last_chunk: read_bool(r, "last chunk")?,
    })
}

// ── Message encode/decode ───────────────────────────────────────

/// Encode a message as `TAG + BODY` (no length prefix).
pub fn encode_message(msg: &Message) -> Result<Vec<u8>, WireError> {
    let mut buf = Vec::new();
    let w: &mut dyn Write = &mut buf;
    match msg {
        Message::Config(config) => {
            write_u8(w, TAG_CONFIG)?;
            encode_config(w, config)?;
        }
        Message::LoadConfig { path } => {
            write_u8(w, TAG_LOAD_CONFIG)?;
            write_length_prefixed_str(w, path)?;
        }
        Message::StateUpdate(s) => {
            write_u8(w, TAG_STATE_UPDATE)?;
            encode_cell(w, s.position)?;
            write_u32_le(w, s.step)?;
            write_u32_le(w, s.replication)?;
            write_u32_le(w, s.total_replications)?;
        }
        Message::StatsUpdate(s) => {
            write_u8(w, TAG_STATS_UPDATE)?;
            encode_stats(w, s)?;
        }
        Message::Control(cmd) => {
            write_u8(w, TAG_CONTROL)?;
            write_u8(w, control_tag(*cmd))?;
        }
        Message::GameOver(over) => {
            write_u8(w, TAG_GAME_OVER)?;
            write_u8(w, outcome_tag(over.outcome))?;
            write_length_prefixed_str(w, &over.message)?;
        }
        Message::Error { text } => {
            write_u8(w, TAG_ERROR)?;
            write_length_prefixed_str(w, text)?;
        }
    }
    Ok(buf)
}

/// Encode a message as a complete frame: `LEN + TAG + BODY`.
pub fn encode_frame(msg: &Message) -> Result<Vec<u8>, WireError> {
    let body = encode_message(msg)?;
    let len = u32::try_from(body.len())
        .ok()
        .filter(|&len| len <= MAX_FRAME_LEN)
        .ok_or(WireError::FrameTooLarge {
            len: u32::try_from(body.len()).unwrap_or(u32::MAX),
            max: MAX_FRAME_LEN,
        })?;
    let mut frame = Vec::with_capacity(LEN_PREFIX + body.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Decode a frame body (`TAG + BODY`, length prefix already stripped).
///
/// The body must be consumed exactly; trailing bytes are an error.
pub fn decode_message(frame: &[u8]) -> Result<Message, WireError> {
    let mut cursor = frame;
    let msg = decode_body(&mut cursor).map_err(|e| match e {
        WireError::Io(io) if io.kind() == io::ErrorKind::UnexpectedEof => WireError::Malformed {
            detail: format!("frame body of {} bytes ended early", frame.len()),
        },
        other => other,
    })?;
    if !cursor.is_empty() {
        return Err(WireError::Malformed {
            detail: format!("{} trailing bytes after {}", cursor.len(), msg.kind()),
        });
    }
    Ok(msg)
}

fn decode_body(r: &mut &[u8]) -> Result<Message, WireError> {
    let tag = read_u8(r)?;
    let msg = match tag {
        TAG_CONFIG => Message::Config(decode_config(r)?),
        TAG_LOAD_CONFIG => Message::LoadConfig {
            path: read_length_prefixed_str(r)?,
        },
        TAG_STATE_UPDATE => Message::StateUpdate(StateUpdate {
            position: decode_cell(r)?,
            step: read_u32_le(r)?,
            replication: read_u32_le(r)?,
            total_replications: read_u32_le(r)?,
        }),
        TAG_STATS_UPDATE => Message::StatsUpdate(decode_stats(r)?),
        TAG_CONTROL => Message::Control(control_from_tag(read_u8(r)?)?),
        TAG_GAME_OVER => Message::GameOver(GameOver {
            outcome: outcome_from_tag(read_u8(r)?)?,
            message: read_length_prefixed_str(r)?,
        }),
        TAG_ERROR => Message::Error {
            text: read_length_prefixed_str(r)?,
        },
        tag => return Err(WireError::UnknownMessageType { tag }),
    };
    Ok(msg)
}
