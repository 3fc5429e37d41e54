use bevy::prelude::*;
use ledge::game_logic::errors::{LedgeError, LedgeResult};
use ledge::pathfinding::{AgentFootprint, AgentKind};
use std::path::Path;

/// Split `input` on `delimiter` into exactly `N` floats
pub fn parse_delimited<const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
) -> LedgeResult<[f32; N]> {
    let parts: Vec<&str> = input.split(delimiter).map(str::trim).collect();
    if parts.len() != N {
        return Err(LedgeError::InvalidArgument {
            reason: format!(
                "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
            ),
        });
    }

    let mut result = [0.0; N];
    for (slot, part) in result.iter_mut().zip(&parts) {
        *slot = part
            .parse::<f32>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| LedgeError::InvalidArgument {
                reason: format!("Invalid {type_name} value: '{part}'"),
            })?;
    }

    Ok(result)
}

/// Parse a world position "X,Y"
pub fn parse_point(point: &str) -> LedgeResult<Vec2> {
    let [x, y] = parse_delimited::<2>(point, ',', "position")?;
    Ok(Vec2::new(x, y))
}

/// Parse an agent footprint "WIDTHxHEIGHT"
pub fn parse_footprint(size: &str) -> LedgeResult<AgentFootprint> {
    let [width, height] = parse_delimited::<2>(size, 'x', "footprint")?;
    if width <= 0.0 || height <= 0.0 {
        return Err(LedgeError::InvalidArgument {
            reason: format!("Footprint must be positive, got {width}x{height}"),
        });
    }
    Ok(AgentFootprint::new(width, height))
}

pub fn parse_kind(kind: &str) -> LedgeResult<AgentKind> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "ground" => Ok(AgentKind::Ground),
        "flying" => Ok(AgentKind::Flying),
        other => Err(LedgeError::InvalidArgument {
            reason: format!("Unknown agent kind '{other}', expected ground or flying"),
        }),
    }
}

/// Converted levels are always written in the binary format
pub fn validate_output_path(path: &Path) -> LedgeResult<()> {
    if path.extension().is_none_or(|ext| ext != "bin") {
        return Err(LedgeError::InvalidArgument {
            reason: format!("Output path must end in .bin, got {}", path.display()),
        });
    }
    Ok(())
}
