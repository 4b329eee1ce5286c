use std::{error::Error, fmt, str::FromStr};

/// Separator between two moves of a script.
const STEP_DELIMITER: char = ',';

/// Axis-aligned walking direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Displacement covering `distance` world units in this direction.
    pub(crate) fn delta(self, distance: f32) -> (f32, f32) {
        match self {
            Self::Up => (0.0, distance),
            Self::Down => (0.0, -distance),
            Self::Left => (-distance, 0.0),
            Self::Right => (distance, 0.0),
        }
    }

    fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'U' => Some(Self::Up),
            'D' => Some(Self::Down),
            'L' => Some(Self::Left),
            'R' => Some(Self::Right),
            _ => None,
        }
    }
}

/// Walk in one direction for a number of ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Step {
    direction: Direction,
    ticks: u32,
}

/// Sequence of moves written as `R12,U4,L3`. The explorer idles once it runs out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct MoveScript {
    steps: Vec<Step>,
}

impl MoveScript {
    /// Direction walked during `tick`, counted from zero.
    pub(crate) fn direction_at(&self, tick: u32) -> Option<Direction> {
        let mut remaining = tick;
        for step in &self.steps {
            if remaining < step.ticks {
                return Some(step.direction);
            }
            remaining -= step.ticks;
        }
        None
    }

    /// Total number of ticks covered by the script.
    pub(crate) fn len(&self) -> u32 {
        self.steps
            .iter()
            .fold(0_u32, |total, step| total.saturating_add(step.ticks))
    }
}

impl FromStr for MoveScript {
    type Err = ScriptError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let steps = trimmed
            .split(STEP_DELIMITER)
            .map(parse_step)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { steps })
    }
}

/// Errors raised while parsing a move script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// Two delimiters with nothing between them.
    EmptyStep,
    /// The step starts with a letter other than `U`, `D`, `L`, or `R`.
    UnknownDirection(String),
    /// The tick count is missing, zero, or not a number.
    InvalidCount(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyStep => write!(f, "script contains an empty step"),
            Self::UnknownDirection(step) => {
                write!(f, "step '{step}' must start with U, D, L or R")
            }
            Self::InvalidCount(step) => {
                write!(f, "step '{step}' needs a positive tick count")
            }
        }
    }
}

impl Error for ScriptError {}

fn parse_step(segment: &str) -> Result<Step, ScriptError> {
    let segment = segment.trim();
    let mut chars = segment.chars();
    let letter = chars.next().ok_or(ScriptError::EmptyStep)?;
    let direction = Direction::from_letter(letter)
        .ok_or_else(|| ScriptError::UnknownDirection(segment.to_owned()))?;
    let ticks = chars
        .as_str()
        .trim()
        .parse::<u32>()
        .map_err(|_| ScriptError::InvalidCount(segment.to_owned()))?;

    if ticks == 0 {
        return Err(ScriptError::InvalidCount(segment.to_owned()));
    }

    Ok(Step { direction, ticks })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moves_in_order() {
        let script: MoveScript = "R3, u2 ,L1".parse().expect("script parses");
        assert_eq!(script.len(), 6);
        let directions: Vec<Option<Direction>> =
            (0..7).map(|tick| script.direction_at(tick)).collect();
        assert_eq!(
            directions,
            vec![
                Some(Direction::Right),
                Some(Direction::Right),
                Some(Direction::Right),
                Some(Direction::Up),
                Some(Direction::Up),
                Some(Direction::Left),
                None,
            ]
        );
    }

    #[test]
    fn blank_script_idles() {
        let script: MoveScript = "  ".parse().expect("blank script parses");
        assert_eq!(script.direction_at(0), None);
        assert_eq!(script.len(), 0);
    }

    #[test]
    fn rejects_malformed_steps() {
        assert_eq!("R2,,U1".parse::<MoveScript>(), Err(ScriptError::EmptyStep));
        assert_eq!(
            "X4".parse::<MoveScript>(),
            Err(ScriptError::UnknownDirection("X4".to_owned()))
        );
        assert_eq!(
            "R".parse::<MoveScript>(),
            Err(ScriptError::InvalidCount("R".to_owned()))
        );
        assert_eq!(
            "D0".parse::<MoveScript>(),
            Err(ScriptError::InvalidCount("D0".to_owned()))
        );
    }

    #[test]
    fn directions_map_onto_world_axes() {
        assert_eq!(Direction::Up.delta(2.0), (0.0, 2.0));
        assert_eq!(Direction::Down.delta(2.0), (0.0, -2.0));
        assert_eq!(Direction::Left.delta(2.0), (-2.0, 0.0));
        assert_eq!(Direction::Right.delta(2.0), (2.0, 0.0));
    }
}
