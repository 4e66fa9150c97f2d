use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::cells::Coordinate;
use crate::errors::*;
use crate::units::{Height, Width};

/// Everything needed to build and save one maze.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,
    pub entry: Coordinate,
    pub exit: Coordinate,
    pub perfect: bool,
    pub output_file: PathBuf,
    /// Fixes the random source when set.
    pub seed: Option<u64>,
    /// Chance of opening each remaining internal wall of an imperfect maze.
    pub loop_density: Option<f64>,
}

impl MazeConfig {
    /// Read a `KEY=VALUE` config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<MazeConfig> {
        let text = fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "loaded config file");
        MazeConfig::parse(&text)
    }

    /// Parse `KEY=VALUE` lines. Blank lines and lines starting with `#` are skipped.
    pub fn parse(text: &str) -> Result<MazeConfig> {
        let mut pairs = Vec::new();
        for (line_number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut key_value = line.splitn(2, '=');
            match (key_value.next(), key_value.next()) {
                (Some(key), Some(value)) => pairs.push((key.trim(), value.trim())),
                _ => {
                    bail!(ErrorKind::InvalidConfiguration(format!("line {}: expected KEY=VALUE, \
                                                                   found {:?}",
                                                                  line_number + 1,
                                                                  line)))
                }
            }
        }
        MazeConfig::from_pairs(pairs)
    }

    /// Build from already split key/value pairs. Later duplicates win, unknown keys are
    /// skipped.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<MazeConfig>
        where I: IntoIterator<Item = (K, V)>,
              K: AsRef<str>,
              V: AsRef<str>
    {
        let mut width = None;
        let mut height = None;
        let mut entry = None;
        let mut exit = None;
        let mut perfect = None;
        let mut output_file = None;
        let mut seed = None;
        let mut loop_density = None;

        for (key, value) in pairs {
            let (key, value) = (key.as_ref().trim(), value.as_ref().trim());
            match key {
                "WIDTH" => width = Some(parse_number::<usize>(key, value)?),
                "HEIGHT" => height = Some(parse_number::<usize>(key, value)?),
                "ENTRY" => entry = Some(parse_coordinate(key, value)?),
                "EXIT" => exit = Some(parse_coordinate(key, value)?),
                "PERFECT" => perfect = Some(parse_bool(key, value)?),
                "OUTPUT_FILE" => output_file = Some(PathBuf::from(value)),
                "SEED" => seed = Some(parse_number::<u64>(key, value)?),
                "LOOP_DENSITY" => loop_density = Some(parse_number::<f64>(key, value)?),
                _ => debug!(key, "ignoring unknown config key"),
            }
        }

        let config = MazeConfig {
            width: required("WIDTH", width)?,
            height: required("HEIGHT", height)?,
            entry: required("ENTRY", entry)?,
            exit: required("EXIT", exit)?,
            perfect: required("PERFECT", perfect)?,
            output_file: required("OUTPUT_FILE", output_file)?,
            seed,
            loop_density,
        };
        config.validate()?;
        Ok(config)
    }

    /// Range checks. Entry and exit may be the same cell.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!(ErrorKind::InvalidConfiguration(format!("dimensions must be positive, got {}x{}",
                                                          self.width,
                                                          self.height)));
        }
        for (name, coord) in &[("ENTRY", self.entry), ("EXIT", self.exit)] {
            if coord.row >= self.height || coord.col >= self.width {
                bail!(ErrorKind::InvalidConfiguration(format!("{} {} is outside the {}x{} grid",
                                                              name,
                                                              coord,
                                                              self.width,
                                                              self.height)));
            }
        }
        if self.output_file.as_os_str().is_empty() {
            bail!(ErrorKind::InvalidConfiguration(String::from("OUTPUT_FILE must not be empty")));
        }
        if let Some(density) = self.loop_density {
            if !(0.0..=1.0).contains(&density) {
                bail!(ErrorKind::InvalidConfiguration(format!("LOOP_DENSITY {} is not between 0 \
                                                               and 1",
                                                              density)));
            }
        }
        Ok(())
    }

    pub fn dimensions(&self) -> (Width, Height) {
        (Width(self.width), Height(self.height))
    }
}

fn required<T>(key: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| ErrorKind::InvalidConfiguration(format!("missing key {}", key)).into())
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse::<T>()
        .map_err(|_| ErrorKind::InvalidConfiguration(format!("{}={} is not a valid number", key, value)).into())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!(ErrorKind::InvalidConfiguration(format!("{}={} is not true or false", key, value))),
    }
}

fn parse_coordinate(key: &str, value: &str) -> Result<Coordinate> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [row, col] => {
            Ok(Coordinate::new(parse_number::<usize>(key, row)?, parse_number::<usize>(key, col)?))
        }
        _ => bail!(ErrorKind::InvalidConfiguration(format!("{}={} is not a row,col pair", key, value))),
    }
}
