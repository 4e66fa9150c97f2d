use rand::Rng;
use tracing::{debug, info, span, Level};

use crate::cells::Coordinate;
use crate::codec;
use crate::config::MazeConfig;
use crate::errors::*;
use crate::generators::{self, LoopPolicy};
use crate::grid::Grid;
use crate::grid_displays::{SolutionDisplay, StartEndPointsDisplay};
use crate::pathing;

/// Knobs for a build that are not part of the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeOptions {
    /// Loop policy for imperfect mazes. None picks the config density, else the default count.
    pub loop_policy: Option<LoopPolicy>,
    /// Ceiling on random walk steps during generation.
    pub step_limit: Option<usize>,
    pub solve: bool,
}

impl Default for MazeOptions {
    fn default() -> MazeOptions {
        MazeOptions {
            loop_policy: None,
            step_limit: None,
            solve: true,
        }
    }
}

/// A generated maze with its end points and, when solved, the shortest route between them.
#[derive(Debug, Clone)]
pub struct Maze {
    grid: Grid,
    entry: Coordinate,
    exit: Coordinate,
    path: Option<Vec<Coordinate>>,
    walls_removed: usize,
}

impl Maze {
    /// Generate, optionally add loops, then optionally solve. Each stage finishes with the
    /// grid before the next one starts.
    pub fn generate<R: Rng>(config: &MazeConfig, options: &MazeOptions, rng: &mut R) -> Result<Maze> {
        config.validate()?;
        let span = span!(Level::INFO, "build_maze", width = config.width, height = config.height);
        let _guard = span.enter();

        let (width, height) = config.dimensions();
        let mut grid = Grid::new(width, height)?;

        let steps = generators::wilson(&mut grid, config.entry, rng, options.step_limit)?;
        debug!(steps, links = grid.links_count(), "spanning tree carved");

        let walls_removed = if config.perfect {
            0
        } else {
            let policy = options.loop_policy
                .or_else(|| config.loop_density.map(LoopPolicy::Probability))
                .unwrap_or_else(|| LoopPolicy::default_for(&grid));
            generators::break_walls(&mut grid, &policy, rng)?
        };

        let path = if options.solve {
            Some(pathing::shortest_path(&grid, config.entry, config.exit)?)
        } else {
            None
        };

        info!(perfect = config.perfect, walls_removed, "maze built");
        Ok(Maze {
            grid,
            entry: config.entry,
            exit: config.exit,
            path,
            walls_removed,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn entry(&self) -> Coordinate {
        self.entry
    }

    pub fn exit(&self) -> Coordinate {
        self.exit
    }

    pub fn path(&self) -> Option<&[Coordinate]> {
        self.path.as_deref()
    }

    /// Walls opened after the spanning tree was carved.
    pub fn walls_removed(&self) -> usize {
        self.walls_removed
    }

    /// The text artifact, including the solution when there is one.
    pub fn encode(&self) -> Result<String> {
        codec::encode(&self.grid, self.entry, self.exit, self.path())
    }

    /// Box drawing view with entry and exit marked, and the solution if there is one.
    pub fn render(&self) -> String {
        match self.path() {
            Some(path) => self.grid.render_with(&SolutionDisplay::new(self.entry, self.exit, path)),
            None => self.grid.render_with(&StartEndPointsDisplay::new(self.entry, self.exit)),
        }
    }
}
