use crate::cells::Coordinate;
use crate::pathing::{Distances, MaxDistance};
use crate::utils::FnvHashSet;

const EMPTY_BODY: &str = "   ";

/// Fills in the 3 character wide body of each cell when a grid is rendered as text.
pub trait GridDisplay {
    fn render_cell_body(&self, _: Coordinate) -> String {
        String::from(EMPTY_BODY)
    }
}

/// Leaves every cell empty, just the walls are drawn.
#[derive(Debug, Copy, Clone)]
pub struct BlankDisplay;
impl GridDisplay for BlankDisplay {}


impl<MaxDistanceT> GridDisplay for Distances<MaxDistanceT>
    where MaxDistanceT: MaxDistance
{
    fn render_cell_body(&self, coord: Coordinate) -> String {
        if let Some(d) = self.distance_from_start_to(coord) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from(EMPTY_BODY)
        }
    }
}


#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<Coordinate>,
}
impl PathDisplay {
    pub fn new(path: &[Coordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: Coordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from(EMPTY_BODY)
        }
    }
}


#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start: Coordinate,
    end: Coordinate,
}
impl StartEndPointsDisplay {
    pub fn new(start: Coordinate, end: Coordinate) -> StartEndPointsDisplay {
        StartEndPointsDisplay { start, end }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: Coordinate) -> String {
        if coord == self.start {
            String::from(" S ")
        } else if coord == self.end {
            String::from(" E ")
        } else {
            String::from(EMPTY_BODY)
        }
    }
}


/// Entry and exit markers drawn over a solution path.
#[derive(Debug)]
pub struct SolutionDisplay {
    end_points: StartEndPointsDisplay,
    path: PathDisplay,
}
impl SolutionDisplay {
    pub fn new(entry: Coordinate, exit: Coordinate, path: &[Coordinate]) -> SolutionDisplay {
        SolutionDisplay {
            end_points: StartEndPointsDisplay::new(entry, exit),
            path: PathDisplay::new(path),
        }
    }
}
impl GridDisplay for SolutionDisplay {
    fn render_cell_body(&self, coord: Coordinate) -> String {
        let marker = self.end_points.render_cell_body(coord);
        if marker != EMPTY_BODY {
            marker
        } else {
            self.path.render_cell_body(coord)
        }
    }
}
