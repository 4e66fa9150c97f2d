use std::collections::VecDeque;
use std::fmt::{Debug, Display, LowerHex};

use itertools::Itertools;
use num::traits::{Bounded, One, Unsigned, Zero};
use smallvec::SmallVec;
use tracing::debug;

use crate::cells::Coordinate;
use crate::errors::*;
use crate::grid::Grid;
use crate::utils::{self, FnvHashMap};


// Stands in for a generic type parameter alias, which the language lacks.
// `type X = Y;` only works with concrete types.
pub trait MaxDistance
    : Zero + One + Bounded + Unsigned + Debug + Clone + Copy + Display + LowerHex + Ord
    {
}
impl<T: Zero + One + Bounded + Unsigned + Debug + Clone + Copy + Display + LowerHex + Ord> MaxDistance for T {}


/// Flood fill of step counts from one cell to every cell reachable through open passages.
#[derive(Debug, Clone)]
pub struct Distances<MaxDistanceT = u32> {
    start_coordinate: Coordinate,
    distances: FnvHashMap<Coordinate, MaxDistanceT>,
    max_distance: MaxDistanceT,
}

impl<MaxDistanceT> Distances<MaxDistanceT>
    where MaxDistanceT: MaxDistance
{
    /// None if the start is not on the grid.
    pub fn for_grid(grid: &Grid, start_coordinate: Coordinate) -> Option<Distances<MaxDistanceT>> {

        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let mut max = Zero::zero();
        let mut distances = utils::fnv_hashmap(grid.size());
        distances.insert(start_coordinate, Zero::zero());

        // Every step is one from the previous cell, so the first distance written for a cell is
        // already the shortest. The map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                let distance_to_cell: MaxDistanceT = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for link_coordinate in &*grid.open_neighbours(*cell_coord) {
                    if !distances.contains_key(link_coordinate) {
                        distances.insert(*link_coordinate, distance_to_cell + One::one());
                        new_frontier.push(*link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Coordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> MaxDistanceT {
        self.max_distance
    }

    /// None for cells that are unreachable or off the grid.
    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: Coordinate) -> Option<MaxDistanceT> {
        self.distances.get(&coord).cloned()
    }

    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    pub fn furthest_points_on_grid(&self) -> SmallVec<[Coordinate; 8]> {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .sorted()
            .collect()
    }
}


/// Shortest route through open passages from `entry` to `exit`, both ends included.
///
/// Breadth first search visiting open neighbours in North, South, East, West order, so the
/// same grid always gives the same path when several shortest paths exist.
/// Fails with `InvalidConfiguration` for end points off the grid and `NoPath` when the exit
/// is walled off from the entry.
pub fn shortest_path(grid: &Grid, entry: Coordinate, exit: Coordinate) -> Result<Vec<Coordinate>> {

    let entry_index = grid.grid_coordinate_to_index(entry)
        .ok_or_else(|| ErrorKind::InvalidConfiguration(format!("entry {} is outside the grid", entry)))?;
    let exit_index = grid.grid_coordinate_to_index(exit)
        .ok_or_else(|| ErrorKind::InvalidConfiguration(format!("exit {} is outside the grid", exit)))?;

    let mut visited = vec![false; grid.size()];
    let mut came_from: Vec<Option<usize>> = vec![None; grid.size()];
    let mut frontier = VecDeque::with_capacity(grid.width() + grid.height());

    visited[entry_index] = true;
    frontier.push_back(entry);

    while let Some(current) = frontier.pop_front() {
        if current == exit {
            break;
        }
        let current_index = grid.grid_coordinate_to_index(current)
            .ok_or_else(|| ErrorKind::InvalidConfiguration(format!("cell {} is outside the grid", current)))?;

        for neighbour in grid.open_neighbours(current) {
            if let Some(neighbour_index) = grid.grid_coordinate_to_index(neighbour) {
                if !visited[neighbour_index] {
                    visited[neighbour_index] = true;
                    came_from[neighbour_index] = Some(current_index);
                    frontier.push_back(neighbour);
                }
            }
        }
    }

    if !visited[exit_index] {
        debug!(%entry, %exit, "exit unreachable");
        bail!(ErrorKind::NoPath(entry, exit));
    }

    let mut path = vec![exit];
    let mut current_index = exit_index;
    while let Some(previous_index) = came_from[current_index] {
        let previous = grid.index_to_grid_coordinate(previous_index)
            .ok_or_else(|| ErrorKind::InvalidConfiguration(format!("cell index {} is outside the grid",
                                                                   previous_index)))?;
        path.push(previous);
        current_index = previous_index;
    }
    path.reverse();

    debug!(length = path.len(), "solved");
    Ok(path)
}
