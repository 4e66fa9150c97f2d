use std::cmp;

use bit_set::BitSet;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::cells::Coordinate;
use crate::errors::*;
use crate::grid::Grid;


/// Carve a perfect maze (a uniform spanning tree of the grid) with Wilson's algorithm.
///
/// The tree starts as just `root`. Each cell not yet in the tree, taken in row-major scan
/// order, starts a random walk that moves to a uniformly chosen neighbour regardless of
/// walls. Revisiting a cell erases the loop the walk just made. When the walk reaches the
/// tree, the walls along it are removed and its cells join the tree.
///
/// `step_limit` caps the total number of walk steps across the whole run; exceeding it
/// fails with `GenerationTimeout`. Returns the number of steps taken.
pub fn wilson<R: Rng>(grid: &mut Grid,
                      root: Coordinate,
                      rng: &mut R,
                      step_limit: Option<usize>)
                      -> Result<usize> {

    let root_index = grid.grid_coordinate_to_index(root)
        .ok_or_else(|| ErrorKind::InvalidConfiguration(format!("root {} is outside the grid", root)))?;

    let cells_count = grid.size();
    let mut in_tree = BitSet::with_capacity(cells_count);
    in_tree.insert(root_index);
    let mut remaining = cells_count - 1;

    let mut steps = 0;
    let mut scan_index = 0;
    let mut walk: Vec<(Coordinate, usize)> = Vec::new();
    // Position in `walk` of each cell index on the current walk. Only the entries of the
    // finished walk are reset, so a walk costs its own length and not the grid size.
    let mut walk_positions: Vec<Option<usize>> = vec![None; cells_count];

    while remaining > 0 {

        while in_tree.contains(scan_index) {
            scan_index += 1;
        }
        let start = grid.index_to_grid_coordinate(scan_index)
            .ok_or_else(|| ErrorKind::InvalidConfiguration(format!("cell index {} is outside the grid",
                                                                   scan_index)))?;

        walk.clear();
        walk.push((start, scan_index));
        walk_positions[scan_index] = Some(0);
        let mut current = start;

        loop {
            if step_limit.map_or(false, |limit| steps >= limit) {
                debug!(steps, remaining, "random walk step limit reached");
                bail!(ErrorKind::GenerationTimeout(steps));
            }

            let neighbours = grid.neighbours(current);
            if neighbours.is_empty() {
                bail!(ErrorKind::InvalidConfiguration(format!("cell {} has no neighbours", current)));
            }
            let next = neighbours[rng.gen_range(0..neighbours.len())];
            steps += 1;

            let next_index = grid.grid_coordinate_to_index(next)
                .ok_or_else(|| ErrorKind::InvalidConfiguration(format!("cell {} is outside the grid", next)))?;
            if in_tree.contains(next_index) {
                walk.push((next, next_index));
                break;
            }

            if let Some(loop_start) = walk_positions[next_index] {
                for (_, erased) in walk.drain(loop_start + 1..) {
                    walk_positions[erased] = None;
                }
            } else {
                walk_positions[next_index] = Some(walk.len());
                walk.push((next, next_index));
            }
            current = next;
        }

        for pair in walk.windows(2) {
            grid.remove_wall_between(pair[0].0, pair[1].0)?;
        }
        // The last cell of the walk was already in the tree.
        for &(_, index) in &walk[..walk.len() - 1] {
            walk_positions[index] = None;
            in_tree.insert(index);
            remaining -= 1;
        }
        trace!(length = walk.len(), remaining, "walk joined the tree");
    }

    debug!(steps, cells = cells_count, "wilson finished");
    Ok(steps)
}


/// How many extra passages to open in a finished perfect maze.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LoopPolicy {
    /// Open each remaining internal wall independently with this probability.
    Probability(f64),
    /// Open this many randomly chosen internal walls, or all of them if there are fewer.
    Count(usize),
}

impl LoopPolicy {
    /// One wall per hundred cells, at least one.
    pub fn default_for(grid: &Grid) -> LoopPolicy {
        LoopPolicy::Count(cmp::max(grid.size() / 100, 1))
    }
}

/// Remove internal walls to add loops to a maze, returning how many were removed.
///
/// Only removes walls, so a connected maze stays connected. The outer boundary is never
/// touched. A `Probability` outside 0.0..=1.0 is an `InvalidConfiguration`.
pub fn break_walls<R: Rng>(grid: &mut Grid, policy: &LoopPolicy, rng: &mut R) -> Result<usize> {

    let mut walled_edges: Vec<(Coordinate, Coordinate)> = grid.iter_walled_edges().collect();

    let to_break: Vec<(Coordinate, Coordinate)> = match *policy {
        LoopPolicy::Probability(p) => {
            if !(0.0..=1.0).contains(&p) {
                bail!(ErrorKind::InvalidConfiguration(format!("loop probability {} is not \
                                                               between 0 and 1",
                                                              p)));
            }
            walled_edges.into_iter().filter(|_| rng.gen_bool(p)).collect()
        }
        LoopPolicy::Count(n) => {
            walled_edges.shuffle(rng);
            walled_edges.truncate(n);
            walled_edges
        }
    };

    for &(a, b) in &to_break {
        grid.remove_wall_between(a, b)?;
    }

    debug!(removed = to_break.len(), ?policy, "walls broken");
    Ok(to_break.len())
}


#[cfg(test)]
mod tests {

    use std::collections::HashMap;

    use quickcheck::{quickcheck, TestResult};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::pathing::Distances;
    use crate::units::{Height, Width};

    fn gc(row: usize, col: usize) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn carved(w: usize, h: usize, seed: u64) -> Grid {
        let mut g = Grid::new(Width(w), Height(h)).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(seed);
        wilson(&mut g, gc(0, 0), &mut rng, None).unwrap();
        g
    }

    fn all_reachable(g: &Grid) -> bool {
        Distances::<u32>::for_grid(g, gc(0, 0)).unwrap().reachable_count() == g.size()
    }

    #[test]
    fn wilson_produces_a_spanning_tree() {
        fn p(seed: u64, w: u8, h: u8) -> TestResult {
            let g = carved(usize::from(w % 12) + 1, usize::from(h % 12) + 1, seed);
            // connected with exactly cells - 1 passages means no loops
            TestResult::from_bool(g.links_count() == g.size() - 1 && all_reachable(&g))
        }
        quickcheck(p as fn(u64, u8, u8) -> TestResult)
    }

    #[test]
    fn wilson_is_deterministic_for_a_seed() {
        assert_eq!(carved(9, 7, 1234), carved(9, 7, 1234));
    }

    #[test]
    fn different_seeds_give_different_mazes() {
        let mazes: Vec<Grid> = (0..4).map(|seed| carved(10, 10, seed)).collect();
        assert!(mazes.windows(2).any(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn single_cell_grid_takes_no_steps() {
        let mut g = Grid::new(Width(1), Height(1)).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(0);
        assert_eq!(wilson(&mut g, gc(0, 0), &mut rng, Some(0)).unwrap(), 0);
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn root_must_be_on_the_grid() {
        let mut g = Grid::new(Width(2), Height(2)).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(0);
        let err = wilson(&mut g, gc(2, 2), &mut rng, None).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidConfiguration(_)));
    }

    #[test]
    fn step_limit_times_out() {
        let mut g = Grid::new(Width(20), Height(20)).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(5);
        // 399 cells must join the tree, each needs at least one step
        let err = wilson(&mut g, gc(0, 0), &mut rng, Some(10)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::GenerationTimeout(10)));
    }

    #[test]
    fn generous_step_limit_completes() {
        let mut g = Grid::new(Width(6), Height(6)).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(5);
        let steps = wilson(&mut g, gc(0, 0), &mut rng, Some(1_000_000)).unwrap();
        assert!(steps >= 35);
        assert_eq!(g.links_count(), 35);
    }

    #[test]
    fn wilson_handles_large_grids() {
        let g = carved(300, 300, 42);
        assert_eq!(g.links_count(), g.size() - 1);
        assert!(all_reachable(&g));
    }

    #[test]
    fn wilson_picks_spanning_trees_uniformly() {
        // A 2x2 grid has four spanning trees, each leaving exactly one internal wall standing
        let runs = 4000;
        let mut counts: HashMap<(Coordinate, Coordinate), usize> = HashMap::new();
        for seed in 0..runs {
            let g = carved(2, 2, seed);
            let walled: Vec<_> = g.iter_walled_edges().collect();
            assert_eq!(walled.len(), 1);
            *counts.entry(walled[0]).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 4);
        for (edge, count) in &counts {
            assert!(*count > 850 && *count < 1150, "tree without {:?} seen {} times", edge, count);
        }
    }

    #[test]
    fn default_loop_policy() {
        let small = Grid::new(Width(5), Height(5)).unwrap();
        assert_eq!(LoopPolicy::default_for(&small), LoopPolicy::Count(1));
        let large = Grid::new(Width(30), Height(20)).unwrap();
        assert_eq!(LoopPolicy::default_for(&large), LoopPolicy::Count(6));
    }

    #[test]
    fn break_walls_by_count() {
        let mut g = carved(8, 8, 99);
        let mut rng = XorShiftRng::seed_from_u64(99);
        let removed = break_walls(&mut g, &LoopPolicy::Count(5), &mut rng).unwrap();
        assert_eq!(removed, 5);
        assert_eq!(g.links_count(), 63 + 5);
        assert!(all_reachable(&g));
    }

    #[test]
    fn break_walls_count_is_capped_by_available_walls() {
        let mut g = carved(3, 3, 3);
        let mut rng = XorShiftRng::seed_from_u64(3);
        // 12 internal edges, 8 open after carving
        let removed = break_walls(&mut g, &LoopPolicy::Count(100), &mut rng).unwrap();
        assert_eq!(removed, 4);
        assert_eq!(g.iter_walled_edges().count(), 0);
    }

    #[test]
    fn break_walls_by_probability() {
        let mut rng = XorShiftRng::seed_from_u64(11);

        let mut g = carved(6, 6, 11);
        assert_eq!(break_walls(&mut g, &LoopPolicy::Probability(0.0), &mut rng).unwrap(), 0);
        assert_eq!(g.links_count(), 35);

        let walled = g.iter_walled_edges().count();
        assert_eq!(break_walls(&mut g, &LoopPolicy::Probability(1.0), &mut rng).unwrap(), walled);
        assert_eq!(g.iter_walled_edges().count(), 0);

        let err = break_walls(&mut g, &LoopPolicy::Probability(1.5), &mut rng).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidConfiguration(_)));
    }

    #[test]
    fn break_walls_on_a_corridor_has_nothing_to_do() {
        let mut g = carved(7, 1, 2);
        let mut rng = XorShiftRng::seed_from_u64(2);
        assert_eq!(break_walls(&mut g, &LoopPolicy::Count(3), &mut rng).unwrap(), 0);
        assert_eq!(g.links_count(), 6);
    }
}
