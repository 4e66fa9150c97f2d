use std::fmt;

use crate::cells::{offset_coordinate, CompassPrimary, Coordinate, CoordinateOptionSmallVec,
                   CoordinateSmallVec, WallMask};
use crate::errors::*;
use crate::grid_displays::{BlankDisplay, GridDisplay};
use crate::grid_iterators::{BatchIter, BatchIterType, CellIter};
use crate::units::{Height, Width};


/// Wall state of a `width` x `height` rectangle of cells.
///
/// The wall between two adjacent cells is stored on both of them and the two copies always
/// agree. `remove_wall_between` is the only mutator; the outer boundary is never opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    walls: Vec<WallMask>,
}

impl Grid {
    /// A fully walled grid. Fails if either dimension is zero.
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        let cells_count = checked_cells_count(w, h)
            .ok_or_else(|| ErrorKind::InvalidConfiguration(format!("grid of {}x{} cells", w, h)))?;

        Ok(Grid {
            width: w,
            height: h,
            walls: vec![WallMask::ALL_WALLS; cells_count],
        })
    }

    /// Rebuild a grid from row-major wall masks, as read back from an encoded maze.
    ///
    /// The masks must describe a grid this type could have produced: the right number of
    /// cells, a closed outer boundary and matching walls on both sides of every shared edge.
    pub fn from_wall_masks(width: Width, height: Height, masks: Vec<WallMask>) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        let cells_count = checked_cells_count(w, h).ok_or_else(|| {
            ErrorKind::MalformedEncoding(format!("grid of {}x{} cells", w, h))
        })?;
        if masks.len() != cells_count {
            bail!(ErrorKind::MalformedEncoding(format!("expected {} cells for a {}x{} grid, found {}",
                                                       cells_count, w, h, masks.len())));
        }

        let grid = Grid {
            width: w,
            height: h,
            walls: masks,
        };

        for coord in grid.iter() {
            let mask = grid.walls[grid.index_unchecked(coord)];
            for dir in CompassPrimary::ALL.iter().cloned() {
                match grid.neighbour_at_direction(coord, dir) {
                    None if !mask.has_wall(dir) => {
                        bail!(ErrorKind::MalformedEncoding(format!("cell {} is open to the {:?} \
                                                                    outside the grid",
                                                                   coord, dir)));
                    }
                    Some(neighbour) if grid.has_wall(neighbour, dir.opposite()) !=
                                       mask.has_wall(dir) => {
                        bail!(ErrorKind::MalformedEncoding(format!("cells {} and {} disagree \
                                                                    about their shared wall",
                                                                   coord, neighbour)));
                    }
                    _ => {}
                }
            }
        }

        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.walls.len()
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: Coordinate) -> bool {
        coord.row < self.height && coord.col < self.width
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Coordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(self.index_unchecked(coord))
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_grid_coordinate(&self, index: usize) -> Option<Coordinate> {
        if index < self.size() {
            Some(Coordinate::from_row_major_index(index, self.width))
        } else {
            None
        }
    }

    /// The 4-bit wall state of a cell, None for coordinates off the grid.
    #[inline]
    pub fn wall_mask(&self, coord: Coordinate) -> Option<WallMask> {
        self.grid_coordinate_to_index(coord).map(|index| self.walls[index])
    }

    /// Is the side of the cell closed? Cells off the grid count as fully walled.
    #[inline]
    pub fn has_wall(&self, coord: Coordinate, direction: CompassPrimary) -> bool {
        self.wall_mask(coord).map_or(true, |mask| mask.has_wall(direction))
    }

    /// Open the wall shared by two adjacent cells, on both cells.
    ///
    /// Fails with `InvalidEdge` unless both cells are on the grid and differ by exactly one
    /// step north, south, east or west. Removing an already open wall is a no-op.
    pub fn remove_wall_between(&mut self, a: Coordinate, b: Coordinate) -> Result<()> {
        let direction = CompassPrimary::between(a, b)
            .filter(|_| self.is_valid_coordinate(a) && self.is_valid_coordinate(b))
            .ok_or_else(|| ErrorKind::InvalidEdge(a, b))?;

        let a_index = self.index_unchecked(a);
        let b_index = self.index_unchecked(b);
        self.walls[a_index] = self.walls[a_index].without(direction);
        self.walls[b_index] = self.walls[b_index].without(direction.opposite());
        Ok(())
    }

    /// Cells that are to the North, South, East or West of a particular cell, whether or not a
    /// wall separates them. Always in that order.
    pub fn neighbours(&self, coord: Coordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Neighbouring cells reachable without crossing a wall, in North, South, East, West order.
    pub fn open_neighbours(&self, coord: Coordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter(|dir| !self.has_wall(coord, **dir))
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    pub fn neighbours_at_directions(&self,
                                    coord: Coordinate,
                                    dirs: &[CompassPrimary])
                                    -> CoordinateOptionSmallVec {
        dirs.iter()
            .map(|direction| self.neighbour_at_direction(coord, *direction))
            .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Coordinate,
                                  direction: CompassPrimary)
                                  -> Option<Coordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        offset_coordinate(coord, direction).filter(|neighbour| self.is_valid_coordinate(*neighbour))
    }

    /// Are two cells adjacent with no wall between them?
    pub fn is_linked(&self, a: Coordinate, b: Coordinate) -> bool {
        CompassPrimary::between(a, b).map_or(false, |dir| self.is_neighbour_linked(a, dir))
    }

    pub fn is_neighbour_linked(&self, coord: Coordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction).is_some() && !self.has_wall(coord, direction)
    }

    /// Number of open passages between cells, each shared wall counted once.
    pub fn links_count(&self) -> usize {
        self.iter_links().count()
    }

    /// Every open passage as a (cell, east or south neighbour) pair, in row-major order.
    pub fn iter_links(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        self.iter_internal_edges()
            .filter(move |&(a, b)| self.is_linked(a, b))
    }

    /// Every shared wall that is still closed, as a (cell, east or south neighbour) pair.
    pub fn iter_walled_edges(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        self.iter_internal_edges()
            .filter(move |&(a, b)| !self.is_linked(a, b))
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.width, self.size())
    }

    #[inline]
    pub fn iter_row(&self) -> BatchIter {
        BatchIter::new(BatchIterType::Row, self.width, self.height)
    }

    #[inline]
    pub fn iter_column(&self) -> BatchIter {
        BatchIter::new(BatchIterType::Column, self.width, self.height)
    }

    /// Box drawing text rendering, with cell bodies filled in by `overlay`.
    pub fn render_with(&self, overlay: &dyn GridDisplay) -> String {
        render_box_drawing(self, overlay)
    }

    fn iter_internal_edges(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        self.iter().flat_map(move |coord| {
            [CompassPrimary::East, CompassPrimary::South]
                .iter()
                .filter_map(move |dir| self.neighbour_at_direction(coord, *dir))
                .map(move |neighbour| (coord, neighbour))
                .collect::<CoordinatePairSmallVec>()
        })
    }

    #[inline]
    fn index_unchecked(&self, coord: Coordinate) -> usize {
        coord.row * self.width + coord.col
    }
}

type CoordinatePairSmallVec = smallvec::SmallVec<[(Coordinate, Coordinate); 2]>;

fn checked_cells_count(width: usize, height: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        None
    } else {
        width.checked_mul(height)
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = Coordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render_box_drawing(self, &BlankDisplay))
    }
}

fn render_box_drawing(grid: &Grid, overlay: &dyn GridDisplay) -> String {

    const WALL_L: &str = "╴";
    const WALL_R: &str = "╶";
    const WALL_U: &str = "╵";
    const WALL_D: &str = "╷";
    const WALL_LR_3: &str = "───";
    const WALL_LR: &str = "─";
    const WALL_UD: &str = "│";
    const WALL_LD: &str = "┐";
    const WALL_RU: &str = "└";
    const WALL_LU: &str = "┘";
    const WALL_RD: &str = "┌";
    const WALL_LRU: &str = "┴";
    const WALL_LRD: &str = "┬";
    const WALL_LRUD: &str = "┼";
    const WALL_RUD: &str = "├";
    const WALL_LUD: &str = "┤";

    let columns_count = grid.width();
    let rows_count = grid.height();

    // Start by special case rendering the text for the north most boundary
    let mut output = String::from(WALL_RD);
    for col in 0..columns_count {
        let coord = Coordinate::new(0, col);
        output.push_str(WALL_LR_3);
        if grid.is_neighbour_linked(coord, CompassPrimary::East) {
            output.push_str(WALL_LR);
        } else if col == columns_count - 1 {
            output.push_str(WALL_LD);
        } else {
            output.push_str(WALL_LRD);
        }
    }
    output.push('\n');

    for (index_row, row) in grid.iter_row().enumerate() {

        let is_last_row = index_row == (rows_count - 1);

        // The west most boundary of the row is a special case.
        // The top section of the cell is done by the previous row.
        let mut row_middle_section_render = String::from(WALL_UD);
        let mut row_bottom_section_render = String::new();

        for (index_column, cell_coord) in row.into_iter().enumerate() {

            let is_first_column = index_column == 0;
            let is_last_column = index_column == (columns_count - 1);
            let east_open = grid.is_neighbour_linked(cell_coord, CompassPrimary::East);
            let south_open = grid.is_neighbour_linked(cell_coord, CompassPrimary::South);

            // Each cell uses the southern wall of the cell above it as its own northern wall,
            // so only the body, the eastern boundary and the southern boundary are drawn here.
            row_middle_section_render.push_str(&overlay.render_cell_body(cell_coord));
            row_middle_section_render.push_str(if east_open { " " } else { WALL_UD });

            if is_first_column {
                row_bottom_section_render = if is_last_row {
                    String::from(WALL_RU)
                } else if south_open {
                    String::from(WALL_UD)
                } else {
                    String::from(WALL_RUD)
                };
            }
            row_bottom_section_render.push_str(if south_open { "   " } else { WALL_LR_3 });

            let corner = match (is_last_row, is_last_column) {
                (true, true) => WALL_LU,
                (true, false) => if east_open { WALL_LR } else { WALL_LRU },
                (false, true) => if south_open { WALL_UD } else { WALL_LUD },
                (false, false) => {
                    let access_se_from_east =
                        grid.neighbour_at_direction(cell_coord, CompassPrimary::East)
                            .map_or(false, |c| grid.is_neighbour_linked(c, CompassPrimary::South));
                    let access_se_from_south =
                        grid.neighbour_at_direction(cell_coord, CompassPrimary::South)
                            .map_or(false, |c| grid.is_neighbour_linked(c, CompassPrimary::East));
                    let show_right_section = !access_se_from_east;
                    let show_down_section = !access_se_from_south;
                    let show_up_section = !east_open;
                    let show_left_section = !south_open;

                    match (show_left_section,
                           show_right_section,
                           show_up_section,
                           show_down_section) {
                        (true, true, true, true) => WALL_LRUD,
                        (true, true, true, false) => WALL_LRU,
                        (true, true, false, true) => WALL_LRD,
                        (true, false, true, true) => WALL_LUD,
                        (false, true, true, true) => WALL_RUD,
                        (true, true, false, false) => WALL_LR,
                        (false, false, true, true) => WALL_UD,
                        (false, true, true, false) => WALL_RU,
                        (true, false, false, true) => WALL_LD,
                        (true, false, true, false) => WALL_LU,
                        (false, true, false, true) => WALL_RD,
                        (true, false, false, false) => WALL_L,
                        (false, true, false, false) => WALL_R,
                        (false, false, true, false) => WALL_U,
                        (false, false, false, true) => WALL_D,
                        _ => " ",
                    }
                }
            };

            row_bottom_section_render.push_str(corner);
        }

        output.push_str(&row_middle_section_render);
        output.push('\n');
        output.push_str(&row_bottom_section_render);
        output.push('\n');
    }

    output
}
