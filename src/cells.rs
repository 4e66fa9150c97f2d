use smallvec::SmallVec;
use std::convert::From;
use std::fmt;

/// A cell position on the grid. Doubles as the node identity of the grid graph.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

pub type CoordinateSmallVec = SmallVec<[Coordinate; 4]>;
pub type CoordinateOptionSmallVec = SmallVec<[Option<Coordinate>; 4]>;

impl Coordinate {
    pub fn new(row: usize, col: usize) -> Coordinate {
        Coordinate { row, col }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, row_length: usize) -> Coordinate {
        Coordinate::new(index / row_length, index % row_length)
    }

    /// Manhattan distance, a lower bound for the length of any path between two cells.
    pub fn manhattan_distance(&self, other: Coordinate) -> usize {
        let rows = if self.row > other.row { self.row - other.row } else { other.row - self.row };
        let cols = if self.col > other.col { self.col - other.col } else { other.col - self.col };
        rows + cols
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    /// The fixed visiting order for neighbours. Searches rely on it for repeatable results.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    /// Bit of the wall on this side of a cell in a `WallMask`.
    #[inline]
    pub fn wall_bit(self) -> u8 {
        match self {
            CompassPrimary::North => 0b0001,
            CompassPrimary::East => 0b0010,
            CompassPrimary::South => 0b0100,
            CompassPrimary::West => 0b1000,
        }
    }

    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    pub fn letter(self) -> char {
        match self {
            CompassPrimary::North => 'N',
            CompassPrimary::South => 'S',
            CompassPrimary::East => 'E',
            CompassPrimary::West => 'W',
        }
    }

    pub fn from_letter(letter: char) -> Option<CompassPrimary> {
        match letter {
            'N' => Some(CompassPrimary::North),
            'S' => Some(CompassPrimary::South),
            'E' => Some(CompassPrimary::East),
            'W' => Some(CompassPrimary::West),
            _ => None,
        }
    }

    /// The direction that leads from `from` to the adjacent cell `to`, if they are adjacent.
    pub fn between(from: Coordinate, to: Coordinate) -> Option<CompassPrimary> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .find(|dir| offset_coordinate(from, *dir) == Some(to))
    }
}

/// Creates a new `Coordinate` offset 1 cell away in the given direction.
/// Returns None if the Coordinate is not representable. Grid bounds are not checked here.
pub fn offset_coordinate(coord: Coordinate, dir: CompassPrimary) -> Option<Coordinate> {
    let Coordinate { row, col } = coord;
    match dir {
        CompassPrimary::North => row.checked_sub(1).map(|r| Coordinate::new(r, col)),
        CompassPrimary::South => row.checked_add(1).map(|r| Coordinate::new(r, col)),
        CompassPrimary::East => col.checked_add(1).map(|c| Coordinate::new(row, c)),
        CompassPrimary::West => col.checked_sub(1).map(|c| Coordinate::new(row, c)),
    }
}

/// Per cell 4-bit wall state. A set bit is a closed wall on that side.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct WallMask(u8);

impl WallMask {
    pub const ALL_WALLS: WallMask = WallMask(0b1111);

    /// None if `bits` does not fit in 4 bits.
    pub fn from_bits(bits: u8) -> Option<WallMask> {
        if bits <= 0b1111 {
            Some(WallMask(bits))
        } else {
            None
        }
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn has_wall(self, dir: CompassPrimary) -> bool {
        self.0 & dir.wall_bit() != 0
    }

    #[inline]
    pub(crate) fn without(self, dir: CompassPrimary) -> WallMask {
        WallMask(self.0 & !dir.wall_bit())
    }
}

impl Default for WallMask {
    fn default() -> WallMask {
        WallMask::ALL_WALLS
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn wall_bits_are_distinct_and_cover_the_nibble() {
        let all = CompassPrimary::ALL.iter().fold(0, |acc, dir| {
            assert_eq!(acc & dir.wall_bit(), 0);
            acc | dir.wall_bit()
        });
        assert_eq!(all, 0b1111);
        assert_eq!(CompassPrimary::North.wall_bit(), 1);
        assert_eq!(CompassPrimary::East.wall_bit(), 2);
        assert_eq!(CompassPrimary::South.wall_bit(), 4);
        assert_eq!(CompassPrimary::West.wall_bit(), 8);
    }

    #[test]
    fn opposites() {
        for dir in CompassPrimary::ALL.iter() {
            assert_ne!(dir.opposite(), *dir);
            assert_eq!(dir.opposite().opposite(), *dir);
        }
    }

    #[test]
    fn offsets_at_the_origin() {
        let origin = Coordinate::new(0, 0);
        assert_eq!(offset_coordinate(origin, CompassPrimary::North), None);
        assert_eq!(offset_coordinate(origin, CompassPrimary::West), None);
        assert_eq!(offset_coordinate(origin, CompassPrimary::South),
                   Some(Coordinate::new(1, 0)));
        assert_eq!(offset_coordinate(origin, CompassPrimary::East),
                   Some(Coordinate::new(0, 1)));
    }

    #[test]
    fn direction_between_cells() {
        let c = Coordinate::new(2, 2);
        assert_eq!(CompassPrimary::between(c, Coordinate::new(1, 2)), Some(CompassPrimary::North));
        assert_eq!(CompassPrimary::between(c, Coordinate::new(2, 1)), Some(CompassPrimary::West));
        assert_eq!(CompassPrimary::between(c, Coordinate::new(3, 3)), None);
        assert_eq!(CompassPrimary::between(c, c), None);
    }

    #[test]
    fn letters_round_trip() {
        for dir in CompassPrimary::ALL.iter() {
            assert_eq!(CompassPrimary::from_letter(dir.letter()), Some(*dir));
        }
        assert_eq!(CompassPrimary::from_letter('x'), None);
    }

    #[test]
    fn wall_mask_bits() {
        assert_eq!(WallMask::from_bits(16), None);
        let mask = WallMask::ALL_WALLS.without(CompassPrimary::East);
        assert_eq!(mask.bits(), 0b1101);
        assert!(!mask.has_wall(CompassPrimary::East));
        assert!(mask.has_wall(CompassPrimary::West));
        assert_eq!(WallMask::default(), WallMask::ALL_WALLS);
    }

    #[test]
    fn manhattan() {
        assert_eq!(Coordinate::new(0, 0).manhattan_distance(Coordinate::new(4, 4)), 8);
        assert_eq!(Coordinate::new(3, 1).manhattan_distance(Coordinate::new(1, 2)), 3);
    }
}
