//! Text encoding of a maze.
//!
//! ```text
//! 9515391539551795151151153
//! EBABAE812853C1412BA812812
//! ...
//!
//! 0,0
//! 19,24
//! SESSWSSEE...
//! ```
//!
//! One upper case hex digit per cell holding its wall mask, one line per grid row. A blank
//! line follows, then the entry and exit cells as `row,col`, then optionally the solution as
//! one direction letter per step.

use crate::cells::{offset_coordinate, CompassPrimary, Coordinate, WallMask};
use crate::errors::*;
use crate::grid::Grid;
use crate::units::{Height, Width};

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// A decoded maze artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMaze {
    pub grid: Grid,
    pub entry: Coordinate,
    pub exit: Coordinate,
    pub path: Option<Vec<Coordinate>>,
}

/// The hex body: one line of `width` digits per row, each line newline terminated.
pub fn encode_grid(grid: &Grid) -> String {
    let mut out = String::with_capacity(grid.size() + grid.height());
    for row in grid.iter_row() {
        for coord in row {
            let mask = grid.wall_mask(coord).unwrap_or(WallMask::ALL_WALLS);
            out.push(char::from(HEX_DIGITS[usize::from(mask.bits())]));
        }
        out.push('\n');
    }
    out
}

/// Parse a hex body for a grid of known dimensions. Line breaks are ignored, so the digits
/// may be laid out in rows or as one run.
pub fn decode_grid(body: &str, width: Width, height: Height) -> Result<Grid> {
    let masks = body.chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .map(hex_digit_to_mask)
        .collect::<Result<Vec<WallMask>>>()?;
    Grid::from_wall_masks(width, height, masks)
}

/// Full artifact text, with the solution line when `path` is given.
///
/// The path must run from `entry` to `exit`, each step through an open wall.
pub fn encode(grid: &Grid,
              entry: Coordinate,
              exit: Coordinate,
              path: Option<&[Coordinate]>)
              -> Result<String> {

    for (name, coord) in &[("entry", entry), ("exit", exit)] {
        if !grid.is_valid_coordinate(*coord) {
            bail!(ErrorKind::InvalidConfiguration(format!("{} {} is outside the grid", name, coord)));
        }
    }

    let mut out = encode_grid(grid);
    out.push('\n');
    out.push_str(&format!("{}\n{}\n", entry, exit));

    if let Some(path) = path {
        if path.first() != Some(&entry) || path.last() != Some(&exit) {
            bail!(ErrorKind::InvalidConfiguration(format!("path does not run from {} to {}",
                                                          entry, exit)));
        }
        if let Some(pair) = path.windows(2).find(|pair| !grid.is_linked(pair[0], pair[1])) {
            bail!(ErrorKind::InvalidEdge(pair[0], pair[1]));
        }
        out.push_str(&path_to_directions(path)?);
        out.push('\n');
    }

    Ok(out)
}

/// Parse and check a full artifact. Anything the encoder could not have produced for a valid
/// grid is a `MalformedEncoding`.
pub fn decode(text: &str) -> Result<EncodedMaze> {
    let mut lines = text.lines();

    let body: Vec<&str> = lines.by_ref().take_while(|line| !line.is_empty()).collect();
    let row_length = body.first().map_or(0, |row| row.chars().count());
    if row_length == 0 {
        bail!(ErrorKind::MalformedEncoding(String::from("empty maze body")));
    }
    if let Some((index, _)) = body.iter()
        .enumerate()
        .find(|(_, row)| row.chars().count() != row_length) {
        bail!(ErrorKind::MalformedEncoding(format!("row {} is not {} cells wide", index, row_length)));
    }

    let entry_line = lines.next()
        .ok_or_else(|| malformed("missing blank line and entry coordinate"))?;
    let exit_line = lines.next().ok_or_else(|| malformed("missing exit coordinate"))?;
    let path_line = lines.next();
    if let Some(extra) = lines.find(|line| !line.trim().is_empty()) {
        bail!(ErrorKind::MalformedEncoding(format!("unexpected trailing line {:?}", extra)));
    }

    let grid = decode_grid(&body.concat(), Width(row_length), Height(body.len()))?;
    let entry = parse_coordinate(&grid, entry_line)?;
    let exit = parse_coordinate(&grid, exit_line)?;

    let path = match path_line {
        Some(letters) => {
            let path = directions_to_path(&grid, entry, letters.trim())?;
            if path.last() != Some(&exit) {
                bail!(ErrorKind::MalformedEncoding(format!("path does not end at the exit {}", exit)));
            }
            Some(path)
        }
        None => None,
    };

    Ok(EncodedMaze {
        grid,
        entry,
        exit,
        path,
    })
}

/// One direction letter per step between consecutive cells.
pub fn path_to_directions(path: &[Coordinate]) -> Result<String> {
    path.windows(2)
        .map(|pair| {
            CompassPrimary::between(pair[0], pair[1])
                .map(CompassPrimary::letter)
                .ok_or_else(|| Error::from(ErrorKind::InvalidEdge(pair[0], pair[1])))
        })
        .collect()
}

/// Replay direction letters from `entry`. Every step must pass through an open wall.
pub fn directions_to_path(grid: &Grid, entry: Coordinate, letters: &str) -> Result<Vec<Coordinate>> {
    let mut path = Vec::with_capacity(letters.len() + 1);
    path.push(entry);
    let mut current = entry;

    for letter in letters.chars() {
        let direction = CompassPrimary::from_letter(letter)
            .ok_or_else(|| malformed(&format!("unknown direction {:?}", letter)))?;
        let next = offset_coordinate(current, direction)
            .filter(|_| grid.is_neighbour_linked(current, direction))
            .ok_or_else(|| malformed(&format!("step {:?} from {} crosses a wall", letter, current)))?;
        path.push(next);
        current = next;
    }

    Ok(path)
}

fn hex_digit_to_mask(c: char) -> Result<WallMask> {
    c.to_digit(16)
        .and_then(|d| WallMask::from_bits(d as u8))
        .ok_or_else(|| malformed(&format!("{:?} is not a hex digit", c)).into())
}

fn parse_coordinate(grid: &Grid, text: &str) -> Result<Coordinate> {
    let mut parts = text.split(',').map(|part| part.trim().parse::<usize>());
    let coord = match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(row)), Some(Ok(col)), None) => Coordinate::new(row, col),
        _ => bail!(ErrorKind::MalformedEncoding(format!("{:?} is not a row,col coordinate", text))),
    };
    if !grid.is_valid_coordinate(coord) {
        bail!(ErrorKind::MalformedEncoding(format!("coordinate {} is outside the grid", coord)));
    }
    Ok(coord)
}

fn malformed(reason: &str) -> ErrorKind {
    ErrorKind::MalformedEncoding(reason.to_string())
}


#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::generators::{self, LoopPolicy};
    use crate::pathing;

    fn gc(row: usize, col: usize) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn maze(w: usize, h: usize, seed: u64, loops: bool) -> Grid {
        let mut g = Grid::new(Width(w), Height(h)).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(seed);
        generators::wilson(&mut g, gc(0, 0), &mut rng, None).unwrap();
        if loops {
            generators::break_walls(&mut g, &LoopPolicy::Probability(0.2), &mut rng).unwrap();
        }
        g
    }

    fn assert_malformed(result: Result<EncodedMaze>) {
        let err = result.expect_err("decoding should fail");
        assert!(matches!(err.kind(), ErrorKind::MalformedEncoding(_)), "{}", err);
    }

    #[test]
    fn encode_corridor() {
        let mut g = Grid::new(Width(3), Height(2)).unwrap();
        g.remove_wall_between(gc(0, 0), gc(0, 1)).unwrap();
        g.remove_wall_between(gc(0, 1), gc(0, 2)).unwrap();
        g.remove_wall_between(gc(0, 2), gc(1, 2)).unwrap();
        g.remove_wall_between(gc(1, 2), gc(1, 1)).unwrap();
        g.remove_wall_between(gc(1, 1), gc(1, 0)).unwrap();

        assert_eq!(encode_grid(&g), "D53\nD56\n");

        let path = [gc(0, 0), gc(0, 1), gc(0, 2), gc(1, 2), gc(1, 1)];
        let text = encode(&g, gc(0, 0), gc(1, 1), Some(&path[..])).unwrap();
        assert_eq!(text, "D53\nD56\n\n0,0\n1,1\nEESW\n");

        let text = encode(&g, gc(0, 0), gc(1, 1), None).unwrap();
        assert_eq!(text, "D53\nD56\n\n0,0\n1,1\n");
    }

    #[test]
    fn decode_accepts_lower_case() {
        let decoded = decode("d53\nd56\n\n0,0\n1,1\nEESW\n").unwrap();
        assert_eq!(decoded.grid.width(), 3);
        assert_eq!(decoded.grid.height(), 2);
        assert_eq!(decoded.path, Some(vec![gc(0, 0), gc(0, 1), gc(0, 2), gc(1, 2), gc(1, 1)]));
        assert_eq!(encode_grid(&decoded.grid), "D53\nD56\n");
    }

    #[test]
    fn decode_without_path() {
        let decoded = decode("D53\nD56\n\n0,0\n1,1\n").unwrap();
        assert_eq!(decoded.entry, gc(0, 0));
        assert_eq!(decoded.exit, gc(1, 1));
        assert_eq!(decoded.path, None);
    }

    #[test]
    fn single_cell_path_round_trip() {
        let g = Grid::new(Width(1), Height(1)).unwrap();
        let text = encode(&g, gc(0, 0), gc(0, 0), Some(&[gc(0, 0)][..])).unwrap();
        assert_eq!(text, "F\n\n0,0\n0,0\n\n");
        let decoded = decode(&text).unwrap();
        assert_eq!(decoded.path, Some(vec![gc(0, 0)]));
        assert_eq!(decoded.grid, g);
    }

    #[test]
    fn digit_count_must_match_dimensions() {
        let g = maze(4, 3, 8, false);
        let body = encode_grid(&g);
        assert_eq!(decode_grid(&body, Width(4), Height(3)).unwrap(), g);

        let short = &body[..body.len() - 2];
        let err = decode_grid(short, Width(4), Height(3)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MalformedEncoding(_)));

        let long = format!("{}F", body);
        let err = decode_grid(&long, Width(4), Height(3)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MalformedEncoding(_)));
    }

    #[test]
    fn rejects_non_hex_digits() {
        let err = decode_grid("G", Width(1), Height(1)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MalformedEncoding(_)));
        assert_malformed(decode("D5 \nD56\n\n0,0\n1,1\n"));
    }

    #[test]
    fn rejects_broken_layout() {
        // ragged rows
        assert_malformed(decode("D53\nD5\n\n0,0\n1,1\n"));
        // no blank separator
        assert_malformed(decode("D53\nD56\n"));
        // missing exit
        assert_malformed(decode("D53\nD56\n\n0,0\n"));
        // empty body
        assert_malformed(decode("\n0,0\n0,0\n"));
        // bad coordinates
        assert_malformed(decode("D53\nD56\n\n0;0\n1,1\n"));
        assert_malformed(decode("D53\nD56\n\n0,0\n2,1\n"));
        assert_malformed(decode("D53\nD56\n\n0,0,0\n1,1\n"));
        // trailing garbage
        assert_malformed(decode("D53\nD56\n\n0,0\n1,1\nEESW\nEESW\n"));
    }

    #[test]
    fn rejects_bad_paths() {
        // unknown letter
        assert_malformed(decode("D53\nD56\n\n0,0\n1,1\nEEXW\n"));
        // through a wall
        assert_malformed(decode("D53\nD56\n\n0,0\n1,1\nS\n"));
        // off the grid
        assert_malformed(decode("D53\nD56\n\n0,0\n1,1\nN\n"));
        // stops short of the exit
        assert_malformed(decode("D53\nD56\n\n0,0\n1,1\nEES\n"));
    }

    #[test]
    fn rejects_broken_wall_invariants() {
        // cell 0,0 claims an open east wall that cell 0,1 does not agree with
        assert_malformed(decode("DF\n\n0,0\n0,1\n"));
        // open north boundary
        assert_malformed(decode("E\n\n0,0\n0,0\n"));
    }

    #[test]
    fn encode_checks_its_inputs() {
        let g = maze(3, 3, 1, false);
        let err = encode(&g, gc(0, 0), gc(3, 3), None).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidConfiguration(_)));

        let err = encode(&g, gc(0, 0), gc(2, 2), Some(&[gc(0, 0)][..])).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidConfiguration(_)));

        let err = path_to_directions(&[gc(0, 0), gc(1, 1)]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidEdge(_, _)));
    }

    #[test]
    fn encode_refuses_a_path_through_a_wall() {
        let walled = Grid::new(Width(2), Height(1)).unwrap();
        let path = [gc(0, 0), gc(0, 1)];
        let err = encode(&walled, gc(0, 0), gc(0, 1), Some(&path[..])).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidEdge(a, b) if *a == gc(0, 0) && *b == gc(0, 1)));

        let mut open = walled.clone();
        open.remove_wall_between(gc(0, 0), gc(0, 1)).unwrap();
        let text = encode(&open, gc(0, 0), gc(0, 1), Some(&path[..])).unwrap();
        assert_eq!(decode(&text).unwrap().path, Some(path.to_vec()));
    }

    #[test]
    fn directions_round_trip_on_a_solved_maze() {
        let g = maze(10, 10, 77, true);
        let path = pathing::shortest_path(&g, gc(0, 0), gc(9, 9)).unwrap();
        let letters = path_to_directions(&path).unwrap();
        assert_eq!(letters.len(), path.len() - 1);
        assert_eq!(directions_to_path(&g, gc(0, 0), &letters).unwrap(), path);
    }

    #[test]
    fn encode_decode_round_trip() {
        fn p(seed: u64, w: u8, h: u8, loops: bool, with_path: bool) -> TestResult {
            let (w, h) = (usize::from(w % 10) + 1, usize::from(h % 10) + 1);
            let g = maze(w, h, seed, loops);
            let (entry, exit) = (gc(0, 0), gc(h - 1, w - 1));
            let path = match pathing::shortest_path(&g, entry, exit) {
                Ok(path) => path,
                Err(_) => return TestResult::failed(),
            };
            let encoded_path = if with_path { Some(path.as_slice()) } else { None };
            let text = match encode(&g, entry, exit, encoded_path) {
                Ok(text) => text,
                Err(_) => return TestResult::failed(),
            };
            let expected_path = if with_path { Some(path.clone()) } else { None };
            match decode(&text) {
                Ok(decoded) => {
                    TestResult::from_bool(decoded.grid == g && decoded.entry == entry &&
                                          decoded.exit == exit && decoded.path == expected_path)
                }
                Err(_) => TestResult::failed(),
            }
        }
        quickcheck(p as fn(u64, u8, u8, bool, bool) -> TestResult)
    }
}
