use crate::cells::Coordinate;

/// Visits every cell of a grid in row-major order.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    row_length: usize,
    cells_count: usize,
}

impl CellIter {
    pub(crate) fn new(row_length: usize, cells_count: usize) -> CellIter {
        CellIter {
            current_cell_number: 0,
            row_length,
            cells_count,
        }
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Coordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = Coordinate::from_row_major_index(self.current_cell_number,
                                                         self.row_length);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

#[derive(Debug, Copy, Clone)]
pub(crate) enum BatchIterType {
    Row,
    Column,
}

/// Yields whole rows (north to south) or whole columns (west to east) at a time.
#[derive(Debug, Copy, Clone)]
pub struct BatchIter {
    iter_type: BatchIterType,
    current_index: usize,
    width: usize,
    height: usize,
}

impl BatchIter {
    pub(crate) fn new(iter_type: BatchIterType, width: usize, height: usize) -> BatchIter {
        BatchIter {
            iter_type,
            current_index: 0,
            width,
            height,
        }
    }

    fn batches_count(&self) -> usize {
        match self.iter_type {
            BatchIterType::Row => self.height,
            BatchIterType::Column => self.width,
        }
    }
}

impl ExactSizeIterator for BatchIter {} // default impl using size_hint()
impl Iterator for BatchIter {
    type Item = Vec<Coordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.batches_count() {
            return None;
        }

        let index = self.current_index;
        let coords = match self.iter_type {
            BatchIterType::Row => (0..self.width).map(|col| Coordinate::new(index, col)).collect(),
            BatchIterType::Column => {
                (0..self.height).map(|row| Coordinate::new(row, index)).collect()
            }
        };
        self.current_index += 1;
        Some(coords)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.batches_count() - self.current_index;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
