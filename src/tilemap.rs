/// A fixed-size 2D grid stored row-major. Coordinates do not wrap.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T> Tilemap<T> {
    /// Build from row-major cells. Returns `None` if the count is wrong.
    pub fn from_cells(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height).then_some(Self { width, height, data })
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    /// Orthogonal neighbors inside the grid.
    pub fn neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(4);
        if x > 0 {
            result.push((x - 1, y));
        }
        if x + 1 < self.width {
            result.push((x + 1, y));
        }
        if y > 0 {
            result.push((x, y - 1));
        }
        if y + 1 < self.height {
            result.push((x, y + 1));
        }
        result
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let map = Tilemap::from_cells(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(*map.get(2, 0), 2);
        assert_eq!(*map.get(0, 1), 3);
        let coords: Vec<_> = map.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords[4], (1, 1));

        assert!(Tilemap::from_cells(3, 2, vec![0; 5]).is_none());
    }

    #[test]
    fn test_neighbors_stop_at_edges() {
        let map = Tilemap::from_cells(6, 6, vec![0u8; 36]).unwrap();
        assert_eq!(map.neighbors(0, 0), vec![(1, 0), (0, 1)]);
        assert_eq!(map.neighbors(5, 5), vec![(4, 5), (5, 4)]);
        assert_eq!(map.neighbors(2, 3).len(), 4);
    }
}
