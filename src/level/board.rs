use serde::Serialize;

/// Width and height of every level board, in tiles
pub const BOARD_SIZE: usize = 64;

/// Number of cells on a board
pub const BOARD_TILES: usize = BOARD_SIZE * BOARD_SIZE;

/// Cell address in the external tile-sheet image
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct TileRef {
    pub column: u16,
    pub row: u16,
}

impl TileRef {
    pub fn new(column: u16, row: u16) -> Self {
        Self { column, row }
    }

    /// Map a linear tile index onto the sheet. The sheet stores 16-wide
    /// strips of 32 rows side by side.
    pub fn from_index(t: u16) -> Self {
        let tx = t % 16;
        let ty = t / 16;
        Self {
            column: (ty / 32) * 16 + tx,
            row: ty % 32,
        }
    }

    /// Inverse of `from_index`.
    pub fn index(self) -> u16 {
        let ty = (self.column / 16) * 32 + self.row;
        ty * 16 + self.column % 16
    }
}

/// 64x64 grid of tile references, row-major
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Board {
    tiles: Vec<TileRef>,
}

impl Board {
    pub fn new() -> Self {
        Self { tiles: vec![TileRef::default(); BOARD_TILES] }
    }

    /// Build a board from exactly `BOARD_TILES` linear tile indices.
    pub fn from_indices(indices: &[u16]) -> Option<Self> {
        if indices.len() != BOARD_TILES {
            return None;
        }
        Some(Self { tiles: indices.iter().map(|&t| TileRef::from_index(t)).collect() })
    }

    pub fn get(&self, x: usize, y: usize) -> Option<TileRef> {
        if x >= BOARD_SIZE || y >= BOARD_SIZE {
            return None;
        }
        Some(self.tiles[y * BOARD_SIZE + x])
    }

    /// Set one cell; writes outside the board are ignored.
    pub fn set(&mut self, x: usize, y: usize, tile: TileRef) -> bool {
        if x >= BOARD_SIZE || y >= BOARD_SIZE {
            return false;
        }
        self.tiles[y * BOARD_SIZE + x] = tile;
        true
    }

    pub fn tiles(&self) -> &[TileRef] {
        &self.tiles
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TileRef]> {
        self.tiles.chunks(BOARD_SIZE)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retiling_formula() {
        assert_eq!(TileRef::from_index(0), TileRef::new(0, 0));
        assert_eq!(TileRef::from_index(15), TileRef::new(15, 0));
        assert_eq!(TileRef::from_index(16), TileRef::new(0, 1));
        // ty = 32 starts the second strip
        assert_eq!(TileRef::from_index(512), TileRef::new(16, 0));
        assert_eq!(TileRef::from_index(4095), TileRef::new(127, 31));
    }

    #[test]
    fn test_index_inverts_from_index() {
        for t in [0u16, 1, 17, 511, 512, 1000, 4095, 8191] {
            assert_eq!(TileRef::from_index(t).index(), t);
        }
    }

    #[test]
    fn test_board_bounds() {
        let mut board = Board::new();
        assert!(board.set(63, 63, TileRef::new(1, 2)));
        assert!(!board.set(64, 0, TileRef::new(1, 2)));
        assert_eq!(board.get(63, 63), Some(TileRef::new(1, 2)));
        assert_eq!(board.get(0, 64), None);
        assert_eq!(board.rows().count(), BOARD_SIZE);
    }

    #[test]
    fn test_from_indices_is_row_major() {
        let indices: Vec<u16> = (0..BOARD_TILES as u16).map(|i| i % 7).collect();
        let board = Board::from_indices(&indices).unwrap();
        assert_eq!(board.get(1, 0), Some(TileRef::from_index(1)));
        assert_eq!(board.get(0, 1), Some(TileRef::from_index(64 % 7)));
        assert!(Board::from_indices(&indices[1..]).is_none());
    }
}
