//! Active falling piece: shape instance, position, and rotation

use crate::tetromino::PieceType;

/// Position of a piece's bounding-box origin within the board grid
///
/// x increases rightward, y increases downward; y may be negative while a
/// piece is partially above the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Spawn origin for every new or swapped-in piece
    pub fn spawn() -> Self {
        Self { x: 4, y: 0 }
    }
}

/// A piece instance: a catalog type plus its current shape matrix
///
/// The matrix starts as the catalog's spawn orientation and is replaced (never
/// mutated in place) by [`Piece::rotated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceType,
    pub shape: Vec<Vec<u8>>,
}

impl Piece {
    /// Create a piece in its spawn orientation
    pub fn new(kind: PieceType) -> Self {
        Self {
            kind,
            shape: kind.shape(),
        }
    }

    /// Produce this piece rotated 90 degrees clockwise
    ///
    /// The transform swaps the matrix dimensions: `new[col][rows-1-row] =
    /// old[row][col]`. No wall-kick correction exists anywhere in the game;
    /// callers reject the rotation outright if the result does not fit.
    pub fn rotated(&self) -> Piece {
        let rows = self.shape.len();
        let cols = self.shape[0].len();
        let mut rotated = vec![vec![0u8; rows]; cols];

        for (row, cells) in self.shape.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                rotated[col][rows - 1 - row] = cell;
            }
        }

        Piece {
            kind: self.kind,
            shape: rotated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_swaps_dimensions() {
        let piece = Piece::new(PieceType::I);
        assert_eq!(piece.shape.len(), 1);
        assert_eq!(piece.shape[0].len(), 4);

        let rotated = piece.rotated();
        assert_eq!(rotated.shape.len(), 4);
        assert_eq!(rotated.shape[0].len(), 1);
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        for kind in PieceType::ALL {
            let piece = Piece::new(kind);
            let back = piece.rotated().rotated().rotated().rotated();
            assert_eq!(back.shape, piece.shape, "{:?} should return to spawn", kind);
        }
    }

    #[test]
    fn test_rotation_does_not_touch_catalog() {
        let piece = Piece::new(PieceType::T);
        let _ = piece.rotated();
        assert_eq!(piece.shape, PieceType::T.shape());
    }

    #[test]
    fn test_t_rotation_geometry() {
        // [[0,1,0],      [[1,0],
        //  [1,1,1]]  ->   [1,1],
        //                 [1,0]]
        let rotated = Piece::new(PieceType::T).rotated();
        assert_eq!(rotated.shape, vec![vec![1, 0], vec![1, 1], vec![1, 0]]);
    }

    #[test]
    fn test_spawn_position() {
        let pos = Position::spawn();
        assert_eq!((pos.x, pos.y), (4, 0));
    }
}
