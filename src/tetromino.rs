//! Piece catalog: the 7 tetromino types
//!
//! Each type carries an immutable spawn-orientation shape matrix, a display
//! color, and a stable integer identity used to tag locked board cells.

use ratatui::style::Color;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    I, // Cyan - long bar
    O, // Yellow - square
    T, // Purple - T-shape
    L, // Orange - L-shape
    J, // Blue - J-shape
    S, // Green - S-shape
    Z, // Red - Z-shape
}

impl PieceType {
    /// All types in identity order (the index is the identity)
    pub const ALL: [PieceType; 7] = [
        PieceType::I,
        PieceType::O,
        PieceType::T,
        PieceType::L,
        PieceType::J,
        PieceType::S,
        PieceType::Z,
    ];

    /// Stable integer identity (0..7); locked cells store `id + 1`
    pub fn id(&self) -> u8 {
        match self {
            PieceType::I => 0,
            PieceType::O => 1,
            PieceType::T => 2,
            PieceType::L => 3,
            PieceType::J => 4,
            PieceType::S => 5,
            PieceType::Z => 6,
        }
    }

    /// Look up a type by its identity
    pub fn from_id(id: u8) -> Option<PieceType> {
        Self::ALL.get(id as usize).copied()
    }

    /// Get the display color for this type
    pub fn color(&self) -> Color {
        match self {
            PieceType::I => Color::Cyan,
            PieceType::O => Color::Yellow,
            PieceType::T => Color::Magenta,
            PieceType::L => Color::Rgb(255, 127, 0), // Orange
            PieceType::J => Color::Blue,
            PieceType::S => Color::Green,
            PieceType::Z => Color::Red,
        }
    }

    /// Spawn-orientation shape matrix (rows x cols of occupancy bits)
    ///
    /// Rotated orientations are derived from this matrix; the catalog itself
    /// is never mutated.
    pub fn shape(&self) -> Vec<Vec<u8>> {
        let rows: &[&[u8]] = match self {
            PieceType::I => &[&[1, 1, 1, 1]],
            PieceType::O => &[&[1, 1], &[1, 1]],
            PieceType::T => &[&[0, 1, 0], &[1, 1, 1]],
            PieceType::L => &[&[1, 0, 0], &[1, 1, 1]],
            PieceType::J => &[&[0, 0, 1], &[1, 1, 1]],
            PieceType::S => &[&[1, 1, 0], &[0, 1, 1]],
            PieceType::Z => &[&[0, 1, 1], &[1, 1, 0]],
        };
        rows.iter().map(|r| r.to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_round_trip() {
        for piece_type in PieceType::ALL {
            assert_eq!(PieceType::from_id(piece_type.id()), Some(piece_type));
        }
        assert_eq!(PieceType::from_id(7), None);
    }

    #[test]
    fn test_shapes_have_four_blocks() {
        for piece_type in PieceType::ALL {
            let blocks: u8 = piece_type.shape().iter().flatten().sum();
            assert_eq!(blocks, 4, "{:?} should occupy 4 cells", piece_type);
        }
    }

    #[test]
    fn test_shapes_are_rectangular() {
        for piece_type in PieceType::ALL {
            let shape = piece_type.shape();
            let cols = shape[0].len();
            assert!(shape.iter().all(|row| row.len() == cols));
        }
    }
}
