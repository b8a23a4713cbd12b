//! Random soups for benchmarks and smoke runs.

use rand::{Rng, SeedableRng};

use crate::life::Board;

/// A `width × height` rectangle anchored at the origin, each cell alive with
/// probability `density`.
pub fn random_board<R: Rng>(width: i64, height: i64, density: f64, rng: &mut R) -> Board {
    let mut board = Board::new();
    for y in 0..height {
        for x in 0..width {
            if rng.random::<f64>() < density {
                board.set_cell(x, y, true);
            }
        }
    }
    board
}

/// [`random_board`] driven by a seeded `StdRng`, so runs are reproducible.
pub fn random_board_seeded(width: i64, height: i64, density: f64, seed: u64) -> Board {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    random_board(width, height, density, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::{random_board, random_board_seeded};

    #[test]
    fn same_seed_same_soup() {
        let a = random_board_seeded(64, 32, 0.5, 0x5EED_1234_ABCD_EF01);
        let b = random_board_seeded(64, 32, 0.5, 0x5EED_1234_ABCD_EF01);
        assert_eq!(a, b);
    }

    #[test]
    fn soup_stays_inside_requested_extent() {
        let board = random_board_seeded(20, 10, 0.5, 7);
        let (min_x, min_y, max_x, max_y) = board.bounds().unwrap();
        assert!(min_x >= 0 && min_y >= 0);
        assert!(max_x < 20 && max_y < 10);
    }

    #[test]
    fn density_extremes() {
        let mut rng = rand::rng();
        assert!(random_board(16, 16, 0.0, &mut rng).is_empty());
        assert_eq!(random_board(16, 16, 1.0, &mut rng).population(), 256);
    }

    #[test]
    fn half_density_is_roughly_half() {
        let board = random_board_seeded(100, 100, 0.5, 42);
        let pop = board.population();
        assert!((4_000..6_000).contains(&pop), "population {pop}");
    }
}
