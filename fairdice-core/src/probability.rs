use crate::Die;
use serde::Serialize;

/// A die against itself is a coin flip by convention, not a computed value
pub const SELF_MATCHUP: f64 = 0.5;

/// Pairwise odds: `get(i, j)` is the chance a throw of die `i` is strictly
/// higher than a throw of die `j`. Ties count for neither side, so
/// `get(i, j) + get(j, i)` can be less than one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityMatrix {
    cells: Vec<Vec<f64>>,
}

impl ProbabilityMatrix {
    pub fn compute(dice: &[Die]) -> Self {
        let cells = dice
            .iter()
            .enumerate()
            .map(|(i, row_die)| {
                dice.iter()
                    .enumerate()
                    .map(|(j, column_die)| {
                        if i == j {
                            SELF_MATCHUP
                        } else {
                            win_probability(row_die, column_die)
                        }
                    })
                    .collect()
            })
            .collect();

        tracing::debug!("Computed matchup odds for {} dice", dice.len());
        Self { cells }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.cells.get(row)?.get(column).copied()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.cells
    }

    /// Dice that no other die beats with better than even odds
    pub fn undominated(&self) -> Vec<usize> {
        (0..self.size())
            .filter(|&i| (0..self.size()).all(|j| i == j || self.cells[j][i] <= SELF_MATCHUP))
            .collect()
    }
}

/// Exact probability that `a` throws strictly higher than `b`, by
/// enumerating every face pair.
pub fn win_probability(a: &Die, b: &Die) -> f64 {
    let total = a.len() * b.len();
    if total == 0 {
        return 0.0;
    }

    let wins = a
        .faces()
        .iter()
        .map(|x| b.faces().iter().filter(|y| x > y).count())
        .sum::<usize>();

    wins as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn die(faces: &[i64]) -> Die {
        Die::new(faces.to_vec()).unwrap()
    }

    fn classic() -> Vec<Die> {
        vec![
            die(&[2, 2, 4, 4, 9, 9]),
            die(&[6, 8, 1, 1, 8, 6]),
            die(&[7, 5, 3, 7, 5, 3]),
        ]
    }

    #[test]
    fn test_diagonal_is_even() {
        let matrix = ProbabilityMatrix::compute(&classic());
        assert_eq!(matrix.size(), 3);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), Some(SELF_MATCHUP));
        }
    }

    #[test]
    fn test_classic_non_transitive_cycle() {
        let matrix = ProbabilityMatrix::compute(&classic());
        let edge = 20.0 / 36.0;

        // A beats B, B beats C, C beats A
        for (winner, loser) in [(0, 1), (1, 2), (2, 0)] {
            let p = matrix.get(winner, loser).unwrap();
            assert!((p - edge).abs() < 1e-12);
            assert!(p > 0.5);
            assert!(matrix.get(loser, winner).unwrap() < 0.5);
        }

        assert!(matrix.undominated().is_empty());
    }

    #[test]
    fn test_ties_count_for_neither_side() {
        let a = die(&[1, 2]);
        let b = die(&[1, 2]);
        assert_eq!(win_probability(&a, &b), 0.25);
        assert_eq!(win_probability(&b, &a), 0.25);
    }

    #[test]
    fn test_uneven_face_counts() {
        let a = die(&[3]);
        let b = die(&[1, 2, 3, 4]);
        assert_eq!(win_probability(&a, &b), 0.5);
        assert_eq!(win_probability(&b, &a), 0.25);
    }

    #[test]
    fn test_dominating_die() {
        let dice = vec![die(&[1, 1]), die(&[0, 0]), die(&[2, 2])];
        let matrix = ProbabilityMatrix::compute(&dice);
        assert_eq!(matrix.get(2, 0), Some(1.0));
        assert_eq!(matrix.get(0, 2), Some(0.0));
        assert_eq!(matrix.undominated(), vec![2]);
        assert_eq!(matrix.get(3, 0), None);
    }
}
