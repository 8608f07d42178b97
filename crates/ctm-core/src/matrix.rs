//! Node-by-node matrices used by the trust aggregation
//!
//! Row `i` holds everything reported about node `i`; column `j` is the
//! reporting node.

use crate::{Note, NodeId, TrustError, TrustResult, Verdict};

/// Square row-major matrix
#[derive(Clone, Debug, PartialEq)]
pub struct SquareMatrix<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Clone + Default> SquareMatrix<T> {
    /// `size × size` matrix filled with `T::default()`
    pub fn new(size: usize) -> Self {
        SquareMatrix {
            size,
            cells: vec![T::default(); size * size],
        }
    }
}

impl<T: Clone> SquareMatrix<T> {
    /// Build from nested rows; every row must have `rows.len()` entries
    pub fn from_rows(rows: Vec<Vec<T>>) -> TrustResult<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            if row.len() != size {
                return Err(TrustError::DimensionMismatch {
                    expected: size,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }
        Ok(SquareMatrix { size, cells })
    }

    /// Number of nodes covered
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, target: usize, reporter: usize) -> Option<&T> {
        if target < self.size && reporter < self.size {
            self.cells.get(target * self.size + reporter)
        } else {
            None
        }
    }

    /// Set an entry; out-of-range coordinates are an error
    pub fn set(&mut self, target: usize, reporter: usize, value: T) -> TrustResult<()> {
        let bound = target.max(reporter);
        if bound >= self.size {
            return Err(TrustError::DimensionMismatch {
                expected: self.size,
                actual: bound + 1,
            });
        }
        self.cells[target * self.size + reporter] = value;
        Ok(())
    }

    /// Everything reported about `target`
    pub fn row(&self, target: usize) -> &[T] {
        let start = (target * self.size).min(self.cells.len());
        let end = (start + self.size).min(self.cells.len());
        &self.cells[start..end]
    }

    pub fn entry(&self, target: NodeId, reporter: NodeId) -> Option<&T> {
        self.get(target.index(), reporter.index())
    }
}

/// `W(i, j)`: node `j`'s weighted report about node `i`
pub type WeightMatrix = SquareMatrix<Verdict>;

/// `note(i, j)`: the note node `j` attached to its report about node `i`
pub type NoteMatrix = SquareMatrix<Note>;

impl WeightMatrix {
    /// Build from the numeric table encoding (`-1` = rejected)
    pub fn from_sentinels(rows: Vec<Vec<f64>>) -> TrustResult<Self> {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Verdict::from_sentinel).collect())
            .collect();
        Self::from_rows(rows)
    }

    /// Count of accepted entries
    pub fn accepted(&self) -> usize {
        self.cells.iter().filter(|v| v.is_accepted()).count()
    }
}

impl NoteMatrix {
    /// Build from numeric note codes
    pub fn from_codes(rows: Vec<Vec<i64>>) -> TrustResult<Self> {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Note::try_from).collect::<TrustResult<Vec<_>>>())
            .collect::<TrustResult<Vec<_>>>()?;
        Self::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RejectReason;

    #[test]
    fn test_new_matrix_is_rejected() {
        let w = WeightMatrix::new(3);
        assert_eq!(w.size(), 3);
        assert_eq!(w.accepted(), 0);
        assert!(w.row(1).iter().all(|v| v.is_rejected()));
    }

    #[test]
    fn test_from_rows_requires_square() {
        let err = NoteMatrix::from_rows(vec![vec![Note::Neutral; 2], vec![Note::Neutral; 3]])
            .unwrap_err();
        assert_eq!(err, TrustError::DimensionMismatch { expected: 2, actual: 3 });
    }

    #[test]
    fn test_set_and_row() {
        let mut w = WeightMatrix::new(2);
        w.set(1, 0, Verdict::Accepted(0.5)).unwrap();

        assert_eq!(w.row(1), &[Verdict::Accepted(0.5), Verdict::default()]);
        assert_eq!(
            w.entry(NodeId::new(1), NodeId::new(0)),
            Some(&Verdict::Accepted(0.5))
        );
        assert!(w.set(2, 0, Verdict::Accepted(1.0)).is_err());
    }

    #[test]
    fn test_from_sentinels() {
        let w = WeightMatrix::from_sentinels(vec![vec![0.2, -1.0], vec![-1.0, 0.0]]).unwrap();
        assert_eq!(w.get(0, 0), Some(&Verdict::Accepted(0.2)));
        assert_eq!(
            w.get(0, 1),
            Some(&Verdict::Rejected(RejectReason::InvalidContext))
        );
        assert_eq!(w.accepted(), 2);
    }

    #[test]
    fn test_notes_from_codes() {
        let n = NoteMatrix::from_codes(vec![vec![1, -1], vec![0, 1]]).unwrap();
        assert_eq!(n.get(0, 1), Some(&Note::Negative));
        assert!(NoteMatrix::from_codes(vec![vec![5]]).is_err());
    }
}
