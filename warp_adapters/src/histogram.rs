use std::ops::{Index, IndexMut};

use crate::WarpError;

/// Dense row-major 2D grid of non-negative cell values.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
  width: usize,
  height: usize,
  cells: Vec<f64>,
}

impl Histogram {
  pub fn new(width: usize, height: usize) -> Result<Self, WarpError> {
    if width == 0 || height == 0 {
      return Err(WarpError::InvalidGridSize { width, height });
    }

    Ok(Histogram {
      width,
      height,
      cells: vec![0.; width * height],
    })
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.height
  }

  pub fn dims(&self) -> (usize, usize) {
    (self.width, self.height)
  }

  pub fn cells(&self) -> &[f64] {
    &self.cells
  }

  pub fn total(&self) -> f64 {
    self.cells.iter().sum()
  }

  /// Index of the cell containing a point given in normalized [0, 1]^2 grid coordinates.  The
  /// upper edges are folded into the last row and column.
  pub fn cell_index(&self, u: f64, v: f64) -> Option<usize> {
    if !(0. ..=1.).contains(&u) || !(0. ..=1.).contains(&v) {
      return None;
    }

    let x = ((u * self.width as f64) as usize).min(self.width - 1);
    let y = ((v * self.height as f64) as usize).min(self.height - 1);
    Some(y * self.width + x)
  }

  /// Adds `amount` to the cell containing (`u`, `v`).  Returns `false` if the point lies outside
  /// of the grid, in which case nothing is recorded.
  pub fn accumulate(&mut self, u: f64, v: f64, amount: f64) -> bool {
    match self.cell_index(u, v) {
      Some(ix) => {
        self.cells[ix] += amount;
        true
      }
      None => false,
    }
  }

  pub fn ensure_same_dims(&self, other: &Histogram) -> Result<(), WarpError> {
    if self.dims() != other.dims() {
      return Err(WarpError::HistogramMismatch {
        observed: self.dims(),
        expected: other.dims(),
      });
    }
    Ok(())
  }
}

impl Index<(usize, usize)> for Histogram {
  type Output = f64;

  fn index(&self, (x, y): (usize, usize)) -> &f64 {
    &self.cells[y * self.width + x]
  }
}

impl IndexMut<(usize, usize)> for Histogram {
  fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut f64 {
    &mut self.cells[y * self.width + x]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_zero_sized_grid_rejected() {
    assert!(Histogram::new(0, 4).is_err());
    assert!(Histogram::new(4, 0).is_err());
  }

  #[test]
  fn test_accumulate() {
    let mut hist = Histogram::new(4, 2).unwrap();
    assert!(hist.accumulate(0., 0., 1.));
    assert!(hist.accumulate(1., 1., 2.));
    assert!(hist.accumulate(0.3, 0.6, 0.5));
    assert!(!hist.accumulate(1.2, 0.5, 9.));
    assert!(!hist.accumulate(0.5, -0.1, 9.));
    assert!(!hist.accumulate(f64::NAN, 0.5, 9.));

    assert_eq!(hist[(0, 0)], 1.);
    assert_eq!(hist[(3, 1)], 2.);
    assert_eq!(hist[(1, 1)], 0.5);
    assert_eq!(hist.total(), 3.5);
  }

  #[test]
  fn test_mismatched_dims() {
    let a = Histogram::new(4, 4).unwrap();
    let b = Histogram::new(4, 5).unwrap();
    assert!(a.ensure_same_dims(&a.clone()).is_ok());
    assert_eq!(
      a.ensure_same_dims(&b).unwrap_err(),
      WarpError::HistogramMismatch {
        observed: (4, 4),
        expected: (4, 5),
      }
    );
  }
}
