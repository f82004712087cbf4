//! Row-aligned feature/label pairs consumed by evaluation strategies.

/// A dataset of row-aligned inputs and targets.
///
/// Rows are opaque to the engine: it only needs the row count, stable
/// indexing, and subsetting for fold and split construction. `X` is the
/// per-row feature type (e.g. `Vec<f64>`), `Y` the per-row target.
#[derive(Clone, Debug)]
pub struct Dataset<X, Y> {
    inputs: Vec<X>,
    targets: Vec<Y>,
}

impl<X, Y> Dataset<X, Y> {
    /// Creates a dataset from row-aligned inputs and targets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`](crate::Error::LengthMismatch) if
    /// the two sides disagree on row count.
    pub fn new(inputs: Vec<X>, targets: Vec<Y>) -> crate::Result<Self> {
        if inputs.len() != targets.len() {
            return Err(crate::Error::LengthMismatch {
                inputs: inputs.len(),
                targets: targets.len(),
            });
        }
        Ok(Self { inputs, targets })
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Returns `true` if the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Returns the input rows.
    #[must_use]
    pub fn inputs(&self) -> &[X] {
        &self.inputs
    }

    /// Returns the target rows.
    #[must_use]
    pub fn targets(&self) -> &[Y] {
        &self.targets
    }
}

impl<X: Clone, Y: Clone> Dataset<X, Y> {
    /// Extracts the rows at `indices`, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    #[must_use]
    pub fn subset(&self, indices: &[usize]) -> Self {
        let mut inputs = Vec::with_capacity(indices.len());
        let mut targets = Vec::with_capacity(indices.len());
        for &index in indices {
            inputs.push(self.inputs[index].clone());
            targets.push(self.targets[index].clone());
        }
        Self { inputs, targets }
    }
}
