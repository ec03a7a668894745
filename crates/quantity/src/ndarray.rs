//! Row-major n-dimensional arrays.

use crate::error::QuantityError;

/// Element count of `shape`. Every partial product of the nonzero
/// dimensions must fit in `usize`, so strides computed later cannot overflow.
fn checked_len(shape: &[usize]) -> Option<usize> {
    let nonzero = shape
        .iter()
        .filter(|&&d| d != 0)
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))?;
    Some(if shape.contains(&0) { 0 } else { nonzero })
}

/// An owned, row-major n-dimensional array.
///
/// An empty shape denotes a 0-d array holding exactly one element.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T> NdArray<T> {
    /// Fails with [`QuantityError::ShapeMismatch`] when `shape` does not hold
    /// exactly `data.len()` elements, including shapes whose nonzero
    /// dimensions overflow `usize` when multiplied.
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Self, QuantityError> {
        if checked_len(&shape) != Some(data.len()) {
            return Err(QuantityError::ShapeMismatch {
                shape,
                len: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// One-dimensional array over `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Zero-dimensional array holding `value`.
    pub fn scalar(value: T) -> Self {
        Self {
            shape: Vec::new(),
            data: vec![value],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn into_parts(self) -> (Vec<usize>, Vec<T>) {
        (self.shape, self.data)
    }

    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0usize;
        for (i, (&idx, &dim)) in index.iter().zip(&self.shape).enumerate() {
            if idx >= dim {
                return None;
            }
            let stride: usize = self.shape[i + 1..].iter().product();
            offset += idx * stride;
        }
        self.data.get(offset)
    }

    pub fn reshape(self, shape: Vec<usize>) -> Result<Self, QuantityError> {
        Self::new(shape, self.data)
    }

    pub fn map<U, F>(&self, f: F) -> NdArray<U>
    where
        F: FnMut(&T) -> U,
    {
        NdArray {
            shape: self.shape.clone(),
            data: self.data.iter().map(f).collect(),
        }
    }

    pub fn try_map<U, E, F>(&self, f: F) -> Result<NdArray<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        Ok(NdArray {
            shape: self.shape.clone(),
            data: self.data.iter().map(f).collect::<Result<_, _>>()?,
        })
    }

    /// Elementwise combination of two arrays of identical shape.
    pub fn zip_with<U, R, F>(&self, other: &NdArray<U>, mut f: F) -> Result<NdArray<R>, QuantityError>
    where
        F: FnMut(&T, &U) -> R,
    {
        if self.shape != other.shape {
            return Err(QuantityError::ShapeMismatch {
                shape: other.shape.clone(),
                len: self.data.len(),
            });
        }
        Ok(NdArray {
            shape: self.shape.clone(),
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| f(a, b))
                .collect(),
        })
    }
}

impl<T> From<Vec<T>> for NdArray<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_must_match_len() {
        assert!(NdArray::new(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).is_ok());
        assert_eq!(
            NdArray::new(vec![2, 3], vec![1.0, 2.0]),
            Err(QuantityError::ShapeMismatch {
                shape: vec![2, 3],
                len: 2
            })
        );
    }

    #[test]
    fn overflowing_shapes_are_rejected() {
        let shape = vec![1 << 16; 4];
        assert!(matches!(
            NdArray::<f64>::new(shape, vec![]),
            Err(QuantityError::ShapeMismatch { .. })
        ));
        assert!(NdArray::<f64>::new(vec![usize::MAX, 2, 0], vec![]).is_err());
        assert!(NdArray::<f64>::new(vec![0, 7], vec![]).is_ok());
    }

    #[test]
    fn zero_dimensional_holds_one_element() {
        let a = NdArray::scalar(5.0);
        assert_eq!(a.ndim(), 0);
        assert_eq!(a.len(), 1);
        assert_eq!(a.get(&[]), Some(&5.0));
        assert!(NdArray::<f64>::new(vec![], vec![]).is_err());
    }

    #[test]
    fn row_major_indexing() {
        let a = NdArray::new(vec![2, 3], vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(a.get(&[0, 2]), Some(&2));
        assert_eq!(a.get(&[1, 0]), Some(&3));
        assert_eq!(a.get(&[2, 0]), None);
        assert_eq!(a.get(&[1]), None);
    }

    #[test]
    fn reshape_and_map() {
        let a = NdArray::from_vec(vec![1, 2, 3, 4]).reshape(vec![2, 2]).unwrap();
        let b = a.map(|v| v * 10);
        assert_eq!(b.shape(), &[2, 2]);
        assert_eq!(b.as_slice(), &[10, 20, 30, 40]);
        let c = a.zip_with(&b, |x, y| x + y).unwrap();
        assert_eq!(c.as_slice(), &[11, 22, 33, 44]);
        assert!(a.zip_with(&NdArray::from_vec(vec![1]), |x, y| x + y).is_err());
    }
}
