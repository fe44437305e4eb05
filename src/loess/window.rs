//! Indexed views over contiguous `f64` buffers.
//!
//! A view exposes a logical half-open range `[start, end)` of `isize` indices
//! and maps each logical index onto a physical slot of its backing slice as
//! `first + (i - start) * stride`. This lets the Loess smoother work on whole
//! arrays, on arrays addressed from a negative origin (padded buffers) and on
//! cycle-subseries (every `period`-th element) with the same code.
//!
//! Indexing is not range-checked beyond what the backing slice does: reading
//! outside `[start, end)` is a caller bug and panics only if it also falls
//! outside the slice.

/// Read-only view.
#[derive(Debug, Clone, Copy)]
pub struct DataWindow<'a> {
    data: &'a [f64],
    first: usize,
    stride: usize,
    start: isize,
    end: isize,
}

impl<'a> DataWindow<'a> {
    /// View over the whole slice, logical range `[0, len)`.
    pub fn new(data: &'a [f64]) -> Self {
        Self {
            data,
            first: 0,
            stride: 1,
            start: 0,
            end: data.len() as isize,
        }
    }

    /// View over the whole slice whose first element has logical index `start`.
    pub fn with_origin(data: &'a [f64], start: isize) -> Self {
        Self {
            data,
            first: 0,
            stride: 1,
            start,
            end: start + data.len() as isize,
        }
    }

    /// View over `data[first]`, `data[first + stride]`, ... with logical
    /// range `[start, end)`.
    pub fn strided(data: &'a [f64], first: usize, stride: usize, start: isize, end: isize) -> Self {
        debug_assert!(stride > 0);
        debug_assert!(end >= start);
        Self {
            data,
            first,
            stride,
            start,
            end,
        }
    }

    #[inline]
    pub fn start(&self) -> isize {
        self.start
    }

    #[inline]
    pub fn end(&self) -> isize {
        self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn get(&self, i: isize) -> f64 {
        self.data[physical(self.first, self.stride, self.start, i)]
    }
}

/// Read/write view, same index mapping as [`DataWindow`].
#[derive(Debug)]
pub struct DataWindowMut<'a> {
    data: &'a mut [f64],
    first: usize,
    stride: usize,
    start: isize,
    end: isize,
}

impl<'a> DataWindowMut<'a> {
    /// View over the whole slice, logical range `[0, len)`.
    pub fn new(data: &'a mut [f64]) -> Self {
        let end = data.len() as isize;
        Self {
            data,
            first: 0,
            stride: 1,
            start: 0,
            end,
        }
    }

    /// View over the whole slice whose first element has logical index `start`.
    pub fn with_origin(data: &'a mut [f64], start: isize) -> Self {
        let end = start + data.len() as isize;
        Self {
            data,
            first: 0,
            stride: 1,
            start,
            end,
        }
    }

    /// Strided view, see [`DataWindow::strided`].
    pub fn strided(
        data: &'a mut [f64],
        first: usize,
        stride: usize,
        start: isize,
        end: isize,
    ) -> Self {
        debug_assert!(stride > 0);
        debug_assert!(end >= start);
        Self {
            data,
            first,
            stride,
            start,
            end,
        }
    }

    #[inline]
    pub fn start(&self) -> isize {
        self.start
    }

    #[inline]
    pub fn end(&self) -> isize {
        self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn get(&self, i: isize) -> f64 {
        self.data[physical(self.first, self.stride, self.start, i)]
    }

    #[inline]
    pub fn set(&mut self, i: isize, value: f64) {
        self.data[physical(self.first, self.stride, self.start, i)] = value;
    }
}

#[inline(always)]
fn physical(first: usize, stride: usize, start: isize, i: isize) -> usize {
    (first as isize + (i - start) * stride as isize) as usize
}
