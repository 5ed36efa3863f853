//! # Binary Mask
//!
//! Foreground/background labels with the dimensions of the source image.

/// A row-major binary mask.
///
/// # Example
///
/// ```rust
/// use silhouette::Mask;
///
/// let mask = Mask::from_fn(4, 4, |x, y| x >= 1 && x <= 2 && y >= 1 && y <= 2);
/// assert_eq!(mask.foreground_count(), 4);
/// assert_eq!(mask.foreground_ratio(), 0.25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl Mask {
    /// Creates an all-background mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; width as usize * height as usize],
        }
    }

    /// Creates a mask by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total pixel count.
    #[inline]
    pub fn area(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns the label at `(x, y)`; out-of-range pixels are background.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        self.data[self.index(x as u32, y as u32)]
    }

    /// Sets the label at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the mask.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        let index = self.index(x, y);
        self.data[index] = value;
    }

    /// Row-major labels.
    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /// Number of foreground pixels.
    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Fraction of pixels that are foreground, 0 for an empty mask.
    pub fn foreground_ratio(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.foreground_count() as f64 / self.data.len() as f64
    }

    /// Swaps foreground and background.
    pub fn invert(&mut self) {
        for v in &mut self.data {
            *v = !*v;
        }
    }
}
