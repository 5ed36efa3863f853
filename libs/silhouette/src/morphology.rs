//! # Morphology
//!
//! Square-element erosion and dilation on binary masks, plus the opening
//! and closing compositions used to clean binarized silhouettes.
//!
//! A square element is separable, so each operation is a row pass followed
//! by a column pass. The window for kernel size `k` spans offsets
//! `-(k/2) ..= k - 1 - k/2` around the anchor. Pixels outside the image
//! count as foreground for erosion and background for dilation, so objects
//! touching the border are not eaten away.

use crate::mask::Mask;

#[derive(Clone, Copy)]
enum Op {
    Erode,
    Dilate,
}

impl Op {
    fn outside(self) -> bool {
        matches!(self, Op::Erode)
    }
}

fn window(kernel_size: u32) -> (i64, i64) {
    let k = i64::from(kernel_size);
    (-(k / 2), k - 1 - k / 2)
}

fn pass(mask: &Mask, kernel_size: u32, op: Op, horizontal: bool) -> Mask {
    let (lo, hi) = window(kernel_size);
    let (w, h) = (i64::from(mask.width()), i64::from(mask.height()));

    Mask::from_fn(mask.width(), mask.height(), |x, y| {
        let mut samples = (lo..=hi).map(|d| {
            let (sx, sy) = if horizontal {
                (i64::from(x) + d, i64::from(y))
            } else {
                (i64::from(x), i64::from(y) + d)
            };
            if sx < 0 || sy < 0 || sx >= w || sy >= h {
                op.outside()
            } else {
                mask.get(sx, sy)
            }
        });
        match op {
            Op::Erode => samples.all(|v| v),
            Op::Dilate => samples.any(|v| v),
        }
    })
}

fn apply(mask: &Mask, kernel_size: u32, op: Op) -> Mask {
    let rows = pass(mask, kernel_size, op, true);
    pass(&rows, kernel_size, op, false)
}

/// Shrinks the foreground by a `kernel_size` square, `iterations` times.
pub fn erode(mask: &Mask, kernel_size: u32, iterations: u32) -> Mask {
    (0..iterations).fold(mask.clone(), |m, _| apply(&m, kernel_size, Op::Erode))
}

/// Grows the foreground by a `kernel_size` square, `iterations` times.
pub fn dilate(mask: &Mask, kernel_size: u32, iterations: u32) -> Mask {
    (0..iterations).fold(mask.clone(), |m, _| apply(&m, kernel_size, Op::Dilate))
}

/// Erosion then dilation: removes specks smaller than the element.
pub fn open(mask: &Mask, kernel_size: u32, iterations: u32) -> Mask {
    dilate(&erode(mask, kernel_size, iterations), kernel_size, iterations)
}

/// Dilation then erosion: fills pinholes smaller than the element.
pub fn close(mask: &Mask, kernel_size: u32, iterations: u32) -> Mask {
    erode(&dilate(mask, kernel_size, iterations), kernel_size, iterations)
}

/// Opening followed by closing.
///
/// Skipped (the mask is returned as is) when `kernel_size < 2` or
/// `iterations == 0`.
pub fn clean(mask: Mask, kernel_size: u32, iterations: u32) -> Mask {
    if kernel_size < 2 || iterations == 0 {
        return mask;
    }
    close(&open(&mask, kernel_size, iterations), kernel_size, iterations)
}
