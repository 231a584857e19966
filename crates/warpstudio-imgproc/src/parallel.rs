use rayon::prelude::*;

use warpstudio_image::Image;

/// Apply a function to each pixel in the image in parallel.
///
/// The source and destination images must have the same number of columns.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
{
    let cols = src.cols();
    if cols == 0 {
        return;
    }

    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each destination pixel for resampling in parallel.
///
/// Rows are distributed over the rayon pool; `f` receives the destination
/// column, row and the channels of the pixel to fill.
pub fn par_iter_rows_resample<T, const C: usize>(
    dst: &mut Image<T, C>,
    f: impl Fn(usize, usize, &mut [T]) + Send + Sync,
) where
    T: Send,
{
    let cols = dst.cols();
    if cols == 0 {
        return;
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .enumerate()
        .for_each(|(y, dst_chunk)| {
            dst_chunk
                .chunks_exact_mut(C)
                .enumerate()
                .for_each(|(x, dst_pixel)| {
                    f(x, y, dst_pixel);
                });
        });
}
