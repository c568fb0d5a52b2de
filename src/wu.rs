//! Wu's color quantizer (Greedy Orthogonal Bipartitioning).
//!
//! This preclustering method recursively splits the histogram box with the
//! greatest variance along the dimension and bin that results in the greatest
//! decrease in variance. It gives much better results than median cut while
//! having nearly the same computational cost.
//!
//! The histogram uses `32` bins per channel (the top 5 bits), which is plenty
//! of resolution for the small cluster counts dominant-color extraction needs.

// Referenced code: https://www.ece.mcmaster.ca/~xwu/cq.c
// and relevant paper (free access):
// Xiaolin Wu, Color quantization by dynamic programming and principal analysis,
// ACM Transactions on Graphics, vol. 11, no. 4, 348–372, 1992.
// https://doi.org/10.1145/146443.146475

use crate::{PaletteSize, Swatch};
use ordered_float::OrderedFloat;
use palette::Srgb;
use std::{
    collections::BinaryHeap,
    ops::{Add, AddAssign, Sub},
};

/// The number of color dimensions.
const N: usize = 3;

/// The number of histogram bins per channel.
const BINS: usize = 32;

/// The number of bits dropped when binning a channel.
const BIN_SHIFT: u32 = u8::BITS - 5;

/// The moment grid is one wider than the histogram in each dimension,
/// leaving a zero border so box sums need no boundary cases.
const GRID: usize = BINS + 1;

/// Statistics for a histogram bin, or a cumulative sum of such statistics.
///
/// Accumulators are signed so that the intermediate terms of the
/// inclusion-exclusion box sums cannot underflow.
#[derive(Debug, Clone, Copy, Default)]
struct Stats {
    /// The number of pixels assigned to the bin.
    count: i64,
    /// The component-wise sum of the colors assigned to the bin.
    components: [i64; N],
    /// The sum of the squared components of the colors assigned to the bin.
    sum_squared: f64,
}

impl Add for Stats {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            count: self.count + rhs.count,
            components: [
                self.components[0] + rhs.components[0],
                self.components[1] + rhs.components[1],
                self.components[2] + rhs.components[2],
            ],
            sum_squared: self.sum_squared + rhs.sum_squared,
        }
    }
}

impl Sub for Stats {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            count: self.count - rhs.count,
            components: [
                self.components[0] - rhs.components[0],
                self.components[1] - rhs.components[1],
                self.components[2] - rhs.components[2],
            ],
            sum_squared: self.sum_squared - rhs.sum_squared,
        }
    }
}

impl AddAssign for Stats {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// A box over a multi-dimensional range of histogram bins.
#[derive(Debug, Clone, Copy, Default)]
struct Cube {
    /// The lower bin indices (inclusive).
    min: [u8; N],
    /// The upper bin indices (exclusive).
    max: [u8; N],
}

impl Cube {
    /// Whether or not this cube covers a single bin.
    fn is_single_bin(self) -> bool {
        let Self { min, max } = self;
        (0..N).all(|c| max[c] - min[c] == 1)
    }
}

/// Returns the sum of the squares of the given components.
#[inline]
#[allow(clippy::cast_precision_loss)]
fn sum_of_squares(components: [i64; N]) -> f64 {
    let mut square = 0.0;
    for c in components {
        let c = c as f64;
        square += c * c;
    }
    square
}

/// The histogram bin index for the given color.
#[inline]
fn bin(color: Srgb<u8>) -> [usize; N] {
    [
        usize::from(color.red >> BIN_SHIFT),
        usize::from(color.green >> BIN_SHIFT),
        usize::from(color.blue >> BIN_SHIFT),
    ]
}

/// The binned color histogram, stored flat and then converted in place into
/// cumulative moments for O(1) inclusion-exclusion box sums.
struct Histogram(Vec<Stats>);

impl Histogram {
    /// Creates a zeroed histogram.
    fn new() -> Self {
        Self(vec![Stats::default(); GRID * GRID * GRID])
    }

    /// The flat index of the given grid position.
    #[inline]
    fn index(r: usize, g: usize, b: usize) -> usize {
        (r * GRID + g) * GRID + b
    }

    /// The cumulative statistics at the given grid position.
    #[inline]
    fn at(&self, r: usize, g: usize, b: usize) -> Stats {
        self.0[Self::index(r, g, b)]
    }

    /// Adds the given color to the histogram.
    #[inline]
    fn add_color(&mut self, color: Srgb<u8>) {
        let [r, g, b] = bin(color);
        let components = [
            i64::from(color.red),
            i64::from(color.green),
            i64::from(color.blue),
        ];
        // bin (r, g, b) lives at grid position (r + 1, g + 1, b + 1);
        // row and plane zero stay empty as the border
        let entry = &mut self.0[Self::index(r + 1, g + 1, b + 1)];
        entry.count += 1;
        for (sum, component) in entry.components.iter_mut().zip(components) {
            *sum += component;
        }
        entry.sum_squared += sum_of_squares(components);
    }

    /// Converts the histogram in place into cumulative moments by a prefix
    /// sum along each axis in turn.
    fn calc_cumulative_moments(&mut self) {
        for r in 1..GRID {
            for g in 1..GRID {
                for b in 1..GRID {
                    let prev = self.at(r - 1, g, b);
                    self.0[Self::index(r, g, b)] += prev;
                }
            }
        }
        for r in 1..GRID {
            for g in 1..GRID {
                for b in 1..GRID {
                    let prev = self.at(r, g - 1, b);
                    self.0[Self::index(r, g, b)] += prev;
                }
            }
        }
        for r in 1..GRID {
            for g in 1..GRID {
                for b in 1..GRID {
                    let prev = self.at(r, g, b - 1);
                    self.0[Self::index(r, g, b)] += prev;
                }
            }
        }
    }

    /// Returns the sum of the histogram bins covered by the given cube.
    fn volume(&self, Cube { min, max }: Cube) -> Stats {
        let [r0, g0, b0] = min.map(usize::from);
        let [r1, g1, b1] = max.map(usize::from);
        self.at(r1, g1, b1) - self.at(r0, g1, b1) - self.at(r1, g0, b1) - self.at(r1, g1, b0)
            + self.at(r0, g0, b1)
            + self.at(r0, g1, b0)
            + self.at(r1, g0, b0)
            - self.at(r0, g0, b0)
    }

    /// Returns the sum of the part of the cube below `cut` along `dim`.
    fn volume_below(&self, cube: Cube, dim: usize, cut: u8) -> Stats {
        let mut below = cube;
        below.max[dim] = cut;
        self.volume(below)
    }

    /// Computes the variance of the given cube.
    #[allow(clippy::cast_precision_loss)]
    fn variance(&self, cube: Cube) -> f64 {
        if cube.is_single_bin() {
            0.0
        } else {
            let Stats { count, components, sum_squared } = self.volume(cube);
            sum_squared - sum_of_squares(components) / count as f64
        }
    }

    /// Finds the bin to cut along the given dimension to minimize variance.
    #[allow(clippy::cast_precision_loss)]
    fn minimize(&self, cube: Cube, dim: usize, sum: Stats) -> Option<(u8, f64)> {
        let bottom = cube.min[dim];
        let top = cube.max[dim];

        ((bottom + 1)..top)
            .filter_map(|cut| {
                let lower = self.volume_below(cube, dim, cut);
                let upper = sum - lower;
                if lower.count == 0 || upper.count == 0 {
                    None
                } else {
                    let lower2 = sum_of_squares(lower.components) / lower.count as f64;
                    let upper2 = sum_of_squares(upper.components) / upper.count as f64;
                    Some((cut, -(lower2 + upper2)))
                }
            })
            .min_by_key(|&(_, v)| OrderedFloat(v))
    }

    /// Attempts to cut the given cube to give a lower variance.
    ///
    /// On success, `cube` is shrunk in place and the split-off half returned.
    fn cut(&self, cube: &mut Cube) -> Option<Cube> {
        let sum = self.volume(*cube);

        let best = (0..N)
            .filter_map(|dim| self.minimize(*cube, dim, sum).map(|(cut, v)| ((dim, cut), v)))
            .min_by_key(|&(_, v)| OrderedFloat(v));

        if let Some(((dim, cut), _)) = best {
            let mut other = *cube;
            cube.max[dim] = cut;
            other.min[dim] = cut;
            Some(other)
        } else {
            None
        }
    }

    /// Returns the disjoint cubes resulting from Wu's quantization method.
    fn cubes(&self, k: PaletteSize) -> Vec<Cube> {
        /// A cube and its variance, ordered by variance.
        struct CubeVar(Cube, f64);

        impl PartialOrd for CubeVar {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for CubeVar {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                OrderedFloat(self.1).cmp(&OrderedFloat(other.1))
            }
        }

        impl Eq for CubeVar {}

        impl PartialEq for CubeVar {
            fn eq(&self, other: &Self) -> bool {
                self.1 == other.1
            }
        }

        let k = usize::from(k.into_inner());

        let mut queue = BinaryHeap::with_capacity(k);
        #[allow(clippy::cast_possible_truncation)]
        queue.push(CubeVar(
            Cube { min: [0; N], max: [BINS as u8; N] },
            f64::INFINITY,
        ));

        while queue.len() < k {
            let Some(CubeVar(mut cube, variance)) = queue.pop() else {
                break;
            };

            if variance <= 0.0 {
                // all cubes cannot be cut further
                queue.push(CubeVar(cube, 0.0));
                break;
            }

            if let Some(other) = self.cut(&mut cube) {
                queue.push(CubeVar(cube, self.variance(cube)));
                queue.push(CubeVar(other, self.variance(other)));
            } else {
                queue.push(CubeVar(cube, 0.0));
            }
        }

        queue.into_iter().map(|CubeVar(cube, _)| cube).collect()
    }

    /// Returns the swatch for the given cube: its mean color and pixel count.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn swatch(&self, cube: Cube) -> Swatch {
        let Stats { count, components, .. } = self.volume(cube);
        debug_assert!(count > 0);
        let [r, g, b] = components.map(|c| (c / count) as u8);
        let population = u32::try_from(count).unwrap_or(u32::MAX);
        Swatch::new(Srgb::new(r, g, b), population)
    }
}

/// Clusters the given colors into at most `max_swatches` representative
/// swatches with exact pixel populations.
///
/// The sum of the returned populations equals the number of input colors,
/// except that swatches with a population below `min_population` are
/// discarded (clusters are never empty, so a `min_population` of `0` or `1`
/// keeps everything). The returned swatches are sorted by packed RGB value
/// ascending, making iteration order fully defined.
///
/// Empty input or a `max_swatches` of `0` produce an empty `Vec`; there are
/// no error cases. At most [`MAX_PIXELS`](crate::MAX_PIXELS) colors are
/// supported; the output is deterministic for identical input.
#[must_use]
pub fn swatches(
    colors: impl IntoIterator<Item = Srgb<u8>>,
    max_swatches: PaletteSize,
    min_population: u32,
) -> Vec<Swatch> {
    let mut hist = Histogram::new();
    let mut total: u64 = 0;
    for color in colors {
        hist.add_color(color);
        total += 1;
    }

    if total == 0 || max_swatches.into_inner() == 0 {
        return Vec::new();
    }

    hist.calc_cumulative_moments();

    let mut swatches: Vec<Swatch> = hist
        .cubes(max_swatches)
        .into_iter()
        .map(|cube| hist.swatch(cube))
        .filter(|swatch| swatch.population() >= min_population)
        .collect();

    swatches.sort_by_key(|swatch| swatch.color().into_components());
    swatches
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn empty_input() {
        let swatches = swatches([], PaletteSize::MAX, 1);
        assert!(swatches.is_empty());
    }

    #[test]
    fn zero_max_swatches() {
        let colors = solid(Srgb::new(1, 2, 3), 10);
        let swatches = swatches(colors, PaletteSize::from_clamped(0), 1);
        assert!(swatches.is_empty());
    }

    #[test]
    fn solid_color_yields_single_exact_swatch() {
        let colors = solid(Srgb::new(12, 200, 34), 99);
        let swatches = swatches(colors, PaletteSize::from(16u8), 1);
        assert_eq!(swatches, vec![Swatch::new(Srgb::new(12, 200, 34), 99)]);
    }

    #[test]
    fn separated_colors_are_recovered_exactly() {
        let mut colors = solid(Srgb::new(255, 0, 0), 70);
        colors.extend(solid(Srgb::new(0, 0, 255), 30));
        let swatches = swatches(colors, PaletteSize::from(16u8), 1);

        // sorted by packed RGB: blue before red
        assert_eq!(
            swatches,
            vec![
                Swatch::new(Srgb::new(0, 0, 255), 30),
                Swatch::new(Srgb::new(255, 0, 0), 70),
            ]
        );
    }

    #[test]
    fn five_strips_are_recovered_exactly() {
        let colors = vertical_strips(
            &[
                (Srgb::new(255, 0, 0), 20),
                (Srgb::new(0, 255, 0), 20),
                (Srgb::new(0, 0, 255), 20),
                (Srgb::new(255, 255, 0), 20),
                (Srgb::new(0, 255, 255), 20),
            ],
            100,
        );
        let swatches = swatches(colors, PaletteSize::from(16u8), 1);

        assert_eq!(
            swatches,
            vec![
                Swatch::new(Srgb::new(0, 0, 255), 2000),
                Swatch::new(Srgb::new(0, 255, 0), 2000),
                Swatch::new(Srgb::new(0, 255, 255), 2000),
                Swatch::new(Srgb::new(255, 0, 0), 2000),
                Swatch::new(Srgb::new(255, 255, 0), 2000),
            ]
        );
    }

    #[test]
    fn populations_are_conserved() {
        let colors = gradient(64, 64);
        let len = colors.len() as u64;
        let swatches = swatches(colors, PaletteSize::from(16u8), 1);

        assert!(swatches.len() <= 16);
        assert!(!swatches.is_empty());
        let total: u64 = swatches.iter().map(|s| u64::from(s.population())).sum();
        assert_eq!(total, len);
    }

    #[test]
    fn output_is_deterministic() {
        let colors = gradient(64, 64);
        let first = swatches(colors.clone(), PaletteSize::from(16u8), 1);
        let second = swatches(colors, PaletteSize::from(16u8), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn low_population_swatches_are_discarded() {
        let mut colors = solid(Srgb::new(255, 0, 0), 100);
        colors.extend(solid(Srgb::new(0, 0, 255), 3));
        let swatches = swatches(colors, PaletteSize::from(16u8), 10);
        assert_eq!(swatches, vec![Swatch::new(Srgb::new(255, 0, 0), 100)]);
    }

    #[test]
    fn single_cluster_merges_to_mean() {
        let mut colors = solid(Srgb::new(255, 0, 0), 100);
        colors.extend(solid(Srgb::new(0, 0, 255), 3));
        let swatches = swatches(colors, PaletteSize::from(1u8), 1);

        // 25500 / 103 = 247, 765 / 103 = 7
        assert_eq!(swatches, vec![Swatch::new(Srgb::new(247, 0, 7), 103)]);
    }
}
