// Copyright @yucwang 2026

use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::math::constants::Float;

/// Pixel rectangle, all four bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl Tile {
    pub fn new(top: usize, left: usize, bottom: usize, right: usize) -> Self {
        Self { top, left, bottom, right }
    }

    /// Whole image of the given size. Callers must not pass an empty image.
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, height.saturating_sub(1), width.saturating_sub(1))
    }

    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    fn center(&self) -> (Float, Float) {
        (0.5 * (self.left + self.right) as Float, 0.5 * (self.top + self.bottom) as Float)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileOrder {
    CenterOut,
    TopLeft,
    BottomRight,
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
    Unsorted,
}

impl TileOrder {
    pub fn from_name(name: &str) -> Option<TileOrder> {
        match name {
            "center" | "center_out" => Some(TileOrder::CenterOut),
            "top_left" | "topleft" => Some(TileOrder::TopLeft),
            "bottom_right" | "bottomright" => Some(TileOrder::BottomRight),
            "left_to_right" => Some(TileOrder::LeftToRight),
            "right_to_left" => Some(TileOrder::RightToLeft),
            "top_to_bottom" => Some(TileOrder::TopToBottom),
            "bottom_to_top" => Some(TileOrder::BottomToTop),
            "unsorted" | "none" => Some(TileOrder::Unsorted),
            _ => None,
        }
    }

    /// Comparator for tiles of `region`.
    fn comparator(&self, region: &Tile) -> Box<dyn Fn(&Tile, &Tile) -> Ordering> {
        match self {
            TileOrder::CenterOut => nearest_first(region.center()),
            TileOrder::TopLeft => nearest_first((region.left as Float, region.top as Float)),
            TileOrder::BottomRight => nearest_first((region.right as Float, region.bottom as Float)),
            TileOrder::LeftToRight => Box::new(|a: &Tile, b: &Tile| (a.left, a.top).cmp(&(b.left, b.top))),
            TileOrder::RightToLeft => Box::new(|a: &Tile, b: &Tile| (b.right, a.top).cmp(&(a.right, b.top))),
            TileOrder::TopToBottom => Box::new(|a: &Tile, b: &Tile| (a.top, a.left).cmp(&(b.top, b.left))),
            TileOrder::BottomToTop => Box::new(|a: &Tile, b: &Tile| (b.bottom, a.left).cmp(&(a.bottom, b.left))),
            TileOrder::Unsorted => Box::new(|_: &Tile, _: &Tile| Ordering::Equal),
        }
    }
}

/// Orders tiles by the distance of their centers to `(px, py)`.
fn nearest_first((px, py): (Float, Float)) -> Box<dyn Fn(&Tile, &Tile) -> Ordering> {
    let dist = move |t: &Tile| {
        let (cx, cy) = t.center();
        (cx - px) * (cx - px) + (cy - py) * (cy - py)
    };
    Box::new(move |a: &Tile, b: &Tile| dist(a).partial_cmp(&dist(b)).unwrap_or(Ordering::Equal))
}

/// Restartable ordering of the tiles covering a region. Not thread safe,
/// the dispatcher drains it before work starts.
pub trait TileSequence: Send {
    /// Partitions `region` and restarts the sequence.
    fn begin(&mut self, region: &Tile);
    fn num_regions(&self) -> usize;
    fn next_region(&mut self) -> Option<Tile>;
}

/// Row-major blocks of at most `tile_width` x `tile_height`, clipped at the region edge.
fn partition(region: &Tile, tile_width: usize, tile_height: usize) -> Vec<Tile> {
    let tile_width = tile_width.max(1);
    let tile_height = tile_height.max(1);
    let mut tiles = Vec::new();
    let mut top = region.top;
    while top <= region.bottom {
        let bottom = (top + tile_height - 1).min(region.bottom);
        let mut left = region.left;
        while left <= region.right {
            let right = (left + tile_width - 1).min(region.right);
            tiles.push(Tile::new(top, left, bottom, right));
            left = right + 1;
        }
        top = bottom + 1;
    }
    tiles
}

pub struct BlockSequence {
    tile_width: usize,
    tile_height: usize,
    order: TileOrder,
    tiles: VecDeque<Tile>,
}

impl BlockSequence {
    pub fn new(tile_width: usize, tile_height: usize, order: TileOrder) -> Self {
        Self { tile_width, tile_height, order, tiles: VecDeque::new() }
    }
}

impl TileSequence for BlockSequence {
    fn begin(&mut self, region: &Tile) {
        let mut tiles = partition(region, self.tile_width, self.tile_height);
        let cmp = self.order.comparator(region);
        tiles.sort_by(|a, b| cmp(a, b));
        self.tiles = tiles.into_iter().collect();
    }

    fn num_regions(&self) -> usize {
        self.tiles.len()
    }

    fn next_region(&mut self) -> Option<Tile> {
        self.tiles.pop_front()
    }
}

/// Blocks of a 2^depth x 2^depth grid visited along a Hilbert curve.
pub struct HilbertSequence {
    depth: u32,
    tiles: VecDeque<Tile>,
}

impl HilbertSequence {
    pub fn new(depth: u32) -> Self {
        Self { depth, tiles: VecDeque::new() }
    }

    fn curve_tiles(region: &Tile, n: usize) -> Vec<Tile> {
        // Grid lines, n never exceeds the region's width or height.
        let xs: Vec<usize> = (0..=n).map(|i| region.left + i * region.width() / n).collect();
        let ys: Vec<usize> = (0..=n).map(|i| region.top + i * region.height() / n).collect();

        let mut tiles = Vec::with_capacity(n * n);
        for d in 0..n * n {
            let (cx, cy) = hilbert_d2xy(n, d);
            if xs[cx + 1] > xs[cx] && ys[cy + 1] > ys[cy] {
                tiles.push(Tile::new(ys[cy], xs[cx], ys[cy + 1] - 1, xs[cx + 1] - 1));
            }
        }
        tiles
    }
}

impl TileSequence for HilbertSequence {
    fn begin(&mut self, region: &Tile) {
        let n = 1usize.checked_shl(self.depth).unwrap_or(usize::MAX);
        if n <= region.width() && n <= region.height() {
            self.tiles = Self::curve_tiles(region, n).into_iter().collect();
            return;
        }

        log::warn!("HilbertSequence: depth {} does not fit a {}x{} region, falling back to blocks.",
                   self.depth, region.width(), region.height());
        let cols = n.min(region.width().max(1));
        let rows = n.min(region.height().max(1));
        let tile_width = (region.width() + cols - 1) / cols;
        let tile_height = (region.height() + rows - 1) / rows;
        self.tiles = partition(region, tile_width, tile_height).into_iter().collect();
    }

    fn num_regions(&self) -> usize {
        self.tiles.len()
    }

    fn next_region(&mut self) -> Option<Tile> {
        self.tiles.pop_front()
    }
}

/// Cell of the `d`-th step along an `n` x `n` Hilbert curve.
fn hilbert_d2xy(n: usize, d: usize) -> (usize, usize) {
    let (mut x, mut y) = (0usize, 0usize);
    let mut t = d;
    let mut s = 1usize;
    while s < n {
        let rx = 1 & (t / 2);
        let ry = 1 & (t ^ rx);
        if ry == 0 {
            if rx == 1 {
                x = s - 1 - x;
                y = s - 1 - y;
            }
            std::mem::swap(&mut x, &mut y);
        }
        x += s * rx;
        y += s * ry;
        t /= 4;
        s *= 2;
    }
    (x, y)
}
