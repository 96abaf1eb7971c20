use crate::direction::Direction;

/// A bounded 2D grid stored row-major (`y * width + x`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Tilemap<T> {
    /// Build from row-major data. Returns None if the length doesn't match.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self { width, height, data })
    }

    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(self.in_bounds(x, y));
        y * self.width + x
    }

    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    /// Bounds-checked lookup.
    pub fn try_get(&self, x: usize, y: usize) -> Option<&T> {
        if self.in_bounds(x, y) {
            Some(&self.data[y * self.width + x])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Raw row-major storage.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// The in-bounds 4-connected neighbors of `(x, y)`, tagged with the
    /// direction that leads to them.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (Direction, usize, usize)> {
        let (width, height) = (self.width, self.height);
        Direction::ALL.into_iter().filter_map(move |dir| {
            dir.step(x, y, width, height).map(|(nx, ny)| (dir, nx, ny))
        })
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }
}
