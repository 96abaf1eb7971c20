use crate::tiles::TileId;

/// One cell of the solver grid: the tiles it could still become.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WfcCell {
    pub x: usize,
    pub y: usize,
    /// Remaining candidates, in catalog order
    candidates: Vec<TileId>,
    collapsed: bool,
}

impl WfcCell {
    pub fn new(x: usize, y: usize, candidates: Vec<TileId>) -> Self {
        Self {
            x,
            y,
            candidates,
            collapsed: false,
        }
    }

    /// Number of remaining candidates
    pub fn entropy(&self) -> usize {
        self.candidates.len()
    }

    pub fn candidates(&self) -> &[TileId] {
        &self.candidates
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn is_candidate(&self, tile: TileId) -> bool {
        self.candidates.contains(&tile)
    }

    /// The resolved tile, once collapsed
    pub fn tile(&self) -> Option<TileId> {
        if self.collapsed {
            self.candidates.first().copied()
        } else {
            None
        }
    }

    /// Fix the cell to a single tile. Collapsed cells never change again.
    pub(crate) fn collapse_to(&mut self, tile: TileId) {
        debug_assert!(!self.collapsed);
        self.candidates.clear();
        self.candidates.push(tile);
        self.collapsed = true;
    }

    /// Drop every candidate for which `keep` returns false.
    /// Returns true if anything was removed.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(TileId) -> bool) -> bool {
        debug_assert!(!self.collapsed);
        let before = self.candidates.len();
        self.candidates.retain(|&t| keep(t));
        self.candidates.len() != before
    }
}
