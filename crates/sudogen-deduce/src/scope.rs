//! The groups a stage may reason about.

use sudogen_core::{Cell, Grid, Group, GroupId, GroupKind};

/// Selects the active groups of a stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroupFilter {
    /// Every group of the grid.
    #[default]
    All,
    /// Groups of the listed kinds.
    Kinds(Vec<GroupKind>),
    /// Groups with the listed names.
    Named(Vec<String>),
}

impl GroupFilter {
    /// Returns `true` if the group is selected.
    #[must_use]
    pub fn admits(&self, group: &Group) -> bool {
        match self {
            Self::All => true,
            Self::Kinds(kinds) => kinds.contains(&group.kind()),
            Self::Named(names) => names.iter().any(|n| n == group.name()),
        }
    }
}

/// A grid seen through a stage's group filter.
///
/// Peers are recomputed from the active groups only, so two cells related
/// solely through an inactive group do not see each other.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    grid: &'a Grid,
    active: Vec<bool>,
    peers: Vec<Vec<Cell>>,
}

impl<'a> Scope<'a> {
    /// Builds the scope of `filter` over `grid`.
    #[must_use]
    pub fn new(grid: &'a Grid, filter: &GroupFilter) -> Self {
        let active = grid
            .groups()
            .iter()
            .map(|g| filter.admits(g))
            .collect::<Vec<_>>();
        let mut peers = vec![Vec::new(); grid.num_cells()];
        for (group, _) in grid.groups().iter().zip(&active).filter(|(_, a)| **a) {
            for &a in group.cells() {
                peers[grid.index_of(a)].extend(group.cells().iter().copied().filter(|b| *b != a));
            }
        }
        for list in &mut peers {
            list.sort_unstable();
            list.dedup();
        }
        Self {
            grid,
            active,
            peers,
        }
    }

    /// Returns the underlying grid.
    #[must_use]
    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    /// Returns `true` if the group is active.
    #[must_use]
    pub fn is_active(&self, id: GroupId) -> bool {
        self.active.get(id.index()).copied().unwrap_or(false)
    }

    /// Returns `true` if the group is active and full.
    #[must_use]
    pub fn is_active_full(&self, id: GroupId) -> bool {
        self.is_active(id) && self.grid.is_full(id)
    }

    /// Iterates over the active groups.
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &'a Group)> + '_ {
        self.grid
            .groups_with_ids()
            .filter(|(id, _)| self.is_active(*id))
    }

    /// Iterates over the active full groups.
    pub fn full_groups(&self) -> impl Iterator<Item = (GroupId, &'a Group)> + '_ {
        self.groups().filter(|(id, _)| self.grid.is_full(*id))
    }

    /// Iterates over the active full groups of one kind.
    pub fn full_groups_of_kind(
        &self,
        kind: GroupKind,
    ) -> impl Iterator<Item = (GroupId, &'a Group)> + '_ {
        self.full_groups().filter(move |(_, g)| g.kind() == kind)
    }

    /// Iterates over the active groups containing `cell`.
    pub fn groups_of(&self, cell: Cell) -> impl Iterator<Item = GroupId> + '_ {
        self.grid
            .groups_of(cell)
            .iter()
            .copied()
            .filter(|id| self.is_active(*id))
    }

    /// Iterates over the active full groups containing `cell`.
    pub fn full_groups_of(&self, cell: Cell) -> impl Iterator<Item = GroupId> + '_ {
        self.groups_of(cell).filter(|id| self.grid.is_full(*id))
    }

    /// Returns the cells sharing an active group with `cell`.
    #[must_use]
    pub fn peers(&self, cell: Cell) -> &[Cell] {
        &self.peers[self.grid.index_of(cell)]
    }

    /// Returns `true` if two distinct cells share an active group.
    #[must_use]
    pub fn sees(&self, a: Cell, b: Cell) -> bool {
        a != b && self.peers(a).binary_search(&b).is_ok()
    }

    /// Returns the cells, other than `cells` themselves, that see every one of
    /// `cells`.
    #[must_use]
    pub fn common_peers(&self, cells: &[Cell]) -> Vec<Cell> {
        let Some((first, rest)) = cells.split_first() else {
            return Vec::new();
        };
        self.peers(*first)
            .iter()
            .copied()
            .filter(|c| !cells.contains(c) && rest.iter().all(|r| self.sees(*c, *r)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_restricts_peers() {
        let grid = Grid::regular(4).unwrap();
        let all = Scope::new(&grid, &GroupFilter::All);
        let lines = Scope::new(&grid, &GroupFilter::Kinds(vec![GroupKind::Row, GroupKind::Column]));
        assert_eq!(all.peers(Cell::new(0, 0)).len(), 7);
        assert_eq!(lines.peers(Cell::new(0, 0)).len(), 6);
        assert!(all.sees(Cell::new(0, 0), Cell::new(1, 1)));
        assert!(!lines.sees(Cell::new(0, 0), Cell::new(1, 1)));
        assert_eq!(lines.groups().count(), 8);
        assert_eq!(lines.full_groups_of(Cell::new(2, 2)).count(), 2);
    }

    #[test]
    fn test_named_filter() {
        let grid = Grid::regular(4).unwrap();
        let scope = Scope::new(&grid, &GroupFilter::Named(vec!["row 1".to_owned()]));
        assert_eq!(scope.groups().count(), 1);
        assert_eq!(scope.peers(Cell::new(0, 0)), [Cell::new(1, 0), Cell::new(2, 0), Cell::new(3, 0)]);
        assert!(scope.peers(Cell::new(0, 1)).is_empty());
    }

    #[test]
    fn test_common_peers() {
        let grid = Grid::regular(4).unwrap();
        let scope = Scope::new(&grid, &GroupFilter::All);
        let common = scope.common_peers(&[Cell::new(0, 0), Cell::new(2, 1)]);
        assert_eq!(
            common,
            [Cell::new(2, 0), Cell::new(3, 0), Cell::new(0, 1), Cell::new(1, 1)]
        );
        assert!(scope.common_peers(&[]).is_empty());
    }
}
