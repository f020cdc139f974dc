use crate::error::{LatticeError, Result};
use crate::grid::{cell_index, cell_point};
use crate::geometry::Point;
use crate::lattice::Lattice;
use self_assembly_common::{AssemblyRecord, CheckStrategy, Orientation};

const NO_LABEL: u32 = u32::MAX;

/// Cluster statistics of one orientation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ClusterStats {
    /// Cells in the largest cluster.
    pub largest: usize,
    /// Occupied cells of this orientation.
    pub total: usize,
    /// Number of distinct clusters.
    pub clusters: usize,
}

impl ClusterStats {
    /// Largest-cluster share of this orientation's cells; `None` when there are none.
    pub fn ratio(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.largest as f64 / self.total as f64)
        }
    }

    /// An orientation without cells never meets a threshold.
    pub fn meets(&self, threshold: f64) -> bool {
        self.ratio().is_some_and(|ratio| ratio >= threshold)
    }
}

/// Per-orientation cluster statistics of one lattice state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct AssemblyReport {
    pub horizontal: ClusterStats,
    pub vertical: ClusterStats,
}

impl AssemblyReport {
    pub fn stats(&self, orientation: Orientation) -> &ClusterStats {
        match orientation {
            Orientation::Horizontal => &self.horizontal,
            Orientation::Vertical => &self.vertical,
        }
    }

    fn stats_mut(&mut self, orientation: Orientation) -> &mut ClusterStats {
        match orientation {
            Orientation::Horizontal => &mut self.horizontal,
            Orientation::Vertical => &mut self.vertical,
        }
    }

    /// Both orientations must meet the threshold.
    pub fn is_self_assembled(&self, threshold: f64) -> bool {
        self.horizontal.meets(threshold) && self.vertical.meets(threshold)
    }

    /// Flattens the report into a statistics row.
    pub fn to_record(&self, step: u64, density: f64, threshold: f64) -> AssemblyRecord {
        AssemblyRecord {
            step,
            density,
            horizontal_largest: self.horizontal.largest,
            horizontal_total: self.horizontal.total,
            horizontal_ratio: self.horizontal.ratio(),
            vertical_largest: self.vertical.largest,
            vertical_total: self.vertical.total,
            vertical_ratio: self.vertical.ratio(),
            self_assembled: self.is_self_assembled(threshold),
        }
    }
}

/// Labels same-orientation clusters of a lattice with union-find.
///
/// The detector never mutates the lattice. It keeps its scratch buffers
/// between calls so repeated checks during a run don't reallocate; results
/// don't depend on earlier calls.
#[derive(Debug, Default)]
pub struct ClusterDetector {
    /// Side length of the last analyzed lattice.
    size: usize,
    /// Cluster label per cell (`NO_LABEL` for empty cells), root-resolved after labeling.
    labels: Vec<u32>,
    /// Union-find forest: a label is a root when it is its own parent.
    parents: Vec<u32>,
    /// Orientation of the cells that created each label.
    label_orientations: Vec<Orientation>,
    /// Cell count per root label.
    sizes: Vec<usize>,
}

impl ClusterDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies the lattice as self-assembled for `threshold`.
    pub fn check<R>(&mut self, lattice: &Lattice<R>, threshold: f64) -> Result<bool> {
        Ok(self.analyze(lattice)?.is_self_assembled(threshold))
    }

    pub fn check_strategy<R>(&mut self, lattice: &Lattice<R>, strategy: CheckStrategy) -> Result<bool> {
        self.check(lattice, strategy.threshold())
    }

    /// Labels every cluster and aggregates per-orientation cluster sizes.
    pub fn analyze<R>(&mut self, lattice: &Lattice<R>) -> Result<AssemblyReport> {
        self.label_cells(lattice)?;
        self.aggregate(lattice)
    }

    /// Root label of the cluster covering `(x, y)` in the last analyzed lattice.
    /// Two cells belong to the same cluster iff their labels are equal.
    pub fn label_at(&self, x: usize, y: usize) -> Option<u32> {
        if self.size == 0 {
            return None;
        }
        let label = self.labels[cell_index(Point::wrapped(x, y, self.size), self.size)];
        (label != NO_LABEL).then_some(label)
    }

    fn label_cells<R>(&mut self, lattice: &Lattice<R>) -> Result<()> {
        let size = lattice.size();
        self.size = size;
        self.labels.clear();
        self.labels.resize(size * size, NO_LABEL);
        self.parents.clear();
        self.label_orientations.clear();

        // Raster pass: left and top neighbours only, no wrapping.
        for y in 0..size {
            for x in 0..size {
                let index = cell_index(Point::new(x, y), size);
                let left = (x > 0).then(|| index - 1);
                let top = (y > 0).then(|| index - size);
                self.process_cell(lattice, index, left, top)?;
            }
        }

        // Finish pass: join clusters that only touch through the torus edges.
        let last = size - 1;
        for x in 0..size {
            self.merge_wrapped(
                lattice,
                cell_index(Point::new(x, 0), size),
                cell_index(Point::new(x, last), size),
            )?;
        }
        for y in 0..size {
            self.merge_wrapped(
                lattice,
                cell_index(Point::new(0, y), size),
                cell_index(Point::new(last, y), size),
            )?;
        }

        // Compression sweep: every labeled cell points straight at its root.
        for index in 0..self.labels.len() {
            let label = self.labels[index];
            if label != NO_LABEL {
                self.labels[index] = find_root(&mut self.parents, label);
            }
        }
        Ok(())
    }

    fn process_cell<R>(
        &mut self,
        lattice: &Lattice<R>,
        index: usize,
        left: Option<usize>,
        top: Option<usize>,
    ) -> Result<()> {
        let Some(orientation) = lattice.orientation_at(index) else {
            return Ok(());
        };
        let same = |neighbor: Option<usize>| {
            neighbor.filter(|&n| lattice.orientation_at(n) == Some(orientation))
        };

        let label = match (same(left), same(top)) {
            (None, None) => self.new_label(orientation),
            (Some(neighbor), None) | (None, Some(neighbor)) => self.resolved_label(neighbor)?,
            (Some(left), Some(top)) => {
                let left_root = self.resolved_label(left)?;
                let top_root = self.resolved_label(top)?;
                self.union_roots(left_root, top_root, index)?
            }
        };
        self.labels[index] = label;
        Ok(())
    }

    fn merge_wrapped<R>(&mut self, lattice: &Lattice<R>, edge: usize, opposite: usize) -> Result<()> {
        let (Some(a), Some(b)) = (lattice.orientation_at(edge), lattice.orientation_at(opposite)) else {
            return Ok(());
        };
        if a != b {
            return Ok(());
        }
        let edge_root = self.resolved_label(edge)?;
        let opposite_root = self.resolved_label(opposite)?;
        self.union_roots(edge_root, opposite_root, edge)?;
        Ok(())
    }

    fn new_label(&mut self, orientation: Orientation) -> u32 {
        let label = self.parents.len() as u32;
        self.parents.push(label);
        self.label_orientations.push(orientation);
        label
    }

    /// Root label of an already labeled, occupied cell.
    fn resolved_label(&mut self, index: usize) -> Result<u32> {
        let label = self.labels[index];
        if label == NO_LABEL {
            let cell = cell_point(index, self.size);
            return Err(LatticeError::LabelingInvariant {
                x: cell.x,
                y: cell.y,
                reason: "matching neighbour has no cluster label",
            });
        }
        Ok(find_root(&mut self.parents, label))
    }

    /// Joins two roots, keeping the smaller label as the surviving root.
    fn union_roots(&mut self, a: u32, b: u32, index: usize) -> Result<u32> {
        if self.label_orientations[a as usize] != self.label_orientations[b as usize] {
            let cell = cell_point(index, self.size);
            return Err(LatticeError::LabelingInvariant {
                x: cell.x,
                y: cell.y,
                reason: "clusters of different orientations were joined",
            });
        }
        let (root, child) = if a <= b { (a, b) } else { (b, a) };
        self.parents[child as usize] = root;
        Ok(root)
    }

    fn aggregate<R>(&mut self, lattice: &Lattice<R>) -> Result<AssemblyReport> {
        let mut report = AssemblyReport::default();
        self.sizes.clear();
        self.sizes.resize(self.parents.len(), 0);

        for (index, &label) in self.labels.iter().enumerate() {
            let Some(orientation) = lattice.orientation_at(index) else {
                continue;
            };
            if label == NO_LABEL || self.label_orientations[label as usize] != orientation {
                let cell = cell_point(index, self.size);
                return Err(LatticeError::LabelingInvariant {
                    x: cell.x,
                    y: cell.y,
                    reason: "occupied cell carries no label of its orientation",
                });
            }
            self.sizes[label as usize] += 1;
            report.stats_mut(orientation).total += 1;
        }

        for (label, &cells) in self.sizes.iter().enumerate() {
            if cells == 0 {
                continue;
            }
            let stats = report.stats_mut(self.label_orientations[label]);
            stats.clusters += 1;
            stats.largest = stats.largest.max(cells);
        }
        Ok(report)
    }
}

/// Iterative find with full path compression.
fn find_root(parents: &mut [u32], label: u32) -> u32 {
    let mut root = label;
    while parents[root as usize] != root {
        root = parents[root as usize];
    }
    let mut current = label;
    while parents[current as usize] != root {
        let next = parents[current as usize];
        parents[current as usize] = root;
        current = next;
    }
    root
}

impl<R> Lattice<R> {
    /// Self-assembly classification with a named strategy.
    pub fn check(&self, strategy: CheckStrategy) -> Result<bool> {
        self.check_threshold(strategy.threshold())
    }

    /// Self-assembly classification with an explicit threshold.
    pub fn check_threshold(&self, threshold: f64) -> Result<bool> {
        ClusterDetector::new().check(self, threshold)
    }

    /// Per-orientation cluster statistics of the current state.
    pub fn assembly_report(&self) -> Result<AssemblyReport> {
        ClusterDetector::new().analyze(self)
    }
}
