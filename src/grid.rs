use crate::geometry::Point;
use self_assembly_common::Orientation;

// Row-major index of a cell: cells of one row are contiguous.
#[inline(always)]
pub fn cell_index(point: Point, size: usize) -> usize {
    point.y * size + point.x
}

#[inline(always)]
pub fn cell_point(index: usize, size: usize) -> Point {
    Point::new(index % size, index / size)
}

/// Iterates over the cell indices covered by a particle with head `head`.
///
/// A horizontal particle covers `length` cells to the right of (and including)
/// its head, a vertical one `length` cells downwards. Both wrap around the torus.
/// Nothing is allocated, so this is safe to call inside the placement and
/// diffusion loops.
#[inline(always)]
pub fn area_cells(
    head: Point,
    orientation: Orientation,
    length: usize,
    size: usize,
) -> impl Iterator<Item = usize> {
    (0..length).map(move |offset| {
        let cell = match orientation {
            Orientation::Horizontal => Point::new((head.x + offset) % size, head.y),
            Orientation::Vertical => Point::new(head.x, (head.y + offset) % size),
        };
        cell_index(cell, size)
    })
}

/// Returns `true` if `cell` lies inside the area of a particle anchored at `head`.
pub fn area_contains(
    head: Point,
    orientation: Orientation,
    length: usize,
    size: usize,
    cell: Point,
) -> bool {
    // Distance from the head along the particle axis, measured on the torus.
    let (along, fixed_matches) = match orientation {
        Orientation::Horizontal => ((cell.x + size - head.x) % size, cell.y == head.y),
        Orientation::Vertical => ((cell.y + size - head.y) % size, cell.x == head.x),
    };
    fixed_matches && along < length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_area_wraps_along_x() {
        let cells: Vec<usize> = area_cells(Point::new(8, 2), Orientation::Horizontal, 3, 10).collect();
        assert_eq!(cells, vec![28, 29, 20]);
    }

    #[test]
    fn vertical_area_wraps_along_y() {
        let cells: Vec<usize> = area_cells(Point::new(4, 9), Orientation::Vertical, 3, 10).collect();
        assert_eq!(cells, vec![94, 4, 14]);
    }

    #[test]
    fn index_and_point_are_inverse() {
        for index in [0, 9, 10, 57, 99] {
            assert_eq!(cell_index(cell_point(index, 10), 10), index);
        }
    }

    #[test]
    fn containment_follows_the_wrapped_area() {
        let head = Point::new(8, 2);
        assert!(area_contains(head, Orientation::Horizontal, 3, 10, Point::new(0, 2)));
        assert!(area_contains(head, Orientation::Horizontal, 3, 10, Point::new(8, 2)));
        assert!(!area_contains(head, Orientation::Horizontal, 3, 10, Point::new(1, 2)));
        assert!(!area_contains(head, Orientation::Horizontal, 3, 10, Point::new(9, 3)));
        assert!(area_contains(Point::new(4, 9), Orientation::Vertical, 3, 10, Point::new(4, 1)));
    }
}
