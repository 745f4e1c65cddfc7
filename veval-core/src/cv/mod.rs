pub mod boundary;
pub mod contours;
pub mod points;
pub mod shape;

pub use boundary::{BoundaryMatch, boundary_map, boundary_radius, disk_offsets, match_boundaries};
pub use contours::{find_contours, largest_contour};
pub use shape::{ShapeContext, chi_square, dynamic_time_warping};
