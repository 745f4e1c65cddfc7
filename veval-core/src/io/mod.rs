mod davis;
mod results;
mod table;

pub use davis::image_set_path;
pub use davis::load_dataset;
pub use davis::load_frames;
pub use davis::load_segmentation;
pub use davis::load_segmentations;
pub use davis::read_sequence_names;

pub use results::read_result;
pub use results::write_result;

pub use table::write_table;
pub use table::write_table_delimited;
pub use table::write_table_pq;
