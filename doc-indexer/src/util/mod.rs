pub mod fs_scan;
pub mod markup;
pub mod splitter;
