mod best_effort_path_ext;
mod file_time_ext;

pub use best_effort_path_ext::BestEffortPathExt;
pub use file_time_ext::{FileTime, SystemTimeExt};
