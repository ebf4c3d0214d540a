pub mod course;
pub mod review;

pub use course::Course;
pub use review::{Extraction, PostFailure, ReviewRecord, ReviewRow, ReviewSet, CSV_DATE_FORMAT};
