pub mod csv_exporter;
pub mod frame_resolver;
pub mod review_extractor;

pub use csv_exporter::CsvExporter;
pub use frame_resolver::FrameResolver;
pub use review_extractor::{parse_review_date, ExtractPolicy, ReviewExtractor};
