pub mod csv_source;
pub mod mock_source;

pub use csv_source::CsvSource;
pub use mock_source::MockSource;
