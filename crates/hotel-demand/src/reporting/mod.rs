//! Export of pipeline results.
//!
//! Presentation collaborators (dashboard, chart batch, PDF report) consume two
//! files written by [`ReportWriter`]:
//!
//! - `cleaned_bookings.csv`: the cleaned dataset with its derived columns
//! - `statistics.json`: a [`StatisticsReport`] with the cleaning summary, the
//!   view filter and the derived statistics
//!
//! # Example
//!
//! ```rust,ignore
//! use hotel_demand::reporting::{ReportWriter, StatisticsReport};
//!
//! let writer = ReportWriter::new("output");
//! writer.write_dataset(&dataset)?;
//! let report = StatisticsReport::new("data/hotel_bookings.csv", &filter, dataset.summary(), &stats);
//! writer.write_statistics(&report)?;
//! ```

mod writer;

pub use writer::{CLEANED_DATASET_FILE, ReportWriter, STATISTICS_FILE, StatisticsReport};
