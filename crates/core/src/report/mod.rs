//! Report module - lays computed disposals out as the lines of form 2086.

mod report_builder;
mod report_model;

pub use report_builder::build_form_2086_report;
pub use report_model::{Form2086Report, ReportLine, ReportSection};
