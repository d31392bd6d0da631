//! Export of training artefacts to CSV

mod history_csv;

pub use history_csv::{
    ComparisonRecord, HistoryRecord, ValueRecord, comparison_records, history_records,
    value_records, write_comparison, write_history, write_value_table,
};
