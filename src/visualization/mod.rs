mod charts;
mod tables;

pub use charts::{format_growth_chart, print_growth_chart};
pub use tables::{
    format_curve_table, format_model_table, format_prediction_table, format_target_summary,
    print_curve_table, print_model_table, print_prediction_table, print_target_summary,
};
