//! Aggregation Layer
//!
//! Pure transforms from loaded tables (or filtered subsets) to summary
//! tables. Nothing in here knows about charts.
//!
//! - **grouping**: generic `count_by`, `sum_by`, `top_n_by_count`, `CrossTab`
//! - **summaries**: the per-panel reductions used by the dashboard

pub mod grouping;
pub mod summaries;

pub use grouping::{count_by, sum_by, top_n_by_count, CrossTab, Tally};
pub use summaries::{
    activities_per_category, all_day_supervision, per_entity_activity_count, school_type_density,
    schools_per_operator, schools_per_postcode, schools_per_type, students_per_district,
    students_per_district_and_type, students_per_operator, students_per_type, top_activities,
    PostcodeCount, TOP_ACTIVITIES,
};
