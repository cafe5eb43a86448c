//! Read-only dataset context
//!
//! `Datasets` is constructed once by the loader and then shared by reference
//! (usually as `Arc<Datasets>`) with the aggregation layer, the dashboard
//! builder and every view session. It exposes no mutation methods.

use super::district::District;
use super::types::{
    ActivityRecord, DatasetStats, DistrictBoundaries, SchoolRecord, StudentRecord,
};

/// The four loaded tables
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    schools: Vec<SchoolRecord>,
    students: Vec<StudentRecord>,
    activities: Vec<ActivityRecord>,
    districts: DistrictBoundaries,
}

impl Datasets {
    pub fn new(
        schools: Vec<SchoolRecord>,
        students: Vec<StudentRecord>,
        activities: Vec<ActivityRecord>,
        districts: DistrictBoundaries,
    ) -> Self {
        Self {
            schools,
            students,
            activities,
            districts,
        }
    }

    pub fn schools(&self) -> &[SchoolRecord] {
        &self.schools
    }

    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    pub fn activities(&self) -> &[ActivityRecord] {
        &self.activities
    }

    pub fn districts(&self) -> &DistrictBoundaries {
        &self.districts
    }

    /// Schools located in one district
    pub fn schools_in(&self, district: District) -> impl Iterator<Item = &SchoolRecord> {
        self.schools
            .iter()
            .filter(move |s| district.matches(&s.district))
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            schools: self.schools.len(),
            students: self.students.len(),
            activities: self.activities.len(),
            districts: self.districts.len(),
        }
    }

    /// Whether every table holds at least one row
    pub fn is_complete(&self) -> bool {
        !self.schools.is_empty()
            && !self.students.is_empty()
            && !self.activities.is_empty()
            && !self.districts.is_empty()
    }
}
