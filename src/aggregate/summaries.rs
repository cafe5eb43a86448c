//! Dashboard summaries
//!
//! One function per chart panel, each a direct groupby over one table.
//! Empty key fields count as missing and are dropped only from the summary
//! that groups by them.

use serde::Serialize;

use super::grouping::{count_by, sum_by, top_n_by_count, CrossTab, Tally};
use crate::dataset::{non_empty, ActivityRecord, SchoolRecord, StudentRecord};

/// Number of bars in the top-activities chart
pub const TOP_ACTIVITIES: usize = 30;

fn key(value: &str) -> Option<String> {
    non_empty(value).map(str::to_string)
}

fn key2(a: &str, b: &str) -> Option<(String, String)> {
    Some((key(a)?, key(b)?))
}

/// Schools per school type
pub fn schools_per_type(schools: &[SchoolRecord]) -> Tally<String> {
    count_by(schools, |s| key(&s.school_type))
}

/// School counts with school types as rows and districts as columns
pub fn school_type_density(schools: &[SchoolRecord]) -> CrossTab<String, String> {
    let tally = count_by(schools, |s| key2(&s.school_type, &s.district));
    CrossTab::from_tally(&tally)
}

/// Schools per (operator, district)
pub fn schools_per_operator(schools: &[SchoolRecord]) -> Tally<(String, String)> {
    count_by(schools, |s| key2(&s.operator, &s.district))
}

/// Schools per (district, all-day form); schools without the flag are left out
pub fn all_day_supervision(schools: &[SchoolRecord]) -> Tally<(String, String)> {
    count_by(schools, |s| {
        let form = s.all_day.as_deref()?;
        key2(&s.district, form)
    })
}

/// School count of one postal code area
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostcodeCount {
    pub district: String,
    pub postal_code: String,
    pub schools: u64,
}

/// Schools per (district, postal code), ordered by district name
pub fn schools_per_postcode(schools: &[SchoolRecord]) -> Vec<PostcodeCount> {
    let tally = count_by(schools, |s| key2(&s.district, s.postal_code.as_deref()?));

    let mut counts: Vec<PostcodeCount> = tally
        .into_entries()
        .into_iter()
        .map(|((district, postal_code), schools)| PostcodeCount {
            district,
            postal_code,
            schools,
        })
        .collect();
    counts.sort_by(|a, b| a.district.cmp(&b.district));
    counts
}

/// Students per school type
///
/// Rows without a count are left out of this and every other student sum.
pub fn students_per_type(students: &[StudentRecord]) -> Tally<String> {
    sum_by(students, |s| key(&s.school_type), |s| s.students)
}

/// Students per district
pub fn students_per_district(students: &[StudentRecord]) -> Tally<String> {
    sum_by(students, |s| key(&s.district), |s| s.students)
}

/// Students per (district, school type)
pub fn students_per_district_and_type(students: &[StudentRecord]) -> Tally<(String, String)> {
    sum_by(students, |s| key2(&s.district, &s.school_type), |s| s.students)
}

/// Students per (district, operator, school type)
pub fn students_per_operator(students: &[StudentRecord]) -> Tally<(String, String, String)> {
    sum_by(
        students,
        |s| Some((key(&s.district)?, key(&s.operator)?, key(&s.school_type)?)),
        |s| s.students,
    )
}

/// Activity rows per activity category
pub fn activities_per_category(activities: &[ActivityRecord]) -> Tally<String> {
    count_by(activities, |a| key(&a.category))
}

/// Distinct activity names per school
///
/// Two stages: duplicate (school, activity) rows collapse into one pair,
/// then pairs are counted per school.
pub fn per_entity_activity_count(activities: &[ActivityRecord]) -> Tally<String> {
    let pairs = count_by(activities, |a| key2(&a.school, &a.name));
    count_by(pairs.keys(), |(school, _)| Some(school.clone()))
}

/// The most frequent activity names
pub fn top_activities(activities: &[ActivityRecord], n: usize) -> Vec<(String, u64)> {
    top_n_by_count(activities, |a| key(&a.name), n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{sample_activities, sample_schools, sample_students};

    #[test]
    fn test_schools_per_type() {
        let tally = schools_per_type(&sample_schools());
        assert_eq!(tally.get(&"Grundschule".to_string()), Some(5));
        assert_eq!(tally.get(&"Gymnasium".to_string()), Some(1));
        assert_eq!(tally.total(), 7);
    }

    #[test]
    fn test_school_type_density() {
        let tab = school_type_density(&sample_schools());
        assert_eq!(tab.rows[0], "Grundschule");
        assert_eq!(tab.columns[0], "Mitte");
        assert_eq!(tab.get(&"Grundschule".to_string(), &"Mitte".to_string()), 2);
        assert_eq!(tab.get(&"Gymnasium".to_string(), &"Pankow".to_string()), 0);
    }

    #[test]
    fn test_schools_per_operator() {
        let tally = schools_per_operator(&sample_schools());
        assert_eq!(tally.get(&("privat".to_string(), "Mitte".to_string())), Some(1));
        assert_eq!(tally.get(&("öffentlich".to_string(), "Mitte".to_string())), Some(2));
    }

    #[test]
    fn test_all_day_excludes_missing_flag() {
        let schools = sample_schools();
        let tally = all_day_supervision(&schools);

        let with_flag = schools.iter().filter(|s| s.all_day.is_some()).count() as u64;
        assert_eq!(tally.total(), with_flag);
        assert_eq!(tally.get(&("Mitte".to_string(), "offen".to_string())), Some(1));
        assert_eq!(tally.get(&("Mitte".to_string(), "gebunden".to_string())), Some(1));

        // The same schools still count everywhere else
        assert_eq!(schools_per_type(&schools).total(), schools.len() as u64);
    }

    #[test]
    fn test_schools_per_postcode_sorted_by_district() {
        let counts = schools_per_postcode(&sample_schools());
        assert!(counts.windows(2).all(|w| w[0].district <= w[1].district));

        let mitte_10435 = counts
            .iter()
            .find(|c| c.district == "Mitte" && c.postal_code == "10435")
            .unwrap();
        assert_eq!(mitte_10435.schools, 2);

        // A school without postal code is not grouped
        assert!(counts.iter().all(|c| c.postal_code != ""));
    }

    #[test]
    fn test_student_sums() {
        let students = sample_students();
        assert_eq!(students_per_type(&students).get(&"Grundschule".to_string()), Some(27900));
        assert_eq!(students_per_district(&students).get(&"Pankow".to_string()), Some(16100));
        assert_eq!(
            students_per_district_and_type(&students)
                .get(&("Mitte".to_string(), "Grundschule".to_string())),
            Some(12900)
        );
        assert_eq!(
            students_per_operator(&students).get(&(
                "Mitte".to_string(),
                "privat".to_string(),
                "Grundschule".to_string()
            )),
            Some(900)
        );
    }

    #[test]
    fn test_student_sums_skip_uncounted_rows() {
        let mut students = sample_students();
        students.push(StudentRecord::uncounted("Pankow", "Grundschule", "öffentlich"));
        students.push(StudentRecord::uncounted("Spandau", "Gymnasium", "privat"));

        assert_eq!(students_per_district(&students).get(&"Pankow".to_string()), Some(16100));
        assert_eq!(students_per_district(&students).get(&"Spandau".to_string()), None);
        assert_eq!(students_per_type(&students).get(&"Grundschule".to_string()), Some(27900));
        assert_eq!(students_per_operator(&students).total(), 46000);
    }

    #[test]
    fn test_activities_per_category() {
        let tally = activities_per_category(&sample_activities());
        assert_eq!(tally.get(&"Spiele".to_string()), Some(3));
        assert_eq!(tally.get(&"Sport".to_string()), Some(2));
    }

    #[test]
    fn test_per_entity_activity_count_deduplicates() {
        let activities = vec![
            ActivityRecord::new("1", "A", "X", "c"),
            ActivityRecord::new("2", "A", "X", "c"),
            ActivityRecord::new("3", "A", "Y", "c"),
        ];
        let tally = per_entity_activity_count(&activities);
        assert_eq!(tally.get(&"A".to_string()), Some(2));
        assert_eq!(tally.len(), 1);
    }

    #[test]
    fn test_per_entity_activity_count_fixture() {
        let tally = per_entity_activity_count(&sample_activities());
        assert_eq!(tally.get(&"01G01".to_string()), Some(2));
        assert_eq!(tally.get(&"01Y02".to_string()), Some(2));
        assert_eq!(tally.get(&"03G04".to_string()), Some(3));
        assert_eq!(tally.get(&"08K05".to_string()), Some(1));
    }

    #[test]
    fn test_top_activities() {
        let top = top_activities(&sample_activities(), 2);
        assert_eq!(top, vec![("Schach".to_string(), 3), ("Chor".to_string(), 2)]);
    }
}
