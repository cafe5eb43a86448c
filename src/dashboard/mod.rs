//! Dashboard Page Layout
//!
//! Wires the aggregation layer to the panel figures and arranges them into
//! the page: sections of rows of panels. All static figures are computed
//! once by [`Dashboard::build`]; only the school map slot changes per session.
//!
//! # Example
//!
//! ```rust
//! use schooldash::dashboard::{Dashboard, PanelId};
//! use schooldash::dataset::Datasets;
//!
//! let dashboard = Dashboard::build(&Datasets::default());
//! assert!(dashboard.figure(PanelId::TopActivities).is_some());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::aggregate::{self, TOP_ACTIVITIES};
use crate::chart::{panels, Figure};
use crate::dataset::{Datasets, District};
use crate::view::SCHOOL_MAP_SLOT;

/// Page title
pub const TITLE: &str = "Schools of Berlin";

/// Identifier of every panel on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelId {
    SchoolTypeShare,
    SchoolTypeDensity,
    OperatorByDistrict,
    AllDaySupervision,
    SchoolsPerDistrictMap,
    SchoolsPerPostcode,
    SchoolSearch,
    StudentTypeShare,
    StudentTreemap,
    StudentDistrictMap,
    StudentsPerSchoolType,
    ActivityCategories,
    ActivitiesPerSchool,
    TopActivities,
}

impl PanelId {
    pub const ALL: [PanelId; 14] = [
        PanelId::SchoolTypeShare,
        PanelId::SchoolTypeDensity,
        PanelId::OperatorByDistrict,
        PanelId::AllDaySupervision,
        PanelId::SchoolsPerDistrictMap,
        PanelId::SchoolsPerPostcode,
        PanelId::SchoolSearch,
        PanelId::StudentTypeShare,
        PanelId::StudentTreemap,
        PanelId::StudentDistrictMap,
        PanelId::StudentsPerSchoolType,
        PanelId::ActivityCategories,
        PanelId::ActivitiesPerSchool,
        PanelId::TopActivities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelId::SchoolTypeShare => "school-type-share",
            PanelId::SchoolTypeDensity => "school-type-density",
            PanelId::OperatorByDistrict => "operator-by-district",
            PanelId::AllDaySupervision => "all-day-supervision",
            PanelId::SchoolsPerDistrictMap => "schools-per-district-map",
            PanelId::SchoolsPerPostcode => "schools-per-postcode",
            PanelId::SchoolSearch => "school-search",
            PanelId::StudentTypeShare => "student-type-share",
            PanelId::StudentTreemap => "student-treemap",
            PanelId::StudentDistrictMap => "student-district-map",
            PanelId::StudentsPerSchoolType => "students-per-school-type",
            PanelId::ActivityCategories => "activity-categories",
            PanelId::ActivitiesPerSchool => "activities-per-school",
            PanelId::TopActivities => "top-activities",
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown panel: {0}")]
pub struct UnknownPanel(pub String);

impl FromStr for PanelId {
    type Err = UnknownPanel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownPanel(s.to_string()))
    }
}

/// One dropdown entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistrictOption {
    pub label: &'static str,
    pub value: &'static str,
}

/// Dropdown entries in district order
pub fn district_options() -> Vec<DistrictOption> {
    District::ALL
        .iter()
        .map(|d| DistrictOption {
            label: d.name(),
            value: d.name(),
        })
        .collect()
}

/// What a panel displays
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelContent {
    Chart {
        figure: Figure,
    },
    /// The district dropdown and the slot its output is rendered into
    DistrictFilter {
        options: Vec<DistrictOption>,
        value: String,
        output: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub id: PanelId,
    /// Share of the row width in percent
    pub width: u8,
    #[serde(flatten)]
    pub content: PanelContent,
}

impl Panel {
    fn chart(id: PanelId, width: u8, figure: Figure) -> Self {
        Self {
            id,
            width,
            content: PanelContent::Chart { figure },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub panels: Vec<Panel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub id: String,
    pub heading: String,
    pub rows: Vec<Row>,
}

impl Section {
    fn new(id: &str, heading: &str, rows: Vec<Vec<Panel>>) -> Self {
        Self {
            id: id.to_string(),
            heading: heading.to_string(),
            rows: rows.into_iter().map(|panels| Row { panels }).collect(),
        }
    }
}

/// The complete page with every static figure computed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<Section>,
}

impl Dashboard {
    /// Compute all static panels from the loaded datasets
    pub fn build(datasets: &Datasets) -> Self {
        let schools = datasets.schools();
        let students = datasets.students();
        let activities = datasets.activities();
        let boundaries = datasets.districts();

        let density = aggregate::school_type_density(schools);

        let school_section = Section::new(
            "section-1",
            "ANALYSIS OF SCHOOL NUMBERS AND TYPES",
            vec![
                vec![
                    Panel::chart(
                        PanelId::SchoolTypeShare,
                        50,
                        panels::school_type_share(&aggregate::schools_per_type(schools)),
                    ),
                    Panel::chart(
                        PanelId::SchoolTypeDensity,
                        50,
                        panels::school_type_density(&density),
                    ),
                ],
                vec![
                    Panel::chart(
                        PanelId::OperatorByDistrict,
                        50,
                        panels::operator_by_district(&aggregate::schools_per_operator(schools)),
                    ),
                    Panel::chart(
                        PanelId::AllDaySupervision,
                        50,
                        panels::all_day_supervision(&aggregate::all_day_supervision(schools)),
                    ),
                ],
                vec![
                    Panel::chart(
                        PanelId::SchoolsPerDistrictMap,
                        50,
                        panels::schools_per_district_map(&density, boundaries),
                    ),
                    Panel::chart(
                        PanelId::SchoolsPerPostcode,
                        50,
                        panels::schools_per_postcode(&aggregate::schools_per_postcode(schools)),
                    ),
                ],
            ],
        );

        let search_section = Section::new(
            "section-2",
            "SCHOOL SEARCH",
            vec![vec![Panel {
                id: PanelId::SchoolSearch,
                width: 100,
                content: PanelContent::DistrictFilter {
                    options: district_options(),
                    value: String::new(),
                    output: SCHOOL_MAP_SLOT,
                },
            }]],
        );

        let student_section = Section::new(
            "section-3",
            "Students",
            vec![
                vec![
                    Panel::chart(
                        PanelId::StudentTypeShare,
                        50,
                        panels::student_type_share(&aggregate::students_per_type(students)),
                    ),
                    Panel::chart(
                        PanelId::StudentTreemap,
                        50,
                        panels::student_treemap(&aggregate::students_per_district_and_type(students)),
                    ),
                ],
                vec![
                    Panel::chart(
                        PanelId::StudentDistrictMap,
                        50,
                        panels::student_district_map(
                            &aggregate::students_per_district(students),
                            boundaries,
                        ),
                    ),
                    Panel::chart(
                        PanelId::StudentsPerSchoolType,
                        50,
                        panels::students_per_school_type(&aggregate::students_per_operator(students)),
                    ),
                ],
            ],
        );

        let activity_section = Section::new(
            "section-4",
            "Activities",
            vec![
                vec![
                    Panel::chart(
                        PanelId::ActivityCategories,
                        60,
                        panels::activity_categories(&aggregate::activities_per_category(activities)),
                    ),
                    Panel::chart(
                        PanelId::ActivitiesPerSchool,
                        40,
                        panels::activities_per_school(&aggregate::per_entity_activity_count(
                            activities,
                        )),
                    ),
                ],
                vec![Panel::chart(
                    PanelId::TopActivities,
                    100,
                    panels::top_activities(
                        &aggregate::top_activities(activities, TOP_ACTIVITIES),
                        TOP_ACTIVITIES,
                    ),
                )],
            ],
        );

        Self {
            title: TITLE.to_string(),
            generated_at: Utc::now(),
            sections: vec![school_section, search_section, student_section, activity_section],
        }
    }

    /// All panels in page order
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .flat_map(|r| r.panels.iter())
    }

    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.panels().find(|p| p.id == id)
    }

    /// The figure of a chart panel; `None` for the filter panel
    pub fn figure(&self, id: PanelId) -> Option<&Figure> {
        match &self.panel(id)?.content {
            PanelContent::Chart { figure } => Some(figure),
            PanelContent::DistrictFilter { .. } => None,
        }
    }
}
