//! Fixed schemas of the two Task 1 subtasks
//!
//! Both schemas are plain `static` values: built once, never mutated, and
//! handed explicitly to every validator call.

use serde::Serialize;
use std::fmt;

use crate::error::{CheckerError, CheckerResult};

/// Challenge subtask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Subtask {
    /// Task 1A, ten scene classes recorded with multiple devices
    A,
    /// Task 1B, three scene classes under a model size budget
    B,
}

impl Subtask {
    pub const ALL: [Subtask; 2] = [Subtask::A, Subtask::B];

    /// Task token embedded in submission labels
    pub fn task_label(self) -> &'static str {
        match self {
            Subtask::A => "task1a",
            Subtask::B => "task1b",
        }
    }

    /// Parse the command line selector (`A`/`B`, case-insensitive)
    pub fn from_selector(selector: &str) -> CheckerResult<Self> {
        match selector.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(Subtask::A),
            "b" => Ok(Subtask::B),
            _ => Err(CheckerError::UnknownTask(selector.to_string())),
        }
    }

    /// Map a task token (`task1a`/`task1b`) to its subtask
    pub fn from_task_label(token: &str) -> Option<Self> {
        Subtask::ALL
            .into_iter()
            .find(|subtask| subtask.task_label() == token)
    }

    pub fn schema(self) -> &'static Schema {
        match self {
            Subtask::A => &SUBTASK_A,
            Subtask::B => &SUBTASK_B,
        }
    }
}

impl fmt::Display for Subtask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.task_label())
    }
}

/// Ordered list of field names
pub type FieldList = &'static [&'static str];

/// Complete schema of one subtask
#[derive(Debug)]
pub struct Schema {
    pub subtask: Subtask,
    pub output: OutputSchema,
    pub meta: MetaSchema,
}

/// Column and row rules for the system output table
#[derive(Debug)]
pub struct OutputSchema {
    /// Expected header, in file order
    pub fields: FieldList,
    /// Columns that must hold floating point values
    pub float_fields: FieldList,
    /// Permitted values of the `scene_label` column
    pub scene_labels: FieldList,
    /// Inclusive range of the integer filename stem
    pub index_min: i64,
    pub index_max: i64,
    /// Number of distinct filenames a complete output contains
    pub unique_file_count: usize,
}

/// Required-field tree of the metadata document
#[derive(Debug)]
pub struct MetaSchema {
    pub submission: FieldList,
    pub authors: FieldList,
    pub system: FieldList,
    pub description: FieldList,
    pub complexity: FieldList,
    pub external_datasets: FieldList,
    pub results: FieldList,
    pub development_dataset: FieldList,
    pub overall: FieldList,
    pub class_wise: ItemGroupSchema,
    /// Only subtask A reports device-wise results
    pub device_wise: Option<ItemGroupSchema>,
}

/// A results group keyed by a fixed enumeration (classes or devices)
#[derive(Debug)]
pub struct ItemGroupSchema {
    pub items: FieldList,
    pub per_item: FieldList,
}

const SCENES_A: FieldList = &[
    "airport",
    "shopping_mall",
    "metro_station",
    "street_pedestrian",
    "public_square",
    "street_traffic",
    "tram",
    "bus",
    "metro",
    "park",
];

const SCENES_B: FieldList = &["indoor", "outdoor", "transportation"];

const SUBMISSION_FIELDS: FieldList = &["label", "name", "abbreviation", "authors"];
const AUTHOR_FIELDS: FieldList = &["lastname", "firstname", "email", "affiliation"];
const SYSTEM_FIELDS: FieldList = &[
    "description",
    "complexity",
    "external_datasets",
    "source_code",
];
const EXTERNAL_DATASET_FIELDS: FieldList = &["name", "url", "total_audio_length"];
const RESULT_FIELDS: FieldList = &["development_dataset"];
const SCORE_FIELDS: FieldList = &["accuracy", "logloss"];

pub static SUBTASK_A: Schema = Schema {
    subtask: Subtask::A,
    output: OutputSchema {
        fields: &[
            "filename",
            "scene_label",
            "airport",
            "bus",
            "metro",
            "metro_station",
            "park",
            "public_square",
            "shopping_mall",
            "street_pedestrian",
            "street_traffic",
            "tram",
        ],
        float_fields: SCENES_A,
        scene_labels: SCENES_A,
        index_min: 0,
        index_max: 11879,
        unique_file_count: 11880,
    },
    meta: MetaSchema {
        submission: SUBMISSION_FIELDS,
        authors: AUTHOR_FIELDS,
        system: SYSTEM_FIELDS,
        description: &[
            "input_sampling_rate",
            "acoustic_features",
            "embeddings",
            "data_augmentation",
            "machine_learning_method",
            "ensemble_method_subsystem_count",
            "decision_making",
            "external_data_usage",
        ],
        complexity: &["total_parameters"],
        external_datasets: EXTERNAL_DATASET_FIELDS,
        results: RESULT_FIELDS,
        development_dataset: &["overall", "class_wise", "device_wise"],
        overall: SCORE_FIELDS,
        class_wise: ItemGroupSchema {
            items: SCENES_A,
            per_item: SCORE_FIELDS,
        },
        device_wise: Some(ItemGroupSchema {
            items: &["a", "b", "c", "s1", "s2", "s3", "s4", "s5", "s6"],
            per_item: SCORE_FIELDS,
        }),
    },
};

pub static SUBTASK_B: Schema = Schema {
    subtask: Subtask::B,
    output: OutputSchema {
        fields: &["filename", "scene_label", "indoor", "outdoor", "transportation"],
        float_fields: SCENES_B,
        scene_labels: SCENES_B,
        index_min: 0,
        index_max: 8639,
        unique_file_count: 8640,
    },
    meta: MetaSchema {
        submission: SUBMISSION_FIELDS,
        authors: AUTHOR_FIELDS,
        system: SYSTEM_FIELDS,
        description: &[
            "input_sampling_rate",
            "acoustic_features",
            "embeddings",
            "data_augmentation",
            "machine_learning_method",
            "ensemble_method_subsystem_count",
            "decision_making",
            "external_data_usage",
            "complexity_management",
        ],
        complexity: &["total_parameters", "total_parameters_non_zero", "model_size"],
        external_datasets: EXTERNAL_DATASET_FIELDS,
        results: RESULT_FIELDS,
        development_dataset: &["overall", "class_wise"],
        overall: SCORE_FIELDS,
        class_wise: ItemGroupSchema {
            items: SCENES_B,
            per_item: SCORE_FIELDS,
        },
        device_wise: None,
    },
};
