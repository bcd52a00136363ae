//! Comprehensive validation tests

mod common;

use common::{complete_output_tsv, complete_rows, header, label, output_row, valid_meta_yaml};
use dcase_submission_checker::models::{Category, MetadataDocument, Severity, Subtask};
use dcase_submission_checker::validation::{
    MetadataValidator, OutputTableValidator, check_filename_conventions, check_label_consistency,
    validate_meta, validate_output,
};
use dcase_submission_checker::{CheckerError, MetadataImporter};

fn errors_starting_with<'a>(
    report: &'a dcase_submission_checker::ValidationReport,
    prefix: &'a str,
) -> Vec<&'a str> {
    report
        .diagnostics()
        .iter()
        .filter(|d| d.is_error())
        .map(|d| d.message())
        .filter(|m| m.starts_with(prefix))
        .collect()
}

mod output_validation_tests {
    use super::*;

    #[test]
    fn test_complete_subtask_a_output_is_valid() {
        let schema = &Subtask::A.schema().output;
        let rows = complete_rows(Subtask::A);
        assert_eq!(rows.len(), 11880);

        let report = validate_output(&rows, &header(Subtask::A), schema);
        assert_eq!(report.error_count(), 0, "{}", report.render());
        assert!(report.diagnostics().is_empty());
    }

    #[test]
    fn test_complete_subtask_b_output_is_valid() {
        let validator = OutputTableValidator::new(&Subtask::B.schema().output);
        let report = validator.validate(&complete_rows(Subtask::B), &header(Subtask::B));
        assert!(report.is_valid(), "{}", report.render());
    }

    #[test]
    fn test_duplicate_filename_reported_once() {
        let validator = OutputTableValidator::new(&Subtask::A.schema().output);
        let rows = vec![
            output_row(Subtask::A, "0042.wav"),
            output_row(Subtask::A, "0042.wav"),
        ];
        let report = validator.validate(&rows, &header(Subtask::A));

        assert_eq!(
            errors_starting_with(&report, "Duplicate file"),
            vec!["Duplicate file [0042.wav] at row [2]"]
        );
        assert_eq!(
            errors_starting_with(&report, "Incorrect number"),
            vec!["Incorrect number of outputted entries [1 != 11880] (unique filenames counted)"]
        );
        assert_eq!(report.error_count(), 2);
    }

    #[test]
    fn test_file_index_boundaries() {
        let validator = OutputTableValidator::new(&Subtask::A.schema().output);
        let rows = vec![
            output_row(Subtask::A, "11879.wav"),
            output_row(Subtask::A, "11880.wav"),
            output_row(Subtask::A, "0.wav"),
            output_row(Subtask::A, "-1.wav"),
            output_row(Subtask::A, "x1.wav"),
            output_row(Subtask::A, "99999999999999999999.wav"),
        ];
        let report = validator.validate(&rows, &header(Subtask::A));

        assert_eq!(
            errors_starting_with(&report, "Illegal filename"),
            vec![
                "Illegal filename [11880.wav] at row [2] (file index too large)",
                "Illegal filename [-1.wav] at row [4] (file index too small)",
                "Illegal filename [x1.wav] at row [5] (file index not a number)",
                "Illegal filename [99999999999999999999.wav] at row [6] (file index too large)",
            ]
        );
    }

    #[test]
    fn test_float_field_rejection() {
        let validator = OutputTableValidator::new(&Subtask::A.schema().output);
        let airport = header(Subtask::A)
            .iter()
            .position(|f| f == "airport")
            .unwrap();

        let mut not_available = output_row(Subtask::A, "1.wav");
        not_available[airport] = "N/A".to_string();
        let mut fraction = output_row(Subtask::A, "2.wav");
        fraction[airport] = "0.87".to_string();
        let mut negative = output_row(Subtask::A, "3.wav");
        negative[airport] = "-3".to_string();

        let report = validator.validate(
            &[not_available, fraction, negative],
            &header(Subtask::A),
        );
        assert_eq!(
            errors_starting_with(&report, "Wrong field type"),
            vec!["Wrong field type at row [1] for field [airport=N/A]"]
        );
    }

    #[test]
    fn test_row_level_checks() {
        let validator = OutputTableValidator::new(&Subtask::B.schema().output);
        let mut short = output_row(Subtask::B, "1.wav");
        short.pop();
        let mut bad_label = output_row(Subtask::B, "2.wav");
        bad_label[1] = "airport".to_string();
        let rows = vec![
            short,
            bad_label,
            output_row(Subtask::B, "3.mp3"),
        ];

        let report = validator.validate(&rows, &header(Subtask::B));
        assert_eq!(
            errors_starting_with(&report, "Wrong field count"),
            vec!["Wrong field count at row [1]"]
        );
        assert_eq!(
            errors_starting_with(&report, "Use of illegal scene label"),
            vec!["Use of illegal scene label [airport] at row [2]"]
        );
        assert_eq!(
            errors_starting_with(&report, "Wrong file extension"),
            vec!["Wrong file extension for file [3.mp3] at row [3] (use '.wav')"]
        );
    }

    #[test]
    fn test_header_mismatch_lists_expected_columns() {
        let validator = OutputTableValidator::new(&Subtask::B.schema().output);
        let header: Vec<String> = ["filename", "scene_label", "indoor", "outdoor"]
            .iter()
            .map(|f| f.to_string())
            .collect();
        let report = validator.validate(&[], &header);

        let diagnostic = report
            .diagnostics()
            .iter()
            .find(|d| d.message() == "Errors in header fields in the output file")
            .unwrap();
        assert_eq!(
            diagnostic.continuation(),
            ["Correct header fields are [filename,scene_label,indoor,outdoor,transportation]"]
        );
    }

    #[test]
    fn test_columns_are_located_by_name() {
        let validator = OutputTableValidator::new(&Subtask::B.schema().output);
        let header: Vec<String> = ["scene_label", "transportation", "filename", "outdoor", "indoor"]
            .iter()
            .map(|f| f.to_string())
            .collect();
        let rows: Vec<Vec<String>> = vec![
            vec!["indoor", "0.1", "0.wav", "0.2", "0.7"],
            vec!["tram", "x", "1.wav", "0.2", "0.7"],
        ]
        .into_iter()
        .map(|row| row.into_iter().map(String::from).collect::<Vec<String>>())
        .collect();
        let table = dcase_submission_checker::OutputTable::new(header, rows);
        assert_eq!(table.column("filename"), Some(2));

        let report = validator.validate_table(&table);
        assert_eq!(
            report.messages(Category::Output).collect::<Vec<_>>(),
            vec![
                "Use of illegal scene label [tram] at row [2]",
                "Wrong field type at row [2] for field [transportation=x]",
                "Incorrect number of outputted entries [2 != 8640] (unique filenames counted)",
            ]
        );
    }

    #[test]
    fn test_extra_header_column_passes_field_check() {
        let validator = OutputTableValidator::new(&Subtask::B.schema().output);
        let mut header = header(Subtask::B);
        header.push("confidence".to_string());
        let report = validator.validate(&[], &header);

        assert!(errors_starting_with(&report, "Errors in header fields").is_empty());
    }
}

mod meta_validation_tests {
    use super::*;

    fn parse(yaml: &str) -> MetadataDocument {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn validate(subtask: Subtask, doc: &MetadataDocument) -> dcase_submission_checker::ValidationReport {
        validate_meta(doc, subtask.task_label(), &subtask.schema().meta).unwrap()
    }

    fn valid_doc(subtask: Subtask) -> MetadataDocument {
        parse(&valid_meta_yaml(subtask, &label(subtask, 1)))
    }

    #[test]
    fn test_complete_documents_are_valid() {
        for subtask in Subtask::ALL {
            let report = validate(subtask, &valid_doc(subtask));
            assert_eq!(report.error_count(), 0, "{}", report.render());
            assert!(report.diagnostics().is_empty(), "{}", report.render());
        }
    }

    #[test]
    fn test_submission_block_with_extra_field_passes() {
        let mut doc = valid_doc(Subtask::A);
        doc["submission"]["extra_field"] = "anything".into();
        assert!(validate(Subtask::A, &doc).is_valid());
    }

    #[test]
    fn test_missing_submission_field_is_reported() {
        let mut doc = valid_doc(Subtask::A);
        doc["submission"]
            .as_mapping_mut()
            .unwrap()
            .remove("name");
        let report = validate(Subtask::A, &doc);

        assert_eq!(report.error_count(), 1);
        let diagnostic = &report.diagnostics()[0];
        assert_eq!(
            diagnostic.message(),
            "'submission' block does not contain all required fields"
        );
        assert_eq!(
            diagnostic.continuation(),
            ["Fields required [label,name,abbreviation,authors]"]
        );
    }

    #[test]
    fn test_corresponding_author_cardinality() {
        let mut none = valid_doc(Subtask::A);
        none["submission"]["authors"][0]["corresponding"] = false.into();
        let report = validate(Subtask::A, &none);
        assert_eq!(report.error_count(), 1);
        assert_eq!(
            report.diagnostics()[0].message(),
            "'submission.author' block has to have one corresponding author marked"
        );

        let mut two = valid_doc(Subtask::A);
        two["submission"]["authors"][1]["corresponding"] = true.into();
        let report = validate(Subtask::A, &two);
        assert_eq!(report.error_count(), 1);
        assert_eq!(
            report.diagnostics()[0].message(),
            "'submission.author' block has more than one corresponding author marked"
        );
    }

    fn import(subtask: Subtask, yaml: &str) -> dcase_submission_checker::ValidationReport {
        let doc = MetadataImporter::new("Smith_TAU_task1a_1.meta.yaml")
            .parse(yaml)
            .unwrap();
        validate(subtask, &doc)
    }

    #[test]
    fn test_yaml11_false_marks_author_as_not_corresponding() {
        let yaml = valid_meta_yaml(Subtask::A, &label(Subtask::A, 1)).replace(
            "      email: john.doe@example.org\n",
            "      email: john.doe@example.org\n      corresponding: no\n",
        );
        let report = import(Subtask::A, &yaml);
        assert_eq!(report.error_count(), 0, "{}", report.render());

        let yaml = yaml.replace("corresponding: no", "corresponding: yes");
        let report = import(Subtask::A, &yaml);
        assert_eq!(
            report.diagnostics()[0].message(),
            "'submission.author' block has more than one corresponding author marked"
        );
    }

    #[test]
    fn test_repeated_key_keeps_last_value() {
        let yaml = valid_meta_yaml(Subtask::B, &label(Subtask::B, 1)).replace(
            "  abbreviation: Baseline\n",
            "  abbreviation: FarTooLongAbbreviation\n  abbreviation: Baseline\n",
        );
        let report = import(Subtask::B, &yaml);
        assert!(report.diagnostics().is_empty(), "{}", report.render());

        let yaml = valid_meta_yaml(Subtask::B, &label(Subtask::B, 1)).replace(
            "  abbreviation: Baseline\n",
            "  abbreviation: Baseline\n  abbreviation: FarTooLongAbbreviation\n",
        );
        let report = import(Subtask::B, &yaml);
        assert_eq!(
            report.diagnostics()[0].message(),
            "Submission abbreviation is too long ['FarTooLongAbbreviation' > 10]"
        );
    }

    #[test]
    fn test_incomplete_author_entry() {
        let mut doc = valid_doc(Subtask::B);
        doc["submission"]["authors"][1]
            .as_mapping_mut()
            .unwrap()
            .remove("email");
        let report = validate(Subtask::B, &doc);

        assert_eq!(report.error_count(), 1);
        assert_eq!(
            report.diagnostics()[0].message(),
            "'submission.author' block does not contain all required fields"
        );
    }

    #[test]
    fn test_label_construction() {
        let mut wrong_task = valid_doc(Subtask::A);
        wrong_task["submission"]["label"] = "Smith_TAU_task1b_1".into();
        let report = validate(Subtask::A, &wrong_task);
        assert_eq!(
            report.diagnostics()[0].message(),
            "Submission label is wrongly constructed [submission.label=Smith_TAU_task1b_1]"
        );

        let mut three_parts = valid_doc(Subtask::A);
        three_parts["submission"]["label"] = "Smith_task1a_1".into();
        assert_eq!(validate(Subtask::A, &three_parts).error_count(), 1);
    }

    #[test]
    fn test_abbreviation_length() {
        let mut doc = valid_doc(Subtask::A);
        doc["submission"]["abbreviation"] = "TenLetters".into();
        assert!(validate(Subtask::A, &doc).is_valid());

        doc["submission"]["abbreviation"] = "ElevenChars".into();
        let report = validate(Subtask::A, &doc);
        assert_eq!(
            report.diagnostics()[0].message(),
            "Submission abbreviation is too long ['ElevenChars' > 10]"
        );
    }

    #[test]
    fn test_missing_blocks_are_independent() {
        let doc = parse("submission:\n  label: x\n  authors: []\n");
        let report = validate(Subtask::A, &doc);

        let missing: Vec<&str> = report
            .messages(Category::Meta)
            .filter(|m| m.ends_with("block missing from meta file"))
            .collect();
        assert_eq!(
            missing,
            vec![
                "'system' block missing from meta file",
                "'results' block missing from meta file",
            ]
        );
        for diagnostic in report.diagnostics().iter().filter(|d| d.message().contains("missing")) {
            assert_eq!(
                diagnostic.continuation(),
                ["'submission', 'system', and 'results' blocks required at top level."]
            );
        }
    }

    #[test]
    fn test_total_parameters_must_be_integer() {
        let mut doc = valid_doc(Subtask::B);
        doc["system"]["complexity"]["total_parameters"] = "1.2M".into();
        let report = validate(Subtask::B, &doc);
        assert_eq!(report.error_count(), 1);
        assert_eq!(
            report.diagnostics()[0].message(),
            "'system.complexity.total_parameters' value not a number"
        );
    }

    #[test]
    fn test_missing_total_parameters_is_fatal() {
        let mut doc = valid_doc(Subtask::A);
        doc["system"]["complexity"]
            .as_mapping_mut()
            .unwrap()
            .remove("total_parameters");
        let result = validate_meta(&doc, "task1a", &Subtask::A.schema().meta);
        assert!(matches!(
            result,
            Err(CheckerError::MissingKey(key)) if key == "system.complexity.total_parameters"
        ));

        let mut doc = valid_doc(Subtask::A);
        doc["system"].as_mapping_mut().unwrap().remove("complexity");
        let result = validate_meta(&doc, "task1a", &Subtask::A.schema().meta);
        assert!(matches!(
            result,
            Err(CheckerError::MissingKey(key)) if key == "system.complexity"
        ));
    }

    #[test]
    fn test_missing_authors_is_fatal() {
        let mut doc = valid_doc(Subtask::A);
        doc["submission"].as_mapping_mut().unwrap().remove("authors");
        let result = validate_meta(&doc, "task1a", &Subtask::A.schema().meta);
        assert!(matches!(result, Err(CheckerError::MissingKey(_))));
    }

    #[test]
    fn test_external_dataset_entries() {
        let mut doc = valid_doc(Subtask::A);
        doc["system"]["external_datasets"][0]
            .as_mapping_mut()
            .unwrap()
            .remove("url");
        let report = validate(Subtask::A, &doc);
        assert_eq!(
            report.diagnostics()[0].message(),
            "'system.external_datasets' block does not contain all required fields"
        );
    }

    #[test]
    fn test_non_numeric_results_are_uncounted_by_default() {
        let mut doc = valid_doc(Subtask::A);
        doc["results"]["development_dataset"]["overall"]["accuracy"] = "high".into();
        doc["results"]["development_dataset"]["class_wise"]["tram"]["logloss"] = "n/a".into();
        doc["results"]["development_dataset"]["device_wise"]["s1"]["accuracy"] = "?".into();

        let report = validate(Subtask::A, &doc);
        assert_eq!(report.error_count(), 0);
        let messages: Vec<&str> = report.messages(Category::Meta).collect();
        assert_eq!(
            messages,
            vec![
                "'results.development_dataset.overall.accuracy' value is not numeric.",
                "'results.development_dataset.class_wise.tram.logloss' value is not numeric.",
                "'results.development_dataset.device_wise.s1.accuracy' value is not numeric.",
            ]
        );
        assert!(report
            .diagnostics()
            .iter()
            .all(|d| d.severity == Severity::Warning));

        let strict = MetadataValidator::new(&Subtask::A.schema().meta, "task1a")
            .with_strict_numeric(true)
            .validate(&doc)
            .unwrap();
        assert_eq!(strict.error_count(), 3);
    }

    #[test]
    fn test_class_wise_group_requires_every_class() {
        let mut doc = valid_doc(Subtask::B);
        doc["results"]["development_dataset"]["class_wise"]
            .as_mapping_mut()
            .unwrap()
            .remove("outdoor");
        doc["results"]["development_dataset"]["class_wise"]["indoor"]
            .as_mapping_mut()
            .unwrap()
            .remove("logloss");

        let report = validate(Subtask::B, &doc);
        let messages: Vec<&str> = report.messages(Category::Meta).collect();
        assert_eq!(
            messages,
            vec![
                "'results.development_dataset.class_wise' block does not contain all required fields",
                "'results.development_dataset.class_wise.indoor' block does not contain all required fields",
            ]
        );
        assert_eq!(report.error_count(), 2);
    }

    #[test]
    fn test_device_wise_results_ignored_for_subtask_b() {
        let mut doc = valid_doc(Subtask::B);
        doc["results"]["development_dataset"]["device_wise"] = parse("{a: {accuracy: bad}}");
        assert!(validate(Subtask::B, &doc).diagnostics().is_empty());
    }

    #[test]
    fn test_empty_result_groups_are_skipped() {
        let mut doc = valid_doc(Subtask::A);
        doc["results"]["development_dataset"]["class_wise"] = MetadataDocument::Null;
        doc["results"]["development_dataset"]["device_wise"] = parse("{}");
        assert!(validate(Subtask::A, &doc).is_valid());
    }
}

mod label_validation_tests {
    use super::*;

    #[test]
    fn test_label_consistency_round_trip() {
        let report = check_label_consistency(
            "Smith_Tampere_task1a_1.output.csv",
            "Smith_Tampere_task1a_1.meta.yaml",
            "Smith_Tampere_task1a_1",
        );
        assert_eq!(report.error_count(), 0);

        let output_changed = check_label_consistency(
            "Smith_Tampere_task1a_2.output.csv",
            "Smith_Tampere_task1a_1.meta.yaml",
            "Smith_Tampere_task1a_1",
        );
        assert_eq!(output_changed.error_count(), 1);
        assert!(output_changed.diagnostics()[0]
            .message()
            .contains("for system output"));

        let meta_changed = check_label_consistency(
            "Smith_Tampere_task1a_1.output.csv",
            "Smith_Tampere_task1a_2.meta.yaml",
            "Smith_Tampere_task1a_1",
        );
        assert_eq!(meta_changed.error_count(), 1);
        assert_eq!(
            meta_changed.diagnostics()[0].message(),
            "Submission label and filename for meta information do not match [Smith_Tampere_task1a_1 != Smith_Tampere_task1a_2.meta.yaml]"
        );

        let declared_changed = check_label_consistency(
            "Smith_Tampere_task1a_1.output.csv",
            "Smith_Tampere_task1a_1.meta.yaml",
            "Smith_Tampere_task1a_2",
        );
        assert_eq!(declared_changed.error_count(), 2);
        assert!(declared_changed
            .diagnostics()
            .iter()
            .all(|d| d.category == Category::Label));
    }

    #[test]
    fn test_filename_conventions() {
        let good = check_filename_conventions(
            "Smith_TAU_task1a_1.output.csv",
            "Smith_TAU_task1a_1.meta.yaml",
            Subtask::A,
        );
        assert!(good.is_valid());

        let bad_index = check_filename_conventions(
            "Smith_TAU_task1a_5.output.csv",
            "Smith_TAU_task1a_0.meta.yaml",
            Subtask::A,
        );
        assert_eq!(bad_index.error_count(), 2);
        assert_eq!(
            bad_index.diagnostics()[0].continuation(),
            ["Submission index number in submission label has to be 1-4"]
        );

        let wrong_task = check_filename_conventions(
            "Smith_TAU_task1b_1.output.csv",
            "Smith_TAU_task1a_1.meta.yaml",
            Subtask::A,
        );
        assert_eq!(wrong_task.error_count(), 1);
        assert_eq!(
            wrong_task.diagnostics()[0].continuation(),
            ["Correct format is [AUTHORLASTNAME]_[INSTITUTE]_[task1a]_[1-4]"]
        );

        let wrong_format = check_filename_conventions(
            "Smith_TAU_task1b_1.csv",
            "Smith_TAU_task1b_1.meta.yaml",
            Subtask::B,
        );
        assert_eq!(wrong_format.error_count(), 1);
        assert_eq!(wrong_format.diagnostics()[0].category, Category::Filename);
    }
}

mod submission_tests {
    use super::*;
    use dcase_submission_checker::submission::{EXIT_ERRORS, EXIT_OK};
    use dcase_submission_checker::{CheckerConfig, RunSummary, SubmissionUnit, check_submission};

    fn unit<'a>(label: &'a str, output: &'a str, meta: &'a str) -> (String, String, &'a str, &'a str) {
        (
            format!("{label}.output.csv"),
            format!("{label}.meta.yaml"),
            output,
            meta,
        )
    }

    #[test]
    fn test_check_submission_reports_each_stage() {
        let label = label(Subtask::B, 2);
        let output = complete_output_tsv(Subtask::B);
        let meta = valid_meta_yaml(Subtask::B, &label).replace("abbreviation: Baseline", "abbreviation: BaselineSystem");
        let (output_path, meta_path, output_content, meta_content) = unit(&label, &output, &meta);

        let outcome = check_submission(
            &SubmissionUnit {
                output_path: &output_path,
                output_content,
                meta_path: &meta_path,
                meta_content,
            },
            Subtask::B.schema(),
            &CheckerConfig::default(),
        )
        .unwrap();

        assert_eq!(outcome.output.error_count(), 0);
        assert_eq!(outcome.meta.error_count(), 1);
        assert_eq!(outcome.label.error_count(), 0);
        assert_eq!(outcome.error_count(), 1);
        assert_eq!(outcome.declared_label, label);
    }

    #[test]
    fn test_missing_declared_label_is_fatal() {
        let label = label(Subtask::A, 1);
        let output = complete_output_tsv(Subtask::A);
        let meta = valid_meta_yaml(Subtask::A, &label).replace(&format!("  label: {label}\n"), "");
        let (output_path, meta_path, output_content, meta_content) = unit(&label, &output, &meta);

        let result = check_submission(
            &SubmissionUnit {
                output_path: &output_path,
                output_content,
                meta_path: &meta_path,
                meta_content,
            },
            Subtask::A.schema(),
            &CheckerConfig::default(),
        );
        assert!(matches!(
            result,
            Err(CheckerError::MissingKey(key)) if key == "submission.label"
        ));
    }

    #[test]
    fn test_run_summary_verdict_and_exit_code() {
        let mut summary = RunSummary::new();
        summary.push("task1a -> Smith_TAU_task1a_1", Default::default());
        assert!(summary.is_accepted());
        assert_eq!(
            summary.verdict(),
            vec![
                "No errors found!",
                "Files are ready for submission to DCASE2020 Challenge.",
            ]
        );
        assert_eq!(summary.exit_code(&CheckerConfig::default()), EXIT_OK);

        let mut failing = dcase_submission_checker::ValidationReport::new();
        failing.error(Category::Output, "Wrong field count at row [1]");
        failing.error(Category::Label, "label mismatch");
        failing.warning(Category::Zip, "Bad files found in ZIP package.");
        summary.push("task1b -> Smith_TAU_task1b_1", failing);

        assert_eq!(summary.total_errors(), 2);
        assert_eq!(
            summary.verdict(),
            vec!["In total 2 errors found, please correct them before submitting to the challenge."]
        );
        assert_eq!(summary.exit_code(&CheckerConfig::default()), EXIT_ERRORS);
        assert_eq!(
            summary.exit_code(&CheckerConfig::new().with_fail_on_errors(false)),
            EXIT_OK
        );
    }
}
