//! Fixtures shared by the integration tests

#![allow(dead_code)]

use dcase_submission_checker::Subtask;

pub fn header(subtask: Subtask) -> Vec<String> {
    subtask
        .schema()
        .output
        .fields
        .iter()
        .map(|f| f.to_string())
        .collect()
}

/// A well-formed output row for the given file
pub fn output_row(subtask: Subtask, filename: &str) -> Vec<String> {
    let output = &subtask.schema().output;
    let mut row = vec![filename.to_string(), output.scene_labels[0].to_string()];
    row.extend(output.fields[2..].iter().map(|_| "0.1".to_string()));
    row
}

/// Every file index of the subtask, each once, in order
pub fn complete_rows(subtask: Subtask) -> Vec<Vec<String>> {
    let output = &subtask.schema().output;
    (output.index_min..=output.index_max)
        .map(|index| output_row(subtask, &format!("audio/{index}.wav")))
        .collect()
}

/// Complete output file as tab-separated text
pub fn complete_output_tsv(subtask: Subtask) -> String {
    let mut lines = vec![header(subtask).join("\t")];
    lines.extend(complete_rows(subtask).iter().map(|row| row.join("\t")));
    lines.join("\n") + "\n"
}

pub fn label(subtask: Subtask, index: u8) -> String {
    format!("Smith_TAU_{}_{index}", subtask.task_label())
}

/// Complete, valid metadata document
pub fn valid_meta_yaml(subtask: Subtask, label: &str) -> String {
    let meta = &subtask.schema().meta;
    let mut yaml = format!(
        r#"submission:
  label: {label}
  name: Baseline system
  abbreviation: Baseline
  authors:
    - lastname: Smith
      firstname: Jane
      email: jane.smith@example.org
      corresponding: true
      affiliation:
        abbreviation: TAU
        institute: Tampere University
    - lastname: Doe
      firstname: John
      email: john.doe@example.org
      affiliation:
        institute: Tampere University
system:
  description:
    input_sampling_rate: 44.1kHz
    acoustic_features: log-mel energies
    embeddings: ~
    data_augmentation: mixup
    machine_learning_method: CNN
    ensemble_method_subsystem_count: ~
    decision_making: ~
    external_data_usage: ~
    complexity_management: weight quantization
  complexity:
    total_parameters: 116118
    total_parameters_non_zero: 116118
    model_size: 453.6
  external_datasets:
    - name: AudioSet
      url: https://research.google.com/audioset/
      total_audio_length: 20000
  source_code: https://github.com/example/baseline
results:
  development_dataset:
    overall:
      accuracy: 54.1
      logloss: 1.365
    class_wise:
"#
    );
    for class in meta.class_wise.items {
        yaml.push_str(&format!("      {class}:\n        accuracy: 50.0\n        logloss: 1.2\n"));
    }
    if let Some(device_wise) = &meta.device_wise {
        yaml.push_str("    device_wise:\n");
        for device in device_wise.items {
            yaml.push_str(&format!("      {device}:\n        accuracy: 50.0\n        logloss: 1.2\n"));
        }
    }
    yaml
}
