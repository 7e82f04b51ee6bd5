use crate::upload::{SelectedFile, SubmissionOutcome};
use derivative::Derivative;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    FileSelected,
    Submitting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedDownload {
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Derivative, Default)]
#[derivative(Debug)]
pub struct FormState {
    pub selected_file: Option<SelectedFile>,
    /// Set while a request is in flight; drives the spinner and cursor.
    pub busy: bool,
    pub notice: Option<String>,
    pub polylines: Vec<Value>,
    pub rendered_polylines: String,
    pub last_download: Option<SavedDownload>,
    #[derivative(Debug = "ignore")]
    pub outcome_receiver: Option<Receiver<SubmissionOutcome>>,
}

impl FormState {
    pub fn phase(&self) -> FormPhase {
        if self.busy {
            FormPhase::Submitting
        } else if self.selected_file.is_some() {
            FormPhase::FileSelected
        } else {
            FormPhase::Idle
        }
    }

    pub fn selected_file_name(&self) -> Option<&str> {
        self.selected_file.as_ref().map(|f| f.name.as_str())
    }

    /// Pretty-printed polyline records, or None when there is nothing to show.
    pub fn rendered_output(&self) -> Option<&str> {
        if self.polylines.is_empty() {
            None
        } else {
            Some(&self.rendered_polylines)
        }
    }

    pub fn set_polylines(&mut self, records: Vec<Value>) -> Result<(), serde_json::Error> {
        let display: Vec<Value> = records.iter().cloned().map(integral_floats_as_ints).collect();
        self.rendered_polylines = serde_json::to_string_pretty(&display)?;
        self.polylines = records;
        Ok(())
    }

    pub fn finish_submission(&mut self) {
        self.busy = false;
        self.outcome_receiver = None;
    }
}

/// Largest magnitude below which every integral f64 is exact as an i64.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Rewrites floats with no fractional part as integers, so `0.0` prints as
/// `0` the way JavaScript number formatting does.
fn integral_floats_as_ints(value: Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_INT => Value::from(f as i64),
            _ => Value::Number(n),
        },
        Value::Array(items) => {
            Value::Array(items.into_iter().map(integral_floats_as_ints).collect())
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, integral_floats_as_ints(v)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_phase_follows_selection_and_busy() {
        let mut state = FormState::default();
        assert_eq!(state.phase(), FormPhase::Idle);

        state.selected_file = Some(SelectedFile::new("drawing.dxf", vec![1, 2, 3]));
        assert_eq!(state.phase(), FormPhase::FileSelected);

        state.busy = true;
        assert_eq!(state.phase(), FormPhase::Submitting);

        state.finish_submission();
        assert_eq!(state.phase(), FormPhase::FileSelected);
    }

    #[test]
    fn test_rendered_output_is_two_space_pretty_json() {
        let mut state = FormState::default();
        state
            .set_polylines(vec![json!({"id": 1, "points": [[0, 0], [1, 1]]})])
            .unwrap();

        let expected = "[\n  {\n    \"id\": 1,\n    \"points\": [\n      [\n        0,\n        0\n      ],\n      [\n        1,\n        1\n      ]\n    ]\n  }\n]";
        assert_eq!(state.rendered_output(), Some(expected));
    }

    #[test]
    fn test_integral_float_coordinates_render_like_javascript() {
        let records: Vec<Value> = serde_json::from_str(
            r#"[{"points":[[0.0,0.0],[1150.0,2300.5]],"is_closed":false,"layer":"0"}]"#,
        )
        .unwrap();
        let mut state = FormState::default();

        state.set_polylines(records.clone()).unwrap();

        let expected = "[\n  {\n    \"points\": [\n      [\n        0,\n        0\n      ],\n      [\n        1150,\n        2300.5\n      ]\n    ],\n    \"is_closed\": false,\n    \"layer\": \"0\"\n  }\n]";
        assert_eq!(state.rendered_output(), Some(expected));
        assert_eq!(state.polylines, records);
    }

    #[test]
    fn test_negative_zero_and_large_values() {
        let mut state = FormState::default();
        state
            .set_polylines(vec![json!([-0.0, -12.0, 1e300, 0.25])])
            .unwrap();

        let output = state.rendered_output().unwrap();
        assert!(output.contains("    0,\n"));
        assert!(output.contains("    -12,\n"));
        assert!(output.contains("e300"));
        assert!(output.contains("0.25"));
    }

    #[test]
    fn test_empty_result_renders_nothing() {
        let mut state = FormState::default();
        state.set_polylines(Vec::new()).unwrap();

        assert_eq!(state.rendered_output(), None);
    }

    #[test]
    fn test_debug_omits_file_bytes() {
        let state = FormState {
            selected_file: Some(SelectedFile::new("drawing.dxf", vec![0xde, 0xad])),
            ..FormState::default()
        };

        let debug = format!("{:?}", state);
        assert!(debug.contains("drawing.dxf"));
        assert!(!debug.contains("222"));
        assert!(!debug.contains("outcome_receiver"));
    }
}
