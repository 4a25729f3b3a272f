//! Structured-metadata templates keyed by question type.
//!
//! A template is only a starting point: the annotator edits the serialised
//! text freely and the entry assembler parses whatever comes back without
//! checking it against the shape produced here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The question types the annotation UI offers.
///
/// Entries store the tag as a plain string, so a dataset may contain tags
/// outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Open answer, no extra metadata. (default)
    #[default]
    FreeForm,
    /// Ordered choices plus the zero-based index of the correct one.
    MultipleChoice,
    /// Column names plus one mapping per row.
    TruthTable,
    /// Sentence with `___` placeholders plus the filler for each blank.
    FillInTheBlanks,
}

impl QuestionType {
    /// Every type, in the order the UI lists them.
    pub const ALL: [QuestionType; 4] = [
        QuestionType::FreeForm,
        QuestionType::MultipleChoice,
        QuestionType::TruthTable,
        QuestionType::FillInTheBlanks,
    ];

    /// Look up a type by its snake_case tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag.trim())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::FreeForm => "free_form",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TruthTable => "truth_table",
            QuestionType::FillInTheBlanks => "fill_in_the_blanks",
        }
    }

    /// The editable skeleton for this type.
    pub fn template(self) -> StructuredTemplate {
        match self {
            QuestionType::FreeForm => StructuredTemplate::FreeForm {
                notes: "No additional structured metadata required.".to_string(),
            },
            QuestionType::MultipleChoice => StructuredTemplate::MultipleChoice {
                choices: ["A", "B", "C", "D"].map(String::from).to_vec(),
                correct_index: 0,
            },
            QuestionType::TruthTable => {
                let columns: Vec<String> = ["A", "B", "OUT"].map(String::from).to_vec();
                // OR gate
                let rows = [(0, 0, 0), (0, 1, 1), (1, 0, 1), (1, 1, 1)]
                    .into_iter()
                    .map(|(a, b, out)| {
                        let mut row = Map::new();
                        row.insert("A".into(), Value::from(a));
                        row.insert("B".into(), Value::from(b));
                        row.insert("OUT".into(), Value::from(out));
                        row
                    })
                    .collect();
                StructuredTemplate::TruthTable { columns, rows }
            }
            QuestionType::FillInTheBlanks => StructuredTemplate::FillInTheBlanks {
                template: "The ___ is connected to pin ___.".to_string(),
                answers: ["resistor", "PA5"].map(String::from).to_vec(),
            },
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed form of a template. Serialises with `type` as the first key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuredTemplate {
    MultipleChoice {
        choices: Vec<String>,
        correct_index: usize,
    },
    TruthTable {
        columns: Vec<String>,
        rows: Vec<Map<String, Value>>,
    },
    FillInTheBlanks {
        template: String,
        answers: Vec<String>,
    },
    FreeForm {
        notes: String,
    },
}

impl StructuredTemplate {
    /// Pretty-printed JSON (two-space indent, non-ASCII kept verbatim).
    pub fn to_pretty_json(&self) -> String {
        // Strings, integers and string-keyed maps only; cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Serialised template for a question-type tag.
///
/// Pure and total: unrecognised tags fall back to the `free_form` skeleton.
pub fn template_for(question_type: &str) -> String {
    QuestionType::from_tag(question_type)
        .unwrap_or_default()
        .template()
        .to_pretty_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for t in QuestionType::ALL {
            assert_eq!(QuestionType::from_tag(t.as_str()), Some(t));
        }
        assert_eq!(QuestionType::from_tag("essay"), None);
        assert_eq!(
            QuestionType::from_tag(" truth_table "),
            Some(QuestionType::TruthTable)
        );
    }

    #[test]
    fn multiple_choice_is_deterministic() {
        let a = template_for("multiple_choice");
        let b = template_for("multiple_choice");
        assert_eq!(a, b);

        let v: Value = serde_json::from_str(&a).unwrap();
        assert_eq!(v["type"], "multiple_choice");
        assert_eq!(v["choices"].as_array().unwrap().len(), 4);
        assert_eq!(v["correct_index"], 0);
    }

    #[test]
    fn unknown_type_falls_back_to_free_form() {
        assert_eq!(template_for("unknown_type"), template_for("free_form"));
        assert_eq!(template_for(""), template_for("free_form"));
    }

    #[test]
    fn type_key_comes_first() {
        for t in QuestionType::ALL {
            let text = template_for(t.as_str());
            let first_key = text.lines().nth(1).unwrap().trim_start();
            assert!(
                first_key.starts_with("\"type\""),
                "{t}: first key was {first_key}"
            );
        }
    }

    #[test]
    fn truth_table_rows_follow_columns() {
        let v: Value = serde_json::from_str(&template_for("truth_table")).unwrap();
        let columns: Vec<&str> = v["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c.as_str().unwrap())
            .collect();
        assert_eq!(columns, ["A", "B", "OUT"]);

        let rows = v["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 4);
        for row in rows {
            let keys: Vec<&str> = row.as_object().unwrap().keys().map(String::as_str).collect();
            assert_eq!(keys, columns);
        }
        assert_eq!(rows[0]["OUT"], 0);
        assert_eq!(rows[3]["OUT"], 1);
    }

    #[test]
    fn fill_in_the_blanks_has_one_answer_per_blank() {
        let v: Value = serde_json::from_str(&template_for("fill_in_the_blanks")).unwrap();
        let blanks = v["template"].as_str().unwrap().matches("___").count();
        assert_eq!(blanks, v["answers"].as_array().unwrap().len());
    }

    #[test]
    fn template_is_two_space_indented() {
        let text = template_for("free_form");
        assert!(text.contains("\n  \"notes\""), "got: {text}");
    }
}
