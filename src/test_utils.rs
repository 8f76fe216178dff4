use std::path::{Path, PathBuf};

use anyhow::Context;
use itertools::Itertools;
use serde::{de::{Error, MapAccess, Visitor}, Deserialize, Deserializer};


/// What running a fixture program should produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    /// Everything written to the output, once the entry point returns.
    Output(String),
    /// Name of the fault kind the run ends with.
    Fault(String),
}

#[derive(Debug)]
pub struct TestCase {
    pub source: String,
    pub stdin: String,
    pub expected: Expectation,
}

struct Outcome {
    stdin: String,
    expected: Expectation,
}

struct OutcomeVisitor {}

impl<'de> Deserialize<'de> for Outcome {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de> {

        deserializer.deserialize_map(OutcomeVisitor {})
    }
}

impl<'de> Visitor<'de> for OutcomeVisitor {
    type Value = Outcome;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "A structure containing the boolean key 'ok'. If it's okay, contains the key 'output', otherwise the key 'type'. 'stdin' is optional")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>, {

        let mut ok: Option<bool> = None;
        let mut output: Option<String> = None;
        let mut kind: Option<String> = None;
        let mut stdin: Option<String> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "ok" => ok = Some(map.next_value()?),
                "output" => output = Some(map.next_value()?),
                "type" => kind = Some(map.next_value()?),
                "stdin" => stdin = Some(map.next_value()?),
                other => return Err(A::Error::custom(format!("Unrecognized key: {}", other)))
            }
        }

        let expected = match (ok, output, kind) {
            (Some(true), Some(output), None) => Expectation::Output(output),
            (Some(false), None, Some(kind)) => Expectation::Fault(kind),
            (None, _, _) => return Err(A::Error::missing_field("ok")),
            _ => return Err(A::Error::custom("'ok: true' needs 'output', 'ok: false' needs 'type'"))
        };

        Ok(Outcome { stdin: stdin.unwrap_or_default(), expected })
    }
}

fn fixture_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(name)
}

fn load_outcome<P: AsRef<Path>>(path: P) -> anyhow::Result<Outcome> {
    let source = std::fs::read(path.as_ref())
        .with_context(|| format!("reading {}", path.as_ref().display()))?;
    Ok(serde_json::from_slice(&source)?)
}

pub fn load_test_case(testcase: usize) -> anyhow::Result<TestCase> {
    let input = fixture_dir("test_inputs").join(format!("{}.scm", testcase));
    let source = std::fs::read_to_string(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    let outcome = load_outcome(fixture_dir("test_outputs").join(format!("{}.json", testcase)))?;

    Ok(TestCase { source, stdin: outcome.stdin, expected: outcome.expected })
}

/// Every numbered program under `test_inputs`, in order.
pub fn all_testcases() -> anyhow::Result<Vec<usize>> {
    let mut testcases = vec![];
    for entry in std::fs::read_dir(fixture_dir("test_inputs"))? {
        let path = entry?.path();
        if path.extension().and_then(|extension| extension.to_str()) != Some("scm") {
            continue;
        }
        if let Some(number) = path.file_stem().and_then(|stem| stem.to_str()).and_then(|stem| stem.parse().ok()) {
            testcases.push(number);
        }
    }

    Ok(testcases.into_iter().sorted().collect_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_both_outcome_shapes() -> anyhow::Result<()> {
        let outcome: Outcome = serde_json::from_str(r#"{"stdin": "1\n", "ok": true, "output": "2"}"#)?;
        assert_eq!(outcome.stdin, "1\n");
        assert_eq!(outcome.expected, Expectation::Output("2".into()));

        let outcome: Outcome = serde_json::from_str(r#"{"ok": false, "type": "FormatError"}"#)?;
        assert_eq!(outcome.stdin, "");
        assert_eq!(outcome.expected, Expectation::Fault("FormatError".into()));
        Ok(())
    }

    #[test]
    fn rejects_inconsistent_outcomes() {
        assert!(serde_json::from_str::<Outcome>(r#"{"ok": true, "type": "FormatError"}"#).is_err());
        assert!(serde_json::from_str::<Outcome>(r#"{"output": ""}"#).is_err());
    }

    #[test]
    fn every_program_has_an_outcome() -> anyhow::Result<()> {
        let testcases = all_testcases()?;
        assert!(!testcases.is_empty());
        for testcase in testcases {
            load_test_case(testcase)?;
        }
        Ok(())
    }
}
