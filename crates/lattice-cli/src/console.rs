//! Blocking terminal prompts for interactive configuration.
//!
//! Used when a task is configured with `--interactive`: fields the
//! configuration leaves unresolved are asked for on the terminal.
//! Empty input re-prompts; end of input aborts the configuration.

use crate::parse::parse_literal;
use lattice_component::{ComponentError, Prompt};
use lattice_types::{ClassId, ConfigValue};
use std::io::{BufRead, Write};

/// A [`Prompt`] reading answers from standard input.
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Prompt for ConsolePrompt {
    fn value(&mut self, field: &str, ty: &str) -> Result<ConfigValue, ComponentError> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        prompt_value(&mut stdin.lock(), &mut stdout.lock(), field, ty)
    }

    fn subclass(
        &mut self,
        field: &str,
        candidates: &[(ClassId, String)],
    ) -> Result<ClassId, ComponentError> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        prompt_subclass(&mut stdin.lock(), &mut stdout.lock(), field, candidates)
    }
}

fn read_trimmed(input: &mut impl BufRead) -> Result<Option<String>, ComponentError> {
    let mut line = String::new();
    let n = input
        .read_line(&mut line)
        .map_err(|e| ComponentError::PromptFailed(e.to_string()))?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

fn prompt_value(
    input: &mut impl BufRead,
    output: &mut impl Write,
    field: &str,
    ty: &str,
) -> Result<ConfigValue, ComponentError> {
    loop {
        write!(output, "{field} ({ty}): ")
            .and_then(|()| output.flush())
            .map_err(|e| ComponentError::PromptFailed(e.to_string()))?;
        match read_trimmed(input)? {
            None => {
                return Err(ComponentError::PromptFailed(format!(
                    "input ended while waiting for a value for '{field}'"
                )))
            }
            Some(line) if line.is_empty() => continue,
            Some(line) => return Ok(parse_literal(&line)),
        }
    }
}

fn prompt_subclass(
    input: &mut impl BufRead,
    output: &mut impl Write,
    field: &str,
    candidates: &[(ClassId, String)],
) -> Result<ClassId, ComponentError> {
    let render = |output: &mut dyn Write| -> std::io::Result<()> {
        writeln!(output, "choose a class for {field}:")?;
        for (i, (_, name)) in candidates.iter().enumerate() {
            writeln!(output, "  {}) {name}", i + 1)?;
        }
        write!(output, "> ")?;
        output.flush()
    };
    loop {
        render(output).map_err(|e| ComponentError::PromptFailed(e.to_string()))?;
        let Some(line) = read_trimmed(input)? else {
            return Err(ComponentError::PromptFailed(format!(
                "input ended while waiting for a class for '{field}'"
            )));
        };
        if line.is_empty() {
            continue;
        }
        // Accept the list number or the class name itself.
        if let Ok(n) = line.parse::<usize>() {
            if (1..=candidates.len()).contains(&n) {
                return Ok(candidates[n - 1].0);
            }
            continue;
        }
        if let Some((id, _)) = candidates.iter().find(|(_, name)| *name == line) {
            return Ok(*id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_types::ClassId;
    use std::io::Cursor;

    fn candidates() -> Vec<(ClassId, String)> {
        vec![
            (ClassId::from_index(0), "CifarDataset".into()),
            (ClassId::from_index(1), "Mnist".into()),
        ]
    }

    #[test]
    fn value_parses_literal_input() {
        let mut input = Cursor::new(b"64\n".to_vec());
        let mut output = Vec::new();
        let v = prompt_value(&mut input, &mut output, "train.batch_size", "int").unwrap();
        assert_eq!(v, ConfigValue::Int(64));
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("train.batch_size (int): "));
    }

    #[test]
    fn empty_input_re_prompts() {
        let mut input = Cursor::new(b"\n\nadam\n".to_vec());
        let mut output = Vec::new();
        let v = prompt_value(&mut input, &mut output, "optimizer", "str").unwrap();
        assert_eq!(v, ConfigValue::Str("adam".into()));
        assert_eq!(
            String::from_utf8(output).unwrap().matches("optimizer").count(),
            3
        );
    }

    #[test]
    fn end_of_input_fails_the_prompt() {
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let err = prompt_value(&mut input, &mut output, "x", "int").unwrap_err();
        assert!(matches!(err, ComponentError::PromptFailed(_)));
    }

    #[test]
    fn subclass_picked_by_number() {
        let mut input = Cursor::new(b"2\n".to_vec());
        let mut output = Vec::new();
        let id = prompt_subclass(&mut input, &mut output, "data", &candidates()).unwrap();
        assert_eq!(id, ClassId::from_index(1));
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("1) CifarDataset"));
        assert!(shown.contains("2) Mnist"));
    }

    #[test]
    fn subclass_picked_by_name_after_bad_number() {
        let mut input = Cursor::new(b"7\nMnist\n".to_vec());
        let mut output = Vec::new();
        let id = prompt_subclass(&mut input, &mut output, "data", &candidates()).unwrap();
        assert_eq!(id, ClassId::from_index(1));
    }
}
