//! User interaction operations (confirmation and choice prompts).

use anyhow::Result;

use super::RealRuntime;

use std::io::{self, BufRead, Write};

/// Core, testable implementation that reads from any BufRead and writes to any Write.
pub(crate) fn confirm_with_io<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let response = line.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Numbered menu over any BufRead/Write pair.
///
/// Items are listed starting at 1. An empty answer, an unparsable answer or
/// a number out of range cancels the menu.
pub(crate) fn choose_with_io<R: BufRead, W: Write>(
    caption: &str,
    items: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<Option<usize>> {
    if items.is_empty() {
        return Ok(None);
    }

    writeln!(output, "{}", caption)?;
    for (i, item) in items.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, item)?;
    }
    write!(output, "Select [1-{}, empty to cancel]: ", items.len())?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(line
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=items.len()).contains(n))
        .map(|n| n - 1))
}

impl RealRuntime {
    pub(crate) fn confirm_impl(&self, prompt: &str) -> Result<bool> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        confirm_with_io(prompt, &mut stdin_lock, &mut stdout)
    }

    pub(crate) fn choose_impl(&self, caption: &str, items: &[String]) -> Result<Option<usize>> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        choose_with_io(caption, items, &mut stdin_lock, &mut stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::{choose_with_io, confirm_with_io};
    use anyhow::Result;
    use std::io::Cursor;

    fn menu() -> Vec<String> {
        vec!["Alpha".to_string(), "Beta".to_string(), "Gamma".to_string()]
    }

    #[test]
    fn confirms_yes_and_short_y() -> Result<()> {
        let cases = vec!["y\n", "Y\n", "yes\n", " YES \n", "  y  \n"];
        for case in cases {
            let mut input = Cursor::new(case.as_bytes());
            let mut output = Vec::new();
            let ok = confirm_with_io("Proceed?", &mut input, &mut output)?;
            assert!(ok, "expected '{}' to be accepted as yes", case);
            let out = String::from_utf8(output)?;
            assert!(out.contains("Proceed? [y/N]"));
        }
        Ok(())
    }

    #[test]
    fn rejects_no_and_empty() -> Result<()> {
        let cases = vec!["n\n", "no\n", "\n", "  \n", "other\n"];
        for case in cases {
            let mut input = Cursor::new(case.as_bytes());
            let mut output = Vec::new();
            let ok = confirm_with_io("Delete?", &mut input, &mut output)?;
            assert!(!ok, "expected '{}' to be rejected as no", case);
        }
        Ok(())
    }

    #[test]
    fn choose_returns_zero_based_index() -> Result<()> {
        let mut input = Cursor::new(b"2\n");
        let mut output = Vec::new();
        let picked = choose_with_io("Remove add-on", &menu(), &mut input, &mut output)?;
        assert_eq!(picked, Some(1));

        let out = String::from_utf8(output)?;
        assert!(out.starts_with("Remove add-on\n"));
        assert!(out.contains("  1) Alpha\n"));
        assert!(out.contains("  3) Gamma\n"));
        Ok(())
    }

    #[test]
    fn choose_cancels_on_empty_or_invalid_answer() -> Result<()> {
        for case in ["\n", "abc\n", "0\n", "4\n", "-1\n"] {
            let mut input = Cursor::new(case.as_bytes());
            let mut output = Vec::new();
            let picked = choose_with_io("Pick", &menu(), &mut input, &mut output)?;
            assert_eq!(picked, None, "expected '{}' to cancel", case.trim());
        }
        Ok(())
    }

    #[test]
    fn choose_with_no_items_does_not_prompt() -> Result<()> {
        let mut input = Cursor::new(b"1\n");
        let mut output = Vec::new();
        let picked = choose_with_io("Pick", &[], &mut input, &mut output)?;
        assert_eq!(picked, None);
        assert!(output.is_empty());
        Ok(())
    }
}
