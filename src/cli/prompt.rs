//! Interactive variant selection.

use crate::bundler::{BuildVariant, VariantCatalog};
use crate::error::{CliError, Result};
use std::io::{BufRead, Write};

/// Asks for a variant until a valid one is entered.
///
/// Accepts a key or its 1-based menu number. Unknown input re-prompts. Empty
/// input picks `default` when one is configured and re-prompts otherwise.
/// Closed input is an error, never a silent default.
pub fn select_variant<R: BufRead, W: Write>(
    catalog: &VariantCatalog,
    default: Option<&str>,
    input: &mut R,
    out: &mut W,
) -> Result<BuildVariant> {
    writeln!(out, "Available variants:")?;
    for (i, variant) in catalog.iter().enumerate() {
        writeln!(out, "  {}) {} ({})", i + 1, variant.key, variant.entry.display())?;
    }

    let keys: Vec<&str> = catalog.keys().collect();
    loop {
        match default {
            Some(d) => write!(out, "Select variant [{}] (default: {d}): ", keys.join("/"))?,
            None => write!(out, "Select variant [{}]: ", keys.join("/"))?,
        }
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(CliError::SelectionAborted {
                reason: "input closed before a valid variant was entered".to_string(),
            }
            .into());
        }
        let answer = line.trim();

        if answer.is_empty() {
            match default {
                Some(d) => return Ok(catalog.resolve(d)?.clone()),
                None => {
                    writeln!(out, "Please enter one of: {}", keys.join(", "))?;
                    continue;
                }
            }
        }

        if let Ok(n) = answer.parse::<usize>()
            && let Some(variant) = n.checked_sub(1).and_then(|i| catalog.iter().nth(i))
        {
            return Ok(variant.clone());
        }

        match catalog.resolve(answer) {
            Ok(variant) => return Ok(variant.clone()),
            Err(e) => {
                log::warn!("Rejected variant selection {answer:?}");
                writeln!(out, "{e}")?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BundlerError;
    use std::io::Cursor;

    fn select(input: &str, default: Option<&str>) -> (Result<BuildVariant>, String) {
        let catalog = VariantCatalog::builtin();
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = select_variant(&catalog, default, &mut reader, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn valid_key_is_accepted() {
        let (result, _) = select("multithreaded\n", None);
        assert_eq!(result.unwrap().key, "multithreaded");
    }

    #[test]
    fn menu_number_is_accepted() {
        let (result, _) = select("2\n", None);
        assert_eq!(result.unwrap().key, "multithreaded");
    }

    #[test]
    fn invalid_input_reprompts() {
        let (result, out) = select("turbo\n0\n7\nnormal\n", None);
        assert_eq!(result.unwrap().key, "normal");
        assert_eq!(out.matches("Select variant").count(), 4);
        assert!(out.contains("unknown variant 'turbo'"));
    }

    #[test]
    fn empty_input_without_default_reprompts() {
        let (result, out) = select("\n\nnormal\n", None);
        assert_eq!(result.unwrap().key, "normal");
        assert_eq!(out.matches("Please enter one of").count(), 2);
    }

    #[test]
    fn empty_input_uses_configured_default() {
        let (result, out) = select("\n", Some("multithreaded"));
        assert_eq!(result.unwrap().key, "multithreaded");
        assert!(out.contains("(default: multithreaded)"));
    }

    #[test]
    fn closed_input_never_defaults() {
        let (result, _) = select("bogus\n", None);
        assert!(matches!(
            result,
            Err(BundlerError::Cli(CliError::SelectionAborted { .. }))
        ));

        let (result, _) = select("", Some("normal"));
        assert!(result.is_err());
    }
}
