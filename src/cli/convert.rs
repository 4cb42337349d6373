//! `convert`: one-shot document conversion.

use std::path::Path;

use anyhow::Result;

use super::common::{read_input, write_output};
use crate::convert::Converter;
use crate::log;
use crate::utils::plural::plural_count;

pub fn run(input: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let source = read_input(input)?;
    let result = Converter::new().convert(&source)?;

    write_output("convert", output, &result.output)?;
    if output.is_some() {
        log!("convert"; "{}", plural_count(result.substitutions, "substitution"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_convert_file() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("Widget.html");
        let output = temp.path().join("out.html");
        fs::write(&input, "<XDiv><XLabel>Gain</XLabel></XDiv>").unwrap();

        run(Some(&input), Some(&output)).unwrap();
        let converted = fs::read_to_string(&output).unwrap();
        assert!(converted.contains("<div"));
        assert!(!converted.contains("XLabel"));
    }

    #[test]
    fn test_parse_failure_is_an_error() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("broken.html");
        fs::write(&input, "<XDiv").unwrap();
        assert!(run(Some(&input), Some(&temp.path().join("out.html"))).is_err());
    }
}
