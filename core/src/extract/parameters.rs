use crate::prelude::{ExtractionStage, StageInput, StageOutput, StageResult};

/// Symbol-name endings that mark a `#define` as an exported parameter.
pub const SUFFIX_ALLOWLIST: [&str; 4] = ["_COUNT", "_FIXPT", "_VALUES", "_ADDR"];

pub const MODULE_COMMENT_MARKER: &str = "/* Module";

/// A preserved `#define NAME VALUE` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSymbol {
    pub name: String,
    pub line: String,
    pub module_comment: Option<String>,
}

pub fn is_exported_symbol(name: &str) -> bool {
    SUFFIX_ALLOWLIST.iter().any(|suffix| name.ends_with(suffix))
}

/// Lines of the parameter export kept for the driver, in source order.
pub fn filter_parameter_lines(parameter: &str) -> Vec<String> {
    parameter
        .lines()
        .map(str::trim)
        .filter(|line| {
            if line.starts_with(MODULE_COMMENT_MARKER) {
                return true;
            }
            if !line.starts_with("#define") {
                return false;
            }
            line.split_whitespace()
                .nth(1)
                .is_some_and(is_exported_symbol)
        })
        .map(str::to_string)
        .collect()
}

/// Kept symbols paired with the nearest preceding module comment.
pub fn extract_symbols(parameter: &str) -> Vec<ExtractedSymbol> {
    let mut module_comment: Option<String> = None;
    let mut symbols = Vec::new();
    for line in filter_parameter_lines(parameter) {
        if line.starts_with(MODULE_COMMENT_MARKER) {
            module_comment = Some(line);
            continue;
        }
        let name = line
            .split_whitespace()
            .nth(1)
            .unwrap_or_default()
            .to_string();
        symbols.push(ExtractedSymbol {
            name,
            line,
            module_comment: module_comment.clone(),
        });
    }
    symbols
}

pub struct ParameterStage;

impl ExtractionStage for ParameterStage {
    fn name(&self) -> &'static str {
        "parameters"
    }

    fn execute(&self, input: &StageInput<'_>) -> StageResult<StageOutput> {
        let mut output = StageOutput {
            lines: filter_parameter_lines(input.parameter),
            ..Default::default()
        };
        output.metadata.symbol_count = extract_symbols(input.parameter).len();
        if !output.lines.is_empty() {
            output.lines.push(String::new());
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: &str = "\
/* Module Single 1 - Single Volume*/
#define MOD_SINGLE1_COUNT                              1
#define MOD_SINGLE1_DEVICE                             \"IC1\"
#define MOD_SINGLE1_GAIN1940ALGNS1_ADDR                0
#define MOD_SINGLE1_GAIN1940ALGNS1_FIXPT               0x00800000
#define MOD_SINGLE1_GAIN1940ALGNS1_VALUE               SIGMASTUDIOTYPE_FIXPOINT_CONVERT(1)
#define MOD_SINGLE1_GAIN1940ALGNS1_TYPE                SIGMASTUDIOTYPE_FIXPOINT

/* Module EQ - General (2nd order)*/
#define MOD_EQ_COUNT                                   5
#define MOD_EQ_ALG0_STAGE0_B0_VALUES                   SIGMASTUDIOTYPE_FIXPOINT_CONVERT(1)
";

    #[test]
    fn only_allowlisted_suffixes_survive() {
        let lines = filter_parameter_lines("#define FOO_COUNT 3\n#define BAR_TEMP 1\n");
        assert_eq!(lines, vec!["#define FOO_COUNT 3"]);
    }

    #[test]
    fn module_comments_and_order_are_preserved() {
        let lines = filter_parameter_lines(PARAMS);
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "/* Module Single 1 - Single Volume*/");
        assert!(lines[1].starts_with("#define MOD_SINGLE1_COUNT"));
        assert!(lines[3].starts_with("#define MOD_SINGLE1_GAIN1940ALGNS1_FIXPT"));
        assert_eq!(lines[4], "/* Module EQ - General (2nd order)*/");
    }

    #[test]
    fn filtering_is_idempotent() {
        let once = filter_parameter_lines(PARAMS).join("\n");
        let twice = filter_parameter_lines(&once).join("\n");
        assert_eq!(once, twice);
    }

    #[test]
    fn symbols_remember_their_module() {
        let symbols = extract_symbols(PARAMS);
        assert_eq!(symbols.len(), 5);
        assert_eq!(symbols[0].name, "MOD_SINGLE1_COUNT");
        assert_eq!(
            symbols[4].module_comment.as_deref(),
            Some("/* Module EQ - General (2nd order)*/")
        );
    }

    #[test]
    fn define_without_name_is_dropped() {
        assert!(filter_parameter_lines("#define\n   \n").is_empty());
    }
}
