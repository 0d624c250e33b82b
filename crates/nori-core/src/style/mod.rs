//! Style records consumed by the formatting passes
//!
//! Each record is a plain serde struct with documented defaults, created once
//! per run and read-only during a pass. Partial configuration files merge
//! with the defaults field-by-field (`#[serde(default)]` everywhere), so a
//! style field missing from an on-disk config never aborts a pass — it just
//! falls back.

pub mod loader;

use serde::{Deserialize, Serialize};

pub use loader::{NoriConfig, discover_config, load_config};

/// Line-ending flavor written by the line-break normalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Lf,
    Crlf,
}

/// Per-construct wrap policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineWrapSetting {
    DoNotWrap,
    WrapAlways,
    ChopIfTooLong,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralStyle {
    pub line_ending: LineEnding,
}

impl Default for GeneralStyle {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Lf,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsAndIndentsStyle {
    /// Emit `\t` for whole indent units, spaces for the remainder.
    pub use_tab_character: bool,
    /// Rendered width of one tab stop.
    pub tab_size: usize,
    /// One block-nesting level.
    pub indent_size: usize,
    /// Indent for wrapped operands/arguments that do not open a block.
    pub continuation_indent: usize,
}

impl Default for TabsAndIndentsStyle {
    fn default() -> Self {
        Self {
            use_tab_character: false,
            tab_size: 4,
            indent_size: 4,
            continuation_indent: 8,
        }
    }
}

/// Minimum blank lines inserted at declaration seams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlankLinesMinimum {
    pub before_package: usize,
    pub after_package: usize,
    pub before_imports: usize,
    pub after_imports: usize,
    pub around_class: usize,
    pub after_class_header: usize,
    pub around_field: usize,
    pub around_method: usize,
    pub before_method_body: usize,
}

impl Default for BlankLinesMinimum {
    fn default() -> Self {
        Self {
            before_package: 0,
            after_package: 1,
            before_imports: 1,
            after_imports: 1,
            around_class: 1,
            after_class_header: 0,
            around_field: 0,
            around_method: 1,
            before_method_body: 0,
        }
    }
}

/// Upper bounds on blank lines that survive formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlankLinesKeepMaximum {
    pub in_declarations: usize,
    pub in_code: usize,
    pub before_end_of_block: usize,
}

impl Default for BlankLinesKeepMaximum {
    fn default() -> Self {
        Self {
            in_declarations: 2,
            in_code: 2,
            before_end_of_block: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlankLinesStyle {
    pub minimum: BlankLinesMinimum,
    pub keep_maximum: BlankLinesKeepMaximum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacesBeforeParentheses {
    pub method_declaration: bool,
    pub method_call: bool,
    pub if_parentheses: bool,
    pub for_parentheses: bool,
    pub while_parentheses: bool,
    pub switch_parentheses: bool,
    pub annotation_parameters: bool,
}

impl Default for SpacesBeforeParentheses {
    fn default() -> Self {
        Self {
            method_declaration: false,
            method_call: false,
            if_parentheses: true,
            for_parentheses: true,
            while_parentheses: true,
            switch_parentheses: true,
            annotation_parameters: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacesAroundOperators {
    pub assignment: bool,
    pub logical: bool,
    pub equality: bool,
    pub relational: bool,
    pub bitwise: bool,
    pub additive: bool,
    pub multiplicative: bool,
    pub shift: bool,
    pub unary: bool,
}

impl Default for SpacesAroundOperators {
    fn default() -> Self {
        Self {
            assignment: true,
            logical: true,
            equality: true,
            relational: true,
            bitwise: true,
            additive: true,
            multiplicative: true,
            shift: true,
            unary: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacesBeforeLeftBrace {
    pub class_left_brace: bool,
    pub method_left_brace: bool,
    pub if_left_brace: bool,
    pub else_left_brace: bool,
    pub for_left_brace: bool,
    pub while_left_brace: bool,
    pub do_left_brace: bool,
    pub switch_left_brace: bool,
}

impl Default for SpacesBeforeLeftBrace {
    fn default() -> Self {
        Self {
            class_left_brace: true,
            method_left_brace: true,
            if_left_brace: true,
            else_left_brace: true,
            for_left_brace: true,
            while_left_brace: true,
            do_left_brace: true,
            switch_left_brace: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacesBeforeKeywords {
    pub else_keyword: bool,
    pub while_keyword: bool,
}

impl Default for SpacesBeforeKeywords {
    fn default() -> Self {
        Self {
            else_keyword: true,
            while_keyword: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacesWithin {
    pub empty_method_call_parentheses: bool,
    pub empty_method_declaration_parentheses: bool,
    pub method_call_parentheses: bool,
    pub method_declaration_parentheses: bool,
    pub if_parentheses: bool,
    pub for_parentheses: bool,
    pub while_parentheses: bool,
    pub switch_parentheses: bool,
    pub grouping_parentheses: bool,
    pub brackets: bool,
    pub angle_brackets: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacesInTernaryOperator {
    pub before_question_mark: bool,
    pub after_question_mark: bool,
    pub before_colon: bool,
    pub after_colon: bool,
}

impl Default for SpacesInTernaryOperator {
    fn default() -> Self {
        Self {
            before_question_mark: true,
            after_question_mark: true,
            before_colon: true,
            after_colon: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacesOther {
    pub before_comma: bool,
    pub after_comma: bool,
    pub before_for_semicolon: bool,
    pub after_for_semicolon: bool,
    pub before_colon_in_for_each: bool,
    pub after_colon_in_for_each: bool,
}

impl Default for SpacesOther {
    fn default() -> Self {
        Self {
            before_comma: false,
            after_comma: true,
            before_for_semicolon: false,
            after_for_semicolon: true,
            before_colon_in_for_each: true,
            after_colon_in_for_each: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacesStyle {
    pub before_parentheses: SpacesBeforeParentheses,
    pub around_operators: SpacesAroundOperators,
    pub before_left_brace: SpacesBeforeLeftBrace,
    pub before_keywords: SpacesBeforeKeywords,
    pub within: SpacesWithin,
    pub ternary_operator: SpacesInTernaryOperator,
    pub other: SpacesOther,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrappingStyle {
    /// Column budget consulted by chop-if-too-long policies.
    pub column_limit: usize,
    pub method_declaration_parameters: LineWrapSetting,
    pub method_invocation_arguments: LineWrapSetting,
    pub chained_method_calls: LineWrapSetting,
    pub record_components: LineWrapSetting,
    pub class_annotations_on_own_line: bool,
    pub method_annotations_on_own_line: bool,
    pub field_annotations_on_own_line: bool,
    pub else_on_new_line: bool,
    pub while_on_new_line: bool,
}

impl Default for WrappingStyle {
    fn default() -> Self {
        Self {
            column_limit: 120,
            method_declaration_parameters: LineWrapSetting::DoNotWrap,
            method_invocation_arguments: LineWrapSetting::DoNotWrap,
            chained_method_calls: LineWrapSetting::DoNotWrap,
            record_components: LineWrapSetting::DoNotWrap,
            class_annotations_on_own_line: true,
            method_annotations_on_own_line: true,
            field_annotations_on_own_line: false,
            else_on_new_line: false,
            while_on_new_line: false,
        }
    }
}

/// The full style resolved for one compilation unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatStyle {
    pub general: GeneralStyle,
    pub tabs_and_indents: TabsAndIndentsStyle,
    pub blank_lines: BlankLinesStyle,
    pub spaces: SpacesStyle,
    pub wrapping: WrappingStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_documented_values() {
        let style = FormatStyle::default();
        assert_eq!(style.tabs_and_indents.indent_size, 4);
        assert_eq!(style.tabs_and_indents.continuation_indent, 8);
        assert!(!style.tabs_and_indents.use_tab_character);
        assert_eq!(style.blank_lines.keep_maximum.in_declarations, 2);
        assert!(style.spaces.before_left_brace.class_left_brace);
        assert!(!style.spaces.within.empty_method_call_parentheses);
        assert_eq!(
            style.wrapping.chained_method_calls,
            LineWrapSetting::DoNotWrap
        );
    }

    #[test]
    fn partial_toml_merges_with_defaults() {
        let style: FormatStyle = toml::from_str(
            r#"
            [tabs_and_indents]
            indent_size = 2

            [wrapping]
            chained_method_calls = "wrap_always"
            "#,
        )
        .unwrap();
        assert_eq!(style.tabs_and_indents.indent_size, 2);
        // Untouched fields keep their documented defaults.
        assert_eq!(style.tabs_and_indents.tab_size, 4);
        assert_eq!(
            style.wrapping.chained_method_calls,
            LineWrapSetting::WrapAlways
        );
        assert_eq!(style.wrapping.column_limit, 120);
    }

    #[test]
    fn style_round_trips_through_serde() {
        let style = FormatStyle::default();
        let text = toml::to_string(&style).unwrap();
        let back: FormatStyle = toml::from_str(&text).unwrap();
        assert_eq!(back, style);
    }
}
