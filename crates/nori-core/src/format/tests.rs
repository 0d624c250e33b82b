//! Pipeline-level properties and scenarios
//!
//! Tests here exercise the whole pass sequence: round-trip fidelity of the
//! untouched tree, idempotence of the pipeline, comment preservation, and
//! the end-to-end layout of representative sources.

use crate::style::{FormatStyle, LineWrapSetting};
use crate::syntax::cursor::Cursor;
use crate::syntax::parser::parse_unit;
use crate::syntax::printer::print_unit;
use crate::syntax::space::Space;
use crate::syntax::tree::{NodeId, Statement};
use crate::syntax::walk::{SpaceLoc, Visitor, walk_unit};

use super::{FormatPass, auto_format, format_source};

const MESSY_SOURCES: &[&str] = &[
    "class Foo{void bar( ){int x=1;}}",
    "class A {\n   int x;\n\n\n\n   int y;\n}\n",
    "package p;\nimport a.B;\nclass C extends B { C() {} }\n",
    "enum Color { RED, GREEN, BLUE }",
    "class A {\n  void f() {\n    for (int i = 0; i < 3; i++) { sum += i; }\n    while (sum > 0) sum--;\n  }\n}\n",
];

/// Collects every comment text in the tree, in visit order.
struct CommentCollector {
    texts: Vec<String>,
}

impl Visitor for CommentCollector {
    fn visit_space(&mut self, space: Space, _loc: SpaceLoc, _cursor: &mut Cursor) -> Space {
        for comment in &space.comments {
            self.texts.push(comment.text.clone());
        }
        space
    }
}

fn comment_texts(unit: &crate::syntax::tree::CompilationUnit) -> Vec<String> {
    let mut collector = CommentCollector { texts: Vec::new() };
    walk_unit(&mut collector, unit.clone());
    let mut texts = collector.texts;
    texts.sort();
    texts
}

#[test]
fn unformatted_trees_round_trip_byte_identical() {
    for source in MESSY_SOURCES {
        let unit = parse_unit(source).unwrap();
        assert_eq!(&print_unit(&unit), source);
    }
}

#[test]
fn pipeline_is_idempotent() {
    let style = FormatStyle::default();
    for source in MESSY_SOURCES {
        let once = format_source(source, &style).unwrap();
        let twice = format_source(&once, &style).unwrap();
        assert_eq!(once, twice, "pipeline not idempotent for {source:?}");
    }
}

#[test]
fn every_pass_preserves_comments() {
    let source = "// header\nclass A { // trailing\n  /* lead */ int x; /** doc */\n  void f() {\n    // body\n    a();\n  }\n}\n// footer\n";
    let style = FormatStyle::default();
    let unit = parse_unit(source).unwrap();
    let before = comment_texts(&unit);

    let mut current = unit;
    for pass in super::pipeline() {
        current = pass.run(current, &style).unwrap();
        assert_eq!(
            comment_texts(&current),
            before,
            "pass {} changed the comment multiset",
            pass.name()
        );
    }
}

#[test]
fn full_format_of_a_compact_class() {
    let style = FormatStyle::default();
    let got = format_source("class Foo{void bar( ){int x=1;}}", &style).unwrap();
    assert_eq!(
        got,
        "class Foo {\n    void bar() {\n        int x = 1;\n    }\n}"
    );
}

#[test]
fn spaces_scenario_before_wrapping() {
    // The spaces pass alone fixes token spacing without touching line
    // structure.
    let style = FormatStyle::default();
    let unit = parse_unit("class Foo{void bar( ){}}").unwrap();
    let spaced = super::Spaces.run(unit, &style).unwrap();
    assert_eq!(print_unit(&spaced), "class Foo {void bar() {}}");
}

#[test]
fn chain_wrap_scenario() {
    let mut style = FormatStyle::default();
    style.wrapping.chained_method_calls = LineWrapSetting::WrapAlways;
    let got = format_source("class A { void f() { a.b().c().d(); } }", &style).unwrap();
    assert_eq!(
        got,
        "class A {\n    void f() {\n        a.b()\n                .c()\n                .d();\n    }\n}"
    );
}

#[test]
fn reindent_scenario_three_to_four() {
    let style = FormatStyle::default();
    let got = format_source("class A {\n   void f() {\n   int x;\n   }\n}\n", &style).unwrap();
    assert_eq!(
        got,
        "class A {\n    void f() {\n        int x;\n    }\n}\n"
    );
}

#[test]
fn empty_block_blank_lines_scenario() {
    let mut style = FormatStyle::default();
    style.blank_lines.keep_maximum.before_end_of_block = 1;
    let got = format_source("class A {\n    void m() {\n\n\n\n    }\n}\n", &style).unwrap();
    assert_eq!(got, "class A {\n    void m() {\n\n    }\n}\n");
}

#[test]
fn blank_line_bounds_hold_after_the_pipeline() {
    let style = FormatStyle::default();
    let got = format_source(
        "class A {\n  int x;\n\n\n\n\n  void f() {}\n  void g() {}\n}\n",
        &style,
    )
    .unwrap();
    for window in got.split("\n\n\n\n").skip(1) {
        panic!("more than keep-maximum blank lines survived near {window:?}");
    }
    // Methods keep at least one blank line between them.
    assert!(got.contains("}\n\n    void g()"), "got: {got}");
}

#[test]
fn tab_indentation_renders_when_configured() {
    let mut style = FormatStyle::default();
    style.tabs_and_indents.use_tab_character = true;
    let got = format_source("class A {\n  void f() {\n    a();\n  }\n}\n", &style).unwrap();
    assert_eq!(got, "class A {\n\tvoid f() {\n\t\ta();\n\t}\n}\n");
}

#[test]
fn crlf_output_when_configured() {
    let mut style = FormatStyle::default();
    style.general.line_ending = crate::style::LineEnding::Crlf;
    let got = format_source("class A {\n  int x;\n}\n", &style).unwrap();
    assert_eq!(got, "class A {\r\n    int x;\r\n}\r\n");
}

#[test]
fn broken_tree_skips_the_unit_not_the_batch() {
    let style = FormatStyle::default();
    let mut unit = parse_unit("class A { void f() { for (;;) {} } }").unwrap();
    {
        let Statement::Method(method) = &mut unit.types[0].body.statements[0].elem else {
            panic!();
        };
        let Statement::For(for_loop) = &mut method.body.as_mut().unwrap().statements[0].elem
        else {
            panic!();
        };
        for_loop.control.update.clear();
    }
    let original = print_unit(&unit);
    let err = auto_format(&unit, &style).unwrap_err();
    assert!(err.skips_unit());
    // The input tree is untouched and can be printed as a fallback.
    assert_eq!(print_unit(&unit), original);
}

#[test]
fn trial_print_miss_is_reported_with_the_node() {
    let foreign = NodeId::fresh();
    let stmt = Statement::Empty(crate::syntax::tree::EmptyNode::new(Space::empty()));
    let err = super::measure::column_before(&stmt, foreign).unwrap_err();
    let message = err.to_string();
    assert!(message.contains(&foreign.as_u64().to_string()));
}

#[test]
fn formatted_comments_move_with_their_code() {
    let style = FormatStyle::default();
    let got = format_source(
        "class A {\n  void f() {\n// note\na();\n  }\n}\n",
        &style,
    )
    .unwrap();
    assert_eq!(
        got,
        "class A {\n    void f() {\n        // note\n        a();\n    }\n}\n"
    );
}

#[test]
fn formatted_output_snapshot() {
    let style = FormatStyle::default();
    let got = format_source(
        "package demo;\nimport java.util.List;\nclass Greeter {\n  private final List<String> names;\n  Greeter(List<String> names) { this0 = names; }\n  void greet() {\n    for (String name : names) {\n      out.println(name);\n    }\n  }\n}\n",
        &style,
    )
    .unwrap();
    insta::assert_snapshot!(got, @r#"
    package demo;

    import java.util.List;

    class Greeter {
        private final List<String> names;

        Greeter(List<String> names) {
            this0 = names;
        }

        void greet() {
            for (String name : names) {
                out.println(name);
            }
        }
    }
    "#);
}
