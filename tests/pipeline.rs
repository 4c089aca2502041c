use notedown::{
    Block, Config, RenderMode, Rendered, Span, format_number, parse, parse_with_limit,
    plain_text, render, toggle_checklist, tokenize,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

const NOTE: &str = "# Groceries

- [ ] milk
- [x] **eggs**
  - free range
1. first
  1. nested *one*
  2. nested two
2. second

| item | qty |
|------|----:|
| tea | 2 |

```
**not bold**
```

> remember the `list`
---
![receipt](r.png)
plain ~~old~~ [link](https://example.com)
";

#[test]
fn every_renderer_handles_the_sample_note() {
    let config = Config::default();
    for mode in [
        RenderMode::Editor,
        RenderMode::Widget { line_limit: None },
        RenderMode::Widget { line_limit: Some(1) },
        RenderMode::Print,
    ] {
        render(NOTE, mode, &config);
    }
}

#[rstest]
#[case("")]
#[case("\n\n\n")]
#[case("```")]
#[case("|")]
#[case("||\n|-|")]
#[case("# ")]
#[case("***\n___\n---")]
#[case("*a **b* c** `d ~~e`")]
#[case("- [ ]\n- [x]\n1.\n1. ")]
#[case("\t\t\t  \t- deep")]
#[case("日本語 **太字** ![画像](a.png) [リンク](b)")]
fn parsing_is_total_and_bounded(#[case] input: &str) {
    let document = parse(input);
    assert!(document.len() <= input.lines().count());
    for limit in 0..4 {
        let truncated = parse_with_limit(input, Some(limit));
        assert!(truncated.line_count <= limit);
        assert!(truncated.blocks.iter().all(|b| b.lines.end <= limit));
    }
}

#[test]
fn spans_round_trip_without_delimiters() {
    let spans = tokenize("**bold** and *italic*");
    assert_eq!(
        spans,
        vec![
            Span::Bold {
                text: "bold".into()
            },
            Span::text(" and "),
            Span::Italic {
                text: "italic".into()
            },
        ]
    );
    assert_eq!(plain_text(&spans), "bold and italic");

    let spans = tokenize("a `b` [c](d) ~~e~~ f");
    assert_eq!(plain_text(&spans), "a b c e f");
}

#[test]
fn ordered_list_ordinals() {
    let ordinals: Vec<_> = parse("1. a\n  1. sub\n  2. sub\n2. b")
        .iter()
        .filter_map(|block| match block {
            Block::ListItem { ordinal, .. } => ordinal.clone(),
            _ => None,
        })
        .collect();
    assert_eq!(ordinals, vec!["1.", "①", "②", "2."]);
}

#[test]
fn numbering_formatter_examples() {
    assert_eq!(format_number(3, 1), "③");
    assert_eq!(format_number(51, 1), "51");
    assert_eq!(format_number(4, 2), "iv");
    assert_eq!(format_number(27, 3), "27");
}

#[test]
fn table_separator_is_dropped() {
    let rows: Vec<_> = parse("|a|b|\n|-|-|\n|1|2|")
        .iter()
        .map(|block| match block {
            Block::TableRow { is_header, .. } => *is_header,
            other => panic!("unexpected block {other:?}"),
        })
        .collect();
    assert_eq!(rows, vec![true, false]);
}

#[test]
fn checklist_toggle_round_trip() {
    let once = toggle_checklist("- [ ] task", 0);
    assert_eq!(once, "- [x] task");
    assert_eq!(toggle_checklist(&once, 0), "- [ ] task");
    assert_eq!(toggle_checklist("- [ ] task", 3), "- [ ] task");
}

#[test]
fn toggle_through_editor_view() {
    let config = Config::default();
    let Rendered::Editor(items) = render(NOTE, RenderMode::Editor, &config) else {
        panic!("expected editor output");
    };
    let line = items
        .iter()
        .find_map(|item| item.toggle_line())
        .expect("sample has a checklist");
    let updated = toggle_checklist(NOTE, line);
    assert!(updated.contains("- [x] milk"));
    assert_eq!(updated.len(), NOTE.len());
}

#[test]
fn code_fence_is_literal() {
    let document = parse("```\n**not bold**\n```");
    assert_eq!(
        document.iter().collect::<Vec<_>>(),
        vec![&Block::CodeBlock {
            language: None,
            lines: vec!["**not bold**".into()],
        }]
    );
}

#[test]
fn widget_line_limit_counts_raw_lines() {
    let config = Config::default();
    let Rendered::Widget(rows) = render(
        NOTE,
        RenderMode::Widget {
            line_limit: Some(4),
        },
        &config,
    ) else {
        panic!("expected widget output");
    };
    // heading, blank, two checklist items
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.line < 4));
}

#[test]
fn zero_widget_limit_renders_everything() {
    let config = Config::default();
    let unlimited = render(NOTE, RenderMode::Widget { line_limit: None }, &config);
    let zero = render(
        NOTE,
        RenderMode::Widget {
            line_limit: Some(0),
        },
        &config,
    );
    let (Rendered::Widget(unlimited), Rendered::Widget(zero)) = (unlimited, zero) else {
        panic!("expected widget output");
    };
    assert!(zero.len() >= unlimited.len());
    assert!(zero.iter().any(|row| row.line >= config.widget.line_limit));
}

#[test]
fn print_numbers_chapters() {
    let Rendered::Print(document) = render(
        "# One\n## Sub\ntext\n# Two",
        RenderMode::Print,
        &Config::default(),
    ) else {
        panic!("expected print output");
    };
    let chapters: Vec<_> = document
        .outline
        .iter()
        .map(|entry| entry.chapter.map(|c| c.to_string()).unwrap_or_default())
        .collect();
    assert_eq!(chapters, vec!["1", "1.1", "2"]);
}
