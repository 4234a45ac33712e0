//! Canonical text must survive render -> parse -> render unchanged.

use anyhow::Result;
use combo_core::{parse_combo, render, Argument, Builtin, ComboTree, OutputFormat, RenderOptions};

fn arg(idx: i32) -> Result<ComboTree> {
    Ok(ComboTree::leaf(Argument::new(idx)?))
}

fn round_trip(tree: &ComboTree, labels: &[String]) -> Result<(String, String)> {
    let opts = RenderOptions::with_labels(labels);
    let first = render(tree, OutputFormat::Combo, &opts)?;
    let reparsed = parse_combo(&first, labels)?;
    assert_eq!(&reparsed, tree, "reparsed tree differs for `{}`", first);
    let second = render(&reparsed, OutputFormat::Combo, &opts)?;
    Ok((first, second))
}

#[test]
fn test_boolean_tree_round_trip() -> Result<()> {
    let tree = ComboTree::node(
        Builtin::LogicalOr,
        vec![
            ComboTree::node(Builtin::LogicalAnd, vec![arg(1)?, arg(-2)?]),
            ComboTree::node(Builtin::LogicalNot, vec![arg(3)?]),
            ComboTree::leaf(Builtin::LogicalFalse),
        ],
    );

    let (first, second) = round_trip(&tree, &[])?;
    assert_eq!(first, "or(and($1 !$2) not($3) false)");
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_weighted_vote_round_trip() -> Result<()> {
    let alpha = 0.5 * 3f64.ln();
    let member = |a: ComboTree| {
        ComboTree::node(
            Builtin::Times,
            vec![
                ComboTree::leaf(alpha),
                ComboTree::node(
                    Builtin::Plus,
                    vec![
                        ComboTree::leaf(-0.5_f64),
                        ComboTree::node(Builtin::Impulse, vec![a]),
                    ],
                ),
            ],
        )
    };
    let tree = ComboTree::node(
        Builtin::GreaterThanZero,
        vec![ComboTree::node(
            Builtin::Plus,
            vec![member(arg(1)?), member(arg(-4)?)],
        )],
    );

    let (first, second) = round_trip(&tree, &[])?;
    assert_eq!(first, second);
    assert!(first.starts_with(&format!("0<(+(*({} +(-0.5 impulse($1)))", alpha)));
    Ok(())
}

#[test]
fn test_labelled_round_trip() -> Result<()> {
    let labels: Vec<String> = ["outlook", "humidity", "windy"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let tree = ComboTree::node(
        Builtin::LogicalAnd,
        vec![
            arg(2)?,
            ComboTree::node(Builtin::LogicalOr, vec![arg(-1)?, arg(3)?]),
        ],
    );

    let (first, second) = round_trip(&tree, &labels)?;
    assert_eq!(first, "and($humidity or(!$outlook $windy))");
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_parsed_text_is_stable() -> Result<()> {
    for text in [
        "and($1 !$2)",
        "contin_if(0<($1) 2.5 -1)",
        "list(enum:red enum:\"dark blue\" message:\"x y\")",
        "->(foldr(cons($1 $2) $3 $4))",
        "cond($1 0.1 $2 0.2 0.3)",
    ] {
        let tree = parse_combo(text, &[])?;
        assert_eq!(tree.to_string(), text);
    }
    Ok(())
}
