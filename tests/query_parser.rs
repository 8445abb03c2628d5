use spellfall::error::SpellfallError;
use spellfall::field::Operator;
use spellfall::query::{Clause, parse};

fn single(query: &str) -> Clause {
    let mut clauses = parse(query).expect("query parses");
    assert_eq!(clauses.len(), 1, "{query} should be one clause");
    clauses.remove(0)
}

fn parse_message(query: &str) -> String {
    match parse(query) {
        Err(SpellfallError::Parse { message, .. }) => message,
        other => panic!("expected a parse error for {query}, got {other:?}"),
    }
}

#[test]
fn two_character_operators_are_not_split() {
    for (query, operator) in [
        ("level>=3", Operator::GtEq),
        ("level<=3", Operator::LtEq),
        ("level!=3", Operator::NotEq),
        ("level>3", Operator::Gt),
        ("level<3", Operator::Lt),
        ("level:3", Operator::Eq),
    ] {
        let clause = single(query);
        assert_eq!(clause.alias(), "level");
        assert_eq!(clause.operator(), operator, "{query}");
        assert_eq!(clause.values(), ["3"], "{query}");
    }
}

#[test]
fn groups_and_case_folding() {
    let clause = single("DT:(Fire  LIGHTNING)");
    assert_eq!(clause.alias(), "dt");
    assert_eq!(clause.operator(), Operator::Eq);
    assert_eq!(clause.values(), ["fire", "lightning"]);
    let padded = single("dt:( fire )");
    assert_eq!(padded.values(), ["fire"]);
}

#[test]
fn clauses_keep_their_order() {
    let clauses = parse("  level:3   dt!=(fire cold) conc:yes ").unwrap();
    let aliases: Vec<&str> = clauses.iter().map(Clause::alias).collect();
    assert_eq!(aliases, ["level", "dt", "conc"]);
    assert_eq!(clauses[1].operator(), Operator::NotEq);
    assert_eq!(clauses[1].to_string(), "dt!=(fire cold)");
}

#[test]
fn blank_query_has_no_clauses() {
    assert!(parse("").unwrap().is_empty());
    assert!(parse("   \t ").unwrap().is_empty());
}

#[test]
fn parse_errors_name_the_clause() {
    match parse("level:3 fireball") {
        Err(SpellfallError::Parse { clause, message }) => {
            assert_eq!(clause, "fireball");
            assert_eq!(message, "no recognized operator");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(parse_message("level:"), "missing value");
    assert_eq!(parse_message("dt:()"), "empty value list");
    assert_eq!(parse_message("dt:(fire cold"), "unbalanced parentheses");
    assert_eq!(parse_message("dt:fire)"), "unbalanced parentheses");
    assert_eq!(parse_message(":3"), "expected a field name before the operator");
}

#[test]
fn unknown_aliases_are_left_to_the_compiler() {
    let clause = single("colour:red");
    assert_eq!(clause.alias(), "colour");
}

#[test]
fn any_alias_reaches_the_compiler() {
    let hyphenated = single("aoe-size:3");
    assert_eq!(hyphenated.alias(), "aoe-size");
    assert_eq!(hyphenated.values(), ["3"]);
    let accented = single("CAFÉ>=2");
    assert_eq!(accented.alias(), "café");
    assert_eq!(accented.operator(), Operator::GtEq);
    assert_eq!(single("a!b:3").alias(), "a!b");
}
