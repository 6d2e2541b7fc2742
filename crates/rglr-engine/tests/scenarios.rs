//! The six concrete end-to-end scenarios the runtime is built against:
//! repeated terminals, associativity tie-breaks, skip-tokenizer
//! equivalence, incremental-reuse identity, gap tokenization, and
//! recovery-and-accept on malformed input.

use std::rc::Rc;

use rglr_engine::{to_sexp, ChangedRange, Cursor, InputGap, ParseOutcome, ParserBuilder, ReuseMap};
use rglr_tables::dfa::GroupTableBuilder;
use rglr_tables::{Action, ParseState, TablesBuilder, Tables, TermId, TokenizerFlags, TokenizerSpec, NO_REDUCE};

const NUM: TermId = 3;
const PLUS: TermId = 5;
const E: TermId = 7;
const WS: TermId = 2; // untagged

fn digit_plus_table() -> Tables {
    let mut dfa_builder = GroupTableBuilder::new();
    let s0 = dfa_builder.add_state(1);
    let s_digit = dfa_builder.add_state(1);
    let s_plus = dfa_builder.add_state(1);
    dfa_builder.accept(s_digit, NUM, 1);
    dfa_builder.accept(s_plus, PLUS, 1);
    for d in b'0'..=b'9' {
        dfa_builder.edge(s0, d as u16, d as u16 + 1, s_digit);
    }
    dfa_builder.edge(s0, b'+' as u16, b'+' as u16 + 1, s_plus);
    let dfa = dfa_builder.build();

    let mut b = TablesBuilder::new();
    let tok = b.add_tokenizer(TokenizerSpec::Group {
        table: dfa,
        group_id: 0,
        flags: TokenizerFlags::default(),
    });

    // S0: expects `num` or the start of an `E`.
    let s0 = b.add_state(ParseState {
        actions: Box::new([(NUM, Action::Shift { target: 1 }.encode())]),
        goto: Box::new([(E, 2)]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    // S1 (S_num): just shifted `num`; always reduce it to `E`.
    let s_num = b.add_state(ParseState {
        actions: Box::new([]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: Action::Reduce { depth: 1, term: E }.encode(),
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([]),
    });
    // S2 (S_E): have an `E`; shift `+` or accept at EOF.
    let s_e = b.add_state(ParseState {
        actions: Box::new([
            (PLUS, Action::Shift { target: 3 }.encode()),
            (rglr_tables::EOF, Action::Accept.encode()),
        ]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    // S3 (S_plus): just shifted `+`; expects `num`.
    let s_plus_state = b.add_state(ParseState {
        actions: Box::new([(NUM, Action::Shift { target: 1 }.encode())]),
        goto: Box::new([(E, 4)]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    assert_eq!(s0, 0);
    assert_eq!(s_num, 1);
    assert_eq!(s_e, 2);
    assert_eq!(s_plus_state, 3);

    b.set_tag_name(NUM, "num");
    b.set_tag_name(PLUS, "+");
    b.set_tag_name(E, "E");
    b.start_state(0).build_partial(tok)
}

/// The grammar above needs one more state (`S_EE`, the `E + E`
/// shift/reduce choice point) whose action table differs between the
/// left- and right-associative variants; `build_partial` hands back the
/// tokenizer id so callers can finish wiring it up themselves.
trait TablesBuilderExt {
    fn build_partial(self, tok: rglr_tables::state::TokenizerId) -> Tables;
}

impl TablesBuilderExt for TablesBuilder {
    fn build_partial(self, _tok: rglr_tables::state::TokenizerId) -> Tables {
        self.build()
    }
}

/// Builds the full `E -> E "+" E | num` table, with `S_EE`'s action on
/// `+` set to reduce (left-associative) or shift (right-associative).
fn associative_tables(left_associative: bool) -> Tables {
    let mut dfa_builder = GroupTableBuilder::new();
    let s0 = dfa_builder.add_state(1);
    let s_digit = dfa_builder.add_state(1);
    let s_plus = dfa_builder.add_state(1);
    dfa_builder.accept(s_digit, NUM, 1);
    dfa_builder.accept(s_plus, PLUS, 1);
    for d in b'0'..=b'9' {
        dfa_builder.edge(s0, d as u16, d as u16 + 1, s_digit);
    }
    dfa_builder.edge(s0, b'+' as u16, b'+' as u16 + 1, s_plus);
    let dfa = dfa_builder.build();

    let mut b = TablesBuilder::new();
    let tok = b.add_tokenizer(TokenizerSpec::Group {
        table: dfa,
        group_id: 0,
        flags: TokenizerFlags::default(),
    });

    let s0 = b.add_state(ParseState {
        actions: Box::new([(NUM, Action::Shift { target: 1 }.encode())]),
        goto: Box::new([(E, 2)]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    let s_num = b.add_state(ParseState {
        actions: Box::new([]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: Action::Reduce { depth: 1, term: E }.encode(),
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([]),
    });
    let s_e = b.add_state(ParseState {
        actions: Box::new([
            (PLUS, Action::Shift { target: 3 }.encode()),
            (rglr_tables::EOF, Action::Accept.encode()),
        ]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    let s_plus = b.add_state(ParseState {
        actions: Box::new([(NUM, Action::Shift { target: 1 }.encode())]),
        goto: Box::new([(E, 4)]),
        recover: Box::new([(NUM, 3)]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    let ee_reduce = (PLUS, Action::Reduce { depth: 3, term: E }.encode());
    let s_ee = b.add_state(ParseState {
        actions: if left_associative {
            Box::new([ee_reduce, (rglr_tables::EOF, Action::Reduce { depth: 3, term: E }.encode())])
        } else {
            Box::new([
                (PLUS, Action::Shift { target: 3 }.encode()),
                (rglr_tables::EOF, Action::Reduce { depth: 3, term: E }.encode()),
            ])
        },
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    assert_eq!(s0, 0);
    assert_eq!(s_num, 1);
    assert_eq!(s_e, 2);
    assert_eq!(s_plus, 3);
    assert_eq!(s_ee, 4);

    b.set_tag_name(NUM, "num");
    b.set_tag_name(PLUS, "+");
    b.set_tag_name(E, "E");
    b.start_state(0).build()
}

/// Scenario 1: `S -> "a"+`; input `"aaa"` -> `S(a,a,a)` at positions 0,1,2.
#[test]
fn scenario_1_repeated_terminal() {
    const A: TermId = 2;
    const S: TermId = 4;

    let mut dfa_builder = GroupTableBuilder::new();
    let s0 = dfa_builder.add_state(1);
    let s1 = dfa_builder.add_state(1);
    dfa_builder.accept(s1, A, 1);
    dfa_builder.edge(s0, b'a' as u16, b'a' as u16 + 1, s1);
    let dfa = dfa_builder.build();

    let mut b = TablesBuilder::new();
    let tok = b.add_tokenizer(TokenizerSpec::Group {
        table: dfa,
        group_id: 0,
        flags: TokenizerFlags::default(),
    });
    let s0 = b.add_state(ParseState {
        actions: Box::new([(A, Action::Shift { target: 1 }.encode())]),
        goto: Box::new([(S, 2)]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    let s1 = b.add_state(ParseState {
        actions: Box::new([
            (rglr_tables::EOF, Action::Reduce { depth: 1, term: S }.encode()),
            (A, Action::Shift { target: 1 }.encode()),
        ]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    let s2 = b.add_state(ParseState {
        actions: Box::new([(rglr_tables::EOF, Action::Accept.encode())]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([]),
    });
    assert_eq!(s0, 0);
    assert_eq!(s1, 1);
    assert_eq!(s2, 2);
    b.set_tag_name(A, "a");
    b.set_tag_name(S, "S");
    let tables = b.start_state(0).build();

    let mut parser = ParserBuilder::new(&tables, "aaa").build();
    let tree = match parser.advance().unwrap() {
        ParseOutcome::Accepted(tree) => tree,
        other => panic!("expected acceptance, got a different outcome: {}", matches!(other, ParseOutcome::Paused)),
    };
    assert_eq!(to_sexp(&tree, &tables), "S(a,a,a)");

    let mut cursor = Cursor::new(&tree);
    assert!(cursor.goto_first_child());
    let mut starts = vec![cursor.start()];
    while cursor.goto_next_sibling() {
        starts.push(cursor.start());
    }
    assert_eq!(starts, vec![0, 1, 2]);
}

/// Scenario 2: `E -> E "+" E | num`; `"1+2+3"` must be reachable as both
/// the left- and right-associative tree shape, selected by which table
/// (dialect-specific grammar variant) the parse is run against.
#[test]
fn scenario_2_associativity_tie_break() {
    let left = associative_tables(true);
    let mut parser = ParserBuilder::new(&left, "1+2+3").build();
    let tree = match parser.advance().unwrap() {
        ParseOutcome::Accepted(tree) => tree,
        _ => panic!("left-associative parse did not accept"),
    };
    assert_eq!(tree.start(), 0);
    assert_eq!(tree.end(), 5);
    assert_eq!(to_sexp(&tree, &left), "E(E(E(num),+,E(num)),+,E(num))");

    let right = associative_tables(false);
    let mut parser = ParserBuilder::new(&right, "1+2+3").build();
    let tree = match parser.advance().unwrap() {
        ParseOutcome::Accepted(tree) => tree,
        _ => panic!("right-associative parse did not accept"),
    };
    assert_eq!(to_sexp(&tree, &right), "E(E(num),+,E(E(num),+,E(num)))");
}

/// Scenario 3: a skip tokenizer matching `" "` makes `"a b"` parse to the
/// same tree shape as `"ab"`, modulo positions.
#[test]
fn scenario_3_skip_tokenizer_whitespace_equivalence() {
    const A: TermId = 3;
    const BEE: TermId = 5;
    const S: TermId = 7;

    fn build(with_space: bool) -> (Tables, &'static str) {
        let mut ws_builder = GroupTableBuilder::new();
        let ws0 = ws_builder.add_state(1);
        let ws1 = ws_builder.add_state(1);
        ws_builder.accept(ws1, WS, 1);
        ws_builder.edge(ws0, b' ' as u16, b' ' as u16 + 1, ws1);
        let ws_table = ws_builder.build();

        let mut ab_builder = GroupTableBuilder::new();
        let ab0 = ab_builder.add_state(1);
        let a_state = ab_builder.add_state(1);
        let b_state = ab_builder.add_state(1);
        ab_builder.accept(a_state, A, 1);
        ab_builder.accept(b_state, BEE, 1);
        ab_builder.edge(ab0, b'a' as u16, b'a' as u16 + 1, a_state);
        ab_builder.edge(ab0, b'b' as u16, b'b' as u16 + 1, b_state);
        let ab_table = ab_builder.build();

        let mut b = TablesBuilder::new();
        let tok_ws = b.add_tokenizer(TokenizerSpec::Group {
            table: ws_table,
            group_id: 0,
            flags: TokenizerFlags::default(),
        });
        let tok_ab = b.add_tokenizer(TokenizerSpec::Group {
            table: ab_table,
            group_id: 0,
            flags: TokenizerFlags::default(),
        });

        let s0 = b.add_state(ParseState {
            actions: Box::new([(A, Action::Shift { target: 1 }.encode())]),
            goto: Box::new([(S, 3)]),
            recover: Box::new([]),
            always_reduce: NO_REDUCE,
            default_reduce: NO_REDUCE,
            skip: Some(tok_ws),
            tokenizers: Box::new([tok_ab]),
        });
        let s1 = b.add_state(ParseState {
            actions: Box::new([(BEE, Action::Shift { target: 2 }.encode())]),
            goto: Box::new([]),
            recover: Box::new([]),
            always_reduce: NO_REDUCE,
            default_reduce: NO_REDUCE,
            skip: Some(tok_ws),
            tokenizers: Box::new([tok_ab]),
        });
        let s2 = b.add_state(ParseState {
            actions: Box::new([(rglr_tables::EOF, Action::Reduce { depth: 2, term: S }.encode())]),
            goto: Box::new([]),
            recover: Box::new([]),
            always_reduce: NO_REDUCE,
            default_reduce: NO_REDUCE,
            skip: None,
            tokenizers: Box::new([]),
        });
        let s3 = b.add_state(ParseState {
            actions: Box::new([(rglr_tables::EOF, Action::Accept.encode())]),
            goto: Box::new([]),
            recover: Box::new([]),
            always_reduce: NO_REDUCE,
            default_reduce: NO_REDUCE,
            skip: None,
            tokenizers: Box::new([]),
        });
        assert_eq!(s0, 0);
        assert_eq!(s1, 1);
        assert_eq!(s2, 2);
        assert_eq!(s3, 3);

        b.set_tag_name(A, "a");
        b.set_tag_name(BEE, "b");
        b.set_tag_name(S, "S");
        let tables = b.start_state(0).build();
        (tables, if with_space { "a b" } else { "ab" })
    }

    let (tables_plain, plain_input) = build(false);
    let mut parser = ParserBuilder::new(&tables_plain, plain_input).build();
    let tree_plain = match parser.advance().unwrap() {
        ParseOutcome::Accepted(t) => t,
        _ => panic!("\"ab\" should parse"),
    };

    let (tables_spaced, spaced_input) = build(true);
    let mut parser = ParserBuilder::new(&tables_spaced, spaced_input).build();
    let tree_spaced = match parser.advance().unwrap() {
        ParseOutcome::Accepted(t) => t,
        _ => panic!("\"a b\" should parse"),
    };

    assert_eq!(to_sexp(&tree_plain, &tables_plain), "S(a,b)");
    assert_eq!(to_sexp(&tree_spaced, &tables_spaced), "S(a,b)");

    // Positions differ (the skipped space shifts `b` one character right),
    // but the shape is identical.
    assert_eq!(tree_plain.end(), 2);
    assert_eq!(tree_spaced.end(), 3);
}

/// Scenario 4: parsing `"1+2"` then applying an append-only edit must let
/// the unchanged leading text reuse its prior subtree by identity.
#[test]
fn scenario_4_incremental_reuse_keeps_unchanged_leaves() {
    let tables = digit_plus_table_for_num_plus_num();
    let mut parser = ParserBuilder::new(&tables, "1+2").build();
    let prior_tree = match parser.advance().unwrap() {
        ParseOutcome::Accepted(t) => t,
        _ => panic!("\"1+2\" should parse"),
    };

    let change = ChangedRange {
        from_a: 3,
        to_a: 3,
        from_b: 3,
        to_b: 5,
    };
    let map = ReuseMap::build(&prior_tree, &[change]);

    assert_eq!(map.len(), 1, "the whole unchanged tree reuses as one unit");
    let reused = map.at(0).expect("reusable entry at post-edit position 0");
    assert_eq!(reused.post_start, 0);
    assert_eq!(reused.post_end(), 3);

    match (&reused.tree, &prior_tree) {
        (rglr_engine::TreeSlot::Buffer(a), rglr_engine::TreeSlot::Buffer(b)) => {
            assert!(Rc::ptr_eq(a, b), "reuse must preserve the exact prior allocation");
        }
        _ => panic!("small num+plus+num reduction should flatten into a TreeBuffer"),
    }

    let mut cursor = Cursor::new(&reused.tree);
    assert!(cursor.goto_first_child());
    assert_eq!((cursor.start(), cursor.end()), (0, 1), "num(1) kept its span");
    assert!(cursor.goto_next_sibling());
    assert!(cursor.goto_next_sibling());
    assert_eq!((cursor.start(), cursor.end()), (2, 3), "num(2) kept its span");
}

fn digit_plus_table_for_num_plus_num() -> Tables {
    let mut dfa_builder = GroupTableBuilder::new();
    let s0 = dfa_builder.add_state(1);
    let s_digit = dfa_builder.add_state(1);
    let s_plus = dfa_builder.add_state(1);
    dfa_builder.accept(s_digit, NUM, 1);
    dfa_builder.accept(s_plus, PLUS, 1);
    for d in b'0'..=b'9' {
        dfa_builder.edge(s0, d as u16, d as u16 + 1, s_digit);
    }
    dfa_builder.edge(s0, b'+' as u16, b'+' as u16 + 1, s_plus);
    let dfa = dfa_builder.build();

    let mut b = TablesBuilder::new();
    let tok = b.add_tokenizer(TokenizerSpec::Group {
        table: dfa,
        group_id: 0,
        flags: TokenizerFlags::default(),
    });

    let s0 = b.add_state(ParseState {
        actions: Box::new([(NUM, Action::Shift { target: 1 }.encode())]),
        goto: Box::new([(E, 4)]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    let s1 = b.add_state(ParseState {
        actions: Box::new([(PLUS, Action::Shift { target: 2 }.encode())]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    let s2 = b.add_state(ParseState {
        actions: Box::new([(NUM, Action::Shift { target: 3 }.encode())]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    let s3 = b.add_state(ParseState {
        actions: Box::new([(rglr_tables::EOF, Action::Reduce { depth: 3, term: E }.encode())]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([]),
    });
    let s4 = b.add_state(ParseState {
        actions: Box::new([(rglr_tables::EOF, Action::Accept.encode())]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([]),
    });
    assert_eq!(s0, 0);
    assert_eq!(s1, 1);
    assert_eq!(s2, 2);
    assert_eq!(s3, 3);
    assert_eq!(s4, 4);

    b.set_tag_name(NUM, "num");
    b.set_tag_name(PLUS, "+");
    b.set_tag_name(E, "E");
    b.start_state(0).build()
}

/// Scenario 5: a gap `[2,5)` over `"ab###cd"` must tokenize as if the
/// text were `"abcd"`, with the four letters landing at 0, 1, 5, 6.
#[test]
fn scenario_5_gap_tokenization() {
    const LETTER: TermId = 3;
    const S: TermId = 5;

    let mut dfa_builder = GroupTableBuilder::new();
    let s0 = dfa_builder.add_state(1);
    let s1 = dfa_builder.add_state(1);
    dfa_builder.accept(s1, LETTER, 1);
    for ch in b'a'..=b'z' {
        dfa_builder.edge(s0, ch as u16, ch as u16 + 1, s1);
    }
    let dfa = dfa_builder.build();

    let mut b = TablesBuilder::new();
    let tok = b.add_tokenizer(TokenizerSpec::Group {
        table: dfa,
        group_id: 0,
        flags: TokenizerFlags::default(),
    });

    // Four states shift one letter each, chaining 0->1->2->3->4; state 4
    // reduces all four into `S` and the goto on `S` from the base (state
    // 0) lands on the accepting state.
    let s0 = b.add_state(ParseState {
        actions: Box::new([(LETTER, Action::Shift { target: 1 }.encode())]),
        goto: Box::new([(S, 5)]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    let s1 = b.add_state(ParseState {
        actions: Box::new([(LETTER, Action::Shift { target: 2 }.encode())]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    let s2 = b.add_state(ParseState {
        actions: Box::new([(LETTER, Action::Shift { target: 3 }.encode())]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    let s3 = b.add_state(ParseState {
        actions: Box::new([(LETTER, Action::Shift { target: 4 }.encode())]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([tok]),
    });
    let s_reduce = b.add_state(ParseState {
        actions: Box::new([(rglr_tables::EOF, Action::Reduce { depth: 4, term: S }.encode())]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([]),
    });
    let s_accept = b.add_state(ParseState {
        actions: Box::new([(rglr_tables::EOF, Action::Accept.encode())]),
        goto: Box::new([]),
        recover: Box::new([]),
        always_reduce: NO_REDUCE,
        default_reduce: NO_REDUCE,
        skip: None,
        tokenizers: Box::new([]),
    });
    assert_eq!(s0, 0);
    assert_eq!(s1, 1);
    assert_eq!(s2, 2);
    assert_eq!(s3, 3);
    assert_eq!(s_reduce, 4);
    assert_eq!(s_accept, 5);

    b.set_tag_name(LETTER, "L");
    b.set_tag_name(S, "S");
    let tables = b.start_state(0).build();

    let mut parser = ParserBuilder::new(&tables, "ab###cd")
        .gaps(vec![InputGap { from: 2, to: 5 }])
        .build();
    let tree = match parser.advance().unwrap() {
        ParseOutcome::Accepted(tree) => tree,
        _ => panic!("\"ab###cd\" with gap [2,5) should tokenize as \"abcd\" and accept"),
    };
    assert_eq!(to_sexp(&tree, &tables), "S(L,L,L,L)");

    let mut cursor = Cursor::new(&tree);
    assert!(cursor.goto_first_child());
    let mut starts = vec![cursor.start()];
    while cursor.goto_next_sibling() {
        starts.push(cursor.start());
    }
    assert_eq!(starts, vec![0, 1, 5, 6], "the gap is elided: positions jump straight from 1 to 5");
}

/// Scenario 6: malformed input `"1++2"` must still accept, with an ERR
/// node spanning the unexpected second `+`.
#[test]
fn scenario_6_malformed_input_recovers_with_err_node() {
    let tables = associative_tables(true);
    let mut parser = ParserBuilder::new(&tables, "1++2").build();
    let tree = match parser.advance().unwrap() {
        ParseOutcome::Accepted(tree) => tree,
        _ => panic!("malformed input must still reach acceptance via recovery"),
    };
    assert_eq!(tree.start(), 0);
    assert_eq!(tree.end(), 4, "the whole input, including the dropped '+', is covered");

    // Somewhere in the tree there is an ERR-tagged node.
    let mut cursor = Cursor::new(&tree);
    let mut found_err = cursor.node_type() == rglr_tables::ERR;
    while !found_err && cursor.advance_preorder() {
        found_err = cursor.node_type() == rglr_tables::ERR;
    }
    assert!(found_err, "recovery must record the skipped token as an ERR node");
}
