//! Printing a parsed tree as an S-expression of tagged nodes, the way a
//! human reads a tree in a test failure or a debug dump.
//!
//! Untagged nodes (anonymous groupings, repeat-rule scaffolding) never
//! appear in the output — their children are spliced into the enclosing
//! sequence exactly where the untagged node sat, which is the same
//! transparency [`crate::cursor::Cursor::next_tagged`] gives a live walk.

use rglr_tables::Tables;

use crate::cursor::Cursor;
use crate::tree::TreeSlot;

/// Render `tree` as an S-expression, e.g. `Program(Statement,Statement)`.
/// Tag names come from `tables`; a term with no registered name prints as
/// `?`, which should only happen against mismatched or incomplete tables.
pub fn to_sexp(tree: &TreeSlot, tables: &Tables) -> String {
    let mut cursor = Cursor::new(tree);
    let mut out = String::new();
    let mut first = true;
    write_item(&mut cursor, tables, &mut out, &mut first);
    out
}

fn write_item(cursor: &mut Cursor, tables: &Tables, out: &mut String, first: &mut bool) {
    if cursor.is_tagged() {
        if !*first {
            out.push(',');
        }
        *first = false;
        out.push_str(tables.tag_name(cursor.node_type()).unwrap_or("?"));
        if cursor.goto_first_child() {
            out.push('(');
            let mut inner_first = true;
            write_siblings(cursor, tables, out, &mut inner_first);
            out.push(')');
            cursor.goto_parent();
        }
    } else if cursor.goto_first_child() {
        // Untagged: splice children into the caller's sequence, not our own.
        write_siblings(cursor, tables, out, first);
        cursor.goto_parent();
    }
}

fn write_siblings(cursor: &mut Cursor, tables: &Tables, out: &mut String, first: &mut bool) {
    loop {
        write_item(cursor, tables, out, first);
        if !cursor.goto_next_sibling() {
            break;
        }
    }
}
