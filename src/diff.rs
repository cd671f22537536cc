//! Context-diff computation between two texts, in the style of Python's
//! `difflib.context_diff`: `***`/`---` file headers, `***************`
//! section markers, `*** a,b ****` / `--- c,d ----` hunk ranges, and
//! `' '`/`'-'`/`'+'`/`'!'` line prefixes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Equal,
    Delete,
    Insert,
    Replace,
}

#[derive(Debug, Clone)]
struct Opcode {
    tag: Tag,
    i1: usize,
    i2: usize,
    j1: usize,
    j2: usize,
}

pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(|l| l.to_string()).collect()
}

/// Longest-common-subsequence based line diff. Returns opcodes describing
/// which ranges of `old`/`new` are equal, deleted, inserted, or replaced.
fn diff_opcodes(old: &[String], new: &[String]) -> Vec<Opcode> {
    let n = old.len();
    let m = new.len();
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i][j] = if old[i] == new[j] {
                dp[i + 1][j + 1] + 1
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    #[derive(PartialEq)]
    enum EditKind {
        Keep,
        Delete,
        Insert,
    }
    let mut edits = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    while i < n && j < m {
        if old[i] == new[j] {
            edits.push(EditKind::Keep);
            i += 1;
            j += 1;
        } else if dp[i + 1][j] >= dp[i][j + 1] {
            edits.push(EditKind::Delete);
            i += 1;
        } else {
            edits.push(EditKind::Insert);
            j += 1;
        }
    }
    while i < n {
        edits.push(EditKind::Delete);
        i += 1;
    }
    while j < m {
        edits.push(EditKind::Insert);
        j += 1;
    }

    let mut opcodes = Vec::new();
    let (mut oi, mut oj) = (0usize, 0usize);
    let mut k = 0;
    while k < edits.len() {
        match edits[k] {
            EditKind::Keep => {
                let (start_i, start_j) = (oi, oj);
                while k < edits.len() && edits[k] == EditKind::Keep {
                    oi += 1;
                    oj += 1;
                    k += 1;
                }
                opcodes.push(Opcode {
                    tag: Tag::Equal,
                    i1: start_i,
                    i2: oi,
                    j1: start_j,
                    j2: oj,
                });
            }
            EditKind::Delete | EditKind::Insert => {
                let (start_i, start_j) = (oi, oj);
                while k < edits.len() && edits[k] == EditKind::Delete {
                    oi += 1;
                    k += 1;
                }
                while k < edits.len() && edits[k] == EditKind::Insert {
                    oj += 1;
                    k += 1;
                }
                let tag = if oi > start_i && oj > start_j {
                    Tag::Replace
                } else if oi > start_i {
                    Tag::Delete
                } else {
                    Tag::Insert
                };
                opcodes.push(Opcode {
                    tag,
                    i1: start_i,
                    i2: oi,
                    j1: start_j,
                    j2: oj,
                });
            }
        }
    }
    opcodes
}

/// Group opcodes into hunks with up to `context` lines of surrounding
/// unchanged text, splitting long equal runs the way `difflib` does.
fn group_opcodes(opcodes: &[Opcode], context: usize) -> Vec<Vec<Opcode>> {
    if opcodes.is_empty() {
        return vec![];
    }
    let mut opcodes = opcodes.to_vec();

    if let Some(first) = opcodes.first_mut() {
        if first.tag == Tag::Equal {
            first.i1 = first.i1.max(first.i2.saturating_sub(context));
            first.j1 = first.j1.max(first.j2.saturating_sub(context));
        }
    }
    if let Some(last) = opcodes.last_mut() {
        if last.tag == Tag::Equal {
            last.i2 = last.i2.min(last.i1 + context);
            last.j2 = last.j2.min(last.j1 + context);
        }
    }

    let mut groups: Vec<Vec<Opcode>> = Vec::new();
    let mut group: Vec<Opcode> = Vec::new();
    for op in opcodes {
        if op.tag == Tag::Equal && op.i2 - op.i1 > 2 * context {
            let mut head = op.clone();
            head.i2 = head.i1 + context;
            head.j2 = head.j1 + context;
            group.push(head);
            groups.push(std::mem::take(&mut group));

            let mut tail = op;
            tail.i1 = tail.i2 - context;
            tail.j1 = tail.j2 - context;
            group.push(tail);
        } else {
            group.push(op);
        }
    }
    if !(group.len() == 1 && group[0].tag == Tag::Equal) && !group.is_empty() {
        groups.push(group);
    }
    groups
}

fn format_range(start: usize, end: usize) -> String {
    if end <= start {
        format!("{}", start)
    } else if end - start == 1 {
        format!("{}", start + 1)
    } else {
        format!("{},{}", start + 1, end)
    }
}

/// Render a context diff between `old` and `new`, labeled with
/// `from_label`/`to_label`. Returns `None` if the texts are identical.
pub fn context_diff(from_label: &str, to_label: &str, old: &str, new: &str) -> Option<String> {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let opcodes = diff_opcodes(&old_lines, &new_lines);
    let groups = group_opcodes(&opcodes, 3);
    if groups.is_empty() {
        return None;
    }

    let mut out = String::new();
    out.push_str(&format!("*** {from_label}\n"));
    out.push_str(&format!("--- {to_label}\n"));

    for group in groups {
        out.push_str("***************\n");
        let i1 = group.first().unwrap().i1;
        let i2 = group.last().unwrap().i2;
        out.push_str(&format!("*** {} ****\n", format_range(i1, i2)));

        if group
            .iter()
            .any(|op| matches!(op.tag, Tag::Delete | Tag::Replace))
        {
            for op in &group {
                match op.tag {
                    Tag::Equal => {
                        for l in &old_lines[op.i1..op.i2] {
                            out.push_str(&format!("  {l}\n"));
                        }
                    }
                    Tag::Delete => {
                        for l in &old_lines[op.i1..op.i2] {
                            out.push_str(&format!("- {l}\n"));
                        }
                    }
                    Tag::Replace => {
                        for l in &old_lines[op.i1..op.i2] {
                            out.push_str(&format!("! {l}\n"));
                        }
                    }
                    Tag::Insert => {}
                }
            }
        }

        let j1 = group.first().unwrap().j1;
        let j2 = group.last().unwrap().j2;
        out.push_str(&format!("--- {} ----\n", format_range(j1, j2)));

        if group
            .iter()
            .any(|op| matches!(op.tag, Tag::Insert | Tag::Replace))
        {
            for op in &group {
                match op.tag {
                    Tag::Equal => {
                        for l in &new_lines[op.j1..op.j2] {
                            out.push_str(&format!("  {l}\n"));
                        }
                    }
                    Tag::Insert => {
                        for l in &new_lines[op.j1..op.j2] {
                            out.push_str(&format!("+ {l}\n"));
                        }
                    }
                    Tag::Replace => {
                        for l in &new_lines[op.j1..op.j2] {
                            out.push_str(&format!("! {l}\n"));
                        }
                    }
                    Tag::Delete => {}
                }
            }
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_produce_no_diff() {
        assert!(context_diff("a", "b", "same\ntext\n", "same\ntext\n").is_none());
    }

    #[test]
    fn single_line_change_is_marked_replace() {
        let diff = context_diff("old", "new", "abc\n", "abcdef\n").unwrap();
        assert!(diff.contains("*** old"));
        assert!(diff.contains("--- new"));
        assert!(diff.contains("! abc"));
        assert!(diff.contains("! abcdef"));
    }

    #[test]
    fn pure_insertion_has_plus_lines() {
        let diff = context_diff("old", "new", "a\nb\n", "a\nb\nc\n").unwrap();
        assert!(diff.contains("+ c"));
    }

    #[test]
    fn pure_deletion_has_minus_lines() {
        let diff = context_diff("old", "new", "a\nb\nc\n", "a\nc\n").unwrap();
        assert!(diff.contains("- b"));
    }
}
