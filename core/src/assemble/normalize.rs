//! Final formatting pass over the assembled header.

/// Removes a comma that directly precedes `}` on the same line and merges
/// repeated commas. Lines ending in `,` are left alone.
fn fix_commas(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c != ',' {
            out.push(c);
            continue;
        }
        let mut spaces = String::new();
        while let Some(&next) = chars.peek() {
            if next == ' ' || next == ',' {
                if next == ' ' {
                    spaces.push(next);
                }
                chars.next();
            } else {
                break;
            }
        }
        if chars.peek() == Some(&'}') {
            continue;
        }
        out.push(',');
        out.push_str(&spaces);
    }
    out
}

/// Collapses runs of blank lines to a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut previous_blank = false;
    for line in text.split('\n') {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        out.push(line);
        previous_blank = blank;
    }
    out.join("\n")
}

pub fn normalize(text: &str) -> String {
    let lines: Vec<String> = text.split('\n').map(fix_commas).collect();
    collapse_blank_lines(&lines.join("\n"))
}
