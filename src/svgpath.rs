//! Tokenizer and vertical-flip rewriter for SVG path data.
//!
//! The traced outlines come out of the tracer in image coordinates (y grows
//! downward); BAS path elements want the opposite, so every Y coordinate is
//! mirrored against the viewBox height. The rewriter understands the full
//! `M L H V C S Q T A Z` command alphabet, absolute and relative forms, and
//! implicit repetition of parameter groups.

/// Historical fallback viewBox height used when a caller passes 0.
pub const DEFAULT_VIEW_BOX_H: f64 = 3620.0;

const COMMANDS: &str = "MLHVCSQTAZmlhvcsqtaz";

#[derive(Clone, Copy, Debug, PartialEq)]
enum PathToken {
    Command(char),
    Number(f64),
}

/// Values per parameter group for a command letter (case insensitive).
/// `Z` takes none; unknown letters are treated like `Z`.
fn group_arity(cmd: char) -> usize {
    match cmd.to_ascii_uppercase() {
        'H' | 'V' => 1,
        'M' | 'L' | 'T' => 2,
        'S' | 'Q' => 4,
        'C' => 6,
        'A' => 7,
        _ => 0,
    }
}

/// Split path data into command letters and numeric tokens.
///
/// Separators (whitespace, commas) are discarded, as is any byte that is
/// neither a command letter nor part of a number. Numeric tokens support an
/// optional sign, decimal point and exponent; a token that still fails to
/// parse is coerced to `0.0` rather than rejected, matching the historically
/// permissive behavior of this grammar.
fn lex(d: &str) -> Vec<PathToken> {
    let bytes = d.as_bytes();
    let mut out = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_whitespace() || c == ',' {
            i += 1;
            continue;
        }
        if COMMANDS.contains(c) {
            out.push(PathToken::Command(c));
            i += 1;
            continue;
        }

        let start = i;
        if matches!(c, '+' | '-') {
            i += 1;
        }
        let int_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
        if i == int_start || (i == int_start + 1 && bytes[int_start] == b'.') {
            // No digits at all: not a number, drop the byte and move on.
            i = start + 1;
            continue;
        }
        if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
            let e_pos = i;
            i += 1;
            if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
                i += 1;
            }
            let exp_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if exp_start == i {
                // Dangling exponent marker, rewind and keep the mantissa.
                i = e_pos;
            }
        }

        let v: f64 = d[start..i].parse().unwrap_or(0.0);
        out.push(PathToken::Number(v));
    }

    out
}

/// Rewrite one parameter group of `cmd` under the vertical flip.
fn flip_group(cmd: char, group: &[f64], h: f64) -> Vec<f64> {
    let absolute = cmd.is_ascii_uppercase();
    match cmd.to_ascii_uppercase() {
        'H' => group.to_vec(),
        'V' => group
            .iter()
            .map(|&y| if absolute { h - y } else { -y })
            .collect(),
        // Arc: rx, ry, rotation and both flags pass through; only the final
        // y endpoint is positional.
        'A' => group
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                if i == 6 {
                    if absolute { h - v } else { -v }
                } else {
                    v
                }
            })
            .collect(),
        _ => group
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                if i % 2 == 1 {
                    if absolute { h - v } else { -v }
                } else {
                    v
                }
            })
            .collect(),
    }
}

/// Shortest round-trip decimal form, no forced trailing zeros.
fn fmt_num(v: f64) -> String {
    format!("{v}")
}

fn flush_params(out: &mut Vec<String>, cmd: Option<char>, params: &mut Vec<f64>, h: f64) {
    let Some(cmd) = cmd else {
        // Numbers before any command have no grammar slot; drop them.
        params.clear();
        return;
    };
    let arity = group_arity(cmd);
    if arity == 0 {
        params.clear();
        return;
    }
    for group in params.chunks(arity) {
        let flipped = flip_group(cmd, group, h);
        let strs: Vec<String> = flipped.iter().map(|&v| fmt_num(v)).collect();
        out.push(strs.join(" "));
    }
    params.clear();
}

/// Mirror every Y coordinate of `d` against `view_box_h`.
///
/// Absolute Y values become `view_box_h - y`, relative deltas are negated,
/// X coordinates and non-positional arc parameters are untouched and command
/// letters are preserved. Repeated parameter groups after a single command
/// letter are each transformed under that command's absolute/relative
/// semantics. Applying the flip twice with the same height is the identity
/// on the numeric content.
pub fn flip_path_y(d: &str, view_box_h: f64) -> String {
    let h = if view_box_h == 0.0 {
        DEFAULT_VIEW_BOX_H
    } else {
        view_box_h
    };

    let mut out: Vec<String> = Vec::new();
    let mut command: Option<char> = None;
    let mut params: Vec<f64> = Vec::new();

    for token in lex(d) {
        match token {
            PathToken::Command(c) => {
                flush_params(&mut out, command, &mut params, h);
                command = Some(c);
                out.push(c.to_string());
            }
            PathToken::Number(v) => params.push(v),
        }
    }
    flush_params(&mut out, command, &mut params, h);

    out.join(" ")
}

#[cfg(test)]
#[path = "../tests/unit/svgpath.rs"]
mod tests;
