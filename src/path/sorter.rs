//! Natural path ordering.
//!
//! Digit runs compare by numeric value, everything else compares
//! case-insensitively, so `/3/2/1` sorts before `/3/10/1`. Ties are broken by
//! plain byte order to keep the order total.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Total natural ordering of two path strings.
pub fn compare(a: &str, b: &str) -> Ordering {
    natural_cmp(a, b).then_with(|| a.cmp(b))
}

/// Sort a slice of path-like strings into canonical order.
pub fn sort_paths<T: AsRef<str>>(paths: &mut [T]) {
    paths.sort_by(|a, b| compare(a.as_ref(), b.as_ref()));
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let l = take_digits(&mut left);
                let r = take_digits(&mut right);
                let ord = cmp_numeric(&l, &r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = fold(x).cmp(&fold(y));
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

// Arbitrary-length digit runs, no integer overflow.
fn cmp_numeric(l: &str, r: &str) -> Ordering {
    let l = l.trim_start_matches('0');
    let r = r.trim_start_matches('0');
    l.len().cmp(&r.len()).then_with(|| l.cmp(r))
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
