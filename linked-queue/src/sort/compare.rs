use std::cmp::Ordering;

/// Byte-wise ordering, with no special treatment of digits.
pub fn lexicographic(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}

/// Natural ordering: runs of decimal digits compare by numeric value, so
/// `"a2" < "a10"`.
///
/// Whitespace is skipped before every comparison step. A digit run starting
/// with `'0'` on either side is not value-compared: once the runs have differed
/// the first differing digit decides, so `"a007" < "a12"`.
///
/// When one side runs out first, the side with content left is greater.
pub fn natural(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    loop {
        i = skip_whitespace(a, i);
        j = skip_whitespace(b, j);

        match (a.get(i), b.get(j)) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                match compare_digit_runs(&a[i..], &b[j..]) {
                    (Ordering::Equal, len) => {
                        i += len;
                        j += len;
                    }
                    (ordering, _) => return ordering,
                }
            }
            (Some(x), Some(y)) => match x.cmp(y) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                ordering => return ordering,
            },
        }
    }
}

/// Compares the digit runs at the start of `a` and `b`, returning the
/// ordering and the number of digits walked in lock-step.
fn compare_digit_runs(a: &[u8], b: &[u8]) -> (Ordering, usize) {
    let leading_zero = a.first() == Some(&b'0') || b.first() == Some(&b'0');
    let mut result = Ordering::Equal;
    let mut len = 0;

    for (x, y) in a
        .iter()
        .zip(b)
        .take_while(|(x, y)| x.is_ascii_digit() && y.is_ascii_digit())
    {
        if result == Ordering::Equal {
            result = x.cmp(y);
        } else if leading_zero {
            return (result, len);
        }
        len += 1;
    }

    let a_continues = a.get(len).is_some_and(u8::is_ascii_digit);
    let b_continues = b.get(len).is_some_and(u8::is_ascii_digit);
    let result = match (a_continues, b_continues) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => result,
    };
    (result, len)
}

fn skip_whitespace(s: &[u8], mut pos: usize) -> usize {
    // `u8::is_ascii_whitespace` leaves out vertical tab
    while matches!(s.get(pos), Some(b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')) {
        pos += 1;
    }
    pos
}
