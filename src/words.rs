// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spelling out đồng amounts in Vietnamese.

const DIGITS: [&str; 10] = [
    "không", "một", "hai", "ba", "bốn", "năm", "sáu", "bảy", "tám", "chín",
];

/// Indexed by group position modulo 4. Amounts from 10^12 up are not
/// supported and read oddly, but never panic.
const MAGNITUDES: [&str; 4] = ["", " nghìn", " triệu", " tỷ"];

/// Reads one base-1000 group. `has_higher` is true when a more significant
/// group precedes this one, which makes the zero hundred audible.
fn read_group(num: u64, has_higher: bool) -> String {
    let hundred = (num / 100) as usize;
    let ten = ((num % 100) / 10) as usize;
    let unit = (num % 10) as usize;
    let mut parts: Vec<&str> = Vec::with_capacity(5);

    let bare_odd = hundred == 0 && ten == 0 && unit > 0;
    if hundred > 0 || (has_higher && !bare_odd) {
        parts.push(DIGITS[hundred]);
        parts.push("trăm");
    }

    if ten > 1 {
        parts.push(DIGITS[ten]);
        parts.push("mươi");
    } else if ten == 1 {
        parts.push("mười");
    } else if unit > 0 && (hundred > 0 || has_higher) {
        parts.push("lẻ");
    }

    if unit > 0 {
        let word = match unit {
            1 if ten > 1 => "mốt",
            5 if ten > 0 => "lăm",
            4 if ten > 1 => "tư",
            _ => DIGITS[unit],
        };
        parts.push(word);
    }

    parts.join(" ")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `0` reads as "Không đồng"; negative input reads as "Số âm".
pub fn to_vietnamese_words(amount: i64) -> String {
    if amount == 0 {
        return "Không đồng".to_string();
    }
    if amount < 0 {
        return "Số âm".to_string();
    }

    let mut groups = Vec::new();
    let mut rest = amount as u64;
    while rest > 0 {
        groups.push(rest % 1000);
        rest /= 1000;
    }

    let mut out = String::new();
    for j in (0..groups.len()).rev() {
        let value = groups[j];
        if value > 0 {
            let has_higher = j < groups.len() - 1;
            out.push_str(&read_group(value, has_higher));
            out.push_str(MAGNITUDES[j % 4]);
            out.push(' ');
        } else if j > 0 && j % 4 == 0 && !out.is_empty() {
            // Known quirk: an empty group on a billion boundary still says "tỷ".
            out.push_str("tỷ ");
        }
    }

    let trimmed = out.trim();
    if trimmed.is_empty() {
        return "Không đồng".to_string();
    }
    format!("{} đồng", capitalize(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_forms() {
        assert_eq!(read_group(15, false), "mười lăm");
        assert_eq!(read_group(24, false), "hai mươi tư");
        assert_eq!(read_group(14, false), "mười bốn");
        assert_eq!(read_group(11, false), "mười một");
        assert_eq!(read_group(105, false), "một trăm lẻ năm");
        assert_eq!(read_group(5, true), "lẻ năm");
        assert_eq!(read_group(50, true), "không trăm năm mươi");
    }
}
