// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use moneymind::words::to_vietnamese_words;

#[test]
fn reference_values() {
    assert_eq!(to_vietnamese_words(0), "Không đồng");
    assert_eq!(to_vietnamese_words(21), "Hai mươi mốt đồng");
    assert_eq!(to_vietnamese_words(1_000_000), "Một triệu đồng");
    assert_eq!(to_vietnamese_words(1005), "Một nghìn lẻ năm đồng");
}

#[test]
fn tens_and_units_special_forms() {
    assert_eq!(to_vietnamese_words(10), "Mười đồng");
    assert_eq!(to_vietnamese_words(15), "Mười lăm đồng");
    assert_eq!(to_vietnamese_words(25), "Hai mươi lăm đồng");
    assert_eq!(to_vietnamese_words(34), "Ba mươi tư đồng");
    assert_eq!(to_vietnamese_words(105), "Một trăm lẻ năm đồng");
}

#[test]
fn inner_zero_hundreds_are_spoken() {
    assert_eq!(
        to_vietnamese_words(1_050_000),
        "Một triệu không trăm năm mươi nghìn đồng"
    );
    assert_eq!(
        to_vietnamese_words(250_000),
        "Hai trăm năm mươi nghìn đồng"
    );
}

#[test]
fn billions() {
    assert_eq!(to_vietnamese_words(1_000_000_000), "Một tỷ đồng");
    assert_eq!(
        to_vietnamese_words(2_000_500_000),
        "Hai tỷ năm trăm nghìn đồng"
    );
}

#[test]
fn negative_amounts() {
    assert_eq!(to_vietnamese_words(-1), "Số âm");
}

#[test]
fn words_command_accepts_decimals_and_negatives() {
    for amount in ["1005", "250000.75", "-5"] {
        let matches = moneymind::cli::build_cli().get_matches_from(["moneymind", "words", amount]);
        let Some(("words", sub)) = matches.subcommand() else {
            panic!("no words subcommand");
        };
        moneymind::commands::words::handle(sub).unwrap();
    }
}
