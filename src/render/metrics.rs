//! Helvetica advance widths, used to size table columns the same way the
//! report has always been sized. Values are the standard AFM widths in
//! thousandths of an em, covering printable ASCII; anything outside that
//! range is charged the width of a digit.

const FIRST: usize = 0x20;
const FALLBACK: u16 = 556;

#[rustfmt::skip]
const WIDTHS: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9 : ; < = > ?
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    // @ A-O
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    // P-Z [ \ ] ^ _
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    // ` a-o
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    // p-z { | } ~
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

fn advance(c: char) -> u32 {
    let code = c as usize;
    if (FIRST..FIRST + WIDTHS.len()).contains(&code) {
        u32::from(WIDTHS[code - FIRST])
    } else {
        u32::from(FALLBACK)
    }
}

/// Rendered width of `text` at `size_pt`, in millimetres.
pub fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    let units: u32 = text.chars().map(advance).sum();
    units as f32 / 1000.0 * size_pt * (25.4 / 72.0)
}
