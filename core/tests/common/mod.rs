// Shared fixtures for integration tests: a synthetic QWERTY layout, gesture
// synthesis for known words, and an in-memory test dictionary.
#![allow(dead_code)]

use libswipe_core::{KeyDescriptor, KeyboardLayout, RawPath, RawPoint};

/// 26-key QWERTY on a 320x160 dp board.
pub fn qwerty_layout() -> KeyboardLayout {
    const KEYS: &[(char, f32, f32)] = &[
        // Row 1: Q W E R T Y U I O P
        ('q', 16.0, 26.0),
        ('w', 48.0, 26.0),
        ('e', 80.0, 26.0),
        ('r', 112.0, 26.0),
        ('t', 144.0, 26.0),
        ('y', 176.0, 26.0),
        ('u', 208.0, 26.0),
        ('i', 240.0, 26.0),
        ('o', 272.0, 26.0),
        ('p', 304.0, 26.0),
        // Row 2: A S D F G H J K L
        ('a', 32.0, 80.0),
        ('s', 64.0, 80.0),
        ('d', 96.0, 80.0),
        ('f', 128.0, 80.0),
        ('g', 160.0, 80.0),
        ('h', 192.0, 80.0),
        ('j', 224.0, 80.0),
        ('k', 256.0, 80.0),
        ('l', 288.0, 80.0),
        // Row 3: Z X C V B N M
        ('z', 64.0, 134.0),
        ('x', 96.0, 134.0),
        ('c', 128.0, 134.0),
        ('v', 160.0, 134.0),
        ('b', 192.0, 134.0),
        ('n', 224.0, 134.0),
        ('m', 256.0, 134.0),
    ];

    KeyboardLayout {
        language_tag: "en-US".into(),
        keys: KEYS
            .iter()
            .map(|&(ch, cx, cy)| {
                KeyDescriptor::new(ch.to_string(), ch as i32, cx, cy, 32.0, 52.0)
            })
            .collect(),
        layout_width: 320.0,
        layout_height: 160.0,
    }
}

/// Straight-segment gesture through the key centers of `word`, with
/// timestamps at 10 ms intervals.
pub fn make_path_for_word(layout: &KeyboardLayout, word: &str, points_per_segment: usize) -> RawPath {
    let centers: Vec<(f32, f32)> = word
        .chars()
        .filter_map(|ch| {
            layout
                .find_key_by_code_point(ch as i32)
                .map(|i| (layout.keys[i].center_x, layout.keys[i].center_y))
        })
        .collect();
    if centers.is_empty() {
        return RawPath::default();
    }

    let mut points = Vec::new();
    let mut ts = 0i64;
    for pair in centers.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        for j in 0..points_per_segment {
            let f = j as f32 / points_per_segment as f32;
            points.push(RawPoint::new(x0 + (x1 - x0) * f, y0 + (y1 - y0) * f, ts));
            ts += 10;
        }
    }
    let (xn, yn) = centers[centers.len() - 1];
    points.push(RawPoint::new(xn, yn, ts));
    RawPath::new(points)
}

/// Deterministic LCG noise, simulating an imprecise gesture.
pub fn add_noise(path: &mut RawPath, stddev_x: f32, stddev_y: f32, seed: u32) {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (state as f32 / u32::MAX as f32) * 2.0 - 1.0
    };
    for p in &mut path.points {
        p.x += next() * stddev_x;
        p.y += next() * stddev_y;
    }
}

/// Encode `(word, frequency, flags)` triples into a GLID buffer.
pub fn encode_dictionary(words: &[(&str, u32, u8)], language_tag: &str) -> Vec<u8> {
    use libswipe_core::dictionary::{DICT_HEADER_SIZE, DICT_MAGIC, DICT_VERSION};

    let mut buf = vec![0u8; DICT_HEADER_SIZE];
    buf[0..4].copy_from_slice(&DICT_MAGIC.to_le_bytes());
    buf[4..6].copy_from_slice(&DICT_VERSION.to_le_bytes());
    buf[8..12].copy_from_slice(&(words.len() as u32).to_le_bytes());
    buf[12..14].copy_from_slice(&(language_tag.len() as u16).to_le_bytes());
    buf[14..14 + language_tag.len()].copy_from_slice(language_tag.as_bytes());
    for (word, frequency, flags) in words {
        buf.push(word.len() as u8);
        buf.extend_from_slice(word.as_bytes());
        buf.extend_from_slice(&frequency.to_le_bytes());
        buf.push(*flags);
    }
    buf
}

/// The word set used by the end-to-end scenarios.
pub const TEST_WORDS: &[(&str, u32, u8)] = &[
    ("the", 1_000_000, 0),
    ("and", 800_000, 0),
    ("hello", 50_000, 0),
    ("world", 40_000, 0),
    ("help", 30_000, 0),
    ("hero", 20_000, 0),
    ("go", 200_000, 0),
    ("do", 180_000, 0),
    ("a", 900_000, 0),
];

pub fn test_dictionary() -> Vec<u8> {
    encode_dictionary(TEST_WORDS, "en")
}
