//! Character constants for the rain.

use rand::Rng;

/// Characters a rain symbol can show: katakana, latin capitals and digits.
pub const RAIN_CHARS: &[char] = &[
    'ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ', 'ク', 'ケ', 'コ', 'サ', 'シ', 'ス', 'セ', 'ソ', 'タ',
    'チ', 'ツ', 'テ', 'ト', 'ナ', 'ニ', 'ヌ', 'ネ', 'ノ', 'ハ', 'ヒ', 'フ', 'ヘ', 'ホ', 'マ', 'ミ',
    'ム', 'メ', 'モ', 'ヤ', 'ユ', 'ヨ', 'ラ', 'リ', 'ル', 'レ', 'ロ', 'ワ', 'ヲ', 'ン', 'A', 'B',
    'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U',
    'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Glyph used to draw a particle, by diameter in pixels.
pub fn particle_char(size: f32) -> char {
    if size <= 1.5 {
        '·'
    } else if size <= 4.0 {
        '•'
    } else {
        '●'
    }
}

/// Glyph used for shockwave outlines.
pub const RING_CHAR: char = '·';

/// Pick a uniformly random rain character.
pub fn random_char<R: Rng + ?Sized>(rng: &mut R) -> char {
    RAIN_CHARS[rng.gen_range(0..RAIN_CHARS.len())]
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_alphabet_size() {
        // 46 katakana, 26 letters, 10 digits
        assert_eq!(RAIN_CHARS.len(), 82);
    }

    #[test]
    fn test_random_char_is_from_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            assert!(RAIN_CHARS.contains(&random_char(&mut rng)));
        }
    }

    #[test]
    fn test_particle_char_by_size() {
        assert_eq!(particle_char(1.0), '·');
        assert_eq!(particle_char(3.0), '•');
        assert_eq!(particle_char(8.0), '●');
    }
}
