use image::RgbaImage;

use crate::common::color::is_dark;

/// Module count of the smallest symbol side, used to guess a pitch for rasters
/// without any light/dark transition on the middle scanlines.
const FALLBACK_MODULES: u32 = 29;

/// Module pitch in pixels: the shortest complete run of same-class pixels on
/// the middle row and the middle column. A complete run starts and ends on a
/// transition, so quiet zones touching the border never count. Without any
/// complete run the first run after the first transition is used, even when the
/// border cuts it off. `None` if neither scanline has a transition.
pub fn detect_pitch(img: &RgbaImage) -> Option<u32> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return None;
    }

    let row = runs(w, |x| is_dark(img.get_pixel(x, h / 2)));
    let col = runs(h, |y| is_dark(img.get_pixel(w / 2, y)));

    let shortest = [&row, &col]
        .into_iter()
        .filter(|r| r.len() > 2)
        .flat_map(|r| r[1..r.len() - 1].iter().copied())
        .min();
    shortest.or_else(|| row.get(1).or_else(|| col.get(1)).copied())
}

/// Lengths of the maximal same-class runs along a scanline of `len` pixels.
fn runs(len: u32, class: impl Fn(u32) -> bool) -> Vec<u32> {
    let mut res = Vec::new();
    let mut start = 0;
    for i in 1..len {
        if class(i) != class(i - 1) {
            res.push(i - start);
            start = i;
        }
    }
    res.push(len - start);
    res
}

pub fn fallback_pitch(w: u32) -> u32 {
    (w / FALLBACK_MODULES).max(1)
}

#[cfg(test)]
mod pitch_tests {
    use image::RgbaImage;
    use test_case::test_case;

    use super::{detect_pitch, fallback_pitch, runs};
    use crate::common::color::{BLACK, TRANSPARENT, WHITE};
    use crate::reader::test_utils::paint;

    #[test_case(&["#.#", ".#.", "#.#"], 7, Some(7))]
    #[test_case(&["....", "....", "..##", "..##"], 3, Some(6))]
    #[test_case(&["#..", "#..", "#.."], 4, Some(8))]
    #[test_case(&["###", "###", "###"], 5, None)]
    fn test_detect_pitch(rows: &[&str], pitch: u32, exp: Option<u32>) {
        assert_eq!(detect_pitch(&paint(rows, pitch)), exp);
    }

    #[test]
    fn test_shortest_run_wins_over_first_run() {
        // Middle row: quiet zone, then a 3 module run before any single module
        let rows = [
            ".........",
            ".........",
            ".........",
            ".........",
            ".###.#.#.",
            ".........",
            ".........",
            ".........",
            ".........",
        ];
        assert_eq!(detect_pitch(&paint(&rows, 10)), Some(10));
    }

    #[test]
    fn test_column_supplies_single_module() {
        // Middle row only has a 3 module run, the middle column a single one
        let rows = [".....", ".....", ".###.", ".....", "....."];
        assert_eq!(detect_pitch(&paint(&rows, 6)), Some(6));
    }

    #[test]
    fn test_runs() {
        let line = [false, false, true, true, true, false, true];
        assert_eq!(runs(7, |i| line[i as usize]), vec![2, 3, 1, 1]);
        assert_eq!(runs(3, |_| true), vec![3]);
    }

    #[test]
    fn test_transparent_counts_as_light() {
        let img = RgbaImage::from_fn(12, 12, |x, _| match x / 4 {
            0 => TRANSPARENT,
            1 => BLACK,
            _ => WHITE,
        });
        assert_eq!(detect_pitch(&img), Some(4));
    }

    #[test]
    fn test_empty_image() {
        assert_eq!(detect_pitch(&RgbaImage::new(0, 0)), None);
    }

    #[test_case(290, 10)]
    #[test_case(300, 10)]
    #[test_case(58, 2)]
    #[test_case(28, 1)]
    #[test_case(0, 1)]
    fn test_fallback_pitch(w: u32, exp: u32) {
        assert_eq!(fallback_pitch(w), exp);
    }
}
