//! Scale regression test
//!
//! Checks the geometric and numeric properties of the scaler on every
//! layout and every up/down combination.
//!
//! Run with:
//! ```
//! cargo test -p fbink-scale --test scale_reg
//! ```

use fbink_core::{Bitmap, PixelLayout};
use fbink_scale::{Backend, ScaleCase, ScaleInfo, ScaleOptions, scale, scale_bitmap, scale_raw};
use fbink_test::RegParams;

const LAYOUTS: [PixelLayout; 3] = [PixelLayout::Gray, PixelLayout::GrayAlpha, PixelLayout::Rgba];

/// Deterministic, non-flat test image.
fn pattern(width: u32, height: u32, layout: PixelLayout) -> Bitmap {
    let bpp = layout.bytes_per_pixel() as u32;
    let mut data = Vec::with_capacity((width * height * bpp) as usize);
    for y in 0..height {
        for x in 0..width {
            for c in 0..bpp {
                data.push(((x * 53 + y * 97 + c * 31 + x * y * 7) % 256) as u8);
            }
        }
    }
    Bitmap::from_data(width, height, layout, &data).unwrap()
}

fn channel_range(bmp: &Bitmap, channel: usize) -> (u8, u8) {
    let bpp = bmp.layout().bytes_per_pixel();
    bmp.data()
        .iter()
        .skip(channel)
        .step_by(bpp)
        .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Inclusive span of source coordinates that can contribute to a
/// destination coordinate mapped to `start` on an axis of length `s`
/// scaled to `d`.
fn window(start: usize, s: u32, d: u32) -> (usize, usize) {
    let reach = (s as usize).div_ceil(d as usize) + 1;
    (start, (start + reach).min(s as usize - 1))
}

fn window_range(src: &Bitmap, cols: (usize, usize), rows: (usize, usize), channel: usize) -> (u8, u8) {
    let mut range = (u8::MAX, u8::MIN);
    for y in rows.0..=rows.1 {
        for x in cols.0..=cols.1 {
            let v = src.pixel(x as u32, y as u32).expect("source pixel")[channel];
            range = (range.0.min(v), range.1.max(v));
        }
    }
    range
}

#[test]
fn scale_reg() {
    let mut rp = RegParams::new("scale");

    // --- Test 1: identity reproduces the source on every layout ---
    for layout in LAYOUTS {
        let src = pattern(13, 9, layout);
        let out = scale_bitmap(&src, 13, 9, &ScaleOptions::default()).expect("identity");
        rp.compare_bitmaps(&src, &out);
    }

    // --- Test 2: mirroring twice reproduces the source ---
    for layout in LAYOUTS {
        let src = pattern(11, 7, layout);
        let opts = ScaleOptions::default();
        let once = scale_bitmap(&src, -11, -7, &opts).expect("mirror");
        let twice = scale_bitmap(&once, -11, -7, &opts).expect("mirror back");
        rp.compare_bitmaps(&src, &twice);

        let flipped = scale_bitmap(&src, -11, 7, &opts).expect("mirror x");
        rp.compare_bytes(
            src.pixel(0, 3).unwrap(),
            flipped.pixel(10, 3).unwrap(),
        );
    }

    // --- Test 3: every output channel stays within the source pixels it
    // was computed from ---
    let sizes = [(29, 17), (5, 3), (29, 3), (5, 17), (-40, 25), (3, -60), (1, 1)];
    for layout in LAYOUTS {
        let src = pattern(19, 11, layout);
        for (dw, dh) in sizes {
            let out = scale_bitmap(&src, dw, dh, &ScaleOptions::default()).expect("scale");
            rp.compare_values(dw.unsigned_abs() as f64, out.width() as f64, 0.0);
            rp.compare_values(dh.unsigned_abs() as f64, out.height() as f64, 0.0);
            let info = ScaleInfo::new(src.width(), src.height(), dw, dh).expect("info");
            let mut outside = 0;
            for (dy, &ypoint) in info.ypoints().iter().enumerate() {
                let rows = window(ypoint / src.width() as usize, src.height(), out.height());
                for (dx, &xpoint) in info.xpoints().iter().enumerate() {
                    let cols = window(xpoint, src.width(), out.width());
                    let px = out.pixel(dx as u32, dy as u32).expect("output pixel");
                    for (channel, &v) in px.iter().enumerate() {
                        let (lo, hi) = window_range(&src, cols, rows, channel);
                        if v < lo || v > hi {
                            outside += 1;
                        }
                    }
                }
            }
            if outside > 0 {
                eprintln!("  {:?} {}x{}: {} samples outside their window", layout, dw, dh, outside);
            }
            rp.compare_values(0.0, outside as f64, 0.0);
        }
    }

    // Flat blocks in a narrow band: any overshoot leaves 90..=110.
    let mut blocks = Vec::with_capacity(16 * 12);
    for y in 0..12u32 {
        for x in 0..16u32 {
            blocks.push(90 + ((x / 4 + y / 3) % 3) as u8 * 10);
        }
    }
    let blocks = Bitmap::from_data(16, 12, PixelLayout::Gray, &blocks).unwrap();
    for (dw, dh) in [(37, 29), (5, 4), (37, 4), (5, 29), (-16, -12)] {
        let out = scale_bitmap(&blocks, dw, dh, &ScaleOptions::default()).expect("blocks");
        let (lo, hi) = channel_range(&out, 0);
        rp.compare_values(1.0, (lo >= 90 && hi <= 110) as u8 as f64, 0.0);
    }

    // --- Test 4: a 1x1 destination is the source average ---
    for (sw, sh) in [(7, 5), (3, 3), (16, 16), (9, 1), (1, 6)] {
        let src = pattern(sw, sh, PixelLayout::GrayAlpha);
        let out = scale_bitmap(&src, 1, 1, &ScaleOptions::default()).expect("1x1");
        for channel in 0..2 {
            let sum: u32 = src
                .data()
                .iter()
                .skip(channel)
                .step_by(2)
                .map(|&v| v as u32)
                .sum();
            let average = sum as f64 / (sw * sh) as f64;
            rp.compare_values(average, out.data()[channel] as f64, 1.0);
        }
    }

    // --- Test 5: RGBA ignoring alpha on gray content equals the gray path ---
    let gray = pattern(17, 13, PixelLayout::Gray);
    let mut rgba = gray.to_layout(PixelLayout::Rgba).unwrap();
    for px in rgba.data_mut().chunks_exact_mut(4) {
        px[3] = 0x40;
    }
    let ignore = ScaleOptions::default().ignore_alpha(true);
    for (dw, dh) in [(34, 26), (8, 6), (34, 6), (8, 26), (-9, 5)] {
        let g = scale_bitmap(&gray, dw, dh, &ScaleOptions::default()).expect("gray");
        let c = scale_bitmap(&rgba, dw, dh, &ignore).expect("rgba");
        let red: Vec<u8> = c.data().iter().step_by(4).copied().collect();
        rp.compare_bytes(g.data(), &red);
    }

    // --- Test 6: flat 4x4 gray of 100 halves to flat 100 ---
    let flat = [100u8; 16];
    let out = scale(&flat, 4, 4, PixelLayout::Gray, false, 2, 2).expect("halve");
    rp.compare_bytes(&[100; 4], out.data());

    // --- Test 7: 2x1 red/green stretches to a smooth opaque ramp ---
    let ramp = [255, 0, 0, 255, 0, 255, 0, 255];
    let out = scale_raw(&ramp, 2, 1, 4, false, 4, 1).expect("ramp");
    rp.compare_bytes(
        &[255, 0, 0, 255, 191, 63, 0, 255, 63, 191, 0, 255, 0, 255, 0, 255],
        out.data(),
    );
    rp.write_bitmap(&out).expect("write ramp");

    // --- Test 8: every backend produces the scalar bytes ---
    let src = pattern(31, 23, PixelLayout::Rgba);
    for (dw, dh) in [(10, 7), (62, 7), (10, 46), (-13, -9)] {
        for ignore_alpha in [false, true] {
            let reference = ScaleOptions::with_backend(Backend::Scalar).ignore_alpha(ignore_alpha);
            let expected = scale_bitmap(&src, dw, dh, &reference).expect("scalar");
            for backend in [Backend::Auto, Backend::Neon, Backend::Sse41] {
                let opts = ScaleOptions::with_backend(backend).ignore_alpha(ignore_alpha);
                let out = scale_bitmap(&src, dw, dh, &opts).expect("backend");
                rp.compare_bitmaps(&expected, &out);
            }
        }
    }
    eprintln!("  Auto backend resolves to {:?}", Backend::Auto.resolve());

    // --- Test 9: scaling cases ---
    let cases = [
        ((8, 8), ScaleCase::UpXY),
        ((8, 2), ScaleCase::UpXDownY),
        ((2, 8), ScaleCase::DownXUpY),
        ((2, 2), ScaleCase::DownXY),
    ];
    for ((dw, dh), case) in cases {
        let info = ScaleInfo::new(4, 4, dw, dh).expect("info");
        rp.compare_values(1.0, (info.case() == case) as u8 as f64, 0.0);
    }

    // --- Test 10: a downscaled photo-like gradient for visual inspection ---
    let big = pattern(240, 160, PixelLayout::Rgba);
    let small = scale_bitmap(&big, 90, 60, &ScaleOptions::default()).expect("downscale");
    rp.write_bitmap(&small).expect("write downscale");

    assert!(rp.cleanup(), "scale regression test failed");
}
